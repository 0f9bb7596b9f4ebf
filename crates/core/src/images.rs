//! Product image naming rules.
//!
//! Image names arrive as a single URL path segment and are used verbatim as
//! blob keys or file names, so only a conservative character set is allowed.

use crate::error::CoreError;

/// Default blob container holding product images.
pub const DEFAULT_CONTAINER: &str = "product-images";

/// Content type used when the extension is unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Client-facing message for any image that cannot be served.
pub const IMAGE_NOT_FOUND: &str = "Image not found";

/// Maximum image name length in bytes.
pub const MAX_NAME_LEN: usize = 255;

/// Validate an image name taken from the request path.
///
/// Accepts `[A-Za-z0-9._-]`, rejects names starting with `.` (hidden files
/// and `..`) and anything longer than [`MAX_NAME_LEN`].
pub fn validate_image_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Image name must be 1-{MAX_NAME_LEN} bytes"
        )));
    }
    if name.starts_with('.') {
        return Err(CoreError::Validation(
            "Image name must not start with '.'".into(),
        ));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(CoreError::Validation(format!(
            "Image name contains invalid character {bad:?}"
        )));
    }
    Ok(())
}

/// Pick a content type from the file extension.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
