//! Handler serving product images from the configured image store.

use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use product_core::images::{content_type_for, validate_image_name, IMAGE_NOT_FOUND};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Browsers may cache images for an hour.
const IMAGE_CACHE_CONTROL: &str = "public, max-age=3600";

/// GET /images/{filename}
///
/// Every failure, including backend errors, is reported as 404 so the
/// store front falls back to its placeholder image.
pub async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    if let Err(e) = validate_image_name(&filename) {
        tracing::debug!(filename = %filename, error = %e, "Rejected image name");
        return Err(AppError::NotFound(IMAGE_NOT_FOUND));
    }

    let image = match state.images.fetch(&filename).await {
        Ok(Some(image)) => image,
        Ok(None) => return Err(AppError::NotFound(IMAGE_NOT_FOUND)),
        Err(e) => {
            tracing::warn!(
                filename = %filename,
                backend = state.images.backend_name(),
                error = %e,
                "Image fetch failed"
            );
            return Err(AppError::NotFound(IMAGE_NOT_FOUND));
        }
    };

    // Blob services often report application/octet-stream; only trust
    // image types.
    let content_type = image
        .content_type
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or_else(|| content_type_for(&filename).to_string());

    Ok((
        [
            (CONTENT_TYPE, content_type),
            (CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
        ],
        image.bytes,
    )
        .into_response())
}
