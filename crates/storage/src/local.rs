//! Filesystem image backend, used for local development and tests.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use product_core::images::validate_image_name;

use crate::{ImageStore, StorageError, StoredImage};

/// Image store reading files from a single directory.
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn fetch(&self, name: &str) -> Result<Option<StoredImage>, StorageError> {
        // Names map straight onto paths, so anything outside the allowed
        // character set cannot exist here.
        if validate_image_name(name).is_err() {
            return Ok(None);
        }
        match tokio::fs::read(self.root.join(name)).await {
            Ok(data) => Ok(Some(StoredImage {
                bytes: data.into(),
                content_type: None,
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
