//! Product image storage backends.
//!
//! The API serves `/images/{filename}` from whichever backend is configured:
//! an Azure Blob container, an S3 bucket, or a local directory.

use async_trait::async_trait;
use bytes::Bytes;

pub mod azure;
pub mod config;
pub mod local;
pub mod s3;

pub use azure::AzureBlobStore;
pub use config::{build_image_store, ImageBackend, ImageStoreConfig};
pub use local::LocalImageStore;
pub use s3::S3ImageStore;

/// Image bytes plus the content type reported by the backend, if any.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Errors from the image storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Invalid or incomplete backend configuration.
    #[error("Invalid image store configuration: {0}")]
    Config(String),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The blob service returned an unexpected status code.
    #[error("Blob service error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// An S3 operation failed.
    #[error("S3 error: {0}")]
    S3(String),

    /// Reading from the local filesystem failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A read-only source of product images keyed by file name.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Short backend identifier for logs (`azure`, `s3`, `local`).
    fn backend_name(&self) -> &'static str;

    /// Fetch an image by name. Returns `Ok(None)` if it does not exist.
    async fn fetch(&self, name: &str) -> Result<Option<StoredImage>, StorageError>;
}
