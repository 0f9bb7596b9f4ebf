//! Image backend selection from environment variables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use product_core::images::DEFAULT_CONTAINER;

use crate::{AzureBlobStore, ImageStore, LocalImageStore, S3ImageStore, StorageError};

/// Default directory for the local backend.
pub const DEFAULT_IMAGE_DIR: &str = "./images";

/// Which backend serves product images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageBackend {
    Azure,
    S3,
    Local,
}

impl FromStr for ImageBackend {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "azure" => Ok(Self::Azure),
            "s3" => Ok(Self::S3),
            "local" => Ok(Self::Local),
            other => Err(StorageError::Config(format!(
                "Unknown image backend '{other}'. Must be one of: azure, s3, local"
            ))),
        }
    }
}

/// Image store configuration.
#[derive(Clone)]
pub struct ImageStoreConfig {
    pub backend: ImageBackend,
    /// Azure Storage connection string (`BLOB_CONN_STR`).
    pub azure_connection_string: Option<String>,
    /// Azure container name (`BLOB_CONTAINER`).
    pub container: String,
    pub s3_bucket: Option<String>,
    pub s3_prefix: String,
    pub s3_endpoint: Option<String>,
    pub local_dir: PathBuf,
}

impl fmt::Debug for ImageStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageStoreConfig")
            .field("backend", &self.backend)
            .field(
                "azure_connection_string",
                &self.azure_connection_string.as_ref().map(|_| "<redacted>"),
            )
            .field("container", &self.container)
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_prefix", &self.s3_prefix)
            .field("s3_endpoint", &self.s3_endpoint)
            .field("local_dir", &self.local_dir)
            .finish()
    }
}

impl ImageStoreConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var          | Default                                   |
    /// |------------------|-------------------------------------------|
    /// | `IMAGE_BACKEND`  | `azure` if `BLOB_CONN_STR` is set, else `s3` if `S3_BUCKET` is set, else `local` |
    /// | `BLOB_CONN_STR`  | none                                      |
    /// | `BLOB_CONTAINER` | `product-images`                          |
    /// | `S3_BUCKET`      | none                                      |
    /// | `S3_PREFIX`      | empty                                     |
    /// | `S3_ENDPOINT`    | none (AWS)                                |
    /// | `IMAGE_DIR`      | `./images`                                |
    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StorageError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let azure_connection_string = get("BLOB_CONN_STR");
        let s3_bucket = get("S3_BUCKET");

        let backend = match get("IMAGE_BACKEND") {
            Some(name) => name.parse()?,
            None if azure_connection_string.is_some() => ImageBackend::Azure,
            None if s3_bucket.is_some() => ImageBackend::S3,
            None => ImageBackend::Local,
        };

        let config = Self {
            backend,
            azure_connection_string,
            container: get("BLOB_CONTAINER").unwrap_or_else(|| DEFAULT_CONTAINER.to_string()),
            s3_bucket,
            s3_prefix: get("S3_PREFIX").unwrap_or_default(),
            s3_endpoint: get("S3_ENDPOINT"),
            local_dir: get("IMAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR)),
        };
        config.validate()?;
        Ok(config)
    }

    /// Ensure the selected backend has what it needs.
    pub fn validate(&self) -> Result<(), StorageError> {
        match self.backend {
            ImageBackend::Azure if self.azure_connection_string.is_none() => Err(
                StorageError::Config("azure backend requires BLOB_CONN_STR".into()),
            ),
            ImageBackend::S3 if self.s3_bucket.is_none() => Err(StorageError::Config(
                "s3 backend requires S3_BUCKET".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Construct the configured image store.
pub async fn build_image_store(
    config: &ImageStoreConfig,
) -> Result<Arc<dyn ImageStore>, StorageError> {
    config.validate()?;
    let store: Arc<dyn ImageStore> = match config.backend {
        ImageBackend::Azure => {
            let conn = config.azure_connection_string.as_deref().unwrap_or_default();
            Arc::new(AzureBlobStore::from_connection_string(
                conn,
                config.container.clone(),
            )?)
        }
        ImageBackend::S3 => {
            let bucket = config.s3_bucket.as_deref().unwrap_or_default();
            Arc::new(
                S3ImageStore::from_env(bucket, &config.s3_prefix, config.s3_endpoint.as_deref())
                    .await,
            )
        }
        ImageBackend::Local => {
            if !config.local_dir.is_dir() {
                tracing::warn!(
                    dir = %config.local_dir.display(),
                    "Image directory does not exist; every image request will 404"
                );
            }
            Arc::new(LocalImageStore::new(config.local_dir.clone()))
        }
    };
    Ok(store)
}
