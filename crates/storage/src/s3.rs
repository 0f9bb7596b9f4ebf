//! S3 (and S3-compatible) image backend.

use async_trait::async_trait;
use aws_sdk_s3::Client;

use crate::{ImageStore, StorageError, StoredImage};

/// Image store backed by an S3 bucket, optionally under a key prefix.
pub struct S3ImageStore {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3ImageStore {
    /// Build a store from an existing client.
    pub fn new(client: Client, bucket: impl Into<String>, prefix: &str) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: normalize_prefix(prefix),
        }
    }

    /// Build a store using credentials and region from the environment.
    ///
    /// When `endpoint` is set (MinIO and friends), path-style addressing is
    /// used.
    pub async fn from_env(bucket: &str, prefix: &str, endpoint: Option<&str>) -> Self {
        let shared = aws_config::load_from_env().await;
        let client = match endpoint {
            Some(url) => {
                let conf = aws_sdk_s3::config::Builder::from(&shared)
                    .endpoint_url(url)
                    .force_path_style(true)
                    .build();
                Client::from_conf(conf)
            }
            None => Client::new(&shared),
        };
        Self::new(client, bucket, prefix)
    }

    /// Object key for an image name.
    pub fn object_key(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }
}

/// Strip surrounding slashes and ensure a non-empty prefix ends with `/`.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    fn backend_name(&self) -> &'static str {
        "s3"
    }

    async fn fetch(&self, name: &str) -> Result<Option<StoredImage>, StorageError> {
        let key = self.object_key(name);
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    tracing::debug!(bucket = %self.bucket, key = %key, "Object not found");
                    return Ok(None);
                }
                return Err(StorageError::S3(service_err.to_string()));
            }
        };

        let content_type = output.content_type().map(str::to_owned);
        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        Ok(Some(StoredImage {
            bytes: data.into_bytes(),
            content_type,
        }))
    }
}
