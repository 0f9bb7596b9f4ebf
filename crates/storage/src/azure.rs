//! Azure Blob Storage backend.
//!
//! Talks to the Blob REST API directly with [`reqwest`]. Requests are
//! authorized with Shared Key (HMAC-SHA256 over the canonical request), a
//! SAS token, or not at all for public containers.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use sha2::Sha256;

use crate::{ImageStore, StorageError, StoredImage};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Blob service REST API version sent with every request.
pub const API_VERSION: &str = "2021-08-06";

/// Account name of the local storage emulator.
pub const DEV_ACCOUNT_NAME: &str = "devstoreaccount1";

/// Published account key of the local storage emulator.
pub const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

/// Blob endpoint of the local storage emulator.
pub const DEV_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

type HmacSha256 = Hmac<Sha256>;

// ---------------------------------------------------------------------------
// Connection string
// ---------------------------------------------------------------------------

/// How requests to the blob service are authorized.
#[derive(Clone, PartialEq, Eq)]
pub enum AzureCredential {
    /// Decoded account key for Shared Key signing.
    SharedKey(Vec<u8>),
    /// SAS query string, without the leading `?`.
    Sas(String),
    /// Public read access.
    Anonymous,
}

impl fmt::Debug for AzureCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SharedKey(_) => f.write_str("SharedKey(<redacted>)"),
            Self::Sas(_) => f.write_str("Sas(<redacted>)"),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// A parsed Azure Storage connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureConnection {
    pub account_name: Option<String>,
    /// Blob service base URL without a trailing slash.
    pub blob_endpoint: String,
    pub credential: AzureCredential,
}

impl AzureConnection {
    /// Parse a connection string such as
    /// `DefaultEndpointsProtocol=https;AccountName=..;AccountKey=..;EndpointSuffix=core.windows.net`.
    ///
    /// Also accepts `BlobEndpoint=..;SharedAccessSignature=..` and
    /// `UseDevelopmentStorage=true`. Keys are matched case-insensitively.
    pub fn parse(connection_string: &str) -> Result<Self, StorageError> {
        let mut parts = BTreeMap::new();
        for segment in connection_string.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (key, value) = segment.split_once('=').ok_or_else(|| {
                StorageError::Config(format!("connection string segment without '=': {segment}"))
            })?;
            parts.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }

        if parts
            .get("usedevelopmentstorage")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            return Ok(Self {
                account_name: Some(DEV_ACCOUNT_NAME.to_string()),
                blob_endpoint: DEV_BLOB_ENDPOINT.to_string(),
                credential: AzureCredential::SharedKey(decode_key(DEV_ACCOUNT_KEY)?),
            });
        }

        let account_name = parts.get("accountname").cloned();

        let blob_endpoint = match (parts.get("blobendpoint"), &account_name) {
            (Some(endpoint), _) => endpoint.trim_end_matches('/').to_string(),
            (None, Some(account)) => {
                let protocol = parts
                    .get("defaultendpointsprotocol")
                    .map_or(DEFAULT_PROTOCOL, String::as_str);
                let suffix = parts
                    .get("endpointsuffix")
                    .map_or(DEFAULT_ENDPOINT_SUFFIX, String::as_str);
                format!("{protocol}://{account}.blob.{suffix}")
            }
            (None, None) => {
                return Err(StorageError::Config(
                    "connection string needs AccountName or BlobEndpoint".into(),
                ))
            }
        };

        let credential = if let Some(key) = parts.get("accountkey") {
            if account_name.is_none() {
                return Err(StorageError::Config(
                    "AccountKey requires AccountName".into(),
                ));
            }
            AzureCredential::SharedKey(decode_key(key)?)
        } else if let Some(sas) = parts.get("sharedaccesssignature") {
            AzureCredential::Sas(sas.trim_start_matches('?').to_string())
        } else {
            AzureCredential::Anonymous
        };

        Ok(Self {
            account_name,
            blob_endpoint,
            credential,
        })
    }
}

fn decode_key(key: &str) -> Result<Vec<u8>, StorageError> {
    BASE64
        .decode(key)
        .map_err(|e| StorageError::Config(format!("AccountKey is not valid base64: {e}")))
}

// ---------------------------------------------------------------------------
// Shared Key signing
// ---------------------------------------------------------------------------

/// Build the Shared Key string-to-sign for a body-less request.
///
/// The eleven standard header slots are empty; `ms_headers` are the
/// `x-ms-*` headers, canonicalized by lowercasing and sorting by name.
pub fn string_to_sign(method: &str, ms_headers: &[(&str, &str)], canonical_resource: &str) -> String {
    let mut headers: Vec<(String, &str)> = ms_headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.trim()))
        .collect();
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::with_capacity(128);
    out.push_str(method);
    out.push('\n');
    // Content-Encoding through Range.
    out.push_str(&"\n".repeat(11));
    for (name, value) in headers {
        out.push_str(&format!("{name}:{value}\n"));
    }
    out.push_str(canonical_resource);
    out
}

/// Sign a string-to-sign with the decoded account key, base64-encoded.
pub fn sign(key: &[u8], string_to_sign: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(string_to_sign.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// RFC 1123 date as required by `x-ms-date`.
fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Image store backed by one Azure Blob container.
pub struct AzureBlobStore {
    client: reqwest::Client,
    connection: AzureConnection,
    container: String,
}

impl AzureBlobStore {
    /// Build a store from a connection string and container name.
    pub fn from_connection_string(
        connection_string: &str,
        container: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let connection = AzureConnection::parse(connection_string)?;
        Ok(Self::new(reqwest::Client::new(), connection, container))
    }

    /// Build a store reusing an existing [`reqwest::Client`].
    pub fn new(client: reqwest::Client, connection: AzureConnection, container: impl Into<String>) -> Self {
        Self {
            client,
            connection,
            container: container.into(),
        }
    }

    /// URL of a blob in the configured container.
    pub fn blob_url(&self, name: &str) -> Result<Url, StorageError> {
        let mut url = Url::parse(&format!(
            "{}/{}/{}",
            self.connection.blob_endpoint, self.container, name
        ))
        .map_err(|e| StorageError::Config(format!("invalid blob URL: {e}")))?;
        if let AzureCredential::Sas(sas) = &self.connection.credential {
            url.set_query(Some(sas.as_str()));
        }
        Ok(url)
    }
}

#[async_trait]
impl ImageStore for AzureBlobStore {
    fn backend_name(&self) -> &'static str {
        "azure"
    }

    async fn fetch(&self, name: &str) -> Result<Option<StoredImage>, StorageError> {
        let url = self.blob_url(name)?;
        let date = http_date();

        let mut request = self
            .client
            .get(url.clone())
            .header("x-ms-date", &date)
            .header("x-ms-version", API_VERSION);

        if let (AzureCredential::SharedKey(key), Some(account)) =
            (&self.connection.credential, &self.connection.account_name)
        {
            let resource = format!("/{account}{}", url.path());
            let to_sign = string_to_sign(
                "GET",
                &[("x-ms-date", date.as_str()), ("x-ms-version", API_VERSION)],
                &resource,
            );
            let signature = sign(key, &to_sign);
            request = request.header("Authorization", format!("SharedKey {account}:{signature}"));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(blob = %name, container = %self.container, "Blob not found");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorageError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;

        Ok(Some(StoredImage {
            bytes,
            content_type,
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
