#![allow(dead_code)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use product_api::config::{CorsOrigins, LogFormat, ServerConfig};
use product_api::router::build_app_router;
use product_api::state::AppState;
use product_storage::{
    ImageBackend, ImageStore, ImageStoreConfig, StorageError, StoredImage,
};

/// Image name the stub store fails on, to exercise backend errors.
pub const FAILING_IMAGE: &str = "broken.jpg";

/// In-memory image store keyed by name.
#[derive(Default)]
pub struct StubImageStore {
    images: HashMap<String, StoredImage>,
}

impl StubImageStore {
    pub fn with_image(mut self, name: &str, bytes: &'static [u8], content_type: Option<&str>) -> Self {
        self.images.insert(
            name.to_string(),
            StoredImage {
                bytes: Bytes::from_static(bytes),
                content_type: content_type.map(str::to_owned),
            },
        );
        self
    }
}

#[async_trait]
impl ImageStore for StubImageStore {
    fn backend_name(&self) -> &'static str {
        "stub"
    }

    async fn fetch(&self, name: &str) -> Result<Option<StoredImage>, StorageError> {
        if name == FAILING_IMAGE {
            return Err(StorageError::Upstream {
                status: 403,
                body: "AuthorizationFailure".into(),
            });
        }
        Ok(self.images.get(name).cloned())
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        database_url: String::new(),
        app_version: "9.9.9-test".to_string(),
        cors_origins: CorsOrigins::Any,
        request_timeout_secs: 30,
        seed_on_startup: false,
        log_format: LogFormat::Pretty,
        images: ImageStoreConfig {
            backend: ImageBackend::Local,
            azure_connection_string: None,
            container: "product-images".to_string(),
            s3_bucket: None,
            s3_prefix: String::new(),
            s3_endpoint: None,
            local_dir: PathBuf::from("./images"),
        },
    }
}

/// The image fixtures every test app serves.
pub fn test_images() -> StubImageStore {
    StubImageStore::default()
        .with_image("laptop_x1.jpg", b"\xff\xd8\xff\xe0jpeg", None)
        .with_image("badge.png", b"\x89PNGpng", Some("image/png"))
        .with_image("raw.webp", b"RIFFwebp", Some("application/octet-stream"))
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

/// Same as [`build_test_app`] with a custom configuration.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        images: Arc::new(test_images()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn head(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::HEAD)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

/// Send a raw body with an arbitrary content type.
pub async fn send_raw(
    app: Router,
    method: Method,
    uri: &str,
    content_type: &str,
    body: &'static str,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}
