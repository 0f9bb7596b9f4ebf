pub mod health;
pub mod images;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the full route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                 service health (GET, HEAD)
/// /images/{filename}      product image bytes
/// /                       list, create, update products
/// /{id}                   get, delete product
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(images::router())
        .merge(products::router())
}
