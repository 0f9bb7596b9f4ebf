//! Route definitions for product images.

use axum::routing::get;
use axum::Router;

use crate::handlers::image;
use crate::state::AppState;

/// ```text
/// GET    /images/{filename}    -> get_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/images/{filename}", get(image::get_image))
}
