//! Route definitions for the product catalogue.
//!
//! Products live at the service root: the store front reads them and the
//! store admin manages them.

use axum::routing::get;
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// PUT    /        -> update (id in body)
/// GET    /{id}    -> get_by_id
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(product::list).post(product::create).put(product::update),
        )
        .route("/{id}", get(product::get_by_id).delete(product::delete))
}
