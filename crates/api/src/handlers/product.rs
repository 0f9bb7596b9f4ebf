//! Handlers for the product catalogue.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use product_core::error::CoreError;
use product_core::product::{
    parse_product_id, validate_new_product, validate_update, ENTITY, INVALID_INPUT,
    NOT_FOUND_MESSAGE,
};
use product_core::types::DbId;
use product_db::repositories::ProductRepo;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Unwrap a JSON body, mapping every rejection (missing content type,
/// syntax error, empty body) to the same client-facing message.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> AppResult<Value> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected product body");
        AppError::BadRequest(INVALID_INPUT.to_string())
    })
}

fn product_id(raw: &str) -> AppResult<DbId> {
    parse_product_id(raw).ok_or(AppError::NotFound(NOT_FOUND_MESSAGE))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

/// GET /
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Value>>> {
    let rows = ProductRepo::list(&state.pool).await?;
    Ok(Json(rows.into_iter().map(|row| row.into_document()).collect()))
}

/// GET /{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = product_id(&raw_id)?;
    let row = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(row.into_document()))
}

/// POST /
///
/// Assigns the next id (highest existing id plus one). A client-supplied
/// `id` is ignored.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let doc = validate_new_product(json_body(body)?)?;
    let row = ProductRepo::create(&state.pool, &doc).await?;
    tracing::info!(product_id = row.id, "Product created");
    Ok(Json(row.into_document()))
}

/// PUT /
///
/// Merges the body's top-level fields into the product named by its `id`.
pub async fn update(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let (id, patch) = validate_update(json_body(body)?)?;
    let row = ProductRepo::merge_update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(product_id = id, fields = patch.len(), "Product updated");
    Ok(Json(row.into_document()))
}

/// DELETE /{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = product_id(&raw_id)?;
    if ProductRepo::delete(&state.pool, id).await? {
        tracing::info!(product_id = id, "Product deleted");
        Ok(StatusCode::OK)
    } else {
        Err(not_found(id))
    }
}
