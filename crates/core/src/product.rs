//! Product document rules.
//!
//! Products are open JSON objects. The service owns exactly one field,
//! `id`; everything else is stored as submitted by the store admin.

use serde_json::Value;

use crate::error::CoreError;
use crate::types::{DbId, Document};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Entity name used in not-found errors and log fields.
pub const ENTITY: &str = "Product";

/// Name of the service-owned identifier field.
pub const ID_FIELD: &str = "id";

/// Storage-internal identifier that must never reach clients.
pub const INTERNAL_ID_FIELD: &str = "_id";

/// Client-facing message for any malformed create/update body.
pub const INVALID_INPUT: &str = "Invalid input";

/// Client-facing message for unknown product ids.
pub const NOT_FOUND_MESSAGE: &str = "Product not found";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid_input() -> CoreError {
    CoreError::Validation(INVALID_INPUT.to_string())
}

/// JSONB cannot hold U+0000, so no key or string value may contain it.
fn storable(doc: &Document) -> bool {
    fn value_storable(value: &Value) -> bool {
        match value {
            Value::String(s) => !s.contains('\0'),
            Value::Array(items) => items.iter().all(value_storable),
            Value::Object(map) => storable(map),
            _ => true,
        }
    }
    doc.iter()
        .all(|(key, value)| !key.contains('\0') && value_storable(value))
}

/// Validate the body of a create request.
///
/// The body must be a non-empty JSON object. Any storage-internal field is
/// dropped; a client-supplied `id` is left in place and overwritten when
/// the product is stored.
pub fn validate_new_product(body: Value) -> Result<Document, CoreError> {
    match body {
        Value::Object(mut doc) if !doc.is_empty() && storable(&doc) => {
            doc.remove(INTERNAL_ID_FIELD);
            Ok(doc)
        }
        _ => Err(invalid_input()),
    }
}

/// Validate the body of an update request.
///
/// The body must be a non-empty JSON object carrying an integer `id`.
/// Returns the target id and the fields to merge (the `id` included, which
/// is a no-op on the stored document).
pub fn validate_update(body: Value) -> Result<(DbId, Document), CoreError> {
    let Value::Object(mut doc) = body else {
        return Err(invalid_input());
    };
    if !storable(&doc) {
        return Err(invalid_input());
    }
    let id = doc
        .get(ID_FIELD)
        .and_then(Value::as_i64)
        .ok_or_else(invalid_input)?;
    doc.remove(INTERNAL_ID_FIELD);
    Ok((id, doc))
}

/// Parse a product id taken from a URL path segment.
///
/// Only plain decimal digits are accepted, so `-1`, `+1` and `1.0` are
/// treated as unknown routes rather than ids.
pub fn parse_product_id(raw: &str) -> Option<DbId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Read the integer `id` of a document, if present.
pub fn product_id_of(doc: &Value) -> Option<DbId> {
    doc.get(ID_FIELD).and_then(Value::as_i64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
