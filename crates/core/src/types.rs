/// Product ids are PostgreSQL BIGINT.
pub type DbId = i64;

/// A product document: an open JSON object keyed by field name.
pub type Document = serde_json::Map<String, serde_json::Value>;
