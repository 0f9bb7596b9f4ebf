//! Domain layer for the product service.
//!
//! Holds the error type, shared type aliases, product document rules,
//! the seed catalogue and image naming rules. No I/O happens here.

pub mod error;
pub mod images;
pub mod product;
pub mod seed;
pub mod types;
