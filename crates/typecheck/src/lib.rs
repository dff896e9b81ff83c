//! Type-tag validation for learned request schemas.
//!
//! This crate provides:
//! - The closed set of supported type tags and their name lookup
//! - Scalar validators (`Int`, `Boolean`, `String`, `Date`, `Email`, `UUID`, `Auth-Token`)
//! - The iterative validator for the bracketed `List` grammar
//!
//! Every validator works on the string rendering of a value and never panics:
//! unknown tags and malformed input simply fail validation.

pub mod list;
pub mod primitives;
pub mod registry;

pub use list::validate_list;
pub use registry::{is_supported, validate, validate_any, TypeTag};
