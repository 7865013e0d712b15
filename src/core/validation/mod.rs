//! Validation and coercion of submitted forms
//!
//! Schemas are declared once from small filter and validator functions and
//! return a discriminated result: typed input on success, every field
//! message on failure. Nothing here raises.

pub mod filters;
pub mod schema;
pub mod validators;

pub use schema::{FieldRule, FormSchema, InvoiceSchema};
