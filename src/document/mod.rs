//! Document module.
//!
//! Documents and type mappings produced by the document mapper of each
//! record kind.

#[allow(clippy::module_inception)]
pub mod document;
pub mod field_value;
pub mod mapping;

// Re-export commonly used types
pub use document::{Document, DocumentBuilder};
pub use field_value::FieldValue;
pub use mapping::{FieldMapping, TypeMapping};
