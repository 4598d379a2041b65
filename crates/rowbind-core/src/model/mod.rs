//! Record schemas (registration time) and the type descriptors derived
//! from them for one tag name.

pub mod descriptor;
pub mod schema;


pub use descriptor::{FieldDescriptor, TypeDescriptor};
pub use schema::{FieldKind, FieldSchema, RecordSchema};

use crate::DEFAULT_TAG_NAME;

/// Resolve an override tag name, falling back to the default tag.
#[must_use]
pub fn effective_tag_name(tag_name: &str) -> &str {
    if tag_name.is_empty() {
        DEFAULT_TAG_NAME
    } else {
        tag_name
    }
}
