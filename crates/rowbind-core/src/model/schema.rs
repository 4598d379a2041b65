use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

///
/// RecordSchema
/// Registration-time description of one record type.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RecordSchema {
    /// Stable type name (for cache diagnostics and errors).
    pub path: String,
    /// Every declared field, in declaration order.
    pub fields: Vec<FieldSchema>,
}

impl RecordSchema {
    #[must_use]
    pub const fn new(path: String, fields: Vec<FieldSchema>) -> Self {
        Self { path, fields }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Reject schemas that cannot describe a struct: an empty path, or
    /// missing / duplicated field names.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidSchema {
            path: self.path.clone(),
            reason,
        };

        if self.path.is_empty() {
            return Err(invalid("record path is empty".to_string()));
        }

        let mut seen = BTreeSet::new();
        for (index, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(invalid(format!("field {index} has no name")));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(invalid(format!("field '{}' is declared twice", field.name)));
            }
        }

        Ok(())
    }
}

///
/// FieldSchema
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldSchema {
    pub name: String,

    /// Declared type as written in source.
    #[serde(default)]
    pub ty: String,

    pub kind: FieldKind,

    /// Whether the field is visible outside its module (`pub`).
    #[serde(default = "exported_default")]
    pub exported: bool,

    /// Tag name → tag value (column name).
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

const fn exported_default() -> bool {
    true
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            kind,
            exported: true,
            tags: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag_name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(tag_name.into(), value.into());
        self
    }

    #[must_use]
    pub const fn private(mut self) -> Self {
        self.exported = false;
        self
    }

    /// Tag value for `tag_name`; empty when the tag is absent.
    #[must_use]
    pub fn tag(&self, tag_name: &str) -> &str {
        self.tags.get(tag_name).map_or("", String::as_str)
    }
}

///
/// FieldKind
///
/// Scan-relevant shape of a field type.
/// `Optional` models one level of indirection (`Option<T>`).
/// `Box<T>` and `Arc<T>` take the kind of `T`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Blob,
    Bool,
    Float32,
    Float64,
    Int,
    Text,
    Uint,

    /// A type implementing `FieldValue`.
    Custom,

    Optional(Box<Self>),

    /// Marker for fields that can never be bound to a column.
    Unsupported,
}

impl FieldKind {
    /// An optional field is scannable only over a directly scannable inner kind.
    #[must_use]
    pub fn is_scannable(&self) -> bool {
        match self {
            Self::Optional(inner) => inner.is_direct(),
            kind => kind.is_direct(),
        }
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    const fn is_direct(&self) -> bool {
        !matches!(self, Self::Optional(_) | Self::Unsupported)
    }
}
