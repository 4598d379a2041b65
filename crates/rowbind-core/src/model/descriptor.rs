use crate::{
    error::ConfigurationError,
    model::{FieldKind, RecordSchema},
};
use serde::Serialize;

///
/// TypeDescriptor
///
/// Persisted fields of one record type under one tag name.
/// Field order is declaration order; placeholder numbering depends on it.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TypeDescriptor {
    record: String,
    tag_name: String,
    fields: Vec<FieldDescriptor>,
}

///
/// FieldDescriptor
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Declaration index within the record.
    pub index: usize,
    pub name: String,
    pub ty: String,
    pub kind: FieldKind,
    /// Persisted column name (the tag value).
    pub column: String,
}

impl TypeDescriptor {
    /// Walk the schema in declaration order and keep the fields that are
    /// exported, tagged under `tag_name`, not excluded, and scannable.
    pub fn build(
        schema: &RecordSchema,
        tag_name: &str,
        excluded: &[String],
    ) -> Result<Self, ConfigurationError> {
        schema.validate()?;

        let fields = schema
            .fields
            .iter()
            .enumerate()
            .filter_map(|(index, field)| {
                let column = field.tag(tag_name);

                let keep = field.exported
                    && !column.is_empty()
                    && !excluded.iter().any(|tag| tag == column)
                    && field.kind.is_scannable();

                keep.then(|| FieldDescriptor {
                    index,
                    name: field.name.clone(),
                    ty: field.ty.clone(),
                    kind: field.kind.clone(),
                    column: column.to_string(),
                })
            })
            .collect();

        Ok(Self {
            record: schema.path.clone(),
            tag_name: tag_name.to_string(),
            fields,
        })
    }

    #[must_use]
    pub fn record(&self) -> &str {
        &self.record
    }

    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields whose column is not in `excluded`, in declaration order.
    pub fn fields_excluding<'a>(
        &'a self,
        excluded: &'a [String],
    ) -> impl Iterator<Item = &'a FieldDescriptor> + 'a {
        self.fields
            .iter()
            .filter(move |f| !excluded.iter().any(|tag| *tag == f.column))
    }

    /// Declaration indices of the fields not in `excluded`.
    #[must_use]
    pub fn indices_excluding(&self, excluded: &[String]) -> Vec<usize> {
        self.fields_excluding(excluded).map(|f| f.index).collect()
    }

    #[must_use]
    pub fn field_by_column(&self, column: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.column == column)
    }
}
