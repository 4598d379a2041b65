//! JSON statement files: a record schema plus the statement configuration
//! to synthesize SQL for it.

#[cfg(test)]
mod tests;

use rowbind_core::{
    error::ConfigurationError,
    model::{RecordSchema, TypeDescriptor, effective_tag_name},
    sql::{self, StatementKind, StatementShape},
};
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error as ThisError;

///
/// StatementError
///

#[derive(Debug, ThisError)]
pub enum StatementError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("failed to render descriptor: {0}")]
    Render(#[from] serde_json::Error),
}

///
/// StatementFile
///
/// Every field except `record` may be omitted; command-line flags
/// override what the file sets.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StatementFile {
    #[serde(default)]
    pub table: String,

    #[serde(default)]
    pub wrapper: String,

    #[serde(default)]
    pub filter: String,

    #[serde(default)]
    pub tag: String,

    #[serde(default)]
    pub excluded: Vec<String>,

    pub record: RecordSchema,
}

///
/// Overrides
///

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub table: Option<String>,
    pub wrapper: Option<String>,
    pub filter: Option<String>,
    pub tag: Option<String>,
    pub excluded: Vec<String>,
}

impl StatementFile {
    pub fn load(path: &Path) -> Result<Self, StatementError> {
        let display = path.display().to_string();

        let text = fs::read_to_string(path).map_err(|source| StatementError::Read {
            path: display.clone(),
            source,
        })?;

        Self::parse(&text).map_err(|source| StatementError::Parse {
            path: display,
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    #[must_use]
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(table) = overrides.table {
            self.table = table;
        }
        if let Some(wrapper) = overrides.wrapper {
            self.wrapper = wrapper;
        }
        if let Some(filter) = overrides.filter {
            self.filter = filter;
        }
        if let Some(tag) = overrides.tag {
            self.tag = tag;
        }
        if !overrides.excluded.is_empty() {
            self.excluded = overrides.excluded;
        }

        self
    }

    #[must_use]
    pub fn tag_name(&self) -> &str {
        effective_tag_name(&self.tag)
    }

    pub fn descriptor(&self) -> Result<TypeDescriptor, StatementError> {
        Ok(TypeDescriptor::build(&self.record, self.tag_name(), &[])?)
    }

    fn shape(&self) -> StatementShape<'_> {
        StatementShape {
            table: &self.table,
            identifier_wrapper: &self.wrapper,
            filter_column: &self.filter,
            excluded_tags: &self.excluded,
        }
    }

    /// SQL text for each requested kind, in the order given.
    pub fn render(
        &self,
        kinds: &[StatementKind],
    ) -> Result<Vec<(StatementKind, String)>, StatementError> {
        let descriptor = self.descriptor()?;
        let shape = self.shape();

        tracing::debug!(
            record = descriptor.record(),
            tag = descriptor.tag_name(),
            fields = descriptor.len(),
            "rendering statements"
        );

        Ok(kinds
            .iter()
            .map(|&kind| (kind, sql::statement(kind, &shape, &descriptor)))
            .collect())
    }

    pub fn describe(&self) -> Result<String, StatementError> {
        Ok(serde_json::to_string_pretty(&self.descriptor()?)?)
    }
}
