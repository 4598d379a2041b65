//! Declarative statement configuration and facade options.

mod options;


pub use options::DbOptions;

use crate::{
    cache::StatementCacheKey,
    model::effective_tag_name,
    sql::{StatementKind, StatementShape},
    traits::Record,
};
use std::any::TypeId;

///
/// QueryConfig
///
/// Table, naming and filtering for one statement over record type `R`.
///
/// - `identifier_wrapper`: wraps every table/column identifier; empty = none
/// - `filter_column`: adds `WHERE <filter> = $1` (UPDATE/SELECT/DELETE) or
///   `RETURNING <filter>` (INSERT)
/// - `tag_name`: tag consulted for column names; empty = default tag
/// - `item`: prototype record supplying automatic INSERT/UPDATE arguments
/// - `excluded_tags`: columns left out of the statement
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryConfig<R> {
    pub table: String,
    pub identifier_wrapper: String,
    pub filter_column: String,
    pub tag_name: String,
    pub item: Option<R>,
    pub excluded_tags: Vec<String>,
}

impl<R> QueryConfig<R> {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            identifier_wrapper: String::new(),
            filter_column: String::new(),
            tag_name: String::new(),
            item: None,
            excluded_tags: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Copy-and-override derivation
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn with_table(&self, table: impl Into<String>) -> Self
    where
        R: Clone,
    {
        Self {
            table: table.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_identifier_wrapper(&self, wrapper: impl Into<String>) -> Self
    where
        R: Clone,
    {
        Self {
            identifier_wrapper: wrapper.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_filter_column(&self, column: impl Into<String>) -> Self
    where
        R: Clone,
    {
        Self {
            filter_column: column.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_tag_name(&self, tag_name: impl Into<String>) -> Self
    where
        R: Clone,
    {
        Self {
            tag_name: tag_name.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_excluded_tags<I, S>(&self, tags: I) -> Self
    where
        R: Clone,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded_tags: tags.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    /// Replace the prototype, possibly switching the record type.
    #[must_use]
    pub fn with_item<S>(&self, item: S) -> QueryConfig<S> {
        QueryConfig {
            table: self.table.clone(),
            identifier_wrapper: self.identifier_wrapper.clone(),
            filter_column: self.filter_column.clone(),
            tag_name: self.tag_name.clone(),
            item: Some(item),
            excluded_tags: self.excluded_tags.clone(),
        }
    }

    /// Same configuration for another record type, without a prototype.
    #[must_use]
    pub fn for_record<S>(&self) -> QueryConfig<S> {
        QueryConfig {
            table: self.table.clone(),
            identifier_wrapper: self.identifier_wrapper.clone(),
            filter_column: self.filter_column.clone(),
            tag_name: self.tag_name.clone(),
            item: None,
            excluded_tags: self.excluded_tags.clone(),
        }
    }

    // ---------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------

    /// Tag actually consulted: the override, or the default tag.
    #[must_use]
    pub fn effective_tag_name(&self) -> &str {
        effective_tag_name(&self.tag_name)
    }

    #[must_use]
    pub const fn has_filter(&self) -> bool {
        !self.filter_column.is_empty()
    }

    #[must_use]
    pub fn shape(&self) -> StatementShape<'_> {
        StatementShape {
            table: &self.table,
            identifier_wrapper: &self.identifier_wrapper,
            filter_column: &self.filter_column,
            excluded_tags: &self.excluded_tags,
        }
    }
}

impl<R: Record> QueryConfig<R> {
    #[must_use]
    pub fn cache_key(&self, kind: StatementKind) -> StatementCacheKey {
        StatementCacheKey::new(
            TypeId::of::<R>(),
            &self.table,
            &self.identifier_wrapper,
            &self.filter_column,
            self.effective_tag_name(),
            &self.excluded_tags,
            kind,
        )
    }
}
