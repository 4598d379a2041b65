//! SQL text synthesis for the four statement kinds.
//!
//! Output is a pure function of the statement shape and the descriptor;
//! caching in [`crate::cache::QueryCache`] relies on that.

#[cfg(test)]
mod tests;

use crate::model::TypeDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

///
/// StatementKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Insert,
    Update,
    Select,
    Delete,
}

impl StatementKind {
    pub const ALL: [Self; 4] = [Self::Insert, Self::Update, Self::Select, Self::Delete];
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Select => "SELECT",
            Self::Delete => "DELETE",
        };
        write!(f, "{label}")
    }
}

///
/// StatementShape
///
/// The type-independent part of a query configuration.
/// `filter_column` drives WHERE, and RETURNING for INSERT.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StatementShape<'a> {
    pub table: &'a str,
    pub identifier_wrapper: &'a str,
    pub filter_column: &'a str,
    pub excluded_tags: &'a [String],
}

impl StatementShape<'_> {
    fn ident(&self, name: &str) -> String {
        wrap_identifier(name, self.identifier_wrapper)
    }

    const fn has_filter(&self) -> bool {
        !self.filter_column.is_empty()
    }

    fn push_where(&self, sql: &mut String) {
        if self.has_filter() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.ident(self.filter_column));
            sql.push_str(" = ");
            sql.push_str(&placeholder(1));
        }
    }

    fn capacity_hint(&self, descriptor: &TypeDescriptor) -> usize {
        const FIXED: usize = 40;
        let per_column = 6 + 2 * self.identifier_wrapper.len();

        FIXED
            + self.table.len()
            + self.filter_column.len()
            + descriptor
                .fields()
                .iter()
                .map(|f| f.column.len() + per_column)
                .sum::<usize>()
    }
}

/// Positional parameter marker for 1-based position `n`.
#[must_use]
pub fn placeholder(n: usize) -> String {
    format!("${n}")
}

/// Surround an identifier with `wrapper`; embedded wrapper characters are
/// not escaped.
#[must_use]
pub fn wrap_identifier(name: &str, wrapper: &str) -> String {
    if wrapper.is_empty() {
        name.to_string()
    } else {
        format!("{wrapper}{name}{wrapper}")
    }
}

/// Synthesize the statement of `kind`.
#[must_use]
pub fn statement(
    kind: StatementKind,
    shape: &StatementShape<'_>,
    descriptor: &TypeDescriptor,
) -> String {
    match kind {
        StatementKind::Insert => insert(shape, descriptor),
        StatementKind::Update => update(shape, descriptor),
        StatementKind::Select => select(shape, descriptor),
        StatementKind::Delete => delete(shape),
    }
}

/// `INSERT INTO t (c1, c2) VALUES ($1,$2) [RETURNING filter]`
#[must_use]
pub fn insert(shape: &StatementShape<'_>, descriptor: &TypeDescriptor) -> String {
    let mut sql = String::with_capacity(shape.capacity_hint(descriptor));

    sql.push_str("INSERT INTO ");
    sql.push_str(&shape.ident(shape.table));
    sql.push_str(" (");

    let mut count = 0;
    for field in descriptor.fields_excluding(shape.excluded_tags) {
        if count > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&shape.ident(&field.column));
        count += 1;
    }

    sql.push_str(") VALUES (");
    for n in 1..=count {
        if n > 1 {
            sql.push(',');
        }
        sql.push_str(&placeholder(n));
    }
    sql.push(')');

    if shape.has_filter() {
        sql.push_str(" RETURNING ");
        sql.push_str(&shape.ident(shape.filter_column));
    }

    sql
}

/// `UPDATE t SET c1 = $2, c2 = $3 [WHERE filter = $1]`
///
/// With a filter column `$1` is reserved for the filter argument, which
/// callers pass first.
#[must_use]
pub fn update(shape: &StatementShape<'_>, descriptor: &TypeDescriptor) -> String {
    let mut sql = String::with_capacity(shape.capacity_hint(descriptor));
    let first = if shape.has_filter() { 2 } else { 1 };

    sql.push_str("UPDATE ");
    sql.push_str(&shape.ident(shape.table));
    sql.push_str(" SET ");

    for (offset, field) in descriptor.fields_excluding(shape.excluded_tags).enumerate() {
        if offset > 0 {
            sql.push_str(", ");
        }
        let _ = write!(
            sql,
            "{} = {}",
            shape.ident(&field.column),
            placeholder(first + offset)
        );
    }

    shape.push_where(&mut sql);

    sql
}

/// `SELECT c1, c2 FROM t [WHERE filter = $1]`
#[must_use]
pub fn select(shape: &StatementShape<'_>, descriptor: &TypeDescriptor) -> String {
    let mut sql = String::with_capacity(shape.capacity_hint(descriptor));

    sql.push_str("SELECT ");

    for (offset, field) in descriptor.fields_excluding(shape.excluded_tags).enumerate() {
        if offset > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&shape.ident(&field.column));
    }

    sql.push_str(" FROM ");
    sql.push_str(&shape.ident(shape.table));
    shape.push_where(&mut sql);

    sql
}

/// `DELETE FROM t [WHERE filter = $1]`
#[must_use]
pub fn delete(shape: &StatementShape<'_>) -> String {
    let mut sql = String::from("DELETE FROM ");

    sql.push_str(&shape.ident(shape.table));
    shape.push_where(&mut sql);

    sql
}
