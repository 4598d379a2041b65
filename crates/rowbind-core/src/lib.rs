//! Core runtime for rowbind: record traits, values, the schema/descriptor
//! model, SQL synthesis, caches, row materialization, and the `Db` facade.
#![warn(unreachable_pub)]

extern crate self as rowbind;

#[macro_use]
mod macros;

// public exports are one module level down
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod sql;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Tag name consulted when a configuration does not override it.
pub const DEFAULT_TAG_NAME: &str = "dbcn";

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No caches, synthesizers, or backends are re-exported here.
///

pub mod prelude {
    pub use crate::{
        config::QueryConfig,
        db::{Db, ExecContext},
        error::Error,
        traits::{Element, FieldValue, Record},
        value::Value,
    };
}
