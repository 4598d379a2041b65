//! ## Crate layout
//! - `model`: record schemas and the per-tag type descriptors built from them.
//! - `sql`: INSERT/UPDATE/SELECT/DELETE text synthesis.
//! - `cache`: descriptor and statement caches.
//! - `db`: the `Db` facade, the execution backend seam, and row materialization.
//! - `config`: per-statement `QueryConfig` and facade-wide `DbOptions`.
//! - `traits`, `value`, `error`: the record vocabulary shared by all of the above.
//!
//! `#[derive(Record)]` generates code against these paths, so they are
//! re-exported here unchanged.

pub use rowbind_core as core;
pub use rowbind_core::{
    DEFAULT_TAG_NAME, cache, config, db, error, model, params, sql, traits, value,
};

// `Record` names both the trait and its derive, as with serde.
pub use rowbind_derive::Record;
pub use traits::Record;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Errors
//

pub use error::Error;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        Record,
        config::{DbOptions, QueryConfig},
        db::{Db, ExecContext, ExecutionBackend as _},
        error::Error,
        params,
        traits::{Element as _, FieldValue},
        value::Value,
    };
}
