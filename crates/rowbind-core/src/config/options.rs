use serde::Deserialize;

///
/// DbOptions
///
/// Facade-wide switches; deserializable so hosts can load them from their
/// own configuration files.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DbOptions {
    /// Identifier reported in logs.
    pub id: String,

    /// Reuse synthesized SQL text across calls.
    pub use_cached_sql: bool,

    /// Derive INSERT/UPDATE arguments from the configuration's prototype
    /// when none are given. Off = start with the descriptor cache detached.
    pub derive_arguments: bool,
}

impl Default for DbOptions {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            use_cached_sql: true,
            derive_arguments: true,
        }
    }
}
