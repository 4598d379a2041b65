use crate::sql::StatementKind;
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Failure returned by every facade operation.
/// The variant identifies which of the four failure kinds occurred.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("result cardinality error: {0}")]
    Cardinality(#[from] ResultCardinalityError),

    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("scan error: {0}")]
    Scan(#[from] ScanError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Configuration(_) => ErrorClass::Configuration,
            Self::Cardinality(_) => ErrorClass::Cardinality,
            Self::Execution(_) => ErrorClass::Execution,
            Self::Scan(_) => ErrorClass::Scan,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ConfigurationError
///
/// The record type or query configuration cannot be used as given.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigurationError {
    #[error("record schema '{path}' is invalid: {reason}")]
    InvalidSchema { path: String, reason: String },

    #[error(
        "element type '{element}' nests {depth} levels of indirection; at most one is supported"
    )]
    NestedIndirection { element: &'static str, depth: usize },

    #[error("{kind} requires a filter column")]
    MissingFilterColumn { kind: StatementKind },

    #[error("record '{record}' has no persisted field tagged '{column}' for tag '{tag}'")]
    FilterFieldNotFound {
        record: String,
        column: String,
        tag: String,
    },
}

///
/// ResultCardinalityError
///
/// A single-record read matched zero or several rows.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ResultCardinalityError {
    #[error("empty")]
    Empty,

    #[error("ambiguous ({count} rows)")]
    Ambiguous { count: usize },
}

///
/// ExecutionError
///
/// Opaque failure raised by the execution backend.
/// The core never inspects or rewrites it.
///

#[derive(Debug, ThisError)]
#[error(transparent)]
pub struct ExecutionError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl ExecutionError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self(source.into())
    }

    #[must_use]
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.0
    }

    #[must_use]
    pub fn source_ref(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

///
/// ScanError
///
/// A result row could not be bound into the target record.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ScanError {
    #[error("row has {found} columns but {expected} targets were bound")]
    ArityMismatch { expected: usize, found: usize },

    #[error("column {index}: cannot store {found} value in {expected} target")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{message}")]
    Cursor { message: String },
}

impl ScanError {
    pub fn cursor(message: impl Into<String>) -> Self {
        Self::Cursor {
            message: message.into(),
        }
    }
}

///
/// ErrorClass
/// Coarse classification of an [`Error`] for callers and logs.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Cardinality,
    Execution,
    Scan,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Cardinality => "cardinality",
            Self::Execution => "execution",
            Self::Scan => "scan",
        };
        write!(f, "{label}")
    }
}
