//! In-memory execution backend that replays scripted responses.
//!
//! Used by tests and by hosts that want to exercise the facade without a
//! database. Responses are consumed in FIFO order, one per call.

use crate::{
    db::backend::{ExecContext, ExecutionBackend, RowCursor, VecCursor},
    error::{ExecutionError, ScanError},
    traits::ScanTarget,
    value::Value,
};
use std::{
    collections::VecDeque,
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};
use thiserror::Error as ThisError;

///
/// CallKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CallKind {
    Query,
    QueryReturningId,
    Exec,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Query => "query",
            Self::QueryReturningId => "query_returning_id",
            Self::Exec => "exec",
        };
        write!(f, "{label}")
    }
}

///
/// RecordedCall
///
/// One statement issued against the backend, as received.
///

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub sql: String,
    pub args: Vec<Value>,
}

///
/// ScriptedResponse
///

#[derive(Clone, Debug, PartialEq)]
pub enum ScriptedResponse {
    Rows(Vec<Vec<Value>>),

    /// Rows followed by an error the cursor reports from `finish`.
    RowsThenFail(Vec<Vec<Value>>, String),

    Id(i64),
    Count(u64),
    Fail(String),
}

impl ScriptedResponse {
    const fn label(&self) -> &'static str {
        match self {
            Self::Rows(_) | Self::RowsThenFail(..) => "rows",
            Self::Id(_) => "id",
            Self::Count(_) => "count",
            Self::Fail(_) => "failure",
        }
    }
}

///
/// ScriptedError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ScriptedError {
    #[error("context cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error("{call} received a scripted {found} response")]
    UnexpectedResponse { call: CallKind, found: &'static str },

    #[error("no scripted response left for {call}")]
    Exhausted { call: CallKind },

    #[error("{0}")]
    Injected(String),
}

///
/// ScriptedBackend
///
/// Queries with nothing scripted return no rows and execs report zero
/// affected rows; an id-returning query with nothing scripted fails.
///

#[derive(Debug, Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: ScriptedResponse) -> &Self {
        lock(&self.responses).push_back(response);
        self
    }

    pub fn push_rows(&self, rows: Vec<Vec<Value>>) -> &Self {
        self.push(ScriptedResponse::Rows(rows))
    }

    pub fn push_id(&self, id: i64) -> &Self {
        self.push(ScriptedResponse::Id(id))
    }

    pub fn push_count(&self, count: u64) -> &Self {
        self.push(ScriptedResponse::Count(count))
    }

    pub fn push_failure(&self, message: impl Into<String>) -> &Self {
        self.push(ScriptedResponse::Fail(message.into()))
    }

    /// Every statement issued so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    #[must_use]
    pub fn last_call(&self) -> Option<RecordedCall> {
        lock(&self.calls).last().cloned()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        lock(&self.responses).len()
    }

    fn begin(
        &self,
        kind: CallKind,
        ctx: &ExecContext,
        sql: &str,
        args: &[Value],
    ) -> Result<Option<ScriptedResponse>, ExecutionError> {
        if ctx.is_cancelled() {
            return Err(ExecutionError::new(ScriptedError::Cancelled));
        }
        if ctx.is_expired() {
            return Err(ExecutionError::new(ScriptedError::DeadlineExceeded));
        }

        lock(&self.calls).push(RecordedCall {
            kind,
            sql: sql.to_string(),
            args: args.to_vec(),
        });

        match lock(&self.responses).pop_front() {
            Some(ScriptedResponse::Fail(message)) => {
                Err(ExecutionError::new(ScriptedError::Injected(message)))
            }
            other => Ok(other),
        }
    }
}

fn unexpected(call: CallKind, found: &ScriptedResponse) -> ExecutionError {
    ExecutionError::new(ScriptedError::UnexpectedResponse {
        call,
        found: found.label(),
    })
}

impl ExecutionBackend for ScriptedBackend {
    fn query_with_context(
        &self,
        ctx: &ExecContext,
        sql: &str,
        args: &[Value],
    ) -> Result<Box<dyn RowCursor + '_>, ExecutionError> {
        let cursor = match self.begin(CallKind::Query, ctx, sql, args)? {
            None => ScriptedCursor::new(Vec::new(), None),
            Some(ScriptedResponse::Rows(rows)) => ScriptedCursor::new(rows, None),
            Some(ScriptedResponse::RowsThenFail(rows, message)) => {
                ScriptedCursor::new(rows, Some(message))
            }
            Some(other) => return Err(unexpected(CallKind::Query, &other)),
        };

        Ok(Box::new(cursor))
    }

    fn query_returning_id_with_context(
        &self,
        ctx: &ExecContext,
        sql: &str,
        args: &[Value],
    ) -> Result<i64, ExecutionError> {
        let call = CallKind::QueryReturningId;

        match self.begin(call, ctx, sql, args)? {
            Some(ScriptedResponse::Id(id)) => Ok(id),
            Some(other) => Err(unexpected(call, &other)),
            None => Err(ExecutionError::new(ScriptedError::Exhausted { call })),
        }
    }

    fn exec_with_context(
        &self,
        ctx: &ExecContext,
        sql: &str,
        args: &[Value],
    ) -> Result<u64, ExecutionError> {
        match self.begin(CallKind::Exec, ctx, sql, args)? {
            Some(ScriptedResponse::Count(count)) => Ok(count),
            None => Ok(0),
            Some(other) => Err(unexpected(CallKind::Exec, &other)),
        }
    }
}

///
/// ScriptedCursor
///

struct ScriptedCursor {
    rows: VecCursor,
    deferred: Option<String>,
}

impl ScriptedCursor {
    fn new(rows: Vec<Vec<Value>>, deferred: Option<String>) -> Self {
        Self {
            rows: VecCursor::new(rows),
            deferred,
        }
    }
}

impl RowCursor for ScriptedCursor {
    fn advance(&mut self) -> bool {
        self.rows.advance()
    }

    fn scan(&mut self, targets: &mut [&mut dyn ScanTarget]) -> Result<(), ScanError> {
        self.rows.scan(targets)
    }

    fn finish(&mut self) -> Result<(), ExecutionError> {
        match self.deferred.take() {
            Some(message) => Err(ExecutionError::new(ScriptedError::Injected(message))),
            None => Ok(()),
        }
    }
}
