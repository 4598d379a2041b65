use crate::{
    error::{ExecutionError, ScanError},
    traits::ScanTarget,
    value::Value,
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

///
/// ExecContext
///
/// Deadline and cancellation carrier handed to the execution backend.
/// The core never inspects it; honouring it is the backend's job.
///

#[derive(Clone, Debug, Default)]
pub struct ExecContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl ExecContext {
    /// A context that never expires and is never cancelled.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A timeout too large to represent as an instant never expires.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
            cancelled: Arc::default(),
        }
    }

    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancelled: Arc::default(),
        }
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel this context and every clone of it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.is_expired()
    }
}

///
/// RowCursor
///
/// Successive result rows of one query.
///
/// `scan` stores the current row's columns, in order, into `targets`.
/// `finish` reports any error deferred while advancing.
///

pub trait RowCursor {
    fn advance(&mut self) -> bool;

    fn scan(&mut self, targets: &mut [&mut dyn ScanTarget]) -> Result<(), ScanError>;

    fn finish(&mut self) -> Result<(), ExecutionError> {
        Ok(())
    }
}

///
/// ExecutionBackend
///
/// Issues SQL against a database. Context-free forms run under
/// [`ExecContext::background`].
///

pub trait ExecutionBackend: Send + Sync {
    fn query_with_context(
        &self,
        ctx: &ExecContext,
        sql: &str,
        args: &[Value],
    ) -> Result<Box<dyn RowCursor + '_>, ExecutionError>;

    fn query_returning_id_with_context(
        &self,
        ctx: &ExecContext,
        sql: &str,
        args: &[Value],
    ) -> Result<i64, ExecutionError>;

    fn exec_with_context(
        &self,
        ctx: &ExecContext,
        sql: &str,
        args: &[Value],
    ) -> Result<u64, ExecutionError>;

    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> Result<Box<dyn RowCursor + '_>, ExecutionError> {
        self.query_with_context(&ExecContext::background(), sql, args)
    }

    fn query_returning_id(&self, sql: &str, args: &[Value]) -> Result<i64, ExecutionError> {
        self.query_returning_id_with_context(&ExecContext::background(), sql, args)
    }

    fn exec(&self, sql: &str, args: &[Value]) -> Result<u64, ExecutionError> {
        self.exec_with_context(&ExecContext::background(), sql, args)
    }
}

///
/// VecCursor
///
/// Cursor over rows already held in memory.
///

#[derive(Clone, Debug, Default)]
pub struct VecCursor {
    rows: std::vec::IntoIter<Vec<Value>>,
    current: Option<Vec<Value>>,
}

impl VecCursor {
    #[must_use]
    pub fn new(rows: Vec<Vec<Value>>) -> Self {
        Self {
            rows: rows.into_iter(),
            current: None,
        }
    }
}

impl RowCursor for VecCursor {
    fn advance(&mut self) -> bool {
        self.current = self.rows.next();
        self.current.is_some()
    }

    fn scan(&mut self, targets: &mut [&mut dyn ScanTarget]) -> Result<(), ScanError> {
        let row = self
            .current
            .take()
            .ok_or_else(|| ScanError::cursor("scan called without a current row"))?;

        if row.len() != targets.len() {
            return Err(ScanError::ArityMismatch {
                expected: targets.len(),
                found: row.len(),
            });
        }

        for (index, (target, value)) in targets.iter_mut().zip(row).enumerate() {
            target.scan_value(index, value)?;
        }

        Ok(())
    }
}
