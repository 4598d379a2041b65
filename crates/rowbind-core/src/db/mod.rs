//! The record facade: declarative CRUD over a pluggable execution backend.

mod args;
mod backend;
mod materialize;
pub mod scripted;


pub use backend::{ExecContext, ExecutionBackend, RowCursor, VecCursor};
pub use materialize::{RowMaterializer, check_indirection};
pub use scripted::ScriptedBackend;

use args::derive_arguments;

use crate::{
    cache::{DescriptorCache, QueryCache},
    config::{DbOptions, QueryConfig},
    error::{ConfigurationError, Error, ResultCardinalityError},
    sql::{self, StatementKind},
    traits::{Element, Record},
    value::Value,
};
use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicBool, Ordering},
};

///
/// Db
///
/// Entry point for Select/Get/Insert/Update/Delete.
///
/// Statement text comes from the query cache unless caching is switched
/// off. Every call captures the current backend once, so a concurrent
/// [`Db::set_backend`] never splits a call across two backends.
///

pub struct Db {
    id: String,
    backend: RwLock<Arc<dyn ExecutionBackend>>,
    descriptors: RwLock<Option<Arc<DescriptorCache>>>,
    materializer: RowMaterializer,
    queries: Arc<QueryCache>,
    use_cached_sql: AtomicBool,
}

impl Db {
    #[must_use]
    pub fn new(backend: Arc<dyn ExecutionBackend>) -> Self {
        Self::with_options(backend, DbOptions::default())
    }

    #[must_use]
    pub fn with_options(backend: Arc<dyn ExecutionBackend>, options: DbOptions) -> Self {
        Self::with_caches(
            backend,
            options,
            Arc::new(DescriptorCache::new()),
            Arc::new(QueryCache::new()),
        )
    }

    /// Build a facade over caches shared with other facades.
    #[must_use]
    pub fn with_caches(
        backend: Arc<dyn ExecutionBackend>,
        options: DbOptions,
        descriptors: Arc<DescriptorCache>,
        queries: Arc<QueryCache>,
    ) -> Self {
        let attached = options.derive_arguments.then(|| Arc::clone(&descriptors));

        Self {
            id: options.id,
            backend: RwLock::new(backend),
            descriptors: RwLock::new(attached),
            materializer: RowMaterializer::new(descriptors),
            queries,
            use_cached_sql: AtomicBool::new(options.use_cached_sql),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    // ---------------------------------------------------------------------
    // Runtime switches
    // ---------------------------------------------------------------------

    /// Swap the execution backend. Calls already in flight finish on the
    /// backend they started with.
    pub fn set_backend(&self, backend: Arc<dyn ExecutionBackend>) {
        *self
            .backend
            .write()
            .unwrap_or_else(PoisonError::into_inner) = backend;

        tracing::debug!(db = %self.id, "execution backend replaced");
    }

    /// Attach or detach the descriptor cache used for automatic arguments.
    /// Detaching turns automatic INSERT/UPDATE arguments off.
    pub fn set_descriptor_cache(&self, cache: Option<Arc<DescriptorCache>>) {
        *self
            .descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner) = cache;
    }

    #[must_use]
    pub fn descriptor_cache(&self) -> Option<Arc<DescriptorCache>> {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Toggle reuse of synthesized SQL. Off = synthesize on every call.
    pub fn use_cached_sql(&self, enabled: bool) {
        self.use_cached_sql.store(enabled, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_using_cached_sql(&self) -> bool {
        self.use_cached_sql.load(Ordering::SeqCst)
    }

    #[must_use]
    pub const fn query_cache(&self) -> &Arc<QueryCache> {
        &self.queries
    }

    // ---------------------------------------------------------------------
    // Select / Get
    // ---------------------------------------------------------------------

    pub fn select<E: Element>(
        &self,
        config: &QueryConfig<E::Record>,
        dest: &mut Vec<E>,
        args: &[Value],
    ) -> Result<usize, Error> {
        self.select_with_context(&ExecContext::background(), config, dest, args)
    }

    /// Replace `dest` with the rows matching the synthesized SELECT.
    pub fn select_with_context<E: Element>(
        &self,
        ctx: &ExecContext,
        config: &QueryConfig<E::Record>,
        dest: &mut Vec<E>,
        args: &[Value],
    ) -> Result<usize, Error> {
        check_indirection::<E>()?;
        let sql = self.statement_text(StatementKind::Select, config)?;

        self.select_sql_with_context(ctx, &sql, config, dest, args)
    }

    pub fn select_sql<E: Element>(
        &self,
        sql: &str,
        config: &QueryConfig<E::Record>,
        dest: &mut Vec<E>,
        args: &[Value],
    ) -> Result<usize, Error> {
        self.select_sql_with_context(&ExecContext::background(), sql, config, dest, args)
    }

    /// Run caller-written SQL and materialize its rows.
    ///
    /// Result columns must line up with the record's persisted fields
    /// (under the configuration's tag, minus its exclusions).
    pub fn select_sql_with_context<E: Element>(
        &self,
        ctx: &ExecContext,
        sql: &str,
        config: &QueryConfig<E::Record>,
        dest: &mut Vec<E>,
        args: &[Value],
    ) -> Result<usize, Error> {
        check_indirection::<E>()?;

        let backend = self.backend();
        tracing::debug!(db = %self.id, sql, args = args.len(), "select");

        let mut cursor = backend.query_with_context(ctx, sql, args)?;

        self.materializer.materialize(
            cursor.as_mut(),
            config.effective_tag_name(),
            &config.excluded_tags,
            dest,
        )
    }

    pub fn get<R>(
        &self,
        config: &QueryConfig<R>,
        dest: &mut R,
        args: &[Value],
    ) -> Result<(), Error>
    where
        R: Record + Element<Record = R>,
    {
        self.get_with_context(&ExecContext::background(), config, dest, args)
    }

    /// Read exactly one record through the filter column.
    pub fn get_with_context<R>(
        &self,
        ctx: &ExecContext,
        config: &QueryConfig<R>,
        dest: &mut R,
        args: &[Value],
    ) -> Result<(), Error>
    where
        R: Record + Element<Record = R>,
    {
        if !config.has_filter() {
            return Err(ConfigurationError::MissingFilterColumn {
                kind: StatementKind::Select,
            }
            .into());
        }

        let mut rows: Vec<R> = Vec::new();
        self.select_with_context(ctx, config, &mut rows, args)?;

        let count = rows.len();
        match rows.pop() {
            Some(row) if count == 1 => {
                *dest = row;
                Ok(())
            }
            Some(_) => Err(ResultCardinalityError::Ambiguous { count }.into()),
            None => Err(ResultCardinalityError::Empty.into()),
        }
    }

    // ---------------------------------------------------------------------
    // Insert / Update / Delete
    // ---------------------------------------------------------------------

    pub fn insert<R: Record>(&self, config: &QueryConfig<R>, args: &[Value]) -> Result<i64, Error> {
        self.insert_with_context(&ExecContext::background(), config, args)
    }

    /// Insert one row and return the id the backend generated.
    pub fn insert_with_context<R: Record>(
        &self,
        ctx: &ExecContext,
        config: &QueryConfig<R>,
        args: &[Value],
    ) -> Result<i64, Error> {
        let sql = self.statement_text(StatementKind::Insert, config)?;
        let args = self.resolve_arguments(StatementKind::Insert, config, args)?;

        let backend = self.backend();
        tracing::debug!(db = %self.id, sql = %sql, args = args.len(), "insert");

        Ok(backend.query_returning_id_with_context(ctx, &sql, &args)?)
    }

    pub fn update<R: Record>(&self, config: &QueryConfig<R>, args: &[Value]) -> Result<u64, Error> {
        self.update_with_context(&ExecContext::background(), config, args)
    }

    /// Update rows and return how many the backend reports as affected.
    pub fn update_with_context<R: Record>(
        &self,
        ctx: &ExecContext,
        config: &QueryConfig<R>,
        args: &[Value],
    ) -> Result<u64, Error> {
        let sql = self.statement_text(StatementKind::Update, config)?;
        let args = self.resolve_arguments(StatementKind::Update, config, args)?;

        let backend = self.backend();
        tracing::debug!(db = %self.id, sql = %sql, args = args.len(), "update");

        Ok(backend.exec_with_context(ctx, &sql, &args)?)
    }

    pub fn delete<R: Record>(&self, config: &QueryConfig<R>, args: &[Value]) -> Result<u64, Error> {
        self.delete_with_context(&ExecContext::background(), config, args)
    }

    pub fn delete_with_context<R: Record>(
        &self,
        ctx: &ExecContext,
        config: &QueryConfig<R>,
        args: &[Value],
    ) -> Result<u64, Error> {
        let sql = self.statement_text(StatementKind::Delete, config)?;

        let backend = self.backend();
        tracing::debug!(db = %self.id, sql = %sql, args = args.len(), "delete");

        Ok(backend.exec_with_context(ctx, &sql, args)?)
    }

    // ---------------------------------------------------------------------
    // Raw execution
    // ---------------------------------------------------------------------

    pub fn exec(&self, sql: &str, args: &[Value]) -> Result<u64, Error> {
        self.exec_with_context(&ExecContext::background(), sql, args)
    }

    pub fn exec_with_context(
        &self,
        ctx: &ExecContext,
        sql: &str,
        args: &[Value],
    ) -> Result<u64, Error> {
        let backend = self.backend();
        tracing::debug!(db = %self.id, sql, args = args.len(), "exec");

        Ok(backend.exec_with_context(ctx, sql, args)?)
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn backend(&self) -> Arc<dyn ExecutionBackend> {
        Arc::clone(&self.backend.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn statement_text<R: Record>(
        &self,
        kind: StatementKind,
        config: &QueryConfig<R>,
    ) -> Result<Arc<str>, Error> {
        let synthesize = || -> Result<String, ConfigurationError> {
            let descriptor = self
                .materializer
                .descriptors()
                .descriptor::<R>(config.effective_tag_name())?;

            Ok(sql::statement(kind, &config.shape(), &descriptor))
        };

        if !self.is_using_cached_sql() {
            return Ok(synthesize()?.into());
        }

        Ok(self
            .queries
            .get_or_try_insert_with(config.cache_key(kind), synthesize)?)
    }

    fn resolve_arguments<R: Record>(
        &self,
        kind: StatementKind,
        config: &QueryConfig<R>,
        args: &[Value],
    ) -> Result<Vec<Value>, Error> {
        if !args.is_empty() {
            return Ok(args.to_vec());
        }

        let (Some(prototype), Some(cache)) = (&config.item, self.descriptor_cache()) else {
            return Ok(Vec::new());
        };

        let descriptor = cache.descriptor::<R>(config.effective_tag_name())?;
        let derived = derive_arguments(kind, config, prototype, &descriptor)?;

        tracing::trace!(db = %self.id, %kind, args = derived.len(), "arguments derived from prototype");

        Ok(derived)
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("id", &self.id)
            .field("use_cached_sql", &self.is_using_cached_sql())
            .field("derive_arguments", &self.descriptor_cache().is_some())
            .finish_non_exhaustive()
    }
}
