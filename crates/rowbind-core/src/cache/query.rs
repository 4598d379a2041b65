use crate::{
    cache::{recover_read, recover_write},
    sql::StatementKind,
};
use std::{
    any::TypeId,
    collections::HashMap,
    convert::Infallible,
    sync::{Arc, RwLock},
};

///
/// StatementCacheKey
///
/// Fingerprint of everything synthesis reads.
/// The exclusion set is stored sorted so its order never matters.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct StatementCacheKey {
    pub record: TypeId,
    pub table: String,
    pub identifier_wrapper: String,
    pub filter_column: String,
    pub tag_name: String,
    pub excluded_tags: Vec<String>,
    pub kind: StatementKind,
}

impl StatementCacheKey {
    #[must_use]
    pub fn new(
        record: TypeId,
        table: &str,
        identifier_wrapper: &str,
        filter_column: &str,
        tag_name: &str,
        excluded_tags: &[String],
        kind: StatementKind,
    ) -> Self {
        let mut excluded_tags = excluded_tags.to_vec();
        excluded_tags.sort_unstable();

        Self {
            record,
            table: table.to_string(),
            identifier_wrapper: identifier_wrapper.to_string(),
            filter_column: filter_column.to_string(),
            tag_name: tag_name.to_string(),
            excluded_tags,
            kind,
        }
    }
}

type StatementMap = RwLock<HashMap<StatementCacheKey, Arc<str>>>;

///
/// QueryCache
///
/// Synthesized SQL text, one map per statement kind.
///

#[derive(Debug, Default)]
pub struct QueryCache {
    insert: StatementMap,
    update: StatementMap,
    select: StatementMap,
    delete: StatementMap,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn map(&self, kind: StatementKind) -> &StatementMap {
        match kind {
            StatementKind::Insert => &self.insert,
            StatementKind::Update => &self.update,
            StatementKind::Select => &self.select,
            StatementKind::Delete => &self.delete,
        }
    }

    /// Cached text for `key`, or the result of `synthesize`, which is stored.
    pub fn get_or_insert_with(
        &self,
        key: StatementCacheKey,
        synthesize: impl FnOnce() -> String,
    ) -> Arc<str> {
        match self.get_or_try_insert_with(key, || Ok::<_, Infallible>(synthesize())) {
            Ok(text) => text,
            Err(never) => match never {},
        }
    }

    /// Like [`Self::get_or_insert_with`]; a failed synthesis stores nothing.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: StatementCacheKey,
        synthesize: impl FnOnce() -> Result<String, E>,
    ) -> Result<Arc<str>, E> {
        let map = self.map(key.kind);

        if let Some(found) = recover_read(map.read()).get(&key) {
            tracing::trace!(kind = %key.kind, table = %key.table, "query cache hit");
            return Ok(Arc::clone(found));
        }

        let text: Arc<str> = synthesize()?.into();
        tracing::debug!(kind = %key.kind, table = %key.table, sql = %text, "query cache miss");

        recover_write(map.write()).insert(key, Arc::clone(&text));

        Ok(text)
    }

    #[must_use]
    pub fn get(&self, key: &StatementCacheKey) -> Option<Arc<str>> {
        recover_read(self.map(key.kind).read()).get(key).cloned()
    }

    /// Number of cached statements of `kind`.
    #[must_use]
    pub fn len(&self, kind: StatementKind) -> usize {
        recover_read(self.map(kind).read()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        StatementKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }
}
