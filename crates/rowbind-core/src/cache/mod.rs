//! Process-lifetime memoization of type descriptors and SQL text.
//!
//! Both caches are read-mostly: lookups take the shared lock, a miss
//! computes outside any lock and then inserts under the exclusive lock.
//! Two racing misses may both compute; the last insert wins, which is
//! sound because descriptor building and synthesis are pure.
//!
//! Neither cache evicts. A process that maps many distinct record shapes
//! or configurations grows them without bound.

mod descriptor;
mod query;


pub use descriptor::DescriptorCache;
pub use query::{QueryCache, StatementCacheKey};

use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

// A poisoned cache still holds only complete entries; keep using it.
fn recover_read<'a, T>(
    result: Result<RwLockReadGuard<'a, T>, PoisonError<RwLockReadGuard<'a, T>>>,
) -> RwLockReadGuard<'a, T> {
    result.unwrap_or_else(PoisonError::into_inner)
}

fn recover_write<'a, T>(
    result: Result<RwLockWriteGuard<'a, T>, PoisonError<RwLockWriteGuard<'a, T>>>,
) -> RwLockWriteGuard<'a, T> {
    result.unwrap_or_else(PoisonError::into_inner)
}
