use crate::{
    cache::{recover_read, recover_write},
    error::ConfigurationError,
    model::TypeDescriptor,
    traits::Record,
};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, RwLock},
};

///
/// DescriptorCache
///
/// Descriptors keyed by (record type, tag name).
///

#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: RwLock<HashMap<(TypeId, String), Arc<TypeDescriptor>>>,
}

impl DescriptorCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor of `R` under `tag_name`, built on first use.
    pub fn descriptor<R: Record>(
        &self,
        tag_name: &str,
    ) -> Result<Arc<TypeDescriptor>, ConfigurationError> {
        let key = (TypeId::of::<R>(), tag_name.to_string());

        if let Some(found) = recover_read(self.entries.read()).get(&key) {
            return Ok(Arc::clone(found));
        }

        let built = Arc::new(TypeDescriptor::build(R::schema(), tag_name, &[])?);
        tracing::debug!(
            record = R::path(),
            tag = tag_name,
            fields = built.len(),
            "descriptor cache miss"
        );

        recover_write(self.entries.write()).insert(key, Arc::clone(&built));

        Ok(built)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        recover_read(self.entries.read()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
