use crate::{
    cache::DescriptorCache,
    db::backend::RowCursor,
    error::{ConfigurationError, Error},
    traits::{Element, Record},
};
use std::{any::type_name, sync::Arc};

/// Reject element shapes with more than one wrapper level.
pub fn check_indirection<E: Element>() -> Result<(), ConfigurationError> {
    if E::INDIRECTION > 1 {
        return Err(ConfigurationError::NestedIndirection {
            element: type_name::<E>(),
            depth: E::INDIRECTION,
        });
    }

    Ok(())
}

///
/// RowMaterializer
///
/// Turns cursor rows into records of the caller's element shape.
///

#[derive(Clone, Debug, Default)]
pub struct RowMaterializer {
    descriptors: Arc<DescriptorCache>,
}

impl RowMaterializer {
    #[must_use]
    pub const fn new(descriptors: Arc<DescriptorCache>) -> Self {
        Self { descriptors }
    }

    #[must_use]
    pub const fn descriptors(&self) -> &Arc<DescriptorCache> {
        &self.descriptors
    }

    /// Replace `dest` with one element per cursor row.
    ///
    /// Each row is scanned into a fresh `Default` record, binding only the
    /// descriptor fields whose column is not in `excluded`, in declaration
    /// order. The first scan failure stops iteration; elements appended
    /// before it stay in `dest`.
    pub fn materialize<E: Element>(
        &self,
        cursor: &mut dyn RowCursor,
        tag_name: &str,
        excluded: &[String],
        dest: &mut Vec<E>,
    ) -> Result<usize, Error> {
        check_indirection::<E>()?;

        let descriptor = self.descriptors.descriptor::<E::Record>(tag_name)?;
        let indices = descriptor.indices_excluding(excluded);

        dest.clear();

        while cursor.advance() {
            let mut record = E::Record::default();

            let scanned = {
                let mut targets = record.scan_targets(&indices);
                cursor.scan(&mut targets)
            };

            if let Err(err) = scanned {
                tracing::debug!(
                    record = E::Record::path(),
                    materialized = dest.len(),
                    error = %err,
                    "row scan failed"
                );
                return Err(err.into());
            }

            dest.push(E::wrap(record));
        }

        cursor.finish()?;

        tracing::trace!(record = E::Record::path(), rows = dest.len(), "rows materialized");

        Ok(dest.len())
    }
}
