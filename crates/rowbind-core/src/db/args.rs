use crate::{
    config::QueryConfig,
    error::ConfigurationError,
    model::TypeDescriptor,
    sql::StatementKind,
    traits::Record,
    value::Value,
};

/// Arguments taken from the prototype record for an INSERT or UPDATE that
/// was given none.
///
/// Values follow descriptor order minus the configuration's exclusions,
/// matching the placeholders the synthesizer emitted. An UPDATE with a
/// filter column gets the filter field's value prepended as `$1`.
pub(crate) fn derive_arguments<R: Record>(
    kind: StatementKind,
    config: &QueryConfig<R>,
    prototype: &R,
    descriptor: &TypeDescriptor,
) -> Result<Vec<Value>, ConfigurationError> {
    let mut args = Vec::with_capacity(descriptor.len() + 1);

    if kind == StatementKind::Update && config.has_filter() {
        let filter = descriptor
            .field_by_column(&config.filter_column)
            .and_then(|field| prototype.field_value(field.index))
            .ok_or_else(|| ConfigurationError::FilterFieldNotFound {
                record: descriptor.record().to_string(),
                column: config.filter_column.clone(),
                tag: descriptor.tag_name().to_string(),
            })?;

        args.push(filter);
    }

    args.extend(
        descriptor
            .fields_excluding(&config.excluded_tags)
            .map(|field| prototype.field_value(field.index).unwrap_or_default()),
    );

    Ok(args)
}
