use proc_macro::TokenStream;

mod kind;
mod record;

/// Derive `Record` and `Element` for a struct with named fields.
///
/// Column names come from `#[tag(<tag name> = "<column>", ...)]` field
/// attributes. Generic structs are rejected.
#[proc_macro_derive(Record, attributes(tag))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}
