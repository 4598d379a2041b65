use crate::kind::Kind;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Field, Fields, Ident, LitStr, Visibility};

// derive_record
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    expand(&input).unwrap_or_else(|err| err.to_compile_error())
}

///
/// RecordField
///
/// One declared field with everything the generated code needs.
///

struct RecordField<'a> {
    ident: &'a Ident,
    field: &'a Field,
    exported: bool,
    tags: Vec<(String, String)>,
    kind: Kind,
}

impl<'a> RecordField<'a> {
    fn parse(field: &'a Field) -> Result<Self, Error> {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "Record fields must be named"))?;

        Ok(Self {
            ident,
            field,
            exported: matches!(field.vis, Visibility::Public(_)),
            tags: parse_tags(field)?,
            kind: Kind::classify(&field.ty),
        })
    }

    // Accessors exist only where the descriptor could ever include the
    // field, so custom types elsewhere need no FieldValue impl.
    fn is_accessible(&self) -> bool {
        self.exported && !self.tags.is_empty() && self.kind.is_scannable()
    }

    fn schema_tokens(&self) -> TokenStream {
        let name = self.ident.to_string();
        let field_ty = &self.field.ty;
        let ty = quote!(#field_ty).to_string();
        let kind = self.kind.tokens();

        let tags = self.tags.iter().map(|(tag, column)| {
            quote!(.with_tag(#tag, #column))
        });
        let private = (!self.exported).then(|| quote!(.private()));

        quote! {
            ::rowbind::model::FieldSchema::new(#name, #ty, #kind)
                #(#tags)*
                #private
        }
    }
}

fn expand(input: &DeriveInput) -> Result<TokenStream, Error> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs",
        ));
    }

    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            &input.ident,
            "Record can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(Error::new_spanned(
            &data.fields,
            "Record can only be derived for structs with named fields",
        ));
    };

    let fields = named
        .named
        .iter()
        .map(RecordField::parse)
        .collect::<Result<Vec<_>, _>>()?;

    let ident = &input.ident;
    let type_name = ident.to_string();
    let field_count = fields.len();

    let schemas = fields.iter().map(RecordField::schema_tokens);

    let value_arms = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_accessible())
        .map(|(index, f)| {
            let field_ident = f.ident;
            quote! {
                #index => Some(::rowbind::traits::FieldValue::to_value(&self.#field_ident)),
            }
        });

    let slots = fields.iter().map(|f| {
        let field_ident = f.ident;
        if f.is_accessible() {
            quote!(Some(&mut self.#field_ident as &'a mut dyn ::rowbind::traits::ScanTarget))
        } else {
            quote!(None)
        }
    });

    Ok(quote! {
        impl ::rowbind::traits::Record for #ident {
            fn schema() -> &'static ::rowbind::model::RecordSchema {
                static SCHEMA: ::std::sync::OnceLock<::rowbind::model::RecordSchema> =
                    ::std::sync::OnceLock::new();

                SCHEMA.get_or_init(|| {
                    ::rowbind::model::RecordSchema::new(
                        ::std::string::String::from(concat!(module_path!(), "::", #type_name)),
                        vec![#(#schemas),*],
                    )
                })
            }

            #[allow(clippy::match_single_binding)]
            fn field_value(&self, index: usize) -> Option<::rowbind::value::Value> {
                match index {
                    #(#value_arms)*
                    _ => None,
                }
            }

            fn scan_targets<'a>(
                &'a mut self,
                indices: &[usize],
            ) -> Vec<&'a mut dyn ::rowbind::traits::ScanTarget> {
                let mut slots: [Option<&'a mut dyn ::rowbind::traits::ScanTarget>; #field_count] =
                    [#(#slots),*];

                indices
                    .iter()
                    .filter_map(|&index| slots.get_mut(index).and_then(Option::take))
                    .collect()
            }
        }

        impl ::rowbind::traits::Element for #ident {
            type Record = Self;

            const INDIRECTION: usize = 0;

            fn wrap(record: Self) -> Self {
                record
            }
        }
    })
}

// parse_tags
// Collects every `#[tag(name = "column")]` pair; a tag name may appear once.
fn parse_tags(field: &Field) -> Result<Vec<(String, String)>, Error> {
    let mut tags: Vec<(String, String)> = Vec::new();

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("tag")) {
        attr.parse_nested_meta(|meta| {
            let name = meta
                .path
                .get_ident()
                .ok_or_else(|| meta.error("expected a tag name"))?
                .to_string();

            if tags.iter().any(|(existing, _)| *existing == name) {
                return Err(meta.error(format!("tag '{name}' is set more than once")));
            }

            let column: LitStr = meta.value()?.parse()?;
            tags.push((name, column.value()));

            Ok(())
        })?;
    }

    Ok(tags)
}
