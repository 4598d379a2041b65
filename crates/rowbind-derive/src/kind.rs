use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type, TypePath};

///
/// Kind
///
/// Syntactic mirror of `rowbind::model::FieldKind`.
/// `Box<T>` and `Arc<T>` classify as `T`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Kind {
    Blob,
    Bool,
    Float32,
    Float64,
    Int,
    Text,
    Uint,
    Custom,
    Optional(Box<Self>),
    Unsupported,
}

impl Kind {
    pub fn classify(ty: &Type) -> Self {
        match ty {
            Type::Path(path) if path.qself.is_none() => classify_path(path),
            Type::Group(group) => Self::classify(&group.elem),
            Type::Paren(paren) => Self::classify(&paren.elem),
            _ => Self::Unsupported,
        }
    }

    const fn is_direct(&self) -> bool {
        !matches!(self, Self::Optional(_) | Self::Unsupported)
    }

    pub fn is_scannable(&self) -> bool {
        match self {
            Self::Optional(inner) => inner.is_direct(),
            kind => kind.is_direct(),
        }
    }

    pub fn tokens(&self) -> TokenStream {
        let kind = quote!(::rowbind::model::FieldKind);

        match self {
            Self::Blob => quote!(#kind::Blob),
            Self::Bool => quote!(#kind::Bool),
            Self::Float32 => quote!(#kind::Float32),
            Self::Float64 => quote!(#kind::Float64),
            Self::Int => quote!(#kind::Int),
            Self::Text => quote!(#kind::Text),
            Self::Uint => quote!(#kind::Uint),
            Self::Custom => quote!(#kind::Custom),
            Self::Optional(inner) => {
                let inner = inner.tokens();
                quote!(#kind::Optional(::std::boxed::Box::new(#inner)))
            }
            Self::Unsupported => quote!(#kind::Unsupported),
        }
    }
}

fn classify_path(path: &TypePath) -> Kind {
    let Some(segment) = path.path.segments.last() else {
        return Kind::Unsupported;
    };

    let name = segment.ident.to_string();
    let arg = single_type_argument(&segment.arguments);

    match (name.as_str(), arg) {
        ("Option", Some(inner)) => Kind::Optional(Box::new(Kind::classify(inner))),
        ("Box" | "Arc", Some(inner)) => Kind::classify(inner),
        ("Vec", Some(inner)) if is_ident(inner, "u8") => Kind::Blob,
        ("Vec" | "HashMap" | "BTreeMap" | "HashSet" | "BTreeSet" | "VecDeque", _) => {
            Kind::Unsupported
        }
        (_, Some(_)) => Kind::Custom,
        ("i8" | "i16" | "i32" | "i64" | "isize", None) => Kind::Int,
        ("u8" | "u16" | "u32" | "u64" | "usize", None) => Kind::Uint,
        ("i128" | "u128", None) => Kind::Unsupported,
        ("f32", None) => Kind::Float32,
        ("f64", None) => Kind::Float64,
        ("bool", None) => Kind::Bool,
        ("String", None) => Kind::Text,
        _ => Kind::Custom,
    }
}

fn single_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };

    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });

    match (types.next(), types.next()) {
        (Some(ty), None) => Some(ty),
        _ => None,
    }
}

fn is_ident(ty: &Type, ident: &str) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };

    path.path
        .get_ident()
        .is_some_and(|segment| segment == ident)
}
