
use crate::{error::ScanError, model::schema::RecordSchema, value::Value};
use std::{any::type_name, sync::Arc};

// ============================================================================
// RECORD SHAPE
// ============================================================================
//
// These traits describe *what a record is*: its registration-time schema
// and the per-field accessors the derive generates.
//

///
/// Record
///
/// A struct whose tagged fields map onto table columns.
/// Normally implemented by `#[derive(Record)]`.
///
/// ## Semantics
/// - `schema()` lists every declared field in declaration order
/// - `field_value(i)` reads the field at declaration index `i`
/// - `scan_targets` hands out disjoint writable slots, in the order the
///   indices were requested; indices without an accessor are skipped
///

pub trait Record: Default + 'static {
    fn schema() -> &'static RecordSchema;

    fn field_value(&self, index: usize) -> Option<Value>;

    fn scan_targets<'a>(&'a mut self, indices: &[usize]) -> Vec<&'a mut dyn ScanTarget>;

    #[must_use]
    fn path() -> &'static str {
        Self::schema().path.as_str()
    }
}

///
/// Element
///
/// Shape of one element of a result sequence: the record itself or the
/// record behind one wrapper (`Box`, `Arc`, `Option`).
/// `INDIRECTION` counts wrapper levels; the materializer rejects more than one.
///

pub trait Element: Sized + 'static {
    type Record: Record;

    const INDIRECTION: usize;

    fn wrap(record: Self::Record) -> Self;
}

impl<E: Element> Element for Box<E> {
    type Record = E::Record;

    const INDIRECTION: usize = E::INDIRECTION + 1;

    fn wrap(record: Self::Record) -> Self {
        Self::new(E::wrap(record))
    }
}

impl<E: Element> Element for Arc<E> {
    type Record = E::Record;

    const INDIRECTION: usize = E::INDIRECTION + 1;

    fn wrap(record: Self::Record) -> Self {
        Self::new(E::wrap(record))
    }
}

impl<E: Element> Element for Option<E> {
    type Record = E::Record;

    const INDIRECTION: usize = E::INDIRECTION + 1;

    fn wrap(record: Self::Record) -> Self {
        Some(E::wrap(record))
    }
}

// ============================================================================
// FIELD VALUES
// ============================================================================

///
/// FieldValue
///
/// Conversion boundary between a field type and a column `Value`.
/// Implementing it is what makes a custom type scannable.
///

pub trait FieldValue {
    fn to_value(&self) -> Value;

    #[must_use]
    fn from_value(value: &Value) -> Option<Self>
    where
        Self: Sized;
}

///
/// ScanTarget
///
/// A writable field slot; the row cursor stores one column value into it.
///

pub trait ScanTarget {
    fn scan_value(&mut self, index: usize, value: Value) -> Result<(), ScanError>;
}

impl<T: FieldValue> ScanTarget for T {
    fn scan_value(&mut self, index: usize, value: Value) -> Result<(), ScanError> {
        match T::from_value(&value) {
            Some(v) => {
                *self = v;
                Ok(())
            }
            None => Err(ScanError::TypeMismatch {
                index,
                expected: type_name::<T>(),
                found: value.kind_label(),
            }),
        }
    }
}

// NULL clears the slot; anything else allocates a fresh inner value.
impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            return Some(None);
        }

        T::from_value(value).map(Some)
    }
}

// Owning pointers are transparent: they bind exactly like their target.
impl<T: FieldValue> FieldValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: &Value) -> Option<Self> {
        T::from_value(value).map(Self::new)
    }
}

impl<T: FieldValue> FieldValue for Arc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: &Value) -> Option<Self> {
        T::from_value(value).map(Self::new)
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.clone()),
            Value::Blob(v) => Self::from_utf8(v.clone()).ok(),
            _ => None,
        }
    }
}

impl FieldValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Blob(v) => Some(v.clone()),
            Value::Text(v) => Some(v.as_bytes().to_vec()),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FieldValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float32(*self)
    }

    // Float64 cells narrow unless the value only overflows f32 range.
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float32(v) => Some(*v),
            Value::Float64(v) => {
                let narrowed = *v as Self;
                (narrowed.is_finite() || !v.is_finite()).then_some(narrowed)
            }
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float64(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float64(v) => Some(*v),
            Value::Float32(v) => Some(f64::from(*v)),
            _ => None,
        }
    }
}

// impl_field_value_int
#[macro_export]
macro_rules! impl_field_value_int {
    ( $( $type:ty => $variant:ident via $view:ident ),* $(,)? ) => {
        $(
            impl FieldValue for $type {
                fn to_value(&self) -> Value {
                    Value::$variant((*self).try_into().unwrap_or_default())
                }

                fn from_value(value: &Value) -> Option<Self> {
                    value.$view().and_then(|v| v.try_into().ok())
                }
            }
        )*
    };
}

impl_field_value_int!(
    i8 => Int via as_i64,
    i16 => Int via as_i64,
    i32 => Int via as_i64,
    i64 => Int via as_i64,
    isize => Int via as_i64,
    u8 => Uint via as_u64,
    u16 => Uint via as_u64,
    u32 => Uint via as_u64,
    u64 => Uint via as_u64,
    usize => Uint via as_u64,
);
