//! Dynamically typed field values.

use crate::{DefaultValue, Field, FieldType, Record, Scalar};
use bytes::Bytes;
use paste::paste;
use uuid::Uuid;

/// The value of one field in a [`Record`].
///
/// `Null` is only valid for fields whose descriptor allows it at the version being encoded;
/// whether a field is written at all is decided by its version range, not by its value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint16(u16),
    Uint32(u32),
    Bool(bool),
    Float64(f64),
    Uuid(Uuid),
    String(String),
    Bytes(Bytes),
    Struct(Record),
    Array(Vec<Value>),
}

// Conversions and accessors for each variant that wraps a plain value.
macro_rules! impl_variant {
    ($variant:ident, $type:ty, $accessor:ident) => {
        impl From<$type> for Value {
            fn from(value: $type) -> Self {
                Self::$variant(value)
            }
        }

        impl Value {
            paste! {
                #[doc = "Returns the value if it is a `" $variant "`."]
                pub fn [<as_ $accessor>](&self) -> Option<&$type> {
                    match self {
                        Self::$variant(value) => Some(value),
                        _ => None,
                    }
                }
            }
        }
    };
}

impl_variant!(Int8, i8, i8);
impl_variant!(Int16, i16, i16);
impl_variant!(Int32, i32, i32);
impl_variant!(Int64, i64, i64);
impl_variant!(Uint16, u16, u16);
impl_variant!(Uint32, u32, u32);
impl_variant!(Bool, bool, bool);
impl_variant!(Float64, f64, f64);
impl_variant!(Uuid, Uuid, uuid);
impl_variant!(String, String, string);
impl_variant!(Bytes, Bytes, bytes);
impl_variant!(Struct, Record, record);
impl_variant!(Array, Vec<Value>, array);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl Value {
    /// Returns true if the value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice if the value is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        self.as_string().map(String::as_str)
    }

    /// Builds an array from anything convertible into values.
    pub fn array<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// The value a field holds when it is not on the wire.
    pub fn default_for(field: &Field) -> Self {
        let ty = field.ty();
        match (field.default_value(), ty) {
            (DefaultValue::Zero, _) => Self::zero(ty),
            (DefaultValue::Null, _) => Self::Null,
            (DefaultValue::Int(value), FieldType::Scalar(scalar)) => match scalar {
                Scalar::Int8 => Self::Int8(value as i8),
                Scalar::Int16 => Self::Int16(value as i16),
                Scalar::Int32 => Self::Int32(value as i32),
                Scalar::Int64 => Self::Int64(value),
                Scalar::Uint16 => Self::Uint16(value as u16),
                Scalar::Uint32 => Self::Uint32(value as u32),
                Scalar::Float64 => Self::Float64(value as f64),
                _ => Self::zero(ty),
            },
            (DefaultValue::Bool(value), FieldType::Scalar(Scalar::Bool)) => Self::Bool(value),
            (DefaultValue::Float(value), FieldType::Scalar(Scalar::Float64)) => {
                Self::Float64(value)
            }
            (DefaultValue::Str(value), FieldType::Scalar(Scalar::String)) => value.into(),
            _ => Self::zero(ty),
        }
    }

    /// The zero value of a type.
    pub fn zero(ty: &FieldType) -> Self {
        match ty {
            FieldType::Scalar(scalar) => match scalar {
                Scalar::Int8 => Self::Int8(0),
                Scalar::Int16 => Self::Int16(0),
                Scalar::Int32 => Self::Int32(0),
                Scalar::Int64 => Self::Int64(0),
                Scalar::Uint16 => Self::Uint16(0),
                Scalar::Uint32 => Self::Uint32(0),
                Scalar::Bool => Self::Bool(false),
                Scalar::Float64 => Self::Float64(0.0),
                Scalar::Uuid => Self::Uuid(Uuid::nil()),
                Scalar::String => Self::String(String::new()),
                Scalar::Bytes => Self::Bytes(Bytes::new()),
            },
            FieldType::Struct(schema) => Self::Struct(Record::new(*schema)),
            FieldType::Array(_) | FieldType::StructArray(_) => Self::Array(Vec::new()),
        }
    }
}
