//! Declarative message schemas.
//!
//! A [`Schema`] is an ordered table of [`Field`] descriptors plus the range of versions the
//! message supports and the range in which it uses the flexible (compact, tagged) encoding.
//! Schemas are plain `static` data; the engine in [`crate::record`] walks them.
//!
//! # Example
//!
//! ```
//! use kwire_codec::{DefaultValue, Field, FieldType, Schema, Versions};
//!
//! static MEMBER: Schema = Schema::nested(
//!     "Member",
//!     &[
//!         Field::new("member_id", FieldType::STRING, Versions::ALL),
//!         Field::new("group_instance_id", FieldType::STRING, Versions::since(3))
//!             .nullable(Versions::since(3))
//!             .with_default(DefaultValue::Null),
//!     ],
//! );
//!
//! static LEAVE: Schema = Schema::new(
//!     "Leave",
//!     Versions::between(0, 5),
//!     Versions::since(4),
//!     &[
//!         Field::new("group_id", FieldType::STRING, Versions::ALL),
//!         Field::new("members", FieldType::StructArray(&MEMBER), Versions::since(3)),
//!     ],
//! );
//!
//! assert!(!LEAVE.is_flexible(3));
//! assert!(LEAVE.is_flexible(4));
//! assert!(LEAVE.check_version(6).is_err());
//! ```

use crate::{Context, Error, Limits};
use std::{collections::HashSet, fmt, ptr};
use tracing::debug;

/// A protocol version.
pub type Version = i16;

/// An inclusive range of versions (possibly empty).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Versions {
    min: Version,
    max: Version,
}

impl Versions {
    /// No version.
    pub const NONE: Self = Self { min: 0, max: -1 };

    /// Every version.
    pub const ALL: Self = Self::since(0);

    /// Versions `min` through `max`, inclusive.
    ///
    /// Panics (at compile time, in a `static`) if `min > max`.
    pub const fn between(min: Version, max: Version) -> Self {
        assert!(min <= max, "version range must satisfy min <= max");
        Self { min, max }
    }

    /// Version `min` and every later version.
    pub const fn since(min: Version) -> Self {
        Self {
            min,
            max: Version::MAX,
        }
    }

    /// Exactly one version.
    pub const fn exactly(version: Version) -> Self {
        Self::between(version, version)
    }

    /// Returns true if `version` is in the range.
    pub const fn contains(&self, version: Version) -> bool {
        self.min <= version && version <= self.max
    }

    /// Returns true if no version is in the range.
    pub const fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// The lowest version in the range.
    pub const fn min(&self) -> Version {
        self.min
    }

    /// The highest version in the range.
    pub const fn max(&self) -> Version {
        self.max
    }

    /// Returns true if every version in `self` is also in `other`.
    pub const fn is_within(&self, other: &Versions) -> bool {
        self.is_empty() || (other.min <= self.min && self.max <= other.max)
    }
}

impl fmt::Display for Versions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "none")
        } else if self.max == Version::MAX {
            write!(f, "{}+", self.min)
        } else if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// A type with a direct wire representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scalar {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint16,
    Uint32,
    Bool,
    Float64,
    Uuid,
    String,
    Bytes,
}

impl Scalar {
    /// The schema name of the type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Bool => "bool",
            Self::Float64 => "float64",
            Self::Uuid => "uuid",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }

    /// Returns true if the type has a null sentinel on the wire.
    pub const fn has_null(self) -> bool {
        matches!(self, Self::String | Self::Bytes)
    }
}

/// The type of a field.
#[derive(Clone, Copy, Debug)]
pub enum FieldType {
    Scalar(Scalar),
    Struct(&'static Schema),
    Array(Scalar),
    StructArray(&'static Schema),
}

impl FieldType {
    pub const INT8: Self = Self::Scalar(Scalar::Int8);
    pub const INT16: Self = Self::Scalar(Scalar::Int16);
    pub const INT32: Self = Self::Scalar(Scalar::Int32);
    pub const INT64: Self = Self::Scalar(Scalar::Int64);
    pub const UINT16: Self = Self::Scalar(Scalar::Uint16);
    pub const UINT32: Self = Self::Scalar(Scalar::Uint32);
    pub const BOOL: Self = Self::Scalar(Scalar::Bool);
    pub const FLOAT64: Self = Self::Scalar(Scalar::Float64);
    pub const UUID: Self = Self::Scalar(Scalar::Uuid);
    pub const STRING: Self = Self::Scalar(Scalar::String);
    pub const BYTES: Self = Self::Scalar(Scalar::Bytes);

    /// Returns true if a value of this type can be null on the wire.
    pub const fn has_null(&self) -> bool {
        match self {
            Self::Scalar(scalar) => scalar.has_null(),
            Self::Struct(_) | Self::Array(_) | Self::StructArray(_) => true,
        }
    }

    /// A short description used in errors.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Scalar(scalar) => scalar.name(),
            Self::Struct(_) => "struct",
            Self::Array(_) | Self::StructArray(_) => "array",
        }
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) | (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) | (Self::StructArray(a), Self::StructArray(b)) => {
                ptr::eq(*a, *b)
            }
            _ => false,
        }
    }
}

/// The value a field takes when it is absent from the wire.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefaultValue {
    /// Zero, `false`, empty, or a struct of defaults.
    Zero,
    Null,
    Int(i64),
    Bool(bool),
    Float(f64),
    Str(&'static str),
}

/// A field descriptor.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    name: &'static str,
    ty: FieldType,
    versions: Versions,
    nullable: Versions,
    tag: Option<u32>,
    default: DefaultValue,
    flexible: Option<Versions>,
}

impl Field {
    /// A body field of type `ty` present in `versions`.
    pub const fn new(name: &'static str, ty: FieldType, versions: Versions) -> Self {
        Self {
            name,
            ty,
            versions,
            nullable: Versions::NONE,
            tag: None,
            default: DefaultValue::Zero,
            flexible: None,
        }
    }

    /// Allows null values in `versions`.
    pub const fn nullable(mut self, versions: Versions) -> Self {
        self.nullable = versions;
        self
    }

    /// Moves the field into the tagged section under `tag`.
    pub const fn tagged(mut self, tag: u32) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Sets the value used when the field is absent.
    pub const fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = default;
        self
    }

    /// Overrides the message's flexible versions for this field's own encoding.
    pub const fn flexible_versions(mut self, versions: Versions) -> Self {
        self.flexible = Some(versions);
        self
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub const fn versions(&self) -> Versions {
        self.versions
    }

    pub const fn tag(&self) -> Option<u32> {
        self.tag
    }

    pub const fn default_value(&self) -> DefaultValue {
        self.default
    }

    /// Returns true if the field is present at `version`.
    pub const fn applies(&self, version: Version) -> bool {
        self.versions.contains(version)
    }

    /// Returns true if the field may be null at `version`.
    pub const fn is_nullable(&self, version: Version) -> bool {
        self.nullable.contains(version)
    }

    /// Returns the context to encode this field's value with.
    pub fn context(&self, cx: &Context) -> Context {
        match self.flexible {
            Some(versions) => cx.with_flexible(versions.contains(cx.version())),
            None => *cx,
        }
    }
}

/// An immutable message (or nested struct) schema.
#[derive(Debug)]
pub struct Schema {
    name: &'static str,
    versions: Versions,
    flexible: Versions,
    fields: &'static [Field],
}

impl Schema {
    /// A top-level message schema.
    pub const fn new(
        name: &'static str,
        versions: Versions,
        flexible: Versions,
        fields: &'static [Field],
    ) -> Self {
        Self {
            name,
            versions,
            flexible,
            fields,
        }
    }

    /// A struct nested inside a message. It is encoded with the enclosing message's version
    /// and flexibility.
    pub const fn nested(name: &'static str, fields: &'static [Field]) -> Self {
        Self::new(name, Versions::ALL, Versions::NONE, fields)
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The versions the message supports.
    pub const fn versions(&self) -> Versions {
        self.versions
    }

    /// The versions in which the message uses the flexible encoding.
    pub const fn flexible_versions(&self) -> Versions {
        self.flexible
    }

    pub const fn fields(&self) -> &'static [Field] {
        self.fields
    }

    /// Returns true if `version` uses compact lengths and tagged fields.
    pub const fn is_flexible(&self, version: Version) -> bool {
        self.flexible.contains(version)
    }

    /// Fails with [`Error::UnsupportedVersion`] if `version` is outside the supported range.
    pub fn check_version(&self, version: Version) -> Result<(), Error> {
        if self.versions.contains(version) {
            return Ok(());
        }
        debug!(schema = self.name, version, supported = %self.versions, "unsupported version");
        Err(Error::UnsupportedVersion {
            schema: self.name,
            version,
            supported: self.versions,
        })
    }

    /// Checks `version` and builds the context for one encode or decode call.
    pub fn context(&self, version: Version, limits: Limits) -> Result<Context, Error> {
        self.check_version(version)?;
        Ok(Context::new(version, self.is_flexible(version)).with_limits(limits))
    }

    /// Returns the index and descriptor of the field named `name`.
    pub fn field(&self, name: &str) -> Option<(usize, &'static Field)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == name)
    }

    /// Returns the index and descriptor of the tagged field carried under `tag` at `version`.
    pub fn tagged_field(&self, tag: u32, version: Version) -> Option<(usize, &'static Field)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.tag == Some(tag) && field.applies(version))
    }

    /// Checks the schema (and every nested schema) for descriptor mistakes:
    /// duplicate names or tags, nullability on a type without a null sentinel, and tagged fields
    /// outside the flexible versions.
    pub fn validate(&self) -> Result<(), Error> {
        self.validate_fields(self.flexible)
    }

    fn validate_fields(&self, flexible: Versions) -> Result<(), Error> {
        let invalid = |reason: String| Err(Error::InvalidSchema(self.name, reason));
        let mut names = HashSet::new();
        let mut tags = HashSet::new();
        for field in self.fields {
            if !names.insert(field.name) {
                return invalid(format!("duplicate field {}", field.name));
            }
            if !field.nullable.is_empty() && !field.ty.has_null() {
                return invalid(format!("{} cannot be nullable", field.name));
            }
            if let Some(tag) = field.tag {
                if !tags.insert(tag) {
                    return invalid(format!("duplicate tag {tag}"));
                }
                // Nested structs inherit flexibility, so only top-level tags can be checked.
                if !flexible.is_empty() && !field.versions.is_within(&flexible) {
                    return invalid(format!(
                        "tagged field {} outside flexible versions",
                        field.name
                    ));
                }
            }
            match field.ty {
                FieldType::Struct(nested) | FieldType::StructArray(nested) => {
                    nested.validate_fields(Versions::NONE)?;
                }
                FieldType::Scalar(_) | FieldType::Array(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    static NESTED: Schema = Schema::nested(
        "Nested",
        &[Field::new("value", FieldType::INT32, Versions::ALL)],
    );

    static MESSAGE: Schema = Schema::new(
        "Message",
        Versions::between(0, 9),
        Versions::since(6),
        &[
            Field::new("id", FieldType::INT32, Versions::ALL),
            Field::new("ranged", FieldType::INT64, Versions::between(3, 7)),
            Field::new("name", FieldType::STRING, Versions::ALL).nullable(Versions::since(2)),
            Field::new("items", FieldType::StructArray(&NESTED), Versions::ALL),
            Field::new("extra", FieldType::INT32, Versions::since(6)).tagged(0),
        ],
    );

    #[test_case(Versions::between(3, 7), "3-7")]
    #[test_case(Versions::since(4), "4+")]
    #[test_case(Versions::exactly(2), "2")]
    #[test_case(Versions::NONE, "none")]
    fn test_versions_display(versions: Versions, expected: &str) {
        assert_eq!(versions.to_string(), expected);
    }

    #[test_case(2, false)]
    #[test_case(3, true)]
    #[test_case(7, true)]
    #[test_case(8, false)]
    fn test_field_applies(version: Version, expected: bool) {
        let (_, field) = MESSAGE.field("ranged").unwrap();
        assert_eq!(field.applies(version), expected);
    }

    #[test]
    fn test_versions_within() {
        assert!(Versions::between(6, 9).is_within(&Versions::since(6)));
        assert!(!Versions::since(5).is_within(&Versions::since(6)));
        assert!(Versions::NONE.is_within(&Versions::exactly(1)));
    }

    #[test]
    fn test_flexible_cutover() {
        assert!(!MESSAGE.is_flexible(5));
        assert!(MESSAGE.is_flexible(6));
    }

    #[test]
    fn test_check_version() {
        assert!(MESSAGE.check_version(0).is_ok());
        assert!(MESSAGE.check_version(9).is_ok());
        assert_eq!(
            MESSAGE.check_version(10),
            Err(Error::UnsupportedVersion {
                schema: "Message",
                version: 10,
                supported: Versions::between(0, 9),
            })
        );
        assert!(MESSAGE.check_version(-1).is_err());
    }

    #[test]
    fn test_context() {
        let cx = MESSAGE.context(6, Limits::DEFAULT).unwrap();
        assert!(cx.flexible());
        assert_eq!(cx.version(), 6);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(MESSAGE.field("name").map(|(index, _)| index), Some(2));
        assert!(MESSAGE.field("missing").is_none());
        assert_eq!(MESSAGE.tagged_field(0, 6).map(|(index, _)| index), Some(4));
        assert!(MESSAGE.tagged_field(0, 5).is_none());
        assert!(MESSAGE.tagged_field(1, 6).is_none());
    }

    #[test]
    fn test_nullability() {
        let (_, field) = MESSAGE.field("name").unwrap();
        assert!(!field.is_nullable(1));
        assert!(field.is_nullable(2));
    }

    #[test]
    fn test_flexible_override() {
        let field = Field::new("client_id", FieldType::STRING, Versions::ALL)
            .flexible_versions(Versions::NONE);
        let cx = Context::new(2, true);
        assert!(!field.context(&cx).flexible());
        let plain = Field::new("other", FieldType::STRING, Versions::ALL);
        assert!(plain.context(&cx).flexible());
    }

    #[test]
    fn test_validate() {
        assert!(MESSAGE.validate().is_ok());

        static DUPLICATE_TAG: Schema = Schema::new(
            "DuplicateTag",
            Versions::ALL,
            Versions::ALL,
            &[
                Field::new("a", FieldType::INT32, Versions::ALL).tagged(1),
                Field::new("b", FieldType::INT32, Versions::ALL).tagged(1),
            ],
        );
        assert!(matches!(
            DUPLICATE_TAG.validate(),
            Err(Error::InvalidSchema("DuplicateTag", _))
        ));

        static NULLABLE_INT: Schema = Schema::new(
            "NullableInt",
            Versions::ALL,
            Versions::NONE,
            &[Field::new("a", FieldType::INT32, Versions::ALL).nullable(Versions::ALL)],
        );
        assert!(NULLABLE_INT.validate().is_err());

        static EARLY_TAG: Schema = Schema::new(
            "EarlyTag",
            Versions::ALL,
            Versions::since(3),
            &[Field::new("a", FieldType::INT32, Versions::ALL).tagged(0)],
        );
        assert!(EARLY_TAG.validate().is_err());
    }
}
