//! Schema-driven encoding and decoding of records.
//!
//! A [`Record`] holds one [`Value`] per field of its [`Schema`] plus the tagged fields that
//! were read off the wire but are unknown to the schema. Encoding walks the schema in field
//! order:
//!
//! 1. Every untagged field that applies at the version is written, nested structs and arrays
//!    recursively with the same [`Context`]. Fields outside their version range are skipped.
//! 2. In flexible versions, the tagged section follows: known tagged fields whose value differs
//!    from their default, merged with the retained unknown ones, sorted by tag.
//!
//! Decoding mirrors this. Fields that are not on the wire at the version keep their defaults.
//!
//! # Example
//!
//! ```
//! use kwire_codec::{Field, FieldType, Record, Schema, Value, Versions};
//!
//! static HEARTBEAT: Schema = Schema::new(
//!     "Heartbeat",
//!     Versions::between(0, 4),
//!     Versions::since(4),
//!     &[
//!         Field::new("group_id", FieldType::STRING, Versions::ALL),
//!         Field::new("generation_id", FieldType::INT32, Versions::ALL),
//!     ],
//! );
//!
//! let record = Record::new(&HEARTBEAT)
//!     .with("group_id", "payments")?
//!     .with("generation_id", 7i32)?;
//!
//! let legacy = record.encode(3)?;
//! assert_eq!(legacy.len(), 2 + 8 + 4);
//!
//! let flexible = record.encode(4)?;
//! assert_eq!(flexible.len(), 1 + 8 + 4 + 1);
//!
//! let decoded = Record::decode(&HEARTBEAT, flexible, 4)?;
//! assert_eq!(decoded.get("generation_id"), Some(&Value::Int32(7)));
//! # Ok::<(), kwire_codec::Error>(())
//! ```

use crate::{
    tagged::{count_size, entry_header_size, read_count, write_count, write_entry_header},
    types::{
        array::{
            array_prefix_size, read_array, read_nullable_array, write_array, write_null_array,
        },
        Nullable,
    },
    Context, EncodeSize, Error, Field, FieldType, Limits, RawTaggedField, Read, Scalar, Schema,
    Value, Version, Write,
};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::{fmt, ptr};
use tracing::trace;
use uuid::Uuid;

/// Marker preceding a present nullable struct.
const PRESENT: i8 = 1;

/// Marker standing in for a null nullable struct.
const ABSENT: i8 = -1;

/// An instance of a [`Schema`].
#[derive(Clone)]
pub struct Record {
    schema: &'static Schema,
    values: Vec<Value>,
    unknown: Vec<RawTaggedField>,
}

impl Record {
    /// Creates a record with every field set to its default.
    pub fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            values: schema.fields().iter().map(Value::default_for).collect(),
            unknown: Vec::new(),
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Returns the value of the field named `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let (index, _) = self.schema.field(name)?;
        self.values.get(index)
    }

    /// Returns a mutable reference to the value of the field named `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        let (index, _) = self.schema.field(name)?;
        self.values.get_mut(index)
    }

    /// Sets the field named `name`.
    ///
    /// The value is not checked against the field type until the record is encoded.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        let slot = self
            .get_mut(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;
        *slot = value.into();
        Ok(())
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Iterates over every field and its value, in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static Field, &Value)> {
        self.schema.fields().iter().zip(&self.values)
    }

    /// Tagged fields read off the wire that the schema does not know at the decoded version.
    pub fn unknown_tagged_fields(&self) -> &[RawTaggedField] {
        &self.unknown
    }

    /// Adds an opaque tagged field to write alongside the known ones.
    ///
    /// Entries whose tag belongs to a known tagged field at the encoded version are dropped on
    /// write.
    pub fn push_unknown_tagged_field(&mut self, field: RawTaggedField) {
        self.unknown.push(field);
    }

    /// Encodes the record at `version` into a fresh buffer.
    pub fn encode(&self, version: Version) -> Result<BytesMut, Error> {
        let cx = self.schema.context(version, Limits::DEFAULT)?;
        let len = self.fields_size(&cx);
        let mut buffer = BytesMut::with_capacity(len);
        self.write_fields(&mut buffer, &cx)?;
        assert_eq!(buffer.len(), len, "write_fields() did not write expected bytes");
        Ok(buffer)
    }

    /// Returns the number of bytes [`Record::encode`] produces at `version`.
    pub fn encode_size(&self, version: Version) -> Result<usize, Error> {
        let cx = self.schema.context(version, Limits::DEFAULT)?;
        Ok(self.fields_size(&cx))
    }

    /// Appends the encoding of the record at `version` to `buf`.
    pub fn write(&self, buf: &mut impl BufMut, version: Version) -> Result<(), Error> {
        let cx = self.schema.context(version, Limits::DEFAULT)?;
        self.write_fields(buf, &cx)
    }

    /// Reads a record of `schema` at `version`, leaving any trailing bytes in `buf`.
    pub fn read(
        schema: &'static Schema,
        buf: &mut impl Buf,
        version: Version,
    ) -> Result<Self, Error> {
        Self::read_with(schema, buf, version, Limits::DEFAULT)
    }

    /// Like [`Record::read`], with decode limits.
    pub fn read_with(
        schema: &'static Schema,
        buf: &mut impl Buf,
        version: Version,
        limits: Limits,
    ) -> Result<Self, Error> {
        let cx = schema.context(version, limits)?;
        Self::read_fields(schema, buf, &cx)
    }

    /// Decodes a record of `schema` at `version`, ensuring the buffer is fully consumed.
    pub fn decode(schema: &'static Schema, buf: impl Buf, version: Version) -> Result<Self, Error> {
        Self::decode_with(schema, buf, version, Limits::DEFAULT)
    }

    /// Like [`Record::decode`], with decode limits.
    pub fn decode_with(
        schema: &'static Schema,
        mut buf: impl Buf,
        version: Version,
        limits: Limits,
    ) -> Result<Self, Error> {
        let record = Self::read_with(schema, &mut buf, version, limits)?;
        let remaining = buf.remaining();
        if remaining > 0 {
            return Err(Error::ExtraData(remaining));
        }
        Ok(record)
    }

    fn body(&self, version: Version) -> impl Iterator<Item = (&'static Field, &Value)> {
        self.iter()
            .filter(move |(field, _)| field.tag().is_none() && field.applies(version))
    }

    fn tagged_entries(&self, version: Version) -> Vec<Entry<'_>> {
        let mut entries: Vec<_> = self
            .iter()
            .filter_map(|(field, value)| {
                let tag = field.tag()?;
                (field.applies(version) && *value != Value::default_for(field))
                    .then_some(Entry::Known(tag, field, value))
            })
            .collect();
        entries.extend(
            self.unknown
                .iter()
                .filter(|raw| self.schema.tagged_field(raw.tag, version).is_none())
                .map(Entry::Raw),
        );
        entries.sort_by_key(Entry::tag);
        entries
    }

    fn write_fields(&self, buf: &mut impl BufMut, cx: &Context) -> Result<(), Error> {
        for (field, value) in self.body(cx.version()) {
            write_value(buf, field, value, cx)?;
        }
        if !cx.flexible() {
            return Ok(());
        }

        let entries = self.tagged_entries(cx.version());
        write_count(buf, entries.len())?;
        for entry in entries {
            match entry {
                Entry::Known(tag, field, value) => {
                    write_entry_header(buf, tag, value_size(field, value, cx))?;
                    write_value(buf, field, value, cx)?;
                }
                Entry::Raw(raw) => raw.write(buf, cx)?,
            }
        }
        Ok(())
    }

    fn fields_size(&self, cx: &Context) -> usize {
        let body: usize = self
            .body(cx.version())
            .map(|(field, value)| value_size(field, value, cx))
            .sum();
        if !cx.flexible() {
            return body;
        }

        let entries = self.tagged_entries(cx.version());
        let tagged: usize = entries
            .iter()
            .map(|entry| match entry {
                Entry::Known(tag, field, value) => {
                    let len = value_size(field, value, cx);
                    entry_header_size(*tag, len) + len
                }
                Entry::Raw(raw) => raw.encode_size(cx),
            })
            .sum();
        body + count_size(entries.len()) + tagged
    }

    fn read_fields(
        schema: &'static Schema,
        buf: &mut impl Buf,
        cx: &Context,
    ) -> Result<Self, Error> {
        let version = cx.version();
        let mut record = Self::new(schema);
        for (index, field) in schema.fields().iter().enumerate() {
            if field.tag().is_some() || !field.applies(version) {
                continue;
            }
            record.values[index] = read_value(buf, field, cx)?;
        }
        if !cx.flexible() {
            return Ok(record);
        }

        let count = read_count(buf, cx)?;
        for _ in 0..count {
            let raw = RawTaggedField::read(buf, cx)?;
            let Some((index, field)) = schema.tagged_field(raw.tag, version) else {
                trace!(
                    schema = schema.name(),
                    tag = raw.tag,
                    len = raw.data.len(),
                    "retaining unknown tagged field"
                );
                record.unknown.push(raw);
                continue;
            };

            // The payload must hold exactly one value of the field's type.
            let mut data = raw.data;
            let value = read_value(&mut data, field, cx)?;
            if data.has_remaining() {
                return Err(Error::ExtraData(data.remaining()));
            }
            record.values[index] = value;
        }
        Ok(record)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.schema, other.schema)
            && self.values == other.values
            && self.unknown == other.unknown
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.schema.name());
        for (field, value) in self.iter() {
            s.field(field.name(), value);
        }
        if !self.unknown.is_empty() {
            s.field("unknown_tagged_fields", &self.unknown);
        }
        s.finish()
    }
}

/// One entry of the tagged section being written.
enum Entry<'a> {
    Known(u32, &'static Field, &'a Value),
    Raw(&'a RawTaggedField),
}

impl Entry<'_> {
    fn tag(&self) -> u32 {
        match self {
            Self::Known(tag, ..) => *tag,
            Self::Raw(raw) => raw.tag,
        }
    }
}

fn mismatch(field: &Field, expected: &'static str) -> Error {
    Error::TypeMismatch {
        field: field.name(),
        expected,
    }
}

fn check_schema(field: &Field, schema: &'static Schema, record: &Record) -> Result<(), Error> {
    if ptr::eq(schema, record.schema) {
        Ok(())
    } else {
        Err(mismatch(field, schema.name()))
    }
}

fn write_value<B: BufMut>(
    buf: &mut B,
    field: &Field,
    value: &Value,
    cx: &Context,
) -> Result<(), Error> {
    let cx = &field.context(cx);
    if value.is_null() {
        return write_null(buf, field, cx);
    }
    match (field.ty(), value) {
        (FieldType::Scalar(scalar), value) => write_scalar(buf, field, *scalar, value, cx),
        (FieldType::Struct(schema), Value::Struct(record)) => {
            check_schema(field, *schema, record)?;
            if field.is_nullable(cx.version()) {
                buf.put_i8(PRESENT);
            }
            record.write_fields(buf, cx)
        }
        (FieldType::Array(scalar), Value::Array(items)) => write_array(buf, cx, items, |buf, item| {
            write_scalar(buf, field, *scalar, item, cx)
        }),
        (FieldType::StructArray(schema), Value::Array(items)) => {
            write_array(buf, cx, items, |buf, item| match item {
                Value::Struct(record) => {
                    check_schema(field, *schema, record)?;
                    record.write_fields(buf, cx)
                }
                _ => Err(mismatch(field, schema.name())),
            })
        }
        (ty, _) => Err(mismatch(field, ty.name())),
    }
}

fn write_null(buf: &mut impl BufMut, field: &Field, cx: &Context) -> Result<(), Error> {
    let null = || Error::NullValue(field.name(), cx.version());
    if !field.is_nullable(cx.version()) {
        return Err(null());
    }
    match field.ty() {
        FieldType::Scalar(Scalar::String) => String::write_null(buf, cx),
        FieldType::Scalar(Scalar::Bytes) => Bytes::write_null(buf, cx),
        FieldType::Scalar(_) => return Err(null()),
        FieldType::Struct(_) => buf.put_i8(ABSENT),
        FieldType::Array(_) | FieldType::StructArray(_) => write_null_array(buf, cx),
    }
    Ok(())
}

fn write_scalar(
    buf: &mut impl BufMut,
    field: &Field,
    scalar: Scalar,
    value: &Value,
    cx: &Context,
) -> Result<(), Error> {
    match (scalar, value) {
        (Scalar::Int8, Value::Int8(v)) => v.write(buf, cx),
        (Scalar::Int16, Value::Int16(v)) => v.write(buf, cx),
        (Scalar::Int32, Value::Int32(v)) => v.write(buf, cx),
        (Scalar::Int64, Value::Int64(v)) => v.write(buf, cx),
        (Scalar::Uint16, Value::Uint16(v)) => v.write(buf, cx),
        (Scalar::Uint32, Value::Uint32(v)) => v.write(buf, cx),
        (Scalar::Bool, Value::Bool(v)) => v.write(buf, cx),
        (Scalar::Float64, Value::Float64(v)) => v.write(buf, cx),
        (Scalar::Uuid, Value::Uuid(v)) => v.write(buf, cx),
        (Scalar::String, Value::String(v)) => v.write(buf, cx),
        (Scalar::Bytes, Value::Bytes(v)) => v.write(buf, cx),
        (scalar, _) => Err(mismatch(field, scalar.name())),
    }
}

// Sizes follow the value rather than the field type. A mismatched value fails in
// `write_value` before its size matters.
fn value_size(field: &Field, value: &Value, cx: &Context) -> usize {
    let cx = &field.context(cx);
    match value {
        Value::Null => match field.ty() {
            FieldType::Scalar(Scalar::String) => String::null_size(cx),
            FieldType::Scalar(Scalar::Bytes) => Bytes::null_size(cx),
            FieldType::Struct(_) => 1,
            FieldType::Array(_) | FieldType::StructArray(_) => array_prefix_size(cx, None),
            FieldType::Scalar(_) => 0,
        },
        Value::Struct(record) => {
            usize::from(field.is_nullable(cx.version())) + record.fields_size(cx)
        }
        Value::Array(items) => {
            array_prefix_size(cx, Some(items.len()))
                + items
                    .iter()
                    .map(|item| match item {
                        Value::Struct(record) => record.fields_size(cx),
                        item => scalar_size(item, cx),
                    })
                    .sum::<usize>()
        }
        value => scalar_size(value, cx),
    }
}

fn scalar_size(value: &Value, cx: &Context) -> usize {
    match value {
        Value::Int8(v) => v.encode_size(cx),
        Value::Int16(v) => v.encode_size(cx),
        Value::Int32(v) => v.encode_size(cx),
        Value::Int64(v) => v.encode_size(cx),
        Value::Uint16(v) => v.encode_size(cx),
        Value::Uint32(v) => v.encode_size(cx),
        Value::Bool(v) => v.encode_size(cx),
        Value::Float64(v) => v.encode_size(cx),
        Value::Uuid(v) => v.encode_size(cx),
        Value::String(v) => v.encode_size(cx),
        Value::Bytes(v) => v.encode_size(cx),
        Value::Null | Value::Struct(_) | Value::Array(_) => 0,
    }
}

fn read_value<B: Buf>(buf: &mut B, field: &Field, cx: &Context) -> Result<Value, Error> {
    let cx = &field.context(cx);
    let nullable = field.is_nullable(cx.version()) && field.ty().has_null();
    match field.ty() {
        FieldType::Scalar(Scalar::String) if nullable => {
            Ok(Option::<String>::read(buf, cx)?.into())
        }
        FieldType::Scalar(Scalar::Bytes) if nullable => Ok(Option::<Bytes>::read(buf, cx)?.into()),
        FieldType::Scalar(scalar) => read_scalar(buf, *scalar, cx),
        FieldType::Struct(schema) => {
            if nullable {
                match i8::read(buf, cx)? {
                    ABSENT => return Ok(Value::Null),
                    PRESENT => {}
                    marker => {
                        return Err(Error::InvalidData(
                            field.name(),
                            format!("invalid struct marker {marker}"),
                        ))
                    }
                }
            }
            Record::read_fields(*schema, buf, cx).map(Value::Struct)
        }
        FieldType::Array(scalar) => {
            let read_item = |buf: &mut B| read_scalar(buf, *scalar, cx);
            read_items(buf, cx, nullable, read_item)
        }
        FieldType::StructArray(schema) => {
            let read_item =
                |buf: &mut B| Record::read_fields(*schema, buf, cx).map(Value::Struct);
            read_items(buf, cx, nullable, read_item)
        }
    }
}

fn read_items<B: Buf>(
    buf: &mut B,
    cx: &Context,
    nullable: bool,
    read_item: impl FnMut(&mut B) -> Result<Value, Error>,
) -> Result<Value, Error> {
    if nullable {
        Ok(read_nullable_array(buf, cx, read_item)?.map_or(Value::Null, Value::Array))
    } else {
        read_array(buf, cx, read_item).map(Value::Array)
    }
}

fn read_scalar(buf: &mut impl Buf, scalar: Scalar, cx: &Context) -> Result<Value, Error> {
    Ok(match scalar {
        Scalar::Int8 => Value::Int8(i8::read(buf, cx)?),
        Scalar::Int16 => Value::Int16(i16::read(buf, cx)?),
        Scalar::Int32 => Value::Int32(i32::read(buf, cx)?),
        Scalar::Int64 => Value::Int64(i64::read(buf, cx)?),
        Scalar::Uint16 => Value::Uint16(u16::read(buf, cx)?),
        Scalar::Uint32 => Value::Uint32(u32::read(buf, cx)?),
        Scalar::Bool => Value::Bool(bool::read(buf, cx)?),
        Scalar::Float64 => Value::Float64(f64::read(buf, cx)?),
        Scalar::Uuid => Value::Uuid(Uuid::read(buf, cx)?),
        Scalar::String => Value::String(String::read(buf, cx)?),
        Scalar::Bytes => Value::Bytes(Bytes::read(buf, cx)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DefaultValue, Versions};
    use test_case::test_case;

    static PARTITION: Schema = Schema::nested(
        "Partition",
        &[
            Field::new("index", FieldType::INT32, Versions::ALL),
            Field::new("leader", FieldType::INT32, Versions::since(2))
                .with_default(DefaultValue::Int(-1)),
        ],
    );

    static LEADER: Schema = Schema::nested(
        "Leader",
        &[Field::new("id", FieldType::INT32, Versions::ALL)],
    );

    static TOPIC: Schema = Schema::new(
        "Topic",
        Versions::between(0, 9),
        Versions::since(6),
        &[
            Field::new("name", FieldType::STRING, Versions::ALL),
            Field::new("id", FieldType::UUID, Versions::since(4)),
            Field::new("throttle_ms", FieldType::INT32, Versions::between(3, 7)),
            Field::new("comment", FieldType::STRING, Versions::ALL)
                .nullable(Versions::since(1))
                .with_default(DefaultValue::Null),
            Field::new("replicas", FieldType::Array(Scalar::Int32), Versions::ALL),
            Field::new("partitions", FieldType::StructArray(&PARTITION), Versions::ALL),
            Field::new("leader", FieldType::Struct(&LEADER), Versions::since(5))
                .nullable(Versions::since(5))
                .with_default(DefaultValue::Null),
            Field::new("cluster_id", FieldType::STRING, Versions::since(6))
                .nullable(Versions::since(6))
                .tagged(0)
                .with_default(DefaultValue::Null),
            Field::new("epoch", FieldType::INT32, Versions::since(6))
                .tagged(1)
                .with_default(DefaultValue::Int(-1)),
        ],
    );

    fn sample() -> Record {
        let partition = Record::new(&PARTITION).with("index", 3i32).unwrap();
        Record::new(&TOPIC)
            .with("name", "orders")
            .unwrap()
            .with("id", Uuid::from_u128(0x1234))
            .unwrap()
            .with("throttle_ms", 50i32)
            .unwrap()
            .with("comment", "hot")
            .unwrap()
            .with("replicas", Value::array([1i32, 2, 3]))
            .unwrap()
            .with("partitions", Value::array([partition]))
            .unwrap()
    }

    /// Clears the fields that are not on the wire at `version`, as a decoder would see them.
    fn visible(record: &Record, version: Version) -> Record {
        let mut expected = record.clone();
        for (index, field) in TOPIC.fields().iter().enumerate() {
            if !field.applies(version) {
                expected.values[index] = Value::default_for(field);
            }
        }
        expected
    }

    #[test_case(0)]
    #[test_case(2)]
    #[test_case(3)]
    #[test_case(5)]
    #[test_case(6)]
    #[test_case(9)]
    fn test_round_trip(version: Version) {
        let record = sample();
        let encoded = record.encode(version).unwrap();
        assert_eq!(encoded.len(), record.encode_size(version).unwrap());
        let decoded = Record::decode(&TOPIC, encoded, version).unwrap();

        assert_eq!(decoded, visible(&record, version));
    }

    #[test]
    fn test_version_gated_field() {
        // `throttle_ms` exists in versions 3 through 7 only.
        let record = sample();
        let without = record.encode_size(2).unwrap();
        let with = record.encode_size(3).unwrap();
        assert_eq!(with, without + 4);
        assert_eq!(
            record.encode_size(7).unwrap(),
            record.encode_size(8).unwrap() + 4
        );

        let decoded = Record::decode(&TOPIC, record.encode(8).unwrap(), 8).unwrap();
        assert_eq!(decoded.get("throttle_ms"), Some(&Value::Int32(0)));
    }

    #[test]
    fn test_flexible_cutover() {
        let record = Record::new(&TOPIC).with("name", "ab").unwrap();
        let v5 = record.encode(5).unwrap();
        let v6 = record.encode(6).unwrap();

        // Legacy name: int16 length.
        assert_eq!(&v5[..4], &[0x00, 0x02, b'a', b'b']);
        // Compact name: varint of length + 1.
        assert_eq!(&v6[..3], &[0x03, b'a', b'b']);
        // Empty tagged section closes the flexible encoding.
        assert_eq!(v6.last(), Some(&0x00));
    }

    #[test]
    fn test_unsupported_version() {
        let record = sample();
        assert!(matches!(
            record.encode(10),
            Err(Error::UnsupportedVersion { version: 10, .. })
        ));
        assert!(matches!(
            Record::decode(&TOPIC, Bytes::new(), -1),
            Err(Error::UnsupportedVersion { version: -1, .. })
        ));
    }

    #[test]
    fn test_default_tagged_fields_omitted() {
        let record = Record::new(&TOPIC);
        let encoded = record.encode(6).unwrap();
        assert_eq!(encoded.last(), Some(&0x00));

        let record = record.with("epoch", 9i32).unwrap();
        let encoded = record.encode(6).unwrap();
        // count 1, tag 1, length 4, int32 9
        assert_eq!(
            &encoded[encoded.len() - 7..],
            &[0x01, 0x01, 0x04, 0x00, 0x00, 0x00, 0x09]
        );
        let decoded = Record::decode(&TOPIC, encoded, 6).unwrap();
        assert_eq!(decoded.get("epoch"), Some(&Value::Int32(9)));
    }

    #[test]
    fn test_unknown_tag_skipped() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();

        let body = Record::new(&TOPIC).encode(6).unwrap();
        let mut encoded = BytesMut::from(&body[..body.len() - 1]);
        // Unknown tag 5 (4 bytes) followed by known tag 0 (compact string "c1").
        encoded.extend_from_slice(&[0x02]);
        encoded.extend_from_slice(&[0x05, 0x04, 0xDE, 0xAD, 0xBE, 0xEF]);
        encoded.extend_from_slice(&[0x00, 0x03, 0x03, b'c', b'1']);

        let decoded = Record::decode(&TOPIC, encoded.clone().freeze(), 6).unwrap();
        assert_eq!(decoded.get("cluster_id"), Some(&Value::from("c1")));
        assert_eq!(
            decoded.unknown_tagged_fields(),
            &[RawTaggedField::new(5, vec![0xDE, 0xAD, 0xBE, 0xEF])]
        );

        // Unknown entries are written back in tag order.
        let reencoded = decoded.encode(6).unwrap();
        assert_eq!(
            &reencoded[reencoded.len() - 12..],
            &[0x02, 0x00, 0x03, 0x03, b'c', b'1', 0x05, 0x04, 0xDE, 0xAD, 0xBE, 0xEF]
        );
        assert_eq!(Record::decode(&TOPIC, reencoded, 6).unwrap(), decoded);
    }

    #[test]
    fn test_tagged_payload_must_be_consumed() {
        let body = Record::new(&TOPIC).encode(6).unwrap();
        let mut encoded = BytesMut::from(&body[..body.len() - 1]);
        // Tag 1 is an int32 but carries five bytes.
        encoded.extend_from_slice(&[0x01, 0x01, 0x05, 0x00, 0x00, 0x00, 0x01, 0xFF]);
        assert_eq!(
            Record::decode(&TOPIC, encoded.freeze(), 6),
            Err(Error::ExtraData(1))
        );
    }

    #[test]
    fn test_nullable_struct() {
        let record = Record::new(&TOPIC);
        let null = record.encode(5).unwrap();
        let present = record
            .clone()
            .with("leader", Record::new(&LEADER).with("id", 4i32).unwrap())
            .unwrap();
        let encoded = present.encode(5).unwrap();
        assert_eq!(encoded.len(), null.len() + 4);
        assert_eq!(&null[null.len() - 1..], &[0xFF]);
        assert_eq!(&encoded[encoded.len() - 5..], &[0x01, 0x00, 0x00, 0x00, 0x04]);
        assert_eq!(Record::decode(&TOPIC, encoded, 5).unwrap(), present);

        let mut invalid = BytesMut::from(&null[..]);
        let last = invalid.len() - 1;
        invalid[last] = 0x02;
        assert!(matches!(
            Record::decode(&TOPIC, invalid.freeze(), 5),
            Err(Error::InvalidData("leader", _))
        ));
    }

    #[test]
    fn test_null_rejected() {
        let record = Record::new(&TOPIC).with("name", Value::Null).unwrap();
        assert_eq!(record.encode(0), Err(Error::NullValue("name", 0)));

        // `comment` only becomes nullable at version 1.
        let record = Record::new(&TOPIC);
        assert_eq!(record.encode(0), Err(Error::NullValue("comment", 0)));
        assert!(record.encode(1).is_ok());
    }

    #[test]
    fn test_type_mismatch() {
        let record = Record::new(&TOPIC).with("name", 5i32).unwrap();
        assert_eq!(
            record.encode(0),
            Err(Error::TypeMismatch {
                field: "name",
                expected: "string"
            })
        );

        let record = Record::new(&TOPIC)
            .with("partitions", Value::array([Record::new(&LEADER)]))
            .unwrap();
        assert!(matches!(
            record.encode(1),
            Err(Error::TypeMismatch {
                field: "partitions",
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_field() {
        let mut record = Record::new(&TOPIC);
        assert_eq!(
            record.set("missing", 1i32),
            Err(Error::UnknownField("missing".to_string()))
        );
    }

    #[test]
    fn test_truncated() {
        let encoded = sample().encode(6).unwrap().freeze();
        for len in 0..encoded.len() {
            assert!(
                Record::decode(&TOPIC, encoded.slice(..len), 6).is_err(),
                "prefix of {len} bytes decoded"
            );
        }
    }

    static BROKERS: Schema = Schema::new(
        "Brokers",
        Versions::between(0, 1),
        Versions::since(1),
        &[Field::new("ids", FieldType::Array(Scalar::Int32), Versions::ALL)
            .nullable(Versions::ALL)
            .with_default(DefaultValue::Null)],
    );

    #[test_case(0, &[0xFF, 0xFF, 0xFF, 0xFF], &[0x00, 0x00, 0x00, 0x00]; "legacy")]
    #[test_case(1, &[0x00, 0x00], &[0x01, 0x00]; "flexible")]
    fn test_nullable_array(version: Version, null: &[u8], empty: &[u8]) {
        let record = Record::new(&BROKERS);
        assert_eq!(record.get("ids"), Some(&Value::Null));
        let encoded = record.encode(version).unwrap();
        assert_eq!(&encoded[..], null);
        assert_eq!(record.encode_size(version).unwrap(), null.len());
        assert_eq!(Record::decode(&BROKERS, encoded, version).unwrap(), record);

        let record = Record::new(&BROKERS)
            .with("ids", Value::Array(Vec::new()))
            .unwrap();
        let encoded = record.encode(version).unwrap();
        assert_eq!(&encoded[..], empty);
        assert_eq!(record.encode_size(version).unwrap(), empty.len());
        assert_eq!(Record::decode(&BROKERS, encoded, version).unwrap(), record);
    }

    #[test]
    fn test_trailing_bytes() {
        let mut encoded = sample().encode(4).unwrap();
        encoded.put_u8(0);
        assert_eq!(
            Record::decode(&TOPIC, encoded.freeze(), 4),
            Err(Error::ExtraData(1))
        );
    }

    #[test]
    fn test_limits() {
        let encoded = sample().encode(4).unwrap();
        let limits = Limits::DEFAULT.with_max_array_len(2);
        assert_eq!(
            Record::decode_with(&TOPIC, encoded, 4, limits),
            Err(Error::LengthExceeded(3, 2))
        );
    }

    #[test]
    fn test_push_unknown_colliding_with_known_tag() {
        let mut record = Record::new(&TOPIC);
        record.push_unknown_tagged_field(RawTaggedField::new(1, vec![0xAA]));
        record.push_unknown_tagged_field(RawTaggedField::new(7, vec![0xBB]));
        let encoded = record.encode(6).unwrap();
        assert_eq!(&encoded[encoded.len() - 4..], &[0x01, 0x07, 0x01, 0xBB]);
    }

    #[test]
    fn test_debug() {
        let record = Record::new(&LEADER).with("id", 1i32).unwrap();
        assert_eq!(format!("{record:?}"), "Leader { id: Int32(1) }");
    }
}
