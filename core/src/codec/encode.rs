//! codec/encode.rs
//!
//! Schema-driven record encoding.
//!
//! Design notes:
//! - Fields are emitted in table order; absent fields are never written.
//! - Every present value is checked against its declared type as it is
//!   written. A mismatch aborts with `BadType`; bytes already handed to the
//!   writer stay there.
//! - `list` and `set` declarations accept either sequence variant.

use tracing::trace;

use crate::codec::types::CodecError;
use crate::protocol::{BinaryWriter, ListHeader, MapHeader, WireWriter};
use crate::record::{Record, Value};
use crate::schema::{FieldSpec, TypeDesc};
use crate::telemetry::TelemetryCounters;

/// Encode `record` into `writer`, returning the number of bytes written.
pub fn encode_record<W: WireWriter + ?Sized>(record: &Record, writer: &mut W) -> Result<usize, CodecError> {
    write_record(record, writer)
}

/// [`encode_record`], accumulating into `counters`.
pub fn encode_record_with<W: WireWriter + ?Sized>(
    record: &Record,
    writer: &mut W,
    counters: &mut TelemetryCounters,
) -> Result<usize, CodecError> {
    let n = write_record(record, writer)?;
    counters.add_encoded(record.present_count(), n);
    Ok(n)
}

/// Encode a record into a fresh binary-protocol buffer.
pub fn to_bytes(record: &Record) -> Result<Vec<u8>, CodecError> {
    let mut writer = BinaryWriter::new(Vec::new());
    encode_record(record, &mut writer)?;
    Ok(writer.into_inner())
}

fn write_record<W: WireWriter + ?Sized>(record: &Record, w: &mut W) -> Result<usize, CodecError> {
    let schema = record.schema();
    let mut n = w.write_struct_begin(schema.name)?;

    for (spec, value) in record.present() {
        n += w.write_field_begin(spec.name, spec.wire_type(), spec.id)?;
        n += write_value(&spec.ty, value, w, schema.name, spec)?;
        n += w.write_field_end()?;
    }

    n += w.write_field_stop()?;
    n += w.write_struct_end()?;
    trace!(record = schema.name, bytes = n, "record encoded");
    Ok(n)
}

fn write_value<W: WireWriter + ?Sized>(
    ty: &TypeDesc,
    value: &Value,
    w: &mut W,
    record: &'static str,
    spec: &'static FieldSpec,
) -> Result<usize, CodecError> {
    let n = match (ty, value) {
        (TypeDesc::Bool, Value::Bool(v)) => w.write_bool(*v)?,
        (TypeDesc::Byte, Value::Byte(v)) => w.write_byte(*v)?,
        (TypeDesc::I16, Value::I16(v)) => w.write_i16(*v)?,
        (TypeDesc::I32, Value::I32(v)) => w.write_i32(*v)?,
        (TypeDesc::I64, Value::I64(v)) => w.write_i64(*v)?,
        (TypeDesc::Double, Value::Double(v)) => w.write_double(*v)?,
        (TypeDesc::String, Value::Binary(b)) => w.write_binary(b)?,
        (TypeDesc::Struct(expected), Value::Struct(nested)) => {
            if nested.type_name() != expected.name {
                return Err(CodecError::WrongRecord {
                    record,
                    field: spec.name,
                    expected: expected.name,
                    found: nested.type_name(),
                });
            }
            write_record(nested, w)?
        }
        (TypeDesc::List(elem), Value::List(items) | Value::Set(items)) => {
            let mut n = w.write_list_begin(&ListHeader::new(elem.wire_type(), items.len()))?;
            for item in items {
                n += write_value(elem, item, w, record, spec)?;
            }
            n + w.write_list_end()?
        }
        (TypeDesc::Set(elem), Value::Set(items) | Value::List(items)) => {
            let mut n = w.write_set_begin(&ListHeader::new(elem.wire_type(), items.len()))?;
            for item in items {
                n += write_value(elem, item, w, record, spec)?;
            }
            n + w.write_set_end()?
        }
        (TypeDesc::Map(key_ty, value_ty), Value::Map(entries)) => {
            let header = MapHeader::new(key_ty.wire_type(), value_ty.wire_type(), entries.len());
            let mut n = w.write_map_begin(&header)?;
            for (k, v) in entries {
                n += write_value(key_ty, k, w, record, spec)?;
                n += write_value(value_ty, v, w, record, spec)?;
            }
            n + w.write_map_end()?
        }
        (expected, found) => {
            return Err(CodecError::BadType {
                record,
                field: spec.name,
                expected: *expected,
                found: found.wire_type(),
            });
        }
    };
    Ok(n)
}
