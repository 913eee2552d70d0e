//! record/types.rs
//! Record instances: one presence-tagged slot per schema field.
//!
//! Notes:
//! - A slot is `None` when the field is absent. Absence is never encoded,
//!   which is how "not set" stays distinct from zero, false and empty.
//! - Slots are positional: `slots[i]` belongs to `schema.fields[i]`.
//! - `set` does not type-check. A value whose shape does not match the
//!   declared type is rejected when the record is encoded.

use std::fmt;

use bytes::Bytes;
use thiserror::Error;

use crate::schema::{FieldSpec, RecordSchema, WireType};
use crate::utils::fmt_bytes;

/// A decoded or to-be-encoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Double(f64),
    /// Thrift `string` and `binary` share one wire representation.
    Binary(Bytes),
    Struct(Record),
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Wire type this value would be written as.
    pub fn wire_type(&self) -> WireType {
        match self {
            Value::Bool(_) => WireType::Bool,
            Value::Byte(_) => WireType::Byte,
            Value::I16(_) => WireType::I16,
            Value::I32(_) => WireType::I32,
            Value::I64(_) => WireType::I64,
            Value::Double(_) => WireType::Double,
            Value::Binary(_) => WireType::String,
            Value::Struct(_) => WireType::Struct,
            Value::List(_) => WireType::List,
            Value::Set(_) => WireType::Set,
            Value::Map(_) => WireType::Map,
        }
    }

    /// Build a list value from anything convertible into values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Value::I16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// UTF-8 view of a string value.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Struct(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self { Value::Bool(v) }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self { Value::Byte(v) }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self { Value::I16(v) }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self { Value::I32(v) }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self { Value::I64(v) }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self { Value::Double(v) }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self { Value::Binary(Bytes::copy_from_slice(v.as_bytes())) }
}

impl From<String> for Value {
    fn from(v: String) -> Self { Value::Binary(Bytes::from(v)) }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self { Value::Binary(Bytes::from(v)) }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self { Value::Binary(v) }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self { Value::Struct(v) }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Binary(b) => match std::str::from_utf8(b) {
                Ok(s) => write!(f, "{:?}", s),
                Err(_) => f.write_str(&fmt_bytes(b)),
            },
            Value::Struct(r) => write!(f, "{}", r),
            Value::List(items) | Value::Set(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// An instance of a record type.
#[derive(Clone)]
pub struct Record {
    schema: &'static RecordSchema,
    slots: Vec<Option<Value>>,
}

impl Record {
    /// Instance with declared in-memory defaults applied.
    pub fn new(schema: &'static RecordSchema) -> Self {
        let slots = schema
            .fields
            .iter()
            .map(|f| f.default.map(|d| d.to_value()))
            .collect();
        Self { schema, slots }
    }

    /// Instance with every slot absent, defaults included.
    pub fn empty(schema: &'static RecordSchema) -> Self {
        Self { schema, slots: vec![None; schema.fields.len()] }
    }

    #[inline]
    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.schema.name
    }

    fn index_of(&self, name: &str) -> Result<usize, RecordError> {
        self.schema
            .field_by_name(name)
            .map(|(idx, _)| idx)
            .ok_or_else(|| RecordError::UnknownField {
                record: self.schema.name,
                field: name.to_string(),
            })
    }

    fn index_of_id(&self, id: i16) -> Result<usize, RecordError> {
        self.schema
            .field_by_id(id)
            .map(|(idx, _)| idx)
            .ok_or(RecordError::UnknownFieldId { record: self.schema.name, id })
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        let idx = self.index_of(name)?;
        self.slots[idx] = Some(value.into());
        Ok(())
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, RecordError> {
        self.set(name, value)?;
        Ok(self)
    }

    pub fn set_by_id(&mut self, id: i16, value: impl Into<Value>) -> Result<(), RecordError> {
        let idx = self.index_of_id(id)?;
        self.slots[idx] = Some(value.into());
        Ok(())
    }

    /// Make the field absent, returning what it held.
    pub fn clear(&mut self, name: &str) -> Result<Option<Value>, RecordError> {
        let idx = self.index_of(name)?;
        Ok(self.slots[idx].take())
    }

    /// Move a value out, leaving the field absent.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.clear(name).ok().flatten()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let idx = self.index_of(name).ok()?;
        self.slots[idx].as_ref()
    }

    pub fn get_by_id(&self, id: i16) -> Option<&Value> {
        let idx = self.index_of_id(id).ok()?;
        self.slots[idx].as_ref()
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub(crate) fn put_slot(&mut self, idx: usize, value: Value) {
        self.slots[idx] = Some(value);
    }

    /// Present fields in declaration order.
    pub fn present(&self) -> impl Iterator<Item = (&'static FieldSpec, &Value)> + '_ {
        self.schema
            .fields
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(spec, slot)| slot.as_ref().map(|v| (spec, v)))
    }

    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    // --- typed accessors -----------------------------------------------------
    // Ok(None): absent. Err(WrongType): present with another shape.

    fn typed<'a, T>(
        &'a self,
        name: &str,
        expected: &'static str,
        pick: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, RecordError> {
        let idx = self.index_of(name)?;
        match self.slots[idx].as_ref() {
            None => Ok(None),
            Some(v) => pick(v).map(Some).ok_or(RecordError::WrongType {
                record: self.schema.name,
                field: self.schema.fields[idx].name,
                expected,
            }),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, RecordError> {
        self.typed(name, "bool", Value::as_bool)
    }

    pub fn get_i16(&self, name: &str) -> Result<Option<i16>, RecordError> {
        self.typed(name, "i16", Value::as_i16)
    }

    pub fn get_i32(&self, name: &str) -> Result<Option<i32>, RecordError> {
        self.typed(name, "i32", Value::as_i32)
    }

    pub fn get_i64(&self, name: &str) -> Result<Option<i64>, RecordError> {
        self.typed(name, "i64", Value::as_i64)
    }

    pub fn get_binary(&self, name: &str) -> Result<Option<Bytes>, RecordError> {
        self.typed(name, "binary", |v| v.as_bytes().cloned())
    }

    pub fn get_string(&self, name: &str) -> Result<Option<String>, RecordError> {
        self.typed(name, "utf-8 string", |v| v.as_str().map(str::to_owned))
    }

    pub fn get_record(&self, name: &str) -> Result<Option<&Record>, RecordError> {
        self.typed(name, "struct", Value::as_record)
    }

    pub fn get_list(&self, name: &str) -> Result<Option<&[Value]>, RecordError> {
        self.typed(name, "list", Value::as_list)
    }

    /// Like `get_*` but absence is an error.
    pub fn require<T>(&self, name: &str, found: Result<Option<T>, RecordError>) -> Result<T, RecordError> {
        found?.ok_or_else(|| RecordError::Missing {
            record: self.schema.name,
            field: self
                .schema
                .field_by_name(name)
                .map(|(_, f)| f.name)
                .unwrap_or("?"),
        })
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name == other.schema.name && self.slots == other.slots
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.schema.name);
        for (spec, value) in self.present() {
            s.field(spec.name, value);
        }
        s.finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.schema.name)?;
        for (i, (spec, value)) in self.present().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", spec.name, value)?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecordError {
    #[error("record {record} has no field named {field}")]
    UnknownField { record: &'static str, field: String },

    #[error("record {record} has no field with id {id}")]
    UnknownFieldId { record: &'static str, id: i16 },

    #[error("record {record}: field {field} is not set")]
    Missing { record: &'static str, field: &'static str },

    #[error("record {record}: field {field} is not a {expected}")]
    WrongType { record: &'static str, field: &'static str, expected: &'static str },

    #[error("expected a {expected} record, got {found}")]
    WrongRecordType { expected: &'static str, found: &'static str },

    #[error("record {record}: field {field} holds out-of-range value {value}")]
    OutOfRange { record: &'static str, field: &'static str, value: i64 },
}
