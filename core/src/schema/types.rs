//! schema/types.rs
//! Static field tables describing each record type's wire shape.
//!
//! Notes:
//! - Schemas are `static` items; records and nested type descriptors hold
//!   `&'static` references to them, never copies.
//! - Field order in `RecordSchema::fields` is encode order only. Decode is
//!   driven by the id found on the wire.

use std::collections::BTreeSet;
use std::fmt;

use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::constants::{ttype_ids, SUCCESS_FIELD_ID};
use crate::record::Value;

/// Wire type tags of the binary protocol.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum WireType {
    Stop   = ttype_ids::STOP,
    Void   = ttype_ids::VOID,
    Bool   = ttype_ids::BOOL,
    Byte   = ttype_ids::BYTE,
    Double = ttype_ids::DOUBLE,
    I16    = ttype_ids::I16,
    I32    = ttype_ids::I32,
    I64    = ttype_ids::I64,
    String = ttype_ids::STRING,
    Struct = ttype_ids::STRUCT,
    Map    = ttype_ids::MAP,
    Set    = ttype_ids::SET,
    List   = ttype_ids::LIST,
}

impl WireType {
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn is_container(self) -> bool {
        matches!(self, WireType::Struct | WireType::Map | WireType::Set | WireType::List)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WireType::Stop => "stop",
            WireType::Void => "void",
            WireType::Bool => "bool",
            WireType::Byte => "byte",
            WireType::Double => "double",
            WireType::I16 => "i16",
            WireType::I32 => "i32",
            WireType::I64 => "i64",
            WireType::String => "string",
            WireType::Struct => "struct",
            WireType::Map => "map",
            WireType::Set => "set",
            WireType::List => "list",
        };
        f.write_str(name)
    }
}

/// Declared type of a field or collection element.
///
/// Composite variants carry the nested descriptor so decode and encode can
/// recurse without any per-record code.
#[derive(Debug, Clone, Copy)]
pub enum TypeDesc {
    Bool,
    Byte,
    I16,
    I32,
    I64,
    Double,
    String,
    Struct(&'static RecordSchema),
    List(&'static TypeDesc),
    Set(&'static TypeDesc),
    Map(&'static TypeDesc, &'static TypeDesc),
}

impl TypeDesc {
    pub const fn wire_type(&self) -> WireType {
        match self {
            TypeDesc::Bool => WireType::Bool,
            TypeDesc::Byte => WireType::Byte,
            TypeDesc::I16 => WireType::I16,
            TypeDesc::I32 => WireType::I32,
            TypeDesc::I64 => WireType::I64,
            TypeDesc::Double => WireType::Double,
            TypeDesc::String => WireType::String,
            TypeDesc::Struct(_) => WireType::Struct,
            TypeDesc::List(_) => WireType::List,
            TypeDesc::Set(_) => WireType::Set,
            TypeDesc::Map(_, _) => WireType::Map,
        }
    }
}

impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        use TypeDesc::*;
        match (self, other) {
            (Struct(a), Struct(b)) => a.name == b.name,
            (List(a), List(b)) | (Set(a), Set(b)) => a == b,
            (Map(ka, va), Map(kb, vb)) => ka == kb && va == vb,
            (a, b) => a.wire_type() == b.wire_type() && !a.wire_type().is_container(),
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Struct(s) => write!(f, "{}", s.name),
            TypeDesc::List(e) => write!(f, "list<{}>", e),
            TypeDesc::Set(e) => write!(f, "set<{}>", e),
            TypeDesc::Map(k, v) => write!(f, "map<{},{}>", k, v),
            scalar => write!(f, "{}", scalar.wire_type()),
        }
    }
}

/// In-memory default applied by `Record::new`.
///
/// Restricted to literals so schemas stay `static`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    Str(&'static str),
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Bool(v) => Value::Bool(v),
            DefaultValue::I16(v) => Value::I16(v),
            DefaultValue::I32(v) => Value::I32(v),
            DefaultValue::I64(v) => Value::I64(v),
            DefaultValue::Str(s) => Value::from(s),
        }
    }

    fn matches(self, ty: &TypeDesc) -> bool {
        matches!(
            (self, ty),
            (DefaultValue::Bool(_), TypeDesc::Bool)
                | (DefaultValue::I16(_), TypeDesc::I16)
                | (DefaultValue::I32(_), TypeDesc::I32)
                | (DefaultValue::I64(_), TypeDesc::I64)
                | (DefaultValue::Str(_), TypeDesc::String)
        )
    }
}

/// One row of a record's field table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub id: i16,
    pub name: &'static str,
    pub ty: TypeDesc,
    pub required: bool,
    pub default: Option<DefaultValue>,
}

impl FieldSpec {
    pub const fn optional(id: i16, name: &'static str, ty: TypeDesc) -> Self {
        Self { id, name, ty, required: false, default: None }
    }

    pub const fn required(id: i16, name: &'static str, ty: TypeDesc) -> Self {
        Self { id, name, ty, required: true, default: None }
    }

    pub const fn with_default(self, default: DefaultValue) -> Self {
        Self { default: Some(default), ..self }
    }

    #[inline]
    pub const fn wire_type(&self) -> WireType {
        self.ty.wire_type()
    }
}

/// Immutable description of a record type.
#[derive(Debug)]
pub struct RecordSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl RecordSchema {
    pub const fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { name, fields }
    }

    /// Slot index and spec for a wire field id.
    pub fn field_by_id(&self, id: i16) -> Option<(usize, &'static FieldSpec)> {
        self.fields.iter().enumerate().find(|(_, f)| f.id == id)
    }

    pub fn field_by_name(&self, name: &str) -> Option<(usize, &'static FieldSpec)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }

    /// The `success` slot of a Result record, if the method returns a value.
    pub fn success_field(&self) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.id == SUCCESS_FIELD_ID)
    }

    /// Named exception slots of a Result record, in declaration order.
    pub fn exception_fields(&self) -> impl Iterator<Item = (usize, &'static FieldSpec)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.id != SUCCESS_FIELD_ID)
    }

    /// Check the table and every nested struct table it references.
    pub fn validate(&'static self) -> Result<(), SchemaError> {
        let mut seen = BTreeSet::new();
        self.validate_inner(&mut seen)
    }

    fn validate_inner(&'static self, seen: &mut BTreeSet<&'static str>) -> Result<(), SchemaError> {
        if !seen.insert(self.name) {
            return Ok(());
        }

        let mut ids = BTreeSet::new();
        let mut names = BTreeSet::new();
        for f in self.fields {
            if !ids.insert(f.id) {
                return Err(SchemaError::DuplicateFieldId { record: self.name, id: f.id });
            }
            if !names.insert(f.name) {
                return Err(SchemaError::DuplicateFieldName { record: self.name, name: f.name });
            }
            if let Some(d) = f.default {
                if !d.matches(&f.ty) {
                    return Err(SchemaError::DefaultTypeMismatch { record: self.name, field: f.name });
                }
            }
            validate_type(&f.ty, seen)?;
        }
        Ok(())
    }

    /// Every struct schema reachable from this one, including itself.
    pub fn reachable(&'static self) -> Vec<&'static RecordSchema> {
        let mut out = Vec::new();
        collect_struct(self, &mut out);
        out
    }
}

fn validate_type(ty: &TypeDesc, seen: &mut BTreeSet<&'static str>) -> Result<(), SchemaError> {
    match ty {
        TypeDesc::Struct(s) => s.validate_inner(seen),
        TypeDesc::List(e) | TypeDesc::Set(e) => validate_type(e, seen),
        TypeDesc::Map(k, v) => {
            validate_type(k, seen)?;
            validate_type(v, seen)
        }
        _ => Ok(()),
    }
}

fn collect_struct(schema: &'static RecordSchema, out: &mut Vec<&'static RecordSchema>) {
    if out.iter().any(|s| s.name == schema.name) {
        return;
    }
    out.push(schema);
    for f in schema.fields {
        collect_type(&f.ty, out);
    }
}

fn collect_type(ty: &TypeDesc, out: &mut Vec<&'static RecordSchema>) {
    match ty {
        TypeDesc::Struct(s) => collect_struct(s, out),
        TypeDesc::List(e) | TypeDesc::Set(e) => collect_type(e, out),
        TypeDesc::Map(k, v) => {
            collect_type(k, out);
            collect_type(v, out);
        }
        _ => {}
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("record {record}: duplicate field id {id}")]
    DuplicateFieldId { record: &'static str, id: i16 },

    #[error("record {record}: duplicate field name {name}")]
    DuplicateFieldName { record: &'static str, name: &'static str },

    #[error("record {record}: default of field {field} does not match its type")]
    DefaultTypeMismatch { record: &'static str, field: &'static str },

    #[error("unknown record type: {name}")]
    UnknownRecordType { name: String },

    #[error("record type {name} registered twice with different tables")]
    ConflictingRecordType { name: &'static str },
}
