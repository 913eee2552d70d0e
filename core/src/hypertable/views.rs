//! hypertable/views.rs
//! Typed views over the generic Hypertable records.
//!
//! Conversions are lossless for every field the view models: an absent field
//! is `None` in the view and stays absent on the way back. Only `MutateSpec`,
//! whose fields are all required, uses plain values.

use bytes::Bytes;
use thiserror::Error;

use crate::hypertable::schemas::{CELL, CLIENT_EXCEPTION, HQL_RESULT, HQL_RESULT2, HQL_RESULT_AS_ARRAYS, KEY, MUTATE_SPEC};
use crate::hypertable::types::{KeyFlag, MutatorFlags};
use crate::record::{expect_type, FromRecord, IntoRecord, Record, RecordError, RecordType, Value};
use crate::schema::RecordSchema;

fn set_opt(record: &mut Record, name: &str, value: Option<impl Into<Value>>) {
    let slot = record.schema().field_by_name(name).map(|(idx, _)| idx);
    debug_assert!(slot.is_some(), "{} has no field {}", record.type_name(), name);
    if let (Some(idx), Some(v)) = (slot, value) {
        record.put_slot(idx, v.into());
    }
}

fn string_list(record: &Record, name: &'static str) -> Result<Option<Vec<String>>, RecordError> {
    record.get_list(name)?.map(|items| strings_of(record, name, items)).transpose()
}

fn strings_of(record: &Record, name: &'static str, items: &[Value]) -> Result<Vec<String>, RecordError> {
    items
        .iter()
        .map(|v| {
            v.as_str().map(str::to_owned).ok_or(RecordError::WrongType {
                record: record.type_name(),
                field: name,
                expected: "list<string>",
            })
        })
        .collect()
}

// --- Key -------------------------------------------------------------------------

/// Cell address: row, column and version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Key {
    pub row: Option<String>,
    pub column_family: Option<String>,
    pub column_qualifier: Option<String>,
    pub timestamp: Option<i64>,
    pub revision: Option<i64>,
    /// `None` leaves the broker default (`Insert`) in effect.
    pub flag: Option<KeyFlag>,
}

impl Key {
    pub fn new(row: impl Into<String>, column_family: impl Into<String>, column_qualifier: impl Into<String>) -> Self {
        Self {
            row: Some(row.into()),
            column_family: Some(column_family.into()),
            column_qualifier: Some(column_qualifier.into()),
            ..Self::default()
        }
    }

    pub fn with_flag(mut self, flag: KeyFlag) -> Self {
        self.flag = Some(flag);
        self
    }

    /// The flag the broker applies: `Insert` when none is set.
    pub fn effective_flag(&self) -> KeyFlag {
        self.flag.unwrap_or_default()
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl RecordType for Key {
    fn schema() -> &'static RecordSchema {
        &KEY
    }
}

impl FromRecord for Key {
    fn from_record(record: &Record) -> Result<Self, RecordError> {
        expect_type::<Self>(record)?;
        let flag = record
            .get_i32("flag")?
            .map(|raw| {
                KeyFlag::try_from(raw).map_err(|_| RecordError::OutOfRange {
                    record: KEY.name,
                    field: "flag",
                    value: raw as i64,
                })
            })
            .transpose()?;
        Ok(Self {
            row: record.get_string("row")?,
            column_family: record.get_string("column_family")?,
            column_qualifier: record.get_string("column_qualifier")?,
            timestamp: record.get_i64("timestamp")?,
            revision: record.get_i64("revision")?,
            flag,
        })
    }
}

impl IntoRecord for Key {
    fn into_record(self) -> Record {
        let mut r = Record::empty(&KEY);
        set_opt(&mut r, "row", self.row);
        set_opt(&mut r, "column_family", self.column_family);
        set_opt(&mut r, "column_qualifier", self.column_qualifier);
        set_opt(&mut r, "timestamp", self.timestamp);
        set_opt(&mut r, "revision", self.revision);
        set_opt(&mut r, "flag", self.flag.map(KeyFlag::to_i32));
        r
    }
}

// --- Cell ------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub key: Option<Key>,
    pub value: Option<Bytes>,
}

impl Cell {
    pub fn new(key: Key, value: impl Into<Bytes>) -> Self {
        Self { key: Some(key), value: Some(value.into()) }
    }

    /// Cell without a value, as used for deletes.
    pub fn without_value(key: Key) -> Self {
        Self { key: Some(key), value: None }
    }

    /// Value as UTF-8, if it is.
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_deref().and_then(|b| std::str::from_utf8(b).ok())
    }
}

impl RecordType for Cell {
    fn schema() -> &'static RecordSchema {
        &CELL
    }
}

impl FromRecord for Cell {
    fn from_record(record: &Record) -> Result<Self, RecordError> {
        expect_type::<Self>(record)?;
        let key = record.get_record("key")?.map(Key::from_record).transpose()?;
        Ok(Self { key, value: record.get_binary("value")? })
    }
}

impl IntoRecord for Cell {
    fn into_record(self) -> Record {
        let mut r = Record::empty(&CELL);
        set_opt(&mut r, "key", self.key.map(Key::into_record));
        set_opt(&mut r, "value", self.value);
        r
    }
}

// --- ClientException -------------------------------------------------------------

/// Error raised by the broker for a failed request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("client exception {}: {}", .code.unwrap_or_default(), .message.as_deref().unwrap_or_default())]
pub struct ClientException {
    pub code: Option<i32>,
    pub message: Option<String>,
}

impl ClientException {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code: Some(code), message: Some(message.into()) }
    }
}

impl RecordType for ClientException {
    fn schema() -> &'static RecordSchema {
        &CLIENT_EXCEPTION
    }
}

impl FromRecord for ClientException {
    fn from_record(record: &Record) -> Result<Self, RecordError> {
        expect_type::<Self>(record)?;
        Ok(Self {
            code: record.get_i32("code")?,
            message: record.get_string("message")?,
        })
    }
}

impl IntoRecord for ClientException {
    fn into_record(self) -> Record {
        let mut r = Record::empty(&CLIENT_EXCEPTION);
        set_opt(&mut r, "code", self.code);
        set_opt(&mut r, "message", self.message);
        r
    }
}

// --- MutateSpec ------------------------------------------------------------------

/// Shared-mutator parameters for `offer_cell_as_array`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutateSpec {
    pub appname: String,
    pub flush_interval: i32,
    pub flags: MutatorFlags,
}

impl Default for MutateSpec {
    fn default() -> Self {
        Self { appname: String::new(), flush_interval: 1000, flags: MutatorFlags::IGNORE_UNKNOWN_CFS }
    }
}

impl MutateSpec {
    pub fn new(appname: impl Into<String>, flush_interval: i32, flags: MutatorFlags) -> Self {
        Self { appname: appname.into(), flush_interval, flags }
    }
}

impl RecordType for MutateSpec {
    fn schema() -> &'static RecordSchema {
        &MUTATE_SPEC
    }
}

impl FromRecord for MutateSpec {
    fn from_record(record: &Record) -> Result<Self, RecordError> {
        expect_type::<Self>(record)?;
        let appname = record.require("appname", record.get_string("appname"))?;
        let flush_interval = record.require("flush_interval", record.get_i32("flush_interval"))?;
        let raw_flags = record.require("flags", record.get_i32("flags"))?;
        Ok(Self { appname, flush_interval, flags: MutatorFlags::from_bits_retain(raw_flags) })
    }
}

impl IntoRecord for MutateSpec {
    fn into_record(self) -> Record {
        let mut r = Record::empty(&MUTATE_SPEC);
        set_opt(&mut r, "appname", Some(self.appname));
        set_opt(&mut r, "flush_interval", Some(self.flush_interval));
        set_opt(&mut r, "flags", Some(self.flags.bits()));
        r
    }
}

// --- HqlResult -------------------------------------------------------------------

/// Result of an HQL statement with cells as `Cell` records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HqlResult {
    pub results: Option<Vec<String>>,
    pub cells: Option<Vec<Cell>>,
    pub scanner: Option<i64>,
    pub mutator: Option<i64>,
}

impl RecordType for HqlResult {
    fn schema() -> &'static RecordSchema {
        &HQL_RESULT
    }
}

impl FromRecord for HqlResult {
    fn from_record(record: &Record) -> Result<Self, RecordError> {
        expect_type::<Self>(record)?;
        let cells = record
            .get_list("cells")?
            .map(|items| {
                items
                    .iter()
                    .map(|v| match v.as_record() {
                        Some(r) => Cell::from_record(r),
                        None => Err(RecordError::WrongType { record: HQL_RESULT.name, field: "cells", expected: "list<Cell>" }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        Ok(Self {
            results: string_list(record, "results")?,
            cells,
            scanner: record.get_i64("scanner")?,
            mutator: record.get_i64("mutator")?,
        })
    }
}

impl IntoRecord for HqlResult {
    fn into_record(self) -> Record {
        let mut r = Record::empty(&HQL_RESULT);
        set_opt(&mut r, "results", self.results.map(Value::list));
        set_opt(&mut r, "cells", self.cells.map(|cells| Value::list(cells.into_iter().map(Cell::into_record))));
        set_opt(&mut r, "scanner", self.scanner);
        set_opt(&mut r, "mutator", self.mutator);
        r
    }
}

// --- HqlResult2 / HqlResultAsArrays ------------------------------------------------

/// Result of an HQL statement with each cell as a list of strings.
///
/// Reads both `HqlResult2` and `HqlResultAsArrays`; they share one shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HqlResultArrays {
    pub results: Option<Vec<String>>,
    pub cells: Option<Vec<Vec<String>>>,
    pub scanner: Option<i64>,
    pub mutator: Option<i64>,
}

impl RecordType for HqlResultArrays {
    fn schema() -> &'static RecordSchema {
        &HQL_RESULT_AS_ARRAYS
    }
}

impl FromRecord for HqlResultArrays {
    fn from_record(record: &Record) -> Result<Self, RecordError> {
        let name = record.type_name();
        if name != HQL_RESULT2.name && name != HQL_RESULT_AS_ARRAYS.name {
            return Err(RecordError::WrongRecordType { expected: HQL_RESULT_AS_ARRAYS.name, found: name });
        }
        let cells = record
            .get_list("cells")?
            .map(|rows| {
                rows.iter()
                    .map(|row| match row.as_list() {
                        Some(items) => strings_of(record, "cells", items),
                        None => Err(RecordError::WrongType { record: name, field: "cells", expected: "list<list<string>>" }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        Ok(Self {
            results: string_list(record, "results")?,
            cells,
            scanner: record.get_i64("scanner")?,
            mutator: record.get_i64("mutator")?,
        })
    }
}

impl IntoRecord for HqlResultArrays {
    fn into_record(self) -> Record {
        let mut r = Record::empty(&HQL_RESULT_AS_ARRAYS);
        set_opt(&mut r, "results", self.results.map(Value::list));
        set_opt(&mut r, "cells", self.cells.map(|rows| Value::list(rows.into_iter().map(Value::list))));
        set_opt(&mut r, "scanner", self.scanner);
        set_opt(&mut r, "mutator", self.mutator);
        r
    }
}
