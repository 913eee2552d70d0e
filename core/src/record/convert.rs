//! record/convert.rs
//! Typed views over generic records.

use crate::record::types::{Record, RecordError};
use crate::schema::RecordSchema;

/// A Rust type that mirrors one record schema.
pub trait RecordType {
    fn schema() -> &'static RecordSchema;
}

pub trait FromRecord: RecordType + Sized {
    fn from_record(record: &Record) -> Result<Self, RecordError>;
}

pub trait IntoRecord: RecordType {
    fn into_record(self) -> Record;
}

/// Reject records of another type before field extraction.
pub fn expect_type<T: RecordType>(record: &Record) -> Result<(), RecordError> {
    let expected = T::schema().name;
    if record.type_name() != expected {
        return Err(RecordError::WrongRecordType { expected, found: record.type_name() });
    }
    Ok(())
}
