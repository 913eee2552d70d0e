//! codec/validate.rs
//!
//! Opt-in required-field validation, run after decode or before encode.
//! The codec itself never enforces `required`.

use crate::codec::types::CodecError;
use crate::record::{Record, Value};

/// Names of required fields that are absent on `record` itself.
pub fn missing_required(record: &Record) -> Vec<&'static str> {
    record
        .schema()
        .fields
        .iter()
        .filter(|f| f.required && !record.is_set(f.name))
        .map(|f| f.name)
        .collect()
}

/// Check `record` and every nested record it holds.
///
/// Reports the outermost record that is missing something.
pub fn validate_required(record: &Record) -> Result<(), CodecError> {
    let missing = missing_required(record);
    if !missing.is_empty() {
        return Err(CodecError::MissingRequired { record: record.type_name(), fields: missing });
    }
    for (_, value) in record.present() {
        validate_value(value)?;
    }
    Ok(())
}

fn validate_value(value: &Value) -> Result<(), CodecError> {
    match value {
        Value::Struct(nested) => validate_required(nested),
        Value::List(items) | Value::Set(items) => items.iter().try_for_each(validate_value),
        Value::Map(entries) => entries.iter().try_for_each(|(k, v)| {
            validate_value(k)?;
            validate_value(v)
        }),
        _ => Ok(()),
    }
}
