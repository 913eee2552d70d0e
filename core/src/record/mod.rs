//! Record instances and typed views.

pub mod types;
pub mod convert;

pub use types::{Record, RecordError, Value};
pub use convert::{expect_type, FromRecord, IntoRecord, RecordType};
