//! Field schemas.
//!
//! Responsibilities:
//! - Describe each record type as a static field table
//! - Describe nested element types for struct/list/set/map fields
//! - Validate tables and resolve record types by name
//!
//! Non-responsibilities:
//! - Holding values (see `record`)
//! - Reading or writing bytes (see `protocol`, `codec`)

pub mod types;
pub mod registry;

pub use types::{
    DefaultValue,
    FieldSpec,
    RecordSchema,
    SchemaError,
    TypeDesc,
    WireType,
};
pub use registry::SchemaRegistry;
