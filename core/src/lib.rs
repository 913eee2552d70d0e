//! hyperthrift-core
//!
//! Schema-driven Thrift record codec and Hypertable HQL client.
//! Synchronous, no I/O of its own beyond the streams it is handed.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;
pub mod telemetry;

// Record model and wire layers
pub mod schema;
pub mod record;
pub mod protocol;
pub mod codec;

// Services
pub mod rpc;
pub mod hypertable;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::codec::{decode_record, encode_record, from_bytes, to_bytes, validate_required, CodecError};
    pub use crate::config::ClientConfig;
    pub use crate::protocol::{BinaryReader, BinaryWriter, ProtocolError, WireReader, WireWriter};
    pub use crate::record::{FromRecord, IntoRecord, Record, RecordType, Value};
    pub use crate::rpc::{CallOutcome, MethodSpec, RpcClient, RpcError};
    pub use crate::schema::{FieldSpec, RecordSchema, SchemaRegistry, TypeDesc, WireType};
    pub use crate::types::ThriftError;
}
