//! Wire protocol.
//!
//! Responsibilities:
//! - Define the reader/writer primitives the codec is written against
//! - Implement them for the Thrift binary protocol
//! - Skip values of any wire type without a schema
//!
//! Non-responsibilities:
//! - Field tables and record semantics
//! - Framing and sockets; callers hand in any `Read`/`Write`

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{
    FieldHeader,
    ListHeader,
    MapHeader,
    MessageHeader,
    MessageType,
    ProtocolError,
    ProtocolLimits,
    SizeKind,
    WireReader,
    WireWriter,
};
pub use encode::BinaryWriter;
pub use decode::BinaryReader;
