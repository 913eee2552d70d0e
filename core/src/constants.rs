//! constants.rs
//! Wire-level identifiers and defaults shared by every layer.
//!
//! Tag and version values are fixed by the Thrift binary protocol and must
//! match byte-for-byte with any peer (ThriftBroker, Java/PHP/Python clients).

/// Wire type tags (field headers, list/set/map element tags).
pub mod ttype_ids {
    pub const STOP: u8   = 0;
    pub const VOID: u8   = 1;
    pub const BOOL: u8   = 2;
    pub const BYTE: u8   = 3;
    pub const DOUBLE: u8 = 4;
    pub const I16: u8    = 6;
    pub const I32: u8    = 8;
    pub const I64: u8    = 10;
    pub const STRING: u8 = 11;
    pub const STRUCT: u8 = 12;
    pub const MAP: u8    = 13;
    pub const SET: u8    = 14;
    pub const LIST: u8   = 15;
}

/// Message envelope types.
pub mod message_type_ids {
    pub const CALL: u8      = 1;
    pub const REPLY: u8     = 2;
    pub const EXCEPTION: u8 = 3;
    pub const ONEWAY: u8    = 4;
}

/// `TApplicationException` type codes.
pub mod application_exception_ids {
    pub const UNKNOWN: i32                 = 0;
    pub const UNKNOWN_METHOD: i32          = 1;
    pub const INVALID_MESSAGE_TYPE: i32    = 2;
    pub const WRONG_METHOD_NAME: i32       = 3;
    pub const BAD_SEQUENCE_ID: i32         = 4;
    pub const MISSING_RESULT: i32          = 5;
    pub const INTERNAL_ERROR: i32          = 6;
    pub const PROTOCOL_ERROR: i32          = 7;
    pub const INVALID_TRANSFORM: i32       = 8;
    pub const INVALID_PROTOCOL: i32        = 9;
    pub const UNSUPPORTED_CLIENT_TYPE: i32 = 10;
}

/// Strict binary protocol version word, OR-ed with the message type.
pub const VERSION_1: u32 = 0x8001_0000;
/// Mask selecting the version part of the first envelope word.
pub const VERSION_MASK: u32 = 0xffff_0000;
/// Mask selecting the message type part of the first envelope word.
pub const MESSAGE_TYPE_MASK: u32 = 0x0000_00ff;

/// Field id reserved for the `success` slot of a Result record.
pub const SUCCESS_FIELD_ID: i16 = 0;

/// Nesting depth at which decode/skip gives up.
pub const DEFAULT_RECURSION_LIMIT: usize = 64;
/// Upper bound on a single string/binary payload (64 MiB).
pub const DEFAULT_MAX_STRING_LEN: usize = 64 * 1024 * 1024;
/// Upper bound on list/set/map element counts.
pub const DEFAULT_MAX_CONTAINER_LEN: usize = 16 * 1024 * 1024;
