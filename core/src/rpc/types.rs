//! rpc/types.rs
//! Envelope-level types shared by every service stub.
//!
//! Notes:
//! - `ApplicationException` is itself a record and goes through the generic
//!   codec like any other.
//! - A method's Result record has an optional `success` slot (id 0) and one
//!   slot per declared exception. Void methods have no `success` slot.

use std::fmt;

use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::codec::CodecError;
use crate::constants::application_exception_ids as ids;
use crate::protocol::{MessageType, ProtocolError};
use crate::record::{expect_type, FromRecord, IntoRecord, Record, RecordError, RecordType};
use crate::schema::{FieldSpec, RecordSchema, TypeDesc};

#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum ApplicationExceptionKind {
    Unknown               = ids::UNKNOWN,
    UnknownMethod         = ids::UNKNOWN_METHOD,
    InvalidMessageType    = ids::INVALID_MESSAGE_TYPE,
    WrongMethodName       = ids::WRONG_METHOD_NAME,
    BadSequenceId         = ids::BAD_SEQUENCE_ID,
    MissingResult         = ids::MISSING_RESULT,
    InternalError         = ids::INTERNAL_ERROR,
    ProtocolError         = ids::PROTOCOL_ERROR,
    InvalidTransform      = ids::INVALID_TRANSFORM,
    InvalidProtocol       = ids::INVALID_PROTOCOL,
    UnsupportedClientType = ids::UNSUPPORTED_CLIENT_TYPE,
}

impl fmt::Display for ApplicationExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub static APPLICATION_EXCEPTION: RecordSchema = RecordSchema {
    name: "TApplicationException",
    fields: &[
        FieldSpec::optional(1, "message", TypeDesc::String),
        FieldSpec::optional(2, "type", TypeDesc::I32),
    ],
};

/// Server-side failure reported in an EXCEPTION envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("application exception ({kind}): {message}")]
pub struct ApplicationException {
    pub message: String,
    pub kind: ApplicationExceptionKind,
}

impl ApplicationException {
    pub fn new(kind: ApplicationExceptionKind, message: impl Into<String>) -> Self {
        Self { message: message.into(), kind }
    }
}

impl RecordType for ApplicationException {
    fn schema() -> &'static RecordSchema {
        &APPLICATION_EXCEPTION
    }
}

impl FromRecord for ApplicationException {
    fn from_record(record: &Record) -> Result<Self, RecordError> {
        expect_type::<Self>(record)?;
        let message = record.get_string("message")?.unwrap_or_default();
        // Codes this client does not know collapse to Unknown.
        let kind = record
            .get_i32("type")?
            .and_then(|raw| ApplicationExceptionKind::try_from(raw).ok())
            .unwrap_or(ApplicationExceptionKind::Unknown);
        Ok(Self { message, kind })
    }
}

impl IntoRecord for ApplicationException {
    fn into_record(self) -> Record {
        let mut r = Record::empty(&APPLICATION_EXCEPTION);
        r.put_slot(0, self.message.into());
        r.put_slot(1, (self.kind as i32).into());
        r
    }
}

/// A declared exception slot that was set in a Result record.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{method} raised {field}: {payload}")]
pub struct RemoteException {
    pub method: &'static str,
    pub field: &'static str,
    pub field_id: i16,
    pub payload: Record,
}

impl RemoteException {
    /// Typed view of the exception payload.
    pub fn decode_as<T: FromRecord>(&self) -> Result<T, RecordError> {
        T::from_record(&self.payload)
    }

    pub fn type_name(&self) -> &'static str {
        self.payload.type_name()
    }
}

/// Outcome of a completed call: value or declared exception.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    Success(T),
    Failure(RemoteException),
}

impl<T> CallOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CallOutcome<U> {
        match self {
            CallOutcome::Success(v) => CallOutcome::Success(f(v)),
            CallOutcome::Failure(e) => CallOutcome::Failure(e),
        }
    }

    /// Fold a declared exception into `RpcError::Remote`.
    pub fn into_result(self) -> Result<T, RpcError> {
        match self {
            CallOutcome::Success(v) => Ok(v),
            CallOutcome::Failure(e) => Err(RpcError::Remote(e)),
        }
    }
}

/// Static description of one service method.
#[derive(Debug, Clone, Copy)]
pub struct MethodSpec {
    pub name: &'static str,
    pub args: &'static RecordSchema,
    pub result: &'static RecordSchema,
    pub oneway: bool,
}

impl MethodSpec {
    pub const fn new(name: &'static str, args: &'static RecordSchema, result: &'static RecordSchema) -> Self {
        Self { name, args, result, oneway: false }
    }

    /// Fire-and-forget method: no reply is read.
    pub fn oneway(name: &'static str, args: &'static RecordSchema) -> Self {
        Self { name, args, result: &ONEWAY_RESULT, oneway: true }
    }

    /// True when the Result record has no `success` slot.
    pub fn is_void(&self) -> bool {
        self.result.success_field().is_none()
    }
}

static ONEWAY_RESULT: RecordSchema = RecordSchema::new("oneway_result", &[]);

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Application(#[from] ApplicationException),

    #[error(transparent)]
    Remote(RemoteException),

    #[error("{method} failed: unknown result")]
    UnknownResult { method: &'static str },

    #[error("reply for {found} while waiting for {expected}")]
    WrongMethodName { expected: &'static str, found: String },

    #[error("reply sequence id {found}, expected {expected}")]
    BadSequenceId { expected: i32, found: i32 },

    #[error("{method}: unexpected {found:?} message")]
    UnexpectedMessageType { method: &'static str, found: MessageType },
}
