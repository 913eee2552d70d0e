//! RPC layer.
//!
//! Responsibilities:
//! - Wrap argument records in CALL envelopes
//! - Read reply envelopes and decode Result records
//! - Turn Result records into `CallOutcome`s
//!
//! Non-responsibilities:
//! - Sockets, framing, reconnects and timeouts belong to the caller's streams

pub mod types;
pub mod client;

pub use types::{
    ApplicationException,
    ApplicationExceptionKind,
    CallOutcome,
    MethodSpec,
    RemoteException,
    RpcError,
    APPLICATION_EXCEPTION,
};
pub use client::{resolve_result, RpcClient};
