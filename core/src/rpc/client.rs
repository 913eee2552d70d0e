//! rpc/client.rs
//!
//! Generic synchronous RPC client over a reader/writer pair.
//!
//! Design notes:
//! - One call in flight at a time; the sequence id is bumped per call and
//!   checked on the reply.
//! - Arguments and results are plain records. Service stubs (see
//!   `hypertable::client`) wrap these calls with typed signatures.
//! - A reply for another method or sequence id has its body skipped before
//!   the error is returned, so the stream stays aligned.

use std::io::{Read, Write};

use tracing::{debug, warn};

use crate::codec::{decode_record_with, encode_record_with};
use crate::config::ClientConfig;
use crate::protocol::{BinaryReader, BinaryWriter, MessageHeader, MessageType, WireReader, WireWriter};
use crate::record::{FromRecord, Record, RecordError, Value};
use crate::rpc::types::{ApplicationException, CallOutcome, MethodSpec, RemoteException, RpcError, APPLICATION_EXCEPTION};
use crate::schema::WireType;
use crate::telemetry::TelemetryCounters;

#[derive(Debug)]
pub struct RpcClient<R, W> {
    reader: R,
    writer: W,
    sequence_id: i32,
    counters: TelemetryCounters,
}

impl<R: Read, W: Write> RpcClient<BinaryReader<R>, BinaryWriter<W>> {
    /// Binary-protocol client over caller-supplied streams.
    pub fn from_io(input: R, output: W, config: &ClientConfig) -> Self {
        let reader = BinaryReader::with_limits(input, config.limits()).strict_read(config.strict_read);
        let writer = BinaryWriter::new(output).strict_write(config.strict_write);
        Self::new(reader, writer)
    }
}

impl<R: WireReader, W: WireWriter> RpcClient<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer, sequence_id: 0, counters: TelemetryCounters::default() }
    }

    /// Sequence id of the most recent call.
    pub fn sequence_id(&self) -> i32 {
        self.sequence_id
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Write a CALL (or ONEWAY) envelope carrying `args` and flush.
    ///
    /// Returns the sequence id used.
    pub fn send_call(&mut self, method: &MethodSpec, args: &Record) -> Result<i32, RpcError> {
        if args.type_name() != method.args.name {
            return Err(RecordError::WrongRecordType {
                expected: method.args.name,
                found: args.type_name(),
            }
            .into());
        }

        self.sequence_id = self.sequence_id.wrapping_add(1);
        let message_type = if method.oneway { MessageType::Oneway } else { MessageType::Call };
        let header = MessageHeader::new(method.name, message_type, self.sequence_id);

        let mut n = self.writer.write_message_begin(&header)?;
        n += encode_record_with(args, &mut self.writer, &mut self.counters)?;
        n += self.writer.write_message_end()?;
        self.writer.flush()?;
        self.counters.add_call();

        debug!(method = method.name, seqid = self.sequence_id, bytes = n, "call sent");
        Ok(self.sequence_id)
    }

    /// Read the reply envelope for `method` and decode its Result record.
    pub fn recv_reply(&mut self, method: &MethodSpec) -> Result<Record, RpcError> {
        let header = self.reader.read_message_begin()?;
        debug!(
            method = method.name,
            name = %header.name,
            seqid = header.sequence_id,
            kind = ?header.message_type,
            "reply received"
        );

        if header.message_type == MessageType::Exception {
            let record = decode_record_with(&APPLICATION_EXCEPTION, &mut self.reader, &mut self.counters)?;
            self.reader.read_message_end()?;
            self.counters.add_reply(false);
            return Err(ApplicationException::from_record(&record)?.into());
        }

        if header.message_type != MessageType::Reply {
            self.discard_body()?;
            warn!(method = method.name, kind = ?header.message_type, "unexpected message type");
            return Err(RpcError::UnexpectedMessageType { method: method.name, found: header.message_type });
        }

        if header.name != method.name {
            self.discard_body()?;
            warn!(expected = method.name, found = %header.name, "reply for another method");
            return Err(RpcError::WrongMethodName { expected: method.name, found: header.name });
        }

        if header.sequence_id != self.sequence_id {
            self.discard_body()?;
            warn!(
                method = method.name,
                expected = self.sequence_id,
                found = header.sequence_id,
                "sequence id mismatch"
            );
            return Err(RpcError::BadSequenceId { expected: self.sequence_id, found: header.sequence_id });
        }

        let result = decode_record_with(method.result, &mut self.reader, &mut self.counters)?;
        self.reader.read_message_end()?;
        Ok(result)
    }

    fn discard_body(&mut self) -> Result<(), RpcError> {
        self.reader.skip(WireType::Struct)?;
        self.reader.read_message_end()?;
        Ok(())
    }

    /// Map a decoded Result record to success, declared exception, or fault.
    pub fn resolve_result(&mut self, method: &MethodSpec, result: Record) -> Result<CallOutcome<Option<Value>>, RpcError> {
        let outcome = resolve_result(method, result);
        match &outcome {
            Ok(CallOutcome::Failure(_)) => self.counters.add_reply(true),
            Ok(CallOutcome::Success(_)) => self.counters.add_reply(false),
            Err(_) => self.counters.add_reply(false),
        }
        outcome
    }

    /// `send_call`, then `recv_reply` and `resolve_result` unless oneway.
    pub fn call(&mut self, method: &MethodSpec, args: &Record) -> Result<CallOutcome<Option<Value>>, RpcError> {
        self.send_call(method, args)?;
        if method.oneway {
            return Ok(CallOutcome::Success(None));
        }
        let result = self.recv_reply(method)?;
        self.resolve_result(method, result)
    }

    /// [`RpcClient::call`] with declared exceptions folded into `RpcError::Remote`.
    pub fn call_value(&mut self, method: &MethodSpec, args: &Record) -> Result<Option<Value>, RpcError> {
        self.call(method, args)?.into_result()
    }
}

/// Result-record dispatch, independent of any client state.
///
/// `success` wins when present; otherwise the first set exception slot in
/// declaration order. Void methods with nothing set succeed with `None`.
pub fn resolve_result(method: &MethodSpec, mut result: Record) -> Result<CallOutcome<Option<Value>>, RpcError> {
    let schema = result.schema();

    if let Some(success) = schema.success_field() {
        if let Some(value) = result.take(success.name) {
            return Ok(CallOutcome::Success(Some(value)));
        }
    }

    for (_, spec) in schema.exception_fields() {
        if let Some(payload) = result.take(spec.name) {
            let payload = match payload {
                Value::Struct(record) => record,
                other => {
                    warn!(method = method.name, field = spec.name, "exception slot holds {}", other.wire_type());
                    return Err(RpcError::UnknownResult { method: method.name });
                }
            };
            return Ok(CallOutcome::Failure(RemoteException {
                method: method.name,
                field: spec.name,
                field_id: spec.id,
                payload,
            }));
        }
    }

    if schema.success_field().is_none() {
        return Ok(CallOutcome::Success(None));
    }

    warn!(method = method.name, "unknown result");
    Err(RpcError::UnknownResult { method: method.name })
}
