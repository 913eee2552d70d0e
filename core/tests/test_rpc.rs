// RPC envelopes and Result-record dispatch over in-memory streams.

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use hyperthrift_core::codec::{encode_record, from_bytes};
    use hyperthrift_core::hypertable::schemas::{
        CLIENT_EXCEPTION, DROP_TABLE_ARGS, DROP_TABLE_RESULT, HQL_QUERY_ARGS, HQL_QUERY_RESULT, HQL_RESULT,
    };
    use hyperthrift_core::hypertable::service::{DROP_TABLE, HQL_QUERY, OPEN_MUTATOR};
    use hyperthrift_core::hypertable::ClientException;
    use hyperthrift_core::protocol::{
        BinaryReader, BinaryWriter, MessageHeader, MessageType, WireReader, WireWriter,
    };
    use hyperthrift_core::record::{IntoRecord, Record, Value};
    use hyperthrift_core::rpc::{
        resolve_result, ApplicationException, ApplicationExceptionKind, CallOutcome, MethodSpec, RpcClient,
        RpcError,
    };

    type MemClient = RpcClient<BinaryReader<Cursor<Vec<u8>>>, BinaryWriter<Vec<u8>>>;

    fn envelope(name: &str, kind: MessageType, seqid: i32, body: &Record) -> Vec<u8> {
        let mut w = BinaryWriter::new(Vec::new());
        w.write_message_begin(&MessageHeader::new(name, kind, seqid)).unwrap();
        encode_record(body, &mut w).unwrap();
        w.write_message_end().unwrap();
        w.into_inner()
    }

    fn client_with_reply(reply: Vec<u8>) -> MemClient {
        RpcClient::new(BinaryReader::new(Cursor::new(reply)), BinaryWriter::new(Vec::new()))
    }

    fn query_args() -> Record {
        Record::new(&HQL_QUERY_ARGS).with("ns", 1i64).unwrap().with("command", "SELECT * FROM t").unwrap()
    }

    fn client_exception(code: i32, message: &str) -> Record {
        ClientException::new(code, message).into_record()
    }

    // # Sending

    #[test]
    fn send_call_writes_envelope_and_args() {
        let mut client = client_with_reply(Vec::new());
        let seqid = client.send_call(&HQL_QUERY, &query_args()).unwrap();
        assert_eq!(seqid, 1);

        let (_, writer) = client.into_parts();
        let bytes = writer.into_inner();
        let mut r = BinaryReader::new(Cursor::new(bytes));
        let header = r.read_message_begin().unwrap();
        assert_eq!(header, MessageHeader::new("hql_query", MessageType::Call, 1));

        let args = hyperthrift_core::codec::decode_record(&HQL_QUERY_ARGS, &mut r).unwrap();
        assert_eq!(args, query_args());
    }

    #[test]
    fn sequence_id_increments_per_call() {
        let mut client = client_with_reply(Vec::new());
        assert_eq!(client.send_call(&HQL_QUERY, &query_args()).unwrap(), 1);
        assert_eq!(client.send_call(&HQL_QUERY, &query_args()).unwrap(), 2);
        assert_eq!(client.sequence_id(), 2);
    }

    #[test]
    fn args_of_another_method_are_refused() {
        let mut client = client_with_reply(Vec::new());
        let err = client.send_call(&HQL_QUERY, &Record::new(&DROP_TABLE_ARGS)).unwrap_err();
        assert!(matches!(err, RpcError::Record(_)));
        assert_eq!(client.sequence_id(), 0);
    }

    // # Result dispatch

    #[test]
    fn success_slot_wins() {
        let result = Record::empty(&HQL_QUERY_RESULT)
            .with("success", Record::empty(&HQL_RESULT).with("scanner", 9i64).unwrap())
            .unwrap();
        let mut client = client_with_reply(envelope("hql_query", MessageType::Reply, 1, &result));

        match client.call(&HQL_QUERY, &query_args()).unwrap() {
            CallOutcome::Success(Some(Value::Struct(r))) => assert_eq!(r.get_i64("scanner").unwrap(), Some(9)),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(client.counters().calls_sent, 1);
        assert_eq!(client.counters().replies_received, 1);
    }

    #[test]
    fn exception_slot_becomes_typed_failure() {
        let result = Record::empty(&HQL_QUERY_RESULT)
            .with("e", client_exception(42, "table not found"))
            .unwrap();
        let mut client = client_with_reply(envelope("hql_query", MessageType::Reply, 1, &result));

        let outcome = client.call(&HQL_QUERY, &query_args()).unwrap();
        let CallOutcome::Failure(remote) = outcome else {
            panic!("expected a failure");
        };
        assert_eq!(remote.method, "hql_query");
        assert_eq!((remote.field, remote.field_id), ("e", 1));
        assert_eq!(remote.type_name(), "ClientException");
        assert_eq!(
            remote.decode_as::<ClientException>().unwrap(),
            ClientException::new(42, "table not found")
        );
        assert_eq!(client.counters().remote_failures, 1);
    }

    #[test]
    fn nothing_set_is_unknown_result() {
        let result = Record::empty(&HQL_QUERY_RESULT);
        let err = resolve_result(&HQL_QUERY, result).unwrap_err();
        assert!(matches!(err, RpcError::UnknownResult { method: "hql_query" }));
        assert_eq!(err.to_string(), "hql_query failed: unknown result");
    }

    #[test]
    fn void_method_with_nothing_set_succeeds() {
        let outcome = resolve_result(&DROP_TABLE, Record::empty(&DROP_TABLE_RESULT)).unwrap();
        assert_eq!(outcome, CallOutcome::Success(None));
    }

    #[test]
    fn void_method_still_reports_exceptions() {
        let result = Record::empty(&DROP_TABLE_RESULT).with("e", client_exception(1, "no")).unwrap();
        let outcome = resolve_result(&DROP_TABLE, result).unwrap();
        assert!(!outcome.is_success());
        assert!(matches!(outcome.into_result(), Err(RpcError::Remote(_))));
    }

    #[test]
    fn success_beats_exception_when_both_set() {
        let result = Record::empty(&HQL_QUERY_RESULT)
            .with("success", Record::empty(&HQL_RESULT))
            .unwrap()
            .with("e", client_exception(1, "ignored"))
            .unwrap();
        assert!(resolve_result(&HQL_QUERY, result).unwrap().is_success());
    }

    // # Envelope faults

    #[test]
    fn exception_envelope_is_application_error() {
        let body = ApplicationException::new(ApplicationExceptionKind::UnknownMethod, "no such method").into_record();
        let mut client = client_with_reply(envelope("hql_query", MessageType::Exception, 1, &body));

        match client.call(&HQL_QUERY, &query_args()) {
            Err(RpcError::Application(e)) => {
                assert_eq!(e.kind, ApplicationExceptionKind::UnknownMethod);
                assert_eq!(e.message, "no such method");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn unknown_application_exception_code_maps_to_unknown() {
        let body = Record::empty(&hyperthrift_core::rpc::APPLICATION_EXCEPTION)
            .with("message", "odd")
            .unwrap()
            .with("type", 99i32)
            .unwrap();
        let mut client = client_with_reply(envelope("hql_query", MessageType::Exception, 1, &body));
        let err = client.call(&HQL_QUERY, &query_args()).unwrap_err();
        assert!(matches!(err, RpcError::Application(ApplicationException { kind: ApplicationExceptionKind::Unknown, .. })));
    }

    #[test]
    fn reply_for_another_method_is_rejected_and_consumed() {
        let other = Record::empty(OPEN_MUTATOR.result).with("success", 5i64).unwrap();
        let good = Record::empty(&HQL_QUERY_RESULT).with("success", Record::empty(&HQL_RESULT)).unwrap();

        let mut reply = envelope("open_mutator", MessageType::Reply, 1, &other);
        reply.extend(envelope("hql_query", MessageType::Reply, 1, &good));
        let mut client = client_with_reply(reply);

        client.send_call(&HQL_QUERY, &query_args()).unwrap();
        let err = client.recv_reply(&HQL_QUERY).unwrap_err();
        assert!(matches!(err, RpcError::WrongMethodName { expected: "hql_query", ref found } if found == "open_mutator"));

        // The stray body was skipped, so the next envelope parses.
        let result = client.recv_reply(&HQL_QUERY).unwrap();
        assert!(result.is_set("success"));
    }

    #[test]
    fn stale_sequence_id_is_rejected() {
        let result = Record::empty(&HQL_QUERY_RESULT).with("success", Record::empty(&HQL_RESULT)).unwrap();
        let mut client = client_with_reply(envelope("hql_query", MessageType::Reply, 7, &result));
        let err = client.call(&HQL_QUERY, &query_args()).unwrap_err();
        assert!(matches!(err, RpcError::BadSequenceId { expected: 1, found: 7 }));
    }

    #[test]
    fn call_envelope_in_reply_position_is_rejected() {
        let result = Record::empty(&HQL_QUERY_RESULT);
        let mut client = client_with_reply(envelope("hql_query", MessageType::Call, 1, &result));
        let err = client.call(&HQL_QUERY, &query_args()).unwrap_err();
        assert!(matches!(err, RpcError::UnexpectedMessageType { found: MessageType::Call, .. }));
    }

    #[test]
    fn oneway_call_does_not_wait() {
        let method = MethodSpec::oneway("notify", &HQL_QUERY_ARGS);
        let mut client = client_with_reply(Vec::new());
        let outcome = client.call(&method, &Record::new(&HQL_QUERY_ARGS)).unwrap();
        assert_eq!(outcome, CallOutcome::Success(None));

        let (_, writer) = client.into_parts();
        let header = BinaryReader::new(Cursor::new(writer.into_inner())).read_message_begin().unwrap();
        assert_eq!(header.message_type, MessageType::Oneway);
    }

    #[test]
    fn client_exception_payload_round_trips_through_codec() {
        let record = client_exception(7, "x");
        let bytes = hyperthrift_core::codec::to_bytes(&record).unwrap();
        assert_eq!(from_bytes(&CLIENT_EXCEPTION, &bytes).unwrap(), record);
    }
}
