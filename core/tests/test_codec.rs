// Record codec: absence, defaults, unknown/mismatched fields, nesting and
// encode-time shape checks.

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::Bytes;
    use proptest::prelude::*;

    use hyperthrift_core::codec::{
        decode_record, decode_record_stats, encode_record, from_bytes, missing_required, to_bytes,
        validate_required, CodecError, DecodeStats,
    };
    use hyperthrift_core::hypertable::schemas::{
        CELL, DROP_TABLE_ARGS, HQL_RESULT, HQL_RESULT2, KEY, MUTATE_SPEC, OFFER_CELL_AS_ARRAY_ARGS, ROW_INTERVAL,
    };
    use hyperthrift_core::protocol::{BinaryReader, BinaryWriter, ListHeader, ProtocolError, ProtocolLimits, WireWriter};
    use hyperthrift_core::record::{Record, Value};
    use hyperthrift_core::schema::{FieldSpec, RecordSchema, TypeDesc, WireType};

    fn key(row: &str) -> Record {
        Record::empty(&KEY).with("row", row).unwrap()
    }

    // # Byte layout

    #[test]
    fn encodes_present_fields_only_and_reports_size() {
        let record = key("r");
        let mut w = BinaryWriter::new(Vec::new());
        let n = encode_record(&record, &mut w).unwrap();
        let bytes = w.into_inner();

        assert_eq!(bytes, vec![0x0b, 0x00, 0x01, 0, 0, 0, 1, b'r', 0x00]);
        assert_eq!(n, bytes.len());
    }

    #[test]
    fn empty_record_is_a_single_stop() {
        assert_eq!(to_bytes(&Record::empty(&KEY)).unwrap(), vec![0x00]);
    }

    #[test]
    fn fields_are_emitted_in_table_order() {
        let mut record = Record::empty(&KEY);
        record.set("timestamp", 5i64).unwrap();
        record.set("row", "a").unwrap();
        let bytes = to_bytes(&record).unwrap();

        // row (id 1) first, then timestamp (id 4)
        assert_eq!(&bytes[..3], &[0x0b, 0x00, 0x01]);
        assert_eq!(&bytes[8..11], &[0x0a, 0x00, 0x04]);
    }

    // # Absence vs default

    #[test]
    fn untouched_default_true_is_encoded() {
        let args = Record::new(&DROP_TABLE_ARGS);
        assert_eq!(args.get_bool("if_exists").unwrap(), Some(true));
        assert_eq!(to_bytes(&args).unwrap(), vec![0x02, 0x00, 0x03, 0x01, 0x00]);
    }

    #[test]
    fn cleared_default_is_not_encoded() {
        let mut args = Record::new(&DROP_TABLE_ARGS);
        assert_eq!(args.clear("if_exists").unwrap(), Some(Value::Bool(true)));
        assert_eq!(to_bytes(&args).unwrap(), vec![0x00]);
    }

    #[test]
    fn row_interval_inclusive_defaults() {
        let interval = Record::new(&ROW_INTERVAL);
        assert_eq!(interval.get_bool("start_inclusive").unwrap(), Some(true));
        assert_eq!(interval.get_bool("end_inclusive").unwrap(), Some(true));
        assert!(!interval.is_set("start_row"));
    }

    #[test]
    fn decode_does_not_invent_defaults() {
        let decoded = from_bytes(&KEY, &[0x00]).unwrap();
        assert_eq!(decoded.present_count(), 0);
        assert!(!decoded.is_set("flag"));
    }

    // # Round trips

    #[test]
    fn nested_record_round_trips() {
        let cell = Record::empty(&CELL)
            .with("key", Record::new(&KEY).with("row", "r1").unwrap().with("timestamp", 42i64).unwrap())
            .unwrap()
            .with("value", vec![0u8, 1, 2, 255])
            .unwrap();

        let decoded = from_bytes(&CELL, &to_bytes(&cell).unwrap()).unwrap();
        assert_eq!(decoded, cell);
        assert_eq!(decoded.get_record("key").unwrap().unwrap().get_i32("flag").unwrap(), Some(255));
    }

    #[test]
    fn list_of_lists_preserves_order() {
        let rows = vec![
            vec!["r1", "cf", "q", "v1"],
            vec![],
            vec!["r0", "cf", "", "v0"],
        ];
        let record = Record::empty(&HQL_RESULT2)
            .with("cells", Value::list(rows.iter().map(|row| Value::list(row.iter().copied()))))
            .unwrap();

        let decoded = from_bytes(&HQL_RESULT2, &to_bytes(&record).unwrap()).unwrap();
        let cells = decoded.get_list("cells").unwrap().unwrap();
        let got: Vec<Vec<&str>> = cells
            .iter()
            .map(|row| row.as_list().unwrap().iter().map(|v| v.as_str().unwrap()).collect())
            .collect();
        assert_eq!(got, rows);
    }

    // # Tolerance

    /// Key stream with an unknown field 99 (list of structs) before `row`.
    fn key_with_unknown_field() -> Vec<u8> {
        let mut w = BinaryWriter::new(Vec::new());
        w.write_field_begin("extra", WireType::List, 99).unwrap();
        w.write_list_begin(&ListHeader::new(WireType::Struct, 2)).unwrap();
        for _ in 0..2 {
            w.write_field_begin("x", WireType::String, 1).unwrap();
            w.write_string("ignored").unwrap();
            w.write_field_stop().unwrap();
        }
        w.write_field_begin("row", WireType::String, 1).unwrap();
        w.write_string("r").unwrap();
        w.write_field_stop().unwrap();
        w.into_inner()
    }

    #[test]
    fn unknown_field_is_skipped() {
        let bytes = key_with_unknown_field();
        let mut r = BinaryReader::new(Cursor::new(&bytes[..]));
        let (decoded, stats) = decode_record_stats(&KEY, &mut r).unwrap();

        assert_eq!(decoded, key("r"));
        assert_eq!(stats, DecodeStats { fields: 1, skipped: 1 });
    }

    #[test]
    fn mismatched_wire_type_is_skipped() {
        // timestamp (id 4) is i64 in the table but arrives as a string.
        let mut w = BinaryWriter::new(Vec::new());
        w.write_field_begin("timestamp", WireType::String, 4).unwrap();
        w.write_string("yesterday").unwrap();
        w.write_field_begin("row", WireType::String, 1).unwrap();
        w.write_string("r").unwrap();
        w.write_field_stop().unwrap();

        let decoded = from_bytes(&KEY, &w.into_inner()).unwrap();
        assert!(!decoded.is_set("timestamp"));
        assert_eq!(decoded.get_string("row").unwrap().as_deref(), Some("r"));
    }

    #[test]
    fn mismatched_element_type_drops_field_but_keeps_stream_aligned() {
        // results is list<string>; send list<i32>.
        let mut w = BinaryWriter::new(Vec::new());
        w.write_field_begin("results", WireType::List, 1).unwrap();
        w.write_list_begin(&ListHeader::new(WireType::I32, 2)).unwrap();
        w.write_i32(1).unwrap();
        w.write_i32(2).unwrap();
        w.write_field_begin("scanner", WireType::I64, 3).unwrap();
        w.write_i64(77).unwrap();
        w.write_field_stop().unwrap();

        let decoded = from_bytes(&HQL_RESULT, &w.into_inner()).unwrap();
        assert!(!decoded.is_set("results"));
        assert_eq!(decoded.get_i64("scanner").unwrap(), Some(77));
    }

    #[test]
    fn truncated_stream_is_a_protocol_fault() {
        let bytes = to_bytes(&key("row")).unwrap();
        let err = from_bytes(&KEY, &bytes[..bytes.len() - 2]).unwrap_err();
        assert!(matches!(err, CodecError::Protocol(ProtocolError::UnexpectedEof)));
    }

    #[test]
    fn deep_nesting_hits_recursion_limit() {
        static NODE_T: TypeDesc = TypeDesc::Struct(&NODE);
        static NODE: RecordSchema = RecordSchema {
            name: "Node",
            fields: &[FieldSpec::optional(1, "child", TypeDesc::List(&NODE_T))],
        };

        let mut node = Record::empty(&NODE);
        for _ in 0..10 {
            node = Record::empty(&NODE).with("child", Value::List(vec![node.into()])).unwrap();
        }
        let bytes = to_bytes(&node).unwrap();

        let limits = ProtocolLimits { recursion_limit: 8, ..ProtocolLimits::default() };
        let mut r = BinaryReader::with_limits(Cursor::new(&bytes[..]), limits);
        let err = decode_record(&NODE, &mut r).unwrap_err();
        assert!(matches!(err, CodecError::Protocol(ProtocolError::DepthLimit(8))));

        assert_eq!(from_bytes(&NODE, &bytes).unwrap(), node);
    }

    // # Encode shape checks

    #[test]
    fn bad_type_in_structure_stops_mid_record() {
        let cell = Record::empty(&CELL).with("key", "not a key").unwrap();
        let mut w = BinaryWriter::new(Vec::new());
        let err = encode_record(&cell, &mut w).unwrap_err();

        assert!(matches!(
            err,
            CodecError::BadType { record: "Cell", field: "key", found: WireType::String, .. }
        ));
        assert!(err.to_string().starts_with("bad type in structure"));
        // The field header went out before the value was checked.
        assert_eq!(w.into_inner(), vec![0x0c, 0x00, 0x01]);
    }

    #[test]
    fn wrong_nested_record_type_is_rejected() {
        let cell = Record::empty(&CELL).with("key", Record::empty(&CELL)).unwrap();
        let err = to_bytes(&cell).unwrap_err();
        assert!(matches!(err, CodecError::WrongRecord { expected: "Key", found: "Cell", .. }));
    }

    #[test]
    fn bad_list_element_is_rejected() {
        let record = Record::empty(&HQL_RESULT)
            .with("results", Value::List(vec!["ok".into(), Value::I32(3)]))
            .unwrap();
        assert!(matches!(
            to_bytes(&record),
            Err(CodecError::BadType { field: "results", found: WireType::I32, .. })
        ));
    }

    #[test]
    fn scalar_shape_mismatch_is_rejected() {
        let record = Record::empty(&KEY).with("timestamp", 5i32).unwrap();
        assert!(matches!(
            to_bytes(&record),
            Err(CodecError::BadType { field: "timestamp", expected: TypeDesc::I64, found: WireType::I32, .. })
        ));
    }

    // # Required fields

    #[test]
    fn required_fields_are_opt_in() {
        let mut spec = Record::empty(&MUTATE_SPEC);
        spec.set("appname", "loader").unwrap();

        // Codec does not care.
        let decoded = from_bytes(&MUTATE_SPEC, &to_bytes(&spec).unwrap()).unwrap();
        assert_eq!(missing_required(&decoded), vec!["flush_interval", "flags"]);

        let err = validate_required(&decoded).unwrap_err();
        assert_eq!(err.to_string(), "record MutateSpec: required fields not set: flush_interval, flags");

        assert!(validate_required(&Record::new(&MUTATE_SPEC)).is_ok());
    }

    #[test]
    fn required_check_reaches_nested_records() {
        let args = Record::empty(&OFFER_CELL_AS_ARRAY_ARGS)
            .with("mutate_spec", Record::empty(&MUTATE_SPEC))
            .unwrap();
        assert!(matches!(
            validate_required(&args),
            Err(CodecError::MissingRequired { record: "MutateSpec", .. })
        ));
    }

    // # Properties

    fn opt_string() -> impl Strategy<Value = Option<String>> {
        proptest::option::of(".{0,12}")
    }

    proptest! {
        #[test]
        fn prop_key_round_trip(
            row in opt_string(),
            family in opt_string(),
            qualifier in opt_string(),
            timestamp in proptest::option::of(any::<i64>()),
            flag in proptest::option::of(any::<i32>()),
        ) {
            let mut record = Record::empty(&KEY);
            if let Some(v) = row { record.set("row", v).unwrap(); }
            if let Some(v) = family { record.set("column_family", v).unwrap(); }
            if let Some(v) = qualifier { record.set("column_qualifier", v).unwrap(); }
            if let Some(v) = timestamp { record.set("timestamp", v).unwrap(); }
            if let Some(v) = flag { record.set("flag", v).unwrap(); }

            let bytes = to_bytes(&record).unwrap();
            prop_assert_eq!(from_bytes(&KEY, &bytes).unwrap(), record);
        }

        #[test]
        fn prop_cell_arrays_round_trip(
            results in proptest::collection::vec(".{0,8}", 0..4),
            cells in proptest::collection::vec(proptest::collection::vec(".{0,8}", 0..5), 0..5),
            scanner in proptest::option::of(any::<i64>()),
        ) {
            let mut record = Record::empty(&HQL_RESULT2);
            record.set("results", Value::list(results)).unwrap();
            record.set("cells", Value::list(cells.into_iter().map(Value::list))).unwrap();
            if let Some(v) = scanner { record.set("scanner", v).unwrap(); }

            let bytes = to_bytes(&record).unwrap();
            prop_assert_eq!(from_bytes(&HQL_RESULT2, &bytes).unwrap(), record);
        }

        #[test]
        fn prop_binary_values_survive(value in proptest::collection::vec(any::<u8>(), 0..64)) {
            let cell = Record::empty(&CELL).with("value", Bytes::from(value.clone())).unwrap();
            let decoded = from_bytes(&CELL, &to_bytes(&cell).unwrap()).unwrap();
            prop_assert_eq!(decoded.get_binary("value").unwrap(), Some(Bytes::from(value)));
        }
    }
}
