// Binary protocol primitives: exact byte layout, envelope forms, limits and
// schema-free skipping.

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use hyperthrift_core::protocol::{
        BinaryReader, BinaryWriter, ListHeader, MapHeader, MessageHeader, MessageType, ProtocolError,
        ProtocolLimits, SizeKind, WireReader, WireWriter,
    };
    use hyperthrift_core::schema::WireType;

    fn reader(bytes: &[u8]) -> BinaryReader<Cursor<&[u8]>> {
        BinaryReader::new(Cursor::new(bytes))
    }

    fn limited(bytes: &[u8], limits: ProtocolLimits) -> BinaryReader<Cursor<&[u8]>> {
        BinaryReader::with_limits(Cursor::new(bytes), limits)
    }

    // # Scalars

    #[test]
    fn scalars_are_big_endian() {
        let mut w = BinaryWriter::new(Vec::new());
        assert_eq!(w.write_i16(0x0102).unwrap(), 2);
        assert_eq!(w.write_i32(-2).unwrap(), 4);
        assert_eq!(w.write_i64(1).unwrap(), 8);
        assert_eq!(w.write_string("hi").unwrap(), 6);
        assert_eq!(w.bytes_written(), 20);

        let bytes = w.into_inner();
        assert_eq!(
            bytes,
            vec![
                0x01, 0x02,
                0xff, 0xff, 0xff, 0xfe,
                0, 0, 0, 0, 0, 0, 0, 1,
                0, 0, 0, 2, b'h', b'i',
            ]
        );

        let mut r = reader(&bytes);
        assert_eq!(r.read_i16().unwrap(), 0x0102);
        assert_eq!(r.read_i32().unwrap(), -2);
        assert_eq!(r.read_i64().unwrap(), 1);
        assert_eq!(r.read_string().unwrap(), "hi");
        assert_eq!(r.bytes_read(), 20);
    }

    #[test]
    fn any_nonzero_byte_reads_as_true() {
        let mut r = reader(&[0x07, 0x00]);
        assert!(r.read_bool().unwrap());
        assert!(!r.read_bool().unwrap());
    }

    #[test]
    fn double_round_trips_bit_exact() {
        let mut w = BinaryWriter::new(Vec::new());
        w.write_double(-1.5).unwrap();
        let bytes = w.into_inner();
        assert_eq!(bytes, (-1.5f64).to_be_bytes().to_vec());
        assert_eq!(reader(&bytes).read_double().unwrap(), -1.5);
    }

    #[test]
    fn field_and_container_headers() {
        let mut w = BinaryWriter::new(Vec::new());
        w.write_field_begin("cells", WireType::List, 2).unwrap();
        w.write_list_begin(&ListHeader::new(WireType::String, 3)).unwrap();
        w.write_map_begin(&MapHeader::new(WireType::I32, WireType::Struct, 1)).unwrap();
        w.write_field_stop().unwrap();
        let bytes = w.into_inner();
        assert_eq!(
            bytes,
            vec![
                0x0f, 0x00, 0x02,
                0x0b, 0, 0, 0, 3,
                0x08, 0x0c, 0, 0, 0, 1,
                0x00,
            ]
        );

        let mut r = reader(&bytes);
        let field = r.read_field_begin().unwrap();
        assert_eq!((field.wire_type, field.id), (WireType::List, 2));
        assert_eq!(r.read_list_begin().unwrap(), ListHeader::new(WireType::String, 3));
        assert_eq!(r.read_map_begin().unwrap(), MapHeader::new(WireType::I32, WireType::Struct, 1));
        assert!(r.read_field_begin().unwrap().is_stop());
    }

    // # Envelopes

    #[test]
    fn strict_message_header_layout() {
        let mut w = BinaryWriter::new(Vec::new());
        let n = w.write_message_begin(&MessageHeader::new("ping", MessageType::Call, 7)).unwrap();
        assert_eq!(n, 16);
        let bytes = w.into_inner();
        assert_eq!(
            bytes,
            vec![0x80, 0x01, 0x00, 0x01, 0, 0, 0, 4, b'p', b'i', b'n', b'g', 0, 0, 0, 7]
        );

        let header = reader(&bytes).read_message_begin().unwrap();
        assert_eq!(header, MessageHeader::new("ping", MessageType::Call, 7));
    }

    #[test]
    fn non_strict_header_is_accepted_unless_strict_read() {
        let mut w = BinaryWriter::new(Vec::new()).strict_write(false);
        w.write_message_begin(&MessageHeader::new("ping", MessageType::Reply, 3)).unwrap();
        let bytes = w.into_inner();
        assert_eq!(bytes, vec![0, 0, 0, 4, b'p', b'i', b'n', b'g', 0x02, 0, 0, 0, 3]);

        let header = reader(&bytes).read_message_begin().unwrap();
        assert_eq!(header, MessageHeader::new("ping", MessageType::Reply, 3));

        let mut strict = reader(&bytes).strict_read(true);
        assert!(matches!(strict.read_message_begin(), Err(ProtocolError::MissingVersion)));
    }

    #[test]
    fn wrong_version_word_is_rejected() {
        let bytes = [0x80, 0x02, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            reader(&bytes).read_message_begin(),
            Err(ProtocolError::BadVersion(0x8002_0001))
        ));
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        let bytes = [0x80, 0x01, 0x00, 0x09, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            reader(&bytes).read_message_begin(),
            Err(ProtocolError::InvalidMessageType(9))
        ));
    }

    // # Faults

    #[test]
    fn truncated_input_is_unexpected_eof() {
        assert!(matches!(reader(&[0, 1]).read_i32(), Err(ProtocolError::UnexpectedEof)));
        assert!(matches!(reader(&[0, 0, 0, 5, b'a']).read_binary(), Err(ProtocolError::UnexpectedEof)));
    }

    #[test]
    fn large_declared_length_on_short_stream_is_eof() {
        // Just under the 64 MiB default limit, followed by two bytes.
        let mut r = reader(&[0x03, 0xff, 0xff, 0xff, b'a', b'b']);
        assert!(matches!(r.read_binary(), Err(ProtocolError::UnexpectedEof)));
        assert_eq!(r.bytes_read(), 6);
    }

    #[test]
    fn negative_length_is_a_fault() {
        assert!(matches!(
            reader(&[0xff, 0xff, 0xff, 0xff]).read_binary(),
            Err(ProtocolError::NegativeSize(-1))
        ));
    }

    #[test]
    fn limits_apply_before_allocation() {
        let limits = ProtocolLimits { max_string_len: 4, max_container_len: 3, ..ProtocolLimits::default() };

        let err = limited(&[0, 0, 0, 5], limits).read_binary().unwrap_err();
        assert!(matches!(err, ProtocolError::SizeLimit { kind: SizeKind::String, size: 5, limit: 4 }));

        let err = limited(&[0x08, 0, 0, 0, 10], limits).read_list_begin().unwrap_err();
        assert!(matches!(err, ProtocolError::SizeLimit { kind: SizeKind::Container, size: 10, limit: 3 }));
    }

    #[test]
    fn unknown_tag_names_itself_in_hex() {
        let err = reader(&[0x05, 0x00, 0x01]).read_field_begin().unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidWireType(5)));
        assert_eq!(err.to_string(), "invalid wire type tag: 0x5");
    }

    // # Skip

    /// struct { 1: list<struct { 1: i32 }>, 2: map<string, i64>, 3: double }
    fn nested_value(w: &mut BinaryWriter<Vec<u8>>) {
        w.write_struct_begin("Outer").unwrap();

        w.write_field_begin("items", WireType::List, 1).unwrap();
        w.write_list_begin(&ListHeader::new(WireType::Struct, 2)).unwrap();
        for v in [10, 20] {
            w.write_field_begin("v", WireType::I32, 1).unwrap();
            w.write_i32(v).unwrap();
            w.write_field_stop().unwrap();
        }

        w.write_field_begin("index", WireType::Map, 2).unwrap();
        w.write_map_begin(&MapHeader::new(WireType::String, WireType::I64, 1)).unwrap();
        w.write_string("k").unwrap();
        w.write_i64(99).unwrap();

        w.write_field_begin("ratio", WireType::Double, 3).unwrap();
        w.write_double(0.25).unwrap();

        w.write_field_stop().unwrap();
        w.write_struct_end().unwrap();
    }

    #[test]
    fn skip_consumes_exactly_one_value() {
        let mut w = BinaryWriter::new(Vec::new());
        nested_value(&mut w);
        w.write_i32(0x5a5a).unwrap();
        let bytes = w.into_inner();

        let mut r = reader(&bytes);
        r.skip(WireType::Struct).unwrap();
        assert_eq!(r.read_i32().unwrap(), 0x5a5a);
        assert_eq!(r.bytes_read(), bytes.len() as u64);
    }

    #[test]
    fn skip_respects_recursion_limit() {
        let mut w = BinaryWriter::new(Vec::new());
        for _ in 0..5 {
            w.write_field_begin("inner", WireType::Struct, 1).unwrap();
        }
        for _ in 0..6 {
            w.write_field_stop().unwrap();
        }
        let bytes = w.into_inner();

        let limits = ProtocolLimits { recursion_limit: 3, ..ProtocolLimits::default() };
        let err = limited(&bytes, limits).skip(WireType::Struct).unwrap_err();
        assert!(matches!(err, ProtocolError::DepthLimit(3)));

        // Default limit is plenty.
        reader(&bytes).skip(WireType::Struct).unwrap();
    }

    #[test]
    fn stop_and_void_cannot_be_skipped() {
        assert!(matches!(reader(&[]).skip(WireType::Stop), Err(ProtocolError::Unskippable(WireType::Stop))));
        assert!(matches!(reader(&[]).skip(WireType::Void), Err(ProtocolError::Unskippable(WireType::Void))));
    }
}
