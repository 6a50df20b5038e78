use baca::{
    storage::{record::Record, varint::read_varint},
    types::value::{SerialType, Value},
    utils::fixture::encode_record,
};

fn sample_values() -> Vec<Value> {
    vec![
        Value::Null,
        Value::Integer(7),
        Value::Integer(-300),
        Value::Text("hello".to_string()),
        Value::Blob(vec![1, 2, 3]),
    ]
}

#[test]
fn test_descriptors_cover_the_body_in_order() {
    let buf = encode_record(&sample_values());
    let record = Record::parse(&buf, 0, &[]).unwrap();

    assert_eq!(record.columns.len(), 5);
    assert_eq!(record.columns[0].serial_type, SerialType::Null);
    assert_eq!(record.columns[1].serial_type, SerialType::I8);
    assert_eq!(record.columns[2].serial_type, SerialType::I16);
    assert_eq!(record.columns[3].serial_type, SerialType::Text { len: 5 });
    assert_eq!(record.columns[4].serial_type, SerialType::Blob { len: 3 });

    // bodies are contiguous, starting right after the header
    assert_eq!(record.columns[0].content_offset, record.header_size as usize);
    for pair in record.columns.windows(2) {
        assert_eq!(
            pair[0].content_offset + pair[0].content_size,
            pair[1].content_offset
        );
    }

    // records round-trip their own lengths
    assert_eq!(
        record.header_size + record.body_size(),
        buf.len() as u64
    );
}

#[test]
fn test_value_materialization() {
    let buf = encode_record(&sample_values());
    let record = Record::parse(&buf, 0, &[]).unwrap();

    assert_eq!(record.all_values(&buf, 0).unwrap(), sample_values());
    assert_eq!(
        record.column_value(&buf, 3, 0).unwrap(),
        Value::Text("hello".to_string())
    );
    assert!(record.column_value(&buf, 9, 0).is_err());
}

#[test]
fn test_rowid_alias_substitution() {
    // NULL in column 0, as a table with INTEGER PRIMARY KEY stores it
    let buf = encode_record(&[Value::Null, Value::Text("Fuji".to_string())]);

    let plain = Record::parse(&buf, 0, &[]).unwrap();
    assert_eq!(plain.columns[0].serial_type, SerialType::Null);
    assert_eq!(plain.column_value(&buf, 0, 5).unwrap(), Value::Null);

    let aliased = Record::parse(&buf, 0, &[0]).unwrap();
    assert_eq!(aliased.columns[0].serial_type, SerialType::RowIdAlias);
    assert_eq!(aliased.column_value(&buf, 0, 5).unwrap(), Value::Integer(5));
    // only the listed position is rewritten
    assert_eq!(
        aliased.column_value(&buf, 1, 5).unwrap(),
        Value::Text("Fuji".to_string())
    );
}

#[test]
fn test_record_parse_at_an_offset() {
    let mut buf = vec![0xaa; 10];
    let record_bytes = encode_record(&[Value::Integer(1), Value::Text("x".to_string())]);
    buf.extend_from_slice(&record_bytes);

    let record = Record::parse(&buf, 10, &[]).unwrap();
    assert_eq!(
        record.all_values(&buf, 0).unwrap(),
        vec![Value::Integer(1), Value::Text("x".to_string())]
    );
}

#[test]
fn test_header_running_past_the_buffer_is_an_error() {
    let buf = encode_record(&[Value::Text("hello".to_string())]);
    // chop off the body
    let truncated = &buf[..buf.len() - 3];
    assert!(Record::parse(truncated, 0, &[]).is_err());
}

#[test]
fn test_header_size_varint_consistency() {
    let buf = encode_record(&sample_values());
    let (declared, _) = read_varint(&buf).unwrap();
    let record = Record::parse(&buf, 0, &[]).unwrap();
    assert_eq!(declared, record.header_size);
}
