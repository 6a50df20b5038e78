use baca::types::value::{SerialType, Value};

#[test]
fn test_serial_type_codes_and_sizes() {
    assert_eq!(SerialType::from_code(0).unwrap(), SerialType::Null);
    assert_eq!(SerialType::from_code(1).unwrap(), SerialType::I8);
    assert_eq!(SerialType::from_code(2).unwrap(), SerialType::I16);
    assert_eq!(SerialType::from_code(3).unwrap(), SerialType::I24);
    assert_eq!(SerialType::from_code(4).unwrap(), SerialType::I32);
    assert_eq!(SerialType::from_code(5).unwrap(), SerialType::I48);
    assert_eq!(SerialType::from_code(6).unwrap(), SerialType::I64);
    assert_eq!(SerialType::from_code(7).unwrap(), SerialType::F64);
    assert_eq!(SerialType::from_code(8).unwrap(), SerialType::Zero);
    assert_eq!(SerialType::from_code(9).unwrap(), SerialType::One);

    // even codes >= 12 are blobs, odd codes >= 13 are strings
    assert_eq!(SerialType::from_code(12).unwrap(), SerialType::Blob { len: 0 });
    assert_eq!(SerialType::from_code(18).unwrap(), SerialType::Blob { len: 3 });
    assert_eq!(SerialType::from_code(13).unwrap(), SerialType::Text { len: 0 });
    assert_eq!(SerialType::from_code(23).unwrap(), SerialType::Text { len: 5 });

    assert_eq!(SerialType::Null.content_size(), 0);
    assert_eq!(SerialType::I24.content_size(), 3);
    assert_eq!(SerialType::I48.content_size(), 6);
    assert_eq!(SerialType::F64.content_size(), 8);
    assert_eq!(SerialType::Text { len: 5 }.content_size(), 5);
    assert_eq!(SerialType::RowIdAlias.content_size(), 0);
}

#[test]
fn test_integer_decoding_is_sign_extended() {
    assert_eq!(
        SerialType::I8.decode(&[0x7f], 0).unwrap(),
        Value::Integer(127)
    );
    assert_eq!(
        SerialType::I8.decode(&[0x80], 0).unwrap(),
        Value::Integer(-128)
    );
    assert_eq!(
        SerialType::I16.decode(&[0xff, 0xfe], 0).unwrap(),
        Value::Integer(-2)
    );
    assert_eq!(
        SerialType::I24.decode(&[0x00, 0x12, 0x34], 0).unwrap(),
        Value::Integer(0x1234)
    );
    assert_eq!(
        SerialType::I24.decode(&[0xff, 0xff, 0xff], 0).unwrap(),
        Value::Integer(-1)
    );
    assert_eq!(
        SerialType::I32
            .decode(&[0x80, 0x00, 0x00, 0x00], 0)
            .unwrap(),
        Value::Integer(i32::MIN as i64)
    );
}

#[test]
fn test_constant_and_sentinel_decoding() {
    assert_eq!(SerialType::Zero.decode(&[], 0).unwrap(), Value::Integer(0));
    assert_eq!(SerialType::One.decode(&[], 0).unwrap(), Value::Integer(1));
    assert_eq!(SerialType::Null.decode(&[], 0).unwrap(), Value::Null);
    // the alias sentinel materializes the row ID
    assert_eq!(
        SerialType::RowIdAlias.decode(&[], 42).unwrap(),
        Value::Integer(42)
    );
}

#[test]
fn test_text_and_raw_byte_decoding() {
    assert_eq!(
        SerialType::Text { len: 5 }.decode(b"hello", 0).unwrap(),
        Value::Text("hello".to_string())
    );
    assert!(SerialType::Text { len: 2 }.decode(&[0xff, 0xfe], 0).is_err());

    // 6/8-byte integers and floats are carried as raw bytes
    assert_eq!(
        SerialType::I48
            .decode(&[1, 2, 3, 4, 5, 6], 0)
            .unwrap(),
        Value::Blob(vec![1, 2, 3, 4, 5, 6])
    );
    assert_eq!(
        SerialType::Blob { len: 2 }.decode(&[0xca, 0xfe], 0).unwrap(),
        Value::Blob(vec![0xca, 0xfe])
    );
}

#[test]
fn test_decode_rejects_wrong_content_size() {
    assert!(SerialType::I16.decode(&[1], 0).is_err());
    assert!(SerialType::Text { len: 3 }.decode(b"hi", 0).is_err());
}

#[test]
fn test_literal_matching() {
    assert!(Value::Text("Yellow".to_string())
        .matches_literal("Yellow")
        .unwrap());
    assert!(!Value::Text("Yellow".to_string())
        .matches_literal("Red")
        .unwrap());
    assert!(Value::Integer(42).matches_literal("42").unwrap());
    assert!(!Value::Integer(42).matches_literal("7").unwrap());
    assert!(Value::Null.matches_literal("<null>").unwrap());
    // raw-byte carriers are not comparable
    assert!(Value::Blob(vec![1]).matches_literal("x").is_err());
}

#[test]
fn test_display() {
    assert_eq!(Value::Null.to_string(), "<null>");
    assert_eq!(Value::Integer(-7).to_string(), "-7");
    assert_eq!(Value::Text("abc".to_string()).to_string(), "abc");
    assert_eq!(Value::Blob(vec![0xde, 0xad]).to_string(), "dead");
}
