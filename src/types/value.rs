use serde::{Deserialize, Serialize};

use crate::types::{error::DatabaseError, RowId};

/// A column's serial type as stored in a record header. The code encodes
/// both the logical type and the on-disk byte length of the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialType {
    Null,
    I8,
    I16,
    I24,
    I32,
    I48,
    I64,
    F64,
    Zero,
    One,
    Reserved10,
    Reserved11,
    Blob { len: u64 },
    Text { len: u64 },
    /// Sentinel for a NULL slot that aliases the cell's row ID. Never stored
    /// on disk; substituted while parsing the record header of a table whose
    /// schema declares an INTEGER PRIMARY KEY column.
    RowIdAlias,
}

impl SerialType {
    pub fn from_code(code: u64) -> Result<Self, DatabaseError> {
        match code {
            0 => Ok(SerialType::Null),
            1 => Ok(SerialType::I8),
            2 => Ok(SerialType::I16),
            3 => Ok(SerialType::I24),
            4 => Ok(SerialType::I32),
            5 => Ok(SerialType::I48),
            6 => Ok(SerialType::I64),
            7 => Ok(SerialType::F64),
            8 => Ok(SerialType::Zero),
            9 => Ok(SerialType::One),
            10 => Ok(SerialType::Reserved10),
            11 => Ok(SerialType::Reserved11),
            n if n >= 12 && n % 2 == 0 => Ok(SerialType::Blob { len: (n - 12) / 2 }),
            n if n >= 13 && n % 2 == 1 => Ok(SerialType::Text { len: (n - 13) / 2 }),
            n => Err(DatabaseError::UnsupportedSerialType {
                serial_type: n,
                operation: "record header",
            }),
        }
    }

    pub fn content_size(&self) -> u64 {
        match self {
            SerialType::Null
            | SerialType::Zero
            | SerialType::One
            | SerialType::Reserved10
            | SerialType::Reserved11
            | SerialType::RowIdAlias => 0,
            SerialType::I8 => 1,
            SerialType::I16 => 2,
            SerialType::I24 => 3,
            SerialType::I32 => 4,
            SerialType::I48 => 6,
            SerialType::I64 | SerialType::F64 => 8,
            SerialType::Blob { len } | SerialType::Text { len } => *len,
        }
    }

    /// Decode the content bytes for this serial type into a typed value.
    /// `row_id` backs the `RowIdAlias` sentinel. Integer content is
    /// big-endian and sign-extended; 6-byte and 8-byte integers, floats and
    /// BLOBs are carried as raw bytes.
    pub fn decode(&self, content: &[u8], row_id: RowId) -> Result<Value, DatabaseError> {
        let expected = self.content_size() as usize;
        if content.len() != expected {
            return Err(DatabaseError::MalformedRecord {
                reason: format!(
                    "content size mismatch: expected {} bytes, got {}",
                    expected,
                    content.len()
                ),
            });
        }

        match self {
            SerialType::Null => Ok(Value::Null),
            SerialType::Zero => Ok(Value::Integer(0)),
            SerialType::One => Ok(Value::Integer(1)),
            SerialType::RowIdAlias => Ok(Value::Integer(row_id)),
            SerialType::I8 => Ok(Value::Integer(content[0] as i8 as i64)),
            SerialType::I16 => {
                Ok(Value::Integer(
                    i16::from_be_bytes([content[0], content[1]]) as i64
                ))
            }
            SerialType::I24 => {
                let raw = u32::from_be_bytes([0, content[0], content[1], content[2]]);
                // shift left then arithmetic right to propagate the sign bit
                Ok(Value::Integer(((raw << 8) as i32 >> 8) as i64))
            }
            SerialType::I32 => Ok(Value::Integer(i32::from_be_bytes([
                content[0], content[1], content[2], content[3],
            ]) as i64)),
            SerialType::I48
            | SerialType::I64
            | SerialType::F64
            | SerialType::Blob { .. } => Ok(Value::Blob(content.to_vec())),
            SerialType::Text { .. } => match std::str::from_utf8(content) {
                Ok(s) => Ok(Value::Text(s.to_string())),
                Err(_) => Err(DatabaseError::MalformedRecord {
                    reason: "text content is not valid UTF-8".to_string(),
                }),
            },
            SerialType::Reserved10 | SerialType::Reserved11 => {
                Err(DatabaseError::UnsupportedSerialType {
                    serial_type: if matches!(self, SerialType::Reserved10) { 10 } else { 11 },
                    operation: "value decoding",
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Compare this value against a SQL literal. Text and NULL compare as
    /// strings, integers by their decimal rendering. Raw-byte carriers are
    /// not comparable and report the unsupported operation.
    pub fn matches_literal(&self, literal: &str) -> Result<bool, DatabaseError> {
        match self {
            Value::Text(s) => Ok(s == literal),
            Value::Null => Ok(literal == "<null>"),
            Value::Integer(i) => Ok(i.to_string() == literal),
            Value::Blob(_) => Err(DatabaseError::UnsupportedSerialType {
                serial_type: 12,
                operation: "WHERE comparison",
            }),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "<null>"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
            Value::Blob(b) => {
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}
