use crate::{
    storage::varint::read_varint,
    types::{
        error::DatabaseError,
        value::{SerialType, Value},
        RowId,
    },
};

/// Position and type of one column's content within a page buffer. The
/// descriptor borrows nothing; bodies are materialized on demand so a
/// filter can evaluate one column without touching the others.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDescriptor {
    pub serial_type: SerialType,
    pub content_offset: usize,
    pub content_size: usize,
}

/// A parsed record header: the ordered column descriptors of one record.
#[derive(Debug, Clone)]
pub struct Record {
    pub header_size: u64,
    pub columns: Vec<ColumnDescriptor>,
}

impl Record {
    /// Parse the record starting at `offset` in `buf`. The header varint
    /// counts its own bytes; the serial-type varints follow, then the body.
    ///
    /// While walking the serial types, a NULL at a column position listed in
    /// `rowid_alias_positions` is rewritten to the `RowIdAlias` sentinel:
    /// the table declares that column as INTEGER PRIMARY KEY, so the cell
    /// stores NULL there and the row ID stands in for the value.
    pub fn parse(
        buf: &[u8],
        offset: usize,
        rowid_alias_positions: &[usize],
    ) -> Result<Self, DatabaseError> {
        let (header_size, header_varint_len) = read_varint(&buf[offset.min(buf.len())..])?;

        let mut columns = Vec::new();
        let mut header_remaining = header_size
            .checked_sub(header_varint_len as u64)
            .ok_or_else(|| DatabaseError::MalformedRecord {
                reason: format!("record header size {} smaller than its own varint", header_size),
            })?;

        let mut cursor = offset + header_varint_len;
        let mut body_cursor = offset + header_size as usize;
        let mut column_index = 0usize;

        while header_remaining > 0 {
            if cursor >= buf.len() {
                return Err(DatabaseError::MalformedRecord {
                    reason: "record header runs past the page".to_string(),
                });
            }
            let (code, consumed) = read_varint(&buf[cursor..])?;
            if consumed as u64 > header_remaining {
                return Err(DatabaseError::MalformedRecord {
                    reason: "serial type varint overruns the record header".to_string(),
                });
            }

            let serial_type = if code == 0 && rowid_alias_positions.contains(&column_index) {
                SerialType::RowIdAlias
            } else {
                SerialType::from_code(code)?
            };
            let content_size = serial_type.content_size() as usize;
            if body_cursor + content_size > buf.len() {
                return Err(DatabaseError::MalformedRecord {
                    reason: "record body runs past the page".to_string(),
                });
            }

            columns.push(ColumnDescriptor {
                serial_type,
                content_offset: body_cursor,
                content_size,
            });

            cursor += consumed;
            body_cursor += content_size;
            header_remaining -= consumed as u64;
            column_index += 1;
        }

        Ok(Self {
            header_size,
            columns,
        })
    }

    /// Total size of the record body in bytes.
    pub fn body_size(&self) -> u64 {
        self.columns.iter().map(|c| c.content_size as u64).sum()
    }

    /// Materialize one column's value from the page buffer.
    pub fn column_value(
        &self,
        buf: &[u8],
        index: usize,
        row_id: RowId,
    ) -> Result<Value, DatabaseError> {
        let descriptor =
            self.columns
                .get(index)
                .ok_or_else(|| DatabaseError::MalformedRecord {
                    reason: format!(
                        "column index {} out of bounds ({} columns)",
                        index,
                        self.columns.len()
                    ),
                })?;
        let content = &buf[descriptor.content_offset..descriptor.content_offset + descriptor.content_size];
        descriptor.serial_type.decode(content, row_id)
    }

    /// Materialize every column in declared order.
    pub fn all_values(&self, buf: &[u8], row_id: RowId) -> Result<Vec<Value>, DatabaseError> {
        (0..self.columns.len())
            .map(|i| self.column_value(buf, i, row_id))
            .collect()
    }
}
