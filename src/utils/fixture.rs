//! Builders that assemble SQLite database file images byte by byte, used
//! by the integration tests and benchmarks to exercise the engine against
//! genuine format bytes without shelling out to sqlite3.

use crate::{
    storage::SQLITE_MAGIC,
    types::{page::PageType, value::Value, PageId, RowId, FILE_HEADER_SIZE, MAX_PAGE_SIZE},
};

/// Encode values into a record: header-size varint, serial-type varints,
/// body. Integers use the smallest 1/2/3/4-byte serial type; NULL, text
/// and blobs encode per the format.
pub fn encode_record(values: &[Value]) -> Vec<u8> {
    let mut serials: Vec<u64> = Vec::with_capacity(values.len());
    let mut body: Vec<u8> = Vec::new();

    for value in values {
        match value {
            Value::Null => serials.push(0),
            Value::Integer(i) => {
                if let Ok(v) = i8::try_from(*i) {
                    serials.push(1);
                    body.push(v as u8);
                } else if let Ok(v) = i16::try_from(*i) {
                    serials.push(2);
                    body.extend_from_slice(&v.to_be_bytes());
                } else if (-(1i64 << 23)..(1i64 << 23)).contains(i) {
                    serials.push(3);
                    body.extend_from_slice(&(*i as i32).to_be_bytes()[1..4]);
                } else {
                    serials.push(4);
                    body.extend_from_slice(&(*i as i32).to_be_bytes());
                }
            }
            Value::Text(s) => {
                serials.push(13 + 2 * s.len() as u64);
                body.extend_from_slice(s.as_bytes());
            }
            Value::Blob(b) => {
                serials.push(12 + 2 * b.len() as u64);
                body.extend_from_slice(b);
            }
        }
    }

    let mut serial_bytes = Vec::new();
    let mut scratch = [0u8; 9];
    for serial in &serials {
        let n = crate::storage::varint::write_varint(&mut scratch, *serial);
        serial_bytes.extend_from_slice(&scratch[..n]);
    }

    // the header-size varint counts its own bytes; settle the fixpoint
    let mut header_size = serial_bytes.len() as u64 + 1;
    loop {
        let settled = serial_bytes.len() as u64
            + crate::storage::varint::varint_len(header_size) as u64;
        if settled == header_size {
            break;
        }
        header_size = settled;
    }

    let mut record = Vec::new();
    let n = crate::storage::varint::write_varint(&mut scratch, header_size);
    record.extend_from_slice(&scratch[..n]);
    record.extend_from_slice(&serial_bytes);
    record.extend_from_slice(&body);
    record
}

pub fn leaf_table_cell(row_id: RowId, values: &[Value]) -> Vec<u8> {
    let record = encode_record(values);
    let mut scratch = [0u8; 9];
    let mut cell = Vec::new();
    let n = crate::storage::varint::write_varint(&mut scratch, record.len() as u64);
    cell.extend_from_slice(&scratch[..n]);
    let n = crate::storage::varint::write_varint(&mut scratch, row_id as u64);
    cell.extend_from_slice(&scratch[..n]);
    cell.extend_from_slice(&record);
    cell
}

pub fn interior_table_cell(left_child: PageId, row_id: RowId) -> Vec<u8> {
    let mut scratch = [0u8; 9];
    let mut cell = Vec::new();
    cell.extend_from_slice(&left_child.to_be_bytes());
    let n = crate::storage::varint::write_varint(&mut scratch, row_id as u64);
    cell.extend_from_slice(&scratch[..n]);
    cell
}

pub fn leaf_index_cell(values: &[Value]) -> Vec<u8> {
    let record = encode_record(values);
    let mut scratch = [0u8; 9];
    let mut cell = Vec::new();
    let n = crate::storage::varint::write_varint(&mut scratch, record.len() as u64);
    cell.extend_from_slice(&scratch[..n]);
    cell.extend_from_slice(&record);
    cell
}

pub fn interior_index_cell(left_child: PageId, values: &[Value]) -> Vec<u8> {
    let mut cell = Vec::new();
    cell.extend_from_slice(&left_child.to_be_bytes());
    cell.extend_from_slice(&leaf_index_cell(values));
    cell
}

/// Lay out one B-tree page: header at `header_base` (100 on page 1, 0
/// elsewhere), cell pointer array after it, cell bodies packed against the
/// page end in reverse order.
pub fn build_page(
    page_size: usize,
    header_base: usize,
    page_type: PageType,
    right_most_child: Option<PageId>,
    cells: &[Vec<u8>],
) -> Vec<u8> {
    let mut page = vec![0u8; page_size];
    let header_size = page_type.header_size();

    page[header_base] = page_type.as_u8();
    page[header_base + 3..header_base + 5]
        .copy_from_slice(&(cells.len() as u16).to_be_bytes());
    if let Some(right_most) = right_most_child {
        page[header_base + 8..header_base + 12].copy_from_slice(&right_most.to_be_bytes());
    }

    let mut top = page_size;
    let pointer_array = header_base + header_size;
    for (i, cell) in cells.iter().enumerate() {
        top -= cell.len();
        page[top..top + cell.len()].copy_from_slice(cell);
        page[pointer_array + 2 * i..pointer_array + 2 * i + 2]
            .copy_from_slice(&(top as u16).to_be_bytes());
    }
    page[header_base + 5..header_base + 7].copy_from_slice(&(top as u16).to_be_bytes());

    page
}

/// Convenience for the common schema-row shape of sqlite_master.
pub fn schema_row(
    object_type: &str,
    name: &str,
    table_name: &str,
    root_page: PageId,
    sql: &str,
) -> Vec<Value> {
    vec![
        Value::Text(object_type.to_string()),
        Value::Text(name.to_string()),
        Value::Text(table_name.to_string()),
        Value::Integer(root_page as i64),
        Value::Text(sql.to_string()),
    ]
}

/// Assembles a whole database file image page by page. Page 1 gets the
/// 100-byte database header stamped over its first bytes.
pub struct DatabaseBuilder {
    page_size: usize,
    pages: Vec<Vec<u8>>,
}

impl DatabaseBuilder {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            pages: Vec::new(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Append a page, returning its page number.
    pub fn push_page(&mut self, page: Vec<u8>) -> PageId {
        assert_eq!(page.len(), self.page_size, "page has the wrong size");
        self.pages.push(page);
        self.pages.len() as PageId
    }

    /// Append a leaf-table page built from (rowID, values) pairs.
    pub fn push_leaf_table_page(&mut self, rows: &[(RowId, Vec<Value>)]) -> PageId {
        let cells: Vec<Vec<u8>> = rows
            .iter()
            .map(|(row_id, values)| leaf_table_cell(*row_id, values))
            .collect();
        let header_base = if self.pages.is_empty() { FILE_HEADER_SIZE } else { 0 };
        self.push_page(build_page(
            self.page_size,
            header_base,
            PageType::LeafTable,
            None,
            &cells,
        ))
    }

    pub fn push_interior_table_page(
        &mut self,
        children: &[(PageId, RowId)],
        right_most_child: PageId,
    ) -> PageId {
        let cells: Vec<Vec<u8>> = children
            .iter()
            .map(|(child, row_id)| interior_table_cell(*child, *row_id))
            .collect();
        self.push_page(build_page(
            self.page_size,
            0,
            PageType::InteriorTable,
            Some(right_most_child),
            &cells,
        ))
    }

    pub fn push_leaf_index_page(&mut self, entries: &[(Value, RowId)]) -> PageId {
        let cells: Vec<Vec<u8>> = entries
            .iter()
            .map(|(key, row_id)| {
                leaf_index_cell(&[key.clone(), Value::Integer(*row_id)])
            })
            .collect();
        self.push_page(build_page(
            self.page_size,
            0,
            PageType::LeafIndex,
            None,
            &cells,
        ))
    }

    pub fn push_interior_index_page(
        &mut self,
        cells: &[(PageId, Value, RowId)],
        right_most_child: PageId,
    ) -> PageId {
        let encoded: Vec<Vec<u8>> = cells
            .iter()
            .map(|(child, key, row_id)| {
                interior_index_cell(*child, &[key.clone(), Value::Integer(*row_id)])
            })
            .collect();
        self.push_page(build_page(
            self.page_size,
            0,
            PageType::InteriorIndex,
            Some(right_most_child),
            &encoded,
        ))
    }

    /// Produce the final file image, stamping the database header onto
    /// page 1.
    pub fn build(mut self) -> Vec<u8> {
        assert!(!self.pages.is_empty(), "a database needs at least page 1");

        let page_count = self.pages.len() as u32;
        {
            let first = &mut self.pages[0];
            first[0..16].copy_from_slice(SQLITE_MAGIC);
            let raw_page_size = if self.page_size == MAX_PAGE_SIZE as usize {
                1u16
            } else {
                self.page_size as u16
            };
            first[16..18].copy_from_slice(&raw_page_size.to_be_bytes());
            first[18] = 1; // file format write version
            first[19] = 1; // file format read version
            first[21] = 64;
            first[22] = 32;
            first[23] = 32;
            first[28..32].copy_from_slice(&page_count.to_be_bytes());
            first[47] = 4; // schema format number 4
            first[59] = 1; // text encoding: UTF-8
        }

        self.pages.concat()
    }
}
