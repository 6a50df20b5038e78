use crate::{
    storage::{record::Record, varint::read_varint},
    types::{
        error::DatabaseError,
        page::BTreePageHeader,
        value::Value,
        PageId, RowId, CELL_POINTER_SIZE,
    },
};

/// A single-column equality condition, evaluated against a leaf-table cell
/// before its projection is materialized.
#[derive(Debug, Clone)]
pub struct RowFilter {
    pub column_pos: usize,
    pub value: String,
}

/// How a leaf-table cell is read: which columns to materialize, which
/// column positions alias the row ID, and an optional equality filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeafCellContext<'a> {
    /// `None` projects every column; `Some` projects exactly these
    /// positions, in this order.
    pub projection: Option<&'a [usize]>,
    pub rowid_alias_positions: &'a [usize],
    pub filter: Option<&'a RowFilter>,
}

#[derive(Debug, Clone)]
pub struct LeafTableCell {
    pub row_id: RowId,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Copy)]
pub struct InteriorTableCell {
    pub left_child: PageId,
    pub row_id: RowId,
}

#[derive(Debug, Clone)]
pub struct LeafIndexCell {
    pub values: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct InteriorIndexCell {
    pub left_child: PageId,
    pub values: Vec<Value>,
}

/// Decode the cell pointer array of a page. `header_base` is the offset of
/// the B-tree header within `page` (100 on page 1, 0 elsewhere); pointers
/// themselves are always relative to the page start.
pub fn cell_pointers(
    page: &[u8],
    header: &BTreePageHeader,
    header_base: usize,
) -> Result<Vec<usize>, DatabaseError> {
    let array_start = header_base + header.header_size();
    let array_end = array_start + header.cell_count as usize * CELL_POINTER_SIZE;
    let content_start = header.cell_content_start() as usize;

    if array_end > content_start || array_end > page.len() {
        return Err(DatabaseError::MalformedRecord {
            reason: format!(
                "cell pointer array [{}, {}) overlaps the content area at {}",
                array_start, array_end, content_start
            ),
        });
    }

    let mut pointers = Vec::with_capacity(header.cell_count as usize);
    for i in 0..header.cell_count as usize {
        let at = array_start + i * CELL_POINTER_SIZE;
        let pointer = u16::from_be_bytes([page[at], page[at + 1]]) as usize;
        if pointer < content_start || pointer >= page.len() {
            return Err(DatabaseError::MalformedRecord {
                reason: format!(
                    "cell pointer {} outside the content area [{}, {})",
                    pointer,
                    content_start,
                    page.len()
                ),
            });
        }
        pointers.push(pointer);
    }
    Ok(pointers)
}

/// Read one leaf-table cell: payload-size varint, rowID varint, record.
/// The filter is checked against its single column before the projection is
/// materialized; a non-match yields `None`.
pub fn read_leaf_table_cell(
    page: &[u8],
    offset: usize,
    ctx: &LeafCellContext,
) -> Result<Option<LeafTableCell>, DatabaseError> {
    let (payload_size, n) = read_varint(&page[offset..])?;
    let mut cursor = offset + n;
    let (raw_row_id, n) = read_varint(&page[cursor..])?;
    cursor += n;
    let row_id = raw_row_id as RowId;

    let record = Record::parse(page, cursor, ctx.rowid_alias_positions)?;
    check_payload_size(payload_size, &record)?;

    if let Some(filter) = ctx.filter {
        let candidate = record.column_value(page, filter.column_pos, row_id)?;
        if !candidate.matches_literal(&filter.value)? {
            return Ok(None);
        }
    }

    let values = match ctx.projection {
        None => record.all_values(page, row_id)?,
        Some(positions) => positions
            .iter()
            .map(|&pos| record.column_value(page, pos, row_id))
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(Some(LeafTableCell { row_id, values }))
}

/// Read one interior-table cell: left child page number, rowID varint.
pub fn read_interior_table_cell(
    page: &[u8],
    offset: usize,
) -> Result<InteriorTableCell, DatabaseError> {
    if offset + 4 > page.len() {
        return Err(DatabaseError::MalformedRecord {
            reason: "interior-table cell runs past the page".to_string(),
        });
    }
    let left_child = u32::from_be_bytes([
        page[offset],
        page[offset + 1],
        page[offset + 2],
        page[offset + 3],
    ]);
    let (row_id, _) = read_varint(&page[offset + 4..])?;
    Ok(InteriorTableCell {
        left_child,
        row_id: row_id as RowId,
    })
}

/// Read one leaf-index cell: payload-size varint, record. The record's
/// first columns are the index key; its last column is the rowID.
pub fn read_leaf_index_cell(page: &[u8], offset: usize) -> Result<LeafIndexCell, DatabaseError> {
    let (payload_size, n) = read_varint(&page[offset..])?;
    let record = Record::parse(page, offset + n, &[])?;
    check_payload_size(payload_size, &record)?;
    let values = record.all_values(page, 0)?;
    Ok(LeafIndexCell { values })
}

/// Read one interior-index cell: left child page number, payload-size
/// varint, record with the same layout as a leaf-index cell.
pub fn read_interior_index_cell(
    page: &[u8],
    offset: usize,
) -> Result<InteriorIndexCell, DatabaseError> {
    if offset + 4 > page.len() {
        return Err(DatabaseError::MalformedRecord {
            reason: "interior-index cell runs past the page".to_string(),
        });
    }
    let left_child = u32::from_be_bytes([
        page[offset],
        page[offset + 1],
        page[offset + 2],
        page[offset + 3],
    ]);
    let (payload_size, n) = read_varint(&page[offset + 4..])?;
    let record = Record::parse(page, offset + 4 + n, &[])?;
    check_payload_size(payload_size, &record)?;
    let values = record.all_values(page, 0)?;
    Ok(InteriorIndexCell { left_child, values })
}

// Records round-trip their own lengths: the declared payload must equal
// header size plus the sum of the content sizes.
fn check_payload_size(payload_size: u64, record: &Record) -> Result<(), DatabaseError> {
    let actual = record.header_size + record.body_size();
    if payload_size != actual {
        return Err(DatabaseError::MalformedRecord {
            reason: format!(
                "payload size mismatch: declared {}, header + bodies is {}",
                payload_size, actual
            ),
        });
    }
    Ok(())
}
