use std::borrow::Cow;
use std::collections::BTreeSet;

use tracing::trace;

use crate::{
    storage::{
        cell::{
            cell_pointers, read_interior_index_cell, read_interior_table_cell,
            read_leaf_index_cell, read_leaf_table_cell, LeafCellContext, LeafTableCell,
        },
        pager::Pager,
        varint::read_varint,
    },
    types::{
        error::DatabaseError,
        page::{BTreePageHeader, PageType},
        value::Value,
        PageId, RowId,
    },
};

/// Recursive walks over table and index B-trees. Depth is bounded by the
/// tree height; all reads happen in natural traversal order (pre-order,
/// left-to-right, right-most child last).
pub struct BTreeWalker<'a> {
    pager: &'a Pager,
}

impl<'a> BTreeWalker<'a> {
    pub fn new(pager: &'a Pager) -> Self {
        Self { pager }
    }

    fn read_page_and_header(
        &self,
        page: PageId,
    ) -> Result<(Vec<u8>, BTreePageHeader, usize), DatabaseError> {
        let data = self.pager.read_page(page)?;
        let base = self.pager.btree_header_offset(page);
        let header = BTreePageHeader::from_bytes(&data[base..])?;
        trace!(page, page_type = ?header.page_type, cells = header.cell_count, "read page");
        Ok((data, header, base))
    }

    fn right_most_child(
        &self,
        page: PageId,
        header: &BTreePageHeader,
    ) -> Result<PageId, DatabaseError> {
        header
            .right_most_child
            .ok_or_else(|| DatabaseError::CorruptedPage {
                page,
                reason: "interior page has no right-most child".to_string(),
            })
    }

    /// Walk a table B-tree, collecting every leaf cell that survives the
    /// context's filter, projected per the context.
    pub fn walk_table(
        &self,
        page: PageId,
        ctx: &LeafCellContext,
        out: &mut Vec<LeafTableCell>,
    ) -> Result<(), DatabaseError> {
        let (data, header, base) = self.read_page_and_header(page)?;
        match header.page_type {
            PageType::LeafTable => {
                for pointer in cell_pointers(&data, &header, base)? {
                    if let Some(cell) = read_leaf_table_cell(&data, pointer, ctx)? {
                        out.push(cell);
                    }
                }
                Ok(())
            }
            PageType::InteriorTable => {
                for pointer in cell_pointers(&data, &header, base)? {
                    let cell = read_interior_table_cell(&data, pointer)?;
                    self.walk_table(cell.left_child, ctx, out)?;
                }
                self.walk_table(self.right_most_child(page, &header)?, ctx, out)
            }
            _ => Err(DatabaseError::CorruptedPage {
                page,
                reason: format!("expected a table page, found {:?}", header.page_type),
            }),
        }
    }

    /// Count the rows of a table B-tree. Leaf pages contribute their cell
    /// count directly; no record is parsed.
    pub fn count_rows(&self, page: PageId) -> Result<u64, DatabaseError> {
        let (data, header, base) = self.read_page_and_header(page)?;
        match header.page_type {
            PageType::LeafTable => Ok(header.cell_count as u64),
            PageType::InteriorTable => {
                let mut total = 0u64;
                for pointer in cell_pointers(&data, &header, base)? {
                    let cell = read_interior_table_cell(&data, pointer)?;
                    total += self.count_rows(cell.left_child)?;
                }
                total += self.count_rows(self.right_most_child(page, &header)?)?;
                Ok(total)
            }
            _ => Err(DatabaseError::CorruptedPage {
                page,
                reason: format!("expected a table page, found {:?}", header.page_type),
            }),
        }
    }

    /// Walk an index B-tree collecting the row IDs of every entry whose key
    /// equals `key`. The set guarantees exactly-once emission when
    /// duplicates appear both on a page and in its left subtrees.
    pub fn walk_index(
        &self,
        page: PageId,
        key: &str,
        out: &mut BTreeSet<RowId>,
    ) -> Result<(), DatabaseError> {
        let (data, header, base) = self.read_page_and_header(page)?;
        match header.page_type {
            PageType::LeafIndex => {
                for pointer in cell_pointers(&data, &header, base)? {
                    let cell = read_leaf_index_cell(&data, pointer)?;
                    if index_key_text(&cell.values)? == key {
                        out.insert(index_row_id(&cell.values)?);
                    }
                }
                Ok(())
            }
            PageType::InteriorIndex => {
                // Duplicates of a key may live both in a cell and in the
                // left subtree of that cell, so an equal key descends too.
                let mut descended_left = false;
                for pointer in cell_pointers(&data, &header, base)? {
                    let cell = read_interior_index_cell(&data, pointer)?;
                    let cell_key = index_key_text(&cell.values)?;
                    if key > cell_key.as_ref() {
                        continue;
                    }
                    if key == cell_key.as_ref() {
                        out.insert(index_row_id(&cell.values)?);
                        self.walk_index(cell.left_child, key, out)?;
                        continue;
                    }
                    // key < cell key: everything further right is larger
                    self.walk_index(cell.left_child, key, out)?;
                    descended_left = true;
                    break;
                }
                if !descended_left {
                    self.walk_index(self.right_most_child(page, &header)?, key, out)?;
                }
                Ok(())
            }
            _ => Err(DatabaseError::CorruptedPage {
                page,
                reason: format!("expected an index page, found {:?}", header.page_type),
            }),
        }
    }

    /// Walk a table B-tree restricted to a set of row IDs. Interior descent
    /// is pruned to children whose key bound can still cover a remaining
    /// row ID; leaf cells outside the set are skipped before their records
    /// are parsed.
    pub fn walk_table_by_row_ids(
        &self,
        page: PageId,
        row_ids: &BTreeSet<RowId>,
        ctx: &LeafCellContext,
        out: &mut Vec<LeafTableCell>,
    ) -> Result<(), DatabaseError> {
        if row_ids.is_empty() {
            return Ok(());
        }

        let (data, header, base) = self.read_page_and_header(page)?;
        match header.page_type {
            PageType::LeafTable => {
                for pointer in cell_pointers(&data, &header, base)? {
                    let (_, n) = read_varint(&data[pointer..])?;
                    let (row_id, _) = read_varint(&data[pointer + n..])?;
                    if !row_ids.contains(&(row_id as RowId)) {
                        continue;
                    }
                    if let Some(cell) = read_leaf_table_cell(&data, pointer, ctx)? {
                        out.push(cell);
                    }
                }
                Ok(())
            }
            PageType::InteriorTable => {
                let mut last_key: Option<RowId> = None;
                for pointer in cell_pointers(&data, &header, base)? {
                    let cell = read_interior_table_cell(&data, pointer)?;
                    // left subtree keys are bounded above by the cell's rowID
                    if row_ids.range(..=cell.row_id).next().is_some() {
                        self.walk_table_by_row_ids(cell.left_child, row_ids, ctx, out)?;
                    }
                    last_key = Some(cell.row_id);
                }
                let descend_right = match last_key {
                    Some(key) => row_ids.range(key + 1..).next().is_some(),
                    None => true,
                };
                if descend_right {
                    self.walk_table_by_row_ids(
                        self.right_most_child(page, &header)?,
                        row_ids,
                        ctx,
                        out,
                    )?;
                }
                Ok(())
            }
            _ => Err(DatabaseError::CorruptedPage {
                page,
                reason: format!("expected a table page, found {:?}", header.page_type),
            }),
        }
    }
}

/// Textual form of an index record's key (its first column), used for the
/// lexicographic comparisons that drive the index walk.
fn index_key_text(values: &[Value]) -> Result<Cow<'_, str>, DatabaseError> {
    match values.first() {
        Some(Value::Text(s)) => Ok(Cow::Borrowed(s.as_str())),
        Some(Value::Integer(i)) => Ok(Cow::Owned(i.to_string())),
        Some(Value::Null) => Ok(Cow::Borrowed("<null>")),
        Some(Value::Blob(_)) => Err(DatabaseError::UnsupportedSerialType {
            serial_type: 12,
            operation: "index key comparison",
        }),
        None => Err(DatabaseError::MalformedRecord {
            reason: "index record has no key column".to_string(),
        }),
    }
}

/// The row ID stored as the last column of an index record.
fn index_row_id(values: &[Value]) -> Result<RowId, DatabaseError> {
    match values.last() {
        Some(Value::Integer(i)) => Ok(*i),
        other => Err(DatabaseError::MalformedRecord {
            reason: format!("index record row ID is not an integer: {:?}", other),
        }),
    }
}
