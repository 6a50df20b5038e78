use crate::types::{
    error::DatabaseError, PageId, INTERIOR_PAGE_HEADER_SIZE, LEAF_PAGE_HEADER_SIZE, MAX_PAGE_SIZE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    InteriorIndex = 2,
    InteriorTable = 5,
    LeafIndex = 10,
    LeafTable = 13,
}

impl PageType {
    pub fn from_u8(value: u8) -> Result<Self, DatabaseError> {
        match value {
            2 => Ok(PageType::InteriorIndex),
            5 => Ok(PageType::InteriorTable),
            10 => Ok(PageType::LeafIndex),
            13 => Ok(PageType::LeafTable),
            _ => Err(DatabaseError::InvalidPageType(value)),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            PageType::InteriorIndex => 2,
            PageType::InteriorTable => 5,
            PageType::LeafIndex => 10,
            PageType::LeafTable => 13,
        }
    }

    pub fn is_interior(&self) -> bool {
        matches!(self, PageType::InteriorIndex | PageType::InteriorTable)
    }

    pub fn is_table(&self) -> bool {
        matches!(self, PageType::InteriorTable | PageType::LeafTable)
    }

    pub fn header_size(&self) -> usize {
        if self.is_interior() {
            INTERIOR_PAGE_HEADER_SIZE
        } else {
            LEAF_PAGE_HEADER_SIZE
        }
    }
}

/*
 * B-tree page header layout:
 * ┌────────────────────────────────────────────────────────────────┐
 * │ page_type(1) | first_freeblock(2) | cell_count(2) |            │
 * │ cell_content_start(2) | fragmented_bytes(1)                    │
 * │ [interior pages only: right_most_child(4)]                     │
 * ├────────────────────────────────────────────────────────────────┤
 * │ CELL POINTER ARRAY: cell_count u16 offsets, page-relative      │
 * ├────────────────────────────────────────────────────────────────┤
 * │ unallocated                                                    │
 * ├────────────────────────────────────────────────────────────────┤
 * │ CELL CONTENT AREA (grows downward from the page end)           │
 * └────────────────────────────────────────────────────────────────┘
 * On page 1 this header sits after the 100-byte database header;
 * everywhere else it sits at the page start.
 */
#[derive(Debug, Clone)]
pub struct BTreePageHeader {
    pub page_type: PageType,
    pub first_freeblock: u16,
    pub cell_count: u16,
    cell_content_start_raw: u16,
    pub fragmented_free_bytes: u8,
    /// Present only for interior pages (types 2 and 5).
    pub right_most_child: Option<PageId>,
}

impl BTreePageHeader {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DatabaseError> {
        if bytes.is_empty() {
            return Err(DatabaseError::MalformedRecord {
                reason: "empty page header buffer".to_string(),
            });
        }

        let page_type = PageType::from_u8(bytes[0])?;
        let header_size = page_type.header_size();
        if bytes.len() < header_size {
            return Err(DatabaseError::MalformedRecord {
                reason: format!(
                    "page header needs {} bytes, got {}",
                    header_size,
                    bytes.len()
                ),
            });
        }

        let first_freeblock = u16::from_be_bytes([bytes[1], bytes[2]]);
        let cell_count = u16::from_be_bytes([bytes[3], bytes[4]]);
        let cell_content_start_raw = u16::from_be_bytes([bytes[5], bytes[6]]);
        let fragmented_free_bytes = bytes[7];

        let right_most_child = if page_type.is_interior() {
            Some(u32::from_be_bytes([
                bytes[8], bytes[9], bytes[10], bytes[11],
            ]))
        } else {
            None
        };

        Ok(Self {
            page_type,
            first_freeblock,
            cell_count,
            cell_content_start_raw,
            fragmented_free_bytes,
            right_most_child,
        })
    }

    pub fn header_size(&self) -> usize {
        self.page_type.header_size()
    }

    /// Start of the cell content area. The stored value 0 means 65536.
    pub fn cell_content_start(&self) -> u32 {
        if self.cell_content_start_raw == 0 {
            MAX_PAGE_SIZE
        } else {
            self.cell_content_start_raw as u32
        }
    }
}
