use crate::{
    storage::SQLITE_MAGIC,
    types::{error::DatabaseError, FILE_HEADER_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE},
};

/// The 100-byte database header at the start of page 1. All integers are
/// big-endian. Only the fields the engine consumes are validated; the rest
/// are carried through for inspection.
#[derive(Debug, Clone)]
pub struct FileHeader {
    pub page_size: u32,
    pub file_format_write_version: u8,
    pub file_format_read_version: u8,
    pub reserved_space: u8,
    pub max_embedded_payload_fraction: u8,
    pub min_embedded_payload_fraction: u8,
    pub leaf_payload_fraction: u8,
    pub file_change_counter: u32,
    pub database_size_pages: u32,
    pub freelist_trunk_page: u32,
    pub freelist_pages_count: u32,
    pub schema_cookie: u32,
    pub schema_format_number: u32,
    pub text_encoding: u32,
    pub user_version: u32,
}

impl FileHeader {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DatabaseError> {
        if bytes.len() < FILE_HEADER_SIZE {
            return Err(DatabaseError::InvalidHeader {
                reason: format!(
                    "header needs {} bytes, got {}",
                    FILE_HEADER_SIZE,
                    bytes.len()
                ),
            });
        }

        if &bytes[0..16] != SQLITE_MAGIC {
            return Err(DatabaseError::InvalidHeader {
                reason: "bad magic string".to_string(),
            });
        }

        // The stored value 1 denotes a 65536-byte page.
        let raw_page_size = u16::from_be_bytes([bytes[16], bytes[17]]);
        let page_size = if raw_page_size == 1 {
            MAX_PAGE_SIZE
        } else {
            raw_page_size as u32
        };
        if page_size < MIN_PAGE_SIZE || page_size > MAX_PAGE_SIZE || !page_size.is_power_of_two() {
            return Err(DatabaseError::InvalidHeader {
                reason: format!("unsupported page size: {}", raw_page_size),
            });
        }

        let read_u32 = |offset: usize| {
            u32::from_be_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };

        Ok(Self {
            page_size,
            file_format_write_version: bytes[18],
            file_format_read_version: bytes[19],
            reserved_space: bytes[20],
            max_embedded_payload_fraction: bytes[21],
            min_embedded_payload_fraction: bytes[22],
            leaf_payload_fraction: bytes[23],
            file_change_counter: read_u32(24),
            database_size_pages: read_u32(28),
            freelist_trunk_page: read_u32(32),
            freelist_pages_count: read_u32(36),
            schema_cookie: read_u32(40),
            schema_format_number: read_u32(44),
            text_encoding: read_u32(56),
            user_version: read_u32(60),
        })
    }
}
