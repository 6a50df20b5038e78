use std::{
    fs::File,
    io::Read,
    os::unix::fs::FileExt,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    storage::header::FileHeader,
    types::{
        error::DatabaseError,
        page::BTreePageHeader,
        PageId, FILE_HEADER_SIZE,
    },
};

/// Read-only access to the database file. The pager exposes positioned
/// reads and knows the page geometry; it holds no cache and no dirty state.
pub struct Pager {
    file: File,
    path: PathBuf,
    header: FileHeader,
    page_count: u32,
}

impl Pager {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let mut file = File::open(path)?;

        let mut header_buffer = [0u8; FILE_HEADER_SIZE];
        file.read_exact(&mut header_buffer)?;
        let header = FileHeader::from_bytes(&header_buffer)?;

        let file_size = file.metadata()?.len();
        let page_count = (file_size / header.page_size as u64) as u32;
        debug!(
            path = %path.display(),
            page_size = header.page_size,
            page_count,
            "opened database"
        );

        Ok(Self {
            file,
            path: path.to_path_buf(),
            header,
            page_count,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn page_size(&self) -> u32 {
        self.header.page_size
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// File offset of the first byte of a page. Pages are numbered from 1.
    pub fn page_offset(&self, page: PageId) -> u64 {
        (page as u64 - 1) * self.header.page_size as u64
    }

    /// Offset of a page's B-tree header. Page 1 carries the 100-byte
    /// database header first; every other page starts with its B-tree
    /// header directly.
    pub fn btree_header_offset(&self, page: PageId) -> usize {
        if page == 1 {
            FILE_HEADER_SIZE
        } else {
            0
        }
    }

    /// Read exactly `len` bytes at `offset`. A short read is an error.
    pub fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>, DatabaseError> {
        let mut buffer = vec![0u8; len];
        self.file.read_exact_at(&mut buffer, offset)?;
        Ok(buffer)
    }

    /// Read a whole page into memory.
    pub fn read_page(&self, page: PageId) -> Result<Vec<u8>, DatabaseError> {
        if page == 0 || page > self.page_count {
            return Err(DatabaseError::CorruptedPage {
                page,
                reason: format!("page number out of range (1..={})", self.page_count),
            });
        }
        self.read_at(self.page_offset(page), self.header.page_size as usize)
    }

    /// Read and parse a page's B-tree header without loading the full page.
    pub fn read_btree_header(&self, page: PageId) -> Result<BTreePageHeader, DatabaseError> {
        let offset = self.page_offset(page) + self.btree_header_offset(page) as u64;
        // interior headers are the larger variant; one read covers both
        let buffer = self.read_at(offset, crate::types::INTERIOR_PAGE_HEADER_SIZE)?;
        BTreePageHeader::from_bytes(&buffer)
    }
}
