use thiserror::Error;

use crate::planner::error::PlannerError;
use crate::types::PageId;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid database header: {reason}")]
    InvalidHeader { reason: String },

    #[error("Invalid page type: {0}")]
    InvalidPageType(u8),

    #[error("Corrupted page: page={page}, reason={reason}")]
    CorruptedPage { page: PageId, reason: String },

    #[error("Malformed varint: buffer ended before a terminating byte")]
    MalformedVarint,

    #[error("Malformed record: {reason}")]
    MalformedRecord { reason: String },

    #[error("Serial type {serial_type} is not supported for {operation}")]
    UnsupportedSerialType {
        serial_type: u64,
        operation: &'static str,
    },

    #[error("Table '{name}' not found")]
    TableNotFound { name: String },

    #[error("Column '{name}' not found in table '{table}'")]
    ColumnNotFound { name: String, table: String },

    #[error("SQL error: {0}")]
    Sql(#[from] PlannerError),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
