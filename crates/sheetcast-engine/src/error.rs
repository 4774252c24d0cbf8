//! Error types for sheetcast-engine.

use thiserror::Error;

/// Errors from encoding, decoding or parsing delimited tables.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table is not valid UTF-16 text")]
    Encoding,

    #[error("Unterminated quoted field in record {record}")]
    UnterminatedQuote { record: usize },
}

/// Errors raised by a shared image buffer.
#[derive(Error, Debug)]
pub enum BufferError {
    #[error("Image buffer unavailable: {0}")]
    Unavailable(String),

    #[error("Image buffer rejected the image: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, TableError>;
