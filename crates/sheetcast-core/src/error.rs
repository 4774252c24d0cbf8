//! Error types for sheetcast-core.
//!
//! [`ExtractError`] is fatal to a whole extraction call. [`SheetError`] is
//! scoped to one sheet and ends up in that sheet's outcome.

use sheetcast_engine::BufferError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by an automation host.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Automation host failed to start: {0}")]
    Launch(String),

    #[error("Failed to open workbook {}: {message}", path.display())]
    Open { path: PathBuf, message: String },

    #[error("No workbook is open")]
    NoWorkbook,

    #[error("Worksheet '{0}' does not exist")]
    NoSuchSheet(String),

    #[error("Nothing is selected")]
    NoSelection,

    #[error("Automation host is no longer running: {0}")]
    Disconnected(String),

    #[error("Automation host call failed: {0}")]
    Call(String),

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

impl HostError {
    /// Whether the host itself is gone, as opposed to one call failing.
    pub fn is_fatal(&self) -> bool {
        matches!(self, HostError::Disconnected(_))
    }
}

/// Failures of the screenshot pipeline.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Copy to image buffer failed: {0}")]
    CopyFailed(#[source] HostError),

    #[error("Image buffer is empty after copy")]
    BufferEmpty,

    #[error("Image buffer not filled within {0:?}")]
    CopyTimeout(Duration),
}

/// Per-sheet failures. These never abort sibling sheets.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("Unknown sheet type '{0}'. Use 'ui' or 'table'.")]
    UnknownKind(String),

    #[error("Failed to read sheet: {0}")]
    Read(#[source] HostError),

    #[error("Failed to save sheet as image")]
    Capture(#[source] CaptureError),

    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

impl SheetError {
    /// True when the underlying host fault takes the whole session down.
    pub fn is_fatal(&self) -> bool {
        match self {
            SheetError::Read(e) | SheetError::Capture(CaptureError::CopyFailed(e)) => e.is_fatal(),
            _ => false,
        }
    }
}

/// Errors that fail an entire extraction call.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Spreadsheet file not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    #[error("Unsupported spreadsheet type: {}", .0.display())]
    UnsupportedDocument(PathBuf),

    #[error("Failed to start automation host: {0}")]
    HostStart(#[source] HostError),

    #[error("{0}")]
    Open(#[source] HostError),

    #[error("Automation host failed: {0}")]
    Host(#[from] HostError),

    #[error("Automation host failed while processing sheet '{sheet}': {source}")]
    SessionLost { sheet: String, source: SheetError },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
