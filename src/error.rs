//! Error types for the sheetcast command line

use thiserror::Error;

/// Problems with the command line itself, reported before any host starts.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value for {option}: {value}")]
    InvalidValue { option: &'static str, value: String },

    #[error("Expected SHEET=KIND, got '{0}'")]
    BadPair(String),

    #[error("Invalid --request JSON: {0}")]
    BadRequest(#[from] serde_json::Error),

    #[error("No spreadsheet file given")]
    MissingFile,

    #[error("No sheets requested; pass SHEET=KIND pairs, --request or --list")]
    NothingRequested,
}

pub type Result<T> = std::result::Result<T, CliError>;
