//! Delimited-text tables: minimal-quoting CSV written as UTF-16LE with a BOM.

mod csv;
mod encoding;

pub use csv::{DELIMITER, QUOTE, RECORD_TERMINATOR, escape_field, parse_table, write_table_text};
pub use encoding::{BOM, decode_table, encode_table};

use crate::error::Result;
use crate::grid::CellGrid;
use std::fs;
use std::path::Path;

/// Serialize a grid to the bytes written on disk.
pub fn serialize(grid: &CellGrid) -> Vec<u8> {
    encode_table(&write_table_text(grid))
}

/// Write a grid to a table file.
pub fn write_table(path: &Path, grid: &CellGrid) -> Result<()> {
    fs::write(path, serialize(grid))?;
    Ok(())
}

/// Read a table file back into rows of fields.
pub fn read_table(path: &Path) -> Result<Vec<Vec<String>>> {
    let bytes = fs::read(path)?;
    let text = decode_table(&bytes)?;
    parse_table(&text)
}
