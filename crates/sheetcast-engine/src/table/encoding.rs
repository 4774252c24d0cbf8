//! UTF-16 little-endian encoding for table output.

use crate::error::{Result, TableError};
use encoding_rs::UTF_16LE;

/// Byte-order mark written at the start of every table.
pub const BOM: [u8; 2] = [0xFF, 0xFE];

/// Encode text as UTF-16LE, prefixed with a BOM.
pub fn encode_table(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + text.len() * 2);
    out.extend_from_slice(&BOM);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

/// Decode table bytes. A leading BOM selects the byte order; without one,
/// little-endian is assumed.
pub fn decode_table(bytes: &[u8]) -> Result<String> {
    let (text, _, had_errors) = UTF_16LE.decode(bytes);
    if had_errors {
        return Err(TableError::Encoding);
    }
    Ok(text.into_owned())
}
