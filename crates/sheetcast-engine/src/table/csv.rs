//! CSV dialect used for table output.
//!
//! Fields are quoted only when they contain the delimiter, a quote or a line
//! break; quotes inside a quoted field are doubled. Records end with `\r\n`.

use crate::error::{Result, TableError};
use crate::grid::CellGrid;
use std::borrow::Cow;

pub const DELIMITER: char = ',';
pub const QUOTE: char = '"';
pub const RECORD_TERMINATOR: &str = "\r\n";

/// Render a grid as CSV text, one record per row in column order.
pub fn write_table_text(grid: &CellGrid) -> String {
    let mut out = String::new();
    for row in grid.iter_rows() {
        let fields: Vec<String> = row.iter().map(|cell| cell.display()).collect();
        if let [only] = fields.as_slice() {
            if only.is_empty() {
                // A bare empty line would read back as "no record".
                out.push_str("\"\"");
                out.push_str(RECORD_TERMINATOR);
                continue;
            }
        }
        let escaped: Vec<Cow<'_, str>> = fields.iter().map(|f| escape_field(f)).collect();
        out.push_str(&escaped.join(","));
        out.push_str(RECORD_TERMINATOR);
    }
    out
}

/// Escape a field for CSV output.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([DELIMITER, QUOTE, '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Parse CSV text into records. Quoted fields may span lines; unquoted
/// fields keep their whitespace. Both `\r\n` and `\n` end a record.
pub fn parse_table(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut record_started = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                // Check for escaped quote
                if chars.peek() == Some(&QUOTE) {
                    current.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
            continue;
        }

        match c {
            QUOTE => {
                in_quotes = true;
                record_started = true;
            }
            DELIMITER => {
                fields.push(std::mem::take(&mut current));
                record_started = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut current));
                records.push(std::mem::take(&mut fields));
                record_started = false;
            }
            _ => {
                current.push(c);
                record_started = true;
            }
        }
    }

    if in_quotes {
        return Err(TableError::UnterminatedQuote {
            record: records.len() + 1,
        });
    }
    if record_started {
        fields.push(current);
        records.push(fields);
    }
    Ok(records)
}
