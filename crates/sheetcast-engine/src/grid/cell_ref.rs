//! Cell and range references.
//!
//! Zero-indexed column/row coordinates, printed in spreadsheet notation
//! ("A1", "B2:D10").
//!
//! # Examples
//!
//! ```
//! use sheetcast_engine::{CellRef, RangeRef};
//!
//! let range = RangeRef::new(CellRef::new(1, 2), CellRef::new(3, 3));
//! assert_eq!(range.to_string(), "B3:D4");
//! assert_eq!((range.rows(), range.cols()), (2, 3));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

/// An inclusive rectangle of cells, normalized so `start` is the top-left corner.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct RangeRef {
    pub start: CellRef,
    pub end: CellRef,
}

impl RangeRef {
    pub fn new(a: CellRef, b: CellRef) -> RangeRef {
        RangeRef {
            start: CellRef::new(a.col.min(b.col), a.row.min(b.row)),
            end: CellRef::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    /// Number of rows spanned.
    pub fn rows(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    /// Number of columns spanned.
    pub fn cols(&self) -> usize {
        self.end.col - self.start.col + 1
    }

    /// Absolute cell at a 1-indexed (row, col) position inside the range,
    /// matching the host's native `Range.Cells(row, col)` addressing.
    pub fn cell(&self, row: usize, col: usize) -> Option<CellRef> {
        if row == 0 || col == 0 || row > self.rows() || col > self.cols() {
            return None;
        }
        Some(CellRef::new(self.start.col + col - 1, self.start.row + row - 1))
    }
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CellRef::new(0, 0).to_string(), "A1");
        assert_eq!(CellRef::new(27, 9).to_string(), "AB10");
    }

    #[test]
    fn test_col_to_letters() {
        assert_eq!(CellRef::col_to_letters(0), "A");
        assert_eq!(CellRef::col_to_letters(25), "Z");
        assert_eq!(CellRef::col_to_letters(26), "AA");
        assert_eq!(CellRef::col_to_letters(701), "ZZ");
    }

    #[test]
    fn test_range_is_normalized() {
        let range = RangeRef::new(CellRef::new(2, 4), CellRef::new(0, 1));
        assert_eq!(range.to_string(), "A2:C5");
        assert_eq!(range.rows(), 4);
        assert_eq!(range.cols(), 3);
    }

    #[test]
    fn test_single_cell_range() {
        let range = RangeRef::new(CellRef::new(1, 1), CellRef::new(1, 1));
        assert_eq!((range.rows(), range.cols()), (1, 1));
        assert_eq!(range.to_string(), "B2:B2");
    }

    #[test]
    fn test_range_cell_is_one_indexed() {
        let range = RangeRef::new(CellRef::new(1, 2), CellRef::new(3, 3));
        assert_eq!(range.cell(1, 1), Some(CellRef::new(1, 2)));
        assert_eq!(range.cell(2, 3), Some(CellRef::new(3, 3)));
        assert_eq!(range.cell(0, 1), None);
        assert_eq!(range.cell(3, 1), None);
        assert_eq!(range.cell(1, 4), None);
    }
}
