//! Cell data structures for grids read out of a worksheet.
//!
//! - [`CellValue`] - The content of a single cell (empty, text or number)
//! - [`CellGrid`] - A dense, row-major rectangle of values

use serde::{Deserialize, Serialize};

use super::format::format_number;

/// The value held by a cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Text written for this cell. Empty cells become an empty string,
    /// never a null marker.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// A rectangle of cell values covering a worksheet's used range.
///
/// `rows == 0` exactly when `cols == 0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellGrid {
    rows: usize,
    cols: usize,
    cells: Vec<CellValue>,
}

impl CellGrid {
    /// Create a grid of empty cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        let (rows, cols) = if rows == 0 || cols == 0 {
            (0, 0)
        } else {
            (rows, cols)
        };
        CellGrid {
            rows,
            cols,
            cells: vec![CellValue::Empty; rows * cols],
        }
    }

    /// Build a grid from rows of values. Short rows are padded with empty cells.
    pub fn from_rows<R, V>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let rows: Vec<Vec<CellValue>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = CellGrid::new(rows.len(), cols);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                grid.set(r, c, value);
            }
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Value at a 0-indexed position.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// Set the value at a 0-indexed position. Out-of-bounds writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = value;
        }
    }

    /// Iterate rows in order, each as a slice in column order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[CellValue]> {
        // chunks() panics on a zero size, so empty grids yield nothing instead.
        self.cells.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Display strings of every cell, row by row.
    pub fn to_strings(&self) -> Vec<Vec<String>> {
        self.iter_rows()
            .map(|row| row.iter().map(CellValue::display).collect())
            .collect()
    }
}
