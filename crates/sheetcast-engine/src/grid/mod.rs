//! Cell grid API.
//!
//! - [`CellValue`], [`CellGrid`] - Values read out of a worksheet's used range
//! - [`CellRef`], [`RangeRef`] - A1 addressing for cells and rectangles
//! - [`format_number`] - Number rendering used when a grid is written out

mod cell;
mod cell_ref;
mod format;

pub use cell::{CellGrid, CellValue};
pub use cell_ref::{CellRef, RangeRef};
pub use format::format_number;
