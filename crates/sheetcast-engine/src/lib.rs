//! sheetcast-engine - cell grids, UTF-16 CSV tables and shared image buffers.
//!
//! Nothing in this crate talks to an automation host; it holds the data types
//! and codecs the extraction pipeline in `sheetcast-core` is built from.

pub mod buffer;
pub mod error;
pub mod grid;
pub mod table;

pub use buffer::{ImageBuffer, MemoryImageBuffer};
pub use error::{BufferError, Result, TableError};
pub use grid::{CellGrid, CellRef, CellValue, RangeRef};
