//! Automation host abstraction.
//!
//! An automation host is the external application that opens a spreadsheet
//! and manipulates it on our behalf. Hosts are stateful: they keep an open
//! workbook, an active sheet and a selection, much like a desktop
//! spreadsheet driven over an automation interface.
//!
//! Hosts are only ever reached through an [`AutomationSession`], which owns
//! the host handle and guarantees it is shut down.
//!
//! [`AutomationSession`]: crate::session::AutomationSession

mod workbook;
pub mod memory;
mod render;

pub use workbook::{CalamineHost, CalamineLauncher};
pub use render::render_snapshot;

use crate::error::HostError;
use sheetcast_engine::{CellRef, CellValue, ImageBuffer, RangeRef};
use std::path::Path;

pub type HostResult<T> = std::result::Result<T, HostError>;

/// How a host reports the end of a copy-as-picture request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyStatus {
    /// The image is in the buffer (or never will be) by the time the call returns.
    Completed,
    /// The copy continues in the background; the buffer has to be polled.
    Pending,
}

/// Operations an automation host exposes to a session.
///
/// Cell addresses are absolute positions in the worksheet.
pub trait AutomationHost {
    /// Open a workbook read-only.
    fn open_workbook(&mut self, path: &Path) -> HostResult<()>;

    /// Names of all sheets in the open workbook, in workbook order.
    fn sheet_names(&mut self) -> HostResult<Vec<String>>;

    /// Make a sheet the active one. Fails with [`HostError::NoSuchSheet`]
    /// when the workbook has no sheet by that name.
    fn activate(&mut self, sheet: &str) -> HostResult<()>;

    /// The sheet's occupied rectangle, or `None` when the sheet has no cells.
    fn used_range(&mut self, sheet: &str) -> HostResult<Option<RangeRef>>;

    /// Value of a single cell.
    fn cell_value(&mut self, sheet: &str, cell: CellRef) -> HostResult<CellValue>;

    /// Select a range on a sheet, replacing the current selection.
    fn select(&mut self, sheet: &str, range: RangeRef) -> HostResult<()>;

    /// Copy the current selection as a picture into the shared image buffer.
    ///
    /// Hosts that write to the system clipboard on their own may ignore
    /// `buffer`; in-process hosts store the rendered picture into it.
    fn copy_selection(&mut self, buffer: &mut dyn ImageBuffer) -> HostResult<CopyStatus>;

    /// Close the open workbook without saving.
    fn close_workbook(&mut self) -> HostResult<()>;

    /// Shut the host down.
    fn quit(&mut self) -> HostResult<()>;
}

/// Starts automation host instances.
pub trait HostLauncher {
    type Host: AutomationHost;

    fn launch(&self) -> HostResult<Self::Host>;
}
