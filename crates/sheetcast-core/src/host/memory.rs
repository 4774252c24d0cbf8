//! Scripted in-memory host.
//!
//! Serves a workbook defined in code and can be told to misbehave on a given
//! sheet. Every launched host shares one [`HostStats`] with its launcher, so
//! callers can check how often the host was started, opened and shut down.

use super::{AutomationHost, CopyStatus, HostLauncher, HostResult, render_snapshot};
use crate::error::HostError;
use sheetcast_engine::{CellGrid, CellRef, CellValue, ImageBuffer, RangeRef};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Lifecycle counters shared between a launcher and its hosts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostStats {
    pub launches: usize,
    pub workbook_opens: usize,
    pub workbook_closes: usize,
    pub quits: usize,
    pub copies: usize,
    pub sheet_listings: usize,
    /// Paths passed to `open_workbook`, in call order.
    pub opened: Vec<PathBuf>,
}

/// Misbehaviour to simulate on one sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SheetFault {
    /// Every cell read fails.
    ReadFails,
    /// The copy is accepted but nothing ever reaches the buffer.
    CopyNeverArrives,
    /// The copy completes without putting an image in the buffer.
    CopyEmpty,
    /// The host process dies when the sheet is touched.
    Crash,
}

/// A sheet placed at an origin cell.
#[derive(Clone, Debug)]
struct MemorySheet {
    name: String,
    origin: CellRef,
    grid: CellGrid,
}

/// Workbook contents served by [`MemoryHost`].
#[derive(Clone, Debug, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet whose data starts at A1.
    pub fn sheet(self, name: &str, grid: CellGrid) -> Self {
        self.sheet_at(name, CellRef::new(0, 0), grid)
    }

    /// Add a sheet whose data starts at `origin`.
    pub fn sheet_at(mut self, name: &str, origin: CellRef, grid: CellGrid) -> Self {
        self.sheets.push(MemorySheet {
            name: name.to_string(),
            origin,
            grid,
        });
        self
    }
}

/// Launches [`MemoryHost`] instances over a shared workbook.
#[derive(Clone, Debug, Default)]
pub struct MemoryLauncher {
    workbook: MemoryWorkbook,
    faults: HashMap<String, SheetFault>,
    fail_launch: bool,
    fail_open: bool,
    stats: Arc<Mutex<HostStats>>,
}

impl MemoryLauncher {
    pub fn new(workbook: MemoryWorkbook) -> Self {
        MemoryLauncher {
            workbook,
            ..Self::default()
        }
    }

    pub fn with_fault(mut self, sheet: &str, fault: SheetFault) -> Self {
        self.faults.insert(sheet.to_string(), fault);
        self
    }

    /// Make `launch` fail.
    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    /// Start fine but refuse to open the workbook.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Snapshot of the lifecycle counters.
    pub fn stats(&self) -> HostStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HostLauncher for MemoryLauncher {
    type Host = MemoryHost;

    fn launch(&self) -> HostResult<MemoryHost> {
        if self.fail_launch {
            return Err(HostError::Launch("simulated launch failure".to_string()));
        }
        let host = MemoryHost {
            workbook: self.workbook.clone(),
            faults: self.faults.clone(),
            fail_open: self.fail_open,
            stats: Arc::clone(&self.stats),
            open: false,
            running: true,
            active: None,
            selection: None,
        };
        host.record(|s| s.launches += 1);
        Ok(host)
    }
}

/// In-memory automation host.
#[derive(Debug)]
pub struct MemoryHost {
    workbook: MemoryWorkbook,
    faults: HashMap<String, SheetFault>,
    fail_open: bool,
    stats: Arc<Mutex<HostStats>>,
    open: bool,
    running: bool,
    active: Option<String>,
    selection: Option<(String, RangeRef)>,
}

impl MemoryHost {
    fn record(&self, f: impl FnOnce(&mut HostStats)) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *stats);
    }

    fn ensure_open(&self) -> HostResult<()> {
        if !self.running {
            return Err(HostError::Disconnected("host process exited".to_string()));
        }
        if !self.open {
            return Err(HostError::NoWorkbook);
        }
        Ok(())
    }

    fn sheet(&mut self, name: &str) -> HostResult<&MemorySheet> {
        self.ensure_open()?;
        if self.faults.get(name) == Some(&SheetFault::Crash) {
            self.running = false;
            return Err(HostError::Disconnected(format!(
                "host process exited while reading '{}'",
                name
            )));
        }
        self.workbook
            .sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| HostError::NoSuchSheet(name.to_string()))
    }
}

impl AutomationHost for MemoryHost {
    fn open_workbook(&mut self, path: &Path) -> HostResult<()> {
        if !self.running {
            return Err(HostError::Disconnected("host process exited".to_string()));
        }
        if self.fail_open {
            return Err(HostError::Open {
                path: path.to_path_buf(),
                message: "simulated open failure".to_string(),
            });
        }
        self.open = true;
        self.record(|s| {
            s.workbook_opens += 1;
            s.opened.push(path.to_path_buf());
        });
        Ok(())
    }

    fn sheet_names(&mut self) -> HostResult<Vec<String>> {
        self.ensure_open()?;
        self.record(|s| s.sheet_listings += 1);
        Ok(self.workbook.sheets.iter().map(|s| s.name.clone()).collect())
    }

    fn activate(&mut self, sheet: &str) -> HostResult<()> {
        self.sheet(sheet)?;
        self.active = Some(sheet.to_string());
        Ok(())
    }

    fn used_range(&mut self, sheet: &str) -> HostResult<Option<RangeRef>> {
        let sheet = self.sheet(sheet)?;
        if sheet.grid.is_empty() {
            return Ok(None);
        }
        let origin = sheet.origin;
        let end = CellRef::new(
            origin.col + sheet.grid.cols() - 1,
            origin.row + sheet.grid.rows() - 1,
        );
        Ok(Some(RangeRef::new(origin, end)))
    }

    fn cell_value(&mut self, sheet: &str, cell: CellRef) -> HostResult<CellValue> {
        if self.faults.get(sheet) == Some(&SheetFault::ReadFails) {
            return Err(HostError::Call(format!("simulated read fault at {}", cell)));
        }
        let sheet = self.sheet(sheet)?;
        let (Some(row), Some(col)) = (
            cell.row.checked_sub(sheet.origin.row),
            cell.col.checked_sub(sheet.origin.col),
        ) else {
            return Ok(CellValue::Empty);
        };
        Ok(sheet.grid.get(row, col).cloned().unwrap_or_default())
    }

    fn select(&mut self, sheet: &str, range: RangeRef) -> HostResult<()> {
        self.activate(sheet)?;
        self.selection = Some((sheet.to_string(), range));
        Ok(())
    }

    fn copy_selection(&mut self, buffer: &mut dyn ImageBuffer) -> HostResult<CopyStatus> {
        self.ensure_open()?;
        let (sheet, range) = self.selection.clone().ok_or(HostError::NoSelection)?;
        self.record(|s| s.copies += 1);

        match self.faults.get(&sheet) {
            Some(SheetFault::CopyNeverArrives) => return Ok(CopyStatus::Pending),
            Some(SheetFault::CopyEmpty) => return Ok(CopyStatus::Completed),
            _ => {}
        }

        let mut grid = CellGrid::new(range.rows(), range.cols());
        for row in 1..=range.rows() {
            for col in 1..=range.cols() {
                if let Some(cell) = range.cell(row, col) {
                    let value = self.cell_value(&sheet, cell)?;
                    grid.set(row - 1, col - 1, value);
                }
            }
        }
        buffer.store(render_snapshot(&grid))?;
        Ok(CopyStatus::Completed)
    }

    fn close_workbook(&mut self) -> HostResult<()> {
        self.ensure_open()?;
        self.open = false;
        self.active = None;
        self.selection = None;
        self.record(|s| s.workbook_closes += 1);
        Ok(())
    }

    fn quit(&mut self) -> HostResult<()> {
        // A crashed host still counts as shut down by its owner.
        self.record(|s| s.quits += 1);
        self.running = false;
        self.open = false;
        Ok(())
    }
}
