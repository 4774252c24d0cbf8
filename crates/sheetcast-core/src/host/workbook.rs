//! Spreadsheet-file host backed by `calamine`.
//!
//! Runs in-process: workbooks are parsed straight from disk (xlsx, xlsm,
//! xlsb, xls, ods) and "copy as picture" renders the selection into the
//! image buffer before returning.

use super::{AutomationHost, CopyStatus, HostLauncher, HostResult, render_snapshot};
use crate::error::HostError;
use calamine::{Data, DataType, Range, Reader, Sheets, open_workbook_auto};
use chrono::Duration;
use sheetcast_engine::{CellGrid, CellRef, CellValue, ImageBuffer, RangeRef};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Launches [`CalamineHost`] instances.
#[derive(Clone, Copy, Debug, Default)]
pub struct CalamineLauncher;

impl HostLauncher for CalamineLauncher {
    type Host = CalamineHost;

    fn launch(&self) -> HostResult<CalamineHost> {
        debug!("Starting spreadsheet-file host");
        Ok(CalamineHost::new())
    }
}

/// Automation host that reads spreadsheet files directly.
pub struct CalamineHost {
    running: bool,
    workbook: Option<Sheets<BufReader<File>>>,
    /// Worksheet ranges loaded so far, keyed by sheet name.
    ranges: HashMap<String, Range<Data>>,
    active: Option<String>,
    selection: Option<(String, RangeRef)>,
}

impl CalamineHost {
    pub fn new() -> Self {
        CalamineHost {
            running: true,
            workbook: None,
            ranges: HashMap::new(),
            active: None,
            selection: None,
        }
    }

    pub fn active_sheet(&self) -> Option<&str> {
        self.active.as_deref()
    }

    fn ensure_running(&self) -> HostResult<()> {
        if self.running {
            Ok(())
        } else {
            Err(HostError::Disconnected("host has quit".to_string()))
        }
    }

    fn workbook(&mut self) -> HostResult<&mut Sheets<BufReader<File>>> {
        self.ensure_running()?;
        self.workbook.as_mut().ok_or(HostError::NoWorkbook)
    }

    fn range(&mut self, sheet: &str) -> HostResult<&Range<Data>> {
        if !self.ranges.contains_key(sheet) {
            let workbook = self.workbook()?;
            if !workbook.sheet_names().iter().any(|name| name == sheet) {
                return Err(HostError::NoSuchSheet(sheet.to_string()));
            }
            let range = workbook
                .worksheet_range(sheet)
                .map_err(|e| HostError::Call(e.to_string()))?;
            debug!(sheet, "Loaded worksheet range");
            self.ranges.insert(sheet.to_string(), range);
        }
        self.ranges
            .get(sheet)
            .ok_or_else(|| HostError::NoSuchSheet(sheet.to_string()))
    }
}

impl Default for CalamineHost {
    fn default() -> Self {
        Self::new()
    }
}

/// How date and time cells are written out.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert a calamine cell into a grid value.
///
/// Dates become text in [`DATETIME_FORMAT`] and durations become `H:MM:SS`,
/// so date-styled cells are not written as bare serial numbers.
fn to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) if dt.is_duration() => dt
            .as_duration()
            .map(|d| CellValue::Text(format_duration(d)))
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| CellValue::Text(d.format(DATETIME_FORMAT).to_string()))
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => data
            .as_datetime()
            .map(|d| CellValue::Text(d.format(DATETIME_FORMAT).to_string()))
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => data
            .as_duration()
            .map(|d| CellValue::Text(format_duration(d)))
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        other => CellValue::Text(other.to_string()),
    }
}

fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

impl AutomationHost for CalamineHost {
    fn open_workbook(&mut self, path: &Path) -> HostResult<()> {
        self.ensure_running()?;
        if self.workbook.is_some() {
            return Err(HostError::Call("a workbook is already open".to_string()));
        }
        let workbook = open_workbook_auto(path).map_err(|e| HostError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.workbook = Some(workbook);
        Ok(())
    }

    fn sheet_names(&mut self) -> HostResult<Vec<String>> {
        Ok(self.workbook()?.sheet_names())
    }

    fn activate(&mut self, sheet: &str) -> HostResult<()> {
        self.range(sheet)?;
        self.active = Some(sheet.to_string());
        Ok(())
    }

    fn used_range(&mut self, sheet: &str) -> HostResult<Option<RangeRef>> {
        let range = self.range(sheet)?;
        let (Some((r0, c0)), Some((r1, c1))) = (range.start(), range.end()) else {
            return Ok(None);
        };
        if range.is_empty() {
            return Ok(None);
        }
        Ok(Some(RangeRef::new(
            CellRef::new(c0 as usize, r0 as usize),
            CellRef::new(c1 as usize, r1 as usize),
        )))
    }

    fn cell_value(&mut self, sheet: &str, cell: CellRef) -> HostResult<CellValue> {
        let range = self.range(sheet)?;
        Ok(range
            .get_value((cell.row as u32, cell.col as u32))
            .map(to_cell_value)
            .unwrap_or_default())
    }

    fn select(&mut self, sheet: &str, range: RangeRef) -> HostResult<()> {
        self.activate(sheet)?;
        self.selection = Some((sheet.to_string(), range));
        Ok(())
    }

    fn copy_selection(&mut self, buffer: &mut dyn ImageBuffer) -> HostResult<CopyStatus> {
        self.ensure_running()?;
        let (sheet, selected) = self.selection.clone().ok_or(HostError::NoSelection)?;

        let mut grid = CellGrid::new(selected.rows(), selected.cols());
        for row in 1..=selected.rows() {
            for col in 1..=selected.cols() {
                if let Some(cell) = selected.cell(row, col) {
                    let value = self.cell_value(&sheet, cell)?;
                    grid.set(row - 1, col - 1, value);
                }
            }
        }

        let image = render_snapshot(&grid);
        debug!(
            sheet = %sheet,
            range = %selected,
            width = image.width(),
            height = image.height(),
            "Rendered selection"
        );
        if image.width() > 0 && image.height() > 0 {
            buffer.store(image)?;
        }
        Ok(CopyStatus::Completed)
    }

    fn close_workbook(&mut self) -> HostResult<()> {
        self.ensure_running()?;
        self.workbook.take().ok_or(HostError::NoWorkbook)?;
        self.ranges.clear();
        self.active = None;
        self.selection = None;
        Ok(())
    }

    fn quit(&mut self) -> HostResult<()> {
        self.ensure_running()?;
        self.workbook = None;
        self.ranges.clear();
        self.active = None;
        self.selection = None;
        self.running = false;
        Ok(())
    }
}
