//! Reads a worksheet's used range into a [`CellGrid`].

use crate::error::HostError;
use crate::host::AutomationHost;
use crate::session::Worksheet;
use sheetcast_engine::{CellGrid, ImageBuffer};
use tracing::debug;

/// Read the occupied rectangle of a sheet.
///
/// Cells are addressed 1..=rows, 1..=cols relative to the rectangle's origin,
/// the same way the host addresses cells inside a range.
pub fn read_grid<H, B>(sheet: &mut Worksheet<'_, H, B>) -> Result<CellGrid, HostError>
where
    H: AutomationHost,
    B: ImageBuffer,
{
    let Some(range) = sheet.used_range()? else {
        debug!(sheet = sheet.name(), "Sheet has no used range");
        return Ok(CellGrid::default());
    };

    let mut grid = CellGrid::new(range.rows(), range.cols());
    for row in 1..=range.rows() {
        for col in 1..=range.cols() {
            let Some(cell) = range.cell(row, col) else {
                continue;
            };
            let value = sheet.cell_value(cell)?;
            grid.set(row - 1, col - 1, value);
        }
    }

    debug!(sheet = sheet.name(), range = %range, "Read used range");
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{MemoryHost, MemoryLauncher, MemoryWorkbook, SheetFault};
    use crate::session::AutomationSession;
    use sheetcast_engine::{CellRef, CellValue, MemoryImageBuffer};
    use tempfile::NamedTempFile;

    type Session = AutomationSession<MemoryHost, MemoryImageBuffer>;

    fn open(launcher: &MemoryLauncher) -> (NamedTempFile, Session) {
        let doc = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let session =
            AutomationSession::open(launcher, MemoryImageBuffer::new(), doc.path()).unwrap();
        (doc, session)
    }

    #[test]
    fn test_reads_offset_used_range() {
        let launcher = MemoryLauncher::new(MemoryWorkbook::new().sheet_at(
            "Data",
            CellRef::new(1, 2),
            CellGrid::from_rows(vec![
                vec![CellValue::from("Name"), CellValue::from("Qty")],
                vec![CellValue::from("Widget"), CellValue::from(5.0)],
            ]),
        ));
        let (_doc, mut session) = open(&launcher);
        let mut sheet = session.sheet("Data").unwrap();
        let grid = read_grid(&mut sheet).unwrap();
        assert_eq!(grid.to_strings(), vec![vec!["Name", "Qty"], vec!["Widget", "5"]]);
    }

    #[test]
    fn test_empty_sheet_reads_as_empty_grid() {
        let launcher =
            MemoryLauncher::new(MemoryWorkbook::new().sheet("Blank", CellGrid::default()));
        let (_doc, mut session) = open(&launcher);
        let mut sheet = session.sheet("Blank").unwrap();
        let grid = read_grid(&mut sheet).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (0, 0));
    }

    #[test]
    fn test_read_fault_propagates() {
        let launcher = MemoryLauncher::new(
            MemoryWorkbook::new().sheet("Data", CellGrid::from_rows(vec![vec!["x"]])),
        )
        .with_fault("Data", SheetFault::ReadFails);
        let (_doc, mut session) = open(&launcher);
        let mut sheet = session.sheet("Data").unwrap();
        assert!(matches!(read_grid(&mut sheet), Err(HostError::Call(_))));
    }
}
