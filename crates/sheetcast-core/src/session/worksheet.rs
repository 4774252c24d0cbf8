use super::AutomationSession;
use crate::error::HostError;
use crate::host::AutomationHost;
use sheetcast_engine::{CellRef, CellValue, ImageBuffer, RangeRef};

/// A live sheet inside an open session.
///
/// Borrows the session mutably, so it cannot outlive it and only one sheet is
/// worked on at a time.
pub struct Worksheet<'s, H: AutomationHost, B: ImageBuffer> {
    session: &'s mut AutomationSession<H, B>,
    name: String,
}

impl<'s, H: AutomationHost, B: ImageBuffer> Worksheet<'s, H, B> {
    pub(super) fn new(session: &'s mut AutomationSession<H, B>, name: &str) -> Self {
        Worksheet {
            session,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The occupied rectangle, or `None` for a sheet without cells.
    pub fn used_range(&mut self) -> Result<Option<RangeRef>, HostError> {
        let (host, _) = self.session.parts()?;
        host.used_range(&self.name)
    }

    pub fn cell_value(&mut self, cell: CellRef) -> Result<CellValue, HostError> {
        let (host, _) = self.session.parts()?;
        host.cell_value(&self.name, cell)
    }

    /// Host and shared image buffer, for the copy pipeline.
    pub(crate) fn parts(&mut self) -> Result<(&mut H, &mut B), HostError> {
        self.session.parts()
    }
}
