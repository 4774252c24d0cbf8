//! Scoped automation sessions.
//!
//! An [`AutomationSession`] owns a running host, the workbook it has open and
//! the shared image buffer. Teardown (close the workbook without saving, then
//! quit the host) runs exactly once: either through [`AutomationSession::close`]
//! or when the session is dropped, including when opening the document failed
//! after the host had already started.

mod worksheet;

pub use worksheet::Worksheet;

use crate::error::{ExtractError, HostError, Result, SheetError};
use crate::host::{AutomationHost, HostLauncher};
use sheetcast_engine::ImageBuffer;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A running host with one open document.
pub struct AutomationSession<H: AutomationHost, B: ImageBuffer> {
    host: Option<H>,
    buffer: B,
    document: Option<PathBuf>,
}

impl<H: AutomationHost, B: ImageBuffer> AutomationSession<H, B> {
    /// Start a host and open `path` in it.
    pub fn open<L>(launcher: &L, buffer: B, path: &Path) -> Result<Self>
    where
        L: HostLauncher<Host = H>,
    {
        if !path.exists() {
            return Err(ExtractError::DocumentNotFound(path.to_path_buf()));
        }

        let host = launcher.launch().map_err(ExtractError::HostStart)?;
        debug!("Automation host started");

        let mut session = AutomationSession {
            host: Some(host),
            buffer,
            document: None,
        };
        // On failure the partially opened session is dropped here, which
        // still quits the host.
        session
            .host_mut()?
            .open_workbook(path)
            .map_err(ExtractError::Open)?;
        session.document = Some(path.to_path_buf());

        info!(document = %path.display(), "Automation session opened");
        Ok(session)
    }

    /// Path of the open document, until the session is closed.
    pub fn document(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.host.is_none()
    }

    /// Names of the document's sheets, in workbook order.
    pub fn list_sheets(&mut self) -> std::result::Result<Vec<String>, HostError> {
        self.host_mut()?.sheet_names()
    }

    /// Make the named sheet the active sheet.
    ///
    /// The host resolves the name itself, so this never lists the workbook.
    pub fn sheet(&mut self, name: &str) -> std::result::Result<Worksheet<'_, H, B>, SheetError> {
        match self.host_mut().and_then(|host| host.activate(name)) {
            Ok(()) => Ok(Worksheet::new(self, name)),
            Err(HostError::NoSuchSheet(_)) => Err(SheetError::SheetNotFound(name.to_string())),
            Err(e) => Err(SheetError::Read(e)),
        }
    }

    /// Close the document without saving and shut the host down.
    ///
    /// Safe to call more than once; only the first call does anything.
    pub fn close(&mut self) {
        let Some(mut host) = self.host.take() else {
            return;
        };

        if let Some(document) = self.document.take() {
            if let Err(e) = host.close_workbook() {
                warn!(document = %document.display(), error = %e, "Failed to close workbook");
            }
        }
        if let Err(e) = host.quit() {
            warn!(error = %e, "Failed to quit automation host");
        }
        info!("Automation session closed");
    }

    fn host_mut(&mut self) -> std::result::Result<&mut H, HostError> {
        self.host
            .as_mut()
            .ok_or_else(|| HostError::Disconnected("session is closed".to_string()))
    }

    /// Host and buffer together, for the copy pipeline.
    pub(crate) fn parts(&mut self) -> std::result::Result<(&mut H, &mut B), HostError> {
        let host = self
            .host
            .as_mut()
            .ok_or_else(|| HostError::Disconnected("session is closed".to_string()))?;
        Ok((host, &mut self.buffer))
    }
}

impl<H: AutomationHost, B: ImageBuffer> Drop for AutomationSession<H, B> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{MemoryLauncher, MemoryWorkbook};
    use sheetcast_engine::{CellGrid, MemoryImageBuffer};

    fn document() -> tempfile::NamedTempFile {
        tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap()
    }

    fn launcher() -> MemoryLauncher {
        MemoryLauncher::new(
            MemoryWorkbook::new()
                .sheet("Overview", CellGrid::from_rows(vec![vec!["a"]]))
                .sheet("Details", CellGrid::default()),
        )
    }

    #[test]
    fn test_close_is_idempotent() {
        let doc = document();
        let launcher = launcher();
        let mut session =
            AutomationSession::open(&launcher, MemoryImageBuffer::new(), doc.path()).unwrap();
        session.close();
        session.close();
        drop(session);

        let stats = launcher.stats();
        assert_eq!(stats.workbook_closes, 1);
        assert_eq!(stats.quits, 1);
    }

    #[test]
    fn test_drop_tears_down() {
        let doc = document();
        let launcher = launcher();
        {
            let session =
                AutomationSession::open(&launcher, MemoryImageBuffer::new(), doc.path()).unwrap();
            assert_eq!(session.document(), Some(doc.path()));
        }
        let stats = launcher.stats();
        assert_eq!(stats.workbook_opens, 1);
        assert_eq!(stats.workbook_closes, 1);
        assert_eq!(stats.quits, 1);
    }

    #[test]
    fn test_failed_open_still_quits_host() {
        let doc = document();
        let launcher = launcher().failing_open();
        let result = AutomationSession::open(&launcher, MemoryImageBuffer::new(), doc.path());
        assert!(matches!(result, Err(ExtractError::Open(_))));

        let stats = launcher.stats();
        assert_eq!(stats.launches, 1);
        assert_eq!(stats.workbook_closes, 0);
        assert_eq!(stats.quits, 1);
    }

    #[test]
    fn test_missing_document_never_launches() {
        let launcher = launcher();
        let result = AutomationSession::open(
            &launcher,
            MemoryImageBuffer::new(),
            Path::new("/no/such/book.xlsx"),
        );
        assert!(matches!(result, Err(ExtractError::DocumentNotFound(_))));
        assert_eq!(launcher.stats().launches, 0);
    }

    #[test]
    fn test_sheet_lookup() {
        let doc = document();
        let launcher = launcher();
        let mut session =
            AutomationSession::open(&launcher, MemoryImageBuffer::new(), doc.path()).unwrap();
        assert_eq!(session.list_sheets().unwrap(), vec!["Overview", "Details"]);
        assert!(session.sheet("Overview").is_ok());
        assert!(matches!(
            session.sheet("Missing"),
            Err(SheetError::SheetNotFound(name)) if name == "Missing"
        ));
        assert_eq!(launcher.stats().sheet_listings, 1);
    }

    #[test]
    fn test_closed_session_reports_disconnect() {
        let doc = document();
        let launcher = launcher();
        let mut session =
            AutomationSession::open(&launcher, MemoryImageBuffer::new(), doc.path()).unwrap();
        session.close();
        assert!(session.is_closed());
        assert!(session.list_sheets().unwrap_err().is_fatal());
    }
}
