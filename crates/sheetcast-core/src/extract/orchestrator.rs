use super::outcome::{ExtractionOutcome, ExtractionReport};
use super::request::{ExtractionRequest, SheetKind};
use crate::capture::{CaptureSettings, ScreenshotCapturer};
use crate::error::{ExtractError, Result, SheetError};
use crate::host::{AutomationHost, HostLauncher};
use crate::reader::read_grid;
use crate::session::AutomationSession;
use image::ImageFormat;
use sheetcast_engine::{ImageBuffer, MemoryImageBuffer, table};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Document extensions accepted by [`Extractor`], lowercase.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["xlsx", "xls", "xlsm", "xlsb", "ods"];

/// Drives one automation session per call and turns requested sheets into
/// files.
pub struct Extractor<L: HostLauncher> {
    launcher: L,
    capturer: ScreenshotCapturer,
}

impl<L: HostLauncher> Extractor<L> {
    pub fn new(launcher: L) -> Self {
        Extractor {
            launcher,
            capturer: ScreenshotCapturer::default(),
        }
    }

    pub fn with_capture_settings(mut self, settings: CaptureSettings) -> Self {
        self.capturer = ScreenshotCapturer::new(settings);
        self
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Sheet names of a document, in workbook order.
    pub fn list_sheets(&self, path: &Path) -> Result<Vec<String>> {
        let path = check_document(path)?;
        let mut session = AutomationSession::open(&self.launcher, MemoryImageBuffer::new(), &path)?;
        let names = session.list_sheets()?;
        session.close();
        Ok(names)
    }

    /// Materialize every requested sheet under `output_dir`.
    ///
    /// Tables go to `{output_dir}/{base}_{sheet}.csv` and screenshots to
    /// `{output_dir}/{base}_{sheet}.png`, where `base` is the document's file
    /// stem. A sheet that fails gets a failure outcome and the rest carry on;
    /// only a host that goes away mid-call fails the whole call. The session
    /// is torn down before this returns, whatever happened.
    pub fn extract<B: ImageBuffer>(
        &self,
        buffer: B,
        path: &Path,
        output_dir: &Path,
        request: &ExtractionRequest,
    ) -> Result<ExtractionReport> {
        let path = check_document(path)?;
        let output_dir = std::path::absolute(output_dir)?;
        fs::create_dir_all(&output_dir)?;
        let base = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut session = AutomationSession::open(&self.launcher, buffer, &path)?;
        let names = session.list_sheets()?;
        info!(
            document = %path.display(),
            sheets = names.len(),
            requested = request.len(),
            "Extracting sheets"
        );

        let mut report = ExtractionReport::new();
        for (sheet, kind) in request.iter() {
            let target = SheetTarget {
                names: &names,
                sheet,
                kind,
                output_dir: &output_dir,
                base: &base,
            };
            match self.extract_sheet(&mut session, &target) {
                Ok((kind, output_path)) => {
                    info!(sheet, kind = %kind, output = %output_path.display(), "Sheet extracted");
                    report.insert(sheet, ExtractionOutcome::Success { kind, output_path });
                }
                Err(e) if e.is_fatal() => {
                    session.close();
                    return Err(ExtractError::SessionLost {
                        sheet: sheet.to_string(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!(sheet, error = %e, "Sheet extraction failed");
                    report.insert(sheet, ExtractionOutcome::Failure { reason: e });
                }
            }
        }

        session.close();
        Ok(report)
    }

    fn extract_sheet<H, B>(
        &self,
        session: &mut AutomationSession<H, B>,
        target: &SheetTarget<'_>,
    ) -> std::result::Result<(SheetKind, PathBuf), SheetError>
    where
        H: AutomationHost,
        B: ImageBuffer,
    {
        // A missing sheet is reported as such whatever kind was asked for.
        if !target.names.iter().any(|n| n == target.sheet) {
            return Err(SheetError::SheetNotFound(target.sheet.to_string()));
        }
        let kind: SheetKind = target.kind.parse()?;
        let output_path = target.output_dir.join(format!(
            "{}_{}.{}",
            target.base,
            target.sheet,
            kind.extension()
        ));

        let mut worksheet = session.sheet(target.sheet)?;
        match kind {
            SheetKind::Table => {
                let grid = read_grid(&mut worksheet).map_err(SheetError::Read)?;
                table::write_table(&output_path, &grid).map_err(|e| SheetError::Write {
                    path: output_path.clone(),
                    message: e.to_string(),
                })?;
            }
            SheetKind::Ui => {
                let image = self
                    .capturer
                    .capture(&mut worksheet)
                    .map_err(SheetError::Capture)?;
                image
                    .save_with_format(&output_path, ImageFormat::Png)
                    .map_err(|e| SheetError::Write {
                        path: output_path.clone(),
                        message: e.to_string(),
                    })?;
            }
        }
        Ok((kind, output_path))
    }
}

/// One request entry with what is needed to place its artifact.
struct SheetTarget<'a> {
    names: &'a [String],
    sheet: &'a str,
    kind: &'a str,
    output_dir: &'a Path,
    base: &'a str,
}

/// Resolve the document to an absolute path and check it can be opened.
fn check_document(path: &Path) -> Result<PathBuf> {
    let path = std::path::absolute(path)?;
    if !path.is_file() {
        return Err(ExtractError::DocumentNotFound(path));
    }
    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)));
    if !supported {
        return Err(ExtractError::UnsupportedDocument(path));
    }
    Ok(path)
}
