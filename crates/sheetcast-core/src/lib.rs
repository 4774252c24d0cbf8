//! sheetcast-core - automation sessions, sheet readers and screenshot capture.
//!
//! The entry point is [`Extractor`]: it opens a document in an automation
//! host, materializes each requested sheet as a CSV table or PNG screenshot,
//! and always tears the host down before returning.

pub mod capture;
pub mod error;
pub mod extract;
pub mod host;
pub mod reader;
pub mod session;

pub use capture::{CaptureSettings, ScreenshotCapturer};
pub use error::{CaptureError, ExtractError, HostError, Result, SheetError};
pub use extract::{
    ExtractionOutcome, ExtractionReport, ExtractionRequest, Extractor, SheetKind,
    SUPPORTED_EXTENSIONS,
};
pub use host::{AutomationHost, CalamineHost, CalamineLauncher, CopyStatus, HostLauncher};
pub use session::{AutomationSession, Worksheet};

pub use sheetcast_engine::{CellGrid, CellValue, ImageBuffer, MemoryImageBuffer, RangeRef};
