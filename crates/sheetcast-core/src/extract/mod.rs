//! Sheet extraction: requests, per-sheet outcomes and the orchestrator.

mod orchestrator;
mod outcome;
mod request;

pub use orchestrator::{Extractor, SUPPORTED_EXTENSIONS};
pub use outcome::{ExtractionOutcome, ExtractionReport};
pub use request::{ExtractionRequest, SheetKind};
