use super::request::SheetKind;
use crate::error::SheetError;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Result for one requested sheet.
#[derive(Debug)]
pub enum ExtractionOutcome {
    Success { kind: SheetKind, output_path: PathBuf },
    Failure { reason: SheetError },
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Success { .. })
    }

    pub fn output_path(&self) -> Option<&Path> {
        match self {
            ExtractionOutcome::Success { output_path, .. } => Some(output_path),
            ExtractionOutcome::Failure { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&SheetError> {
        match self {
            ExtractionOutcome::Success { .. } => None,
            ExtractionOutcome::Failure { reason } => Some(reason),
        }
    }
}

// Serialized as a status-tagged record:
// {"status":"success","type":"table","output_path":"..."} or
// {"status":"error","message":"..."}
impl Serialize for ExtractionOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExtractionOutcome::Success { kind, output_path } => {
                let mut record = serializer.serialize_struct("ExtractionOutcome", 3)?;
                record.serialize_field("status", "success")?;
                record.serialize_field("type", kind)?;
                record.serialize_field("output_path", &output_path.display().to_string())?;
                record.end()
            }
            ExtractionOutcome::Failure { reason } => {
                let mut record = serializer.serialize_struct("ExtractionOutcome", 2)?;
                record.serialize_field("status", "error")?;
                record.serialize_field("message", &reason.to_string())?;
                record.end()
            }
        }
    }
}

/// One outcome per requested sheet name, ordered by name.
#[derive(Debug, Default, serde::Serialize)]
#[serde(transparent)]
pub struct ExtractionReport {
    outcomes: BTreeMap<String, ExtractionOutcome>,
}

impl ExtractionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sheet: impl Into<String>, outcome: ExtractionOutcome) {
        self.outcomes.insert(sheet.into(), outcome);
    }

    pub fn get(&self, sheet: &str) -> Option<&ExtractionOutcome> {
        self.outcomes.get(sheet)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.outcomes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtractionOutcome)> {
        self.outcomes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn failures(&self) -> usize {
        self.outcomes.values().filter(|o| !o.is_success()).count()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
