use crate::error::SheetError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// What a sheet should be turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetKind {
    /// Cell values written as a delimited-text table.
    Table,
    /// A rendered picture of the sheet.
    Ui,
}

impl SheetKind {
    /// File extension of the artifact produced for this kind.
    pub fn extension(self) -> &'static str {
        match self {
            SheetKind::Table => "csv",
            SheetKind::Ui => "png",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SheetKind::Table => "table",
            SheetKind::Ui => "ui",
        }
    }
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SheetKind {
    type Err = SheetError;

    /// Case-insensitive; the original text is kept in the error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("table") {
            Ok(SheetKind::Table)
        } else if s.eq_ignore_ascii_case("ui") {
            Ok(SheetKind::Ui)
        } else {
            Err(SheetError::UnknownKind(s.to_string()))
        }
    }
}

/// Sheet name to requested kind, as given by the caller.
///
/// Kinds stay unparsed here so an unrecognized one fails only its own sheet.
/// Inserting an existing name replaces its kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractionRequest {
    entries: Vec<(String, String)>,
}

impl ExtractionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sheet: impl Into<String>, kind: impl Into<String>) {
        let sheet = sheet.into();
        let kind = kind.into();
        match self.entries.iter_mut().find(|(name, _)| *name == sheet) {
            Some(entry) => entry.1 = kind,
            None => self.entries.push((sheet, kind)),
        }
    }

    pub fn with(mut self, sheet: impl Into<String>, kind: impl Into<String>) -> Self {
        self.insert(sheet, kind);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, k)| (s.as_str(), k.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON object such as `{"Overview": "table", "Chart": "ui"}`.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Parse one `SHEET=KIND` pair. The last `=` splits, so sheet names may
    /// contain `=`.
    pub fn parse_pair(pair: &str) -> Option<(String, String)> {
        let (sheet, kind) = pair.rsplit_once('=')?;
        if sheet.is_empty() || kind.is_empty() {
            return None;
        }
        Some((sheet.to_string(), kind.to_string()))
    }
}

impl<S: Into<String>, K: Into<String>> FromIterator<(S, K)> for ExtractionRequest {
    fn from_iter<I: IntoIterator<Item = (S, K)>>(iter: I) -> Self {
        let mut request = ExtractionRequest::new();
        for (sheet, kind) in iter {
            request.insert(sheet, kind);
        }
        request
    }
}

impl<'de> Deserialize<'de> for ExtractionRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, String>::deserialize(deserializer)?;
        Ok(map.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_case_insensitive() {
        assert_eq!("table".parse::<SheetKind>().unwrap(), SheetKind::Table);
        assert_eq!("TABLE".parse::<SheetKind>().unwrap(), SheetKind::Table);
        assert_eq!("Ui".parse::<SheetKind>().unwrap(), SheetKind::Ui);
    }

    #[test]
    fn test_unknown_kind_keeps_original_text() {
        let err = "PDF".parse::<SheetKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown sheet type 'PDF'. Use 'ui' or 'table'.");
    }

    #[test]
    fn test_insert_replaces() {
        let request = ExtractionRequest::new()
            .with("Overview", "table")
            .with("Chart", "ui")
            .with("Overview", "ui");
        assert_eq!(request.len(), 2);
        assert_eq!(
            request.iter().collect::<Vec<_>>(),
            vec![("Overview", "ui"), ("Chart", "ui")]
        );
    }

    #[test]
    fn test_from_json() {
        let request =
            ExtractionRequest::from_json(r#"{"Overview": "table", "Chart": "pdf"}"#).unwrap();
        assert_eq!(request.len(), 2);
        assert!(request.iter().any(|(s, k)| s == "Chart" && k == "pdf"));
        assert!(ExtractionRequest::from_json(r#"["Overview"]"#).is_err());
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            ExtractionRequest::parse_pair("Overview=table"),
            Some(("Overview".to_string(), "table".to_string()))
        );
        assert_eq!(
            ExtractionRequest::parse_pair("a=b=ui"),
            Some(("a=b".to_string(), "ui".to_string()))
        );
        assert_eq!(ExtractionRequest::parse_pair("Overview"), None);
        assert_eq!(ExtractionRequest::parse_pair("=ui"), None);
    }
}
