//! User configuration loaded from `config.toml`.
//!
//! Anything wrong with the file is reported as a warning and the defaults
//! are used instead; a bad config never stops an extraction.

use directories::ProjectDirs;
use serde::Deserialize;
use sheetcast_core::CaptureSettings;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    capture: Option<CaptureSection>,
    output: Option<OutputSection>,
    log: Option<LogSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaptureSection {
    timeout_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    directory: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogSection {
    level: Option<String>,
}

/// Effective settings after merging the file over the defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub capture: CaptureSettings,
    pub output_dir: PathBuf,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            capture: CaptureSettings::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Load `config_file`, or the user's config file when none is given.
///
/// A missing user config is not a problem; a missing explicit one is.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let file = read_config_file(&path, &mut warnings).unwrap_or_default();
    let config = merge(file, &mut warnings);
    (config, warnings)
}

fn read_config_file(path: &Path, warnings: &mut Vec<String>) -> Option<ConfigFile> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(path) {
            Ok(content) => match parse_config(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    }
}

fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(content)
}

fn merge(file: ConfigFile, warnings: &mut Vec<String>) -> Config {
    let mut config = Config::default();

    if let Some(capture) = file.capture {
        if let Some(ms) = capture.timeout_ms {
            config.capture.timeout = Duration::from_millis(ms);
        }
        match capture.poll_interval_ms {
            Some(0) => warnings.push(
                "capture.poll_interval_ms must be greater than 0; using default".to_string(),
            ),
            Some(ms) => config.capture.poll_interval = Duration::from_millis(ms),
            None => {}
        }
    }

    if let Some(directory) = file.output.and_then(|o| o.directory) {
        if directory.as_os_str().is_empty() {
            warnings.push("output.directory is empty; using default".to_string());
        } else {
            config.output_dir = directory;
        }
    }

    if let Some(level) = file.log.and_then(|l| l.level) {
        let level = level.trim();
        if level.is_empty() {
            warnings.push("log.level is empty; using default".to_string());
        } else {
            config.log_level = level.to_string();
        }
    }

    config
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "sheetcast")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
