//! sheetcast - extract spreadsheet sheets as CSV tables or PNG screenshots

mod clipboard;
mod config;
mod error;

use clipboard::SystemClipboard;
use error::CliError;
use serde_json::json;
use sheetcast_core::{
    CalamineLauncher, ExtractionRequest, Extractor, ImageBuffer, MemoryImageBuffer,
};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: sheetcast [OPTIONS] <FILE> [SHEET=KIND ...]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <FILE>                    Spreadsheet file (.xlsx, .xls, .xlsm, .xlsb, .ods)");
    eprintln!("  [SHEET=KIND]              Sheet to extract; KIND is 'table' (CSV) or 'ui' (PNG)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <DIR>        Output directory (default: output)");
    eprintln!("  -r, --request <JSON>      Sheets as a JSON object");
    eprintln!("                            e.g. '{{\"Overview\":\"table\"}}'");
    eprintln!("  -l, --list                List the document's sheets and exit");
    eprintln!("  --timeout-ms <MS>         How long to wait for a screenshot (default: 5000)");
    eprintln!("  --config <FILE>           Load settings from this TOML file");
    eprintln!("  --no-config               Ignore the user config file");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default)]
struct Options {
    file: Option<PathBuf>,
    pairs: Vec<String>,
    output: Option<PathBuf>,
    request_json: Option<String>,
    list: bool,
    timeout_ms: Option<u64>,
    config: Option<PathBuf>,
    no_config: bool,
}

enum Command {
    Help,
    Run(Options),
}

fn parse_args(args: &[String]) -> error::Result<Command> {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-o" | "--output" => {
                i += 1;
                let value = args.get(i).ok_or(CliError::MissingValue("--output"))?;
                options.output = Some(PathBuf::from(value));
            }
            "-r" | "--request" => {
                i += 1;
                let value = args.get(i).ok_or(CliError::MissingValue("--request"))?;
                options.request_json = Some(value.to_string());
            }
            "-l" | "--list" => options.list = true,
            "--timeout-ms" => {
                i += 1;
                let value = args.get(i).ok_or(CliError::MissingValue("--timeout-ms"))?;
                let ms = value.parse().map_err(|_| CliError::InvalidValue {
                    option: "--timeout-ms",
                    value: value.to_string(),
                })?;
                options.timeout_ms = Some(ms);
            }
            "--config" => {
                i += 1;
                let value = args.get(i).ok_or(CliError::MissingValue("--config"))?;
                options.config = Some(PathBuf::from(value));
            }
            "--no-config" => options.no_config = true,
            arg if arg.starts_with('-') && arg.len() > 1 => {
                return Err(CliError::UnknownOption(arg.to_string()));
            }
            arg => {
                if options.file.is_none() {
                    options.file = Some(PathBuf::from(arg));
                } else {
                    options.pairs.push(arg.to_string());
                }
            }
        }
        i += 1;
    }

    if options.file.is_none() {
        return Err(CliError::MissingFile);
    }
    Ok(Command::Run(options))
}

/// `--request` first, then positional pairs, which win on duplicates.
fn build_request(options: &Options) -> error::Result<ExtractionRequest> {
    let mut request = match options.request_json.as_deref() {
        Some(text) => ExtractionRequest::from_json(text)?,
        None => ExtractionRequest::new(),
    };
    for pair in &options.pairs {
        let (sheet, kind) =
            ExtractionRequest::parse_pair(pair).ok_or_else(|| CliError::BadPair(pair.clone()))?;
        request.insert(sheet, kind);
    }
    if request.is_empty() && !options.list {
        return Err(CliError::NothingRequested);
    }
    Ok(request)
}

fn init_logging(level: &str) -> Option<String> {
    let (filter, warning) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, None),
        Err(_) => match EnvFilter::try_new(level) {
            Ok(filter) => (filter, None),
            Err(e) => (
                EnvFilter::new("info"),
                Some(format!("Invalid log level '{}': {}", level, e)),
            ),
        },
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    warning
}

/// The system clipboard, or an in-process buffer when there is none.
fn image_buffer() -> Box<dyn ImageBuffer> {
    match SystemClipboard::new() {
        Ok(clipboard) => Box::new(clipboard),
        Err(e) => {
            warn!(error = %e, "System clipboard unavailable; using in-process image buffer");
            Box::new(MemoryImageBuffer::new())
        }
    }
}

fn run(options: &Options, config: &config::Config) -> anyhow::Result<serde_json::Value> {
    let file = options.file.as_ref().ok_or(CliError::MissingFile)?;
    let request = build_request(options)?;

    let mut capture = config.capture;
    if let Some(ms) = options.timeout_ms {
        capture.timeout = Duration::from_millis(ms);
    }
    let extractor = Extractor::new(CalamineLauncher).with_capture_settings(capture);

    if options.list {
        let sheets = extractor.list_sheets(file)?;
        return Ok(json!({ "status": "success", "sheets": sheets }));
    }

    let output_dir = options.output.as_ref().unwrap_or(&config.output_dir);
    let report = extractor.extract(image_buffer(), file, output_dir, &request)?;
    info!(
        sheets = report.len(),
        failures = report.failures(),
        "Extraction finished"
    );
    Ok(report.to_json())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let options = match parse_args(&args) {
        Ok(Command::Help) => {
            print_usage();
            return;
        }
        Ok(Command::Run(options)) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    let (config, warnings) = if options.no_config && options.config.is_none() {
        (config::Config::default(), Vec::new())
    } else {
        config::load_config(options.config.as_ref())
    };

    if let Some(warning) = init_logging(&config.log_level) {
        warn!("{}", warning);
    }
    for warning in warnings {
        warn!("{}", warning);
    }

    match run(&options, &config) {
        Ok(value) => println!("{}", pretty(&value)),
        Err(e) => {
            println!("{}", pretty(&json!({ "error": e.to_string() })));
            std::process::exit(1);
        }
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
