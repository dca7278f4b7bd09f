//! Local error telemetry
//!
//! Failed commands can be appended to a JSONL file so recurring misses
//! (e.g. commands nobody can resolve) are easy to spot later. Nothing is
//! sent anywhere.

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

/// Category recorded in the `error_type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A command matched nothing in the vocabulary
    UnresolvedCommand,
    /// Input rejected by the whitelist
    UnsafeInput,
    /// Scene input that normalized to zero shapes
    EmptyScene,
    /// The generator produced no usable scene
    NoScene,
    IoError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnresolvedCommand => "unresolved_command",
            ErrorKind::UnsafeInput => "unsafe_input",
            ErrorKind::EmptyScene => "empty_scene",
            ErrorKind::NoScene => "no_scene",
            ErrorKind::IoError => "io_error",
        }
    }
}

/// One line of the telemetry log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// UTC, `YYYY-MM-DDTHH:MM:SSZ`
    pub timestamp: String,
    /// Subcommand that failed ("draw", "scene", "sketch")
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub error_type: ErrorKind,
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorEntry {
    pub fn new(
        command: impl Into<String>,
        error_type: ErrorKind,
        context: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: utc_timestamp(crate::output::unix_timestamp()),
            command: command.into(),
            file: None,
            error_type,
            context: context.into(),
            suggestion: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Format Unix seconds as an ISO 8601 UTC timestamp.
fn utc_timestamp(secs: u64) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year,
        month,
        day,
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Appends entries to a JSONL file when enabled
#[derive(Debug)]
pub struct ErrorCollector {
    path: PathBuf,
    enabled: bool,
}

impl ErrorCollector {
    pub fn new(path: impl AsRef<Path>, enabled: bool) -> Self {
        Self { path: path.as_ref().to_path_buf(), enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one entry. A disabled collector writes nothing.
    pub fn log(&self, entry: &ErrorEntry) -> std::io::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let line = serde_json::to_string(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

// Process-wide so rayon workers in batch mode share it.
static COLLECTOR: OnceLock<Mutex<Option<ErrorCollector>>> = OnceLock::new();

fn collector() -> &'static Mutex<Option<ErrorCollector>> {
    COLLECTOR.get_or_init(|| Mutex::new(None))
}

/// Install the global collector, replacing any previous one
pub fn init_collector(path: impl AsRef<Path>, enabled: bool) {
    if let Ok(mut slot) = collector().lock() {
        *slot = Some(ErrorCollector::new(path, enabled));
    }
}

/// Log through the global collector. Write failures are reported at debug
/// level only; telemetry never changes a command's outcome.
pub fn log_error(entry: &ErrorEntry) {
    if let Ok(slot) = collector().lock() {
        if let Some(ref c) = *slot {
            if let Err(e) = c.log(entry) {
                tracing::debug!(error = %e, "could not write telemetry entry");
            }
        }
    }
}

pub fn is_collection_enabled() -> bool {
    collector().lock().map(|slot| slot.as_ref().is_some_and(|c| c.is_enabled())).unwrap_or(false)
}
