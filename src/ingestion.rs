//! Loading a dataset from a directory of single-record JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::constants::io::{RECORD_FILE_EXTENSION, SKIP_UNREADABLE_MSG};
use crate::data::{Dataset, Record};
use crate::errors::SplitError;

/// Dataset plus the files that were skipped while loading it.
#[derive(Clone, Debug, Default)]
pub struct LoadedDataset {
    /// Parsed records in file-name order.
    pub dataset: Dataset,
    /// Files that could not be turned into a record.
    pub skipped: Vec<SkippedFile>,
}

/// A record file excluded from the dataset and why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedFile {
    /// The offending file.
    pub path: PathBuf,
    /// Read or parse error text.
    pub reason: String,
}

/// True if the path has a `.json` extension (case-insensitive).
pub fn is_record_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(RECORD_FILE_EXTENSION))
        .unwrap_or(false)
}

/// Parse one record document. Only a top-level JSON object is accepted.
pub fn parse_record(raw: &str) -> Result<Record, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => Ok(Record::new(fields.into_iter().collect())),
        Ok(other) => Err(format!("expected a JSON object, found {}", json_kind(&other))),
        Err(err) => Err(err.to_string()),
    }
}

/// Load every `*.json` file directly inside `dir` (no recursion).
///
/// Files are read in file-name order so record positions are stable across
/// runs. Unreadable or malformed files are logged and skipped; only a missing
/// or non-directory `dir` is an error.
pub fn load_json_dir(dir: impl AsRef<Path>) -> Result<LoadedDataset, SplitError> {
    let dir = dir.as_ref();
    if !fs::metadata(dir)?.is_dir() {
        return Err(SplitError::Configuration(format!(
            "input path '{}' is not a directory",
            dir.display()
        )));
    }
    info!(
        "[source_split:load] loading JSON files from folder: {}",
        dir.display()
    );

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                skip(&mut skipped, path, err.to_string());
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_dir() || !is_record_file(path) {
            debug!("[source_split:load] ignoring {}", path.display());
            continue;
        }
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                skip(&mut skipped, path.to_path_buf(), err.to_string());
                continue;
            }
        };
        match parse_record(&raw) {
            Ok(record) => records.push(record),
            Err(reason) => skip(&mut skipped, path.to_path_buf(), reason),
        }
    }

    info!(
        "[source_split:load] loaded {} records ({} skipped)",
        records.len(),
        skipped.len()
    );
    Ok(LoadedDataset {
        dataset: Dataset::new(records),
        skipped,
    })
}

fn skip(skipped: &mut Vec<SkippedFile>, path: PathBuf, reason: String) {
    warn!(
        "[source_split:load] {SKIP_UNREADABLE_MSG} '{}': {reason}",
        path.display()
    );
    skipped.push(SkippedFile { path, reason });
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
