//! CSV serialization of split outputs.

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{info, warn};

use crate::constants::io::{TEST_FILE_SUFFIX, TRAIN_FILE_SUFFIX};
use crate::data::{Dataset, FieldName};
use crate::errors::SplitError;
use crate::partition::SplitResult;

/// Paths of the two CSV files written for a split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    /// `<prefix>_train.csv`.
    pub train: PathBuf,
    /// `<prefix>_test.csv`.
    pub test: PathBuf,
}

impl OutputPaths {
    /// `<prefix>_train.csv` / `<prefix>_test.csv`.
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            train: PathBuf::from(format!("{prefix}{TRAIN_FILE_SUFFIX}")),
            test: PathBuf::from(format!("{prefix}{TEST_FILE_SUFFIX}")),
        }
    }
}

/// Render one cell. Nulls are empty, strings verbatim, nested values as JSON.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Write `dataset` as CSV with exactly `columns` as the header.
pub fn write_csv<W: Write>(
    writer: W,
    columns: &[FieldName],
    dataset: &Dataset,
) -> Result<(), SplitError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(columns)?;
    for record in dataset.records() {
        csv.write_record(columns.iter().map(|column| cell_text(record.get(column))))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write both sides of a split using a shared header.
///
/// Both files are created before either is written. If the test file cannot
/// be created, the train file is removed again and nothing is left behind.
pub fn write_split(
    result: &SplitResult,
    columns: &[FieldName],
    paths: &OutputPaths,
) -> Result<(), SplitError> {
    let train_file = File::create(&paths.train)?;
    let test_file = match File::create(&paths.test) {
        Ok(file) => file,
        Err(err) => {
            drop(train_file);
            if let Err(cleanup) = fs::remove_file(&paths.train) {
                warn!(
                    "[source_split:export] could not remove '{}': {cleanup}",
                    paths.train.display()
                );
            }
            return Err(err.into());
        }
    };
    write_csv(train_file, columns, &result.train)?;
    write_csv(test_file, columns, &result.test)?;
    info!(
        "[source_split:export] training set: '{}' with {} records",
        paths.train.display(),
        result.train.len()
    );
    info!(
        "[source_split:export] testing set: '{}' with {} records",
        paths.test.display(),
        result.test.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;
    use serde_json::json;

    #[test]
    fn cell_text_renders_each_value_kind() {
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&Value::Null)), "");
        assert_eq!(cell_text(Some(&json!("a, b"))), "a, b");
        assert_eq!(cell_text(Some(&json!(3.5))), "3.5");
        assert_eq!(cell_text(Some(&json!(true))), "true");
        assert_eq!(cell_text(Some(&json!(["x", 1]))), r#"["x",1]"#);
    }

    #[test]
    fn write_csv_fills_missing_fields_with_empty_cells() {
        let dataset: Dataset = vec![
            Record::default().with("title", "first").with("source", "cnn"),
            Record::default().with("title", "quote \"x\", y").with("bias", 2),
        ]
        .into();
        let columns = dataset.columns();
        let mut out = Vec::new();
        write_csv(&mut out, &columns, &dataset).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "title,source,bias\nfirst,cnn,\n\"quote \"\"x\"\", y\",,2\n"
        );
    }

    #[test]
    fn empty_side_still_gets_a_header() {
        let columns = vec!["title".to_string(), "source".to_string()];
        let mut out = Vec::new();
        write_csv(&mut out, &columns, &Dataset::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "title,source\n");
    }

    #[test]
    fn failed_test_file_leaves_no_train_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::from_prefix(&dir.path().join("run").to_string_lossy());
        // A directory where the test CSV should go makes its creation fail.
        fs::create_dir(&paths.test).unwrap();
        let result = SplitResult {
            train: vec![Record::default().with("title", "a")].into(),
            test: Dataset::default(),
        };
        let err = write_split(&result, &["title".to_string()], &paths).unwrap_err();
        assert!(matches!(err, SplitError::Io(_)));
        assert!(!paths.train.exists());
    }

    #[test]
    fn write_split_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::from_prefix(&dir.path().join("ok").to_string_lossy());
        let result = SplitResult {
            train: vec![Record::default().with("title", "a")].into(),
            test: vec![Record::default().with("title", "b")].into(),
        };
        write_split(&result, &["title".to_string()], &paths).unwrap();
        assert_eq!(fs::read_to_string(&paths.train).unwrap(), "title\na\n");
        assert_eq!(fs::read_to_string(&paths.test).unwrap(), "title\nb\n");
    }

    #[test]
    fn output_paths_follow_prefix() {
        let paths = OutputPaths::from_prefix("out/bias");
        assert_eq!(paths.train, PathBuf::from("out/bias_train.csv"));
        assert_eq!(paths.test, PathBuf::from("out/bias_test.csv"));
    }
}
