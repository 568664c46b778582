use crate::constants::config::{DEFAULT_SEED, DEFAULT_SOURCE_FIELD, DEFAULT_TRAIN_RATIO};
use crate::errors::SplitError;
use crate::types::FieldName;

/// Top-level split configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitConfig {
    /// Fraction of records routed to train, in the open interval `(0, 1)`.
    pub train_ratio: f64,
    /// Master seed; every component generator is derived from it.
    pub seed: u64,
    /// Group by `source_field` before splitting. When false the whole
    /// dataset is split uniformly.
    pub stratify: bool,
    /// Field whose value identifies a record's origin.
    pub source_field: FieldName,
    /// Optional cap applied by uniform subsampling before the split.
    ///
    /// Only honored when `0 < n < dataset.len()`.
    pub subsample: Option<usize>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_ratio: DEFAULT_TRAIN_RATIO,
            seed: DEFAULT_SEED,
            stratify: true,
            source_field: DEFAULT_SOURCE_FIELD.to_string(),
            subsample: None,
        }
    }
}

impl SplitConfig {
    /// Reject ratios outside `(0, 1)` and empty grouping fields.
    pub fn validated(self) -> Result<Self, SplitError> {
        validate_train_ratio(self.train_ratio)?;
        if self.stratify && self.source_field.is_empty() {
            return Err(SplitError::Configuration(
                "source field must not be empty when stratifying".to_string(),
            ));
        }
        Ok(self)
    }
}

pub(crate) fn validate_train_ratio(ratio: f64) -> Result<f64, SplitError> {
    if !ratio.is_finite() || ratio <= 0.0 || ratio >= 1.0 {
        return Err(SplitError::Configuration(format!(
            "train ratio must lie strictly between 0 and 1, got {ratio}"
        )));
    }
    Ok(ratio)
}
