use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The four outcome labels tallied by the confusion engines. Any other
/// value in the outcome column is ignored, not an error.
pub const LABEL_TRUE_POSITIVE: &str = "True Positive";
pub const LABEL_TRUE_NEGATIVE: &str = "True Negative";
pub const LABEL_FALSE_POSITIVE: &str = "False Positive";
pub const LABEL_FALSE_NEGATIVE: &str = "False Negative";

/// Confusion-matrix tallies for one partition of the merged table.
///
/// `total()` is derived from the four tallies, so it can never drift out
/// of sync with them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positive: u64,
    pub true_negative: u64,
    pub false_positive: u64,
    pub false_negative: u64,
}

impl ConfusionCounts {
    /// Tallies one outcome label. Returns `false` for labels outside the
    /// four recognized literals, which are ignored by design.
    pub fn record(&mut self, label: &str) -> bool {
        match label {
            LABEL_TRUE_POSITIVE => self.true_positive += 1,
            LABEL_TRUE_NEGATIVE => self.true_negative += 1,
            LABEL_FALSE_POSITIVE => self.false_positive += 1,
            LABEL_FALSE_NEGATIVE => self.false_negative += 1,
            _ => return false,
        }
        true
    }

    pub fn total(&self) -> u64 {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }
}

/// Derived classification ratios. `None` is the explicit "undefined"
/// marker for a zero denominator; the fields are never NaN or infinite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMetrics {
    pub accuracy: Option<f64>,
    pub recall: Option<f64>,
    pub precision: Option<f64>,
    pub specificity: Option<f64>,
    pub f1: Option<f64>,
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

impl ConfusionMetrics {
    pub fn from_counts(counts: &ConfusionCounts) -> Self {
        let tp = counts.true_positive;
        let tn = counts.true_negative;
        let fp = counts.false_positive;
        let fnn = counts.false_negative;

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fnn);
        // F1 is defined only when precision and recall both are and their
        // sum is positive.
        let f1 = match (precision, recall) {
            (Some(p), Some(r)) if p + r > 0.0 => Some(2.0 * p * r / (p + r)),
            _ => None,
        };

        Self {
            accuracy: ratio(tp + tn, counts.total()),
            recall,
            precision,
            specificity: ratio(tn, tn + fp),
            f1,
        }
    }
}

/// The decomposition of a grouping key `<name>_<year>_<type>`.
///
/// The three-segment shape is a structural precondition of the grouping
/// key, not something the engines validate defensively: a key that does
/// not decompose is a value-shape error for that key's row only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyParts {
    pub name: String,
    pub year: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl KeyParts {
    pub fn parse(key: &str) -> Result<Self, ModelError> {
        let segments: Vec<&str> = key.split('_').collect();
        if segments.len() != 3 {
            return Err(ModelError::MalformedKey {
                key: key.to_string(),
                segments: segments.len(),
            });
        }
        if let Some(index) = segments.iter().position(|segment| segment.is_empty()) {
            return Err(ModelError::EmptyKeySegment {
                key: key.to_string(),
                index,
            });
        }
        Ok(Self {
            name: segments[0].to_string(),
            year: segments[1].to_string(),
            kind: segments[2].to_string(),
        })
    }
}
