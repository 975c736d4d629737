//! Data types shared between the completion engine and its callers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The label carrying the metric name in a sample's label set.
pub const METRIC_NAME_LABEL: &str = "__name__";

/// Label set of a single series, ordered by label name.
pub type LabelSet = BTreeMap<String, String>;

/// One sample returned by an instant query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub labels: LabelSet,
    /// Unix timestamp in seconds.
    pub timestamp: f64,
    /// Sample value exactly as the server rendered it (`"42.5"`, `"NaN"`, `"+Inf"`).
    pub value: String,
}

impl Sample {
    pub fn new(labels: LabelSet, timestamp: f64, value: impl Into<String>) -> Self {
        Self {
            labels,
            timestamp,
            value: value.into(),
        }
    }

    /// The metric name from `__name__`, if the series still carries it.
    pub fn metric_name(&self) -> Option<&str> {
        self.labels.get(METRIC_NAME_LABEL).map(String::as_str)
    }
}

/// One series returned by a range query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSeries {
    pub labels: LabelSet,
    /// `(unix seconds, value)` pairs in ascending time order.
    pub values: Vec<(f64, String)>,
}

impl RangeSeries {
    /// Values parsed as floats, skipping anything unparsable, NaN or infinite.
    pub fn finite_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .filter_map(|(_, raw)| raw.parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .collect()
    }
}

/// Result of a completion request.
///
/// `replace_length` is the number of bytes at the end of the text before the
/// cursor that a chosen candidate overwrites. Zero means candidates are
/// appended at the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResult {
    pub candidates: Vec<String>,
    pub replace_length: usize,
}

impl CompletionResult {
    /// Candidates appended verbatim at the cursor.
    pub fn appended(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            replace_length: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_name() {
        let mut labels = LabelSet::new();
        labels.insert("__name__".to_string(), "up".to_string());
        labels.insert("job".to_string(), "prometheus".to_string());
        let sample = Sample::new(labels, 1625142600.0, "1");
        assert_eq!(sample.metric_name(), Some("up"));

        let bare = Sample::new(LabelSet::new(), 0.0, "1");
        assert_eq!(bare.metric_name(), None);
    }

    #[test]
    fn test_finite_values_skips_garbage() {
        let series = RangeSeries {
            labels: LabelSet::new(),
            values: vec![
                (1.0, "1.5".to_string()),
                (2.0, "NaN".to_string()),
                (3.0, "+Inf".to_string()),
                (4.0, "oops".to_string()),
                (5.0, "-2".to_string()),
            ],
        };
        assert_eq!(series.finite_values(), vec![1.5, -2.0]);
    }

    #[test]
    fn test_completion_result_serializes_camel_case() {
        let result = CompletionResult {
            candidates: vec!["{".to_string()],
            replace_length: 0,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"candidates":["{"],"replaceLength":0}"#);
    }
}
