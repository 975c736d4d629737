//! The completion entry point: classify the text, then build candidates.

use std::collections::BTreeSet;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::trace;

use super::cache::LabelCache;
use super::context::{classify, QueryContext};
use super::lexicon::{FUNCTIONS, MODIFIERS, OPERATORS, TIME_RANGES};
use super::prefix::PrefixMatcher;
use crate::client::MetadataClient;
use crate::types::CompletionResult;

/// Context-aware completer for PromQL input.
///
/// Holds the metric vocabulary loaded at startup and a shared [`LabelCache`].
/// `complete` takes `&self` and may be called from several threads at once.
#[derive(Debug)]
pub struct QueryCompleter {
    metrics: BTreeSet<String>,
    prefix: PrefixMatcher,
    cache: Arc<LabelCache>,
    label_values_enabled: bool,
}

impl QueryCompleter {
    /// Build a completer over `metrics`, looking up labels through `client`.
    pub fn new<I, S>(metrics: I, client: Arc<dyn MetadataClient>, label_values_enabled: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_cache(metrics, Arc::new(LabelCache::new(client)), label_values_enabled)
    }

    /// Build a completer sharing an existing label cache.
    pub fn with_cache<I, S>(metrics: I, cache: Arc<LabelCache>, label_values_enabled: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let metrics: BTreeSet<String> = metrics.into_iter().map(Into::into).collect();
        let prefix = PrefixMatcher::new(
            metrics
                .iter()
                .cloned()
                .chain(FUNCTIONS.iter().map(|f| f.to_string())),
        );

        Self {
            metrics,
            prefix,
            cache,
            label_values_enabled,
        }
    }

    /// The label-value cache shared by every completion on this completer.
    pub fn cache(&self) -> &Arc<LabelCache> {
        &self.cache
    }

    /// Classify `text` against this completer's vocabulary.
    pub fn classify<'a>(&self, text: &'a str) -> QueryContext<'a> {
        classify(text, &self.metrics, self.label_values_enabled)
    }

    /// Candidates for the input `line` with the cursor at byte offset `cursor`.
    ///
    /// Only the text before the cursor is considered. A cursor past the end is
    /// clamped, and one inside a multi-byte character is moved back to the
    /// preceding character boundary.
    pub fn complete(&self, line: &str, cursor: usize) -> CompletionResult {
        let text = &line[..floor_char_boundary(line, cursor)];
        let context = self.classify(text);
        let result = self.candidates(text, &context);

        #[cfg(feature = "tracing")]
        trace!(
            ?context,
            candidates = result.candidates.len(),
            replace_length = result.replace_length,
            "completion"
        );

        result
    }

    fn candidates(&self, text: &str, context: &QueryContext<'_>) -> CompletionResult {
        match context {
            QueryContext::AfterClosingBrace { needs_time_range } => {
                let ranges = TIME_RANGES
                    .iter()
                    .filter(|_| *needs_time_range)
                    .map(|r| r.to_string());
                let operators = OPERATORS.iter().map(|op| format!(" {op} "));
                let modifiers = MODIFIERS.iter().map(|m| format!(" {m}"));
                CompletionResult::appended(ranges.chain(operators).chain(modifiers).collect())
            }
            QueryContext::LabelNames { metric } => CompletionResult::appended(
                self.cache
                    .labels(metric)
                    .into_iter()
                    .map(|label| format!("{label}="))
                    .collect(),
            ),
            QueryContext::LabelValue {
                metric,
                label,
                open_quote,
            } => {
                let values = self.cache.label_values(metric, label);
                let candidates = values
                    .iter()
                    .map(|value| {
                        if *open_quote {
                            format!("{value}\"")
                        } else {
                            format!("\"{value}\"")
                        }
                    })
                    .collect();
                CompletionResult::appended(candidates)
            }
            QueryContext::AfterLabelPair => {
                CompletionResult::appended(vec![",".to_string(), "}".to_string()])
            }
            QueryContext::AfterComma {
                metric,
                used_labels,
            } => CompletionResult::appended(
                self.cache
                    .labels(metric)
                    .into_iter()
                    .filter(|label| !used_labels.contains(label.as_str()))
                    .map(|label| format!("{label}="))
                    .collect(),
            ),
            QueryContext::MetricName => CompletionResult::appended(vec!["{".to_string()]),
            QueryContext::MetricThenSpace => CompletionResult::appended(
                OPERATORS
                    .iter()
                    .map(|op| format!("{op} "))
                    .chain(MODIFIERS.iter().map(|m| m.to_string()))
                    .collect(),
            ),
            QueryContext::FunctionArgument | QueryContext::Unmatched => self.prefix.complete(text),
            QueryContext::AfterOperator => CompletionResult::appended(
                self.metrics
                    .iter()
                    .cloned()
                    .chain(FUNCTIONS.iter().map(|f| f.to_string()))
                    .collect(),
            ),
        }
    }
}

/// Largest char boundary of `s` at or below `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0)
}
