//! Syntactic context detection for partially typed PromQL.
//!
//! Classification is a best-effort pattern match over the text before the
//! cursor; it never parses the query. Patterns are tried in a fixed priority
//! order and the first one that matches decides the context, even if the
//! candidates it later produces turn out to be empty.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use super::lexicon::needs_time_range;

/// The syntactic position of the cursor, with the pieces of text each
/// candidate builder needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryContext<'a> {
    /// Text (ignoring trailing whitespace) ends with `}`.
    AfterClosingBrace { needs_time_range: bool },
    /// Text ends with `metric{`.
    LabelNames { metric: &'a str },
    /// Text ends with `label=` (`open_quote == false`) or `label="`
    /// (`open_quote == true`) inside a selector of `metric`.
    LabelValue {
        metric: &'a str,
        label: &'a str,
        open_quote: bool,
    },
    /// Text ends with a completed `label="value"` matcher.
    AfterLabelPair,
    /// Text ends with a comma inside the selector of `metric`.
    AfterComma {
        metric: &'a str,
        used_labels: BTreeSet<&'a str>,
    },
    /// The last word is exactly a known metric name.
    MetricName,
    /// The whole text is a known metric name followed by whitespace.
    MetricThenSpace,
    /// Cursor sits right inside a common function or aggregation call.
    FunctionArgument,
    /// Text ends with a binary operator or set keyword.
    AfterOperator,
    /// Nothing specific; fall back to prefix matching.
    Unmatched,
}

/// Classify `text` (already truncated at the cursor).
///
/// `metrics` is the known metric vocabulary. When `label_values_enabled` is
/// false the two label-value contexts never match.
pub fn classify<'a>(
    text: &'a str,
    metrics: &BTreeSet<String>,
    label_values_enabled: bool,
) -> QueryContext<'a> {
    if text.trim().ends_with('}') {
        return QueryContext::AfterClosingBrace {
            needs_time_range: needs_time_range(text),
        };
    }

    if let Some(caps) = metric_brace_end().captures(text) {
        if let Some(metric) = caps.get(1) {
            return QueryContext::LabelNames {
                metric: metric.as_str(),
            };
        }
    }

    if label_values_enabled {
        if let Some(context) = label_value_context(text) {
            return context;
        }
    }

    if label_pair_end().is_match(text) {
        return QueryContext::AfterLabelPair;
    }

    if let Some(caps) = after_comma().captures(text) {
        if let Some(metric) = caps.get(1) {
            return QueryContext::AfterComma {
                metric: metric.as_str(),
                used_labels: used_labels(text),
            };
        }
    }

    if let Some(last_word) = text.split_whitespace().last() {
        if text.ends_with(last_word) && metrics.contains(last_word) {
            return QueryContext::MetricName;
        }
    }

    if let Some(caps) = metric_then_space().captures(text) {
        if caps.get(1).is_some_and(|m| metrics.contains(m.as_str())) {
            return QueryContext::MetricThenSpace;
        }
    }

    if function_call_end().is_match(text) {
        return QueryContext::FunctionArgument;
    }

    if after_operator().is_match(text) {
        return QueryContext::AfterOperator;
    }

    QueryContext::Unmatched
}

/// `label=` or `label="` at the end of the text, with a selector to attach
/// the label to. Without a resolvable metric neither context applies.
fn label_value_context(text: &str) -> Option<QueryContext<'_>> {
    let (caps, open_quote) = if let Some(caps) = label_equals_end().captures(text) {
        (caps, false)
    } else if let Some(caps) = label_equals_quote_end().captures(text) {
        (caps, true)
    } else {
        return None;
    };

    let label = caps.get(1)?.as_str();
    let metric = first_selector_metric(text)?;

    Some(QueryContext::LabelValue {
        metric,
        label,
        open_quote,
    })
}

/// The metric of the leftmost `metric{` in `text`.
fn first_selector_metric(text: &str) -> Option<&str> {
    selector_open()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Label names of every completed `label="value"` pair in `text`.
///
/// A plain textual scan: escaped quotes inside values are not understood.
pub fn used_labels(text: &str) -> BTreeSet<&str> {
    label_pair()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

fn cached_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern"))
}

fn metric_brace_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached_regex(&RE, r"([a-zA-Z_:][a-zA-Z0-9_:]*)\{$")
}

fn selector_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached_regex(&RE, r"([a-zA-Z_:][a-zA-Z0-9_:]*)\{")
}

fn label_equals_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached_regex(&RE, r"([a-zA-Z_][a-zA-Z0-9_]*)=$")
}

fn label_equals_quote_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached_regex(&RE, r#"([a-zA-Z_][a-zA-Z0-9_]*)="$"#)
}

fn label_pair_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached_regex(&RE, r#"([a-zA-Z_][a-zA-Z0-9_]*)="[^"]*"$"#)
}

fn label_pair() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached_regex(&RE, r#"([a-zA-Z_][a-zA-Z0-9_]*)="[^"]*""#)
}

// Leftmost `metric{` wins, even if its selector has since been closed.
fn after_comma() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached_regex(&RE, r"([a-zA-Z_:][a-zA-Z0-9_:]*)\{.*,\s*$")
}

fn metric_then_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached_regex(&RE, r"^([a-zA-Z_:][a-zA-Z0-9_:]*)\s+$")
}

fn function_call_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached_regex(&RE, r"(?:rate|increase|sum|avg|count|min|max)\(\s*$")
}

fn after_operator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached_regex(
        &RE,
        r"(?:\+|-|\*|/|%|\^|==|!=|>=|<=|>|<|\sand\s|\sor\s|\sunless\s)\s*$",
    )
}
