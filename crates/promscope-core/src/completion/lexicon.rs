//! Static PromQL vocabulary used to build candidates.

/// Binary operators and set keywords.
pub const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "^", "==", "!=", ">", "<", ">=", "<=", "and", "or", "unless",
];

/// Functions and aggregations, rendered with their opening parenthesis.
pub const FUNCTIONS: &[&str] = &[
    "abs(",
    "absent(",
    "absent_over_time(",
    "ceil(",
    "changes(",
    "clamp_max(",
    "clamp_min(",
    "day_of_month(",
    "day_of_week(",
    "days_in_month(",
    "delta(",
    "deriv(",
    "exp(",
    "floor(",
    "histogram_quantile(",
    "holt_winters(",
    "hour(",
    "idelta(",
    "increase(",
    "irate(",
    "label_join(",
    "label_replace(",
    "ln(",
    "log10(",
    "log2(",
    "minute(",
    "month(",
    "predict_linear(",
    "rate(",
    "resets(",
    "round(",
    "scalar(",
    "sort(",
    "sort_desc(",
    "sqrt(",
    "time(",
    "timestamp(",
    "vector(",
    "year(",
    "avg(",
    "count(",
    "count_values(",
    "min(",
    "max(",
    "sum(",
    "stddev(",
    "stdvar(",
    "bottomk(",
    "topk(",
    "quantile(",
];

/// Aggregation and vector-matching modifiers.
pub const MODIFIERS: &[&str] = &[
    "by (",
    "without (",
    "on (",
    "ignoring (",
    "group_left(",
    "group_right(",
];

/// Range-duration literals offered after a selector inside a range function.
pub const TIME_RANGES: &[&str] = &[
    "[5m]", "[10m]", "[15m]", "[30m]", "[1h]", "[2h]", "[6h]", "[12h]", "[1d]", "[7d]",
];

/// Functions whose argument must be a range vector.
pub const TIME_RANGE_FUNCTIONS: &[&str] = &[
    "rate(",
    "increase(",
    "irate(",
    "delta(",
    "deriv(",
    "changes(",
    "resets(",
    "absent_over_time(",
    "avg_over_time(",
    "min_over_time(",
    "max_over_time(",
    "sum_over_time(",
    "count_over_time(",
    "quantile_over_time(",
    "stddev_over_time(",
    "stdvar_over_time(",
    "last_over_time(",
    "present_over_time(",
];

/// Whether any range-vector function call appears anywhere in `text`.
pub fn needs_time_range(text: &str) -> bool {
    TIME_RANGE_FUNCTIONS.iter().any(|func| text.contains(func))
}
