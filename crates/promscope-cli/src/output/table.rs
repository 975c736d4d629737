//! Tabular output for instant query results.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use promscope_core::{Sample, METRIC_NAME_LABEL};
use std::collections::BTreeSet;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Widest table rendered: `Metric`, up to eight labels, `Value`.
pub const MAX_COLUMNS: usize = 10;
/// Longer headers and cells are cut to this many characters.
pub const MAX_CELL_WIDTH: usize = 20;

/// Format instant query samples as a table with one row per series.
///
/// Columns are the metric name, every label seen across the result in
/// sorted order, and the sample value.
pub fn format_table(samples: &[Sample], use_colors: bool) -> String {
    if samples.is_empty() {
        return "No results found\n".to_string();
    }

    let colored = use_colors && std::io::stdout().is_terminal();

    let labels: Vec<&str> = samples
        .iter()
        .flat_map(|sample| sample.labels.keys())
        .map(String::as_str)
        .filter(|label| *label != METRIC_NAME_LABEL)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(MAX_COLUMNS - 2)
        .collect();

    let mut builder = Builder::default();

    let header = std::iter::once("Metric")
        .chain(labels.iter().copied())
        .chain(std::iter::once("Value"))
        .map(|name| {
            let name = truncate(name);
            if colored {
                name.bold().to_string()
            } else {
                name
            }
        });
    builder.push_record(header);

    for sample in samples {
        let row = std::iter::once(sample.metric_name().unwrap_or_default().to_string())
            .chain(
                labels
                    .iter()
                    .map(|label| truncate(sample.labels.get(*label).map_or("", String::as_str))),
            )
            .chain(std::iter::once(sample.value.clone()));
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::modern());

    let mut out = table.to_string();
    out.push('\n');
    out
}

/// Cut `text` to [`MAX_CELL_WIDTH`] characters, ending in `...` when shortened.
pub fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
    cut.push_str("...");
    cut
}
