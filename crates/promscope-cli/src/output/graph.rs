//! ASCII line graphs for range query results.

use chrono::{DateTime, Local, TimeZone};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use promscope_core::{RangeSeries, METRIC_NAME_LABEL};
use std::fmt::{Display, Write};

/// Plot rows per series.
pub const GRAPH_HEIGHT: usize = 10;
/// Plot columns to the right of the y axis.
pub const GRAPH_WIDTH: usize = 80;

/// Render every series that has at least one finite value, with local times
/// on the x axis.
pub fn format_graph(series: &[RangeSeries], use_colors: bool) -> String {
    let colored = use_colors && std::io::stdout().is_terminal();
    format_graph_in(series, &Local, colored)
}

/// Render with time labels in `tz`.
pub fn format_graph_in<Tz>(series: &[RangeSeries], tz: &Tz, colored: bool) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();

    for entry in series {
        let data = entry.finite_values();
        if data.is_empty() {
            continue;
        }

        writeln!(out).unwrap();
        writeln!(out, "{}", series_title(entry, colored)).unwrap();

        let (margin, plot) = plot_lines(&data);
        for line in plot {
            writeln!(out, "{line}").unwrap();
        }

        if let (Some(first), Some(last)) = (entry.values.first(), entry.values.last()) {
            if entry.values.len() > 1 {
                write_time_axis(&mut out, margin, first.0, last.0, tz);
            }
        }
        writeln!(out).unwrap();
    }

    if out.is_empty() {
        return "No data found for the given range.\n".to_string();
    }
    out
}

/// `name{label="value", ...}` with labels sorted by name.
pub fn series_title(series: &RangeSeries, colored: bool) -> String {
    let mut title = String::new();
    if let Some(name) = series.labels.get(METRIC_NAME_LABEL) {
        if colored {
            write!(title, "{}", name.bold()).unwrap();
        } else {
            title.push_str(name);
        }
    }

    let pairs: Vec<String> = series
        .labels
        .iter()
        .filter(|(key, _)| key.as_str() != METRIC_NAME_LABEL)
        .map(|(key, value)| format!("{key}=\"{value}\""))
        .collect();
    write!(title, "{{{}}}", pairs.join(", ")).unwrap();
    title
}

/// Draw `data` as a line plot. Returns the column of the y axis and the rows.
fn plot_lines(data: &[f64]) -> (usize, Vec<String>) {
    let points = resample(data, GRAPH_WIDTH);
    let min = points.iter().copied().fold(f64::INFINITY, f64::min);
    let max = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };
    let top = GRAPH_HEIGHT - 1;

    let level = |value: f64| -> usize { (((value - min) / span) * top as f64).round() as usize };

    // grid[level][column], level 0 at the bottom.
    let mut grid = vec![vec![' '; GRAPH_WIDTH]; GRAPH_HEIGHT];
    grid[level(points[0])][0] = '─';
    for x in 1..points.len() {
        let from = level(points[x - 1]);
        let to = level(points[x]);
        if from == to {
            grid[to][x] = '─';
            continue;
        }
        let (low, high) = if from < to { (from, to) } else { (to, from) };
        for row in grid.iter_mut().take(high).skip(low + 1) {
            row[x] = '│';
        }
        if from > to {
            grid[from][x] = '╮';
            grid[to][x] = '╰';
        } else {
            grid[from][x] = '╯';
            grid[to][x] = '╭';
        }
    }

    let labels: Vec<String> = (0..GRAPH_HEIGHT)
        .rev()
        .map(|lvl| format!("{:.2}", min + span * lvl as f64 / top as f64))
        .collect();
    let label_width = labels.iter().map(String::len).max().unwrap_or(0);

    let lines = labels
        .iter()
        .zip(grid.iter().rev())
        .map(|(label, row)| {
            let cells: String = row.iter().collect();
            format!("{label:>label_width$} ┤{}", cells.trim_end())
        })
        .collect();

    (label_width + 1, lines)
}

/// Linear resampling of `data` onto `width` evenly spaced points.
fn resample(data: &[f64], width: usize) -> Vec<f64> {
    if data.len() == 1 || width < 2 {
        return vec![data[0]; width.max(1)];
    }
    let scale = (data.len() - 1) as f64 / (width - 1) as f64;
    (0..width)
        .map(|i| {
            let pos = i as f64 * scale;
            let base = pos.floor() as usize;
            let next = (base + 1).min(data.len() - 1);
            let frac = pos - base as f64;
            data[base] + (data[next] - data[base]) * frac
        })
        .collect()
}

fn write_time_axis<Tz>(out: &mut String, margin: usize, start: f64, end: f64, tz: &Tz)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let indent = " ".repeat(margin);

    let dashes = GRAPH_WIDTH / 2 - 1;
    writeln!(
        out,
        "{indent}└{}┬{}┘",
        "─".repeat(dashes),
        "─".repeat(GRAPH_WIDTH - dashes - 2)
    )
    .unwrap();

    let start_time = to_local(start, tz);
    let end_time = to_local(end, tz);
    let mid_time = to_local(start + (end - start) / 2.0, tz);

    let start_str = start_time.format("%H:%M").to_string();
    let mid_str = mid_time.format("%H:%M").to_string();
    let end_str = end_time.format("%H:%M").to_string();

    let pad_mid = (GRAPH_WIDTH / 2)
        .saturating_sub(mid_str.len() / 2 + start_str.len())
        .max(1);
    let used = start_str.len() + pad_mid + mid_str.len();
    let pad_end = GRAPH_WIDTH.saturating_sub(end_str.len() + used).max(1);
    writeln!(
        out,
        "{indent}{start_str}{}{mid_str}{}{end_str}",
        " ".repeat(pad_mid),
        " ".repeat(pad_end)
    )
    .unwrap();

    let caption = format!("[ Time: {} ]", start_time.format("%Y-%m-%d"));
    let pad_caption = (GRAPH_WIDTH / 2).saturating_sub(caption.len() / 2);
    writeln!(out, "{indent}{}{caption}", " ".repeat(pad_caption)).unwrap();
}

fn to_local<Tz: TimeZone>(unix_secs: f64, tz: &Tz) -> DateTime<Tz> {
    let utc = DateTime::from_timestamp(unix_secs.floor() as i64, 0).unwrap_or_default();
    utc.with_timezone(tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use promscope_core::LabelSet;

    fn series(values: &[(f64, &str)]) -> RangeSeries {
        let mut labels = LabelSet::new();
        labels.insert("__name__".to_string(), "up".to_string());
        labels.insert("job".to_string(), "node".to_string());
        labels.insert("instance".to_string(), "a:9100".to_string());
        RangeSeries {
            labels,
            values: values.iter().map(|(t, v)| (*t, v.to_string())).collect(),
        }
    }

    // 2026-01-16 12:00:00 UTC
    const T0: f64 = 1_768_564_800.0;

    #[test]
    fn test_no_data() {
        assert_eq!(format_graph_in(&[], &Utc, false), "No data found for the given range.\n");
        let only_nan = series(&[(T0, "NaN"), (T0 + 60.0, "+Inf")]);
        assert_eq!(
            format_graph_in(&[only_nan], &Utc, false),
            "No data found for the given range.\n"
        );
    }

    #[test]
    fn test_title_sorted_labels() {
        let title = series_title(&series(&[(T0, "1")]), false);
        assert_eq!(title, "up{instance=\"a:9100\", job=\"node\"}");
    }

    #[test]
    fn test_resample_endpoints() {
        let points = resample(&[0.0, 10.0], 11);
        assert_eq!(points.len(), 11);
        assert_eq!(points[0], 0.0);
        assert_eq!(points[5], 5.0);
        assert_eq!(points[10], 10.0);
        assert_eq!(resample(&[3.0], 4), vec![3.0; 4]);
    }

    #[test]
    fn test_plot_shape() {
        let (margin, lines) = plot_lines(&[0.0, 9.0]);
        assert_eq!(lines.len(), GRAPH_HEIGHT);
        // Axis sits right after the widest label and a space.
        assert_eq!(margin, "9.00".len() + 1);
        assert!(lines[0].starts_with("9.00 ┤"));
        assert!(lines[GRAPH_HEIGHT - 1].starts_with("0.00 ┤─"));
    }

    #[test]
    fn test_flat_series() {
        let (_, lines) = plot_lines(&[5.0, 5.0, 5.0]);
        let bottom = lines.last().unwrap();
        assert!(bottom.ends_with(&"─".repeat(GRAPH_WIDTH)));
    }

    #[test]
    fn test_time_axis() {
        let out = format_graph_in(
            &[series(&[(T0, "1"), (T0 + 1800.0, "3"), (T0 + 3600.0, "2")])],
            &Utc,
            false,
        );
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[1], "up{instance=\"a:9100\", job=\"node\"}");
        let axis = lines.iter().find(|l| l.contains('└')).unwrap();
        assert_eq!(axis.trim_start().chars().count(), GRAPH_WIDTH + 1);
        assert!(axis.contains('┬'));

        let times = lines.iter().find(|l| l.contains("12:00")).unwrap();
        assert!(times.contains("12:30"));
        assert!(times.trim_end().ends_with("13:00"));

        assert!(out.contains("[ Time: 2026-01-16 ]"));
    }

    #[test]
    fn test_single_point_has_no_time_axis() {
        let out = format_graph_in(&[series(&[(T0, "4")])], &Utc, false);
        assert!(!out.contains('└'));
        assert!(out.contains("up{"));
    }
}
