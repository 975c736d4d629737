use promscope_core::lexicon::{MODIFIERS, OPERATORS, TIME_RANGES};
use promscope_core::{
    CompletionResult, LabelCache, LabelSet, MetadataClient, QueryCompleter, RemoteError,
    RemoteResult, Sample,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

/// Stub server answering instant queries from a fixed table of series.
#[derive(Default)]
struct StubClient {
    series: HashMap<String, Vec<Sample>>,
    calls: AtomicUsize,
}

impl StubClient {
    fn with_series(mut self, metric: &str, label_sets: &[&[(&str, &str)]]) -> Self {
        let samples = label_sets
            .iter()
            .map(|pairs| {
                let mut labels: LabelSet = pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                labels.insert("__name__".to_string(), metric.to_string());
                Sample::new(labels, 1_700_000_000.0, "1")
            })
            .collect();
        self.series.insert(metric.to_string(), samples);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetadataClient for StubClient {
    fn query_instant(&self, expr: &str) -> RemoteResult<Vec<Sample>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let metric = expr.strip_suffix("{}").unwrap_or(expr);
        self.series
            .get(metric)
            .cloned()
            .ok_or_else(|| RemoteError::Status {
                status: 400,
                body: format!("unknown metric {metric}"),
            })
    }
}

fn default_client() -> Arc<StubClient> {
    Arc::new(
        StubClient::default()
            .with_series("up", &[&[("job", "prometheus"), ("instance", "localhost:9090")]])
            .with_series(
                "node_cpu_seconds_total",
                &[
                    &[("job", "node"), ("cpu", "0"), ("mode", "idle")],
                    &[("job", "node"), ("cpu", "1"), ("mode", "user")],
                ],
            ),
    )
}

fn completer_with(client: Arc<StubClient>, label_values: bool) -> QueryCompleter {
    QueryCompleter::new(["up", "node_cpu_seconds_total"], client, label_values)
}

/// Completes `input` with the cursor at the "|" marker, or at the end without one.
fn complete_at_cursor(completer: &QueryCompleter, input: &str) -> CompletionResult {
    let cursor = input.find('|').unwrap_or(input.len());
    let line = input.replace('|', "");
    completer.complete(&line, cursor)
}

#[test]
fn metric_name_suggests_opening_brace() {
    let completer = completer_with(default_client(), true);
    for metric in ["up", "node_cpu_seconds_total"] {
        let result = complete_at_cursor(&completer, metric);
        assert_eq!(result.candidates, vec!["{"], "metric {metric}");
        assert_eq!(result.replace_length, 0);
    }
}

#[test]
fn metric_followed_by_space_suggests_operators_and_modifiers() {
    let completer = completer_with(default_client(), true);
    let result = complete_at_cursor(&completer, "up ");
    let candidates: HashSet<&str> = result.candidates.iter().map(String::as_str).collect();

    for op in OPERATORS {
        assert!(candidates.contains(format!("{op} ").as_str()), "missing {op}");
    }
    for modifier in MODIFIERS {
        assert!(candidates.contains(modifier), "missing {modifier}");
    }
}

#[test]
fn closing_brace_without_range_function_has_no_durations() {
    let completer = completer_with(default_client(), true);
    let result = complete_at_cursor(&completer, "sum(up{job=\"prometheus\"}");

    assert!(!result.candidates.is_empty());
    for candidate in &result.candidates {
        let trimmed = candidate.trim();
        assert!(
            OPERATORS.contains(&trimmed) || MODIFIERS.contains(&trimmed),
            "unexpected candidate {candidate:?}"
        );
    }
}

#[test]
fn closing_brace_inside_rate_offers_durations() {
    let completer = completer_with(default_client(), true);
    let result = complete_at_cursor(&completer, "rate(node_cpu_seconds_total{mode=\"idle\"}");

    for range in TIME_RANGES {
        assert!(result.candidates.contains(&range.to_string()), "missing {range}");
    }
    assert!(result.candidates.contains(&" + ".to_string()));
    assert!(result.candidates.contains(&" by (".to_string()));
}

#[test]
fn completed_label_pair_offers_comma_or_close() {
    let completer = completer_with(default_client(), true);
    let result = complete_at_cursor(&completer, "up{job=\"prometheus\"");
    assert_eq!(result.candidates, vec![",", "}"]);
}

#[test]
fn label_names_after_open_brace() {
    let completer = completer_with(default_client(), true);
    let result = complete_at_cursor(&completer, "node_cpu_seconds_total{");
    assert_eq!(result.candidates, vec!["cpu=", "job=", "mode="]);
}

#[test]
fn label_names_after_comma_skip_used_labels() {
    let completer = completer_with(default_client(), true);
    let result = complete_at_cursor(&completer, "node_cpu_seconds_total{mode=\"idle\", ");
    assert_eq!(result.candidates, vec!["cpu=", "job="]);
}

#[test]
fn label_lookups_resolve_the_first_selector() {
    let completer = completer_with(default_client(), true);

    let result = complete_at_cursor(&completer, "label_replace(up{job=\"prometheus\"}, ");
    assert_eq!(result.candidates, vec!["instance="]);

    let result = complete_at_cursor(&completer, "up{} / node_cpu_seconds_total{job=\"");
    assert_eq!(result.candidates, vec!["prometheus\""]);
}

#[test]
fn cursor_in_middle_ignores_text_after_it() {
    let completer = completer_with(default_client(), true);
    let result = complete_at_cursor(&completer, "up{|} + up");
    assert_eq!(result.candidates, vec!["instance=", "job="]);
}

#[test]
fn second_label_value_lookup_is_served_from_cache() {
    let client = default_client();
    let cache = Arc::new(LabelCache::new(client.clone()));
    let completer = QueryCompleter::with_cache(["up"], cache.clone(), true);

    let first = complete_at_cursor(&completer, "up{job=");
    let calls_after_first = client.calls();
    let second = complete_at_cursor(&completer, "up{job=");

    assert_eq!(first, second);
    assert_eq!(client.calls(), calls_after_first);
    assert_eq!(cache.len(), 1);
}

#[test]
fn prefix_fallback_for_partial_metric() {
    let completer = completer_with(default_client(), true);
    let result = complete_at_cursor(&completer, "no");
    assert!(result
        .candidates
        .contains(&"node_cpu_seconds_total".to_string()));
    assert_eq!(result.replace_length, 2);
}

#[test]
fn label_values_for_single_sample() {
    let client = Arc::new(StubClient::default().with_series("up", &[&[("job", "prometheus")]]));
    let completer = QueryCompleter::new(["up"], client, true);

    let open_quote = complete_at_cursor(&completer, "up{job=\"");
    assert_eq!(open_quote.candidates, vec!["prometheus\""]);

    let bare = complete_at_cursor(&completer, "up{job=");
    assert_eq!(bare.candidates, vec!["\"prometheus\""]);
}

#[test]
fn disabled_label_values_never_quote() {
    let client = default_client();
    let completer = completer_with(client.clone(), false);

    for input in ["up{job=", "up{job=\""] {
        let result = complete_at_cursor(&completer, input);
        assert!(
            !result.candidates.iter().any(|c| c.contains('"')),
            "{input}: {:?}",
            result.candidates
        );
    }
    assert_eq!(client.calls(), 0);
}

#[test]
fn failed_lookup_yields_empty_without_fallthrough() {
    let client = Arc::new(StubClient::default());
    let completer = QueryCompleter::new(["up"], client.clone(), true);

    let result = complete_at_cursor(&completer, "up{");
    assert!(result.is_empty());
    // Bare query plus one empty-selector attempt, nothing more.
    assert_eq!(client.calls(), 2);
}

/// Client whose `slow` metric blocks until the test releases it.
struct GatedClient {
    inner: StubClient,
    entered: Barrier,
    release: Barrier,
}

impl MetadataClient for GatedClient {
    fn query_instant(&self, expr: &str) -> RemoteResult<Vec<Sample>> {
        if expr == "slow" {
            self.entered.wait();
            self.release.wait();
        }
        self.inner.query_instant(expr)
    }
}

#[test]
fn readers_proceed_while_another_key_is_populating() {
    let client = Arc::new(GatedClient {
        inner: StubClient::default()
            .with_series("up", &[&[("job", "prometheus")]])
            .with_series("node", &[&[("job", "node")]])
            .with_series("slow", &[&[("job", "a")], &[("job", "b")]]),
        entered: Barrier::new(2),
        release: Barrier::new(2),
    });
    let cache = Arc::new(LabelCache::new(client.clone()));
    cache.label_values("up", "job");
    cache.label_values("node", "job");

    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || cache.label_values("slow", "job"))
    };

    client.entered.wait();
    let readers: Vec<_> = ["up", "node"]
        .into_iter()
        .map(|metric| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.label_values(metric, "job"))
        })
        .collect();
    let read: Vec<Vec<String>> = readers
        .into_iter()
        .map(|handle| handle.join().unwrap().to_vec())
        .collect();
    assert_eq!(read, vec![vec!["prometheus".to_string()], vec!["node".to_string()]]);
    assert!(cache.cached("slow", "job").is_none());

    client.release.wait();
    let written = writer.join().unwrap();
    assert_eq!(&*written, ["a".to_string(), "b".to_string()]);
    assert_eq!(cache.cached("slow", "job"), Some(written));
}
