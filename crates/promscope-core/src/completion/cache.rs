//! Label and label-value lookups backed by live instant queries.
//!
//! Label names are read fresh on every call: they are only needed right after
//! `metric{` or `,`, so an extra round trip is cheap. Label values are needed on
//! every keystroke inside a value position and are cached for the lifetime of
//! the cache object. Entries are never refreshed; metric schemas are assumed to
//! be stable for the duration of a session.
//!
//! The map is guarded by an [`RwLock`]. Remote calls happen before the write
//! lock is taken, so a slow population never blocks readers of other keys and
//! a reader never sees a half-built entry.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::client::MetadataClient;
use crate::types::{Sample, METRIC_NAME_LABEL};

type ValueMap = HashMap<String, HashMap<String, Arc<[String]>>>;

/// Shared cache of label values keyed by metric and label name.
pub struct LabelCache {
    client: Arc<dyn MetadataClient>,
    values: RwLock<ValueMap>,
}

impl LabelCache {
    pub fn new(client: Arc<dyn MetadataClient>) -> Self {
        Self {
            client,
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Label names observed on the live series of `metric`, sorted, without `__name__`.
    ///
    /// Returns an empty list when the metric cannot be queried.
    pub fn labels(&self, metric: &str) -> Vec<String> {
        let Some(samples) = self.fetch_samples(metric) else {
            return Vec::new();
        };

        let names: BTreeSet<&str> = samples
            .iter()
            .flat_map(|sample| sample.labels.keys())
            .map(String::as_str)
            .filter(|name| *name != METRIC_NAME_LABEL)
            .collect();

        names.into_iter().map(str::to_string).collect()
    }

    /// Distinct values of `label` across the live series of `metric`, sorted.
    ///
    /// Served from the cache when present. On a miss the metric is queried and
    /// the result stored before returning. A failed lookup returns an empty
    /// slice and is not cached, so the next keystroke tries again.
    pub fn label_values(&self, metric: &str, label: &str) -> Arc<[String]> {
        if let Some(values) = self.cached(metric, label) {
            return values;
        }

        let Some(samples) = self.fetch_samples(metric) else {
            return Arc::from(Vec::new());
        };

        let distinct: BTreeSet<&str> = samples
            .iter()
            .filter_map(|sample| sample.labels.get(label))
            .map(String::as_str)
            .collect();
        let fetched: Arc<[String]> = distinct.into_iter().map(str::to_string).collect();

        let mut map = self.write();
        let entry = map
            .entry(metric.to_string())
            .or_default()
            .entry(label.to_string())
            .or_insert(fetched);
        Arc::clone(entry)
    }

    /// Cached values for `(metric, label)` without touching the server.
    pub fn cached(&self, metric: &str, label: &str) -> Option<Arc<[String]>> {
        self.read()
            .get(metric)
            .and_then(|labels| labels.get(label))
            .map(Arc::clone)
    }

    /// Number of cached `(metric, label)` entries.
    pub fn len(&self) -> usize {
        self.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Query `metric`, falling back to `metric{}` if the bare query fails.
    fn fetch_samples(&self, metric: &str) -> Option<Vec<Sample>> {
        match self.client.query_instant(metric) {
            Ok(samples) => return Some(samples),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                debug!(metric, error = %_err, "bare metric query failed, retrying with empty selector");
            }
        }

        match self.client.query_instant(&format!("{metric}{{}}")) {
            Ok(samples) => Some(samples),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                debug!(metric, error = %_err, "metric lookup failed, no label candidates");
                None
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ValueMap> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ValueMap> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for LabelCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}
