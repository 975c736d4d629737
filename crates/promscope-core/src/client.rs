//! Metadata client trait used by the label cache.

use std::sync::Arc;

use crate::error::RemoteResult;
use crate::types::Sample;

/// A client that can run instant queries against the monitoring server.
///
/// The completion engine only needs live samples for a metric so it can read
/// label names and values off their label sets. Implementations are expected
/// to apply their own timeout; the engine never retries a call.
pub trait MetadataClient: Send + Sync {
    /// Run an instant query for `expr` and return the resulting samples.
    fn query_instant(&self, expr: &str) -> RemoteResult<Vec<Sample>>;
}

impl<T: MetadataClient + ?Sized> MetadataClient for Arc<T> {
    fn query_instant(&self, expr: &str) -> RemoteResult<Vec<Sample>> {
        (**self).query_instant(expr)
    }
}

impl<T: MetadataClient + ?Sized> MetadataClient for &T {
    fn query_instant(&self, expr: &str) -> RemoteResult<Vec<Sample>> {
        (**self).query_instant(expr)
    }
}
