//! Synchronous facade over [`PromClient`] for the line editor.
//!
//! Completion callbacks run on the editor thread and cannot await, so this
//! wrapper owns a runtime and blocks on each request.

use promscope_core::{MetadataClient, RangeSeries, RemoteError, RemoteResult, Sample};
use tokio::runtime::Runtime;

use super::http::{ClientOptions, PromClient, QueryRange};

/// Blocking client used by the shell and by the completer's label lookups.
#[derive(Debug)]
pub struct BlockingClient {
    runtime: Runtime,
    inner: PromClient,
}

impl BlockingClient {
    pub fn new(options: &ClientOptions) -> RemoteResult<Self> {
        let runtime = Runtime::new()
            .map_err(|err| RemoteError::Transport(format!("failed to start async runtime: {err}")))?;
        let inner = PromClient::new(options)?;
        Ok(Self { runtime, inner })
    }

    pub fn api_url(&self) -> &str {
        self.inner.api_url()
    }

    pub fn metric_names(&self) -> RemoteResult<Vec<String>> {
        self.runtime.block_on(self.inner.metric_names())
    }

    pub fn query(&self, expr: &str) -> RemoteResult<Vec<Sample>> {
        self.runtime.block_on(self.inner.query_instant(expr))
    }

    pub fn query_range(&self, expr: &str, range: &QueryRange) -> RemoteResult<Vec<RangeSeries>> {
        self.runtime.block_on(self.inner.query_range(expr, range))
    }
}

impl MetadataClient for BlockingClient {
    fn query_instant(&self, expr: &str) -> RemoteResult<Vec<Sample>> {
        self.query(expr)
    }
}
