pub mod client;
pub mod completion;
pub mod error;
pub mod types;

// Re-export main types and functions
pub use client::MetadataClient;
pub use completion::{classify, lexicon, LabelCache, PrefixMatcher, QueryCompleter, QueryContext};
pub use error::{RemoteError, RemoteResult};
pub use types::{CompletionResult, LabelSet, RangeSeries, Sample, METRIC_NAME_LABEL};
