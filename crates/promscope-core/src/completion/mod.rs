//! PromQL autocompletion.
//!
//! [`QueryCompleter`] classifies the text before the cursor into a
//! [`QueryContext`] and builds candidates for it, consulting the shared
//! [`LabelCache`] for label names and values.

mod cache;
mod context;
mod engine;
pub mod lexicon;
mod prefix;

pub use cache::LabelCache;
pub use context::{classify, used_labels, QueryContext};
pub use engine::QueryCompleter;
pub use prefix::{trailing_word, PrefixMatcher};
