//! Line editor integration for the completer.

use promscope_core::QueryCompleter;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::sync::Arc;

/// Rustyline helper that forwards Tab completion to a [`QueryCompleter`].
pub struct PromHelper {
    completer: Arc<QueryCompleter>,
}

impl PromHelper {
    pub fn new(completer: Arc<QueryCompleter>) -> Self {
        Self { completer }
    }

    /// Replacement start and candidates for `line` with the cursor at `pos`.
    pub fn candidates_at(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let result = self.completer.complete(line, pos);
        let start = pos.min(line.len()).saturating_sub(result.replace_length);
        let pairs = result
            .candidates
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        (start, pairs)
    }
}

impl Completer for PromHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        Ok(self.candidates_at(line, pos))
    }
}

impl Hinter for PromHelper {
    type Hint = String;
}

impl Highlighter for PromHelper {}

impl Validator for PromHelper {}

impl Helper for PromHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use promscope_core::{MetadataClient, RemoteError, RemoteResult, Sample};

    struct Offline;

    impl MetadataClient for Offline {
        fn query_instant(&self, _expr: &str) -> RemoteResult<Vec<Sample>> {
            Err(RemoteError::Transport("offline".into()))
        }
    }

    fn helper() -> PromHelper {
        let completer = QueryCompleter::new(["node_load1", "up"], Arc::new(Offline), true);
        PromHelper::new(Arc::new(completer))
    }

    #[test]
    fn test_prefix_completion_replaces_word() {
        let (start, pairs) = helper().candidates_at("sum(node_l", 10);
        assert_eq!(start, 4);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].replacement, "node_load1");
        assert_eq!(pairs[0].display, "node_load1");
    }

    #[test]
    fn test_context_completion_appends_at_cursor() {
        let (start, pairs) = helper().candidates_at("up", 2);
        assert_eq!(start, 2);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].replacement, "{");
    }
}
