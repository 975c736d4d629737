use promscope_core::lexicon::{MODIFIERS, OPERATORS};
use promscope_core::{MetadataClient, QueryCompleter, RemoteError, RemoteResult, Sample};
use proptest::prelude::*;
use std::sync::Arc;

struct OfflineClient;

impl MetadataClient for OfflineClient {
    fn query_instant(&self, _expr: &str) -> RemoteResult<Vec<Sample>> {
        Err(RemoteError::Transport("offline".into()))
    }
}

proptest! {
    #[test]
    fn known_metric_completes_to_brace(metric in "[a-zA-Z_:][a-zA-Z0-9_:]{0,20}") {
        let completer = QueryCompleter::new([metric.clone()], Arc::new(OfflineClient), true);

        let result = completer.complete(&metric, metric.len());
        prop_assert_eq!(result.candidates, vec!["{".to_string()]);
        prop_assert_eq!(result.replace_length, 0);
    }

    #[test]
    fn known_metric_with_space_offers_operators(metric in "[a-zA-Z_:][a-zA-Z0-9_:]{0,20}") {
        let completer = QueryCompleter::new([metric.clone()], Arc::new(OfflineClient), true);
        let input = format!("{metric} ");

        let result = completer.complete(&input, input.len());
        for op in OPERATORS {
            let expected = format!("{op} ");
            prop_assert!(result.candidates.contains(&expected), "missing {:?}", expected);
        }
        for modifier in MODIFIERS {
            let expected = modifier.to_string();
            prop_assert!(result.candidates.contains(&expected), "missing {:?}", expected);
        }
    }

    #[test]
    fn completion_never_panics(input in "\\PC{0,40}", cursor in 0usize..64) {
        let completer = QueryCompleter::new(["up"], Arc::new(OfflineClient), true);
        let _ = completer.complete(&input, cursor);
    }
}
