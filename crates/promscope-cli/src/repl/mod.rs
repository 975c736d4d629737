//! The interactive query loop.

mod helper;
mod history;

pub use helper::PromHelper;
pub use history::HistoryFile;

use anyhow::Result;
use chrono::Utc;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use promscope_core::QueryCompleter;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::output::{format_graph, format_table};
use crate::remote::BlockingClient;

const GREETING: &str = "Enter Prometheus queries. Press Ctrl+C to exit.";

const TIPS: &str = "
✨ Features:
     - Metric Names: autocompletion for every metric the server knows
     - Label Names: label suggestions after \"metric{\"
     - Label Values: live label value suggestions, cached per session
     - PromQL: operators, functions, range selectors and modifiers
     - Context-aware suggestions based on the text before the cursor

💡 Tips:
     - Type 'rat' + Tab -> 'rate('
     - After metric{} + Tab -> operators and modifiers
     - Inside functions + Tab -> metrics
     - After operators + Tab -> metrics and functions
";

/// Startup text, with the feature overview when `tips` is set.
pub fn banner(tips: bool) -> String {
    if tips {
        format!("{GREETING}\n{TIPS}")
    } else {
        GREETING.to_string()
    }
}

/// Run one query and render its result, or a short error message.
///
/// Instant queries are shown as a table. In graph mode the query runs over
/// the configured range and each series is drawn as an ASCII graph.
pub fn evaluate(client: &BlockingClient, settings: &Settings, query: &str) -> String {
    if settings.graph {
        let range = match settings.range.resolve(Utc::now()) {
            Ok(range) => range,
            Err(err) => return format!("Invalid time range: {err}\n"),
        };
        match client.query_range(query, &range) {
            Ok(series) => format_graph(&series, true),
            Err(err) => query_error(settings, &err),
        }
    } else {
        match client.query(query) {
            Ok(samples) => format_table(&samples, true),
            Err(err) => query_error(settings, &err),
        }
    }
}

fn query_error(settings: &Settings, err: &promscope_core::RemoteError) -> String {
    debug!(error = %err, "query failed");
    if settings.debug {
        format!("Error executing query: {err}\n")
    } else {
        "Error executing query. Use --debug for more details.\n".to_string()
    }
}

/// Read queries until Ctrl-C or end of input.
pub fn run(
    settings: &Settings,
    client: &BlockingClient,
    completer: Arc<QueryCompleter>,
    history: Option<&HistoryFile>,
) -> Result<()> {
    let config = Config::builder()
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();
    let mut editor = Editor::<PromHelper, DefaultHistory>::with_config(config)?;
    editor.set_helper(Some(PromHelper::new(Arc::clone(&completer))));

    if let Some(history) = history {
        if let Err(err) = editor.load_history(history.path()) {
            debug!(error = %err, "history not loaded");
        }
    }

    let prompt = if std::io::stdout().is_terminal() {
        format!("{} ", "»".red())
    } else {
        "» ".to_string()
    };

    loop {
        match editor.readline(&prompt) {
            Ok(line) => {
                let query = line.trim();
                if query.is_empty() {
                    continue;
                }
                if let Err(err) = editor.add_history_entry(query) {
                    debug!(error = %err, "history entry not added");
                }
                print!("{}", evaluate(client, settings, query));
            }
            Err(ReadlineError::Interrupted) => {
                println!("Exiting...");
                break;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    debug!(entries = completer.cache().len(), "label value cache at exit");

    if let Some(history) = history {
        if let Err(err) = editor.save_history(history.path()) {
            warn!(path = %history.path().display(), error = %err, "could not save history");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner() {
        assert_eq!(banner(false), GREETING);
        let with_tips = banner(true);
        assert!(with_tips.starts_with(GREETING));
        assert!(with_tips.contains("Tips:"));
    }
}
