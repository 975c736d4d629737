//! promscope - interactive PromQL shell

use promscope_cli::config::Settings;
use promscope_cli::logging::init_logging;
use promscope_cli::remote::BlockingClient;
use promscope_cli::repl::{self, HistoryFile};
use promscope_cli::Args;

use anyhow::{Context, Result};
use clap::Parser;
use promscope_core::{MetadataClient, QueryCompleter};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

/// The server could not be reached or the session failed.
const EXIT_FAILURE: u8 = 1;
/// Configuration error (unreadable config file, bad time range).
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match Settings::from_args(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("promscope: error: {:#}", anyhow::Error::new(e));
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    init_logging(settings.debug);

    match run(settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("promscope: error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(settings: Settings) -> Result<()> {
    println!("{}", repl::banner(settings.tips));

    let client = Arc::new(BlockingClient::new(&settings.client).context("failed to create HTTP client")?);
    debug!(
        api_url = client.api_url(),
        username = settings.client.username.as_deref().unwrap_or(""),
        insecure = settings.client.insecure,
        "client configured"
    );

    print!("Loading metrics...");
    io::stdout().flush().ok();
    let metrics = match client.metric_names() {
        Ok(metrics) => metrics,
        Err(err) => {
            println!();
            return Err(err).context("failed to load metric names");
        }
    };
    println!("\rLoaded {} metrics successfully.", metrics.len());

    let metadata: Arc<dyn MetadataClient> = client.clone();
    let completer = Arc::new(QueryCompleter::new(
        metrics,
        metadata,
        settings.enable_label_values,
    ));

    let history = match HistoryFile::open(settings.history_file.as_deref(), settings.persist_history) {
        Ok(history) => Some(history),
        Err(err) => {
            eprintln!("promscope: warning: could not set up history file: {err}");
            None
        }
    };

    repl::run(&settings, &client, completer, history.as_ref())
}
