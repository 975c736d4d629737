//! CLI argument parsing using clap.
//!
//! Every setting is optional here so that values from a config file can fill
//! in whatever was not given on the command line.

use clap::Parser;
use std::path::PathBuf;

/// promscope - interactive PromQL shell
#[derive(Parser, Debug, Default)]
#[command(name = "promscope")]
#[command(about = "Query Prometheus interactively with context-aware completion", long_about = None)]
#[command(version)]
pub struct Args {
    /// YAML config file; command-line flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Prometheus server URL [default: http://localhost:9090]
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Username for basic authentication
    #[arg(long)]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(long)]
    pub password: Option<String>,

    /// Read the basic-auth password from this file
    #[arg(long, value_name = "FILE")]
    pub password_file: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Enable autocompletion for label values [default: true]
    #[arg(long, value_name = "BOOL")]
    pub enable_label_values: Option<bool>,

    /// Path to the command history file (a temporary file is used otherwise)
    #[arg(long, value_name = "FILE")]
    pub history_file: Option<PathBuf>,

    /// Keep the history file on exit
    #[arg(long)]
    pub persist_history: bool,

    /// Verbose errors and debug logging
    #[arg(long)]
    pub debug: bool,

    /// Show feature and usage tips on startup
    #[arg(long)]
    pub tips: bool,

    /// Run queries over a time range and draw ASCII graphs
    #[arg(short, long)]
    pub graph: bool,

    /// Range start: RFC 3339, unix seconds, `now`, or a duration ago like `1h`
    #[arg(long, value_name = "TIME")]
    pub start: Option<String>,

    /// Range end, same formats as --start [default: now]
    #[arg(long, value_name = "TIME")]
    pub end: Option<String>,

    /// Range resolution, e.g. `15s`, `1m` [default: 60s]
    #[arg(long, value_name = "DURATION")]
    pub step: Option<String>,
}
