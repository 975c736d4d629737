//! Settings resolution: built-in defaults, then an optional YAML file, then
//! command-line flags.

use chrono::Utc;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::cli::Args;
use crate::remote::{ClientOptions, DEFAULT_URL};
use crate::timerange::{RangeSpec, TimeSpecError};

/// Errors that prevent the shell from starting with the requested settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to read password file {path}")]
    PasswordFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid range settings")]
    Range(#[from] TimeSpecError),
}

/// Contents of a YAML config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_file: Option<PathBuf>,
    pub insecure: Option<bool>,
    pub enable_label_values: Option<bool>,
    pub history_file: Option<PathBuf>,
    pub persist_history: Option<bool>,
    pub debug: Option<bool>,
    pub tips: Option<bool>,
    pub graph: Option<bool>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub step: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as null rather than an empty map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }
}

/// Fully resolved settings for a shell session.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientOptions,
    pub enable_label_values: bool,
    pub history_file: Option<PathBuf>,
    pub persist_history: bool,
    pub debug: bool,
    pub tips: bool,
    pub graph: bool,
    pub range: RangeSpec,
}

impl Settings {
    /// Resolve settings from parsed arguments, loading `--config` if given.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    /// Layer `args` over `file` over the defaults.
    ///
    /// Boolean switches can only turn a setting on from the command line;
    /// `--enable-label-values` takes an explicit value so it can turn it off.
    pub fn merge(args: &Args, file: FileConfig) -> Result<Self, ConfigError> {
        let password_file = args.password_file.clone().or(file.password_file);
        let password = match args.password.clone().or(file.password) {
            Some(password) => Some(password),
            None => password_file.as_deref().map(read_password_file).transpose()?,
        };

        let range = RangeSpec {
            start: args.start.clone().or(file.start).unwrap_or_else(|| RangeSpec::default().start),
            end: args.end.clone().or(file.end).unwrap_or_else(|| RangeSpec::default().end),
            step: args.step.clone().or(file.step).unwrap_or_else(|| RangeSpec::default().step),
        };
        range.resolve(Utc::now())?;

        Ok(Self {
            client: ClientOptions {
                url: args
                    .url
                    .clone()
                    .or(file.url)
                    .unwrap_or_else(|| DEFAULT_URL.to_string()),
                username: args.username.clone().or(file.username),
                password,
                insecure: args.insecure || file.insecure.unwrap_or(false),
                timeout: Duration::from_secs(30),
            },
            enable_label_values: args
                .enable_label_values
                .or(file.enable_label_values)
                .unwrap_or(true),
            history_file: args.history_file.clone().or(file.history_file),
            persist_history: args.persist_history || file.persist_history.unwrap_or(false),
            debug: args.debug || file.debug.unwrap_or(false),
            tips: args.tips || file.tips.unwrap_or(false),
            graph: args.graph || file.graph.unwrap_or(false),
            range,
        })
    }
}

fn read_password_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path)
        .map(|text| text.trim().to_string())
        .map_err(|source| ConfigError::PasswordFile {
            path: path.to_path_buf(),
            source,
        })
}
