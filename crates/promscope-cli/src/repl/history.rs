//! The history file backing the line editor.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// History file for one session, removed on drop unless persisted.
#[derive(Debug)]
pub struct HistoryFile {
    path: PathBuf,
    remove_on_drop: bool,
}

impl HistoryFile {
    /// Open `explicit` (relative paths resolve against the working directory)
    /// or a fresh `promscope_history_*.tmp` file in the temp directory.
    ///
    /// The file is created if missing.
    pub fn open(explicit: Option<&Path>, persist: bool) -> io::Result<Self> {
        let path = match explicit {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => std::env::current_dir()?.join(path),
            None => tempfile::Builder::new()
                .prefix("promscope_history_")
                .suffix(".tmp")
                .tempfile()?
                .into_temp_path()
                .keep()
                .map_err(|err| err.error)?,
        };

        if !path.exists() {
            debug!(path = %path.display(), "creating history file");
            OpenOptions::new().create(true).append(true).open(&path)?;
        }

        debug!(path = %path.display(), persist, "using history file");
        Ok(Self {
            path,
            remove_on_drop: !persist,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn persists(&self) -> bool {
        !self.remove_on_drop
    }
}

impl Drop for HistoryFile {
    fn drop(&mut self) {
        if !self.remove_on_drop {
            return;
        }
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %err, "could not remove history file");
        }
    }
}
