//! File-based feed source.
//!
//! Polls a JSON document on disk for feed snapshots.

use std::fmt::Debug;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::de::DeserializeOwned;

use super::FeedSource;

/// A feed source that polls a JSON document on disk.
///
/// A snapshot is returned on the first poll and again whenever the file's
/// modification time moves forward. Read and parse failures are reported
/// through [`FeedSource::error`] and leave the last-known snapshot in
/// effect upstream.
#[derive(Debug)]
pub struct FileSource<T> {
    path: PathBuf,
    description: String,
    last_modified: Option<SystemTime>,
    last_error: Option<String>,
    _snapshot: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> FileSource<T> {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            description: format!("file: {}", path.display()),
            path,
            last_modified: None,
            last_error: None,
            _snapshot: PhantomData,
        }
    }

    /// Returns the path being polled.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file is newer than the last successful read.
    ///
    /// A file that has not appeared yet, or that disappeared after a read,
    /// is not "new"; the first poll always reads.
    fn has_new_data(&self, modified: Option<SystemTime>) -> bool {
        match (self.last_modified, modified) {
            (None, _) => true,
            (Some(last), Some(current)) => current > last,
            (Some(_), None) => false,
        }
    }

    fn load(&self) -> Result<T, String> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| format!("read failed: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("parse failed: {}", e))
    }
}

impl<T: DeserializeOwned + Debug> FeedSource<T> for FileSource<T> {
    fn poll(&mut self) -> Option<T> {
        let modified = fs::metadata(&self.path).ok().and_then(|m| m.modified().ok());
        if !self.has_new_data(modified) {
            return None;
        }

        match self.load() {
            Ok(snapshot) => {
                self.last_modified = modified;
                self.last_error = None;
                Some(snapshot)
            }
            Err(e) => {
                self.last_error = Some(e);
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
