//! Channel-based feed source.
//!
//! Receives feed snapshots over a tokio watch channel, for hosts that push
//! data (ingest endpoints, message consumers) instead of writing files.

use std::fmt::Debug;

use tokio::sync::watch;

use super::FeedSource;

/// A feed source fed by a watch channel.
///
/// The producer side pushes whole snapshots; only the most recent one is
/// retained, so a slow poller simply skips intermediate states. The first
/// poll delivers whatever the channel currently holds (the default value
/// until something is sent), after that only changes are delivered.
///
/// # Example
///
/// ```
/// use stackwatch::{ChannelSource, CmdbSnapshot};
///
/// let (tx, source) = ChannelSource::<CmdbSnapshot>::create("cmdb ingest");
/// ```
#[derive(Debug)]
pub struct ChannelSource<T> {
    receiver: watch::Receiver<T>,
    description: String,
    primed: bool,
}

impl<T: Clone + Default> ChannelSource<T> {
    /// Wrap the receiving end of an existing watch channel.
    ///
    /// `source_description` names where snapshots come from, for status
    /// output (e.g. "cmdb ingest", "collector endpoint").
    pub fn new(receiver: watch::Receiver<T>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            primed: false,
        }
    }

    /// Create a fresh channel pair.
    ///
    /// Returns (sender, source); the sender pushes snapshots, the source
    /// is handed to the app.
    pub fn create(source_description: &str) -> (watch::Sender<T>, Self) {
        let (tx, rx) = watch::channel(T::default());
        (tx, Self::new(rx, source_description))
    }
}

impl<T: Clone + Debug + Send + Sync> FeedSource<T> for ChannelSource<T> {
    fn poll(&mut self) -> Option<T> {
        let deliver = if self.primed {
            self.receiver.has_changed().unwrap_or(false)
        } else {
            // First poll hands over the channel's current value
            self.primed = true;
            true
        };

        deliver.then(|| self.receiver.borrow_and_update().clone())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        // A dropped sender is not an error; no further snapshots arrive
        // and the last-known state stays in effect
        None
    }
}
