//! Feed-input abstraction for the CMDB, trace, and alert feeds.
//!
//! This module provides a trait-based abstraction for receiving feed
//! snapshots from various backends (file polling, in-memory channels),
//! plus the wire record types the feeds deliver.

mod channel;
mod file;
mod records;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use records::{cmdb_from_relations, Alert, CiRelation, CmdbSnapshot, ConfigItem, Span};

use std::fmt::Debug;

/// A pollable source of one feed's snapshots.
///
/// Each feed (CMDB, spans, alerts) gets its own source, so one feed's
/// absence or failure never blocks the others. Implementations provide
/// snapshots from different backends - file polling or in-memory channels.
///
/// # Example
///
/// ```
/// use stackwatch::{CmdbSnapshot, FeedSource, FileSource};
///
/// let mut source: FileSource<CmdbSnapshot> = FileSource::new("cmdb.json");
/// if let Some(snapshot) = source.poll() {
///     println!("{} configuration items", snapshot.len());
/// }
/// ```
pub trait FeedSource<T>: Send + Debug {
    /// Poll for a new snapshot without blocking.
    ///
    /// `None` means nothing new since the last poll; the caller keeps
    /// whatever snapshot it already has.
    fn poll(&mut self) -> Option<T>;

    /// Where this feed comes from, for status output.
    fn description(&self) -> &str;

    /// The error from the most recent poll, if it failed.
    fn error(&self) -> Option<&str>;
}
