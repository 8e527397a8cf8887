//! Application state and the refresh cycle.

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use crate::data::{
    alert_timeline, correlate_alerts, CorrelatedAlert, GraphModel, StatusResolver, TraceTimeline,
    DEFAULT_CORRELATION_WINDOW,
};
use crate::source::{Alert, CmdbSnapshot, FeedSource, Span};

/// All derived models for one refresh, handed to the rendering consumer.
///
/// A view is rebuilt from scratch whenever any feed delivers; the previous
/// view is discarded outright. There are no merge semantics and no
/// cross-refresh identity beyond matching identifiers.
#[derive(Debug, Clone)]
pub struct EstateView {
    /// Dependency topology rooted at the configured entry node.
    pub topology: GraphModel,
    /// Service-level call graph reconstructed from span parentage.
    pub services: GraphModel,
    /// Spans grouped per trace, time-ordered.
    pub timeline: TraceTimeline,
    /// Alerts in ascending time order.
    pub alerts: Vec<Alert>,
    /// Alerts with the spans observed around them.
    pub correlated: Vec<CorrelatedAlert>,
}

/// Main application state: the three feed sources and the latest view.
///
/// The feeds are polled and fail independently - a feed that errors or
/// never delivers keeps its last-known snapshot (initially empty) without
/// affecting the others, so topology construction still works when the
/// span feed is down and vice versa.
pub struct App {
    cmdb_source: Box<dyn FeedSource<CmdbSnapshot>>,
    trace_source: Box<dyn FeedSource<Vec<Span>>>,
    alert_source: Box<dyn FeedSource<Vec<Alert>>>,

    root: String,
    correlation_window: Duration,

    // Last-known snapshots per feed
    cmdb: CmdbSnapshot,
    spans: Vec<Span>,
    alerts: Vec<Alert>,

    /// The latest built view; available after the first [`App::refresh`].
    pub view: Option<EstateView>,

    // Per-feed errors from the most recent poll
    pub cmdb_error: Option<String>,
    pub trace_error: Option<String>,
    pub alert_error: Option<String>,
}

impl App {
    /// Create a new App over the given feed sources.
    ///
    /// `root` is the entry node for the dependency topology.
    pub fn new(
        cmdb_source: Box<dyn FeedSource<CmdbSnapshot>>,
        trace_source: Box<dyn FeedSource<Vec<Span>>>,
        alert_source: Box<dyn FeedSource<Vec<Alert>>>,
        root: impl Into<String>,
    ) -> Self {
        Self {
            cmdb_source,
            trace_source,
            alert_source,
            root: root.into(),
            correlation_window: DEFAULT_CORRELATION_WINDOW,
            cmdb: CmdbSnapshot::new(),
            spans: Vec::new(),
            alerts: Vec::new(),
            view: None,
            cmdb_error: None,
            trace_error: None,
            alert_error: None,
        }
    }

    /// Override the alert/span correlation window.
    pub fn with_correlation_window(mut self, window: Duration) -> Self {
        self.correlation_window = window;
        self
    }

    /// The configured topology root.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Descriptions of the three feed sources (cmdb, traces, alerts).
    pub fn source_descriptions(&self) -> [&str; 3] {
        [
            self.cmdb_source.description(),
            self.trace_source.description(),
            self.alert_source.description(),
        ]
    }

    /// Poll all feeds and rebuild the view if anything changed.
    ///
    /// Returns Ok(true) if a feed delivered new data. A view is always
    /// available after the first call, even when every feed is empty or
    /// failing - the models degrade, construction never does.
    pub fn refresh(&mut self) -> Result<bool> {
        let mut changed = false;

        if let Some(snapshot) = poll_feed(&mut *self.cmdb_source, &mut self.cmdb_error, "cmdb") {
            debug!(items = snapshot.len(), "cmdb feed delivered");
            self.cmdb = snapshot;
            changed = true;
        }
        if let Some(snapshot) = poll_feed(&mut *self.trace_source, &mut self.trace_error, "traces")
        {
            debug!(spans = snapshot.len(), "trace feed delivered");
            self.spans = snapshot;
            changed = true;
        }
        if let Some(snapshot) = poll_feed(&mut *self.alert_source, &mut self.alert_error, "alerts")
        {
            debug!(alerts = snapshot.len(), "alert feed delivered");
            self.alerts = snapshot;
            changed = true;
        }

        if changed || self.view.is_none() {
            self.rebuild();
        }
        Ok(changed)
    }

    /// Build a fresh view from the last-known snapshots.
    fn rebuild(&mut self) {
        let resolver = StatusResolver::from_alerts(&self.alerts);

        let view = EstateView {
            topology: GraphModel::dependency_topology(&self.cmdb, &self.root, &resolver),
            services: GraphModel::service_graph(&self.spans, Some(&self.cmdb), &resolver),
            timeline: TraceTimeline::group(&self.spans),
            alerts: alert_timeline(&self.alerts),
            correlated: correlate_alerts(&self.alerts, &self.spans, self.correlation_window),
        };

        debug!(
            topology_nodes = view.topology.len(),
            services = view.services.len(),
            traces = view.timeline.len(),
            alerts = view.alerts.len(),
            "estate view rebuilt"
        );
        self.view = Some(view);
    }
}

/// Poll one feed, recording its error state without touching the others.
fn poll_feed<T>(
    source: &mut dyn FeedSource<T>,
    error_slot: &mut Option<String>,
    feed: &str,
) -> Option<T> {
    match source.error() {
        Some(err) => {
            // Log each distinct error once, not on every poll
            if error_slot.as_deref() != Some(err) {
                warn!(feed, error = err, "feed error");
            }
            *error_slot = Some(err.to_string());
        }
        None => *error_slot = None,
    }
    source.poll()
}
