// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # stackwatch
//!
//! A library and CLI for deriving health-annotated graph models from the
//! operational feeds of a running IT estate.
//!
//! Three flat feeds go in - a CMDB snapshot (configuration items with
//! `depends_on` edges and a RAG health code), a batch of distributed-trace
//! spans, and an incident/alert list - and three deterministic models come
//! out: a dependency topology rooted at a chosen entry node, a service-level
//! call graph reconstructed from span parentage, and a per-trace timeline.
//! Every node carries a single resolved status merged from CMDB health and
//! active incident impact.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌───────────────────────┐    │
//! │  │  app    │───▶│   data   │───▶│ rendering consumer    │    │
//! │  │ (state) │    │ (graphs) │    │ (JSON export, web UI) │    │
//! │  └────┬────┘    └──────────┘    └───────────────────────┘    │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── FileSource | ChannelSource  (one per feed)   │
//! │  │ (input) │                                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: refresh-cycle state - polls the three feeds independently
//!   and rebuilds the full [`EstateView`] whenever any of them delivers
//! - **[`source`]**: feed abstraction ([`FeedSource`]) with file-polling and
//!   channel-push implementations, plus the wire record types
//! - **[`data`]**: the pure core - status resolution, topology and service
//!   graph construction, timeline grouping, alert correlation
//! - **[`settings`]**: file/environment configuration for the binary
//!
//! The builders in [`data`] are pure, synchronous transforms over immutable
//! snapshots. They never fail: missing references degrade to default
//! statuses or dropped edges, malformed records are excluded, and an empty
//! feed produces an empty graph. Rendering - layout, interaction, markup -
//! is a downstream consumer of the finished models and lives outside this
//! crate.
//!
//! ## Building graphs directly
//!
//! ```
//! use stackwatch::{CmdbSnapshot, ConfigItem, GraphModel, StatusResolver};
//!
//! let mut cmdb = CmdbSnapshot::new();
//! cmdb.insert(
//!     "web01".to_string(),
//!     ConfigItem {
//!         depends_on: vec!["db01".to_string()],
//!         rag: Some("green".to_string()),
//!         ..Default::default()
//!     },
//! );
//!
//! let resolver = StatusResolver::new();
//! let topology = GraphModel::dependency_topology(&cmdb, "web01", &resolver);
//! assert_eq!(topology.len(), 2);
//! assert_eq!(topology.depth(), 2);
//! ```
//!
//! ## Running the full refresh cycle
//!
//! ```
//! use stackwatch::{App, ChannelSource};
//!
//! let (cmdb_tx, cmdb_source) = ChannelSource::create("cmdb push");
//! let (trace_tx, trace_source) = ChannelSource::create("trace push");
//! let (alert_tx, alert_source) = ChannelSource::create("alert push");
//!
//! let mut app = App::new(
//!     Box::new(cmdb_source),
//!     Box::new(trace_source),
//!     Box::new(alert_source),
//!     "web01",
//! );
//! app.refresh().unwrap();
//! assert!(app.view.is_some());
//! ```

pub mod app;
pub mod data;
pub mod settings;
pub mod source;

// Re-export main types for convenience
pub use app::{App, EstateView};
pub use data::{
    alert_timeline, correlate_alerts, reachable, CorrelatedAlert, GraphEdge, GraphModel,
    GraphNode, Status, StatusResolver, TraceTimeline, DEFAULT_CORRELATION_WINDOW,
};
pub use settings::AppConfig;
pub use source::{
    cmdb_from_relations, Alert, ChannelSource, CiRelation, CmdbSnapshot, ConfigItem, FeedSource,
    FileSource, Span,
};
