//! The pure core: graph construction and status aggregation.
//!
//! This module turns flat, possibly inconsistent feed records into
//! well-formed graph models with a single resolved status per node. All of
//! it is synchronous, allocation-only computation over immutable input
//! snapshots: no I/O, no shared state, nothing fatal. Missing references
//! degrade to default statuses or dropped edges; malformed records are
//! excluded; empty feeds produce empty graphs.
//!
//! ## Submodules
//!
//! - [`status`]: the ranked [`Status`] value and the [`StatusResolver`]
//!   precedence rule (incident impact over CMDB health)
//! - [`graph`]: the shared [`GraphModel`] node/edge structures
//! - [`topology`]: dependency-tree construction from CMDB adjacency
//! - [`trace`]: service call-graph construction from span parentage
//! - [`timeline`]: per-trace span grouping and ordering
//! - [`alerts`]: alert ordering and alert/span correlation
//! - [`time`]: lenient RFC 3339 timestamp parsing
//!
//! ## Data flow
//!
//! ```text
//! alerts ──▶ StatusResolver ─┐
//!                            ├─▶ GraphModel::dependency_topology
//! cmdb  ─────────────────────┤
//!                            ├─▶ GraphModel::service_graph
//! spans ─────────────────────┤
//!                            └─▶ TraceTimeline::group
//! ```

pub mod alerts;
pub mod graph;
pub mod status;
pub mod time;
pub mod timeline;
pub mod topology;
pub mod trace;

pub use alerts::{alert_timeline, correlate_alerts, CorrelatedAlert, DEFAULT_CORRELATION_WINDOW};
pub use graph::{GraphEdge, GraphModel, GraphNode};
pub use status::{Status, StatusResolver};
pub use timeline::TraceTimeline;
pub use topology::reachable;
