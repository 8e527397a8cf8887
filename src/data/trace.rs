//! Service call-graph construction from trace spans.

use std::collections::HashMap;

use super::graph::{GraphModel, GraphNode};
use super::status::{Status, StatusResolver};
use crate::source::{CmdbSnapshot, Span};

impl GraphModel {
    /// Build the service-level call graph for a span batch.
    ///
    /// One node per distinct service, one edge per distinct
    /// (parent service, child service) pair implied by span parentage.
    /// Parent references resolve through a single-pass index keyed by
    /// (trace id, span id) - span ids are only unique within their trace,
    /// so a reference never resolves across traces. A dangling reference
    /// loses its edge and nothing else; repeated calls between the same two
    /// services collapse into one edge; a span whose parent maps to the
    /// same service produces no edge at all. Spans without a service or
    /// span id are excluded.
    ///
    /// Node status, highest precedence first: an impacted service is
    /// `Error`; a service with a CMDB record maps its health code;
    /// otherwise the worst status observed on the service's own spans,
    /// computed here rather than per access.
    pub fn service_graph(
        spans: &[Span],
        cmdb: Option<&CmdbSnapshot>,
        resolver: &StatusResolver,
    ) -> Self {
        let valid: Vec<&Span> = spans.iter().filter(|s| s.is_valid()).collect();

        // One pass: span index for parent resolution plus the worst status
        // seen per service. First record wins on duplicate ids.
        let mut by_id: HashMap<(&str, &str), &Span> = HashMap::new();
        let mut worst: HashMap<&str, Status> = HashMap::new();
        let mut services: Vec<&str> = Vec::new();
        for &span in &valid {
            by_id
                .entry((span.trace_id.as_str(), span.span_id.as_str()))
                .or_insert(span);
            let seen = worst.entry(span.service.as_str()).or_insert_with(|| {
                services.push(span.service.as_str());
                Status::Ok
            });
            *seen = (*seen).max(span.status);
        }

        let mut graph = GraphModel::new();
        for service in services {
            let record = cmdb.and_then(|c| c.get(service));
            let status = if record.is_none() && !resolver.is_impacted(service) {
                worst[service]
            } else {
                resolver.resolve(service, record)
            };
            graph.add_node(GraphNode {
                id: service.to_string(),
                status,
                depth: 0,
                attributes: record.map(|r| r.attributes.clone()).unwrap_or_default(),
            });
        }

        for &span in &valid {
            let Some(parent_id) = span.parent_span_id.as_deref() else {
                continue;
            };
            let Some(parent) = by_id.get(&(span.trace_id.as_str(), parent_id)) else {
                continue;
            };
            if parent.service != span.service {
                graph.add_edge(&parent.service, &span.service);
            }
        }

        graph
    }
}
