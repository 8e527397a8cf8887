//! Per-trace timeline grouping.

use std::collections::HashMap;

use super::time::parse_timestamp;
use crate::source::Span;

/// Spans grouped by trace and ordered for presentation.
///
/// Groups keep the order in which traces first appear in the input, so the
/// display is stable across rebuilds of the same batch. Within a group,
/// spans are sorted ascending by timestamp with a stable sort: ties keep
/// their relative input order and spans without a parseable timestamp sort
/// first. Every input span lands in exactly one group.
///
/// The view is finite and restartable - [`TraceTimeline::iter`] may be
/// called any number of times.
#[derive(Debug, Clone, Default)]
pub struct TraceTimeline {
    traces: Vec<(String, Vec<Span>)>,
}

impl TraceTimeline {
    /// Group a span batch by trace id.
    pub fn group(spans: &[Span]) -> Self {
        let mut order: HashMap<&str, usize> = HashMap::new();
        let mut traces: Vec<(String, Vec<Span>)> = Vec::new();

        for span in spans {
            let idx = *order.entry(span.trace_id.as_str()).or_insert_with(|| {
                traces.push((span.trace_id.clone(), Vec::new()));
                traces.len() - 1
            });
            traces[idx].1.push(span.clone());
        }

        for (_, group) in &mut traces {
            group.sort_by_key(|s| s.timestamp.as_deref().and_then(parse_timestamp));
        }

        Self { traces }
    }

    /// Number of traces.
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Total number of spans across all traces.
    pub fn span_count(&self) -> usize {
        self.traces.iter().map(|(_, spans)| spans.len()).sum()
    }

    /// Iterate over (trace id, ordered spans) entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Span])> {
        self.traces
            .iter()
            .map(|(id, spans)| (id.as_str(), spans.as_slice()))
    }
}
