//! Wire types for the CMDB, trace, and alert feeds.
//!
//! These records match the JSON documents delivered by the upstream feeds.
//! Fields are individually defaulted so a partially-populated record still
//! deserializes; builders then exclude records that are missing something
//! they genuinely need (a span without a service, an alert without a `ci`).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::data::Status;

/// A complete CMDB snapshot, keyed by configuration-item identifier.
pub type CmdbSnapshot = BTreeMap<String, ConfigItem>;

/// One CMDB configuration item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigItem {
    /// Identifiers this item depends on, in declaration order.
    /// Entries may reference items with no record of their own.
    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Last-known RAG health code ("red", "amber", "green"). Absent or
    /// unrecognized codes resolve to an unknown status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag: Option<String>,

    /// Any further CMDB attributes, carried through to graph nodes for
    /// rendering (labels, tooltips).
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl ConfigItem {
    /// The health code, whichever key the feed used.
    ///
    /// Some CMDB exports call the field `rag`, others `health`; the latter
    /// lands in [`ConfigItem::attributes`] and is picked up here.
    pub fn health_code(&self) -> Option<&str> {
        self.rag
            .as_deref()
            .or_else(|| self.attributes.get("health").and_then(|v| v.as_str()))
    }
}

/// One timed operation within a distributed trace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
    /// Unique within its trace. Collectors disagree on whether ids are
    /// strings or numbers, so both are accepted.
    #[serde(deserialize_with = "de_flex_id")]
    pub span_id: String,

    #[serde(deserialize_with = "de_flex_id")]
    pub trace_id: String,

    /// Reference to another span's `span_id` within the same trace.
    #[serde(deserialize_with = "de_flex_opt_id", skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,

    pub service: String,
    pub operation: String,

    /// RFC 3339 timestamp as delivered by the collector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    pub duration_ms: f64,

    /// Outcome of the operation. Unrecognized codes count as ok.
    #[serde(deserialize_with = "de_span_status")]
    pub status: Status,
}

impl Span {
    /// A span must name a service and carry its own id to take part in
    /// graph construction.
    pub fn is_valid(&self) -> bool {
        !self.service.is_empty() && !self.span_id.is_empty()
    }
}

/// One incident/alert record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    /// Identifier of the impacted configuration item.
    pub ci: String,

    /// RFC 3339 timestamp of the alert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    pub message: String,
}

/// A flat parent/child dependency pair, as exported by relationship tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CiRelation {
    pub parent: String,
    pub child: String,
}

/// Fold a flat relation list into a CMDB snapshot.
///
/// Both endpoints get a record; each relation appends one `depends_on`
/// entry to its parent, in input order. Relations with an empty endpoint
/// are skipped.
pub fn cmdb_from_relations(relations: &[CiRelation]) -> CmdbSnapshot {
    let mut cmdb = CmdbSnapshot::new();
    for rel in relations {
        if rel.parent.is_empty() || rel.child.is_empty() {
            continue;
        }
        cmdb.entry(rel.child.clone()).or_default();
        cmdb.entry(rel.parent.clone()).or_default().depends_on.push(rel.child.clone());
    }
    cmdb
}

/// Accept an id delivered as a string or a number.
fn de_flex_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(flex_id(serde_json::Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Accept an optional id delivered as a string, a number, or null.
fn de_flex_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(flex_id(serde_json::Value::deserialize(deserializer)?))
}

fn flex_id(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Map a span status code onto [`Status`] without failing the batch.
fn de_span_status<'de, D>(deserializer: D) -> Result<Status, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw.as_str().map(Status::from_span_code).unwrap_or_default())
}
