//! Status classification and resolution.
//!
//! This module owns the ranked status value attached to every graph node
//! and the single precedence rule that merges incident impact with
//! CMDB-reported health.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::source::{Alert, ConfigItem};

/// Resolved status for a node or service.
///
/// Variants are ordered from least to most severe, so `max` picks the
/// worst when aggregating.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Ok,
    Unknown,
    Warning,
    Error,
}

impl Status {
    /// Map a CMDB health code (RAG value) to a status.
    ///
    /// Case-insensitive; missing or unrecognized codes are `Unknown`.
    pub fn from_health_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
            Some("red") => Status::Error,
            Some("amber") | Some("yellow") => Status::Warning,
            Some("green") => Status::Ok,
            _ => Status::Unknown,
        }
    }

    /// Map a span status code to a status.
    ///
    /// Case-insensitive; unrecognized codes count as `Ok`, the span
    /// default.
    pub fn from_span_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "error" => Status::Error,
            "warning" => Status::Warning,
            "unknown" => Status::Unknown,
            _ => Status::Ok,
        }
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Unknown => "UNK",
            Status::Warning => "WARN",
            Status::Error => "ERR",
        }
    }
}

/// Resolves the status of a node from incident impact and CMDB health.
///
/// Resolution precedence, highest first:
///
/// 1. The identifier is in the impacted set (an active alert names it as
///    its `ci`) - the status is `Error`; current incidents override
///    last-known health.
/// 2. A CMDB record exists - its health code is mapped via
///    [`Status::from_health_code`].
/// 3. Otherwise - `Unknown`.
///
/// Resolution is a pure function of the resolver and its arguments:
/// identical inputs always yield identical output.
#[derive(Debug, Clone, Default)]
pub struct StatusResolver {
    impacted: HashSet<String>,
}

impl StatusResolver {
    /// Create a resolver with an empty impacted set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the impacted set from the current alert feed.
    ///
    /// Every alert's `ci` joins the set; alerts without a `ci` are ignored.
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let impacted = alerts
            .iter()
            .filter(|a| !a.ci.is_empty())
            .map(|a| a.ci.clone())
            .collect();
        Self { impacted }
    }

    /// Whether the identifier currently has an active alert against it.
    pub fn is_impacted(&self, id: &str) -> bool {
        self.impacted.contains(id)
    }

    /// Number of impacted identifiers.
    pub fn impacted_count(&self) -> usize {
        self.impacted.len()
    }

    /// Resolve one status for `id` given its optional CMDB record.
    pub fn resolve(&self, id: &str, record: Option<&ConfigItem>) -> Status {
        if self.is_impacted(id) {
            return Status::Error;
        }
        match record {
            Some(item) => Status::from_health_code(item.health_code()),
            None => Status::Unknown,
        }
    }
}
