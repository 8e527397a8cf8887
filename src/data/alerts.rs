//! Alert ordering and alert/span correlation.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::time::parse_timestamp;
use crate::source::{Alert, Span};

/// Window within which a span counts as concurrent with an alert.
pub const DEFAULT_CORRELATION_WINDOW: Duration = Duration::from_secs(300);

/// Alerts sorted ascending by timestamp.
///
/// The sort is stable: alerts with equal timestamps keep their input
/// order, and alerts without a parseable timestamp sort first.
pub fn alert_timeline(alerts: &[Alert]) -> Vec<Alert> {
    let mut sorted = alerts.to_vec();
    sorted.sort_by_key(|a| a.timestamp.as_deref().and_then(parse_timestamp));
    sorted
}

/// An alert together with the spans observed around it on the impacted
/// item.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelatedAlert {
    pub alert: Alert,
    /// Spans on the alert's `ci` whose timestamp lies within the
    /// correlation window.
    pub spans: Vec<Span>,
}

/// Attach to each alert the spans whose service matches the alert's `ci`
/// and whose timestamp lies within `window` of the alert's.
///
/// Every alert appears in the output, matched or not. Alerts or spans
/// without a parseable timestamp never match.
pub fn correlate_alerts(
    alerts: &[Alert],
    spans: &[Span],
    window: Duration,
) -> Vec<CorrelatedAlert> {
    let window = chrono::Duration::from_std(window).unwrap_or(chrono::Duration::MAX);

    let stamped: Vec<(&Span, DateTime<Utc>)> = spans
        .iter()
        .filter(|s| s.is_valid())
        .filter_map(|s| {
            s.timestamp
                .as_deref()
                .and_then(parse_timestamp)
                .map(|t| (s, t))
        })
        .collect();

    alerts
        .iter()
        .map(|alert| {
            let matched = match alert.timestamp.as_deref().and_then(parse_timestamp) {
                Some(alert_time) => stamped
                    .iter()
                    .filter(|(s, t)| s.service == alert.ci && (*t - alert_time).abs() < window)
                    .map(|(s, _)| (*s).clone())
                    .collect(),
                None => Vec::new(),
            };
            CorrelatedAlert {
                alert: alert.clone(),
                spans: matched,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(ci: &str, timestamp: Option<&str>) -> Alert {
        Alert {
            ci: ci.to_string(),
            timestamp: timestamp.map(|t| t.to_string()),
            message: format!("{} degraded", ci),
        }
    }

    fn span(service: &str, timestamp: &str) -> Span {
        Span {
            span_id: "s1".to_string(),
            trace_id: "t1".to_string(),
            service: service.to_string(),
            timestamp: Some(timestamp.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_alert_timeline_sorted() {
        let alerts = vec![
            alert("db01", Some("2024-05-01T10:05:00Z")),
            alert("web01", Some("2024-05-01T10:00:00Z")),
            alert("app01", Some("2024-05-01T10:02:00Z")),
        ];
        let timeline = alert_timeline(&alerts);

        let cis: Vec<&str> = timeline.iter().map(|a| a.ci.as_str()).collect();
        assert_eq!(cis, vec!["web01", "app01", "db01"]);
        assert_eq!(timeline.len(), alerts.len());
    }

    #[test]
    fn test_alert_timeline_stable_on_ties() {
        let alerts = vec![
            alert("first", Some("2024-05-01T10:00:00Z")),
            alert("second", Some("2024-05-01T10:00:00Z")),
            alert("unstamped", None),
        ];
        let timeline = alert_timeline(&alerts);

        let cis: Vec<&str> = timeline.iter().map(|a| a.ci.as_str()).collect();
        assert_eq!(cis, vec!["unstamped", "first", "second"]);
    }

    #[test]
    fn test_correlation_matches_service_within_window() {
        let alerts = vec![alert("db01", Some("2024-05-01T10:00:00Z"))];
        let spans = vec![
            span("db01", "2024-05-01T10:02:00Z"),
            span("db01", "2024-05-01T09:58:30Z"),
            span("web01", "2024-05-01T10:00:00Z"),
        ];

        let correlated = correlate_alerts(&alerts, &spans, DEFAULT_CORRELATION_WINDOW);
        assert_eq!(correlated.len(), 1);
        assert_eq!(correlated[0].spans.len(), 2);
        assert!(correlated[0].spans.iter().all(|s| s.service == "db01"));
    }

    #[test]
    fn test_correlation_window_is_exclusive() {
        let alerts = vec![alert("db01", Some("2024-05-01T10:00:00Z"))];
        let spans = vec![
            // Exactly on the window boundary: not a match
            span("db01", "2024-05-01T10:05:00Z"),
            // Just inside
            span("db01", "2024-05-01T10:04:59Z"),
        ];

        let correlated = correlate_alerts(&alerts, &spans, DEFAULT_CORRELATION_WINDOW);
        assert_eq!(correlated[0].spans.len(), 1);
        assert_eq!(
            correlated[0].spans[0].timestamp.as_deref(),
            Some("2024-05-01T10:04:59Z")
        );
    }

    #[test]
    fn test_unmatched_alert_still_present() {
        let alerts = vec![
            alert("db01", Some("2024-05-01T10:00:00Z")),
            alert("lost", None),
        ];
        let correlated = correlate_alerts(&alerts, &[], DEFAULT_CORRELATION_WINDOW);

        assert_eq!(correlated.len(), 2);
        assert!(correlated.iter().all(|c| c.spans.is_empty()));
    }

    #[test]
    fn test_unstamped_spans_never_match() {
        let alerts = vec![alert("db01", Some("2024-05-01T10:00:00Z"))];
        let spans = vec![Span {
            span_id: "s1".to_string(),
            trace_id: "t1".to_string(),
            service: "db01".to_string(),
            timestamp: None,
            ..Default::default()
        }];

        let correlated = correlate_alerts(&alerts, &spans, DEFAULT_CORRELATION_WINDOW);
        assert!(correlated[0].spans.is_empty());
    }
}
