//! Example: feeding stackwatch via channels
//!
//! This example demonstrates how to embed stackwatch in your own
//! application by pushing snapshots through channels instead of polling
//! files.
//!
//! This is useful when you want to:
//! - Push data from ingest endpoints (HTTP handlers, message queues)
//! - Generate synthetic data for testing
//! - Bridge from any async data source
//!
//! # Usage
//!
//! ```bash
//! cargo run --example channel_feed
//! ```

use std::thread;
use std::time::Duration;

use stackwatch::{Alert, App, ChannelSource, CmdbSnapshot, ConfigItem, Span};

fn main() {
    println!("Channel feed example");
    println!("Generating synthetic estate data...\n");

    let (cmdb_tx, cmdb_source) = ChannelSource::<CmdbSnapshot>::create("synthetic cmdb");
    let (trace_tx, trace_source) = ChannelSource::<Vec<Span>>::create("synthetic traces");
    let (alert_tx, alert_source) = ChannelSource::<Vec<Alert>>::create("synthetic alerts");

    // Spawn a thread that plays the role of the upstream feeds
    thread::spawn(move || {
        let mut cmdb = CmdbSnapshot::new();
        cmdb.insert(
            "web01".to_string(),
            ConfigItem {
                depends_on: vec!["app01".to_string()],
                rag: Some("green".to_string()),
                ..Default::default()
            },
        );
        cmdb.insert(
            "app01".to_string(),
            ConfigItem {
                depends_on: vec!["db01".to_string()],
                rag: Some("green".to_string()),
                ..Default::default()
            },
        );
        cmdb.insert(
            "db01".to_string(),
            ConfigItem {
                rag: Some("amber".to_string()),
                ..Default::default()
            },
        );
        let _ = cmdb_tx.send(cmdb);

        let _ = trace_tx.send(vec![
            Span {
                span_id: "1".to_string(),
                trace_id: "t1".to_string(),
                service: "web01".to_string(),
                operation: "GET /checkout".to_string(),
                timestamp: Some("2024-05-01T10:00:00Z".to_string()),
                duration_ms: 120.0,
                ..Default::default()
            },
            Span {
                span_id: "2".to_string(),
                trace_id: "t1".to_string(),
                parent_span_id: Some("1".to_string()),
                service: "app01".to_string(),
                operation: "validate".to_string(),
                timestamp: Some("2024-05-01T10:00:00.020Z".to_string()),
                duration_ms: 80.0,
                ..Default::default()
            },
        ]);

        // After a while, an incident comes in against the database
        thread::sleep(Duration::from_secs(2));
        let _ = alert_tx.send(vec![Alert {
            ci: "db01".to_string(),
            timestamp: Some("2024-05-01T10:00:30Z".to_string()),
            message: "connection pool exhausted".to_string(),
        }]);
    });

    let mut app = App::new(
        Box::new(cmdb_source),
        Box::new(trace_source),
        Box::new(alert_source),
        "web01",
    );

    for _ in 0..10 {
        if let Ok(true) = app.refresh() {
            if let Some(ref view) = app.view {
                println!("--- view rebuilt ---");
                for node in view.topology.nodes() {
                    println!("  {} [{}]", node.id, node.status.symbol());
                }
            }
        }
        thread::sleep(Duration::from_millis(500));
    }
}
