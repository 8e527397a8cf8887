use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing::info;

use stackwatch::{App, AppConfig, EstateView, FileSource, GraphModel};

#[derive(Parser, Debug)]
#[command(name = "stackwatch")]
#[command(about = "Dependency topology and trace graph diagnostics for IT estate monitoring")]
struct Args {
    /// Path to a config file (format inferred from the extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the CMDB snapshot file
    #[arg(long)]
    cmdb: Option<PathBuf>,

    /// Path to the trace span file
    #[arg(long)]
    traces: Option<PathBuf>,

    /// Path to the alert feed file
    #[arg(long)]
    alerts: Option<PathBuf>,

    /// Root identifier for the dependency topology
    #[arg(short, long)]
    root: Option<String>,

    /// Write the built models to this file instead of stdout
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Keep polling the feed files and re-export on every change
    #[arg(short, long)]
    watch: bool,

    /// Refresh interval in seconds (used with --watch)
    #[arg(long)]
    refresh: Option<u64>,

    /// Alert/span correlation window in seconds
    #[arg(long)]
    correlation_window: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut settings = AppConfig::load(args.config.as_deref())?;

    // CLI flags take precedence over file and environment settings
    if let Some(path) = args.cmdb {
        settings.cmdb_file = path.display().to_string();
    }
    if let Some(path) = args.traces {
        settings.trace_file = path.display().to_string();
    }
    if let Some(path) = args.alerts {
        settings.alert_file = path.display().to_string();
    }
    if let Some(root) = args.root {
        settings.root = root;
    }
    if let Some(secs) = args.refresh {
        settings.refresh_secs = secs;
    }
    if let Some(secs) = args.correlation_window {
        settings.correlation_window_secs = secs;
    }

    let app = App::new(
        Box::new(FileSource::new(&settings.cmdb_file)),
        Box::new(FileSource::new(&settings.trace_file)),
        Box::new(FileSource::new(&settings.alert_file)),
        settings.root.clone(),
    )
    .with_correlation_window(Duration::from_secs(settings.correlation_window_secs));

    if args.watch {
        run_watch(
            app,
            Duration::from_secs(settings.refresh_secs),
            args.export.as_deref(),
        )
    } else {
        run_once(app, args.export.as_deref())
    }
}

/// Build the models once and export them.
fn run_once(mut app: App, export: Option<&Path>) -> Result<()> {
    app.refresh()?;

    let Some(ref view) = app.view else {
        anyhow::bail!("No view built");
    };
    write_export(view, app.root(), export)
}

/// Poll the feed files and re-export whenever any of them changes.
fn run_watch(mut app: App, refresh: Duration, export: Option<&Path>) -> Result<()> {
    info!(interval_secs = refresh.as_secs(), "watching feed files");

    loop {
        if app.refresh()? {
            if let Some(ref view) = app.view {
                write_export(view, app.root(), export)?;
                info!(
                    topology_nodes = view.topology.len(),
                    services = view.services.len(),
                    traces = view.timeline.len(),
                    "estate view rebuilt"
                );
            }
        }
        thread::sleep(refresh);
    }
}

/// Serialize the full view as JSON for the rendering consumer.
fn write_export(view: &EstateView, root: &str, path: Option<&Path>) -> Result<()> {
    let mut export = serde_json::Map::new();

    // Summary
    let mut summary = serde_json::Map::new();
    summary.insert("root".to_string(), json!(root));
    summary.insert("topology_nodes".to_string(), json!(view.topology.len()));
    summary.insert("topology_depth".to_string(), json!(view.topology.depth()));
    summary.insert("services".to_string(), json!(view.services.len()));
    summary.insert("traces".to_string(), json!(view.timeline.len()));
    summary.insert("alerts".to_string(), json!(view.alerts.len()));
    summary.insert(
        "topology_status".to_string(),
        json!(view.topology.status_counts()),
    );
    summary.insert(
        "service_status".to_string(),
        json!(view.services.status_counts()),
    );
    export.insert("summary".to_string(), serde_json::Value::Object(summary));

    // Graphs
    export.insert("topology".to_string(), graph_json(&view.topology));
    export.insert("services".to_string(), graph_json(&view.services));

    // Timeline: one labeled section per trace
    let timeline: Vec<serde_json::Value> = view
        .timeline
        .iter()
        .map(|(trace_id, spans)| json!({ "trace_id": trace_id, "spans": spans }))
        .collect();
    export.insert("timeline".to_string(), json!(timeline));

    export.insert("alerts".to_string(), json!(view.alerts));
    export.insert("correlated_alerts".to_string(), json!(view.correlated));

    let payload = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
    match path {
        Some(path) => {
            fs::write(path, payload)?;
            info!(path = %path.display(), "export written");
        }
        None => println!("{}", payload),
    }
    Ok(())
}

fn graph_json(graph: &GraphModel) -> serde_json::Value {
    json!({
        "depth": graph.depth(),
        "nodes": graph.nodes(),
        "edges": graph.edges(),
    })
}
