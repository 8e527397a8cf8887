//! Example: building the estate view from feed files
//!
//! This example demonstrates how to use stackwatch as a library by polling
//! JSON feed files and printing a summary of the rebuilt models whenever a
//! file changes.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example file_feeds -- cmdb.json traces.json alerts.json web01
//! ```

use std::env;
use std::thread;
use std::time::Duration;

use stackwatch::{App, FileSource};

fn main() {
    let mut args = env::args().skip(1);
    let (Some(cmdb), Some(traces), Some(alerts), Some(root)) =
        (args.next(), args.next(), args.next(), args.next())
    else {
        eprintln!("Usage: cargo run --example file_feeds -- <cmdb.json> <traces.json> <alerts.json> <root>");
        eprintln!();
        eprintln!("The CMDB file should map identifiers to records:");
        eprintln!(r#"  {{"web01": {{"depends_on": ["db01"], "rag": "green"}}}}"#);
        std::process::exit(1);
    };

    println!("Watching feeds (root: {})", root);
    println!("Press Ctrl+C to stop\n");

    let mut app = App::new(
        Box::new(FileSource::new(&cmdb)),
        Box::new(FileSource::new(&traces)),
        Box::new(FileSource::new(&alerts)),
        root,
    );

    loop {
        match app.refresh() {
            Ok(true) => {
                let Some(ref view) = app.view else { continue };
                println!(
                    "topology: {} nodes, depth {}",
                    view.topology.len(),
                    view.topology.depth()
                );
                for node in view.topology.nodes() {
                    println!(
                        "  {}{} [{}]",
                        "  ".repeat(node.depth),
                        node.id,
                        node.status.symbol()
                    );
                }
                println!(
                    "services: {} nodes, {} edges; {} traces, {} alerts\n",
                    view.services.len(),
                    view.services.edges().len(),
                    view.timeline.len(),
                    view.alerts.len()
                );
            }
            Ok(false) => {}
            Err(e) => eprintln!("refresh failed: {}", e),
        }

        thread::sleep(Duration::from_millis(500));
    }
}
