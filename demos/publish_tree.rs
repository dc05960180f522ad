//! # Demo: publish_tree
//!
//! Builds a small behavior tree, streams it to a collector and drives it a few
//! times so the viewer shows steps live.
//!
//! Shows how to:
//! - Wrap a root in [`TreeWatch`] and inspect its structure.
//! - Attach the built-in [`LogWriter`] next to a [`TelemetryConnection`].
//! - Drive the hooked tree with cancellation.
//!
//! ## Flow
//! ```text
//! TreeWatch::new(root)
//!     ├─► structure()                    (printed as JSON)
//!     ├─► subscribe(LogWriter)
//!     ├─► connect(TelemetryConnection)   ─► introduce(room, structure)
//!     └─► run(ctx) × N                   ─► step(id[, value]) per event
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example publish_tree --features logging -- localhost 3000
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use treewatch::behaviors::{
    Blackboard, check_bb, fail_after, log, repeat_until_fail, repeat_until_succeed, selector,
    sequence, set_bb, succeed,
};
use treewatch::{ConnectionConfig, Detail, LogWriter, Scalar, TelemetryConnection, TreeWatch};

fn build_tree(board: &Blackboard) -> treewatch::NodeRef {
    selector([
        sequence([
            log("checking the door"),
            check_bb(board, "door", |v| matches!(v, Some(Scalar::Str(s)) if s == "open")),
            log("walking through"),
        ]),
        sequence([
            repeat_until_fail(fail_after(3)),
            set_bb(board, "door", "open"),
            log("door opened"),
        ]),
        repeat_until_succeed(succeed()),
    ])
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "localhost".to_string());
    let port = args.next().and_then(|p| p.parse().ok()).unwrap_or(3000);

    let board = Blackboard::new();
    let watch = TreeWatch::new(build_tree(&board));
    println!("{:#}", watch.structure().to_json(Detail::Full));

    watch.subscribe(Arc::new(LogWriter::new()));
    let cfg = ConnectionConfig::new(host, port);
    let conn = watch.connect(TelemetryConnection::socketio(cfg)).await?;
    println!("room: {}", conn.room());

    let ctx = CancellationToken::new();
    for round in 1..=3 {
        let signals = watch.run(&ctx).await;
        println!("[round {round}] {} signals", signals.len());
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    conn.close().await;
    Ok(())
}
