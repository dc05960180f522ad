//! # LogWriter: tracing event printer
//!
//! A minimal subscriber that renders incoming [`Event`]s with `tracing::info!`.
//! Use it for tests or demos.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO treewatch: [entered] seq=0 id=b
//! INFO treewatch: [produced] seq=1 id=b status=success
//! INFO treewatch: [produced] seq=2 id=a status=running
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Entered => {
                tracing::info!(target: "treewatch", seq = e.seq, id = %e.id, "[entered]");
            }
            EventKind::Produced(status) => {
                tracing::info!(
                    target: "treewatch",
                    seq = e.seq,
                    id = %e.id,
                    status = status.as_label(),
                    "[produced]"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
