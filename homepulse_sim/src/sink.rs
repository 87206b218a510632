//! Logging stand-in for the push endpoint.

use async_trait::async_trait;
use homepulse_core::{NotificationSink, NotifyError, OutboundAlert};
use tracing::info;

/// Sink that logs alerts instead of performing network I/O.
///
/// Used for dry runs and deterministic harness executions where a real
/// push delivery would be noise.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, note: &OutboundAlert) -> Result<(), NotifyError> {
        info!(title = %note.title, body = %note.body, "alert (dry run)");
        Ok(())
    }
}
