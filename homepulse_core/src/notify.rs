//! Best-effort push-notification egress.
//!
//! Delivery is fire-and-forget: any failure is logged and swallowed, never
//! propagated to the tick that produced the alert.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Configuration for the push endpoint.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Base URL of the ntfy-compatible push service
    pub endpoint: String,

    /// Topic (channel) the mobile client subscribes to
    pub topic: String,

    /// Per-request delivery timeout
    pub timeout: Duration,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://ntfy.sh".to_string(),
            topic: "homepulse-alerts".to_string(),
            timeout: Duration::from_secs(2),
        }
    }
}

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Network failure, timeout, or client construction error
    #[error("push request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("push endpoint returned status {0}")]
    Status(u16),
}

/// A notification that survived cooldown throttling and is ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundAlert {
    /// Notification title (the alert kind)
    pub title: String,

    /// Message body (UTF-8 alert text)
    pub body: String,
}

/// Abstraction over the push transport.
///
/// # Implementations
///
/// - **Production**: [`NtfySink`] - HTTP POST with a bounded timeout
/// - **Tests / dry runs**: recording or logging sinks
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    /// Attempts to deliver one notification.
    ///
    /// Success does not guarantee the subscriber saw it; failure means the
    /// attempt is abandoned (no retry).
    async fn deliver(&self, note: &OutboundAlert) -> Result<(), NotifyError>;
}

/// Production sink: ntfy-style HTTP push.
pub struct NtfySink {
    client: reqwest::Client,
    config: NotifyConfig,
}

impl NtfySink {
    /// Builds a sink with a client bound to the configured timeout.
    pub fn new(config: NotifyConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl NotificationSink for NtfySink {
    async fn deliver(&self, note: &OutboundAlert) -> Result<(), NotifyError> {
        let url = format!(
            "{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.topic
        );

        let response = self
            .client
            .post(&url)
            .header("Title", &note.title)
            .header("Priority", "high")
            .header("Tags", "warning,sensor")
            .body(note.body.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// Dispatches throttled notifications through a sink, swallowing failures.
pub struct NotificationGateway {
    sink: Arc<dyn NotificationSink>,
}

impl NotificationGateway {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Delivers a batch of outbound alerts sequentially.
    ///
    /// Callers must not hold the engine state lock across this call; the
    /// network attempt runs outside the tick's critical section.
    pub async fn dispatch_all(&self, batch: &[OutboundAlert]) {
        for note in batch {
            match self.sink.deliver(note).await {
                Ok(()) => debug!(title = %note.title, "notification sent"),
                Err(error) => {
                    warn!(title = %note.title, %error, "notification delivery failed");
                }
            }
        }
    }
}
