//! Connection wait strategy

use std::cmp;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sqlrig_core::{BoxedCause, Connection, Result, RigError};

/// Polls a connection probe until the engine accepts a connection or the
/// timeout budget elapses.
///
/// Probe connections exist only to detect readiness; every one of them is
/// closed before the strategy returns, success or not.
#[derive(Debug, Clone)]
pub struct ConnectionWaitStrategy {
    timeout: Duration,
    poll_interval: Duration,
}

impl ConnectionWaitStrategy {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(500),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the probe until it yields a live connection.
    ///
    /// On timeout, fails with `ReadinessTimeout` carrying the most recent
    /// probe failure as its cause.
    pub async fn wait_until_ready<F, Fut>(&self, probe: F) -> Result<()>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Arc<dyn Connection>>>,
    {
        let deadline = tokio::time::Instant::now() + self.timeout;
        let mut last_cause: Option<RigError> = None;
        let mut attempts: u32 = 0;

        while tokio::time::Instant::now() < deadline {
            attempts += 1;
            match tokio::time::timeout_at(deadline, probe()).await {
                Ok(Ok(connection)) => {
                    if let Err(error) = connection.close().await {
                        tracing::debug!(error = %error, "failed to close probe connection");
                    }
                    tracing::debug!(attempts, "engine accepted a connection");
                    return Ok(());
                }
                Ok(Err(error)) => {
                    tracing::trace!(attempts, error = %error, "probe attempt failed");
                    last_cause = Some(error);
                }
                // Deadline hit while a probe was in flight.
                Err(_) => break,
            }
            let next = cmp::min(tokio::time::Instant::now() + self.poll_interval, deadline);
            tokio::time::sleep_until(next).await;
        }

        Err(RigError::ReadinessTimeout {
            budget: self.timeout,
            cause: last_cause.map(|error| Box::new(error) as BoxedCause),
        })
    }
}

impl Default for ConnectionWaitStrategy {
    /// Default budget: 60 seconds, polling every 500ms.
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}
