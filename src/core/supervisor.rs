//! Outer supervisor
//!
//! Owns the reconnect loop around the stream listener. Every listener exit
//! except a requested shutdown is treated as a failure: the supervisor logs
//! it, sleeps for the configured delay plus jitter, and builds a fresh
//! listener. Jitter keeps a fleet of instances from reconnecting in
//! lockstep after a server-side outage.

use crate::adapters::pushsource::{PushFetcher, PushListener};
use crate::config::{SourceConfig, SupervisorConfig};
use crate::core::cursor::CursorStore;
use crate::core::pipeline::ItemBatchHandler;
use crate::domain::errors::{PushcalError, TransportError};
use crate::domain::Result;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Restart timing policy
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    delay: Duration,
    jitter_fraction: f64,
    max_consecutive_failures: u32,
}

impl RetryPolicy {
    /// Build the policy from supervisor configuration
    pub fn from_config(config: &SupervisorConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.retry_delay_ms),
            jitter_fraction: config.jitter_fraction,
            max_consecutive_failures: config.max_consecutive_failures,
        }
    }

    /// Delay before the next attempt, with jitter applied
    pub fn next_delay(&self) -> Duration {
        if self.jitter_fraction <= 0.0 {
            return self.delay;
        }
        let jitter = rand::thread_rng().gen_range(0.0..=self.jitter_fraction);
        self.delay.mul_f64(1.0 + jitter)
    }

    /// Whether this many consecutive failures exhausts the policy
    ///
    /// A limit of zero never exhausts (retry forever).
    pub fn is_exhausted(&self, consecutive_failures: u32) -> bool {
        self.max_consecutive_failures > 0 && consecutive_failures >= self.max_consecutive_failures
    }
}

/// Supervisor driving the listener restart loop
pub struct Supervisor {
    source: SourceConfig,
    policy: RetryPolicy,
    fetcher: Arc<dyn PushFetcher>,
    handler: Arc<dyn ItemBatchHandler>,
    store: Arc<dyn CursorStore>,
    shutdown: watch::Receiver<bool>,
}

impl Supervisor {
    /// Assemble the supervisor
    pub fn new(
        source: SourceConfig,
        supervisor_config: &SupervisorConfig,
        fetcher: Arc<dyn PushFetcher>,
        handler: Arc<dyn ItemBatchHandler>,
        store: Arc<dyn CursorStore>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            source,
            policy: RetryPolicy::from_config(supervisor_config),
            fetcher,
            handler,
            store,
            shutdown,
        }
    }

    /// Run until shutdown is requested or the retry policy is exhausted
    pub async fn run(&mut self) -> Result<()> {
        let mut consecutive_failures: u32 = 0;

        loop {
            let listener = PushListener::new(
                self.source.clone(),
                self.fetcher.clone(),
                self.handler.clone(),
                self.store.clone(),
            );

            let error = tokio::select! {
                result = listener.connect() => match result {
                    Ok(()) => {
                        tracing::info!("Listener closed cleanly, supervisor exiting");
                        return Ok(());
                    }
                    Err(e) => e,
                },
                _ = self.shutdown.changed() => {
                    listener.close();
                    tracing::info!("Shutdown requested, supervisor exiting");
                    return Ok(());
                }
            };

            // A stream that closed after connecting had a healthy period;
            // only repeated failures to even connect count toward the limit.
            if matches!(
                error,
                PushcalError::Transport(TransportError::StreamClosed(_))
            ) {
                consecutive_failures = 0;
            }
            consecutive_failures += 1;

            if self.policy.is_exhausted(consecutive_failures) {
                tracing::error!(
                    consecutive_failures,
                    error = %error,
                    "Giving up after repeated connection failures"
                );
                return Err(error);
            }

            let delay = self.policy.next_delay();
            tracing::warn!(
                error = %error,
                consecutive_failures,
                delay_ms = delay.as_millis() as u64,
                "Listener failed, reconnecting after delay"
            );

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.shutdown.changed() => {
                    tracing::info!("Shutdown requested during backoff, supervisor exiting");
                    return Ok(());
                }
            }
        }
    }
}
