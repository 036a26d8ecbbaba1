//! Heartbeat service implementation.
//!
//! `HeartbeatService` owns the running flag and the handle of the spawned
//! loop task. The loop checks the flag at the top of each iteration, so
//! clearing it stops the loop at the next iteration boundary; aborting the
//! handle cancels it at the current await point. The fetcher (and its
//! connection pool) is created when the loop spawns and dropped when the
//! task exits, on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::PingConfig;
use crate::error::Result;
use crate::fetch::{Fetcher, Probe};

/// Background service that periodically pings the configured endpoint.
pub struct HeartbeatService {
    config: PingConfig,
    /// Atomic flag indicating whether the loop should keep iterating.
    running: Arc<AtomicBool>,
    /// Handle of the spawned loop task. At most one loop is live at a time.
    handle: Option<JoinHandle<()>>,
}

impl HeartbeatService {
    /// Create a stopped heartbeat service.
    pub fn new(config: PingConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Set the running flag. Idempotent.
    pub fn init(&self) {
        info!("Initializing ping");
        self.running.store(true, Ordering::SeqCst);
    }

    /// Start the heartbeat loop in the background.
    ///
    /// Builds the fetcher from the configuration and spawns the loop task.
    /// Starting an already-running service is a warned no-op; only one loop
    /// handle is ever live.
    pub fn start(&mut self) -> Result<()> {
        if self.handle.as_ref().is_some_and(|h| !h.is_finished()) {
            warn!("Heartbeat already running");
            return Ok(());
        }

        info!("Starting ping");
        let fetcher = Fetcher::new(&self.config)?;
        self.spawn_loop(fetcher);
        Ok(())
    }

    /// Stop the heartbeat loop.
    ///
    /// Clears the running flag and, if the loop task has not already
    /// finished, requests cancellation. Fire-and-forget: does not wait for
    /// the cancellation to take effect. Safe to call when no loop is
    /// running, and safe to call repeatedly.
    pub fn stop(&mut self) {
        info!("Stopping ping");
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = &self.handle {
            if !handle.is_finished() {
                handle.abort();
            }
        }
        info!("Heartbeat stopped");
    }

    /// Stop the loop and wait for the task to unwind.
    ///
    /// Cancellation surfacing as a `JoinError` is the expected clean exit,
    /// not a failure.
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            match handle.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => error!("Heartbeat task failed: {}", e),
            }
        }
    }

    /// Returns whether the running flag is currently set.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the loop task over the given probe and record its handle.
    fn spawn_loop<P: Probe + 'static>(&mut self, probe: P) {
        self.init();
        let running = Arc::clone(&self.running);
        let interval = self.config.interval;
        self.handle = Some(tokio::spawn(run_loop(probe, running, interval)));
    }
}

/// The heartbeat loop: probe, log the result, sleep the interval, re-check
/// the flag. Fetch, log, and sleep are strictly sequential; iterations never
/// overlap.
async fn run_loop<P: Probe>(probe: P, running: Arc<AtomicBool>, interval: Duration) {
    while running.load(Ordering::SeqCst) {
        let status = probe.probe().await;
        info!("Sending ping");
        match status {
            Some(code) => info!("Response: {}", code),
            None => info!("Response: none"),
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::PingStatus;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Probe fake that counts calls and always reports 200.
    struct CountingProbe {
        calls: Arc<AtomicUsize>,
    }

    impl CountingProbe {
        fn new() -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl Probe for CountingProbe {
        async fn probe(&self) -> PingStatus {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(200)
        }
    }

    fn fast_config() -> PingConfig {
        PingConfig {
            interval: Duration::from_millis(10),
            ..PingConfig::default()
        }
    }

    #[test]
    fn test_init_is_idempotent() {
        let service = HeartbeatService::new(fast_config());
        service.init();
        service.init();
        assert!(service.is_running());
    }

    #[tokio::test]
    async fn test_loop_pings_until_stopped() {
        let mut service = HeartbeatService::new(fast_config());
        let (probe, calls) = CountingProbe::new();
        service.spawn_loop(probe);
        assert!(service.is_running());

        tokio::time::sleep(Duration::from_millis(55)).await;
        service.stop();
        assert!(!service.is_running());

        let pinged = calls.load(Ordering::SeqCst);
        assert!(pinged >= 2, "expected several pings, got {}", pinged);

        // No further fetches once stopped.
        tokio::time::sleep(Duration::from_millis(55)).await;
        assert_eq!(calls.load(Ordering::SeqCst), pinged);
    }

    #[tokio::test]
    async fn test_stop_before_first_interval_runs_at_most_one_fetch() {
        let mut service = HeartbeatService::new(PingConfig {
            interval: Duration::from_millis(200),
            ..PingConfig::default()
        });
        let (probe, calls) = CountingProbe::new();
        service.spawn_loop(probe);
        service.stop();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(calls.load(Ordering::SeqCst) <= 1);
        assert!(!service.is_running());
    }

    #[tokio::test]
    async fn test_stop_without_start_is_noop() {
        let mut service = HeartbeatService::new(fast_config());
        service.stop();
        service.stop();
        assert!(!service.is_running());
    }

    #[tokio::test]
    async fn test_second_start_is_a_noop_while_running() {
        let mut service = HeartbeatService::new(fast_config());
        let (probe, calls) = CountingProbe::new();
        service.spawn_loop(probe);

        // The live handle blocks a second spawn; the running loop is untouched.
        assert!(service.start().is_ok());
        assert!(service.is_running());

        tokio::time::sleep(Duration::from_millis(55)).await;
        assert!(calls.load(Ordering::SeqCst) >= 2);
        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_joins_cancelled_task() {
        let mut service = HeartbeatService::new(fast_config());
        let (probe, _calls) = CountingProbe::new();
        service.spawn_loop(probe);

        service.shutdown().await;
        assert!(!service.is_running());
        assert!(service.handle.is_none());

        // Second shutdown is a no-op.
        service.shutdown().await;
    }
}
