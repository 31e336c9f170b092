use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use super::scanner::{CycleReport, Scanner};

/// Work the scheduler drives once per tick. Split out as a trait so tests
/// can script cycle outcomes without a live scanner.
#[async_trait]
pub trait ScanDriver: Send {
    async fn run_cycle(&mut self) -> Result<CycleReport>;
}

#[async_trait]
impl ScanDriver for Scanner {
    async fn run_cycle(&mut self) -> Result<CycleReport> {
        Scanner::run_cycle(self).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Scanning,
}

/// Drives scan cycles at a fixed interval until told to stop.
///
/// Two states: Idle (waiting for the next tick, watching for shutdown) and
/// Scanning (one cycle in flight). Cycles never overlap; a tick that lands
/// mid-cycle is skipped rather than queued. This is the single error
/// boundary: a cycle error is caught, logged, and followed by a longer
/// back-off before the loop resumes. Only the shutdown signal ends the loop.
pub struct Scheduler<S: ScanDriver> {
    driver: S,
    poll_interval: Duration,
    error_backoff: Duration,
    shutdown: watch::Receiver<bool>,
}

impl<S: ScanDriver> Scheduler<S> {
    pub fn new(
        driver: S,
        poll_interval: Duration,
        error_backoff: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Scheduler {
            driver,
            poll_interval,
            error_backoff,
            shutdown,
        }
    }

    /// Run until the shutdown signal flips. The first cycle starts
    /// immediately; subsequent cycles follow the poll interval.
    pub async fn run(mut self) {
        info!(
            "Scheduler started (interval={:?}, error backoff={:?})",
            self.poll_interval, self.error_backoff
        );

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut state = State::Idle;
        let mut scan_count: u64 = 0;

        loop {
            match state {
                State::Idle => {
                    // Shutdown is observed at the top of Idle so a stop
                    // never interrupts a cycle in flight.
                    if *self.shutdown.borrow() {
                        info!("Shutdown signal received, stopping");
                        return;
                    }
                    tokio::select! {
                        result = self.shutdown.changed() => {
                            // A closed channel means no stop signal can ever
                            // arrive; treat it as one.
                            if result.is_err() {
                                info!("Shutdown channel closed, stopping");
                                return;
                            }
                        }
                        _ = interval.tick() => {
                            state = State::Scanning;
                        }
                    }
                }
                State::Scanning => {
                    scan_count += 1;
                    self.scan(scan_count).await;
                    state = State::Idle;
                    debug!("Next scan in {:?}", self.poll_interval);
                }
            }
        }
    }

    /// One Scanning episode, including the error boundary.
    async fn scan(&mut self, scan_count: u64) {
        info!("[Scan #{}] Starting...", scan_count);
        match self.driver.run_cycle().await {
            Ok(report) => {
                if report.alerts > 0 {
                    info!("Scan complete: {} alert(s) sent", report.alerts);
                } else {
                    info!(
                        "Scan complete: {} candidate(s) analyzed, no alerts",
                        report.candidates
                    );
                }
            }
            Err(e) => {
                error!("Scan cycle failed: {:#}", e);
                info!("Backing off for {:?}", self.error_backoff);
                tokio::time::sleep(self.error_backoff).await;
            }
        }
    }
}
