//! Background progress reporter
//!
//! One task per active session. Each tick snapshots the player and hands the
//! report to a detached task, so a slow server never delays the next tick.
//! At most one report is in flight; a tick that finds the previous report
//! still running is skipped.

use crate::session::player_progress::PlayerProgress;
use finplay_contracts::network::{PlaybackNetwork, PlaybackReport};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, trace};

/// Sends one report, swallowing any error.
pub(crate) async fn send_report(
    network: &dyn PlaybackNetwork,
    report: &PlaybackReport,
) {
    if let Err(err) = network.report_playback_event(report).await {
        debug!(
            kind = %report.kind,
            play_session = %report.play_session_id,
            error = %err,
            "playback report failed"
        );
    }
}

/// Handle to a running reporter. Dropping it cancels the loop.
#[derive(Debug)]
pub(crate) struct ProgressReporter {
    guard: DropGuard,
    task: JoinHandle<()>,
}

impl ProgressReporter {
    pub(crate) fn spawn(
        progress: Arc<PlayerProgress>,
        network: Arc<dyn PlaybackNetwork>,
        period: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run(progress, network, period, cancel.clone()));
        Self {
            guard: cancel.drop_guard(),
            task,
        }
    }

    /// Cancels the loop and waits until it has exited.
    ///
    /// A report already in flight is allowed to finish; nothing is sent after
    /// this returns.
    pub(crate) async fn shutdown(self) {
        let ProgressReporter { guard, task } = self;
        drop(guard);
        if let Err(err) = task.await {
            debug!(error = %err, "progress reporter ended abnormally");
        }
    }
}

async fn run(
    progress: Arc<PlayerProgress>,
    network: Arc<dyn PlaybackNetwork>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: Option<JoinHandle<()>> = None;

    debug!(
        play_session = %progress.play_session_id,
        "progress reporter started"
    );

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        if in_flight.as_ref().is_some_and(|report| !report.is_finished()) {
            trace!(
                play_session = %progress.play_session_id,
                "previous report still in flight, skipping tick"
            );
            continue;
        }

        let report = progress.tick_report();
        let network = Arc::clone(&network);
        in_flight = Some(tokio::spawn(async move {
            send_report(network.as_ref(), &report).await;
        }));
    }

    // Let the last report land before the caller sends "stopped"
    if let Some(report) = in_flight {
        let _ = report.await;
    }

    debug!(
        play_session = %progress.play_session_id,
        "progress reporter stopped"
    );
}
