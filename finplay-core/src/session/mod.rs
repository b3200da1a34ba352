//! Playback sessions
//!
//! A session spans one play-through: a "started" report, a progress report
//! every [`REPORT_INTERVAL`] while it runs, and a final "stopped" report.
//! [`PlaybackSessionController`] owns at most one session at a time and the
//! background reporter that goes with it.

pub mod controller;
pub mod player_progress;
pub mod reporter;

use std::time::Duration;

pub use controller::{
    PlaybackRequest, PlaybackSessionController, SessionCredentials,
    StoppedSession,
};
pub use player_progress::{PlayerProgress, SessionStatus};

/// How often a running session reports its position.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);
