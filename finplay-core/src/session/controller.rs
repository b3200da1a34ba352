use crate::error::{PlaybackError, Result};
use crate::selection::{TrackSelection, validate_selection};
use crate::session::REPORT_INTERVAL;
use crate::session::player_progress::{PlayerProgress, SessionStatus};
use crate::session::reporter::{ProgressReporter, send_report};
use finplay_contracts::network::{
    PlaybackEventKind, PlaybackNetwork, StreamRequest,
};
use finplay_contracts::player::{MediaPlayer, PlayerFactory};
use finplay_model::{
    Bitrate, ItemId, MediaSource, MediaSourceId, PlaySessionId, UserSessionId,
    ticks_to_seconds,
};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Credentials every request and report of this user carries.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub access_token: String,
    pub user_session_id: UserSessionId,
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("user_session_id", &self.user_session_id)
            .field("has_token", &!self.access_token.is_empty())
            .finish()
    }
}

/// Everything needed to start a session. Track ids are already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackRequest {
    pub item_id: ItemId,
    pub media_source: MediaSource,
    pub selection: TrackSelection,
    pub bitrate: Bitrate,
    /// Where the player seeks to before playing; 0 plays from the start
    pub start_position_ticks: i64,
}

/// Final state of a session, returned by [`PlaybackSessionController::stop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoppedSession {
    pub item_id: ItemId,
    pub media_source_id: MediaSourceId,
    pub play_session_id: PlaySessionId,
    pub position_ticks: i64,
    pub duration_ticks: Option<i64>,
}

#[derive(Debug)]
struct ActiveSession {
    progress: Arc<PlayerProgress>,
    reporter: ProgressReporter,
    started_report: JoinHandle<()>,
}

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    Idle,
    Active(ActiveSession),
}

/// Owns the single active playback session and its reporter.
///
/// `start` while a session is active stops that session first, so there is
/// never more than one reporter and the server always sees "stopped" for the
/// old session before "started" for the new one.
///
/// Call [`stop`](Self::stop) before dropping. A controller dropped while
/// active releases the player at once and sends "stopped" from a detached
/// task on the current runtime.
pub struct PlaybackSessionController {
    network: Arc<dyn PlaybackNetwork>,
    players: Arc<dyn PlayerFactory>,
    credentials: SessionCredentials,
    state: Mutex<SessionState>,
    status: watch::Sender<SessionStatus>,
}

impl fmt::Debug for PlaybackSessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self
            .state
            .try_lock()
            .map(|state| matches!(*state, SessionState::Active(_)))
            .ok();
        f.debug_struct("PlaybackSessionController")
            .field("network", &self.network)
            .field("players", &self.players)
            .field("credentials", &self.credentials)
            .field("active", &active)
            .finish()
    }
}

impl PlaybackSessionController {
    pub fn new(
        network: Arc<dyn PlaybackNetwork>,
        players: Arc<dyn PlayerFactory>,
        credentials: SessionCredentials,
    ) -> Self {
        let (status, _) = watch::channel(SessionStatus::Idle);
        Self {
            network,
            players,
            credentials,
            state: Mutex::new(SessionState::Idle),
            status,
        }
    }

    pub fn network(&self) -> &Arc<dyn PlaybackNetwork> {
        &self.network
    }

    /// Observe session starts and stops.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    /// The active session's progress record, if any.
    pub async fn current(&self) -> Option<Arc<PlayerProgress>> {
        match &*self.state.lock().await {
            SessionState::Idle => None,
            SessionState::Active(active) => Some(Arc::clone(&active.progress)),
        }
    }

    pub async fn is_active(&self) -> bool {
        matches!(*self.state.lock().await, SessionState::Active(_))
    }

    /// Starts a session and returns the player to present.
    ///
    /// Fails with [`PlaybackError::Unplayable`] (or `UnknownTrack`) when no
    /// stream can be built; the controller is idle afterwards.
    pub async fn start(
        &self,
        request: PlaybackRequest,
    ) -> Result<Arc<dyn MediaPlayer>> {
        let mut state = self.state.lock().await;

        if let SessionState::Active(previous) = std::mem::take(&mut *state) {
            warn!(
                play_session = %previous.progress.play_session_id,
                "start requested while a session is active, stopping it first"
            );
            self.finish(previous).await;
            self.status.send_replace(SessionStatus::Idle);
        }

        validate_selection(&request.media_source, &request.selection)?;

        let play_session_id = PlaySessionId::new();
        let stream_request = StreamRequest {
            access_token: self.credentials.access_token.clone(),
            item_id: request.item_id.clone(),
            media_source_id: request.media_source.id.clone(),
            video_track_id: request.selection.video,
            audio_track_id: request.selection.audio,
            subtitle_track_id: request.selection.subtitle,
            bitrate_cap_bits: request.bitrate.cap_bits(),
            play_session_id,
        };

        let Some(handle) = self.network.build_playback_request(&stream_request)
        else {
            warn!(
                item = %request.item_id,
                media_source = %request.media_source.id,
                "network could not build a stream for the request"
            );
            return Err(PlaybackError::Unplayable {
                media_source_id: request.media_source.id,
                reason: "no stream could be built for the selected tracks"
                    .to_string(),
            });
        };

        let player = self.players.open(&handle);
        if request.start_position_ticks > 0 {
            player.seek(ticks_to_seconds(request.start_position_ticks));
        }
        player.play();

        let progress = Arc::new(PlayerProgress {
            item_id: request.item_id,
            media_source: request.media_source,
            selection: request.selection,
            bitrate: request.bitrate,
            play_session_id,
            credentials: self.credentials.clone(),
            player: Arc::clone(&player),
        });

        let started = progress.report_at(
            PlaybackEventKind::Started,
            request.start_position_ticks.max(0),
        );
        let network = Arc::clone(&self.network);
        let started_report = tokio::spawn(async move {
            send_report(network.as_ref(), &started).await;
        });

        let reporter = ProgressReporter::spawn(
            Arc::clone(&progress),
            Arc::clone(&self.network),
            REPORT_INTERVAL,
        );

        info!(
            item = %progress.item_id,
            media_source = %progress.media_source.id,
            play_session = %play_session_id,
            bitrate = %progress.bitrate,
            "playback session started"
        );

        self.status.send_replace(progress.status());
        *state = SessionState::Active(ActiveSession {
            progress,
            reporter,
            started_report,
        });

        Ok(player)
    }

    /// Stops the active session, if any.
    ///
    /// Returns the final position so the caller can finalize resume state.
    /// Safe to call when idle.
    pub async fn stop(&self) -> Option<StoppedSession> {
        let mut state = self.state.lock().await;
        let SessionState::Active(active) = std::mem::take(&mut *state) else {
            return None;
        };
        let stopped = self.finish(active).await;
        self.status.send_replace(SessionStatus::Idle);
        Some(stopped)
    }

    /// Tears a session down: reporter first, then the final report, then the
    /// player.
    async fn finish(&self, active: ActiveSession) -> StoppedSession {
        let ActiveSession {
            progress,
            reporter,
            started_report,
        } = active;

        reporter.shutdown().await;
        let _ = started_report.await;

        let position_ticks = progress.position_ticks();
        progress.player.pause();

        let stopped =
            progress.report_at(PlaybackEventKind::Stopped, position_ticks);
        send_report(self.network.as_ref(), &stopped).await;

        progress.player.release();

        info!(
            item = %progress.item_id,
            play_session = %progress.play_session_id,
            position_ticks,
            "playback session stopped"
        );

        StoppedSession {
            item_id: progress.item_id.clone(),
            media_source_id: progress.media_source.id.clone(),
            play_session_id: progress.play_session_id,
            position_ticks,
            duration_ticks: progress.media_source.duration_ticks,
        }
    }
}

impl Drop for PlaybackSessionController {
    fn drop(&mut self) {
        let SessionState::Active(active) = std::mem::take(self.state.get_mut())
        else {
            return;
        };
        let ActiveSession {
            progress,
            reporter,
            started_report,
        } = active;
        warn!(
            item = %progress.item_id,
            play_session = %progress.play_session_id,
            "controller dropped with an active session"
        );

        let position_ticks = progress.position_ticks();
        progress.player.pause();
        progress.player.release();
        let stopped =
            progress.report_at(PlaybackEventKind::Stopped, position_ticks);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                play_session = %progress.play_session_id,
                "no runtime left, stopped report not sent"
            );
            return;
        };
        let network = Arc::clone(&self.network);
        runtime.spawn(async move {
            reporter.shutdown().await;
            let _ = started_report.await;
            send_report(network.as_ref(), &stopped).await;
        });
    }
}
