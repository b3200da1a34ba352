use crate::selection::TrackSelection;
use crate::session::controller::SessionCredentials;
use finplay_contracts::network::{PlaybackEventKind, PlaybackReport};
use finplay_contracts::player::MediaPlayer;
use finplay_model::{
    Bitrate, ItemId, MediaSource, MediaSourceId, PlaySessionId,
    seconds_to_ticks,
};
use std::sync::Arc;

/// Live state of one playback session.
///
/// Identity and selections are fixed for the session's lifetime; changing a
/// track or the bitrate starts a new session. Only the player position moves.
#[derive(Debug)]
pub struct PlayerProgress {
    pub item_id: ItemId,
    pub media_source: MediaSource,
    pub selection: TrackSelection,
    pub bitrate: Bitrate,
    pub play_session_id: PlaySessionId,
    pub credentials: SessionCredentials,
    pub player: Arc<dyn MediaPlayer>,
}

impl PlayerProgress {
    /// Current player position in ticks, clamped at zero.
    pub fn position_ticks(&self) -> i64 {
        seconds_to_ticks(self.player.position_seconds()).max(0)
    }

    fn report(&self, kind: PlaybackEventKind) -> PlaybackReport {
        self.report_at(kind, self.position_ticks())
    }

    pub fn report_at(
        &self,
        kind: PlaybackEventKind,
        position_ticks: i64,
    ) -> PlaybackReport {
        PlaybackReport {
            kind,
            item_id: self.item_id.clone(),
            media_source_id: self.media_source.id.clone(),
            audio_track_id: self.selection.audio,
            subtitle_track_id: self.selection.subtitle,
            position_ticks,
            play_session_id: self.play_session_id,
            user_session_id: self.credentials.user_session_id.clone(),
            access_token: self.credentials.access_token.clone(),
        }
    }

    /// The periodic report: progress while playing, paused otherwise.
    pub fn tick_report(&self) -> PlaybackReport {
        let kind = if self.player.is_paused() {
            PlaybackEventKind::Paused
        } else {
            PlaybackEventKind::Progressed
        };
        self.report(kind)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus::Active {
            item_id: self.item_id.clone(),
            media_source_id: self.media_source.id.clone(),
            play_session_id: self.play_session_id,
            selection: self.selection,
            bitrate: self.bitrate,
        }
    }
}

/// Snapshot published to observers whenever a session starts or stops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Active {
        item_id: ItemId,
        media_source_id: MediaSourceId,
        play_session_id: PlaySessionId,
        selection: TrackSelection,
        bitrate: Bitrate,
    },
}

impl SessionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active { .. })
    }

    pub fn play_session_id(&self) -> Option<PlaySessionId> {
        match self {
            SessionStatus::Idle => None,
            SessionStatus::Active {
                play_session_id, ..
            } => Some(*play_session_id),
        }
    }
}
