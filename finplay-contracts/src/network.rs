//! Network collaborator contract
//!
//! Everything the playback core needs from the media server: a way to turn a
//! track selection into a playable stream, a sink for playback status
//! reports, and image URL construction passed through to the UI.

use async_trait::async_trait;
use finplay_model::{
    ItemId, MediaSourceId, PlaySessionId, TrackId, UserSessionId,
};
use std::fmt::{self, Debug};
use thiserror::Error;
use url::Url;

/// Inputs for building a stream URL.
#[derive(Clone, PartialEq, Eq)]
pub struct StreamRequest {
    pub access_token: String,
    pub item_id: ItemId,
    pub media_source_id: MediaSourceId,
    pub video_track_id: TrackId,
    pub audio_track_id: TrackId,
    pub subtitle_track_id: Option<TrackId>,
    pub bitrate_cap_bits: Option<u64>,
    pub play_session_id: PlaySessionId,
}

impl Debug for StreamRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamRequest")
            .field("item_id", &self.item_id)
            .field("media_source_id", &self.media_source_id)
            .field("video_track_id", &self.video_track_id)
            .field("audio_track_id", &self.audio_track_id)
            .field("subtitle_track_id", &self.subtitle_track_id)
            .field("bitrate_cap_bits", &self.bitrate_cap_bits)
            .field("play_session_id", &self.play_session_id)
            .field("has_token", &!self.access_token.is_empty())
            .finish()
    }
}

/// A ready-to-play stream: the URL plus headers the player must send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableHandle {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

/// Which lifecycle event a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackEventKind {
    Started,
    Progressed,
    Paused,
    Stopped,
}

impl fmt::Display for PlaybackEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackEventKind::Started => write!(f, "started"),
            PlaybackEventKind::Progressed => write!(f, "progressed"),
            PlaybackEventKind::Paused => write!(f, "paused"),
            PlaybackEventKind::Stopped => write!(f, "stopped"),
        }
    }
}

/// One status push. Every report is a full position snapshot, so a dropped
/// or reordered progress report is harmless.
#[derive(Clone, PartialEq, Eq)]
pub struct PlaybackReport {
    pub kind: PlaybackEventKind,
    pub item_id: ItemId,
    pub media_source_id: MediaSourceId,
    pub audio_track_id: TrackId,
    pub subtitle_track_id: Option<TrackId>,
    pub position_ticks: i64,
    pub play_session_id: PlaySessionId,
    pub user_session_id: UserSessionId,
    pub access_token: String,
}

impl Debug for PlaybackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackReport")
            .field("kind", &self.kind)
            .field("item_id", &self.item_id)
            .field("media_source_id", &self.media_source_id)
            .field("audio_track_id", &self.audio_track_id)
            .field("subtitle_track_id", &self.subtitle_track_id)
            .field("position_ticks", &self.position_ticks)
            .field("play_session_id", &self.play_session_id)
            .field("user_session_id", &self.user_session_id)
            .finish_non_exhaustive()
    }
}

/// Artwork variants the server can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Primary,
    Backdrop,
    Thumb,
    Logo,
}

impl ImageKind {
    pub fn as_path_segment(self) -> &'static str {
        match self {
            ImageKind::Primary => "Primary",
            ImageKind::Backdrop => "Backdrop",
            ImageKind::Thumb => "Thumb",
            ImageKind::Logo => "Logo",
        }
    }
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("server returned {status} for {path}")]
    Http { status: u16, path: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to encode request: {0}")]
    Encode(String),

    #[error("not authenticated")]
    Unauthorized,
}

/// Media server operations the playback core depends on.
#[async_trait]
pub trait PlaybackNetwork: Send + Sync + Debug {
    /// Returns `None` when the inputs cannot produce a valid stream.
    fn build_playback_request(
        &self,
        request: &StreamRequest,
    ) -> Option<PlayableHandle>;

    /// Fire-and-forget status push; callers swallow the error.
    async fn report_playback_event(
        &self,
        report: &PlaybackReport,
    ) -> Result<(), NetworkError>;

    /// Not used by the core itself; the view-model passes it through.
    fn image_url(
        &self,
        kind: ImageKind,
        id: &ItemId,
        width: u32,
    ) -> Option<Url>;
}
