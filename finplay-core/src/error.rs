use finplay_model::{MediaSourceId, TrackId, TrackKind};
use thiserror::Error;

/// Failures the playback core surfaces to the UI.
///
/// Reporting failures never appear here; they are swallowed where the report
/// is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("media source {media_source_id} is unplayable: {reason}")]
    Unplayable {
        media_source_id: MediaSourceId,
        reason: String,
    },

    #[error(
        "{kind} track {track_id} does not exist in media source \
         {media_source_id}"
    )]
    UnknownTrack {
        kind: TrackKind,
        track_id: TrackId,
        media_source_id: MediaSourceId,
    },

    #[error("nothing to play: {0}")]
    NothingToPlay(String),
}

impl PlaybackError {
    /// Whether the UI should present this as "nothing to play".
    pub fn is_unplayable(&self) -> bool {
        matches!(
            self,
            PlaybackError::Unplayable { .. } | PlaybackError::NothingToPlay(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
