//! Track selection defaults and carry-over between media sources
//!
//! The session controller only ever receives concrete track ids. Working out
//! those ids, either from a user's preferences or from the selection made on
//! the previous episode, happens here.

use crate::error::{PlaybackError, Result};
use crate::track_match::find_similar_track;
use finplay_contracts::profile::PlaybackPreferences;
use finplay_model::{MediaSource, TrackId, TrackKind};
use tracing::debug;

/// The tracks a session plays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackSelection {
    pub video: TrackId,
    pub audio: TrackId,
    /// `None` when subtitles are off
    pub subtitle: Option<TrackId>,
}

impl TrackSelection {
    pub fn with_subtitle(self, subtitle: Option<TrackId>) -> Self {
        Self { subtitle, ..self }
    }

    pub fn with_audio(self, audio: TrackId) -> Self {
        Self { audio, ..self }
    }

    pub fn with_video(self, video: TrackId) -> Self {
        Self { video, ..self }
    }
}

fn required_default(source: &MediaSource, kind: TrackKind) -> Result<TrackId> {
    source
        .default_track(kind)
        .map(|track| track.id)
        .ok_or_else(|| PlaybackError::Unplayable {
            media_source_id: source.id.clone(),
            reason: format!("no {kind} track"),
        })
}

/// Selection for a fresh play of `source`.
///
/// Video and audio use the source's default (or first) track. Subtitles use
/// the default subtitle track only when the user keeps subtitles on.
pub fn initial_selection(
    source: &MediaSource,
    preferences: &PlaybackPreferences,
) -> Result<TrackSelection> {
    let subtitle = if preferences.uses_subtitles {
        source.default_track(TrackKind::Subtitle).map(|track| track.id)
    } else {
        None
    };

    Ok(TrackSelection {
        video: required_default(source, TrackKind::Video)?,
        audio: required_default(source, TrackKind::Audio)?,
        subtitle,
    })
}

fn carry_track(
    previous_source: &MediaSource,
    previous: TrackId,
    next_source: &MediaSource,
    kind: TrackKind,
) -> Option<TrackId> {
    let matched = previous_source
        .track(kind, previous)
        .and_then(|base| find_similar_track(base, next_source, kind));

    match matched {
        Some(track) => Some(track.id),
        None => {
            let fallback =
                next_source.default_track(kind).map(|track| track.id);
            debug!(
                %kind,
                previous = %previous,
                fallback = ?fallback,
                "no similar track in next source, using its default"
            );
            fallback
        }
    }
}

/// Maps a selection made on `previous_source` onto `next_source`.
///
/// Each track is matched by title; unmatched kinds fall back to the next
/// source's default (or first) track. Subtitles that were off stay off.
pub fn carry_over_selection(
    previous_source: &MediaSource,
    previous: &TrackSelection,
    next_source: &MediaSource,
) -> Result<TrackSelection> {
    let carry = |track, kind| {
        carry_track(previous_source, track, next_source, kind)
    };
    let video = carry(previous.video, TrackKind::Video).ok_or_else(|| {
        PlaybackError::Unplayable {
            media_source_id: next_source.id.clone(),
            reason: "no video track".to_string(),
        }
    })?;
    let audio = carry(previous.audio, TrackKind::Audio).ok_or_else(|| {
        PlaybackError::Unplayable {
            media_source_id: next_source.id.clone(),
            reason: "no audio track".to_string(),
        }
    })?;
    let subtitle = previous
        .subtitle
        .and_then(|subtitle| carry(subtitle, TrackKind::Subtitle));

    Ok(TrackSelection {
        video,
        audio,
        subtitle,
    })
}

/// Checks that every selected id exists in `source`.
pub fn validate_selection(
    source: &MediaSource,
    selection: &TrackSelection,
) -> Result<()> {
    let checks = [
        (TrackKind::Video, Some(selection.video)),
        (TrackKind::Audio, Some(selection.audio)),
        (TrackKind::Subtitle, selection.subtitle),
    ];
    for (kind, track_id) in checks {
        if let Some(track_id) = track_id
            && source.track(kind, track_id).is_none()
        {
            return Err(PlaybackError::UnknownTrack {
                kind,
                track_id,
                media_source_id: source.id.clone(),
            });
        }
    }
    Ok(())
}
