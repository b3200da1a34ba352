//! Wire bodies for session reports
//!
//! Field names follow the server's PascalCase convention.

use finplay_contracts::network::{PlaybackEventKind, PlaybackReport};
use serde::Serialize;

/// How the stream is delivered. The client always requests HLS, so the
/// server reports every session as transcoded.
pub const PLAY_METHOD: &str = "Transcode";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlaybackReportBody {
    pub item_id: String,
    pub media_source_id: String,
    pub play_session_id: String,
    pub session_id: String,
    pub position_ticks: i64,
    pub is_paused: bool,
    pub audio_stream_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_stream_index: Option<u32>,
    pub play_method: &'static str,
    pub can_seek: bool,
}

impl From<&PlaybackReport> for PlaybackReportBody {
    fn from(report: &PlaybackReport) -> Self {
        Self {
            item_id: report.item_id.to_string(),
            media_source_id: report.media_source_id.to_string(),
            play_session_id: report.play_session_id.to_string(),
            session_id: report.user_session_id.to_string(),
            position_ticks: report.position_ticks,
            is_paused: report.kind == PlaybackEventKind::Paused,
            audio_stream_index: report.audio_track_id.index(),
            subtitle_stream_index: report
                .subtitle_track_id
                .map(|id| id.index()),
            play_method: PLAY_METHOD,
            can_seek: true,
        }
    }
}
