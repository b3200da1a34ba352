//! Library fixtures: a two-season show with slightly mismatched tracks.

use finplay_core::session::SessionCredentials;
use finplay_model::chrono::{DateTime, TimeZone, Utc};
use finplay_model::{
    Episode, ItemId, MediaSource, MediaSourceId, Movie, Season, Track,
    TrackKind, UserSessionId, seconds_to_ticks,
};

/// 24 minutes.
pub const EPISODE_SECONDS: f64 = 1_440.0;

pub fn episode_ticks() -> i64 {
    seconds_to_ticks(EPISODE_SECONDS)
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 4, 19, 30, 0).unwrap()
}

pub fn credentials() -> SessionCredentials {
    SessionCredentials {
        access_token: "token-abc".into(),
        user_session_id: UserSessionId::new("device-session-1"),
    }
}

pub fn item(id: &str) -> ItemId {
    ItemId::new(id).unwrap()
}

/// Japanese default audio, English second, two subtitle tracks.
pub fn source_with_layout(id: &str, english_audio_index: u32) -> MediaSource {
    let japanese_index = if english_audio_index == 1 { 2 } else { 1 };
    MediaSource::from_tracks(
        MediaSourceId::new(format!("{id}-src")).unwrap(),
        format!("{id}.mkv"),
        [
            Track::new(0, TrackKind::Video, "1080p HEVC", "hevc"),
            Track::new(japanese_index, TrackKind::Audio, "Japanese 2.0", "aac")
                .with_default(true),
            Track::new(
                english_audio_index,
                TrackKind::Audio,
                "English 5.1",
                "ac3",
            ),
            Track::new(3, TrackKind::Subtitle, "English", "srt")
                .with_default(true),
            Track::new(4, TrackKind::Subtitle, "Signs & Songs", "ass"),
        ],
    )
    .with_duration(episode_ticks())
}

pub fn episode(id: &str, number: u32) -> Episode {
    // Alternate the English track's index so matching must go by title
    let english_index = if number % 2 == 0 { 1 } else { 2 };
    Episode::new(item(id), number, format!("Episode {number}"))
        .with_source(source_with_layout(id, english_index))
}

pub fn show() -> Vec<Season> {
    vec![
        Season::new(item("s1"), 1, "Season 1")
            .with_episode(episode("s1e1", 1))
            .with_episode(episode("s1e2", 2))
            .with_episode(episode("s1e3", 3)),
        Season::new(item("s2"), 2, "Season 2").with_episode(episode("s2e1", 1)),
    ]
}

/// Marks an episode as watched to `resume_seconds` at `at`.
pub fn watch(
    seasons: &mut [Season],
    id: &str,
    resume_seconds: f64,
    at: DateTime<Utc>,
) {
    let episode = seasons
        .iter_mut()
        .flat_map(|season| &mut season.episodes)
        .find(|episode| episode.id.as_str() == id)
        .expect("episode in fixture");
    episode.last_played = Some(at);
    episode.media_sources[0].resume_ticks = seconds_to_ticks(resume_seconds);
}

pub fn movie(id: &str) -> Movie {
    Movie {
        id: item(id),
        title: "Feature".into(),
        media_sources: vec![
            source_with_layout(id, 2)
                .with_duration(seconds_to_ticks(6_000.0)),
        ],
        last_played: None,
    }
}
