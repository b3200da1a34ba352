//! Similar-track matching across media sources
//!
//! Track ids are stream indices local to one media source. "English 5.1" can
//! be index 2 in one episode and index 3 in the next, so the display title is
//! the only key that survives an episode transition.
//!
//! Known limitation: two distinct tracks can share a title (e.g. two
//! "English" subtitle tracks, one of them SDH). The first title match wins;
//! nothing further disambiguates by language code or channel layout.

use finplay_model::{MediaSource, Track, TrackKind};

/// Finds the track in `in_source` equivalent to `base`, by exact title.
///
/// Returns `None` when no track of `kind` carries the same title.
pub fn find_similar_track<'a>(
    base: &Track,
    in_source: &'a MediaSource,
    kind: TrackKind,
) -> Option<&'a Track> {
    in_source
        .tracks(kind)
        .iter()
        .find(|candidate| candidate.title == base.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use finplay_model::{MediaSourceId, TrackId};

    fn source(id: &str, tracks: Vec<Track>) -> MediaSource {
        MediaSource::from_tracks(MediaSourceId::new(id).unwrap(), id, tracks)
    }

    #[test]
    fn matches_by_title_not_by_id() {
        let a = source(
            "a",
            vec![Track::new(7, TrackKind::Audio, "English 5.1", "ac3")],
        );
        let b = source(
            "b",
            vec![
                Track::new(1, TrackKind::Audio, "Japanese 2.0", "aac"),
                Track::new(2, TrackKind::Audio, "English 5.1", "ac3"),
            ],
        );

        let base = &a.audio_tracks[0];
        let found = find_similar_track(base, &b, TrackKind::Audio);
        assert_eq!(found.map(|track| track.id), Some(TrackId(2)));
    }

    #[test]
    fn missing_title_yields_none() {
        let base = Track::new(7, TrackKind::Audio, "English 5.1", "ac3");
        let b = source(
            "b",
            vec![Track::new(1, TrackKind::Audio, "Japanese 2.0", "aac")],
        );
        assert!(find_similar_track(&base, &b, TrackKind::Audio).is_none());
    }

    #[test]
    fn only_searches_requested_kind() {
        let base = Track::new(3, TrackKind::Subtitle, "English", "srt");
        let b = source(
            "b",
            vec![Track::new(1, TrackKind::Audio, "English", "aac")],
        );
        assert!(find_similar_track(&base, &b, TrackKind::Subtitle).is_none());
        assert!(find_similar_track(&base, &b, TrackKind::Audio).is_some());
    }

    #[test]
    fn first_of_duplicate_titles_wins() {
        let base = Track::new(0, TrackKind::Subtitle, "English", "srt");
        let b = source(
            "b",
            vec![
                Track::new(4, TrackKind::Subtitle, "English", "srt"),
                Track::new(5, TrackKind::Subtitle, "English", "pgs"),
            ],
        );
        assert_eq!(
            find_similar_track(&base, &b, TrackKind::Subtitle).map(|t| t.id),
            Some(TrackId(4))
        );
    }
}
