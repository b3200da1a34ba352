use crate::chrono::{DateTime, Utc};
use crate::ids::{ItemId, MediaSourceId, TrackId};

/// Kind of stream a track carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Video => write!(f, "video"),
            TrackKind::Audio => write!(f, "audio"),
            TrackKind::Subtitle => write!(f, "subtitle"),
        }
    }
}

/// One selectable stream within a media source. Immutable once decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    pub id: TrackId,
    /// Display title, e.g. "English 5.1"
    pub title: String,
    pub kind: TrackKind,
    pub codec: String,
    /// Bits per second when the server reports it
    pub bitrate: Option<u64>,
    pub is_default: bool,
}

impl Track {
    pub fn new(
        id: u32,
        kind: TrackKind,
        title: impl Into<String>,
        codec: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId(id),
            title: title.into(),
            kind,
            codec: codec.into(),
            bitrate: None,
            is_default: false,
        }
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }
}

/// A playable rendition of a movie or an episode.
///
/// Which track is currently chosen lives on the playback session, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaSource {
    pub id: MediaSourceId,
    pub name: String,
    pub video_tracks: Vec<Track>,
    pub audio_tracks: Vec<Track>,
    pub subtitle_tracks: Vec<Track>,
    /// Resume position in ticks, 0 = from the start
    pub resume_ticks: i64,
    pub duration_ticks: Option<i64>,
}

impl MediaSource {
    pub fn new(id: MediaSourceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            video_tracks: Vec::new(),
            audio_tracks: Vec::new(),
            subtitle_tracks: Vec::new(),
            resume_ticks: 0,
            duration_ticks: None,
        }
    }

    /// Builds a source from decoded tracks, routing each into its list.
    ///
    /// Decoders occasionally flag several tracks of one kind as default; the
    /// first flagged track keeps the flag and the rest are cleared.
    pub fn from_tracks(
        id: MediaSourceId,
        name: impl Into<String>,
        tracks: impl IntoIterator<Item = Track>,
    ) -> Self {
        let mut source = Self::new(id, name);
        for track in tracks {
            match track.kind {
                TrackKind::Video => source.video_tracks.push(track),
                TrackKind::Audio => source.audio_tracks.push(track),
                TrackKind::Subtitle => source.subtitle_tracks.push(track),
            }
        }
        for list in [
            &mut source.video_tracks,
            &mut source.audio_tracks,
            &mut source.subtitle_tracks,
        ] {
            let mut seen_default = false;
            for track in list.iter_mut() {
                if track.is_default {
                    if seen_default {
                        track.is_default = false;
                    }
                    seen_default = true;
                }
            }
        }
        source
    }

    pub fn with_duration(mut self, duration_ticks: i64) -> Self {
        self.duration_ticks = Some(duration_ticks);
        self
    }

    pub fn with_resume(mut self, resume_ticks: i64) -> Self {
        self.resume_ticks = resume_ticks;
        self
    }

    pub fn tracks(&self, kind: TrackKind) -> &[Track] {
        match kind {
            TrackKind::Video => &self.video_tracks,
            TrackKind::Audio => &self.audio_tracks,
            TrackKind::Subtitle => &self.subtitle_tracks,
        }
    }

    pub fn track(&self, kind: TrackKind, id: TrackId) -> Option<&Track> {
        self.tracks(kind).iter().find(|track| track.id == id)
    }

    /// The track flagged default, or else the first one.
    pub fn default_track(&self, kind: TrackKind) -> Option<&Track> {
        let tracks = self.tracks(kind);
        tracks
            .iter()
            .find(|track| track.is_default)
            .or_else(|| tracks.first())
    }

    /// Fraction of the source watched, when a duration is known.
    pub fn progress(&self) -> Option<f64> {
        match self.duration_ticks {
            Some(duration) if duration > 0 => {
                Some(self.resume_ticks as f64 / duration as f64)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Episode {
    pub id: ItemId,
    pub title: String,
    pub episode_number: u32,
    /// Normally exactly one
    pub media_sources: Vec<MediaSource>,
    /// `None` means never played
    pub last_played: Option<DateTime<Utc>>,
    pub overview: Option<String>,
}

impl Episode {
    pub fn new(
        id: ItemId,
        episode_number: u32,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            episode_number,
            media_sources: Vec::new(),
            last_played: None,
            overview: None,
        }
    }

    pub fn with_source(mut self, source: MediaSource) -> Self {
        self.media_sources.push(source);
        self
    }

    pub fn with_last_played(mut self, at: DateTime<Utc>) -> Self {
        self.last_played = Some(at);
        self
    }

    pub fn primary_source(&self) -> Option<&MediaSource> {
        self.media_sources.first()
    }

    pub fn source_mut(
        &mut self,
        id: &MediaSourceId,
    ) -> Option<&mut MediaSource> {
        self.media_sources.iter_mut().find(|source| &source.id == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Season {
    pub id: ItemId,
    pub title: String,
    pub season_number: u32,
    /// Source order, not necessarily sorted by episode number
    pub episodes: Vec<Episode>,
}

impl Season {
    pub fn new(
        id: ItemId,
        season_number: u32,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            season_number,
            episodes: Vec::new(),
        }
    }

    pub fn with_episode(mut self, episode: Episode) -> Self {
        self.episodes.push(episode);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Movie {
    pub id: ItemId,
    pub title: String,
    pub media_sources: Vec<MediaSource>,
    pub last_played: Option<DateTime<Utc>>,
}

impl Movie {
    pub fn primary_source(&self) -> Option<&MediaSource> {
        self.media_sources.first()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Series {
    pub id: ItemId,
    pub title: String,
    pub seasons: Vec<Season>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collection {
    pub id: ItemId,
    pub title: String,
    pub items: Vec<MediaItem>,
}

/// Every kind of library item a "play" request can target.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum MediaItem {
    Movie(Movie),
    Series(Series),
    Collection(Collection),
}

impl MediaItem {
    pub fn id(&self) -> &ItemId {
        match self {
            MediaItem::Movie(movie) => &movie.id,
            MediaItem::Series(series) => &series.id,
            MediaItem::Collection(collection) => &collection.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            MediaItem::Movie(movie) => &movie.title,
            MediaItem::Series(series) => &series.title,
            MediaItem::Collection(collection) => &collection.title,
        }
    }

    /// Sources a play request can start from, in library order.
    ///
    /// Series contribute every episode's sources; collections recurse.
    pub fn playable_sources(&self) -> Vec<&MediaSource> {
        match self {
            MediaItem::Movie(movie) => movie.media_sources.iter().collect(),
            MediaItem::Series(series) => series
                .seasons
                .iter()
                .flat_map(|season| &season.episodes)
                .flat_map(|episode| &episode.media_sources)
                .collect(),
            MediaItem::Collection(collection) => collection
                .items
                .iter()
                .flat_map(MediaItem::playable_sources)
                .collect(),
        }
    }
}
