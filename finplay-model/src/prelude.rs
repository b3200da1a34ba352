//! Convenience re-exports for crates that work with most of the model.

pub use crate::bitrate::Bitrate;
pub use crate::chrono::{DateTime, Utc};
pub use crate::ids::{
    ItemId, MediaSourceId, PlaySessionId, TrackId, UserSessionId,
};
pub use crate::media::{
    Collection, Episode, MediaItem, MediaSource, Movie, Season, Series, Track,
    TrackKind,
};
pub use crate::ticks::{TICKS_PER_SECOND, seconds_to_ticks, ticks_to_seconds};
