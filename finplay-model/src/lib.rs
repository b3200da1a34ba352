//! Core data model definitions shared across finplay crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod bitrate;
pub mod error;
pub mod ids;
pub mod media;
pub mod prelude;
pub mod ticks;

// Intentionally curated re-exports for downstream consumers.
pub use bitrate::Bitrate;
pub use error::{ModelError, Result as ModelResult};
pub use ids::{ItemId, MediaSourceId, PlaySessionId, TrackId, UserSessionId};
pub use media::{
    Collection, Episode, MediaItem, MediaSource, Movie, Season, Series, Track,
    TrackKind,
};
pub use ticks::{TICKS_PER_SECOND, seconds_to_ticks, ticks_to_seconds};
