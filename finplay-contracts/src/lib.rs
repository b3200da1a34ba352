//! Trait surfaces for the collaborators the playback core talks to.
//!
//! Nothing in here performs I/O on its own. The core receives implementations
//! of these traits at construction time, which keeps the transport, the
//! profile storage, the video output and the clock swappable in tests.

pub mod network;
pub mod player;
pub mod profile;
pub mod time;

/// Frequently used contract types for orchestration crates.
pub mod prelude {
    pub use super::network::{
        ImageKind, NetworkError, PlayableHandle, PlaybackEventKind,
        PlaybackNetwork, PlaybackReport, StreamRequest,
    };
    pub use super::player::{MediaPlayer, PlayerFactory};
    pub use super::profile::{
        PlaybackPreferences, ProfileError, UserProfileStore,
    };
    pub use super::time::{
        ManualTimeProvider, SystemTimeProvider, TimeProvider,
    };
}
