use async_trait::async_trait;
use thiserror::Error;

/// Per-user playback preferences kept by the profile store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackPreferences {
    pub uses_subtitles: bool,
    /// `None` streams at full quality
    pub bitrate_cap_bits: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("no preferred user is signed in")]
    NoUser,

    #[error("profile storage failed: {0}")]
    Storage(String),
}

/// Storage for the signed-in user's profile.
///
/// Read at session start, written after every successful start.
#[async_trait]
pub trait UserProfileStore: Send + Sync {
    async fn preferred_user(&self) -> PlaybackPreferences;

    async fn update_preferred_user(
        &self,
        preferences: PlaybackPreferences,
    ) -> Result<(), ProfileError>;
}
