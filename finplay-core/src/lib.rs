//! # finplay core
//!
//! Playback orchestration for a Jellyfin-compatible media server client.
//!
//! ## Overview
//!
//! - **Next-up**: pick the episode to offer for continued viewing
//! - **Track matching**: carry audio and subtitle choices from one episode to
//!   the next by title
//! - **Sessions**: one active play-through at a time, with "started",
//!   periodic progress and "stopped" reports sent to the server
//! - **Resume finalization**: collapse barely-started and nearly-finished
//!   positions to the start
//!
//! ## Architecture
//!
//! - [`session`]: the session controller and its background reporter
//! - [`view_model`]: UI-facing orchestration on top of the controller
//! - [`next_up`], [`track_match`], [`selection`], [`progress`]: pure logic
//! - [`api`]: HTTP implementation of the network collaborator
//! - [`config`]: client settings
//!
//! Collaborators (network, player, profile storage, clock) are traits from
//! `finplay-contracts`, injected at construction.

pub mod api;
pub mod config;
pub mod error;
pub mod next_up;
pub mod progress;
pub mod selection;
pub mod session;
pub mod track_match;
pub mod view_model;

pub use error::{PlaybackError, Result};

/// Common imports for frontends embedding the playback core.
pub mod prelude {
    pub use crate::api::JellyfinClient;
    pub use crate::config::ClientConfig;
    pub use crate::error::{PlaybackError, Result};
    pub use crate::next_up::{NextReason, NextUp, resolve_next_up};
    pub use crate::selection::TrackSelection;
    pub use crate::session::{
        PlaybackRequest, PlaybackSessionController, SessionCredentials,
        SessionStatus, StoppedSession,
    };
    pub use crate::view_model::{
        PlaybackContext, PlayerViewModel, StartPosition,
    };
    pub use finplay_contracts::prelude::*;
    pub use finplay_model::prelude::*;
}
