//! Video output contract
//!
//! The underlying player is an exclusive resource: at most one instance is
//! live per view-model, and the previous one is released before the next is
//! opened.

use crate::network::PlayableHandle;
use std::fmt::Debug;
use std::sync::Arc;

/// Handle to a live player instance.
///
/// Positions are seconds; tick conversion happens at the network boundary.
pub trait MediaPlayer: Send + Sync + Debug {
    fn position_seconds(&self) -> f64;

    fn is_paused(&self) -> bool;

    fn play(&self);

    fn pause(&self);

    fn seek(&self, seconds: f64);

    /// Tears down the output stream. The handle is unusable afterwards.
    fn release(&self);
}

/// Opens players for stream handles.
pub trait PlayerFactory: Send + Sync + Debug {
    fn open(&self, handle: &PlayableHandle) -> Arc<dyn MediaPlayer>;
}
