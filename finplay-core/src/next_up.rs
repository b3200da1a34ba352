//! Episode selection for "continue watching"
//!
//! Pure functions over a show's seasons. Episodes are considered in season
//! order, then in the order they appear within a season; episode numbers are
//! never used for ordering.

use crate::progress::is_finished;
use finplay_model::{Episode, ItemId, Season};
use tracing::debug;

/// Why an episode was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NextReason {
    /// Nothing in the show has been played yet, or the first episode hasn't.
    StartFromBeginning,
    /// The most recently played episode was left part way through.
    ResumeInProgress,
    /// The most recently played episode was finished; this one follows it.
    AdvanceAfterFinished,
    /// The most recently played episode has no source to inspect.
    NoPlayableSource,
}

/// The episode to offer next, with the reason it was chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextUp<'a> {
    pub episode: &'a Episode,
    pub reason: NextReason,
}

/// Direction for stepping through a show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// All episodes in playback order.
pub fn flatten_episodes(seasons: &[Season]) -> Vec<&Episode> {
    seasons.iter().flat_map(|season| &season.episodes).collect()
}

/// The episode the UI should suggest for continued viewing.
pub fn resolve_next_up(seasons: &[Season]) -> Option<&Episode> {
    resolve_next_up_with_reason(seasons).map(|next| next.episode)
}

/// Same as [`resolve_next_up`], keeping the reason for the pick.
pub fn resolve_next_up_with_reason(seasons: &[Season]) -> Option<NextUp<'_>> {
    let episodes = flatten_episodes(seasons);
    let first = *episodes.first()?;

    // New viewers always start at the beginning
    if first.last_played.is_none() {
        return Some(NextUp {
            episode: first,
            reason: NextReason::StartFromBeginning,
        });
    }

    // Strict `>` so the first episode reaching the maximum wins ties
    let mut latest: Option<(usize, &Episode)> = None;
    for (index, episode) in episodes.iter().enumerate() {
        let Some(played) = episode.last_played else {
            continue;
        };
        let is_later = match latest {
            Some((_, current)) => {
                current.last_played.is_some_and(|at| played > at)
            }
            None => true,
        };
        if is_later {
            latest = Some((index, episode));
        }
    }

    let Some((index, episode)) = latest else {
        return Some(NextUp {
            episode: first,
            reason: NextReason::StartFromBeginning,
        });
    };

    let Some(source) = episode.primary_source() else {
        debug!(
            episode = %episode.id,
            "next-up: latest episode has no media source"
        );
        return Some(NextUp {
            episode,
            reason: NextReason::NoPlayableSource,
        });
    };

    // Without a duration any non-zero position is resumable
    let in_progress = source.resume_ticks != 0
        && !is_finished(source.resume_ticks, source.duration_ticks);

    if in_progress {
        debug!(
            episode = %episode.id,
            resume_ticks = source.resume_ticks,
            "next-up: resuming in-progress episode"
        );
        return Some(NextUp {
            episode,
            reason: NextReason::ResumeInProgress,
        });
    }

    let following = episodes[(index + 1) % episodes.len()];
    debug!(
        finished = %episode.id,
        next = %following.id,
        "next-up: advancing past finished episode"
    );
    Some(NextUp {
        episode: following,
        reason: NextReason::AdvanceAfterFinished,
    })
}

/// The episode next to `current` in playback order, without wrapping.
pub fn adjacent_episode<'a>(
    seasons: &'a [Season],
    current: &ItemId,
    direction: Direction,
) -> Option<&'a Episode> {
    let episodes = flatten_episodes(seasons);
    let index = episodes.iter().position(|episode| &episode.id == current)?;
    let target = match direction {
        Direction::Next => index.checked_add(1)?,
        Direction::Previous => index.checked_sub(1)?,
    };
    episodes.get(target).copied()
}
