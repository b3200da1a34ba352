//! Player view-model
//!
//! Turns UI intents (play this, switch audio, next episode) into session
//! starts and stops, keeps the local copy of resume positions and
//! "last played" stamps current, and remembers the user's subtitle and bitrate
//! choices in their profile.

use crate::error::{PlaybackError, Result};
use crate::next_up::{Direction, adjacent_episode, resolve_next_up};
use crate::progress::finalize_resume_ticks;
use crate::selection::{
    TrackSelection, carry_over_selection, initial_selection, validate_selection,
};
use crate::session::{
    PlaybackRequest, PlaybackSessionController, StoppedSession,
};
use finplay_contracts::network::ImageKind;
use finplay_contracts::player::MediaPlayer;
use finplay_contracts::profile::{PlaybackPreferences, UserProfileStore};
use finplay_contracts::time::TimeProvider;
use finplay_model::chrono::{DateTime, Utc};
use finplay_model::{
    Bitrate, Episode, ItemId, MediaItem, MediaSource, MediaSourceId, Movie,
    Season, Series, TrackId,
};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

/// Where a fresh play starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartPosition {
    /// From the stored resume position
    #[default]
    Resume,
    /// From the beginning, ignoring any resume position
    Restart,
}

/// What the view-model is currently playing from.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackContext {
    Movie(Movie),
    /// An episode within its show; seasons are kept for next/previous and
    /// next-up.
    Episode {
        seasons: Vec<Season>,
        episode_id: ItemId,
    },
}

impl PlaybackContext {
    pub fn item_id(&self) -> &ItemId {
        match self {
            PlaybackContext::Movie(movie) => &movie.id,
            PlaybackContext::Episode { episode_id, .. } => episode_id,
        }
    }

    pub fn seasons(&self) -> Option<&[Season]> {
        match self {
            PlaybackContext::Movie(_) => None,
            PlaybackContext::Episode { seasons, .. } => Some(seasons),
        }
    }

    /// The episode being played, for an episode context.
    pub fn episode(&self) -> Option<&Episode> {
        match self {
            PlaybackContext::Movie(_) => None,
            PlaybackContext::Episode {
                seasons,
                episode_id,
            } => find_episode(seasons, episode_id),
        }
    }

    fn stamp_last_played(&mut self, item_id: &ItemId, at: DateTime<Utc>) {
        match self {
            PlaybackContext::Movie(movie) if &movie.id == item_id => {
                movie.last_played = Some(at);
            }
            PlaybackContext::Movie(_) => {}
            PlaybackContext::Episode { seasons, .. } => {
                if let Some(episode) = find_episode_mut(seasons, item_id) {
                    episode.last_played = Some(at);
                }
            }
        }
    }

    fn source_mut(
        &mut self,
        item_id: &ItemId,
        source_id: &MediaSourceId,
    ) -> Option<&mut MediaSource> {
        match self {
            PlaybackContext::Movie(movie) if &movie.id == item_id => movie
                .media_sources
                .iter_mut()
                .find(|source| &source.id == source_id),
            PlaybackContext::Movie(_) => None,
            PlaybackContext::Episode { seasons, .. } => {
                find_episode_mut(seasons, item_id)?.source_mut(source_id)
            }
        }
    }

    /// Writes a stopped session's finalized position back into the context.
    fn record_stop(&mut self, stopped: &StoppedSession, at: DateTime<Utc>) {
        match self.source_mut(&stopped.item_id, &stopped.media_source_id) {
            Some(source) => {
                source.resume_ticks = finalize_resume_ticks(
                    stopped.position_ticks,
                    stopped.duration_ticks,
                );
                debug!(
                    item = %stopped.item_id,
                    position_ticks = stopped.position_ticks,
                    resume_ticks = source.resume_ticks,
                    "finalized resume position"
                );
            }
            None => {
                warn!(
                    item = %stopped.item_id,
                    media_source = %stopped.media_source_id,
                    "stopped session does not belong to the current context"
                );
            }
        }
        self.stamp_last_played(&stopped.item_id, at);
    }
}

fn find_episode<'a>(
    seasons: &'a [Season],
    id: &ItemId,
) -> Option<&'a Episode> {
    seasons
        .iter()
        .flat_map(|season| &season.episodes)
        .find(|episode| &episode.id == id)
}

fn find_episode_mut<'a>(
    seasons: &'a mut [Season],
    id: &ItemId,
) -> Option<&'a mut Episode> {
    seasons
        .iter_mut()
        .flat_map(|season| &mut season.episodes)
        .find(|episode| &episode.id == id)
}

fn primary_source_of(episode: &Episode) -> Result<MediaSource> {
    episode.primary_source().cloned().ok_or_else(|| {
        PlaybackError::NothingToPlay(format!(
            "episode {} has no media source",
            episode.id
        ))
    })
}

fn next_up_id(seasons: &[Season]) -> Result<ItemId> {
    resolve_next_up(seasons)
        .map(|episode| episode.id.clone())
        .ok_or_else(|| {
            PlaybackError::NothingToPlay("show has no episodes".into())
        })
}

/// First movie or series inside a collection that has a source to play,
/// searching nested collections depth first.
fn first_playable(items: Vec<MediaItem>) -> Option<MediaItem> {
    items.into_iter().find_map(|item| match item {
        MediaItem::Collection(collection) => first_playable(collection.items),
        other if !other.playable_sources().is_empty() => Some(other),
        _ => None,
    })
}

/// Orchestrates playback for one screen.
pub struct PlayerViewModel {
    controller: PlaybackSessionController,
    profiles: Arc<dyn UserProfileStore>,
    clock: Box<dyn TimeProvider>,
    context: Mutex<Option<PlaybackContext>>,
}

impl fmt::Debug for PlayerViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerViewModel")
            .field("controller", &self.controller)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl PlayerViewModel {
    pub fn new(
        controller: PlaybackSessionController,
        profiles: Arc<dyn UserProfileStore>,
        clock: Box<dyn TimeProvider>,
    ) -> Self {
        Self {
            controller,
            profiles,
            clock,
            context: Mutex::new(None),
        }
    }

    pub fn controller(&self) -> &PlaybackSessionController {
        &self.controller
    }

    /// A copy of what is being played, with resume positions as last
    /// recorded.
    pub async fn context(&self) -> Option<PlaybackContext> {
        self.context.lock().await.clone()
    }

    pub async fn play_movie(
        &self,
        movie: Movie,
        position: StartPosition,
    ) -> Result<Arc<dyn MediaPlayer>> {
        let mut context = self.context.lock().await;
        self.stop_and_finalize(&mut context).await;

        let source = movie.primary_source().cloned().ok_or_else(|| {
            PlaybackError::NothingToPlay(format!(
                "movie {} has no media source",
                movie.id
            ))
        })?;
        let item_id = movie.id.clone();
        *context = Some(PlaybackContext::Movie(movie));

        self.start_fresh(&mut context, item_id, source, position).await
    }

    pub async fn play_episode(
        &self,
        seasons: Vec<Season>,
        episode_id: &ItemId,
        position: StartPosition,
    ) -> Result<Arc<dyn MediaPlayer>> {
        let mut context = self.context.lock().await;
        self.stop_and_finalize(&mut context).await;

        let episode = find_episode(&seasons, episode_id).ok_or_else(|| {
            PlaybackError::NothingToPlay(format!(
                "episode {episode_id} is not in this show"
            ))
        })?;
        let source = primary_source_of(episode)?;
        *context = Some(PlaybackContext::Episode {
            seasons,
            episode_id: episode_id.clone(),
        });

        self.start_fresh(&mut context, episode_id.clone(), source, position)
            .await
    }

    /// Plays whatever the next-up resolver picks, from its resume position.
    pub async fn play_next_up(
        &self,
        seasons: Vec<Season>,
    ) -> Result<Arc<dyn MediaPlayer>> {
        let episode_id = next_up_id(&seasons)?;
        self.play_episode(seasons, &episode_id, StartPosition::Resume)
            .await
    }

    /// Plays a library item. A series starts at its next-up episode and a
    /// collection at its first item with a playable source.
    pub async fn play_item(
        &self,
        item: MediaItem,
        position: StartPosition,
    ) -> Result<Arc<dyn MediaPlayer>> {
        debug!(item = %item.id(), title = item.title(), "play item");
        match item {
            MediaItem::Movie(movie) => self.play_movie(movie, position).await,
            MediaItem::Series(series) => {
                self.play_series(series, position).await
            }
            MediaItem::Collection(collection) => {
                match first_playable(collection.items) {
                    Some(MediaItem::Movie(movie)) => {
                        self.play_movie(movie, position).await
                    }
                    Some(MediaItem::Series(series)) => {
                        self.play_series(series, position).await
                    }
                    _ => Err(PlaybackError::NothingToPlay(format!(
                        "collection {} has nothing playable",
                        collection.id
                    ))),
                }
            }
        }
    }

    pub async fn select_subtitle(
        &self,
        subtitle: Option<TrackId>,
    ) -> Result<Arc<dyn MediaPlayer>> {
        self.restart_with(|selection, bitrate| {
            (selection.with_subtitle(subtitle), bitrate)
        })
        .await
    }

    pub async fn select_audio(
        &self,
        audio: TrackId,
    ) -> Result<Arc<dyn MediaPlayer>> {
        self.restart_with(|selection, bitrate| {
            (selection.with_audio(audio), bitrate)
        })
        .await
    }

    pub async fn select_video(
        &self,
        video: TrackId,
    ) -> Result<Arc<dyn MediaPlayer>> {
        self.restart_with(|selection, bitrate| {
            (selection.with_video(video), bitrate)
        })
        .await
    }

    pub async fn change_bitrate(
        &self,
        bitrate: Bitrate,
    ) -> Result<Arc<dyn MediaPlayer>> {
        self.restart_with(|selection, _| (selection, bitrate)).await
    }

    pub async fn next_episode(&self) -> Result<Arc<dyn MediaPlayer>> {
        self.step_episode(Direction::Next).await
    }

    pub async fn previous_episode(&self) -> Result<Arc<dyn MediaPlayer>> {
        self.step_episode(Direction::Previous).await
    }

    /// Stops playback and records the final position. The context is kept
    /// so the UI can show updated progress.
    pub async fn dismiss(&self) -> Option<StoppedSession> {
        let mut context = self.context.lock().await;
        self.stop_and_finalize(&mut context).await
    }

    pub async fn current_selection(&self) -> Option<TrackSelection> {
        self.controller.current().await.map(|progress| progress.selection)
    }

    pub async fn current_bitrate(&self) -> Option<Bitrate> {
        self.controller.current().await.map(|progress| progress.bitrate)
    }

    pub fn image_url(
        &self,
        kind: ImageKind,
        id: &ItemId,
        width: u32,
    ) -> Option<Url> {
        self.controller.network().image_url(kind, id, width)
    }

    /// Next-up over the show currently held, if playing episodes.
    pub async fn next_up(&self) -> Option<Episode> {
        let context = self.context.lock().await;
        context
            .as_ref()
            .and_then(PlaybackContext::seasons)
            .and_then(resolve_next_up)
            .cloned()
    }

    async fn play_series(
        &self,
        series: Series,
        position: StartPosition,
    ) -> Result<Arc<dyn MediaPlayer>> {
        let episode_id = next_up_id(&series.seasons)?;
        self.play_episode(series.seasons, &episode_id, position)
            .await
    }

    async fn stop_and_finalize(
        &self,
        context: &mut Option<PlaybackContext>,
    ) -> Option<StoppedSession> {
        let stopped = self.controller.stop().await?;
        if let Some(context) = context.as_mut() {
            context.record_stop(&stopped, self.clock.utc_now());
        }
        Some(stopped)
    }

    async fn start_fresh(
        &self,
        context: &mut Option<PlaybackContext>,
        item_id: ItemId,
        source: MediaSource,
        position: StartPosition,
    ) -> Result<Arc<dyn MediaPlayer>> {
        let preferences = self.profiles.preferred_user().await;
        let selection = initial_selection(&source, &preferences)?;
        let start_position_ticks = match position {
            StartPosition::Resume => source.resume_ticks.max(0),
            StartPosition::Restart => 0,
        };

        self.launch(
            context,
            PlaybackRequest {
                item_id,
                media_source: source,
                selection,
                bitrate: Bitrate::from_cap(preferences.bitrate_cap_bits),
                start_position_ticks,
            },
        )
        .await
    }

    /// Stop-then-start at the live position with a changed selection.
    ///
    /// The new selection is validated before the running session is touched.
    async fn restart_with(
        &self,
        change: impl FnOnce(
            TrackSelection,
            Bitrate,
        ) -> (TrackSelection, Bitrate),
    ) -> Result<Arc<dyn MediaPlayer>> {
        let mut context = self.context.lock().await;
        let progress = self.controller.current().await.ok_or_else(|| {
            PlaybackError::NothingToPlay("no active session".into())
        })?;

        let (selection, bitrate) = change(progress.selection, progress.bitrate);
        validate_selection(&progress.media_source, &selection)?;

        let request = PlaybackRequest {
            item_id: progress.item_id.clone(),
            media_source: progress.media_source.clone(),
            selection,
            bitrate,
            start_position_ticks: progress.position_ticks(),
        };
        drop(progress);

        self.stop_and_finalize(&mut context).await;
        self.launch(&mut context, request).await
    }

    async fn step_episode(
        &self,
        direction: Direction,
    ) -> Result<Arc<dyn MediaPlayer>> {
        let mut context = self.context.lock().await;
        let (current_id, target) = match context.as_ref() {
            Some(PlaybackContext::Episode {
                seasons,
                episode_id,
            }) => {
                let target = adjacent_episode(seasons, episode_id, direction)
                    .ok_or_else(|| {
                        PlaybackError::NothingToPlay(format!(
                            "no {} episode after {episode_id}",
                            match direction {
                                Direction::Next => "next",
                                Direction::Previous => "previous",
                            }
                        ))
                    })?;
                (episode_id.clone(), target.id.clone())
            }
            _ => {
                return Err(PlaybackError::NothingToPlay(
                    "not playing an episode".into(),
                ));
            }
        };

        let previous = self.controller.current().await;
        self.stop_and_finalize(&mut context).await;

        // Resume state of the target is read after finalization so stepping
        // back onto the episode just stopped sees its new position
        let target_source = match context.as_mut() {
            Some(PlaybackContext::Episode {
                seasons,
                episode_id,
            }) => {
                let episode =
                    find_episode(seasons, &target).ok_or_else(|| {
                        PlaybackError::NothingToPlay(format!(
                            "episode {target} disappeared"
                        ))
                    })?;
                let source = primary_source_of(episode)?;
                *episode_id = target.clone();
                source
            }
            _ => {
                return Err(PlaybackError::NothingToPlay(
                    "not playing an episode".into(),
                ));
            }
        };

        let (selection, bitrate) = match previous {
            Some(previous) => (
                carry_over_selection(
                    &previous.media_source,
                    &previous.selection,
                    &target_source,
                )?,
                previous.bitrate,
            ),
            None => {
                let preferences = self.profiles.preferred_user().await;
                (
                    initial_selection(&target_source, &preferences)?,
                    Bitrate::from_cap(preferences.bitrate_cap_bits),
                )
            }
        };

        info!(
            from = %current_id,
            to = %target,
            ?direction,
            "switching episode"
        );

        let start_position_ticks = target_source.resume_ticks.max(0);
        self.launch(
            &mut context,
            PlaybackRequest {
                item_id: target,
                media_source: target_source,
                selection,
                bitrate,
                start_position_ticks,
            },
        )
        .await
    }

    /// Starts the session, stamps "last played" and remembers preferences.
    async fn launch(
        &self,
        context: &mut Option<PlaybackContext>,
        request: PlaybackRequest,
    ) -> Result<Arc<dyn MediaPlayer>> {
        let item_id = request.item_id.clone();
        let preferences = PlaybackPreferences {
            uses_subtitles: request.selection.subtitle.is_some(),
            bitrate_cap_bits: request.bitrate.cap_bits(),
        };

        let player = self.controller.start(request).await?;

        if let Some(context) = context.as_mut() {
            context.stamp_last_played(&item_id, self.clock.utc_now());
        }

        if let Err(err) =
            self.profiles.update_preferred_user(preferences).await
        {
            warn!(error = %err, "failed to persist playback preferences");
        }

        Ok(player)
    }
}
