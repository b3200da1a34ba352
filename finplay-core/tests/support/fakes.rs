//! Recording stand-ins for the playback collaborators.

use async_trait::async_trait;
use finplay_contracts::prelude::*;
use finplay_model::{ItemId, PlaySessionId};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Network that records every stream request and report it sees.
#[derive(Debug, Default)]
pub struct RecordingNetwork {
    reports: Mutex<Vec<PlaybackReport>>,
    stream_requests: Mutex<Vec<StreamRequest>>,
    fail_reports: AtomicBool,
    refuse_streams: AtomicBool,
    report_delay: Mutex<Option<Duration>>,
}

impl RecordingNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_reports(&self, fail: bool) {
        self.fail_reports.store(fail, Ordering::SeqCst);
    }

    pub fn refuse_streams(&self, refuse: bool) {
        self.refuse_streams.store(refuse, Ordering::SeqCst);
    }

    /// Every report takes this long to "reach" the server.
    pub fn delay_reports(&self, delay: Duration) {
        *self.report_delay.lock().unwrap() = Some(delay);
    }

    pub fn reports(&self) -> Vec<PlaybackReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<PlaybackEventKind> {
        self.reports().iter().map(|report| report.kind).collect()
    }

    pub fn reports_for(&self, session: PlaySessionId) -> Vec<PlaybackReport> {
        self.reports()
            .into_iter()
            .filter(|report| report.play_session_id == session)
            .collect()
    }

    pub fn count(&self, kind: PlaybackEventKind) -> usize {
        self.kinds().into_iter().filter(|k| *k == kind).count()
    }

    pub fn stream_requests(&self) -> Vec<StreamRequest> {
        self.stream_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaybackNetwork for RecordingNetwork {
    fn build_playback_request(
        &self,
        request: &StreamRequest,
    ) -> Option<PlayableHandle> {
        self.stream_requests.lock().unwrap().push(request.clone());
        if self.refuse_streams.load(Ordering::SeqCst) {
            return None;
        }
        let url = Url::parse(&format!(
            "http://media.test/Videos/{}/master.m3u8?PlaySessionId={}",
            request.item_id, request.play_session_id
        ))
        .ok()?;
        Some(PlayableHandle {
            url,
            headers: Vec::new(),
        })
    }

    async fn report_playback_event(
        &self,
        report: &PlaybackReport,
    ) -> Result<(), NetworkError> {
        self.reports.lock().unwrap().push(report.clone());
        let delay = *self.report_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_reports.load(Ordering::SeqCst) {
            return Err(NetworkError::Transport("connection reset".into()));
        }
        Ok(())
    }

    fn image_url(
        &self,
        kind: ImageKind,
        id: &ItemId,
        width: u32,
    ) -> Option<Url> {
        Url::parse(&format!(
            "http://media.test/Items/{id}/Images/{}?maxWidth={width}",
            kind.as_path_segment()
        ))
        .ok()
    }
}

#[derive(Debug, Default)]
struct PlayerState {
    position: f64,
    paused: bool,
    playing: bool,
    released: bool,
    seeks: Vec<f64>,
}

/// Player whose position only moves when a test says so.
#[derive(Debug, Default)]
pub struct FakePlayer {
    state: Mutex<PlayerState>,
}

impl FakePlayer {
    pub fn set_position(&self, seconds: f64) {
        self.state.lock().unwrap().position = seconds;
    }

    pub fn set_paused(&self, paused: bool) {
        self.state.lock().unwrap().paused = paused;
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    pub fn is_released(&self) -> bool {
        self.state.lock().unwrap().released
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.state.lock().unwrap().seeks.clone()
    }
}

impl MediaPlayer for FakePlayer {
    fn position_seconds(&self) -> f64 {
        self.state.lock().unwrap().position
    }

    fn is_paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    fn play(&self) {
        let mut state = self.state.lock().unwrap();
        state.playing = true;
        state.paused = false;
    }

    fn pause(&self) {
        self.state.lock().unwrap().paused = true;
    }

    fn seek(&self, seconds: f64) {
        let mut state = self.state.lock().unwrap();
        state.position = seconds;
        state.seeks.push(seconds);
    }

    fn release(&self) {
        let mut state = self.state.lock().unwrap();
        state.playing = false;
        state.released = true;
    }
}

/// Hands out [`FakePlayer`]s and keeps them for inspection.
#[derive(Debug, Default)]
pub struct FakePlayerFactory {
    opened: Mutex<Vec<Arc<FakePlayer>>>,
}

impl FakePlayerFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn opened(&self) -> Vec<Arc<FakePlayer>> {
        self.opened.lock().unwrap().clone()
    }

    pub fn last(&self) -> Arc<FakePlayer> {
        self.opened().last().cloned().expect("no player opened")
    }
}

impl PlayerFactory for FakePlayerFactory {
    fn open(&self, _handle: &PlayableHandle) -> Arc<dyn MediaPlayer> {
        let player = Arc::new(FakePlayer::default());
        self.opened.lock().unwrap().push(Arc::clone(&player));
        player
    }
}

/// Profile store held in memory, optionally refusing writes.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    preferences: Mutex<PlaybackPreferences>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryProfileStore {
    pub fn with(preferences: PlaybackPreferences) -> Arc<Self> {
        Arc::new(Self {
            preferences: Mutex::new(preferences),
            ..Self::default()
        })
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn current(&self) -> PlaybackPreferences {
        *self.preferences.lock().unwrap()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserProfileStore for InMemoryProfileStore {
    async fn preferred_user(&self) -> PlaybackPreferences {
        self.current()
    }

    async fn update_preferred_user(
        &self,
        preferences: PlaybackPreferences,
    ) -> Result<(), ProfileError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ProfileError::Storage("disk full".into()));
        }
        *self.preferences.lock().unwrap() = preferences;
        Ok(())
    }
}
