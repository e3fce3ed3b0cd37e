//! Playback manager - transport state machine
//!
//! Coordinates playlist, shuffle history, repeat mode and the ISO overlay.
//!
//! The manager performs no I/O. Every operation updates state and returns the
//! [`Directive`]s the driver must execute, in order, against the playback
//! adapter. Load results and status polls are fed back through
//! [`PlaybackManager::complete_load`] and [`PlaybackManager::apply_status`].

use crate::{
    backend::{HandleId, HandleStatus, LoadOptions},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    history::History,
    overlay::Overlay,
    playlist::Playlist,
    shuffle,
    types::{PlaybackConfig, RepeatMode, TransportPhase, TransportSnapshot},
};
use daisy_core::{AudioSource, Track};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Identifies one load request; only the latest one is honoured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadToken(u64);

/// Which side of the transport a load feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTarget {
    /// Playlist track or one-off preview
    Main,

    /// ISO alternate rendering
    Alternate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub token: LoadToken,
    pub source: AudioSource,
    pub start_at: Duration,
    pub autoplay: bool,
    pub target: LoadTarget,
}

impl LoadRequest {
    pub fn options(&self) -> LoadOptions {
        LoadOptions {
            start_at: self.start_at,
            autoplay: self.autoplay,
        }
    }
}

/// Adapter operation requested by the manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Release(HandleId),
    Load(LoadRequest),
    Play(HandleId),
    Pause(HandleId),
    Seek(HandleId, Duration),
}

#[derive(Debug, Clone, Copy)]
struct PendingLoad {
    token: LoadToken,
    target: LoadTarget,
    start_at: Duration,
    autoplay: bool,
}

/// Transport state machine
///
/// States: `Idle -> Loading -> Ready(playing|paused) -> (Ready|Loading)*`.
pub struct PlaybackManager {
    config: PlaybackConfig,
    playlist: Playlist,

    phase: TransportPhase,
    position: Duration,
    duration: Duration,

    /// Dragged position while a scrub is in progress
    scrub: Option<Duration>,

    shuffle: bool,
    repeat: RepeatMode,
    history: History,
    rng: StdRng,

    next_token: u64,
    pending: Option<PendingLoad>,

    /// Loaded main handle (playlist track or one-off)
    main: Option<HandleId>,

    overlay: Overlay,

    /// Remote preview loaded outside the playlist
    one_off: Option<Track>,

    /// Track end already handled for the current load
    end_handled: bool,

    events: Vec<PlaybackEvent>,
}

impl PlaybackManager {
    pub fn new(tracks: Vec<Track>, config: PlaybackConfig) -> Self {
        Self::with_rng(tracks, config, StdRng::from_entropy())
    }

    /// Deterministic shuffle, for tests and replays
    pub fn with_seed(tracks: Vec<Track>, config: PlaybackConfig, seed: u64) -> Self {
        Self::with_rng(tracks, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(tracks: Vec<Track>, config: PlaybackConfig, rng: StdRng) -> Self {
        Self {
            history: History::new(config.history_size),
            shuffle: config.shuffle,
            repeat: config.repeat,
            config,
            playlist: Playlist::new(tracks),
            phase: TransportPhase::Idle,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            scrub: None,
            rng,
            next_token: 0,
            pending: None,
            main: None,
            overlay: Overlay::default(),
            one_off: None,
            end_handled: false,
            events: Vec::new(),
        }
    }

    // ===== Transport =====

    /// Load a playlist track and start playing it
    ///
    /// Supersedes any load still in flight.
    pub fn load_track(&mut self, index: usize) -> Result<Vec<Directive>> {
        if self.playlist.is_empty() {
            return Err(PlaybackError::PlaylistEmpty);
        }
        if index >= self.playlist.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }

        let mut directives = self.release_handles();
        self.one_off = None;
        let track = self.playlist.select(index)?.clone();

        info!(index, track = %track.id, "Loading track");
        self.events.push(PlaybackEvent::TrackChanged {
            index: Some(index),
            track_id: track.id.clone(),
        });
        directives.push(self.begin_load(LoadTarget::Main, track.source, Duration::ZERO, true));
        Ok(directives)
    }

    /// Load a track outside the playlist (remote preview)
    ///
    /// The playlist cursor is kept, so `next`/`previous` continue from it.
    pub fn load_one_off(&mut self, track: Track) -> Vec<Directive> {
        let mut directives = self.release_handles();

        info!(track = %track.id, "Loading one-off track");
        self.events.push(PlaybackEvent::TrackChanged {
            index: None,
            track_id: track.id.clone(),
        });
        let source = track.source.clone();
        self.one_off = Some(track);
        directives.push(self.begin_load(LoadTarget::Main, source, Duration::ZERO, true));
        directives
    }

    /// Ready(playing) <-> Ready(paused); no-op while idle or loading
    ///
    /// In ISO mode this controls the selected alternate.
    pub fn toggle_play_pause(&mut self) -> Vec<Directive> {
        let Some(handle) = self.audible_handle() else {
            return Vec::new();
        };

        match self.phase {
            TransportPhase::Playing => {
                self.set_phase(TransportPhase::Paused);
                vec![Directive::Pause(handle)]
            }
            TransportPhase::Paused => {
                self.set_phase(TransportPhase::Playing);
                vec![Directive::Play(handle)]
            }
            TransportPhase::Idle | TransportPhase::Loading => Vec::new(),
        }
    }

    /// Seek the audible handle
    ///
    /// In ISO mode the saved playhead moves too, so the next alternate (or
    /// the main track on exit) resumes from here.
    pub fn seek(&mut self, position: Duration) -> Result<Vec<Directive>> {
        let position = self.clamp(position);

        if self.overlay.is_active() {
            self.overlay.set_paused_position(position);
            if self.phase != TransportPhase::Loading {
                self.position = position;
                self.push_position();
            }
            return Ok(self
                .overlay
                .handle()
                .map(|h| vec![Directive::Seek(h, position)])
                .unwrap_or_default());
        }

        let Some(handle) = self.main.filter(|_| self.phase.is_ready()) else {
            return Err(PlaybackError::NoTrackLoaded);
        };

        debug!(position_ms = position.as_millis() as u64, "Seek");
        self.position = position;
        self.end_handled = false;
        self.push_position();
        Ok(vec![Directive::Seek(handle, position)])
    }

    /// Start dragging the playhead; polls are ignored until commit
    pub fn begin_scrub(&mut self) {
        if self.audible_handle().is_some() && self.scrub.is_none() {
            self.scrub = Some(self.position);
        }
    }

    /// Move the dragged position (display only)
    pub fn update_scrub(&mut self, position: Duration) {
        if self.scrub.is_some() {
            let position = self.clamp(position);
            self.scrub = Some(position);
            self.position = position;
        }
    }

    /// Release the drag: the single backend seek for the whole gesture
    pub fn commit_scrub(&mut self) -> Vec<Directive> {
        let Some(position) = self.scrub.take() else {
            return Vec::new();
        };
        self.seek(position).unwrap_or_default()
    }

    /// Advance to the next track
    ///
    /// Sequential traversal that wraps with repeat off pauses at the end
    /// instead of reloading index 0.
    pub fn next(&mut self) -> Result<Vec<Directive>> {
        let (len, current) = self.cursor()?;

        if self.shuffle {
            let target = shuffle::pick_next(len, current, &mut self.rng);
            self.history.push(current);
            debug!(from = current, to = target, "Shuffle next");
            return self.load_track(target);
        }

        let target = (current + 1) % len;
        if target == 0 && self.repeat == RepeatMode::Off {
            return Ok(self.pause_at_end(current));
        }
        self.load_track(target)
    }

    /// Go back: pop shuffle history, otherwise step back with wraparound
    pub fn previous(&mut self) -> Result<Vec<Directive>> {
        let (len, current) = self.cursor()?;

        if self.shuffle {
            if let Some(index) = self.history.pop() {
                return self.load_track(index);
            }
        }
        self.load_track((current + len - 1) % len)
    }

    /// Handle the end of the current track
    ///
    /// Repeat one reloads the same track from the start; otherwise behaves
    /// like [`next`](Self::next). An alternate ending in ISO mode just pauses.
    pub fn on_track_end(&mut self) -> Result<Vec<Directive>> {
        self.end_handled = true;

        if self.overlay.is_active() {
            self.set_phase(TransportPhase::Paused);
            return Ok(Vec::new());
        }

        if self.repeat == RepeatMode::One {
            if let Some(track) = self.one_off.clone() {
                return Ok(self.load_one_off(track));
            }
            let (_, current) = self.cursor()?;
            return self.load_track(current);
        }

        self.next()
    }

    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.shuffle);
    }

    /// Set shuffle; turning it on starts a fresh history
    ///
    /// Turning it off leaves the cursor where it is: tracks are never
    /// permuted, so it already points into listing order.
    pub fn set_shuffle(&mut self, enabled: bool) {
        if enabled && !self.shuffle {
            self.history.clear();
        }
        if enabled != self.shuffle {
            self.shuffle = enabled;
            self.events.push(PlaybackEvent::ShuffleChanged { enabled });
        }
    }

    /// Cycle Off -> All -> One -> Off
    pub fn toggle_repeat(&mut self) {
        self.set_repeat(self.repeat.cycle());
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        if mode != self.repeat {
            self.repeat = mode;
            self.events.push(PlaybackEvent::RepeatChanged { mode });
        }
    }

    /// Release everything and return to idle, keeping the cursor
    pub fn stop(&mut self) -> Vec<Directive> {
        let directives = self.release_handles();
        self.one_off = None;
        self.scrub = None;
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.set_phase(TransportPhase::Idle);
        directives
    }

    /// Swap the active playlist (e.g. playing from favorites)
    pub fn replace_playlist(&mut self, tracks: Vec<Track>) -> Vec<Directive> {
        let directives = self.stop();
        info!(tracks = tracks.len(), "Replacing playlist");
        self.playlist = Playlist::new(tracks);
        self.history.clear();
        directives
    }

    // ===== ISO overlay =====

    /// Suspend the main transport and capture its playhead
    ///
    /// Poll the main handle first so the captured position is fresh.
    pub fn enter_overlay(&mut self) -> Result<Vec<Directive>> {
        if self.overlay.is_active() {
            return Ok(Vec::new());
        }
        let Some(handle) = self.main.filter(|_| self.phase.is_ready()) else {
            return Err(PlaybackError::NoTrackLoaded);
        };

        self.scrub = None;
        self.overlay.enter(self.position);
        info!(
            position_ms = self.position.as_millis() as u64,
            "Entering ISO mode"
        );
        self.push_overlay();

        let directives = if self.phase == TransportPhase::Playing {
            vec![Directive::Pause(handle)]
        } else {
            Vec::new()
        };
        self.set_phase(TransportPhase::Paused);
        Ok(directives)
    }

    /// Swap the audible source for an alternate at the saved playhead
    pub fn select_alternate(&mut self, id: &str) -> Result<Vec<Directive>> {
        if !self.overlay.is_active() {
            return Err(PlaybackError::OverlayInactive);
        }
        let track = self.current_track().ok_or(PlaybackError::NoTrackLoaded)?;
        let alternate = track
            .alternate(id)
            .ok_or_else(|| PlaybackError::UnknownAlternate(id.to_string()))?
            .clone();

        let mut directives = Vec::new();
        if let Some(handle) = self.overlay.take_handle() {
            directives.push(Directive::Release(handle));
        }
        if let Some(handle) = self.main.take() {
            directives.push(Directive::Release(handle));
        }

        self.overlay.select(&alternate.id);
        debug!(alternate = %alternate.id, "Selecting alternate");
        self.push_overlay();

        let start_at = self.overlay.paused_position();
        directives.push(self.begin_load(LoadTarget::Alternate, alternate.source, start_at, true));
        Ok(directives)
    }

    /// Leave ISO mode and resume the main track from the saved playhead
    pub fn exit_overlay(&mut self) -> Result<Vec<Directive>> {
        if !self.overlay.is_active() {
            return Err(PlaybackError::OverlayInactive);
        }

        let resume_at = self.overlay.paused_position();
        let mut directives = Vec::new();
        if let Some(handle) = self.overlay.exit() {
            directives.push(Directive::Release(handle));
        }
        if matches!(self.pending, Some(p) if p.target == LoadTarget::Alternate) {
            // Resolves as superseded and gets released
            self.pending = None;
        }
        info!(position_ms = resume_at.as_millis() as u64, "Leaving ISO mode");
        self.push_overlay();

        if let Some(handle) = self.main {
            // No alternate was selected, main is still held
            self.position = resume_at;
            self.set_phase(TransportPhase::Playing);
            directives.push(Directive::Seek(handle, resume_at));
            directives.push(Directive::Play(handle));
            return Ok(directives);
        }

        match self.current_track().map(|t| t.source.clone()) {
            Some(source) => {
                directives.push(self.begin_load(LoadTarget::Main, source, resume_at, true));
            }
            None => self.set_phase(TransportPhase::Idle),
        }
        Ok(directives)
    }

    // ===== Driver feedback =====

    /// Feed back the result of a `Directive::Load`
    ///
    /// A result for a superseded token is dropped; a handle it produced is
    /// returned as a `Release` directive.
    ///
    /// A failed load leaves the transport `Idle` with position and duration
    /// zeroed, whatever phase preceded it. It does not fall back to the prior
    /// `Ready`/`Idle` state: the audible handle was released before the load
    /// was issued, so there is nothing left to resume. The current index is
    /// kept and the load is not retried.
    pub fn complete_load(
        &mut self,
        token: LoadToken,
        result: Result<HandleId>,
    ) -> Vec<Directive> {
        let pending = match self.pending {
            Some(p) if p.token == token => p,
            _ => {
                return match result {
                    Ok(handle) => {
                        debug!(%handle, "Releasing superseded load");
                        vec![Directive::Release(handle)]
                    }
                    Err(e) => {
                        debug!(error = %e, "Superseded load failed");
                        Vec::new()
                    }
                };
            }
        };
        self.pending = None;

        let mut directives = Vec::new();
        match result {
            Ok(handle) => {
                let mut start_at = pending.start_at;
                match pending.target {
                    LoadTarget::Main => self.main = Some(handle),
                    LoadTarget::Alternate => {
                        self.overlay.set_handle(handle);
                        // Seeked while the alternate was loading
                        let resume = self.overlay.paused_position();
                        if resume != start_at {
                            start_at = resume;
                            directives.push(Directive::Seek(handle, resume));
                        }
                    }
                }
                self.duration = self
                    .current_track()
                    .filter(|_| pending.target == LoadTarget::Main)
                    .and_then(|t| t.duration)
                    .unwrap_or(Duration::ZERO);
                self.position = self.clamp(start_at);
                debug!(%handle, target = ?pending.target, "Load complete");
                self.set_phase(if pending.autoplay {
                    TransportPhase::Playing
                } else {
                    TransportPhase::Paused
                });
            }
            Err(e) => {
                warn!(error = %e, "Load failed");
                self.events.push(PlaybackEvent::Error {
                    message: e.to_string(),
                });
                self.position = Duration::ZERO;
                self.duration = Duration::ZERO;
                self.set_phase(TransportPhase::Idle);
            }
        }
        directives
    }

    /// Feed back a status poll
    ///
    /// Ignored while scrubbing or when the handle is no longer audible.
    /// Returns the track-end directives when the end tolerance is reached.
    pub fn apply_status(&mut self, handle: HandleId, status: HandleStatus) -> Vec<Directive> {
        if self.scrub.is_some() || self.audible_handle() != Some(handle) {
            return Vec::new();
        }

        self.duration = status.duration;
        self.position = status.position.min(status.duration);
        if self.overlay.is_active() {
            self.overlay.set_paused_position(self.position);
        }
        self.push_position();

        let ended = status.duration > Duration::ZERO
            && self.position >= status.duration.saturating_sub(self.config.end_tolerance());
        if ended && !self.end_handled {
            debug!(%handle, "Track end reached");
            return self.on_track_end().unwrap_or_else(|e| {
                warn!(error = %e, "Track end handling failed");
                Vec::new()
            });
        }
        Vec::new()
    }

    /// Record a failed adapter call as a one-shot error
    pub fn report_error(&mut self, error: &PlaybackError) {
        self.events.push(PlaybackEvent::Error {
            message: error.to_string(),
        });
    }

    /// Drain events produced since the last call
    pub fn take_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== Queries =====

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn phase(&self) -> TransportPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == TransportPhase::Playing
    }

    pub fn is_loading(&self) -> bool {
        self.phase == TransportPhase::Loading
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn current_index(&self) -> Option<usize> {
        self.playlist.current_index()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrub.is_some()
    }

    /// Track behind the main transport: the one-off if loaded, else the cursor
    pub fn current_track(&self) -> Option<&Track> {
        self.one_off.as_ref().or_else(|| self.playlist.current())
    }

    /// The handle that should be producing sound
    pub fn audible_handle(&self) -> Option<HandleId> {
        if self.overlay.is_active() {
            self.overlay.handle()
        } else {
            self.main
        }
    }

    /// Handle the driver should poll on its next tick
    pub fn pollable_handle(&self) -> Option<HandleId> {
        if self.phase != TransportPhase::Playing || self.scrub.is_some() {
            return None;
        }
        self.audible_handle()
    }

    /// Every handle the manager currently holds
    pub fn held_handles(&self) -> Vec<HandleId> {
        self.main.into_iter().chain(self.overlay.handle()).collect()
    }

    pub fn snapshot(&self) -> TransportSnapshot {
        TransportSnapshot {
            phase: self.phase,
            current_index: self.playlist.current_index(),
            track: self.current_track().cloned(),
            position: self.position,
            duration: self.duration,
            is_scrubbing: self.scrub.is_some(),
            shuffle: self.shuffle,
            repeat: self.repeat,
            history_len: self.history.len(),
            one_off: self.one_off.is_some(),
            overlay: self.overlay.snapshot(),
        }
    }

    // ===== Internals =====

    fn cursor(&self) -> Result<(usize, usize)> {
        let current = self
            .playlist
            .current_index()
            .ok_or(PlaybackError::PlaylistEmpty)?;
        Ok((self.playlist.len(), current))
    }

    fn begin_load(
        &mut self,
        target: LoadTarget,
        source: AudioSource,
        start_at: Duration,
        autoplay: bool,
    ) -> Directive {
        self.next_token += 1;
        let token = LoadToken(self.next_token);
        if self.pending.is_some() {
            debug!("Superseding load in flight");
        }
        self.pending = Some(PendingLoad {
            token,
            target,
            start_at,
            autoplay,
        });

        self.scrub = None;
        self.end_handled = false;
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.set_phase(TransportPhase::Loading);

        Directive::Load(LoadRequest {
            token,
            source,
            start_at,
            autoplay,
            target,
        })
    }

    /// Release main and alternate handles and leave the overlay
    fn release_handles(&mut self) -> Vec<Directive> {
        let mut directives = Vec::new();
        let was_active = self.overlay.is_active();
        if let Some(handle) = self.overlay.exit() {
            directives.push(Directive::Release(handle));
        }
        if was_active {
            self.push_overlay();
        }
        if let Some(handle) = self.main.take() {
            directives.push(Directive::Release(handle));
        }
        // Anything still loading resolves as superseded
        self.pending = None;
        directives
    }

    fn pause_at_end(&mut self, index: usize) -> Vec<Directive> {
        info!(index, "End of playlist, repeat off");
        self.events.push(PlaybackEvent::ReachedEnd { index });
        self.scrub = None;

        let handle = self.audible_handle();
        match (self.phase, handle) {
            (TransportPhase::Playing, Some(handle)) => {
                self.set_phase(TransportPhase::Paused);
                vec![Directive::Pause(handle)]
            }
            _ => Vec::new(),
        }
    }

    fn clamp(&self, position: Duration) -> Duration {
        if self.duration > Duration::ZERO {
            position.min(self.duration)
        } else {
            position
        }
    }

    fn set_phase(&mut self, phase: TransportPhase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "Transport phase");
            self.phase = phase;
            self.events.push(PlaybackEvent::StateChanged { phase });
        }
    }

    fn push_position(&mut self) {
        self.events.push(PlaybackEvent::PositionChanged {
            position_ms: self.position.as_millis() as u64,
            duration_ms: self.duration.as_millis() as u64,
        });
    }

    fn push_overlay(&mut self) {
        self.events.push(PlaybackEvent::OverlayChanged {
            active: self.overlay.is_active(),
            alternate: self.overlay.selected().map(str::to_string),
        });
    }
}

impl Default for PlaybackManager {
    fn default() -> Self {
        Self::new(Vec::new(), PlaybackConfig::default())
    }
}
