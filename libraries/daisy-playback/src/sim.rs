//! Simulated audio backend
//!
//! In-memory [`AudioBackend`] whose playhead advances with the tokio clock.
//! Used by the headless CLI and by tests (pair with
//! `#[tokio::test(start_paused = true)]` to control time).

use crate::backend::{AudioBackend, HandleId, HandleStatus, LoadOptions};
use crate::error::{PlaybackError, Result};
use async_trait::async_trait;
use daisy_core::AudioSource;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

const DEFAULT_DURATION: Duration = Duration::from_secs(180);

#[derive(Debug)]
struct SimHandle {
    source: AudioSource,
    duration: Duration,

    /// Position when playback last started or the playhead last moved
    base: Duration,

    /// Set while playing
    started: Option<Instant>,
}

impl SimHandle {
    fn position(&self) -> Duration {
        let elapsed = self.started.map(|s| s.elapsed()).unwrap_or_default();
        (self.base + elapsed).min(self.duration)
    }

    fn is_playing(&self) -> bool {
        self.started.is_some() && self.position() < self.duration
    }
}

#[derive(Debug, Default)]
struct SimState {
    next_id: u64,
    handles: HashMap<HandleId, SimHandle>,
    durations: HashMap<AudioSource, Duration>,
    latencies: HashMap<AudioSource, Duration>,
    unreachable: HashSet<AudioSource>,
    loads: Vec<AudioSource>,
}

/// Simulated platform player
#[derive(Debug, Default)]
pub struct SimulatedBackend {
    state: Mutex<SimState>,
    latency: Duration,
    default_duration: Option<Duration>,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every load by `latency`
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Length of sources without an explicit duration (default: 180s)
    #[must_use]
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = Some(duration);
        self
    }

    pub fn set_duration(&self, source: &AudioSource, duration: Duration) {
        self.lock().durations.insert(source.clone(), duration);
    }

    /// Override the load latency for one source
    pub fn set_latency(&self, source: &AudioSource, latency: Duration) {
        self.lock().latencies.insert(source.clone(), latency);
    }

    /// Make loads of `source` fail
    pub fn mark_unreachable(&self, source: &AudioSource) {
        self.lock().unreachable.insert(source.clone());
    }

    /// Handles loaded and not yet released
    pub fn live_handles(&self) -> usize {
        self.lock().handles.len()
    }

    /// Handles currently producing sound
    pub fn audible_handles(&self) -> usize {
        self.lock().handles.values().filter(|h| h.is_playing()).count()
    }

    /// Source behind a live handle
    pub fn source_of(&self, handle: HandleId) -> Option<AudioSource> {
        self.lock().handles.get(&handle).map(|h| h.source.clone())
    }

    /// Every source loaded so far, in request order
    pub fn load_log(&self) -> Vec<AudioSource> {
        self.lock().loads.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        // A poisoned lock only means a test panicked mid-update
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn with_handle<T>(&self, handle: HandleId, f: impl FnOnce(&mut SimHandle) -> T) -> Result<T> {
        let mut state = self.lock();
        let entry = state
            .handles
            .get_mut(&handle)
            .ok_or(PlaybackError::HandleReleased(handle))?;
        Ok(f(entry))
    }
}

#[async_trait]
impl AudioBackend for SimulatedBackend {
    async fn load(&self, source: &AudioSource, options: LoadOptions) -> Result<HandleId> {
        let latency = {
            let mut state = self.lock();
            state.loads.push(source.clone());
            state.latencies.get(source).copied().unwrap_or(self.latency)
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.lock();
        if state.unreachable.contains(source) {
            return Err(PlaybackError::load(source, "source unreachable"));
        }

        let duration = state
            .durations
            .get(source)
            .copied()
            .or(self.default_duration)
            .unwrap_or(DEFAULT_DURATION);
        state.next_id += 1;
        let id = HandleId(state.next_id);

        state.handles.insert(
            id,
            SimHandle {
                source: source.clone(),
                duration,
                base: options.start_at.min(duration),
                started: options.autoplay.then(Instant::now),
            },
        );
        debug!(handle = %id, %source, "Simulated load");
        Ok(id)
    }

    async fn play(&self, handle: HandleId) -> Result<()> {
        self.with_handle(handle, |h| {
            if h.started.is_none() {
                h.started = Some(Instant::now());
            }
        })
    }

    async fn pause(&self, handle: HandleId) -> Result<()> {
        self.with_handle(handle, |h| {
            h.base = h.position();
            h.started = None;
        })
    }

    async fn seek(&self, handle: HandleId, position: Duration) -> Result<()> {
        self.with_handle(handle, |h| {
            h.base = position.min(h.duration);
            if h.started.is_some() {
                h.started = Some(Instant::now());
            }
        })
    }

    async fn release(&self, handle: HandleId) -> Result<()> {
        self.lock().handles.remove(&handle);
        Ok(())
    }

    fn poll_status(&self, handle: HandleId) -> Result<HandleStatus> {
        self.with_handle(handle, |h| HandleStatus {
            position: h.position(),
            duration: h.duration,
            is_playing: h.is_playing(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> AudioSource {
        AudioSource::asset("audio/daisies.mp3")
    }

    #[tokio::test(start_paused = true)]
    async fn playhead_follows_clock() {
        let backend = SimulatedBackend::new();
        let handle = backend
            .load(
                &source(),
                LoadOptions {
                    start_at: Duration::from_secs(5),
                    autoplay: true,
                },
            )
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(3)).await;
        let status = backend.poll_status(handle).unwrap();
        assert_eq!(status.position, Duration::from_secs(8));
        assert!(status.is_playing);

        backend.pause(handle).await.unwrap();
        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(
            backend.poll_status(handle).unwrap().position,
            Duration::from_secs(8)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stops_at_end() {
        let backend = SimulatedBackend::new().with_default_duration(Duration::from_secs(10));
        let handle = backend
            .load(
                &source(),
                LoadOptions {
                    start_at: Duration::ZERO,
                    autoplay: true,
                },
            )
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(12)).await;
        let status = backend.poll_status(handle).unwrap();
        assert_eq!(status.position, Duration::from_secs(10));
        assert!(!status.is_playing);
        assert_eq!(backend.audible_handles(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn release_frees_handle() {
        let backend = SimulatedBackend::new();
        let handle = backend.load(&source(), LoadOptions::default()).await.unwrap();
        assert_eq!(backend.live_handles(), 1);

        backend.release(handle).await.unwrap();
        assert_eq!(backend.live_handles(), 0);
        assert!(backend.poll_status(handle).is_err());
    }
}
