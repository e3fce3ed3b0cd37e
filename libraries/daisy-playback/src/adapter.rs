//! Playback adapter
//!
//! Wraps an [`AudioBackend`] and enforces the handle rules the transport
//! relies on:
//! - At most one active handle; adopting a new one releases the previous one
//! - `play`/`pause` are idempotent and reject released handles
//! - `seek` clamps to the known duration and never surfaces failures
//! - Releasing twice is a no-op
//!
//! The adapter only remembers the active handle. Whether any other handle is
//! still live is the backend's answer: operations on a released handle fail
//! with [`PlaybackError::HandleReleased`].

use crate::backend::{AudioBackend, HandleId, HandleStatus, LoadOptions};
use crate::error::{PlaybackError, Result};
use daisy_core::AudioSource;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct PlaybackAdapter {
    backend: Arc<dyn AudioBackend>,

    /// Handle currently owned by the transport
    active: Option<HandleId>,
}

impl PlaybackAdapter {
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            backend,
            active: None,
        }
    }

    /// Currently active handle
    pub fn active(&self) -> Option<HandleId> {
        self.active
    }

    /// Start loading a source
    ///
    /// The returned future owns what it needs, so it can run on its own task
    /// while the caller keeps polling. The handle it yields is not held until
    /// it is passed to [`adopt`](Self::adopt).
    pub fn begin_load(
        &self,
        source: AudioSource,
        options: LoadOptions,
    ) -> impl Future<Output = Result<HandleId>> + Send + 'static {
        let backend = Arc::clone(&self.backend);
        async move {
            let handle = backend.load(&source, options).await?;
            debug!(%handle, %source, "Loaded source");
            Ok(handle)
        }
    }

    /// Take ownership of a loaded handle
    ///
    /// The previously active handle, if any, is released first, so only one
    /// stays held.
    pub async fn adopt(&mut self, handle: HandleId) {
        if let Some(previous) = self.active.take() {
            if previous != handle {
                debug!(%previous, %handle, "Releasing previous handle");
                self.release(previous).await;
            }
        }
        self.active = Some(handle);
    }

    pub async fn play(&mut self, handle: HandleId) -> Result<()> {
        if self.backend.poll_status(handle)?.is_playing {
            return Ok(());
        }
        self.backend.play(handle).await
    }

    pub async fn pause(&mut self, handle: HandleId) -> Result<()> {
        if !self.backend.poll_status(handle)?.is_playing {
            return Ok(());
        }
        self.backend.pause(handle).await
    }

    /// Seek, clamped to `[0, duration]`
    ///
    /// Failures (including a handle mid-teardown) are logged only.
    pub async fn seek(&mut self, handle: HandleId, position: Duration) {
        let target = match self.backend.poll_status(handle) {
            Ok(status) if status.duration > Duration::ZERO => position.min(status.duration),
            Ok(_) => position,
            Err(PlaybackError::HandleReleased(_)) => {
                debug!(%handle, "Ignoring seek on released handle");
                return;
            }
            Err(e) => {
                warn!(%handle, error = %e, "Seek skipped, status unavailable");
                return;
            }
        };

        if let Err(e) = self.backend.seek(handle, target).await {
            warn!(%handle, error = %e, "Seek failed");
        }
    }

    pub fn poll_status(&self, handle: HandleId) -> Result<HandleStatus> {
        self.backend.poll_status(handle)
    }

    /// Release a handle; releasing twice does nothing
    pub async fn release(&mut self, handle: HandleId) {
        if self.active == Some(handle) {
            self.active = None;
        }

        match self.backend.release(handle).await {
            Ok(()) => debug!(%handle, "Released handle"),
            Err(PlaybackError::HandleReleased(_)) => debug!(%handle, "Already released"),
            Err(e) => warn!(%handle, error = %e, "Release failed"),
        }
    }

    /// Release the active handle on teardown
    pub async fn release_all(&mut self) {
        if let Some(handle) = self.active.take() {
            self.release(handle).await;
        }
    }
}
