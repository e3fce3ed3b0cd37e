//! ISO overlay state
//!
//! Holds the saved playhead and the alternate handle while the main
//! transport is suspended. The manager drives the transitions.

use crate::backend::HandleId;
use crate::types::OverlaySnapshot;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Overlay {
    active: bool,

    /// Playhead every alternate resumes from
    paused_position: Duration,

    /// Id of the selected alternate
    selected: Option<String>,

    /// Loaded alternate handle
    handle: Option<HandleId>,
}

impl Overlay {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn paused_position(&self) -> Duration {
        self.paused_position
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn handle(&self) -> Option<HandleId> {
        self.handle
    }

    pub(crate) fn enter(&mut self, position: Duration) {
        self.active = true;
        self.paused_position = position;
        self.selected = None;
        self.handle = None;
    }

    pub(crate) fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    pub(crate) fn set_handle(&mut self, handle: HandleId) {
        self.handle = Some(handle);
    }

    pub(crate) fn take_handle(&mut self) -> Option<HandleId> {
        self.handle.take()
    }

    pub(crate) fn set_paused_position(&mut self, position: Duration) {
        self.paused_position = position;
    }

    /// Leave the overlay, returning any alternate handle still held
    pub(crate) fn exit(&mut self) -> Option<HandleId> {
        let handle = self.handle.take();
        self.active = false;
        self.selected = None;
        handle
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            active: self.active,
            paused_position: self.paused_position,
            active_alternate: self.selected.clone(),
        }
    }
}
