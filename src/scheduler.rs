//! Animation-frame loop gated by game mode
//!
//! While the mode simulates, exactly one frame request is kept pending. In
//! any other mode the pending request is cancelled and the caller draws a
//! single static frame. Once closed, the scheduler never requests again.

use crate::sim::GameMode;

/// Something that can schedule a one-shot frame callback
pub trait FrameSource {
    type Handle;

    /// Request the next frame; `None` if the platform refused
    fn request(&mut self) -> Option<Self::Handle>;

    fn cancel(&mut self, handle: Self::Handle);
}

/// What the caller should do after a mode observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAction {
    /// A frame is pending; draw happens in the callback
    Loop,
    /// Loop is stopped; draw once now
    DrawOnce,
    /// Scheduler is closed; do nothing
    Idle,
}

pub struct FrameScheduler<S: FrameSource> {
    source: S,
    pending: Option<S::Handle>,
    closed: bool,
}

impl<S: FrameSource> FrameScheduler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pending: None,
            closed: false,
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// React to the current mode (mount, or any UI-driven transition)
    pub fn observe(&mut self, mode: GameMode) -> FrameAction {
        if self.closed {
            FrameAction::Idle
        } else if mode.simulates() {
            self.ensure_pending();
            FrameAction::Loop
        } else {
            self.stop();
            FrameAction::DrawOnce
        }
    }

    /// Call at the end of a frame callback with the mode after the update.
    ///
    /// The request that fired is consumed; a new one is made only if the
    /// mode still simulates.
    pub fn on_frame(&mut self, mode: GameMode) -> FrameAction {
        self.pending = None;
        if self.closed {
            FrameAction::Idle
        } else if mode.simulates() {
            self.ensure_pending();
            FrameAction::Loop
        } else {
            FrameAction::DrawOnce
        }
    }

    /// Cancel the pending request, if any
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.source.cancel(handle);
        }
    }

    /// Stop for good (view teardown)
    pub fn close(&mut self) {
        self.stop();
        self.closed = true;
    }

    fn ensure_pending(&mut self) {
        if self.pending.is_some() {
            return;
        }
        self.pending = self.source.request();
        if self.pending.is_none() {
            log::warn!("Animation frame request failed");
        }
    }
}

impl<S: FrameSource> Drop for FrameScheduler<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
