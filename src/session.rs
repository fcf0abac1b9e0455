//! State shared by the two controllers for the duration of one event.

use std::time::Duration;

use crate::config::EngineConfig;
use crate::document::{AnchorId, Document};
use crate::geometry::Size;
use crate::lifecycle::LifecycleGuard;
use crate::portal::Measure;
use crate::timer::{TimerHandle, TimerQueue};

/// Payload of every timer the engine schedules. Each one is owned by exactly
/// one controller state and cancelled when that state is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    ShowTooltip(AnchorId),
    HideTooltip(AnchorId),
}

pub struct SessionCtx<'a> {
    pub doc: &'a Document,
    pub config: &'a EngineConfig,
    pub measure: &'a dyn Measure,
    pub guard: &'a mut LifecycleGuard,
    pub timers: &'a mut TimerQueue<TimerEvent>,
    pub viewport: Size,
    pub now: Duration,
}

impl SessionCtx<'_> {
    pub fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle {
        self.timers.schedule(self.now, delay, event)
    }
}
