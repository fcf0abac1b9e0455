//! Hover-Intent State Machine for tooltips.
//!
//! ```text
//! Idle --enter--> Pending --timer--> Shown --leave--> Hiding --timer--> Idle
//!                    |                 ^                 |
//!                    +--leave--> Idle  +----re-enter-----+
//! ```
//!
//! Every timer handle lives inside the state that owns it and is cancelled
//! on every transition out of that state. Enter events are last-write-wins:
//! a newer anchor always supersedes a pending one.

use std::time::Duration;

use crate::document::{AnchorId, AnchorKind, Mutation};
use crate::error::FloatError;
use crate::layout::compute_placement;
use crate::portal::{FloatingKind, PortalContent, PortalHost};
use crate::scheduler::{RepositionScheduler, ScrollSource, sources_for};
use crate::session::{SessionCtx, TimerEvent};
use crate::timer::{TimerHandle, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipState {
    Idle,
    Pending { anchor: AnchorId, timer: TimerHandle },
    Shown { anchor: AnchorId },
    Hiding { anchor: AnchorId, timer: TimerHandle },
}

impl TooltipState {
    pub fn anchor(&self) -> Option<AnchorId> {
        match *self {
            TooltipState::Idle => None,
            TooltipState::Pending { anchor, .. }
            | TooltipState::Shown { anchor }
            | TooltipState::Hiding { anchor, .. } => Some(anchor),
        }
    }

    fn timer(&self) -> Option<TimerHandle> {
        match *self {
            TooltipState::Pending { timer, .. } | TooltipState::Hiding { timer, .. } => Some(timer),
            TooltipState::Idle | TooltipState::Shown { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TooltipStats {
    pub shows: u64,
    pub placements: u64,
    pub aborted: u64,
}

#[derive(Debug)]
pub struct TooltipController {
    state: TooltipState,
    host: PortalHost,
    scheduler: RepositionScheduler,
    stats: TooltipStats,
}

impl Default for TooltipController {
    fn default() -> Self {
        Self::new()
    }
}

impl TooltipController {
    pub fn new() -> Self {
        Self {
            state: TooltipState::Idle,
            host: PortalHost::new(FloatingKind::Tooltip),
            scheduler: RepositionScheduler::new(),
            stats: TooltipStats::default(),
        }
    }

    pub fn state(&self) -> TooltipState {
        self.state
    }

    pub fn host(&self) -> &PortalHost {
        &self.host
    }

    pub fn scheduler(&self) -> &RepositionScheduler {
        &self.scheduler
    }

    pub fn stats(&self) -> TooltipStats {
        self.stats
    }

    pub fn anchor(&self) -> Option<AnchorId> {
        self.state.anchor()
    }

    pub fn pointer_enter(&mut self, cx: &mut SessionCtx<'_>, anchor: AnchorId) {
        let delay = cx.doc.anchor(anchor).and_then(|a| cx.config.show_delay(a));
        match (self.state, delay) {
            (TooltipState::Idle, Some(delay)) => self.begin_pending(cx, anchor, delay),
            (TooltipState::Idle, None) => {}
            (TooltipState::Pending { anchor: current, .. }, _) if current == anchor => {}
            (TooltipState::Pending { timer, .. }, delay) => {
                cx.timers.cancel(timer);
                self.state = TooltipState::Idle;
                if let Some(delay) = delay {
                    self.begin_pending(cx, anchor, delay);
                }
            }
            (TooltipState::Shown { anchor: current }, _) if current == anchor => {}
            (TooltipState::Shown { .. }, Some(_)) => self.show_now(cx, anchor),
            (TooltipState::Shown { anchor: current }, None) => self.begin_hiding(cx, current),
            (TooltipState::Hiding { anchor: current, timer }, _) if current == anchor => {
                cx.timers.cancel(timer);
                self.state = TooltipState::Shown { anchor };
            }
            (TooltipState::Hiding { timer, .. }, Some(_)) => {
                cx.timers.cancel(timer);
                self.show_now(cx, anchor);
            }
            (TooltipState::Hiding { .. }, None) => {}
        }
    }

    pub fn pointer_leave(&mut self, cx: &mut SessionCtx<'_>, anchor: AnchorId) {
        match self.state {
            TooltipState::Pending {
                anchor: current,
                timer,
            } if current == anchor => {
                cx.timers.cancel(timer);
                self.state = TooltipState::Idle;
            }
            TooltipState::Shown { anchor: current } if current == anchor => {
                self.begin_hiding(cx, current);
            }
            _ => {}
        }
    }

    pub fn on_timer(&mut self, cx: &mut SessionCtx<'_>, handle: TimerHandle, event: TimerEvent) {
        if self.state.timer() != Some(handle) {
            tracing::warn!(?event, "ignoring tooltip timer that outlived its state");
            return;
        }
        match (self.state, event) {
            (TooltipState::Pending { anchor, .. }, TimerEvent::ShowTooltip(target))
                if anchor == target =>
            {
                self.state = TooltipState::Idle;
                self.show_now(cx, anchor);
            }
            (TooltipState::Hiding { anchor, .. }, TimerEvent::HideTooltip(target))
                if anchor == target =>
            {
                self.close(cx.timers);
            }
            _ => {}
        }
    }

    /// Record a scroll/resize for the next frame.
    pub fn notify(&mut self, source: ScrollSource) -> bool {
        self.scheduler.notify(source)
    }

    /// Frame callback: recompute placement once if anything moved.
    pub fn reposition(&mut self, cx: &mut SessionCtx<'_>) {
        if !self.scheduler.take_frame() {
            return;
        }
        let anchor = match self.state {
            TooltipState::Shown { anchor } | TooltipState::Hiding { anchor, .. } => anchor,
            TooltipState::Idle | TooltipState::Pending { .. } => return,
        };
        if let Err(err) = self.place(cx, anchor) {
            self.abort(cx, err);
            return;
        }
        if matches!(self.state, TooltipState::Shown { .. }) && !cx.doc.is_visible_in_panel(anchor)
        {
            tracing::debug!(?anchor, "anchor scrolled out of view");
            self.begin_hiding(cx, anchor);
        }
    }

    pub fn on_mutations(&mut self, cx: &mut SessionCtx<'_>, records: &[Mutation]) {
        if let Some(anchor) = self.anchor()
            && cx.guard.must_close(cx.doc, records, anchor)
        {
            self.close(cx.timers);
        }
    }

    /// Cancel every timer, hide the host and return to `Idle`.
    pub fn close(&mut self, timers: &mut TimerQueue<TimerEvent>) {
        if let Some(timer) = self.state.timer() {
            timers.cancel(timer);
        }
        if self.state != TooltipState::Idle {
            tracing::debug!(anchor = ?self.state.anchor(), "tooltip closed");
        }
        self.state = TooltipState::Idle;
        self.scheduler.deactivate();
        self.host.hide();
    }

    fn begin_pending(&mut self, cx: &mut SessionCtx<'_>, anchor: AnchorId, delay: Duration) {
        let timer = cx.schedule(delay, TimerEvent::ShowTooltip(anchor));
        self.state = TooltipState::Pending { anchor, timer };
    }

    fn begin_hiding(&mut self, cx: &mut SessionCtx<'_>, anchor: AnchorId) {
        let grace = cx.config.hide_grace;
        let timer = cx.schedule(grace, TimerEvent::HideTooltip(anchor));
        self.state = TooltipState::Hiding { anchor, timer };
    }

    /// Controller boundary of the show path: any failure becomes a silent close.
    fn show_now(&mut self, cx: &mut SessionCtx<'_>, anchor: AnchorId) {
        match self.place(cx, anchor) {
            Ok(()) => {
                self.stats.shows += 1;
                self.state = TooltipState::Shown { anchor };
                self.scheduler.activate(sources_for(cx.doc, anchor));
                tracing::debug!(?anchor, "tooltip shown");
            }
            Err(err) => self.abort(cx, err),
        }
    }

    fn abort(&mut self, cx: &mut SessionCtx<'_>, err: FloatError) {
        self.stats.aborted += 1;
        tracing::debug!(error = %err, "tooltip aborted");
        self.close(cx.timers);
    }

    /// Two-pass render: content in, measured off-screen, placed, revealed.
    fn place(&mut self, cx: &mut SessionCtx<'_>, anchor_id: AnchorId) -> Result<(), FloatError> {
        let doc = cx.doc;
        cx.guard.ensure_attached(doc, anchor_id)?;
        let anchor = doc
            .anchor(anchor_id)
            .ok_or(FloatError::AnchorDetached(anchor_id))?;
        let container = anchor
            .panel
            .and_then(|panel| doc.panel(panel))
            .map(|panel| panel.bounds);
        let options = cx
            .config
            .placement_options(anchor.kind, container)
            .ok_or(FloatError::Unsupported(anchor_id, "tooltip"))?;
        let target = match anchor.kind {
            AnchorKind::IconOnly => doc.target_bounds(anchor_id),
            _ => doc.viewport_bounds(anchor_id),
        }
        .ok_or(FloatError::AnchorDetached(anchor_id))?;
        if !target.is_finite() {
            return Err(FloatError::NonFinite(anchor_id));
        }

        let content = PortalContent::Tooltip {
            label: anchor.label.clone(),
            secondary: anchor.secondary.clone(),
        };
        let size = self.host.render(content, cx.measure);
        if !size.is_measured() {
            return Err(FloatError::ZeroSize {
                width: size.width,
                height: size.height,
            });
        }
        let result = compute_placement(target, size, cx.viewport, &options);
        self.host.place(&result);
        self.host.reveal();
        self.stats.placements += 1;
        Ok(())
    }
}
