//! Reposition Scheduler.
//!
//! Subscribed only while a floating element is shown. Scroll and resize
//! notifications set a pending flag; the host's frame callback consumes it,
//! so a burst of events within one frame results in a single placement.

use crate::document::{AnchorId, Document, PanelId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollSource {
    Viewport,
    Panel(PanelId),
}

/// Scroll sources that can move `anchor`: the viewport plus its panel when
/// that panel scrolls.
pub fn sources_for(doc: &Document, anchor: AnchorId) -> Vec<ScrollSource> {
    let mut sources = vec![ScrollSource::Viewport];
    if let Some(panel) = doc.anchor(anchor).and_then(|a| a.panel)
        && doc.panel(panel).is_some_and(|p| p.scrollable)
    {
        sources.push(ScrollSource::Panel(panel));
    }
    sources
}

#[derive(Debug, Default, Clone)]
pub struct RepositionScheduler {
    sources: Vec<ScrollSource>,
    pending: bool,
}

impl RepositionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all subscriptions. Whatever the previous session subscribed
    /// to is dropped first.
    pub fn activate(&mut self, sources: Vec<ScrollSource>) {
        self.deactivate();
        self.sources = sources;
    }

    pub fn deactivate(&mut self) {
        self.sources.clear();
        self.pending = false;
    }

    pub fn is_active(&self) -> bool {
        !self.sources.is_empty()
    }

    pub fn subscription_count(&self) -> usize {
        self.sources.len()
    }

    pub fn is_subscribed(&self, source: ScrollSource) -> bool {
        self.sources.contains(&source)
    }

    /// Record a scroll/resize. Returns whether it was relevant.
    pub fn notify(&mut self, source: ScrollSource) -> bool {
        if !self.is_subscribed(source) {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending flag; true at most once per frame.
    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
