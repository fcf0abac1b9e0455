//! Lifecycle Guard.
//!
//! The page never tells the engine that an anchor is going away; the guard
//! infers it from structural mutation records and from explicit navigation
//! signals. All attachment checks go through here so cleanup has one home.

use crate::document::{AnchorId, Document, Mutation};
use crate::error::FloatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Attached,
    AnchorDetached,
    PanelDetached,
}

impl Liveness {
    pub fn is_attached(self) -> bool {
        self == Liveness::Attached
    }
}

/// Signals that replace anchors wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Navigation,
    ContentLoaded,
}

#[derive(Debug, Default, Clone)]
pub struct LifecycleGuard {
    forced_closes: u64,
}

impl LifecycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verdict(&self, doc: &Document, anchor: AnchorId) -> Liveness {
        match doc.anchor(anchor) {
            None => Liveness::AnchorDetached,
            Some(a) => match a.panel {
                Some(panel) if doc.panel(panel).is_none() => Liveness::PanelDetached,
                _ => Liveness::Attached,
            },
        }
    }

    /// Pre-flight check before any show or placement.
    pub fn ensure_attached(&self, doc: &Document, anchor: AnchorId) -> Result<(), FloatError> {
        match self.verdict(doc, anchor) {
            Liveness::Attached => Ok(()),
            Liveness::AnchorDetached => Err(FloatError::AnchorDetached(anchor)),
            Liveness::PanelDetached => {
                let panel = doc.anchor(anchor).and_then(|a| a.panel);
                match panel {
                    Some(panel) => Err(FloatError::PanelDetached(panel)),
                    None => Err(FloatError::AnchorDetached(anchor)),
                }
            }
        }
    }

    /// Decide whether a session bound to `anchor` must be closed after
    /// `records` were observed. Records that do not remove anything are
    /// ignored; removals are confirmed against the document itself.
    pub fn must_close(&mut self, doc: &Document, records: &[Mutation], anchor: AnchorId) -> bool {
        let structural = records
            .iter()
            .any(|m| matches!(m, Mutation::AnchorRemoved(_) | Mutation::PanelRemoved(_)));
        if !structural || self.verdict(doc, anchor).is_attached() {
            return false;
        }
        self.forced_closes += 1;
        tracing::debug!(anchor = ?anchor, "anchor detached; forcing close");
        true
    }

    /// Navigation-style signals close every session unconditionally; this
    /// only records the event.
    pub fn on_signal(&mut self, signal: Signal) {
        self.forced_closes += 1;
        tracing::debug!(?signal, "anchors replaced; forcing close");
    }

    pub fn forced_closes(&self) -> u64 {
        self.forced_closes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Anchor, AnchorKind, Panel};
    use crate::geometry::Bounds;

    #[test]
    fn verdict_tracks_anchor_and_panel() {
        let mut doc = Document::new();
        let panel = doc.insert_panel(Panel::new(Bounds::new(0.0, 0.0, 100.0, 100.0)));
        let a = doc.insert_anchor(
            Anchor::new(AnchorKind::RowLink, "a", Bounds::new(0.0, 0.0, 10.0, 10.0))
                .in_panel(panel),
        );
        let guard = LifecycleGuard::new();
        assert_eq!(guard.verdict(&doc, a), Liveness::Attached);
        if let Some(p) = doc.panel_mut(panel) {
            p.collapsed = true;
        }
        assert_eq!(guard.verdict(&doc, a), Liveness::Attached);
        doc.remove_panel(panel);
        assert_eq!(guard.verdict(&doc, a), Liveness::PanelDetached);
        assert_eq!(
            guard.ensure_attached(&doc, a),
            Err(FloatError::PanelDetached(panel))
        );
        doc.remove_anchor(a);
        assert_eq!(guard.verdict(&doc, a), Liveness::AnchorDetached);
        assert_eq!(
            guard.ensure_attached(&doc, a),
            Err(FloatError::AnchorDetached(a))
        );
    }

    #[test]
    fn unrelated_removal_does_not_close() {
        let mut doc = Document::new();
        let a = doc.insert_anchor(Anchor::new(AnchorKind::IconOnly, "a", Bounds::default()));
        let b = doc.insert_anchor(Anchor::new(AnchorKind::IconOnly, "b", Bounds::default()));
        doc.take_mutations();
        doc.remove_anchor(b);
        let records = doc.take_mutations();
        let mut guard = LifecycleGuard::new();
        assert!(!guard.must_close(&doc, &records, a));
        assert!(guard.must_close(&doc, &records, b));
        assert_eq!(guard.forced_closes(), 1);
    }
}
