//! Anchor and panel model owned by the surrounding page.
//!
//! The engine never creates or destroys anchors; it only reads them through
//! [`AnchorId`] handles. Handles are generational, so a handle held across a
//! removal simply stops resolving instead of pointing at a recycled slot.
//! That is the weak-reference contract the engine relies on: holding an id
//! never keeps an anchor alive.

use crate::geometry::{Bounds, Point};
use crate::layout::Edge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Debug, Clone)]
struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Arena<T> {
    fn insert(&mut self, value: T) -> (u32, u32) {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = Some(value);
            return (index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        (index, 0)
    }

    fn get(&self, index: u32, generation: u32) -> Option<&T> {
        self.slots
            .get(index as usize)
            .filter(|slot| slot.generation == generation)
            .and_then(|slot| slot.value.as_ref())
    }

    fn get_mut(&mut self, index: u32, generation: u32) -> Option<&mut T> {
        self.slots
            .get_mut(index as usize)
            .filter(|slot| slot.generation == generation)
            .and_then(|slot| slot.value.as_mut())
    }

    fn remove(&mut self, index: u32, generation: u32) -> Option<T> {
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        let value = slot.value.take()?;
        self.free.push(index);
        Some(value)
    }

    fn iter(&self) -> impl Iterator<Item = (u32, u32, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (index as u32, slot.generation, value))
        })
    }
}

/// Closed set of trigger kinds. Every pointer event is classified into one of
/// these once, so the controllers never sniff attributes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// Full-label row in an open sidebar.
    RowLink,
    /// Row of a collapsed sidebar showing only its icon.
    IconOnly,
    /// Horizontal toggle button (e.g. the sidebar collapse control).
    ToggleButton,
    /// "More" button that opens the row's contextual menu.
    MoreButton,
}

/// What a row represents; selects the contextual menu labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowContext {
    Chat,
    Project,
}

impl RowContext {
    pub fn noun(self) -> &'static str {
        match self {
            RowContext::Chat => "chat",
            RowContext::Project => "project",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub kind: AnchorKind,
    pub label: String,
    pub secondary: Option<String>,
    pub context: Option<RowContext>,
    /// Opaque row reference handed to row-action handlers.
    pub row_key: Option<String>,
    /// Row anchor a "more" button belongs to.
    pub row: Option<AnchorId>,
    /// Bounds in panel content coordinates (before the panel's scroll offset).
    pub bounds: Bounds,
    /// Icon sub-element of icon-only rows.
    pub icon: Option<Bounds>,
    pub panel: Option<PanelId>,
    /// Width the label would need to render in full.
    pub label_width: f64,
    /// Width actually available to the label.
    pub label_visible_width: f64,
}

impl Anchor {
    pub fn new(kind: AnchorKind, label: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            kind,
            label: label.into(),
            secondary: None,
            context: None,
            row_key: None,
            row: None,
            bounds,
            icon: None,
            panel: None,
            label_width: 0.0,
            label_visible_width: 0.0,
        }
    }

    #[must_use]
    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = Some(secondary.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: RowContext, row_key: impl Into<String>) -> Self {
        self.context = Some(context);
        self.row_key = Some(row_key.into());
        self
    }

    #[must_use]
    pub fn for_row(mut self, row: AnchorId) -> Self {
        self.row = Some(row);
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: Bounds) -> Self {
        self.icon = Some(icon);
        self
    }

    #[must_use]
    pub fn in_panel(mut self, panel: PanelId) -> Self {
        self.panel = Some(panel);
        self
    }

    #[must_use]
    pub fn with_label_metrics(mut self, content_width: f64, visible_width: f64) -> Self {
        self.label_width = content_width;
        self.label_visible_width = visible_width;
        self
    }

    /// Rendered label is cut off by ellipsis.
    pub fn is_truncated(&self) -> bool {
        self.label_width > self.label_visible_width
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub bounds: Bounds,
    pub scroll_y: f64,
    pub content_height: f64,
    pub scrollable: bool,
    pub open_edge: Edge,
    pub collapsed: bool,
}

impl Panel {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            scroll_y: 0.0,
            content_height: bounds.height,
            scrollable: false,
            open_edge: Edge::Right,
            collapsed: false,
        }
    }

    #[must_use]
    pub fn scrollable(mut self, content_height: f64) -> Self {
        self.scrollable = true;
        self.content_height = content_height;
        self
    }

    #[must_use]
    pub fn with_open_edge(mut self, edge: Edge) -> Self {
        self.open_edge = edge;
        self
    }

    #[must_use]
    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    fn max_scroll(&self) -> f64 {
        (self.content_height - self.bounds.height).max(0.0)
    }
}

/// Structural change records, drained by whoever observes the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    AnchorInserted(AnchorId),
    AnchorRemoved(AnchorId),
    PanelRemoved(PanelId),
    Scrolled(PanelId),
}

#[derive(Debug, Default, Clone)]
pub struct Document {
    anchors: Arena<Anchor>,
    panels: Arena<Panel>,
    mutations: Vec<Mutation>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_panel(&mut self, panel: Panel) -> PanelId {
        let (index, generation) = self.panels.insert(panel);
        PanelId { index, generation }
    }

    /// Removes the panel. Anchors inside it stay in the arena but are no
    /// longer attached, like descendants of a removed subtree.
    pub fn remove_panel(&mut self, id: PanelId) -> Option<Panel> {
        let panel = self.panels.remove(id.index, id.generation)?;
        self.mutations.push(Mutation::PanelRemoved(id));
        Some(panel)
    }

    pub fn insert_anchor(&mut self, anchor: Anchor) -> AnchorId {
        let (index, generation) = self.anchors.insert(anchor);
        let id = AnchorId { index, generation };
        self.mutations.push(Mutation::AnchorInserted(id));
        id
    }

    pub fn remove_anchor(&mut self, id: AnchorId) -> Option<Anchor> {
        let anchor = self.anchors.remove(id.index, id.generation)?;
        self.mutations.push(Mutation::AnchorRemoved(id));
        Some(anchor)
    }

    /// Drop everything, as a client-side navigation replacing the page would.
    pub fn clear(&mut self) {
        for id in self.panel_ids() {
            self.remove_panel(id);
        }
        for id in self.anchor_ids() {
            self.remove_anchor(id);
        }
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id.index, id.generation)
    }

    pub fn anchor_mut(&mut self, id: AnchorId) -> Option<&mut Anchor> {
        self.anchors.get_mut(id.index, id.generation)
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(id.index, id.generation)
    }

    pub fn panel_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.get_mut(id.index, id.generation)
    }

    pub fn anchor_ids(&self) -> Vec<AnchorId> {
        self.anchors
            .iter()
            .map(|(index, generation, _)| AnchorId { index, generation })
            .collect()
    }

    pub fn panel_ids(&self) -> Vec<PanelId> {
        self.panels
            .iter()
            .map(|(index, generation, _)| PanelId { index, generation })
            .collect()
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.iter().count()
    }

    /// An anchor is attached when it exists and so does its containing panel.
    pub fn is_attached(&self, id: AnchorId) -> bool {
        match self.anchor(id) {
            Some(anchor) => anchor.panel.is_none_or(|panel| self.panel(panel).is_some()),
            None => false,
        }
    }

    /// Anchor bounds in viewport coordinates, accounting for panel scroll.
    pub fn viewport_bounds(&self, id: AnchorId) -> Option<Bounds> {
        let anchor = self.anchor(id)?;
        Some(self.project(anchor, anchor.bounds))
    }

    /// Viewport bounds of the sub-element a tooltip is measured against: the
    /// icon of icon-only rows, the anchor itself otherwise.
    pub fn target_bounds(&self, id: AnchorId) -> Option<Bounds> {
        let anchor = self.anchor(id)?;
        let local = match (anchor.kind, anchor.icon) {
            (AnchorKind::IconOnly, Some(icon)) => icon,
            _ => anchor.bounds,
        };
        Some(self.project(anchor, local))
    }

    fn project(&self, anchor: &Anchor, local: Bounds) -> Bounds {
        let scroll = anchor
            .panel
            .and_then(|panel| self.panel(panel))
            .map(|panel| panel.scroll_y)
            .unwrap_or(0.0);
        local.translate(0.0, -scroll)
    }

    /// Whether any part of the anchor is inside its panel's visible area.
    /// Anchors outside a panel are always considered visible.
    pub fn is_visible_in_panel(&self, id: AnchorId) -> bool {
        let Some(bounds) = self.viewport_bounds(id) else {
            return false;
        };
        match self.anchor(id).and_then(|a| a.panel) {
            Some(panel) => self
                .panel(panel)
                .is_some_and(|panel| panel.bounds.intersects(&bounds)),
            None => true,
        }
    }

    /// Hit test: the smallest attached, visible anchor under `point`, so a
    /// "more" button wins over the row it sits on.
    pub fn anchor_at(&self, point: Point) -> Option<AnchorId> {
        let mut best: Option<(AnchorId, f64)> = None;
        for id in self.anchor_ids() {
            let Some(anchor) = self.anchor(id) else {
                continue;
            };
            let Some(bounds) = self.viewport_bounds(id) else {
                continue;
            };
            if !bounds.contains(point) {
                continue;
            }
            if let Some(panel) = anchor.panel {
                match self.panel(panel) {
                    Some(panel) if panel.bounds.contains(point) => {}
                    _ => continue,
                }
            }
            let area = bounds.width * bounds.height;
            if best.is_none_or(|(_, best_area)| area < best_area) {
                best = Some((id, area));
            }
        }
        best.map(|(id, _)| id)
    }

    pub fn panel_at(&self, point: Point) -> Option<PanelId> {
        self.panels
            .iter()
            .find(|(_, _, panel)| panel.bounds.contains(point))
            .map(|(index, generation, _)| PanelId { index, generation })
    }

    /// Scroll a panel by `delta`, clamped to its content. Returns whether the
    /// offset changed.
    pub fn scroll_panel(&mut self, id: PanelId, delta: f64) -> bool {
        let Some(panel) = self.panel_mut(id) else {
            return false;
        };
        if !panel.scrollable {
            return false;
        }
        let next = (panel.scroll_y + delta).clamp(0.0, panel.max_scroll());
        if next == panel.scroll_y {
            return false;
        }
        panel.scroll_y = next;
        self.mutations.push(Mutation::Scrolled(id));
        true
    }

    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    pub fn has_pending_mutations(&self) -> bool {
        !self.mutations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sidebar() -> (Document, PanelId) {
        let mut doc = Document::new();
        let panel =
            doc.insert_panel(Panel::new(Bounds::new(0.0, 0.0, 200.0, 100.0)).scrollable(300.0));
        (doc, panel)
    }

    #[test]
    fn removed_anchor_handle_never_resolves_again() {
        let (mut doc, panel) = sidebar();
        let a = doc.insert_anchor(
            Anchor::new(AnchorKind::RowLink, "a", Bounds::new(0.0, 0.0, 200.0, 20.0))
                .in_panel(panel),
        );
        assert!(doc.is_attached(a));
        doc.remove_anchor(a);
        let b = doc.insert_anchor(
            Anchor::new(AnchorKind::RowLink, "b", Bounds::new(0.0, 0.0, 200.0, 20.0))
                .in_panel(panel),
        );
        assert!(!doc.is_attached(a));
        assert!(doc.anchor(a).is_none());
        assert_eq!(doc.anchor(b).map(|x| x.label.as_str()), Some("b"));
    }

    #[test]
    fn removing_panel_detaches_its_anchors() {
        let (mut doc, panel) = sidebar();
        let a = doc.insert_anchor(
            Anchor::new(AnchorKind::RowLink, "a", Bounds::new(0.0, 0.0, 200.0, 20.0))
                .in_panel(panel),
        );
        doc.take_mutations();
        doc.remove_panel(panel);
        assert!(!doc.is_attached(a));
        assert!(doc.anchor(a).is_some());
        assert_eq!(doc.anchor_at(Point::new(5.0, 5.0)), None);
        assert_eq!(doc.take_mutations(), vec![Mutation::PanelRemoved(panel)]);
    }

    #[test]
    fn scroll_shifts_viewport_bounds_and_visibility() {
        let (mut doc, panel) = sidebar();
        let a = doc.insert_anchor(
            Anchor::new(AnchorKind::RowLink, "a", Bounds::new(0.0, 10.0, 200.0, 20.0))
                .in_panel(panel),
        );
        assert!(doc.scroll_panel(panel, 50.0));
        assert_eq!(doc.viewport_bounds(a).map(|b| b.y), Some(-40.0));
        assert!(!doc.is_visible_in_panel(a));
        assert!(doc.scroll_panel(panel, -500.0));
        assert_eq!(doc.panel(panel).map(|p| p.scroll_y), Some(0.0));
        assert!(!doc.scroll_panel(panel, -1.0));
    }

    #[test]
    fn hit_test_prefers_smallest_anchor() {
        let (mut doc, panel) = sidebar();
        let row = doc.insert_anchor(
            Anchor::new(AnchorKind::RowLink, "row", Bounds::new(0.0, 0.0, 200.0, 20.0))
                .in_panel(panel),
        );
        let more = doc.insert_anchor(
            Anchor::new(AnchorKind::MoreButton, "more", Bounds::new(180.0, 0.0, 20.0, 20.0))
                .in_panel(panel)
                .for_row(row),
        );
        assert_eq!(doc.anchor_at(Point::new(10.0, 5.0)), Some(row));
        assert_eq!(doc.anchor_at(Point::new(185.0, 5.0)), Some(more));
        assert_eq!(doc.anchor_at(Point::new(185.0, 150.0)), None);
    }

    #[test]
    fn truncation_compares_content_to_visible_width() {
        let row = Anchor::new(AnchorKind::RowLink, "x", Bounds::default());
        assert!(!row.clone().with_label_metrics(80.0, 120.0).is_truncated());
        assert!(row.with_label_metrics(160.0, 120.0).is_truncated());
    }
}
