#![allow(dead_code)]

use std::time::Duration;

use float_portal::config::EngineConfig;
use float_portal::document::{Anchor, AnchorId, AnchorKind, Document, Panel, PanelId, RowContext};
use float_portal::engine::FloatingEngine;
use float_portal::geometry::{Bounds, Size};
use float_portal::portal::{Measure, MenuMetrics, PortalContent};

pub const VIEWPORT: Size = Size {
    width: 1280.0,
    height: 800.0,
};

/// Pixel measure: fixed tooltip size, menus sized from their item count.
pub struct Px {
    pub tooltip: Size,
    pub menu_width: f64,
    pub item_height: f64,
    pub inset: f64,
}

impl Default for Px {
    fn default() -> Self {
        Self {
            tooltip: Size::new(80.0, 24.0),
            menu_width: 120.0,
            item_height: 36.0,
            inset: 8.0,
        }
    }
}

impl Measure for Px {
    fn measure(&self, content: &PortalContent) -> Size {
        match content {
            PortalContent::Tooltip { .. } => self.tooltip,
            PortalContent::Menu { items } => Size::new(
                self.menu_width,
                items.len() as f64 * self.item_height + 2.0 * self.inset,
            ),
        }
    }

    fn menu_metrics(&self) -> MenuMetrics {
        MenuMetrics {
            item_height: self.item_height,
            inset: self.inset,
        }
    }
}

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// A 260px sidebar with two chat rows, a project row near the bottom, an
/// icon-only rail button and a toggle near the bottom of the viewport.
pub struct Page {
    pub doc: Document,
    pub sidebar: PanelId,
    /// Truncated chat row at y 200 and its "more" button.
    pub long_row: AnchorId,
    pub long_more: AnchorId,
    /// Fully visible chat row at y 240 and its "more" button.
    pub short_row: AnchorId,
    pub short_more: AnchorId,
    /// Project row at y 700 and its "more" button.
    pub project_row: AnchorId,
    pub project_more: AnchorId,
    pub icon: AnchorId,
    pub toggle: AnchorId,
}

impl Page {
    pub fn build() -> Self {
        let mut doc = Document::new();
        let sidebar =
            doc.insert_panel(Panel::new(Bounds::new(0.0, 0.0, 260.0, 800.0)).scrollable(2000.0));

        let (long_row, long_more) = row(
            &mut doc,
            sidebar,
            "A very long conversation title that does not fit",
            RowContext::Chat,
            "chat-long",
            200.0,
            300.0,
        );
        let (short_row, short_more) = row(
            &mut doc,
            sidebar,
            "Short",
            RowContext::Chat,
            "chat-short",
            240.0,
            100.0,
        );
        let (project_row, project_more) = row(
            &mut doc,
            sidebar,
            "Thesis",
            RowContext::Project,
            "project-thesis",
            700.0,
            100.0,
        );
        let icon = doc.insert_anchor(Anchor::new(
            AnchorKind::IconOnly,
            "Search",
            Bounds::new(0.0, 100.0, 56.0, 40.0),
        ));
        let toggle = doc.insert_anchor(
            Anchor::new(
                AnchorKind::ToggleButton,
                "Collapse sidebar",
                Bounds::new(600.0, 770.0, 32.0, 24.0),
            )
            .with_secondary("Ctrl+B"),
        );
        doc.take_mutations();
        Self {
            doc,
            sidebar,
            long_row,
            long_more,
            short_row,
            short_more,
            project_row,
            project_more,
            icon,
            toggle,
        }
    }
}

fn row(
    doc: &mut Document,
    panel: PanelId,
    label: &str,
    context: RowContext,
    key: &str,
    y: f64,
    label_width: f64,
) -> (AnchorId, AnchorId) {
    let link = doc.insert_anchor(
        Anchor::new(AnchorKind::RowLink, label, Bounds::new(8.0, y, 244.0, 36.0))
            .with_context(context, key)
            .with_label_metrics(label_width, 200.0)
            .in_panel(panel),
    );
    let more = doc.insert_anchor(
        Anchor::new(
            AnchorKind::MoreButton,
            "More options",
            Bounds::new(220.0, y, 32.0, 36.0),
        )
        .with_context(context, key)
        .for_row(link)
        .in_panel(panel),
    );
    (link, more)
}

pub fn engine() -> FloatingEngine<Px> {
    engine_with(EngineConfig::default(), Px::default())
}

pub fn engine_with(config: EngineConfig, measure: Px) -> FloatingEngine<Px> {
    match FloatingEngine::new(config, measure, VIEWPORT) {
        Ok(engine) => engine,
        Err(err) => panic!("config rejected: {err}"),
    }
}
