//! Demo sidebar: the page the engine floats things over.
//!
//! The sidebar owns its rows and mirrors them into the [`Document`] as
//! anchors inside one scrollable panel. Expanded rows are `RowLink`s with a
//! "more" button; collapsed rows are `IconOnly`. The collapse control above
//! the panel is a `ToggleButton`.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;

use crate::document::{Anchor, AnchorId, AnchorKind, Document, Panel, PanelId, RowContext};
use crate::geometry::{Bounds, Point};
use crate::layout::{Edge, cells_to_bounds};
use crate::theme;
use crate::ui::{UiFrame, ellipsize};

const EXPANDED_WIDTH: u16 = 28;
const COLLAPSED_WIDTH: u16 = 5;
const MORE_WIDTH: u16 = 3;
const SECTIONS: [(RowContext, &str); 2] = [
    (RowContext::Chat, "Chats"),
    (RowContext::Project, "Projects"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub key: String,
    pub title: String,
    pub context: RowContext,
    pub detail: Option<String>,
}

impl SidebarEntry {
    pub fn chat(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            context: RowContext::Chat,
            detail: None,
        }
    }

    pub fn project(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            context: RowContext::Project,
            ..Self::chat(key, title)
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRow {
    pub key: String,
    pub link: AnchorId,
    pub more: Option<AnchorId>,
}

#[derive(Debug, Default)]
pub struct Sidebar {
    entries: Vec<SidebarEntry>,
    rows: Vec<SidebarRow>,
    headers: Vec<(f64, &'static str)>,
    panel: Option<PanelId>,
    toggle: Option<AnchorId>,
    collapsed: bool,
    area: Rect,
}

impl Sidebar {
    pub fn new(mut entries: Vec<SidebarEntry>) -> Self {
        entries.sort_by_key(|entry| section_index(entry.context));
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn width(&self) -> u16 {
        let width = if self.collapsed {
            COLLAPSED_WIDTH
        } else {
            EXPANDED_WIDTH
        };
        width.min(self.area.width)
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn panel(&self) -> Option<PanelId> {
        self.panel
    }

    pub fn toggle(&self) -> Option<AnchorId> {
        self.toggle
    }

    pub fn rows(&self) -> &[SidebarRow] {
        &self.rows
    }

    pub fn entries(&self) -> &[SidebarEntry] {
        &self.entries
    }

    pub fn entry(&self, key: &str) -> Option<&SidebarEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn row(&self, key: &str) -> Option<&SidebarRow> {
        self.rows.iter().find(|row| row.key == key)
    }

    /// (Re)create every anchor for `area`, keeping the panel's scroll offset.
    pub fn mount(&mut self, doc: &mut Document, area: Rect) {
        let scroll = self
            .panel
            .and_then(|panel| doc.panel(panel))
            .map(|panel| panel.scroll_y)
            .unwrap_or(0.0);
        self.unmount(doc);
        self.area = area;
        let width = self.width();
        if width == 0 || area.height < 2 {
            return;
        }

        let panel_bounds = Bounds::new(
            area.x as f64,
            area.y as f64 + 1.0,
            width as f64,
            (area.height - 1) as f64,
        );
        let panel = doc.insert_panel(
            Panel::new(panel_bounds)
                .scrollable(panel_bounds.height)
                .with_open_edge(Edge::Right)
                .collapsed(self.collapsed),
        );
        self.panel = Some(panel);

        let label = if self.collapsed {
            "Expand sidebar"
        } else {
            "Collapse sidebar"
        };
        let x = toggle_x(area, width, self.collapsed);
        let toggle_bounds = cells_to_bounds(Rect::new(x, area.y, MORE_WIDTH, 1));
        self.toggle = Some(doc.insert_anchor(
            Anchor::new(AnchorKind::ToggleButton, label, toggle_bounds).with_secondary("Ctrl+B"),
        ));

        for entry in &self.entries {
            let row = mount_row(doc, panel, entry, self.collapsed);
            self.rows.push(row);
        }
        self.relayout(doc);
        doc.scroll_panel(panel, scroll);
    }

    /// Move the mounted sidebar into `area` without recreating anything, so
    /// anchor ids (and any tooltip or menu bound to them) survive. Falls back
    /// to [`Sidebar::mount`] when nothing is mounted yet.
    pub fn resize(&mut self, doc: &mut Document, area: Rect) {
        let Some(panel) = self.panel.filter(|panel| doc.panel(*panel).is_some()) else {
            self.mount(doc, area);
            return;
        };
        self.area = area;
        let width = self.width();
        if width == 0 || area.height < 2 {
            self.mount(doc, area);
            return;
        }
        if let Some(p) = doc.panel_mut(panel) {
            p.bounds = Bounds::new(
                area.x as f64,
                area.y as f64 + 1.0,
                width as f64,
                (area.height - 1) as f64,
            );
        }
        if let Some(toggle) = self.toggle.and_then(|id| doc.anchor_mut(id)) {
            let x = toggle_x(area, width, self.collapsed);
            toggle.bounds = cells_to_bounds(Rect::new(x, area.y, MORE_WIDTH, 1));
        }
        self.relayout(doc);
    }

    pub fn set_collapsed(&mut self, doc: &mut Document, collapsed: bool) {
        if self.collapsed == collapsed {
            return;
        }
        self.collapsed = collapsed;
        let area = self.area;
        self.mount(doc, area);
    }

    /// Remove a row and close the gap it leaves.
    pub fn remove_row(&mut self, doc: &mut Document, key: &str) -> Option<SidebarEntry> {
        let index = self.entries.iter().position(|entry| entry.key == key)?;
        let entry = self.entries.remove(index);
        if index < self.rows.len() {
            let row = self.rows.remove(index);
            doc.remove_anchor(row.link);
            if let Some(more) = row.more {
                doc.remove_anchor(more);
            }
        }
        self.relayout(doc);
        Some(entry)
    }

    pub fn rename_row(&mut self, doc: &mut Document, key: &str, title: impl Into<String>) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == key) else {
            return false;
        };
        entry.title = title.into();
        self.relayout(doc);
        true
    }

    fn unmount(&mut self, doc: &mut Document) {
        for row in self.rows.drain(..) {
            doc.remove_anchor(row.link);
            if let Some(more) = row.more {
                doc.remove_anchor(more);
            }
        }
        if let Some(toggle) = self.toggle.take() {
            doc.remove_anchor(toggle);
        }
        if let Some(panel) = self.panel.take() {
            doc.remove_panel(panel);
        }
        self.headers.clear();
    }

    /// Position rows and section headers in content coordinates.
    fn relayout(&mut self, doc: &mut Document) {
        let Some(panel) = self.panel else {
            return;
        };
        let Some(top) = doc.panel(panel).map(|p| p.bounds.y) else {
            return;
        };
        let x = self.area.x as f64;
        let width = self.width() as f64;
        let label_room = (width - 2.0 - MORE_WIDTH as f64).max(0.0);
        self.headers.clear();

        let mut y = top;
        for (context, title) in SECTIONS {
            if !self.collapsed {
                self.headers.push((y, title));
                y += 1.0;
            }
            for (entry, row) in self.entries.iter().zip(&self.rows) {
                if entry.context != context {
                    continue;
                }
                if let Some(link) = doc.anchor_mut(row.link) {
                    link.label = entry.title.clone();
                    link.secondary = entry.detail.clone();
                    link.bounds = Bounds::new(x, y, width, 1.0);
                    link.icon = Some(Bounds::new(x + 1.0, y, MORE_WIDTH as f64, 1.0));
                    link.label_width = Line::from(entry.title.as_str()).width() as f64;
                    link.label_visible_width = label_room;
                }
                if let Some(more) = row.more.and_then(|more| doc.anchor_mut(more)) {
                    let more_x = x + width - MORE_WIDTH as f64;
                    more.bounds = Bounds::new(more_x, y, MORE_WIDTH as f64, 1.0);
                }
                y += 1.0;
            }
            if !self.collapsed {
                y += 1.0;
            }
        }

        if let Some(p) = doc.panel_mut(panel) {
            p.content_height = (y - top).max(p.bounds.height);
        }
        doc.scroll_panel(panel, 0.0);
    }

    pub fn render(&self, frame: &mut UiFrame<'_>, doc: &Document, hovered: Option<AnchorId>) {
        let width = self.width();
        if width == 0 {
            return;
        }
        let base = Style::default()
            .bg(theme::sidebar_bg())
            .fg(theme::sidebar_fg());
        let column = Rect {
            width,
            ..self.area
        };
        frame.fill(column, base);

        if let Some(toggle) = self.toggle.and_then(|id| doc.viewport_bounds(id)) {
            let glyph = if self.collapsed { " » " } else { " « " };
            let style = if hovered == self.toggle {
                base.bg(theme::row_hover_bg()).fg(theme::row_hover_fg())
            } else {
                base
            };
            frame.set_string(toggle.x as u16, toggle.y as u16, glyph, style);
        }
        if !self.collapsed {
            frame.set_string(self.area.x + 1, self.area.y, "Sidebar", base.fg(theme::accent()));
        }

        let Some(panel) = self.panel.and_then(|id| doc.panel(id)) else {
            return;
        };
        let visible = |y: f64| panel.bounds.contains(Point::new(panel.bounds.x, y));

        for (y, title) in &self.headers {
            let vy = y - panel.scroll_y;
            if visible(vy) {
                frame.set_string(
                    self.area.x + 1,
                    vy as u16,
                    title,
                    base.fg(theme::sidebar_header_fg()),
                );
            }
        }

        for (entry, row) in self.entries.iter().zip(&self.rows) {
            let Some(bounds) = doc.viewport_bounds(row.link) else {
                continue;
            };
            if !visible(bounds.y) {
                continue;
            }
            let y = bounds.y as u16;
            let hot = hovered.is_some_and(|id| id == row.link || Some(id) == row.more);
            let style = if hot {
                base.bg(theme::row_hover_bg()).fg(theme::row_hover_fg())
            } else {
                base
            };
            frame.fill(Rect::new(self.area.x, y, width, 1), style);
            if self.collapsed {
                let initial = entry.title.chars().next().unwrap_or('?');
                frame.set_string(self.area.x + 1, y, &format!("[{initial}]"), style);
            } else {
                let room = width.saturating_sub(2 + MORE_WIDTH) as usize;
                frame.set_string(self.area.x + 1, y, &ellipsize(&entry.title, room), style);
                frame.set_string(self.area.x + width - MORE_WIDTH, y, " ⋯ ", style);
            }
        }
    }
}

fn section_index(context: RowContext) -> usize {
    SECTIONS
        .iter()
        .position(|(section, _)| *section == context)
        .unwrap_or(SECTIONS.len())
}

fn toggle_x(area: Rect, width: u16, collapsed: bool) -> u16 {
    if collapsed {
        area.x + 1
    } else {
        area.x + width.saturating_sub(MORE_WIDTH)
    }
}

fn mount_row(
    doc: &mut Document,
    panel: PanelId,
    entry: &SidebarEntry,
    collapsed: bool,
) -> SidebarRow {
    let kind = if collapsed {
        AnchorKind::IconOnly
    } else {
        AnchorKind::RowLink
    };
    let mut anchor = Anchor::new(kind, entry.title.clone(), Bounds::default())
        .with_context(entry.context, entry.key.clone())
        .in_panel(panel);
    if let Some(detail) = &entry.detail {
        anchor = anchor.with_secondary(detail.clone());
    }
    let link = doc.insert_anchor(anchor);
    let more = (!collapsed).then(|| {
        doc.insert_anchor(
            Anchor::new(AnchorKind::MoreButton, "More options", Bounds::default())
                .with_context(entry.context, entry.key.clone())
                .for_row(link)
                .in_panel(panel),
        )
    });
    SidebarRow {
        key: entry.key.clone(),
        link,
        more,
    }
}
