//! Turns raw crossterm events into [`EngineEvent`]s.
//!
//! The terminal only reports pointer positions, so enter/leave pairs are
//! derived here by hit-testing the document on every move. Each event is
//! classified exactly once; the controllers never look at raw input.

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

use crate::constants::TERMINAL_WHEEL_STEP;
use crate::document::{AnchorId, Document};
use crate::engine::EngineEvent;
use crate::geometry::{Point, Size};
use crate::portal::PortalHost;
use crate::scheduler::ScrollSource;

#[derive(Debug, Default, Clone)]
pub struct PointerTracker {
    hovered: Option<AnchorId>,
    position: Option<Point>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<AnchorId> {
        self.hovered
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Classify one terminal event. Wheel events over a scrollable panel
    /// scroll it in `doc` before the matching `Scroll` is emitted.
    pub fn translate(
        &mut self,
        doc: &mut Document,
        menu: &PortalHost,
        event: &Event,
    ) -> Vec<EngineEvent> {
        match event {
            Event::Mouse(mouse) => self.mouse(doc, menu, mouse),
            Event::Key(key) if key.kind != KeyEventKind::Release && key.code == KeyCode::Esc => {
                vec![EngineEvent::Escape]
            }
            Event::Resize(width, height) => {
                vec![EngineEvent::Resize(Size::new(*width as f64, *height as f64))]
            }
            _ => Vec::new(),
        }
    }

    /// Re-run the hit test at the last pointer position, e.g. after the page
    /// moved underneath a stationary pointer.
    pub fn refresh(&mut self, doc: &Document, menu: &PortalHost) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        if let Some(point) = self.position {
            self.hover(doc, menu, point, &mut out);
        }
        out
    }

    /// Forget an anchor that is gone without emitting a leave for it.
    pub fn forget_detached(&mut self, doc: &Document) {
        if self.hovered.is_some_and(|id| !doc.is_attached(id)) {
            self.hovered = None;
        }
    }

    fn mouse(
        &mut self,
        doc: &mut Document,
        menu: &PortalHost,
        mouse: &MouseEvent,
    ) -> Vec<EngineEvent> {
        let point = Point::new(mouse.column as f64, mouse.row as f64);
        let mut out = Vec::new();
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.hover(doc, menu, point, &mut out);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.position = Some(point);
                let target = if menu.contains(point) {
                    None
                } else {
                    doc.anchor_at(point)
                };
                out.push(EngineEvent::Click { point, target });
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                let delta = if mouse.kind == MouseEventKind::ScrollDown {
                    TERMINAL_WHEEL_STEP
                } else {
                    -TERMINAL_WHEEL_STEP
                };
                if menu.contains(point) {
                    out.push(EngineEvent::Wheel { point, delta });
                } else if let Some(panel) = doc.panel_at(point)
                    && doc.scroll_panel(panel, delta)
                {
                    out.push(EngineEvent::Scroll(ScrollSource::Panel(panel)));
                    self.hover(doc, menu, point, &mut out);
                }
            }
            _ => {}
        }
        out
    }

    fn hover(
        &mut self,
        doc: &Document,
        menu: &PortalHost,
        point: Point,
        out: &mut Vec<EngineEvent>,
    ) {
        self.position = Some(point);
        let next = if menu.contains(point) {
            None
        } else {
            doc.anchor_at(point)
        };
        if next == self.hovered {
            return;
        }
        if let Some(previous) = self.hovered.take() {
            out.push(EngineEvent::PointerLeave(previous));
        }
        if let Some(next) = next {
            out.push(EngineEvent::PointerEnter(next));
        }
        self.hovered = next;
    }
}
