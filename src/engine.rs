//! The owned floating engine: one per process, one entry point for events.

use std::time::Duration;

use crate::collaborators::RowAction;
use crate::config::EngineConfig;
use crate::document::{AnchorId, Document};
use crate::error::ConfigError;
use crate::geometry::{Point, Size};
use crate::lifecycle::{LifecycleGuard, Signal};
use crate::menu::{MenuClick, MenuController};
use crate::portal::Measure;
use crate::scheduler::ScrollSource;
use crate::session::{SessionCtx, TimerEvent};
use crate::timer::TimerQueue;
use crate::tooltip::TooltipController;

/// Everything the platform host feeds into the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    PointerEnter(AnchorId),
    PointerLeave(AnchorId),
    Click {
        point: Point,
        target: Option<AnchorId>,
    },
    Wheel {
        point: Point,
        delta: f64,
    },
    Escape,
    Scroll(ScrollSource),
    Resize(Size),
    /// The document has queued mutation records.
    Mutations,
    Navigation,
    ContentLoaded,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub events: u64,
    pub timers_fired: u64,
    pub frames: u64,
    pub repositioned_frames: u64,
    pub peak_pending_timers: usize,
}

struct Shared<M> {
    config: EngineConfig,
    measure: M,
    guard: LifecycleGuard,
    timers: TimerQueue<TimerEvent>,
    viewport: Size,
    now: Duration,
}

impl<M: Measure> Shared<M> {
    fn cx<'a>(&'a mut self, doc: &'a Document) -> SessionCtx<'a> {
        SessionCtx {
            doc,
            config: &self.config,
            measure: &self.measure,
            guard: &mut self.guard,
            timers: &mut self.timers,
            viewport: self.viewport,
            now: self.now,
        }
    }
}

pub struct FloatingEngine<M: Measure> {
    shared: Shared<M>,
    tooltip: TooltipController,
    menu: MenuController,
    stats: EngineStats,
}

impl<M: Measure> FloatingEngine<M> {
    pub fn new(config: EngineConfig, measure: M, viewport: Size) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            shared: Shared {
                config,
                measure,
                guard: LifecycleGuard::new(),
                timers: TimerQueue::new(),
                viewport,
                now: Duration::ZERO,
            },
            tooltip: TooltipController::new(),
            menu: MenuController::new(),
            stats: EngineStats::default(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    pub fn measure(&self) -> &M {
        &self.shared.measure
    }

    pub fn viewport(&self) -> Size {
        self.shared.viewport
    }

    pub fn tooltip(&self) -> &TooltipController {
        &self.tooltip
    }

    pub fn menu(&self) -> &MenuController {
        &self.menu
    }

    pub fn guard(&self) -> &LifecycleGuard {
        &self.shared.guard
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn pending_timers(&self) -> usize {
        self.shared.timers.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.shared.timers.next_deadline()
    }

    /// Whether a frame callback has work to do.
    pub fn wants_frame(&self) -> bool {
        self.tooltip.scheduler().is_pending() || self.menu.scheduler().is_pending()
    }

    /// Feed one event. Returns the row action chosen from a menu, if any;
    /// the caller hands it to its [`RowActionHandler`](crate::collaborators::RowActionHandler).
    pub fn handle(
        &mut self,
        doc: &mut Document,
        event: EngineEvent,
        now: Duration,
    ) -> Option<RowAction> {
        self.advance(now);
        self.stats.events += 1;
        let mut action = None;
        match event {
            EngineEvent::PointerEnter(anchor) => {
                if !self.menu.is_open() {
                    self.tooltip.pointer_enter(&mut self.shared.cx(doc), anchor);
                }
            }
            EngineEvent::PointerLeave(anchor) => {
                self.tooltip.pointer_leave(&mut self.shared.cx(doc), anchor);
            }
            EngineEvent::Click { point, target } => {
                match self.menu.click(&mut self.shared.cx(doc), point, target) {
                    MenuClick::Opened => self.tooltip.close(&mut self.shared.timers),
                    MenuClick::Dispatched(chosen) => action = Some(chosen),
                    MenuClick::Closed | MenuClick::Consumed | MenuClick::Ignored => {}
                }
            }
            EngineEvent::Wheel { point, delta } => {
                self.menu.wheel(point, delta);
            }
            EngineEvent::Escape => {
                self.menu.escape();
                self.tooltip.close(&mut self.shared.timers);
            }
            EngineEvent::Scroll(source) => self.notify(source),
            EngineEvent::Resize(size) => {
                self.shared.viewport = size;
                self.notify(ScrollSource::Viewport);
            }
            EngineEvent::Mutations => {
                let records = doc.take_mutations();
                if !records.is_empty() {
                    self.tooltip
                        .on_mutations(&mut self.shared.cx(doc), &records);
                    self.menu.on_mutations(&mut self.shared.cx(doc), &records);
                }
            }
            EngineEvent::Navigation => self.force_close(doc, Signal::Navigation),
            EngineEvent::ContentLoaded => self.force_close(doc, Signal::ContentLoaded),
        }
        self.track_timers();
        action
    }

    /// Fire every timer due at `now`, in deadline order.
    pub fn tick(&mut self, doc: &Document, now: Duration) {
        self.advance(now);
        while let Some((handle, event)) = self.shared.timers.pop_due(now) {
            self.stats.timers_fired += 1;
            match event {
                TimerEvent::ShowTooltip(_) | TimerEvent::HideTooltip(_) => {
                    self.tooltip
                        .on_timer(&mut self.shared.cx(doc), handle, event);
                }
            }
        }
        self.track_timers();
    }

    /// Frame callback: at most one placement per controller.
    pub fn frame(&mut self, doc: &Document) {
        self.stats.frames += 1;
        if self.wants_frame() {
            self.stats.repositioned_frames += 1;
        }
        self.tooltip.reposition(&mut self.shared.cx(doc));
        self.menu.reposition(&mut self.shared.cx(doc));
        self.track_timers();
    }

    /// Close both sessions without dispatching anything.
    pub fn close_all(&mut self) {
        self.tooltip.close(&mut self.shared.timers);
        self.menu.close();
    }

    fn notify(&mut self, source: ScrollSource) {
        self.tooltip.notify(source);
        self.menu.notify(source);
    }

    fn force_close(&mut self, doc: &mut Document, signal: Signal) {
        self.shared.guard.on_signal(signal);
        self.close_all();
        // Records from the replaced content are moot now.
        doc.take_mutations();
    }

    fn advance(&mut self, now: Duration) {
        if now > self.shared.now {
            self.shared.now = now;
        }
    }

    fn track_timers(&mut self) {
        let pending = self.shared.timers.len();
        if pending > self.stats.peak_pending_timers {
            self.stats.peak_pending_timers = pending;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Anchor, AnchorKind, Panel, RowContext};
    use crate::geometry::Bounds;
    use crate::menu::MenuState;
    use crate::portal::{MenuMetrics, PortalContent};
    use crate::tooltip::TooltipState;

    struct Cells;

    impl Measure for Cells {
        fn measure(&self, content: &PortalContent) -> Size {
            match content {
                PortalContent::Tooltip { label, .. } => Size::new(label.len() as f64 + 4.0, 3.0),
                PortalContent::Menu { items } => Size::new(18.0, items.len() as f64 + 2.0),
            }
        }

        fn menu_metrics(&self) -> MenuMetrics {
            MenuMetrics {
                item_height: 1.0,
                inset: 1.0,
            }
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn engine() -> FloatingEngine<Cells> {
        FloatingEngine::new(EngineConfig::terminal(), Cells, Size::new(120.0, 40.0))
            .expect("valid config")
    }

    fn sidebar(doc: &mut Document) -> (AnchorId, AnchorId) {
        let panel = doc.insert_panel(Panel::new(Bounds::new(0.0, 0.0, 30.0, 40.0)));
        let row = doc.insert_anchor(
            Anchor::new(AnchorKind::RowLink, "Quarterly report", Bounds::new(0.0, 5.0, 30.0, 1.0))
                .with_context(RowContext::Chat, "chat-1")
                .in_panel(panel),
        );
        let more = doc.insert_anchor(
            Anchor::new(AnchorKind::MoreButton, "More", Bounds::new(27.0, 5.0, 3.0, 1.0))
                .with_context(RowContext::Chat, "chat-1")
                .for_row(row)
                .in_panel(panel),
        );
        doc.take_mutations();
        (row, more)
    }

    #[test]
    fn rejects_invalid_config() {
        let config = EngineConfig::default().with_gap(f64::NAN);
        assert!(FloatingEngine::new(config, Cells, Size::new(10.0, 10.0)).is_err());
    }

    #[test]
    fn opening_menu_closes_tooltip() {
        let mut doc = Document::new();
        let (_, more) = sidebar(&mut doc);
        let toggle = doc.insert_anchor(Anchor::new(
            AnchorKind::ToggleButton,
            "Collapse",
            Bounds::new(40.0, 0.0, 3.0, 1.0),
        ));
        let mut engine = engine();
        engine.handle(&mut doc, EngineEvent::PointerEnter(toggle), ms(0));
        engine.tick(&doc, ms(60));
        assert!(engine.tooltip().host().is_visible());

        let point = Point::new(28.0, 5.0);
        engine.handle(
            &mut doc,
            EngineEvent::Click {
                point,
                target: Some(more),
            },
            ms(100),
        );
        assert!(engine.menu().is_open());
        assert_eq!(engine.tooltip().state(), TooltipState::Idle);
        assert!(!engine.tooltip().host().is_visible());
        assert_eq!(engine.pending_timers(), 0);
    }

    #[test]
    fn navigation_closes_everything() {
        let mut doc = Document::new();
        let (_, more) = sidebar(&mut doc);
        let mut engine = engine();
        engine.handle(
            &mut doc,
            EngineEvent::Click {
                point: Point::new(28.0, 5.0),
                target: Some(more),
            },
            ms(0),
        );
        assert!(engine.menu().is_open());
        engine.handle(&mut doc, EngineEvent::Navigation, ms(10));
        assert_eq!(engine.menu().state(), &MenuState::Closed);
        assert_eq!(engine.guard().forced_closes(), 1);
    }

    #[test]
    fn hover_is_suppressed_while_menu_is_open() {
        let mut doc = Document::new();
        let (_, more) = sidebar(&mut doc);
        let icon = doc.insert_anchor(Anchor::new(
            AnchorKind::IconOnly,
            "Search",
            Bounds::new(50.0, 10.0, 3.0, 1.0),
        ));
        let mut engine = engine();
        engine.handle(
            &mut doc,
            EngineEvent::Click {
                point: Point::new(28.0, 5.0),
                target: Some(more),
            },
            ms(0),
        );
        engine.handle(&mut doc, EngineEvent::PointerEnter(icon), ms(10));
        assert_eq!(engine.pending_timers(), 0);
        assert_eq!(engine.tooltip().state(), TooltipState::Idle);
    }
}
