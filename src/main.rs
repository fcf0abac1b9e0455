use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use float_portal::collaborators::{
    Notifier, RowAction, RowActionHandler, RowActionKind, ToastKind,
};
use float_portal::components::{
    Component, Sidebar, SidebarEntry, StatusBar, TerminalMeasure, ToastStack, render_menu,
    render_tooltip,
};
use float_portal::config::EngineConfig;
use float_portal::document::Document;
use float_portal::drivers::OutputDriver;
use float_portal::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use float_portal::engine::{EngineEvent, FloatingEngine};
use float_portal::error::ConfigError;
use float_portal::event_loop::{ControlFlow, EventLoop};
use float_portal::geometry::Size;
use float_portal::input::PointerTracker;
use float_portal::layout::FlipPolicy;
use float_portal::portal::Measure;
use float_portal::scheduler::ScrollSource;
use float_portal::ui::UiFrame;
use float_portal::{theme, tracing_sub};

const TOAST_MS: u64 = 2500;

#[derive(Parser, Debug)]
#[command(
    name = "float-portal",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sidebar demo for the floating tooltip and menu engine"
)]
struct Cli {
    /// Tooltip delay for icon-only rows and toggle buttons.
    #[arg(long = "fast-delay-ms", value_name = "MS", default_value_t = 50)]
    fast_delay_ms: u64,

    /// Tooltip delay for rows whose label is truncated.
    #[arg(long = "slow-delay-ms", value_name = "MS", default_value_t = 1000)]
    slow_delay_ms: u64,

    /// Grace period before a tooltip hides after the pointer leaves.
    #[arg(long = "hide-grace-ms", value_name = "MS", default_value_t = 120)]
    hide_grace_ms: u64,

    /// Cells between an anchor and its floating element.
    #[arg(long, value_name = "CELLS")]
    gap: Option<f64>,

    /// Cells kept free along every terminal edge.
    #[arg(long, value_name = "CELLS")]
    padding: Option<f64>,

    /// Narrowest menu, in cells.
    #[arg(long = "min-menu-width", value_name = "CELLS")]
    min_menu_width: Option<f64>,

    /// Let row and icon tooltips flip to the opposite side when clipped.
    #[arg(long = "flip-when-clipped")]
    flip_when_clipped: bool,

    /// Write debug logs to this file.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl TryFrom<&Cli> for EngineConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        let mut config = EngineConfig::terminal()
            .with_delays(
                Duration::from_millis(cli.fast_delay_ms),
                Duration::from_millis(cli.slow_delay_ms),
            )
            .with_hide_grace(Duration::from_millis(cli.hide_grace_ms));
        if let Some(gap) = cli.gap {
            config = config.with_gap(gap);
        }
        if let Some(padding) = cli.padding {
            config = config.with_padding(padding);
        }
        if let Some(width) = cli.min_menu_width {
            config = config.with_min_menu_width(width);
        }
        if cli.flip_when_clipped {
            config = config.with_flip(FlipPolicy::WhenClipped);
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    tracing_sub::init_default(cli.log_file.as_deref())?;
    let config = EngineConfig::try_from(&cli)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let mut output = ConsoleOutputDriver::new()?;
    let (width, height) = output.size()?;
    let mut app = App::new(config, width, height)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let frame_interval = app.engine.config().frame_interval;

    output.enter()?;
    let mut event_loop = EventLoop::new(ConsoleInputDriver::new(), frame_interval);
    let result = event_loop.run(|_, event| match event {
        Some(event) => {
            app.on_event(event);
            Ok(if app.quit {
                ControlFlow::Quit
            } else {
                ControlFlow::Continue
            })
        }
        None => {
            let flow = app.idle();
            output.draw(|frame| app.draw(frame))?;
            Ok(flow)
        }
    });
    output.exit()?;
    result
}

struct App {
    doc: Document,
    engine: FloatingEngine<TerminalMeasure>,
    sidebar: Sidebar,
    toasts: ToastStack,
    status: StatusBar,
    tracker: PointerTracker,
    clock: Instant,
    quit: bool,
}

impl App {
    fn new(config: EngineConfig, width: u16, height: u16) -> Result<Self, ConfigError> {
        let viewport = Size::new(width as f64, height as f64);
        let engine = FloatingEngine::new(config, TerminalMeasure, viewport)?;
        let mut status = StatusBar::new();
        status.set_style(theme::status_style());
        let mut app = Self {
            doc: Document::new(),
            engine,
            sidebar: Sidebar::new(demo_entries()),
            toasts: ToastStack::new(),
            status,
            tracker: PointerTracker::new(),
            clock: Instant::now(),
            quit: false,
        };
        app.layout(width, height);
        Ok(app)
    }

    fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    fn layout(&mut self, width: u16, height: u16) {
        let area = Rect::new(0, 0, width, height.saturating_sub(1));
        self.sidebar.mount(&mut self.doc, area);
        self.sync_document();
    }

    /// Follow a terminal resize by moving the mounted anchors in place, so
    /// a shown tooltip or open menu is repositioned rather than closed.
    fn resize(&mut self, width: u16, height: u16) {
        let area = Rect::new(0, 0, width, height.saturating_sub(1));
        self.sidebar.resize(&mut self.doc, area);
        self.sidebar_moved();
        self.sync_document();
    }

    /// Rows were laid out again: let floating elements bound to them follow.
    fn sidebar_moved(&mut self) {
        if let Some(panel) = self.sidebar.panel() {
            self.dispatch(vec![EngineEvent::Scroll(ScrollSource::Panel(panel))]);
        }
    }

    fn on_event(&mut self, event: Event) {
        if let Event::Key(key) = &event
            && key.kind != KeyEventKind::Release
        {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Char('q') => {
                    self.quit = true;
                    return;
                }
                KeyCode::Char('c') if ctrl => {
                    self.quit = true;
                    return;
                }
                KeyCode::Char('b') if ctrl => {
                    let collapsed = !self.sidebar.is_collapsed();
                    self.sidebar.set_collapsed(&mut self.doc, collapsed);
                    self.sync_document();
                    return;
                }
                _ => {}
            }
        }

        let events = self
            .tracker
            .translate(&mut self.doc, self.engine.menu().host(), &event);
        self.dispatch(events);
        if let Event::Resize(width, height) = event {
            self.resize(width, height);
        } else if self.doc.has_pending_mutations() {
            self.sync_document();
        }
    }

    fn dispatch(&mut self, events: Vec<EngineEvent>) {
        for event in events {
            let now = self.now();
            if let Some(action) = self.engine.handle(&mut self.doc, event, now) {
                self.perform(action);
            }
        }
    }

    /// Report structural changes to the engine and re-hit-test the pointer
    /// against the updated page.
    fn sync_document(&mut self) {
        if self.doc.has_pending_mutations() {
            self.dispatch(vec![EngineEvent::Mutations]);
        }
        self.tracker.forget_detached(&self.doc);
        let events = self.tracker.refresh(&self.doc, self.engine.menu().host());
        self.dispatch(events);
    }

    fn idle(&mut self) -> ControlFlow {
        if self.quit {
            return ControlFlow::Quit;
        }
        let now = self.now();
        self.engine.tick(&self.doc, now);
        self.engine.frame(&self.doc);
        self.toasts.advance(now);
        self.status.describe(
            self.engine.tooltip().state(),
            self.engine.menu().state(),
            self.engine.pending_timers(),
        );
        match self.engine.next_deadline() {
            Some(deadline) => ControlFlow::WaitAtMost(deadline.saturating_sub(now)),
            None => ControlFlow::Continue,
        }
    }

    fn draw(&mut self, mut frame: UiFrame<'_>) {
        let area = frame.area();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let body = Rect::new(0, 0, area.width, area.height.saturating_sub(1));
        let sidebar_width = self.sidebar.width();
        let content = Rect {
            x: body.x + sidebar_width + 2,
            y: body.y + 1,
            width: body.width.saturating_sub(sidebar_width + 2),
            height: body.height.saturating_sub(1),
        };
        frame.render_widget(
            Paragraph::new(vec![
                Line::from("Hover a truncated row, an icon or the « toggle for a tooltip."),
                Line::from("Click ⋯ for the row menu; scroll the sidebar with the wheel."),
                Line::from("Esc closes floating elements. Ctrl+B collapses the sidebar."),
            ]),
            content,
        );

        self.sidebar
            .render(&mut frame, &self.doc, self.tracker.hovered());
        render_tooltip(&mut frame, self.engine.tooltip().host());
        let menu = self.engine.menu().host();
        let hovered_item = self
            .tracker
            .position()
            .and_then(|point| menu.menu_item_at(point, self.engine.measure().menu_metrics()));
        render_menu(&mut frame, menu, hovered_item);

        self.toasts.render(&mut frame, body);
        let status_area = Rect::new(0, area.height - 1, area.width, 1);
        self.status.render(&mut frame, status_area);
    }
}

impl RowActionHandler for App {
    fn perform(&mut self, action: RowAction) {
        let key = action.row.key.as_str();
        let Some(entry) = self.sidebar.entry(key).cloned() else {
            self.toasts
                .show("That row no longer exists", ToastKind::Error, TOAST_MS);
            return;
        };
        let noun = entry.context.noun();
        match action.action {
            RowActionKind::Delete => {
                self.sidebar.remove_row(&mut self.doc, key);
                self.toasts.show(
                    &format!("Deleted {noun} \"{}\"", entry.title),
                    ToastKind::Success,
                    TOAST_MS,
                );
            }
            RowActionKind::Rename => {
                let title = format!("{} (renamed)", entry.title);
                self.sidebar.rename_row(&mut self.doc, key, title.clone());
                self.toasts.show(
                    &format!("Renamed {noun} to \"{title}\""),
                    ToastKind::Info,
                    TOAST_MS,
                );
            }
        }
        self.sidebar_moved();
        self.sync_document();
    }
}

fn demo_entries() -> Vec<SidebarEntry> {
    let chats = [
        ("c-01", "Trip planning"),
        ("c-02", "Weekly sync notes and the follow-ups we agreed on"),
        ("c-03", "Regex help"),
        ("c-04", "Draft: letter to the landlord about the heating"),
        ("c-05", "Bread recipe"),
        ("c-06", "Comparing three budget spreadsheets side by side"),
        ("c-07", "SQL window functions"),
        ("c-08", "Birthday ideas"),
        ("c-09", "Explaining borrow checker errors to a new teammate"),
        ("c-10", "Garden layout"),
        ("c-11", "Cover letter"),
        ("c-12", "Why the nightly build keeps timing out on macOS runners"),
    ];
    let projects = [
        ("p-01", "Home renovation", Some("4 chats")),
        ("p-02", "Thesis: distributed consensus under partial synchrony", Some("11 chats")),
        ("p-03", "Reading list", None),
        ("p-04", "Conference talk", Some("2 chats")),
    ];
    chats
        .into_iter()
        .map(|(key, title)| SidebarEntry::chat(key, title))
        .chain(projects.into_iter().map(|(key, title, detail)| {
            let entry = SidebarEntry::project(key, title);
            match detail {
                Some(detail) => entry.with_detail(detail),
                None => entry,
            }
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_portal::collaborators::RowRef;
    use float_portal::document::AnchorId;
    use float_portal::tooltip::TooltipState;

    fn app() -> App {
        App::new(EngineConfig::terminal(), 100, 30).expect("valid config")
    }

    fn link(app: &App, key: &str) -> AnchorId {
        app.sidebar.row(key).expect("row").link
    }

    #[test]
    fn terminal_resize_repositions_instead_of_closing() {
        let mut app = app();
        let toggle = app.sidebar.toggle().expect("toggle");
        let fast = app.engine.config().fast_delay;
        app.engine.handle(
            &mut app.doc,
            EngineEvent::PointerEnter(toggle),
            Duration::ZERO,
        );
        app.engine.tick(&app.doc, fast);
        assert!(app.engine.tooltip().host().is_visible());

        app.on_event(Event::Resize(20, 10));
        app.engine.frame(&app.doc);

        assert_eq!(app.sidebar.toggle(), Some(toggle));
        assert_eq!(
            app.engine.tooltip().state(),
            TooltipState::Shown { anchor: toggle }
        );
        let placed = app.engine.tooltip().host().placement().expect("placed");
        assert_eq!(placed.left, 1.0);
    }

    #[test]
    fn deleting_a_row_moves_a_fading_tooltip_with_its_row() {
        let mut app = app();
        let target = link(&app, "c-02");
        let slow = app.engine.config().slow_delay;
        app.engine.handle(
            &mut app.doc,
            EngineEvent::PointerEnter(target),
            Duration::ZERO,
        );
        app.engine.tick(&app.doc, slow);
        app.engine.handle(&mut app.doc, EngineEvent::PointerLeave(target), slow);
        let before = app.engine.tooltip().host().placement().expect("placed");

        let removed = link(&app, "c-01");
        app.perform(RowAction {
            action: RowActionKind::Delete,
            row: RowRef {
                key: "c-01".to_string(),
                anchor: removed,
            },
        });
        app.engine.frame(&app.doc);

        assert!(matches!(
            app.engine.tooltip().state(),
            TooltipState::Hiding { anchor, .. } if anchor == target
        ));
        let after = app.engine.tooltip().host().placement().expect("placed");
        assert_eq!(after.top, before.top - 1.0);
    }
}
