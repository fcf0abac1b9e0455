use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use float_portal::components::TerminalMeasure;
use float_portal::config::EngineConfig;
use float_portal::document::{Anchor, AnchorId, AnchorKind, Document, Panel, PanelId, RowContext};
use float_portal::engine::{EngineEvent, FloatingEngine};
use float_portal::geometry::{Bounds, Point, Size};
use float_portal::scheduler::ScrollSource;

const VIEWPORT: Size = Size {
    width: 120.0,
    height: 40.0,
};
const PANEL_WIDTH: f64 = 28.0;

#[derive(Parser, Debug)]
#[command(
    name = "sweep-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Drives the floating engine headlessly with pointer sweeps over a long sidebar"
)]
struct BenchCli {
    /// Sidebar rows to sweep across.
    #[arg(short = 'r', long = "rows", value_name = "ROWS", default_value_t = 200)]
    rows: usize,

    /// Full top-to-bottom pointer sweeps.
    #[arg(short = 's', long = "sweeps", value_name = "SWEEPS", default_value_t = 50)]
    sweeps: usize,

    /// Virtual milliseconds the pointer rests on each row.
    #[arg(long = "step-ms", value_name = "MS", default_value_t = 8)]
    step_ms: u64,
}

struct BenchConfig {
    rows: usize,
    sweeps: usize,
    step: Duration,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(1..=100_000).contains(&cli.rows) {
            return Err("rows must be between 1 and 100000".to_string());
        }
        if !(1..=10_000).contains(&cli.sweeps) {
            return Err("sweeps must be between 1 and 10000".to_string());
        }
        if !(1..=5_000).contains(&cli.step_ms) {
            return Err("step must be between 1 and 5000 ms".to_string());
        }
        Ok(Self {
            rows: cli.rows,
            sweeps: cli.sweeps,
            step: Duration::from_millis(cli.step_ms),
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    let stats = run_benchmark(&config)?;
    println!("{}", stats.final_report(&config));
    Ok(())
}

struct Page {
    doc: Document,
    panel: PanelId,
    rows: Vec<(AnchorId, AnchorId)>,
}

impl Page {
    /// Every third row is truncated; every fifth is an icon-only row.
    fn build(rows: usize) -> Self {
        let mut doc = Document::new();
        let panel = doc.insert_panel(
            Panel::new(Bounds::new(0.0, 1.0, PANEL_WIDTH, VIEWPORT.height - 2.0))
                .scrollable(rows as f64),
        );
        let mut out = Vec::with_capacity(rows);
        for i in 0..rows {
            let y = 1.0 + i as f64;
            let kind = if i % 5 == 4 {
                AnchorKind::IconOnly
            } else {
                AnchorKind::RowLink
            };
            let label_width = if i % 3 == 0 { 40.0 } else { 12.0 };
            let key = format!("row-{i}");
            let link = doc.insert_anchor(
                Anchor::new(kind, format!("Row {i}"), Bounds::new(0.0, y, PANEL_WIDTH, 1.0))
                    .with_context(RowContext::Chat, key.clone())
                    .with_icon(Bounds::new(1.0, y, 3.0, 1.0))
                    .with_label_metrics(label_width, 23.0)
                    .in_panel(panel),
            );
            let more = doc.insert_anchor(
                Anchor::new(
                    AnchorKind::MoreButton,
                    "More options",
                    Bounds::new(PANEL_WIDTH - 3.0, y, 3.0, 1.0),
                )
                .with_context(RowContext::Chat, key)
                .for_row(link)
                .in_panel(panel),
            );
            out.push((link, more));
        }
        doc.take_mutations();
        Self {
            doc,
            panel,
            rows: out,
        }
    }
}

fn run_benchmark(config: &BenchConfig) -> io::Result<BenchStats> {
    let mut page = Page::build(config.rows);
    let mut engine = FloatingEngine::new(EngineConfig::terminal(), TerminalMeasure, VIEWPORT)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let mut stats = BenchStats::new();
    let mut now = Duration::ZERO;

    for sweep in 0..config.sweeps {
        let downward = sweep % 2 == 0;
        let order: Vec<usize> = if downward {
            (0..page.rows.len()).collect()
        } else {
            (0..page.rows.len()).rev().collect()
        };
        for index in order {
            let (link, _) = page.rows[index];
            stats.events += 1;
            engine.handle(&mut page.doc, EngineEvent::PointerEnter(link), now);
            now += config.step;
            engine.tick(&page.doc, now);

            // Keep the row under the pointer by scrolling once it leaves view.
            if !page.doc.is_visible_in_panel(link) {
                let delta = if downward { 1.0 } else { -1.0 };
                if page.doc.scroll_panel(page.panel, delta) {
                    stats.events += 1;
                    engine.handle(
                        &mut page.doc,
                        EngineEvent::Scroll(ScrollSource::Panel(page.panel)),
                        now,
                    );
                }
            }
            engine.frame(&page.doc);
            stats.record_visibility(&engine);

            stats.events += 1;
            engine.handle(&mut page.doc, EngineEvent::PointerLeave(link), now);
        }

        // Open and close a menu between sweeps.
        if let Some(&(_, more)) = page.rows.get(sweep % page.rows.len())
            && let Some(bounds) = page.doc.viewport_bounds(more)
        {
            let point = Point::new(bounds.x + 1.0, bounds.y);
            stats.events += 2;
            engine.handle(
                &mut page.doc,
                EngineEvent::Click {
                    point,
                    target: Some(more),
                },
                now,
            );
            if engine.menu().is_open() {
                stats.menus += 1;
            }
            engine.handle(&mut page.doc, EngineEvent::Escape, now);
        }
        now += engine.config().hide_grace;
        engine.tick(&page.doc, now);
    }

    let engine_stats = engine.stats();
    stats.placements = engine.tooltip().stats().placements;
    stats.shows = engine.tooltip().stats().shows;
    stats.peak_pending_timers = engine_stats.peak_pending_timers;
    stats.virtual_time = now;
    stats.mark_completed();
    Ok(stats)
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    events: u64,
    placements: u64,
    shows: u64,
    menus: u64,
    peak_pending_timers: usize,
    double_visible_frames: u64,
    virtual_time: Duration,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            events: 0,
            placements: 0,
            shows: 0,
            menus: 0,
            peak_pending_timers: 0,
            double_visible_frames: 0,
            virtual_time: Duration::ZERO,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_visibility(&mut self, engine: &FloatingEngine<TerminalMeasure>) {
        if engine.tooltip().host().is_visible() && engine.menu().host().is_visible() {
            self.double_visible_frames += 1;
        }
    }

    fn events_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.events as f64 / elapsed
        } else {
            0.0
        }
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        indoc::formatdoc!(
            r#"
            Sweep bench completed.
            Rows: {rows} | Sweeps: {sweeps} | Step: {step} ms
            Events: {events} (~{eps:.0}/s)
            Tooltip shows: {shows} | Placements: {placements} | Menus opened: {menus}
            Peak pending timers: {peak}
            Frames with tooltip and menu visible: {double}
            Virtual time: {virtual_s:.2}s | Wall time: {wall:.3}s
            "#,
            rows = config.rows,
            sweeps = config.sweeps,
            step = config.step.as_millis(),
            events = self.events,
            eps = self.events_per_second(),
            shows = self.shows,
            placements = self.placements,
            menus = self.menus,
            peak = self.peak_pending_timers,
            double = self.double_visible_frames,
            virtual_s = self.virtual_time.as_secs_f64(),
            wall = self.elapsed().as_secs_f64(),
        )
    }
}
