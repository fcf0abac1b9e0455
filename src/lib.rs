//! Floating portal positioning and hover-intent engine.
//!
//! Tooltips and contextual menus are rendered into one shared host per kind,
//! outside the layout of the element that triggered them, and placed next to
//! that anchor with viewport-collision clamping. A timed hover-intent state
//! machine decides when tooltips appear; a click-toggle controller owns the
//! row menus. [`engine::FloatingEngine`] composes both behind a single
//! event entry point. The terminal modules (`components`, `drivers`,
//! `event_loop`, `input`, `ui`) host the engine on a ratatui screen.

pub mod collaborators;
pub mod components;
pub mod config;
pub mod constants;
pub mod document;
pub mod drivers;
pub mod engine;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod lifecycle;
pub mod menu;
pub mod portal;
pub mod scheduler;
pub mod session;
pub mod theme;
pub mod timer;
pub mod tooltip;
pub mod tracing_sub;
pub mod ui;
