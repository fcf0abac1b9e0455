//! Shared crate-wide constants.
//!
//! Geometry values are expressed in pixels. The terminal host overrides the
//! gap and padding with cell-sized values (see [`TERMINAL_GAP`]).

use std::time::Duration;

/// Distance between an anchor (or its containing panel) and the floating
/// element placed next to it.
pub const DEFAULT_GAP: f64 = 12.0;

/// Minimum distance kept between a floating element and any viewport edge.
///
/// Both axes are clamped independently; an element larger than the viewport
/// minus twice this padding is pinned at the padding on that axis.
pub const DEFAULT_VIEWPORT_PADDING: f64 = 8.0;

/// Show delay for icon-only rows and toggle buttons, where the label is not
/// visible at all.
pub const FAST_SHOW_DELAY: Duration = Duration::from_millis(50);

/// Show delay for full-label rows whose label is truncated.
pub const SLOW_SHOW_DELAY: Duration = Duration::from_millis(1000);

/// Grace period between leaving an anchor and hiding its tooltip.
pub const HIDE_GRACE_DELAY: Duration = Duration::from_millis(120);

/// Narrowest a contextual menu is allowed to render.
pub const DEFAULT_MIN_MENU_WIDTH: f64 = 160.0;

/// Height a menu keeps below its row before it is shifted upward instead of
/// being squeezed into a scroll area.
pub const MIN_MENU_VISIBLE_HEIGHT: f64 = 96.0;

/// Off-screen parking coordinate used while a portal is measured or hidden.
pub const OFFSCREEN: f64 = -9999.0;

/// Coalescing window of the reposition scheduler (one rendering frame).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Gap in terminal cells.
pub const TERMINAL_GAP: f64 = 1.0;

/// Viewport padding in terminal cells.
pub const TERMINAL_PADDING: f64 = 1.0;

/// Minimum menu width in terminal cells.
pub const TERMINAL_MIN_MENU_WIDTH: f64 = 18.0;

/// Minimum visible menu height in terminal rows.
pub const TERMINAL_MIN_MENU_VISIBLE_HEIGHT: f64 = 4.0;

/// Panel scroll per mouse wheel notch, in rows.
pub const TERMINAL_WHEEL_STEP: f64 = 1.0;
