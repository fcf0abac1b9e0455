//! Placement Calculator.
//!
//! Pure geometry: given the anchor rectangle, the measured floating size and
//! the viewport, produce a viewport-relative origin for the floating element.
//! Nothing here touches a portal host or the document.
//!
//! # Invariants
//!
//! 1. Identical inputs always yield identical output.
//! 2. Whenever the floating element fits inside the viewport minus padding on
//!    an axis, its whole extent on that axis stays within
//!    `[padding, viewport - padding]`.
//! 3. Coordinates are whole numbers.

use crate::geometry::{Bounds, Size};

/// Side the floating element ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Right,
    Left,
    Below,
    Above,
}

/// Side requested before collision handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredSide {
    /// Right of the anchor itself.
    Right,
    /// Below the anchor.
    Below,
    /// Right of the anchor's containing panel, vertically relative to the anchor.
    RightOfContainer,
}

/// Cross-axis alignment. For horizontal sides `Start` means top-aligned, for
/// `Below` it means left-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Center,
    Start,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipPolicy {
    /// Keep the preferred side even when clipped; clamping alone resolves overflow.
    Never,
    /// Move to the opposite side when the preferred one overflows and the
    /// opposite one fits.
    WhenClipped,
}

/// Open edge of a containing panel; menus are placed just past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOptions {
    pub side: PreferredSide,
    pub align: Align,
    pub gap: f64,
    pub padding: f64,
    pub flip: FlipPolicy,
    /// Containing panel bounds, consulted by [`PreferredSide::RightOfContainer`].
    pub container: Option<Bounds>,
}

impl PlacementOptions {
    pub fn new(side: PreferredSide, align: Align, gap: f64, padding: f64) -> Self {
        Self {
            side,
            align,
            gap,
            padding,
            flip: FlipPolicy::Never,
            container: None,
        }
    }

    #[must_use]
    pub fn with_flip(mut self, flip: FlipPolicy) -> Self {
        self.flip = flip;
        self
    }

    #[must_use]
    pub fn with_container(mut self, container: Bounds) -> Self {
        self.container = Some(container);
        self
    }
}

/// Immutable outcome of a placement request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementResult {
    pub left: f64,
    pub top: f64,
    pub side: Side,
    /// Whether either axis had to be moved to respect the viewport padding.
    pub clamped: bool,
}

pub fn compute_placement(
    anchor: Bounds,
    floating: Size,
    viewport: Size,
    options: &PlacementOptions,
) -> PlacementResult {
    let reference = match (options.side, options.container) {
        (PreferredSide::RightOfContainer, Some(container)) => Bounds {
            x: container.x,
            y: anchor.y,
            width: container.width,
            height: anchor.height,
        },
        _ => anchor,
    };
    let gap = options.gap;
    let (mut side, mut left, mut top) = match options.side {
        PreferredSide::Right | PreferredSide::RightOfContainer => {
            let top = match options.align {
                Align::Center => reference.center_y() - floating.height / 2.0,
                Align::Start => reference.y,
            };
            (Side::Right, reference.right() + gap, top)
        }
        PreferredSide::Below => {
            let left = match options.align {
                Align::Center => reference.center_x() - floating.width / 2.0,
                Align::Start => reference.x,
            };
            (Side::Below, left, reference.bottom() + gap)
        }
    };

    if options.flip == FlipPolicy::WhenClipped {
        match side {
            Side::Right if left + floating.width > viewport.width - options.padding => {
                let alt = reference.x - gap - floating.width;
                if alt >= options.padding {
                    side = Side::Left;
                    left = alt;
                }
            }
            Side::Below if top + floating.height > viewport.height - options.padding => {
                let alt = reference.y - gap - floating.height;
                if alt >= options.padding {
                    side = Side::Above;
                    top = alt;
                }
            }
            _ => {}
        }
    }

    let (left, clamped_x) = clamp_axis(left, floating.width, viewport.width, options.padding);
    let (top, clamped_y) = clamp_axis(top, floating.height, viewport.height, options.padding);
    PlacementResult {
        left,
        top,
        side,
        clamped: clamped_x || clamped_y,
    }
}

/// Clamp one axis into `[padding, limit - padding - extent]` and snap it to a
/// whole number without leaving that range.
fn clamp_axis(start: f64, extent: f64, limit: f64, padding: f64) -> (f64, bool) {
    let min = padding;
    let max = limit - padding - extent;
    let value = if max < min {
        min.ceil()
    } else {
        let v = start.clamp(min, max).round();
        if v > max {
            max.floor()
        } else if v < min {
            min.ceil()
        } else {
            v
        }
    };
    let clamped = if max < min {
        start != value
    } else {
        start < min || start > max
    };
    (value, clamped)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuPlacementOptions {
    pub gap: f64,
    pub padding: f64,
    pub min_width: f64,
    pub min_visible_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuPlacement {
    pub result: PlacementResult,
    /// Rendered width after applying the minimum menu width.
    pub width: f64,
    /// Space left below the menu's top edge; content taller than this scrolls.
    pub max_height: f64,
    pub scrolls: bool,
}

/// Place a contextual menu just outside its panel's open edge, top-aligned
/// with the trigger's row.
///
/// The menu keeps its row alignment while at least `min_visible_height` (or
/// its full height, if smaller) fits below; otherwise it is shifted up. The
/// remaining space below becomes `max_height`.
pub fn compute_menu_placement(
    row: Bounds,
    container: Bounds,
    open_edge: Edge,
    floating: Size,
    viewport: Size,
    options: &MenuPlacementOptions,
) -> MenuPlacement {
    let width = floating.width.max(options.min_width);
    let (side, left) = match open_edge {
        Edge::Right => (Side::Right, container.right() + options.gap),
        Edge::Left => (Side::Left, container.x - options.gap - width),
    };
    let (left, clamped_x) = clamp_axis(left, width, viewport.width, options.padding);

    let floor = viewport.height - options.padding;
    let keep = floating.height.min(options.min_visible_height);
    let mut top = row.y;
    if top + keep > floor {
        top = floor - keep;
    }
    top = top.max(options.padding).round();
    let clamped_y = top != row.y;
    let max_height = (floor - top).max(0.0).floor();

    MenuPlacement {
        result: PlacementResult {
            left,
            top,
            side,
            clamped: clamped_x || clamped_y,
        },
        width,
        max_height,
        scrolls: floating.height > max_height,
    }
}
