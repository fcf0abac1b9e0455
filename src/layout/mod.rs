pub mod placement;

pub use placement::*;

use ratatui::prelude::Rect;

use crate::geometry::Bounds;

/// Convert signed engine bounds into a terminal cell rectangle clipped to
/// `area`. Returns `None` when nothing of the bounds is visible, which is the
/// case for portals parked off-screen.
pub fn clip_to_cells(bounds: Bounds, area: Rect) -> Option<Rect> {
    if !bounds.is_finite() || bounds.width <= 0.0 || bounds.height <= 0.0 {
        return None;
    }
    let x0 = bounds.x.round() as i64;
    let y0 = bounds.y.round() as i64;
    let x1 = x0 + bounds.width.round() as i64;
    let y1 = y0 + bounds.height.round() as i64;
    let ax0 = area.x as i64;
    let ay0 = area.y as i64;
    let ax1 = ax0 + area.width as i64;
    let ay1 = ay0 + area.height as i64;
    let cx0 = x0.max(ax0);
    let cy0 = y0.max(ay0);
    let cx1 = x1.min(ax1);
    let cy1 = y1.min(ay1);
    if cx1 <= cx0 || cy1 <= cy0 {
        return None;
    }
    Some(Rect {
        x: cx0 as u16,
        y: cy0 as u16,
        width: (cx1 - cx0) as u16,
        height: (cy1 - cy0) as u16,
    })
}

/// Inverse of [`clip_to_cells`] for rectangles the host lays out itself.
pub fn cells_to_bounds(rect: Rect) -> Bounds {
    Bounds::new(
        rect.x as f64,
        rect.y as f64,
        rect.width as f64,
        rect.height as f64,
    )
}
