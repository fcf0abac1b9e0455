//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to the
//! visible area.
//!
//! Floating hosts are positioned in engine units and spend part of their life
//! parked far off-screen, so their rectangles routinely fall partly or fully
//! outside the terminal buffer. Every draw goes through `UiFrame`, which
//! clips to the buffer instead of letting `Buffer` panic.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{StatefulWidget, Widget};

use crate::geometry::Bounds;
use crate::layout::clip_to_cells;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer, for headless
    /// rendering in tests and benches.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    /// Visible cells of a floating element, or `None` while it is parked.
    pub fn floating_area(&self, bounds: Bounds) -> Option<Rect> {
        clip_to_cells(bounds, self.area)
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    pub fn render_stateful_widget<W>(&mut self, widget: W, area: Rect, state: &mut W::State)
    where
        W: StatefulWidget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer, state);
        }
    }

    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let area = self.area;
        safe_set_string(self.buffer, area, x, y, text, style);
    }

    pub fn fill(&mut self, area: Rect, style: Style) {
        if let Some(clipped) = self.clip_rect(area) {
            self.buffer.set_style(clipped, style);
            for y in clipped.y..clipped.bottom() {
                for x in clipped.x..clipped.right() {
                    if let Some(cell) = self.buffer.cell_mut((x, y)) {
                        cell.set_symbol(" ");
                    }
                }
            }
        }
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    let bounds = bounds.intersection(buffer.area);
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

/// Truncate with a trailing ellipsis, the way row labels are cut off.
pub(crate) fn ellipsize(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use ratatui::style::Style;

    #[test]
    fn truncate_and_ellipsize() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
        assert_eq!(ellipsize("abcdef", 4), "abc…");
        assert_eq!(ellipsize("abc", 3), "abc");
        assert_eq!(ellipsize("abc", 0), "");
    }

    #[test]
    fn safe_set_string_writes_within_bounds() {
        let bounds = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(bounds);
        safe_set_string(&mut buf, bounds, 1, 0, "hello", Style::default());
        let cell = buf.cell((1, 0)).expect("cell present");
        assert_eq!(cell.symbol(), "h");

        // outside bounds should be ignored (no panic)
        safe_set_string(&mut buf, bounds, 100, 0, "x", Style::default());
    }

    #[test]
    fn parked_floating_element_has_no_area() {
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        let frame = UiFrame::from_parts(area, &mut buf);
        assert_eq!(
            frame.floating_area(Bounds::new(-9999.0, -9999.0, 10.0, 3.0)),
            None
        );
        assert_eq!(
            frame.floating_area(Bounds::new(15.0, 8.0, 10.0, 3.0)),
            Some(Rect::new(15, 8, 5, 2))
        );
    }

    #[test]
    fn render_widget_clips_to_frame_area() {
        let area = Rect::new(0, 0, 5, 3);
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);

        struct FillWidget;
        impl Widget for FillWidget {
            fn render(self, area: Rect, buf: &mut Buffer) {
                for y in area.y..area.y.saturating_add(area.height) {
                    for x in area.x..area.x.saturating_add(area.width) {
                        if let Some(cell) = buf.cell_mut((x, y)) {
                            cell.set_symbol("A");
                        }
                    }
                }
            }
        }

        // Partially outside the right edge.
        ui.render_widget(FillWidget, Rect::new(3, 1, 5, 2));

        assert_eq!(buf.cell((3, 1)).expect("cell present").symbol(), "A");
        assert_eq!(buf.cell((2, 1)).expect("cell present").symbol(), " ");
    }

    #[test]
    fn fill_clears_and_styles_region() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        {
            let mut ui = UiFrame::from_parts(area, &mut buf);
            ui.set_string(0, 0, "xxxx", Style::default());
            ui.fill(Rect::new(1, 0, 10, 1), Style::default().bg(ratatui::style::Color::Red));
        }
        assert_eq!(buf.cell((0, 0)).expect("cell").symbol(), "x");
        assert_eq!(buf.cell((1, 0)).expect("cell").symbol(), " ");
        assert_eq!(
            buf.cell((3, 0)).expect("cell").bg,
            ratatui::style::Color::Red
        );
    }
}
