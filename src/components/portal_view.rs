//! Terminal rendering of the two portal hosts, plus the text-width
//! [`Measure`] the engine uses to size them.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::geometry::Size;
use crate::portal::{Measure, MenuMetrics, PortalContent, PortalHost};
use crate::theme;
use crate::ui::UiFrame;

const TOOLTIP_DIVIDER: &str = " │ ";

/// Sizes content in terminal cells: one border cell and one padding cell on
/// each side, one row per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalMeasure;

impl TerminalMeasure {
    fn text_width(text: &str) -> f64 {
        Line::from(text).width() as f64
    }
}

impl Measure for TerminalMeasure {
    fn measure(&self, content: &PortalContent) -> Size {
        match content {
            PortalContent::Tooltip { label, secondary } => {
                let mut width = Self::text_width(label);
                if let Some(secondary) = secondary {
                    width += Self::text_width(TOOLTIP_DIVIDER) + Self::text_width(secondary);
                }
                Size::new(width + 4.0, 3.0)
            }
            PortalContent::Menu { items } => {
                let widest = items
                    .iter()
                    .map(|item| Self::text_width(&item.label))
                    .fold(0.0, f64::max);
                Size::new(widest + 4.0, items.len() as f64 + 2.0)
            }
        }
    }

    fn menu_metrics(&self) -> MenuMetrics {
        MenuMetrics {
            item_height: 1.0,
            inset: 1.0,
        }
    }
}

fn tooltip_line(label: &str, secondary: Option<&str>) -> Line<'static> {
    let mut spans = vec![Span::styled(label.to_string(), theme::tooltip_style())];
    if let Some(secondary) = secondary {
        spans.push(Span::styled(TOOLTIP_DIVIDER, theme::tooltip_secondary()));
        spans.push(Span::styled(
            secondary.to_string(),
            theme::tooltip_secondary(),
        ));
    }
    Line::from(spans)
}

pub fn render_tooltip(frame: &mut UiFrame<'_>, host: &PortalHost) {
    if !host.is_visible() {
        return;
    }
    let Some(area) = frame.floating_area(host.bounds()) else {
        return;
    };
    let Some(PortalContent::Tooltip { label, secondary }) = host.content() else {
        return;
    };
    frame.fill(area, theme::tooltip_style());
    let block = Block::default()
        .borders(Borders::ALL)
        .style(theme::tooltip_style());
    let inner = inner_padded(block.inner(area));
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(tooltip_line(label, secondary.as_deref())),
        inner,
    );
}

/// Draw the menu host. `hovered` highlights the item under the pointer.
pub fn render_menu(frame: &mut UiFrame<'_>, host: &PortalHost, hovered: Option<usize>) {
    if !host.is_visible() {
        return;
    }
    let Some(area) = frame.floating_area(host.bounds()) else {
        return;
    };
    let Some(PortalContent::Menu { items }) = host.content() else {
        return;
    };
    let base = Style::default().bg(theme::menu_bg()).fg(theme::menu_fg());
    frame.fill(area, base);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(base.fg(theme::menu_border()))
        .style(base);
    let inner = inner_padded(block.inner(area));
    frame.render_widget(block, area);

    let skip = host.scroll_offset().round().max(0.0) as usize;
    let lines: Vec<Line<'static>> = items
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(index, item)| {
            let mut style = theme::menu_item_style(item.destructive);
            if hovered == Some(index) {
                style = style.bg(theme::row_hover_bg()).fg(theme::row_hover_fg());
            }
            Line::styled(item.label.clone(), style)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).style(base), inner);
}

fn inner_padded(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        width: area.width.saturating_sub(2),
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::RowActionKind;
    use crate::layout::{PlacementResult, Side};
    use crate::portal::{FloatingKind, MenuItem};
    use ratatui::buffer::Buffer;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn tooltip_measure_includes_secondary_and_chrome() {
        let m = TerminalMeasure;
        let plain = m.measure(&PortalContent::Tooltip {
            label: "Inbox".into(),
            secondary: None,
        });
        assert_eq!(plain, Size::new(9.0, 3.0));
        let with_secondary = m.measure(&PortalContent::Tooltip {
            label: "Inbox".into(),
            secondary: Some("3".into()),
        });
        assert_eq!(with_secondary.width, 13.0);
    }

    #[test]
    fn menu_measure_uses_widest_item() {
        let items = vec![
            MenuItem {
                action: RowActionKind::Rename,
                label: "Rename chat".into(),
                destructive: false,
            },
            MenuItem {
                action: RowActionKind::Delete,
                label: "Delete".into(),
                destructive: true,
            },
        ];
        let size = TerminalMeasure.measure(&PortalContent::Menu { items });
        assert_eq!(size, Size::new(15.0, 4.0));
    }

    #[test]
    fn visible_tooltip_is_drawn_at_its_placement() {
        let mut host = PortalHost::new(FloatingKind::Tooltip);
        host.render(
            PortalContent::Tooltip {
                label: "Inbox".into(),
                secondary: None,
            },
            &TerminalMeasure,
        );
        host.place(&PlacementResult {
            left: 2.0,
            top: 1.0,
            side: Side::Right,
            clamped: false,
        });
        host.reveal();

        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        {
            let mut frame = UiFrame::from_parts(area, &mut buf);
            render_tooltip(&mut frame, &host);
        }
        assert!(row_text(&buf, 2).contains("Inbox"));
        assert!(row_text(&buf, 0).trim().is_empty());
    }

    #[test]
    fn hidden_host_draws_nothing() {
        let mut host = PortalHost::new(FloatingKind::Tooltip);
        host.render(
            PortalContent::Tooltip {
                label: "Inbox".into(),
                secondary: None,
            },
            &TerminalMeasure,
        );
        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        {
            let mut frame = UiFrame::from_parts(area, &mut buf);
            render_tooltip(&mut frame, &host);
        }
        for y in 0..area.height {
            assert!(row_text(&buf, y).trim().is_empty());
        }
    }
}
