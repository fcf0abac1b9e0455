use ratatui::style::{Color, Modifier, Style};

use crate::collaborators::ToastKind;

// Centralized theme colors for the terminal host. Everything floating reads
// from here so the tooltip and menu stay visually distinct from the page.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);

pub fn accent() -> Color {
    Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2)
}

// Sidebar
pub fn sidebar_bg() -> Color {
    Color::Black
}
pub fn sidebar_fg() -> Color {
    Color::Gray
}
pub fn sidebar_header_fg() -> Color {
    Color::DarkGray
}
pub fn row_hover_bg() -> Color {
    Color::DarkGray
}
pub fn row_hover_fg() -> Color {
    Color::White
}

// Tooltip
pub fn tooltip_style() -> Style {
    Style::default().bg(Color::White).fg(Color::Black)
}
pub fn tooltip_secondary() -> Style {
    tooltip_style().fg(Color::DarkGray)
}

// Menu
pub fn menu_bg() -> Color {
    Color::DarkGray
}
pub fn menu_fg() -> Color {
    Color::White
}
pub fn menu_border() -> Color {
    accent()
}
pub fn menu_destructive_fg() -> Color {
    Color::LightRed
}

pub fn menu_item_style(destructive: bool) -> Style {
    let fg = if destructive {
        menu_destructive_fg()
    } else {
        menu_fg()
    };
    Style::default().bg(menu_bg()).fg(fg)
}

// Toasts
pub fn toast_style(kind: ToastKind) -> Style {
    let bg = match kind {
        ToastKind::Info => Color::Blue,
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
    };
    Style::default()
        .bg(bg)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

// Status bar
pub fn status_style() -> Style {
    Style::default().bg(Color::Blue).fg(Color::White)
}
