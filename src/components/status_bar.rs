use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::menu::MenuState;
use crate::tooltip::TooltipState;
use crate::ui::{UiFrame, truncate_to_width};

/// One-line summary of the engine's sessions along the bottom edge.
pub struct StatusBar {
    left: String,
    right: String,
    style: Style,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            left: String::new(),
            right: String::new(),
            style: Style::default(),
        }
    }

    pub fn set_left<T: Into<String>>(&mut self, value: T) {
        self.left = value.into();
    }

    pub fn set_right<T: Into<String>>(&mut self, value: T) {
        self.right = value.into();
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    /// Describe both sessions and the number of armed timers.
    pub fn describe(&mut self, tooltip: TooltipState, menu: &MenuState, timers: usize) {
        let tooltip = match tooltip {
            TooltipState::Idle => "idle",
            TooltipState::Pending { .. } => "pending",
            TooltipState::Shown { .. } => "shown",
            TooltipState::Hiding { .. } => "hiding",
        };
        let menu = match menu {
            MenuState::Closed => "closed".to_string(),
            MenuState::Open { row, .. } => format!("open ({})", row.key),
        };
        self.set_left(format!(" tooltip: {tooltip} | menu: {menu}"));
        self.set_right(format!("timers: {timers} | esc closes | ctrl+b sidebar | q quits "));
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Component for StatusBar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let y = area.y;
        let x = area.x;
        let width = area.width as usize;
        frame.fill(Rect { height: 1, ..area }, self.style);

        let left = truncate_to_width(&self.left, width);
        frame.set_string(x, y, &left, self.style);

        if !self.right.is_empty() {
            let right = truncate_to_width(&self.right, width);
            let right_width = right.chars().count();
            if right_width + left.chars().count() < width {
                let start_x = x.saturating_add((width - right_width) as u16);
                frame.set_string(start_x, y, &right, self.style);
            }
        }
    }
}
