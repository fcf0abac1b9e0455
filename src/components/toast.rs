//! Toast stack: transient notifications in the bottom-right corner.

use std::time::Duration;

use ratatui::layout::Rect;

use crate::collaborators::{Notifier, ToastKind};
use crate::theme;
use crate::ui::{UiFrame, truncate_to_width};

const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    expires_at: Duration,
}

/// Toasts expire against the same clock the engine runs on; call
/// [`ToastStack::advance`] from the loop.
#[derive(Debug, Default)]
pub struct ToastStack {
    toasts: Vec<Toast>,
    now: Duration,
}

impl ToastStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, now: Duration) {
        self.now = now;
        self.toasts.retain(|toast| toast.expires_at > now);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Notifier for ToastStack {
    fn show(&mut self, message: &str, kind: ToastKind, duration_ms: u64) {
        tracing::debug!(?kind, text = message, "toast");
        self.toasts.push(Toast {
            message: message.to_string(),
            kind,
            expires_at: self.now + Duration::from_millis(duration_ms),
        });
    }
}

impl super::Component for ToastStack {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if area.width < 4 || area.height == 0 {
            return;
        }
        let mut y = area.bottom();
        for toast in self.toasts.iter().rev().take(MAX_VISIBLE) {
            if y <= area.y {
                break;
            }
            y -= 1;
            let text = truncate_to_width(&format!(" {} ", toast.message), area.width as usize);
            let width = text.chars().count() as u16;
            let x = area.right().saturating_sub(width);
            let style = theme::toast_style(toast.kind);
            frame.fill(Rect::new(x, y, width, 1), style);
            frame.set_string(x, y, &text, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;
    use ratatui::buffer::Buffer;

    #[test]
    fn toasts_expire_on_advance() {
        let mut stack = ToastStack::new();
        stack.advance(Duration::from_millis(100));
        stack.show("Deleted", ToastKind::Success, 500);
        stack.advance(Duration::from_millis(599));
        assert_eq!(stack.toasts().len(), 1);
        stack.advance(Duration::from_millis(600));
        assert!(stack.is_empty());
    }

    #[test]
    fn newest_toast_sits_on_the_bottom_row() {
        let mut stack = ToastStack::new();
        stack.show("first", ToastKind::Info, 1000);
        stack.show("second", ToastKind::Error, 1000);
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        {
            let mut frame = UiFrame::from_parts(area, &mut buf);
            stack.render(&mut frame, area);
        }
        let row = |y: u16| -> String {
            (0..20)
                .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
                .collect()
        };
        assert!(row(3).contains("second"));
        assert!(row(2).contains("first"));
    }
}
