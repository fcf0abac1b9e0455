use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod portal_view;
pub mod sidebar;
pub mod status_bar;
pub mod toast;

pub use portal_view::{TerminalMeasure, render_menu, render_tooltip};
pub use sidebar::{Sidebar, SidebarEntry, SidebarRow};
pub use status_bar::StatusBar;
pub use toast::{Toast, ToastStack};

/// Self-contained widgets that own everything they draw.
pub trait Component {
    fn resize(&mut self, _area: Rect) {}

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect);
}
