//! Portal hosts: the single floating element of each kind.
//!
//! A host is attached lazily on its first render and never detached again,
//! only hidden. It owns visual state (content, position, visibility) and no
//! layout logic; positions come from [`crate::layout`].

use crate::collaborators::RowActionKind;
use crate::constants::OFFSCREEN;
use crate::geometry::{Bounds, Point, Size};
use crate::layout::PlacementResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatingKind {
    Tooltip,
    Menu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub action: RowActionKind,
    pub label: String,
    pub destructive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalContent {
    /// Label plus optional secondary text, drawn with a divider between them.
    Tooltip {
        label: String,
        secondary: Option<String>,
    },
    Menu { items: Vec<MenuItem> },
}

/// Vertical layout of menu rows inside a host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuMetrics {
    pub item_height: f64,
    /// Border/padding above the first item.
    pub inset: f64,
}

/// Measures rendered content. Implemented by the platform host.
pub trait Measure {
    fn measure(&self, content: &PortalContent) -> Size;
    fn menu_metrics(&self) -> MenuMetrics;
}

impl<M: Measure + ?Sized> Measure for &M {
    fn measure(&self, content: &PortalContent) -> Size {
        (**self).measure(content)
    }

    fn menu_metrics(&self) -> MenuMetrics {
        (**self).menu_metrics()
    }
}

#[derive(Debug, Clone)]
pub struct PortalHost {
    kind: FloatingKind,
    attached: bool,
    content: Option<PortalContent>,
    left: f64,
    top: f64,
    size: Size,
    max_height: Option<f64>,
    scroll: f64,
    visible: bool,
    placement: Option<PlacementResult>,
}

impl PortalHost {
    pub fn new(kind: FloatingKind) -> Self {
        Self {
            kind,
            attached: false,
            content: None,
            left: OFFSCREEN,
            top: OFFSCREEN,
            size: Size::default(),
            max_height: None,
            scroll: 0.0,
            visible: false,
            placement: None,
        }
    }

    pub fn kind(&self) -> FloatingKind {
        self.kind
    }

    /// Replace the content and measure it while parked off-screen.
    ///
    /// This is the first pass of the two-pass layout: the returned size comes
    /// from the freshly rendered content, never from an earlier show.
    pub fn render(&mut self, content: PortalContent, measure: &dyn Measure) -> Size {
        if !self.attached {
            tracing::debug!(kind = ?self.kind, "attaching portal host");
            self.attached = true;
        }
        self.left = OFFSCREEN;
        self.top = OFFSCREEN;
        self.visible = false;
        self.max_height = None;
        self.scroll = 0.0;
        self.placement = None;
        self.size = measure.measure(&content);
        self.content = Some(content);
        self.size
    }

    /// Widen (never narrow) the measured content, e.g. to a minimum menu width.
    pub fn set_min_width(&mut self, width: f64) {
        self.size.width = self.size.width.max(width);
    }

    pub fn place(&mut self, result: &PlacementResult) {
        self.left = result.left;
        self.top = result.top;
        self.placement = Some(*result);
        self.clamp_scroll();
    }

    pub fn set_max_height(&mut self, max_height: Option<f64>) {
        self.max_height = max_height;
        self.clamp_scroll();
    }

    pub fn reveal(&mut self) {
        self.visible = true;
    }

    /// Park off-screen and drop the visible state. Content is kept so a
    /// fading transition can still draw it.
    pub fn hide(&mut self) {
        self.left = OFFSCREEN;
        self.top = OFFSCREEN;
        self.visible = false;
        self.placement = None;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> Option<&PortalContent> {
        self.content.as_ref()
    }

    pub fn placement(&self) -> Option<PlacementResult> {
        self.placement
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn max_height(&self) -> Option<f64> {
        self.max_height
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    /// Bounds as drawn, with the height limited by `max_height`.
    pub fn bounds(&self) -> Bounds {
        let height = match self.max_height {
            Some(max) => self.size.height.min(max),
            None => self.size.height,
        };
        Bounds::new(self.left, self.top, self.size.width, height)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.visible && self.bounds().contains(point)
    }

    /// Index of the menu item under `point`, accounting for internal scroll.
    pub fn menu_item_at(&self, point: Point, metrics: MenuMetrics) -> Option<usize> {
        let Some(PortalContent::Menu { items }) = &self.content else {
            return None;
        };
        if !self.contains(point) || metrics.item_height <= 0.0 {
            return None;
        }
        let bounds = self.bounds();
        let inner_top = bounds.y + metrics.inset;
        let inner_bottom = bounds.bottom() - metrics.inset;
        if point.y < inner_top || point.y >= inner_bottom {
            return None;
        }
        let offset = point.y - inner_top + self.scroll;
        let index = (offset / metrics.item_height).floor() as usize;
        (index < items.len()).then_some(index)
    }

    /// Scroll overflowing content. Returns whether the offset changed.
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        let before = self.scroll;
        self.scroll += delta;
        self.clamp_scroll();
        self.scroll != before
    }

    fn clamp_scroll(&mut self) {
        let overflow = match self.max_height {
            Some(max) => (self.size.height - max).max(0.0),
            None => 0.0,
        };
        self.scroll = self.scroll.clamp(0.0, overflow);
    }
}
