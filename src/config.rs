//! Engine tunables.
//!
//! Defaults are pixel values for a browser-sized viewport; [`EngineConfig::terminal`]
//! returns cell-sized values for the terminal host.

use std::time::Duration;

use crate::constants::{
    DEFAULT_GAP, DEFAULT_MIN_MENU_WIDTH, DEFAULT_VIEWPORT_PADDING, FAST_SHOW_DELAY, FRAME_INTERVAL,
    HIDE_GRACE_DELAY, MIN_MENU_VISIBLE_HEIGHT, SLOW_SHOW_DELAY, TERMINAL_GAP,
    TERMINAL_MIN_MENU_VISIBLE_HEIGHT, TERMINAL_MIN_MENU_WIDTH, TERMINAL_PADDING,
};
use crate::document::{Anchor, AnchorKind};
use crate::error::ConfigError;
use crate::geometry::Bounds;
use crate::layout::{Align, FlipPolicy, MenuPlacementOptions, PlacementOptions, PreferredSide};

/// Placement policy for one anchor kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindPolicy {
    pub side: PreferredSide,
    pub align: Align,
    pub flip: FlipPolicy,
}

impl KindPolicy {
    pub const fn new(side: PreferredSide, align: Align) -> Self {
        Self {
            side,
            align,
            flip: FlipPolicy::Never,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub gap: f64,
    pub padding: f64,
    pub fast_delay: Duration,
    pub slow_delay: Duration,
    pub hide_grace: Duration,
    pub min_menu_width: f64,
    pub min_menu_visible_height: f64,
    pub frame_interval: Duration,
    row_link: KindPolicy,
    icon_only: KindPolicy,
    toggle_button: KindPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            padding: DEFAULT_VIEWPORT_PADDING,
            fast_delay: FAST_SHOW_DELAY,
            slow_delay: SLOW_SHOW_DELAY,
            hide_grace: HIDE_GRACE_DELAY,
            min_menu_width: DEFAULT_MIN_MENU_WIDTH,
            min_menu_visible_height: MIN_MENU_VISIBLE_HEIGHT,
            frame_interval: FRAME_INTERVAL,
            row_link: KindPolicy::new(PreferredSide::RightOfContainer, Align::Center),
            icon_only: KindPolicy::new(PreferredSide::Right, Align::Center),
            toggle_button: KindPolicy::new(PreferredSide::Below, Align::Center),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults scaled to terminal cells.
    pub fn terminal() -> Self {
        Self {
            gap: TERMINAL_GAP,
            padding: TERMINAL_PADDING,
            min_menu_width: TERMINAL_MIN_MENU_WIDTH,
            min_menu_visible_height: TERMINAL_MIN_MENU_VISIBLE_HEIGHT,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_delays(mut self, fast: Duration, slow: Duration) -> Self {
        self.fast_delay = fast;
        self.slow_delay = slow;
        self
    }

    #[must_use]
    pub fn with_hide_grace(mut self, grace: Duration) -> Self {
        self.hide_grace = grace;
        self
    }

    #[must_use]
    pub fn with_min_menu_width(mut self, width: f64) -> Self {
        self.min_menu_width = width;
        self
    }

    /// Replace the policy of one kind. Toggle buttons keep `FlipPolicy::Never`
    /// whatever `policy` asks for.
    #[must_use]
    pub fn with_policy(mut self, kind: AnchorKind, policy: KindPolicy) -> Self {
        match kind {
            AnchorKind::RowLink => self.row_link = policy,
            AnchorKind::IconOnly => self.icon_only = policy,
            AnchorKind::ToggleButton => {
                self.toggle_button = KindPolicy {
                    flip: FlipPolicy::Never,
                    ..policy
                }
            }
            AnchorKind::MoreButton => {}
        }
        self
    }

    /// Set the flip policy of every tooltip-bearing kind except toggle
    /// buttons, which always stay below their button.
    #[must_use]
    pub fn with_flip(mut self, flip: FlipPolicy) -> Self {
        self.row_link.flip = flip;
        self.icon_only.flip = flip;
        self
    }

    /// Tooltip placement policy; "more" buttons have none.
    pub fn policy(&self, kind: AnchorKind) -> Option<KindPolicy> {
        match kind {
            AnchorKind::RowLink => Some(self.row_link),
            AnchorKind::IconOnly => Some(self.icon_only),
            AnchorKind::ToggleButton => Some(self.toggle_button),
            AnchorKind::MoreButton => None,
        }
    }

    /// Hover-intent delay for an anchor, or `None` when hovering it never
    /// schedules a tooltip. Full-label rows only qualify while truncated.
    pub fn show_delay(&self, anchor: &Anchor) -> Option<Duration> {
        match anchor.kind {
            AnchorKind::IconOnly | AnchorKind::ToggleButton => Some(self.fast_delay),
            AnchorKind::RowLink if anchor.is_truncated() => Some(self.slow_delay),
            AnchorKind::RowLink | AnchorKind::MoreButton => None,
        }
    }

    pub fn placement_options(
        &self,
        kind: AnchorKind,
        container: Option<Bounds>,
    ) -> Option<PlacementOptions> {
        let policy = self.policy(kind)?;
        let mut options = PlacementOptions::new(policy.side, policy.align, self.gap, self.padding)
            .with_flip(policy.flip);
        if let Some(container) = container {
            options = options.with_container(container);
        }
        Some(options)
    }

    pub fn menu_options(&self) -> MenuPlacementOptions {
        MenuPlacementOptions {
            gap: self.gap,
            padding: self.padding,
            min_width: self.min_menu_width,
            min_visible_height: self.min_menu_visible_height,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let lengths = [
            ("gap", self.gap),
            ("padding", self.padding),
            ("minimum menu width", self.min_menu_width),
            ("minimum visible menu height", self.min_menu_visible_height),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidLength { name, value });
            }
        }
        if self.slow_delay < self.fast_delay {
            return Err(ConfigError::DelayOrder {
                fast_ms: self.fast_delay.as_millis(),
                slow_ms: self.slow_delay.as_millis(),
            });
        }
        if self.frame_interval.is_zero() {
            return Err(ConfigError::ZeroFrameInterval);
        }
        Ok(())
    }
}
