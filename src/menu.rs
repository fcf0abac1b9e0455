//! Click-Toggle Menu Controller for contextual "more" menus.
//!
//! `Closed -> Open -> Closed`. At most one menu is open; opening for another
//! trigger closes the current one first. Content is rebuilt on every open
//! from the row's context, so the controller is a small factory rather than
//! a fixed menu.

use crate::collaborators::{RowAction, RowActionKind, RowRef};
use crate::document::{AnchorId, AnchorKind, Mutation, RowContext};
use crate::error::FloatError;
use crate::geometry::{Bounds, Point};
use crate::layout::{Edge, compute_menu_placement};
use crate::portal::{FloatingKind, MenuItem, PortalContent, PortalHost};
use crate::scheduler::{RepositionScheduler, ScrollSource, sources_for};
use crate::session::SessionCtx;

/// Items for a row context. Every context gets the same action set with
/// context-specific labels.
pub fn menu_items(context: RowContext) -> Vec<MenuItem> {
    let noun = context.noun();
    vec![
        MenuItem {
            action: RowActionKind::Rename,
            label: format!("Rename {noun}"),
            destructive: false,
        },
        MenuItem {
            action: RowActionKind::Delete,
            label: format!("Delete {noun}"),
            destructive: true,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    Open {
        trigger: AnchorId,
        row: RowRef,
        context: RowContext,
    },
}

/// What a click did to the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuClick {
    Opened,
    Closed,
    /// An item was chosen; the menu is closed.
    Dispatched(RowAction),
    /// Landed on the menu but not on an item.
    Consumed,
    Ignored,
}

#[derive(Debug)]
pub struct MenuController {
    state: MenuState,
    host: PortalHost,
    scheduler: RepositionScheduler,
    opened: u64,
}

impl Default for MenuController {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuController {
    pub fn new() -> Self {
        Self {
            state: MenuState::Closed,
            host: PortalHost::new(FloatingKind::Menu),
            scheduler: RepositionScheduler::new(),
            opened: 0,
        }
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, MenuState::Open { .. })
    }

    pub fn trigger(&self) -> Option<AnchorId> {
        match &self.state {
            MenuState::Open { trigger, .. } => Some(*trigger),
            MenuState::Closed => None,
        }
    }

    pub fn host(&self) -> &PortalHost {
        &self.host
    }

    pub fn scheduler(&self) -> &RepositionScheduler {
        &self.scheduler
    }

    pub fn opened_count(&self) -> u64 {
        self.opened
    }

    /// Route a click. `target` is the anchor under the pointer, if any.
    pub fn click(
        &mut self,
        cx: &mut SessionCtx<'_>,
        point: Point,
        target: Option<AnchorId>,
    ) -> MenuClick {
        if self.host.contains(point) {
            return self.click_inside(cx, point);
        }
        let is_trigger = target
            .and_then(|id| cx.doc.anchor(id))
            .is_some_and(|a| a.kind == AnchorKind::MoreButton);
        match target {
            Some(trigger) if is_trigger => {
                if self.trigger() == Some(trigger) {
                    self.close();
                    return MenuClick::Closed;
                }
                self.close();
                match self.open(cx, trigger) {
                    Ok(()) => MenuClick::Opened,
                    Err(err) => {
                        tracing::debug!(error = %err, "menu open aborted");
                        self.close();
                        MenuClick::Ignored
                    }
                }
            }
            _ if self.is_open() => {
                self.close();
                MenuClick::Closed
            }
            _ => MenuClick::Ignored,
        }
    }

    fn click_inside(&mut self, cx: &mut SessionCtx<'_>, point: Point) -> MenuClick {
        let index = self.host.menu_item_at(point, cx.measure.menu_metrics());
        let item = match (index, self.host.content()) {
            (Some(index), Some(PortalContent::Menu { items })) => items.get(index).cloned(),
            _ => None,
        };
        let (Some(item), MenuState::Open { row, .. }) = (item, &self.state) else {
            return MenuClick::Consumed;
        };
        let action = RowAction {
            action: item.action,
            row: row.clone(),
        };
        tracing::debug!(action = %action.action, row = %action.row.key, "menu action selected");
        self.close();
        MenuClick::Dispatched(action)
    }

    /// Escape closes regardless of focus. Returns whether a menu was open.
    pub fn escape(&mut self) -> bool {
        let was_open = self.is_open();
        self.close();
        was_open
    }

    /// Scroll an overflowing menu under the pointer.
    pub fn wheel(&mut self, point: Point, delta: f64) -> bool {
        self.is_open() && self.host.contains(point) && self.host.scroll_by(delta)
    }

    pub fn notify(&mut self, source: ScrollSource) -> bool {
        self.scheduler.notify(source)
    }

    pub fn reposition(&mut self, cx: &mut SessionCtx<'_>) {
        if !self.scheduler.take_frame() {
            return;
        }
        let Some(trigger) = self.trigger() else {
            return;
        };
        if !cx.doc.is_visible_in_panel(trigger) {
            tracing::debug!(?trigger, "menu trigger scrolled out of view");
            self.close();
            return;
        }
        let scroll = self.host.scroll_offset();
        match self.place(cx, trigger) {
            Ok(_) => {
                self.host.scroll_by(scroll);
            }
            Err(err) => {
                tracing::debug!(error = %err, "menu reposition aborted");
                self.close();
            }
        }
    }

    pub fn on_mutations(&mut self, cx: &mut SessionCtx<'_>, records: &[Mutation]) {
        if let Some(trigger) = self.trigger()
            && cx.guard.must_close(cx.doc, records, trigger)
        {
            self.close();
        }
    }

    pub fn close(&mut self) {
        if let MenuState::Open { trigger, .. } = &self.state {
            tracing::debug!(trigger = ?trigger, "menu closed");
        }
        self.state = MenuState::Closed;
        self.scheduler.deactivate();
        self.host.hide();
    }

    fn open(&mut self, cx: &mut SessionCtx<'_>, trigger: AnchorId) -> Result<(), FloatError> {
        let (row, context) = self.place(cx, trigger)?;
        self.scheduler.activate(sources_for(cx.doc, trigger));
        self.opened += 1;
        tracing::debug!(?trigger, row = %row.key, "menu opened");
        self.state = MenuState::Open {
            trigger,
            row,
            context,
        };
        Ok(())
    }

    /// Build the items for the trigger's row, measure them and place the host
    /// outside the panel's open edge.
    fn place(
        &mut self,
        cx: &mut SessionCtx<'_>,
        trigger: AnchorId,
    ) -> Result<(RowRef, RowContext), FloatError> {
        let doc = cx.doc;
        cx.guard.ensure_attached(doc, trigger)?;
        let button = doc
            .anchor(trigger)
            .ok_or(FloatError::AnchorDetached(trigger))?;
        let row_id = button
            .row
            .filter(|row| doc.is_attached(*row))
            .unwrap_or(trigger);
        let row = doc.anchor(row_id).unwrap_or(button);
        let context = button
            .context
            .or(row.context)
            .ok_or(FloatError::Unsupported(trigger, "menu"))?;
        let key = button
            .row_key
            .clone()
            .or_else(|| row.row_key.clone())
            .unwrap_or_else(|| row.label.clone());

        let row_bounds = doc
            .viewport_bounds(row_id)
            .ok_or(FloatError::AnchorDetached(row_id))?;
        let panel = button.panel.and_then(|panel| doc.panel(panel));
        let container: Bounds = panel.map(|p| p.bounds).unwrap_or(row_bounds);
        let edge = panel.map(|p| p.open_edge).unwrap_or(Edge::Right);
        if !row_bounds.is_finite() || !container.is_finite() {
            return Err(FloatError::NonFinite(trigger));
        }

        let size = self.host.render(
            PortalContent::Menu {
                items: menu_items(context),
            },
            cx.measure,
        );
        if !size.is_measured() {
            return Err(FloatError::ZeroSize {
                width: size.width,
                height: size.height,
            });
        }
        let placed = compute_menu_placement(
            row_bounds,
            container,
            edge,
            size,
            cx.viewport,
            &cx.config.menu_options(),
        );
        self.host.set_min_width(placed.width);
        self.host.place(&placed.result);
        self.host
            .set_max_height(placed.scrolls.then_some(placed.max_height));
        self.host.reveal();
        Ok((
            RowRef {
                key,
                anchor: row_id,
            },
            context,
        ))
    }
}
