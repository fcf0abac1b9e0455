//! Interfaces of the systems around the engine.
//!
//! The engine drives none of these directly. It returns a [`RowAction`] when
//! a menu item is chosen and reacts to [`ContentLoaded`] like a navigation;
//! the host wires both to whatever implements these traits.

use std::fmt;

use crate::document::AnchorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowActionKind {
    Rename,
    Delete,
}

impl RowActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RowActionKind::Rename => "rename",
            RowActionKind::Delete => "delete",
        }
    }
}

impl fmt::Display for RowActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the row a menu was opened from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRef {
    pub key: String,
    pub anchor: AnchorId,
}

/// Structured action handed to the row-action handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub action: RowActionKind,
    pub row: RowRef,
}

/// Performs rename/delete for a row.
pub trait RowActionHandler {
    fn perform(&mut self, action: RowAction);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// Toast component contract.
pub trait Notifier {
    fn show(&mut self, message: &str, kind: ToastKind, duration_ms: u64);
}

/// Raised by the modal pipeline after it swapped a fragment into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentLoaded;
