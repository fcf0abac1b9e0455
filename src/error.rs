use thiserror::Error;

use crate::document::{AnchorId, PanelId};

/// Failures on the show/placement path.
///
/// None of these reach the user: controllers catch them at their boundary,
/// log at debug level and treat the request as a close.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FloatError {
    #[error("anchor {0:?} is no longer attached to the document")]
    AnchorDetached(AnchorId),
    #[error("panel {0:?} containing the anchor is no longer attached")]
    PanelDetached(PanelId),
    #[error("floating content measured as {width}x{height}")]
    ZeroSize { width: f64, height: f64 },
    #[error("non-finite geometry for anchor {0:?}")]
    NonFinite(AnchorId),
    #[error("anchor {0:?} does not take a {1} session")]
    Unsupported(AnchorId, &'static str),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidLength { name: &'static str, value: f64 },
    #[error("slow show delay ({slow_ms} ms) must not be shorter than the fast one ({fast_ms} ms)")]
    DelayOrder { fast_ms: u128, slow_ms: u128 },
    #[error("frame interval must be non-zero")]
    ZeroFrameInterval,
}
