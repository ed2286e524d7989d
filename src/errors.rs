//! Unified error type for engine operations.
//!
//! The engine distinguishes caller mistakes (bad filters, bad config) from
//! upstream data-store failures. Only the latter are retryable; everything
//! else must be fixed by the caller. Empty data and short history are not
//! errors at all — they degrade to empty snapshots and low-confidence
//! output instead.

use crate::filters::DateRange;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// Malformed or unrecognized group/date filter. Raised before any store
    /// access.
    #[error("invalid filter: {message}")]
    InvalidFilter { message: String },

    /// Data-store fetch failure. Retryable; the requested range is attached
    /// so callers can re-issue the fetch.
    #[error("upstream fetch failed for {range}: {message}")]
    Upstream { message: String, range: DateRange },

    /// Invalid engine configuration.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl EngineError {
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>, range: DateRange) -> Self {
        Self::Upstream {
            message: message.into(),
            range,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether retrying the same call can succeed without caller changes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }

    /// Whether the caller can fix the error by correcting its input.
    pub fn is_caller_fixable(&self) -> bool {
        matches!(self, Self::InvalidFilter { .. } | Self::Config { .. })
    }
}
