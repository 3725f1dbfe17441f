//! Defines errors returned by the other modules

use crate::names::{ChannelName, ViewId};
use thiserror::Error;

/// Types of error that can occur while looking up session objects
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No such connection {0}")]
    NoSuchConnection(String),
    #[error("No such channel {1} on connection {0}")]
    NoSuchChannel(String, ChannelName),
    #[error("No such view {0:?}")]
    NoSuchView(ViewId),
    #[error("No view is currently focused")]
    NoCurrentView,
}

/// Convenience definition of a Result type used to look up session objects.
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// An error that could occur when handling a protocol event
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Object lookup failed: {0}")]
    LookupError(#[from] LookupError),
    #[error("No channel view for target {0}")]
    UnresolvedTarget(String),
}

impl HandlerError {
    /// Whether this error means the event addressed something we don't track.
    /// These are expected and are dropped quietly.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedTarget(_) | Self::LookupError(LookupError::NoSuchChannel(..))
        )
    }
}

pub type HandleResult = Result<(), HandlerError>;
