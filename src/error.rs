//! Error types surfaced by the bare-metal client.

use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;
use crate::pagination::PaginationError;
use crate::transport::TransportError;

/// Errors raised by bare-metal operations and wait helpers.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum BaremetalError {
    /// Raised when a required field is still empty after default resolution.
    #[error("field {field} is missing or empty")]
    MissingField {
        /// Name of the field as it appears in the request record.
        field: &'static str,
    },
    /// Transport and decoding failures, passed through unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Raised when list responses of different kinds are folded together.
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    /// Raised when the client configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Raised when waiting for an installation that was never requested.
    #[error("installation of server {server_id} has not started")]
    InstallNotStarted {
        /// Identifier of the server without an install record.
        server_id: String,
    },
    /// Raised when a wait deadline elapses before a terminal state is seen.
    #[error("timed out after {timeout:?}")]
    WaitTimeout {
        /// Deadline that elapsed.
        timeout: Duration,
        /// Last status observed before the deadline, when any poll succeeded.
        last_status: Option<String>,
    },
    /// Wraps any failure that ends a wait helper.
    #[error("{context}: {source}")]
    WaitFailed {
        /// Identifies which wait failed.
        context: &'static str,
        /// Underlying failure.
        source: Box<BaremetalError>,
    },
}

impl BaremetalError {
    pub(crate) const fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub(crate) fn wait_failed(context: &'static str, source: Self) -> Self {
        Self::WaitFailed {
            context,
            source: Box::new(source),
        }
    }

    /// Returns the innermost error of a chain of [`BaremetalError::WaitFailed`].
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::WaitFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
