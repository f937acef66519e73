//! Error handling for ROI Bridge
//!
//! Provides error types for all layers of the bridge:
//! - Geometry errors (bounding queries, vertex editing)
//! - Translation errors (mask <-> remote shape conversion)
//! - Session errors (credentials, session lifecycle, current-session stack)
//! - Remote errors (failures surfaced by the remote client collaborator)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised by bounding-interval queries and polyshape vertex editing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Dimension argument outside the planar axes {0, 1}
    #[error("Invalid dimension: {dimension}")]
    InvalidDimension {
        /// The offending dimension index.
        dimension: usize,
    },

    /// Vertex index outside the valid range
    #[error("Vertex index {index} out of range for {len} vertices")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The vertex count at the time of the request.
        len: usize,
    },
}

/// Translation error type
///
/// Represents a mask or remote shape record that cannot be converted.
/// Conversion never falls back to an approximate shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// The geometry kind has no counterpart on the other side
    #[error("Unsupported geometry: {kind}")]
    UnsupportedGeometry {
        /// The geometry kind that could not be converted.
        kind: String,
    },

    /// The record is of a known kind but its data is unusable
    #[error("Malformed {kind} shape: {reason}")]
    MalformedShape {
        /// The shape kind.
        kind: String,
        /// What is wrong with the record.
        reason: String,
    },
}

/// Session error type
///
/// Represents credential validation failures and session lifecycle violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Credentials failed local validation or were rejected by the server
    #[error("Invalid credentials: {reason}")]
    InvalidCredentials {
        /// Why the credentials were rejected.
        reason: String,
    },

    /// No session is available for the request
    #[error("No active session{}", endpoint.as_ref().map(|e| format!(" for server {e}")).unwrap_or_default())]
    NoActiveSession {
        /// The endpoint that was asked for, if any.
        endpoint: Option<String>,
    },

    /// `pop_current` was called on an empty current-session stack
    #[error("Current session stack is empty")]
    EmptySessionStack,

    /// The session has been closed and cannot be used again
    #[error("Session for {endpoint} is closed")]
    SessionClosed {
        /// The endpoint of the closed session.
        endpoint: String,
    },

    /// One or more sessions failed to close during disposal
    #[error("Failed to close {} session(s): {}", failures.len(), failures.join("; "))]
    DisposeFailed {
        /// One message per failed close.
        failures: Vec<String>,
    },
}

/// Category of a remote failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorKind {
    /// Transport-level failure (unreachable, timed out, reset).
    Network,
    /// The server refused the caller's identity or permissions.
    Unauthorized,
    /// The target object does not exist on the server.
    NotFound,
    /// The server rejected the request content.
    Rejected,
    /// The server answered with something the client could not understand.
    Protocol,
}

impl std::fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::NotFound => write!(f, "not found"),
            Self::Rejected => write!(f, "rejected"),
            Self::Protocol => write!(f, "protocol"),
        }
    }
}

/// Remote operation failure
///
/// Wraps any failure surfaced by the remote client with the operation
/// and target that were being attempted.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Remote {operation}{} failed ({kind}): {reason}", target.as_ref().map(|t| format!(" on {t}")).unwrap_or_default())]
pub struct RemoteError {
    /// Name of the remote operation (e.g. `create_shape`).
    pub operation: String,
    /// Target object of the operation, if any.
    pub target: Option<String>,
    /// Failure category.
    pub kind: RemoteErrorKind,
    /// Message reported by the client.
    pub reason: String,
}

impl RemoteError {
    /// Create a remote error for an operation without a specific target
    pub fn new(operation: impl Into<String>, kind: RemoteErrorKind, reason: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            target: None,
            kind,
            reason: reason.into(),
        }
    }

    /// Attach the target of the failed operation
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// Main error type for ROI Bridge
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Translation error
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Remote operation failure
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a translation error
    pub fn is_translation_error(&self) -> bool {
        matches!(self, Error::Translation(_))
    }

    /// Check if this is a session error
    pub fn is_session_error(&self) -> bool {
        matches!(self, Error::Session(_))
    }

    /// Check if this is a remote operation failure
    pub fn is_remote_error(&self) -> bool {
        matches!(self, Error::Remote(_))
    }

    /// Check if this is an invalid-credentials error
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Error::Session(SessionError::InvalidCredentials { .. }))
    }

    /// Check if this is a missing-session error
    pub fn is_no_active_session(&self) -> bool {
        matches!(self, Error::Session(SessionError::NoActiveSession { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_display() {
        let err = GeometryError::InvalidDimension { dimension: 2 };
        assert_eq!(err.to_string(), "Invalid dimension: 2");

        let err = GeometryError::IndexOutOfRange { index: 5, len: 3 };
        assert_eq!(err.to_string(), "Vertex index 5 out of range for 3 vertices");
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::NoActiveSession { endpoint: None };
        assert_eq!(err.to_string(), "No active session");

        let err = SessionError::NoActiveSession {
            endpoint: Some("localhost:4064".to_string()),
        };
        assert_eq!(err.to_string(), "No active session for server localhost:4064");

        let err = SessionError::DisposeFailed {
            failures: vec!["a: reset".to_string(), "b: timeout".to_string()],
        };
        assert_eq!(err.to_string(), "Failed to close 2 session(s): a: reset; b: timeout");
    }

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::new("update_shape", RemoteErrorKind::NotFound, "no such shape")
            .with_target("shape 7");
        assert_eq!(
            err.to_string(),
            "Remote update_shape on shape 7 failed (not found): no such shape"
        );

        let err = RemoteError::new("list_shapes", RemoteErrorKind::Network, "reset");
        assert_eq!(err.to_string(), "Remote list_shapes failed (network): reset");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = SessionError::InvalidCredentials {
            reason: "missing password".to_string(),
        }
        .into();
        assert!(err.is_session_error());
        assert!(err.is_invalid_credentials());
        assert!(!err.is_no_active_session());

        let err: Error = TranslationError::UnsupportedGeometry {
            kind: "label".to_string(),
        }
        .into();
        assert!(err.is_translation_error());

        let err: Error = RemoteError::new("close", RemoteErrorKind::Network, "gone").into();
        assert!(err.is_remote_error());

        let err: Error = GeometryError::InvalidDimension { dimension: 3 }.into();
        assert!(err.is_geometry_error());
    }
}
