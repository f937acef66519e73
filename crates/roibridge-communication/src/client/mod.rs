//! Remote client boundary.
//!
//! The bridge never speaks the server protocol itself. A [`RemoteClient`]
//! authenticates, hands out connection handles and performs the shape and
//! ROI calls; sessions wrap its failures with operation context.

pub mod memory;

use roibridge_core::{RemoteError, RemoteErrorKind, RemoteId};
use roibridge_geometry::{RoiRecord, ShapeRecord};
use thiserror::Error;
use uuid::Uuid;

use crate::endpoint::{Credentials, Endpoint};

/// Failure reported by a remote client
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl ClientError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Network, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::NotFound, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Rejected, message)
    }

    /// Attach the failed operation and its target
    pub fn into_remote(self, operation: &str, target: Option<String>) -> RemoteError {
        let err = RemoteError::new(operation, self.kind, self.message);
        match target {
            Some(target) => err.with_target(target),
            None => err,
        }
    }
}

/// An open, authenticated connection issued by a client
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionHandle {
    id: Uuid,
    user: String,
}

impl ConnectionHandle {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: user.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

/// Remote image server client
///
/// Implementations may block the calling thread on network I/O and must be
/// shareable across threads.
pub trait RemoteClient: Send + Sync {
    /// Open an authenticated connection within `endpoint.timeout()`
    fn authenticate(
        &self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> Result<ConnectionHandle, ClientError>;

    /// Check that the connection is still usable
    fn keep_alive(&self, _handle: &ConnectionHandle) -> Result<(), ClientError> {
        Ok(())
    }

    /// Close the connection
    fn close(&self, handle: &ConnectionHandle) -> Result<(), ClientError>;

    /// All shapes of all ROIs attached to an image, in server order, each
    /// carrying its ROI's name
    fn list_shapes_for_image(
        &self,
        handle: &ConnectionHandle,
        image_id: RemoteId,
    ) -> Result<Vec<ShapeRecord>, ClientError>;

    /// Shapes of one ROI, in server order
    fn list_shapes_for_roi(
        &self,
        handle: &ConnectionHandle,
        roi_id: RemoteId,
    ) -> Result<Vec<ShapeRecord>, ClientError>;

    /// Image and name of one ROI
    fn describe_roi(
        &self,
        handle: &ConnectionHandle,
        roi_id: RemoteId,
    ) -> Result<RoiRecord, ClientError>;

    /// Create an empty ROI on an image
    fn create_roi(
        &self,
        handle: &ConnectionHandle,
        image_id: RemoteId,
        name: Option<&str>,
    ) -> Result<RemoteId, ClientError>;

    /// Create a shape inside the ROI named by `record.roi_id`
    fn create_shape(
        &self,
        handle: &ConnectionHandle,
        record: &ShapeRecord,
    ) -> Result<RemoteId, ClientError>;

    /// Replace the geometry, planes and text of an existing shape
    fn update_shape(
        &self,
        handle: &ConnectionHandle,
        shape_id: RemoteId,
        record: &ShapeRecord,
    ) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_remote_keeps_context() {
        let err = ClientError::not_found("no shape 9").into_remote("update_shape", Some("shape 9".into()));
        assert_eq!(err.operation, "update_shape");
        assert_eq!(err.target.as_deref(), Some("shape 9"));
        assert_eq!(err.kind, RemoteErrorKind::NotFound);
        assert_eq!(err.reason, "no shape 9");
    }

    #[test]
    fn test_handles_are_unique() {
        assert_ne!(ConnectionHandle::new("a").id(), ConnectionHandle::new("a").id());
    }
}
