//! Authenticated sessions.
//!
//! A [`Session`] is one open connection to one server endpoint. It moves from
//! active to closed exactly once; a closed session refuses every remote call
//! and is never reopened. Remote failures are wrapped into [`RemoteError`](roibridge_core::RemoteError)
//! carrying the operation name and its target.

pub mod current;
pub mod registry;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use roibridge_core::{RemoteErrorKind, RemoteId, Result, SessionError};
use roibridge_geometry::{RoiRecord, ShapeRecord};
use std::sync::Arc;
use uuid::Uuid;

use crate::client::{ClientError, ConnectionHandle, RemoteClient};
use crate::endpoint::{Credentials, Endpoint};

/// Unique session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Session({})", &self.0.to_string()[..8])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Closed,
}

/// One authenticated connection to one server
pub struct Session {
    id: SessionId,
    endpoint: Endpoint,
    user: String,
    created_at: DateTime<Utc>,
    client: Arc<dyn RemoteClient>,
    /// `None` once closed
    handle: RwLock<Option<ConnectionHandle>>,
}

impl Session {
    /// Validate `credentials` and authenticate against `endpoint`.
    ///
    /// Invalid credentials fail before the client is contacted; a server
    /// refusal also surfaces as [`SessionError::InvalidCredentials`].
    pub fn open(
        endpoint: Endpoint,
        credentials: &Credentials,
        client: Arc<dyn RemoteClient>,
    ) -> Result<Self> {
        credentials.validate()?;
        let handle = authenticate(client.as_ref(), &endpoint, credentials)?;

        let session = Self {
            id: SessionId::new(),
            endpoint,
            user: credentials.user().to_string(),
            created_at: Utc::now(),
            client,
            handle: RwLock::new(Some(handle)),
        };
        tracing::info!(
            session = %session.id,
            endpoint = %session.endpoint,
            user = %session.user,
            "Session opened"
        );
        Ok(session)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn state(&self) -> SessionState {
        if self.handle.read().is_some() {
            SessionState::Active
        } else {
            SessionState::Closed
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// Check the connection and re-authenticate if the server dropped it.
    ///
    /// Without credentials a dead connection is reported as a remote error.
    pub fn restore(&self, credentials: Option<&Credentials>) -> Result<()> {
        let mut guard = self.handle.write();
        let handle = guard.as_ref().ok_or_else(|| self.closed())?;

        let err = match self.client.keep_alive(handle) {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };
        let Some(credentials) = credentials else {
            return Err(err.into_remote("keep_alive", Some(self.endpoint.to_string())).into());
        };

        tracing::debug!(session = %self.id, endpoint = %self.endpoint, error = %err, "Re-authenticating");
        credentials.validate()?;
        let fresh = authenticate(self.client.as_ref(), &self.endpoint, credentials)?;
        *guard = Some(fresh);
        Ok(())
    }

    /// Close the connection; later calls fail with `SessionClosed`
    pub(crate) fn close(&self) -> Result<()> {
        let Some(handle) = self.handle.write().take() else {
            return Ok(());
        };
        self.client
            .close(&handle)
            .map_err(|e| e.into_remote("close", Some(self.endpoint.to_string())))?;
        tracing::info!(session = %self.id, endpoint = %self.endpoint, "Session closed");
        Ok(())
    }

    pub fn list_shapes_for_image(&self, image_id: RemoteId) -> Result<Vec<ShapeRecord>> {
        self.call("list_shapes_for_image", format!("image {image_id}"), |client, handle| {
            client.list_shapes_for_image(handle, image_id)
        })
    }

    pub fn list_shapes_for_roi(&self, roi_id: RemoteId) -> Result<Vec<ShapeRecord>> {
        self.call("list_shapes_for_roi", format!("roi {roi_id}"), |client, handle| {
            client.list_shapes_for_roi(handle, roi_id)
        })
    }

    pub fn describe_roi(&self, roi_id: RemoteId) -> Result<RoiRecord> {
        self.call("describe_roi", format!("roi {roi_id}"), |client, handle| {
            client.describe_roi(handle, roi_id)
        })
    }

    pub fn create_roi(&self, image_id: RemoteId, name: Option<&str>) -> Result<RemoteId> {
        self.call("create_roi", format!("image {image_id}"), |client, handle| {
            client.create_roi(handle, image_id, name)
        })
    }

    pub fn create_shape(&self, record: &ShapeRecord) -> Result<RemoteId> {
        let target = match record.roi_id {
            Some(roi_id) => format!("roi {roi_id}"),
            None => "unassigned roi".to_string(),
        };
        self.call("create_shape", target, |client, handle| {
            client.create_shape(handle, record)
        })
    }

    pub fn update_shape(&self, shape_id: RemoteId, record: &ShapeRecord) -> Result<()> {
        self.call("update_shape", format!("shape {shape_id}"), |client, handle| {
            client.update_shape(handle, shape_id, record)
        })
    }

    fn call<T>(
        &self,
        operation: &str,
        target: String,
        f: impl FnOnce(&dyn RemoteClient, &ConnectionHandle) -> std::result::Result<T, ClientError>,
    ) -> Result<T> {
        let guard = self.handle.read();
        let handle = guard.as_ref().ok_or_else(|| self.closed())?;
        f(self.client.as_ref(), handle).map_err(|e| {
            tracing::debug!(session = %self.id, operation, target = %target, error = %e, "Remote call failed");
            e.into_remote(operation, Some(target)).into()
        })
    }

    fn closed(&self) -> SessionError {
        SessionError::SessionClosed {
            endpoint: self.endpoint.to_string(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint)
            .field("user", &self.user)
            .field("created_at", &self.created_at)
            .field("state", &self.state())
            .finish()
    }
}

fn authenticate(
    client: &dyn RemoteClient,
    endpoint: &Endpoint,
    credentials: &Credentials,
) -> Result<ConnectionHandle> {
    client
        .authenticate(endpoint, credentials)
        .map_err(|e| -> roibridge_core::Error {
            match e.kind {
                RemoteErrorKind::Unauthorized => {
                    SessionError::InvalidCredentials { reason: e.message }.into()
                }
                _ => e.into_remote("authenticate", Some(endpoint.to_string())).into(),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::InMemoryClient;

    fn client() -> Arc<InMemoryClient> {
        Arc::new(InMemoryClient::new().with_user("root", "omero").with_image(1u64))
    }

    #[test]
    fn test_open_and_close() {
        let client = client();
        let session = Session::open(
            Endpoint::new("localhost", 4064),
            &Credentials::new("root", "omero"),
            client.clone(),
        )
        .unwrap();
        assert!(session.is_active());
        assert_eq!(session.user(), "root");

        session.close().unwrap();
        assert_eq!(session.state(), SessionState::Closed);
        let err = session.list_shapes_for_image(RemoteId(1)).unwrap_err();
        assert!(matches!(err, roibridge_core::Error::Session(SessionError::SessionClosed { .. })));
        assert_eq!(client.counters().closes, 1);

        // closing twice is a no-op
        session.close().unwrap();
        assert_eq!(client.counters().closes, 1);
    }

    #[test]
    fn test_server_refusal_is_invalid_credentials() {
        let err = Session::open(
            Endpoint::new("localhost", 4064),
            &Credentials::new("root", "wrong"),
            client(),
        )
        .unwrap_err();
        assert!(err.is_invalid_credentials());
    }

    #[test]
    fn test_network_failure_is_remote_error() {
        let client = client();
        client.fail_next("authenticate", ClientError::network("unreachable"));
        let err = Session::open(
            Endpoint::new("localhost", 4064),
            &Credentials::new("root", "omero"),
            client,
        )
        .unwrap_err();
        match err {
            roibridge_core::Error::Remote(remote) => {
                assert_eq!(remote.operation, "authenticate");
                assert_eq!(remote.target.as_deref(), Some("localhost:4064"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_slow_server_times_out() {
        let client = Arc::new(
            InMemoryClient::new()
                .with_user("root", "omero")
                .with_latency(std::time::Duration::from_millis(40)),
        );
        let endpoint =
            Endpoint::new("localhost", 4064).with_timeout(std::time::Duration::from_millis(5));
        let err = Session::open(endpoint, &Credentials::new("root", "omero"), client.clone())
            .unwrap_err();
        match err {
            roibridge_core::Error::Remote(remote) => {
                assert_eq!(remote.operation, "authenticate");
                assert_eq!(remote.kind, RemoteErrorKind::Network);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(client.open_connections(), 0);
    }

    #[test]
    fn test_restore_reauthenticates_dropped_connection() {
        let client = client();
        let creds = Credentials::new("root", "omero");
        let session =
            Session::open(Endpoint::new("localhost", 4064), &creds, client.clone()).unwrap();

        session.restore(None).unwrap();
        client.drop_connections();
        assert!(session.restore(None).is_err());
        session.restore(Some(&creds)).unwrap();
        assert_eq!(client.counters().authentications, 2);
        assert!(session.list_shapes_for_image(RemoteId(1)).is_ok());
    }

    #[test]
    fn test_remote_error_carries_target() {
        let client = client();
        let session = Session::open(
            Endpoint::new("localhost", 4064),
            &Credentials::new("root", "omero"),
            client,
        )
        .unwrap();
        let err = session.list_shapes_for_roi(RemoteId(404)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Remote list_shapes_for_roi on roi 404 failed (not found): no ROI 404"
        );
    }
}
