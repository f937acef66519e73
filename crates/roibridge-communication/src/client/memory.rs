//! In-process image server.
//!
//! [`InMemoryClient`] keeps users, images, ROIs and shapes in memory and
//! counts every mutating call, which makes it usable both offline and as a
//! test double. Remote ids for ROIs and shapes come from one shared counter.

use parking_lot::Mutex;
use roibridge_core::{RemoteErrorKind, RemoteId};
use roibridge_geometry::{RoiRecord, ShapeRecord};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;
use uuid::Uuid;

use super::{ClientError, ConnectionHandle, RemoteClient};
use crate::endpoint::{Credentials, Endpoint};

/// Number of calls seen by an [`InMemoryClient`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientCounters {
    pub authentications: usize,
    pub closes: usize,
    pub roi_creates: usize,
    pub shape_creates: usize,
    pub shape_updates: usize,
}

#[derive(Debug, Clone)]
struct StoredRoi {
    image_id: RemoteId,
    name: Option<String>,
}

#[derive(Debug, Default)]
struct ServerState {
    users: HashMap<String, String>,
    images: HashSet<RemoteId>,
    open: HashSet<Uuid>,
    rois: BTreeMap<RemoteId, StoredRoi>,
    shapes: BTreeMap<RemoteId, ShapeRecord>,
    next_id: u64,
    counters: ClientCounters,
    /// Injected failures by operation, with the number of calls to let pass first
    failures: HashMap<String, (usize, ClientError)>,
}

impl ServerState {
    fn allocate(&mut self) -> RemoteId {
        self.next_id += 1;
        RemoteId(self.next_id)
    }

    fn injected(&mut self, operation: &str) -> Result<(), ClientError> {
        let Some((skip, _)) = self.failures.get_mut(operation) else {
            return Ok(());
        };
        if *skip > 0 {
            *skip -= 1;
            return Ok(());
        }
        match self.failures.remove(operation) {
            Some((_, err)) => Err(err),
            None => Ok(()),
        }
    }

    fn check(&mut self, operation: &str, handle: &ConnectionHandle) -> Result<(), ClientError> {
        self.injected(operation)?;
        if !self.open.contains(&handle.id()) {
            return Err(ClientError::unauthorized("connection is not open"));
        }
        Ok(())
    }

    fn roi(&self, roi_id: Option<RemoteId>) -> Result<(RemoteId, &StoredRoi), ClientError> {
        let roi_id = roi_id.ok_or_else(|| ClientError::rejected("shape has no ROI"))?;
        self.rois
            .get(&roi_id)
            .map(|roi| (roi_id, roi))
            .ok_or_else(|| ClientError::not_found(format!("no ROI {roi_id}")))
    }

    /// Stored shapes matching `keep`, each labelled with its ROI's name
    fn listed(&self, keep: impl Fn(&ShapeRecord) -> bool) -> Vec<ShapeRecord> {
        self.shapes
            .values()
            .filter(|s| keep(*s))
            .map(|s| ShapeRecord {
                roi_name: s
                    .roi_id
                    .and_then(|roi| self.rois.get(&roi))
                    .and_then(|roi| roi.name.clone()),
                ..s.clone()
            })
            .collect()
    }
}

/// Image server kept entirely in process memory
#[derive(Debug, Default)]
pub struct InMemoryClient {
    state: Mutex<ServerState>,
    latency: Option<Duration>,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user
    pub fn with_user(self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.state.lock().users.insert(user.into(), password.into());
        self
    }

    /// Register an image that ROIs can be attached to
    pub fn with_image(self, image_id: impl Into<RemoteId>) -> Self {
        self.state.lock().images.insert(image_id.into());
        self
    }

    /// Delay every authentication by `latency`; an endpoint whose timeout is
    /// shorter fails with a network error
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Store a ROI directly, without counting a call
    pub fn seed_roi(&self, image_id: impl Into<RemoteId>, name: Option<&str>) -> RemoteId {
        let mut state = self.state.lock();
        let image_id = image_id.into();
        state.images.insert(image_id);
        let id = state.allocate();
        state.rois.insert(
            id,
            StoredRoi {
                image_id,
                name: name.map(str::to_string),
            },
        );
        id
    }

    /// Store a shape in an existing ROI directly, without counting a call
    pub fn seed_shape(&self, roi_id: RemoteId, record: ShapeRecord) -> Option<RemoteId> {
        let mut state = self.state.lock();
        let image_id = state.rois.get(&roi_id)?.image_id;
        let id = state.allocate();
        state.shapes.insert(
            id,
            ShapeRecord {
                id: Some(id),
                roi_id: Some(roi_id),
                image_id: Some(image_id),
                ..record
            },
        );
        Some(id)
    }

    /// Make the next call of `operation` fail with `error`
    pub fn fail_next(&self, operation: &str, error: ClientError) {
        self.fail_after(operation, 0, error);
    }

    /// Let `calls` calls of `operation` succeed, then fail the next one
    pub fn fail_after(&self, operation: &str, calls: usize, error: ClientError) {
        self.state
            .lock()
            .failures
            .insert(operation.to_string(), (calls, error));
    }

    /// Drop every open connection, as a server restart would
    pub fn drop_connections(&self) {
        self.state.lock().open.clear();
    }

    pub fn counters(&self) -> ClientCounters {
        self.state.lock().counters
    }

    pub fn open_connections(&self) -> usize {
        self.state.lock().open.len()
    }

    pub fn shape(&self, shape_id: RemoteId) -> Option<ShapeRecord> {
        self.state.lock().shapes.get(&shape_id).cloned()
    }

    pub fn roi_name(&self, roi_id: RemoteId) -> Option<String> {
        self.state.lock().rois.get(&roi_id)?.name.clone()
    }

    /// Ids of the ROIs attached to an image
    pub fn rois_for_image(&self, image_id: RemoteId) -> Vec<RemoteId> {
        self.state
            .lock()
            .rois
            .iter()
            .filter(|(_, roi)| roi.image_id == image_id)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn shape_count(&self) -> usize {
        self.state.lock().shapes.len()
    }
}

impl RemoteClient for InMemoryClient {
    fn authenticate(
        &self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> Result<ConnectionHandle, ClientError> {
        if let Some(latency) = self.latency {
            if latency > endpoint.timeout() {
                std::thread::sleep(endpoint.timeout());
                return Err(ClientError::network(format!(
                    "{endpoint} did not answer within {:?}",
                    endpoint.timeout()
                )));
            }
            std::thread::sleep(latency);
        }
        let mut state = self.state.lock();
        state.injected("authenticate")?;
        match state.users.get(credentials.user()) {
            Some(password) if password == credentials.password() => {}
            _ => {
                return Err(ClientError::unauthorized(format!(
                    "login failed for {} at {endpoint}",
                    credentials.user()
                )))
            }
        }
        let handle = ConnectionHandle::new(credentials.user());
        state.open.insert(handle.id());
        state.counters.authentications += 1;
        Ok(handle)
    }

    fn keep_alive(&self, handle: &ConnectionHandle) -> Result<(), ClientError> {
        self.state.lock().check("keep_alive", handle)
    }

    fn close(&self, handle: &ConnectionHandle) -> Result<(), ClientError> {
        let mut state = self.state.lock();
        state.injected("close")?;
        state.open.remove(&handle.id());
        state.counters.closes += 1;
        Ok(())
    }

    fn list_shapes_for_image(
        &self,
        handle: &ConnectionHandle,
        image_id: RemoteId,
    ) -> Result<Vec<ShapeRecord>, ClientError> {
        let mut state = self.state.lock();
        state.check("list_shapes_for_image", handle)?;
        if !state.images.contains(&image_id) {
            return Err(ClientError::not_found(format!("no image {image_id}")));
        }
        Ok(state.listed(|s| s.image_id == Some(image_id)))
    }

    fn list_shapes_for_roi(
        &self,
        handle: &ConnectionHandle,
        roi_id: RemoteId,
    ) -> Result<Vec<ShapeRecord>, ClientError> {
        let mut state = self.state.lock();
        state.check("list_shapes_for_roi", handle)?;
        state.roi(Some(roi_id))?;
        Ok(state.listed(|s| s.roi_id == Some(roi_id)))
    }

    fn describe_roi(
        &self,
        handle: &ConnectionHandle,
        roi_id: RemoteId,
    ) -> Result<RoiRecord, ClientError> {
        let mut state = self.state.lock();
        state.check("describe_roi", handle)?;
        let (id, roi) = state.roi(Some(roi_id))?;
        Ok(RoiRecord {
            id,
            image_id: roi.image_id,
            name: roi.name.clone(),
        })
    }

    fn create_roi(
        &self,
        handle: &ConnectionHandle,
        image_id: RemoteId,
        name: Option<&str>,
    ) -> Result<RemoteId, ClientError> {
        let mut state = self.state.lock();
        state.check("create_roi", handle)?;
        if !state.images.contains(&image_id) {
            return Err(ClientError::not_found(format!("no image {image_id}")));
        }
        let id = state.allocate();
        state.rois.insert(
            id,
            StoredRoi {
                image_id,
                name: name.map(str::to_string),
            },
        );
        state.counters.roi_creates += 1;
        Ok(id)
    }

    fn create_shape(
        &self,
        handle: &ConnectionHandle,
        record: &ShapeRecord,
    ) -> Result<RemoteId, ClientError> {
        let mut state = self.state.lock();
        state.check("create_shape", handle)?;
        let (roi_id, roi) = state.roi(record.roi_id)?;
        let image_id = roi.image_id;
        let id = state.allocate();
        state.shapes.insert(
            id,
            ShapeRecord {
                id: Some(id),
                roi_id: Some(roi_id),
                image_id: Some(image_id),
                ..record.clone()
            },
        );
        state.counters.shape_creates += 1;
        Ok(id)
    }

    fn update_shape(
        &self,
        handle: &ConnectionHandle,
        shape_id: RemoteId,
        record: &ShapeRecord,
    ) -> Result<(), ClientError> {
        let mut state = self.state.lock();
        state.check("update_shape", handle)?;
        let stored = state
            .shapes
            .get_mut(&shape_id)
            .ok_or_else(|| ClientError::not_found(format!("no shape {shape_id}")))?;
        if record.roi_id.is_some_and(|roi| Some(roi) != stored.roi_id) {
            return Err(ClientError::new(
                RemoteErrorKind::Rejected,
                format!("shape {shape_id} cannot move to another ROI"),
            ));
        }
        stored.z = record.z;
        stored.t = record.t;
        stored.c = record.c;
        stored.text = record.text.clone();
        stored.geometry = record.geometry.clone();
        state.counters.shape_updates += 1;
        Ok(())
    }
}
