//! ROI service.
//!
//! Ties configuration, the session registry and the transfer engine
//! together. Transfers run against the calling thread's current session, so
//! callers enter a session once and nested code can upload and download
//! without passing it around.

use roibridge_communication::{Credentials, Endpoint, RemoteClient, Session, SessionRegistry};
use roibridge_core::{Error, RemoteId, Result, RoiTree};
use roibridge_settings::Config;
use std::sync::Arc;

use crate::cache::RoiCache;
use crate::transfer::RoiTransfer;

pub struct RoiService {
    config: Config,
    registry: Arc<SessionRegistry>,
    transfer: RoiTransfer,
}

impl RoiService {
    pub fn new(config: Config, client: Arc<dyn RemoteClient>) -> Self {
        let registry = Arc::new(SessionRegistry::new(client));
        Self::with_registry(config, registry, RoiCache::new())
    }

    /// Service over an existing registry and cache
    pub fn with_registry(config: Config, registry: Arc<SessionRegistry>, cache: RoiCache) -> Self {
        let transfer = RoiTransfer::new(cache, config.transfer.clone());
        Self {
            config,
            registry,
            transfer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &RoiCache {
        self.transfer.cache()
    }

    pub fn transfer(&self) -> &RoiTransfer {
        &self.transfer
    }

    /// Session for the configured server `name`
    pub fn connect(&self, name: &str, credentials: &Credentials) -> Result<Arc<Session>> {
        let server = self
            .config
            .server(name)
            .ok_or_else(|| Error::other(format!("Unknown server '{name}'")))?;
        self.registry.session_with(&Endpoint::from(server), credentials)
    }

    /// Upload to `image_id` through the current session
    pub fn upload_rois(&self, tree: &mut RoiTree, image_id: RemoteId) -> Result<Vec<RemoteId>> {
        let session = self.registry.current()?;
        self.transfer.upload_rois(&session, tree, image_id)
    }

    /// Download all ROIs of `image_id` through the current session
    pub fn download_rois(&self, image_id: RemoteId) -> Result<RoiTree> {
        let session = self.registry.current()?;
        self.transfer.download_rois(&session, image_id)
    }

    /// Download one ROI through the current session
    pub fn download_roi(&self, roi_id: RemoteId) -> Result<RoiTree> {
        let session = self.registry.current()?;
        self.transfer.download_roi(&session, roi_id)
    }

    /// Close every session
    pub fn dispose(&self) -> Result<()> {
        self.registry.dispose()
    }
}

impl std::fmt::Debug for RoiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoiService")
            .field("servers", &self.config.servers.len())
            .field("registry", &self.registry)
            .field("cached_shapes", &self.cache().len())
            .finish()
    }
}
