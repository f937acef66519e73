//! Upload and download of ROI trees.
//!
//! Uploads decide create vs. update per leaf from the identity cache: a
//! cached shape on the target image is updated in place; anything else is
//! created, inside the ROI of its collection (created on first need). Every
//! leaf is converted before the first remote call.

use roibridge_communication::Session;
use roibridge_core::{Mask, RemoteId, Result, RoiCollection, RoiTree};
use roibridge_settings::TransferSettings;
use std::collections::HashMap;

use crate::assembler::{assemble, plan_upload, UploadGroup};
use crate::cache::{RemoteShapeRef, RoiCache};

/// Shape ids placed so far, by leaf order, and call counts
#[derive(Debug)]
struct UploadProgress {
    shape_ids: Vec<RemoteId>,
    created: usize,
    updated: usize,
}

impl UploadProgress {
    fn new(leaves: usize) -> Self {
        Self {
            shape_ids: vec![RemoteId(0); leaves],
            created: 0,
            updated: 0,
        }
    }
}

/// Moves ROI trees between memory and a server session
#[derive(Debug, Clone, Default)]
pub struct RoiTransfer {
    cache: RoiCache,
    settings: TransferSettings,
}

impl RoiTransfer {
    pub fn new(cache: RoiCache, settings: TransferSettings) -> Self {
        Self { cache, settings }
    }

    pub fn cache(&self) -> &RoiCache {
        &self.cache
    }

    pub fn settings(&self) -> &TransferSettings {
        &self.settings
    }

    /// All ROIs of `image_id` as a tree; every leaf is recorded in the cache
    pub fn download_rois(&self, session: &Session, image_id: RemoteId) -> Result<RoiTree> {
        let records = session.list_shapes_for_image(image_id)?;
        let assembled = assemble(Some(image_id), &records)?;
        for (mask_id, remote) in &assembled.identities {
            self.cache.record_id(*mask_id, *remote);
        }
        tracing::info!(
            image_id = %image_id,
            shapes = records.len(),
            rois = assembled.tree.children().len(),
            "Downloaded ROIs"
        );
        Ok(assembled.tree)
    }

    /// One remote ROI as a tree holding a single collection.
    ///
    /// The tree belongs to the ROI's image even when the ROI has no shapes.
    pub fn download_roi(&self, session: &Session, roi_id: RemoteId) -> Result<RoiTree> {
        let records = session.list_shapes_for_roi(roi_id)?;
        if records.is_empty() {
            let roi = session.describe_roi(roi_id)?;
            let mut collection = RoiCollection::remote(roi.id);
            collection.set_name(roi.name);
            tracing::info!(roi_id = %roi_id, image_id = %roi.image_id, "Downloaded empty ROI");
            return Ok(RoiTree::for_image(roi.image_id).with_child(collection));
        }

        let image_id = records.iter().find_map(|r| r.image_id);
        let assembled = assemble(image_id, &records)?;
        for (mask_id, remote) in &assembled.identities {
            self.cache.record_id(*mask_id, *remote);
        }
        tracing::info!(roi_id = %roi_id, shapes = records.len(), "Downloaded ROI");
        Ok(assembled.tree)
    }

    /// Upload `tree` to `image_id`, returning the shape ids in leaf pre-order.
    ///
    /// Afterwards the tree's collections carry the ids of their remote ROIs
    /// and the tree is marked as belonging to `image_id`. When an upload to
    /// the tree's own image fails partway, the ROIs created so far are still
    /// written back, so a retry fills the same ROIs.
    pub fn upload_rois(
        &self,
        session: &Session,
        tree: &mut RoiTree,
        image_id: RemoteId,
    ) -> Result<Vec<RemoteId>> {
        let same_image = tree.source_image().is_none_or(|source| source == image_id);
        let reuse_rois = same_image && self.settings.update_existing;

        let mut progress = UploadProgress::new(tree.len());
        let mut collection_rois = HashMap::new();
        let mut outcome = Ok(());

        for group in plan_upload(tree)? {
            let collection = group.collection;
            let mut roi_id = None;
            let result =
                self.upload_group(session, group, image_id, reuse_rois, &mut roi_id, &mut progress);
            if let (Some(collection), Some(roi_id)) = (collection, roi_id) {
                collection_rois.insert(collection, roi_id);
            }
            if let Err(e) = result {
                outcome = Err(e);
                break;
            }
        }

        // After a failed cross-image upload the collections keep the ids of
        // their source image; the cache already points at the new shapes.
        if outcome.is_ok() || same_image {
            let mut index = 0;
            tree.for_each_collection_mut(|collection| {
                if let Some(roi_id) = collection_rois.get(&index) {
                    collection.set_remote_id(Some(*roi_id));
                }
                index += 1;
            });
            tree.set_source_image(Some(image_id));
        }

        if let Err(e) = outcome {
            tracing::warn!(
                image_id = %image_id,
                created = progress.created,
                updated = progress.updated,
                error = %e,
                "ROI upload failed partway"
            );
            return Err(e);
        }

        tracing::info!(
            image_id = %image_id,
            created = progress.created,
            updated = progress.updated,
            "Uploaded ROIs"
        );
        Ok(progress.shape_ids)
    }

    /// The cached shape for `mask` if it may be updated on `image_id`
    fn updatable(&self, mask: &Mask, image_id: RemoteId) -> Option<RemoteShapeRef> {
        self.cache
            .lookup(mask)
            .filter(|remote| self.settings.update_existing && remote.image_id == image_id)
    }

    /// Upload one group. `roi_id` receives the ROI the group ends up in, also
    /// when a later call of the group fails.
    ///
    /// A group without a usable ROI joins the ROI of its first updatable
    /// shape, so a retried upload fills the ROI created by the failed one.
    fn upload_group(
        &self,
        session: &Session,
        group: UploadGroup<'_>,
        image_id: RemoteId,
        reuse_rois: bool,
        roi_id: &mut Option<RemoteId>,
        progress: &mut UploadProgress,
    ) -> Result<()> {
        *roi_id = group.roi_id.filter(|_| reuse_rois).or_else(|| {
            group
                .shapes
                .iter()
                .find_map(|planned| self.updatable(planned.mask, image_id))
                .map(|remote| remote.roi_id)
        });
        let name = group
            .name
            .or(self.settings.default_collection_name.as_deref());

        for planned in group.shapes {
            let mut record = planned.record;
            record.image_id = Some(image_id);

            let shape_id = match self.updatable(planned.mask, image_id) {
                Some(remote) => {
                    record.id = Some(remote.shape_id);
                    record.roi_id = Some(remote.roi_id);
                    session.update_shape(remote.shape_id, &record)?;
                    tracing::debug!(
                        mask = %planned.mask.id(),
                        shape_id = %remote.shape_id,
                        roi_id = %remote.roi_id,
                        "Updated shape"
                    );
                    progress.updated += 1;
                    remote.shape_id
                }
                None => {
                    let roi = match *roi_id {
                        Some(roi) => roi,
                        None => {
                            let roi = session.create_roi(image_id, name)?;
                            tracing::debug!(roi_id = %roi, image_id = %image_id, "Created ROI");
                            *roi_id = Some(roi);
                            roi
                        }
                    };
                    record.roi_id = Some(roi);
                    let shape_id = session.create_shape(&record)?;
                    self.cache.record(
                        planned.mask,
                        RemoteShapeRef {
                            shape_id,
                            roi_id: roi,
                            image_id,
                        },
                    );
                    tracing::debug!(
                        mask = %planned.mask.id(),
                        shape_id = %shape_id,
                        roi_id = %roi,
                        "Created shape"
                    );
                    progress.created += 1;
                    shape_id
                }
            };

            if let Some(slot) = progress.shape_ids.get_mut(planned.order) {
                *slot = shape_id;
            }
        }

        Ok(())
    }
}
