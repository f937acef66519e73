//! ROI identity cache.
//!
//! Maps the identity of an in-memory mask to the remote shape it was
//! downloaded from or uploaded to. Keys are [`MaskId`]s, never geometry: two
//! equal masks are two entries. Concurrent writers to one key resolve as
//! last write wins.

use roibridge_core::{thread_safe_rw_map, Mask, MaskId, RemoteId, ThreadSafeRwMap};

/// Where a mask lives on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemoteShapeRef {
    pub shape_id: RemoteId,
    pub roi_id: RemoteId,
    pub image_id: RemoteId,
}

/// Thread-safe identity map from masks to remote shapes
#[derive(Debug, Clone)]
pub struct RoiCache {
    entries: ThreadSafeRwMap<MaskId, RemoteShapeRef>,
}

impl Default for RoiCache {
    fn default() -> Self {
        Self {
            entries: thread_safe_rw_map(),
        }
    }
}

impl RoiCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `mask` with a remote shape, returning the previous association
    pub fn record(&self, mask: &Mask, remote: RemoteShapeRef) -> Option<RemoteShapeRef> {
        self.record_id(mask.id(), remote)
    }

    pub fn record_id(&self, id: MaskId, remote: RemoteShapeRef) -> Option<RemoteShapeRef> {
        self.entries.write().insert(id, remote)
    }

    pub fn lookup(&self, mask: &Mask) -> Option<RemoteShapeRef> {
        self.lookup_id(mask.id())
    }

    pub fn lookup_id(&self, id: MaskId) -> Option<RemoteShapeRef> {
        self.entries.read().get(&id).copied()
    }

    pub fn forget(&self, mask: &Mask) -> Option<RemoteShapeRef> {
        self.entries.write().remove(&mask.id())
    }

    /// Drop every association with shapes of `image_id`; returns how many
    pub fn forget_image(&self, image_id: RemoteId) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, remote| remote.image_id != image_id);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roibridge_core::PointMask;

    fn remote(shape: u64, image: u64) -> RemoteShapeRef {
        RemoteShapeRef {
            shape_id: RemoteId(shape),
            roi_id: RemoteId(100 + shape),
            image_id: RemoteId(image),
        }
    }

    #[test]
    fn test_identity_not_value() {
        let cache = RoiCache::new();
        let a = Mask::new(PointMask::new(1.0, 1.0));
        let b = Mask::new(PointMask::new(1.0, 1.0));

        cache.record(&a, remote(1, 1));
        assert_eq!(cache.lookup(&a), Some(remote(1, 1)));
        assert_eq!(cache.lookup(&b), None);
        assert_eq!(cache.lookup(&a.duplicate()), None);
    }

    #[test]
    fn test_record_replaces() {
        let cache = RoiCache::new();
        let a = Mask::new(PointMask::new(0.0, 0.0));
        assert_eq!(cache.record(&a, remote(1, 1)), None);
        assert_eq!(cache.record(&a, remote(2, 1)), Some(remote(1, 1)));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.forget(&a), Some(remote(2, 1)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_forget_image() {
        let cache = RoiCache::new();
        let masks: Vec<_> = (0..4).map(|i| Mask::new(PointMask::new(i as f64, 0.0))).collect();
        for (i, mask) in masks.iter().enumerate() {
            cache.record(mask, remote(i as u64, (i % 2) as u64));
        }
        assert_eq!(cache.forget_image(RemoteId(0)), 2);
        assert_eq!(cache.len(), 2);
        assert!(cache.lookup(&masks[0]).is_none());
        assert!(cache.lookup(&masks[1]).is_some());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = RoiCache::new();
        let shared = cache.clone();
        let mask = Mask::new(PointMask::new(0.0, 0.0));
        shared.record(&mask, remote(3, 1));
        assert_eq!(cache.lookup(&mask), Some(remote(3, 1)));
    }
}
