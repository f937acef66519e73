//! Object identities.
//!
//! [`MaskId`] is issued once per in-memory mask and never reused within a
//! process, so it can stand in for object identity in maps. [`RemoteId`] is
//! the server's identifier for a stored object.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MASK_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an in-memory mask
///
/// Two masks with identical geometry still have different ids; only the
/// mask that was issued an id carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaskId(u64);

impl MaskId {
    /// Issue a fresh identity
    pub(crate) fn next() -> Self {
        Self(NEXT_MASK_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mask#{}", self.0)
    }
}

/// Identifier of an object stored on the remote server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(pub u64);

impl RemoteId {
    /// Raw numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for RemoteId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RemoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_ids_are_unique() {
        let a = MaskId::next();
        let b = MaskId::next();
        assert_ne!(a, b);
        assert!(b.value() > a.value());
    }

    #[test]
    fn test_remote_id_display() {
        assert_eq!(RemoteId(42).to_string(), "42");
        assert_eq!(RemoteId::from(7).value(), 7);
    }
}
