//! Type aliases for commonly used shared-state types.
//!
//! The registry and the identity cache are shared between threads that run
//! independent uploads and downloads, so everything here is `Send + Sync`
//! and built on `parking_lot` locks.
//!
//! ```rust,ignore
//! use roibridge_core::types::*;
//!
//! // Instead of: Arc<RwLock<HashMap<MaskId, RemoteShapeRef>>>
//! let entries: ThreadSafeRwMap<MaskId, RemoteShapeRef> = thread_safe_rw_map();
//! ```

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// A thread-safe optional wrapper for lazily-initialized cross-thread state.
pub type ThreadSafeOption<T> = Arc<Mutex<Option<T>>>;

/// A thread-safe reader-writer hash map.
///
/// Use when lookups greatly outnumber inserts.
pub type ThreadSafeRwMap<K, V> = Arc<RwLock<HashMap<K, V>>>;

/// Create a new `ThreadSafeOption<T>` initialized to `None`.
#[inline]
pub fn thread_safe_none<T>() -> ThreadSafeOption<T> {
    Arc::new(Mutex::new(None))
}

/// Create a new empty `ThreadSafeRwMap<K, V>`.
#[inline]
pub fn thread_safe_rw_map<K, V>() -> ThreadSafeRwMap<K, V> {
    Arc::new(RwLock::new(HashMap::new()))
}
