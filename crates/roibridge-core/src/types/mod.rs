//! Type system utilities and aliases.
//!
//! - [`aliases`]: Type aliases for the `Arc<Mutex<T>>` / `Arc<RwLock<T>>` shapes
//!   used by the session registry and the identity cache.

pub mod aliases;

pub use aliases::*;
