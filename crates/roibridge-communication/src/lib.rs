//! # ROI Bridge Communication
//!
//! Everything between the translation engine and the image server: the
//! remote client boundary, an in-memory client, endpoints and credentials,
//! authenticated sessions and the registry that caches one session per
//! server endpoint.

pub mod client;
pub mod endpoint;
pub mod session;

pub use client::{memory::ClientCounters, memory::InMemoryClient, ClientError, ConnectionHandle, RemoteClient};
pub use endpoint::{Credentials, Endpoint, DEFAULT_TIMEOUT};
pub use session::{
    registry::SessionRegistry, current::SessionScope, Session, SessionId, SessionState,
};
