//! # ROI Bridge
//!
//! Moves regions of interest between an image-analysis application's
//! in-memory mask model and an image server's shape model:
//! - Point, box, ellipsoid, polygon, polyline and polyshape masks
//! - Z, Time and Channel plane attachment with "every plane" wildcards
//! - Identity-preserving round trips, so re-uploads update instead of duplicate
//! - One cached, authenticated session per server with a per-thread current session
//!
//! ## Architecture
//!
//! ROI Bridge is organized as a workspace with multiple crates:
//!
//! 1. **roibridge-core** - Error taxonomy, mask model, identities, ROI tree
//! 2. **roibridge-geometry** - Remote shape records, shape adapters, polyshape vertex view
//! 3. **roibridge-settings** - Server and transfer configuration
//! 4. **roibridge-communication** - Remote client boundary, sessions, session registry
//! 5. **roibridge-transfer** - Identity cache, tree assembly, upload/download engine
//! 6. **roibridge** - This crate, re-exporting the public surface

pub use roibridge_core::{
    Axis, BoxMask, Bounds, EllipsoidMask, Error, GeometryError, Mask, MaskGeometry, MaskId,
    MaskKind, PlaneAttachment, PointMask, Polygon2D, Polyline2D, Polyshape2D, RealMask,
    RealPoint, RemoteError, RemoteErrorKind, RemoteId, Result, RoiCollection, RoiNode, RoiTree,
    SessionError, TranslationError,
};

pub use roibridge_geometry::{
    from_remote_shape, mask_view, record_view, to_remote_shape, PolyshapeView, ShapeAdapter,
    ShapeGeometry, ShapeRecord, VertexProxy, VertexStore, UNSET_PLANE,
};

pub use roibridge_settings::{Config, ServerSettings, TransferSettings};

pub use roibridge_communication::{
    ClientCounters, ClientError, ConnectionHandle, Credentials, Endpoint, InMemoryClient,
    RemoteClient, Session, SessionId, SessionRegistry, SessionScope, SessionState,
};

pub use roibridge_transfer::{RemoteShapeRef, RoiCache, RoiService, RoiTransfer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support (default level `info`)
/// - Target, thread and line metadata
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!(version = VERSION, "Logging initialized");
    Ok(())
}
