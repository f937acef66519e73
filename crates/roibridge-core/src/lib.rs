//! # ROI Bridge Core
//!
//! Core types shared by every ROI Bridge crate: the error taxonomy, the
//! in-memory mask model with plane attachment, object identities and the
//! ROI tree.

pub mod error;
pub mod ids;
pub mod mask;
pub mod tree;
pub mod types;

pub use error::{
    Error, GeometryError, RemoteError, RemoteErrorKind, Result, SessionError, TranslationError,
};

pub use ids::{MaskId, RemoteId};

pub use mask::{
    Axis, BoxMask, Bounds, EllipsoidMask, Mask, MaskGeometry, MaskKind, PlaneAttachment,
    PointMask, Polygon2D, Polyline2D, Polyshape2D, RealMask, RealPoint, EDGE_TOLERANCE,
    PLANAR_DIMENSIONS,
};

pub use tree::{RoiCollection, RoiNode, RoiTree};

// Re-export type aliases for convenience
pub use types::{thread_safe_none, thread_safe_rw_map, ThreadSafeOption, ThreadSafeRwMap};
