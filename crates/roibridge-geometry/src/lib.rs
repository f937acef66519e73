//! # ROI Bridge Geometry
//!
//! Translation between the in-memory mask model and the remote server's
//! planar shape records.
//!
//! ## Components
//!
//! - **Records**: [`ShapeRecord`] / [`ShapeGeometry`], the server's 2D shape
//!   with Z/Time/Channel plane fields (`-1` = every plane)
//! - **Adapters**: one [`ShapeAdapter`] implementation per mask variant, with
//!   [`to_remote_shape`] / [`from_remote_shape`] dispatching on the variant
//! - **Polyshape view**: [`PolyshapeView`], an editable vertex sequence over
//!   polygon and polyline shapes whose bounds always follow the current list

pub mod adapters;
pub mod polyshape_view;
pub mod record;

pub use adapters::{
    from_remote_shape, plane_from_sentinel, plane_to_sentinel, to_remote_shape, ShapeAdapter,
};
pub use polyshape_view::{mask_view, record_view, PolyshapeView, VertexProxy, VertexStore};
pub use record::{RoiRecord, ShapeGeometry, ShapeRecord, UNSET_PLANE};
