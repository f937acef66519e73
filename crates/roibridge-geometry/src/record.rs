//! Remote shape records.
//!
//! The server stores planar shapes, each optionally fixed to a Z, Time and
//! Channel plane, and grouped into ROIs. Plane fields use `-1`
//! ([`UNSET_PLANE`]) for "every plane along this axis".

use roibridge_core::{RealPoint, RemoteId};
use serde::{Deserialize, Serialize};

/// Plane value meaning "defined on every plane along the axis"
pub const UNSET_PLANE: i32 = -1;

/// Planar geometry of a remote shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeGeometry {
    Point {
        x: f64,
        y: f64,
    },
    /// Axis-aligned rectangle from its top-left corner
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Axis-aligned ellipse from its center
    Ellipse {
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
    },
    Polygon {
        points: Vec<RealPoint>,
    },
    Polyline {
        points: Vec<RealPoint>,
    },
    /// A server shape kind the bridge has no mask for (label, line, mask, ...)
    Unsupported {
        kind: String,
    },
}

impl ShapeGeometry {
    /// Server-side kind name
    pub fn kind_name(&self) -> &str {
        match self {
            ShapeGeometry::Point { .. } => "point",
            ShapeGeometry::Rectangle { .. } => "rectangle",
            ShapeGeometry::Ellipse { .. } => "ellipse",
            ShapeGeometry::Polygon { .. } => "polygon",
            ShapeGeometry::Polyline { .. } => "polyline",
            ShapeGeometry::Unsupported { kind } => kind,
        }
    }
}

/// A shape as stored on the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    /// Server id; `None` until the shape has been created
    pub id: Option<RemoteId>,
    /// Containing ROI
    pub roi_id: Option<RemoteId>,
    /// Image the containing ROI is attached to
    pub image_id: Option<RemoteId>,
    /// Name of the containing ROI, as listed by the server
    #[serde(default)]
    pub roi_name: Option<String>,
    pub z: i32,
    pub t: i32,
    pub c: i32,
    /// Free text carried with the shape, used for the mask name
    pub text: Option<String>,
    pub geometry: ShapeGeometry,
}

impl ShapeRecord {
    /// Unsaved record defined on every plane
    pub fn new(geometry: ShapeGeometry) -> Self {
        Self {
            id: None,
            roi_id: None,
            image_id: None,
            roi_name: None,
            z: UNSET_PLANE,
            t: UNSET_PLANE,
            c: UNSET_PLANE,
            text: None,
            geometry,
        }
    }

    pub fn with_id(mut self, id: RemoteId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_roi(mut self, roi_id: RemoteId) -> Self {
        self.roi_id = Some(roi_id);
        self
    }

    pub fn with_image(mut self, image_id: RemoteId) -> Self {
        self.image_id = Some(image_id);
        self
    }

    pub fn with_roi_name(mut self, name: impl Into<String>) -> Self {
        self.roi_name = Some(name.into());
        self
    }

    pub fn with_planes(mut self, z: i32, t: i32, c: i32) -> Self {
        self.z = z;
        self.t = t;
        self.c = c;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn kind_name(&self) -> &str {
        self.geometry.kind_name()
    }
}

/// A ROI as stored on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiRecord {
    pub id: RemoteId,
    /// Image the ROI is attached to
    pub image_id: RemoteId,
    pub name: Option<String>,
}
