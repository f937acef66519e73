//! Mask <-> remote shape adapters.
//!
//! Each mask geometry variant implements [`ShapeAdapter`] once. X and Y map
//! straight onto the shape's planar coordinates; Z, Time and Channel map onto
//! the record's plane fields, with an unset attachment written as `-1` and
//! `-1` read back as unset.
//!
//! Conversion never approximates: a record of a kind with no mask
//! counterpart, or with unusable data, fails with a [`TranslationError`].

use roibridge_core::{
    Axis, Mask, MaskGeometry, PlaneAttachment, RealPoint, TranslationError,
};

use crate::record::{ShapeGeometry, ShapeRecord, UNSET_PLANE};

mod ellipse;
mod point;
mod polygon;
mod rectangle;

/// Conversion between one mask geometry variant and the remote geometry
pub trait ShapeAdapter: Sized {
    /// Remote geometry for this mask geometry
    fn to_geometry(&self) -> Result<ShapeGeometry, TranslationError>;

    /// Mask geometry for a remote geometry of the matching kind
    fn from_geometry(geometry: &ShapeGeometry) -> Result<Self, TranslationError>;
}

impl ShapeAdapter for MaskGeometry {
    fn to_geometry(&self) -> Result<ShapeGeometry, TranslationError> {
        match self {
            MaskGeometry::Point(s) => s.to_geometry(),
            MaskGeometry::Box(s) => s.to_geometry(),
            MaskGeometry::Ellipsoid(s) => s.to_geometry(),
            MaskGeometry::Polygon(s) => s.to_geometry(),
            MaskGeometry::Polyline(s) => s.to_geometry(),
            MaskGeometry::Polyshape(s) => s.to_geometry(),
        }
    }

    fn from_geometry(geometry: &ShapeGeometry) -> Result<Self, TranslationError> {
        use roibridge_core::{BoxMask, EllipsoidMask, PointMask, Polygon2D, Polyline2D};

        Ok(match geometry {
            ShapeGeometry::Point { .. } => PointMask::from_geometry(geometry)?.into(),
            ShapeGeometry::Rectangle { .. } => BoxMask::from_geometry(geometry)?.into(),
            ShapeGeometry::Ellipse { .. } => EllipsoidMask::from_geometry(geometry)?.into(),
            ShapeGeometry::Polygon { .. } => Polygon2D::from_geometry(geometry)?.into(),
            ShapeGeometry::Polyline { .. } => Polyline2D::from_geometry(geometry)?.into(),
            ShapeGeometry::Unsupported { kind } => {
                return Err(TranslationError::UnsupportedGeometry { kind: kind.clone() })
            }
        })
    }
}

/// Builds the remote record for a mask.
///
/// The record has no id, ROI or image yet; the caller attaches those.
pub fn to_remote_shape(mask: &Mask) -> Result<ShapeRecord, TranslationError> {
    let geometry = mask.geometry().to_geometry()?;
    let kind = geometry.kind_name().to_string();
    let plane = mask.plane();
    let mut record = ShapeRecord::new(geometry).with_planes(
        plane_to_sentinel(plane.z, Axis::Z, &kind)?,
        plane_to_sentinel(plane.t, Axis::Time, &kind)?,
        plane_to_sentinel(plane.c, Axis::Channel, &kind)?,
    );
    record.text = mask.name().map(str::to_string);
    Ok(record)
}

/// Builds a fresh in-memory mask for a remote record
pub fn from_remote_shape(record: &ShapeRecord) -> Result<Mask, TranslationError> {
    let geometry = MaskGeometry::from_geometry(&record.geometry).inspect_err(|e| {
        tracing::debug!(shape_id = ?record.id, error = %e, "Rejected remote shape");
    })?;
    let kind = record.kind_name();
    let plane = PlaneAttachment {
        z: plane_from_sentinel(record.z, Axis::Z, kind)?,
        t: plane_from_sentinel(record.t, Axis::Time, kind)?,
        c: plane_from_sentinel(record.c, Axis::Channel, kind)?,
    };

    let mut mask = Mask::new(geometry).with_plane(plane);
    mask.set_name(record.text.clone());
    Ok(mask)
}

/// Plane index in the remote sentinel convention
pub fn plane_to_sentinel(
    plane: Option<u32>,
    axis: Axis,
    kind: &str,
) -> Result<i32, TranslationError> {
    match plane {
        Some(index) => i32::try_from(index)
            .map_err(|_| malformed(kind, format!("{axis} plane {index} exceeds the remote range"))),
        None => Ok(UNSET_PLANE),
    }
}

/// Plane index from the remote sentinel convention
pub fn plane_from_sentinel(
    value: i32,
    axis: Axis,
    kind: &str,
) -> Result<Option<u32>, TranslationError> {
    match value {
        UNSET_PLANE => Ok(None),
        v if v >= 0 => Ok(Some(v.unsigned_abs())),
        v => Err(malformed(kind, format!("{axis} plane {v} is below -1"))),
    }
}

pub(crate) fn malformed(kind: &str, reason: impl Into<String>) -> TranslationError {
    TranslationError::MalformedShape {
        kind: kind.to_string(),
        reason: reason.into(),
    }
}

pub(crate) fn require_finite(kind: &str, values: &[(&str, f64)]) -> Result<(), TranslationError> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some((name, v)) => Err(malformed(kind, format!("{name} is not finite ({v})"))),
        None => Ok(()),
    }
}

pub(crate) fn require_finite_points(
    kind: &str,
    points: &[RealPoint],
) -> Result<(), TranslationError> {
    if points.is_empty() {
        return Err(malformed(kind, "no vertices"));
    }
    match points.iter().position(|p| !p.is_finite()) {
        Some(i) => Err(malformed(kind, format!("vertex {i} is not finite"))),
        None => Ok(()),
    }
}

/// Error for a geometry handed to the adapter of another kind
pub(crate) fn wrong_kind(expected: &str, geometry: &ShapeGeometry) -> TranslationError {
    malformed(
        expected,
        format!("expected {expected} geometry, got {}", geometry.kind_name()),
    )
}
