//! In-memory mask model.
//!
//! A [`Mask`] is a real-valued planar region with an optional fixed
//! Z / Time / Channel plane. The geometry is one of a closed set of variants
//! ([`MaskGeometry`]); every variant derives its bounding interval from its
//! current defining geometry on each query, so there is no cached bound to
//! fall out of date after an edit.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::ids::MaskId;

mod ellipsoid;
mod point;
mod polygon;
mod polyshape;
mod rectangle;

pub use ellipsoid::EllipsoidMask;
pub use point::PointMask;
pub use polygon::{Polygon2D, Polyline2D};
pub use polyshape::Polyshape2D;
pub use rectangle::BoxMask;

/// Number of real dimensions a mask spans in the image plane.
pub const PLANAR_DIMENSIONS: usize = 2;

/// Distance under which a point counts as lying on an open polyline.
pub const EDGE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealPoint {
    pub x: f64,
    pub y: f64,
}

impl RealPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinate along dimension `d` (0 = X, 1 = Y)
    pub fn coordinate(&self, d: usize) -> Result<f64, GeometryError> {
        match d {
            0 => Ok(self.x),
            1 => Ok(self.y),
            _ => Err(GeometryError::InvalidDimension { dimension: d }),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for RealPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned planar bounding interval.
///
/// An empty interval has `min = +inf` and `max = -inf` so that no position
/// tests inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: RealPoint,
    pub max: RealPoint,
}

impl Bounds {
    pub fn new(min: RealPoint, max: RealPoint) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: RealPoint::new(f64::INFINITY, f64::INFINITY),
            max: RealPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Tight bound of a vertex sequence, found by a single linear scan
    pub fn of_points<'a>(points: impl IntoIterator<Item = &'a RealPoint>) -> Self {
        points.into_iter().fold(Self::empty(), |mut b, p| {
            b.include(*p);
            b
        })
    }

    pub fn include(&mut self, p: RealPoint) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn contains(&self, p: RealPoint) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Axes a position can be tested along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    Time,
    Channel,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
            Self::Time => write!(f, "Time"),
            Self::Channel => write!(f, "Channel"),
        }
    }
}

/// Optional fixed Z / Time / Channel plane of a mask.
///
/// `None` means the mask is defined on every plane along that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaneAttachment {
    pub z: Option<u32>,
    pub t: Option<u32>,
    pub c: Option<u32>,
}

impl PlaneAttachment {
    /// Attachment defined on every plane of every axis
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn with_z(mut self, z: u32) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_t(mut self, t: u32) -> Self {
        self.t = Some(t);
        self
    }

    pub fn with_c(mut self, c: u32) -> Self {
        self.c = Some(c);
        self
    }

    /// Plane index for a non-planar axis; `None` for X and Y
    pub fn index(&self, axis: Axis) -> Option<Option<u32>> {
        match axis {
            Axis::Z => Some(self.z),
            Axis::Time => Some(self.t),
            Axis::Channel => Some(self.c),
            Axis::X | Axis::Y => None,
        }
    }

    /// Unset matches any position, a concrete plane only itself.
    pub fn matches(&self, axis: Axis, position: f64) -> bool {
        match self.index(axis) {
            Some(Some(plane)) => f64::from(plane) == position,
            Some(None) | None => true,
        }
    }
}

/// Common behaviour of every mask geometry variant
pub trait RealMask {
    /// Tight bound of the current geometry, recomputed on every call
    fn bounds(&self) -> Bounds;

    /// Point-membership test in the image plane
    fn contains(&self, p: RealPoint) -> bool;

    fn num_dimensions(&self) -> usize {
        PLANAR_DIMENSIONS
    }

    /// Lower bound along dimension `d` (0 = X, 1 = Y)
    fn real_min(&self, d: usize) -> Result<f64, GeometryError> {
        self.bounds().min.coordinate(d)
    }

    /// Upper bound along dimension `d` (0 = X, 1 = Y)
    fn real_max(&self, d: usize) -> Result<f64, GeometryError> {
        self.bounds().max.coordinate(d)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaskKind {
    Point,
    Box,
    Ellipsoid,
    Polygon,
    Polyline,
    Polyshape,
}

impl std::fmt::Display for MaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Point => write!(f, "point"),
            Self::Box => write!(f, "box"),
            Self::Ellipsoid => write!(f, "ellipsoid"),
            Self::Polygon => write!(f, "polygon"),
            Self::Polyline => write!(f, "polyline"),
            Self::Polyshape => write!(f, "polyshape"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MaskGeometry {
    Point(PointMask),
    Box(BoxMask),
    Ellipsoid(EllipsoidMask),
    Polygon(Polygon2D),
    Polyline(Polyline2D),
    Polyshape(Polyshape2D),
}

impl RealMask for MaskGeometry {
    fn bounds(&self) -> Bounds {
        match self {
            MaskGeometry::Point(s) => s.bounds(),
            MaskGeometry::Box(s) => s.bounds(),
            MaskGeometry::Ellipsoid(s) => s.bounds(),
            MaskGeometry::Polygon(s) => s.bounds(),
            MaskGeometry::Polyline(s) => s.bounds(),
            MaskGeometry::Polyshape(s) => s.bounds(),
        }
    }

    fn contains(&self, p: RealPoint) -> bool {
        match self {
            MaskGeometry::Point(s) => s.contains(p),
            MaskGeometry::Box(s) => s.contains(p),
            MaskGeometry::Ellipsoid(s) => s.contains(p),
            MaskGeometry::Polygon(s) => s.contains(p),
            MaskGeometry::Polyline(s) => s.contains(p),
            MaskGeometry::Polyshape(s) => s.contains(p),
        }
    }
}

impl MaskGeometry {
    pub fn kind(&self) -> MaskKind {
        match self {
            MaskGeometry::Point(_) => MaskKind::Point,
            MaskGeometry::Box(_) => MaskKind::Box,
            MaskGeometry::Ellipsoid(_) => MaskKind::Ellipsoid,
            MaskGeometry::Polygon(_) => MaskKind::Polygon,
            MaskGeometry::Polyline(_) => MaskKind::Polyline,
            MaskGeometry::Polyshape(_) => MaskKind::Polyshape,
        }
    }
}

impl From<PointMask> for MaskGeometry {
    fn from(value: PointMask) -> Self {
        MaskGeometry::Point(value)
    }
}

impl From<BoxMask> for MaskGeometry {
    fn from(value: BoxMask) -> Self {
        MaskGeometry::Box(value)
    }
}

impl From<EllipsoidMask> for MaskGeometry {
    fn from(value: EllipsoidMask) -> Self {
        MaskGeometry::Ellipsoid(value)
    }
}

impl From<Polygon2D> for MaskGeometry {
    fn from(value: Polygon2D) -> Self {
        MaskGeometry::Polygon(value)
    }
}

impl From<Polyline2D> for MaskGeometry {
    fn from(value: Polyline2D) -> Self {
        MaskGeometry::Polyline(value)
    }
}

impl From<Polyshape2D> for MaskGeometry {
    fn from(value: Polyshape2D) -> Self {
        MaskGeometry::Polyshape(value)
    }
}

/// A region of interest: geometry, plane attachment and identity.
///
/// `Mask` is deliberately not `Clone`: its [`MaskId`] is what caches key on,
/// and a copy must not share it. Use [`Mask::duplicate`] for a geometrically
/// equal mask with its own identity.
#[derive(Debug, PartialEq)]
pub struct Mask {
    id: MaskId,
    geometry: MaskGeometry,
    plane: PlaneAttachment,
    name: Option<String>,
}

impl Mask {
    pub fn new(geometry: impl Into<MaskGeometry>) -> Self {
        Self {
            id: MaskId::next(),
            geometry: geometry.into(),
            plane: PlaneAttachment::unset(),
            name: None,
        }
    }

    pub fn with_plane(mut self, plane: PlaneAttachment) -> Self {
        self.plane = plane;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> MaskId {
        self.id
    }

    pub fn kind(&self) -> MaskKind {
        self.geometry.kind()
    }

    pub fn geometry(&self) -> &MaskGeometry {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut MaskGeometry {
        &mut self.geometry
    }

    pub fn set_geometry(&mut self, geometry: impl Into<MaskGeometry>) {
        self.geometry = geometry.into();
    }

    pub fn plane(&self) -> PlaneAttachment {
        self.plane
    }

    pub fn set_plane(&mut self, plane: PlaneAttachment) {
        self.plane = plane;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Geometrically equal mask with a fresh identity
    pub fn duplicate(&self) -> Self {
        Self {
            id: MaskId::next(),
            geometry: self.geometry.clone(),
            plane: self.plane,
            name: self.name.clone(),
        }
    }

    /// Tests `position` along `axis`.
    ///
    /// X and Y are tested against the bounding interval of the current
    /// geometry; Z, Time and Channel against the plane attachment.
    pub fn test_position(&self, axis: Axis, position: f64) -> bool {
        match axis {
            Axis::X | Axis::Y => {
                let bounds = self.geometry.bounds();
                let (lo, hi) = if axis == Axis::X {
                    (bounds.min.x, bounds.max.x)
                } else {
                    (bounds.min.y, bounds.max.y)
                };
                position >= lo && position <= hi
            }
            Axis::Z | Axis::Time | Axis::Channel => self.plane.matches(axis, position),
        }
    }
}

impl RealMask for Mask {
    fn bounds(&self) -> Bounds {
        self.geometry.bounds()
    }

    fn contains(&self, p: RealPoint) -> bool {
        self.geometry.contains(p)
    }
}
