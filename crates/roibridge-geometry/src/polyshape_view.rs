//! Editable vertex view over polygon and polyline shapes.
//!
//! The backing store's vertex list is the single source of truth. Every edit
//! reads the current list, changes it and writes the whole list back, and
//! bounds are recomputed from that list on each query.

use roibridge_core::{
    Bounds, GeometryError, Mask, MaskGeometry, Polygon2D, Polyline2D, Polyshape2D, RealPoint,
    TranslationError,
};

use crate::record::{ShapeGeometry, ShapeRecord};

/// Backing storage of an ordered vertex list
pub trait VertexStore {
    /// Snapshot of the current vertex list
    fn points(&self) -> Vec<RealPoint>;

    /// Replace the whole vertex list
    fn set_points(&mut self, points: Vec<RealPoint>);
}

impl VertexStore for Vec<RealPoint> {
    fn points(&self) -> Vec<RealPoint> {
        self.clone()
    }

    fn set_points(&mut self, points: Vec<RealPoint>) {
        *self = points;
    }
}

impl VertexStore for Polygon2D {
    fn points(&self) -> Vec<RealPoint> {
        self.vertices().to_vec()
    }

    fn set_points(&mut self, points: Vec<RealPoint>) {
        self.set_vertices(points);
    }
}

impl VertexStore for Polyline2D {
    fn points(&self) -> Vec<RealPoint> {
        self.vertices().to_vec()
    }

    fn set_points(&mut self, points: Vec<RealPoint>) {
        self.set_vertices(points);
    }
}

impl VertexStore for Polyshape2D {
    fn points(&self) -> Vec<RealPoint> {
        self.vertices().to_vec()
    }

    fn set_points(&mut self, points: Vec<RealPoint>) {
        self.set_vertices(points);
    }
}

/// Mutable vertex-list view
pub struct PolyshapeView<'a, S: VertexStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: VertexStore + ?Sized> PolyshapeView<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    pub fn vertex_count(&self) -> usize {
        self.store.points().len()
    }

    /// Current position of vertex `index`
    pub fn vertex(&self, index: usize) -> Result<RealPoint, GeometryError> {
        let points = self.store.points();
        points
            .get(index)
            .copied()
            .ok_or(GeometryError::IndexOutOfRange {
                index,
                len: points.len(),
            })
    }

    /// Writable proxy for vertex `index`
    pub fn vertex_at(&mut self, index: usize) -> Result<VertexProxy<'_, S>, GeometryError> {
        let position = self.vertex(index)?;
        Ok(VertexProxy {
            store: &mut *self.store,
            index,
            position,
        })
    }

    /// Insert `point` before position `index`; `index == count` appends.
    pub fn insert_vertex(&mut self, index: usize, point: RealPoint) -> Result<(), GeometryError> {
        self.insert_vertices(index, [point])
    }

    /// Insert `points` before position `index`, keeping their order.
    pub fn insert_vertices(
        &mut self,
        index: usize,
        points: impl IntoIterator<Item = RealPoint>,
    ) -> Result<(), GeometryError> {
        let mut current = self.store.points();
        if index > current.len() {
            return Err(GeometryError::IndexOutOfRange {
                index,
                len: current.len(),
            });
        }
        let tail = current.split_off(index);
        current.extend(points);
        current.extend(tail);
        self.store.set_points(current);
        Ok(())
    }

    pub fn push_vertex(&mut self, point: RealPoint) {
        let mut current = self.store.points();
        current.push(point);
        self.store.set_points(current);
    }

    /// Remove and return vertex `index`
    pub fn remove_vertex(&mut self, index: usize) -> Result<RealPoint, GeometryError> {
        let mut current = self.store.points();
        if index >= current.len() {
            return Err(GeometryError::IndexOutOfRange {
                index,
                len: current.len(),
            });
        }
        let removed = current.remove(index);
        self.store.set_points(current);
        Ok(removed)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::of_points(&self.store.points())
    }

    pub fn real_min(&self, d: usize) -> Result<f64, GeometryError> {
        self.bounds().min.coordinate(d)
    }

    pub fn real_max(&self, d: usize) -> Result<f64, GeometryError> {
        self.bounds().max.coordinate(d)
    }
}

/// Handle on one vertex of a [`PolyshapeView`].
///
/// Writes go straight to the backing store.
pub struct VertexProxy<'v, S: VertexStore + ?Sized> {
    store: &'v mut S,
    index: usize,
    position: RealPoint,
}

impl<S: VertexStore + ?Sized> VertexProxy<'_, S> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> RealPoint {
        self.position
    }

    pub fn set_position(&mut self, x: f64, y: f64) -> Result<(), GeometryError> {
        let mut points = self.store.points();
        let len = points.len();
        let slot = points
            .get_mut(self.index)
            .ok_or(GeometryError::IndexOutOfRange {
                index: self.index,
                len,
            })?;
        *slot = RealPoint::new(x, y);
        self.store.set_points(points);
        self.position = RealPoint::new(x, y);
        Ok(())
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) -> Result<(), GeometryError> {
        let RealPoint { x, y } = self.position;
        self.set_position(x + dx, y + dy)
    }
}

/// Vertex view over a polygon, polyline or polyshape mask
pub fn mask_view(mask: &mut Mask) -> Result<PolyshapeView<'_, dyn VertexStore + '_>, TranslationError> {
    let kind = mask.kind();
    let store: &mut dyn VertexStore = match mask.geometry_mut() {
        MaskGeometry::Polygon(s) => s,
        MaskGeometry::Polyline(s) => s,
        MaskGeometry::Polyshape(s) => s,
        _ => {
            return Err(TranslationError::UnsupportedGeometry {
                kind: format!("{kind} has no vertex list"),
            })
        }
    };
    Ok(PolyshapeView::new(store))
}

/// Vertex view over the point list of a polygon or polyline record
pub fn record_view(
    record: &mut ShapeRecord,
) -> Result<PolyshapeView<'_, dyn VertexStore + '_>, TranslationError> {
    match &mut record.geometry {
        ShapeGeometry::Polygon { points } | ShapeGeometry::Polyline { points } => {
            Ok(PolyshapeView::new(points as &mut dyn VertexStore))
        }
        other => Err(TranslationError::UnsupportedGeometry {
            kind: format!("{} has no vertex list", other.kind_name()),
        }),
    }
}
