use roibridge_core::{Polygon2D, Polyline2D, Polyshape2D, TranslationError};

use super::{require_finite_points, wrong_kind, ShapeAdapter};
use crate::record::ShapeGeometry;

impl ShapeAdapter for Polygon2D {
    fn to_geometry(&self) -> Result<ShapeGeometry, TranslationError> {
        require_finite_points("polygon", self.vertices())?;
        Ok(ShapeGeometry::Polygon {
            points: self.vertices().to_vec(),
        })
    }

    fn from_geometry(geometry: &ShapeGeometry) -> Result<Self, TranslationError> {
        match geometry {
            ShapeGeometry::Polygon { points } => {
                require_finite_points("polygon", points)?;
                Ok(Polygon2D::new(points.clone()))
            }
            _ => Err(wrong_kind("polygon", geometry)),
        }
    }
}

impl ShapeAdapter for Polyline2D {
    fn to_geometry(&self) -> Result<ShapeGeometry, TranslationError> {
        require_finite_points("polyline", self.vertices())?;
        Ok(ShapeGeometry::Polyline {
            points: self.vertices().to_vec(),
        })
    }

    fn from_geometry(geometry: &ShapeGeometry) -> Result<Self, TranslationError> {
        match geometry {
            ShapeGeometry::Polyline { points } => {
                require_finite_points("polyline", points)?;
                Ok(Polyline2D::new(points.clone()))
            }
            _ => Err(wrong_kind("polyline", geometry)),
        }
    }
}

// A closed polyshape is stored as a polygon, an open one as a polyline.
impl ShapeAdapter for Polyshape2D {
    fn to_geometry(&self) -> Result<ShapeGeometry, TranslationError> {
        let points = self.vertices().to_vec();
        if self.is_closed() {
            require_finite_points("polygon", &points)?;
            Ok(ShapeGeometry::Polygon { points })
        } else {
            require_finite_points("polyline", &points)?;
            Ok(ShapeGeometry::Polyline { points })
        }
    }

    fn from_geometry(geometry: &ShapeGeometry) -> Result<Self, TranslationError> {
        match geometry {
            ShapeGeometry::Polygon { points } => {
                require_finite_points("polygon", points)?;
                Ok(Polyshape2D::closed(points.clone()))
            }
            ShapeGeometry::Polyline { points } => {
                require_finite_points("polyline", points)?;
                Ok(Polyshape2D::open(points.clone()))
            }
            _ => Err(wrong_kind("polyshape", geometry)),
        }
    }
}
