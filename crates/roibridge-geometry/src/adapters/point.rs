use roibridge_core::{PointMask, TranslationError};

use super::{require_finite, wrong_kind, ShapeAdapter};
use crate::record::ShapeGeometry;

impl ShapeAdapter for PointMask {
    fn to_geometry(&self) -> Result<ShapeGeometry, TranslationError> {
        let (x, y) = (self.position.x, self.position.y);
        require_finite("point", &[("x", x), ("y", y)])?;
        Ok(ShapeGeometry::Point { x, y })
    }

    fn from_geometry(geometry: &ShapeGeometry) -> Result<Self, TranslationError> {
        match *geometry {
            ShapeGeometry::Point { x, y } => {
                require_finite("point", &[("x", x), ("y", y)])?;
                Ok(PointMask::new(x, y))
            }
            _ => Err(wrong_kind("point", geometry)),
        }
    }
}
