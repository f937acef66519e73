use roibridge_core::{EllipsoidMask, RealPoint, TranslationError};

use super::{malformed, require_finite, wrong_kind, ShapeAdapter};
use crate::record::ShapeGeometry;

impl ShapeAdapter for EllipsoidMask {
    fn to_geometry(&self) -> Result<ShapeGeometry, TranslationError> {
        let (x, y) = (self.center.x, self.center.y);
        let (radius_x, radius_y) = (self.rx(), self.ry());
        require_finite(
            "ellipse",
            &[("x", x), ("y", y), ("radius_x", radius_x), ("radius_y", radius_y)],
        )?;
        Ok(ShapeGeometry::Ellipse {
            x,
            y,
            radius_x,
            radius_y,
        })
    }

    fn from_geometry(geometry: &ShapeGeometry) -> Result<Self, TranslationError> {
        match *geometry {
            ShapeGeometry::Ellipse {
                x,
                y,
                radius_x,
                radius_y,
            } => {
                require_finite(
                    "ellipse",
                    &[("x", x), ("y", y), ("radius_x", radius_x), ("radius_y", radius_y)],
                )?;
                if radius_x < 0.0 || radius_y < 0.0 {
                    return Err(malformed(
                        "ellipse",
                        format!("negative radius {radius_x} x {radius_y}"),
                    ));
                }
                Ok(EllipsoidMask::new(RealPoint::new(x, y), radius_x, radius_y))
            }
            _ => Err(wrong_kind("ellipse", geometry)),
        }
    }
}
