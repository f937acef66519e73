use roibridge_core::{BoxMask, TranslationError};

use super::{malformed, require_finite, wrong_kind, ShapeAdapter};
use crate::record::ShapeGeometry;

// The remote rectangle is stored as top-left corner plus extent.
impl ShapeAdapter for BoxMask {
    fn to_geometry(&self) -> Result<ShapeGeometry, TranslationError> {
        let (x, y, width, height) = (self.min.x, self.min.y, self.width(), self.height());
        require_finite(
            "rectangle",
            &[("x", x), ("y", y), ("width", width), ("height", height)],
        )?;
        Ok(ShapeGeometry::Rectangle {
            x,
            y,
            width,
            height,
        })
    }

    fn from_geometry(geometry: &ShapeGeometry) -> Result<Self, TranslationError> {
        match *geometry {
            ShapeGeometry::Rectangle {
                x,
                y,
                width,
                height,
            } => {
                require_finite(
                    "rectangle",
                    &[("x", x), ("y", y), ("width", width), ("height", height)],
                )?;
                if width < 0.0 || height < 0.0 {
                    return Err(malformed(
                        "rectangle",
                        format!("negative extent {width} x {height}"),
                    ));
                }
                Ok(BoxMask::from_origin(x, y, width, height))
            }
            _ => Err(wrong_kind("rectangle", geometry)),
        }
    }
}
