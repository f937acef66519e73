use serde::{Deserialize, Serialize};

use super::{Bounds, RealMask, RealPoint};

/// Closed axis-aligned box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxMask {
    pub min: RealPoint,
    pub max: RealPoint,
}

impl BoxMask {
    /// Box spanning two opposite corners, in any order
    pub fn new(a: RealPoint, b: RealPoint) -> Self {
        Self {
            min: RealPoint::new(a.x.min(b.x), a.y.min(b.y)),
            max: RealPoint::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Box from its top-left corner and extent
    pub fn from_origin(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(RealPoint::new(x, y), RealPoint::new(x + width, y + height))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> RealPoint {
        RealPoint::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

impl RealMask for BoxMask {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.min, self.max)
    }

    fn contains(&self, p: RealPoint) -> bool {
        self.bounds().contains(p)
    }
}
