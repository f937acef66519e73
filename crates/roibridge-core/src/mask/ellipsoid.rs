use serde::{Deserialize, Serialize};

use super::{Bounds, RealMask, RealPoint};

/// Closed axis-aligned ellipse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipsoidMask {
    pub center: RealPoint,
    /// Semi-axis lengths along X and Y
    pub semi_axes: RealPoint,
}

impl EllipsoidMask {
    pub fn new(center: RealPoint, rx: f64, ry: f64) -> Self {
        Self {
            center,
            semi_axes: RealPoint::new(rx, ry),
        }
    }

    pub fn rx(&self) -> f64 {
        self.semi_axes.x
    }

    pub fn ry(&self) -> f64 {
        self.semi_axes.y
    }
}

impl RealMask for EllipsoidMask {
    fn bounds(&self) -> Bounds {
        Bounds::new(
            RealPoint::new(self.center.x - self.rx(), self.center.y - self.ry()),
            RealPoint::new(self.center.x + self.rx(), self.center.y + self.ry()),
        )
    }

    fn contains(&self, p: RealPoint) -> bool {
        if self.rx() <= 0.0 || self.ry() <= 0.0 {
            return p == self.center;
        }
        // (x/a)^2 + (y/b)^2 <= 1
        let nx = (p.x - self.center.x) / self.rx();
        let ny = (p.y - self.center.y) / self.ry();
        nx * nx + ny * ny <= 1.0
    }
}
