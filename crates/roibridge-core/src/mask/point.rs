use serde::{Deserialize, Serialize};

use super::{Bounds, RealMask, RealPoint};

/// A single-position mask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMask {
    pub position: RealPoint,
}

impl PointMask {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: RealPoint::new(x, y),
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = RealPoint::new(x, y);
    }
}

impl RealMask for PointMask {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.position)
    }

    fn contains(&self, p: RealPoint) -> bool {
        p == self.position
    }
}
