use serde::{Deserialize, Serialize};

use super::polygon::{polygon_contains, polyline_contains};
use super::{Bounds, RealMask, RealPoint};

/// Editable vertex list that is either closed (a polygon) or open (a polyline)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyshape2D {
    vertices: Vec<RealPoint>,
    closed: bool,
}

impl Polyshape2D {
    pub fn closed(vertices: Vec<RealPoint>) -> Self {
        Self {
            vertices,
            closed: true,
        }
    }

    pub fn open(vertices: Vec<RealPoint>) -> Self {
        Self {
            vertices,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn vertices(&self) -> &[RealPoint] {
        &self.vertices
    }

    pub fn set_vertices(&mut self, vertices: Vec<RealPoint>) {
        self.vertices = vertices;
    }
}

impl RealMask for Polyshape2D {
    fn bounds(&self) -> Bounds {
        Bounds::of_points(&self.vertices)
    }

    fn contains(&self, p: RealPoint) -> bool {
        if self.closed {
            polygon_contains(&self.vertices, p)
        } else {
            polyline_contains(&self.vertices, p)
        }
    }
}
