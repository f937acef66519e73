use serde::{Deserialize, Serialize};

use super::{Bounds, RealMask, RealPoint, EDGE_TOLERANCE};

/// Closed polygon over an ordered vertex list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon2D {
    vertices: Vec<RealPoint>,
}

impl Polygon2D {
    pub fn new(vertices: Vec<RealPoint>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[RealPoint] {
        &self.vertices
    }

    pub fn set_vertices(&mut self, vertices: Vec<RealPoint>) {
        self.vertices = vertices;
    }
}

impl RealMask for Polygon2D {
    fn bounds(&self) -> Bounds {
        Bounds::of_points(&self.vertices)
    }

    fn contains(&self, p: RealPoint) -> bool {
        polygon_contains(&self.vertices, p)
    }
}

/// Open polyline over an ordered vertex list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline2D {
    vertices: Vec<RealPoint>,
}

impl Polyline2D {
    pub fn new(vertices: Vec<RealPoint>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[RealPoint] {
        &self.vertices
    }

    pub fn set_vertices(&mut self, vertices: Vec<RealPoint>) {
        self.vertices = vertices;
    }
}

impl RealMask for Polyline2D {
    fn bounds(&self) -> Bounds {
        Bounds::of_points(&self.vertices)
    }

    fn contains(&self, p: RealPoint) -> bool {
        polyline_contains(&self.vertices, p)
    }
}

/// Even-odd ray casting; boundary points count as inside.
pub(crate) fn polygon_contains(vertices: &[RealPoint], p: RealPoint) -> bool {
    if vertices.len() < 3 {
        return polyline_contains(vertices, p);
    }
    if on_edges(vertices, p, true) {
        return true;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if ((vi.y > p.y) != (vj.y > p.y)) && (p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

pub(crate) fn polyline_contains(vertices: &[RealPoint], p: RealPoint) -> bool {
    match vertices {
        [] => false,
        [only] => *only == p,
        _ => on_edges(vertices, p, false),
    }
}

fn on_edges(vertices: &[RealPoint], p: RealPoint, closed: bool) -> bool {
    let open_edges = vertices.windows(2).map(|w| (w[0], w[1]));
    let closing = match (closed, vertices.first(), vertices.last()) {
        (true, Some(first), Some(last)) => Some((*last, *first)),
        _ => None,
    };
    open_edges
        .chain(closing)
        .any(|(a, b)| segment_distance_sq(a, b, p) <= EDGE_TOLERANCE * EDGE_TOLERANCE)
}

fn segment_distance_sq(a: RealPoint, b: RealPoint, p: RealPoint) -> f64 {
    let l2 = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
    if l2 == 0.0 {
        return (p.x - a.x).powi(2) + (p.y - a.y).powi(2);
    }
    let t = (((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / l2).clamp(0.0, 1.0);
    let proj_x = a.x + t * (b.x - a.x);
    let proj_y = a.y + t * (b.y - a.y);
    (p.x - proj_x).powi(2) + (p.y - proj_y).powi(2)
}
