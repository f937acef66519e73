use proptest::prelude::*;
use roibridge_core::{
    Axis, BoxMask, EllipsoidMask, GeometryError, Mask, PlaneAttachment, PointMask, Polygon2D,
    Polyline2D, Polyshape2D, RealMask, RealPoint,
};

fn pts(raw: &[(f64, f64)]) -> Vec<RealPoint> {
    raw.iter().map(|&p| p.into()).collect()
}

#[test]
fn test_point_bounds_and_membership() {
    let point = PointMask::new(10.0, 20.0);
    assert_eq!(point.real_min(0), Ok(10.0));
    assert_eq!(point.real_max(1), Ok(20.0));
    assert!(point.contains(RealPoint::new(10.0, 20.0)));
    assert!(!point.contains(RealPoint::new(10.0, 20.5)));
}

#[test]
fn test_box_normalizes_corners() {
    let b = BoxMask::new(RealPoint::new(22.0, 46.5), RealPoint::new(10.0, 10.0));
    assert_eq!(b.min, RealPoint::new(10.0, 10.0));
    assert_eq!(b.max, RealPoint::new(22.0, 46.5));
    assert_eq!(b.width(), 12.0);
    assert!(b.contains(RealPoint::new(10.0, 46.5)));
    assert!(!b.contains(RealPoint::new(9.9, 20.0)));
}

#[test]
fn test_ellipsoid_contains_point() {
    let e = EllipsoidMask::new(RealPoint::new(120.0, 121.25), 4.0, 9.0);
    assert!(e.contains(RealPoint::new(120.0, 121.25)));
    assert!(e.contains(RealPoint::new(124.0, 121.25)));
    assert!(!e.contains(RealPoint::new(124.1, 121.25)));
    assert_eq!(e.real_min(1), Ok(112.25));
    assert_eq!(e.real_max(0), Ok(124.0));
}

#[test]
fn test_polygon_contains_point() {
    let triangle = Polygon2D::new(pts(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]));
    assert!(triangle.contains(RealPoint::new(4.0, 1.0)));
    assert!(triangle.contains(RealPoint::new(5.0, 2.5)));
    assert!(!triangle.contains(RealPoint::new(1.0, 4.0)));
}

#[test]
fn test_polyline_contains_only_points_on_segments() {
    let line = Polyline2D::new(pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
    assert!(line.contains(RealPoint::new(5.0, 0.0)));
    assert!(line.contains(RealPoint::new(10.0, 7.0)));
    assert!(!line.contains(RealPoint::new(5.0, 5.0)));
}

#[test]
fn test_invalid_dimension_is_rejected() {
    let polygon = Polygon2D::new(pts(&[(0.0, 0.0), (1.0, 1.0)]));
    assert_eq!(
        polygon.real_min(2),
        Err(GeometryError::InvalidDimension { dimension: 2 })
    );
    assert_eq!(
        polygon.real_max(5),
        Err(GeometryError::InvalidDimension { dimension: 5 })
    );
}

#[test]
fn test_empty_polyshape_has_empty_bounds() {
    let shape = Mask::new(Polyshape2D::open(Vec::new()));
    assert!(shape.bounds().is_empty());
    assert!(!shape.test_position(Axis::X, 0.0));
}

#[test]
fn test_position_on_planar_axes_follows_geometry() {
    let mut mask = Mask::new(Polygon2D::new(pts(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)])));
    assert!(mask.test_position(Axis::X, 5.0));
    assert!(!mask.test_position(Axis::X, 6.0));

    if let roibridge_core::MaskGeometry::Polygon(p) = mask.geometry_mut() {
        p.set_vertices(pts(&[(0.0, 0.0), (8.0, 0.0), (8.0, 5.0)]));
    }
    // Next query sees the edited geometry
    assert!(mask.test_position(Axis::X, 6.0));
    assert!(!mask.test_position(Axis::Y, -0.5));
}

#[test]
fn test_concrete_plane_matches_only_itself() {
    let mask = Mask::new(PointMask::new(10.0, 20.0))
        .with_plane(PlaneAttachment::unset().with_z(3).with_c(1));
    assert!(mask.test_position(Axis::Z, 3.0));
    assert!(!mask.test_position(Axis::Z, 2.0));
    assert!(mask.test_position(Axis::Channel, 1.0));
    assert!(!mask.test_position(Axis::Channel, 0.0));
    // Time is unset
    assert!(mask.test_position(Axis::Time, 12.0));
}

#[test]
fn test_duplicate_has_fresh_identity() {
    let original = Mask::new(PointMask::new(1.0, 2.0)).with_name("spot");
    let copy = original.duplicate();
    assert_ne!(original.id(), copy.id());
    assert_eq!(original.geometry(), copy.geometry());
    assert_eq!(copy.name(), Some("spot"));
}

proptest! {
    #[test]
    fn prop_polygon_bounds_are_tight(raw in prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 1..40)) {
        let polygon = Polygon2D::new(pts(&raw));
        let min_x = raw.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let max_y = raw.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(polygon.real_min(0), Ok(min_x));
        prop_assert_eq!(polygon.real_max(1), Ok(max_y));
    }

    #[test]
    fn prop_unset_z_matches_every_plane(v in -1e9f64..1e9) {
        let mask = Mask::new(PointMask::new(0.0, 0.0));
        prop_assert!(mask.test_position(Axis::Z, v));
    }

    #[test]
    fn prop_concrete_z_matches_only_itself(k in 0u32..10_000, v in 0u32..10_000) {
        let mask = Mask::new(PointMask::new(0.0, 0.0))
            .with_plane(PlaneAttachment::unset().with_z(k));
        prop_assert_eq!(mask.test_position(Axis::Z, f64::from(v)), v == k);
    }
}
