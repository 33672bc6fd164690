use super::*;

#[test]
fn shadow_size_grows_by_blur_and_spread() {
    let g = ShadowGeometry::compute(
        Point::new(50.0, 50.0),
        Size::new(150.0, 150.0),
        Vec2::new(0.0, 10.0),
        80.0,
        10.0,
    );
    assert_eq!(g.size, Size::new(410.0, 410.0));
    assert_eq!(g.pos, Point::new(-80.0, -70.0));
}

#[test]
fn shadow_clamps_instead_of_failing() {
    let g = ShadowGeometry::compute(
        Point::new(f64::NAN, 4.0),
        Size::new(10.0, 10.0),
        Vec2::ZERO,
        -5.0,
        -20.0,
    );
    assert_eq!(g.size, Size::new(0.0, 0.0));
    assert!(g.is_empty());
    assert_eq!(g.pos, Point::new(20.0, 24.0));
}

#[test]
fn shadow_rect_matches_pos_and_size() {
    let g = ShadowGeometry::compute(Point::ZERO, Size::new(10.0, 20.0), Vec2::ZERO, 0.0, 0.0);
    assert_eq!(g.rect(), Rect::new(0.0, 0.0, 10.0, 20.0));
}

#[test]
fn full_ellipse_has_one_vertex_per_segment() {
    let path = ellipse_path(Point::ZERO, Size::new(100.0, 50.0), 8, 0.0, 360.0);
    let els = path.elements();
    // move + 7 lines + close
    assert_eq!(els.len(), 9);
    assert_eq!(els[0], kurbo::PathEl::MoveTo(Point::new(50.0, 0.0)));
    let bbox = path.bounding_box();
    assert!((bbox.width() - 100.0).abs() < 1e-9);
    assert!((bbox.height() - 50.0).abs() < 1e-9);
}

#[test]
fn partial_ellipse_is_a_slice_from_the_center() {
    let path = ellipse_path(Point::ZERO, Size::new(100.0, 100.0), 4, 0.0, 90.0);
    let els = path.elements();
    assert_eq!(els[0], kurbo::PathEl::MoveTo(Point::new(50.0, 50.0)));
    // center + 5 rim points + close
    assert_eq!(els.len(), 7);
    match els[5] {
        kurbo::PathEl::LineTo(p) => assert!(p.distance(Point::new(100.0, 50.0)) < 1e-9),
        other => panic!("unexpected element {other:?}"),
    }
}

#[test]
fn degenerate_shapes_produce_empty_paths() {
    assert!(ellipse_path(Point::ZERO, Size::ZERO, 30, 0.0, 360.0).elements().is_empty());
    assert!(rect_path(Point::ZERO, Size::new(-1.0, 5.0)).elements().is_empty());
    assert!(points_path(&[Point::ZERO], 0.0).elements().is_empty());
    assert!(rounded_rect_path(Rect::ZERO, [4.0; 4]).elements().is_empty());
}

#[test]
fn points_are_squares_of_half_extent() {
    let path = points_path(&[Point::new(10.0, 10.0), Point::new(30.0, 10.0)], 2.0);
    assert_eq!(path.bounding_box(), Rect::new(8.0, 8.0, 32.0, 12.0));
}

#[test]
fn rounded_rect_stays_within_bounds() {
    let r = Rect::new(0.0, 0.0, 40.0, 20.0);
    let path = rounded_rect_path(r, [5.0, 0.0, 5.0, f64::NAN]);
    let bbox = path.bounding_box();
    assert!((bbox.x0 - r.x0).abs() < 1e-6 && (bbox.y1 - r.y1).abs() < 1e-6);
}
