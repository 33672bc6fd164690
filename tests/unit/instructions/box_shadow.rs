use super::*;
use crate::foundation::core::Rgba;
use crate::render::backend::RecordingBackend;

fn reference_opts() -> BoxShadowOpts {
    BoxShadowOpts {
        pos: Point::new(50.0, 50.0),
        size: Size::new(150.0, 150.0),
        offset: Vec2::new(0.0, 10.0),
        blur_radius: 80.0,
        spread_radius: 10.0,
        border_radius: [0.0; 4],
    }
}

#[test]
fn adjusted_bounds_track_every_parameter() {
    let bs = BoxShadow::with_opts(reference_opts()).unwrap();
    assert_eq!(bs.adjusted_size(), Size::new(410.0, 410.0));
    assert_eq!(bs.adjusted_pos(), Point::new(-80.0, -70.0));
    assert_eq!(bs.raw_pos(), Point::new(50.0, 50.0));
    assert_eq!(bs.raw_size(), Size::new(150.0, 150.0));

    bs.set_blur_radius(0.0).unwrap();
    assert_eq!(bs.adjusted_size(), Size::new(170.0, 170.0));
    bs.set_spread_radius(0.0).unwrap();
    bs.set_offset(Vec2::ZERO).unwrap();
    assert_eq!(bs.adjusted_pos(), Point::new(50.0, 50.0));
}

#[test]
fn border_radius_leaves_bounds_alone() {
    let bs = BoxShadow::with_opts(reference_opts()).unwrap();
    let before = bs.geometry();
    bs.set_border_radius([12.0, 12.0, 0.0, 0.0]).unwrap();
    assert_eq!(bs.geometry(), before);
    assert!(bs.set_border_radius([f64::NAN; 4]).is_err());
}

#[test]
fn invalid_geometry_inputs_are_clamped() {
    let bs = BoxShadow::with_opts(BoxShadowOpts {
        blur_radius: -3.0,
        spread_radius: f64::INFINITY,
        ..reference_opts()
    })
    .unwrap();
    assert_eq!(bs.opts().blur_radius, 0.0);
    assert_eq!(bs.opts().spread_radius, 0.0);
    assert_eq!(bs.adjusted_size(), Size::new(150.0, 150.0));
}

#[test]
fn body_is_inset_by_blur_and_grown_by_spread() {
    let body = shadow_body(&reference_opts());
    assert_eq!(body, Rect::new(120.0, 120.0, 290.0, 290.0));
}

#[test]
fn emit_submits_shadow_with_state_color() {
    let bs = BoxShadow::with_opts(reference_opts()).unwrap();
    let mut state = RenderState::new(64, 64);
    state.color = Rgba::new(0.0, 0.0, 0.0, 0.5);
    let mut backend = RecordingBackend::new(64, 64);
    bs.emit(&state, &mut backend).unwrap();
    match backend.primitives() {
        [Primitive::Shadow(s)] => {
            assert_eq!(s.geometry, bs.geometry());
            assert_eq!(s.color, state.color);
            assert_eq!(s.blur_radius, 80.0);
        }
        other => panic!("unexpected primitives {other:?}"),
    }
}
