use super::*;
use crate::config::GraphicsConfig;
use crate::instructions::{ClearBuffers, ClearColor, Color, Rectangle};
use crate::{Point, Size};

fn ctx() -> GraphicsContext {
    GraphicsContext::new(GraphicsConfig::default()).unwrap()
}

#[test]
fn pixels_before_draw_are_not_available() {
    let fbo = Fbo::new(&ctx(), FboOpts::default()).unwrap();
    assert!(matches!(fbo.pixels(), Err(GraphicsError::NotDrawn)));
    assert!(matches!(
        fbo.texture().buffer(),
        Err(GraphicsError::NotDrawn)
    ));
}

#[test]
fn draw_produces_straight_rgba8_of_full_size() {
    let fbo = Fbo::new(
        &ctx(),
        FboOpts {
            size: (12, 7),
            clear_color: Rgba::new(0.0, 0.0, 1.0, 1.0),
        },
    )
    .unwrap();
    fbo.draw().unwrap();
    let px = fbo.pixels().unwrap();
    assert_eq!(px.len(), 12 * 7 * 4);
    assert!(px.chunks_exact(4).all(|p| p == [0, 0, 255, 255]));
    assert!(!fbo.texture().buffer().unwrap().premultiplied);
}

#[test]
fn recorded_instructions_land_in_the_fbo_canvas() {
    let fbo = Fbo::new(&ctx(), FboOpts::default()).unwrap();
    {
        let _rec = fbo.record();
        ClearColor::new(0.0, 0.0, 0.0, 1.0).unwrap();
        ClearBuffers::new().unwrap();
        Color::new(1.0, 0.0, 0.0, 1.0).unwrap();
        Rectangle::new(Point::new(10.0, 20.0), Size::new(30.0, 30.0)).unwrap();
    }
    assert_eq!(fbo.canvas().len(), 4);
    fbo.draw().unwrap();
    let buf = fbo.texture().buffer().unwrap();
    assert_eq!(buf.pixel(15, 25), Some([255, 0, 0, 255]));
    assert_eq!(buf.pixel(5, 5), Some([0, 0, 0, 255]));
    // rows run top to bottom
    assert_eq!(buf.pixel(15, 15), Some([0, 0, 0, 255]));
}

#[test]
fn resize_invalidates_texture() {
    let fbo = Fbo::new(&ctx(), FboOpts::default()).unwrap();
    fbo.draw().unwrap();
    assert!(fbo.pixels().is_ok());
    fbo.set_size(20, 10).unwrap();
    assert_eq!(fbo.size(), (20, 10));
    assert!(matches!(fbo.pixels(), Err(GraphicsError::NotDrawn)));
    fbo.draw().unwrap();
    assert_eq!(fbo.pixels().unwrap().len(), 20 * 10 * 4);
}

#[test]
fn size_is_bounded_by_config() {
    let ctx = GraphicsContext::new(GraphicsConfig {
        max_fbo_dimension: 128,
        ..GraphicsConfig::default()
    })
    .unwrap();
    let err = Fbo::new(
        &ctx,
        FboOpts {
            size: (129, 10),
            ..FboOpts::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, GraphicsError::Resource(_)));
    assert!(Fbo::new(
        &ctx,
        FboOpts {
            size: (0, 10),
            ..FboOpts::default()
        }
    )
    .is_err());

    let ok = Fbo::new(&ctx, FboOpts::default()).unwrap();
    assert!(ok.set_size(64, 200).is_err());
    assert_eq!(ok.size(), (100, 100));
}

#[test]
fn clear_color_must_be_finite() {
    let fbo = Fbo::new(&ctx(), FboOpts::default()).unwrap();
    assert!(fbo.set_clear_color(Rgba::new(f32::NAN, 0.0, 0.0, 1.0)).is_err());
    fbo.set_clear_color(Rgba::WHITE).unwrap();
    assert_eq!(fbo.clear_color(), Rgba::WHITE);
}
