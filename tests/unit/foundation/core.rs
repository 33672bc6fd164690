use super::*;

#[test]
fn rgba_quantizes_and_clamps() {
    assert_eq!(Rgba::new(1.0, 0.5, 0.0, 1.0).to_rgba8(), [255, 128, 0, 255]);
    assert_eq!(Rgba::new(2.0, -1.0, f32::NAN, 0.0).to_rgba8(), [255, 0, 0, 0]);
    assert!(Rgba::TRANSPARENT.is_transparent());
    assert!(!Rgba::BLACK.is_transparent());
}

#[test]
fn rgba_default_is_white() {
    assert_eq!(Rgba::default(), Rgba::WHITE);
    assert_eq!(Rgba::from([0.0, 0.0, 0.0, 1.0]), Rgba::BLACK);
}

#[test]
fn pixel_buffer_addresses_rows_top_to_bottom() {
    let mut data = vec![0u8; PixelBuffer::expected_len(2, 2)];
    data[8..12].copy_from_slice(&[1, 2, 3, 4]);
    let buf = PixelBuffer {
        width: 2,
        height: 2,
        data,
        premultiplied: false,
    };
    assert_eq!(buf.pixel(0, 1), Some([1, 2, 3, 4]));
    assert_eq!(buf.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(buf.pixel(2, 0), None);
}

#[test]
fn into_straight_unpremultiplies_once() {
    let buf = PixelBuffer {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
        premultiplied: true,
    };
    let straight = buf.into_straight();
    assert!(!straight.premultiplied);
    assert_eq!(straight.data, vec![128, 0, 0, 128]);
    assert_eq!(straight.clone().into_straight(), straight);
}
