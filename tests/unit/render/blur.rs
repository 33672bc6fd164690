use super::*;

#[test]
fn radius_zero_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn constant_image_is_unchanged() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn single_pixel_spreads_while_conserving_alpha() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((2 * w + 2) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 2, 1.2).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 4);
}

#[test]
fn mismatched_length_is_rejected() {
    assert!(matches!(
        blur_rgba8_premul(&[0u8; 7], 1, 2, 1, 1.0),
        Err(GraphicsError::Resource(_))
    ));
    assert!(matches!(
        blur_rgba8_premul(&[0u8; 4], 1, 1, 2, 0.0),
        Err(GraphicsError::Validation(_))
    ));
}

#[test]
fn shadow_kernel_follows_blur_radius() {
    assert_eq!(shadow_kernel(80.0), (120, 40.0));
    assert_eq!(shadow_kernel(3.0), (5, 1.5));
    assert_eq!(shadow_kernel(0.0), (0, 0.0));
    assert_eq!(shadow_kernel(f64::NAN), (0, 0.0));
}

#[test]
fn vanishing_blur_radius_is_identity() {
    assert_eq!(shadow_kernel(1e-300), (0, 0.0));
    assert_eq!(shadow_kernel(f64::from(f32::MIN_POSITIVE) / 4.0), (0, 0.0));

    let src = vec![9u8, 8, 7, 255, 0, 0, 0, 0];
    let (radius, sigma) = shadow_kernel(1e-300);
    assert_eq!(blur_rgba8_premul(&src, 2, 1, radius, sigma).unwrap(), src);
}

#[test]
fn kernel_weights_sum_to_one_in_q16() {
    let k = gaussian_kernel_q16(4, 2.0).unwrap();
    assert_eq!(k.len(), 9);
    assert_eq!(k.iter().map(|&w| u64::from(w)).sum::<u64>(), 1 << 16);
    assert_eq!(k[0], k[8]);
}
