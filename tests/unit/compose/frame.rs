use super::*;

#[test]
fn solid_fills_every_pixel() {
    let f = Frame::solid(Canvas::new(3, 2), [1, 2, 3]);
    assert_eq!(f.data.len(), 18);
    assert_eq!(f.pixel(2, 1), [1, 2, 3]);
}

#[test]
fn premul_composite_over_background() {
    let mut f = Frame::solid(Canvas::new(2, 1), [100, 100, 100]);
    assert!(f.composite_premul_rgba8(&[0u8; 7]).is_err());

    // Opaque red, then fully transparent.
    f.composite_premul_rgba8(&[255, 0, 0, 255, 0, 0, 0, 0]).unwrap();
    assert_eq!(f.pixel(0, 0), [255, 0, 0]);
    assert_eq!(f.pixel(1, 0), [100, 100, 100]);
}

#[test]
fn blit_clips_negative_offsets() {
    let mut dst = Frame::solid(Canvas::new(4, 4), [0, 0, 0]);
    let src = Frame::solid(Canvas::new(4, 4), [200, 0, 0]);
    dst.blit(&src, -2, 3);
    assert_eq!(dst.pixel(0, 3), [200, 0, 0]);
    assert_eq!(dst.pixel(1, 3), [200, 0, 0]);
    assert_eq!(dst.pixel(2, 3), [0, 0, 0]);
    assert_eq!(dst.pixel(0, 2), [0, 0, 0]);

    // Fully outside: no-op.
    dst.blit(&src, 10, 10);
    assert_eq!(dst.pixel(3, 3), [0, 0, 0]);
}

#[test]
fn blend_respects_alpha() {
    let mut dst = Frame::solid(Canvas::new(2, 1), [0, 0, 100]);
    let overlay = [255, 0, 0, 255, 255, 0, 0, 0];
    dst.blend_rgba8(&overlay, 2, 1, 0, 0).unwrap();
    assert_eq!(dst.pixel(0, 0), [255, 0, 0]);
    assert_eq!(dst.pixel(1, 0), [0, 0, 100]);

    assert!(dst.blend_rgba8(&overlay, 3, 1, 0, 0).is_err());
}
