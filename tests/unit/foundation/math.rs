use super::*;

#[test]
fn fnv_is_stable() {
    assert_eq!(fnv1a64_str(""), Fnv1a64::OFFSET_BASIS);
    assert_eq!(fnv1a64_str("a"), 0xaf63_dc4c_8601_ec8c);
    assert_ne!(fnv1a64_str("VideoA"), fnv1a64_str("VideoB"));
}

#[test]
fn blend_channel_endpoints() {
    assert_eq!(blend_channel(200, 10, 255), 200);
    assert_eq!(blend_channel(200, 10, 0), 10);
    let mid = blend_channel(255, 0, 128);
    assert!((127..=129).contains(&mid));
}
