use super::*;

#[test]
fn fps_validation() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(24, 0).is_err());
    assert!(Fps::new(24, 1).is_ok());
}

#[test]
fn secs_to_frames_rounds_to_nearest() {
    let fps = Fps::new(24, 1).unwrap();
    assert_eq!(fps.secs_to_frames_round(5.0), 120);
    assert_eq!(fps.secs_to_frames_round(0.02), 0);
    assert_eq!(fps.secs_to_frames_round(0.03), 1);

    let ntsc = Fps::new(30_000, 1001).unwrap();
    assert_eq!(ntsc.secs_to_frames_round(1.0), 30);
}

#[test]
fn frames_to_secs_inverts_integer_rates() {
    let fps = Fps::new(25, 1).unwrap();
    assert!((fps.frames_to_secs(50) - 2.0).abs() < 1e-12);
}

#[test]
fn canvas_rgb_len() {
    assert_eq!(Canvas::new(4, 3).rgb_len(), 36);
    assert_eq!(Canvas::new(0, 3).rgb_len(), 0);
}
