use super::*;
use crate::assets::fonts::FontFace;
use crate::config::TextStyle;

fn fps() -> Fps {
    Fps::new(10, 1).unwrap()
}

fn renderer() -> TextFrameRenderer {
    TextFrameRenderer::with_font(&TextStyle::default(), FontFace::Builtin)
}

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> Frame {
    Frame::solid(Canvas::new(w, h), rgb)
}

#[test]
fn still_repeats_one_frame() {
    let clip = Clip::still(solid(2, 2, [1, 1, 1]), 7, fps());
    assert_eq!(clip.len_frames(), 7);
    assert!((clip.duration_secs() - 0.7).abs() < 1e-9);
    let mut r = renderer();
    let a = clip.render_frame(FrameIndex(0), &mut r).unwrap();
    let b = clip.render_frame(FrameIndex(6), &mut r).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(clip.render_frame(FrameIndex(7), &mut r).is_err());
}

#[test]
fn from_frames_rejects_mixed_sizes_and_empty() {
    assert!(Clip::from_frames(Vec::new(), fps()).is_err());
    assert!(Clip::from_frames(vec![solid(2, 2, [0; 3]), solid(2, 3, [0; 3])], fps()).is_err());
}

#[test]
fn concat_maps_indices_to_segments() {
    let a = Clip::still(solid(1, 1, [10, 0, 0]), 2, fps());
    let b = Clip::from_frames(
        vec![solid(1, 1, [20, 0, 0]), solid(1, 1, [30, 0, 0])],
        fps(),
    )
    .unwrap();
    let c = Clip::still(solid(1, 1, [40, 0, 0]), 1, fps());
    let all = Clip::concat(vec![a, b, c]).unwrap();
    assert_eq!(all.len_frames(), 5);

    let mut r = renderer();
    let reds: Vec<u8> = (0..5)
        .map(|i| all.render_frame(FrameIndex(i), &mut r).unwrap().pixel(0, 0)[0])
        .collect();
    assert_eq!(reds, [10, 10, 20, 30, 40]);
}

#[test]
fn concat_requires_matching_clips() {
    assert!(Clip::concat(Vec::new()).is_err());
    let a = Clip::still(solid(1, 1, [0; 3]), 1, fps());
    let b = Clip::still(solid(2, 1, [0; 3]), 1, fps());
    assert!(Clip::concat(vec![a, b]).is_err());
}

#[test]
fn stack_places_layers_at_offsets() {
    let top = Clip::still(solid(2, 1, [200, 0, 0]), 3, fps());
    let bottom = Clip::still(solid(2, 2, [0, 200, 0]), 3, fps());
    let stacked = Clip::stack(Canvas::new(2, 3), vec![(top, 0), (bottom, 1)]).unwrap();
    assert_eq!(stacked.canvas(), Canvas::new(2, 3));

    let mut r = renderer();
    let f = stacked.render_frame(FrameIndex(2), &mut r).unwrap();
    assert_eq!(f.pixel(1, 0), [200, 0, 0]);
    assert_eq!(f.pixel(1, 1), [0, 200, 0]);
    assert_eq!(f.pixel(0, 2), [0, 200, 0]);
}

#[test]
fn stack_requires_equal_lengths() {
    let a = Clip::still(solid(1, 1, [0; 3]), 3, fps());
    let b = Clip::still(solid(1, 1, [0; 3]), 4, fps());
    assert!(Clip::stack(Canvas::new(1, 2), vec![(a, 0), (b, 1)]).is_err());
}

#[test]
fn typing_clip_renders_text_background() {
    let clip = Clip::typing("hi there", Canvas::new(8, 4), vec![0, 1, 8], fps());
    assert_eq!(clip.len_frames(), 3);
    let mut r = renderer();
    let mut seen = 0;
    clip.for_each_frame(&mut r, |idx, frame| {
        assert_eq!(idx.0, seen);
        assert_eq!(frame.pixel(0, 0), TextStyle::default().bg_rgb);
        seen += 1;
        Ok(())
    })
    .unwrap();
    assert_eq!(seen, 3);
}
