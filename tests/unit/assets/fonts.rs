use super::*;

fn is_preferred(face: &FontFace) -> bool {
    matches!(
        face,
        FontFace::Loaded(LoadedFont {
            origin: FontOrigin::Preferred(_),
            ..
        })
    )
}

#[test]
fn unreadable_preferred_font_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("broken.ttf");
    std::fs::write(&bogus, b"not a font").unwrap();

    let face = resolve_font(Some(&bogus));
    assert!(!is_preferred(&face));
}

#[test]
fn missing_preferred_font_falls_back() {
    let face = resolve_font(Some(Path::new("no-such-font-4f1c2a.ttf")));
    assert!(!is_preferred(&face));
}

#[test]
fn garbage_bytes_have_no_family() {
    assert!(first_family(b"garbage").is_none());
}
