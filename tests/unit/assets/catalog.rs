use super::*;

fn exts(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./step1.png").unwrap(), "step1.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn extension_match_ignores_case() {
    let music = exts(&["mp3", "wav", "aac", "m4a"]);
    assert!(has_extension(Path::new("song.MP3"), &music));
    assert!(has_extension(Path::new("dir/loop.m4a"), &music));
    assert!(!has_extension(Path::new("notes.txt"), &music));
    assert!(!has_extension(Path::new("mp3"), &music));
}

#[test]
fn fs_catalog_lists_sorted_eligible_files() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.wav", "a.MP3", "c.txt", "d.m4a"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    std::fs::create_dir(dir.path().join("nested.mp3")).unwrap();

    let listed = FsCatalog
        .list(dir.path(), &exts(&["mp3", "wav", "aac", "m4a"]))
        .unwrap();
    let names: Vec<String> = listed
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.MP3", "b.wav", "d.m4a"]);
}

#[test]
fn fs_catalog_missing_dir_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let listed = FsCatalog
        .list(&dir.path().join("nope"), &exts(&["png"]))
        .unwrap();
    assert!(listed.is_empty());
    assert!(!FsCatalog.exists(&dir.path().join("nope.png")));
}

#[test]
fn resolve_stays_inside_dir() {
    let base = Path::new("inputs/images");
    assert_eq!(
        resolve_in_dir(base, "step1.png").unwrap(),
        base.join("step1.png")
    );
    assert!(resolve_in_dir(base, "../secrets.png").is_err());
}
