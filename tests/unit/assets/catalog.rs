use std::collections::HashMap;

use super::*;
use crate::assets::media::MediaInfo;

struct FakeProbe(HashMap<PathBuf, MediaInfo>);

impl FakeProbe {
    fn with(entries: &[(&Path, f64, bool)]) -> Self {
        let mut m = HashMap::new();
        for &(p, d, has_video) in entries {
            m.insert(
                p.to_path_buf(),
                MediaInfo {
                    source_path: p.to_path_buf(),
                    duration_secs: d,
                    video_size: has_video.then_some((64, 64)),
                },
            );
        }
        Self(m)
    }
}

impl MediaProbe for FakeProbe {
    fn probe(&self, path: &Path) -> StoryreelResult<MediaInfo> {
        self.0
            .get(path)
            .cloned()
            .ok_or_else(|| StoryreelError::unreadable(path, "not in fake probe"))
    }
}

#[test]
fn manifest_parsing_skips_blanks_and_comments() {
    let entries = parse_manifest("a.mp4\n\n  # note\n  b.mov  \n");
    assert_eq!(entries, vec!["a.mp4".to_string(), "b.mov".to_string()]);
}

#[test]
fn missing_manifest_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_manifest(&dir.path().join("nope.txt")).unwrap().is_empty());
}

#[test]
fn media_listing_filters_and_sorts_by_name() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.MP4", "a.mkv", "notes.txt", "c.mov"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    std::fs::create_dir(dir.path().join("d.mp4")).unwrap();

    let files = list_media_files(dir.path(), VIDEO_EXTENSIONS).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.mkv", "b.MP4", "c.mov"]);
    assert!(
        list_media_files(&dir.path().join("absent"), VIDEO_EXTENSIONS)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn empty_manifest_is_populated_and_written_back() {
    let dir = tempfile::tempdir().unwrap();
    let video_dir = dir.path().join("video");
    std::fs::create_dir(&video_dir).unwrap();
    std::fs::write(video_dir.join("z.mp4"), b"x").unwrap();
    std::fs::write(video_dir.join("m.mov"), b"x").unwrap();
    let manifest = dir.path().join("data").join("video_list.txt");

    let catalog = AssetCatalog::new(&video_dir);
    let entries = catalog.load_or_populate_manifest(&manifest).unwrap();
    assert_eq!(entries, vec!["m.mov".to_string(), "z.mp4".to_string()]);
    assert_eq!(std::fs::read_to_string(&manifest).unwrap(), "m.mov\nz.mp4\n");

    // Existing content wins over the directory listing.
    std::fs::write(&manifest, "only.mp4\n").unwrap();
    assert_eq!(
        catalog.load_or_populate_manifest(&manifest).unwrap(),
        vec!["only.mp4".to_string()]
    );
}

#[test]
fn relative_references_prefer_asset_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("here.mp4"), b"x").unwrap();
    let catalog = AssetCatalog::new(dir.path());

    assert_eq!(catalog.resolve_reference("here.mp4"), dir.path().join("here.mp4"));
    assert_eq!(
        catalog.resolve_reference("elsewhere.mp4"),
        PathBuf::from("elsewhere.mp4")
    );
    let abs = dir.path().join("abs.mp4");
    assert_eq!(catalog.resolve_reference(abs.to_str().unwrap()), abs);
}

#[test]
fn resolve_drops_unreadable_zero_and_audio_only_entries() {
    let catalog = AssetCatalog::new("/nonexistent-assets");
    let probe = FakeProbe::with(&[
        (Path::new("good.mp4"), 4.0, true),
        (Path::new("zero.mp4"), 0.0, true),
        (Path::new("song.mp3"), 30.0, false),
    ]);
    let entries: Vec<String> = ["good.mp4", "zero.mp4", "song.mp3", "broken.mp4"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let pool = catalog.resolve(&entries, &probe).unwrap();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].path(), Path::new("good.mp4"));
    assert_eq!(pool[0].duration_secs(), 4.0);
    assert_eq!(pool[0].video_size(), Some((64, 64)));
}

#[test]
fn resolve_with_nothing_readable_is_no_valid_media() {
    let catalog = AssetCatalog::new("/nonexistent-assets");
    let probe = FakeProbe::with(&[]);
    let err = catalog
        .resolve(&["x.mp4".to_string()], &probe)
        .unwrap_err();
    assert!(matches!(err, StoryreelError::NoValidMedia(_)));

    let err = catalog.resolve(&[], &probe).unwrap_err();
    assert!(matches!(err, StoryreelError::NoValidMedia(_)));
}

#[test]
fn clip_rejects_non_positive_duration() {
    assert!(MediaClip::new("a.mp4", 0.0).is_err());
    assert!(MediaClip::new("a.mp4", f64::NAN).is_err());
    assert!(MediaClip::new("a.mp4", 0.5).is_ok());
}
