use super::*;
use crate::assets::catalog::MediaClip;

#[test]
fn held_frame_repeats() {
    let mut held = HeldFrame {
        frame: vec![1, 2, 3, 255],
    };
    assert_eq!(held.next_frame().unwrap(), &[1, 2, 3, 255]);
    assert_eq!(held.next_frame().unwrap(), &[1, 2, 3, 255]);
}

#[cfg(feature = "media-ffmpeg")]
#[test]
fn missing_clip_is_unreadable_on_first_frame() {
    if !crate::assets::media::is_tool_on_path("ffmpeg") {
        return;
    }
    let clip = MediaClip::new("/nonexistent/storyreel-missing.mp4", 2.0).unwrap();
    let seg = Segment {
        source: SegmentSource::Clip { clip },
        in_secs: 0.0,
        out_secs: 1.0,
        position: 0,
    };
    let mut frames = FfmpegDecoder
        .open(&seg, Canvas::new(4, 4).unwrap(), Fps::default())
        .unwrap();
    let err = frames.next_frame().err().unwrap();
    match err {
        StoryreelError::UnreadableMedia { path, reason } => {
            assert!(path.ends_with("storyreel-missing.mp4"));
            assert!(reason.contains("ffmpeg"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(feature = "media-ffmpeg")]
#[test]
fn short_stream_holds_its_last_frame() {
    if !crate::assets::media::is_tool_on_path("ffmpeg") {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("red.mp4");
    let status = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-y", "-f", "lavfi", "-i", "color=c=red:size=16x16:rate=10"])
        .args(["-t", "0.3", "-pix_fmt", "yuv420p"])
        .arg(&path)
        .status()
        .unwrap();
    assert!(status.success());

    // the segment claims more than the file holds
    let clip = MediaClip::new(&path, 2.0).unwrap();
    let seg = Segment {
        source: SegmentSource::Clip { clip },
        in_secs: 0.0,
        out_secs: 1.0,
        position: 0,
    };
    let canvas = Canvas::new(16, 16).unwrap();
    let mut frames = FfmpegDecoder
        .open(&seg, canvas, Fps::new(10, 1).unwrap())
        .unwrap();
    let mut last = Vec::new();
    for _ in 0..10 {
        last = frames.next_frame().unwrap().to_vec();
    }
    assert_eq!(last.len(), canvas.rgba_len());
    let px = &last[..4];
    assert!(px[0] > 200 && px[1] < 60 && px[2] < 60, "{px:?}");
}

#[cfg(feature = "media-ffmpeg")]
#[test]
fn freeze_of_missing_clip_is_unreadable() {
    if !crate::assets::media::is_tool_on_path("ffmpeg") {
        return;
    }
    let clip = MediaClip::new("/nonexistent/storyreel-missing.mp4", 2.0).unwrap();
    let seg = Segment {
        source: SegmentSource::Freeze { clip, at_secs: 1.9 },
        in_secs: 0.0,
        out_secs: 0.5,
        position: 0,
    };
    let err = FfmpegDecoder
        .open(&seg, Canvas::new(4, 4).unwrap(), Fps::default())
        .err()
        .unwrap();
    assert!(matches!(err, StoryreelError::UnreadableMedia { .. }));
}
