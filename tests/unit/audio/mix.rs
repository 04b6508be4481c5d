use super::*;

fn stereo(sample_rate: u32, frames: usize, v: f32) -> AudioTrack {
    AudioTrack::new(sample_rate, 2, vec![v; frames * 2]).unwrap()
}

#[test]
fn no_background_returns_narration_unchanged() {
    let narration = stereo(100, 250, 0.25);
    let out = mix(&narration, None, DEFAULT_BACKGROUND_GAIN).unwrap();
    assert_eq!(out, narration);
}

#[test]
fn mix_length_follows_narration() {
    let narration = stereo(100, 250, 0.0);
    let short_bg = stereo(100, 60, 0.5);
    let long_bg = stereo(100, 1000, 0.5);
    for bg in [&short_bg, &long_bg] {
        let out = mix(&narration, Some(bg), 0.3).unwrap();
        assert_eq!(out.frames(), narration.frames());
        assert_eq!(out.sample_rate(), 100);
        assert!(out.samples().iter().all(|s| (s - 0.15).abs() < 1e-6));
    }
}

#[test]
fn mix_clamps_to_unit_range() {
    let narration = stereo(100, 10, 0.9);
    let bg = stereo(100, 10, 1.0);
    let out = mix(&narration, Some(&bg), 0.5).unwrap();
    assert!(out.samples().iter().all(|&s| s == 1.0));

    let narration = stereo(100, 10, -0.9);
    let bg = stereo(100, 10, -1.0);
    let out = mix(&narration, Some(&bg), 0.5).unwrap();
    assert!(out.samples().iter().all(|&s| s == -1.0));
}

#[test]
fn rejects_bad_gain() {
    let narration = stereo(100, 10, 0.0);
    assert!(mix(&narration, None, -0.1).is_err());
    assert!(mix(&narration, None, f32::NAN).is_err());
}

#[test]
fn loops_whole_repetitions_then_truncates() {
    let bg = AudioTrack::new(10, 1, vec![0.1, 0.2, 0.3]).unwrap();
    let looped = loop_to_frames(&bg, 7).unwrap();
    assert_eq!(looped.samples(), &[0.1, 0.2, 0.3, 0.1, 0.2, 0.3, 0.1]);

    let shorter = loop_to_frames(&bg, 2).unwrap();
    assert_eq!(shorter.samples(), &[0.1, 0.2]);

    let empty = AudioTrack::new(10, 1, vec![]).unwrap();
    assert!(loop_to_frames(&empty, 4).is_err());
}

#[test]
fn conform_upmixes_mono_and_resamples() {
    let mono = AudioTrack::new(50, 1, vec![0.4; 50]).unwrap();
    let out = conform(&mono, 100, 2).unwrap();
    assert_eq!(out.sample_rate(), 100);
    assert_eq!(out.channels(), 2);
    assert_eq!(out.frames(), 100);
    assert!(out.samples().iter().all(|s| (s - 0.4).abs() < 1e-6));
}

#[test]
fn conform_downmixes_by_averaging() {
    let st = AudioTrack::new(10, 2, vec![1.0, 0.0, 0.5, 0.5]).unwrap();
    let out = conform(&st, 10, 1).unwrap();
    assert_eq!(out.samples(), &[0.5, 0.5]);
}

#[test]
fn background_choice_is_seeded() {
    let candidates: Vec<PathBuf> = ["a.mp3", "b.mp3", "c.mp3", "d.mp3"]
        .iter()
        .map(PathBuf::from)
        .collect();
    assert_eq!(
        choose_background(&candidates, 42),
        choose_background(&candidates, 42)
    );
    let picks: std::collections::HashSet<_> = (0..32)
        .filter_map(|seed| choose_background(&candidates, seed))
        .collect();
    assert!(picks.len() > 1);
    assert!(choose_background(&[], 1).is_none());
}

#[cfg(feature = "media-ffmpeg")]
#[test]
fn empty_background_dir_keeps_narration() {
    if !crate::assets::media::is_tool_on_path("ffmpeg") {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let narration_path = dir.path().join("narration.wav");
    AudioTrack::new(48_000, 2, vec![0.2; 48_000 * 2])
        .unwrap()
        .write_wav(&narration_path)
        .unwrap();
    let bg_dir = dir.path().join("music");
    std::fs::create_dir(&bg_dir).unwrap();

    let builder = AudioMixBuilder {
        tempo: 1.0,
        tempo_mode: TempoMode::Resample,
        background_gain: DEFAULT_BACKGROUND_GAIN,
        background_dir: Some(bg_dir),
    };
    let out = builder.build(&narration_path, 7).unwrap();
    assert!(out.background.is_none());
    assert_eq!(out.mixed, out.narration);
    assert_eq!(out.mixed.frames(), 48_000);
}
