use super::*;

#[test]
fn empty_object_gives_defaults() {
    let cfg = PipelineConfig::from_json("{}").unwrap();
    assert_eq!(cfg, PipelineConfig::default());
    assert_eq!(cfg.tempo, 1.35);
    assert_eq!(cfg.background_gain, 0.3);
    assert_eq!(cfg.fps, Fps::new(24, 1).unwrap());
    assert_eq!(cfg.encode.crf, 18);
    assert_eq!(cfg.encode.preset, "fast");
    assert_eq!(cfg.video_dir(), PathBuf::from("assets/video"));
    assert_eq!(cfg.background_dir(), PathBuf::from("assets/audio"));
}

#[test]
fn partial_json_overrides() {
    let cfg = PipelineConfig::from_json(
        r#"{
            "tempo": 1.0,
            "tempo_mode": "resample",
            "canvas": {"width": 720, "height": 1280},
            "encode": {"crf": 23},
            "transcript_timebase": "scaled",
            "transcriber": ["whisper-json", "{audio}"],
            "transcriber_retry": {"max_attempts": 5}
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.tempo_mode, TempoMode::Resample);
    assert_eq!(cfg.canvas, Some(Canvas::new(720, 1280).unwrap()));
    assert_eq!(cfg.encode.crf, 23);
    assert_eq!(cfg.encode.video_codec, "libx264");
    assert_eq!(cfg.transcript_timebase, TranscriptTimebase::Scaled);
    assert_eq!(cfg.transcriber_retry.max_attempts, 5);
    assert_eq!(cfg.transcriber_retry.min_words, 1);
}

#[test]
fn rejects_bad_values() {
    for bad in [
        r#"{"tempo": 0}"#,
        r#"{"tempo": -1.2}"#,
        r#"{"background_gain": -0.5}"#,
        r#"{"fps": {"num": 0, "den": 1}}"#,
        r#"{"canvas": {"width": 721, "height": 1280}}"#,
        r#"{"encode": {"crf": 60}}"#,
        r#"{"transcriber": []}"#,
        r#"{"unknown_key": 1}"#,
        "not json",
    ] {
        assert!(PipelineConfig::from_json(bad).is_err(), "{bad}");
    }
}

#[test]
fn from_path_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("cfg.json");
    std::fs::write(&p, r#"{"captions": false}"#).unwrap();
    assert!(!PipelineConfig::from_path(&p).unwrap().captions);
    assert!(PipelineConfig::from_path(&dir.path().join("missing.json")).is_err());
}
