use super::*;

#[test]
fn parses_flat_array() {
    let words = parse_transcript(
        r#"[{"text":" world ","start":0.5,"end":0.9},{"text":"hello","start":0.0,"end":0.4}]"#,
    )
    .unwrap();
    assert_eq!(words.len(), 2);
    assert_eq!(words[0].text, "hello");
    assert_eq!(words[1].text, "world");
}

#[test]
fn parses_segmented_whisper_shape() {
    let words = parse_transcript(
        r#"{"segments":[
            {"words":[{"text":"one","start":0.0,"end":0.3}]},
            {"text":"ignored","words":[{"word":"two","start":0.3,"end":0.6},{"text":"  ","start":0.6,"end":0.7}]},
            {"id":3}
        ]}"#,
    )
    .unwrap();
    let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(texts, ["one", "two"]);
}

#[test]
fn rejects_reversed_and_garbage() {
    assert!(parse_transcript(r#"[{"text":"x","start":1.0,"end":0.5}]"#).is_err());
    assert!(parse_transcript("not json").is_err());
    assert!(WordToken::new("x", f64::NAN, 1.0).is_err());
}

#[test]
fn overlapping_words_are_pulled_apart() {
    let words = normalize_words(vec![
        WordToken::new("a", 0.0, 1.0).unwrap(),
        WordToken::new("b", 0.8, 1.5).unwrap(),
        WordToken::new("c", 0.9, 1.2).unwrap(),
    ])
    .unwrap();
    for pair in words.windows(2) {
        assert!(pair[1].start >= pair[0].end);
        assert!(pair[1].end >= pair[1].start);
    }
}

#[test]
fn raw_timebase_divides_by_tempo() {
    let words = vec![WordToken::new("a", 1.35, 2.7).unwrap()];
    let scaled = TranscriptTimebase::Raw.apply(words.clone(), 1.35);
    assert!((scaled[0].start - 1.0).abs() < 1e-12);
    assert!((scaled[0].end - 2.0).abs() < 1e-12);
    assert_eq!(TranscriptTimebase::Scaled.apply(words.clone(), 1.35), words);
}

#[test]
fn command_template_substitutes_audio() {
    let t = CommandTranscriber::new(vec![
        "stt".into(),
        "--in={audio}".into(),
        "{audio}".into(),
    ])
    .unwrap();
    assert_eq!(
        t.command_line(Path::new("/tmp/n.wav")),
        ["stt", "--in=/tmp/n.wav", "/tmp/n.wav"]
    );
    assert!(CommandTranscriber::new(vec![]).is_err());
}

#[cfg(unix)]
#[test]
fn command_transcriber_retries_until_words_arrive() {
    let t = CommandTranscriber::new(vec![
        "sh".into(),
        "-c".into(),
        r#"echo '[{"text":"hi","start":0,"end":0.5}]'"#.into(),
    ])
    .unwrap();
    let policy = RetryPolicy {
        max_attempts: 2,
        min_words: 1,
    };
    let out = t.transcribe_with_retry(Path::new("unused.wav"), &policy);
    assert!(out.is_accepted());
    assert_eq!(out.attempts(), 1);

    let empty = CommandTranscriber::new(vec!["sh".into(), "-c".into(), "echo '[]'".into()]).unwrap();
    let out = empty.transcribe_with_retry(Path::new("unused.wav"), &policy);
    assert!(!out.is_accepted());
    assert_eq!(out.attempts(), 2);
    assert_eq!(out.into_value(), Some(vec![]));
}
