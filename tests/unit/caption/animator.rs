use super::*;
use crate::caption::style::StyleKind;

fn words(n: usize) -> Vec<WordToken> {
    (0..n)
        .map(|i| WordToken::new(format!("w{i}"), i as f64 * 0.5, i as f64 * 0.5 + 0.4).unwrap())
        .collect()
}

fn canvas() -> Canvas {
    Canvas::new(720, 1280).unwrap()
}

#[test]
fn words_past_video_end_are_dropped() {
    let ws = words(10);
    // word 5 ends at 2.9, word 6 at 3.4
    let out = animate(&ws, canvas(), 3.0, 1);
    assert_eq!(out.len(), 6);
    assert!(out.iter().all(|o| o.window.end <= 3.0));

    let exact = animate(&ws, canvas(), 2.9, 1);
    assert_eq!(exact.len(), 6);
}

#[test]
fn styles_follow_eligible_indices() {
    let mut ws = words(9);
    ws.insert(0, WordToken::new("late", 0.0, 100.0).unwrap());
    let out = animate(&ws, canvas(), 10.0, 3);
    assert_eq!(out.len(), 9);
    assert_eq!(out[0].word, "w0");
    assert_eq!(out[0].style.kind, StyleKind::Emphasis);
    assert_eq!(out[4].style.kind, StyleKind::Highlight);
    assert_eq!(out[7].style.kind, StyleKind::Emphasis);
    assert_eq!(out[8].style.kind, StyleKind::Highlight);
    for (i, o) in out.iter().enumerate() {
        assert_eq!(o.index, i);
    }
}

#[test]
fn presets_are_seeded() {
    let ws = words(40);
    let a: Vec<_> = animate(&ws, canvas(), 100.0, 11).iter().map(|o| o.preset).collect();
    let b: Vec<_> = animate(&ws, canvas(), 100.0, 11).iter().map(|o| o.preset).collect();
    assert_eq!(a, b);
    let kinds: std::collections::HashSet<_> = a.iter().collect();
    assert_eq!(kinds.len(), 3);
}

#[test]
fn overlays_end_at_anchor_and_window_is_half_open() {
    let out = animate(&words(3), canvas(), 10.0, 5);
    for o in &out {
        assert_eq!(o.position_at(o.window.end), Point::new(360.0, 0.85 * 1280.0));
        assert!(o.is_active(o.window.start));
        assert!(!o.is_active(o.window.end));
    }
    let active: Vec<_> = out.iter().filter(|o| o.is_active(0.6)).map(|o| o.index).collect();
    assert_eq!(active, [1]);
}

#[test]
fn no_words_no_overlays() {
    assert!(animate(&[], canvas(), 10.0, 0).is_empty());
}
