use std::cell::RefCell;

use super::*;
use crate::assets::catalog::MediaClip;
use crate::caption::animator::animate;
use crate::caption::transcript::WordToken;
use crate::compose::reader::{HeldFrame, SegmentFrames};
use crate::encode::sink::InMemorySink;
use crate::timeline::model::Segment;
use crate::timeline::packer::pack;

/// Solid frames whose red channel encodes the segment position.
struct SolidDecoder {
    opened: RefCell<Vec<usize>>,
}

impl SegmentDecoder for SolidDecoder {
    fn open(
        &self,
        segment: &Segment,
        canvas: Canvas,
        _fps: Fps,
    ) -> StoryreelResult<Box<dyn SegmentFrames>> {
        self.opened.borrow_mut().push(segment.position);
        let px = [segment.position as u8 * 10 + 10, 0, 0, 255];
        Ok(Box::new(HeldFrame {
            frame: px.repeat(canvas.rgba_len() / 4),
        }))
    }
}

fn decoder() -> SolidDecoder {
    SolidDecoder {
        opened: RefCell::new(Vec::new()),
    }
}

fn canvas() -> Canvas {
    Canvas::new(32, 16).unwrap()
}

fn fps() -> Fps {
    Fps::new(10, 1).unwrap()
}

fn pool() -> Vec<MediaClip> {
    vec![
        MediaClip::new("a.mp4", 1.0).unwrap(),
        MediaClip::new("b.mp4", 1.0).unwrap(),
    ]
}

#[test]
fn every_output_frame_is_pushed_in_order() {
    let tl = pack(&pool(), 2.5, 4).unwrap();
    let dec = decoder();
    let mut sink = InMemorySink::new();
    let stats = Compositor::new(canvas(), fps(), &dec)
        .compose(&tl, &[], None, &mut sink)
        .unwrap();

    assert_eq!(stats.frames, 25);
    assert_eq!(stats.segments, 3);
    assert_eq!(*dec.opened.borrow(), [0, 1, 2]);
    assert!(sink.is_finished());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (32, 16));

    let frames = sink.frames();
    assert_eq!(frames.len(), 25);
    for (i, (idx, _)) in frames.iter().enumerate() {
        assert_eq!(idx.0, i as u64);
    }
    assert_eq!(frames[0].1.data[0], 10);
    assert_eq!(frames[10].1.data[0], 20);
    assert_eq!(frames[24].1.data[0], 30);
}

#[test]
fn captions_appear_only_inside_their_window() {
    let tl = pack(&pool(), 2.0, 1).unwrap();
    let words = [WordToken::new("x", 0.5, 1.0).unwrap()];
    let overlay = animate(&words, canvas(), tl.duration_secs(), 0).remove(0);
    let sprite = CaptionSprite {
        width: 32,
        height: 16,
        data: [0, 0, 200, 255].repeat(32 * 16),
    };
    let captions = vec![(overlay, sprite)];

    let dec = decoder();
    let mut sink = InMemorySink::new();
    let stats = Compositor::new(canvas(), fps(), &dec)
        .compose(&tl, &captions, None, &mut sink)
        .unwrap();
    assert_eq!(stats.caption_draws, 5);

    let blue = |i: usize| sink.frames()[i].1.data.chunks_exact(4).any(|px| px[2] == 200);
    assert!(!blue(4));
    // the sprite starts off-canvas and slides in
    assert!(blue(7));
    assert!(blue(9));
    assert!(!blue(10));
}

#[test]
fn empty_timeline_produces_no_frames() {
    let tl = pack(&pool(), 0.0, 1).unwrap();
    let dec = decoder();
    let mut sink = InMemorySink::new();
    let stats = Compositor::new(canvas(), fps(), &dec)
        .compose(&tl, &[], None, &mut sink)
        .unwrap();
    assert_eq!(stats, ComposeStats::default());
    assert!(sink.frames().is_empty());
    assert!(sink.is_finished());
}

#[test]
fn drifting_timeline_is_rejected() {
    let seg = Segment {
        source: crate::timeline::model::SegmentSource::Clip {
            clip: MediaClip::new("a.mp4", 1.0).unwrap(),
        },
        in_secs: 0.0,
        out_secs: 1.0,
        position: 0,
    };
    let tl = Timeline::new(vec![seg], 0, 3.0);
    let dec = decoder();
    let mut sink = InMemorySink::new();
    assert!(
        Compositor::new(canvas(), fps(), &dec)
            .compose(&tl, &[], None, &mut sink)
            .is_err()
    );
}
