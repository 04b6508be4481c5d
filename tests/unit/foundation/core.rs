use super::*;

#[test]
fn fps_validation_and_frame_time() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(24, 0).is_err());

    let fps = Fps::new(24, 1).unwrap();
    assert!((fps.frame_to_secs(FrameIndex(12)) - 0.5).abs() < 1e-12);
    assert_eq!(fps.secs_to_frames_round(10.0), 240);
    assert_eq!(fps.secs_to_frames_round(0.02), 0);
    assert_eq!(fps.secs_to_frames_round(0.03), 1);
}

#[test]
fn ntsc_fps_frame_duration() {
    let fps = Fps::new(30_000, 1001).unwrap();
    assert!((fps.frame_duration_secs() - 1001.0 / 30_000.0).abs() < 1e-12);
}

#[test]
fn canvas_requires_even_dimensions() {
    assert!(Canvas::new(1080, 1920).is_ok());
    assert!(Canvas::new(1081, 1920).is_err());
    assert!(Canvas::new(0, 2).is_err());
    assert_eq!(
        Canvas::even_floor(1281, 721).unwrap(),
        Canvas {
            width: 1280,
            height: 720
        }
    );
}

#[test]
fn hex_colors_parse() {
    assert_eq!(Rgba8::from_hex("#FFD700").unwrap(), Rgba8::opaque(255, 215, 0));
    assert_eq!(
        Rgba8::from_hex("#00000080").unwrap(),
        Rgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 128
        }
    );
    assert!(Rgba8::from_hex("FFD700").is_err());
    assert!(Rgba8::from_hex("#FFD7").is_err());
    assert!(Rgba8::from_hex("#GGGGGG").is_err());
}

#[test]
fn premul_scales_by_alpha() {
    let c = Rgba8 {
        r: 255,
        g: 128,
        b: 0,
        a: 128,
    };
    assert_eq!(c.premul(), [128, 64, 0, 128]);
    assert_eq!(Rgba8::opaque(1, 2, 3).premul(), [1, 2, 3, 255]);
}
