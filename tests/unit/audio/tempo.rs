use super::*;

#[test]
fn atempo_chain_stays_within_filter_bounds() {
    assert_eq!(atempo_chain(1.35).unwrap(), "atempo=1.350000");
    assert_eq!(atempo_chain(3.0).unwrap(), "atempo=2.000000,atempo=1.500000");
    assert_eq!(atempo_chain(0.25).unwrap(), "atempo=0.500000,atempo=0.500000");
    assert!(atempo_chain(0.0).is_err());
    assert!(atempo_chain(f64::NAN).is_err());
}

#[test]
fn resample_shortens_by_factor() {
    let track = AudioTrack::new(1000, 2, vec![0.1; 2700 * 2]).unwrap();
    let fast = resample_tempo(&track, 1.35).unwrap();
    assert_eq!(fast.frames(), 2000);
    assert_eq!(fast.sample_rate(), 1000);
    assert_eq!(fast.channels(), 2);
    assert!(fast.samples().iter().all(|s| (s - 0.1).abs() < 1e-6));
}

#[test]
fn resample_interpolates_between_frames() {
    let ramp: Vec<f32> = (0..8).map(|i| i as f32).collect();
    let track = AudioTrack::new(8, 1, ramp).unwrap();
    let half = resample_tempo(&track, 0.5).unwrap();
    assert_eq!(half.frames(), 16);
    assert_eq!(half.samples()[1], 0.5);
    assert_eq!(half.samples()[2], 1.0);
}

#[test]
fn unit_factor_is_identity() {
    let track = AudioTrack::new(10, 1, vec![0.3, 0.4]).unwrap();
    assert_eq!(resample_tempo(&track, 1.0).unwrap(), track);
}
