use super::*;

#[test]
fn endpoints_are_fixed() {
    assert_eq!(out_quad(0.0), 0.0);
    assert_eq!(out_quad(1.0), 1.0);
    assert_eq!(out_quad(-3.0), 0.0);
    assert_eq!(out_quad(7.0), 1.0);
    assert_eq!(out_quad(f64::NAN), 1.0);
}

#[test]
fn out_quad_front_loads_motion() {
    assert_eq!(out_quad(0.5), 0.75);
    assert!(out_quad(0.25) > 0.25);
}

#[test]
fn window_progress_clamps_and_handles_empty_windows() {
    assert_eq!(window_progress(1.5, 1.0, 2.0), 0.5);
    assert_eq!(window_progress(0.0, 1.0, 2.0), 0.0);
    assert_eq!(window_progress(9.0, 1.0, 2.0), 1.0);
    assert_eq!(window_progress(0.0, 2.0, 2.0), 1.0);
}
