use super::*;

#[test]
fn fnv_is_stable() {
    let mut h = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    h.write_bytes(b"a");
    assert_eq!(h.finish(), 0xaf63_dc4c_8601_ec8c);
}

#[test]
fn src_over_transparent_is_noop() {
    let mut dst = [10u8, 20, 30, 255];
    src_over_premul(&mut dst, &[0, 0, 0, 0]);
    assert_eq!(dst, [10, 20, 30, 255]);
}

#[test]
fn src_over_opaque_replaces() {
    let mut dst = [10u8, 20, 30, 255];
    src_over_premul(&mut dst, &[200, 100, 50, 255]);
    assert_eq!(dst, [200, 100, 50, 255]);
}

#[test]
fn src_over_half_alpha_blends() {
    let mut dst = [0u8, 0, 255, 255];
    // 50% white, premultiplied.
    src_over_premul(&mut dst, &[128, 128, 128, 128]);
    assert_eq!(dst[0], 128);
    assert_eq!(dst[2], 128 + 127);
    assert_eq!(dst[3], 255);
}
