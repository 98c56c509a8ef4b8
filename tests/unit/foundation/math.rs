use super::*;

#[test]
fn fnv_hash_is_chunking_independent() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"reel");
    let mut b = Fnv1a64::new_default();
    b.write_bytes(b"re");
    b.write_bytes(b"el");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn fract_wraps_negative_inputs() {
    assert!((fract(2.25) - 0.25).abs() < 1e-12);
    assert!((fract(-0.25) - 0.75).abs() < 1e-12);
}

#[test]
fn smoothstep_is_clamped() {
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-12);
    assert!((lerp(2.0, 4.0, 0.25) - 2.5).abs() < 1e-12);
}
