use super::*;

#[test]
fn noise_is_bounded_for_wide_inputs() {
    let ts = [-1e9, -1234.5, -1.0, 0.0, 0.001, 1.0, 17.25, 3600.0, 1e12];
    let seeds = [-50.0, 0.0, 1.0, 7.5, 1e6];
    let freqs = [0.0, 0.1, 1.0, 24.0, 1e5];
    for &t in &ts {
        for &s in &seeds {
            for &f in &freqs {
                let a = noise11(t, s, f);
                let b = noise01(t, s, f);
                assert!((-1.0..=1.0).contains(&a), "noise11({t},{s},{f}) = {a}");
                assert!((0.0..=1.0).contains(&b), "noise01({t},{s},{f}) = {b}");
            }
        }
    }
}

#[test]
fn noise_is_pure() {
    for i in 0..200 {
        let t = i as f64 * 0.137;
        assert_eq!(noise11(t, 3.0, 2.0).to_bits(), noise11(t, 3.0, 2.0).to_bits());
        assert_eq!(noise01(t, 9.0, 0.5).to_bits(), noise01(t, 9.0, 0.5).to_bits());
    }
}

#[test]
fn seeds_decorrelate_fields() {
    let differs = (0..50)
        .map(|i| i as f64 * 0.25)
        .filter(|&t| (noise01(t, 1.0, 1.0) - noise01(t, 2.0, 1.0)).abs() > 1e-6)
        .count();
    assert!(differs > 40);
}

#[test]
fn noise_moves_smoothly_over_time() {
    let dt = 1.0 / 240.0;
    for i in 0..500 {
        let t = i as f64 * dt;
        let d = (noise11(t + dt, 4.0, 1.0) - noise11(t, 4.0, 1.0)).abs();
        assert!(d < 0.05, "jump {d} at t={t}");
    }
}

#[test]
fn non_finite_inputs_collapse_to_midpoint() {
    assert_eq!(noise11(f64::NAN, 1.0, 1.0), 0.0);
    assert_eq!(noise11(f64::INFINITY, 1.0, 1.0), 0.0);
    assert_eq!(noise01(f64::NAN, 1.0, 1.0), 0.5);
}

#[test]
fn hash_is_stable_and_bounded() {
    for i in 0..1000u64 {
        let v = hash01(i, 42);
        assert!((0.0..1.0).contains(&v));
        assert_eq!(v.to_bits(), hash01(i, 42).to_bits());
        let w = hash11(i, 42);
        assert!((-1.0..1.0).contains(&w));
    }
    assert_ne!(hash01(1, 1).to_bits(), hash01(1, 2).to_bits());
}
