use super::*;

fn within(v: f64, range: (f64, f64)) -> bool {
    v >= range.0 && v <= range.1
}

#[test]
fn count_is_strictly_monotonic_across_anchor_levels() {
    let lo = intensity_scales(0.0);
    let mid = intensity_scales(50.0);
    let hi = intensity_scales(100.0);
    assert!(lo.count < mid.count);
    assert!(mid.count < hi.count);
    assert!(lo.size < hi.size);
    assert!(lo.alpha < hi.alpha);
}

#[test]
fn endpoints_hit_documented_ranges() {
    let lo = intensity_scales(0.0);
    let hi = intensity_scales(100.0);
    assert!((lo.count - 0.2).abs() < 1e-12);
    assert!((hi.count - 2.2).abs() < 1e-12);
    assert!((lo.size - 0.7).abs() < 1e-12);
    assert!((hi.size - 1.5).abs() < 1e-12);
    assert!((lo.alpha - 0.5).abs() < 1e-12);
    assert!((hi.alpha - 1.0).abs() < 1e-12);
}

#[test]
fn scales_stay_in_range_for_any_input() {
    let mut prev: Option<IntensityScales> = None;
    for i in -1000..=1000 {
        let level = i as f64;
        let s = intensity_scales(level);
        assert!(within(s.count, IntensityScales::COUNT_RANGE));
        assert!(within(s.size, IntensityScales::SIZE_RANGE));
        assert!(within(s.alpha, IntensityScales::ALPHA_RANGE));
        if (0.0..=100.0).contains(&level) {
            if let Some(p) = prev {
                assert!(s.count >= p.count);
                assert!(s.size >= p.size);
                assert!(s.alpha >= p.alpha);
            }
            prev = Some(s);
        }
    }
}

#[test]
fn unusable_levels_fall_back_to_default() {
    let d = intensity_scales(50.0);
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -0.5, 100.5, 1e9] {
        assert_eq!(intensity_scales(bad), d);
        assert_eq!(Intensity::new(bad).level(), Intensity::DEFAULT_LEVEL);
    }
}

#[test]
fn count_of_keeps_layers_alive() {
    let lo = intensity_scales(0.0);
    assert_eq!(lo.count_of(0), 0);
    assert_eq!(lo.count_of(1), 1);
    assert_eq!(lo.count_of(100), 20);
    assert_eq!(intensity_scales(100.0).count_of(100), 220);
}

#[test]
fn intensity_deserializes_with_clamping() {
    let v: Intensity = serde_json::from_str("250").unwrap();
    assert_eq!(v.level(), 50.0);
    let v: Intensity = serde_json::from_str("80").unwrap();
    assert_eq!(v.level(), 80.0);
}
