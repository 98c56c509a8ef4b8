const SEED_PHASE_A: f64 = 12.9898;
const SEED_PHASE_B: f64 = 78.233;
const SECOND_WAVE_FREQ: f64 = 2.137;
const SECOND_WAVE_PHASE: f64 = 1.731;

/// Smooth pseudo-noise in `[-1, 1]` over time `t`.
///
/// Two trigonometric waves with seed-dependent phase offsets are mixed so the result looks
/// non-periodic over practical time ranges. `freq` scales how fast the value moves along `t`.
/// Non-finite intermediate values collapse to `0.0`.
pub fn noise11(t: f64, seed: f64, freq: f64) -> f64 {
    let x = t * freq;
    let a = (x + seed * SEED_PHASE_A).sin();
    let b = (x * SECOND_WAVE_FREQ + seed * SEED_PHASE_B + SECOND_WAVE_PHASE).sin();
    let v = 0.6 * a + 0.4 * b;
    if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 }
}

/// [`noise11`] remapped into `[0, 1]`.
pub fn noise01(t: f64, seed: f64, freq: f64) -> f64 {
    ((noise11(t, seed, freq) + 1.0) * 0.5).clamp(0.0, 1.0)
}

/// Stable per-element constant in `[0, 1)` for element `index` under `salt`.
///
/// Integer mixing (SplitMix64 finalizer) keeps per-element attributes such as spawn position,
/// hue or speed independent of any call order.
pub fn hash01(index: u64, salt: u64) -> f64 {
    let mut z = index
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(salt.wrapping_mul(0xD6E8_FEB8_6659_FD93));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    // 53 bits of precision.
    ((z >> 11) as f64) * (1.0 / ((1u64 << 53) as f64))
}

/// [`hash01`] remapped into `[-1, 1)`.
pub fn hash11(index: u64, salt: u64) -> f64 {
    hash01(index, salt) * 2.0 - 1.0
}

#[cfg(test)]
#[path = "../../tests/unit/noise/field.rs"]
mod tests;
