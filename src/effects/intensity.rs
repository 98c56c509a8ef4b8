use serde::{Deserialize, Serialize};

/// A user-facing effect strength dial in `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Intensity(f64);

impl Intensity {
    /// Level used whenever an input is unusable.
    pub const DEFAULT_LEVEL: f64 = 50.0;
    /// Smallest accepted level.
    pub const MIN_LEVEL: f64 = 0.0;
    /// Largest accepted level.
    pub const MAX_LEVEL: f64 = 100.0;

    /// Build an intensity from an untrusted level.
    ///
    /// Non-finite or out-of-range inputs fall back to [`Intensity::DEFAULT_LEVEL`].
    pub fn new(level: f64) -> Self {
        if level.is_finite() && (Self::MIN_LEVEL..=Self::MAX_LEVEL).contains(&level) {
            Self(level)
        } else {
            Self(Self::DEFAULT_LEVEL)
        }
    }

    /// The sanitized level.
    pub fn level(self) -> f64 {
        self.0
    }

    /// Per-effect multipliers for this level.
    pub fn scales(self) -> IntensityScales {
        let k = self.0 / Self::MAX_LEVEL;
        IntensityScales {
            count: IntensityScales::COUNT_RANGE.0
                + (IntensityScales::COUNT_RANGE.1 - IntensityScales::COUNT_RANGE.0) * k,
            size: IntensityScales::SIZE_RANGE.0
                + (IntensityScales::SIZE_RANGE.1 - IntensityScales::SIZE_RANGE.0) * k,
            alpha: IntensityScales::ALPHA_RANGE.0
                + (IntensityScales::ALPHA_RANGE.1 - IntensityScales::ALPHA_RANGE.0) * k,
        }
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(Self::DEFAULT_LEVEL)
    }
}

impl From<f64> for Intensity {
    fn from(level: f64) -> Self {
        Self::new(level)
    }
}

impl From<Intensity> for f64 {
    fn from(v: Intensity) -> Self {
        v.0
    }
}

/// Multipliers every effect generator applies to its element counts, sizes and opacities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntensityScales {
    /// Element count multiplier in `[0.2, 2.2]`.
    pub count: f64,
    /// Element size multiplier in `[0.7, 1.5]`.
    pub size: f64,
    /// Opacity multiplier in `[0.5, 1.0]`.
    pub alpha: f64,
}

impl IntensityScales {
    /// Closed range of [`IntensityScales::count`].
    pub const COUNT_RANGE: (f64, f64) = (0.2, 2.2);
    /// Closed range of [`IntensityScales::size`].
    pub const SIZE_RANGE: (f64, f64) = (0.7, 1.5);
    /// Closed range of [`IntensityScales::alpha`].
    pub const ALPHA_RANGE: (f64, f64) = (0.5, 1.0);

    /// Scale a base element count, never dropping a non-empty layer to zero.
    pub fn count_of(self, base: usize) -> usize {
        if base == 0 {
            return 0;
        }
        ((base as f64) * self.count).round().max(1.0) as usize
    }

    /// Scale a base size in pixels.
    pub fn size_of(self, base: f64) -> f64 {
        base * self.size
    }

    /// Scale a base opacity, clamped into `[0, 1]`.
    pub fn alpha_of(self, base: f64) -> f64 {
        (base * self.alpha).clamp(0.0, 1.0)
    }
}

/// Map a raw 0-100 level to per-effect multipliers.
pub fn intensity_scales(level: f64) -> IntensityScales {
    Intensity::new(level).scales()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/intensity.rs"]
mod tests;
