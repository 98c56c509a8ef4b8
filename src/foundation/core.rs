pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Width used when a requested width is unusable.
    pub const DEFAULT_WIDTH: u32 = 1280;
    /// Height used when a requested height is unusable.
    pub const DEFAULT_HEIGHT: u32 = 720;
    /// Largest accepted side length.
    pub const MAX_SIDE: u32 = 8192;

    /// Build a canvas from untrusted numbers.
    ///
    /// Non-finite, non-positive or oversized sides fall back to the 1280x720 default for that
    /// side; fractional sizes are rounded.
    pub fn sanitized(width: f64, height: f64) -> Self {
        fn side(v: f64, default: u32) -> u32 {
            if !v.is_finite() || v < 1.0 || v > f64::from(Canvas::MAX_SIDE) {
                return default;
            }
            v.round() as u32
        }
        Self {
            width: side(width, Self::DEFAULT_WIDTH),
            height: side(height, Self::DEFAULT_HEIGHT),
        }
    }

    /// Same rules as [`Canvas::sanitized`] applied to an already-built canvas.
    pub fn sanitize(self) -> Self {
        Self::sanitized(f64::from(self.width), f64::from(self.height))
    }

    /// Width as `f64`.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// Full canvas rectangle in pixel space.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.w(), self.h())
    }

    /// Canvas center point.
    pub fn center(self) -> Point {
        Point::new(self.w() * 0.5, self.h() * 0.5)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

/// Straight-alpha RGBA8 paint color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha set from a `[0, 1]` fraction.
    pub fn with_alpha(self, alpha: f64) -> Self {
        let a = if alpha.is_finite() {
            (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
        } else {
            0
        };
        Self { a, ..self }
    }

    /// Same color with its current alpha scaled by `k`.
    pub fn fade(self, k: f64) -> Self {
        self.with_alpha(f64::from(self.a) / 255.0 * k)
    }

    /// Linear per-channel mix towards `other` by `t` in `[0, 1]`.
    pub fn mix(self, other: Self, t: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let ch = |a: u8, b: u8| -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
        };
        Self {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
            a: ch(self.a, other.a),
        }
    }

    /// Return `true` when the color contributes nothing.
    pub fn is_invisible(self) -> bool {
        self.a == 0
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }
}

impl From<Rgba8> for Rgba8Premul {
    fn from(c: Rgba8) -> Self {
        Self::from_straight_rgba(c.r, c.g, c.b, c.a)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
