//! Procedural overlay effects.
//!
//! Every generator is a pure function of `(time, canvas, scales)`: element positions, sizes and
//! colors are derived from the element index and the query time through [`crate::noise`], never
//! from state carried between frames. Seeking to any time therefore reproduces the exact overlay.

pub(crate) mod birds;
pub(crate) mod film;
pub(crate) mod fireworks;
pub(crate) mod galaxy;
pub(crate) mod intensity;
pub(crate) mod rain;
pub(crate) mod smoke;
pub(crate) mod stars;

use crate::foundation::core::Canvas;
use crate::render::plan::DrawList;
use serde::{Deserialize, Serialize};

pub use intensity::{Intensity, IntensityScales, intensity_scales};

/// Which overlay generator runs on top of the clip layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// No overlay.
    #[default]
    None,
    /// Full vintage look: sepia wash, flicker, grain, scratches, dust, light leaks, vignette.
    Film,
    /// Only the film defect marks (grain, scratches, dust) over an untinted image.
    FilmMarks,
    /// Flock of birds crossing the sky.
    Birds,
    /// Rain with atmospheric haze, three depth layers of drops and ground splashes.
    Rain,
    /// Recurring firework shells with launch trails and particle bursts.
    Fireworks,
    /// Twinkling starfield with occasional shooting stars.
    Stars,
    /// Rotating spiral galaxy with nebula glow, background stars and comets.
    Galaxy,
    /// Rising smoke puffs and glowing embers.
    Smoke,
}

impl EffectKind {
    /// Every kind, in declaration order.
    pub const ALL: [EffectKind; 9] = [
        Self::None,
        Self::Film,
        Self::FilmMarks,
        Self::Birds,
        Self::Rain,
        Self::Fireworks,
        Self::Stars,
        Self::Galaxy,
        Self::Smoke,
    ];
}

/// Effect selection plus its strength dial.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    /// Generator to run.
    pub kind: EffectKind,
    /// Strength dial shared by all generators.
    #[serde(default)]
    pub intensity: Intensity,
}

impl EffectConfig {
    /// Build a config from a kind and a raw 0-100 level.
    pub fn new(kind: EffectKind, level: f64) -> Self {
        Self {
            kind,
            intensity: Intensity::new(level),
        }
    }

    /// Record this effect's draw commands for video time `t` into `out`.
    pub fn draw_into(&self, t: f64, out: &mut DrawList) {
        render_effect(self.kind, t, out.canvas(), self.intensity.scales(), out);
    }

    /// Build a fresh display list for video time `t`.
    pub fn draw(&self, t: f64, canvas: Canvas) -> DrawList {
        let mut out = DrawList::new(canvas);
        self.draw_into(t, &mut out);
        out
    }
}

/// Dispatch to the generator for `kind`.
///
/// Non-finite or negative times are treated as `0.0`.
pub fn render_effect(
    kind: EffectKind,
    t: f64,
    canvas: Canvas,
    scales: IntensityScales,
    out: &mut DrawList,
) {
    let t = if t.is_finite() { t.max(0.0) } else { 0.0 };
    match kind {
        EffectKind::None => {}
        EffectKind::Film => film::render(film::FilmLook::Full, t, canvas, scales, out),
        EffectKind::FilmMarks => film::render(film::FilmLook::MarksOnly, t, canvas, scales, out),
        EffectKind::Birds => birds::render(t, canvas, scales, out),
        EffectKind::Rain => rain::render(t, canvas, scales, out),
        EffectKind::Fireworks => fireworks::render(t, canvas, scales, out),
        EffectKind::Stars => stars::render(t, canvas, scales, out),
        EffectKind::Galaxy => galaxy::render(t, canvas, scales, out),
        EffectKind::Smoke => smoke::render(t, canvas, scales, out),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/library.rs"]
mod tests;
