use crate::effects::intensity::IntensityScales;
use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::math::fract;
use crate::noise::{hash01, noise01, noise11};
use crate::render::plan::{DrawList, GradientAxis};
use std::f64::consts::{PI, TAU};

const HEAT: Rgba8 = Rgba8::rgb(120, 50, 12);
const SMOKE: Rgba8 = Rgba8::rgb(150, 150, 156);
const EMBER_HOT: Rgba8 = Rgba8::rgb(255, 190, 80);
const EMBER_COOL: Rgba8 = Rgba8::rgb(200, 40, 10);
const PUFF_SALT: u64 = 0x7075_6666;
const EMBER_SALT: u64 = 0x656d_6265;

pub(crate) fn render(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    let h = canvas.h();
    out.gradient(
        Rect::new(0.0, h * 0.75, canvas.w(), h),
        HEAT.with_alpha(0.0),
        HEAT.with_alpha(s.alpha_of(0.22)),
        GradientAxis::Vertical,
    );
    puffs(t, canvas, s, out);
    embers(t, canvas, s, out);
}

/// Normalized age in `[0, 1)` of a recurring particle with lifetime `life`.
fn cycle_age(t: f64, life: f64, offset: f64) -> f64 {
    fract(t / life + offset)
}

fn puffs(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    let (w, h) = (canvas.w(), canvas.h());
    let wind = noise11(t, 31.0, 0.1);
    for i in 0..s.count_of(10) as u64 {
        let life = 5.0 + 3.0 * hash01(i, PUFF_SALT);
        let age = cycle_age(t, life, hash01(i, PUFF_SALT + 1));
        let x = w * (0.1 + 0.8 * hash01(i, PUFF_SALT + 2))
            + noise11(t, 40.0 + i as f64, 0.35) * w * 0.06
            + age * w * 0.05 * wind;
        let y = h * (1.05 - 0.9 * age);
        let r = s.size_of(40.0 + 120.0 * age);
        let a = s.alpha_of(0.22) * (PI * age).sin();
        out.glow(Point::new(x, y), r, SMOKE.with_alpha(a));
    }
}

fn embers(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    let (w, h) = (canvas.w(), canvas.h());
    for i in 0..s.count_of(40) as u64 {
        let life = 2.5 + 2.0 * hash01(i, EMBER_SALT);
        let age = cycle_age(t, life, hash01(i, EMBER_SALT + 1));
        let sway = (t * 2.0 + hash01(i, EMBER_SALT + 2) * TAU).sin() * 15.0;
        let x = w * hash01(i, EMBER_SALT + 3) + sway + noise11(t, 90.0 + i as f64, 0.6) * 20.0;
        let y = h - age * h * 0.75;
        let r = s.size_of(1.2 + 1.5 * hash01(i, EMBER_SALT + 4)) * (1.0 - 0.5 * age);
        let flick = 0.6 + 0.4 * noise01(t * 8.0, i as f64, 1.0);
        let a = s.alpha_of(0.9) * (1.0 - age) * flick;
        let color = EMBER_HOT.mix(EMBER_COOL, age);
        let c = Point::new(x, y);
        out.glow(c, r * 4.0, color.with_alpha(a * 0.25));
        out.circle(c, r, color.with_alpha(a));
    }
}
