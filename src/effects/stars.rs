use crate::effects::intensity::IntensityScales;
use crate::foundation::core::{Canvas, Point, Rect, Rgba8, Vec2};
use crate::noise::{hash01, noise01};
use crate::render::plan::{DrawList, GradientAxis};
use std::f64::consts::PI;

const NIGHT: Rgba8 = Rgba8::rgb(5, 8, 26);
const WARM: Rgba8 = Rgba8::rgb(255, 236, 200);
const COOL: Rgba8 = Rgba8::rgb(200, 220, 255);
const STAR_SALT: u64 = 0x7374_6172;
const METEOR_SALT: u64 = 0x6d65_7465;
const METEOR_PERIOD: f64 = 5.0;
const METEOR_SECS: f64 = 0.8;

pub(crate) fn render(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    out.gradient(
        Rect::new(0.0, 0.0, canvas.w(), canvas.h() * 0.7),
        NIGHT.with_alpha(s.alpha_of(0.45)),
        NIGHT.with_alpha(0.0),
        GradientAxis::Vertical,
    );
    field(t, canvas, s, out);
    shooting_star(t, canvas, s, out);
}

fn field(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    for i in 0..s.count_of(160) as u64 {
        let c = Point::new(
            hash01(i, STAR_SALT) * canvas.w(),
            hash01(i, STAR_SALT + 1) * canvas.h(),
        );
        let mag = hash01(i, STAR_SALT + 2);
        let r = s.size_of(0.5 + 1.3 * mag * mag);
        let rate = 1.0 + 2.0 * hash01(i, STAR_SALT + 3);
        let twinkle = 0.35 + 0.65 * noise01(t, i as f64 * 1.37, rate);
        let color = WARM.mix(COOL, hash01(i, STAR_SALT + 4));
        let a = s.alpha_of(twinkle);
        if mag > 0.92 {
            out.glow(c, r * 4.0, color.with_alpha(a * 0.3));
        }
        out.circle(c, r, color.with_alpha(a));
    }
}

fn shooting_star(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    let k = (t / METEOR_PERIOD).floor().max(0.0);
    let local = t - k * METEOR_PERIOD;
    if local >= METEOR_SECS {
        return;
    }
    let k = k as u64;
    let start = Point::new(
        canvas.w() * (0.3 + 0.7 * hash01(k, METEOR_SALT)),
        canvas.h() * 0.35 * hash01(k, METEOR_SALT + 1),
    );
    let dir = Vec2::new(-0.85, 0.53);
    let speed = canvas.w() * 0.9;
    let head = start + dir * (speed * local);
    let tail = head - dir * s.size_of(80.0);
    let a = s.alpha_of(0.9) * (PI * local / METEOR_SECS).sin();
    out.line(tail, head, s.size_of(1.5), Rgba8::WHITE.with_alpha(a * 0.6));
    out.circle(head, s.size_of(1.8), Rgba8::WHITE.with_alpha(a));
}
