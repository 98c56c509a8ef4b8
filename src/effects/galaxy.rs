use crate::effects::intensity::IntensityScales;
use crate::foundation::core::{Canvas, Point, Rgba8, Vec2};
use crate::foundation::math::fract;
use crate::noise::{hash01, hash11, noise01, noise11};
use crate::render::plan::DrawList;
use std::f64::consts::TAU;

const CORE: Rgba8 = Rgba8::rgb(255, 214, 170);
const ARM_EDGE: Rgba8 = Rgba8::rgb(140, 170, 255);
const NEBULA_VIOLET: Rgba8 = Rgba8::rgb(140, 80, 200);
const NEBULA_BLUE: Rgba8 = Rgba8::rgb(60, 110, 220);
const COMET: Rgba8 = Rgba8::rgb(220, 240, 255);

const ARMS: u64 = 3;
const TWIST: f64 = 1.25;
const TILT: f64 = 0.55;
const SPIN: f64 = 0.06;
const ARM_SALT: u64 = 0x6172_6d00;
const BG_SALT: u64 = 0x6267_0000;
const COMET_SALT: u64 = 0x636f_6d00;
const COMET_PERIOD: f64 = 7.0;

pub(crate) fn render(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    let center = canvas.center()
        + Vec2::new(
            noise11(t, 21.0, 0.05) * canvas.w() * 0.02,
            noise11(t, 22.0, 0.05) * canvas.h() * 0.02,
        );
    let rmax = canvas.w().min(canvas.h()) * 0.48;
    let rotation = t * SPIN;

    background(t, canvas, s, out);
    nebula(center, rmax, rotation, s, out);
    arms(center, rmax, rotation, t, s, out);
    comets(t, canvas, s, out);
}

fn background(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    for i in 0..s.count_of(90) as u64 {
        let c = Point::new(
            hash01(i, BG_SALT) * canvas.w(),
            hash01(i, BG_SALT + 1) * canvas.h(),
        );
        let a = s.alpha_of(0.25 + 0.45 * noise01(t, 300.0 + i as f64, 1.2));
        out.circle(c, s.size_of(0.6), Rgba8::WHITE.with_alpha(a));
    }
}

fn nebula(center: Point, rmax: f64, rotation: f64, s: IntensityScales, out: &mut DrawList) {
    let off = Vec2::new(rotation.cos(), rotation.sin() * TILT) * rmax * 0.25;
    out.glow(center + off, rmax * 0.95, NEBULA_VIOLET.with_alpha(s.alpha_of(0.18)));
    out.glow(center - off, rmax * 0.8, NEBULA_BLUE.with_alpha(s.alpha_of(0.14)));
    out.glow(center, rmax * 0.35, CORE.with_alpha(s.alpha_of(0.45)));
}

fn arms(center: Point, rmax: f64, rotation: f64, t: f64, s: IntensityScales, out: &mut DrawList) {
    let n = s.count_of(110);
    for arm in 0..ARMS {
        let salt = ARM_SALT + arm * 0x100;
        let base_angle = arm as f64 * TAU / ARMS as f64;
        for j in 0..n as u64 {
            let u = (j as f64 + 0.5) / n as f64;
            let r = rmax * u.powf(0.85) + hash11(j, salt) * rmax * 0.04;
            // Inner stars orbit faster than the rim.
            let theta = base_angle
                + u * TAU * TWIST
                + rotation * (1.4 - 0.6 * u)
                + hash11(j, salt.wrapping_add(1)) * 0.35 * (1.0 - 0.5 * u);
            let p = center + Vec2::new(theta.cos() * r, theta.sin() * r * TILT);
            let color = CORE.mix(ARM_EDGE, u);
            let radius = s.size_of(0.6 + 1.4 * hash01(j, salt.wrapping_add(2)) * (1.0 - 0.5 * u));
            let a = s.alpha_of(0.9 - 0.5 * u) * (0.6 + 0.4 * noise01(t, j as f64 + arm as f64 * 0.5, 0.8));
            out.circle(p, radius, color.with_alpha(a));
        }
    }
}

fn comets(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    for c in 0..2u64 {
        let offset = hash01(c, COMET_SALT) * COMET_PERIOD;
        let pos = (t + offset) / COMET_PERIOD;
        let cycle = pos.floor().max(0.0) as u64;
        let u = fract(pos);
        let key = c.wrapping_mul(131).wrapping_add(cycle);
        let from = Point::new(
            -0.1 * canvas.w(),
            canvas.h() * (0.1 + 0.5 * hash01(key, COMET_SALT + 1)),
        );
        let to = Point::new(
            1.1 * canvas.w(),
            canvas.h() * (0.3 + 0.6 * hash01(key, COMET_SALT + 2)),
        );
        let dir = (to - from).normalize();
        let head = from.lerp(to, u);
        for k in 0..8 {
            let back = f64::from(k) * s.size_of(7.0);
            let fall = 1.0 - f64::from(k) / 8.0;
            out.circle(
                head - dir * back,
                s.size_of(2.4) * fall,
                COMET.with_alpha(s.alpha_of(0.85) * fall * fall),
            );
        }
    }
}
