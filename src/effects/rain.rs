use crate::effects::intensity::IntensityScales;
use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::math::fract;
use crate::noise::{hash01, noise01, noise11};
use crate::render::plan::{DrawList, GradientAxis};
use kurbo::{Ellipse, Shape};
use std::f64::consts::PI;

const HAZE_TOP: Rgba8 = Rgba8::rgb(70, 80, 96);
const HAZE_BOTTOM: Rgba8 = Rgba8::rgb(38, 44, 56);
const DIM: Rgba8 = Rgba8::rgb(18, 24, 34);
const DROP: Rgba8 = Rgba8::rgb(190, 202, 218);
const SPLASH: Rgba8 = Rgba8::rgb(205, 214, 226);

const SPLASH_SALT: u64 = 0x7370_6c61;

struct DepthLayer {
    salt: u64,
    base_count: usize,
    // Fall speed as a fraction of canvas height per second.
    speed: f64,
    len: f64,
    width: f64,
    alpha: f64,
}

const LAYERS: [DepthLayer; 3] = [
    DepthLayer {
        salt: 0x0100,
        base_count: 120,
        speed: 0.9,
        len: 10.0,
        width: 1.0,
        alpha: 0.25,
    },
    DepthLayer {
        salt: 0x0200,
        base_count: 80,
        speed: 1.4,
        len: 18.0,
        width: 1.3,
        alpha: 0.40,
    },
    DepthLayer {
        salt: 0x0300,
        base_count: 40,
        speed: 2.2,
        len: 30.0,
        width: 2.0,
        alpha: 0.60,
    },
];

pub(crate) fn render(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    atmosphere(t, canvas, s, out);
    let wind = 0.18 + 0.08 * noise11(t, 5.0, 0.2);
    for layer in &LAYERS {
        drops(layer, wind, t, canvas, s, out);
    }
    splashes(t, canvas, s, out);
}

fn atmosphere(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    out.wash(DIM.with_alpha(s.alpha_of(0.12)));
    out.gradient(
        Rect::new(0.0, 0.0, canvas.w(), canvas.h()),
        HAZE_TOP.with_alpha(s.alpha_of(0.35)),
        HAZE_BOTTOM.with_alpha(s.alpha_of(0.12)),
        GradientAxis::Vertical,
    );
    // Rare distant lightning.
    let flash = noise01(t, 91.0, 0.5);
    if flash > 0.96 {
        out.wash(Rgba8::WHITE.with_alpha(s.alpha_of(0.25) * (flash - 0.96) / 0.04));
    }
}

fn drops(
    layer: &DepthLayer,
    wind: f64,
    t: f64,
    canvas: Canvas,
    s: IntensityScales,
    out: &mut DrawList,
) {
    let (w, h) = (canvas.w(), canvas.h());
    let len = s.size_of(layer.len);
    let travel = h + len;
    let color = DROP.with_alpha(s.alpha_of(layer.alpha));
    for i in 0..s.count_of(layer.base_count) as u64 {
        // Spawn band is wider than the canvas so slanted drops still cover the left edge.
        let x0 = hash01(i, layer.salt) * (w + h * 0.3) - h * 0.3;
        let phase = hash01(i, layer.salt + 1);
        let y = fract(phase + t * layer.speed * h / travel) * travel - len;
        let x = x0 + wind * (y + len);
        out.line(
            Point::new(x, y),
            Point::new(x + wind * len, y + len),
            s.size_of(layer.width),
            color,
        );
    }
}

fn splashes(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    let (w, h) = (canvas.w(), canvas.h());
    for i in 0..s.count_of(24) as u64 {
        let period = 0.6 + 0.5 * hash01(i, SPLASH_SALT);
        let cycle_pos = t / period + hash01(i, SPLASH_SALT + 1);
        let cycle = cycle_pos.floor().max(0.0) as u64;
        let age = fract(cycle_pos);
        // Land somewhere new every cycle.
        let x = hash01(i ^ cycle.wrapping_mul(0x9E37), SPLASH_SALT + 2) * w;
        let y = h * (0.88 + 0.10 * hash01(i, SPLASH_SALT + 3));
        let r = s.size_of(2.0 + 6.0 * age);
        let color = SPLASH.with_alpha(s.alpha_of(0.45) * (1.0 - age));

        let ring = Ellipse::new(Point::new(x, y), (r * 1.6, r * 0.45), 0.0).to_path(0.1);
        out.path(ring, color.fade(0.5));
        for k in 0..3 {
            let angle = -PI * (0.25 + 0.25 * f64::from(k));
            let reach = r * 1.5;
            let lift = (age * PI).sin() * r;
            let c = Point::new(x + angle.cos() * reach, y + angle.sin() * lift);
            out.circle(c, s.size_of(0.9), color);
        }
    }
}
