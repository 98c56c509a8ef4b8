use crate::effects::intensity::IntensityScales;
use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::math::smoothstep;
use crate::noise::{hash01, hash11, noise01, noise11};
use crate::render::plan::{DrawList, GradientAxis};

// Defects jump at projector frame rate regardless of the output fps.
const FILM_FPS: f64 = 24.0;

const SEPIA: Rgba8 = Rgba8::rgb(112, 66, 20);
const SCRATCH_LIGHT: Rgba8 = Rgba8::rgb(236, 230, 214);
const SCRATCH_DARK: Rgba8 = Rgba8::rgb(28, 22, 16);
const DUST: Rgba8 = Rgba8::rgb(18, 14, 10);
const LEAK: Rgba8 = Rgba8::rgb(255, 138, 58);

const GRAIN_SALT: u64 = 0x6772_6169_6e00;
const SCRATCH_SALT: u64 = 0x7363_7261_7400;
const DUST_SALT: u64 = 0x6475_7374_0000;
const LEAK_SALT: u64 = 0x6c65_616b_0000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FilmLook {
    Full,
    MarksOnly,
}

pub(crate) fn render(look: FilmLook, t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    let frame = (t * FILM_FPS).floor().max(0.0) as u64;
    if look == FilmLook::Full {
        out.wash(SEPIA.with_alpha(s.alpha_of(0.16)));
        flicker(frame, s, out);
    }
    grain(frame, canvas, s, out);
    scratches(t, frame, canvas, s, out);
    dust(frame, canvas, s, out);
    if look == FilmLook::Full {
        light_leak(t, canvas, s, out);
        vignette(canvas, s, out);
    }
}

fn flicker(frame: u64, s: IntensityScales, out: &mut DrawList) {
    let v = noise11(frame as f64, 3.0, 0.9);
    let color = if v > 0.0 {
        Rgba8::WHITE
    } else {
        Rgba8::BLACK
    };
    out.wash(color.with_alpha(s.alpha_of(0.10) * v.abs()));
}

fn grain(frame: u64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    let salt = GRAIN_SALT ^ frame.wrapping_mul(0x2545_F491_4F6C_DD1D);
    for i in 0..s.count_of(320) as u64 {
        let x = hash01(i, salt) * canvas.w();
        let y = hash01(i, salt.wrapping_add(1)) * canvas.h();
        let side = s.size_of(1.0 + 1.5 * hash01(i, salt.wrapping_add(2)));
        let tone = if hash01(i, salt.wrapping_add(3)) > 0.5 {
            Rgba8::WHITE
        } else {
            Rgba8::BLACK
        };
        let a = s.alpha_of(0.08 + 0.22 * hash01(i, salt.wrapping_add(4)));
        out.rect(Rect::new(x, y, x + side, y + side), tone.with_alpha(a));
    }
}

fn scratches(t: f64, frame: u64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    for i in 0..s.count_of(4) as u64 {
        // Each scratch lives for a while, disappears, then comes back elsewhere.
        let presence = noise01(t, 40.0 + i as f64, 1.3);
        if presence < 0.55 {
            continue;
        }
        let drift = 0.04 * noise11(t, 60.0 + i as f64, 0.7);
        let jitter = hash11(i, SCRATCH_SALT ^ frame) * 1.5;
        let x = (hash01(i, SCRATCH_SALT) + drift) * canvas.w() + jitter;
        let slant = hash11(i, SCRATCH_SALT + 1) * 6.0;
        let top = canvas.h() * 0.3 * hash01(i, SCRATCH_SALT + 2);
        let width = s.size_of(0.8 + hash01(i, SCRATCH_SALT + 3));
        let base = if hash01(i, SCRATCH_SALT + 4) > 0.3 {
            SCRATCH_LIGHT
        } else {
            SCRATCH_DARK
        };
        let fade = smoothstep(0.55, 0.65, presence);
        let a = s.alpha_of(0.30 + 0.35 * noise01(frame as f64, i as f64, 1.0)) * fade;
        out.line(
            Point::new(x, top),
            Point::new(x + slant, canvas.h()),
            width,
            base.with_alpha(a),
        );
    }
}

fn dust(frame: u64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    let salt = DUST_SALT ^ frame.wrapping_mul(0x9E37_79B9);
    for i in 0..s.count_of(14) as u64 {
        if hash01(i, salt) > 0.35 {
            continue;
        }
        let c = Point::new(
            hash01(i, salt.wrapping_add(1)) * canvas.w(),
            hash01(i, salt.wrapping_add(2)) * canvas.h(),
        );
        let r = s.size_of(0.8 + 2.4 * hash01(i, salt.wrapping_add(3)));
        out.circle(c, r, DUST.with_alpha(s.alpha_of(0.55)));
    }
}

fn light_leak(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    // Stronger dials make leaks more likely: the trigger threshold drops with the count scale.
    let span = IntensityScales::COUNT_RANGE.1;
    let threshold = 0.92 - 0.25 * (s.count / span);
    let n = noise01(t, 77.0, 0.23);
    let strength = smoothstep(threshold, threshold + 0.08, n);
    if strength <= 0.0 {
        return;
    }
    let epoch = (t / 4.0).floor().max(0.0) as u64;
    let side = if hash01(epoch, LEAK_SALT) > 0.5 {
        canvas.w()
    } else {
        0.0
    };
    let cy = canvas.h() * (0.2 + 0.6 * hash01(epoch, LEAK_SALT + 1));
    let radius = canvas.w().max(canvas.h()) * 0.55 * s.size;
    out.glow(
        Point::new(side, cy),
        radius,
        LEAK.with_alpha(s.alpha_of(0.40) * strength),
    );
}

fn vignette(canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    let (w, h) = (canvas.w(), canvas.h());
    let edge = Rgba8::BLACK.with_alpha(s.alpha_of(0.55));
    let clear = Rgba8::BLACK.with_alpha(0.0);
    let bh = h * 0.18;
    let bw = w * 0.14;
    out.gradient(Rect::new(0.0, 0.0, w, bh), edge, clear, GradientAxis::Vertical);
    out.gradient(Rect::new(0.0, h - bh, w, h), clear, edge, GradientAxis::Vertical);
    out.gradient(Rect::new(0.0, 0.0, bw, h), edge, clear, GradientAxis::Horizontal);
    out.gradient(Rect::new(w - bw, 0.0, w, h), clear, edge, GradientAxis::Horizontal);
}
