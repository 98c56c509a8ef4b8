use crate::effects::intensity::IntensityScales;
use crate::foundation::core::{Canvas, Point, Rgba8, Vec2};
use crate::foundation::math::lerp;
use crate::noise::{hash01, hash11, noise01};
use crate::render::plan::DrawList;
use std::f64::consts::TAU;

const PALETTE: [Rgba8; 6] = [
    Rgba8::rgb(255, 214, 102),
    Rgba8::rgb(255, 86, 86),
    Rgba8::rgb(110, 255, 140),
    Rgba8::rgb(110, 170, 255),
    Rgba8::rgb(255, 120, 220),
    Rgba8::rgb(255, 250, 240),
];
const TRAIL: Rgba8 = Rgba8::rgb(255, 220, 170);

const SHELL_SALT: u64 = 0x6669_7265;
const RISE_SECS: f64 = 0.9;
const FLASH_SECS: f64 = 0.25;
const GRAVITY: f64 = 60.0;
const DRAG: f64 = 1.6;

/// Timing of one shell at a query time.
#[derive(Clone, Copy, Debug, PartialEq)]
enum ShellPhase {
    Rising { progress: f64 },
    Burst { age: f64, life: f64 },
}

struct Shell {
    key: u64,
    phase: ShellPhase,
}

fn shell_at(i: u64, t: f64) -> Shell {
    let period = 2.8 + 1.6 * hash01(i, SHELL_SALT);
    let local = t + hash01(i, SHELL_SALT + 1) * period;
    let cycle = (local / period).floor().max(0.0);
    let age = local - cycle * period;
    let key = i.wrapping_mul(7919).wrapping_add(cycle as u64);
    let phase = if age < RISE_SECS {
        ShellPhase::Rising {
            progress: age / RISE_SECS,
        }
    } else {
        ShellPhase::Burst {
            age: age - RISE_SECS,
            life: period - RISE_SECS,
        }
    };
    Shell { key, phase }
}

pub(crate) fn render(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    let (w, h) = (canvas.w(), canvas.h());
    for i in 0..s.count_of(4) as u64 {
        let shell = shell_at(i, t);
        let k = shell.key;
        let burst = Point::new(
            w * (0.15 + 0.70 * hash01(k, SHELL_SALT + 2)),
            h * (0.15 + 0.35 * hash01(k, SHELL_SALT + 3)),
        );
        let color = PALETTE[(hash01(k, SHELL_SALT + 4) * PALETTE.len() as f64) as usize % PALETTE.len()];

        match shell.phase {
            ShellPhase::Rising { progress } => {
                rocket(burst, h, progress, s, out);
            }
            ShellPhase::Burst { age, life } => {
                if age < FLASH_SECS {
                    let f = 1.0 - age / FLASH_SECS;
                    out.glow(burst, s.size_of(70.0) * f, color.with_alpha(s.alpha_of(0.6) * f));
                }
                explosion(k, burst, age, life, color, s, out);
            }
        }
    }
}

fn rocket(burst: Point, h: f64, progress: f64, s: IntensityScales, out: &mut DrawList) {
    // Ease-out rise that slows just before bursting.
    let eased = 1.0 - (1.0 - progress).powi(2);
    let y = lerp(h, burst.y, eased);
    for j in 0..5 {
        let back = f64::from(j) * s.size_of(6.0);
        let a = s.alpha_of(0.9) * (1.0 - f64::from(j) / 5.0);
        out.circle(
            Point::new(burst.x, y + back),
            s.size_of(2.0) * (1.0 - f64::from(j) * 0.12),
            TRAIL.with_alpha(a),
        );
    }
}

fn explosion(
    key: u64,
    burst: Point,
    age: f64,
    life: f64,
    color: Rgba8,
    s: IntensityScales,
    out: &mut DrawList,
) {
    let u = (age / life).clamp(0.0, 1.0);
    if u >= 1.0 {
        return;
    }
    let fade = (1.0 - u).powf(1.5);
    let n = s.count_of(36);
    for j in 0..n as u64 {
        let angle = TAU * j as f64 / n as f64 + hash11(j, key) * 0.15;
        let speed = s.size_of(90.0 + 80.0 * hash01(j, key + 1));
        let pos = particle_at(burst, angle, speed, age);
        let prev = particle_at(burst, angle, speed, (age - 0.06).max(0.0));
        let sparkle = 0.7 + 0.3 * noise01(age * 20.0, j as f64, 1.0);
        let a = s.alpha_of(1.0) * fade * sparkle;
        let r = s.size_of(1.6) * (1.0 - 0.5 * u);
        out.line(prev, pos, r, color.with_alpha(a * 0.5));
        out.circle(pos, r, color.with_alpha(a));
    }
}

/// Closed-form particle position: exponential drag outward plus gravity.
fn particle_at(burst: Point, angle: f64, speed: f64, age: f64) -> Point {
    let dist = speed * (1.0 - (-DRAG * age).exp()) / DRAG;
    burst + Vec2::new(angle.cos(), angle.sin()) * dist + Vec2::new(0.0, 0.5 * GRAVITY * age * age)
}
