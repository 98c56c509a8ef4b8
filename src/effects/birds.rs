use crate::effects::intensity::IntensityScales;
use crate::foundation::core::{BezPath, Canvas, Point, Rgba8};
use crate::foundation::math::fract;
use crate::noise::{hash01, noise11};
use crate::render::plan::DrawList;
use std::f64::consts::TAU;

const SILHOUETTE: Rgba8 = Rgba8::rgb(20, 20, 28);
const SALT: u64 = 0x6269_7264;

pub(crate) fn render(t: f64, canvas: Canvas, s: IntensityScales, out: &mut DrawList) {
    let (w, h) = (canvas.w(), canvas.h());
    for i in 0..s.count_of(14) as u64 {
        // Nearer birds are bigger, faster and darker.
        let depth = 0.45 + 0.55 * hash01(i, SALT);
        let wing = s.size_of(8.0 + 12.0 * depth);
        let margin = wing * 2.0;
        let span = w + 2.0 * margin;
        let speed = w * (0.04 + 0.07 * depth);
        let x = fract(hash01(i, SALT + 1) + t * speed / span) * span - margin;

        let lane = h * (0.10 + 0.40 * hash01(i, SALT + 2));
        let y = lane + noise11(t, 11.0 + i as f64, 0.4) * h * 0.04;

        let flap_hz = 1.6 + 1.4 * hash01(i, SALT + 3);
        let flap = (t * TAU * flap_hz + hash01(i, SALT + 4) * TAU).sin();

        let a = s.alpha_of(0.55 + 0.35 * depth);
        out.path(wing_shape(Point::new(x, y), wing, flap), SILHOUETTE.with_alpha(a));
    }
}

/// Thin crescent with both wing tips raised by `flap` (`-1..1`).
fn wing_shape(body: Point, wing: f64, flap: f64) -> BezPath {
    let lift = flap * wing * 0.6;
    let thick = wing * 0.14;
    let left = Point::new(body.x - wing, body.y - lift);
    let right = Point::new(body.x + wing, body.y - lift);

    let mut p = BezPath::new();
    p.move_to(left);
    p.quad_to(
        Point::new(body.x - wing * 0.45, body.y - lift * 0.2 - thick),
        body,
    );
    p.quad_to(
        Point::new(body.x + wing * 0.45, body.y - lift * 0.2 - thick),
        right,
    );
    p.quad_to(
        Point::new(body.x + wing * 0.45, body.y - lift * 0.2 + thick),
        Point::new(body.x, body.y + thick),
    );
    p.quad_to(
        Point::new(body.x - wing * 0.45, body.y - lift * 0.2 + thick),
        left,
    );
    p.close_path();
    p
}
