use super::*;

fn close(a: [u8; 4], b: [u8; 4], tol: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tol)
}

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas {
        width: w,
        height: h,
    }
}

#[test]
fn solid_fill_covers_canvas() {
    let mut backend = CpuBackend::new();
    let c = canvas(8, 6);
    let frame = backend
        .render(c, |p| p.fill(c.rect(), Rgba8::rgb(10, 20, 30)))
        .unwrap();
    assert_eq!((frame.width, frame.height), (8, 6));
    assert_eq!(frame.data.len(), 8 * 6 * 4);
    assert_eq!(frame.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(frame.pixel(7, 5), Some([10, 20, 30, 255]));
}

#[test]
fn image_draws_through_transform_and_opacity() {
    let mut backend = CpuBackend::new();
    let c = canvas(8, 8);
    let red = RasterImage::solid(4, 4, Rgba8::rgb(255, 0, 0)).unwrap();
    let frame = backend
        .render(c, |p| {
            p.fill(c.rect(), Rgba8::BLACK);
            p.draw_image(&red, Affine::scale(2.0), 1.0).unwrap();
        })
        .unwrap();
    assert!(close(frame.pixel(4, 4).unwrap(), [255, 0, 0, 255], 2));

    let half = backend
        .render(c, |p| {
            p.fill(c.rect(), Rgba8::BLACK);
            p.draw_image(&red, Affine::scale(2.0), 0.5).unwrap();
        })
        .unwrap();
    assert!(close(half.pixel(4, 4).unwrap(), [128, 0, 0, 255], 3));
}

#[test]
fn zero_opacity_image_is_skipped() {
    let mut backend = CpuBackend::new();
    let c = canvas(4, 4);
    let red = RasterImage::solid(4, 4, Rgba8::rgb(255, 0, 0)).unwrap();
    let frame = backend
        .render(c, |p| {
            p.fill(c.rect(), Rgba8::BLACK);
            p.draw_image(&red, Affine::IDENTITY, 0.0).unwrap();
            p.draw_image(&red, Affine::IDENTITY, f64::NAN).unwrap();
        })
        .unwrap();
    assert_eq!(frame.pixel(1, 1), Some([0, 0, 0, 255]));
}

#[test]
fn display_list_shapes_land_where_expected() {
    let mut backend = CpuBackend::new();
    let c = canvas(40, 40);
    let mut list = DrawList::new(c);
    list.circle(Point::new(10.0, 10.0), 5.0, Rgba8::rgb(0, 255, 0));
    list.line(
        Point::new(20.0, 30.0),
        Point::new(38.0, 30.0),
        4.0,
        Rgba8::rgb(0, 0, 255),
    );
    let frame = backend
        .render(c, |p| {
            p.fill(c.rect(), Rgba8::BLACK);
            p.draw_list(&list).unwrap();
        })
        .unwrap();
    assert!(close(frame.pixel(10, 10).unwrap(), [0, 255, 0, 255], 2));
    assert!(close(frame.pixel(30, 30).unwrap(), [0, 0, 255, 255], 2));
    assert_eq!(frame.pixel(30, 10), Some([0, 0, 0, 255]));
}

#[test]
fn vertical_gradient_runs_top_to_bottom() {
    let mut backend = CpuBackend::new();
    let c = canvas(4, 64);
    let mut list = DrawList::new(c);
    list.gradient(c.rect(), Rgba8::WHITE, Rgba8::BLACK, GradientAxis::Vertical);
    let frame = backend
        .render(c, |p| {
            p.fill(c.rect(), Rgba8::BLACK);
            p.draw_list(&list).unwrap();
        })
        .unwrap();
    let top = frame.pixel(2, 1).unwrap()[0];
    let mid = frame.pixel(2, 32).unwrap()[0];
    let bottom = frame.pixel(2, 62).unwrap()[0];
    assert!(top > mid && mid > bottom, "{top} {mid} {bottom}");
}

#[test]
fn horizontal_gradient_runs_left_to_right() {
    let mut backend = CpuBackend::new();
    let c = canvas(64, 4);
    let mut list = DrawList::new(c);
    list.gradient(c.rect(), Rgba8::BLACK, Rgba8::WHITE, GradientAxis::Horizontal);
    let frame = backend
        .render(c, |p| {
            p.fill(c.rect(), Rgba8::BLACK);
            p.draw_list(&list).unwrap();
        })
        .unwrap();
    let left = frame.pixel(1, 2).unwrap()[0];
    let right = frame.pixel(62, 2).unwrap()[0];
    assert!(left < right, "{left} {right}");
}

#[test]
fn glow_is_brightest_at_center() {
    let mut backend = CpuBackend::new();
    let c = canvas(40, 40);
    let mut list = DrawList::new(c);
    list.glow(Point::new(20.0, 20.0), 15.0, Rgba8::WHITE);
    let frame = backend
        .render(c, |p| {
            p.fill(c.rect(), Rgba8::BLACK);
            p.draw_list(&list).unwrap();
        })
        .unwrap();
    let center = frame.pixel(20, 20).unwrap()[0];
    let edge = frame.pixel(20, 33).unwrap()[0];
    assert!(center > edge);
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
}

#[test]
fn repeated_renders_are_identical() {
    let mut backend = CpuBackend::new();
    let c = canvas(32, 24);
    let mut list = DrawList::new(c);
    list.circle(Point::new(7.3, 9.1), 4.4, Rgba8::rgb(200, 120, 40).with_alpha(0.6));
    let draw = |p: &mut CpuPainter<'_>| {
        p.fill(c.rect(), Rgba8::BLACK);
        p.draw_list(&list).unwrap();
    };
    let a = backend.render(c, draw).unwrap();
    let b = backend.render(c, draw).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn text_without_font_reports_error() {
    let mut backend = CpuBackend::new();
    let c = canvas(16, 16);
    backend
        .render(c, |p| {
            assert!(p.layout_text("hi", 12.0, Rgba8::WHITE).is_err());
        })
        .unwrap();
}

#[test]
fn segment_quad_has_requested_thickness() {
    let q = segment_quad(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 2.0);
    let b = q.bounding_box();
    assert_eq!((b.x0, b.x1, b.y0, b.y1), (-1.0, 11.0, -1.0, 1.0));
}
