use super::*;
use crate::effects::EffectKind;
use crate::timeline::{Caption, CaptionId, ClipId, FrameCache};

fn canvas() -> Canvas {
    Canvas {
        width: 64,
        height: 36,
    }
}

fn solid(color: Rgba8) -> RasterImage {
    RasterImage::solid(16, 9, color).unwrap()
}

fn image_timeline(color: Rgba8) -> Timeline {
    let mut tl = Timeline::new(10.0).unwrap();
    tl.add_clip(Clip::image(ClipId(1), solid(color)).with_duration(10.0))
        .unwrap();
    tl
}

fn close(a: [u8; 4], b: [u8; 4], tol: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tol)
}

#[test]
fn render_sample_sanitizes_inputs() {
    let s = RenderSample::new(f64::NAN, 0.0, 1e9);
    assert_eq!(s.time, 0.0);
    assert_eq!(s.canvas, Canvas::default());
    assert_eq!(RenderSample::new(-2.0, 320.0, 240.0).time, 0.0);
    assert_eq!(RenderSample::new(1.5, 320.4, 239.6).canvas.height, 240);
}

#[test]
fn zero_sized_canvas_renders_at_default_size() {
    let tl = image_timeline(Rgba8::rgb(40, 80, 120));
    let zero = Canvas {
        width: 0,
        height: 0,
    };
    let frame = Compositor::new()
        .render_frame(&RenderSample::at(0.5, zero), &RenderState::new(&tl))
        .unwrap();
    assert_eq!((frame.width, frame.height), (1280, 720));

    let too_wide = Canvas {
        width: 70_000,
        height: 10,
    };
    let frame = Compositor::new()
        .render_frame(&RenderSample::at(0.5, too_wide), &RenderState::new(&tl))
        .unwrap();
    assert_eq!((frame.width, frame.height), (1280, 10));
}

#[test]
fn empty_timeline_renders_black() {
    let tl = Timeline::new(5.0).unwrap();
    let mut comp = Compositor::new();
    let frame = comp
        .render_frame(&RenderSample::at(1.0, canvas()), &RenderState::new(&tl))
        .unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn image_clip_covers_canvas() {
    let tl = image_timeline(Rgba8::rgb(200, 30, 30));
    let mut comp = Compositor::new();
    let frame = comp
        .render_frame(&RenderSample::at(1.0, canvas()), &RenderState::new(&tl))
        .unwrap();
    for (x, y) in [(1, 1), (32, 18), (62, 34)] {
        assert!(close(frame.pixel(x, y).unwrap(), [200, 30, 30, 255], 2));
    }
}

#[test]
fn same_sample_is_pixel_identical_across_compositors() {
    let tl = image_timeline(Rgba8::rgb(90, 120, 160));
    let effect = EffectConfig::new(EffectKind::Film, 70.0);
    let state = RenderState::new(&tl).with_effect(effect);
    let sample = RenderSample::at(3.25, canvas());

    let mut a = Compositor::new();
    let first = a.render_frame(&sample, &state).unwrap();
    let _ = a.render_frame(&RenderSample::at(7.0, canvas()), &state).unwrap();
    let again = a.render_frame(&sample, &state).unwrap();
    let fresh = Compositor::new().render_frame(&sample, &state).unwrap();

    assert_eq!(first.fingerprint(), again.fingerprint());
    assert_eq!(first.fingerprint(), fresh.fingerprint());
}

#[test]
fn effect_stage_can_be_switched_off() {
    let tl = image_timeline(Rgba8::rgb(90, 120, 160));
    let sample = RenderSample::at(2.0, canvas());
    let mut comp = Compositor::new();

    let plain = comp.render_frame(&sample, &RenderState::new(&tl)).unwrap();
    let with_effect = RenderState::new(&tl).with_effect(EffectConfig::new(EffectKind::Film, 100.0));
    let film = comp.render_frame(&sample, &with_effect).unwrap();
    let off = comp
        .render_frame(
            &sample,
            &with_effect.with_stages(RenderStages {
                effect: false,
                ..RenderStages::default()
            }),
        )
        .unwrap();

    assert_ne!(plain.fingerprint(), film.fingerprint());
    assert_eq!(plain.fingerprint(), off.fingerprint());
}

#[test]
fn clip_stage_off_leaves_black() {
    let tl = image_timeline(Rgba8::WHITE);
    let state = RenderState::new(&tl).with_stages(RenderStages {
        clip: false,
        ..RenderStages::default()
    });
    let frame = Compositor::new()
        .render_frame(&RenderSample::at(1.0, canvas()), &state)
        .unwrap();
    assert_eq!(frame.pixel(10, 10), Some([0, 0, 0, 255]));
}

#[test]
fn video_without_frames_shows_image_backdrop_at_half_opacity() {
    let mut tl = Timeline::new(10.0).unwrap();
    tl.add_clip(Clip::image(ClipId(1), solid(Rgba8::WHITE)).with_duration(2.0))
        .unwrap();
    tl.add_clip(Clip::video(ClipId(2), FrameCache::default(), 3.0, 16, 9).with_start(2.0))
        .unwrap();
    let frame = Compositor::new()
        .render_frame(&RenderSample::at(3.0, canvas()), &RenderState::new(&tl))
        .unwrap();
    assert!(close(frame.pixel(32, 18).unwrap(), [128, 128, 128, 255], 3));
}

#[test]
fn video_without_frames_or_backdrop_is_black() {
    let mut tl = Timeline::new(10.0).unwrap();
    tl.add_clip(Clip::video(ClipId(2), FrameCache::default(), 3.0, 16, 9))
        .unwrap();
    let frame = Compositor::new()
        .render_frame(&RenderSample::at(1.0, canvas()), &RenderState::new(&tl))
        .unwrap();
    assert_eq!(frame.pixel(32, 18), Some([0, 0, 0, 255]));
}

#[test]
fn video_draws_nearest_cached_frame() {
    let mut n = 0u8;
    let cache = FrameCache::sample(1.0, 0.1, |_| {
        n += 20;
        Some(solid(Rgba8::rgb(n, 0, 0)))
    });
    let mut tl = Timeline::new(10.0).unwrap();
    tl.add_clip(Clip::video(ClipId(1), cache, 1.0, 16, 9).with_start(4.0))
        .unwrap();
    let frame = Compositor::new()
        .render_frame(&RenderSample::at(4.31, canvas()), &RenderState::new(&tl))
        .unwrap();
    // Clip-relative 0.31 s snaps to the 0.3 s frame, the fourth decoded one.
    assert!(close(frame.pixel(32, 18).unwrap(), [80, 0, 0, 255], 2));
}

#[test]
fn floating_clip_moves_while_static_clip_does_not() {
    let mut img = vec![0u8; 16 * 9 * 4];
    for (i, px) in img.chunks_exact_mut(4).enumerate() {
        let v = (i * 7 % 256) as u8;
        px.copy_from_slice(&[v, 255 - v, v / 2, 255]);
    }
    let raster = RasterImage::from_straight_rgba8(16, 9, img).unwrap();

    let mut tl = Timeline::new(10.0).unwrap();
    tl.add_clip(Clip::image(ClipId(1), raster.clone()).with_duration(10.0))
        .unwrap();
    let mut comp = Compositor::new();
    let state = RenderState::new(&tl);
    let a = comp.render_frame(&RenderSample::at(1.0, canvas()), &state).unwrap();
    let b = comp.render_frame(&RenderSample::at(3.0, canvas()), &state).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());

    tl.set_clip_floating(ClipId(1), true).unwrap();
    let state = RenderState::new(&tl);
    let a = comp.render_frame(&RenderSample::at(1.0, canvas()), &state).unwrap();
    let b = comp.render_frame(&RenderSample::at(3.0, canvas()), &state).unwrap();
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn text_stages_are_skipped_without_font() {
    let mut tl = image_timeline(Rgba8::rgb(10, 10, 10));
    tl.add_caption(Caption::new(CaptionId(1), "hello", 0.0).with_duration(5.0))
        .unwrap();
    let sample = RenderSample::at(1.0, canvas());
    let mut comp = Compositor::new();
    let with_text = comp
        .render_frame(&sample, &RenderState::new(&tl).with_watermark("mark"))
        .unwrap();
    let stages_off = RenderStages {
        caption: false,
        watermark: false,
        ..RenderStages::default()
    };
    let without = comp
        .render_frame(&sample, &RenderState::new(&tl).with_stages(stages_off))
        .unwrap();
    assert_eq!(with_text.fingerprint(), without.fingerprint());
}

#[test]
fn captions_and_watermark_draw_with_font() {
    let font = crate::render::text::tests::test_font();
    let mut tl = image_timeline(Rgba8::rgb(10, 10, 10));
    tl.add_caption(Caption::new(CaptionId(1), "hello world", 0.0).with_duration(4.0))
        .unwrap();
    let canvas = Canvas {
        width: 320,
        height: 180,
    };
    let mut comp = Compositor::new();
    let base = RenderState::new(&tl);
    let plain = comp.render_frame(&RenderSample::at(2.0, canvas), &base).unwrap();
    let texted = comp
        .render_frame(
            &RenderSample::at(2.0, canvas),
            &base.with_font(Some(&font)).with_watermark("reelcraft"),
        )
        .unwrap();
    assert_ne!(plain.fingerprint(), texted.fingerprint());

    let outside = comp
        .render_frame(
            &RenderSample::at(6.0, canvas),
            &base.with_font(Some(&font)),
        )
        .unwrap();
    let plain_outside = comp.render_frame(&RenderSample::at(6.0, canvas), &base).unwrap();
    assert_eq!(outside.fingerprint(), plain_outside.fingerprint());
}
