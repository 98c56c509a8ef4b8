use super::*;

fn px(v: u8) -> RasterImage {
    RasterImage::solid(2, 2, Rgba8::rgb(v, v, v)).unwrap()
}

fn first_byte(img: &RasterImage) -> u8 {
    img.data()[0]
}

#[test]
fn raster_rejects_mismatched_buffers() {
    assert!(RasterImage::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(RasterImage::from_premul_rgba8(0, 2, vec![]).is_err());
    assert!(RasterImage::from_premul_rgba8(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn straight_input_is_premultiplied() {
    let img = RasterImage::from_straight_rgba8(1, 1, vec![255, 128, 0, 128]).unwrap();
    assert_eq!(img.data(), &[128, 64, 0, 128]);
}

#[test]
fn clones_share_identity_new_rasters_do_not() {
    let a = px(1);
    let b = a.clone();
    let c = px(1);
    assert_eq!(a.id(), b.id());
    assert_ne!(a.id(), c.id());
}

#[test]
fn sample_requests_fixed_interval_timestamps() {
    let mut asked = Vec::new();
    let cache = FrameCache::sample(0.35, FRAME_SAMPLE_INTERVAL_SECS, |t| {
        asked.push(t);
        Some(px((t * 100.0).round() as u8))
    });
    assert_eq!(asked.len(), 4);
    assert_eq!(cache.len(), 4);
    assert!((asked[3] - 0.3).abs() < 1e-9);
}

#[test]
fn sample_caps_requests_for_tiny_intervals() {
    let mut calls = 0u64;
    let mut last = 0.0;
    let cache = FrameCache::sample(1.0, 1e-300, |t| {
        calls += 1;
        last = t;
        None
    });
    assert!(cache.is_empty());
    assert_eq!(calls, MAX_SAMPLED_FRAMES);
    assert!(last < 1.0);

    let mut long_calls = 0u64;
    FrameCache::sample(1e12, 0.1, |_| {
        long_calls += 1;
        None
    });
    assert_eq!(long_calls, MAX_SAMPLED_FRAMES);
}

#[test]
fn sample_skips_frames_the_provider_cannot_decode() {
    let cache = FrameCache::sample(1.0, 0.1, |t| if t > 0.45 { None } else { Some(px(1)) });
    assert_eq!(cache.len(), 5);
    assert!(FrameCache::sample(0.0, 0.1, |_| Some(px(1))).is_empty());
    assert!(FrameCache::sample(f64::NAN, 0.1, |_| Some(px(1))).is_empty());
}

#[test]
fn nearest_lookup_picks_closest_timestamp() {
    let cache = FrameCache::from_frames(vec![
        CachedFrame {
            time: 0.2,
            frame: px(20),
        },
        CachedFrame {
            time: 0.0,
            frame: px(0),
        },
        CachedFrame {
            time: 0.1,
            frame: px(10),
        },
    ]);
    assert_eq!(first_byte(cache.nearest(0.0).unwrap()), 0);
    assert_eq!(first_byte(cache.nearest(0.04).unwrap()), 0);
    assert_eq!(first_byte(cache.nearest(0.06).unwrap()), 10);
    assert_eq!(first_byte(cache.nearest(0.19).unwrap()), 20);
    assert_eq!(first_byte(cache.nearest(5.0).unwrap()), 20);
    assert_eq!(first_byte(cache.nearest(-1.0).unwrap()), 0);
    assert_eq!(first_byte(cache.last().unwrap()), 20);
}

#[test]
fn empty_cache_has_no_frames() {
    let cache = FrameCache::default();
    assert!(cache.nearest(1.0).is_none());
    assert!(cache.last().is_none());
}

#[test]
fn decode_png_premultiplies() {
    use std::io::Cursor;

    let src = image::RgbaImage::from_raw(1, 1, vec![200, 100, 50, 128]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(src)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    let img = RasterImage::decode(&buf).unwrap();
    assert_eq!((img.width(), img.height()), (1, 1));
    assert_eq!(img.data(), &[100, 50, 25, 128]);
    assert!(RasterImage::decode(b"not an image").is_err());
}
