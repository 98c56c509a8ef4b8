use super::*;

fn temp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "reelcraft_png_sink_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn frame(v: u8) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: [v, v, v, 255].repeat(4),
        premultiplied: true,
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: 30.0,
        total_frames: 2,
    }
}

#[test]
fn writes_numbered_pngs() {
    let dir = temp_dir("ok");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(10)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(20)).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.written(), 2);
    let img = image::open(dir.join("frame_000001.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 2));
    assert_eq!(img.get_pixel(1, 1).0, [20, 20, 20, 255]);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn rejects_out_of_order_and_mismatched_frames() {
    let dir = temp_dir("bad");
    let mut sink = PngSequenceSink::new(&dir);
    assert!(sink.push_frame(FrameIndex(0), &frame(1)).is_err());
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(3), &frame(1)).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame(1)).is_err());
    let mut wrong = frame(1);
    wrong.width = 1;
    wrong.data.truncate(8);
    assert!(sink.push_frame(FrameIndex(4), &wrong).is_err());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unpremultiply_restores_straight_color() {
    assert_eq!(unpremultiply(&[64, 32, 0, 128]), vec![128, 64, 0, 128]);
    assert_eq!(unpremultiply(&[0, 0, 0, 0]), vec![0, 0, 0, 0]);
    assert_eq!(unpremultiply(&[9, 8, 7, 255]), vec![9, 8, 7, 255]);
}
