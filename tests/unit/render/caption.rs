use super::*;
use crate::timeline::CaptionId;

fn caption(id: u64, start: f64, duration: f64) -> Caption {
    Caption::new(CaptionId(id), format!("caption {id}"), start).with_duration(duration)
}

fn canvas() -> Canvas {
    Canvas {
        width: 1000,
        height: 500,
    }
}

#[test]
fn window_is_exactly_start_to_end() {
    let c = caption(1, 2.0, 3.0);
    assert!(place_caption(&c, 1.99, canvas(), 100.0, 20.0).is_none());
    assert!(place_caption(&c, 2.0, canvas(), 100.0, 20.0).is_some());
    assert!(place_caption(&c, 4.99, canvas(), 100.0, 20.0).is_some());
    assert!(place_caption(&c, 5.0, canvas(), 100.0, 20.0).is_none());
}

#[test]
fn alpha_ramps_in_and_out() {
    let c = caption(1, 2.0, 3.0);
    let at = |t: f64| place_caption(&c, t, canvas(), 100.0, 20.0).unwrap().alpha;
    assert_eq!(at(2.0), 0.0);
    assert!((at(2.1) - 0.5).abs() < 1e-9);
    assert_eq!(at(3.5), 1.0);
    assert!((at(4.9) - 0.5).abs() < 1e-9);
    assert!(at(2.05) < at(2.15));
    assert!(at(4.95) < at(4.85));
}

#[test]
fn marquee_travels_from_right_edge_past_left_edge() {
    let c = caption(1, 0.0, 4.0);
    let place = |t: f64| place_caption(&c, t, canvas(), 200.0, 20.0).unwrap();
    assert_eq!(place(0.0).x, 1000.0);
    assert!((place(2.0).x - 400.0).abs() < 1e-9);
    assert!(place(3.0).x < place(2.0).x);
    // 1200 px over 4 s: just before the end the text has nearly cleared the left edge.
    assert!(place(3.999).x + 200.0 < 1.0);
    assert!((place(1.0).y - (500.0 * 0.85 - 10.0)).abs() < 1e-9);
}

#[test]
fn earliest_starting_active_caption_wins() {
    let captions = vec![caption(1, 3.0, 4.0), caption(2, 1.0, 4.0), caption(3, 1.0, 9.0)];
    assert_eq!(active_caption(&captions, 3.5).unwrap().id(), CaptionId(2));
    assert_eq!(active_caption(&captions, 6.0).unwrap().id(), CaptionId(3));
    assert!(active_caption(&captions, 0.5).is_none());
    assert!(active_caption(&captions, f64::NAN).is_none());
}

#[test]
fn empty_text_is_never_active() {
    let captions = vec![Caption::new(CaptionId(1), "", 0.0).with_duration(2.0)];
    assert!(active_caption(&captions, 1.0).is_none());
}
