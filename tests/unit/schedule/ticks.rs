use super::*;

fn take(src: &mut impl TickSource, n: usize) -> Vec<f64> {
    (0..n).map(|_| src.next_tick()).collect()
}

#[test]
fn steady_ticks_advance_by_the_interval() {
    let ticks = take(&mut SimulatedTicks::steady(0.5), 4);
    assert_eq!(ticks, vec![0.0, 0.5, 1.0, 1.5]);
}

#[test]
fn jittered_ticks_are_monotonic_bounded_and_reproducible() {
    let a = take(&mut SimulatedTicks::jittered(0.02, 0.8, 7), 200);
    let b = take(&mut SimulatedTicks::jittered(0.02, 0.8, 7), 200);
    let c = take(&mut SimulatedTicks::jittered(0.02, 0.8, 8), 200);
    assert_eq!(a, b);
    assert_ne!(a, c);
    for w in a.windows(2) {
        let dt = w[1] - w[0];
        assert!((0.004 - 1e-12..=0.036 + 1e-12).contains(&dt), "dt {dt}");
    }
}

#[test]
fn stalls_add_long_gaps() {
    let ticks = take(&mut SimulatedTicks::steady(0.1).with_stalls(3, 1.0), 5);
    let gaps: Vec<f64> = ticks.windows(2).map(|w| w[1] - w[0]).collect();
    assert!((gaps[2] - 1.1).abs() < 1e-9);
    assert!((gaps[0] - 0.1).abs() < 1e-9);
}

#[test]
fn realtime_ticks_follow_the_wall_clock() {
    let mut src = RealtimeTicks::new(0.002);
    let first = src.next_tick();
    let second = src.next_tick();
    assert!(second >= first + 0.002);
}
