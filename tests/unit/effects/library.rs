use super::*;

fn canvas() -> Canvas {
    Canvas {
        width: 480,
        height: 270,
    }
}

#[test]
fn none_draws_nothing() {
    let list = EffectConfig::new(EffectKind::None, 100.0).draw(3.0, canvas());
    assert!(list.is_empty());
    assert_eq!(list.culled(), 0);
}

#[test]
fn every_effect_is_reproducible_at_the_same_time() {
    for kind in EffectKind::ALL {
        let cfg = EffectConfig::new(kind, 70.0);
        for t in [0.0, 0.5, 1.25, 7.9, 61.3] {
            let a = cfg.draw(t, canvas());
            let b = cfg.draw(t, canvas());
            assert_eq!(a.cmds(), b.cmds(), "{kind:?} diverged at t={t}");
        }
    }
}

#[test]
fn seeking_backwards_reproduces_earlier_frames() {
    for kind in EffectKind::ALL {
        let cfg = EffectConfig::new(kind, 50.0);
        let first = cfg.draw(2.0, canvas());
        for t in [2.5, 10.0, 0.1] {
            let _ = cfg.draw(t, canvas());
        }
        assert_eq!(first.cmds(), cfg.draw(2.0, canvas()).cmds(), "{kind:?}");
    }
}

#[test]
fn recorded_commands_always_touch_the_canvas() {
    let view = canvas().rect();
    for kind in EffectKind::ALL {
        for t in [0.0, 1.0, 3.3, 12.0] {
            let list = EffectConfig::new(kind, 100.0).draw(t, canvas());
            for cmd in list.cmds() {
                assert!(cmd.is_visible_in(view), "{kind:?} emitted offscreen {cmd:?}");
            }
        }
    }
}

#[test]
fn every_generator_draws_something() {
    for kind in EffectKind::ALL.into_iter().filter(|k| *k != EffectKind::None) {
        let total: usize = (0..20)
            .map(|i| EffectConfig::new(kind, 50.0).draw(i as f64 * 0.37, canvas()).len())
            .sum();
        assert!(total > 0, "{kind:?} drew nothing");
    }
}

#[test]
fn higher_intensity_means_more_elements() {
    for kind in [
        EffectKind::Film,
        EffectKind::Birds,
        EffectKind::Rain,
        EffectKind::Stars,
        EffectKind::Galaxy,
        EffectKind::Smoke,
    ] {
        let lo = EffectConfig::new(kind, 0.0).draw(1.5, canvas());
        let hi = EffectConfig::new(kind, 100.0).draw(1.5, canvas());
        assert!(
            hi.len() + hi.culled() > lo.len() + lo.culled(),
            "{kind:?}: {} vs {}",
            hi.len(),
            lo.len()
        );
    }
}

#[test]
fn unusable_times_render_like_time_zero() {
    let cfg = EffectConfig::new(EffectKind::Rain, 50.0);
    let zero = cfg.draw(0.0, canvas());
    assert_eq!(cfg.draw(f64::NAN, canvas()).cmds(), zero.cmds());
    assert_eq!(cfg.draw(-4.0, canvas()).cmds(), zero.cmds());
}

#[test]
fn config_round_trips_through_json() {
    let cfg: EffectConfig =
        serde_json::from_str(r#"{"kind":"film_marks","intensity":30}"#).unwrap();
    assert_eq!(cfg.kind, EffectKind::FilmMarks);
    assert_eq!(cfg.intensity.level(), 30.0);
    let cfg: EffectConfig = serde_json::from_str(r#"{"kind":"galaxy"}"#).unwrap();
    assert_eq!(cfg.intensity.level(), 50.0);
}
