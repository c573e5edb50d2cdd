//! End-to-end coverage of the countdown contract, driven through the
//! manual scheduler.

use std::cell::RefCell;
use std::rc::Rc;

use clessidra::prelude::*;

fn engine() -> (ManualScheduler, TimerEngine<ManualScheduler>) {
    let driver = ManualScheduler::new();
    let engine = TimerEngine::new(driver.clone());
    (driver, engine)
}

#[test]
fn five_ticks_from_idle() {
    let (driver, mut engine) = engine();

    assert_eq!(engine.snapshot().remaining, 90);
    assert!(engine.snapshot().paused);

    engine.start();
    for _ in 0..5 {
        driver.fire();
    }

    assert_eq!(engine.snapshot().remaining, 85);
    assert!(!engine.snapshot().paused);
}

#[test]
fn pause_then_resume_continues_from_preserved_value() {
    let (driver, mut engine) = engine();

    engine.start();
    for _ in 0..5 {
        driver.fire();
    }
    engine.pause();
    assert_eq!(engine.snapshot().remaining, 85);

    engine.start();
    for _ in 0..5 {
        driver.fire();
    }
    assert_eq!(engine.snapshot().remaining, 80);
}

#[test]
fn stop_resets_at_any_point() {
    for ticks in [0usize, 1, 45, 89] {
        let (driver, mut engine) = engine();

        engine.start();
        for _ in 0..ticks {
            driver.fire();
        }
        engine.stop();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.remaining, 90);
        assert!(snapshot.paused);
    }
}

#[test]
fn natural_completion_matches_stop() {
    let (driver, mut engine) = engine();

    engine.start();
    // 90 ticks reach zero; the next one performs the reset.
    for _ in 0..91 {
        driver.fire();
    }

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.remaining, 90);
    assert!(snapshot.paused);

    // No further decrements without a new start.
    for _ in 0..3 {
        driver.fire();
    }
    assert_eq!(engine.snapshot().remaining, 90);
}

#[test]
fn repeated_commands_are_idempotent() {
    let (driver, mut engine) = engine();

    engine.start();
    engine.start();
    driver.fire();
    let after_single = engine.snapshot();

    engine.pause();
    engine.pause();
    assert_eq!(engine.snapshot().remaining, after_single.remaining);
    assert!(engine.snapshot().paused);

    engine.stop();
    engine.stop();
    assert_eq!(engine.snapshot().remaining, 90);
}

#[test]
fn renderer_observes_fraction_and_policy() {
    let (driver, mut engine) = engine();
    let mapper = ProgressMapper::new(engine.total());

    let targets = Rc::new(RefCell::new(Vec::new()));
    let remaining = engine.remaining();

    let sink = targets.clone();
    let _subscription = create_effect(move || {
        let target = mapper.target(remaining.get());
        sink.borrow_mut()
            .push((target.fraction, target.transition.duration_ms));
    });

    // Initial snapshot: full arc, slow sweep.
    assert_eq!(*targets.borrow(), vec![(100, 1000.0)]);

    engine.start();
    driver.fire();
    driver.fire();

    // 89s -> 98%, 88s -> 97%, both crisp 100ms steps.
    assert_eq!(
        *targets.borrow(),
        vec![(100, 1000.0), (98, 100.0), (97, 100.0)]
    );
}

#[test]
fn completion_is_observed_as_single_reset_update() {
    let driver = ManualScheduler::new();
    let mut engine = TimerEngine::with_total(2, driver.clone());

    let seen = Rc::new(RefCell::new(Vec::new()));
    let remaining = engine.remaining();
    let paused = engine.paused();

    let sink = seen.clone();
    let _subscription = create_effect(move || {
        sink.borrow_mut().push((remaining.get(), paused.get()));
    });

    engine.start();
    for _ in 0..3 {
        driver.fire();
    }

    // (2,true) initial, (2,false) start, two decrements, then one combined
    // reset update. No intermediate (2,false) or (0,true) from the reset.
    assert_eq!(
        *seen.borrow(),
        vec![(2, true), (2, false), (1, false), (0, false), (2, true)]
    );
}

#[test]
fn display_values_follow_remaining() {
    let (driver, mut engine) = engine();
    let minutes = engine.minutes();
    let seconds = engine.seconds();

    assert_eq!((minutes.get(), seconds.get()), (1, 30));

    engine.start();
    for _ in 0..31 {
        driver.fire();
    }
    assert_eq!((minutes.get(), seconds.get()), (0, 59));
}

#[test]
fn progress_animation_reaches_target() {
    let mapper = ProgressMapper::new(90);
    let mut arc = AnimationState::new(100.0f32, Transition::default());

    // Zero-duration transitions make the sweep deterministic in a test.
    arc.animate_with(
        mapper.target(89).fraction as f32,
        Transition::new(0.0, TimingFunction::Linear),
    );
    assert_eq!(arc.advance(), AdvanceResult::Changed(98.0));
    assert!(!arc.is_animating());
}
