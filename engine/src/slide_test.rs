#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Step until idle and fully settled, collecting playback requests.
fn run_to_rest(state: &mut SlideState) -> Vec<usize> {
    let mut plays = Vec::new();
    for _ in 0..1000 {
        let step = state.step();
        if let Some(slide) = step.play {
            plays.push(slide);
        }
        #[allow(clippy::cast_precision_loss)]
        let target = state.active_index() as f64;
        if !state.is_rotating() && state.visual_index() == target {
            return plays;
        }
    }
    panic!("machine did not settle within 1000 frames");
}

// --- go_to arithmetic ---

#[test]
fn go_to_updates_logical_index_instantly() {
    let mut s = SlideState::new(5);
    s.go_to(2);
    assert_eq!(s.active_index(), 2);
}

#[test]
fn go_to_schedules_proportional_rotation() {
    let mut s = SlideState::new(5);
    s.go_to(2);
    assert!(approx_eq(s.rotation_remaining(), -(2.0 / 5.0) * TAU));
}

#[test]
fn go_to_composes_with_in_flight_rotation() {
    let mut s = SlideState::new(5);
    s.go_to(2);
    s.step();
    s.go_to(4);
    // Remainder of the first command plus -(4-2)/5 · 2π for the second.
    let spent = s.spin();
    let expected = -(4.0 / 5.0) * TAU - spent;
    assert!(approx_eq(s.rotation_remaining(), expected));
}

#[test]
fn go_to_backwards_rotates_the_other_way() {
    let mut s = SlideState::new(5);
    s.go_to(-1);
    assert!(s.rotation_remaining() > 0.0);
    assert_eq!(s.active_index(), -1);
}

#[test]
fn go_to_returns_wrapped_slide() {
    let mut s = SlideState::new(5);
    assert_eq!(s.go_to(-1), 4);
    assert_eq!(s.go_to(7), 2);
    assert_eq!(s.go_to(0), 0);
}

// --- wraparound ---

#[test]
fn wrap_uses_floored_modulo() {
    let s = SlideState::new(5);
    assert_eq!(s.wrap(-1), 4);
    assert_eq!(s.wrap(-5), 0);
    assert_eq!(s.wrap(-6), 4);
    assert_eq!(s.wrap(5), 0);
    assert_eq!(s.wrap(12), 2);
}

// --- rotation convergence ---

#[test]
fn rotation_magnitude_strictly_decreases() {
    let mut s = SlideState::new(5);
    s.go_to(3);
    let mut prev = s.rotation_remaining().abs();
    while s.is_rotating() {
        s.step();
        let now = s.rotation_remaining().abs();
        assert!(now < prev, "|remaining| must shrink every frame");
        prev = now;
    }
}

#[test]
fn rotation_terminates_at_exactly_zero() {
    let mut s = SlideState::new(5);
    s.go_to(1);
    run_to_rest(&mut s);
    assert_eq!(s.rotation_remaining(), 0.0);
}

#[test]
fn rotation_never_overshoots() {
    let mut s = SlideState::new(5);
    s.go_to(2);
    // Negative remainder must climb to zero without crossing it.
    while s.is_rotating() {
        assert!(s.rotation_remaining() <= 0.0);
        s.step();
    }
    assert_eq!(s.rotation_remaining(), 0.0);
}

#[test]
fn applied_rotation_sums_to_the_commanded_delta() {
    let mut s = SlideState::new(5);
    s.go_to(2);
    run_to_rest(&mut s);
    assert!(approx_eq(s.spin(), -(2.0 / 5.0) * TAU));
}

#[test]
fn idle_step_applies_nothing() {
    let mut s = SlideState::new(5);
    let step = s.step();
    assert_eq!(step.rotation_applied, 0.0);
    assert!(!s.is_rotating());
}

// --- visual index smoothing ---

#[test]
fn visual_index_tracks_logical_index() {
    let mut s = SlideState::new(5);
    s.go_to(2);
    s.step();
    assert!(s.visual_index() > 0.0);
    assert!(s.visual_index() < 2.0);
    run_to_rest(&mut s);
    assert_eq!(s.visual_index(), 2.0);
}

#[test]
fn visual_index_smooths_independently_of_rotation() {
    // On a large jump the index error decays faster than the rotation
    // remainder, so the index settles while the cylinder still turns.
    let mut s = SlideState::new(5);
    s.go_to(4);
    while s.visual_index() != 4.0 {
        s.step();
    }
    assert!(s.is_rotating(), "rotation must outlive the index smoothing");
    run_to_rest(&mut s);
    assert_eq!(s.rotation_remaining(), 0.0);
    assert_eq!(s.visual_index(), 4.0);
}

// --- settle-gated playback ---

#[test]
fn playback_fires_exactly_once_after_settling() {
    let mut s = SlideState::new(5);
    s.go_to(2);
    let plays = run_to_rest(&mut s);
    assert_eq!(plays, vec![2]);
    // Further frames stay quiet.
    assert_eq!(s.step().play, None);
}

#[test]
fn playback_target_is_wrapped() {
    let mut s = SlideState::new(5);
    s.go_to(-1);
    let plays = run_to_rest(&mut s);
    assert_eq!(plays, vec![4]);
}

#[test]
fn navigating_to_current_slide_fires_immediately() {
    let mut s = SlideState::new(5);
    s.go_to(0);
    assert_eq!(s.step().play, Some(0));
}

#[test]
fn rapid_navigation_is_latest_wins() {
    let mut s = SlideState::new(5);
    s.go_to(1);
    s.step();
    s.step();
    s.go_to(3);
    let plays = run_to_rest(&mut s);
    assert_eq!(plays, vec![3], "superseded command must never fire");
}
