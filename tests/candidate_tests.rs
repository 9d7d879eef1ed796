use rstest::rstest;
use std::cell::Cell;
use tabfold::geometry::Bounds;
use tabfold::optimizer::{mutation, Candidate};
use tabfold::scorer::{Direction, FitScore, VolumeScore};

// --- TRIAL SELECTION ---

#[test]
fn test_select_trial_takes_first_improvement_not_best() {
    let chosen = mutation::select_trial([1.0, 5.0, 3.0, 7.0, 2.0], Direction::Maximize, |v| v);
    assert_eq!(chosen, 5.0);
}

#[test]
fn test_select_trial_keeps_reference_without_improvement() {
    let chosen = mutation::select_trial([1.0, 5.0, 3.0, 7.0, 2.0], Direction::Minimize, |v| v);
    assert_eq!(chosen, 1.0);
}

#[test]
fn test_select_trial_ties_keep_reference() {
    let chosen = mutation::select_trial([0.3, 0.1, 0.2, 0.4, 0.5], Direction::Maximize, |_| 1.0);
    assert_eq!(chosen, 0.3);
}

#[test]
fn test_select_trial_stops_scoring_at_winner() {
    let calls = Cell::new(0);
    let chosen = mutation::select_trial([0.0, 1.0, 2.0, 3.0, 4.0], Direction::Maximize, |v| {
        calls.set(calls.get() + 1);
        v
    });
    assert_eq!(chosen, 1.0);
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_trial_values_order() {
    let mut rng = fastrand::Rng::with_seed(11);
    let trials = mutation::trial_values(&mut rng, 0.2, (0.1, 0.3));
    assert_eq!(trials[0], 0.2);
    assert_eq!(trials[1], 0.3);
    assert_eq!(trials[2], 0.1);
    for r in &trials[3..] {
        assert!((0.1..=0.3).contains(r));
    }
}

#[test]
fn test_trial_values_on_collapsed_interval() {
    let mut rng = fastrand::Rng::with_seed(3);
    let trials = mutation::trial_values(&mut rng, 0.3, (0.3, 0.3));
    assert!(trials.iter().all(|&t| t == 0.3));
}

// --- CANDIDATE ---

#[rstest]
#[case(1, 1.5)]
#[case(2, 0.1)]
#[case(4, 1.0)]
#[case(25, 0.2)]
#[case(100, 1.5)]
fn test_random_candidate_is_feasible(#[case] segments: usize, #[case] lhat: f64) {
    let bounds = Bounds::volume(segments, lhat);
    let c = Candidate::random(bounds, Some(42));
    assert_eq!(c.profile().len(), segments + 1);
    assert_eq!(c.profile()[0], 0.0);
    assert_eq!(c.profile()[segments], 0.0);
    bounds.check(c.profile()).unwrap();
}

#[test]
fn test_same_seed_same_candidate() {
    let bounds = Bounds::volume(30, 1.5);
    let a = Candidate::random(bounds, Some(9));
    let b = Candidate::random(bounds, Some(9));
    assert_eq!(a.profile(), b.profile());
}

#[test]
fn test_from_profile_rejects_infeasible() {
    let bounds = Bounds::fit(4);
    assert!(Candidate::from_profile(bounds, vec![0.0, 0.5, 0.5, 0.25, 0.0], None).is_err());
    assert!(Candidate::from_profile(bounds, vec![0.0, 0.25, 0.0], None).is_err());
}

#[test]
fn test_snapshot_is_detached() {
    let bounds = Bounds::volume(10, 1.0);
    let mut c = Candidate::random(bounds, Some(1));
    let before = c.snapshot();
    c.sweep(&VolumeScore::new(10, 1.0));
    c.randomize();
    assert_eq!(before.len(), 11);
    assert_ne!(before, c.snapshot());
}

#[test]
fn test_single_segment_has_nothing_to_move() {
    let bounds = Bounds::volume(1, 1.0);
    let mut c = Candidate::random(bounds, Some(5));
    c.mutate_one();
    assert_eq!(c.sweep(&VolumeScore::new(1, 1.0)), 0);
    assert_eq!(c.sweep_reverse(&VolumeScore::new(1, 1.0)), 0);
    assert_eq!(c.profile(), &[0.0, 0.0]);
}

#[test]
fn test_mutate_one_touches_one_interior_slot() {
    let bounds = Bounds::volume(12, 1.0);
    let mut c = Candidate::random(bounds, Some(77));
    for _ in 0..50 {
        let before = c.snapshot();
        c.mutate_one();
        let changed = before
            .iter()
            .zip(c.profile())
            .filter(|(a, b)| a != b)
            .count();
        assert!(changed <= 1);
        assert_eq!(c.profile()[0], 0.0);
        assert_eq!(c.profile()[12], 0.0);
        bounds.check(c.profile()).unwrap();
    }
}

#[test]
fn test_volume_sweep_never_loses_volume() {
    let objective = VolumeScore::new(20, 1.5);
    let bounds = Bounds::volume(20, 1.5);
    let mut c = Candidate::random(bounds, Some(2024));
    let mut last = c.score(&objective);
    for _ in 0..50 {
        c.sweep(&objective);
        let now = c.score(&objective);
        assert!(now >= last - 1e-12, "volume dropped from {} to {}", last, now);
        last = now;
    }
    bounds.check(c.profile()).unwrap();
}

#[test]
fn test_fit_sweeps_never_increase_deviation() {
    let given = vec![0.0, 0.3, 0.9, 0.1, 0.4, 0.2, 0.0];
    let objective = FitScore::new(given);
    let bounds = Bounds::fit(6);
    let mut c = Candidate::random(bounds, Some(8));
    let mut last = c.score(&objective);
    for _ in 0..30 {
        c.sweep(&objective);
        let after_forward = c.score(&objective);
        assert!(after_forward <= last + 1e-12);
        c.sweep_reverse(&objective);
        let after_reverse = c.score(&objective);
        assert!(after_reverse <= after_forward + 1e-12);
        last = after_reverse;
    }
    bounds.check(c.profile()).unwrap();
}

#[test]
fn test_sweep_leaves_exact_fit_untouched() {
    let target = vec![0.0, 0.25, 0.5, 0.25, 0.0];
    let objective = FitScore::new(target.clone());
    let bounds = Bounds::fit(4);
    let mut c = Candidate::from_profile(bounds, target.clone(), Some(4)).unwrap();
    for _ in 0..10 {
        assert_eq!(c.sweep(&objective), 0);
        assert_eq!(c.sweep_reverse(&objective), 0);
    }
    assert_eq!(c.profile(), target.as_slice());
}
