use crate::scorer::Direction;
use fastrand::Rng;

/// Uniform draw from `[min, max]`; a collapsed interval yields its single point.
#[inline(always)]
pub fn draw_in(rng: &mut Rng, (min, max): (f64, f64)) -> f64 {
    rng.f64() * (max - min) + min
}

/// Probe values for one slot, in the order they are tried:
/// current, interval max, interval min, then two uniform draws.
#[inline(always)]
pub fn trial_values(rng: &mut Rng, current: f64, range: (f64, f64)) -> [f64; 5] {
    let r0 = draw_in(rng, range);
    let r1 = draw_in(rng, range);
    [current, range.1, range.0, r0, r1]
}

/// Returns the first trial that beats the reference (`trials[0]`), or the reference.
///
/// Trials after the winner are never scored, so an expensive `score` only runs as
/// often as needed.
pub fn select_trial<F>(trials: [f64; 5], direction: Direction, mut score: F) -> f64
where
    F: FnMut(f64) -> f64,
{
    let [reference, challengers @ ..] = trials;
    let base = score(reference);
    challengers
        .iter()
        .copied()
        .find(|&trial| direction.is_better(score(trial), base))
        .unwrap_or(reference)
}
