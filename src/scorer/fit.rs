use super::{Direction, Mode, Objective, Pass, Schedule};
use crate::geometry::Bounds;

/// Squared deviation from a fixed target curve.
///
/// A trial value is scored together with everything it forces downstream: each
/// following slot is clamped into the window left by its (possibly moved)
/// predecessor, so the score reflects a profile that is feasible past the change.
#[derive(Debug, Clone)]
pub struct FitScore {
    given: Vec<f64>,
}

/// Pulls `value` into `[lo, hi]`, testing the lower edge first.
#[inline(always)]
fn clamp_into(value: f64, lo: f64, hi: f64) -> f64 {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

impl FitScore {
    pub fn new(given: Vec<f64>) -> Self {
        Self { given }
    }

    pub fn given(&self) -> &[f64] {
        &self.given
    }

    pub fn segments(&self) -> usize {
        self.given.len().saturating_sub(1)
    }

    /// Sets `profile[slot] = trial` and walks towards index N.
    pub fn propagate_forward(
        &self,
        profile: &[f64],
        slot: usize,
        trial: f64,
        bounds: &Bounds,
    ) -> f64 {
        let last = profile.len() - 1;
        let mut prev = profile[slot - 1];
        let mut current = trial;
        let mut sum = 0.0;
        for ss in slot..last {
            let next = profile[ss + 1];
            let lo = 0.0f64.max(prev - bounds.step).max(next - bounds.step);
            let hi = bounds.upper.min(prev + bounds.step).min(next + bounds.step);
            current = clamp_into(current, lo, hi);
            let diff = current - self.given[ss];
            sum += diff * diff;
            prev = current;
            current = next;
        }
        sum
    }

    /// Mirror of [`propagate_forward`](Self::propagate_forward), walking towards index 0.
    pub fn propagate_reverse(
        &self,
        profile: &[f64],
        slot: usize,
        trial: f64,
        bounds: &Bounds,
    ) -> f64 {
        let mut prev = profile[slot + 1];
        let mut current = trial;
        let mut sum = 0.0;
        for ss in (1..=slot).rev() {
            let next = profile[ss - 1];
            let lo = 0.0f64.max(prev - bounds.step).max(next - bounds.step);
            let hi = bounds.upper.min(prev + bounds.step).min(next + bounds.step);
            current = clamp_into(current, lo, hi);
            let diff = current - self.given[ss];
            sum += diff * diff;
            prev = current;
            current = next;
        }
        sum
    }

    pub fn deviation(&self, profile: &[f64]) -> f64 {
        profile
            .iter()
            .zip(&self.given)
            .map(|(u, g)| (u - g) * (u - g))
            .sum()
    }
}

impl Objective for FitScore {
    fn mode(&self) -> Mode {
        Mode::Fit
    }

    fn direction(&self) -> Direction {
        Direction::Minimize
    }

    fn schedule(&self) -> Schedule {
        Schedule::ShakeBothWays
    }

    fn local_score(
        &self,
        profile: &[f64],
        slot: usize,
        trial: f64,
        bounds: &Bounds,
        pass: Pass,
    ) -> f64 {
        match pass {
            Pass::Forward => self.propagate_forward(profile, slot, trial, bounds),
            Pass::Reverse => self.propagate_reverse(profile, slot, trial, bounds),
        }
    }

    fn total(&self, profile: &[f64]) -> f64 {
        self.deviation(profile)
    }
}
