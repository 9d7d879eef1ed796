pub mod wireframe;

use crate::error::{TabFoldError, TfResult};
use serde::{Deserialize, Serialize};

/// Slack allowed when re-checking invariants of profiles built in floating point.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// Feasibility envelope shared by every profile of one run.
///
/// `step` is the slope bound `1/N`. `upper` is `Lhat` when maximizing volume and
/// `f64::INFINITY` when fitting a target curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub segments: usize,
    pub step: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn volume(segments: usize, lhat: f64) -> Self {
        Self {
            segments,
            step: 1.0 / segments as f64,
            upper: lhat,
        }
    }

    pub fn fit(segments: usize) -> Self {
        Self {
            segments,
            step: 1.0 / segments as f64,
            upper: f64::INFINITY,
        }
    }

    /// Number of heights in a profile (N+1).
    #[inline(always)]
    pub fn points(&self) -> usize {
        self.segments + 1
    }

    /// Interval of legal values for `profile[i]` given its two current neighbours.
    #[inline(always)]
    pub fn feasible_range(&self, profile: &[f64], i: usize) -> (f64, f64) {
        self.range_between(profile[i - 1], profile[i + 1])
    }

    /// Interval of legal values for a slot sitting between `left` and `right`.
    ///
    /// Round-off can push `min` a hair above `max` when both neighbours sit on the
    /// slope bound; the interval then collapses to its midpoint instead of going empty.
    #[inline(always)]
    pub fn range_between(&self, left: f64, right: f64) -> (f64, f64) {
        let min = 0.0f64.max(left - self.step).max(right - self.step);
        let max = self.upper.min(left + self.step).min(right + self.step);
        if min > max {
            let mid = 0.5 * (min + max);
            (mid, mid)
        } else {
            (min, max)
        }
    }

    /// Verifies length, pinned endpoints, slope and value bounds.
    pub fn check(&self, profile: &[f64]) -> TfResult<()> {
        if profile.len() != self.points() {
            return Err(TabFoldError::Validation(format!(
                "profile has {} points, expected {}",
                profile.len(),
                self.points()
            )));
        }
        let last = self.segments;
        if profile[0].abs() > FEASIBILITY_TOLERANCE || profile[last].abs() > FEASIBILITY_TOLERANCE
        {
            return Err(TabFoldError::Validation(
                "profile endpoints must be 0".to_string(),
            ));
        }
        for (i, &u) in profile.iter().enumerate() {
            if !u.is_finite() || u < -FEASIBILITY_TOLERANCE {
                return Err(TabFoldError::Validation(format!(
                    "height {} at index {} is below 0",
                    u, i
                )));
            }
            if u > self.upper + FEASIBILITY_TOLERANCE {
                return Err(TabFoldError::Validation(format!(
                    "height {} at index {} exceeds the upper bound {}",
                    u, i, self.upper
                )));
            }
        }
        for (i, pair) in profile.windows(2).enumerate() {
            let slope = (pair[1] - pair[0]).abs();
            if slope > self.step + FEASIBILITY_TOLERANCE {
                return Err(TabFoldError::Validation(format!(
                    "step {} -> {} changes by {:.6}, more than 1/N = {:.6}",
                    i,
                    i + 1,
                    slope,
                    self.step
                )));
            }
        }
        Ok(())
    }
}

/// Unfolded coordinate `s = i/N` of every profile point.
pub fn flat_xs(segments: usize) -> Vec<f64> {
    (0..=segments)
        .map(|i| i as f64 / segments as f64)
        .collect()
}

/// Horizontal coordinate of every point once the strip is folded.
///
/// Each segment has unit-over-N length, so its horizontal run is what is left after
/// the vertical change. The whole curve is then centred on a unit-wide base.
pub fn folded_xs(profile: &[f64]) -> Vec<f64> {
    if profile.len() < 2 {
        return vec![0.5; profile.len()];
    }
    let segments = profile.len() - 1;
    let step_sq = 1.0 / (segments * segments) as f64;

    let mut xs = Vec::with_capacity(profile.len());
    let mut sum = 0.0;
    xs.push(0.0);
    for pair in profile.windows(2) {
        let du = pair[1] - pair[0];
        sum += (step_sq - du * du).max(0.0).sqrt();
        xs.push(sum);
    }

    let shift = (1.0 - sum) / 2.0;
    for x in xs.iter_mut() {
        *x += shift;
    }
    xs
}
