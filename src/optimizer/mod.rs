pub mod mutation;
pub mod runner;
pub mod worker;

pub use self::runner::{BatchReport, DriverState, Optimizer, ProgressCallback};

use crate::error::TfResult;
use crate::geometry::Bounds;
use crate::scorer::{Objective, Pass};

/// The single working profile of a run.
///
/// Endpoints are seeded at 0 and no mutator ever writes index 0 or N, so they
/// stay pinned for the candidate's whole life.
pub struct Candidate {
    profile: Vec<f64>,
    pub bounds: Bounds,
    pub rng: fastrand::Rng,
}

impl Candidate {
    /// All-zero profile; call [`randomize`](Self::randomize) before searching.
    pub fn new(bounds: Bounds, seed: Option<u64>) -> Self {
        let rng = if let Some(s) = seed {
            fastrand::Rng::with_seed(s)
        } else {
            fastrand::Rng::new()
        };

        Self {
            profile: vec![0.0; bounds.points()],
            bounds,
            rng,
        }
    }

    pub fn random(bounds: Bounds, seed: Option<u64>) -> Self {
        let mut c = Self::new(bounds, seed);
        c.randomize();
        c
    }

    /// Adopts a caller-supplied profile after checking every invariant.
    pub fn from_profile(bounds: Bounds, profile: Vec<f64>, seed: Option<u64>) -> TfResult<Self> {
        bounds.check(&profile)?;
        let mut c = Self::new(bounds, seed);
        c.profile = profile;
        let last = bounds.segments;
        c.profile[0] = 0.0;
        c.profile[last] = 0.0;
        Ok(c)
    }

    pub fn profile(&self) -> &[f64] {
        &self.profile
    }

    /// Owned copy for consumers outside the search.
    pub fn snapshot(&self) -> Vec<f64> {
        self.profile.clone()
    }

    #[inline(always)]
    fn interior(&self) -> std::ops::Range<usize> {
        1..self.bounds.segments
    }

    /// Redraws every interior slot in ascending order.
    ///
    /// Each draw sees the value just drawn to its left, so the result is one
    /// feasible profile, not a uniform sample of the feasible set.
    pub fn randomize(&mut self) {
        for i in self.interior() {
            self.mutate_slot(i);
        }
    }

    /// Redraws slot `i` uniformly inside its current feasible interval.
    pub fn mutate_slot(&mut self, i: usize) {
        let range = self.bounds.feasible_range(&self.profile, i);
        self.profile[i] = mutation::draw_in(&mut self.rng, range);
    }

    /// Redraws one interior slot chosen at random. No-op when N < 2.
    pub fn mutate_one(&mut self) {
        if self.bounds.segments < 2 {
            return;
        }
        let slots = self.interior();
        let i = self.rng.usize(slots);
        self.mutate_slot(i);
    }

    /// Greedy improvement of slot `i`: keeps the first of max, min or two random draws
    /// that beats the current value's local score. Returns whether the slot moved.
    pub fn improve_slot<O>(&mut self, i: usize, objective: &O, pass: Pass) -> bool
    where
        O: Objective + ?Sized,
    {
        let range = self.bounds.feasible_range(&self.profile, i);
        let current = self.profile[i];
        let trials = mutation::trial_values(&mut self.rng, current, range);

        let profile = &self.profile;
        let bounds = &self.bounds;
        let chosen = mutation::select_trial(trials, objective.direction(), |v| {
            objective.local_score(profile, i, v, bounds, pass)
        });

        if chosen != current {
            self.profile[i] = chosen;
            true
        } else {
            false
        }
    }

    /// One generation: `improve_slot` for i = 1..N-1. Returns the number of moved slots.
    pub fn sweep<O>(&mut self, objective: &O) -> usize
    where
        O: Objective + ?Sized,
    {
        let mut moved = 0;
        for i in self.interior() {
            if self.improve_slot(i, objective, Pass::Forward) {
                moved += 1;
            }
        }
        moved
    }

    /// Same as [`sweep`](Self::sweep) but from N-1 down to 1, scoring towards index 0.
    pub fn sweep_reverse<O>(&mut self, objective: &O) -> usize
    where
        O: Objective + ?Sized,
    {
        let mut moved = 0;
        for i in self.interior().rev() {
            if self.improve_slot(i, objective, Pass::Reverse) {
                moved += 1;
            }
        }
        moved
    }

    pub fn score<O>(&self, objective: &O) -> f64
    where
        O: Objective + ?Sized,
    {
        objective.total(&self.profile)
    }
}
