pub mod fit;
pub mod volume;

pub use self::fit::FitScore;
pub use self::volume::VolumeScore;

use crate::geometry::Bounds;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Which way a score improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Maximize,
    Minimize,
}

impl Direction {
    /// Strict comparison: equal scores never count as an improvement.
    #[inline(always)]
    pub fn is_better(self, candidate: f64, reference: f64) -> bool {
        match self {
            Direction::Maximize => candidate > reference,
            Direction::Minimize => candidate < reference,
        }
    }
}

/// Side of the profile a sweep walks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Forward,
    Reverse,
}

/// Work done by one generation inside a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Schedule {
    /// One ascending sweep.
    Forward,
    /// Re-randomize one interior slot, then an ascending and a descending sweep.
    ShakeBothWays,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Volume,
    Fit,
}

/// A scoring strategy plugged into the local search.
///
/// `local_score` ranks trial values for one slot and is only comparable against
/// other trials for the same slot; `total` is the figure reported to callers.
pub trait Objective: Send + Sync {
    fn mode(&self) -> Mode;

    fn direction(&self) -> Direction;

    fn schedule(&self) -> Schedule;

    fn local_score(
        &self,
        profile: &[f64],
        slot: usize,
        trial: f64,
        bounds: &Bounds,
        pass: Pass,
    ) -> f64;

    fn total(&self, profile: &[f64]) -> f64;
}
