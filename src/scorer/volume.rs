use super::{Direction, Mode, Objective, Pass, Schedule};
use crate::geometry::Bounds;

/// Enclosed volume of the folded box for a relative side length `lhat`.
///
/// Every adjacent pair `(u0, u1)` contributes a frustum-like slab whose depth is the
/// horizontal run of that segment, `geom = sqrt(1 - (N·du)²)` in units of `1/N`.
#[derive(Debug, Clone)]
pub struct VolumeScore {
    pub segments: usize,
    pub lhat: f64,
    n: f64,
}

impl VolumeScore {
    pub fn new(segments: usize, lhat: f64) -> Self {
        Self {
            segments,
            lhat,
            n: segments as f64,
        }
    }

    /// Horizontal-run factor of one segment; clamps tiny negative radicands to 0.
    #[inline(always)]
    pub fn geom(&self, u0: f64, u1: f64) -> f64 {
        let slope = self.n * (u1 - u0);
        (1.0 - slope * slope).max(0.0).sqrt()
    }

    /// Segment term with constant multipliers dropped.
    #[inline(always)]
    pub fn slot_value(&self, u0: f64, u1: f64) -> f64 {
        (3.0 * (u0 + u1) * self.lhat - 2.0 * (u1 * u1 + u0 * u0 + u0 * u1)) * self.geom(u0, u1)
    }

    pub fn volume(&self, profile: &[f64]) -> f64 {
        let mut val_l = 0.0;
        let mut val_e = 0.0;
        for pair in profile.windows(2) {
            let (u0, u1) = (pair[0], pair[1]);
            let g = self.geom(u0, u1);
            val_l += g * (u0 + u1);
            val_e += g * (u0 * u0 + u0 * u1 + u1 * u1);
        }
        4.0 * (3.0 * self.lhat * val_l - 2.0 * val_e) / (6.0 * self.n)
    }
}

impl Objective for VolumeScore {
    fn mode(&self) -> Mode {
        Mode::Volume
    }

    fn direction(&self) -> Direction {
        Direction::Maximize
    }

    fn schedule(&self) -> Schedule {
        Schedule::Forward
    }

    #[inline(always)]
    fn local_score(
        &self,
        profile: &[f64],
        slot: usize,
        trial: f64,
        _bounds: &Bounds,
        _pass: Pass,
    ) -> f64 {
        self.slot_value(profile[slot - 1], trial) + self.slot_value(trial, profile[slot + 1])
    }

    fn total(&self, profile: &[f64]) -> f64 {
        self.volume(profile)
    }
}
