use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use strum_macros::{Display, EnumIter, EnumString};

/// Built-in target curves for the fitter, all symmetric about `s = 1/2`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TargetShape {
    Triangle,
    /// Trapezoid: ramps over the outer quarters, flat in the middle half.
    Plateau,
    Semicircle,
    Sine,
    Parabola,
}

impl TargetShape {
    /// Unit-height value at `t` in `[0, 1]`.
    pub fn unit(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            TargetShape::Triangle => 1.0 - (2.0 * t - 1.0).abs(),
            TargetShape::Plateau => (4.0 * t.min(1.0 - t)).min(1.0),
            TargetShape::Semicircle => {
                let c = 2.0 * t - 1.0;
                (1.0 - c * c).max(0.0).sqrt()
            }
            TargetShape::Sine => (PI * t).sin(),
            TargetShape::Parabola => 4.0 * t * (1.0 - t),
        }
    }

    /// `segments + 1` samples scaled to `height`, endpoints exactly 0.
    pub fn sample(self, segments: usize, height: f64) -> Vec<f64> {
        if segments == 0 {
            return vec![0.0];
        }
        let mut curve: Vec<f64> = (0..=segments)
            .map(|i| height * self.unit(i as f64 / segments as f64))
            .collect();
        curve[0] = 0.0;
        curve[segments] = 0.0;
        curve
    }
}
