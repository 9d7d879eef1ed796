use crate::config::{FitSettings, SearchParams, VolumeSettings};
use crate::error::TfResult;
use crate::geometry::folded_xs;
use crate::optimizer::{BatchReport, Optimizer, ProgressCallback};
use crate::scorer::Mode;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Final state of a finished search, ready for reports and export.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    pub mode: Mode,
    pub segments: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lhat: Option<f64>,
    pub score: f64,
    pub profile: Vec<f64>,
    pub xs: Vec<f64>,
    pub generations: usize,
}

impl SolveReport {
    fn from_batch(optimizer: &Optimizer, lhat: Option<f64>, batch: BatchReport) -> Self {
        Self {
            mode: optimizer.objective().mode(),
            segments: optimizer.bounds().segments,
            lhat,
            score: batch.score,
            xs: folded_xs(&batch.profile),
            profile: batch.profile,
            generations: batch.generations,
        }
    }
}

/// Runs the first era, then `more_eras` extensions of the same length.
fn drive<CB>(
    optimizer: &mut Optimizer,
    params: &SearchParams,
    callback: &CB,
) -> TfResult<BatchReport>
where
    CB: ProgressCallback + ?Sized,
{
    let era = optimizer.era();
    optimizer.start(params.seed);
    let mut last = optimizer.run_era(callback)?;

    for _ in 0..params.more_eras {
        if !last.paused {
            break;
        }
        optimizer.extend(era)?;
        last = optimizer.run_era(callback)?;
    }
    Ok(last)
}

pub fn solve_volume(settings: &VolumeSettings, params: &SearchParams) -> TfResult<SolveReport> {
    solve_volume_with(settings, params, &|_: &BatchReport| true)
}

/// [`solve_volume`] with a per-batch callback; returning false stops early.
pub fn solve_volume_with<CB>(
    settings: &VolumeSettings,
    params: &SearchParams,
    callback: &CB,
) -> TfResult<SolveReport>
where
    CB: ProgressCallback + ?Sized,
{
    let mut optimizer = Optimizer::volume(settings)?;
    let last = drive(&mut optimizer, params, callback)?;
    info!(
        "Volume search done: N={}, Lhat={}, volume {:.6}",
        settings.segments, settings.lhat, last.score
    );
    Ok(SolveReport::from_batch(&optimizer, Some(settings.lhat), last))
}

pub fn fit_curve(
    settings: &FitSettings,
    given: Vec<f64>,
    params: &SearchParams,
) -> TfResult<SolveReport> {
    fit_curve_with(settings, given, params, &|_: &BatchReport| true)
}

pub fn fit_curve_with<CB>(
    settings: &FitSettings,
    given: Vec<f64>,
    params: &SearchParams,
    callback: &CB,
) -> TfResult<SolveReport>
where
    CB: ProgressCallback + ?Sized,
{
    let mut optimizer = Optimizer::fit(settings, given)?;
    let last = drive(&mut optimizer, params, callback)?;
    info!(
        "Fit done: N={}, deviation {:.6}",
        optimizer.bounds().segments,
        last.score
    );
    Ok(SolveReport::from_batch(&optimizer, None, last))
}

/// One independent volume search per `lhat`, run in parallel.
///
/// Reports come back in the order of `lhats`. With a fixed seed, run `i` uses `seed + i`,
/// wrapping at `u64::MAX`.
pub fn scan_lengths(
    base: &VolumeSettings,
    lhats: &[f64],
    params: &SearchParams,
) -> TfResult<Vec<SolveReport>> {
    lhats
        .par_iter()
        .enumerate()
        .map(|(i, &lhat)| {
            let settings = VolumeSettings {
                lhat,
                ..base.clone()
            };
            let run_params = SearchParams {
                seed: params.seed.map(|s| s.wrapping_add(i as u64)),
                ..params.clone()
            };
            solve_volume(&settings, &run_params)
        })
        .collect()
}

/// `steps` evenly spaced values from `from` to `to`, both included.
pub fn lhat_range(from: f64, to: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![from],
        _ => (0..steps)
            .map(|i| from + (to - from) * i as f64 / (steps - 1) as f64)
            .collect(),
    }
}
