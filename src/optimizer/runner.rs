use crate::config::{FitSettings, VolumeSettings};
use crate::error::{TabFoldError, TfResult};
use crate::geometry::Bounds;
use crate::optimizer::Candidate;
use crate::scorer::{FitScore, Objective, Schedule, VolumeScore};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum DriverState {
    Idle,
    Seeded,
    Running,
    Paused,
}

/// Snapshot emitted after every batch. The profile is a copy, never a view into
/// the candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub seq: u64,
    pub score: f64,
    pub profile: Vec<f64>,
    pub era_counter: usize,
    pub era: usize,
    pub generations: usize,
    pub paused: bool,
}

/// A trait for receiving updates during an era.
/// Boolean return value indicates if the search should continue (true) or stop (false).
pub trait ProgressCallback: Send + Sync {
    fn on_batch(&self, report: &BatchReport) -> bool;
}

impl<F> ProgressCallback for F
where
    F: Fn(&BatchReport) -> bool + Send + Sync,
{
    fn on_batch(&self, report: &BatchReport) -> bool {
        self(report)
    }
}

/// Single-candidate local search driven in batches of `generations` sweeps.
///
/// Every restart allocates a new `seq`; results tagged with an older one are stale.
pub struct Optimizer {
    objective: Box<dyn Objective>,
    bounds: Bounds,
    generations: usize,
    era: usize,
    era_counter: usize,
    seq: u64,
    state: DriverState,
    candidate: Option<Candidate>,
}

impl Optimizer {
    pub fn new(
        objective: Box<dyn Objective>,
        bounds: Bounds,
        generations: usize,
        era: usize,
    ) -> Self {
        Self {
            objective,
            bounds,
            generations,
            era,
            era_counter: 0,
            seq: 0,
            state: DriverState::Idle,
            candidate: None,
        }
    }

    /// Volume maximizer; rejects the settings before anything is allocated.
    pub fn volume(settings: &VolumeSettings) -> TfResult<Self> {
        settings.validate()?;
        Ok(Self::new(
            Box::new(VolumeScore::new(settings.segments, settings.lhat)),
            Bounds::volume(settings.segments, settings.lhat),
            settings.generations,
            settings.era,
        ))
    }

    /// Target-curve fitter with N = `given.len() - 1`.
    pub fn fit(settings: &FitSettings, given: Vec<f64>) -> TfResult<Self> {
        settings.validate(&given)?;
        let segments = given.len() - 1;
        Ok(Self::new(
            Box::new(FitScore::new(given)),
            Bounds::fit(segments),
            settings.fit_generations,
            settings.fit_era,
        ))
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn era(&self) -> usize {
        self.era
    }

    pub fn era_counter(&self) -> usize {
        self.era_counter
    }

    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn objective(&self) -> &dyn Objective {
        self.objective.as_ref()
    }

    pub fn candidate(&self) -> Option<&Candidate> {
        self.candidate.as_ref()
    }

    /// Fresh random candidate under the next token.
    pub fn start(&mut self, seed: Option<u64>) -> u64 {
        self.restart(self.seq + 1, seed)
    }

    /// Fresh random candidate under a caller-chosen token.
    pub fn restart(&mut self, seq: u64, seed: Option<u64>) -> u64 {
        self.candidate = Some(Candidate::random(self.bounds, seed));
        self.begin(seq)
    }

    /// Starts from a caller-supplied feasible profile instead of a random one.
    pub fn seed_profile(&mut self, profile: Vec<f64>, seed: Option<u64>) -> TfResult<u64> {
        let candidate = Candidate::from_profile(self.bounds, profile, seed)?;
        self.candidate = Some(candidate);
        Ok(self.begin(self.seq + 1))
    }

    fn begin(&mut self, seq: u64) -> u64 {
        self.seq = seq;
        self.era_counter = 0;
        self.state = DriverState::Seeded;
        info!(
            "Search #{} started: {} mode, N={}, {} generations x {} batches",
            seq,
            self.objective.mode(),
            self.bounds.segments,
            self.generations,
            self.era
        );
        seq
    }

    /// Re-tags the current candidate; later reports carry `seq`.
    pub fn set_seq(&mut self, seq: u64) {
        self.seq = seq;
    }

    /// Runs exactly `generations` generations and reports the result.
    pub fn run_batch(&mut self) -> TfResult<BatchReport> {
        match self.state {
            DriverState::Idle => {
                return Err(TabFoldError::Search(
                    "no candidate yet; call start first".to_string(),
                ))
            }
            DriverState::Paused => {
                return Err(TabFoldError::Search(
                    "era budget exhausted; extend it to continue".to_string(),
                ))
            }
            DriverState::Seeded | DriverState::Running => {}
        }

        let candidate = self
            .candidate
            .as_mut()
            .ok_or_else(|| TabFoldError::Search("running without a candidate".to_string()))?;
        let objective = self.objective.as_ref();

        match objective.schedule() {
            Schedule::Forward => {
                for _ in 0..self.generations {
                    candidate.sweep(objective);
                }
            }
            Schedule::ShakeBothWays => {
                for _ in 0..self.generations {
                    candidate.mutate_one();
                    candidate.sweep(objective);
                    candidate.sweep_reverse(objective);
                }
            }
        }

        self.era_counter += 1;
        let paused = self.era_counter >= self.era;
        self.state = if paused {
            DriverState::Paused
        } else {
            DriverState::Running
        };

        let report = BatchReport {
            seq: self.seq,
            score: candidate.score(objective),
            profile: candidate.snapshot(),
            era_counter: self.era_counter,
            era: self.era,
            generations: self.era_counter * self.generations,
            paused,
        };

        debug!(
            "Search #{} batch {}/{} | score {:.6}",
            report.seq, report.era_counter, report.era, report.score
        );
        if paused {
            info!(
                "Search #{} paused after {} generations (score {:.6})",
                report.seq, report.generations, report.score
            );
        }
        Ok(report)
    }

    /// Grants `increment` more batches without touching the candidate.
    pub fn extend(&mut self, increment: usize) -> TfResult<()> {
        if self.state == DriverState::Idle {
            return Err(TabFoldError::Search(
                "nothing to extend; call start first".to_string(),
            ));
        }
        self.era += increment;
        if self.state == DriverState::Paused && self.era_counter < self.era {
            self.state = DriverState::Running;
        }
        info!("Search #{} extended to {} batches", self.seq, self.era);
        Ok(())
    }

    /// Runs batches until the era budget is spent or the callback asks to stop.
    pub fn run_era<CB>(&mut self, callback: &CB) -> TfResult<BatchReport>
    where
        CB: ProgressCallback + ?Sized,
    {
        loop {
            let report = self.run_batch()?;
            let keep_going = callback.on_batch(&report);
            if report.paused || !keep_going {
                return Ok(report);
            }
        }
    }
}
