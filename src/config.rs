use crate::error::{TabFoldError, TfResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Shortest target curve the fitter accepts (N >= 3).
pub const MIN_TARGET_POINTS: usize = 4;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub volume: VolumeSettings,
    #[command(flatten)]
    pub fit: FitSettings,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Fixed RNG seed for reproducible runs
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Extra eras to run after the first pause
    #[arg(long, default_value_t = 0)]
    pub more_eras: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            seed: None,
            more_eras: 0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSettings {
    /// Number of segments (N); the profile has N+1 heights
    #[arg(short = 'n', long, default_value_t = 100)]
    pub segments: usize,

    /// Relative length of the side to the unfolded width
    #[arg(short = 'L', long, default_value_t = 1.5)]
    pub lhat: f64,

    /// Sweeps per batch
    #[arg(short = 'g', long = "generations", default_value_t = 100)]
    pub generations: usize,

    /// Batches per era
    #[arg(short = 'e', long = "era", default_value_t = 100)]
    pub era: usize,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            segments: 100,
            lhat: 1.5,
            generations: 100,
            era: 100,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitSettings {
    /// Perturb + forward + reverse passes per batch
    #[arg(long = "fit-generations", default_value_t = 1000)]
    pub fit_generations: usize,

    /// Batches per era
    #[arg(long = "fit-era", default_value_t = 1)]
    pub fit_era: usize,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            fit_generations: 1000,
            fit_era: 1,
        }
    }
}

impl VolumeSettings {
    pub fn validate(&self) -> TfResult<()> {
        if self.segments == 0 {
            return Err(TabFoldError::Config(
                "segments (N) must be at least 1".to_string(),
            ));
        }
        if !self.lhat.is_finite() || self.lhat <= 0.0 {
            return Err(TabFoldError::Config(format!(
                "lhat must be a positive number, got {}",
                self.lhat
            )));
        }
        check_budget(self.generations, self.era)
    }
}

impl FitSettings {
    pub fn validate(&self, given: &[f64]) -> TfResult<()> {
        if given.len() < MIN_TARGET_POINTS {
            return Err(TabFoldError::Validation(format!(
                "target curve needs at least {} points, got {}",
                MIN_TARGET_POINTS,
                given.len()
            )));
        }
        if let Some(i) = given.iter().position(|v| !v.is_finite()) {
            return Err(TabFoldError::Validation(format!(
                "target curve entry {} is not a finite number",
                i
            )));
        }
        check_budget(self.fit_generations, self.fit_era)
    }
}

fn check_budget(generations: usize, era: usize) -> TfResult<()> {
    if generations == 0 {
        return Err(TabFoldError::Config(
            "generations must be at least 1".to_string(),
        ));
    }
    if era == 0 {
        return Err(TabFoldError::Config("era must be at least 1".to_string()));
    }
    Ok(())
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overlays only the flags the user actually typed; file values win over clap defaults.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(search.seed, "seed");
        update_if_present!(search.more_eras, "more_eras");

        update_if_present!(volume.segments, "segments");
        update_if_present!(volume.lhat, "lhat");
        update_if_present!(volume.generations, "generations");
        update_if_present!(volume.era, "era");

        update_if_present!(fit.fit_generations, "fit_generations");
        update_if_present!(fit.fit_era, "fit_era");
    }
}
