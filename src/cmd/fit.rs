use crate::reports;
use clap::Args;
use std::fs::File;
use std::path::PathBuf;
use tabfold::api;
use tabfold::config::Config;
use tabfold::error::TfResult;
use tabfold::io::{self, spreadsheet};
use tabfold::shapes::TargetShape;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub config: Config,

    /// Read the target curve from a CSV or space-separated file
    #[arg(long)]
    pub from_csv: Option<PathBuf>,

    /// Zero-based column holding f(s)
    #[arg(long, default_value_t = 0)]
    pub column: usize,

    /// Treat rows as columns before picking one
    #[arg(long, default_value_t = false)]
    pub transpose: bool,

    /// Resample the loaded curve onto --segments + 1 points
    #[arg(long, default_value_t = false)]
    pub resample: bool,

    /// Built-in target when no file is given
    #[arg(long, default_value = "triangle")]
    pub shape: TargetShape,

    #[arg(long, default_value_t = 0.3)]
    pub height: f64,

    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write only the s,x,f(s) columns
    #[arg(long, default_value_t = false)]
    pub plain: bool,
}

fn target_curve(args: &FitArgs, config: &Config) -> TfResult<Vec<f64>> {
    let segments = config.volume.segments;
    match &args.from_csv {
        Some(path) => {
            info!("📂 Loading target from {} (column {})", path.display(), args.column);
            let values = spreadsheet::load_target(path, args.column, args.transpose)?;
            if args.resample {
                spreadsheet::resample(&values, segments)
            } else {
                Ok(values)
            }
        }
        None => {
            info!(
                "📐 Using built-in {} target, height {}, N={}",
                args.shape, args.height, segments
            );
            Ok(args.shape.sample(segments, args.height))
        }
    }
}

pub fn run(args: &FitArgs, config: &Config) -> TfResult<()> {
    let given = target_curve(args, config)?;
    info!(
        "🎯 Fitting {} points: {} generations x {} batches",
        given.len(),
        config.fit.fit_generations,
        config.fit.fit_era
    );

    let report = api::fit_curve(&config.fit, given, &config.search)?;

    reports::print_summary(&report);
    reports::print_profile(&report, 10);

    if let Some(path) = &args.csv {
        let file = File::create(path)?;
        if args.plain {
            io::write_plain_csv(file, &report.profile)?;
        } else {
            io::write_csv(file, &report)?;
        }
        info!("💾 Saved profile to {}", path.display());
    }
    Ok(())
}
