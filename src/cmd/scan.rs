use crate::reports;
use clap::Args;
use tabfold::api;
use tabfold::config::Config;
use tabfold::error::{TabFoldError, TfResult};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(long, default_value_t = 0.5)]
    pub lhat_from: f64,

    #[arg(long, default_value_t = 2.0)]
    pub lhat_to: f64,

    /// Number of Lhat values, ends included
    #[arg(long, default_value_t = 4)]
    pub steps: usize,
}

pub fn run(args: &ScanArgs, config: &Config) -> TfResult<()> {
    if args.steps == 0 {
        return Err(TabFoldError::Config("steps must be at least 1".to_string()));
    }
    let lhats = api::lhat_range(args.lhat_from, args.lhat_to, args.steps);
    info!(
        "🔥 Scanning {} lengths from {} to {} on {} threads",
        lhats.len(),
        args.lhat_from,
        args.lhat_to,
        rayon::current_num_threads()
    );

    let reports = api::scan_lengths(&config.volume, &lhats, &config.search)?;
    reports::print_scan(&reports);
    Ok(())
}
