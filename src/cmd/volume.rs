use crate::reports;
use clap::Args;
use std::fs::{self, File};
use std::path::PathBuf;
use tabfold::api;
use tabfold::config::Config;
use tabfold::error::TfResult;
use tabfold::geometry::wireframe::{self, View};
use tabfold::io;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct VolumeArgs {
    #[command(flatten)]
    pub config: Config,

    /// Write the profile and run parameters to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write renderer draw commands for the folded box to this JSON file
    #[arg(long)]
    pub wireframe: Option<PathBuf>,

    #[arg(long, default_value = "full")]
    pub view: View,

    /// Cross-section lines drawn across the box
    #[arg(long, default_value_t = 30)]
    pub rungs: usize,

    /// Half of the box length used for the drawing
    #[arg(long, default_value_t = 0.7)]
    pub half_length: f64,
}

pub fn run(args: &VolumeArgs, config: &Config) -> TfResult<()> {
    info!(
        "📦 Maximizing volume: N={}, Lhat={}, {} generations x {} batches",
        config.volume.segments, config.volume.lhat, config.volume.generations, config.volume.era
    );

    let report = api::solve_volume(&config.volume, &config.search)?;

    reports::print_summary(&report);
    reports::print_profile(&report, 10);

    if let Some(path) = &args.csv {
        io::write_csv(File::create(path)?, &report)?;
        info!("💾 Saved profile to {}", path.display());
    }

    if let Some(path) = &args.wireframe {
        let frame = wireframe::build(args.view, &report.profile, args.half_length, args.rungs);
        fs::write(path, serde_json::to_string_pretty(&frame)?)?;
        info!(
            "🧊 Saved {} wireframe ({} lines) to {}",
            args.view,
            frame.line_count(),
            path.display()
        );
    }

    Ok(())
}
