use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tabfold::config::Config;
use tabfold::error::{TabFoldError, TfResult};
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON settings file; flags typed on the command line override it
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Maximize the enclosed volume for a given side length
    Volume(cmd::volume::VolumeArgs),
    /// Fit a feasible profile to a target curve
    Fit(cmd::fit::FitArgs),
    /// Maximize volume for a range of side lengths in parallel
    Scan(cmd::scan::ScanArgs),
}

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// File settings first, then anything the user typed for the subcommand.
fn resolve_config(
    path: Option<&str>,
    cli_config: &Config,
    sub_matches: &ArgMatches,
) -> TfResult<Config> {
    match path {
        Some(path) => {
            info!("📂 Loading settings from {}", path);
            let mut config = Config::load_from_file(path)?;
            config.merge_from_cli(cli_config, sub_matches);
            Ok(config)
        }
        None => Ok(cli_config.clone()),
    }
}

fn execute(cli: Cli, matches: &ArgMatches) -> TfResult<()> {
    let sub_matches = matches
        .subcommand()
        .map(|(_, m)| m)
        .ok_or_else(|| TabFoldError::Config("no subcommand given".to_string()))?;

    let cli_config = match &cli.command {
        Commands::Volume(args) => &args.config,
        Commands::Fit(args) => &args.config,
        Commands::Scan(args) => &args.config,
    };
    let config = resolve_config(cli.config.as_deref(), cli_config, sub_matches)?;

    if config.search.seed.is_none() {
        warn!("No --seed given; results will differ between runs");
    }

    match &cli.command {
        Commands::Volume(args) => cmd::volume::run(args, &config),
        Commands::Fit(args) => cmd::fit::run(args, &config),
        Commands::Scan(args) => cmd::scan::run(args, &config),
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_tracing(cli.debug);

    if let Err(e) = execute(cli, &matches) {
        error!("❌ {}", e);
        process::exit(1);
    }
}
