mod analyze;
mod cards;
mod locator;
mod session;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "solarmap")]
#[command(about = "Estimate the rooftop solar potential of a location")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze one location and print the result cards
    Analyze(AnalyzeArgs),
    /// Analyze one location and print the full text report
    Report(ReportArgs),
    /// Interactive session: search, click, adjust parameters and export
    Session {
        /// Seed for reproducible estimates
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Inputs shared by every one-shot estimate.
#[derive(Debug, Args)]
pub(crate) struct EstimateArgs {
    /// Address, place name, or a "lat, lng" pair
    #[arg(allow_hyphen_values = true)]
    pub(crate) query: String,
    /// Panel efficiency in percent (15-25)
    #[arg(long)]
    pub(crate) efficiency: Option<f64>,
    /// System losses in percent (10-20)
    #[arg(long)]
    pub(crate) loss: Option<f64>,
    /// Electricity rate per kWh (0.08-0.30)
    #[arg(long)]
    pub(crate) rate: Option<f64>,
    /// Seed for reproducible estimates
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Skip the processing delay
    #[arg(long)]
    pub(crate) no_delay: bool,
}

#[derive(Debug, Args)]
pub(crate) struct AnalyzeArgs {
    #[command(flatten)]
    pub(crate) estimate: EstimateArgs,
    /// Print the metrics as JSON instead of cards
    #[arg(long)]
    pub(crate) json: bool,
    /// Render the cards with the dark palette
    #[arg(long)]
    pub(crate) dark: bool,
    /// Also write the text report into SOLARMAP_REPORT_DIR
    #[arg(long)]
    pub(crate) export: bool,
}

#[derive(Debug, Args)]
pub(crate) struct ReportArgs {
    #[command(flatten)]
    pub(crate) estimate: EstimateArgs,
    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub(crate) save: bool,
    /// Directory for --save (defaults to SOLARMAP_REPORT_DIR)
    #[arg(long, requires = "save")]
    pub(crate) out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = solarmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Some(Commands::Analyze(args)) => analyze::run_analyze(&config, &args).await,
        Some(Commands::Report(args)) => analyze::run_report(&config, &args).await,
        Some(Commands::Session { seed }) => session::run_session(&config, seed).await,
        None => session::run_session(&config, None).await,
    }
}
