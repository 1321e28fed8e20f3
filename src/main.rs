use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sejm_transcripts::{
    DataLayout, DirectorySummary, DownloadOptions, PipelineConfig, RollCallConfig, SejmClient,
    SejmConfig, download_all, process_directory, process_term,
};

#[derive(Parser)]
#[command(name = "sejm-transcripts")]
#[command(author, version, about = "Speaker-attributed Sejm transcript reconstruction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct every sitting day found in one proceeding directory
    Process {
        /// Directory holding `{base}_0.html` and its fragments
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Reconstruct every proceeding directory of a term
    Batch {
        /// Term directory whose subdirectories are proceedings
        #[arg(short, long)]
        transcripts: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Retrieve source documents from the Sejm API
    Fetch {
        /// Data root directory
        #[arg(short, long, default_value = "data")]
        data: PathBuf,

        /// Only this term
        #[arg(long)]
        term: Option<u32>,

        /// Also fetch statement lists and per-statement HTML
        #[arg(long)]
        html: bool,

        /// Also fetch the deputies table of each term
        #[arg(long)]
        deputies: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Deputies metadata table (CSV, or TSV by extension)
    #[arg(short, long)]
    deputies: PathBuf,

    /// Output directory for transcripts and metadata
    #[arg(short, long)]
    output: PathBuf,

    /// A fragment is a roll-call only with more declarations than this
    #[arg(long, default_value = "10")]
    roll_call_min_count: usize,

    /// ...and a mean declaration length (characters) below this
    #[arg(long, default_value = "50.0")]
    roll_call_max_mean_len: f64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl CommonArgs {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            roll_call: RollCallConfig {
                min_count_exclusive: self.roll_call_min_count,
                max_mean_len_exclusive: self.roll_call_max_mean_len,
                ..Default::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process { input, common } => {
            setup_logging(common.verbose);
            let summary = process_directory(
                &input,
                &common.deputies,
                &common.output,
                &common.pipeline_config(),
            )?;
            report(&summary);
            Ok(())
        }
        Commands::Batch {
            transcripts,
            common,
        } => {
            setup_logging(common.verbose);
            let summary = process_term(
                &transcripts,
                &common.deputies,
                &common.output,
                &common.pipeline_config(),
            )?;
            report(&summary);
            Ok(())
        }
        Commands::Fetch {
            data,
            term,
            html,
            deputies,
            verbose,
        } => {
            setup_logging(verbose);
            let client = SejmClient::new(SejmConfig::from_env());
            let options = DownloadOptions {
                term,
                with_html: html,
                with_deputies: deputies,
            };
            download_all(&client, &DataLayout::new(data), &options).await?;
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().ok();
}

fn report(summary: &DirectorySummary) {
    for (source, error) in &summary.failures {
        warn!("Failed: {} ({})", source, error);
    }
    info!(
        "Complete: {} sitting day(s), {} blocks, {} failure(s)",
        summary.sessions.len(),
        summary.total_blocks(),
        summary.failures.len()
    );
}
