mod collect;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

#[derive(Debug, Parser)]
#[command(name = "fplab-cli")]
#[command(about = "Collect fingerprint signals and submit them to an fplab server")]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "FPLAB_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one collection pass and record the result.
    Collect(CollectArgs),
    /// Bump the behaviour counter stored for this environment's canvas hash.
    Behaviour(BehaviourArgs),
}

#[derive(Debug, Args)]
struct TimingArgs {
    /// Delay after the start of a pass before its behaviour key is read.
    #[arg(long)]
    settle_delay_ms: Option<u64>,

    /// Budget for each bounded-async collector.
    #[arg(long)]
    bounded_timeout_ms: Option<u64>,
}

#[derive(Debug, Args)]
struct CollectArgs {
    /// Browser name reported in the run config.
    #[arg(long)]
    browser: String,

    #[arg(long)]
    privacy_max: bool,

    #[arg(long)]
    incognito: bool,

    /// Installed extension (file name or path). Repeatable.
    #[arg(long = "extension")]
    extensions: Vec<String>,

    /// Ingestion server. When omitted the record is only written to `--output`.
    #[arg(long, env = "FPLAB_SERVER_URL")]
    server: Option<String>,

    #[arg(long, default_value = "page_body.json")]
    output: PathBuf,

    /// Fail the command when the server does not accept the record.
    #[arg(long)]
    require_delivery: bool,

    #[command(flatten)]
    timing: TimingArgs,
}

#[derive(Debug, Args)]
struct BehaviourArgs {
    #[arg(long, env = "FPLAB_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Amount added to the stored counter.
    #[arg(long, default_value_t = 1)]
    bump: i64,

    #[arg(long)]
    require_delivery: bool,

    #[command(flatten)]
    timing: TimingArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Collect(args) => collect::run_collect(&args).await,
        Commands::Behaviour(args) => collect::run_behaviour(&args).await,
    }
}

#[cfg(test)]
mod tests;
