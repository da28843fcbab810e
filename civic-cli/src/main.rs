use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "civic", about = "Adaptive civic-values assessments")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the assessment HTTP server
    Serve(commands::serve::ServeArgs),
    /// Inspect and validate survey specs
    Spec(commands::spec::SpecArgs),
    /// Run an assessment in-process with scripted answers
    Simulate(commands::simulate::SimulateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await,
        Commands::Spec(args) => commands::spec::run(args),
        Commands::Simulate(args) => commands::simulate::run(args).await,
    }
}
