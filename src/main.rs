use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, error};

use pkg_scripts::cli;

/// Register and inspect package-provided scripts
#[derive(Parser)]
#[command(name = "pkg-scripts")]
#[command(about = "Register and inspect package-provided scripts", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the project metadata file
    #[arg(short = 'p', long, global = true, default_value = "project.json")]
    project: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available package scripts
    List,
    /// Dump compiled scripts (including root package scripts)
    Dump {
        /// Dump script variables instead
        #[arg(long)]
        vars: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .init();

    debug!("pkg-scripts started with verbosity level: {}", cli.verbose);

    let result = match cli.command {
        Commands::List => cli::run_list(&cli.project, cli.verbose >= 1),
        Commands::Dump { vars } => cli::run_dump(&cli.project, vars),
    };

    if let Err(err) = result {
        error!("{err:#}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
