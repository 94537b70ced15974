#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unnecessary_wraps)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "refresh")]
#[command(author, version, about = "Inspect React Fast Refresh wiring for a build", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Apply React Fast Refresh to a build config and report the result
    Inspect {
        /// Build config file (JSON)
        config: PathBuf,

        /// Enable refresh even when the build is not in development mode
        #[arg(long)]
        force: bool,

        /// Module path to run through resolution (repeatable)
        #[arg(long = "module", value_name = "PATH")]
        modules: Vec<PathBuf>,

        /// Print the customized module runtime
        #[arg(long)]
        template: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    logging::init(cli.verbose, cli.json);
    tracing::debug!(cwd = %cwd.display(), "refresh starting");

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::Inspect {
            config,
            force,
            modules,
            template,
        }) => commands::inspect::run(
            commands::inspect::InspectAction {
                config,
                cwd,
                force,
                modules,
                template,
            },
            cli.json,
        ),
    }
}
