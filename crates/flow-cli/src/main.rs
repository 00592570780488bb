//! flowcfg
//!
//! Resolves design configurations against their PDK and prints the final
//! values, the file metadata, or the variable reference.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{CliError, Result};

const DEFAULT_FILTER: &str = "flowcfg=info,flow_config=info";
const VERBOSE_FILTER: &str = "flowcfg=debug,flow_config=debug,flow_vars=debug";

fn main() {
    if let Err(e) = run() {
        report(&e);
        std::process::exit(1);
    }
}

fn report(error: &CliError) {
    match error.as_invalid() {
        Some(invalid) => {
            for warning in &invalid.warnings {
                eprintln!("{}: {}", "warning".yellow().bold(), warning);
            }
            eprintln!(
                "{}: The following errors were encountered in the {}:",
                "error".red().bold(),
                invalid.layer
            );
            for err in &invalid.errors {
                eprintln!("  {} {}", "*".red(), err);
            }
        }
        None => eprintln!("{}: {}", "error".red().bold(), error),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
    tracing::debug!("Verbose mode enabled");
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} flow configuration resolver", "flowcfg".green().bold());
            println!();
            println!("Run {} for available commands.", "flowcfg --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Resolve {
            config,
            pdk,
            overrides,
            format,
            output,
        } => commands::run_resolve(&config, &pdk, &overrides, format, output.as_deref()),
        Commands::Meta { config, flow } => commands::run_meta(&config, flow.as_deref()),
        Commands::Interactive {
            design_name,
            pdk,
            overrides,
            format,
        } => commands::run_interactive(&design_name, &pdk, &overrides, format),
        Commands::Vars { pdk_only } => {
            commands::run_vars(pdk_only);
            Ok(())
        }
    }
}
