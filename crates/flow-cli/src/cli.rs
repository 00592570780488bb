//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// flowcfg - Resolve design flow configurations against a PDK
#[derive(Parser, Debug)]
#[command(name = "flowcfg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output encodings for a resolved configuration
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Markdown,
}

/// Options shared by every command that needs a PDK
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PdkArgs {
    /// The PDK to use, overriding the configuration's PDK key
    #[arg(long)]
    pub pdk: Option<String>,

    /// The directory containing the PDK
    #[arg(long)]
    pub pdk_root: Option<PathBuf>,

    /// The standard cell library, overriding the PDK's default
    #[arg(long)]
    pub scl: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve a design configuration and print the final values
    ///
    /// Examples:
    ///   flowcfg resolve config.json --pdk-root ~/.volare
    ///   flowcfg resolve config.yaml -c CLOCK_PERIOD=25 --format yaml
    ///   flowcfg resolve config.tcl --pdk sky130A --scl sky130_fd_sc_hs
    Resolve {
        /// Path to a .json, .yaml, .yml or .tcl configuration file
        config: PathBuf,

        #[command(flatten)]
        pdk: PdkArgs,

        /// Override a value, as NAME=VALUE
        #[arg(short = 'c', long = "config-override", value_name = "NAME=VALUE")]
        overrides: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the metadata of a configuration file
    Meta {
        /// Path to a configuration file
        config: PathBuf,

        /// Replace the flow selection
        #[arg(long)]
        flow: Option<String>,
    },

    /// Build a configuration from the PDK and the flow defaults
    Interactive {
        /// Name of the top level module
        #[arg(long)]
        design_name: String,

        #[command(flatten)]
        pdk: PdkArgs,

        /// Set a value, as NAME=VALUE
        #[arg(short = 'c', long = "config-override", value_name = "NAME=VALUE")]
        overrides: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Print the variable reference as a markdown table
    Vars {
        /// Only list the variables the PDK provides
        #[arg(long)]
        pdk_only: bool,
    },
}
