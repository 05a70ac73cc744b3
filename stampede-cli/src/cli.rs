//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stampede", author, version, about = "Synthetic load and health monitoring for contest platforms", long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// RNG seed; a fixed seed reproduces every weighted draw
    #[arg(long, value_name = "N", global = true)]
    pub seed: Option<u64>,

    /// Run duration in seconds, overriding the configured value
    #[arg(long, value_name = "SECONDS", global = true)]
    pub duration: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every enabled component together (the default)
    Run,

    /// Run only the virtual actor population
    Actors,

    /// Run only the submission flood
    Submissions,

    /// Run only the datastore query load
    Queries,

    /// Run only the resource & health monitor
    Monitor,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Generate a sample configuration
    Generate {
        /// Write to this path instead of stdout
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}
