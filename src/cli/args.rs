//! CLI argument definitions using clap
//!
//! Commands:
//! - frameguard quickstart
//! - frameguard check --config <path> --data <path> [--stage input|output]
//! - frameguard check-schema --schema-dir <dir> --schema <name> --data <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::schema::Stage;

/// frameguard - column-schema validation for DataFrame transformations
#[derive(Parser, Debug)]
#[command(name = "frameguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the sample transformation under validation and print the result
    Quickstart,

    /// Validate a JSON frame against a configured stage schema
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./frameguard.json")]
        config: PathBuf,

        /// Path to a column-oriented JSON frame
        #[arg(long)]
        data: PathBuf,

        /// Which configured schema to check against
        #[arg(long, default_value = "input")]
        stage: Stage,
    },

    /// Validate a JSON frame against a named schema from a schema directory
    CheckSchema {
        /// Directory holding schema JSON files
        #[arg(long)]
        schema_dir: PathBuf,

        /// Registered schema name
        #[arg(long)]
        schema: String,

        /// Path to a column-oriented JSON frame
        #[arg(long)]
        data: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
