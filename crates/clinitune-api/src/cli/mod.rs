//! CLI command definitions for the `clinitune` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod reclassify;
pub mod seed;

use clap::{Parser, Subcommand};

/// Mental-health practice service with AI chat risk triage.
#[derive(Parser)]
#[command(name = "clinitune", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(long, short, default_value = "3000", env = "CLINITUNE_PORT")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1", env = "CLINITUNE_HOST")]
        host: String,
    },

    /// Create the demo clinician, patients, appointments and tasks.
    Seed,

    /// Re-scan every stored chat with the keyword classifier.
    Reclassify,
}
