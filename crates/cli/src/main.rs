//! `slotlist-authz` — inspect permission decisions from the command line.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: log filter (default `info`)
//! - `SLOTLIST_LOG_FORMAT`: `json` (default), `pretty` or `compact`
//! - `SLOTLIST_AUTHZ_STRATEGY`: `tree` (default) or `flat`

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use slotlist_auth::{MatchStrategy, ScopeKind};

#[derive(Parser, Debug)]
#[command(name = "slotlist-authz")]
#[command(version, about = "Evaluate slotlist permissions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Granted permissions, given inline and/or as a JSON array file.
#[derive(clap::Args, Debug, Default)]
struct GrantArgs {
    /// Granted permission (repeatable)
    #[arg(short, long = "grant", value_name = "PERMISSION")]
    grants: Vec<String>,

    /// JSON file holding an array of granted permission strings
    #[arg(long, value_name = "FILE")]
    grants_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide whether the grants satisfy any of the required permissions
    Check {
        #[command(flatten)]
        grants: GrantArgs,

        /// Required permission; several mean "any of" (repeatable)
        #[arg(short, long = "require", value_name = "PERMISSION")]
        required: Vec<String>,

        /// Matching strategy
        #[arg(long, env = "SLOTLIST_AUTHZ_STRATEGY")]
        strategy: Option<MatchStrategy>,

        /// Print the decision explanation as JSON
        #[arg(long)]
        explain: bool,
    },

    /// Check whether a permission may be granted on a community or mission
    Validate {
        /// Entity kind (community or mission)
        #[arg(long)]
        kind: ScopeKind,

        /// Entity slug
        #[arg(long = "id", value_name = "SLUG")]
        identifier: String,

        /// Permission requested for the grant
        candidate: String,
    },

    /// Print the permission tree built from the grants
    Tree {
        #[command(flatten)]
        grants: GrantArgs,
    },

    /// Validate a decoded session claims payload and list its permissions
    Claims {
        /// JSON file with the decoded claims
        path: PathBuf,

        /// Expected issuer
        #[arg(long, default_value = "slotlist")]
        issuer: String,

        /// Expected audience
        #[arg(long, default_value = "slotlist-users")]
        audience: String,
    },
}

fn main() -> Result<ExitCode> {
    slotlist_observability::init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    let outcome = commands::run(cli.command, &mut stdout)?;

    Ok(outcome.exit_code())
}
