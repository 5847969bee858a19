// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! adlab - Active Directory lab deployment orchestrator

mod commands;
mod completions;
mod error;
mod lab;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use completions::CompletionsArgs;
use error::{LabError, EXIT_FAILURE};
use lab::Lab;
use output::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "adlab",
    version,
    about = "adlab - Deploy, validate and tear down the Active Directory lab"
)]
struct Cli {
    /// Runbook file [default: ./adlab.toml, else the built-in lab]
    #[arg(long, global = true)]
    runbook: Option<PathBuf>,

    /// Directory stack paths are relative to [default: the runbook's directory]
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Precheck, provision every phase, then validate
    Apply,
    /// Destroy every phase in reverse order and purge irreversible resources
    Destroy,
    /// Report where the lab's endpoints can be reached
    Validate,
    /// Show the apply and destroy order without running anything
    Plan,
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        completions::generate_completions::<Cli>(args.shell);
        return ExitCode::SUCCESS;
    }

    let guard = match logging::setup(cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let advisory = is_advisory(&cli.command);
    let code = match run(cli, &guard).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<LabError>() {
            Some(lab_err) => {
                eprint!("{}", lab_err);
                ExitCode::from(lab_err.exit_code)
            }
            None => {
                eprintln!("error: {:#}", e);
                ExitCode::from(EXIT_FAILURE)
            }
        },
    };
    if advisory {
        ExitCode::SUCCESS
    } else {
        code
    }
}

/// Commands that report problems but always exit 0
fn is_advisory(command: &Commands) -> bool {
    matches!(command, Commands::Validate)
}

async fn run(cli: Cli, log: &logging::LogGuard) -> anyhow::Result<()> {
    let lab = Lab::load(cli.runbook.as_deref(), cli.root.as_deref())?;

    match cli.command {
        Commands::Apply => commands::apply::handle(&lab, cli.format, log).await,
        Commands::Destroy => commands::destroy::handle(&lab, cli.format, log).await,
        Commands::Validate => commands::validate::handle(&lab, cli.format).await,
        Commands::Plan => commands::plan::handle(&lab, cli.format),
        // Handled before logging is set up
        Commands::Completions(_) => Ok(()),
    }
}
