// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `adlab completions <shell>`
//!
//! Completes the subcommands and the global `--runbook`, `--root`,
//! `--format` and `--log-file` flags. Runs before logging is set up and
//! never reads a runbook.
//!
//! ```bash
//! adlab completions bash > ~/.local/share/bash-completion/completions/adlab
//! adlab completions zsh > ~/.zfunc/_adlab
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::{self, Write};

/// Print the completion script for `shell` to stdout
pub fn generate_completions<C: CommandFactory>(shell: Shell) {
    write_completions::<C>(shell, &mut io::stdout());
}

fn write_completions<C: CommandFactory>(shell: Shell, out: &mut dyn Write) {
    let mut cmd = C::command();
    let bin = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin, out);
}

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
#[path = "completions_tests.rs"]
mod tests;
