// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::Cli;
use yare::parameterized;

#[parameterized(
    bash = { Shell::Bash },
    zsh = { Shell::Zsh },
    fish = { Shell::Fish },
)]
fn script_offers_global_runbook_flags(shell: Shell) {
    let mut out = Vec::new();
    write_completions::<Cli>(shell, &mut out);
    let script = String::from_utf8(out).unwrap();
    assert!(script.contains("adlab"));
    assert!(script.contains("runbook"));
    assert!(script.contains("log-file"));
}
