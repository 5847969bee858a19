// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Placeholder expansion for runbook strings
//!
//! Stack directories, `purge_images` prefixes, `purge_secrets` names, tagged
//! input values and `[[validate.endpoint]]` values may name a lab variable
//! (`{region}`, `{dns_zone}`, `{netbios}`, `{user_base_dn}`, `{realm}`) or an
//! environment variable with a fallback (`${ADLAB_IMAGE_PREFIX:-{netbios}-}`).

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static LAB_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static ENV_WITH_FALLBACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+):-([^}]*)\}").expect("constant regex pattern is valid"));

/// Expand one runbook string against the lab's variables.
///
/// Environment references go first, so a fallback may itself name a lab
/// variable. A `{name}` with no matching lab variable stays in the output.
pub fn interpolate(template: &str, lab: &BTreeMap<String, String>) -> String {
    expand_lab(&expand_env(template, |name| std::env::var(name).ok()), lab)
}

fn expand_env(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    ENV_WITH_FALLBACK
        .replace_all(template, |caps: &regex::Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[2].to_string())
        })
        .into_owned()
}

fn expand_lab(template: &str, lab: &BTreeMap<String, String>) -> String {
    LAB_VAR
        .replace_all(template, |caps: &regex::Captures| match lab.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
