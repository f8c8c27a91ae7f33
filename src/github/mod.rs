// src/github/mod.rs

use anyhow::{Context, Result};
use std::{fs, path::Path};

pub mod client;
pub mod stats;
pub mod table;

pub use client::{GithubClient, GithubRepo, GithubUser, LanguageBytes};
pub use stats::{compute_stats, UserStats};
pub use table::write_stats_table;

/// One username per line; surrounding whitespace and blank lines are dropped.
pub fn read_usernames(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading usernames from {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}
