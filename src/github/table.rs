// src/github/table.rs

use anyhow::{Context, Result};
use std::io::Write;

use super::stats::UserStats;
use crate::parse::DELIM;

pub const HEADER: [&str; 6] = ["User", "Repos", "Followers", "Forks", "Languages", "Activity"];

/// Write the header and one row per user, `;`-separated, `\n`-terminated.
/// Field values are written as-is.
pub fn write_stats_table<W: Write>(w: &mut W, users: &[UserStats]) -> Result<()> {
    write_row(w, &HEADER).context("writing header")?;

    for user in users {
        let record = [
            user.name.clone(),
            user.total_repos.to_string(),
            user.followers.to_string(),
            user.total_forks.to_string(),
            summarize_langs(user),
            summarize_years(user),
        ];
        write_row(w, &record).with_context(|| format!("writing record for {}", user.name))?;
    }

    w.flush().context("flushing stats table")
}

fn write_row<W: Write, S: AsRef<str>>(w: &mut W, fields: &[S]) -> std::io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            write!(w, "{}", DELIM)?;
        }
        w.write_all(field.as_ref().as_bytes())?;
    }
    w.write_all(b"\n")
}

/// `Lang:Bytes, Lang:Bytes`
pub fn summarize_langs(user: &UserStats) -> String {
    user.lang_bytes
        .iter()
        .map(|(lang, bytes)| format!("{}:{}", lang, bytes))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Year:Count, Year:Count`
pub fn summarize_years(user: &UserStats) -> String {
    user.repos_per_year
        .iter()
        .map(|(year, count)| format!("{}:{}", year, count))
        .collect::<Vec<_>>()
        .join(", ")
}
