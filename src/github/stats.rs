// src/github/stats.rs

use chrono::{DateTime, Datelike, Utc};
use std::collections::BTreeMap;

use super::client::{GithubRepo, GithubUser, LanguageBytes};

/// Aggregated numbers for one row of `out.csv`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserStats {
    pub name: String,
    pub total_repos: u64,
    pub followers: u64,
    pub total_forks: u64,
    pub lang_bytes: LanguageBytes,
    pub repos_per_year: BTreeMap<i32, u32>,
}

fn add_activity_year(activity: &mut BTreeMap<i32, u32>, at: Option<DateTime<Utc>>) {
    if let Some(year) = at.map(|t| t.year()).filter(|y| *y > 0) {
        *activity.entry(year).or_insert(0) += 1;
    }
}

fn merge_lang_usage(dest: &mut LanguageBytes, src: &LanguageBytes) {
    for (lang, bytes) in src {
        *dest.entry(lang.clone()).or_insert(0) += bytes;
    }
}

/// Each repo counts once for the year it was created and once more for the
/// year it was last updated, when that differs.
pub fn compute_stats(user: &GithubUser, repos: &[GithubRepo], langs: &[LanguageBytes]) -> UserStats {
    let name = match user.name.as_deref() {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => user.login.clone(),
    };

    let mut stats = UserStats {
        name,
        total_repos: user.public_repos,
        followers: user.followers,
        ..Default::default()
    };

    for repo in repos {
        stats.total_forks += repo.forks;
        add_activity_year(&mut stats.repos_per_year, repo.created_at);

        let created_year = repo.created_at.map(|t| t.year());
        if let Some(updated) = repo.updated_at {
            if Some(updated.year()) != created_year {
                add_activity_year(&mut stats.repos_per_year, Some(updated));
            }
        }
    }

    for lang in langs {
        merge_lang_usage(&mut stats.lang_bytes, lang);
    }

    stats
}
