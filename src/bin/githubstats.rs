// src/bin/githubstats.rs
//
// Builds the `out.csv` stats table from the GitHub REST API.

use anyhow::{Context, Result};
use clap::Parser;
use csvtable::github::{compute_stats, read_usernames, write_stats_table, GithubClient};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Collect GitHub user statistics as a ;-separated table")]
struct Args {
    /// File with one GitHub username per line
    input: PathBuf,
    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // logs go to stderr so stdout stays clean for the table
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    // GITHUB_TOKEN / GITHUB_API_URL may come from a .env file
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) => debug!(error = %e, "no .env loaded"),
    }

    let args = Args::parse();
    let usernames = read_usernames(&args.input)?;
    info!("{} usernames to fetch", usernames.len());

    let client = GithubClient::from_env()?;
    let mut results = Vec::with_capacity(usernames.len());
    for username in &usernames {
        let user = match client.fetch_user(username).await {
            Ok(u) => u,
            Err(e) => {
                warn!("skipping user {}: {:#}", username, e);
                continue;
            }
        };
        let repos = match client.fetch_repos(username).await {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping repos for {}: {:#}", username, e);
                continue;
            }
        };
        let languages = client.fetch_all_languages(username, &repos).await;
        info!(user = %username, repos = repos.len(), "fetched");
        results.push(compute_stats(&user, &repos, &languages));
    }

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    write_stats_table(&mut out, &results)?;
    info!("wrote {} rows", results.len());
    Ok(())
}
