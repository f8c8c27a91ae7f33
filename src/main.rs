use anyhow::Result;
use clap::Parser;
use csvtable::{
    fetch::HttpFetcher,
    html::HtmlPage,
    loader::{CsvTableLoader, LoadState},
};
use std::{path::PathBuf, time::Duration};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Fetch out.csv from a web origin and render it as an HTML stats table"
)]
struct Args {
    /// Page URL that `out.csv` is resolved against (keep the trailing slash for a directory)
    #[arg(long, default_value = "http://127.0.0.1:8000/")]
    origin: Url,
    /// Where the rendered page is written
    #[arg(short, long, default_value = "index.html")]
    output: PathBuf,
    #[arg(long, default_value = "GitHub statistics")]
    title: String,
    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    info!(origin = %args.origin, "startup");

    // ─── 2) fetch → parse → render ───────────────────────────────────
    let fetcher = HttpFetcher::new(args.origin, Duration::from_secs(args.timeout_secs))?;
    let mut page = HtmlPage::new(args.title);
    let outcome = CsvTableLoader::new(fetcher).load(&mut page).await;

    // ─── 3) write the page whatever the outcome ──────────────────────
    page.write_to(&args.output)?;
    match outcome.state() {
        LoadState::Rendered => info!(output = %args.output.display(), "page written"),
        _ if outcome.is_error() => error!(
            output = %args.output.display(),
            "page written without data; see errors above"
        ),
        state => warn!(
            output = %args.output.display(),
            state = state.as_str(),
            "page written without data"
        ),
    }
    Ok(())
}
