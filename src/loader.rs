// src/loader.rs

use std::fmt;
use tracing::{debug, error, info, warn};

use crate::fetch::{FetchResponse, Fetcher};
use crate::parse::{parse_csv, Table};
use crate::render::{build_table, DisplaySurface};

/// Resource requested relative to the page origin.
pub const RESOURCE_PATH: &str = "out.csv";

/// The one-line status element next to the table.
pub trait StatusLine {
    fn set_status(&mut self, text: &str);
}

/// Where a loader is in its single pass. The last three are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadState {
    Idle,
    Fetching,
    Rendered,
    FetchFailed,
    Errored,
}

impl LoadState {
    pub fn as_str(&self) -> &str {
        match self {
            LoadState::Idle => "Idle",
            LoadState::Fetching => "Fetching",
            LoadState::Rendered => "Rendered",
            LoadState::FetchFailed => "FetchFailed",
            LoadState::Errored => "Errored",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoadState::Rendered | LoadState::FetchFailed | LoadState::Errored
        )
    }
}

#[derive(Debug)]
pub enum LoadError {
    /// The server answered with a non-2xx status.
    Status(u16),
    /// No response: connect failure, timeout, bad URL.
    Request(anyhow::Error),
    /// A response arrived but its body could not be read as text.
    Body(anyhow::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Status(code) => write!(f, "HTTP status {}", code),
            LoadError::Request(e) => write!(f, "request failed: {:#}", e),
            LoadError::Body(e) => write!(f, "body read failed: {:#}", e),
        }
    }
}

impl std::error::Error for LoadError {}

#[derive(Debug)]
pub enum LoadOutcome {
    /// Table rendered; `rows` counts data rows, header excluded.
    Rendered { rows: usize },
    FetchFailed { status: u16 },
    Errored(LoadError),
}

impl LoadOutcome {
    pub fn state(&self) -> LoadState {
        match self {
            LoadOutcome::Rendered { .. } => LoadState::Rendered,
            LoadOutcome::FetchFailed { .. } => LoadState::FetchFailed,
            LoadOutcome::Errored(_) => LoadState::Errored,
        }
    }

    /// Only `Errored` carries diagnostic detail; an HTTP status is a warning.
    pub fn is_error(&self) -> bool {
        matches!(self, LoadOutcome::Errored(_))
    }
}

pub fn success_message(resource: &str) -> String {
    format!("The data is loaded successfully from {}.", resource)
}

pub fn http_failure_message(resource: &str, status: u16) -> String {
    format!(
        "Failed to load {} (HTTP {}). Make sure the file exists.",
        resource, status
    )
}

pub fn error_message(resource: &str) -> String {
    format!(
        "An error occurred while reading {}. See the error log for details.",
        resource
    )
}

/// Fetches `out.csv`, renders it and reports on the status line. `load`
/// consumes the loader, so a loader drives at most one load; the terminal
/// state is read from [`LoadOutcome::state`].
pub struct CsvTableLoader<F> {
    fetcher: F,
    resource: &'static str,
    state: LoadState,
}

impl<F: Fetcher> CsvTableLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            resource: RESOURCE_PATH,
            state: LoadState::Idle,
        }
    }

    pub fn resource(&self) -> &str {
        self.resource
    }

    /// Run fetch → parse → render → status. Failures end up on the status
    /// line and in the returned outcome; nothing is propagated.
    pub async fn load<P>(mut self, page: &mut P) -> LoadOutcome
    where
        P: DisplaySurface + StatusLine + ?Sized,
    {
        self.transition(LoadState::Fetching);

        let outcome = match self.fetch_table().await {
            Ok(table) => {
                build_table(&table, page);
                page.set_status(&success_message(self.resource));
                let rows = table.data_rows().len();
                info!(resource = self.resource, rows, "table rendered");
                LoadOutcome::Rendered { rows }
            }
            Err(LoadError::Status(status)) => {
                warn!(resource = self.resource, status, "fetch failed");
                page.set_status(&http_failure_message(self.resource, status));
                LoadOutcome::FetchFailed { status }
            }
            Err(err) => {
                error!(resource = self.resource, "{}", err);
                page.set_status(&error_message(self.resource));
                LoadOutcome::Errored(err)
            }
        };

        self.transition(outcome.state());
        outcome
    }

    async fn fetch_table(&self) -> Result<Table, LoadError> {
        let resp = self
            .fetcher
            .get(self.resource)
            .await
            .map_err(LoadError::Request)?;
        if !resp.ok() {
            return Err(LoadError::Status(resp.status()));
        }
        let text = resp.text().await.map_err(LoadError::Body)?;
        debug!(bytes = text.len(), "body read");
        Ok(parse_csv(&text))
    }

    fn transition(&mut self, next: LoadState) {
        debug!(from = self.state.as_str(), to = next.as_str(), "load state");
        self.state = next;
    }
}
