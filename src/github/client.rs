// src/github/client.rs

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use std::{collections::BTreeMap, env, time::Duration};
use tracing::{debug, instrument};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "GitHubStatsClient";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Bytes of code per language for a single repository.
pub type LanguageBytes = BTreeMap<String, u64>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubRepo {
    pub name: String,
    #[serde(default, rename = "forks_count")]
    pub forks: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Thin REST client for the three GitHub endpoints the stats need.
#[derive(Clone, Debug)]
pub struct GithubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build()
            .context("building GitHub HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Reads `GITHUB_API_URL` (falls back to the public API) and `GITHUB_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base = env::var("GITHUB_API_URL")
            .ok()
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(base, env::var("GITHUB_TOKEN").ok())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_url(&self, username: &str) -> String {
        format!("{}/users/{}", self.base_url, username)
    }

    pub fn repos_url(&self, username: &str) -> String {
        format!("{}/users/{}/repos?per_page=100", self.base_url, username)
    }

    pub fn languages_url(&self, username: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/languages", self.base_url, username, repo)
    }

    pub async fn fetch_user(&self, username: &str) -> Result<GithubUser> {
        self.fetch_json(&self.user_url(username)).await
    }

    pub async fn fetch_repos(&self, username: &str) -> Result<Vec<GithubRepo>> {
        self.fetch_json(&self.repos_url(username)).await
    }

    pub async fn fetch_languages(&self, username: &str, repo: &str) -> Result<LanguageBytes> {
        self.fetch_json(&self.languages_url(username, repo)).await
    }

    /// Language maps for every repo; repos whose lookup fails are left out.
    pub async fn fetch_all_languages(
        &self,
        username: &str,
        repos: &[GithubRepo],
    ) -> Vec<LanguageBytes> {
        let mut all = Vec::with_capacity(repos.len());
        for repo in repos {
            match self.fetch_languages(username, &repo.name).await {
                Ok(langs) => all.push(langs),
                Err(e) => debug!(repo = %repo.name, error = %e, "skipping languages"),
            }
        }
        all
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut req = self.client.get(url);
        if let Some(token) = &self.token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;
        if resp.status() != StatusCode::OK {
            bail!("unexpected status: {}", resp.status());
        }
        resp.json::<T>()
            .await
            .with_context(|| format!("decoding JSON from {}", url))
    }
}
