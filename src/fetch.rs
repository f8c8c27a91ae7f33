// src/fetch.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const USER_AGENT: &str = "csvtable";

/// Something that can GET a path relative to where the page was served from.
#[async_trait]
pub trait Fetcher: Send + Sync {
    type Response: FetchResponse;

    /// Resolves once the status line and headers have arrived.
    async fn get(&self, path: &str) -> Result<Self::Response>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for &T {
    type Response = T::Response;

    async fn get(&self, path: &str) -> Result<Self::Response> {
        (**self).get(path).await
    }
}

#[async_trait]
pub trait FetchResponse: Send + Sized {
    fn status(&self) -> u16;

    fn ok(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// Read the remaining body as text.
    async fn text(self) -> Result<String>;
}

/// [`Fetcher`] backed by a reqwest client, resolving paths against `origin`.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
    origin: Url,
}

impl HttpFetcher {
    pub fn new(origin: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self::with_client(client, origin))
    }

    pub fn with_client(client: Client, origin: Url) -> Self {
        Self { client, origin }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.origin
            .join(path)
            .with_context(|| format!("resolving {} against {}", path, self.origin))
    }
}

pub struct HttpResponse {
    url: Url,
    inner: reqwest::Response,
}

#[async_trait]
impl Fetcher for HttpFetcher {
    type Response = HttpResponse;

    async fn get(&self, path: &str) -> Result<HttpResponse> {
        let url = self.resolve(path)?;
        debug!(%url, "GET");
        let inner = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;
        debug!(%url, status = %inner.status(), "response");
        Ok(HttpResponse { url, inner })
    }
}

#[async_trait]
impl FetchResponse for HttpResponse {
    fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    async fn text(self) -> Result<String> {
        let url = self.url;
        self.inner
            .text()
            .await
            .with_context(|| format!("reading body from {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// Serve exactly one canned HTTP/1.1 response, returning the origin URL
    /// and the raw request that was received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (Url, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut req = Vec::new();
            let mut buf = [0u8; 1024];
            while !req.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = sock.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                req.extend_from_slice(&buf[..n]);
            }
            let resp = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            sock.shutdown().await.unwrap();
            String::from_utf8_lossy(&req).into_owned()
        });
        let origin = Url::parse(&format!("http://{}/", addr)).unwrap();
        (origin, handle)
    }

    #[test]
    fn test_resolve_relative_path() {
        let f = HttpFetcher::new(
            Url::parse("http://example.com/stats/").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            f.resolve("out.csv").unwrap().as_str(),
            "http://example.com/stats/out.csv"
        );

        let f = HttpFetcher::with_client(
            Client::new(),
            Url::parse("http://example.com/stats/index.html").unwrap(),
        );
        assert_eq!(
            f.resolve("out.csv").unwrap().as_str(),
            "http://example.com/stats/out.csv"
        );
    }

    #[tokio::test]
    async fn test_get_success_reads_body() {
        let (origin, server) = serve_once("200 OK", "A;B\n1;2").await;
        let f = HttpFetcher::new(origin, Duration::from_secs(5)).unwrap();

        let resp = f.get("out.csv").await.unwrap();
        assert!(resp.ok());
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), "A;B\n1;2");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /out.csv HTTP/1.1\r\n"));
        assert!(request.to_ascii_lowercase().contains("user-agent: csvtable"));
    }

    #[tokio::test]
    async fn test_get_not_found_is_not_an_error() {
        let (origin, server) = serve_once("404 Not Found", "").await;
        let f = HttpFetcher::new(origin, Duration::from_secs(5)).unwrap();

        let resp = f.get("out.csv").await.unwrap();
        assert!(!resp.ok());
        assert_eq!(resp.status(), 404);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_get_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let origin = Url::parse(&format!("http://{}/", addr)).unwrap();
        let f = HttpFetcher::new(origin, Duration::from_secs(5)).unwrap();
        let err = f.get("out.csv").await.err().unwrap();
        assert!(format!("{:#}", err).contains("GET http://"));
    }
}
