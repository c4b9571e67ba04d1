// src/fetch/client.rs
use std::time::Duration;

use reqwest::{header, StatusCode};

use super::PageSource;
use crate::utils::error::FetchError;

const FETCH_USER_AGENT: &str = "Mozilla/5.0 (compatible; program-extractor/1.0)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
// Retries after the first attempt, with exponential backoff starting here
const MAX_RETRIES: u32 = 3;
const BACKOFF_BASE_MS: u64 = 1000;

/// Creates a reqwest client for program pages.
fn build_client(accept_invalid_certs: bool) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(FETCH_USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
}

/// HTTP fetcher with retry and backoff. A connection that cannot be established
/// (typically a broken certificate chain) is tried once more without TLS verification.
pub struct HttpFetcher {
    client: reqwest::Client,
    insecure: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(false)?,
            insecure: build_client(true)?,
        })
    }

    /// Downloads the raw bytes behind `url`.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match self.download_with(&self.client, url).await {
            Err(FetchError::Network(e)) if e.is_connect() => {
                tracing::warn!("Connection to {} failed ({}), retrying without certificate verification", url, e);
                self.download_with(&self.insecure, url).await
            }
            other => other,
        }
    }

    async fn download_with(&self, client: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut attempt: u32 = 0;
        loop {
            match request_once(client, url).await {
                Ok(body) => {
                    tracing::debug!("Downloaded {} bytes from {}", body.len(), url);
                    return Ok(body);
                }
                Err(e) if attempt < MAX_RETRIES && is_retryable(&e) => {
                    let delay = Duration::from_millis(BACKOFF_BASE_MS * 2u64.pow(attempt));
                    attempt += 1;
                    tracing::warn!("Attempt {} for {} failed: {}. Retrying in {:?}", attempt, url, e, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

async fn request_once(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(url)
        .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("HTTP error status: {} for URL: {}", status, url);
        return Err(FetchError::Http(status));
    }

    Ok(response.bytes().await?.to_vec())
}

fn is_retryable(error: &FetchError) -> bool {
    match error {
        FetchError::Http(status) => *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error(),
        FetchError::Network(e) => e.is_timeout() || e.is_connect(),
    }
}

impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        match self.download(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!("No content for {}: {}", url, e);
                None
            }
        }
    }
}
