use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use tolk_core::{Error, Result};
use tracing::{info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,et;q=0.8";

/// Total attempts against a challenge-protected page.
const MAX_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// Body markers that identify a bot-challenge interstitial.
const CHALLENGE_MARKERS: [&str; 4] = [
    "checking your browser",
    "just a moment",
    "cf-browser-verification",
    "attention required",
];

/// Decides whether a non-success response is a challenge page worth
/// retrying. Injectable so deployments can replace or disable it.
pub type ChallengeDetector = fn(StatusCode, &str) -> bool;

pub fn default_challenge_detector(status: StatusCode, body: &str) -> bool {
    if status != StatusCode::FORBIDDEN && status != StatusCode::SERVICE_UNAVAILABLE {
        return false;
    }
    let body = body.to_lowercase();
    CHALLENGE_MARKERS.iter().any(|marker| body.contains(marker))
}

/// Headless-rendering proxy for sites the plain fetch cannot reach.
/// The proxy opens the page in a real browser and returns the settled HTML.
#[derive(Debug, Clone)]
pub struct RenderProxy {
    pub endpoint: String,
    pub token: String,
}

const DEFAULT_PROXY_ENDPOINT: &str = "https://chrome.browserless.io/content";
/// How long the proxy lets the page load before returning, in ms.
const PROXY_WAIT_FOR_MS: u64 = 3000;

impl RenderProxy {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_PROXY_ENDPOINT.to_string(),
            token: token.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Serialize)]
struct ProxyRequest<'a> {
    url: &'a str,
    token: &'a str,
    #[serde(rename = "waitFor")]
    wait_for: u64,
}

/// Fetches pages with a browser-like request signature, retrying a bounded
/// number of times when a bot challenge is detected.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    challenge_detector: ChallengeDetector,
    render_proxy: Option<RenderProxy>,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            challenge_detector: default_challenge_detector,
            render_proxy: None,
        }
    }

    pub fn with_challenge_detector(mut self, detector: ChallengeDetector) -> Self {
        self.challenge_detector = detector;
        self
    }

    pub fn with_render_proxy(mut self, proxy: RenderProxy) -> Self {
        self.render_proxy = Some(proxy);
        self
    }

    /// Fetches the page at `url` and returns its HTML.
    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        if let Some(proxy) = &self.render_proxy {
            return self.fetch_via_proxy(proxy, url).await;
        }

        let mut attempt = 1;
        loop {
            let response = self
                .client
                .get(url)
                .header(header::USER_AGENT, USER_AGENT)
                .header(header::ACCEPT, ACCEPT)
                .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;

            if status.is_success() {
                return Ok(body);
            }
            if !(self.challenge_detector)(status, &body) {
                return Err(Error::Fetch(format!("{url}: unexpected status {status}")));
            }
            if attempt >= MAX_ATTEMPTS {
                return Err(Error::Fetch(format!(
                    "{url}: challenge page persisted after {MAX_ATTEMPTS} attempts"
                )));
            }
            warn!(
                "Challenge page from {} (attempt {}/{}), retrying",
                url, attempt, MAX_ATTEMPTS
            );
            tokio::time::sleep(RETRY_BACKOFF).await;
            attempt += 1;
        }
    }

    async fn fetch_via_proxy(&self, proxy: &RenderProxy, url: &str) -> Result<String> {
        info!("Fetching {} through the rendering proxy", url);
        let response = self
            .client
            .post(&proxy.endpoint)
            .json(&ProxyRequest {
                url,
                token: &proxy.token,
                wait_for: PROXY_WAIT_FOR_MS,
            })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!(
                "{url}: rendering proxy returned {status}"
            )));
        }
        Ok(response.text().await?)
    }
}
