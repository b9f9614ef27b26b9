//! GitHub API client.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::warn;

use crate::error::{Result, TeamAccessError};
use crate::http::{
    HttpHeaders, HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport,
    header_get,
};

/// Client for interacting with the GitHub API.
pub struct GitHubClient {
    pub(crate) token: String,
    pub(crate) base_url: String,
    transport: Box<dyn HttpTransport>,
    max_rate_limit_waits: Option<u32>,
}

impl GitHubClient {
    /// Create a new GitHub client with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_transport(
            token,
            "https://api.github.com",
            Box::new(ReqwestTransport::default()),
        )
    }

    /// Create a client for GitHub Enterprise with a custom base URL.
    pub fn with_enterprise(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        // Remove trailing slash if present
        if url.ends_with('/') {
            url.pop();
        }
        Self::with_transport(token, url, Box::new(ReqwestTransport::default()))
    }

    /// Create a client using the GITHUB_TOKEN environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN").map_err(|_| {
            TeamAccessError::InvalidConfig("GITHUB_TOKEN environment variable not set".into())
        })?;
        Ok(Self::new(token))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(
        token: impl Into<String>,
        base_url: impl Into<String>,
        transport: Box<dyn HttpTransport>,
    ) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into(),
            transport,
            max_rate_limit_waits: None,
        }
    }

    /// Cap how many rate-limit windows a single request may wait out.
    /// Unbounded when never set.
    #[must_use]
    pub fn max_rate_limit_waits(mut self, waits: u32) -> Self {
        self.max_rate_limit_waits = Some(waits);
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the default headers for API requests.
    pub(crate) fn headers(&self) -> HttpHeaders {
        vec![
            ("Authorization".to_string(), format!("Bearer {}", self.token)),
            (
                "Accept".to_string(),
                "application/vnd.github+json".to_string(),
            ),
            ("User-Agent".to_string(), "team-access".to_string()),
            ("X-GitHub-Api-Version".to_string(), "2022-11-28".to_string()),
        ]
    }

    /// Build an authenticated request with an empty body.
    pub(crate) fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: self.headers(),
            body: Vec::new(),
        }
    }

    /// One transport round-trip, no rate-limit handling.
    pub(crate) fn send_raw(&self, request: HttpRequest) -> Result<HttpResponse> {
        Ok(self.transport.send(request)?)
    }

    /// Issue a request, sleeping out primary rate-limit windows.
    ///
    /// On a 403 whose remaining-quota header is zero, the process blocks
    /// until the advertised reset time and the identical request is
    /// re-issued. Every other status is returned to the caller untouched.
    pub(crate) fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut waits = 0u32;
        loop {
            let response = self.send_raw(request.clone())?;
            if !is_rate_limited(&response) {
                return Ok(response);
            }
            if let Some(budget) = self.max_rate_limit_waits
                && waits >= budget
            {
                return Err(TeamAccessError::RateLimitBudgetExhausted { waits });
            }
            let wait = rate_limit_wait(&response, SystemTime::now());
            warn!(
                seconds = wait.as_secs(),
                url = %request.url,
                "rate limit exceeded, sleeping until reset"
            );
            thread::sleep(wait);
            waits += 1;
        }
    }
}

/// Build the hard-failure error for a response with no usable body.
pub(crate) fn api_error(response: &HttpResponse) -> TeamAccessError {
    TeamAccessError::Api {
        status: response.status,
        message: String::from_utf8_lossy(&response.body).trim().to_string(),
    }
}

/// Whether a response signals the primary rate limit: 403 with the
/// remaining-quota header at zero.
pub(crate) fn is_rate_limited(response: &HttpResponse) -> bool {
    response.status == 403 && response.header("x-ratelimit-remaining") == Some("0")
}

/// How long to sleep before retrying a rate-limited request: the reset
/// timestamp minus now, floored at zero. A missing or malformed reset
/// header means an immediate retry.
pub(crate) fn rate_limit_wait(response: &HttpResponse, now: SystemTime) -> Duration {
    let reset = response
        .header("x-ratelimit-reset")
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);
    let now_secs = now
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    Duration::from_secs(reset.saturating_sub(now_secs))
}

/// Extract the URL of the `rel="next"` relation from a response's Link
/// header.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/organizations/123/repos?per_page=100&page=2>; rel="next", <...&page=3>; rel="last"`
pub(crate) fn next_link(headers: &HttpHeaders) -> Option<String> {
    let link_header = header_get(headers, "link")?;

    for part in link_header.split(',') {
        let part = part.trim();

        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some("next")) = (url, rel) {
            return Some(url.to_string());
        }
    }

    None
}
