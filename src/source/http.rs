use std::time::Duration;

use crate::foundation::core::{PeriodKey, Subject};
use crate::foundation::error::{GifhubError, GifhubResult};

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!(
    "gifhub/",
    env!("CARGO_PKG_VERSION"),
    " - generates GIFs from a user's yearly activity graph"
);

/// Where activity pages come from.
///
/// Implementations are shared by every fetch task of a run, hence `Send + Sync`.
pub trait PageSource: Send + Sync {
    /// Overview page of `subject` restricted to `period`.
    fn activity_page(&self, subject: &Subject, period: &PeriodKey) -> GifhubResult<Vec<u8>>;
    /// Base profile page of `subject`, used for period discovery.
    fn profile_page(&self, subject: &Subject) -> GifhubResult<Vec<u8>>;
}

/// Options for [`HttpSource`].
#[derive(Clone, Debug)]
pub struct HttpSourceOpts {
    /// Scheme and host, without trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSourceOpts {
    fn default() -> Self {
        Self {
            base_url: "https://github.com".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

pub fn activity_url(base_url: &str, subject: &Subject, period: &PeriodKey) -> String {
    format!(
        "{}/{subject}?tab=overview&from={period}-01-01&to={period}-12-31",
        base_url.trim_end_matches('/')
    )
}

pub fn profile_url(base_url: &str, subject: &Subject) -> String {
    format!("{}/{subject}", base_url.trim_end_matches('/'))
}

/// Blocking HTTP page source. Anything but `200 OK` is a [`GifhubError::Network`].
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(opts: HttpSourceOpts) -> GifhubResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(opts.timeout)
            .user_agent(opts.user_agent)
            .build()
            .map_err(|e| GifhubError::network(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            base_url: opts.base_url,
        })
    }

    fn get(&self, url: &str) -> GifhubResult<Vec<u8>> {
        let res = self
            .client
            .get(url)
            .send()
            .map_err(|e| GifhubError::network(format!("GET {url}: {e}")))?;

        let status = res.status();
        if status != reqwest::StatusCode::OK {
            return Err(GifhubError::network(format!("GET status: {status}: {url}")));
        }

        let body = res
            .bytes()
            .map_err(|e| GifhubError::network(format!("read body of {url}: {e}")))?;
        tracing::debug!(url, bytes = body.len(), "fetched page");
        Ok(body.to_vec())
    }
}

impl PageSource for HttpSource {
    fn activity_page(&self, subject: &Subject, period: &PeriodKey) -> GifhubResult<Vec<u8>> {
        self.get(&activity_url(&self.base_url, subject, period))
    }

    fn profile_page(&self, subject: &Subject) -> GifhubResult<Vec<u8>> {
        self.get(&profile_url(&self.base_url, subject))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/http.rs"]
mod tests;
