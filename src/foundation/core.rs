use std::collections::BTreeSet;
use std::fmt;

use crate::foundation::error::{GifhubError, GifhubResult};

/// Identifier of the time window a graph describes (a calendar year on GitHub).
///
/// Keys order lexicographically, which is chronological for four-digit years.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PeriodKey(String);

impl PeriodKey {
    pub fn new(raw: impl Into<String>) -> GifhubResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GifhubError::validation("period key must be non-empty"));
        }
        let reserved = |c: char| c.is_whitespace() || matches!(c, '&' | '/' | '#' | '?' | '=');
        if trimmed.contains(reserved) {
            return Err(GifhubError::validation(format!(
                "period key '{trimmed}' contains reserved characters"
            )));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated subject identity (a GitHub handle).
///
/// The handle ends up both in request URLs and in the output file name, so only ASCII
/// alphanumerics, `-`, `_` and `.` are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Subject(String);

impl Subject {
    pub fn new(raw: impl Into<String>) -> GifhubResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(GifhubError::validation("subject must be non-empty"));
        }
        if raw.starts_with('.') {
            return Err(GifhubError::validation(format!(
                "subject '{raw}' must not start with '.'"
            )));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(GifhubError::validation(format!(
                "subject '{raw}' contains invalid character {bad:?}"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four tracked activity metrics.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Metric {
    Commits,
    Issues,
    PullRequests,
    CodeReviews,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Commits,
        Metric::Issues,
        Metric::PullRequests,
        Metric::CodeReviews,
    ];

    /// Axis caption drawn next to the metric's value.
    pub fn caption(self) -> &'static str {
        match self {
            Metric::Commits => "Commits",
            Metric::Issues => "Issues",
            Metric::PullRequests => "Pull Requests",
            Metric::CodeReviews => "Code Review",
        }
    }
}

/// Activity percentages for one subject and period.
///
/// Values are in `0..=100`; a metric missing from the source document is `0`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActivityRecord {
    pub subject: Subject,
    pub period: PeriodKey,
    pub commits: u8,
    pub issues: u8,
    pub pull_requests: u8,
    pub code_reviews: u8,
}

impl ActivityRecord {
    pub fn metric(&self, metric: Metric) -> u8 {
        match metric {
            Metric::Commits => self.commits,
            Metric::Issues => self.issues,
            Metric::PullRequests => self.pull_requests,
            Metric::CodeReviews => self.code_reviews,
        }
    }
}

/// Which periods a run covers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PeriodSelection {
    /// Discover every period from the subject's profile page.
    #[default]
    All,
    /// Explicit, deduplicated and sorted periods.
    Explicit(Vec<PeriodKey>),
}

impl PeriodSelection {
    /// Parse a `--years` flag value: `all` or a comma separated list such as `2016,2017,`.
    pub fn parse(raw: &str) -> GifhubResult<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let mut keys = BTreeSet::new();
        for part in raw.trim_matches(|c| c == ',' || c == ' ').split(',') {
            if part.trim().is_empty() {
                continue;
            }
            keys.insert(PeriodKey::new(part)?);
        }
        if keys.is_empty() {
            return Err(GifhubError::validation("failed to parse any periods"));
        }
        Ok(Self::Explicit(keys.into_iter().collect()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
