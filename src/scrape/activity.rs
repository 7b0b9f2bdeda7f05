use crate::foundation::core::{ActivityRecord, Metric, PeriodKey, Subject};
use crate::foundation::error::GifhubResult;
use crate::scrape::extract::{extract_between, extract_fields, strip_token};

const CONTAINER_LEFT: &[u8] = b"data-percentages=\"";
const CONTAINER_RIGHT: &[u8] = b"\">";
const QUOTE_ENTITY: &[u8] = b"&quot;";
const SEPARATOR: &[u8] = b",";
const LAST_TERMINATOR: &[u8] = b"}";

/// Labels in search order. The first one is named when none of them are present.
pub const ACTIVITY_LABELS: [(Metric, &[u8]); 4] = [
    (Metric::Commits, b"Commits:"),
    (Metric::Issues, b"Issues:"),
    (Metric::PullRequests, b"Pull requests:"),
    (Metric::CodeReviews, b"Code review:"),
];

/// Metric percentages before they are tagged with subject and period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActivityPercentages {
    pub commits: u8,
    pub issues: u8,
    pub pull_requests: u8,
    pub code_reviews: u8,
}

impl ActivityPercentages {
    pub fn into_record(self, subject: Subject, period: PeriodKey) -> ActivityRecord {
        ActivityRecord {
            subject,
            period,
            commits: self.commits,
            issues: self.issues,
            pull_requests: self.pull_requests,
            code_reviews: self.code_reviews,
        }
    }
}

/// Parse the cleaned `data-percentages` container, e.g.
/// `Commits:5,Issues:0,Pull requests:12,Code review:3}`.
pub fn parse_percentages(container: &[u8]) -> GifhubResult<ActivityPercentages> {
    let fields = extract_fields(container, &ACTIVITY_LABELS, SEPARATOR, LAST_TERMINATOR)?;
    let get = |m: Metric| fields.get(&m).copied().unwrap_or(0);
    Ok(ActivityPercentages {
        commits: get(Metric::Commits),
        issues: get(Metric::Issues),
        pull_requests: get(Metric::PullRequests),
        code_reviews: get(Metric::CodeReviews),
    })
}

/// Scrape the activity overview percentages out of a profile overview page.
pub fn scrape_activity(html: &[u8]) -> GifhubResult<ActivityPercentages> {
    let raw = extract_between(html, CONTAINER_LEFT, CONTAINER_RIGHT)?;
    let clean = strip_token(raw, QUOTE_ENTITY);
    parse_percentages(&clean)
}

#[cfg(test)]
#[path = "../../tests/unit/scrape/activity.rs"]
mod tests;
