use std::collections::BTreeSet;

use crate::foundation::core::PeriodKey;
use crate::foundation::error::GifhubResult;
use crate::scrape::extract::extract_between;

const LIST_START: &[u8] = b"<ul class=\"filter-list small\">";
const LIST_END: &[u8] = b"</ul>";
const LINK_START: &[u8] = b"<a";
const PERIOD_ID: &[u8] = b"id=\"year-link-";
const QUOTE: &[u8] = b"\"";

/// Scrape every available period from a profile page's year filter list, sorted ascending.
///
/// Anchors without a `year-link-` id are skipped.
pub fn scrape_periods(html: &[u8]) -> GifhubResult<Vec<PeriodKey>> {
    let list = extract_between(html, LIST_START, LIST_END)?;

    let mut periods = BTreeSet::new();
    // The fragment before the first anchor only holds the opening `<li>`.
    for link in split_on(list, LINK_START).into_iter().skip(1) {
        let raw = match extract_between(link, PERIOD_ID, QUOTE) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%err, "skipping period link");
                continue;
            }
        };
        match PeriodKey::new(String::from_utf8_lossy(raw)) {
            Ok(key) => {
                periods.insert(key);
            }
            Err(err) => tracing::warn!(%err, "skipping period link"),
        }
    }

    Ok(periods.into_iter().collect())
}

fn split_on<'a>(s: &'a [u8], sep: &[u8]) -> Vec<&'a [u8]> {
    let mut out = Vec::new();
    let mut rest = s;
    while let Some(idx) = crate::scrape::extract::find(rest, sep) {
        out.push(&rest[..idx]);
        rest = &rest[idx + sep.len()..];
    }
    out.push(rest);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/scrape/periods.rs"]
mod tests;
