use super::*;
use crate::foundation::error::{ExtractError, GifhubError};

fn overview_page(percentages: &str) -> Vec<u8> {
    format!(
        r#"<div class="js-activity-overview-graph-container" data-percentages="{percentages}">
<svg class="js-activity-overview-graph" width="100%"></svg></div>"#
    )
    .into_bytes()
}

#[test]
fn container_example_parses() {
    let got = parse_percentages(b"Commits:5,Issues:0,Pull requests:12,Code review:3}").unwrap();
    assert_eq!(
        got,
        ActivityPercentages {
            commits: 5,
            issues: 0,
            pull_requests: 12,
            code_reviews: 3,
        }
    );
}

#[test]
fn scrapes_entity_quoted_json_container() {
    let html = overview_page(
        "{&quot;Code review&quot;:4,&quot;Commits&quot;:81,&quot;Issues&quot;:2,&quot;Pull requests&quot;:13}",
    );
    let got = scrape_activity(&html).unwrap();
    assert_eq!(got.commits, 81);
    assert_eq!(got.issues, 2);
    assert_eq!(got.pull_requests, 13);
    assert_eq!(got.code_reviews, 4);
}

#[test]
fn missing_container_is_an_extraction_error() {
    let err = scrape_activity(b"<html><body>no graph here</body></html>").unwrap_err();
    assert!(matches!(
        err,
        GifhubError::Extraction(ExtractError::LeftAnchorNotFound(ref a)) if a == "data-percentages=\""
    ));
}

#[test]
fn container_without_any_label_names_commits() {
    let err = scrape_activity(&overview_page("{}")).unwrap_err();
    assert!(matches!(
        err,
        GifhubError::Extraction(ExtractError::LeftAnchorNotFound(ref a)) if a == "Commits:"
    ));
}

#[test]
fn non_numeric_value_is_a_parse_error() {
    let html = overview_page(
        "{&quot;Commits&quot;:8O,&quot;Issues&quot;:2,&quot;Pull requests&quot;:1,&quot;Code review&quot;:0}",
    );
    let err = scrape_activity(&html).unwrap_err();
    assert!(matches!(err, GifhubError::Parse { ref label, .. } if label == "Commits:"));
}

#[test]
fn into_record_tags_subject_and_period() {
    let pct = ActivityPercentages {
        commits: 1,
        ..Default::default()
    };
    let rec = pct.into_record(
        Subject::new("octocat").unwrap(),
        PeriodKey::new("2018").unwrap(),
    );
    assert_eq!(rec.subject.as_str(), "octocat");
    assert_eq!(rec.period.as_str(), "2018");
    assert_eq!(rec.commits, 1);
    assert_eq!(rec.code_reviews, 0);
}
