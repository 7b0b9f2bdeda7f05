use super::*;
use crate::foundation::core::{ActivityRecord, PeriodKey, Subject};
use crate::foundation::math::OffsetCurve;
use crate::layout::geometry::{CanvasMetrics, layout_graph};

fn graph(commits: u8, issues: u8, pull_requests: u8, code_reviews: u8) -> GraphDescriptor {
    layout_graph(
        ActivityRecord {
            subject: Subject::new("octo_cat").unwrap(),
            period: PeriodKey::new("2019").unwrap(),
            commits,
            issues,
            pull_requests,
            code_reviews,
        },
        CanvasMetrics::default(),
        OffsetCurve::default(),
    )
}

#[test]
fn svg_parses_with_usvg() {
    let svg = graph_svg(&graph(70, 5, 20, 5), &GraphStyle::default());
    let tree = usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
    assert_eq!(tree.size().width(), 500.0);
    assert_eq!(tree.size().height(), 560.0);
}

#[test]
fn markers_only_for_nonzero_metrics() {
    let svg = graph_svg(&graph(70, 0, 20, 0), &GraphStyle::default());
    assert_eq!(svg.matches("<circle").count(), 2);

    let svg = graph_svg(&graph(0, 0, 0, 0), &GraphStyle::default());
    assert_eq!(svg.matches("<circle").count(), 0);
}

#[test]
fn captions_and_values_are_present() {
    let svg = graph_svg(&graph(70, 5, 20, 0), &GraphStyle::default());
    for needle in [
        ">octo_cat<",
        ">2019<",
        ">Commits<",
        ">Issues<",
        ">Pull Requests<",
        ">Code Review<",
        ">70%<",
        ">5%<",
        ">20%<",
        ">0%<",
    ] {
        assert!(svg.contains(needle), "missing {needle}");
    }
    // Two font sizes: captions and values.
    assert_eq!(svg.matches(r#"font-size="24""#).count(), 6);
    assert_eq!(svg.matches(r#"font-size="22""#).count(), 4);
}

#[test]
fn style_colors_are_emitted_as_hex() {
    let svg = graph_svg(&graph(1, 1, 1, 1), &GraphStyle::default());
    assert!(svg.contains("#7bc96f"));
    assert!(svg.contains("#6cb267"));
    assert!(svg.contains("#ffffff"));
}

#[test]
fn text_is_xml_escaped() {
    assert_eq!(escape_xml(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&apos;");
}
