use super::*;
use std::collections::HashSet;
use std::time::Duration;

fn page(commits: u8) -> Vec<u8> {
    format!(
        r#"<div data-percentages="{{&quot;Commits&quot;:{commits},&quot;Issues&quot;:1,&quot;Pull requests&quot;:2,&quot;Code review&quot;:3}}"></div>"#
    )
    .into_bytes()
}

struct FakeSource {
    failing: HashSet<&'static str>,
}

impl PageSource for FakeSource {
    fn activity_page(&self, _subject: &Subject, period: &PeriodKey) -> GifhubResult<Vec<u8>> {
        // Later periods finish first.
        let year: u64 = period.as_str().parse().unwrap_or(0);
        std::thread::sleep(Duration::from_millis(40u64.saturating_sub(year % 10 * 4)));
        if self.failing.contains(period.as_str()) {
            return Err(GifhubError::network(format!("GET status: 404: {period}")));
        }
        Ok(page((year % 100) as u8))
    }

    fn profile_page(&self, _subject: &Subject) -> GifhubResult<Vec<u8>> {
        Err(GifhubError::network("not used"))
    }
}

struct SolidRasterizer {
    fail_on: Option<&'static str>,
}

impl Rasterizer for SolidRasterizer {
    fn rasterize(&self, svg: &[u8]) -> GifhubResult<RgbaImage> {
        let text = String::from_utf8_lossy(svg);
        if let Some(bad) = self.fail_on
            && text.contains(bad)
        {
            return Err(GifhubError::validation("broken template"));
        }
        Ok(RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255])))
    }
}

fn keys(raw: &[&str]) -> Vec<PeriodKey> {
    raw.iter().map(|r| PeriodKey::new(*r).unwrap()).collect()
}

fn run(
    source: &dyn PageSource,
    rasterizer: &dyn Rasterizer,
    periods: &[&str],
) -> (GifhubResult<Vec<RenderedFrame>>, StageCounters) {
    let subject = Subject::new("octocat").unwrap();
    let style = GraphStyle::default();
    let counters = StageCounters::default();
    let res = std::thread::scope(|scope| {
        let p = gen_periods(keys(periods));
        let records = gen_activities(scope, source, &subject, p, &counters);
        let graphs = gen_graphs(
            scope,
            records,
            CanvasMetrics::default(),
            OffsetCurve::default(),
            &counters,
        );
        let frames = gen_frames(scope, graphs, &style, rasterizer, &counters);
        collect_frames(frames, &counters)
    });
    (res, counters)
}

fn periods_of(frames: &[RenderedFrame]) -> Vec<&str> {
    frames.iter().map(|f| f.period().as_str()).collect()
}

#[test]
fn frames_come_out_sorted_despite_completion_order() {
    let source = FakeSource {
        failing: HashSet::new(),
    };
    let (res, counters) = run(
        &source,
        &SolidRasterizer { fail_on: None },
        &["2016", "2019", "2017", "2018"],
    );
    let frames = res.unwrap();
    assert_eq!(periods_of(&frames), vec!["2016", "2017", "2018", "2019"]);
    assert_eq!(frames[0].record.commits, 16);
    assert_eq!(counters.fetch.launched(), 4);
    assert_eq!(counters.render.emitted(), 4);
    assert_eq!(counters.first_empty_stage(), None);
}

#[test]
fn failed_periods_are_dropped() {
    let source = FakeSource {
        failing: ["2017", "2019"].into_iter().collect(),
    };
    let (res, counters) = run(
        &source,
        &SolidRasterizer { fail_on: None },
        &["2016", "2017", "2018", "2019"],
    );
    assert_eq!(periods_of(&res.unwrap()), vec!["2016", "2018"]);
    assert_eq!(counters.fetch.launched(), 4);
    assert_eq!(counters.fetch.emitted(), 2);
}

#[test]
fn all_failures_name_the_fetch_stage() {
    let source = FakeSource {
        failing: ["2016", "2017"].into_iter().collect(),
    };
    let (res, _) = run(
        &source,
        &SolidRasterizer { fail_on: None },
        &["2016", "2017"],
    );
    assert!(matches!(
        res.unwrap_err(),
        GifhubError::EmptyResult { stage: "fetch" }
    ));
}

#[test]
fn render_failure_fails_the_run() {
    let source = FakeSource {
        failing: HashSet::new(),
    };
    let (res, _) = run(
        &source,
        &SolidRasterizer {
            fail_on: Some(">2018<"),
        },
        &["2017", "2018"],
    );
    let err = res.unwrap_err();
    assert!(matches!(err, GifhubError::Render(ref m) if m.contains("2018")), "{err}");
}

#[test]
fn unparsable_page_is_dropped_not_zeroed() {
    struct Garbage;
    impl PageSource for Garbage {
        fn activity_page(&self, _: &Subject, period: &PeriodKey) -> GifhubResult<Vec<u8>> {
            if period.as_str() == "2020" {
                Ok(br#"<div data-percentages="Commits:x,Issues:1}"></div>"#.to_vec())
            } else {
                Ok(page(7))
            }
        }
        fn profile_page(&self, _: &Subject) -> GifhubResult<Vec<u8>> {
            unreachable!()
        }
    }
    let (res, _) = run(&Garbage, &SolidRasterizer { fail_on: None }, &["2020", "2021"]);
    assert_eq!(periods_of(&res.unwrap()), vec!["2021"]);
}

#[test]
fn empty_input_names_fetch() {
    let counters = StageCounters::default();
    let (tx, rx) = mpsc::channel::<GifhubResult<RenderedFrame>>();
    drop(tx);
    assert!(matches!(
        collect_frames(rx, &counters),
        Err(GifhubError::EmptyResult { stage: "fetch" })
    ));
}

#[test]
fn first_empty_stage_walks_in_order() {
    let counters = StageCounters::default();
    counters.fetch.launch();
    counters.fetch.emit();
    assert_eq!(counters.first_empty_stage(), Some("layout"));
    counters.layout.emit();
    assert_eq!(counters.first_empty_stage(), Some("render"));
    counters.render.emit();
    assert_eq!(counters.first_empty_stage(), None);
}
