use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::Scope;

use image::RgbaImage;

use crate::foundation::core::{ActivityRecord, PeriodKey, Subject};
use crate::foundation::error::{GifhubError, GifhubResult};
use crate::foundation::math::OffsetCurve;
use crate::layout::geometry::{CanvasMetrics, GraphDescriptor, layout_graph};
use crate::render::raster::Rasterizer;
use crate::render::template::{GraphStyle, graph_svg};
use crate::scrape::activity::scrape_activity;
use crate::source::http::PageSource;

/// One rasterized graph, tagged with the record it was drawn from.
#[derive(Clone, Debug)]
pub struct RenderedFrame {
    pub record: ActivityRecord,
    pub image: RgbaImage,
}

impl RenderedFrame {
    pub fn period(&self) -> &PeriodKey {
        &self.record.period
    }
}

/// Launched/emitted counts of one stage.
#[derive(Debug, Default)]
pub struct StageCounter {
    launched: AtomicU64,
    emitted: AtomicU64,
}

impl StageCounter {
    fn launch(&self) {
        self.launched.fetch_add(1, Ordering::Relaxed);
    }

    fn emit(&self) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn launched(&self) -> u64 {
        self.launched.load(Ordering::Relaxed)
    }

    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }
}

/// Per-stage progress of one run.
#[derive(Debug, Default)]
pub struct StageCounters {
    pub fetch: StageCounter,
    pub layout: StageCounter,
    pub render: StageCounter,
}

impl StageCounters {
    /// Name of the first stage that emitted nothing, if any.
    pub fn first_empty_stage(&self) -> Option<&'static str> {
        [
            ("fetch", &self.fetch),
            ("layout", &self.layout),
            ("render", &self.render),
        ]
        .into_iter()
        .find(|(_, c)| c.emitted() == 0)
        .map(|(name, _)| name)
    }

    fn log_summary(&self) {
        for (stage, c) in [
            ("fetch", &self.fetch),
            ("layout", &self.layout),
            ("render", &self.render),
        ] {
            tracing::info!(stage, launched = c.launched(), emitted = c.emitted(), "stage done");
        }
    }
}

/// Spawn one scoped thread per input item and forward every `Some` result.
///
/// The returned receiver disconnects once the input is exhausted and every launched task has
/// finished: each task owns a sender clone and the dispatcher drops its own after the last launch.
fn fan_out<'scope, T, U, F>(
    scope: &'scope Scope<'scope, '_>,
    input: Receiver<T>,
    counter: &'scope StageCounter,
    task: F,
) -> Receiver<U>
where
    T: Send + 'scope,
    U: Send + 'scope,
    F: Fn(T) -> Option<U> + Send + Sync + 'scope,
{
    let (tx, rx) = mpsc::channel::<U>();
    let task = Arc::new(task);
    scope.spawn(move || {
        for item in input {
            counter.launch();
            let tx = tx.clone();
            let task = Arc::clone(&task);
            scope.spawn(move || {
                if let Some(out) = task(item) {
                    counter.emit();
                    // The sink only hangs up after failing the run.
                    let _ = tx.send(out);
                }
            });
        }
    });
    rx
}

/// Source stage: emits each requested period once.
pub fn gen_periods(periods: impl IntoIterator<Item = PeriodKey>) -> Receiver<PeriodKey> {
    let (tx, rx) = mpsc::channel();
    for p in periods {
        // Receiver is alive in this scope.
        let _ = tx.send(p);
    }
    rx
}

/// Fetch one period's activity page and parse its percentages.
#[tracing::instrument(skip_all, fields(subject = %subject, period = %period))]
pub fn fetch_activity(
    source: &dyn PageSource,
    subject: &Subject,
    period: &PeriodKey,
) -> GifhubResult<ActivityRecord> {
    let html = source.activity_page(subject, period)?;
    let percentages = scrape_activity(&html)?;
    let record = percentages.into_record(subject.clone(), period.clone());
    tracing::debug!(
        commits = record.commits,
        issues = record.issues,
        pull_requests = record.pull_requests,
        code_reviews = record.code_reviews,
        "parsed activity"
    );
    Ok(record)
}

/// Fetch/parse stage: one task per period; failed periods are logged and dropped.
pub fn gen_activities<'scope>(
    scope: &'scope Scope<'scope, '_>,
    source: &'scope dyn PageSource,
    subject: &'scope Subject,
    periods: Receiver<PeriodKey>,
    counters: &'scope StageCounters,
) -> Receiver<ActivityRecord> {
    fan_out(scope, periods, &counters.fetch, move |period: PeriodKey| {
        match fetch_activity(source, subject, &period) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(%period, error = %err, "dropping period");
                None
            }
        }
    })
}

/// Layout stage: sequential record -> geometry.
pub fn gen_graphs<'scope>(
    scope: &'scope Scope<'scope, '_>,
    records: Receiver<ActivityRecord>,
    canvas: CanvasMetrics,
    curve: OffsetCurve,
    counters: &'scope StageCounters,
) -> Receiver<GraphDescriptor> {
    let (tx, rx) = mpsc::channel();
    scope.spawn(move || {
        for record in records {
            counters.layout.launch();
            let graph = layout_graph(record, canvas, curve);
            counters.layout.emit();
            if tx.send(graph).is_err() {
                break;
            }
        }
    });
    rx
}

/// Draw one graph and rasterize it.
#[tracing::instrument(skip_all, fields(period = %graph.record.period))]
pub fn render_graph(
    graph: GraphDescriptor,
    style: &GraphStyle,
    rasterizer: &dyn Rasterizer,
) -> GifhubResult<RenderedFrame> {
    let svg = graph_svg(&graph, style);
    let image = rasterizer.rasterize(svg.as_bytes()).map_err(|e| match e {
        GifhubError::Render(_) => e,
        other => GifhubError::render(format!("period {}: {other}", graph.record.period)),
    })?;
    tracing::debug!(width = image.width(), height = image.height(), "rendered frame");
    Ok(RenderedFrame {
        record: graph.record,
        image,
    })
}

/// Render stage: one task per graph. Failures are forwarded so the sink can fail the run.
pub fn gen_frames<'scope>(
    scope: &'scope Scope<'scope, '_>,
    graphs: Receiver<GraphDescriptor>,
    style: &'scope GraphStyle,
    rasterizer: &'scope dyn Rasterizer,
    counters: &'scope StageCounters,
) -> Receiver<GifhubResult<RenderedFrame>> {
    fan_out(scope, graphs, &counters.render, move |graph| {
        Some(render_graph(graph, style, rasterizer))
    })
}

/// Sink stage: drain every frame, fail on the first render error, order by period.
pub fn collect_frames(
    frames: Receiver<GifhubResult<RenderedFrame>>,
    counters: &StageCounters,
) -> GifhubResult<Vec<RenderedFrame>> {
    let mut out = Vec::new();
    for frame in frames {
        out.push(frame?);
    }
    counters.log_summary();

    if out.is_empty() {
        return Err(GifhubError::empty(
            counters.first_empty_stage().unwrap_or("render"),
        ));
    }
    out.sort_by(|a, b| a.period().cmp(b.period()));
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/stages.rs"]
mod tests;
