use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::encode::bundle::{BundleOpts, FrameBundler};
use crate::encode::ffmpeg::ensure_parent_dir;
use crate::foundation::artifacts::ArtifactLog;
use crate::foundation::core::{ActivityRecord, PeriodKey, PeriodSelection, Subject};
use crate::foundation::error::{GifhubError, GifhubResult};
use crate::foundation::math::OffsetCurve;
use crate::layout::geometry::CanvasMetrics;
use crate::pipeline::stages::{
    RenderedFrame, StageCounters, collect_frames, gen_activities, gen_frames, gen_graphs,
    gen_periods,
};
use crate::render::raster::Rasterizer;
use crate::render::template::GraphStyle;
use crate::scrape::periods::scrape_periods;
use crate::source::http::PageSource;

/// Options for [`render_subject`].
#[derive(Clone, Debug)]
pub struct PipelineOpts {
    pub periods: PeriodSelection,
    /// Directory the GIF (and manifest) are written to; created when missing.
    pub out_dir: PathBuf,
    pub bundle: BundleOpts,
    pub canvas: CanvasMetrics,
    pub curve: OffsetCurve,
    pub style: GraphStyle,
    /// Leave temporary artifacts on disk instead of deleting them when the run ends.
    pub keep_temp: bool,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            periods: PeriodSelection::All,
            out_dir: PathBuf::from("out"),
            bundle: BundleOpts::default(),
            canvas: CanvasMetrics::default(),
            curve: OffsetCurve::default(),
            style: GraphStyle::default(),
            keep_temp: false,
        }
    }
}

/// The pluggable collaborators of a run.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub source: &'a dyn PageSource,
    pub rasterizer: &'a dyn Rasterizer,
    pub bundler: &'a dyn FrameBundler,
    pub artifacts: &'a ArtifactLog,
}

/// Summary of a finished run; serialized as the optional JSON manifest.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RunManifest {
    pub subject: Subject,
    pub output: PathBuf,
    pub requested: Vec<PeriodKey>,
    pub dropped: Vec<PeriodKey>,
    /// One entry per frame, in frame order.
    pub frames: Vec<ActivityRecord>,
    pub frame_duration_ms: u64,
    pub scale: f64,
    pub bytes: usize,
}

/// Turn a [`PeriodSelection`] into concrete periods, discovering them from the profile page for
/// [`PeriodSelection::All`].
pub fn resolve_periods(
    source: &dyn PageSource,
    subject: &Subject,
    selection: &PeriodSelection,
) -> GifhubResult<Vec<PeriodKey>> {
    match selection {
        PeriodSelection::Explicit(periods) => Ok(periods.clone()),
        PeriodSelection::All => {
            let html = source.profile_page(subject)?;
            let periods = scrape_periods(&html)?;
            if periods.is_empty() {
                return Err(GifhubError::empty("periods"));
            }
            tracing::info!(count = periods.len(), "discovered periods");
            Ok(periods)
        }
    }
}

/// Run every stage for `periods` and return the rendered frames in ascending period order.
///
/// Periods that fail to fetch or parse are dropped; a render failure fails the whole run.
#[tracing::instrument(skip_all, fields(subject = %subject, periods = periods.len()))]
pub fn collect_ordered_frames(
    source: &dyn PageSource,
    rasterizer: &dyn Rasterizer,
    subject: &Subject,
    periods: &[PeriodKey],
    opts: &PipelineOpts,
) -> GifhubResult<Vec<RenderedFrame>> {
    let unique: BTreeSet<PeriodKey> = periods.iter().cloned().collect();
    let counters = StageCounters::default();

    std::thread::scope(|scope| {
        let periods = gen_periods(unique);
        let records = gen_activities(scope, source, subject, periods, &counters);
        let graphs = gen_graphs(scope, records, opts.canvas, opts.curve, &counters);
        let frames = gen_frames(scope, graphs, &opts.style, rasterizer, &counters);
        collect_frames(frames, &counters)
    })
}

/// Full run: resolve periods, render the frames, bundle them and write `<out_dir>/<subject>.gif`.
///
/// Temporary artifacts are removed afterwards, on success and on failure, unless
/// [`PipelineOpts::keep_temp`] is set.
pub fn render_subject(
    services: Services<'_>,
    subject: &Subject,
    opts: &PipelineOpts,
) -> GifhubResult<RunManifest> {
    let res = run_inner(services, subject, opts);
    if opts.keep_temp {
        tracing::info!(count = services.artifacts.len(), "keeping temporary artifacts");
    } else {
        services.artifacts.remove_all();
    }
    res
}

fn run_inner(
    services: Services<'_>,
    subject: &Subject,
    opts: &PipelineOpts,
) -> GifhubResult<RunManifest> {
    opts.bundle.validate()?;
    let requested = resolve_periods(services.source, subject, &opts.periods)?;
    let frames = collect_ordered_frames(
        services.source,
        services.rasterizer,
        subject,
        &requested,
        opts,
    )?;

    let images: Vec<_> = frames.iter().map(|f| f.image.clone()).collect();
    let gif = services.bundler.bundle(&images, &opts.bundle)?;

    let output = gif_path(&opts.out_dir, subject);
    ensure_parent_dir(&output)?;
    std::fs::write(&output, &gif)
        .map_err(|e| GifhubError::encode(format!("write '{}': {e}", output.display())))?;
    tracing::info!(path = %output.display(), bytes = gif.len(), frames = frames.len(), "wrote gif");

    let rendered: BTreeSet<&PeriodKey> = frames.iter().map(RenderedFrame::period).collect();
    let dropped = requested
        .iter()
        .filter(|p| !rendered.contains(p))
        .cloned()
        .collect();

    Ok(RunManifest {
        subject: subject.clone(),
        output,
        requested,
        dropped,
        frames: frames.into_iter().map(|f| f.record).collect(),
        frame_duration_ms: u64::try_from(opts.bundle.frame_duration.as_millis())
            .unwrap_or(u64::MAX),
        scale: opts.bundle.scale,
        bytes: gif.len(),
    })
}

pub fn gif_path(out_dir: &Path, subject: &Subject) -> PathBuf {
    out_dir.join(format!("{subject}.gif"))
}

pub fn manifest_path(out_dir: &Path, subject: &Subject) -> PathBuf {
    out_dir.join(format!("{subject}.json"))
}

/// Write `manifest` as pretty JSON next to its GIF and return the path.
pub fn write_manifest(out_dir: &Path, manifest: &RunManifest) -> GifhubResult<PathBuf> {
    let path = manifest_path(out_dir, &manifest.subject);
    ensure_parent_dir(&path)?;
    let json = serde_json::to_vec_pretty(manifest)
        .map_err(|e| GifhubError::validation(format!("serialize manifest: {e}")))?;
    std::fs::write(&path, json)
        .map_err(|e| GifhubError::validation(format!("write '{}': {e}", path.display())))?;
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/run.rs"]
mod tests;
