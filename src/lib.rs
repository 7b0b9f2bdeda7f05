//! gifhub turns a GitHub user's yearly activity overview into an animated GIF.
//!
//! A run moves every requested year through five stages:
//!
//! - emit the requested periods
//! - fetch and parse each period's activity percentages (one thread per period)
//! - lay out the four-axis graph geometry
//! - draw and rasterize each graph (one thread per graph)
//! - collect the frames in period order and bundle them into a GIF
//!
//! Periods whose fetch or parse fails are dropped; see [`render_subject`] for the full run and
//! [`collect_ordered_frames`] for the frame-producing part alone.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod encode;
pub(crate) mod layout;
pub(crate) mod pipeline;
pub(crate) mod render;
pub(crate) mod scrape;
pub(crate) mod source;

pub use crate::foundation::artifacts::{ArtifactLog, scratch_dir};
pub use crate::foundation::core::{ActivityRecord, Metric, PeriodKey, PeriodSelection, Subject};
pub use crate::foundation::error::{ExtractError, GifhubError, GifhubResult};
pub use crate::foundation::math::{CURVE_SCALE, OffsetCurve, capped_offset, saturating_ratio};

pub use crate::encode::bundle::{BundleOpts, FrameBundler};
pub use crate::encode::ffmpeg::{FfmpegBundler, is_ffmpeg_on_path};
pub use crate::encode::gif::{GifBundler, GifInfo, probe_gif};
pub use crate::layout::geometry::{
    CanvasMetrics, GeometryDescriptor, GraphDescriptor, layout_graph,
};
pub use crate::pipeline::run::{
    PipelineOpts, RunManifest, Services, collect_ordered_frames, gif_path, render_subject,
    resolve_periods, write_manifest,
};
pub use crate::pipeline::stages::{RenderedFrame, StageCounter, StageCounters};
pub use crate::render::raster::{Rasterizer, ResvgRasterizer, RsvgConvertRasterizer};
pub use crate::render::template::{GraphStyle, graph_svg};
pub use crate::scrape::activity::{ActivityPercentages, scrape_activity};
pub use crate::scrape::extract::{extract_between, extract_fields};
pub use crate::scrape::periods::scrape_periods;
pub use crate::source::http::{HttpSource, HttpSourceOpts, PageSource, USER_AGENT};
