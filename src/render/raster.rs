use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbaImage;

use crate::foundation::artifacts::{ArtifactLog, scratch_dir};
use crate::foundation::error::{GifhubError, GifhubResult};

/// Turns an SVG document into straight-alpha RGBA8 pixels.
///
/// One rasterizer is shared by every render task of a run.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, svg: &[u8]) -> GifhubResult<RgbaImage>;
}

/// Largest raster edge accepted from an SVG's declared size.
const MAX_DIM: u32 = 16_384;

/// In-process rasterizer backed by `resvg`.
///
/// System fonts are loaded once at construction and shared across tasks.
#[derive(Clone)]
pub struct ResvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgRasterizer {
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Rasterizer with an explicit font database (empty databases render no text).
    pub fn with_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { fontdb }
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResvgRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResvgRasterizer")
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&self, svg: &[u8]) -> GifhubResult<RgbaImage> {
        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg, &opts)
            .map_err(|e| GifhubError::render(format!("parse svg: {e}")))?;

        let size = tree.size().to_int_size();
        let (width, height) = (size.width(), size.height());
        if width > MAX_DIM || height > MAX_DIM {
            return Err(GifhubError::render(format!(
                "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
            )));
        }

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| GifhubError::render("failed to allocate svg pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::default(),
            &mut pixmap.as_mut(),
        );

        let mut data = Vec::with_capacity(pixmap.data().len());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        RgbaImage::from_raw(width, height, data)
            .ok_or_else(|| GifhubError::render("pixmap size does not match its dimensions"))
    }
}

/// Rasterizer that round-trips through the `rsvg-convert` executable.
///
/// Every SVG and PNG it writes is recorded in the shared [`ArtifactLog`]; render tasks call it in
/// parallel.
#[derive(Debug)]
pub struct RsvgConvertRasterizer {
    program: PathBuf,
    workdir: PathBuf,
    artifacts: Arc<ArtifactLog>,
    seq: AtomicU64,
}

impl RsvgConvertRasterizer {
    pub fn new(artifacts: Arc<ArtifactLog>) -> GifhubResult<Self> {
        Self::with_program("rsvg-convert", artifacts)
    }

    pub fn with_program(
        program: impl Into<PathBuf>,
        artifacts: Arc<ArtifactLog>,
    ) -> GifhubResult<Self> {
        let workdir = scratch_dir(&artifacts, "raster").map_err(|e| {
            GifhubError::render(format!("failed to create raster scratch dir: {e}"))
        })?;
        Ok(Self {
            program: program.into(),
            workdir,
            artifacts,
            seq: AtomicU64::new(0),
        })
    }
}

impl Rasterizer for RsvgConvertRasterizer {
    fn rasterize(&self, svg: &[u8]) -> GifhubResult<RgbaImage> {
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        let svg_path = self.workdir.join(format!("frame_{n:04}.svg"));
        let png_path = self.workdir.join(format!("frame_{n:04}.png"));

        std::fs::write(&svg_path, svg).map_err(|e| {
            GifhubError::render(format!("write '{}': {e}", svg_path.display()))
        })?;
        self.artifacts.record(&svg_path);

        let out = Command::new(&self.program)
            .args(["--format", "png", "--output"])
            .arg(&png_path)
            .arg(&svg_path)
            .output()
            .map_err(|e| {
                GifhubError::render(format!(
                    "failed to spawn {} (is it installed and on PATH?): {e}",
                    self.program.display()
                ))
            })?;
        self.artifacts.record(&png_path);

        if !out.status.success() {
            return Err(GifhubError::render(format!(
                "{} exited with status {}: {}",
                self.program.display(),
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let img = image::open(&png_path).map_err(|e| {
            GifhubError::render(format!("decode '{}': {e}", png_path.display()))
        })?;
        Ok(img.to_rgba8())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
