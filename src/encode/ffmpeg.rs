use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use image::RgbaImage;

use crate::encode::bundle::{BundleOpts, FrameBundler, validate_frames};
use crate::foundation::artifacts::{ArtifactLog, scratch_dir};
use crate::foundation::error::{GifhubError, GifhubResult};

/// Bundler that writes PNG frames to a scratch directory and lets the system `ffmpeg` build the
/// GIF with a generated palette.
///
/// Every file it writes is recorded in the shared [`ArtifactLog`].
#[derive(Debug)]
pub struct FfmpegBundler {
    program: PathBuf,
    artifacts: Arc<ArtifactLog>,
}

impl FfmpegBundler {
    pub fn new(artifacts: Arc<ArtifactLog>) -> Self {
        Self::with_program("ffmpeg", artifacts)
    }

    pub fn with_program(program: impl Into<PathBuf>, artifacts: Arc<ArtifactLog>) -> Self {
        Self {
            program: program.into(),
            artifacts,
        }
    }

    fn write_frames(&self, dir: &Path, frames: &[RgbaImage]) -> GifhubResult<()> {
        for (i, frame) in frames.iter().enumerate() {
            let path = dir.join(format!("frame_{i:04}.png"));
            frame
                .save_with_format(&path, image::ImageFormat::Png)
                .map_err(|e| GifhubError::encode(format!("write '{}': {e}", path.display())))?;
            self.artifacts.record(path);
        }
        Ok(())
    }
}

impl FrameBundler for FfmpegBundler {
    #[tracing::instrument(skip_all, fields(frames = frames.len()))]
    fn bundle(&self, frames: &[RgbaImage], opts: &BundleOpts) -> GifhubResult<Vec<u8>> {
        let (width, height) = validate_frames(frames, opts)?;
        if !is_program_on_path(&self.program) {
            return Err(GifhubError::encode(format!(
                "{} is required for this encoder, but was not found on PATH",
                self.program.display()
            )));
        }

        let dir = scratch_dir(&self.artifacts, "bundle")
            .map_err(|e| GifhubError::encode(format!("create scratch dir: {e}")))?;
        self.write_frames(&dir, frames)?;
        let out_path = dir.join("out.gif");
        self.artifacts.record(&out_path);

        let (out_w, out_h) = opts.scaled_size(width, height);
        let millis = opts.frame_duration.as_millis().max(1);
        let filter = format!(
            "scale={out_w}:{out_h}:flags=lanczos,split[a][b];[a]palettegen[p];[b][p]paletteuse"
        );

        let output = Command::new(&self.program)
            .args(["-y", "-loglevel", "error", "-framerate"])
            // Input rate as a rational so each frame lasts exactly `millis`.
            .arg(format!("1000/{millis}"))
            .arg("-i")
            .arg(dir.join("frame_%04d.png"))
            .args(["-vf", &filter, "-loop", "0"])
            .arg(&out_path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                GifhubError::encode(format!(
                    "failed to spawn {} (is it installed and on PATH?): {e}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            return Err(GifhubError::encode(format!(
                "{} exited with status {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        std::fs::read(&out_path)
            .map_err(|e| GifhubError::encode(format!("read '{}': {e}", out_path.display())))
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> GifhubResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `program -version` runs successfully.
pub fn is_program_on_path(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_program_on_path(Path::new("ffmpeg"))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
