use std::time::Duration;

use image::RgbaImage;
use image::imageops::FilterType;

use crate::foundation::error::{GifhubError, GifhubResult};

/// Timing and scaling applied when frames are bundled into an animation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BundleOpts {
    /// Display duration of every frame. GIF stores delays in 10 ms units, so anything else is
    /// rejected by [`BundleOpts::validate`].
    pub frame_duration: Duration,
    /// Resize factor applied to every frame (`1.0` keeps the rendered size).
    pub scale: f64,
}

impl Default for BundleOpts {
    fn default() -> Self {
        Self {
            frame_duration: Duration::from_millis(1000),
            scale: 1.0,
        }
    }
}

/// GIF delay unit.
pub const DELAY_UNIT: Duration = Duration::from_millis(10);

/// Largest frame edge a GIF logical screen can describe.
pub const MAX_EDGE: u32 = u16::MAX as u32;

impl BundleOpts {
    /// Reject options a GIF cannot represent exactly: the frame duration must be a non-zero
    /// multiple of [`DELAY_UNIT`].
    pub fn validate(&self) -> GifhubResult<()> {
        if self.frame_duration.is_zero() {
            return Err(GifhubError::encode("frame duration must be non-zero"));
        }
        if self.frame_duration.as_nanos() % DELAY_UNIT.as_nanos() != 0 {
            return Err(GifhubError::encode(format!(
                "frame duration must be a multiple of {}ms, got {:?}",
                DELAY_UNIT.as_millis(),
                self.frame_duration
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(GifhubError::encode(format!(
                "scale must be a positive finite number, got {}",
                self.scale
            )));
        }
        Ok(())
    }

    /// Output size of a `width`x`height` frame after scaling.
    pub fn scaled_size(&self, width: u32, height: u32) -> (u32, u32) {
        let s = |v: u32| ((f64::from(v) * self.scale).round() as u32).max(1);
        (s(width), s(height))
    }

    /// [`Self::scaled_size`], failing when either edge exceeds [`MAX_EDGE`].
    pub fn checked_scaled_size(&self, width: u32, height: u32) -> GifhubResult<(u32, u32)> {
        let fits = |v: u32| f64::from(v) * self.scale <= f64::from(MAX_EDGE);
        if !fits(width) || !fits(height) {
            return Err(GifhubError::encode(format!(
                "{width}x{height} scaled by {} exceeds the {MAX_EDGE}px GIF edge limit",
                self.scale
            )));
        }
        Ok(self.scaled_size(width, height))
    }
}

/// Assembles ordered, equal-size frames into one animated image.
pub trait FrameBundler: Send + Sync {
    fn bundle(&self, frames: &[RgbaImage], opts: &BundleOpts) -> GifhubResult<Vec<u8>>;
}

/// Checks shared by every bundler: options are sane, at least one frame, equal dimensions, and
/// the scaled size fits a GIF.
///
/// Returns the common (unscaled) frame size.
pub fn validate_frames(frames: &[RgbaImage], opts: &BundleOpts) -> GifhubResult<(u32, u32)> {
    opts.validate()?;
    let Some(first) = frames.first() else {
        return Err(GifhubError::encode("no frames to bundle"));
    };
    let dims = first.dimensions();
    if let Some((i, f)) = frames
        .iter()
        .enumerate()
        .find(|(_, f)| f.dimensions() != dims)
    {
        return Err(GifhubError::encode(format!(
            "frame {i} is {}x{}, expected {}x{}",
            f.width(),
            f.height(),
            dims.0,
            dims.1
        )));
    }
    opts.checked_scaled_size(dims.0, dims.1)?;
    Ok(dims)
}

/// Resize `frame` by `opts.scale`; a no-op at scale 1.
pub fn scale_frame(frame: &RgbaImage, opts: &BundleOpts) -> RgbaImage {
    let (w, h) = opts.scaled_size(frame.width(), frame.height());
    if (w, h) == frame.dimensions() {
        return frame.clone();
    }
    image::imageops::resize(frame, w, h, FilterType::Triangle)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/bundle.rs"]
mod tests;
