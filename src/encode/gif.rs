use std::io::Cursor;
use std::time::Duration;

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder, Delay, Frame, ImageDecoder, RgbaImage};

use crate::encode::bundle::{BundleOpts, FrameBundler, scale_frame, validate_frames};
use crate::foundation::error::{GifhubError, GifhubResult};

/// In-process GIF bundler built on the `image` crate's encoder.
///
/// Frames are palette-quantized individually; the animation loops forever.
#[derive(Clone, Copy, Debug)]
pub struct GifBundler {
    /// Quantizer speed, 1 (best) to 30 (fastest).
    pub speed: i32,
}

impl Default for GifBundler {
    fn default() -> Self {
        Self { speed: 10 }
    }
}

impl FrameBundler for GifBundler {
    #[tracing::instrument(skip_all, fields(frames = frames.len()))]
    fn bundle(&self, frames: &[RgbaImage], opts: &BundleOpts) -> GifhubResult<Vec<u8>> {
        validate_frames(frames, opts)?;
        let delay = Delay::from_saturating_duration(opts.frame_duration);

        let mut out = Vec::new();
        {
            let mut enc = GifEncoder::new_with_speed(&mut out, self.speed.clamp(1, 30));
            enc.set_repeat(Repeat::Infinite)
                .map_err(|e| GifhubError::encode(format!("gif repeat: {e}")))?;
            for (i, frame) in frames.iter().enumerate() {
                let scaled = scale_frame(frame, opts);
                enc.encode_frame(Frame::from_parts(scaled, 0, 0, delay))
                    .map_err(|e| GifhubError::encode(format!("gif frame {i}: {e}")))?;
            }
        }
        tracing::debug!(bytes = out.len(), "encoded gif");
        Ok(out)
    }
}

/// Frame count, size and timing of an encoded GIF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GifInfo {
    pub width: u32,
    pub height: u32,
    pub frame_delays: Vec<Duration>,
}

impl GifInfo {
    pub fn frame_count(&self) -> usize {
        self.frame_delays.len()
    }
}

/// Decode `bytes` fully and report its [`GifInfo`].
pub fn probe_gif(bytes: &[u8]) -> GifhubResult<GifInfo> {
    let dec = GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| GifhubError::encode(format!("decode gif: {e}")))?;
    let (width, height) = dec.dimensions();
    let frames = dec
        .into_frames()
        .collect_frames()
        .map_err(|e| GifhubError::encode(format!("decode gif frames: {e}")))?;
    Ok(GifInfo {
        width,
        height,
        frame_delays: frames.iter().map(|f| Duration::from(f.delay())).collect(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
