use image::{RgbImage, RgbaImage};
use ndarray::{Array2, Array4, ArrayView3, Axis};

use crate::foundation::error::{SeqError, SeqResult};

/// Batch of frames laid out as `(batch, height, width, channels)`, samples in `[0, 1]`.
pub type ImageBatch = Array4<f32>;

/// Per-pixel mask laid out as `(height, width)`; `1.0` means fully transparent.
pub type Mask = Array2<f32>;

/// Side length of the placeholder mask returned for images without alpha.
pub const EMPTY_MASK_SIZE: usize = 64;

/// Convert an 8-bit RGB image into a batch of one normalized frame.
pub fn rgb8_to_batch(img: &RgbImage) -> ImageBatch {
    let (w, h) = img.dimensions();
    Array4::from_shape_fn((1, h as usize, w as usize, 3), |(_, y, x, c)| {
        f32::from(img.get_pixel(x as u32, y as u32)[c]) / 255.0
    })
}

/// Convert an 8-bit RGBA image into a batch of one normalized frame with 4 channels.
pub fn rgba8_to_batch(img: &RgbaImage) -> ImageBatch {
    let (w, h) = img.dimensions();
    Array4::from_shape_fn((1, h as usize, w as usize, 4), |(_, y, x, c)| {
        f32::from(img.get_pixel(x as u32, y as u32)[c]) / 255.0
    })
}

/// Inverted alpha of `img`: `1 - alpha / 255`.
pub fn alpha_to_mask(img: &RgbaImage) -> Mask {
    let (w, h) = img.dimensions();
    Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
        1.0 - f32::from(img.get_pixel(x as u32, y as u32)[3]) / 255.0
    })
}

/// All-zero 64x64 mask used when the source carries no alpha channel.
pub fn empty_mask() -> Mask {
    Array2::zeros((EMPTY_MASK_SIZE, EMPTY_MASK_SIZE))
}

/// Map a normalized sample back to 8 bits, clipping out-of-range values.
///
/// Rounds to the nearest level, so an 8-bit value survives a normalize/denormalize
/// round trip exactly. Encoders that truncate (`floor`) can differ by one level for
/// the same input.
#[inline]
pub fn denormalize(v: f32) -> u8 {
    // NaN saturates to 0 through the cast.
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// 8-bit interleaved pixels of a single `(height, width, channels)` frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame8 {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channel count, 3 (RGB) or 4 (RGBA).
    pub channels: u8,
    /// Row-major interleaved samples.
    pub data: Vec<u8>,
}

/// Denormalize one frame. Only 3 and 4 channel frames are accepted.
pub fn frame_to_8bit(frame: ArrayView3<'_, f32>) -> SeqResult<Frame8> {
    let (h, w, c) = frame.dim();
    if c != 3 && c != 4 {
        return Err(SeqError::validation(format!(
            "expected 3 or 4 channels per pixel, got {c}"
        )));
    }
    if h == 0 || w == 0 {
        return Err(SeqError::validation(format!(
            "image must be non-empty, got {w}x{h}"
        )));
    }
    let width = u32::try_from(w).map_err(|_| SeqError::validation("image width overflow"))?;
    let height = u32::try_from(h).map_err(|_| SeqError::validation("image height overflow"))?;

    Ok(Frame8 {
        width,
        height,
        channels: c as u8,
        data: frame.iter().copied().map(denormalize).collect(),
    })
}

/// Number of frames in `batch`.
pub fn batch_len(batch: &ImageBatch) -> usize {
    batch.len_of(Axis(0))
}

#[cfg(test)]
#[path = "../tests/unit/tensor.rs"]
mod tests;
