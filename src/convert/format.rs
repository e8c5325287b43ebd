use crate::{
    buffer::{pixel::PixelBuffer, view::alloc_zeroed},
    foundation::core::{FULL_OPACITY, PixelFormat, Rgb},
    foundation::error::{RasterError, RasterResult},
};

/// Color that becomes fully transparent during an RGB to RGBA conversion.
///
/// The key is a property of a single conversion call, never stored on a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ColorKey {
    /// Pixels equal to this color get alpha 0.
    pub color: Rgb,
}

impl ColorKey {
    /// Key on `color`.
    pub const fn new(color: Rgb) -> Self {
        Self { color }
    }
}

/// Convert an RGB bitmap to RGBA.
///
/// Every pixel gets `alpha` (clamped to 100) unless it matches `key`, in which case it
/// gets alpha 0. The result always has meaningful alpha.
pub fn rgb_to_rgba(
    src: &PixelBuffer,
    alpha: u8,
    key: Option<ColorKey>,
) -> RasterResult<PixelBuffer> {
    let data = checked_source(src, PixelFormat::Rgb8)?;
    let alpha = alpha.min(FULL_OPACITY);
    let key = key.map(|k| [k.color.r, k.color.g, k.color.b]);

    let mut out = alloc_zeroed(PixelFormat::Rgba8.byte_len(src.width(), src.height()))?;
    for (dst, px) in out.chunks_exact_mut(4).zip(data.chunks_exact(3)) {
        dst[..3].copy_from_slice(px);
        dst[3] = if key.is_some_and(|k| k.as_slice() == px) { 0 } else { alpha };
    }
    let mut buf = PixelBuffer::from_raw(PixelFormat::Rgba8, src.width(), src.height(), out)?;
    buf.set_meaningful_alpha(true);
    Ok(buf)
}

/// Convert an RGBA bitmap to RGB, discarding alpha.
pub fn rgba_to_rgb(src: &PixelBuffer) -> RasterResult<PixelBuffer> {
    let data = checked_source(src, PixelFormat::Rgba8)?;
    let mut out = alloc_zeroed(PixelFormat::Rgb8.byte_len(src.width(), src.height()))?;
    for (dst, px) in out.chunks_exact_mut(3).zip(data.chunks_exact(4)) {
        dst.copy_from_slice(&px[..3]);
    }
    PixelBuffer::from_raw(PixelFormat::Rgb8, src.width(), src.height(), out)
}

fn checked_source(src: &PixelBuffer, want: PixelFormat) -> RasterResult<&[u8]> {
    let data = src
        .data()
        .map_err(|_| RasterError::state("cannot convert an unallocated buffer"))?;
    if src.format() != want {
        return Err(RasterError::parameter(format!(
            "expected a {want:?} source, got {:?}",
            src.format()
        )));
    }
    Ok(data)
}

#[cfg(test)]
#[path = "../../tests/unit/convert/format.rs"]
mod tests;
