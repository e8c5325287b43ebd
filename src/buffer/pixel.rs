use crate::{
    buffer::view::{Surface, SurfaceMut, alloc_zeroed},
    foundation::core::{PixelFormat, Rgba},
    foundation::error::{RasterError, RasterResult},
};

/// Owned RGB or RGBA bitmap.
///
/// A buffer is either allocated (`width * height * stride` bytes, row-major, tightly
/// packed) or empty. The empty state means "does not exist" and is distinct from any
/// real size; empty buffers report zero dimensions. Dropping the buffer releases its
/// storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    format: PixelFormat,
    width: u16,
    height: u16,
    data: Option<Vec<u8>>,
    meaningful_alpha: bool,
}

impl PixelBuffer {
    /// An unallocated buffer of the given format.
    pub fn empty(format: PixelFormat) -> Self {
        Self {
            format,
            width: 0,
            height: 0,
            data: None,
            meaningful_alpha: false,
        }
    }

    /// Allocate a zero-filled `width` x `height` buffer.
    pub fn allocate(format: PixelFormat, width: u16, height: u16) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::parameter(format!(
                "buffer dimensions must be non-zero (got {width}x{height})"
            )));
        }
        let data = alloc_zeroed(format.byte_len(width, height))?;
        Ok(Self {
            format,
            width,
            height,
            data: Some(data),
            meaningful_alpha: format.has_alpha(),
        })
    }

    /// Wrap existing bytes. `data.len()` must equal `width * height * stride`.
    pub fn from_raw(
        format: PixelFormat,
        width: u16,
        height: u16,
        data: Vec<u8>,
    ) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::parameter(format!(
                "buffer dimensions must be non-zero (got {width}x{height})"
            )));
        }
        let expected = format.byte_len(width, height);
        if data.len() != expected {
            return Err(RasterError::geometry(format!(
                "raw data is {} bytes, {width}x{height} {format:?} needs {expected}",
                data.len()
            )));
        }
        Ok(Self {
            format,
            width,
            height,
            data: Some(data),
            meaningful_alpha: format.has_alpha(),
        })
    }

    /// Pixel layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per pixel.
    pub fn stride(&self) -> usize {
        self.format.stride()
    }

    /// Width in pixels (0 when empty).
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels (0 when empty).
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Whether storage is allocated.
    pub fn exists(&self) -> bool {
        self.data.is_some()
    }

    /// Whether the buffer is in the unallocated state.
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    /// Length of the pixel data in bytes (0 when empty).
    pub fn byte_len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// Whether the alpha channel carries real transparency information.
    pub fn meaningful_alpha(&self) -> bool {
        self.meaningful_alpha
    }

    /// Mark the alpha channel as meaningful or not. Ignored for RGB buffers.
    pub fn set_meaningful_alpha(&mut self, v: bool) {
        self.meaningful_alpha = v && self.format.has_alpha();
    }

    /// Raw pixel bytes.
    pub fn data(&self) -> RasterResult<&[u8]> {
        self.data
            .as_deref()
            .ok_or_else(|| RasterError::state("pixel buffer is not allocated"))
    }

    /// Mutable raw pixel bytes.
    pub fn data_mut(&mut self) -> RasterResult<&mut [u8]> {
        self.data
            .as_deref_mut()
            .ok_or_else(|| RasterError::state("pixel buffer is not allocated"))
    }

    /// Consume the buffer and return its bytes, if any.
    pub fn into_raw(self) -> Option<Vec<u8>> {
        self.data
    }

    /// Release storage; the buffer keeps its format and becomes empty.
    pub fn erase(&mut self) {
        *self = Self::empty(self.format);
    }

    /// Move the contents out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::empty(self.format))
    }

    /// Pixel at `(x, y)`, or `None` when out of range or unallocated.
    ///
    /// RGB buffers report alpha 100.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        let view = self.view().ok()?;
        let (x, y) = in_bounds(x, y, self.width, self.height)?;
        Some(Rgba::read(view.pixel(x, y), self.format))
    }

    /// Overwrite the pixel at `(x, y)`. RGB buffers drop the alpha byte.
    pub fn put_pixel(&mut self, x: i32, y: i32, px: impl Into<Rgba>) -> RasterResult<()> {
        let (width, height, format) = (self.width, self.height, self.format);
        let data = self.data_mut()?;
        let (x, y) = in_bounds(x, y, width, height).ok_or_else(|| {
            RasterError::geometry(format!("pixel ({x}, {y}) outside {width}x{height} buffer"))
        })?;
        let off = (y * usize::from(width) + x) * format.stride();
        px.into().write(&mut data[off..off + format.stride()], format);
        Ok(())
    }

    /// Set every pixel to `px`.
    pub fn fill(&mut self, px: impl Into<Rgba>) -> RasterResult<()> {
        let px = px.into();
        let format = self.format;
        for chunk in self.data_mut()?.chunks_exact_mut(format.stride()) {
            px.write(chunk, format);
        }
        Ok(())
    }

    pub(crate) fn view(&self) -> RasterResult<Surface<'_>> {
        Ok(Surface {
            data: self.data()?,
            width: self.width,
            height: self.height,
            format: self.format,
        })
    }

    pub(crate) fn view_mut(&mut self) -> RasterResult<SurfaceMut<'_>> {
        let (width, height, format) = (self.width, self.height, self.format);
        Ok(SurfaceMut {
            data: self.data_mut()?,
            width,
            height,
            format,
        })
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::empty(PixelFormat::Rgba8)
    }
}

pub(crate) fn in_bounds(x: i32, y: i32, width: u16, height: u16) -> Option<(usize, usize)> {
    let x = usize::try_from(x).ok()?;
    let y = usize::try_from(y).ok()?;
    (x < usize::from(width) && y < usize::from(height)).then_some((x, y))
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/pixel.rs"]
mod tests;
