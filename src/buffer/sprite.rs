use crate::{
    buffer::pixel::{PixelBuffer, in_bounds},
    buffer::view::{Surface, SurfaceMut, alloc_zeroed},
    foundation::core::{PixelFormat, Rgba},
    foundation::error::{RasterError, RasterResult},
};

/// Multi-frame RGBA sprite.
///
/// All frames share one size and live in a single contiguous allocation; frame `i`
/// starts at `i * width * height * 4`. The stack also carries a per-frame duration
/// table (0 = "use the caller's default"), a current-frame cursor and a signed screen
/// position used as the anchor when plotting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpriteStack {
    width: u16,
    height: u16,
    frame_count: u8,
    durations: Vec<u8>,
    frames: Vec<u8>,
    current_frame: u8,
    x: i16,
    y: i16,
    has_default_durations: bool,
}

impl SpriteStack {
    /// Pixel layout shared by every frame.
    pub const FORMAT: PixelFormat = PixelFormat::Rgba8;

    /// An unallocated sprite.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Allocate `frame_count` zeroed frames of `width` x `height`.
    ///
    /// Durations start at 0, so the new stack uses default timings.
    pub fn allocate(frame_count: u8, width: u16, height: u16) -> RasterResult<Self> {
        check_shape(frame_count, width, height)?;
        let frame_len = Self::FORMAT.byte_len(width, height);
        let frames = alloc_zeroed(frame_len * usize::from(frame_count))?;
        Ok(Self {
            width,
            height,
            frame_count,
            durations: vec![0; usize::from(frame_count)],
            frames,
            current_frame: 0,
            x: 0,
            y: 0,
            has_default_durations: true,
        })
    }

    /// Assemble a stack from a duration table and the concatenated frame bytes.
    pub fn from_parts(
        width: u16,
        height: u16,
        durations: Vec<u8>,
        frames: Vec<u8>,
    ) -> RasterResult<Self> {
        let frame_count = u8::try_from(durations.len()).map_err(|_| {
            RasterError::parameter(format!(
                "sprite supports at most 255 frames (got {})",
                durations.len()
            ))
        })?;
        check_shape(frame_count, width, height)?;
        let expected = Self::FORMAT.byte_len(width, height) * usize::from(frame_count);
        if frames.len() != expected {
            return Err(RasterError::geometry(format!(
                "frame data is {} bytes, {frame_count} frames of {width}x{height} need {expected}",
                frames.len()
            )));
        }
        let has_default_durations = durations.contains(&0);
        Ok(Self {
            width,
            height,
            frame_count,
            durations,
            frames,
            current_frame: 0,
            x: 0,
            y: 0,
            has_default_durations,
        })
    }

    /// Build a stack from same-sized bitmaps, one frame each.
    ///
    /// RGB bitmaps become opaque frames. An empty `durations` slice means
    /// "all defaults"; otherwise it must have one entry per frame.
    pub fn from_buffers(buffers: &[PixelBuffer], durations: &[u8]) -> RasterResult<Self> {
        let first = buffers
            .first()
            .ok_or_else(|| RasterError::parameter("sprite needs at least one frame"))?;
        let (width, height) = (first.width(), first.height());
        let durations = if durations.is_empty() {
            vec![0; buffers.len()]
        } else if durations.len() == buffers.len() {
            durations.to_vec()
        } else {
            return Err(RasterError::parameter(format!(
                "{} durations given for {} frames",
                durations.len(),
                buffers.len()
            )));
        };

        let frame_len = Self::FORMAT.byte_len(width, height);
        let mut frames = Vec::new();
        frames
            .try_reserve_exact(frame_len.saturating_mul(buffers.len()))
            .map_err(|e| RasterError::allocation(format!("sprite frames: {e}")))?;
        for (i, buf) in buffers.iter().enumerate() {
            let view = buf.view()?;
            if view.width != width || view.height != height {
                return Err(RasterError::geometry(format!(
                    "frame {i} is {}x{}, expected {width}x{height}",
                    view.width, view.height
                )));
            }
            match view.format {
                PixelFormat::Rgba8 => frames.extend_from_slice(view.data),
                PixelFormat::Rgb8 => {
                    for px in view.data.chunks_exact(view.format.stride()) {
                        let px = Rgba::read(px, view.format);
                        frames.extend_from_slice(&[px.r, px.g, px.b, px.a]);
                    }
                }
            }
        }
        Self::from_parts(width, height, durations, frames)
    }

    /// Whether frames are allocated.
    pub fn exists(&self) -> bool {
        self.frame_count > 0
    }

    /// Whether the sprite is in the unallocated state.
    pub fn is_empty(&self) -> bool {
        !self.exists()
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of frames (0 when empty).
    pub fn frame_count(&self) -> u8 {
        self.frame_count
    }

    /// Index of the last frame.
    pub fn last_frame(&self) -> u8 {
        self.frame_count.saturating_sub(1)
    }

    /// Bytes per frame.
    pub fn frame_len(&self) -> usize {
        Self::FORMAT.byte_len(self.width, self.height)
    }

    /// Screen position (top-left anchor), may be negative.
    pub fn position(&self) -> (i16, i16) {
        (self.x, self.y)
    }

    /// Move the sprite's anchor.
    pub fn set_position(&mut self, x: i16, y: i16) {
        self.x = x;
        self.y = y;
    }

    /// Cursor into the frame list.
    pub fn current_frame(&self) -> u8 {
        self.current_frame
    }

    /// Select a frame; indices past the end select the last frame.
    pub fn set_current_frame(&mut self, frame: u8) -> u8 {
        self.current_frame = frame.min(self.last_frame());
        self.current_frame
    }

    /// Step to the next frame, wrapping to 0 after the last one.
    pub fn advance(&mut self) -> u8 {
        self.current_frame = if self.current_frame + 1 >= self.frame_count {
            0
        } else {
            self.current_frame + 1
        };
        self.current_frame
    }

    /// Whether any frame uses the caller-default duration (stored as 0).
    pub fn has_default_durations(&self) -> bool {
        self.has_default_durations
    }

    /// The full duration table.
    pub fn durations(&self) -> &[u8] {
        &self.durations
    }

    /// Stored duration of `frame`, or `None` if the frame does not exist.
    pub fn duration(&self, frame: u8) -> Option<u8> {
        self.durations.get(usize::from(frame)).copied()
    }

    /// Duration of `frame` with the 0 sentinel replaced by `default`.
    pub fn effective_duration(&self, frame: u8, default: u8) -> Option<u8> {
        self.duration(frame)
            .map(|d| if d == 0 { default } else { d })
    }

    /// Set the duration of `frame`.
    pub fn set_duration(&mut self, frame: u8, duration: u8) -> RasterResult<()> {
        let count = self.frame_count;
        let slot = self
            .durations
            .get_mut(usize::from(frame))
            .ok_or_else(|| {
                RasterError::geometry(format!("frame {frame} out of range (count {count})"))
            })?;
        *slot = duration;
        self.has_default_durations = self.durations.contains(&0);
        Ok(())
    }

    /// Pixel bytes of frame `i`.
    pub fn frame(&self, i: u8) -> Option<&[u8]> {
        if i >= self.frame_count {
            return None;
        }
        let len = self.frame_len();
        let start = usize::from(i) * len;
        self.frames.get(start..start + len)
    }

    /// Mutable pixel bytes of frame `i`.
    pub fn frame_mut(&mut self, i: u8) -> Option<&mut [u8]> {
        if i >= self.frame_count {
            return None;
        }
        let len = self.frame_len();
        let start = usize::from(i) * len;
        self.frames.get_mut(start..start + len)
    }

    /// All frames back to back.
    pub fn frames_data(&self) -> &[u8] {
        &self.frames
    }

    /// Pixel bytes of the current frame.
    pub fn current_frame_data(&self) -> RasterResult<&[u8]> {
        self.frame(self.current_frame)
            .ok_or_else(|| RasterError::state("sprite is not allocated"))
    }

    /// Mutable pixel bytes of the current frame.
    pub fn current_frame_data_mut(&mut self) -> RasterResult<&mut [u8]> {
        let current = self.current_frame;
        self.frame_mut(current)
            .ok_or_else(|| RasterError::state("sprite is not allocated"))
    }

    /// Pixel of the current frame, or `None` when out of range or unallocated.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        let view = self.current_view().ok()?;
        let (x, y) = in_bounds(x, y, self.width, self.height)?;
        Some(Rgba::read(view.pixel(x, y), Self::FORMAT))
    }

    /// Overwrite a pixel of the current frame.
    pub fn put_pixel(&mut self, x: i32, y: i32, px: impl Into<Rgba>) -> RasterResult<()> {
        let (width, height) = (self.width, self.height);
        let data = self.current_frame_data_mut()?;
        let (x, y) = in_bounds(x, y, width, height).ok_or_else(|| {
            RasterError::geometry(format!("pixel ({x}, {y}) outside {width}x{height} sprite"))
        })?;
        let off = (y * usize::from(width) + x) * Self::FORMAT.stride();
        px.into().write(&mut data[off..off + 4], Self::FORMAT);
        Ok(())
    }

    /// Fill the current frame with `px`.
    pub fn fill_current(&mut self, px: impl Into<Rgba>) -> RasterResult<()> {
        let px = px.into();
        for chunk in self.current_frame_data_mut()?.chunks_exact_mut(4) {
            px.write(chunk, Self::FORMAT);
        }
        Ok(())
    }

    /// Fill every frame with `px`.
    pub fn fill_all(&mut self, px: impl Into<Rgba>) -> RasterResult<()> {
        if !self.exists() {
            return Err(RasterError::state("sprite is not allocated"));
        }
        let px = px.into();
        for chunk in self.frames.chunks_exact_mut(4) {
            px.write(chunk, Self::FORMAT);
        }
        Ok(())
    }

    /// Copy frame `i` out into a standalone RGBA bitmap.
    pub fn frame_to_buffer(&self, i: u8) -> RasterResult<PixelBuffer> {
        if !self.exists() {
            return Err(RasterError::state("sprite is not allocated"));
        }
        let data = self.frame(i).ok_or_else(|| {
            RasterError::geometry(format!(
                "frame {i} out of range (count {})",
                self.frame_count
            ))
        })?;
        PixelBuffer::from_raw(Self::FORMAT, self.width, self.height, data.to_vec())
    }

    /// Release all frames at once.
    pub fn erase(&mut self) {
        *self = Self::empty();
    }

    /// Move the contents out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub(crate) fn current_view(&self) -> RasterResult<Surface<'_>> {
        Ok(Surface {
            data: self.current_frame_data()?,
            width: self.width,
            height: self.height,
            format: Self::FORMAT,
        })
    }

    pub(crate) fn current_view_mut(&mut self) -> RasterResult<SurfaceMut<'_>> {
        let (width, height) = (self.width, self.height);
        Ok(SurfaceMut {
            data: self.current_frame_data_mut()?,
            width,
            height,
            format: Self::FORMAT,
        })
    }

    pub(crate) fn restore_cursor(&mut self, current_frame: u8, x: i16, y: i16) {
        self.set_current_frame(current_frame);
        self.set_position(x, y);
    }
}

fn check_shape(frame_count: u8, width: u16, height: u16) -> RasterResult<()> {
    if frame_count == 0 {
        return Err(RasterError::parameter("sprite needs at least one frame"));
    }
    if width == 0 || height == 0 {
        return Err(RasterError::parameter(format!(
            "sprite dimensions must be non-zero (got {width}x{height})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/sprite.rs"]
mod tests;
