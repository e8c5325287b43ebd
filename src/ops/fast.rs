use crate::{
    buffer::{pixel::PixelBuffer, sprite::SpriteStack, view::SurfaceMut},
    foundation::core::FULL_OPACITY,
    foundation::error::{RasterError, RasterResult},
    foundation::math::fade_channel,
};

/// Copy a `w` x `h` rectangle between two buffers of the same format.
///
/// No blending, no alpha handling and no clipping: the rectangle must fit both
/// buffers, otherwise the call fails with [`RasterError::Geometry`] before copying.
#[allow(clippy::too_many_arguments)]
pub fn quick_copy(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    dst_x: u16,
    dst_y: u16,
    src_x: u16,
    src_y: u16,
    w: u16,
    h: u16,
) -> RasterResult<()> {
    let src = src
        .view()
        .map_err(|_| RasterError::state("quick copy source is not allocated"))?;
    let mut dst = dst
        .view_mut()
        .map_err(|_| RasterError::state("quick copy destination is not allocated"))?;
    if src.format != dst.format {
        return Err(RasterError::geometry(format!(
            "quick copy needs matching formats ({:?} onto {:?})",
            src.format, dst.format
        )));
    }
    let fits = |x: u16, y: u16, width: u16, height: u16| {
        u32::from(x) + u32::from(w) <= u32::from(width)
            && u32::from(y) + u32::from(h) <= u32::from(height)
    };
    if !fits(src_x, src_y, src.width, src.height) || !fits(dst_x, dst_y, dst.width, dst.height) {
        return Err(RasterError::geometry(format!(
            "{w}x{h} rectangle from ({src_x}, {src_y}) to ({dst_x}, {dst_y}) does not fit \
             {}x{} source and {}x{} destination",
            src.width, src.height, dst.width, dst.height
        )));
    }

    let span = usize::from(w) * src.format.stride();
    for row in 0..usize::from(h) {
        let s = src.offset(usize::from(src_x), usize::from(src_y) + row);
        let d = dst.offset(usize::from(dst_x), usize::from(dst_y) + row);
        dst.data[d..d + span].copy_from_slice(&src.data[s..s + span]);
    }
    Ok(())
}

/// Move the contents of `src` into `dst`, dropping whatever `dst` held.
///
/// `src` is left empty.
pub fn move_buffer(dst: &mut PixelBuffer, src: &mut PixelBuffer) -> RasterResult<()> {
    if src.is_empty() {
        return Err(RasterError::state("cannot move from an unallocated buffer"));
    }
    *dst = src.take();
    Ok(())
}

/// Deep copy of an allocated buffer.
pub fn copy_buffer(src: &PixelBuffer) -> RasterResult<PixelBuffer> {
    if src.is_empty() {
        return Err(RasterError::state("cannot copy an unallocated buffer"));
    }
    Ok(src.clone())
}

/// Darken a bitmap toward black by `alpha` percent (1..=100, larger values act as 100).
///
/// RGBA pixels with alpha 0 are left alone; every other pixel ends with alpha 100.
pub fn fade(dst: &mut PixelBuffer, alpha: u8) -> RasterResult<()> {
    check_fade(alpha)?;
    let surface = dst
        .view_mut()
        .map_err(|_| RasterError::state("cannot fade an unallocated buffer"))?;
    fade_surface(surface, alpha);
    Ok(())
}

/// [`fade`] applied to the current frame of a sprite.
pub fn fade_sprite(dst: &mut SpriteStack, alpha: u8) -> RasterResult<()> {
    check_fade(alpha)?;
    let surface = dst
        .current_view_mut()
        .map_err(|_| RasterError::state("cannot fade an unallocated sprite"))?;
    fade_surface(surface, alpha);
    Ok(())
}

fn check_fade(alpha: u8) -> RasterResult<()> {
    if alpha == 0 {
        return Err(RasterError::parameter("fade amount must be at least 1"));
    }
    Ok(())
}

fn fade_surface(mut dst: SurfaceMut<'_>, alpha: u8) {
    let stride = dst.format.stride();
    let has_alpha = dst.format.has_alpha();
    for px in dst.data.chunks_exact_mut(stride) {
        if has_alpha && px[3] == 0 {
            continue;
        }
        for c in &mut px[..3] {
            *c = fade_channel(*c, alpha);
        }
        if has_alpha {
            px[3] = FULL_OPACITY;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/fast.rs"]
mod tests;
