use crate::{
    buffer::{
        pixel::PixelBuffer,
        sprite::SpriteStack,
        view::{Surface, alloc_zeroed},
    },
    foundation::error::{RasterError, RasterResult},
};

/// Resize a bitmap by `factor`, returning a new buffer of
/// `floor(width * factor)` x `floor(height * factor)`.
///
/// Factors below 1 use nearest-neighbour sampling and copy pixels verbatim. Factors
/// above 1 interpolate R, G and B bilinearly (truncating) and take alpha from the
/// top-left neighbour. A factor of exactly 1 is a deep copy.
#[tracing::instrument(skip(src), fields(width = src.width(), height = src.height()))]
pub fn scale(src: &PixelBuffer, factor: f32) -> RasterResult<PixelBuffer> {
    check_factor(factor)?;
    let view = src
        .view()
        .map_err(|_| RasterError::state("cannot scale an unallocated buffer"))?;
    if factor == 1.0 {
        return Ok(src.clone());
    }
    let (w, h) = scaled_dims(view.width, view.height, factor)?;
    let mut out = alloc_zeroed(view.format.byte_len(w, h))?;
    resample_into(view, factor, w, h, &mut out);

    let mut buf = PixelBuffer::from_raw(view.format, w, h, out)?;
    buf.set_meaningful_alpha(src.meaningful_alpha());
    Ok(buf)
}

/// Resize every frame of a sprite. Durations, cursor and position carry over.
#[tracing::instrument(skip(src), fields(frames = src.frame_count()))]
pub fn scale_sprite(src: &SpriteStack, factor: f32) -> RasterResult<SpriteStack> {
    check_factor(factor)?;
    if !src.exists() {
        return Err(RasterError::state("cannot scale an unallocated sprite"));
    }
    if factor == 1.0 {
        return Ok(src.clone());
    }
    let (w, h) = scaled_dims(src.width(), src.height(), factor)?;
    let frame_len = SpriteStack::FORMAT.byte_len(w, h);
    let mut frames = alloc_zeroed(frame_len * usize::from(src.frame_count()))?;
    for (i, out) in (0..src.frame_count()).zip(frames.chunks_exact_mut(frame_len)) {
        let data = src
            .frame(i)
            .ok_or_else(|| RasterError::state(format!("sprite frame {i} missing")))?;
        let view = Surface {
            data,
            width: src.width(),
            height: src.height(),
            format: SpriteStack::FORMAT,
        };
        resample_into(view, factor, w, h, out);
    }

    let mut scaled = SpriteStack::from_parts(w, h, src.durations().to_vec(), frames)?;
    let (x, y) = src.position();
    scaled.restore_cursor(src.current_frame(), x, y);
    Ok(scaled)
}

fn check_factor(factor: f32) -> RasterResult<()> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(RasterError::parameter(format!(
            "scale factor must be finite and positive (got {factor})"
        )))
    }
}

fn scaled_dims(width: u16, height: u16, factor: f32) -> RasterResult<(u16, u16)> {
    let dim = |v: u16| (f64::from(v) * f64::from(factor)).floor();
    let (w, h) = (dim(width), dim(height));
    if w < 1.0 || h < 1.0 || w > f64::from(u16::MAX) || h > f64::from(u16::MAX) {
        return Err(RasterError::geometry(format!(
            "scaling {width}x{height} by {factor} gives an unusable {w}x{h} result"
        )));
    }
    Ok((w as u16, h as u16))
}

fn resample_into(src: Surface<'_>, factor: f32, w: u16, h: u16, out: &mut [u8]) {
    let stride = src.format.stride();
    let (last_x, last_y) = (usize::from(src.width) - 1, usize::from(src.height) - 1);
    let out_row = usize::from(w) * stride;

    for (oy, row) in out.chunks_exact_mut(out_row).enumerate() {
        let fy = oy as f32 / factor;
        for (ox, px) in row.chunks_exact_mut(stride).enumerate() {
            let fx = ox as f32 / factor;
            if factor < 1.0 {
                let sx = (fx.floor() as usize).min(last_x);
                let sy = (fy.floor() as usize).min(last_y);
                px.copy_from_slice(src.pixel(sx, sy));
                continue;
            }

            let x0 = (fx.floor() as usize).min(last_x);
            let y0 = (fy.floor() as usize).min(last_y);
            let (x1, y1) = ((x0 + 1).min(last_x), (y0 + 1).min(last_y));
            let (dx, dy) = (fx - fx.floor(), fy - fy.floor());
            let (tl, tr) = (src.pixel(x0, y0), src.pixel(x1, y0));
            let (bl, br) = (src.pixel(x0, y1), src.pixel(x1, y1));
            for c in 0..3 {
                let v = f32::from(tl[c]) * (1.0 - dx) * (1.0 - dy)
                    + f32::from(tr[c]) * dx * (1.0 - dy)
                    + f32::from(bl[c]) * (1.0 - dx) * dy
                    + f32::from(br[c]) * dx * dy;
                px[c] = v.clamp(0.0, 255.0) as u8;
            }
            if stride == 4 {
                px[3] = tl[3];
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resample/scale.rs"]
mod tests;
