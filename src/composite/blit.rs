use crate::{
    buffer::{
        pixel::PixelBuffer,
        sprite::SpriteStack,
        view::{Surface, SurfaceMut},
    },
    composite::clip::clip,
    foundation::core::FULL_OPACITY,
    foundation::error::{RasterError, RasterResult},
    foundation::math::{alpha_to_unit, blend_channel, unit_to_alpha},
};

/// What happens to the destination alpha byte of every written pixel.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum DestAlphaPolicy {
    /// Set to 100.
    #[default]
    FixedOpaque,
    /// Leave untouched.
    PreserveDestination,
    /// Copy from an RGBA source pixel. For an RGB source the override alpha is written
    /// when one was given, otherwise the destination alpha is kept.
    SourcePassthrough,
}

/// Per-call compositing options.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlitOpts {
    /// Fixed alpha for every visible source pixel, replacing per-pixel alpha.
    /// Must be finite and positive; values above 1.0 act as 1.0.
    pub alpha: Option<f32>,
    /// Destination alpha handling.
    pub dest_alpha: DestAlphaPolicy,
}

impl BlitOpts {
    /// Use a fixed alpha for every visible pixel.
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Select the destination alpha policy.
    pub fn with_dest_alpha(mut self, policy: DestAlphaPolicy) -> Self {
        self.dest_alpha = policy;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum AlphaSource {
    PerPixel,
    Fixed(f32),
}

/// Blend `src` onto `dst` with its top-left corner at `(x, y)`.
///
/// Works for every RGB/RGBA combination. RGBA source pixels with alpha 0 are skipped;
/// other pixels blend with their own alpha unless `alpha` overrides it. The destination
/// alpha (if any) is set to 100.
///
/// A source that lies completely outside `dst` is a [`RasterError::Geometry`] and
/// leaves `dst` untouched.
///
/// The destination is borrowed mutably, so a buffer cannot be blitted onto itself:
///
/// ```compile_fail
/// use sprite4::{PixelBuffer, PixelFormat, blit};
///
/// let mut buf = PixelBuffer::allocate(PixelFormat::Rgb8, 2, 2).unwrap();
/// blit(&mut buf, &buf, 0, 0, None).unwrap();
/// ```
pub fn blit(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    x: i32,
    y: i32,
    alpha: Option<f32>,
) -> RasterResult<()> {
    blit_with(
        dst,
        src,
        x,
        y,
        &BlitOpts {
            alpha,
            ..BlitOpts::default()
        },
    )
}

/// [`blit`] with explicit options.
pub fn blit_with(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    x: i32,
    y: i32,
    opts: &BlitOpts,
) -> RasterResult<()> {
    let src = src
        .view()
        .map_err(|_| RasterError::state("blit source is not allocated"))?;
    let dst = dst
        .view_mut()
        .map_err(|_| RasterError::state("blit destination is not allocated"))?;
    composite(dst, src, x, y, opts)
}

/// Blend a bitmap onto the current frame of a sprite.
pub fn blit_onto_sprite(
    dst: &mut SpriteStack,
    src: &PixelBuffer,
    x: i32,
    y: i32,
    alpha: Option<f32>,
) -> RasterResult<()> {
    blit_onto_sprite_with(
        dst,
        src,
        x,
        y,
        &BlitOpts {
            alpha,
            ..BlitOpts::default()
        },
    )
}

/// [`blit_onto_sprite`] with explicit options.
pub fn blit_onto_sprite_with(
    dst: &mut SpriteStack,
    src: &PixelBuffer,
    x: i32,
    y: i32,
    opts: &BlitOpts,
) -> RasterResult<()> {
    let src = src
        .view()
        .map_err(|_| RasterError::state("blit source is not allocated"))?;
    let dst = dst
        .current_view_mut()
        .map_err(|_| RasterError::state("blit destination sprite is not allocated"))?;
    composite(dst, src, x, y, opts)
}

/// Plot the current frame of `src` at the sprite's own position.
///
/// `alpha` applies to every visible (non-zero alpha) pixel.
pub fn plot_sprite(dst: &mut PixelBuffer, src: &SpriteStack, alpha: f32) -> RasterResult<()> {
    plot_sprite_with(dst, src, &BlitOpts::default().with_alpha(alpha))
}

/// [`plot_sprite`] with explicit options. Without an override alpha each pixel
/// blends with its own alpha.
pub fn plot_sprite_with(
    dst: &mut PixelBuffer,
    src: &SpriteStack,
    opts: &BlitOpts,
) -> RasterResult<()> {
    let (x, y) = src.position();
    let src = src
        .current_view()
        .map_err(|_| RasterError::state("plot source sprite is not allocated"))?;
    let dst = dst
        .view_mut()
        .map_err(|_| RasterError::state("plot destination is not allocated"))?;
    composite(dst, src, i32::from(x), i32::from(y), opts)
}

/// Plot the current frame of `src` onto the current frame of `dst`.
///
/// ```compile_fail
/// use sprite4::{SpriteStack, plot_sprite_onto_sprite};
///
/// let mut spr = SpriteStack::allocate(1, 2, 2).unwrap();
/// plot_sprite_onto_sprite(&mut spr, &spr, 1.0).unwrap();
/// ```
pub fn plot_sprite_onto_sprite(
    dst: &mut SpriteStack,
    src: &SpriteStack,
    alpha: f32,
) -> RasterResult<()> {
    plot_sprite_onto_sprite_with(dst, src, &BlitOpts::default().with_alpha(alpha))
}

/// [`plot_sprite_onto_sprite`] with explicit options.
pub fn plot_sprite_onto_sprite_with(
    dst: &mut SpriteStack,
    src: &SpriteStack,
    opts: &BlitOpts,
) -> RasterResult<()> {
    let (x, y) = src.position();
    let src = src
        .current_view()
        .map_err(|_| RasterError::state("plot source sprite is not allocated"))?;
    let dst = dst
        .current_view_mut()
        .map_err(|_| RasterError::state("plot destination sprite is not allocated"))?;
    composite(dst, src, i32::from(x), i32::from(y), opts)
}

fn resolve_alpha(alpha: Option<f32>) -> RasterResult<AlphaSource> {
    match alpha {
        None => Ok(AlphaSource::PerPixel),
        Some(a) if a.is_finite() && a > 0.0 => Ok(AlphaSource::Fixed(a.min(1.0))),
        Some(a) => Err(RasterError::parameter(format!(
            "blit alpha must be finite and positive (got {a})"
        ))),
    }
}

/// Clipped blend of `src` onto `dst`; every check runs before the first write.
fn composite(
    mut dst: SurfaceMut<'_>,
    src: Surface<'_>,
    x: i32,
    y: i32,
    opts: &BlitOpts,
) -> RasterResult<()> {
    let alpha = resolve_alpha(opts.alpha).inspect_err(|e| tracing::debug!(%e, "blit rejected"))?;
    let rect = clip((dst.width, dst.height), (src.width, src.height), x, y)
        .inspect_err(|e| tracing::debug!(%e, x, y, "blit fully clipped"))?;

    let (s_stride, d_stride) = (src.format.stride(), dst.format.stride());
    let (src_alpha, dst_alpha) = (src.format.has_alpha(), dst.format.has_alpha());
    let span = rect.width;

    for row in 0..rect.height {
        let s_off = src.offset(rect.src_x, rect.src_y + row);
        let d_off = dst.offset(rect.dst_x, rect.dst_y + row);
        let s_line = &src.data[s_off..s_off + span * s_stride];
        let d_line = &mut dst.data[d_off..d_off + span * d_stride];

        for (s, d) in s_line
            .chunks_exact(s_stride)
            .zip(d_line.chunks_exact_mut(d_stride))
        {
            if src_alpha && s[3] == 0 {
                continue;
            }
            let a = match alpha {
                AlphaSource::Fixed(a) => a,
                AlphaSource::PerPixel if src_alpha => alpha_to_unit(s[3]),
                AlphaSource::PerPixel => 1.0,
            };
            if a >= 1.0 {
                d[..3].copy_from_slice(&s[..3]);
            } else {
                for (dc, &sc) in d[..3].iter_mut().zip(&s[..3]) {
                    *dc = blend_channel(sc, *dc, a);
                }
            }
            if dst_alpha {
                match opts.dest_alpha {
                    DestAlphaPolicy::FixedOpaque => d[3] = FULL_OPACITY,
                    DestAlphaPolicy::PreserveDestination => {}
                    DestAlphaPolicy::SourcePassthrough if src_alpha => d[3] = s[3],
                    DestAlphaPolicy::SourcePassthrough => {
                        if let AlphaSource::Fixed(a) = alpha {
                            d[3] = unit_to_alpha(a);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blit.rs"]
mod tests;
