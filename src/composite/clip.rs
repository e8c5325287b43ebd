use crate::foundation::error::{RasterError, RasterResult};

/// Overlap of a placed source with its destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ClipRect {
    pub(crate) dst_x: usize,
    pub(crate) dst_y: usize,
    pub(crate) src_x: usize,
    pub(crate) src_y: usize,
    pub(crate) width: usize,
    pub(crate) height: usize,
}

/// Clip a `src_w` x `src_h` source anchored at `(x, y)` against a `dst_w` x `dst_h`
/// destination.
///
/// Each axis is clamped on both ends. A source that misses the destination on either
/// axis is a [`RasterError::Geometry`].
pub(crate) fn clip(
    (dst_w, dst_h): (u16, u16),
    (src_w, src_h): (u16, u16),
    x: i32,
    y: i32,
) -> RasterResult<ClipRect> {
    let (dst_x, src_x, width) = clip_axis(dst_w, src_w, x, "x")?;
    let (dst_y, src_y, height) = clip_axis(dst_h, src_h, y, "y")?;
    Ok(ClipRect {
        dst_x,
        dst_y,
        src_x,
        src_y,
        width,
        height,
    })
}

fn clip_axis(
    dst_len: u16,
    src_len: u16,
    at: i32,
    axis: &str,
) -> RasterResult<(usize, usize, usize)> {
    let (dst_len, src_len, at) = (i64::from(dst_len), i64::from(src_len), i64::from(at));
    if at + src_len <= 0 || at >= dst_len {
        return Err(RasterError::geometry(format!(
            "source spans {axis} {at}..{} outside destination 0..{dst_len}",
            at + src_len
        )));
    }
    let start = at.max(0);
    let end = (at + src_len).min(dst_len);
    // all three values lie in 0..=u16::MAX after clamping
    let to_usize = |v: i64| usize::try_from(v).unwrap_or(0);
    Ok((to_usize(start), to_usize(start - at), to_usize(end - start)))
}

#[cfg(test)]
#[path = "../../tests/unit/composite/clip.rs"]
mod tests;
