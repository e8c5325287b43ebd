use crate::foundation::core::FULL_OPACITY;

/// Map a raw 0..=100 alpha byte to a unit factor; anything above 99 is opaque.
pub(crate) fn alpha_to_unit(raw: u8) -> f32 {
    if raw > 99 {
        1.0
    } else {
        f32::from(raw) / f32::from(FULL_OPACITY)
    }
}

/// `round(a*src + (1-a)*dst)`; callers handle `a == 1.0` as a plain overwrite.
pub(crate) fn blend_channel(src: u8, dst: u8, alpha: f32) -> u8 {
    let v = alpha * f32::from(src) + (1.0 - alpha) * f32::from(dst);
    v.round().clamp(0.0, 255.0) as u8
}

/// Darken a channel by `percent` (1..=100), truncating toward zero.
///
/// Integer arithmetic, so `fade_channel(200, 30)` is exactly 140.
pub(crate) fn fade_channel(c: u8, percent: u8) -> u8 {
    let keep = u16::from(FULL_OPACITY.saturating_sub(percent.min(FULL_OPACITY)));
    ((u16::from(c) * keep) / u16::from(FULL_OPACITY)) as u8
}

/// Convert a unit alpha to the 0..=100 byte scale.
pub(crate) fn unit_to_alpha(a: f32) -> u8 {
    (a.clamp(0.0, 1.0) * f32::from(FULL_OPACITY)).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
