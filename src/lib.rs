//! sprite4 is an in-memory raster library for small RGB/RGBA assets.
//!
//! It covers four jobs:
//!
//! 1. **Hold pixels**: [`PixelBuffer`] (one RGB or RGBA bitmap) and [`SpriteStack`]
//!    (same-sized RGBA frames with per-frame durations, a frame cursor and a position).
//! 2. **Composite**: clipped alpha blits between bitmaps and sprite frames
//!    ([`blit`], [`plot_sprite`] and friends), plus fast unblended copies and fades.
//! 3. **Resample**: [`scale`] with nearest-neighbour shrinking and bilinear growth.
//! 4. **Persist**: the SP4 multi-frame container ([`read_sp4`], [`write_sp4_sprite`])
//!    and plain PPM (`P3`/`P6`) for interchange.
//!
//! Alpha uses a 0..=100 scale: 0 is transparent and anything above 99 is opaque.
//!
//! The library is synchronous and never installs a `tracing` subscriber.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod buffer;
mod codec;
mod composite;
mod convert;
mod foundation;
mod ops;
mod resample;

pub use buffer::pixel::PixelBuffer;
pub use buffer::sprite::SpriteStack;
pub use codec::ppm::{
    PpmEncoding, decode_ppm, load_ppm, load_ppm_rgba, read_ppm, save_ppm, write_ppm,
};
pub use codec::sp4::{
    SP4_MAGIC, Sp4Image, Sp4Info, decode_buffer, decode_sprite, load_sp4_buffer, load_sp4_info,
    load_sp4_sprite, read_sp4, read_sp4_info, save_sp4_buffer, save_sp4_sprite,
    write_sp4_buffer, write_sp4_sprite,
};
pub use composite::blit::{
    BlitOpts, DestAlphaPolicy, blit, blit_onto_sprite, blit_onto_sprite_with, blit_with,
    plot_sprite, plot_sprite_onto_sprite, plot_sprite_onto_sprite_with, plot_sprite_with,
};
pub use convert::format::{ColorKey, rgb_to_rgba, rgba_to_rgb};
pub use foundation::core::{FULL_OPACITY, PixelFormat, Rgb, Rgba};
pub use foundation::error::{RasterError, RasterResult};
pub use ops::fast::{copy_buffer, fade, fade_sprite, move_buffer, quick_copy};
pub use resample::scale::{scale, scale_sprite};
