use super::*;
use crate::foundation::core::{PixelFormat, Rgb, Rgba};

fn rgba(w: u16, h: u16, px: Rgba) -> PixelBuffer {
    let mut buf = PixelBuffer::allocate(PixelFormat::Rgba8, w, h).unwrap();
    buf.fill(px).unwrap();
    buf
}

fn rgb(w: u16, h: u16, px: Rgb) -> PixelBuffer {
    let mut buf = PixelBuffer::allocate(PixelFormat::Rgb8, w, h).unwrap();
    buf.fill(px).unwrap();
    buf
}

#[test]
fn negative_anchor_clips_leading_column() {
    let mut src = PixelBuffer::allocate(PixelFormat::Rgba8, 2, 2).unwrap();
    src.put_pixel(0, 0, Rgba::new(255, 0, 0, 100)).unwrap();
    src.put_pixel(1, 0, Rgba::new(0, 255, 0, 100)).unwrap();
    src.put_pixel(0, 1, Rgba::new(0, 0, 255, 100)).unwrap();
    src.put_pixel(1, 1, Rgba::new(255, 255, 0, 0)).unwrap();
    let mut dst = rgb(2, 2, Rgb::BLACK);

    blit(&mut dst, &src, -1, 0, None).unwrap();
    assert_eq!(dst.get_pixel(0, 0), Some(Rgba::opaque(0, 255, 0)));
    assert_eq!(dst.get_pixel(0, 1), Some(Rgba::opaque(0, 0, 0)));
    assert_eq!(dst.get_pixel(1, 0), Some(Rgba::opaque(0, 0, 0)));
    assert_eq!(dst.get_pixel(1, 1), Some(Rgba::opaque(0, 0, 0)));
}

#[test]
fn full_alpha_overwrites_and_forces_opaque() {
    let src = rgba(2, 2, Rgba::new(10, 20, 30, 100));
    let mut dst = rgba(2, 2, Rgba::new(1, 1, 1, 7));
    blit(&mut dst, &src, 0, 0, None).unwrap();
    assert!(dst.data().unwrap().chunks_exact(4).all(|p| p == [10, 20, 30, 100]));
}

#[test]
fn zero_alpha_pixels_are_skipped_even_with_override() {
    let src = rgba(1, 1, Rgba::new(200, 200, 200, 0));
    let mut dst = rgba(1, 1, Rgba::new(1, 2, 3, 4));
    blit(&mut dst, &src, 0, 0, Some(1.0)).unwrap();
    assert_eq!(dst.get_pixel(0, 0), Some(Rgba::new(1, 2, 3, 4)));
}

#[test]
fn partial_alpha_blends_with_rounding() {
    let src = rgba(1, 1, Rgba::new(255, 100, 0, 50));
    let mut dst = rgb(1, 1, Rgb::new(0, 51, 255));
    blit(&mut dst, &src, 0, 0, None).unwrap();
    assert_eq!(dst.data().unwrap(), &[128, 76, 128]);
}

#[test]
fn override_alpha_replaces_per_pixel_alpha() {
    let src = rgba(1, 1, Rgba::new(100, 100, 100, 10));
    let mut dst = rgb(1, 1, Rgb::BLACK);
    blit(&mut dst, &src, 0, 0, Some(0.5)).unwrap();
    assert_eq!(dst.data().unwrap(), &[50, 50, 50]);

    let src = rgb(1, 1, Rgb::new(100, 100, 100));
    let mut dst = rgb(1, 1, Rgb::BLACK);
    blit(&mut dst, &src, 0, 0, Some(2.0)).unwrap();
    assert_eq!(dst.data().unwrap(), &[100, 100, 100]);
}

#[test]
fn invalid_override_alpha_is_rejected_without_writes() {
    let src = rgb(1, 1, Rgb::new(9, 9, 9));
    let mut dst = rgb(1, 1, Rgb::BLACK);
    for a in [0.0, -0.5, f32::NAN, f32::INFINITY] {
        assert!(matches!(
            blit(&mut dst, &src, 0, 0, Some(a)),
            Err(RasterError::Parameter(_))
        ));
    }
    assert_eq!(dst.data().unwrap(), &[0, 0, 0]);
}

#[test]
fn fully_clipped_blit_leaves_destination_untouched() {
    let src = rgb(2, 2, Rgb::new(9, 9, 9));
    let mut dst = rgba(3, 3, Rgba::new(1, 2, 3, 4));
    let before = dst.clone();
    for (x, y) in [(-2, 0), (3, 0), (0, -2), (0, 3)] {
        assert!(matches!(
            blit(&mut dst, &src, x, y, None),
            Err(RasterError::Geometry(_))
        ));
    }
    assert_eq!(dst, before);
}

#[test]
fn empty_buffers_are_state_errors() {
    let full = rgb(1, 1, Rgb::BLACK);
    let mut empty = PixelBuffer::empty(PixelFormat::Rgb8);
    assert!(matches!(
        blit(&mut empty, &full, 0, 0, None),
        Err(RasterError::State(_))
    ));
    let mut dst = full.clone();
    assert!(matches!(
        blit(&mut dst, &PixelBuffer::empty(PixelFormat::Rgba8), 0, 0, None),
        Err(RasterError::State(_))
    ));
}

#[test]
fn destination_alpha_policies() {
    let src = rgba(1, 1, Rgba::new(50, 50, 50, 40));

    let mut dst = rgba(1, 1, Rgba::new(0, 0, 0, 7));
    let opts = BlitOpts::default().with_dest_alpha(DestAlphaPolicy::PreserveDestination);
    blit_with(&mut dst, &src, 0, 0, &opts).unwrap();
    assert_eq!(dst.get_pixel(0, 0), Some(Rgba::new(20, 20, 20, 7)));

    let mut dst = rgba(1, 1, Rgba::new(0, 0, 0, 7));
    let opts = BlitOpts::default().with_dest_alpha(DestAlphaPolicy::SourcePassthrough);
    blit_with(&mut dst, &src, 0, 0, &opts).unwrap();
    assert_eq!(dst.get_pixel(0, 0), Some(Rgba::new(20, 20, 20, 40)));
}

#[test]
fn passthrough_with_rgb_source_uses_override_or_keeps_destination() {
    let src = rgb(1, 1, Rgb::new(100, 100, 100));
    let passthrough = BlitOpts::default().with_dest_alpha(DestAlphaPolicy::SourcePassthrough);

    let mut dst = rgba(1, 1, Rgba::new(0, 0, 0, 7));
    blit_with(&mut dst, &src, 0, 0, &passthrough.with_alpha(0.25)).unwrap();
    assert_eq!(dst.get_pixel(0, 0), Some(Rgba::new(25, 25, 25, 25)));

    let mut dst = rgba(1, 1, Rgba::new(0, 0, 0, 7));
    blit_with(&mut dst, &src, 0, 0, &passthrough).unwrap();
    assert_eq!(dst.get_pixel(0, 0), Some(Rgba::new(100, 100, 100, 7)));
}

#[test]
fn bitmap_onto_sprite_targets_current_frame() {
    let mut spr = SpriteStack::allocate(2, 2, 2).unwrap();
    spr.set_current_frame(1);
    let src = rgb(1, 1, Rgb::new(5, 6, 7));
    blit_onto_sprite(&mut spr, &src, 1, 1, None).unwrap();
    assert_eq!(spr.get_pixel(1, 1), Some(Rgba::new(5, 6, 7, 100)));
    assert!(spr.frame(0).unwrap().iter().all(|&b| b == 0));
}

#[test]
fn sprite_plots_at_its_own_position() {
    let mut spr = SpriteStack::allocate(1, 2, 1).unwrap();
    spr.fill_all(Rgba::new(80, 80, 80, 100)).unwrap();
    spr.set_position(1, 0);
    let mut dst = rgb(2, 1, Rgb::BLACK);
    plot_sprite(&mut dst, &spr, 0.5).unwrap();
    assert_eq!(dst.data().unwrap(), &[0, 0, 0, 40, 40, 40]);

    spr.set_position(5, 0);
    assert!(matches!(
        plot_sprite(&mut dst, &spr, 1.0),
        Err(RasterError::Geometry(_))
    ));
}

#[test]
fn sprite_onto_sprite_uses_both_cursors() {
    let mut src = SpriteStack::allocate(2, 1, 1).unwrap();
    src.frame_mut(1).unwrap().copy_from_slice(&[9, 8, 7, 100]);
    src.set_current_frame(1);
    let mut dst = SpriteStack::allocate(3, 1, 1).unwrap();
    dst.set_current_frame(2);

    plot_sprite_onto_sprite(&mut dst, &src, 1.0).unwrap();
    assert_eq!(dst.frame(2).unwrap(), &[9, 8, 7, 100]);
    assert!(dst.frame(0).unwrap().iter().all(|&b| b == 0));

    let opts = BlitOpts::default();
    let mut plain = rgb(1, 1, Rgb::BLACK);
    plot_sprite_with(&mut plain, &src, &opts).unwrap();
    assert_eq!(plain.data().unwrap(), &[9, 8, 7]);
    plot_sprite_onto_sprite_with(&mut dst, &src, &opts).unwrap();
    blit_onto_sprite_with(&mut dst, &plain, 0, 0, &opts).unwrap();
}
