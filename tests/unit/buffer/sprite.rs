use super::*;
use crate::foundation::core::Rgb;

#[test]
fn allocate_uses_one_contiguous_block() {
    let spr = SpriteStack::allocate(3, 2, 2).unwrap();
    assert_eq!(spr.frame_count(), 3);
    assert_eq!(spr.frame_len(), 16);
    assert_eq!(spr.frames_data().len(), 48);
    assert_eq!(spr.durations(), &[0, 0, 0]);
    assert!(spr.has_default_durations());
    assert_eq!(spr.current_frame(), 0);
    assert_eq!(spr.position(), (0, 0));
}

#[test]
fn allocate_rejects_zero_frames_or_size() {
    assert!(matches!(
        SpriteStack::allocate(0, 2, 2),
        Err(RasterError::Parameter(_))
    ));
    assert!(matches!(
        SpriteStack::allocate(1, 0, 2),
        Err(RasterError::Parameter(_))
    ));
}

#[test]
fn frames_are_views_into_backing_block() {
    let mut spr = SpriteStack::allocate(2, 1, 1).unwrap();
    spr.frame_mut(1).unwrap().copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(spr.frames_data(), &[0, 0, 0, 0, 1, 2, 3, 4]);
    assert_eq!(spr.frame(1).unwrap(), &[1, 2, 3, 4]);
    assert!(spr.frame(2).is_none());
}

#[test]
fn cursor_clamps_and_wraps() {
    let mut spr = SpriteStack::allocate(3, 1, 1).unwrap();
    assert_eq!(spr.set_current_frame(10), 2);
    assert_eq!(spr.advance(), 0);
    assert_eq!(spr.advance(), 1);
    assert_eq!(spr.advance(), 2);
    assert_eq!(spr.advance(), 0);
}

#[test]
fn durations_track_default_flag() {
    let mut spr = SpriteStack::allocate(2, 1, 1).unwrap();
    spr.set_duration(0, 5).unwrap();
    assert!(spr.has_default_durations());
    spr.set_duration(1, 7).unwrap();
    assert!(!spr.has_default_durations());
    assert_eq!(spr.effective_duration(1, 3), Some(7));

    spr.set_duration(1, 0).unwrap();
    assert_eq!(spr.effective_duration(1, 3), Some(3));
    assert_eq!(spr.duration(2), None);
    assert!(matches!(
        spr.set_duration(2, 1),
        Err(RasterError::Geometry(_))
    ));
}

#[test]
fn pixel_access_targets_current_frame() {
    let mut spr = SpriteStack::allocate(2, 2, 2).unwrap();
    spr.set_current_frame(1);
    spr.put_pixel(1, 0, Rgba::new(9, 9, 9, 50)).unwrap();
    assert_eq!(spr.get_pixel(1, 0), Some(Rgba::new(9, 9, 9, 50)));
    assert_eq!(&spr.frame(1).unwrap()[4..8], &[9, 9, 9, 50]);
    assert!(spr.frame(0).unwrap().iter().all(|&b| b == 0));
    assert_eq!(spr.get_pixel(2, 0), None);
    assert!(spr.put_pixel(0, 5, Rgb::BLACK).is_err());
}

#[test]
fn fill_current_and_fill_all() {
    let mut spr = SpriteStack::allocate(2, 1, 2).unwrap();
    spr.fill_current(Rgba::new(1, 1, 1, 1)).unwrap();
    assert_eq!(spr.frame(0).unwrap(), &[1, 1, 1, 1, 1, 1, 1, 1]);
    assert!(spr.frame(1).unwrap().iter().all(|&b| b == 0));

    spr.fill_all(Rgb::new(4, 5, 6)).unwrap();
    assert!(spr.frames_data().chunks_exact(4).all(|p| p == [4, 5, 6, 100]));
}

#[test]
fn empty_sprite_rejects_access() {
    let mut spr = SpriteStack::empty();
    assert!(spr.is_empty());
    assert!(matches!(
        spr.current_frame_data(),
        Err(RasterError::State(_))
    ));
    assert!(spr.fill_all(Rgb::BLACK).is_err());
    assert_eq!(spr.get_pixel(0, 0), None);
    assert!(spr.frame_to_buffer(0).is_err());
}

#[test]
fn from_buffers_builds_frames_in_order() {
    let mut a = PixelBuffer::allocate(PixelFormat::Rgba8, 1, 1).unwrap();
    a.put_pixel(0, 0, Rgba::new(1, 2, 3, 4)).unwrap();
    let mut b = PixelBuffer::allocate(PixelFormat::Rgb8, 1, 1).unwrap();
    b.put_pixel(0, 0, Rgb::new(5, 6, 7)).unwrap();

    let spr = SpriteStack::from_buffers(&[a, b], &[3, 4]).unwrap();
    assert_eq!(spr.frames_data(), &[1, 2, 3, 4, 5, 6, 7, 100]);
    assert_eq!(spr.durations(), &[3, 4]);
    assert!(!spr.has_default_durations());

    let back = spr.frame_to_buffer(1).unwrap();
    assert_eq!(back.get_pixel(0, 0), Some(Rgba::opaque(5, 6, 7)));
}

#[test]
fn from_buffers_rejects_mismatch() {
    let a = PixelBuffer::allocate(PixelFormat::Rgba8, 1, 1).unwrap();
    let b = PixelBuffer::allocate(PixelFormat::Rgba8, 2, 1).unwrap();
    assert!(matches!(
        SpriteStack::from_buffers(&[a.clone(), b], &[]),
        Err(RasterError::Geometry(_))
    ));
    assert!(matches!(
        SpriteStack::from_buffers(&[a], &[1, 2]),
        Err(RasterError::Parameter(_))
    ));
    assert!(SpriteStack::from_buffers(&[], &[]).is_err());
}

#[test]
fn take_moves_all_frames() {
    let mut spr = SpriteStack::allocate(4, 2, 2).unwrap();
    spr.set_position(-3, 7);
    let moved = spr.take();
    assert!(spr.is_empty());
    assert_eq!(moved.frame_count(), 4);
    assert_eq!(moved.position(), (-3, 7));
}
