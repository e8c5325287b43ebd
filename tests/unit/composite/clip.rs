use super::*;

#[test]
fn fully_inside_is_identity() {
    let r = clip((10, 10), (3, 2), 4, 5).unwrap();
    assert_eq!(
        r,
        ClipRect {
            dst_x: 4,
            dst_y: 5,
            src_x: 0,
            src_y: 0,
            width: 3,
            height: 2,
        }
    );
}

#[test]
fn negative_anchor_skips_leading_source() {
    let r = clip((2, 2), (2, 2), -1, 0).unwrap();
    assert_eq!((r.dst_x, r.src_x, r.width), (0, 1, 1));
    assert_eq!((r.dst_y, r.src_y, r.height), (0, 0, 2));
}

#[test]
fn trailing_edge_is_clamped() {
    let r = clip((4, 4), (3, 3), 2, 3).unwrap();
    assert_eq!((r.dst_x, r.width), (2, 2));
    assert_eq!((r.dst_y, r.height), (3, 1));
}

#[test]
fn oversized_source_clipped_on_both_sides() {
    let r = clip((2, 2), (6, 6), -2, -3).unwrap();
    assert_eq!((r.dst_x, r.src_x, r.width), (0, 2, 2));
    assert_eq!((r.dst_y, r.src_y, r.height), (0, 3, 2));
}

#[test]
fn misses_are_geometry_errors() {
    for (x, y) in [(-3, 0), (4, 0), (0, -2), (0, 4), (i32::MIN, 0), (i32::MAX, 0)] {
        assert!(
            matches!(clip((4, 4), (3, 2), x, y), Err(RasterError::Geometry(_))),
            "({x}, {y})"
        );
    }
}
