use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(RasterError::format("x").to_string().contains("format error:"));
    assert!(
        RasterError::allocation("x")
            .to_string()
            .contains("allocation error:")
    );
    assert!(RasterError::state("x").to_string().contains("state error:"));
    assert!(
        RasterError::geometry("x")
            .to_string()
            .contains("geometry error:")
    );
    assert!(
        RasterError::parameter("x")
            .to_string()
            .contains("parameter error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RasterError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn short_read_maps_to_format_error() {
    let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
    let err = RasterError::from_read(eof, "header");
    assert!(matches!(err, RasterError::Format(ref m) if m.contains("header")));

    let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
    assert!(matches!(
        RasterError::from_read(denied, "header"),
        RasterError::Io(_)
    ));
}
