pub(crate) mod ppm;
pub(crate) mod sp4;

use std::io::Read;

use crate::foundation::error::{RasterError, RasterResult};

const INITIAL_READ_CAPACITY: usize = 64 * 1024;

/// Read exactly `len` payload bytes.
///
/// Storage grows with the bytes actually delivered, so a header that overstates its
/// payload ends in a [`RasterError::Format`] without reserving the declared size.
pub(crate) fn read_block<R: Read>(reader: &mut R, len: usize, what: &str) -> RasterResult<Vec<u8>> {
    let mut data = Vec::new();
    let initial = len.min(INITIAL_READ_CAPACITY);
    data.try_reserve_exact(initial).map_err(|e| {
        RasterError::allocation(format!("could not reserve {initial} bytes: {e}"))
    })?;
    let limit = u64::try_from(len).unwrap_or(u64::MAX);
    reader
        .by_ref()
        .take(limit)
        .read_to_end(&mut data)
        .map_err(|e| RasterError::from_read(e, what))?;
    if data.len() != len {
        return Err(RasterError::format(format!(
            "truncated stream while reading {what}: got {} of {len} bytes",
            data.len()
        )));
    }
    Ok(data)
}
