use crate::foundation::core::PixelFormat;

/// Borrowed, format-tagged pixel rectangle. Bitmaps and sprite frames both lower to this.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Surface<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) format: PixelFormat,
}

/// Mutable counterpart of [`Surface`].
#[derive(Debug)]
pub(crate) struct SurfaceMut<'a> {
    pub(crate) data: &'a mut [u8],
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) format: PixelFormat,
}

impl Surface<'_> {
    pub(crate) fn offset(&self, x: usize, y: usize) -> usize {
        (y * usize::from(self.width) + x) * self.format.stride()
    }

    pub(crate) fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let off = self.offset(x, y);
        &self.data[off..off + self.format.stride()]
    }
}

impl SurfaceMut<'_> {
    pub(crate) fn offset(&self, x: usize, y: usize) -> usize {
        (y * usize::from(self.width) + x) * self.format.stride()
    }
}

/// Allocate `len` zeroed bytes, reporting reservation failure instead of aborting.
pub(crate) fn alloc_zeroed(len: usize) -> crate::RasterResult<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|e| {
        crate::RasterError::allocation(format!("could not reserve {len} bytes: {e}"))
    })?;
    data.resize(len, 0);
    Ok(data)
}
