/// Alpha value that means "fully opaque" in this crate's 0..=100 alpha scale.
pub const FULL_OPACITY: u8 = 100;

/// Byte layout of a pixel buffer, passed as data to the generic routines.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum PixelFormat {
    /// Three bytes per pixel, no alpha.
    Rgb8,
    /// Four bytes per pixel; alpha uses the 0..=100 scale.
    #[default]
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub const fn stride(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    /// Whether the format carries an alpha byte.
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba8)
    }

    /// Byte length of a `width` x `height` buffer in this format.
    pub fn byte_len(self, width: u16, height: u16) -> usize {
        usize::from(width) * usize::from(height) * self.stride()
    }
}

/// Straight (non-premultiplied) RGB triple.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Build from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an alpha value.
    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }
}

/// RGB plus an alpha byte on the 0..=100 scale (0 = transparent, >= 100 = opaque).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha, 0..=100.
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Build from channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque pixel from RGB channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, FULL_OPACITY)
    }

    /// Drop the alpha byte.
    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Read one pixel from `bytes` laid out in `format`. RGB pixels read as opaque.
    pub(crate) fn read(bytes: &[u8], format: PixelFormat) -> Self {
        match format {
            PixelFormat::Rgb8 => Self::opaque(bytes[0], bytes[1], bytes[2]),
            PixelFormat::Rgba8 => Self::new(bytes[0], bytes[1], bytes[2], bytes[3]),
        }
    }

    /// Write one pixel into `bytes` laid out in `format`. RGB drops alpha.
    pub(crate) fn write(self, bytes: &mut [u8], format: PixelFormat) {
        bytes[0] = self.r;
        bytes[1] = self.g;
        bytes[2] = self.b;
        if format.has_alpha() {
            bytes[3] = self.a;
        }
    }
}

impl From<Rgb> for Rgba {
    fn from(px: Rgb) -> Self {
        Self::opaque(px.r, px.g, px.b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
