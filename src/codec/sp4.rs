use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use crate::{
    buffer::{pixel::PixelBuffer, sprite::SpriteStack, view::alloc_zeroed},
    codec::read_block,
    foundation::core::{FULL_OPACITY, PixelFormat},
    foundation::error::{RasterError, RasterResult},
};

/// File signature at the start of every SP4 stream.
pub const SP4_MAGIC: [u8; 2] = *b"S4";

const HEADER_LEN: usize = 7;

/// Decoded SP4 payload: geometry, per-frame durations and all frame pixels (RGBA).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sp4Image {
    width: u16,
    height: u16,
    durations: Vec<u8>,
    pixels: Vec<u8>,
}

/// Header summary of an SP4 stream.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Sp4Info {
    /// Frame width in pixels.
    pub width: u16,
    /// Frame height in pixels.
    pub height: u16,
    /// Number of frames.
    pub frame_count: u8,
    /// Per-frame screen time; 0 means "caller default".
    pub durations: Vec<u8>,
    /// Whether any duration is 0.
    pub has_default_durations: bool,
}

impl Sp4Image {
    /// Frame width.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Frame height.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of frames.
    pub fn frame_count(&self) -> u8 {
        // read_header caps the table at 255 entries
        u8::try_from(self.durations.len()).unwrap_or(u8::MAX)
    }

    /// Duration table.
    pub fn durations(&self) -> &[u8] {
        &self.durations
    }

    /// Frame pixels back to back, RGBA.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Header summary.
    pub fn info(&self) -> Sp4Info {
        Sp4Info {
            width: self.width,
            height: self.height,
            frame_count: self.frame_count(),
            durations: self.durations.clone(),
            has_default_durations: self.durations.contains(&0),
        }
    }

    /// Keep frame 0 as a bitmap. RGB output drops alpha.
    ///
    /// SP4 stores no alpha-usage flag, so an RGBA result always reports
    /// [`PixelBuffer::meaningful_alpha`] as `true`, whatever the encoded buffer had.
    pub fn into_buffer(self, format: PixelFormat) -> RasterResult<PixelBuffer> {
        let frame_len = PixelFormat::Rgba8.byte_len(self.width, self.height);
        let mut pixels = self.pixels;
        pixels.truncate(frame_len);
        pixels.shrink_to_fit();
        let data = match format {
            PixelFormat::Rgba8 => pixels,
            PixelFormat::Rgb8 => {
                let mut rgb = alloc_zeroed(format.byte_len(self.width, self.height))?;
                for (dst, src) in rgb.chunks_exact_mut(3).zip(pixels.chunks_exact(4)) {
                    dst.copy_from_slice(&src[..3]);
                }
                rgb
            }
        };
        PixelBuffer::from_raw(format, self.width, self.height, data)
    }

    /// Keep every frame and the duration table. Cursor and position start at 0.
    pub fn into_sprite(self) -> RasterResult<SpriteStack> {
        SpriteStack::from_parts(self.width, self.height, self.durations, self.pixels)
    }
}

/// Decode an SP4 stream.
///
/// Reads the header, the duration table and exactly `width * height * frames * 4`
/// pixel bytes. A short read, a bad signature, zero frames or a zero dimension is a
/// [`RasterError::Format`]. Pixel storage grows with the bytes read, never with the
/// size the header claims.
#[tracing::instrument(skip(reader))]
pub fn read_sp4<R: Read>(reader: &mut R) -> RasterResult<Sp4Image> {
    let info = read_header(reader)?;
    let frame_len = PixelFormat::Rgba8.byte_len(info.width, info.height);
    let total = frame_len
        .checked_mul(usize::from(info.frame_count))
        .ok_or_else(|| RasterError::format("SP4 header declares an unaddressable pixel block"))?;
    let pixels = read_block(reader, total, "SP4 frame data")?;
    tracing::debug!(
        width = info.width,
        height = info.height,
        frames = info.frame_count,
        "decoded SP4"
    );
    Ok(Sp4Image {
        width: info.width,
        height: info.height,
        durations: info.durations,
        pixels,
    })
}

/// Decode only the header and duration table.
pub fn read_sp4_info<R: Read>(reader: &mut R) -> RasterResult<Sp4Info> {
    read_header(reader)
}

/// Decode frame 0 of an SP4 stream into a bitmap of `format`.
pub fn decode_buffer<R: Read>(reader: &mut R, format: PixelFormat) -> RasterResult<PixelBuffer> {
    read_sp4(reader)?.into_buffer(format)
}

/// Decode every frame of an SP4 stream into a sprite.
pub fn decode_sprite<R: Read>(reader: &mut R) -> RasterResult<SpriteStack> {
    read_sp4(reader)?.into_sprite()
}

/// Encode a bitmap as a single-frame SP4 with duration 0.
///
/// RGB pixels are written with alpha 100.
#[tracing::instrument(skip_all, fields(width = buf.width(), height = buf.height()))]
pub fn write_sp4_buffer<W: Write>(writer: &mut W, buf: &PixelBuffer) -> RasterResult<()> {
    let data = buf
        .data()
        .map_err(|_| RasterError::state("cannot encode an unallocated pixel buffer"))?;
    write_header(writer, buf.width(), buf.height(), &[0])?;
    match buf.format() {
        PixelFormat::Rgba8 => writer.write_all(data)?,
        PixelFormat::Rgb8 => {
            let mut rgba = alloc_zeroed(PixelFormat::Rgba8.byte_len(buf.width(), buf.height()))?;
            for (dst, src) in rgba.chunks_exact_mut(4).zip(data.chunks_exact(3)) {
                dst[..3].copy_from_slice(src);
                dst[3] = FULL_OPACITY;
            }
            writer.write_all(&rgba)?;
        }
    }
    Ok(())
}

/// Encode every frame of a sprite together with its duration table.
#[tracing::instrument(skip_all, fields(frames = spr.frame_count()))]
pub fn write_sp4_sprite<W: Write>(writer: &mut W, spr: &SpriteStack) -> RasterResult<()> {
    if !spr.exists() {
        return Err(RasterError::state("cannot encode an unallocated sprite"));
    }
    write_header(writer, spr.width(), spr.height(), spr.durations())?;
    writer.write_all(spr.frames_data())?;
    Ok(())
}

/// Load frame 0 of an SP4 file.
pub fn load_sp4_buffer(path: impl AsRef<Path>, format: PixelFormat) -> RasterResult<PixelBuffer> {
    decode_buffer(&mut open(path.as_ref())?, format)
}

/// Load every frame of an SP4 file.
pub fn load_sp4_sprite(path: impl AsRef<Path>) -> RasterResult<SpriteStack> {
    decode_sprite(&mut open(path.as_ref())?)
}

/// Read just the header of an SP4 file.
pub fn load_sp4_info(path: impl AsRef<Path>) -> RasterResult<Sp4Info> {
    read_sp4_info(&mut open(path.as_ref())?)
}

/// Save a bitmap as a single-frame SP4 file.
pub fn save_sp4_buffer(path: impl AsRef<Path>, buf: &PixelBuffer) -> RasterResult<()> {
    if buf.is_empty() {
        return Err(RasterError::state("cannot encode an unallocated pixel buffer"));
    }
    let mut w = create(path.as_ref())?;
    write_sp4_buffer(&mut w, buf)?;
    w.flush()?;
    Ok(())
}

/// Save a sprite as an SP4 file.
pub fn save_sp4_sprite(path: impl AsRef<Path>, spr: &SpriteStack) -> RasterResult<()> {
    if spr.is_empty() {
        return Err(RasterError::state("cannot encode an unallocated sprite"));
    }
    let mut w = create(path.as_ref())?;
    write_sp4_sprite(&mut w, spr)?;
    w.flush()?;
    Ok(())
}

fn open(path: &Path) -> RasterResult<BufReader<File>> {
    tracing::debug!(path = %path.display(), "open SP4");
    Ok(BufReader::new(File::open(path)?))
}

fn create(path: &Path) -> RasterResult<BufWriter<File>> {
    tracing::debug!(path = %path.display(), "create SP4");
    Ok(BufWriter::new(File::create(path)?))
}

fn read_header<R: Read>(reader: &mut R) -> RasterResult<Sp4Info> {
    let mut header = [0u8; HEADER_LEN];
    reader
        .read_exact(&mut header)
        .map_err(|e| RasterError::from_read(e, "SP4 header"))?;
    if header[..2] != SP4_MAGIC {
        return Err(RasterError::format(format!(
            "bad SP4 signature {:02x} {:02x}",
            header[0], header[1]
        )));
    }
    let width = u16::from_le_bytes([header[2], header[3]]);
    let height = u16::from_le_bytes([header[4], header[5]]);
    let frame_count = header[6];
    if frame_count == 0 {
        return Err(RasterError::format("SP4 stream declares zero frames"));
    }
    if width == 0 || height == 0 {
        return Err(RasterError::format(format!(
            "SP4 stream declares a {width}x{height} frame"
        )));
    }

    let mut durations = vec![0u8; usize::from(frame_count)];
    reader
        .read_exact(&mut durations)
        .map_err(|e| RasterError::from_read(e, "SP4 duration table"))?;
    let has_default_durations = durations.contains(&0);
    Ok(Sp4Info {
        width,
        height,
        frame_count,
        durations,
        has_default_durations,
    })
}

fn write_header<W: Write>(
    writer: &mut W,
    width: u16,
    height: u16,
    durations: &[u8],
) -> RasterResult<()> {
    let frame_count = u8::try_from(durations.len())
        .map_err(|_| RasterError::parameter("SP4 holds at most 255 frames"))?;
    let mut header = [0u8; HEADER_LEN];
    header[..2].copy_from_slice(&SP4_MAGIC);
    header[2..4].copy_from_slice(&width.to_le_bytes());
    header[4..6].copy_from_slice(&height.to_le_bytes());
    header[6] = frame_count;
    writer.write_all(&header)?;
    writer.write_all(durations)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/codec/sp4.rs"]
mod tests;
