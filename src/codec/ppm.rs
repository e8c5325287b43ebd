use std::{
    fs::File,
    io::{BufReader, BufWriter, Cursor, Read, Write},
    path::Path,
};

use anyhow::Context;
use image::{
    ExtendedColorType, ImageDecoder, ImageEncoder, ImageError,
    codecs::pnm::{PnmDecoder, PnmEncoder, PnmSubtype, SampleEncoding},
};

use crate::{
    buffer::{pixel::PixelBuffer, view::alloc_zeroed},
    convert::format::{rgb_to_rgba, rgba_to_rgb},
    foundation::core::{FULL_OPACITY, PixelFormat},
    foundation::error::{RasterError, RasterResult},
};

/// Sample encoding used when writing a PPM.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum PpmEncoding {
    /// `P3`: whitespace-separated decimal samples.
    Ascii,
    /// `P6`: raw bytes.
    #[default]
    Binary,
}

/// Decode a `P3` or `P6` stream into an RGB bitmap.
///
/// The stream is read to its end and decoded from memory.
#[tracing::instrument(skip(reader))]
pub fn read_ppm<R: Read>(reader: &mut R) -> RasterResult<PixelBuffer> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_ppm(&bytes)
}

/// Decode an in-memory `P3` or `P6` image into an RGB bitmap.
///
/// `P3` needs a depth of 255. A `P6` depth below 255 is accepted and its samples are
/// kept as stored. Anything else the header or data gets wrong is a
/// [`RasterError::Format`].
pub fn decode_ppm(bytes: &[u8]) -> RasterResult<PixelBuffer> {
    let decoder =
        PnmDecoder::new(Cursor::new(bytes)).map_err(|e| pnm_error(e, "PPM header"))?;
    let header = decoder.header();
    let encoding = match header.subtype() {
        PnmSubtype::Pixmap(SampleEncoding::Ascii) => PpmEncoding::Ascii,
        PnmSubtype::Pixmap(SampleEncoding::Binary) => PpmEncoding::Binary,
        other => {
            return Err(RasterError::format(format!(
                "unsupported PNM subtype {other:?}, expected P3 or P6"
            )));
        }
    };
    let width = dimension(header.width(), "PPM width")?;
    let height = dimension(header.height(), "PPM height")?;
    match (encoding, header.maximal_sample()) {
        (_, 255) => {}
        (PpmEncoding::Ascii, d) => {
            return Err(RasterError::format(format!("P3 depth must be 255 (got {d})")));
        }
        (PpmEncoding::Binary, d) if d < 255 => {
            tracing::warn!(depth = d, "P6 depth below 255, reading samples as 8-bit");
        }
        (PpmEncoding::Binary, d) => {
            return Err(RasterError::format(format!(
                "P6 depth {d} needs 16-bit samples, which are not supported"
            )));
        }
    }

    let total = PixelFormat::Rgb8.byte_len(width, height);
    let data = match encoding {
        PpmEncoding::Binary => {
            // samples are taken as stored; the decoder would rescale a low depth
            let (cursor, _) = decoder.into_inner();
            let start = usize::try_from(cursor.position()).unwrap_or(bytes.len());
            let samples = bytes
                .get(start..)
                .and_then(|rest| rest.get(..total))
                .ok_or_else(|| {
                    RasterError::format(format!(
                        "truncated stream while reading P6 pixel data: need {total} bytes"
                    ))
                })?;
            let mut data = alloc_zeroed(total)?;
            data.copy_from_slice(samples);
            data
        }
        PpmEncoding::Ascii => {
            // every sample takes a digit and all but the last a separator
            if bytes.len() < total.saturating_mul(2).saturating_sub(1) {
                return Err(RasterError::format(format!(
                    "P3 stream of {} bytes cannot hold {total} samples",
                    bytes.len()
                )));
            }
            let mut data = alloc_zeroed(total)?;
            decoder
                .read_image(&mut data)
                .map_err(|e| pnm_error(e, "P3 samples"))?;
            data
        }
    };
    PixelBuffer::from_raw(PixelFormat::Rgb8, width, height, data)
}

/// Encode a bitmap as PPM. RGBA sources lose their alpha.
#[tracing::instrument(skip(writer, buf), fields(width = buf.width(), height = buf.height()))]
pub fn write_ppm<W: Write>(
    writer: &mut W,
    buf: &PixelBuffer,
    encoding: PpmEncoding,
) -> RasterResult<()> {
    if !buf.exists() {
        return Err(RasterError::state("cannot encode an unallocated pixel buffer"));
    }
    let rgb;
    let src = match buf.format() {
        PixelFormat::Rgb8 => buf,
        PixelFormat::Rgba8 => {
            rgb = rgba_to_rgb(buf)?;
            &rgb
        }
    };
    let sample = match encoding {
        PpmEncoding::Ascii => SampleEncoding::Ascii,
        PpmEncoding::Binary => SampleEncoding::Binary,
    };
    PnmEncoder::new(writer)
        .with_subtype(PnmSubtype::Pixmap(sample))
        .write_image(
            src.data()?,
            u32::from(src.width()),
            u32::from(src.height()),
            ExtendedColorType::Rgb8,
        )
        .context("encode PPM")?;
    Ok(())
}

/// Load a PPM file as an RGB bitmap.
pub fn load_ppm(path: impl AsRef<Path>) -> RasterResult<PixelBuffer> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "open PPM");
    read_ppm(&mut BufReader::new(File::open(path)?))
}

/// Load a PPM file as an opaque RGBA bitmap.
pub fn load_ppm_rgba(path: impl AsRef<Path>) -> RasterResult<PixelBuffer> {
    rgb_to_rgba(&load_ppm(path)?, FULL_OPACITY, None)
}

/// Save a bitmap as a PPM file.
pub fn save_ppm(
    path: impl AsRef<Path>,
    buf: &PixelBuffer,
    encoding: PpmEncoding,
) -> RasterResult<()> {
    if buf.is_empty() {
        return Err(RasterError::state("cannot encode an unallocated pixel buffer"));
    }
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), ?encoding, "create PPM");
    let mut w = BufWriter::new(File::create(path)?);
    write_ppm(&mut w, buf, encoding)?;
    w.flush()?;
    Ok(())
}

fn dimension(v: u32, what: &str) -> RasterResult<u16> {
    match u16::try_from(v) {
        Ok(d) if d > 0 => Ok(d),
        _ => Err(RasterError::format(format!("{what} {v} out of range"))),
    }
}

fn pnm_error(err: ImageError, what: &str) -> RasterError {
    match err {
        ImageError::IoError(e) => RasterError::from_read(e, what),
        other => RasterError::format(format!("malformed {what}: {other}")),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/ppm.rs"]
mod tests;
