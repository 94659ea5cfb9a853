//! PNG adapter: decodes any 8/16-bit PNG into RGBA8 rows and encodes
//! assembled bitmaps back to RGBA8 PNG.

use std::io::{BufRead, Read, Seek, Write};

use crate::assemble::Bitmap;
use crate::error::{RepngError, Result};
use crate::Raster;

/// Decode a PNG stream into 8-bit RGBA rows.
///
/// Palette and sub-byte images are expanded, `tRNS` becomes an alpha channel,
/// 16-bit samples are stripped to 8 bits and grayscale is replicated into the
/// three color channels.
pub fn decode<R: BufRead + Seek>(reader: R) -> Result<Raster> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    buf.truncate(frame.buffer_size());

    if frame.bit_depth != png::BitDepth::Eight {
        return Err(RepngError::UnsupportedFormat(format!(
            "bit depth {:?} after normalisation",
            frame.bit_depth
        )));
    }

    let to_rgba: fn(&[u8], &mut Vec<u8>) = match frame.color_type {
        png::ColorType::Rgba => rgba_line,
        png::ColorType::Rgb => rgb_line,
        png::ColorType::GrayscaleAlpha => gray_alpha_line,
        png::ColorType::Grayscale => gray_line,
        other => {
            return Err(RepngError::UnsupportedFormat(format!(
                "color type {other:?} after normalisation"
            )))
        }
    };

    let width = frame.width;
    let height = frame.height;
    let rows = buf
        .chunks_exact(frame.line_size)
        .take(height as usize)
        .map(|line| {
            let mut row = Vec::with_capacity(width as usize * 4);
            to_rgba(line, &mut row);
            row
        })
        .collect();

    log::trace!("decoded {width}x{height} PNG ({:?})", frame.color_type);
    Ok(Raster::new(width, height, rows))
}

fn rgba_line(line: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(line);
}

fn rgb_line(line: &[u8], out: &mut Vec<u8>) {
    for c in line.chunks_exact(3) {
        out.extend_from_slice(&[c[0], c[1], c[2], 255]);
    }
}

fn gray_alpha_line(line: &[u8], out: &mut Vec<u8>) {
    for c in line.chunks_exact(2) {
        out.extend_from_slice(&[c[0], c[0], c[0], c[1]]);
    }
}

fn gray_line(line: &[u8], out: &mut Vec<u8>) {
    for &v in line {
        out.extend_from_slice(&[v, v, v, 255]);
    }
}

/// Decode from any reader by buffering it fully first.
///
/// Use this for non-seekable inputs such as stdin.
pub fn decode_from<R: Read>(mut reader: R) -> Result<Raster> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    decode(std::io::Cursor::new(data))
}

/// Encode `bitmap` as an 8-bit RGBA PNG.
///
/// The bitmap buffer is truncated to the target geometry; a buffer that is too
/// short fails with [`RepngError::EncodeUnderflow`] before anything is written.
pub fn encode<W: Write>(writer: W, bitmap: &Bitmap) -> Result<()> {
    let data = bitmap.fit()?;

    let mut encoder = png::Encoder::new(writer, bitmap.width(), bitmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;
    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use std::io::Cursor;

    fn write_png(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn rgb_gains_opaque_alpha() {
        let png = write_png(2, 1, png::ColorType::Rgb, &[1, 2, 3, 4, 5, 6]);
        let raster = decode(Cursor::new(png)).unwrap();
        assert_eq!((raster.width(), raster.height()), (2, 1));
        assert_eq!(raster.rows(), &[vec![1, 2, 3, 255, 4, 5, 6, 255]]);
    }

    #[test]
    fn grayscale_alpha_is_replicated() {
        let png = write_png(1, 2, png::ColorType::GrayscaleAlpha, &[10, 20, 30, 40]);
        let raster = decode(Cursor::new(png)).unwrap();
        assert_eq!(
            raster.rows(),
            &[vec![10, 10, 10, 20], vec![30, 30, 30, 40]]
        );
    }

    #[test]
    fn encode_then_decode_keeps_pixels() {
        let data: Vec<u8> = (0..24).collect();
        let bmp = Bitmap::new(Geometry::new(3, 2), data.clone());
        let mut out = Vec::new();
        encode(&mut out, &bmp).unwrap();

        let raster = decode_from(out.as_slice()).unwrap();
        assert_eq!((raster.width(), raster.height()), (3, 2));
        assert_eq!(raster.rows().concat(), data);
    }

    #[test]
    fn encode_truncates_extra_pixels() {
        let bmp = Bitmap::new(Geometry::new(1, 1), vec![9; 8]);
        let mut out = Vec::new();
        encode(&mut out, &bmp).unwrap();
        let raster = decode(Cursor::new(out)).unwrap();
        assert_eq!(raster.rows(), &[vec![9, 9, 9, 9]]);
    }

    #[test]
    fn encode_underflow_writes_nothing() {
        let bmp = Bitmap::new(Geometry::new(2, 2), vec![0; 4]);
        let mut out = Vec::new();
        assert!(matches!(
            encode(&mut out, &bmp),
            Err(RepngError::EncodeUnderflow { .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            decode(Cursor::new(b"not a png".to_vec())),
            Err(RepngError::Decode(_))
        ));
    }
}
