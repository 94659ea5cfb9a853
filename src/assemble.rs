use crate::error::{RepngError, Result};
use crate::geometry::Geometry;
use crate::histogram::FrequencyEntry;

/// Expand ordered clusters back into a flat RGBA byte buffer.
///
/// Each entry contributes its four channel bytes `count` times, contiguously
/// and in order. The result is `4 * total count` bytes; it is never padded.
pub fn assemble(entries: &[FrequencyEntry]) -> Vec<u8> {
    let total: usize = entries.iter().map(|e| e.count).sum();
    let mut out = Vec::with_capacity(total * 4);
    for e in entries {
        let px = [e.pixel.r, e.pixel.g, e.pixel.b, e.pixel.a];
        for _ in 0..e.count {
            out.extend_from_slice(&px);
        }
    }
    out
}

/// An assembled pixel buffer and the geometry it will be encoded at.
///
/// The buffer length follows the input pixel count, not the geometry; use
/// [`Bitmap::fit`] to get exactly the bytes the geometry needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    geometry: Geometry,
    data: Vec<u8>,
}

impl Bitmap {
    pub fn new(geometry: Geometry, data: Vec<u8>) -> Self {
        Self { geometry, data }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn width(&self) -> u32 {
        self.geometry.width
    }

    pub fn height(&self) -> u32 {
        self.geometry.height
    }

    /// The full assembled buffer, before truncation.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The first `width * height * 4` bytes of the buffer.
    ///
    /// Extra bytes are dropped. A short buffer is an
    /// [`RepngError::EncodeUnderflow`] rather than being padded; a geometry too
    /// large to address reports `expected` as `usize::MAX`.
    pub fn fit(&self) -> Result<&[u8]> {
        let expected = self.geometry.byte_len().unwrap_or(usize::MAX);
        self.data
            .get(..expected)
            .ok_or(RepngError::EncodeUnderflow {
                expected,
                actual: self.data.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGBA8;

    #[test]
    fn clusters_are_contiguous() {
        let entries = [
            FrequencyEntry::new(RGBA8::new(1, 2, 3, 4), 2),
            FrequencyEntry::new(RGBA8::new(9, 9, 9, 9), 1),
        ];
        assert_eq!(
            assemble(&entries),
            vec![1, 2, 3, 4, 1, 2, 3, 4, 9, 9, 9, 9]
        );
    }

    #[test]
    fn empty_entries_give_empty_buffer() {
        assert!(assemble(&[]).is_empty());
    }

    #[test]
    fn fit_truncates_long_buffer() {
        let bmp = Bitmap::new(Geometry::new(1, 1), vec![7; 12]);
        assert_eq!(bmp.fit().unwrap(), &[7, 7, 7, 7]);
        assert_eq!(bmp.data().len(), 12);
    }

    #[test]
    fn fit_rejects_short_buffer() {
        let bmp = Bitmap::new(Geometry::new(2, 2), vec![0; 12]);
        assert!(matches!(
            bmp.fit(),
            Err(RepngError::EncodeUnderflow {
                expected: 16,
                actual: 12
            })
        ));
    }

    #[test]
    fn fit_rejects_unaddressable_geometry() {
        let bmp = Bitmap::new(Geometry::new(u32::MAX, u32::MAX), vec![1, 2, 3, 4]);
        assert!(matches!(
            bmp.fit(),
            Err(RepngError::EncodeUnderflow {
                expected: usize::MAX,
                actual: 4
            })
        ));
    }
}
