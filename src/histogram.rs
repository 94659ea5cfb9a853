use std::collections::HashMap;

use rgb::RGBA8;

use crate::error::Result;

/// A color cluster: one distinct pixel value and how many times it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrequencyEntry {
    pub pixel: RGBA8,
    pub count: usize,
}

impl FrequencyEntry {
    pub fn new(pixel: RGBA8, count: usize) -> Self {
        Self { pixel, count }
    }

    /// Sum of the color channels, ignoring alpha. Used as the lightness key.
    pub fn brightness(&self) -> u16 {
        self.pixel.r as u16 + self.pixel.g as u16 + self.pixel.b as u16
    }
}

/// Pixel counts in first-occurrence order.
///
/// Every pixel value appears in exactly one entry and the counts sum to the
/// number of pixels consumed. Entry order is the order in which each value was
/// first seen, which later tie-breaking depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<FrequencyEntry>,
    total: usize,
}

impl FrequencyTable {
    /// Count every pixel of `pixels`.
    pub fn build<I>(pixels: I) -> Self
    where
        I: IntoIterator<Item = RGBA8>,
    {
        let mut index: HashMap<RGBA8, usize> = HashMap::new();
        let mut entries: Vec<FrequencyEntry> = Vec::new();
        let mut total = 0usize;

        for px in pixels {
            total += 1;
            match index.get(&px) {
                Some(&i) => entries[i].count += 1,
                None => {
                    index.insert(px, entries.len());
                    entries.push(FrequencyEntry::new(px, 1));
                }
            }
        }

        Self { entries, total }
    }

    /// Count a fallible pixel stream, stopping at the first error.
    pub fn try_build<I>(pixels: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<RGBA8>>,
    {
        let mut err = None;
        let table = Self::build(pixels.into_iter().map_while(|px| match px {
            Ok(px) => Some(px),
            Err(e) => {
                err = Some(e);
                None
            }
        }));
        match err {
            Some(e) => Err(e),
            None => Ok(table),
        }
    }

    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<FrequencyEntry> {
        self.entries
    }

    /// Number of distinct pixel values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of pixels counted.
    pub fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn gray(v: u8) -> RGBA8 {
        RGBA8::new(v, v, v, 255)
    }

    #[test]
    fn empty_input() {
        let t = FrequencyTable::build(Vec::new());
        assert!(t.is_empty());
        assert_eq!(t.total(), 0);
    }

    #[test]
    fn keeps_first_seen_order() {
        let px = [gray(3), gray(1), gray(3), gray(2), gray(1), gray(3)];
        let t = FrequencyTable::build(px);
        assert_eq!(
            t.entries(),
            &[
                FrequencyEntry::new(gray(3), 3),
                FrequencyEntry::new(gray(1), 2),
                FrequencyEntry::new(gray(2), 1),
            ]
        );
    }

    #[test]
    fn counts_sum_to_total_and_keys_are_unique() {
        let px: Vec<RGBA8> = (0..1000u32)
            .map(|i| gray(((i * 37) % 11) as u8))
            .collect();
        let t = FrequencyTable::build(px.iter().copied());
        assert_eq!(t.total(), px.len());
        assert_eq!(t.entries().iter().map(|e| e.count).sum::<usize>(), px.len());
        let keys: HashSet<RGBA8> = t.entries().iter().map(|e| e.pixel).collect();
        assert_eq!(keys.len(), t.len());
        assert_eq!(t.len(), 11);
    }

    #[test]
    fn alpha_distinguishes_pixels() {
        let t = FrequencyTable::build([RGBA8::new(1, 1, 1, 0), RGBA8::new(1, 1, 1, 255)]);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn try_build_propagates_error() {
        use crate::error::RepngError;
        let items: Vec<Result<RGBA8>> = vec![
            Ok(gray(1)),
            Err(RepngError::MalformedRaster { row: 0, len: 3 }),
            Ok(gray(2)),
        ];
        assert!(matches!(
            FrequencyTable::try_build(items),
            Err(RepngError::MalformedRaster { .. })
        ));
    }

    #[test]
    fn brightness_ignores_alpha() {
        assert_eq!(FrequencyEntry::new(RGBA8::new(255, 255, 255, 0), 1).brightness(), 765);
    }
}
