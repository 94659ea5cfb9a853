use rgb::RGBA8;

use crate::error::{RepngError, Result};

const CHANNELS: usize = 4;

/// Lazy, single-pass iterator over the RGBA pixels of a sequence of rows.
///
/// Each row is grouped into 4-byte pixels on its own; rows are never
/// concatenated. A row whose length is not a multiple of 4 yields
/// [`RepngError::MalformedRaster`] once, after which iteration stops.
pub struct Pixels<I, R> {
    rows: I,
    row: Option<R>,
    row_index: usize,
    offset: usize,
    failed: bool,
}

impl<I, R> Iterator for Pixels<I, R>
where
    I: Iterator<Item = R>,
    R: AsRef<[u8]>,
{
    type Item = Result<RGBA8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(row) = &self.row {
                let bytes = row.as_ref();
                if let Some(c) = bytes.get(self.offset..self.offset + CHANNELS) {
                    self.offset += CHANNELS;
                    return Some(Ok(RGBA8::new(c[0], c[1], c[2], c[3])));
                }
                self.row = None;
                self.row_index += 1;
            }

            let row = self.rows.next()?;
            let len = row.as_ref().len();
            if len % CHANNELS != 0 {
                self.failed = true;
                return Some(Err(RepngError::MalformedRaster {
                    row: self.row_index,
                    len,
                }));
            }
            self.row = Some(row);
            self.offset = 0;
        }
    }
}

/// Iterate the pixels of `rows`, each row a flat run of RGBA bytes.
pub fn pixels<I>(rows: I) -> Pixels<I::IntoIter, I::Item>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    Pixels {
        rows: rows.into_iter(),
        row: None,
        row_index: 0,
        offset: 0,
        failed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_each_row_into_pixels() {
        let rows = vec![vec![1u8, 2, 3, 4, 5, 6, 7, 8], vec![9, 10, 11, 12, 13, 14, 15, 16]];
        let px: Vec<RGBA8> = pixels(&rows).collect::<Result<_>>().unwrap();
        assert_eq!(
            px,
            vec![
                RGBA8::new(1, 2, 3, 4),
                RGBA8::new(5, 6, 7, 8),
                RGBA8::new(9, 10, 11, 12),
                RGBA8::new(13, 14, 15, 16),
            ]
        );
    }

    #[test]
    fn empty_rows_are_skipped() {
        let rows: Vec<Vec<u8>> = vec![vec![], vec![1, 1, 1, 1], vec![]];
        let px: Vec<RGBA8> = pixels(rows).collect::<Result<_>>().unwrap();
        assert_eq!(px, vec![RGBA8::new(1, 1, 1, 1)]);
    }

    #[test]
    fn partial_pixel_is_an_error() {
        let rows = vec![vec![0u8; 8], vec![0u8; 6]];
        let items: Vec<Result<RGBA8>> = pixels(&rows).collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok() && items[1].is_ok());
        assert!(matches!(
            items[2],
            Err(RepngError::MalformedRaster { row: 1, len: 6 })
        ));
    }

    #[test]
    fn iteration_stops_after_error() {
        let rows = vec![vec![0u8; 3], vec![0u8; 4]];
        let mut it = pixels(&rows);
        assert!(matches!(it.next(), Some(Err(_))));
        assert!(it.next().is_none());
    }
}
