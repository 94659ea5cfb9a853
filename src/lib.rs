#![forbid(unsafe_code)]

//! Rewrite an image with the same pixels in a different order.
//!
//! Pixels are (optionally) quantized, counted into color clusters, the clusters
//! are reordered by a [`ClusterOrder`] policy, and the result is laid out again
//! at a geometry derived by a [`ReshapeMode`].
//!
//! ```no_run
//! use repng::{ClusterOrder, ReshapeMode, TransformConfig};
//!
//! let config = TransformConfig::new()
//!     .downsample(2)
//!     .reshape(ReshapeMode::Square)
//!     .ordering(ClusterOrder::Light);
//! let input = std::io::BufReader::new(std::fs::File::open("in.png")?);
//! let output = std::fs::File::create("out.png")?;
//! repng::sort_png(input, output, &config)?;
//! # Ok::<(), repng::RepngError>(())
//! ```

pub mod assemble;
pub mod codec;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod histogram;
pub mod ordering;
pub mod quantize;

pub use assemble::{assemble, Bitmap};
pub use error::{RepngError, Result};
pub use geometry::{resolve, Geometry, ReshapeMode};
pub use histogram::{FrequencyEntry, FrequencyTable};
pub use ordering::{order, ClusterOrder};
pub use quantize::{quantize, Quantizer};

use std::io::{BufRead, Seek, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A decoded image: dimensions plus rows of RGBA bytes.
///
/// Rows are expected to hold `width * 4` bytes each, `height` rows in total.
/// [`codec::decode`] always produces such rasters; hand-built ones are not
/// checked here. Ragged rows surface as [`RepngError::MalformedRaster`] in
/// [`transform`] and missing pixels as [`RepngError::EncodeUnderflow`] at
/// [`Bitmap::fit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    rows: Vec<Vec<u8>>,
}

impl Raster {
    pub fn new(width: u32, height: u32, rows: Vec<Vec<u8>>) -> Self {
        Self {
            width,
            height,
            rows,
        }
    }

    /// Build a raster from a flat RGBA buffer, `width * 4` bytes per row.
    pub fn from_rgba(width: u32, height: u32, data: &[u8]) -> Self {
        let stride = (width as usize * 4).max(1);
        let rows = data.chunks(stride).map(<[u8]>::to_vec).collect();
        Self::new(width, height, rows)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }
}

/// Configuration for [`transform`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformConfig {
    /// Low bits discarded from every channel (0..=8). 0 keeps colors exact.
    pub downsample: u8,
    /// How output dimensions are derived from the input.
    pub reshape: ReshapeMode,
    /// Order in which color clusters are written.
    pub ordering: ClusterOrder,
    /// Seed for [`ClusterOrder::Shuf`]. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl TransformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downsample(mut self, bits: u8) -> Self {
        self.downsample = bits;
        self
    }

    pub fn reshape(mut self, mode: ReshapeMode) -> Self {
        self.reshape = mode;
        self
    }

    pub fn ordering(mut self, ordering: ClusterOrder) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => {
                if self.ordering.is_random() {
                    log::debug!("no seed given, {} ordering seeded from OS entropy", self.ordering);
                }
                StdRng::from_entropy()
            }
        }
    }
}

/// Regroup and reorder the pixels of `input`.
///
/// Randomness for [`ClusterOrder::Shuf`] comes from `config.seed`.
pub fn transform(input: &Raster, config: &TransformConfig) -> Result<Bitmap> {
    let quantizer = validate_config(config)?;
    transform_inner(input, quantizer, config, &mut config.rng())
}

/// Like [`transform`], drawing randomness from `rng` instead of `config.seed`.
pub fn transform_with_rng<R>(input: &Raster, config: &TransformConfig, rng: &mut R) -> Result<Bitmap>
where
    R: Rng + ?Sized,
{
    let quantizer = validate_config(config)?;
    transform_inner(input, quantizer, config, rng)
}

fn transform_inner<R>(
    input: &Raster,
    quantizer: Quantizer,
    config: &TransformConfig,
    rng: &mut R,
) -> Result<Bitmap>
where
    R: Rng + ?Sized,
{
    // Geometry never depends on pixel content.
    let geometry = resolve(input.width, input.height, config.reshape);
    log::debug!(
        "{}x{} -> {geometry} (reshape {})",
        input.width,
        input.height,
        config.reshape
    );

    let pixels = extract::pixels(&input.rows).map(|px| px.map(|px| quantizer.apply_pixel(px)));
    let table = FrequencyTable::try_build(pixels)?;
    log::debug!(
        "{} pixels in {} clusters (downsample {} bits)",
        table.total(),
        table.len(),
        quantizer.bits()
    );

    let entries = order(table.into_entries(), config.ordering, rng);
    log::trace!("ordered clusters by {}", config.ordering);

    Ok(Bitmap::new(geometry, assemble(&entries)))
}

/// Decode a PNG from `input`, transform it and write the result to `output`.
pub fn sort_png<R, W>(input: R, output: W, config: &TransformConfig) -> Result<()>
where
    R: BufRead + Seek,
    W: Write,
{
    validate_config(config)?;
    let raster = codec::decode(input)?;
    let bitmap = transform(&raster, config)?;
    codec::encode(output, &bitmap)
}

fn validate_config(config: &TransformConfig) -> Result<Quantizer> {
    Quantizer::new(config.downsample)
}
