use rgb::RGBA8;

use crate::error::{RepngError, Result};

/// Largest number of low bits that can be discarded from an 8-bit channel.
pub const MAX_DOWNSAMPLE_BITS: u8 = 8;

/// Per-channel bit-depth reduction with round-half-up and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quantizer {
    bits: u8,
}

impl Quantizer {
    /// Build a quantizer that discards `bits` low bits from every channel.
    ///
    /// Fails with [`RepngError::InvalidParameter`] if `bits > 8`; the value is
    /// never clamped into range.
    pub fn new(bits: u8) -> Result<Self> {
        if bits > MAX_DOWNSAMPLE_BITS {
            return Err(RepngError::InvalidParameter(format!(
                "downsample bits must be between 0 and {MAX_DOWNSAMPLE_BITS}, got {bits}"
            )));
        }
        Ok(Self { bits })
    }

    pub fn bits(self) -> u8 {
        self.bits
    }

    /// Whether this quantizer leaves every value unchanged.
    pub fn is_identity(self) -> bool {
        self.bits == 0
    }

    /// Quantize a single channel value.
    pub fn apply(self, value: u8) -> u8 {
        if self.bits == 0 {
            return value;
        }
        // Half a step of bias so truncation rounds to the nearest level.
        let biased = value as u16 + (1u16 << (self.bits - 1));
        let level = (biased >> self.bits) << self.bits;
        level.min(u8::MAX as u16) as u8
    }

    /// Quantize all four channels of a pixel, alpha included.
    pub fn apply_pixel(self, px: RGBA8) -> RGBA8 {
        RGBA8 {
            r: self.apply(px.r),
            g: self.apply(px.g),
            b: self.apply(px.b),
            a: self.apply(px.a),
        }
    }
}

/// Quantize `value` by discarding `bits` low bits with rounding.
pub fn quantize(value: u8, bits: u8) -> Result<u8> {
    Quantizer::new(bits).map(|q| q.apply(value))
}
