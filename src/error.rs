use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepngError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("row {row} has {len} bytes, which is not a whole number of RGBA pixels")]
    MalformedRaster { row: usize, len: usize },

    #[error("pixel buffer holds {actual} bytes but the output image needs {expected}")]
    EncodeUnderflow { expected: usize, actual: usize },

    #[error("unsupported image layout: {0}")]
    UnsupportedFormat(String),

    #[error("failed to decode PNG: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = RepngError> = core::result::Result<T, E>;
