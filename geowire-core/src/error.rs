use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoWireError {
    #[error("malformed hex encoding: {0}")]
    MalformedEncoding(#[from] hex::FromHexError),

    #[error("truncated input: need {needed} byte(s) at offset {offset}, {remaining} left")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("unknown byte order marker: {0:#04x}")]
    UnknownByteOrder(u8),

    #[error("endian inconsistency: expected marker {expected:#04x}, found {found:#04x}")]
    EndianMismatch { expected: u8, found: u8 },

    #[error("unknown geometry type: {0}")]
    UnknownGeometryType(u32),

    #[error("inconsistent srids in complex geometry: {inherited}, {found}")]
    InconsistentSrid { inherited: i32, found: i32 },

    #[error("geometry nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("geometry mixes 2D and 3D coordinates")]
    MixedDimensions,

    #[error("wkt error: {0}")]
    Wkt(#[from] geozero::error::GeozeroError),

    #[error("invalid column value: {0}")]
    InvalidColumnValue(String),
}

pub type Result<T> = std::result::Result<T, GeoWireError>;
