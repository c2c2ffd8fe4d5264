//! Entry points used by database column wrappers.

use crate::cursor::ByteOrder;
use crate::decode::WkbDecoder;
use crate::encode::WkbEncoder;
use crate::error::Result;
use crate::geometry::Geometry;

/// Pairs a decoder and an encoder behind the hex and raw-byte entry points.
///
/// Decoding picks the byte order from each value's first byte; encoding uses
/// the encoder's configured order.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireValueAdapter {
    decoder: WkbDecoder,
    encoder: WkbEncoder,
}

impl WireValueAdapter {
    pub fn new(decoder: WkbDecoder, encoder: WkbEncoder) -> Self {
        Self { decoder, encoder }
    }

    /// Adapter writing `order` with a default decoder.
    pub fn with_byte_order(order: ByteOrder) -> Self {
        Self::new(WkbDecoder::new(), WkbEncoder::new(order))
    }

    pub fn decoder(&self) -> &WkbDecoder {
        &self.decoder
    }

    pub fn encoder(&self) -> &WkbEncoder {
        &self.encoder
    }

    pub fn from_hex(&self, hex: &str) -> Result<Geometry> {
        self.decoder.decode_hex(hex)
    }

    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Geometry> {
        self.decoder.decode_bytes(bytes)
    }

    pub fn to_hex(&self, geom: &Geometry) -> Result<String> {
        self.encoder.encode_hex(geom)
    }

    pub fn to_bytes(&self, geom: &Geometry) -> Result<Vec<u8>> {
        self.encoder.encode_bytes(geom)
    }
}
