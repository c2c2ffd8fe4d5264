//! WKB node header.
//!
//! Wire format of every node:
//!   [0x01|0x00]    byte order marker (little-endian or big-endian)
//!   [u32]          geometry type with flags (in the declared byte order)
//!                   Bit 29 (0x20000000): SRID present
//!                   Bit 31 (0x80000000): Z dimension
//!                   Bit 30 (0x40000000): M dimension
//!                   Bits 0–28: geometry type (1=Point, 2=LineString, …)
//!   [i32]          SRID (only when SRID flag set, in declared byte order)
//!   …              kind-specific payload

use crate::cursor::{ByteCursor, ByteOrder};
use crate::error::Result;
use crate::geometry::UNKNOWN_SRID;

// ── EWKB flag constants ───────────────────────────────────────────────────────
pub const EWKB_SRID_FLAG: u32 = 0x20000000;
pub const EWKB_Z_FLAG: u32 = 0x80000000;
pub const EWKB_M_FLAG: u32 = 0x40000000;
pub const WKB_TYPE_MASK: u32 = 0x1FFFFFFF;

// ── Geometry type codes ───────────────────────────────────────────────────────
pub const WKB_POINT: u32 = 1;
pub const WKB_LINESTRING: u32 = 2;
pub const WKB_POLYGON: u32 = 3;
pub const WKB_MULTIPOINT: u32 = 4;
pub const WKB_MULTILINESTRING: u32 = 5;
pub const WKB_MULTIPOLYGON: u32 = 6;
pub const WKB_GEOMETRYCOLLECTION: u32 = 7;

/// Decoded type word plus optional SRID of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WkbHeader {
    /// Base geometry type code, flags stripped.
    pub kind_code: u32,
    pub has_z: bool,
    pub has_m: bool,
    /// SRID embedded in the node, already normalised.
    pub srid: Option<i32>,
}

impl WkbHeader {
    /// Split a raw type word into kind code and flags.
    pub fn from_type_word(type_word: u32) -> Self {
        Self {
            kind_code: type_word & WKB_TYPE_MASK,
            has_z: type_word & EWKB_Z_FLAG != 0,
            has_m: type_word & EWKB_M_FLAG != 0,
            srid: None,
        }
    }

    /// Read type word and optional SRID; the marker byte has been consumed.
    pub(crate) fn read(cur: &mut ByteCursor<'_>) -> Result<Self> {
        let type_word = cur.read_u32()?;
        let mut header = Self::from_type_word(type_word);
        if type_word & EWKB_SRID_FLAG != 0 {
            header.srid = Some(normalize_srid(cur.read_i32()?));
        }
        Ok(header)
    }
}

/// Negative SRIDs mean "unknown" on the wire.
pub fn normalize_srid(srid: i32) -> i32 {
    if srid < 0 {
        log::warn!("negative srid {srid} treated as unknown");
        UNKNOWN_SRID
    } else {
        srid
    }
}

/// Top-level header of an encoded value plus its byte order and payload offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueHeader {
    pub header: WkbHeader,
    pub byte_order: ByteOrder,
    /// Byte offset where the payload starts (after header + optional SRID).
    pub data_offset: usize,
}

/// Peek at the top-level header without decoding the payload.
///
/// # Example
///
/// ```
/// use geowire_core::header::{read_header, WKB_POINT};
///
/// let blob = hex::decode("0101000020E6100000000000000000F03F0000000000000040").unwrap();
/// let hdr = read_header(&blob).unwrap();
/// assert_eq!(hdr.header.kind_code, WKB_POINT);
/// assert_eq!(hdr.header.srid, Some(4326));
/// assert_eq!(hdr.data_offset, 9);
/// ```
pub fn read_header(bytes: &[u8]) -> Result<ValueHeader> {
    let mut cur = ByteCursor::from_bytes(bytes)?;
    cur.read_byte()?;
    let header = WkbHeader::read(&mut cur)?;
    Ok(ValueHeader {
        header,
        byte_order: cur.byte_order(),
        data_offset: cur.position(),
    })
}
