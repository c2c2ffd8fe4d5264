//! Endianness-aware reader over a WKB byte source.

use std::borrow::Cow;

use crate::error::{GeoWireError, Result};

/// Byte order marker values (`0x00` = XDR, `0x01` = NDR).
pub const XDR_MARKER: u8 = 0x00;
pub const NDR_MARKER: u8 = 0x01;

/// Byte order of every multi-byte field in one encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// XDR
    BigEndian,
    /// NDR
    #[default]
    LittleEndian,
}

impl ByteOrder {
    pub fn from_marker(marker: u8) -> Result<Self> {
        match marker {
            XDR_MARKER => Ok(ByteOrder::BigEndian),
            NDR_MARKER => Ok(ByteOrder::LittleEndian),
            other => Err(GeoWireError::UnknownByteOrder(other)),
        }
    }

    pub fn marker(self) -> u8 {
        match self {
            ByteOrder::BigEndian => XDR_MARKER,
            ByteOrder::LittleEndian => NDR_MARKER,
        }
    }
}

/// Read cursor over raw bytes or decoded hex digits.
///
/// The byte order is fixed from the first byte when the cursor is built and
/// stays the same for the whole value.
#[derive(Debug)]
pub struct ByteCursor<'a> {
    data: Cow<'a, [u8]>,
    pos: usize,
    order: ByteOrder,
}

impl<'a> ByteCursor<'a> {
    /// Wrap a raw byte slice.
    ///
    /// # Example
    ///
    /// ```
    /// use geowire_core::cursor::{ByteCursor, ByteOrder};
    ///
    /// let cur = ByteCursor::from_bytes(&[0x00, 0x00, 0x00, 0x00, 0x01]).unwrap();
    /// assert_eq!(cur.byte_order(), ByteOrder::BigEndian);
    /// ```
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        Self::with_source(Cow::Borrowed(bytes))
    }

    /// Wrap a hex string, two digits per byte (either case).
    pub fn from_hex(hex: &str) -> Result<ByteCursor<'static>> {
        let bytes = hex::decode(hex)?;
        ByteCursor::with_source(Cow::Owned(bytes))
    }

    fn with_source(data: Cow<'a, [u8]>) -> Result<Self> {
        let marker = first_byte(&data)?;
        let order = ByteOrder::from_marker(marker)?;
        Ok(Self {
            data,
            pos: 0,
            order,
        })
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Byte at position 0, regardless of where the cursor is.
    pub fn peek_first_byte(&self) -> Result<u8> {
        first_byte(&self.data)
    }

    /// Fail with `TruncatedInput` unless `needed` more bytes are available.
    pub fn ensure_remaining(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(GeoWireError::TruncatedInput {
                offset: self.pos,
                needed,
                remaining,
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure_remaining(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        let [b] = self.take::<1>()?;
        Ok(b)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take::<4>()?;
        Ok(match self.order {
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
        })
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.take::<4>()?;
        Ok(match self.order {
            ByteOrder::BigEndian => i32::from_be_bytes(bytes),
            ByteOrder::LittleEndian => i32::from_le_bytes(bytes),
        })
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let bytes = self.take::<8>()?;
        Ok(match self.order {
            ByteOrder::BigEndian => f64::from_be_bytes(bytes),
            ByteOrder::LittleEndian => f64::from_le_bytes(bytes),
        })
    }
}

fn first_byte(data: &[u8]) -> Result<u8> {
    data.first().copied().ok_or(GeoWireError::TruncatedInput {
        offset: 0,
        needed: 1,
        remaining: 0,
    })
}
