//! WKB / EWKB encoder, the mirror image of [`crate::decode`].
//!
//! Only the top-level node carries an SRID (when it is not unknown); nested
//! nodes never do, so the decoder's inherited-SRID check always holds.
//! M is never written.

use crate::cursor::ByteOrder;
use crate::error::{GeoWireError, Result};
use crate::geometry::{Coord, Geometry, GeometryKind, LinearRing, Polygon, UNKNOWN_SRID};
use crate::header::{EWKB_SRID_FLAG, EWKB_Z_FLAG};

/// Output buffer honoring one byte order.
struct ByteSink {
    buf: Vec<u8>,
    order: ByteOrder,
}

impl ByteSink {
    fn put_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn put_u32(&mut self, v: u32) {
        match self.order {
            ByteOrder::BigEndian => self.buf.extend_from_slice(&v.to_be_bytes()),
            ByteOrder::LittleEndian => self.buf.extend_from_slice(&v.to_le_bytes()),
        }
    }

    fn put_i32(&mut self, v: i32) {
        match self.order {
            ByteOrder::BigEndian => self.buf.extend_from_slice(&v.to_be_bytes()),
            ByteOrder::LittleEndian => self.buf.extend_from_slice(&v.to_le_bytes()),
        }
    }

    fn put_f64(&mut self, v: f64) {
        match self.order {
            ByteOrder::BigEndian => self.buf.extend_from_slice(&v.to_be_bytes()),
            ByteOrder::LittleEndian => self.buf.extend_from_slice(&v.to_le_bytes()),
        }
    }

    fn put_count(&mut self, len: usize) {
        // counts are bounded by what a decoder can read back
        self.put_u32(len as u32);
    }
}

/// Encoder with a fixed output byte order (little-endian by default).
#[derive(Debug, Clone, Copy, Default)]
pub struct WkbEncoder {
    order: ByteOrder,
}

impl WkbEncoder {
    pub fn new(order: ByteOrder) -> Self {
        Self { order }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Serialise to raw bytes.
    pub fn encode_bytes(&self, geom: &Geometry) -> Result<Vec<u8>> {
        let mut sink = ByteSink {
            buf: Vec::new(),
            order: self.order,
        };
        let has_z = geom.has_z();
        log::debug!(
            "encoding {} (srid {}, z: {has_z}) as {:?} wkb",
            geom.kind().name(),
            geom.srid(),
            self.order
        );
        write_geometry(&mut sink, geom, has_z, true)?;
        Ok(sink.buf)
    }

    /// Serialise to an uppercase hex string, two digits per byte.
    ///
    /// # Example
    ///
    /// ```
    /// use geowire_core::encode::WkbEncoder;
    /// use geowire_core::geometry::{Coord, Geometry, Point};
    ///
    /// let point = Geometry::Point(Point::new(Coord::xy(1.0, 2.0)));
    /// let hex = WkbEncoder::default().encode_hex(&point).unwrap();
    /// assert_eq!(hex, "0101000000000000000000F03F0000000000000040");
    /// ```
    pub fn encode_hex(&self, geom: &Geometry) -> Result<String> {
        Ok(hex::encode_upper(self.encode_bytes(geom)?))
    }
}

fn write_header(sink: &mut ByteSink, kind: GeometryKind, has_z: bool, srid: Option<i32>) {
    let mut type_word = kind.code();
    if has_z {
        type_word |= EWKB_Z_FLAG;
    }
    if srid.is_some() {
        type_word |= EWKB_SRID_FLAG;
    }
    sink.put_u8(sink.order.marker());
    sink.put_u32(type_word);
    if let Some(srid) = srid {
        sink.put_i32(srid);
    }
}

fn write_geometry(sink: &mut ByteSink, geom: &Geometry, has_z: bool, top_level: bool) -> Result<()> {
    let srid = Some(geom.srid()).filter(|&s| top_level && s != UNKNOWN_SRID);
    write_header(sink, geom.kind(), has_z, srid);

    match geom {
        Geometry::Point(p) => write_coord(sink, &p.coord(), has_z),
        Geometry::LineString(ls) => write_slim_coords(sink, ls.coords(), has_z),
        Geometry::LinearRing(r) => write_slim_coords(sink, r.coords(), has_z),
        Geometry::Polygon(p) => write_polygon(sink, p, has_z),
        Geometry::MultiPoint(mp) => {
            sink.put_count(mp.points().len());
            mp.points().iter().try_for_each(|p| {
                write_header(sink, GeometryKind::Point, has_z, None);
                write_coord(sink, &p.coord(), has_z)
            })
        }
        Geometry::MultiLineString(mls) => {
            sink.put_count(mls.lines().len());
            mls.lines().iter().try_for_each(|ls| {
                write_header(sink, GeometryKind::LineString, has_z, None);
                write_slim_coords(sink, ls.coords(), has_z)
            })
        }
        Geometry::MultiPolygon(mp) => {
            sink.put_count(mp.polygons().len());
            mp.polygons().iter().try_for_each(|p| {
                write_header(sink, GeometryKind::Polygon, has_z, None);
                write_polygon(sink, p, has_z)
            })
        }
        Geometry::GeometryCollection(gc) => {
            sink.put_count(gc.geometries().len());
            gc.geometries()
                .iter()
                .try_for_each(|g| write_geometry(sink, g, has_z, false))
        }
    }
}

fn write_coord(sink: &mut ByteSink, c: &Coord, has_z: bool) -> Result<()> {
    if c.has_z() != has_z {
        return Err(GeoWireError::MixedDimensions);
    }
    sink.put_f64(c.x);
    sink.put_f64(c.y);
    if let Some(z) = c.z {
        sink.put_f64(z);
    }
    Ok(())
}

fn write_slim_coords(sink: &mut ByteSink, coords: &[Coord], has_z: bool) -> Result<()> {
    sink.put_count(coords.len());
    coords.iter().try_for_each(|c| write_coord(sink, c, has_z))
}

fn write_ring(sink: &mut ByteSink, ring: &LinearRing, has_z: bool) -> Result<()> {
    write_slim_coords(sink, ring.coords(), has_z)
}

fn write_polygon(sink: &mut ByteSink, poly: &Polygon, has_z: bool) -> Result<()> {
    if poly.is_empty() {
        sink.put_count(0);
        return Ok(());
    }
    sink.put_count(1 + poly.num_interior_rings());
    write_ring(sink, poly.exterior(), has_z)?;
    poly.interiors()
        .iter()
        .try_for_each(|r| write_ring(sink, r, has_z))
}
