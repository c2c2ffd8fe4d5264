//! WKB / EWKB decoder.
//!
//! Decodes a complete value into a [`Geometry`]. The first byte selects the
//! byte order for the whole value; every nested node repeats its own marker
//! and type header, and the marker must agree. The root's Z flag fixes the
//! dimensionality of every nested node. SRIDs declared by nested nodes must
//! match the SRID inherited from the parent.

use crate::cursor::ByteCursor;
use crate::error::{GeoWireError, Result};
use crate::geometry::{
    Coord, Geometry, GeometryCollection, GeometryKind, LineString, LinearRing, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon, UNKNOWN_SRID,
};
use crate::header::WkbHeader;

/// Default bound on collection nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

// marker + type word
const MIN_NODE_LEN: usize = 5;
// ring/line count
const COUNT_LEN: usize = 4;

/// Coordinate layout of one node's slim arrays.
#[derive(Debug, Clone, Copy)]
struct Dims {
    has_z: bool,
    has_m: bool,
}

impl Dims {
    fn width(self) -> usize {
        8 * (2 + usize::from(self.has_z) + usize::from(self.has_m))
    }
}

/// Stateless decoder; configuration is just the nesting limit.
#[derive(Debug, Clone, Copy)]
pub struct WkbDecoder {
    max_depth: usize,
}

impl Default for WkbDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl WkbDecoder {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Reject values whose collections nest deeper than `max_depth` levels.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decode a hex-encoded value.
    ///
    /// # Example
    ///
    /// ```
    /// use geowire_core::decode::WkbDecoder;
    /// use geowire_core::geometry::Geometry;
    ///
    /// let geom = WkbDecoder::new()
    ///     .decode_hex("0101000000000000000000F03F0000000000000040")
    ///     .unwrap();
    /// match geom {
    ///     Geometry::Point(p) => assert_eq!((p.x(), p.y(), p.srid()), (1.0, 2.0, 0)),
    ///     other => panic!("expected point, got {other:?}"),
    /// }
    /// ```
    pub fn decode_hex(&self, hex: &str) -> Result<Geometry> {
        let mut cur = ByteCursor::from_hex(hex)?;
        self.decode_cursor(&mut cur)
    }

    /// Decode a raw byte value.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Geometry> {
        let mut cur = ByteCursor::from_bytes(bytes)?;
        self.decode_cursor(&mut cur)
    }

    /// Decode one value starting at the cursor position.
    pub fn decode_cursor(&self, cur: &mut ByteCursor<'_>) -> Result<Geometry> {
        log::debug!(
            "decoding {} byte(s) of {:?} wkb",
            cur.remaining(),
            cur.byte_order()
        );
        self.parse_geometry(cur, None, None, 0)
    }

    /// `inherited` and `root_z` come from the parent; both are `None` at the root.
    fn parse_geometry(
        &self,
        cur: &mut ByteCursor<'_>,
        inherited: Option<i32>,
        root_z: Option<bool>,
        depth: usize,
    ) -> Result<Geometry> {
        if depth > self.max_depth {
            return Err(GeoWireError::NestingTooDeep {
                limit: self.max_depth,
            });
        }

        let expected = cur.byte_order().marker();
        let found = cur.read_byte()?;
        if found != expected {
            return Err(GeoWireError::EndianMismatch { expected, found });
        }

        let header = WkbHeader::read(cur)?;
        let srid = match (header.srid, inherited) {
            (Some(found), Some(inherited)) if found != inherited => {
                return Err(GeoWireError::InconsistentSrid { inherited, found });
            }
            (Some(found), _) => found,
            (None, Some(inherited)) => inherited,
            (None, None) => UNKNOWN_SRID,
        };

        let kind = GeometryKind::from_code(header.kind_code)
            .ok_or(GeoWireError::UnknownGeometryType(header.kind_code))?;
        let has_z = root_z.unwrap_or(header.has_z);
        if header.has_z != has_z {
            return Err(GeoWireError::MixedDimensions);
        }
        let dims = Dims {
            has_z,
            has_m: header.has_m,
        };

        let geom: Geometry = match kind {
            GeometryKind::Point => Point::new(read_coord(cur, dims)?)
                .with_srid(srid)
                .into(),
            GeometryKind::LineString => LineString::new(read_slim_coords(cur, dims)?)
                .with_srid(srid)
                .into(),
            GeometryKind::Polygon => read_polygon(cur, dims, srid)?.into(),
            GeometryKind::MultiPoint => {
                let points = self.parse_elements(cur, srid, has_z, depth, |g| match g {
                    Geometry::Point(p) => Some(p),
                    _ => None,
                })?;
                MultiPoint::new(points).with_srid(srid).into()
            }
            GeometryKind::MultiLineString => {
                let lines = self.parse_elements(cur, srid, has_z, depth, |g| match g {
                    Geometry::LineString(ls) => Some(ls),
                    _ => None,
                })?;
                MultiLineString::new(lines).with_srid(srid).into()
            }
            GeometryKind::MultiPolygon => {
                let polygons = self.parse_elements(cur, srid, has_z, depth, |g| match g {
                    Geometry::Polygon(p) => Some(p),
                    _ => None,
                })?;
                MultiPolygon::new(polygons).with_srid(srid).into()
            }
            GeometryKind::GeometryCollection => {
                let geometries = self.parse_elements(cur, srid, has_z, depth, Some)?;
                GeometryCollection::new(geometries).with_srid(srid).into()
            }
        };
        Ok(geom)
    }

    /// Parse a counted array of full sub-geometries of one element kind.
    fn parse_elements<T>(
        &self,
        cur: &mut ByteCursor<'_>,
        srid: i32,
        has_z: bool,
        depth: usize,
        narrow: impl Fn(Geometry) -> Option<T>,
    ) -> Result<Vec<T>> {
        let count = read_count(cur, MIN_NODE_LEN)?;
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let child = self.parse_geometry(cur, Some(srid), Some(has_z), depth + 1)?;
            let code = child.kind().code();
            out.push(narrow(child).ok_or(GeoWireError::UnknownGeometryType(code))?);
        }
        Ok(out)
    }
}

/// Read a 32-bit element count and check the input can hold that many
/// elements of at least `min_len` bytes each.
fn read_count(cur: &mut ByteCursor<'_>, min_len: usize) -> Result<usize> {
    let count = cur.read_u32()? as usize;
    cur.ensure_remaining(count.saturating_mul(min_len))?;
    Ok(count)
}

fn read_coord(cur: &mut ByteCursor<'_>, dims: Dims) -> Result<Coord> {
    let x = cur.read_f64()?;
    let y = cur.read_f64()?;
    let z = if dims.has_z {
        Some(cur.read_f64()?)
    } else {
        None
    };
    if dims.has_m {
        cur.read_f64()?;
    }
    Ok(Coord { x, y, z })
}

/// Counted coordinates without per-point marker or type word.
fn read_slim_coords(cur: &mut ByteCursor<'_>, dims: Dims) -> Result<Vec<Coord>> {
    let count = read_count(cur, dims.width())?;
    (0..count).map(|_| read_coord(cur, dims)).collect()
}

fn read_ring(cur: &mut ByteCursor<'_>, dims: Dims) -> Result<LinearRing> {
    Ok(LinearRing::new(read_slim_coords(cur, dims)?))
}

fn read_polygon(cur: &mut ByteCursor<'_>, dims: Dims, srid: i32) -> Result<Polygon> {
    let ring_count = read_count(cur, COUNT_LEN)?;
    if ring_count == 0 {
        return Ok(Polygon::empty().with_srid(srid));
    }
    let exterior = read_ring(cur, dims)?;
    let interiors = (1..ring_count)
        .map(|_| read_ring(cur, dims))
        .collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors).with_srid(srid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{
        EWKB_M_FLAG, EWKB_SRID_FLAG, EWKB_Z_FLAG, WKB_GEOMETRYCOLLECTION, WKB_LINESTRING,
        WKB_MULTIPOINT, WKB_POINT, WKB_POLYGON,
    };

    fn le_point(blob: &mut Vec<u8>, type_word: u32, srid: Option<i32>, ords: &[f64]) {
        blob.push(0x01);
        blob.extend_from_slice(&type_word.to_le_bytes());
        if let Some(s) = srid {
            blob.extend_from_slice(&s.to_le_bytes());
        }
        for o in ords {
            blob.extend_from_slice(&o.to_le_bytes());
        }
    }

    fn le_ring(blob: &mut Vec<u8>, coords: &[(f64, f64)]) {
        blob.extend_from_slice(&(coords.len() as u32).to_le_bytes());
        for (x, y) in coords {
            blob.extend_from_slice(&x.to_le_bytes());
            blob.extend_from_slice(&y.to_le_bytes());
        }
    }

    const SQUARE: [(f64, f64); 5] = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)];
    const HOLE: [(f64, f64); 4] = [(1.0, 1.0), (2.0, 1.0), (1.0, 2.0), (1.0, 1.0)];

    #[test]
    fn decodes_little_endian_point() {
        let geom = WkbDecoder::new()
            .decode_hex("0101000000000000000000F03F0000000000000040")
            .unwrap();
        assert_eq!(geom, Geometry::Point(Point::new(Coord::xy(1.0, 2.0))));
        assert_eq!(geom.srid(), UNKNOWN_SRID);
    }

    #[test]
    fn decodes_big_endian_point_with_srid() {
        let mut blob = vec![0x00];
        blob.extend_from_slice(&(WKB_POINT | EWKB_SRID_FLAG).to_be_bytes());
        blob.extend_from_slice(&4326i32.to_be_bytes());
        blob.extend_from_slice(&10.0f64.to_be_bytes());
        blob.extend_from_slice(&(-20.0f64).to_be_bytes());

        let geom = WkbDecoder::new().decode_bytes(&blob).unwrap();
        assert_eq!(
            geom,
            Geometry::Point(Point::new(Coord::xy(10.0, -20.0)).with_srid(4326))
        );
    }

    #[test]
    fn point_z_keeps_z_and_drops_m() {
        let mut blob = Vec::new();
        le_point(
            &mut blob,
            WKB_POINT | EWKB_Z_FLAG | EWKB_M_FLAG,
            None,
            &[1.0, 2.0, 3.0, 4.0],
        );
        let geom = WkbDecoder::new().decode_bytes(&blob).unwrap();
        assert_eq!(geom, Geometry::Point(Point::new(Coord::xyz(1.0, 2.0, 3.0))));
    }

    #[test]
    fn linestring_m_only_is_skipped() {
        let mut blob = vec![0x01];
        blob.extend_from_slice(&(WKB_LINESTRING | EWKB_M_FLAG).to_le_bytes());
        blob.extend_from_slice(&2u32.to_le_bytes());
        for v in [0.0f64, 0.0, 9.0, 1.0, 1.0, 9.0] {
            blob.extend_from_slice(&v.to_le_bytes());
        }
        let geom = WkbDecoder::new().decode_bytes(&blob).unwrap();
        assert_eq!(
            geom,
            Geometry::LineString(LineString::new(vec![
                Coord::xy(0.0, 0.0),
                Coord::xy(1.0, 1.0)
            ]))
        );
    }

    #[test]
    fn polygon_ring_count_three_gives_two_holes() {
        let mut blob = vec![0x01];
        blob.extend_from_slice(&(WKB_POLYGON | EWKB_SRID_FLAG).to_le_bytes());
        blob.extend_from_slice(&3857i32.to_le_bytes());
        blob.extend_from_slice(&3u32.to_le_bytes());
        le_ring(&mut blob, &SQUARE);
        le_ring(&mut blob, &HOLE);
        le_ring(&mut blob, &HOLE);

        let geom = WkbDecoder::new().decode_bytes(&blob).unwrap();
        let Geometry::Polygon(poly) = geom else {
            panic!("expected polygon");
        };
        assert_eq!(poly.exterior().coords().len(), 5);
        assert_eq!(poly.num_interior_rings(), 2);
        assert_eq!(poly.srid(), 3857);
        assert_eq!(poly.exterior().srid(), 3857);
        assert!(poly.interiors().iter().all(|r| r.srid() == 3857));
    }

    #[test]
    fn polygon_ring_count_zero_is_empty() {
        let mut blob = vec![0x01];
        blob.extend_from_slice(&WKB_POLYGON.to_le_bytes());
        blob.extend_from_slice(&0u32.to_le_bytes());
        let geom = WkbDecoder::new().decode_bytes(&blob).unwrap();
        assert_eq!(geom, Geometry::Polygon(Polygon::empty()));
    }

    #[test]
    fn multipoint_children_inherit_srid() {
        let mut blob = vec![0x01];
        blob.extend_from_slice(&(WKB_MULTIPOINT | EWKB_SRID_FLAG).to_le_bytes());
        blob.extend_from_slice(&4326i32.to_le_bytes());
        blob.extend_from_slice(&2u32.to_le_bytes());
        le_point(&mut blob, WKB_POINT, None, &[1.0, 2.0]);
        le_point(&mut blob, WKB_POINT | EWKB_SRID_FLAG, Some(4326), &[3.0, 4.0]);

        let geom = WkbDecoder::new().decode_bytes(&blob).unwrap();
        let Geometry::MultiPoint(mp) = geom else {
            panic!("expected multipoint");
        };
        assert_eq!(mp.points().len(), 2);
        assert!(mp.points().iter().all(|p| p.srid() == 4326));
    }

    #[test]
    fn collection_with_conflicting_srid_is_rejected() {
        let mut blob = vec![0x01];
        blob.extend_from_slice(&(WKB_GEOMETRYCOLLECTION | EWKB_SRID_FLAG).to_le_bytes());
        blob.extend_from_slice(&4326i32.to_le_bytes());
        blob.extend_from_slice(&2u32.to_le_bytes());
        le_point(&mut blob, WKB_POINT | EWKB_SRID_FLAG, Some(4326), &[1.0, 2.0]);
        le_point(&mut blob, WKB_POINT | EWKB_SRID_FLAG, Some(3857), &[3.0, 4.0]);

        let err = WkbDecoder::new().decode_bytes(&blob).unwrap_err();
        assert!(matches!(
            err,
            GeoWireError::InconsistentSrid {
                inherited: 4326,
                found: 3857
            }
        ));
    }

    #[test]
    fn nested_srid_without_parent_srid_is_rejected() {
        let mut blob = vec![0x01];
        blob.extend_from_slice(&WKB_GEOMETRYCOLLECTION.to_le_bytes());
        blob.extend_from_slice(&1u32.to_le_bytes());
        le_point(&mut blob, WKB_POINT | EWKB_SRID_FLAG, Some(4326), &[1.0, 2.0]);

        let err = WkbDecoder::new().decode_bytes(&blob).unwrap_err();
        assert!(matches!(err, GeoWireError::InconsistentSrid { .. }));
    }

    #[test]
    fn nested_endian_marker_must_match() {
        let mut blob = vec![0x01];
        blob.extend_from_slice(&WKB_MULTIPOINT.to_le_bytes());
        blob.extend_from_slice(&1u32.to_le_bytes());
        blob.push(0x00);
        blob.extend_from_slice(&WKB_POINT.to_be_bytes());
        blob.extend_from_slice(&1.0f64.to_be_bytes());
        blob.extend_from_slice(&2.0f64.to_be_bytes());

        let err = WkbDecoder::new().decode_bytes(&blob).unwrap_err();
        assert!(matches!(
            err,
            GeoWireError::EndianMismatch {
                expected: 0x01,
                found: 0x00
            }
        ));
    }

    #[test]
    fn nested_z_flag_must_match_root() {
        // GEOMETRYCOLLECTION(POINT(1 2), POINT Z(3 4 5))
        let mut blob = vec![0x01];
        blob.extend_from_slice(&WKB_GEOMETRYCOLLECTION.to_le_bytes());
        blob.extend_from_slice(&2u32.to_le_bytes());
        le_point(&mut blob, WKB_POINT, None, &[1.0, 2.0]);
        le_point(&mut blob, WKB_POINT | EWKB_Z_FLAG, None, &[3.0, 4.0, 5.0]);
        let err = WkbDecoder::new().decode_bytes(&blob).unwrap_err();
        assert!(matches!(err, GeoWireError::MixedDimensions));

        // 3D root with a 2D element
        let mut blob = vec![0x01];
        blob.extend_from_slice(&(WKB_MULTIPOINT | EWKB_Z_FLAG).to_le_bytes());
        blob.extend_from_slice(&1u32.to_le_bytes());
        le_point(&mut blob, WKB_POINT, None, &[1.0, 2.0]);
        let err = WkbDecoder::new().decode_bytes(&blob).unwrap_err();
        assert!(matches!(err, GeoWireError::MixedDimensions));
    }

    #[test]
    fn uniform_z_collection_reencodes() {
        let mut blob = vec![0x01];
        blob.extend_from_slice(&(WKB_GEOMETRYCOLLECTION | EWKB_Z_FLAG).to_le_bytes());
        blob.extend_from_slice(&2u32.to_le_bytes());
        le_point(&mut blob, WKB_POINT | EWKB_Z_FLAG, None, &[1.0, 2.0, 3.0]);
        le_point(&mut blob, WKB_POINT | EWKB_Z_FLAG, None, &[3.0, 4.0, 5.0]);
        let geom = WkbDecoder::new().decode_bytes(&blob).unwrap();
        let hex = crate::encode::WkbEncoder::default().encode_hex(&geom).unwrap();
        assert_eq!(WkbDecoder::new().decode_hex(&hex).unwrap(), geom);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut blob = Vec::new();
        le_point(&mut blob, 99, None, &[1.0, 2.0]);
        let err = WkbDecoder::new().decode_bytes(&blob).unwrap_err();
        assert!(matches!(err, GeoWireError::UnknownGeometryType(99)));
    }

    #[test]
    fn wrong_element_kind_in_multipoint_is_rejected() {
        let mut blob = vec![0x01];
        blob.extend_from_slice(&WKB_MULTIPOINT.to_le_bytes());
        blob.extend_from_slice(&1u32.to_le_bytes());
        blob.push(0x01);
        blob.extend_from_slice(&WKB_LINESTRING.to_le_bytes());
        le_ring(&mut blob, &[(0.0, 0.0)]);

        let err = WkbDecoder::new().decode_bytes(&blob).unwrap_err();
        assert!(matches!(err, GeoWireError::UnknownGeometryType(2)));
    }

    #[test]
    fn truncated_linestring_is_rejected() {
        let mut blob = vec![0x01];
        blob.extend_from_slice(&WKB_LINESTRING.to_le_bytes());
        blob.extend_from_slice(&1u32.to_le_bytes());
        let err = WkbDecoder::new().decode_bytes(&blob).unwrap_err();
        assert!(matches!(err, GeoWireError::TruncatedInput { .. }));
    }

    #[test]
    fn huge_count_fails_before_allocating() {
        let mut blob = vec![0x01];
        blob.extend_from_slice(&WKB_GEOMETRYCOLLECTION.to_le_bytes());
        blob.extend_from_slice(&u32::MAX.to_le_bytes());
        let err = WkbDecoder::new().decode_bytes(&blob).unwrap_err();
        assert!(matches!(err, GeoWireError::TruncatedInput { .. }));
    }

    fn nested_collections(levels: usize) -> Vec<u8> {
        let mut blob = Vec::new();
        for _ in 0..levels {
            blob.push(0x01);
            blob.extend_from_slice(&WKB_GEOMETRYCOLLECTION.to_le_bytes());
            blob.extend_from_slice(&1u32.to_le_bytes());
        }
        le_point(&mut blob, WKB_POINT, None, &[1.0, 2.0]);
        blob
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let blob = nested_collections(100);
        let err = WkbDecoder::new().decode_bytes(&blob).unwrap_err();
        assert!(matches!(
            err,
            GeoWireError::NestingTooDeep {
                limit: DEFAULT_MAX_DEPTH
            }
        ));

        let geom = WkbDecoder::new()
            .with_max_depth(128)
            .decode_bytes(&blob)
            .unwrap();
        assert_eq!(geom.kind(), GeometryKind::GeometryCollection);
    }

    #[test]
    fn nesting_exactly_at_limit_is_accepted() {
        let blob = nested_collections(3);
        assert!(WkbDecoder::new().with_max_depth(3).decode_bytes(&blob).is_ok());
        assert!(WkbDecoder::new().with_max_depth(2).decode_bytes(&blob).is_err());
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut blob = Vec::new();
        le_point(&mut blob, WKB_POINT, None, &[1.0, 2.0]);
        blob.extend_from_slice(&[0xDE, 0xAD]);
        assert!(WkbDecoder::new().decode_bytes(&blob).is_ok());
    }
}
