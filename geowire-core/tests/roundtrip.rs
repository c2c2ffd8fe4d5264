use geowire_core::{
    ByteOrder, Coord, GeoWireError, Geometry, GeometryCollection, LineString, LinearRing,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon, WkbDecoder, WkbEncoder,
};
use proptest::collection::vec;
use proptest::prelude::*;

// ── Strategies ───────────────────────────────────────────────────────────────

fn coord(has_z: bool) -> impl Strategy<Value = Coord> + Clone {
    (-1.0e6..1.0e6f64, -1.0e6..1.0e6f64, -1.0e3..1.0e3f64).prop_map(move |(x, y, z)| {
        if has_z {
            Coord::xyz(x, y, z)
        } else {
            Coord::xy(x, y)
        }
    })
}

fn ring(has_z: bool) -> impl Strategy<Value = LinearRing> + Clone {
    vec(coord(has_z), 3..6).prop_map(|mut coords| {
        coords.push(coords[0]);
        LinearRing::new(coords)
    })
}

fn line(has_z: bool) -> impl Strategy<Value = LineString> + Clone {
    vec(coord(has_z), 0..6).prop_map(LineString::new)
}

fn polygon(has_z: bool) -> impl Strategy<Value = Polygon> + Clone {
    (ring(has_z), vec(ring(has_z), 0..3)).prop_map(|(shell, holes)| Polygon::new(shell, holes))
}

fn leaf(has_z: bool) -> BoxedStrategy<Geometry> {
    prop_oneof![
        coord(has_z).prop_map(|c| Geometry::from(Point::new(c))),
        line(has_z).prop_map(Geometry::from),
        polygon(has_z).prop_map(Geometry::from),
        vec(coord(has_z).prop_map(Point::new), 0..4)
            .prop_map(|pts| Geometry::from(MultiPoint::new(pts))),
        vec(line(has_z), 0..3).prop_map(|ls| Geometry::from(MultiLineString::new(ls))),
        vec(polygon(has_z), 0..3).prop_map(|ps| Geometry::from(MultiPolygon::new(ps))),
    ]
    .boxed()
}

fn geometry(has_z: bool) -> BoxedStrategy<Geometry> {
    leaf(has_z)
        .prop_recursive(3, 24, 4, |inner| {
            vec(inner, 0..4).prop_map(|gs| Geometry::from(GeometryCollection::new(gs)))
        })
        .boxed()
}

/// A geometry with uniform dimensionality and a uniform SRID.
fn wire_value() -> impl Strategy<Value = Geometry> {
    (any::<bool>().prop_flat_map(geometry), 0..100_000i32)
        .prop_map(|(g, srid)| g.with_srid(srid))
}

fn byte_order() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![Just(ByteOrder::LittleEndian), Just(ByteOrder::BigEndian)]
}

// ── Properties ───────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn decode_inverts_encode(g in wire_value(), order in byte_order()) {
        let encoder = WkbEncoder::new(order);
        let hex = encoder.encode_hex(&g).unwrap();
        prop_assert_eq!(WkbDecoder::new().decode_hex(&hex).unwrap(), g.clone());

        let bytes = encoder.encode_bytes(&g).unwrap();
        prop_assert_eq!(WkbDecoder::new().decode_bytes(&bytes).unwrap(), g);
    }

    #[test]
    fn byte_orders_decode_identically(g in wire_value()) {
        let le = WkbEncoder::new(ByteOrder::LittleEndian).encode_bytes(&g).unwrap();
        let be = WkbEncoder::new(ByteOrder::BigEndian).encode_bytes(&g).unwrap();
        prop_assert_eq!(le.len(), be.len());
        prop_assert_eq!(
            WkbDecoder::new().decode_bytes(&le).unwrap(),
            WkbDecoder::new().decode_bytes(&be).unwrap()
        );
    }

    #[test]
    fn dropping_the_last_byte_is_truncation(g in wire_value(), order in byte_order()) {
        let bytes = WkbEncoder::new(order).encode_bytes(&g).unwrap();
        let err = WkbDecoder::new().decode_bytes(&bytes[..bytes.len() - 1]).unwrap_err();
        prop_assert!(matches!(err, GeoWireError::TruncatedInput { .. }), "got {err:?}");
    }

    #[test]
    fn reencoding_is_stable(g in wire_value()) {
        let first = WkbEncoder::default().encode_hex(&g).unwrap();
        let back = WkbDecoder::new().decode_hex(&first).unwrap();
        prop_assert_eq!(WkbEncoder::default().encode_hex(&back).unwrap(), first);
    }
}

// ── Concrete scenarios ───────────────────────────────────────────────────────

#[test]
fn little_endian_point_scenario() {
    let hex = "0101000000000000000000F03F0000000000000040";
    let g = WkbDecoder::new().decode_hex(hex).unwrap();
    assert_eq!(g, Geometry::Point(Point::new(Coord::xy(1.0, 2.0))));
    assert_eq!(g.srid(), 0);
    let back = WkbEncoder::default().encode_hex(&g).unwrap();
    assert!(back.eq_ignore_ascii_case(hex));
}

#[test]
fn lowercase_hex_is_accepted() {
    let g = WkbDecoder::new()
        .decode_hex("0101000000000000000000f03f0000000000000040")
        .unwrap();
    assert_eq!(g, Geometry::Point(Point::new(Coord::xy(1.0, 2.0))));
}

#[test]
fn every_strict_prefix_is_truncated() {
    let g: Geometry = GeometryCollection::new(vec![
        Point::new(Coord::xyz(1.0, 2.0, 3.0)).into(),
        Polygon::new(
            LinearRing::new(vec![
                Coord::xyz(0.0, 0.0, 0.0),
                Coord::xyz(1.0, 0.0, 0.0),
                Coord::xyz(0.0, 1.0, 0.0),
                Coord::xyz(0.0, 0.0, 0.0),
            ]),
            vec![],
        )
        .into(),
    ])
    .into();
    let g = g.with_srid_recurse(4326);
    let bytes = WkbEncoder::default().encode_bytes(&g).unwrap();
    for len in 0..bytes.len() {
        let err = WkbDecoder::new().decode_bytes(&bytes[..len]).unwrap_err();
        assert!(
            matches!(err, GeoWireError::TruncatedInput { .. }),
            "prefix of {len} bytes gave {err:?}"
        );
    }
    assert_eq!(WkbDecoder::new().decode_bytes(&bytes).unwrap(), g);
}

#[test]
fn odd_length_hex_is_malformed() {
    let err = WkbDecoder::new()
        .decode_hex("0101000000000000000000F03F000000000000004")
        .unwrap_err();
    assert!(matches!(err, GeoWireError::MalformedEncoding(_)));
}

#[test]
fn unknown_type_99_is_rejected() {
    let mut blob = vec![0x01];
    blob.extend_from_slice(&99u32.to_le_bytes());
    blob.extend_from_slice(&[0u8; 16]);
    let err = WkbDecoder::new().decode_bytes(&blob).unwrap_err();
    assert!(matches!(err, GeoWireError::UnknownGeometryType(99)));
}

#[test]
fn second_element_with_other_srid_is_rejected() {
    // GEOMETRYCOLLECTION with SRID 4326 whose elements declare 4326 then 2154
    let mut blob = vec![0x00];
    blob.extend_from_slice(&0x2000_0007u32.to_be_bytes());
    blob.extend_from_slice(&4326i32.to_be_bytes());
    blob.extend_from_slice(&2u32.to_be_bytes());
    for srid in [4326i32, 2154] {
        blob.push(0x00);
        blob.extend_from_slice(&0x2000_0001u32.to_be_bytes());
        blob.extend_from_slice(&srid.to_be_bytes());
        blob.extend_from_slice(&1.0f64.to_be_bytes());
        blob.extend_from_slice(&2.0f64.to_be_bytes());
    }
    let err = WkbDecoder::new().decode_bytes(&blob).unwrap_err();
    assert!(matches!(
        err,
        GeoWireError::InconsistentSrid {
            inherited: 4326,
            found: 2154
        }
    ));
}
