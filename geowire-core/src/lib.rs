#![doc = include_str!("../../README.md")]
//! Crate-specific API surface for `geowire-core`.

pub mod column;
pub mod convert;
pub mod cursor;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod header;
pub mod srid;
pub mod wire;
pub mod wkt;

pub use cursor::{ByteCursor, ByteOrder};
pub use decode::WkbDecoder;
pub use encode::WkbEncoder;
pub use error::{GeoWireError, Result};
pub use geometry::{
    Coord, Geometry, GeometryCollection, GeometryKind, LineString, LinearRing, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon, UNKNOWN_SRID,
};
pub use wire::WireValueAdapter;
