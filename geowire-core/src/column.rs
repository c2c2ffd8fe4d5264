//! Textual column values as exchanged with the database driver.
//!
//! Reads accept both the hex-encoded (E)WKB PostGIS sends today and the legacy
//! `SRID=<n>;<WKT>` / `<WKT>` text form. Writes always produce hex EWKB.

use std::fmt;
use std::str::FromStr;

use crate::error::{GeoWireError, Result};
use crate::geometry::{Geometry, UNKNOWN_SRID};
use crate::header::normalize_srid;
use crate::srid::set_srid_recurse;
use crate::wire::WireValueAdapter;
use crate::wkt::geometry_from_wkt;

/// SQL type name of the wrapped column.
pub const GEOMETRY_TYPE_NAME: &str = "geometry";

const SRID_PREFIX: &str = "SRID=";

/// Syntax of an incoming column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnEncoding {
    /// Hex digits starting with a byte order marker (`00` or `01`).
    HexWkb,
    /// WKT, optionally prefixed with `SRID=<n>;`.
    Ewkt,
}

/// Classify a (trimmed) column value by its leading characters.
pub fn classify(value: &str) -> ColumnEncoding {
    let value = value.trim();
    if value.starts_with("00") || value.starts_with("01") {
        ColumnEncoding::HexWkb
    } else {
        ColumnEncoding::Ewkt
    }
}

/// Parse a textual column value with the default adapter.
///
/// # Example
///
/// ```
/// use geowire_core::column::geometry_from_column;
///
/// let from_hex = geometry_from_column("0101000020E6100000000000000000F03F0000000000000040").unwrap();
/// let from_ewkt = geometry_from_column("SRID=4326;POINT(1 2)").unwrap();
/// assert_eq!(from_hex, from_ewkt);
/// ```
pub fn geometry_from_column(value: &str) -> Result<Geometry> {
    geometry_from_column_with(&WireValueAdapter::default(), value)
}

/// Parse a textual column value, routing hex to `adapter`.
pub fn geometry_from_column_with(adapter: &WireValueAdapter, value: &str) -> Result<Geometry> {
    let value = value.trim();
    match classify(value) {
        ColumnEncoding::HexWkb => {
            log::debug!("column value routed to wkb decoder");
            adapter.from_hex(value)
        }
        ColumnEncoding::Ewkt => {
            log::debug!("column value routed to wkt reader");
            let (srid, wkt) = split_ewkt(value)?;
            let mut geom = geometry_from_wkt(wkt)?;
            set_srid_recurse(&mut geom, srid);
            Ok(geom)
        }
    }
}

/// Split `SRID=<n>;<WKT>` into its parts; plain WKT gets SRID 0 and a
/// negative SRID is read as unknown, as on the wire.
fn split_ewkt(value: &str) -> Result<(i32, &str)> {
    let Some(rest) = value.strip_prefix(SRID_PREFIX) else {
        return Ok((UNKNOWN_SRID, value));
    };
    let (srid, wkt) = rest.split_once(';').ok_or_else(|| {
        GeoWireError::InvalidColumnValue(format!("missing ';' after SRID in {value:?}"))
    })?;
    let srid = srid
        .trim()
        .parse::<i32>()
        .map_err(|e| GeoWireError::InvalidColumnValue(format!("bad SRID {srid:?}: {e}")))?;
    Ok((normalize_srid(srid), wkt.trim()))
}

/// Render a geometry as the hex string sent back to the database.
pub fn geometry_to_column(geom: &Geometry) -> Result<String> {
    WireValueAdapter::default().to_hex(geom)
}

/// A `geometry` column value holding a decoded geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryValue {
    geom: Geometry,
}

impl GeometryValue {
    pub fn new(geom: Geometry) -> Self {
        Self { geom }
    }

    pub fn type_name(&self) -> &'static str {
        GEOMETRY_TYPE_NAME
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geom
    }

    pub fn into_geometry(self) -> Geometry {
        self.geom
    }

    /// Replace the held geometry by parsing a new column value.
    pub fn set_value(&mut self, value: &str) -> Result<()> {
        self.geom = geometry_from_column(value)?;
        Ok(())
    }

    /// Hex EWKB representation for the database.
    pub fn value(&self) -> Result<String> {
        geometry_to_column(&self.geom)
    }
}

impl From<Geometry> for GeometryValue {
    fn from(geom: Geometry) -> Self {
        Self::new(geom)
    }
}

impl FromStr for GeometryValue {
    type Err = GeoWireError;

    fn from_str(s: &str) -> Result<Self> {
        geometry_from_column(s).map(Self::new)
    }
}

/// Hex EWKB, or the encoding error text for a value that cannot be written.
impl fmt::Display for GeometryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Ok(hex) => f.write_str(&hex),
            Err(e) => write!(f, "<invalid {GEOMETRY_TYPE_NAME}: {e}>"),
        }
    }
}
