//! Owned vector-geometry model.
//!
//! Every node carries its own spatial reference id, so a decoded value keeps
//! the SRID on the root, on each collection element and on each polygon ring.
//! Coordinates are XY with an optional Z. M ordinates are never stored.

/// SRID meaning "unknown / unspecified".
pub const UNKNOWN_SRID: i32 = 0;

/// A single position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Coord {
    pub fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    pub fn has_z(&self) -> bool {
        self.z.is_some()
    }
}

// ── Wire kinds ────────────────────────────────────────────────────────────────

/// The seven geometry kinds addressable by a WKB type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    /// Wire type code (low 29 bits of the type word).
    pub fn code(self) -> u32 {
        match self {
            GeometryKind::Point => 1,
            GeometryKind::LineString => 2,
            GeometryKind::Polygon => 3,
            GeometryKind::MultiPoint => 4,
            GeometryKind::MultiLineString => 5,
            GeometryKind::MultiPolygon => 6,
            GeometryKind::GeometryCollection => 7,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(GeometryKind::Point),
            2 => Some(GeometryKind::LineString),
            3 => Some(GeometryKind::Polygon),
            4 => Some(GeometryKind::MultiPoint),
            5 => Some(GeometryKind::MultiLineString),
            6 => Some(GeometryKind::MultiPolygon),
            7 => Some(GeometryKind::GeometryCollection),
            _ => None,
        }
    }

    /// PostGIS-style type name, e.g. `ST_Polygon`.
    pub fn name(self) -> &'static str {
        match self {
            GeometryKind::Point => "ST_Point",
            GeometryKind::LineString => "ST_LineString",
            GeometryKind::Polygon => "ST_Polygon",
            GeometryKind::MultiPoint => "ST_MultiPoint",
            GeometryKind::MultiLineString => "ST_MultiLineString",
            GeometryKind::MultiPolygon => "ST_MultiPolygon",
            GeometryKind::GeometryCollection => "ST_GeometryCollection",
        }
    }
}

// ── Node types ────────────────────────────────────────────────────────────────

macro_rules! srid_accessors {
    ($type:ty) => {
        impl $type {
            pub fn srid(&self) -> i32 {
                self.srid
            }

            /// Stamp `srid` on this node and on everything it owns.
            pub fn with_srid(mut self, srid: i32) -> Self {
                self.set_srid_recurse(srid);
                self
            }

            pub(crate) fn set_srid(&mut self, srid: i32) {
                self.srid = srid;
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    coord: Coord,
    srid: i32,
}

impl Point {
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            srid: UNKNOWN_SRID,
        }
    }

    /// `POINT EMPTY`, stored as NaN/NaN the way PostGIS writes it.
    pub fn empty() -> Self {
        Self::new(Coord::xy(f64::NAN, f64::NAN))
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn x(&self) -> f64 {
        self.coord.x
    }

    pub fn y(&self) -> f64 {
        self.coord.y
    }

    pub fn z(&self) -> Option<f64> {
        self.coord.z
    }

    pub fn is_empty(&self) -> bool {
        self.coord.x.is_nan() && self.coord.y.is_nan()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    coords: Vec<Coord>,
    srid: i32,
}

impl LineString {
    pub fn new(coords: Vec<Coord>) -> Self {
        Self {
            coords,
            srid: UNKNOWN_SRID,
        }
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }
}

/// Closed coordinate sequence bounding a polygon or one of its holes.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing {
    coords: Vec<Coord>,
    srid: i32,
}

impl LinearRing {
    pub fn new(coords: Vec<Coord>) -> Self {
        Self {
            coords,
            srid: UNKNOWN_SRID,
        }
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn is_closed(&self) -> bool {
        match (self.coords.first(), self.coords.last()) {
            (Some(first), Some(last)) => first == last,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: LinearRing,
    interiors: Vec<LinearRing>,
    srid: i32,
}

impl Polygon {
    pub fn new(exterior: LinearRing, interiors: Vec<LinearRing>) -> Self {
        Self {
            exterior,
            interiors,
            srid: UNKNOWN_SRID,
        }
    }

    /// Polygon with an empty shell and no holes (wire ring count 0).
    pub fn empty() -> Self {
        Self::new(LinearRing::new(Vec::new()), Vec::new())
    }

    pub fn exterior(&self) -> &LinearRing {
        &self.exterior
    }

    pub fn interiors(&self) -> &[LinearRing] {
        &self.interiors
    }

    pub fn num_interior_rings(&self) -> usize {
        self.interiors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exterior.coords.is_empty() && self.interiors.is_empty()
    }

    pub(crate) fn rings_mut(&mut self) -> impl Iterator<Item = &mut LinearRing> {
        std::iter::once(&mut self.exterior).chain(self.interiors.iter_mut())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiPoint {
    points: Vec<Point>,
    srid: i32,
}

impl MultiPoint {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            srid: UNKNOWN_SRID,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiLineString {
    lines: Vec<LineString>,
    srid: i32,
}

impl MultiLineString {
    pub fn new(lines: Vec<LineString>) -> Self {
        Self {
            lines,
            srid: UNKNOWN_SRID,
        }
    }

    pub fn lines(&self) -> &[LineString] {
        &self.lines
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiPolygon {
    polygons: Vec<Polygon>,
    srid: i32,
}

impl MultiPolygon {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self {
            polygons,
            srid: UNKNOWN_SRID,
        }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryCollection {
    geometries: Vec<Geometry>,
    srid: i32,
}

impl GeometryCollection {
    pub fn new(geometries: Vec<Geometry>) -> Self {
        Self {
            geometries,
            srid: UNKNOWN_SRID,
        }
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }
}

srid_accessors!(Point);
srid_accessors!(LineString);
srid_accessors!(LinearRing);
srid_accessors!(Polygon);
srid_accessors!(MultiPoint);
srid_accessors!(MultiLineString);
srid_accessors!(MultiPolygon);
srid_accessors!(GeometryCollection);

// Element access for the SRID propagator.
impl MultiPoint {
    pub(crate) fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }
}

impl MultiLineString {
    pub(crate) fn lines_mut(&mut self) -> &mut [LineString] {
        &mut self.lines
    }
}

impl MultiPolygon {
    pub(crate) fn polygons_mut(&mut self) -> &mut [Polygon] {
        &mut self.polygons
    }
}

impl GeometryCollection {
    pub(crate) fn geometries_mut(&mut self) -> &mut [Geometry] {
        &mut self.geometries
    }
}

// ── Tagged union ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    LinearRing(LinearRing),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    /// Wire kind of this value. A bare `LinearRing` is written as a LineString.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) | Geometry::LinearRing(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    pub fn srid(&self) -> i32 {
        match self {
            Geometry::Point(g) => g.srid,
            Geometry::LineString(g) => g.srid,
            Geometry::LinearRing(g) => g.srid,
            Geometry::Polygon(g) => g.srid,
            Geometry::MultiPoint(g) => g.srid,
            Geometry::MultiLineString(g) => g.srid,
            Geometry::MultiPolygon(g) => g.srid,
            Geometry::GeometryCollection(g) => g.srid,
        }
    }

    /// Consuming form of [`Geometry::set_srid_recurse`].
    pub fn with_srid(mut self, srid: i32) -> Self {
        self.set_srid_recurse(srid);
        self
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(p) => p.is_empty(),
            Geometry::LineString(ls) => ls.coords.is_empty(),
            Geometry::LinearRing(r) => r.coords.is_empty(),
            Geometry::Polygon(p) => p.is_empty(),
            Geometry::MultiPoint(mp) => mp.points.iter().all(Point::is_empty),
            Geometry::MultiLineString(mls) => mls.lines.iter().all(|ls| ls.coords.is_empty()),
            Geometry::MultiPolygon(mp) => mp.polygons.iter().all(Polygon::is_empty),
            Geometry::GeometryCollection(gc) => gc.geometries.iter().all(Geometry::is_empty),
        }
    }

    /// First coordinate in traversal order, if any.
    pub fn first_coord(&self) -> Option<Coord> {
        match self {
            Geometry::Point(p) => Some(p.coord),
            Geometry::LineString(ls) => ls.coords.first().copied(),
            Geometry::LinearRing(r) => r.coords.first().copied(),
            Geometry::Polygon(p) => polygon_first_coord(p),
            Geometry::MultiPoint(mp) => mp.points.first().map(|p| p.coord),
            Geometry::MultiLineString(mls) => {
                mls.lines.iter().find_map(|ls| ls.coords.first().copied())
            }
            Geometry::MultiPolygon(mp) => mp.polygons.iter().find_map(polygon_first_coord),
            Geometry::GeometryCollection(gc) => gc.geometries.iter().find_map(Geometry::first_coord),
        }
    }

    /// Whether coordinates carry a Z ordinate (decided by the first one).
    pub fn has_z(&self) -> bool {
        self.first_coord().is_some_and(|c| c.has_z())
    }
}

fn polygon_first_coord(p: &Polygon) -> Option<Coord> {
    std::iter::once(&p.exterior)
        .chain(p.interiors.iter())
        .find_map(|r| r.coords.first().copied())
}

macro_rules! geometry_from {
    ($variant:ident) => {
        impl From<$variant> for Geometry {
            fn from(g: $variant) -> Self {
                Geometry::$variant(g)
            }
        }
    };
}

geometry_from!(Point);
geometry_from!(LineString);
geometry_from!(LinearRing);
geometry_from!(Polygon);
geometry_from!(MultiPoint);
geometry_from!(MultiLineString);
geometry_from!(MultiPolygon);
geometry_from!(GeometryCollection);
