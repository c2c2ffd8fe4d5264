//! Deep SRID stamping.
//!
//! The model keeps an SRID on every node, so a geometry obtained from a
//! source without per-node SRIDs (a WKT parse, a `geo` conversion) has to be
//! fanned out before it behaves like a decoded value.

use crate::geometry::{
    Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

impl Geometry {
    /// Set `srid` on this node, every collection element and every polygon ring.
    ///
    /// # Example
    ///
    /// ```
    /// use geowire_core::geometry::{Coord, Geometry, MultiPoint, Point};
    ///
    /// let mut g = Geometry::MultiPoint(MultiPoint::new(vec![Point::new(Coord::xy(1.0, 2.0))]));
    /// g.set_srid_recurse(4326);
    /// match &g {
    ///     Geometry::MultiPoint(mp) => assert_eq!(mp.points()[0].srid(), 4326),
    ///     other => panic!("unexpected {other:?}"),
    /// }
    /// ```
    pub fn set_srid_recurse(&mut self, srid: i32) {
        match self {
            Geometry::Point(g) => g.set_srid_recurse(srid),
            Geometry::LineString(g) => g.set_srid_recurse(srid),
            Geometry::LinearRing(g) => g.set_srid_recurse(srid),
            Geometry::Polygon(g) => g.set_srid_recurse(srid),
            Geometry::MultiPoint(g) => g.set_srid_recurse(srid),
            Geometry::MultiLineString(g) => g.set_srid_recurse(srid),
            Geometry::MultiPolygon(g) => g.set_srid_recurse(srid),
            Geometry::GeometryCollection(g) => g.set_srid_recurse(srid),
        }
    }

    /// Same as [`Geometry::with_srid`], kept under the propagator's name.
    pub fn with_srid_recurse(mut self, srid: i32) -> Self {
        self.set_srid_recurse(srid);
        self
    }
}

macro_rules! leaf_srid {
    ($type:ty) => {
        impl $type {
            pub(crate) fn set_srid_recurse(&mut self, srid: i32) {
                self.set_srid(srid);
            }
        }
    };
}

leaf_srid!(Point);
leaf_srid!(LineString);
leaf_srid!(LinearRing);

impl Polygon {
    pub(crate) fn set_srid_recurse(&mut self, srid: i32) {
        self.set_srid(srid);
        for ring in self.rings_mut() {
            ring.set_srid(srid);
        }
    }
}

impl MultiPoint {
    pub(crate) fn set_srid_recurse(&mut self, srid: i32) {
        self.set_srid(srid);
        self.points_mut().iter_mut().for_each(|p| p.set_srid(srid));
    }
}

impl MultiLineString {
    pub(crate) fn set_srid_recurse(&mut self, srid: i32) {
        self.set_srid(srid);
        self.lines_mut().iter_mut().for_each(|ls| ls.set_srid(srid));
    }
}

impl MultiPolygon {
    pub(crate) fn set_srid_recurse(&mut self, srid: i32) {
        self.set_srid(srid);
        self.polygons_mut()
            .iter_mut()
            .for_each(|p| p.set_srid_recurse(srid));
    }
}

impl GeometryCollection {
    pub(crate) fn set_srid_recurse(&mut self, srid: i32) {
        self.set_srid(srid);
        self.geometries_mut()
            .iter_mut()
            .for_each(|g| g.set_srid_recurse(srid));
    }
}

/// Free-function form used by the column path.
pub fn set_srid_recurse(geom: &mut Geometry, srid: i32) {
    geom.set_srid_recurse(srid);
}
