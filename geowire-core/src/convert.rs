//! Conversions to and from `geo` types, which provide the Euclidean algorithms.
//!
//! `geo` is XY-only and has no SRID, so going to `geo` drops both; coming back
//! yields 2D coordinates with SRID 0 on every node.

use crate::geometry::{
    Coord, Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

fn to_geo_coord(c: &Coord) -> geo::Coord<f64> {
    geo::Coord { x: c.x, y: c.y }
}

fn to_geo_line(coords: &[Coord]) -> geo::LineString<f64> {
    geo::LineString::new(coords.iter().map(to_geo_coord).collect())
}

fn to_geo_polygon(p: &Polygon) -> geo::Polygon<f64> {
    geo::Polygon::new(
        to_geo_line(p.exterior().coords()),
        p.interiors().iter().map(|r| to_geo_line(r.coords())).collect(),
    )
}

impl From<&Geometry> for geo::Geometry<f64> {
    fn from(geom: &Geometry) -> Self {
        match geom {
            Geometry::Point(p) => geo::Geometry::Point(geo::Point::new(p.x(), p.y())),
            Geometry::LineString(ls) => geo::Geometry::LineString(to_geo_line(ls.coords())),
            Geometry::LinearRing(r) => geo::Geometry::LineString(to_geo_line(r.coords())),
            Geometry::Polygon(p) => geo::Geometry::Polygon(to_geo_polygon(p)),
            Geometry::MultiPoint(mp) => geo::Geometry::MultiPoint(geo::MultiPoint::new(
                mp.points()
                    .iter()
                    .map(|p| geo::Point::new(p.x(), p.y()))
                    .collect(),
            )),
            Geometry::MultiLineString(mls) => {
                geo::Geometry::MultiLineString(geo::MultiLineString::new(
                    mls.lines().iter().map(|ls| to_geo_line(ls.coords())).collect(),
                ))
            }
            Geometry::MultiPolygon(mp) => geo::Geometry::MultiPolygon(geo::MultiPolygon::new(
                mp.polygons().iter().map(to_geo_polygon).collect(),
            )),
            Geometry::GeometryCollection(gc) => {
                geo::Geometry::GeometryCollection(geo::GeometryCollection(
                    gc.geometries().iter().map(geo::Geometry::<f64>::from).collect(),
                ))
            }
        }
    }
}

fn from_geo_coords(line: &geo::LineString<f64>) -> Vec<Coord> {
    line.0.iter().map(|c| Coord::xy(c.x, c.y)).collect()
}

fn from_geo_polygon(p: &geo::Polygon<f64>) -> Polygon {
    let exterior = from_geo_coords(p.exterior());
    if exterior.is_empty() && p.interiors().is_empty() {
        return Polygon::empty();
    }
    Polygon::new(
        LinearRing::new(exterior),
        p.interiors()
            .iter()
            .map(|r| LinearRing::new(from_geo_coords(r)))
            .collect(),
    )
}

fn from_geo_point(p: &geo::Point<f64>) -> Point {
    Point::new(Coord::xy(p.x(), p.y()))
}

impl From<&geo::Geometry<f64>> for Geometry {
    fn from(geom: &geo::Geometry<f64>) -> Self {
        match geom {
            geo::Geometry::Point(p) => from_geo_point(p).into(),
            geo::Geometry::Line(l) => LineString::new(vec![
                Coord::xy(l.start.x, l.start.y),
                Coord::xy(l.end.x, l.end.y),
            ])
            .into(),
            geo::Geometry::LineString(ls) => LineString::new(from_geo_coords(ls)).into(),
            geo::Geometry::Polygon(p) => from_geo_polygon(p).into(),
            geo::Geometry::MultiPoint(mp) => {
                MultiPoint::new(mp.0.iter().map(from_geo_point).collect()).into()
            }
            geo::Geometry::MultiLineString(mls) => MultiLineString::new(
                mls.0
                    .iter()
                    .map(|ls| LineString::new(from_geo_coords(ls)))
                    .collect(),
            )
            .into(),
            geo::Geometry::MultiPolygon(mp) => {
                MultiPolygon::new(mp.0.iter().map(from_geo_polygon).collect()).into()
            }
            geo::Geometry::GeometryCollection(gc) => {
                GeometryCollection::new(gc.0.iter().map(Geometry::from).collect()).into()
            }
            geo::Geometry::Rect(r) => from_geo_polygon(&r.to_polygon()).into(),
            geo::Geometry::Triangle(t) => from_geo_polygon(&t.to_polygon()).into(),
        }
    }
}
