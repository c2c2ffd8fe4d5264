//! WKT reading through geozero, built straight into the model so Z survives.

use geozero::error::{GeozeroError, Result as GeozeroResult};
use geozero::{GeomProcessor, GeozeroGeometry};

use crate::error::Result;
use crate::geometry::{
    Coord, Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

/// Parse plain WKT (no `SRID=` prefix). All nodes get SRID 0.
///
/// # Example
///
/// ```
/// use geowire_core::wkt::geometry_from_wkt;
///
/// let g = geometry_from_wkt("POLYGON((0 0,4 0,4 4,0 0),(1 1,2 1,1 2,1 1))").unwrap();
/// assert_eq!(g.kind().name(), "ST_Polygon");
/// ```
pub fn geometry_from_wkt(wkt: &str) -> Result<Geometry> {
    let mut builder = ModelBuilder::default();
    geozero::wkt::Wkt(wkt.as_bytes()).process_geom(&mut builder)?;
    Ok(builder.build()?)
}

/// Partially built node.
#[derive(Debug)]
enum Frame {
    Point(Option<Coord>),
    Line(Vec<Coord>),
    Polygon(Vec<LinearRing>),
    MultiPoint(Vec<Point>),
    MultiLine(Vec<LineString>),
    MultiPolygon(Vec<Polygon>),
    Collection(Vec<Geometry>),
}

#[derive(Debug, Default)]
struct ModelBuilder {
    stack: Vec<Frame>,
    result: Option<Geometry>,
}

fn unbalanced(what: &str) -> GeozeroError {
    GeozeroError::Geometry(format!("unbalanced wkt events: {what}"))
}

impl ModelBuilder {
    fn build(self) -> GeozeroResult<Geometry> {
        if !self.stack.is_empty() {
            return Err(unbalanced("unterminated geometry"));
        }
        self.result.ok_or_else(|| unbalanced("no geometry"))
    }

    fn pop(&mut self) -> GeozeroResult<Frame> {
        self.stack.pop().ok_or_else(|| unbalanced("end without begin"))
    }

    /// Hand a completed geometry to the enclosing collection, or keep it as the result.
    fn finish(&mut self, geom: Geometry) -> GeozeroResult<()> {
        match self.stack.last_mut() {
            Some(Frame::Collection(items)) => {
                items.push(geom);
                Ok(())
            }
            Some(_) => Err(unbalanced("geometry inside a non-collection")),
            None if self.result.is_none() => {
                self.result = Some(geom);
                Ok(())
            }
            None => Err(unbalanced("more than one top-level geometry")),
        }
    }

    fn push_coord(&mut self, coord: Coord) -> GeozeroResult<()> {
        match self.stack.last_mut() {
            Some(Frame::Point(slot)) => *slot = Some(coord),
            Some(Frame::Line(coords)) => coords.push(coord),
            Some(Frame::MultiPoint(points)) => points.push(Point::new(coord)),
            _ => return Err(unbalanced("coordinate outside a point or line")),
        }
        Ok(())
    }
}

impl GeomProcessor for ModelBuilder {
    fn multi_dim(&self) -> bool {
        true
    }

    fn xy(&mut self, x: f64, y: f64, _idx: usize) -> GeozeroResult<()> {
        self.push_coord(Coord::xy(x, y))
    }

    fn coordinate(
        &mut self,
        x: f64,
        y: f64,
        z: Option<f64>,
        _m: Option<f64>,
        _t: Option<f64>,
        _tm: Option<u64>,
        _idx: usize,
    ) -> GeozeroResult<()> {
        self.push_coord(Coord { x, y, z })
    }

    fn empty_point(&mut self, _idx: usize) -> GeozeroResult<()> {
        match self.stack.last_mut() {
            Some(Frame::Point(_)) => Ok(()),
            Some(Frame::MultiPoint(points)) => {
                points.push(Point::empty());
                Ok(())
            }
            _ => self.finish(Point::empty().into()),
        }
    }

    fn point_begin(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.stack.push(Frame::Point(None));
        Ok(())
    }

    fn point_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        let Frame::Point(coord) = self.pop()? else {
            return Err(unbalanced("point_end"));
        };
        let point = coord.map_or_else(Point::empty, Point::new);
        match self.stack.last_mut() {
            Some(Frame::MultiPoint(points)) => {
                points.push(point);
                Ok(())
            }
            _ => self.finish(point.into()),
        }
    }

    fn multipoint_begin(&mut self, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.stack.push(Frame::MultiPoint(Vec::with_capacity(size)));
        Ok(())
    }

    fn multipoint_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        let Frame::MultiPoint(points) = self.pop()? else {
            return Err(unbalanced("multipoint_end"));
        };
        self.finish(MultiPoint::new(points).into())
    }

    fn linestring_begin(&mut self, _tagged: bool, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.stack.push(Frame::Line(Vec::with_capacity(size)));
        Ok(())
    }

    fn linestring_end(&mut self, _tagged: bool, _idx: usize) -> GeozeroResult<()> {
        let Frame::Line(coords) = self.pop()? else {
            return Err(unbalanced("linestring_end"));
        };
        match self.stack.last_mut() {
            Some(Frame::Polygon(rings)) => {
                rings.push(LinearRing::new(coords));
                Ok(())
            }
            Some(Frame::MultiLine(lines)) => {
                lines.push(LineString::new(coords));
                Ok(())
            }
            _ => self.finish(LineString::new(coords).into()),
        }
    }

    fn multilinestring_begin(&mut self, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.stack.push(Frame::MultiLine(Vec::with_capacity(size)));
        Ok(())
    }

    fn multilinestring_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        let Frame::MultiLine(lines) = self.pop()? else {
            return Err(unbalanced("multilinestring_end"));
        };
        self.finish(MultiLineString::new(lines).into())
    }

    fn polygon_begin(&mut self, _tagged: bool, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.stack.push(Frame::Polygon(Vec::with_capacity(size)));
        Ok(())
    }

    fn polygon_end(&mut self, _tagged: bool, _idx: usize) -> GeozeroResult<()> {
        let Frame::Polygon(rings) = self.pop()? else {
            return Err(unbalanced("polygon_end"));
        };
        let mut rings = rings.into_iter();
        let polygon = match rings.next() {
            Some(exterior) => Polygon::new(exterior, rings.collect()),
            None => Polygon::empty(),
        };
        match self.stack.last_mut() {
            Some(Frame::MultiPolygon(polygons)) => {
                polygons.push(polygon);
                Ok(())
            }
            _ => self.finish(polygon.into()),
        }
    }

    fn multipolygon_begin(&mut self, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.stack.push(Frame::MultiPolygon(Vec::with_capacity(size)));
        Ok(())
    }

    fn multipolygon_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        let Frame::MultiPolygon(polygons) = self.pop()? else {
            return Err(unbalanced("multipolygon_end"));
        };
        self.finish(MultiPolygon::new(polygons).into())
    }

    fn geometrycollection_begin(&mut self, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.stack.push(Frame::Collection(Vec::with_capacity(size)));
        Ok(())
    }

    fn geometrycollection_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        let Frame::Collection(items) = self.pop()? else {
            return Err(unbalanced("geometrycollection_end"));
        };
        self.finish(GeometryCollection::new(items).into())
    }
}
