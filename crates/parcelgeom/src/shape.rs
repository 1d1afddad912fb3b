use geo::{Geometry, MultiPolygon, Polygon};
use wkt::{ToWkt, TryFromWkt};

use crate::error::BoundaryError;

/// A parsed boundary, as written in the source text.
///
/// Everything past parsing works on the canonical [`MultiPolygon`] form, see
/// [`Shape::into_multi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl Shape {
    /// Parse WKT text. Only `POLYGON` and `MULTIPOLYGON` are accepted.
    pub fn parse(text: &str) -> Result<Self, BoundaryError> {
        let geometry = Geometry::<f64>::try_from_wkt_str(text.trim())
            .map_err(|e| BoundaryError::Parse(e.to_string()))?;

        let shape = match geometry {
            Geometry::Polygon(polygon) => Shape::Polygon(polygon),
            Geometry::MultiPolygon(multi) => Shape::MultiPolygon(multi),
            other => return Err(BoundaryError::UnsupportedType(type_name(&other))),
        };

        if shape.is_empty() { return Err(BoundaryError::Empty) }
        Ok(shape)
    }

    /// True if no ring of the shape carries a coordinate.
    pub fn is_empty(&self) -> bool {
        match self {
            Shape::Polygon(polygon) => polygon.exterior().0.is_empty(),
            Shape::MultiPolygon(multi) => multi.0.iter().all(|p| p.exterior().0.is_empty()),
        }
    }

    /// Normalize to the multi-polygon variant.
    pub fn into_multi(self) -> MultiPolygon<f64> {
        match self {
            Shape::Polygon(polygon) => MultiPolygon::new(vec![polygon]),
            Shape::MultiPolygon(multi) => multi,
        }
    }
}

impl From<MultiPolygon<f64>> for Shape {
    fn from(multi: MultiPolygon<f64>) -> Self { Shape::MultiPolygon(multi) }
}

impl From<Polygon<f64>> for Shape {
    fn from(polygon: Polygon<f64>) -> Self { Shape::Polygon(polygon) }
}

/// Encode a geometry as `MULTIPOLYGON` WKT, readable again by [`Shape::parse`].
pub fn encode(geometry: &MultiPolygon<f64>) -> String {
    geometry.wkt_string()
}

fn type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) | Geometry::LineString(_) => "LINESTRING",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        Geometry::Rect(_) => "RECT",
        Geometry::Triangle(_) => "TRIANGLE",
        _ => "GEOMETRY",
    }
}
