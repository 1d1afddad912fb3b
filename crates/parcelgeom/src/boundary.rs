use std::sync::Arc;

use geo::{BoundingRect, MultiPolygon, Rect};

use crate::error::BoundaryError;
use crate::measure;
use crate::predicate::{self, Contiguity, Relation};
use crate::shape::{self, Shape};

#[derive(Debug)]
struct Inner {
    text: String,
    geometry: Result<MultiPolygon<f64>, BoundaryError>,
    envelope: Option<Rect<f64>>,
}

/// A parcel boundary: the source WKT plus its parsed geometry.
///
/// Parsing happens once, at construction, and never fails outright: an
/// unreadable boundary is kept together with its [`BoundaryError`] so callers
/// can report it and skip predicates on it. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Boundary(Arc<Inner>);

impl Boundary {
    /// Parse WKT text.
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let geometry = Shape::parse(&text).map(Shape::into_multi);
        Self::with_geometry(text, geometry)
    }

    /// Wrap a computed geometry, encoding it as `MULTIPOLYGON` WKT.
    pub fn from_geometry(geometry: MultiPolygon<f64>) -> Self {
        let text = shape::encode(&geometry);
        let empty = geometry.0.iter().all(|p| p.exterior().0.is_empty());
        let geometry = if empty { Err(BoundaryError::Empty) } else { Ok(geometry) };
        Self::with_geometry(text, geometry)
    }

    fn with_geometry(text: String, geometry: Result<MultiPolygon<f64>, BoundaryError>) -> Self {
        let envelope = geometry.as_ref().ok().and_then(|g| g.bounding_rect());
        Self(Arc::new(Inner { text, geometry, envelope }))
    }

    /// The WKT text this boundary was built from.
    #[inline] pub fn wkt(&self) -> &str { &self.0.text }

    /// Parsed geometry, `None` if the text was unreadable.
    #[inline] pub fn geometry(&self) -> Option<&MultiPolygon<f64>> { self.0.geometry.as_ref().ok() }

    /// Parse failure, if any.
    #[inline] pub fn error(&self) -> Option<&BoundaryError> { self.0.geometry.as_ref().err() }

    #[inline] pub fn is_valid(&self) -> bool { self.0.geometry.is_ok() }

    /// Axis-aligned bounding envelope.
    #[inline] pub fn envelope(&self) -> Option<Rect<f64>> { self.0.envelope }

    /// True if both handles share the same parsed boundary (no copy was made).
    #[inline] pub fn same(&self, other: &Boundary) -> bool { Arc::ptr_eq(&self.0, &other.0) }

    #[inline] pub fn area(&self) -> Option<f64> { self.geometry().map(measure::area) }

    #[inline] pub fn length(&self) -> Option<f64> { self.geometry().map(measure::length) }

    /// Relation to another boundary, `None` if either is unreadable.
    pub fn relation(&self, other: &Boundary) -> Option<Relation> {
        Some(predicate::relation(self.geometry()?, other.geometry()?))
    }

    /// True iff both parse and they touch under `contiguity`.
    pub fn touches(&self, other: &Boundary, contiguity: Contiguity) -> bool {
        match (self.geometry(), other.geometry()) {
            (Some(a), Some(b)) => predicate::contiguous(a, b, contiguity),
            _ => false,
        }
    }

    pub fn intersects(&self, other: &Boundary) -> bool {
        self.relation(other).is_some_and(Relation::intersects)
    }

    pub fn disjoint(&self, other: &Boundary) -> bool {
        self.relation(other) == Some(Relation::Disjoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_boundary_has_envelope_and_measures() {
        let b = Boundary::parse("POLYGON((0 0, 3 0, 3 2, 0 2, 0 0))");
        assert!(b.is_valid());
        assert_eq!(b.area(), Some(6.0));
        assert_eq!(b.length(), Some(10.0));

        let env = b.envelope().unwrap();
        assert_eq!((env.min().x, env.min().y, env.max().x, env.max().y), (0.0, 0.0, 3.0, 2.0));
    }

    #[test]
    fn invalid_boundary_keeps_text_and_error() {
        let b = Boundary::parse("POLYGON((oops))");
        assert!(!b.is_valid());
        assert_eq!(b.wkt(), "POLYGON((oops))");
        assert!(b.error().is_some());
        assert!(b.envelope().is_none());
        assert!(b.area().is_none());
    }

    #[test]
    fn empty_geometry_is_rejected() {
        let b = Boundary::from_geometry(MultiPolygon::new(vec![]));
        assert_eq!(b.error(), Some(&BoundaryError::Empty));
    }

    #[test]
    fn clones_share_storage() {
        let a = Boundary::parse("POLYGON((0 0, 1 0, 1 1, 0 0))");
        let b = a.clone();
        let c = Boundary::parse(a.wkt());
        assert!(a.same(&b));
        assert!(!a.same(&c));
    }

    #[test]
    fn from_geometry_round_trips_through_text() {
        let a = Boundary::parse("POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))");
        let b = Boundary::from_geometry(a.geometry().unwrap().clone());
        let c = Boundary::parse(b.wkt());
        assert_eq!(c.geometry(), a.geometry());
    }

    #[test]
    fn predicates_skip_unreadable_boundaries() {
        let good = Boundary::parse("POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))");
        let bad = Boundary::parse("garbage");
        assert!(!good.touches(&bad, Contiguity::Queen));
        assert!(!good.intersects(&bad));
        assert!(!good.disjoint(&bad));
        assert!(good.relation(&bad).is_none());
    }
}
