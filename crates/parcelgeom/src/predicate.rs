use geo::{MultiPolygon, Relate};
use tracing::warn;

use crate::error::BoundaryError;
use crate::shape::Shape;

/// How two boundaries relate, from a single DE-9IM matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    /// Shared boundary points, no shared interior.
    Touches,
    /// Shared interior (partial overlap, containment or equality).
    Overlaps,
    /// No shared points at all.
    Disjoint,
}

impl Relation {
    #[inline] pub fn intersects(self) -> bool { self != Relation::Disjoint }
}

/// Which touching pairs count as neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Contiguity {
    /// Any shared boundary point, a single corner is enough.
    #[default]
    Queen,
    /// A shared boundary segment of positive length.
    Rook,
}

/// Classify the relation between two geometries.
pub fn relation(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Relation {
    let im = a.relate(b);
    if im.is_touches() {
        Relation::Touches
    } else if im.is_intersects() {
        Relation::Overlaps
    } else {
        Relation::Disjoint
    }
}

/// True iff `a` and `b` touch under the given contiguity rule.
pub fn contiguous(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>, contiguity: Contiguity) -> bool {
    let im = a.relate(b);
    match contiguity {
        Contiguity::Queen => im.is_touches(),
        // In the 9-char DE-9IM string, index 4 is Boundary/Boundary.
        Contiguity::Rook => im.is_touches() && im.matches("****1****").unwrap_or(false),
    }
}

/// Relation between two WKT boundaries, or the first parse failure.
pub fn try_relation(a: &str, b: &str) -> Result<Relation, BoundaryError> {
    let a = Shape::parse(a)?.into_multi();
    let b = Shape::parse(b)?.into_multi();
    Ok(relation(&a, &b))
}

/// Textual `touches`. Unreadable input yields `false`.
pub fn touches(a: &str, b: &str) -> bool {
    lenient(a, b).is_some_and(|r| r == Relation::Touches)
}

/// Textual `intersects`. Touching counts. Unreadable input yields `false`.
pub fn intersects(a: &str, b: &str) -> bool {
    lenient(a, b).is_some_and(Relation::intersects)
}

/// Textual `disjoint`. Unreadable input yields `false`, so on bad input this
/// is not the complement of [`intersects`].
pub fn disjoint(a: &str, b: &str) -> bool {
    lenient(a, b).is_some_and(|r| r == Relation::Disjoint)
}

fn lenient(a: &str, b: &str) -> Option<Relation> {
    try_relation(a, b)
        .inspect_err(|e| warn!(error = %e, "boundary predicate skipped"))
        .ok()
}
