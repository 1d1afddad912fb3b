use geo::{Area, BooleanOps, BoundingRect, Coord, CoordsIter, LineString, MapCoordsInPlace, MultiPolygon};
use rstar::RTree;

/// Boolean ops round through a fixed-point grid of about 2^-29 of the
/// operand extent, plus float error proportional to the coordinate magnitude.
const GRID_TOLERANCE: f64 = 1e-7;
const FLOAT_TOLERANCE: f64 = 1e-12;

/// Planar area, holes subtracted.
#[inline]
pub fn area(geometry: &MultiPolygon<f64>) -> f64 {
    geometry.unsigned_area()
}

/// Planar perimeter, including the rings of holes.
pub fn length(geometry: &MultiPolygon<f64>) -> f64 {
    geometry.0.iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .map(ring_length)
        .sum()
}

fn ring_length(ring: &LineString<f64>) -> f64 {
    ring.lines().map(|line| line.dx().hypot(line.dy())).sum()
}

/// Union of all geometries into a single MultiPolygon, `None` for no input.
/// This may be slow for large numbers of complex polygons.
///
/// Output vertices are snapped back onto the input vertices they came from,
/// so the union still shares exact coordinates with its neighbors.
pub fn union<'a>(geometries: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Option<MultiPolygon<f64>> {
    let sources = geometries.into_iter().collect::<Vec<_>>();
    let merged = sources.iter().map(|&g| g.clone()).reduce(|a, b| a.union(&b))?;
    Some(snap_to_vertices(merged, &sources))
}

/// Move every vertex of `geometry` onto the nearest vertex of `sources`, if
/// that vertex is within rounding distance of the boolean-op grid.
pub fn snap_to_vertices(mut geometry: MultiPolygon<f64>, sources: &[&MultiPolygon<f64>]) -> MultiPolygon<f64> {
    let Some(tolerance) = snap_tolerance(&geometry) else { return geometry };
    let vertices = sources.iter()
        .flat_map(|g| g.coords_iter())
        .map(|c| [c.x, c.y])
        .collect::<Vec<_>>();
    let tree = RTree::bulk_load(vertices);

    geometry.map_coords_in_place(|c| match tree.nearest_neighbor(&[c.x, c.y]) {
        Some(&[x, y]) if (x - c.x).hypot(y - c.y) <= tolerance => Coord { x, y },
        _ => c,
    });
    geometry
}

fn snap_tolerance(geometry: &MultiPolygon<f64>) -> Option<f64> {
    let rect = geometry.bounding_rect()?;
    let extent = rect.width().max(rect.height());
    let magnitude = [rect.min().x, rect.min().y, rect.max().x, rect.max().y]
        .into_iter()
        .fold(0.0, |m: f64, v| m.max(v.abs()));
    Some(GRID_TOLERANCE * extent + FLOAT_TOLERANCE * magnitude)
}
