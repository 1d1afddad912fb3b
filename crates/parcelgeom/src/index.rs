use geo::Rect;
use rstar::{RTree, RTreeObject, AABB};

/// A bounding box in the R-tree, associated with a caller-side key.
#[derive(Debug, Clone)]
struct Entry {
    key: u32,
    bbox: Rect<f64>,
}

impl RTreeObject for Entry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Envelope index over keyed bounding boxes.
///
/// Answers "which envelopes may interact with this one". A hit is necessary
/// but not sufficient for adjacency, results must be re-checked with a
/// predicate. Queries include the querying key itself if it was inserted.
#[derive(Debug)]
pub struct EnvelopeIndex {
    rtree: RTree<Entry>,
    padding: f64,
}

impl Default for EnvelopeIndex {
    fn default() -> Self { Self::new(0.0) }
}

impl EnvelopeIndex {
    /// Empty index. Every query envelope is grown by `padding` on each side.
    pub fn new(padding: f64) -> Self {
        Self { rtree: RTree::new(), padding }
    }

    /// Bulk-load an index from `(key, envelope)` pairs.
    pub fn bulk_load(entries: impl IntoIterator<Item = (u32, Rect<f64>)>, padding: f64) -> Self {
        Self {
            rtree: RTree::bulk_load(entries.into_iter().map(|(key, bbox)| Entry { key, bbox }).collect()),
            padding,
        }
    }

    pub fn insert(&mut self, key: u32, envelope: Rect<f64>) {
        self.rtree.insert(Entry { key, bbox: envelope });
    }

    #[inline] pub fn len(&self) -> usize { self.rtree.size() }

    #[inline] pub fn is_empty(&self) -> bool { self.rtree.size() == 0 }

    #[inline] pub fn padding(&self) -> f64 { self.padding }

    /// Keys whose envelopes intersect `envelope` (grown by the padding).
    pub fn query(&self, envelope: &Rect<f64>) -> impl Iterator<Item = u32> + '_ {
        let (pad, min, max) = (self.padding, envelope.min(), envelope.max());
        let search = AABB::from_corners([min.x - pad, min.y - pad], [max.x + pad, max.y + pad]);
        self.rtree.locate_in_envelope_intersecting(&search).map(|entry| entry.key)
    }
}
