use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::ParcelGraph;
use crate::parcel::{OwnerId, Parcel};

/// Ranking parameters for [`suggest_swaps`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
    /// Largest accepted relative area difference, in `[0, 1]`.
    pub area_threshold: f64,
    /// Maximum number of suggestions returned.
    pub max_suggestions: usize,
    /// Areas are clamped to at least this value before comparing.
    pub min_area: f64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self { area_threshold: 0.10, max_suggestions: 10, min_area: 1e-5 }
    }
}

impl SwapConfig {
    pub fn new(area_threshold: f64, max_suggestions: usize) -> Self {
        Self { area_threshold, max_suggestions, ..Self::default() }
    }
}

/// An advisory pairing of two touching parcels held by different owners.
///
/// `score` always equals `benefit`; `cost` is the area ratio, kept separate
/// for downstream policy.
#[derive(Debug, Clone, Serialize)]
pub struct SwapSuggestion {
    pub first: Parcel,
    pub second: Parcel,
    pub benefit: f64,
    pub cost: f64,
    pub score: f64,
}

impl SwapSuggestion {
    fn new(first: &Parcel, second: &Parcel, ratio: f64) -> Self {
        let benefit = 1.0 - ratio;
        Self { first: first.clone(), second: second.clone(), benefit, cost: ratio, score: benefit }
    }

    /// Relative area difference of the pair.
    #[inline] pub fn ratio(&self) -> f64 { self.cost }

    #[inline] pub fn owners(&self) -> (OwnerId, OwnerId) { (self.first.owner(), self.second.owner()) }
}

/// `|a - b| / max(a, b)` with both areas clamped to at least `min_area`.
pub fn area_ratio(a: f64, b: f64, min_area: f64) -> f64 {
    let (a, b) = (a.max(min_area), b.max(min_area));
    (a - b).abs() / a.max(b)
}

/// Rank cross-owner touching pairs of a merged-parcel graph by area similarity.
///
/// Pairs with `ratio <= area_threshold` are kept, sorted by descending score
/// (a stable sort, so equal scores keep edge order) and cut to
/// `max_suggestions`.
pub fn suggest_swaps(graph: &ParcelGraph, config: &SwapConfig) -> Vec<SwapSuggestion> {
    let mut suggestions = graph.edges()
        .filter(|(a, b)| a.owner() != b.owner())
        .filter_map(|(a, b)| {
            let ratio = area_ratio(a.shape_area(), b.shape_area(), config.min_area);
            (ratio <= config.area_threshold).then(|| SwapSuggestion::new(a, b, ratio))
        })
        .collect::<Vec<_>>();

    let found = suggestions.len();
    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions.truncate(config.max_suggestions);

    debug!(edges = graph.edge_count(), found, kept = suggestions.len(), "ranked swap suggestions");
    suggestions
}
