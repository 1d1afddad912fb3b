use tracing::info;

use crate::config::Config;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::graph::{OwnerGraph, ParcelGraph};
use crate::merge::{merge_same_owner, MergeOutcome};
use crate::parcel::Parcel;
use crate::swap::{suggest_swaps, SwapSuggestion};

/// Every derived artifact of one run over a parcel collection.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub parcel_graph: ParcelGraph,
    pub owner_graph: OwnerGraph,
    pub merged: MergeOutcome,
    pub merged_graph: ParcelGraph,
    pub suggestions: Vec<SwapSuggestion>,
}

impl Analysis {
    /// Diagnostics of the run, each reported once.
    ///
    /// Parse and duplicate problems come from the parcel graph; the merge
    /// stage only adds its union fallbacks.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.parcel_graph.diagnostics().iter().chain(
            self.merged.diagnostics.iter().filter(|d| d.kind == DiagnosticKind::UnionFallback)
        )
    }
}

/// Run the whole pipeline: parcel graph, owner graph, same-owner merge,
/// merged-parcel graph and swap suggestions.
pub fn analyze(parcels: &[Parcel], config: &Config) -> Analysis {
    let parcel_graph = ParcelGraph::build(parcels, &config.adjacency);
    let owner_graph = OwnerGraph::from_parcel_graph(&parcel_graph);
    let merged = merge_same_owner(parcel_graph.parcels(), &config.adjacency);
    let merged_graph = ParcelGraph::from_parcels(merged.parcels().cloned().collect(), &config.adjacency);
    let suggestions = suggest_swaps(&merged_graph, &config.swap);

    info!(
        parcels = parcel_graph.node_count(),
        owners = owner_graph.owner_count(),
        merged = merged.len(),
        suggestions = suggestions.len(),
        "cadastral analysis complete"
    );

    Analysis { parcel_graph, owner_graph, merged, merged_graph, suggestions }
}
