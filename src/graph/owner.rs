use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashSet;
use serde::Serialize;
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::graph::{AdjacencyOptions, ParcelGraph, Strategy};
use crate::parcel::{OwnerId, Parcel, ParcelId};

/// Owner-level adjacency: two owners are neighbors iff some parcel of one
/// touches some parcel of the other. Never contains self-loops.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OwnerGraph {
    adjacency: BTreeMap<OwnerId, Vec<OwnerId>>,
    parcels: BTreeMap<OwnerId, Vec<ParcelId>>,
    diagnostics: Vec<Diagnostic>,
}

impl OwnerGraph {
    /// Build the owner graph of a parcel collection.
    ///
    /// The indexed strategy projects the parcel graph; the all-pairs strategy
    /// scans every owner pair and stops at the first touching parcel pair.
    pub fn build(parcels: &[Parcel], options: &AdjacencyOptions) -> Self {
        match options.strategy {
            Strategy::Indexed => Self::from_parcel_graph(&ParcelGraph::build(parcels, options)),
            Strategy::AllPairs => Self::scan_owner_pairs(parcels, options),
        }
    }

    /// Project a parcel graph onto owners.
    pub fn from_parcel_graph(graph: &ParcelGraph) -> Self {
        let mut sets: BTreeMap<OwnerId, BTreeSet<OwnerId>> = BTreeMap::new();
        let mut parcels: BTreeMap<OwnerId, Vec<ParcelId>> = BTreeMap::new();
        for parcel in graph.parcels() {
            sets.entry(parcel.owner()).or_default();
            parcels.entry(parcel.owner()).or_default().push(parcel.id());
        }

        for (a, b) in graph.edges() {
            if a.owner() == b.owner() { continue }
            sets.entry(a.owner()).or_default().insert(b.owner());
            sets.entry(b.owner()).or_default().insert(a.owner());
        }

        Self::assemble(sets, parcels, graph.diagnostics().to_vec())
    }

    fn scan_owner_pairs(parcels: &[Parcel], options: &AdjacencyOptions) -> Self {
        let mut seen = AHashSet::with_capacity(parcels.len());
        let mut diagnostics = Vec::new();
        let mut groups: BTreeMap<OwnerId, Vec<&Parcel>> = BTreeMap::new();
        for parcel in parcels {
            if !seen.insert(parcel.id()) {
                diagnostics.push(Diagnostic::duplicate(parcel.id()));
                continue;
            }
            if let Some(e) = parcel.boundary().error() {
                diagnostics.push(Diagnostic::unparsable(parcel.id(), e));
            }
            groups.entry(parcel.owner()).or_default().push(parcel);
        }

        let mut sets: BTreeMap<OwnerId, BTreeSet<OwnerId>> = groups.keys().map(|&o| (o, BTreeSet::new())).collect();
        let owners = groups.keys().copied().collect::<Vec<_>>();
        for (i, a) in owners.iter().enumerate() {
            for b in &owners[i + 1..] {
                // `any` stops at the first touching parcel pair.
                let touching = groups[a].iter().any(|p| {
                    groups[b].iter().any(|q| p.boundary().touches(q.boundary(), options.contiguity))
                });
                if touching {
                    sets.entry(*a).or_default().insert(*b);
                    sets.entry(*b).or_default().insert(*a);
                }
            }
        }

        let parcels = groups.into_iter()
            .map(|(owner, members)| (owner, members.into_iter().map(Parcel::id).collect()))
            .collect();
        Self::assemble(sets, parcels, diagnostics)
    }

    fn assemble(
        sets: BTreeMap<OwnerId, BTreeSet<OwnerId>>,
        parcels: BTreeMap<OwnerId, Vec<ParcelId>>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let adjacency: BTreeMap<OwnerId, Vec<OwnerId>> = sets.into_iter()
            .map(|(owner, neighbors)| (owner, neighbors.into_iter().collect()))
            .collect();
        let graph = Self { adjacency, parcels, diagnostics };
        debug!(owners = graph.owner_count(), edges = graph.edge_count(), "built owner graph");
        graph
    }

    /// All owners, sorted, including isolated ones.
    pub fn owners(&self) -> impl Iterator<Item = OwnerId> + '_ { self.adjacency.keys().copied() }

    #[inline] pub fn owner_count(&self) -> usize { self.adjacency.len() }

    /// Number of undirected owner edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    #[inline] pub fn is_empty(&self) -> bool { self.adjacency.is_empty() }

    /// Sorted neighbor owners. Empty for absent or isolated owners.
    pub fn neighbors(&self, owner: OwnerId) -> &[OwnerId] {
        match self.adjacency.get(&owner) {
            Some(neighbors) => neighbors,
            None => &[],
        }
    }

    pub fn are_adjacent(&self, a: OwnerId, b: OwnerId) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Parcels held by an owner, in input order.
    pub fn parcels_of(&self, owner: OwnerId) -> &[ParcelId] {
        match self.parcels.get(&owner) {
            Some(parcels) => parcels,
            None => &[],
        }
    }

    #[inline] pub fn diagnostics(&self) -> &[Diagnostic] { &self.diagnostics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcelgeom::Boundary;
    use pretty_assertions::assert_eq;

    fn square(id: i64, owner: i64, x: f64, y: f64) -> Parcel {
        let wkt = format!("POLYGON(({x} {y}, {} {y}, {} {}, {x} {}, {x} {y}))", x + 1.0, x + 1.0, y + 1.0, y + 1.0);
        Parcel::new(ParcelId(id), OwnerId(owner), Boundary::parse(wkt))
    }

    /// Owner layout, one unit square per cell:
    ///   1 1 2
    ///   3 . 2     4 (far away)
    fn layout() -> Vec<Parcel> {
        vec![
            square(10, 1, 0.0, 1.0),
            square(11, 1, 1.0, 1.0),
            square(20, 2, 2.0, 1.0),
            square(21, 2, 2.0, 0.0),
            square(30, 3, 0.0, 0.0),
            square(40, 4, 50.0, 50.0),
        ]
    }

    fn owners(slice: &[OwnerId]) -> Vec<i64> { slice.iter().map(|o| o.0).collect() }

    #[test]
    fn projection_links_touching_owners() {
        let graph = OwnerGraph::build(&layout(), &AdjacencyOptions::default());
        assert_eq!(graph.owners().map(|o| o.0).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(owners(graph.neighbors(OwnerId(1))), vec![2, 3]);
        assert_eq!(owners(graph.neighbors(OwnerId(2))), vec![1]);
        assert_eq!(owners(graph.neighbors(OwnerId(3))), vec![1]);
        assert!(graph.neighbors(OwnerId(4)).is_empty());
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn same_owner_contact_is_not_a_self_loop() {
        let graph = OwnerGraph::build(&layout(), &AdjacencyOptions::default());
        for owner in graph.owners() {
            assert!(!graph.are_adjacent(owner, owner));
        }
    }

    #[test]
    fn pairwise_scan_matches_projection() {
        let options = AdjacencyOptions::default();
        let projected = OwnerGraph::build(&layout(), &options);
        let scanned = OwnerGraph::build(&layout(), &options.with_strategy(Strategy::AllPairs));
        for owner in projected.owners() {
            assert_eq!(projected.neighbors(owner), scanned.neighbors(owner));
            assert_eq!(projected.parcels_of(owner), scanned.parcels_of(owner));
        }
        assert_eq!(projected.owner_count(), scanned.owner_count());
    }

    #[test]
    fn absent_owner_is_empty() {
        let graph = OwnerGraph::build(&layout(), &AdjacencyOptions::default());
        assert!(graph.neighbors(OwnerId(99)).is_empty());
        assert!(graph.parcels_of(OwnerId(99)).is_empty());
        assert_eq!(graph.parcels_of(OwnerId(2)), &[ParcelId(20), ParcelId(21)]);
    }

    #[test]
    fn empty_input() {
        for strategy in [Strategy::Indexed, Strategy::AllPairs] {
            let graph = OwnerGraph::build(&[], &AdjacencyOptions::default().with_strategy(strategy));
            assert!(graph.is_empty());
            assert_eq!(graph.edge_count(), 0);
        }
    }
}
