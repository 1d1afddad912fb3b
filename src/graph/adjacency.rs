use std::collections::BTreeMap;

use ahash::AHashMap;
use parcelgeom::EnvelopeIndex;
use rayon::prelude::*;
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::graph::{AdjacencyOptions, DisjointSets, Strategy};
use crate::parcel::{Parcel, ParcelId};

/// Undirected "touches" graph over parcels, in compressed sparse row format.
///
/// Vertices are the input parcels in input order (first occurrence of each
/// identifier). Neighbor lists are sorted by vertex and free of duplicates.
#[derive(Debug, Clone, Default)]
pub struct ParcelGraph {
    parcels: Vec<Parcel>,
    index: AHashMap<ParcelId, u32>, // Map between parcel ids and vertex indices.
    offsets: Vec<u32>,
    edges: Vec<u32>,
    diagnostics: Vec<Diagnostic>,
}

impl ParcelGraph {
    /// Build the adjacency graph of a parcel slice.
    pub fn build(parcels: &[Parcel], options: &AdjacencyOptions) -> Self {
        Self::from_parcels(parcels.to_vec(), options)
    }

    /// Build the adjacency graph, taking ownership of the parcels.
    pub fn from_parcels(parcels: Vec<Parcel>, options: &AdjacencyOptions) -> Self {
        let mut diagnostics = Vec::new();

        let mut index = AHashMap::with_capacity(parcels.len());
        let mut vertices = Vec::with_capacity(parcels.len());
        for parcel in parcels {
            if index.contains_key(&parcel.id()) {
                diagnostics.push(Diagnostic::duplicate(parcel.id()));
                continue;
            }
            index.insert(parcel.id(), vertices.len() as u32);
            vertices.push(parcel);
        }

        diagnostics.extend(vertices.iter().filter_map(|parcel| {
            parcel.boundary().error().map(|e| Diagnostic::unparsable(parcel.id(), e))
        }));

        let pairs = match options.strategy {
            Strategy::Indexed => indexed_pairs(&vertices, options),
            Strategy::AllPairs => all_pairs(&vertices, options),
        };
        let (offsets, edges) = compress(vertices.len(), pairs);

        debug!(parcels = vertices.len(), edges = edges.len() / 2, strategy = ?options.strategy, "built parcel graph");

        Self { parcels: vertices, index, offsets, edges, diagnostics }
    }

    /// Get the number of parcels (vertices).
    #[inline] pub fn node_count(&self) -> usize { self.parcels.len() }

    /// Get the number of undirected edges.
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() / 2 }

    #[inline] pub fn is_empty(&self) -> bool { self.parcels.is_empty() }

    /// The vertices, in input order.
    #[inline] pub fn parcels(&self) -> &[Parcel] { &self.parcels }

    /// Problems met while building, in discovery order.
    #[inline] pub fn diagnostics(&self) -> &[Diagnostic] { &self.diagnostics }

    #[inline] pub fn contains(&self, id: ParcelId) -> bool { self.index.contains_key(&id) }

    #[inline]
    pub fn parcel(&self, id: ParcelId) -> Option<&Parcel> {
        self.index.get(&id).map(|&u| &self.parcels[u as usize])
    }

    /// Get the range of edges for a given vertex.
    #[inline]
    fn range(&self, vertex: usize) -> std::ops::Range<usize> {
        self.offsets[vertex] as usize .. self.offsets[vertex + 1] as usize
    }

    /// Neighbor vertices of a vertex.
    #[inline]
    pub(crate) fn neighbor_slots(&self, vertex: usize) -> &[u32] {
        &self.edges[self.range(vertex)]
    }

    fn slots_of(&self, id: ParcelId) -> &[u32] {
        match self.index.get(&id) {
            Some(&u) => self.neighbor_slots(u as usize),
            None => &[],
        }
    }

    /// Identifiers of the parcels touching `id`. Empty for unknown identifiers.
    pub fn neighbors(&self, id: ParcelId) -> impl Iterator<Item = ParcelId> + '_ {
        self.slots_of(id).iter().map(|&v| self.parcels[v as usize].id())
    }

    /// Number of parcels touching `id`, zero for unknown identifiers.
    #[inline] pub fn degree(&self, id: ParcelId) -> usize { self.slots_of(id).len() }

    /// True iff both parcels are present and touch.
    pub fn are_adjacent(&self, a: ParcelId, b: ParcelId) -> bool {
        match self.index.get(&b) {
            Some(&v) => self.slots_of(a).binary_search(&v).is_ok(),
            None => false,
        }
    }

    /// Every undirected edge once, as (lower vertex, higher vertex) in input order.
    pub fn edges(&self) -> impl Iterator<Item = (&Parcel, &Parcel)> + '_ {
        (0..self.node_count()).flat_map(move |u| {
            self.neighbor_slots(u).iter()
                .filter(move |&&v| v as usize > u)
                .map(move |&v| (&self.parcels[u], &self.parcels[v as usize]))
        })
    }

    /// Neighbor lists keyed by parcel identifier, including isolated parcels.
    pub fn adjacency(&self) -> BTreeMap<ParcelId, Vec<ParcelId>> {
        self.parcels.iter()
            .map(|parcel| (parcel.id(), self.neighbors(parcel.id()).collect()))
            .collect()
    }

    /// Vertex sets of the connected components, ordered by first vertex.
    pub(crate) fn component_slots(&self) -> Vec<Vec<usize>> {
        let mut sets = DisjointSets::new(self.node_count());
        for (u, v) in (0..self.node_count()).flat_map(|u| self.neighbor_slots(u).iter().map(move |&v| (u, v as usize))) {
            sets.union(u, v);
        }
        sets.groups()
    }

    /// Connected components as parcel identifier lists, in input order.
    pub fn components(&self) -> Vec<Vec<ParcelId>> {
        self.component_slots().into_iter()
            .map(|slots| slots.into_iter().map(|u| self.parcels[u].id()).collect())
            .collect()
    }
}

/// Insert every envelope, then query each parcel's envelope and run the
/// predicate on candidates. Each unordered pair is tested once.
fn indexed_pairs(parcels: &[Parcel], options: &AdjacencyOptions) -> Vec<(u32, u32)> {
    // Insert phase: the index is complete before any query runs.
    let index = EnvelopeIndex::bulk_load(
        parcels.iter().enumerate()
            .filter_map(|(i, parcel)| parcel.boundary().envelope().map(|e| (i as u32, e))),
        options.envelope_padding,
    );

    let discover = |i: usize| -> Vec<(u32, u32)> {
        let boundary = parcels[i].boundary();
        let Some(envelope) = boundary.envelope() else { return Vec::new() };
        index.query(&envelope)
            .filter(|&j| j as usize > i)
            .filter(|&j| boundary.touches(parcels[j as usize].boundary(), options.contiguity))
            .map(|j| (i as u32, j))
            .collect()
    };

    // Query phase: read-only over the index and the parcels.
    let pairs: Vec<(u32, u32)> = if options.parallel {
        (0..parcels.len()).into_par_iter().flat_map_iter(discover).collect()
    } else {
        (0..parcels.len()).flat_map(discover).collect()
    };

    debug!(indexed = index.len(), pairs = pairs.len(), "envelope index pass");
    pairs
}

/// The predicate on every unordered pair.
fn all_pairs(parcels: &[Parcel], options: &AdjacencyOptions) -> Vec<(u32, u32)> {
    let n = parcels.len();
    let row = |i: usize| -> Vec<(u32, u32)> {
        (i + 1..n)
            .filter(|&j| parcels[i].boundary().touches(parcels[j].boundary(), options.contiguity))
            .map(|j| (i as u32, j as u32))
            .collect()
    };

    if options.parallel {
        (0..n).into_par_iter().flat_map_iter(row).collect()
    } else {
        (0..n).flat_map(row).collect()
    }
}

/// Symmetrize, deduplicate and pack pairs into CSR offsets and neighbor lists.
fn compress(num_nodes: usize, pairs: Vec<(u32, u32)>) -> (Vec<u32>, Vec<u32>) {
    let mut lists = vec![Vec::new(); num_nodes];
    for (a, b) in pairs {
        if a == b { continue }
        lists[a as usize].push(b);
        lists[b as usize].push(a);
    }
    for list in &mut lists {
        list.sort_unstable();
        list.dedup();
    }

    let offsets = std::iter::once(0u32).chain(
        lists.iter()
            .map(|v| v.len() as u32)
            .scan(0u32, |acc, len| { *acc += len; Some(*acc) })
    ).collect::<Vec<u32>>();

    (offsets, lists.into_iter().flatten().collect())
}
