use ahash::{AHashMap, AHashSet};
use parcelgeom::{measure, Boundary};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::graph::{AdjacencyOptions, ParcelGraph};
use crate::parcel::{OwnerId, Parcel, ParcelId};

/// One connected component of same-owner touching parcels.
///
/// Single-parcel components hold the original parcel itself. Larger ones hold
/// the anchor's identity and labels with the unioned geometry, area and length.
#[derive(Debug, Clone, Serialize)]
pub struct MergedParcel {
    parcel: Parcel,
    members: Vec<ParcelId>,
}

impl MergedParcel {
    #[inline] pub fn parcel(&self) -> &Parcel { &self.parcel }

    /// Original parcel identifiers of the component, in input order.
    #[inline] pub fn members(&self) -> &[ParcelId] { &self.members }

    #[inline] pub fn is_singleton(&self) -> bool { self.members.len() == 1 }

    #[inline] pub fn into_parcel(self) -> Parcel { self.parcel }
}

/// Result of [`merge_same_owner`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeOutcome {
    pub merged: Vec<MergedParcel>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MergeOutcome {
    #[inline] pub fn len(&self) -> usize { self.merged.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.merged.is_empty() }

    /// The merged parcels, in output order.
    pub fn parcels(&self) -> impl Iterator<Item = &Parcel> + '_ { self.merged.iter().map(MergedParcel::parcel) }

    pub fn into_parcels(self) -> Vec<Parcel> { self.merged.into_iter().map(MergedParcel::into_parcel).collect() }
}

/// Merge every owner's touching parcels into consolidated holdings.
///
/// Owners are emitted in order of first appearance, components within an
/// owner in order of their first member. Parcels of different owners never
/// merge, whatever their geometry. A repeated identifier keeps its first
/// occurrence; later ones are dropped and reported.
pub fn merge_same_owner(parcels: &[Parcel], options: &AdjacencyOptions) -> MergeOutcome {
    let mut seen = AHashSet::with_capacity(parcels.len());
    let mut duplicates = Vec::new();
    let mut slots: AHashMap<OwnerId, usize> = AHashMap::new();
    let mut groups: Vec<Vec<Parcel>> = Vec::new();
    for parcel in parcels {
        if !seen.insert(parcel.id()) {
            duplicates.push(Diagnostic::duplicate(parcel.id()));
            continue;
        }
        let slot = *slots.entry(parcel.owner()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(parcel.clone());
    }
    let owners = groups.len();

    let per_owner: Vec<MergeOutcome> = if options.parallel {
        groups.into_par_iter().map(|group| merge_owner(group, options)).collect()
    } else {
        groups.into_iter().map(|group| merge_owner(group, options)).collect()
    };

    let mut outcome = MergeOutcome { diagnostics: duplicates, ..MergeOutcome::default() };
    for part in per_owner {
        outcome.merged.extend(part.merged);
        outcome.diagnostics.extend(part.diagnostics);
    }

    debug!(parcels = parcels.len(), owners, merged = outcome.len(), "merged same-owner parcels");
    outcome
}

/// Merge the parcels of a single owner.
fn merge_owner(parcels: Vec<Parcel>, options: &AdjacencyOptions) -> MergeOutcome {
    let graph = ParcelGraph::from_parcels(parcels, options);
    let mut diagnostics = graph.diagnostics().to_vec();

    let merged = graph.component_slots().into_iter()
        .map(|component| {
            let members = component.iter().map(|&u| &graph.parcels()[u]).collect::<Vec<_>>();
            merge_component(&members, &mut diagnostics)
        })
        .collect();

    MergeOutcome { merged, diagnostics }
}

/// Merge one connected component. `members` is in input order and non-empty.
fn merge_component(members: &[&Parcel], diagnostics: &mut Vec<Diagnostic>) -> MergedParcel {
    let ids = members.iter().map(|p| p.id()).collect::<Vec<_>>();

    let anchor = match members {
        [] => unreachable!("connected components are never empty"),
        [single] => return MergedParcel { parcel: (*single).clone(), members: ids },
        [first, rest @ ..] => rest.iter().fold(*first, |best, &p| {
            if p.shape_area() > best.shape_area() { p } else { best }
        }),
    };

    // Unreadable members stay in the component but add nothing to the union.
    let parcel = match measure::union(members.iter().filter_map(|p| p.boundary().geometry())) {
        Some(geometry) => anchor.remeasured(Boundary::from_geometry(geometry)),
        None => {
            diagnostics.push(Diagnostic::union_fallback(anchor.id()));
            anchor.clone()
        }
    };

    MergedParcel { parcel, members: ids }
}
