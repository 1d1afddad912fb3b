#![doc = "Parcel adjacency graphs, owner aggregation, same-owner merging and swap suggestions"]
mod analysis;
mod config;
mod diagnostics;
mod graph;
mod merge;
mod parcel;
mod swap;

#[doc(inline)]
pub use analysis::{analyze, Analysis};

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use diagnostics::{Diagnostic, DiagnosticKind};

#[doc(inline)]
pub use graph::{AdjacencyOptions, OwnerGraph, ParcelGraph, Strategy};

#[doc(inline)]
pub use merge::{merge_same_owner, MergeOutcome, MergedParcel};

#[doc(inline)]
pub use parcel::{Location, OwnerId, Parcel, ParcelId, ParcelRecord};

#[doc(inline)]
pub use swap::{area_ratio, suggest_swaps, SwapConfig, SwapSuggestion};

pub use parcelgeom::{self, Boundary, Contiguity};
