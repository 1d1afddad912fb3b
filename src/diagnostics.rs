use std::fmt;

use parcelgeom::BoundaryError;
use serde::Serialize;
use tracing::warn;

use crate::parcel::ParcelId;

/// A non-fatal problem met while processing one parcel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub parcel: ParcelId,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The boundary could not be parsed; the parcel takes part in no predicate.
    UnparsableBoundary(String),
    /// A later parcel reused an identifier and was dropped.
    DuplicateId,
    /// No member of a merge component had usable geometry; the anchor was kept as is.
    UnionFallback,
}

impl Diagnostic {
    pub(crate) fn unparsable(parcel: ParcelId, error: &BoundaryError) -> Self {
        warn!(%parcel, %error, "unparsable boundary, parcel skipped by predicates");
        Self { parcel, kind: DiagnosticKind::UnparsableBoundary(error.to_string()) }
    }

    pub(crate) fn duplicate(parcel: ParcelId) -> Self {
        warn!(%parcel, "duplicate parcel identifier, later occurrence dropped");
        Self { parcel, kind: DiagnosticKind::DuplicateId }
    }

    pub(crate) fn union_fallback(anchor: ParcelId) -> Self {
        warn!(%anchor, "no usable geometry in merge component, keeping anchor");
        Self { parcel: anchor, kind: DiagnosticKind::UnionFallback }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnparsableBoundary(reason) => write!(f, "{}: {reason}", self.parcel),
            DiagnosticKind::DuplicateId => write!(f, "{}: duplicate identifier", self.parcel),
            DiagnosticKind::UnionFallback => write!(f, "{}: merge fell back to anchor", self.parcel),
        }
    }
}
