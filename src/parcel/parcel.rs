use std::sync::Arc;

use anyhow::{ensure, Error, Result};
use parcelgeom::Boundary;
use serde::{Deserialize, Serialize, Serializer};

use super::{OwnerId, ParcelId};

/// Loader-facing parcel row, as read from a table or database.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParcelRecord {
    pub id: i64,
    #[serde(default)]
    pub parcel_code: i64,
    #[serde(default)]
    pub parcel_number: i64,
    #[serde(default)]
    pub shape_length: f64,
    #[serde(default)]
    pub shape_area: f64,
    /// Boundary as POLYGON or MULTIPOLYGON WKT.
    pub boundary: String,
    pub owner: i64,
    #[serde(default)]
    pub parish: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub island: Option<String>,
}

/// Optional administrative labels of a parcel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    pub parish: Option<Arc<str>>,
    pub municipality: Option<Arc<str>>,
    pub island: Option<Arc<str>>,
}

/// A single cadastral land unit. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Parcel {
    id: ParcelId,
    parcel_code: i64,
    parcel_number: i64,
    shape_length: f64,
    shape_area: f64,
    #[serde(serialize_with = "serialize_boundary")]
    boundary: Boundary,
    owner: OwnerId,
    location: Location,
}

impl Parcel {
    /// Construct a parcel whose shape area and length are measured from its
    /// boundary (zero if the boundary is unreadable).
    pub fn new(id: ParcelId, owner: OwnerId, boundary: Boundary) -> Self {
        Self {
            id,
            parcel_code: 0,
            parcel_number: 0,
            shape_length: boundary.length().unwrap_or(0.0),
            shape_area: boundary.area().unwrap_or(0.0),
            boundary,
            owner,
            location: Location::default(),
        }
    }

    /// Set the location labels.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[inline] pub fn id(&self) -> ParcelId { self.id }

    #[inline] pub fn owner(&self) -> OwnerId { self.owner }

    /// Cadastral parcel code.
    #[inline] pub fn parcel_code(&self) -> i64 { self.parcel_code }

    /// Cadastral parcel number.
    #[inline] pub fn parcel_number(&self) -> i64 { self.parcel_number }

    #[inline] pub fn shape_area(&self) -> f64 { self.shape_area }

    #[inline] pub fn shape_length(&self) -> f64 { self.shape_length }

    #[inline] pub fn boundary(&self) -> &Boundary { &self.boundary }

    #[inline] pub fn location(&self) -> &Location { &self.location }

    /// Copy of this parcel carrying a new boundary, with area and length
    /// recomputed from it.
    pub(crate) fn remeasured(&self, boundary: Boundary) -> Self {
        Self {
            shape_length: boundary.length().unwrap_or(0.0),
            shape_area: boundary.area().unwrap_or(0.0),
            boundary,
            location: self.location.clone(),
            ..*self
        }
    }
}

impl TryFrom<ParcelRecord> for Parcel {
    type Error = Error;

    fn try_from(record: ParcelRecord) -> Result<Self> {
        ensure!(record.shape_area.is_finite() && record.shape_area >= 0.0,
            "parcel {}: shape area must be a non-negative number, got {}", record.id, record.shape_area);
        ensure!(record.shape_length.is_finite() && record.shape_length >= 0.0,
            "parcel {}: shape length must be a non-negative number, got {}", record.id, record.shape_length);

        Ok(Self {
            id: ParcelId(record.id),
            parcel_code: record.parcel_code,
            parcel_number: record.parcel_number,
            shape_length: record.shape_length,
            shape_area: record.shape_area,
            boundary: Boundary::parse(record.boundary),
            owner: OwnerId(record.owner),
            location: Location {
                parish: record.parish.map(Arc::from),
                municipality: record.municipality.map(Arc::from),
                island: record.island.map(Arc::from),
            },
        })
    }
}

fn serialize_boundary<S: Serializer>(boundary: &Boundary, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(boundary.wkt())
}
