mod ids;
mod parcel;

pub use ids::{OwnerId, ParcelId};
pub use parcel::{Location, Parcel, ParcelRecord};
