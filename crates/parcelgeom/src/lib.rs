pub mod boundary;
pub mod error;
pub mod index;
pub mod measure;
pub mod predicate;
pub mod shape;

pub use boundary::Boundary;
pub use error::BoundaryError;
pub use index::EnvelopeIndex;
pub use predicate::{Contiguity, Relation};
pub use shape::Shape;
