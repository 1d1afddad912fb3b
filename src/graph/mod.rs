mod adjacency;
mod components;
mod options;
mod owner;

pub use adjacency::ParcelGraph;
pub(crate) use components::DisjointSets;
pub use options::{AdjacencyOptions, Strategy};
pub use owner::OwnerGraph;
