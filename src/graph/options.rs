use parcelgeom::Contiguity;
use serde::{Deserialize, Serialize};

/// How candidate pairs are found before the touch predicate runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Envelope R-tree pruning, then the predicate on overlapping envelopes only.
    #[default]
    Indexed,
    /// The predicate on every pair. Quadratic, used as ground truth.
    AllPairs,
}

/// Options shared by every adjacency computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjacencyOptions {
    pub strategy: Strategy,
    pub contiguity: Contiguity,
    /// Grows every envelope query to absorb floating-point jitter. Only ever adds candidates.
    pub envelope_padding: f64,
    /// Run the query phase (and per-owner merges) on the rayon pool.
    pub parallel: bool,
}

impl Default for AdjacencyOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Indexed,
            contiguity: Contiguity::Queen,
            envelope_padding: 0.0,
            parallel: true,
        }
    }
}

impl AdjacencyOptions {
    /// Sequential variant of these options.
    pub fn sequential(self) -> Self { Self { parallel: false, ..self } }

    pub fn with_strategy(self, strategy: Strategy) -> Self { Self { strategy, ..self } }

    pub fn with_contiguity(self, contiguity: Contiguity) -> Self { Self { contiguity, ..self } }
}
