mod swap;

pub use swap::{area_ratio, suggest_swaps, SwapConfig, SwapSuggestion};
