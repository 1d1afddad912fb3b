use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::graph::AdjacencyOptions;
use crate::swap::SwapConfig;

/// Settings for a full [`analyze`](crate::analyze) run. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub adjacency: AdjacencyOptions,
    pub swap: SwapConfig,
}

impl Config {
    /// Read and validate a JSON configuration.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("[config] Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run could use meaningfully.
    pub fn validate(&self) -> Result<()> {
        let padding = self.adjacency.envelope_padding;
        ensure!(padding.is_finite() && padding >= 0.0, "[config] envelope_padding must be a non-negative number, got {padding}");

        let threshold = self.swap.area_threshold;
        ensure!(threshold.is_finite(), "[config] area_threshold must be a finite number, got {threshold}");

        let min_area = self.swap.min_area;
        ensure!(min_area.is_finite() && min_area > 0.0, "[config] min_area must be a positive number, got {min_area}");
        Ok(())
    }
}
