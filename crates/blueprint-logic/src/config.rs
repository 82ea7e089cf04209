//! Layout configuration: cell size, seeding, grid sizing and door caps.
//!
//! Every field has a default, so an empty JSON object (`{}`) is a valid
//! config.
//!
//! ```
//! use blueprint_logic::config::LayoutConfig;
//!
//! let config = LayoutConfig {
//!     seed: Some(7),
//!     ..LayoutConfig::default()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.resolve_seed(), 7);
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Tunables for one layout run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Square feet represented by one grid cell.
    pub cell_size: f64,
    /// Random seed for placement (None = seed from the wall clock, so every
    /// call produces a different layout).
    pub seed: Option<u64>,
    /// Slack multiplier on the working grid for corridors and walls.
    pub grid_buffer: f64,
    /// Lower bound on each working grid dimension.
    pub min_grid_dim: usize,
    /// Doorways allowed per room (hallways are uncapped).
    pub max_doors_per_room: u32,
    /// Edges below this weight never get a doorway.
    pub min_door_weight: u32,
    /// Half-width of the uniform score jitter.
    pub jitter: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_size: 20.0,
            seed: None,
            grid_buffer: 1.1,
            min_grid_dim: 12,
            max_doors_per_room: 3,
            min_door_weight: 3,
            jitter: 0.5,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if !(self.grid_buffer.is_finite() && self.grid_buffer >= 1.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "grid_buffer must be at least 1.0, got {}",
                self.grid_buffer
            )));
        }
        if !(self.jitter.is_finite() && self.jitter >= 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "jitter must be non-negative, got {}",
                self.jitter
            )));
        }
        if self.min_grid_dim == 0 {
            return Err(LayoutError::InvalidConfig(
                "min_grid_dim must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The seed this run will use: the configured one, or one derived from
    /// the current time.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(seed_from_time)
    }
}

fn seed_from_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
