//! Simulation parameters chosen before a run.
//!
//! A [`SimulationConfig`] is what the setup screen (or the `setup` request
//! body) collects: building size, how many zombies to start with, whether
//! new zombies appear on their own, and an optional seed for reproducible
//! runs. [`validate_config`] reports every problem at once so a front end
//! can show them together.
//!
//! ```
//! use outbreak_logic::config::{validate_config, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     floors: 4,
//!     rooms_per_floor: 6,
//!     ..SimulationConfig::default()
//! };
//! assert!(validate_config(&config).is_empty());
//! assert_eq!(config.total_rooms(), 28);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on rooms in one building, staircases included.
pub const MAX_TOTAL_ROOMS: usize = 10_000;

/// Parameters for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of floors.
    pub floors: usize,
    /// Regular rooms per floor, not counting the staircase.
    #[serde(alias = "roomsPerFloor")]
    pub rooms_per_floor: usize,
    /// Zombies placed in random clear rooms right after setup.
    #[serde(alias = "initialZombies")]
    pub initial_zombies: usize,
    /// Spawn one extra zombie at the end of every turn.
    #[serde(alias = "zombieGeneration")]
    pub zombie_generation: bool,
    /// Seed for the engine's random source (None = OS entropy).
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            floors: 3,
            rooms_per_floor: 5,
            initial_zombies: 1,
            zombie_generation: false,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Rooms the building will have, staircases included.
    pub fn total_rooms(&self) -> usize {
        self.floors
            .saturating_mul(self.rooms_per_floor.saturating_add(1))
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConfigError {
    /// Building needs at least one floor.
    NoFloors,
    /// Each floor needs at least one regular room.
    NoRooms,
    /// Building would exceed [`MAX_TOTAL_ROOMS`].
    TooManyRooms(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFloors => write!(f, "number of floors must be positive"),
            Self::NoRooms => write!(f, "number of rooms per floor must be positive"),
            Self::TooManyRooms(total) => write!(
                f,
                "building would have {total} rooms (limit {MAX_TOTAL_ROOMS})"
            ),
        }
    }
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &SimulationConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.floors == 0 {
        errors.push(ConfigError::NoFloors);
    }
    if config.rooms_per_floor == 0 {
        errors.push(ConfigError::NoRooms);
    }
    let total = config.total_rooms();
    if total > MAX_TOTAL_ROOMS {
        errors.push(ConfigError::TooManyRooms(total));
    }

    errors
}
