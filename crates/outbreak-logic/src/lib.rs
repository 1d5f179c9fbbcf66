//! Pure simulation logic for the outbreak building simulation.
//!
//! This crate contains the whole engine: the building graph, the per-turn
//! zombie spread, sensor bookkeeping, the practicante's evasion policy and
//! the win/loss evaluation. It performs no I/O. Collaborators (the HTTP
//! service, the interactive CLI, the headless harness) drive it through
//! [`Simulation`] and read [`SimulationState`] snapshots.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`building`] | Floors, staircases and the room arena with adjacency |
//! | [`config`] | Simulation parameters and their validation |
//! | [`error`] | Error taxonomy shared by all engine operations |
//! | [`practicante`] | The evading NPC and its safe/risky move choice |
//! | [`room`] | Room identity, the regular/staircase variant, infestation flag |
//! | [`sensor`] | Two-state alarm attached to regular rooms |
//! | [`simulation`] | Turn orchestration and manual interventions |
//! | [`spread`] | Two-phase zombie movement (plan on snapshot, then apply) |
//! | [`state`] | Read-only snapshots for collaborators |
//!
//! ```
//! use outbreak_logic::Simulation;
//!
//! let mut sim = Simulation::seeded(7);
//! let summary = sim.setup(2, 3).unwrap();
//! assert_eq!(summary.total_rooms, 8);
//!
//! sim.add_initial_zombies(1).unwrap();
//! let report = sim.advance_turn().unwrap();
//! assert_eq!(report.turn, 1);
//! ```

pub mod building;
pub mod config;
pub mod error;
pub mod practicante;
pub mod room;
pub mod sensor;
pub mod simulation;
pub mod spread;
pub mod state;

pub use building::{Building, Floor};
pub use config::{validate_config, ConfigError, SimulationConfig};
pub use error::SimError;
pub use practicante::{Practicante, PracticanteMove};
pub use room::{Location, Room, RoomId, RoomKind};
pub use sensor::{Sensor, SensorState};
pub use simulation::{
    CleanResult, GameOverReason, PlacementResult, SensorResetResult, SetupReport, SimRng,
    Simulation, TurnReport,
};
pub use state::{BuildingSummary, RoomView, SimulationState};
