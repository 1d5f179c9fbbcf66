//! The simulation engine.
//!
//! [`Simulation`] owns the building, the optional practicante, the turn
//! counter and the random source. Collaborators call its methods and get
//! plain result values back; nothing here blocks or does I/O.
//!
//! # Turn order
//!
//! [`Simulation::advance_turn`] runs, in order:
//!
//! 1. bump the turn counter;
//! 2. move the practicante (if any) with its evasion policy;
//! 3. plan and apply the zombie spread;
//! 4. mark a capture if any zombie move ended in the practicante's room;
//! 5. spawn one zombie in a random clear room when generation is enabled;
//! 6. re-evaluate the game-over condition.
//!
//! A capture is permanent until the next `setup` or `reset`. The
//! all-infested condition is re-checked at the end of every turn.
//!
//! # Randomness
//!
//! The engine is generic over any [`rand::Rng`]. The default is a
//! `ChaCha8Rng`, seeded from the OS or from an explicit seed for
//! reproducible runs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::building::Building;
use crate::config::{validate_config, SimulationConfig};
use crate::error::SimError;
use crate::practicante::{Practicante, PracticanteMove};
use crate::room::{Location, SensorReset};
use crate::spread::{apply_spread, plan_spread};
use crate::state::{grid, BuildingSummary, SimulationState};

/// Default random source of the engine.
pub type SimRng = ChaCha8Rng;

/// Probability that the secret weapon clears any one infested room.
pub const SECRET_WEAPON_CLEAR_CHANCE: f64 = 0.5;

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    AllInfested,
    PracticanteCaptured,
}

/// Everything that happened during one call to [`Simulation::advance_turn`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u64,
    /// Source rooms of every zombie move.
    pub vacated_rooms: Vec<Location>,
    /// Rooms that went from clear to infested through zombie moves.
    pub infested_rooms: Vec<Location>,
    pub total_infested: usize,
    pub game_over: bool,
    pub game_over_reason: Option<GameOverReason>,
    pub zombie_generated: bool,
    pub generated_at: Option<Location>,
    /// Present when a practicante exists.
    pub practicante: Option<PracticanteMove>,
    /// A zombie moved into the practicante's room this turn.
    pub captured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanResult {
    pub cleaned: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorResetResult {
    pub reset: bool,
    pub message: String,
}

/// Outcome of placing a zombie or the practicante in a random room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementResult {
    pub added: bool,
    #[serde(flatten)]
    pub location: Option<Location>,
    pub message: String,
}

impl PlacementResult {
    fn placed(location: Location, message: String) -> Self {
        Self {
            added: true,
            location: Some(location),
            message,
        }
    }

    fn unavailable(message: &str) -> Self {
        Self {
            added: false,
            location: None,
            message: message.to_string(),
        }
    }
}

/// Result of applying a [`SimulationConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupReport {
    pub building: BuildingSummary,
    pub zombies_added: Vec<Location>,
}

/// A single simulation instance.
#[derive(Debug, Clone)]
pub struct Simulation<R = SimRng> {
    building: Option<Building>,
    practicante: Option<Practicante>,
    turn: u64,
    zombie_generation_enabled: bool,
    captured: bool,
    game_over_reason: Option<GameOverReason>,
    rng: R,
}

impl Simulation<SimRng> {
    /// Empty simulation with an entropy-seeded random source.
    pub fn new() -> Self {
        Self::with_rng(SimRng::from_entropy())
    }

    /// Empty simulation with a reproducible random source.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SimRng::seed_from_u64(seed))
    }
}

impl Default for Simulation<SimRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng + SeedableRng> Simulation<R> {
    /// Set up from a full configuration: reseed (if a seed is given), build,
    /// set the generation flag and place the initial zombies.
    pub fn apply_config(&mut self, config: &SimulationConfig) -> Result<SetupReport, SimError> {
        let errors = validate_config(config);
        if !errors.is_empty() {
            for e in &errors {
                log::warn!("rejected configuration: {e}");
            }
            return Err(SimError::InvalidConfiguration {
                floors: config.floors,
                rooms_per_floor: config.rooms_per_floor,
            });
        }
        let building = self.setup(config.floors, config.rooms_per_floor)?;
        if let Some(seed) = config.seed {
            self.rng = R::seed_from_u64(seed);
        }
        self.zombie_generation_enabled = config.zombie_generation;
        let zombies_added = self.add_initial_zombies(config.initial_zombies)?;
        Ok(SetupReport {
            building,
            zombies_added,
        })
    }
}

impl<R: Rng> Simulation<R> {
    /// Empty simulation drawing randomness from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            building: None,
            practicante: None,
            turn: 0,
            zombie_generation_enabled: false,
            captured: false,
            game_over_reason: None,
            rng,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn building(&self) -> Option<&Building> {
        self.building.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.building.is_some()
    }

    pub fn practicante(&self) -> Option<&Practicante> {
        self.practicante.as_ref()
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn zombie_generation_enabled(&self) -> bool {
        self.zombie_generation_enabled
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over_reason.is_some()
    }

    fn building_mut(&mut self) -> Result<&mut Building, SimError> {
        self.building.as_mut().ok_or(SimError::NotConfigured)
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Replace the building with a new empty one.
    ///
    /// Turn counter, practicante and game-over state start over. The
    /// generation flag is kept.
    pub fn setup(
        &mut self,
        floors_count: usize,
        rooms_per_floor: usize,
    ) -> Result<BuildingSummary, SimError> {
        let building = Building::new(floors_count, rooms_per_floor)?;
        let summary = BuildingSummary::of(&building);
        self.building = Some(building);
        self.practicante = None;
        self.turn = 0;
        self.captured = false;
        self.game_over_reason = None;
        log::info!(
            "building set up: {} floors x {} rooms ({} total)",
            summary.floors,
            summary.rooms_per_floor,
            summary.total_rooms
        );
        Ok(summary)
    }

    /// Drop everything and return to the unconfigured state.
    pub fn reset(&mut self) {
        self.building = None;
        self.practicante = None;
        self.turn = 0;
        self.zombie_generation_enabled = false;
        self.captured = false;
        self.game_over_reason = None;
        log::info!("simulation reset");
    }

    // ── Turns ───────────────────────────────────────────────────────────

    /// Advance the simulation by one turn.
    pub fn advance_turn(&mut self) -> Result<TurnReport, SimError> {
        let building = self.building.as_mut().ok_or(SimError::NotConfigured)?;
        self.turn += 1;

        let practicante_move = self
            .practicante
            .as_mut()
            .map(|p| p.evade(building, &mut self.rng));

        let moves = plan_spread(building, &mut self.rng);
        let outcome = apply_spread(building, &moves);

        let mut captured = false;
        if let Some(p) = &self.practicante {
            let here = p.location();
            captured = moves.iter().any(|m| building.location_of(m.to) == here);
            if captured {
                log::info!("practicante captured at {here} on turn {}", self.turn);
                self.captured = true;
            }
        }

        let mut generated_at = None;
        if self.zombie_generation_enabled {
            match building.random_clear_room(&mut self.rng, |_| true) {
                Some(id) => {
                    building.room_mut(id).infest();
                    let location = building.location_of(id);
                    log::debug!("zombie spawned at {location}");
                    generated_at = Some(location);
                }
                None => log::debug!("no clear room left to spawn a zombie"),
            }
        }

        let total_infested = building.infested_count();
        let reason = if self.captured {
            Some(GameOverReason::PracticanteCaptured)
        } else if total_infested == building.total_rooms() {
            Some(GameOverReason::AllInfested)
        } else {
            None
        };
        if reason.is_some() && self.game_over_reason != reason {
            log::info!("game over on turn {}: {:?}", self.turn, reason);
        }
        self.game_over_reason = reason;

        Ok(TurnReport {
            turn: self.turn,
            vacated_rooms: outcome.vacated,
            infested_rooms: outcome.newly_infested,
            total_infested,
            game_over: reason.is_some(),
            game_over_reason: reason,
            zombie_generated: generated_at.is_some(),
            generated_at,
            practicante: practicante_move,
            captured,
        })
    }

    // ── Zombies ─────────────────────────────────────────────────────────

    /// Place up to `count` zombies in distinct random clear rooms.
    ///
    /// Stops early once every room is infested.
    pub fn add_initial_zombies(&mut self, count: usize) -> Result<Vec<Location>, SimError> {
        let building = self.building.as_mut().ok_or(SimError::NotConfigured)?;
        let mut placed = Vec::with_capacity(count.min(building.total_rooms()));
        for _ in 0..count {
            let Some(id) = building.random_clear_room(&mut self.rng, |_| true) else {
                log::warn!(
                    "only {} of {count} initial zombies placed: building is full",
                    placed.len()
                );
                break;
            };
            building.room_mut(id).infest();
            placed.push(building.location_of(id));
        }
        Ok(placed)
    }

    /// Infest a specific room. Returns `false` if it already had zombies
    /// (its sensor is raised either way).
    pub fn add_zombie_at(&mut self, location: Location) -> Result<bool, SimError> {
        let building = self.building_mut()?;
        let id = building.resolve(location)?;
        let room = building.room_mut(id);
        let was_clear = !room.has_zombies();
        room.infest();
        Ok(was_clear)
    }

    /// Infest one random clear room.
    pub fn add_random_zombie(&mut self) -> Result<PlacementResult, SimError> {
        let building = self.building.as_mut().ok_or(SimError::NotConfigured)?;
        match building.random_clear_room(&mut self.rng, |_| true) {
            Some(id) => {
                building.room_mut(id).infest();
                let location = building.location_of(id);
                log::debug!("zombie added at {location}");
                Ok(PlacementResult::placed(
                    location,
                    format!("Zombie added to room {location}"),
                ))
            }
            None => {
                log::warn!("add zombie: no clear room available");
                Ok(PlacementResult::unavailable("No clear room available"))
            }
        }
    }

    /// Toggle per-turn zombie generation. Returns the new state.
    pub fn toggle_zombie_generation(&mut self) -> bool {
        self.zombie_generation_enabled = !self.zombie_generation_enabled;
        log::info!(
            "zombie generation {}",
            if self.zombie_generation_enabled {
                "enabled"
            } else {
                "disabled"
            }
        );
        self.zombie_generation_enabled
    }

    pub fn set_zombie_generation(&mut self, enabled: bool) {
        self.zombie_generation_enabled = enabled;
    }

    // ── Manual interventions ────────────────────────────────────────────

    /// Remove the zombies from one room. The sensor is not touched.
    pub fn clean_room(&mut self, floor: usize, room: usize) -> Result<CleanResult, SimError> {
        let location = Location::new(floor, room);
        let building = self.building_mut()?;
        let id = building.resolve(location)?;
        if building.room_mut(id).clear() {
            Ok(CleanResult {
                cleaned: true,
                message: format!("Room {location} has been cleaned of zombies"),
            })
        } else {
            Ok(CleanResult {
                cleaned: false,
                message: format!("Room {location} has no zombies to clean"),
            })
        }
    }

    /// Return a room's sensor from alert to normal.
    pub fn reset_sensor(
        &mut self,
        floor: usize,
        room: usize,
    ) -> Result<SensorResetResult, SimError> {
        let location = Location::new(floor, room);
        let building = self.building_mut()?;
        let id = building.resolve(location)?;
        let (reset, message) = match building.room_mut(id).reset_sensor() {
            SensorReset::Reset => (true, format!("Sensor in room {location} has been reset")),
            SensorReset::AlreadyNormal => (
                false,
                format!("Sensor in room {location} is not in alert"),
            ),
            SensorReset::NoSensor => (
                false,
                format!("Room {location} is a staircase and has no sensor"),
            ),
        };
        Ok(SensorResetResult { reset, message })
    }

    /// Clear each infested room independently with probability
    /// [`SECRET_WEAPON_CLEAR_CHANCE`]. Returns how many were cleared.
    pub fn use_secret_weapon(&mut self) -> Result<usize, SimError> {
        let building = self.building.as_mut().ok_or(SimError::NotConfigured)?;
        let mut cleared = 0;
        for id in building.infested_rooms() {
            if self.rng.gen_bool(SECRET_WEAPON_CLEAR_CHANCE) {
                building.room_mut(id).clear();
                cleared += 1;
            }
        }
        log::info!("secret weapon cleared {cleared} rooms");
        Ok(cleared)
    }

    // ── Practicante ─────────────────────────────────────────────────────

    /// Place the practicante in a random clear regular room.
    pub fn add_practicante(&mut self) -> Result<PlacementResult, SimError> {
        let building = self.building.as_ref().ok_or(SimError::NotConfigured)?;
        if self.practicante.is_some() {
            return Err(SimError::AlreadyExists);
        }
        match building.random_clear_room(&mut self.rng, |r| !r.is_staircase()) {
            Some(id) => {
                let location = building.location_of(id);
                self.practicante = Some(Practicante::new(location));
                log::info!("practicante placed at {location}");
                Ok(PlacementResult::placed(
                    location,
                    format!("Practicante placed in room {location}"),
                ))
            }
            None => {
                log::warn!("add practicante: no clear regular room available");
                Ok(PlacementResult::unavailable(
                    "No clear regular room available for the practicante",
                ))
            }
        }
    }

    // ── Snapshots ───────────────────────────────────────────────────────

    pub fn get_state(&self) -> Result<SimulationState, SimError> {
        let building = self.building.as_ref().ok_or(SimError::NotConfigured)?;
        let practicante = self.practicante.as_ref().map(Practicante::location);
        Ok(SimulationState {
            turn: self.turn,
            floors: building.floor_count(),
            rooms_per_floor: building.rooms_per_floor(),
            total_rooms: building.total_rooms(),
            infested_rooms: building.infested_count(),
            game_over: self.is_game_over(),
            game_over_reason: self.game_over_reason,
            practicante,
            zombie_generation_enabled: self.zombie_generation_enabled,
            building: grid(building, practicante),
        })
    }
}
