//! Read-only snapshots handed to collaborators.
//!
//! Collaborators never touch rooms or floors directly; they get these plain
//! serializable values instead.

use serde::{Deserialize, Serialize};

use crate::building::Building;
use crate::room::{Location, Room};
use crate::simulation::GameOverReason;

/// Shape of a freshly built building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSummary {
    pub floors: usize,
    /// Regular rooms per floor.
    pub rooms_per_floor: usize,
    pub staircases: usize,
    pub normal_rooms: usize,
    pub total_rooms: usize,
}

impl BuildingSummary {
    pub fn of(building: &Building) -> Self {
        let floors = building.floor_count();
        let rooms_per_floor = building.rooms_per_floor();
        Self {
            floors,
            rooms_per_floor,
            staircases: floors,
            normal_rooms: floors * rooms_per_floor,
            total_rooms: building.total_rooms(),
        }
    }
}

/// One cell of the building grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub floor: usize,
    pub room: usize,
    pub has_zombies: bool,
    pub is_staircase: bool,
    /// `None` for staircases, which have no sensor.
    pub sensor_alert: Option<bool>,
    pub has_practicante: bool,
}

impl RoomView {
    pub fn of(room: &Room, practicante: Option<Location>) -> Self {
        let location = room.location();
        Self {
            floor: location.floor,
            room: location.room,
            has_zombies: room.has_zombies(),
            is_staircase: room.is_staircase(),
            sensor_alert: room.sensor().map(|s| s.is_alert()),
            has_practicante: practicante == Some(location),
        }
    }
}

/// Aggregated state of a configured simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    pub turn: u64,
    pub floors: usize,
    pub rooms_per_floor: usize,
    pub total_rooms: usize,
    pub infested_rooms: usize,
    pub game_over: bool,
    pub game_over_reason: Option<GameOverReason>,
    pub practicante: Option<Location>,
    pub zombie_generation_enabled: bool,
    /// Rooms grouped by floor, staircase first on each floor.
    pub building: Vec<Vec<RoomView>>,
}

impl SimulationState {
    /// Rooms whose sensor is raised.
    pub fn alerted_sensors(&self) -> usize {
        self.building
            .iter()
            .flatten()
            .filter(|r| r.sensor_alert == Some(true))
            .count()
    }
}

/// Grid of room views, one row per floor.
pub(crate) fn grid(building: &Building, practicante: Option<Location>) -> Vec<Vec<RoomView>> {
    building
        .floors()
        .iter()
        .map(|floor| {
            floor
                .rooms()
                .iter()
                .map(|&id| RoomView::of(building.room(id), practicante))
                .collect()
        })
        .collect()
}
