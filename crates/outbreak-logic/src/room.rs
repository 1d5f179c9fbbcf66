//! Rooms: the nodes of the building graph.
//!
//! Regular rooms and staircases share the infestation flag and the
//! adjacency list; what differs is carried by [`RoomKind`]. Adjacency is
//! stored as [`RoomId`]s into the owning [`Building`](crate::Building)'s
//! arena, never as references, so the graph has no ownership cycles.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sensor::Sensor;

/// Building coordinates of a room: floor index and room index on that floor.
///
/// Room index 0 is always the floor's staircase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub floor: usize,
    pub room: usize,
}

impl Location {
    pub const fn new(floor: usize, room: usize) -> Self {
        Self { floor, room }
    }

    pub fn is_staircase(&self) -> bool {
        self.room == 0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.floor, self.room)
    }
}

/// Index of a room in the building arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub usize);

/// What kind of room this is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomKind {
    /// An ordinary room with its own alarm sensor.
    Regular { sensor: Sensor },
    /// The floor's inter-floor connector. Never has a sensor.
    ///
    /// `connected_floors` lists the floor indices reachable through it and
    /// is informational only; traversal goes through adjacency.
    Staircase { connected_floors: Vec<usize> },
}

/// Outcome of resetting a room's sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorReset {
    /// Sensor went from alert back to normal.
    Reset,
    /// Sensor was already normal.
    AlreadyNormal,
    /// The room is a staircase.
    NoSensor,
}

/// A single room in the building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    location: Location,
    has_zombies: bool,
    kind: RoomKind,
    adjacent: Vec<RoomId>,
}

impl Room {
    /// A regular room with a fresh sensor.
    pub fn regular(id: RoomId, location: Location) -> Self {
        Self {
            id,
            location,
            has_zombies: false,
            kind: RoomKind::Regular {
                sensor: Sensor::for_room(location.floor, location.room),
            },
            adjacent: Vec::new(),
        }
    }

    /// A staircase with no sensor and no connected floors yet.
    pub fn staircase(id: RoomId, location: Location) -> Self {
        Self {
            id,
            location,
            has_zombies: false,
            kind: RoomKind::Staircase {
                connected_floors: Vec::new(),
            },
            adjacent: Vec::new(),
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn has_zombies(&self) -> bool {
        self.has_zombies
    }

    pub fn is_staircase(&self) -> bool {
        matches!(self.kind, RoomKind::Staircase { .. })
    }

    pub fn sensor(&self) -> Option<&Sensor> {
        match &self.kind {
            RoomKind::Regular { sensor } => Some(sensor),
            RoomKind::Staircase { .. } => None,
        }
    }

    /// Whether the room's sensor is raised. Staircases report `false`.
    pub fn sensor_alert(&self) -> bool {
        self.sensor().is_some_and(Sensor::is_alert)
    }

    /// Floors reachable through this staircase. Empty for regular rooms.
    pub fn connected_floors(&self) -> &[usize] {
        match &self.kind {
            RoomKind::Staircase { connected_floors } => connected_floors,
            RoomKind::Regular { .. } => &[],
        }
    }

    /// Rooms a zombie (or the practicante) can step into from here.
    pub fn adjacent(&self) -> &[RoomId] {
        &self.adjacent
    }

    pub fn is_adjacent_to(&self, other: RoomId) -> bool {
        self.adjacent.contains(&other)
    }

    /// A zombie enters. Always raises the sensor if there is one, even if
    /// the room was already infested.
    pub fn infest(&mut self) {
        self.has_zombies = true;
        if let RoomKind::Regular { sensor } = &mut self.kind {
            sensor.trigger();
        }
    }

    /// Remove the zombies. The sensor is left as it is.
    ///
    /// Returns `false` if the room was already clear.
    pub fn clear(&mut self) -> bool {
        let had = self.has_zombies;
        self.has_zombies = false;
        had
    }

    pub fn reset_sensor(&mut self) -> SensorReset {
        match &mut self.kind {
            RoomKind::Regular { sensor } => {
                if sensor.reset() {
                    SensorReset::Reset
                } else {
                    SensorReset::AlreadyNormal
                }
            }
            RoomKind::Staircase { .. } => SensorReset::NoSensor,
        }
    }

    /// One side of an adjacency link. Self-links and duplicates are ignored.
    pub(crate) fn add_adjacent(&mut self, other: RoomId) {
        if other != self.id && !self.adjacent.contains(&other) {
            self.adjacent.push(other);
        }
    }

    pub(crate) fn add_connected_floor(&mut self, floor: usize) {
        if let RoomKind::Staircase { connected_floors } = &mut self.kind {
            if !connected_floors.contains(&floor) {
                connected_floors.push(floor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_room_has_sensor() {
        let room = Room::regular(RoomId(1), Location::new(0, 1));
        assert!(!room.is_staircase());
        assert!(room.sensor().is_some());
        assert!(!room.has_zombies());
    }

    #[test]
    fn staircase_has_no_sensor() {
        let mut stairs = Room::staircase(RoomId(0), Location::new(0, 0));
        assert!(stairs.is_staircase());
        assert!(stairs.sensor().is_none());
        stairs.infest();
        assert!(stairs.has_zombies());
        assert!(!stairs.sensor_alert());
        assert_eq!(stairs.reset_sensor(), SensorReset::NoSensor);
    }

    #[test]
    fn clearing_keeps_sensor_alert() {
        let mut room = Room::regular(RoomId(3), Location::new(1, 2));
        room.infest();
        assert!(room.sensor_alert());
        assert!(room.clear());
        assert!(!room.has_zombies());
        assert!(room.sensor_alert());
        assert!(!room.clear());
    }

    #[test]
    fn reset_sensor_outcomes() {
        let mut room = Room::regular(RoomId(3), Location::new(1, 2));
        assert_eq!(room.reset_sensor(), SensorReset::AlreadyNormal);
        room.infest();
        assert_eq!(room.reset_sensor(), SensorReset::Reset);
        assert!(!room.sensor_alert());
    }

    #[test]
    fn reinfesting_raises_reset_sensor() {
        let mut room = Room::regular(RoomId(2), Location::new(0, 2));
        room.infest();
        room.reset_sensor();
        room.infest();
        assert!(room.sensor_alert());
    }

    #[test]
    fn adjacency_ignores_self_and_duplicates() {
        let mut room = Room::regular(RoomId(5), Location::new(0, 5));
        room.add_adjacent(RoomId(5));
        room.add_adjacent(RoomId(4));
        room.add_adjacent(RoomId(4));
        assert_eq!(room.adjacent(), &[RoomId(4)]);
    }

    #[test]
    fn location_display() {
        assert_eq!(Location::new(2, 0).to_string(), "2-0");
        assert!(Location::new(2, 0).is_staircase());
    }
}
