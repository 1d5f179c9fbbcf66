//! The building graph.
//!
//! A [`Building`] is the sole owner of every [`Room`]: rooms live in one flat
//! arena and refer to each other by [`RoomId`]. Each [`Floor`] is an ordered
//! list of ids into that arena, staircase first.
//!
//! # Wiring
//!
//! ```text
//! floor 1:  [S]──[1]──[2]──[3]
//!            │
//! floor 0:  [S]──[1]──[2]──[3]
//! ```
//!
//! - Horizontal links join every pair of index-consecutive rooms on a floor,
//!   including the staircase and room 1.
//! - Vertical links join the staircases of consecutive floors and nothing else.
//!
//! Construction is atomic: it either returns a fully wired building or an
//! [`SimError::InvalidConfiguration`] without allocating anything. Buildings
//! over [`MAX_TOTAL_ROOMS`] rooms are rejected the same way.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

use crate::config::MAX_TOTAL_ROOMS;
use crate::error::SimError;
use crate::room::{Location, Room, RoomId};

/// One storey: the staircase (index 0) followed by the regular rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Floor {
    index: usize,
    rooms: Vec<RoomId>,
}

impl Floor {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Arena ids of this floor's rooms, ordered by room index.
    pub fn rooms(&self) -> &[RoomId] {
        &self.rooms
    }

    /// The staircase at room index 0.
    pub fn staircase(&self) -> RoomId {
        self.rooms[0]
    }

    pub fn room(&self, room_index: usize) -> Option<RoomId> {
        self.rooms.get(room_index).copied()
    }
}

/// All floors and rooms of one simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Building {
    floors: Vec<Floor>,
    rooms: Vec<Room>,
    rooms_per_floor: usize,
}

impl Building {
    /// Build `floors_count` floors of `1 + rooms_per_floor` rooms each.
    pub fn new(floors_count: usize, rooms_per_floor: usize) -> Result<Self, SimError> {
        let invalid = SimError::InvalidConfiguration {
            floors: floors_count,
            rooms_per_floor,
        };
        if floors_count == 0 || rooms_per_floor == 0 {
            return Err(invalid);
        }

        let width = match rooms_per_floor.checked_add(1) {
            Some(width) => width,
            None => return Err(invalid),
        };
        let total = match floors_count.checked_mul(width) {
            Some(total) if total <= MAX_TOTAL_ROOMS => total,
            _ => return Err(invalid),
        };
        let mut rooms = Vec::with_capacity(total);
        let mut floors = Vec::with_capacity(floors_count);

        for floor_index in 0..floors_count {
            let mut ids = Vec::with_capacity(width);
            for room_index in 0..width {
                let id = RoomId(rooms.len());
                let location = Location::new(floor_index, room_index);
                rooms.push(if room_index == 0 {
                    Room::staircase(id, location)
                } else {
                    Room::regular(id, location)
                });
                ids.push(id);
            }
            floors.push(Floor {
                index: floor_index,
                rooms: ids,
            });
        }

        let mut building = Self {
            floors,
            rooms,
            rooms_per_floor,
        };
        building.connect_floors_horizontally();
        building.connect_staircases();
        Ok(building)
    }

    fn connect_floors_horizontally(&mut self) {
        let pairs: Vec<(RoomId, RoomId)> = self
            .floors
            .iter()
            .flat_map(|floor| floor.rooms.windows(2).map(|w| (w[0], w[1])))
            .collect();
        for (a, b) in pairs {
            self.link(a, b);
        }
    }

    fn connect_staircases(&mut self) {
        for lower in 0..self.floors.len().saturating_sub(1) {
            let upper = lower + 1;
            let a = self.floors[lower].staircase();
            let b = self.floors[upper].staircase();
            self.link(a, b);
            self.rooms[a.0].add_connected_floor(upper);
            self.rooms[b.0].add_connected_floor(lower);
        }
    }

    /// Symmetric adjacency between two rooms.
    fn link(&mut self, a: RoomId, b: RoomId) {
        self.rooms[a.0].add_adjacent(b);
        self.rooms[b.0].add_adjacent(a);
    }

    // ── Shape ───────────────────────────────────────────────────────────

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor(&self, floor_index: usize) -> Option<&Floor> {
        self.floors.get(floor_index)
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    /// Regular rooms per floor, not counting the staircase.
    pub fn rooms_per_floor(&self) -> usize {
        self.rooms_per_floor
    }

    pub fn total_rooms(&self) -> usize {
        self.rooms.len()
    }

    // ── Lookup ──────────────────────────────────────────────────────────

    /// Every room in arena order (floor by floor, staircase first).
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Room by arena id. Ids handed out by this building are always valid.
    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.0]
    }

    pub(crate) fn room_mut(&mut self, id: RoomId) -> &mut Room {
        &mut self.rooms[id.0]
    }

    pub fn id_of(&self, location: Location) -> Option<RoomId> {
        self.floor(location.floor)?.room(location.room)
    }

    /// Resolve coordinates, failing with [`SimError::InvalidLocation`].
    pub fn resolve(&self, location: Location) -> Result<RoomId, SimError> {
        self.id_of(location).ok_or(SimError::InvalidLocation {
            floor: location.floor,
            room: location.room,
        })
    }

    pub fn room_at(&self, location: Location) -> Result<&Room, SimError> {
        self.resolve(location).map(|id| self.room(id))
    }

    pub fn location_of(&self, id: RoomId) -> Location {
        self.room(id).location()
    }

    pub fn neighbors(&self, id: RoomId) -> &[RoomId] {
        self.room(id).adjacent()
    }

    // ── Infestation ─────────────────────────────────────────────────────

    pub fn infested_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.has_zombies()).count()
    }

    /// Ids of infested rooms, in arena order.
    pub fn infested_rooms(&self) -> Vec<RoomId> {
        self.rooms
            .iter()
            .filter(|r| r.has_zombies())
            .map(Room::id)
            .collect()
    }

    pub fn is_fully_infested(&self) -> bool {
        self.rooms.iter().all(Room::has_zombies)
    }

    /// Whether any neighbor of `id` currently holds zombies.
    pub fn borders_zombies(&self, id: RoomId) -> bool {
        self.neighbors(id)
            .iter()
            .any(|&n| self.room(n).has_zombies())
    }

    /// Pick a uniformly random clear room that also passes `filter`.
    pub fn random_clear_room<R, F>(&self, rng: &mut R, filter: F) -> Option<RoomId>
    where
        R: Rng + ?Sized,
        F: Fn(&Room) -> bool,
    {
        let candidates: Vec<RoomId> = self
            .rooms
            .iter()
            .filter(|r| !r.has_zombies() && filter(r))
            .map(Room::id)
            .collect();
        candidates.choose(rng).copied()
    }

    // ── Reachability ────────────────────────────────────────────────────

    /// Flags every room reachable from any of `sources` (BFS over adjacency).
    ///
    /// Indexed by arena id.
    pub fn reachable_from(&self, sources: &[RoomId]) -> Vec<bool> {
        let mut visited = vec![false; self.rooms.len()];
        let mut queue: VecDeque<RoomId> = VecDeque::new();
        for &s in sources {
            if !visited[s.0] {
                visited[s.0] = true;
                queue.push_back(s);
            }
        }
        while let Some(current) = queue.pop_front() {
            for &next in self.neighbors(current) {
                if !visited[next.0] {
                    visited[next.0] = true;
                    queue.push_back(next);
                }
            }
        }
        visited
    }

    /// Whether every room is connected to every other. Always true for
    /// buildings made by [`Building::new`].
    pub fn is_connected(&self) -> bool {
        self.reachable_from(&[RoomId(0)]).iter().all(|&v| v)
    }
}
