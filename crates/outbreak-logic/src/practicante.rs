//! The practicante: an NPC that tries to stay away from the zombies.
//!
//! Each turn, before the zombies move, the practicante looks at the rooms
//! next to it and sorts the ones without zombies into two groups:
//!
//! | Group | Meaning |
//! |-------|---------|
//! | safe | no zombies in the room and none in any of its neighbors |
//! | risky | no zombies in the room, but at least one neighbor has some |
//!
//! Infested neighbors are never considered. The decision, in order:
//!
//! 1. any safe neighbor → move to a random safe one;
//! 2. the current room borders zombies and a risky neighbor exists → move
//!    to a random risky one;
//! 3. otherwise stay.
//!
//! The practicante does not trigger sensors.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::building::Building;
use crate::room::{Location, RoomId};

/// Result of one evasion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticanteMove {
    pub moved: bool,
    pub from: Location,
    pub to: Location,
}

/// Viable destinations around a room, split by danger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscapeOptions {
    pub safe: Vec<RoomId>,
    pub risky: Vec<RoomId>,
    /// The room being assessed itself borders zombies.
    pub in_danger: bool,
}

/// Classify the clear neighbors of `here`.
pub fn assess(building: &Building, here: RoomId) -> EscapeOptions {
    let mut options = EscapeOptions {
        in_danger: building.borders_zombies(here),
        ..EscapeOptions::default()
    };
    for &n in building.neighbors(here) {
        if building.room(n).has_zombies() {
            continue;
        }
        if building.borders_zombies(n) {
            options.risky.push(n);
        } else {
            options.safe.push(n);
        }
    }
    options
}

/// The evading NPC. At most one exists per simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Practicante {
    location: Location,
}

impl Practicante {
    pub fn new(location: Location) -> Self {
        Self { location }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Take one step according to the evasion policy.
    pub fn evade<R: Rng + ?Sized>(&mut self, building: &Building, rng: &mut R) -> PracticanteMove {
        let from = self.location;
        let stay = PracticanteMove {
            moved: false,
            from,
            to: from,
        };
        let Some(here) = building.id_of(from) else {
            log::warn!("practicante at {from} is outside the building; staying put");
            return stay;
        };

        let options = assess(building, here);
        let target = if !options.safe.is_empty() {
            options.safe.choose(rng).copied()
        } else if options.in_danger {
            options.risky.choose(rng).copied()
        } else {
            None
        };

        match target {
            Some(id) => {
                let to = building.location_of(id);
                self.location = to;
                log::debug!("practicante moved {from} -> {to}");
                PracticanteMove {
                    moved: true,
                    from,
                    to,
                }
            }
            None => stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn infest(b: &mut Building, floor: usize, room: usize) {
        let id = b.id_of(Location::new(floor, room)).unwrap();
        b.room_mut(id).infest();
    }

    fn id(b: &Building, floor: usize, room: usize) -> RoomId {
        b.id_of(Location::new(floor, room)).unwrap()
    }

    #[test]
    fn assess_empty_building_all_safe() {
        let b = Building::new(1, 3).unwrap();
        let options = assess(&b, id(&b, 0, 2));
        assert_eq!(options.safe.len(), 2);
        assert!(options.risky.is_empty());
        assert!(!options.in_danger);
    }

    #[test]
    fn assess_splits_safe_and_risky() {
        // S 1 2 3 4 5, zombie in 5, practicante in 3.
        // 4 borders the zombie (risky); 2 does not (safe).
        let mut b = Building::new(1, 5).unwrap();
        infest(&mut b, 0, 5);
        let options = assess(&b, id(&b, 0, 3));
        assert_eq!(options.safe, vec![id(&b, 0, 2)]);
        assert_eq!(options.risky, vec![id(&b, 0, 4)]);
        assert!(!options.in_danger);
    }

    #[test]
    fn infested_neighbors_are_excluded() {
        let mut b = Building::new(1, 3).unwrap();
        infest(&mut b, 0, 1);
        let options = assess(&b, id(&b, 0, 2));
        assert!(options.in_danger);
        assert!(!options.safe.contains(&id(&b, 0, 1)));
        assert!(!options.risky.contains(&id(&b, 0, 1)));
    }

    #[test]
    fn prefers_safe_neighbor() {
        let mut b = Building::new(1, 5).unwrap();
        infest(&mut b, 0, 5);
        let mut p = Practicante::new(Location::new(0, 3));
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let step = p.evade(&b, &mut rng);
        assert!(step.moved);
        assert_eq!(step.to, Location::new(0, 2));
        assert_eq!(p.location(), Location::new(0, 2));
    }

    #[test]
    fn flees_to_risky_when_in_danger() {
        // S 1 2 3, zombies in S and 3, practicante in 2.
        // 1 borders S (risky), current room borders 3 → move to 1.
        let mut b = Building::new(1, 3).unwrap();
        infest(&mut b, 0, 0);
        infest(&mut b, 0, 3);
        let mut p = Practicante::new(Location::new(0, 2));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let step = p.evade(&b, &mut rng);
        assert_eq!(
            step,
            PracticanteMove {
                moved: true,
                from: Location::new(0, 2),
                to: Location::new(0, 1),
            }
        );
    }

    #[test]
    fn stays_when_not_in_danger_and_no_safe_room() {
        // S 1 2 3 4, zombie in S and 4, practicante in 2.
        // Neighbors 1 and 3 are both risky but room 2 itself borders nothing.
        let mut b = Building::new(1, 4).unwrap();
        infest(&mut b, 0, 0);
        infest(&mut b, 0, 4);
        let mut p = Practicante::new(Location::new(0, 2));
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let step = p.evade(&b, &mut rng);
        assert!(!step.moved);
        assert_eq!(step.from, step.to);
    }

    #[test]
    fn stays_when_trapped() {
        let mut b = Building::new(1, 2).unwrap();
        infest(&mut b, 0, 0);
        infest(&mut b, 0, 2);
        let mut p = Practicante::new(Location::new(0, 1));
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(!p.evade(&b, &mut rng).moved);
        assert_eq!(p.location(), Location::new(0, 1));
    }
}
