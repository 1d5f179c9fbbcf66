//! Zombie spread, one step per turn.
//!
//! Spreading runs in two phases:
//!
//! 1. [`plan_spread`] looks at the pre-turn snapshot. For every infested room
//!    it collects the adjacent rooms that are clear and, if there are any,
//!    records one move to a uniformly chosen one.
//! 2. [`apply_spread`] applies the recorded moves in order: clear the source,
//!    infest the destination, raise the destination's sensor.
//!
//! Because every candidate set comes from the snapshot, a zombie that moved
//! this turn is never evaluated again, and two sources may pick the same
//! destination. When that happens both sources are vacated and the
//! destination is infested once; the second move gains no new room.
//!
//! A room holds a flag, not a count, so one move is planned per infested
//! room no matter how many zombies conceptually share it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::building::Building;
use crate::room::{Location, RoomId};

/// A zombie stepping from one room into an adjacent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZombieMove {
    pub from: RoomId,
    pub to: RoomId,
}

/// What applying a turn's moves changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpreadOutcome {
    /// Source of every applied move, in application order.
    pub vacated: Vec<Location>,
    /// Destinations that went from clear to infested, in application order.
    /// A destination reached by several moves appears once.
    pub newly_infested: Vec<Location>,
}

/// Plan one move per infested room against the current snapshot.
pub fn plan_spread<R: Rng + ?Sized>(building: &Building, rng: &mut R) -> Vec<ZombieMove> {
    let mut moves = Vec::new();
    for from in building.infested_rooms() {
        let candidates: Vec<RoomId> = building
            .neighbors(from)
            .iter()
            .copied()
            .filter(|&n| !building.room(n).has_zombies())
            .collect();
        if let Some(&to) = candidates.choose(rng) {
            moves.push(ZombieMove { from, to });
        }
    }
    moves
}

/// Apply planned moves in the order they were recorded.
pub fn apply_spread(building: &mut Building, moves: &[ZombieMove]) -> SpreadOutcome {
    let mut outcome = SpreadOutcome::default();
    for mv in moves {
        building.room_mut(mv.from).clear();
        let destination = building.room_mut(mv.to);
        if !destination.has_zombies() {
            outcome.newly_infested.push(destination.location());
        }
        destination.infest();
        outcome.vacated.push(building.location_of(mv.from));
        log::debug!(
            "zombie moved {} -> {}",
            building.location_of(mv.from),
            building.location_of(mv.to)
        );
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn infest(b: &mut Building, floor: usize, room: usize) -> RoomId {
        let id = b.id_of(Location::new(floor, room)).unwrap();
        b.room_mut(id).infest();
        id
    }

    #[test]
    fn no_moves_without_zombies() {
        let b = Building::new(2, 3).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(plan_spread(&b, &mut rng).is_empty());
    }

    #[test]
    fn surrounded_zombie_stays() {
        let mut b = Building::new(1, 2).unwrap();
        infest(&mut b, 0, 0);
        infest(&mut b, 0, 1);
        infest(&mut b, 0, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(plan_spread(&b, &mut rng).is_empty());
    }

    #[test]
    fn move_targets_clear_neighbor() {
        let mut b = Building::new(2, 3).unwrap();
        let from = infest(&mut b, 1, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..20 {
            let moves = plan_spread(&b, &mut rng);
            assert_eq!(moves.len(), 1);
            assert_eq!(moves[0].from, from);
            assert!(b.room(from).is_adjacent_to(moves[0].to));
        }
    }

    #[test]
    fn apply_vacates_source_and_alerts_destination() {
        let mut b = Building::new(1, 3).unwrap();
        let from = infest(&mut b, 0, 1);
        let to = b.id_of(Location::new(0, 2)).unwrap();
        let outcome = apply_spread(&mut b, &[ZombieMove { from, to }]);
        assert!(!b.room(from).has_zombies());
        assert!(b.room(to).has_zombies());
        assert!(b.room(to).sensor_alert());
        // Source sensor stays raised after the zombie leaves
        assert!(b.room(from).sensor_alert());
        assert_eq!(outcome.vacated, vec![Location::new(0, 1)]);
        assert_eq!(outcome.newly_infested, vec![Location::new(0, 2)]);
    }

    #[test]
    fn staircase_move_changes_floor() {
        let mut b = Building::new(2, 1).unwrap();
        let from = infest(&mut b, 0, 0);
        // Make the vertical link the only clear option
        infest(&mut b, 0, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let moves = plan_spread(&b, &mut rng);
        let from_stairs: Vec<_> = moves.iter().filter(|m| m.from == from).collect();
        assert_eq!(from_stairs.len(), 1);
        assert_eq!(b.location_of(from_stairs[0].to), Location::new(1, 0));
    }

    #[test]
    fn candidates_come_from_snapshot() {
        // 0:S 1 2 3 on one floor, zombies in 1 and 3. Room 2 is the only
        // clear neighbor of 3 and one of the two for 1.
        let mut b = Building::new(1, 3).unwrap();
        infest(&mut b, 0, 1);
        infest(&mut b, 0, 3);
        // StepRng(0, 0) always picks the first candidate
        let mut rng = StepRng::new(0, 0);
        let moves = plan_spread(&b, &mut rng);
        assert_eq!(moves.len(), 2);
        let r2 = b.id_of(Location::new(0, 2)).unwrap();
        let s = b.id_of(Location::new(0, 0)).unwrap();
        assert_eq!(moves[0].to, s);
        assert_eq!(moves[1].to, r2);
    }

    #[test]
    fn colliding_moves_infest_destination_once() {
        let mut b = Building::new(1, 3).unwrap();
        let a = infest(&mut b, 0, 1);
        let c = infest(&mut b, 0, 3);
        let mid = b.id_of(Location::new(0, 2)).unwrap();
        let before = b.infested_count();
        let outcome = apply_spread(
            &mut b,
            &[
                ZombieMove { from: a, to: mid },
                ZombieMove { from: c, to: mid },
            ],
        );
        assert_eq!(outcome.vacated.len(), 2);
        assert_eq!(outcome.newly_infested, vec![Location::new(0, 2)]);
        assert_eq!(b.infested_count(), before - 1);
        assert!(!b.room(a).has_zombies());
        assert!(!b.room(c).has_zombies());
    }
}
