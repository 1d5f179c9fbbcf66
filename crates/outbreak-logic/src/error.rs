//! Engine errors.
//!
//! Every failure an engine call can report. All of them are recoverable:
//! nothing in the engine panics on bad input, and none of these leave the
//! simulation partially mutated.
//!
//! | Error | Code | When |
//! |-------|------|------|
//! | [`InvalidConfiguration`](SimError::InvalidConfiguration) | `INVALID_CONFIGURATION` | Zero floors, zero rooms per floor, or a building over the room limit |
//! | [`NotConfigured`](SimError::NotConfigured) | `NOT_CONFIGURED` | Call needs a building but `setup` has not run |
//! | [`InvalidLocation`](SimError::InvalidLocation) | `INVALID_LOCATION` | Floor or room index out of range |
//! | [`AlreadyExists`](SimError::AlreadyExists) | `ALREADY_EXISTS` | A second practicante was requested |
//!
//! Running out of eligible rooms for a spawn or placement is not an error:
//! it comes back as `added: false` in a [`PlacementResult`](crate::PlacementResult).
//!
//! ```
//! use outbreak_logic::SimError;
//!
//! let err = SimError::InvalidLocation { floor: 9, room: 1 };
//! assert_eq!(err.code(), "INVALID_LOCATION");
//! assert!(err.is_not_found());
//! ```

use thiserror::Error;

/// Error returned by [`Simulation`](crate::Simulation) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Floor or room count was zero (or the building too large).
    /// Rejected before any state changes.
    #[error("invalid configuration: {floors} floors x {rooms_per_floor} rooms per floor")]
    InvalidConfiguration { floors: usize, rooms_per_floor: usize },

    /// The operation needs a building and none has been set up.
    #[error("no building configured")]
    NotConfigured,

    /// No room exists at the requested coordinates.
    #[error("room {floor}-{room} does not exist")]
    InvalidLocation { floor: usize, room: usize },

    /// A practicante is already in the building.
    #[error("a practicante already exists")]
    AlreadyExists,
}

impl SimError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            Self::NotConfigured => "NOT_CONFIGURED",
            Self::InvalidLocation { .. } => "INVALID_LOCATION",
            Self::AlreadyExists => "ALREADY_EXISTS",
        }
    }

    /// Whether the error means "the thing you asked about is not there".
    ///
    /// Network collaborators answer these with a not-found class response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotConfigured | Self::InvalidLocation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let all = [
            SimError::InvalidConfiguration {
                floors: 0,
                rooms_per_floor: 1,
            },
            SimError::NotConfigured,
            SimError::InvalidLocation { floor: 0, room: 0 },
            SimError::AlreadyExists,
        ];
        let mut codes: Vec<_> = all.iter().map(SimError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn not_found_class() {
        assert!(SimError::NotConfigured.is_not_found());
        assert!(SimError::InvalidLocation { floor: 1, room: 2 }.is_not_found());
        assert!(!SimError::AlreadyExists.is_not_found());
        assert!(!SimError::InvalidConfiguration {
            floors: 0,
            rooms_per_floor: 0
        }
        .is_not_found());
    }

    #[test]
    fn display_mentions_coordinates() {
        let msg = SimError::InvalidLocation { floor: 3, room: 7 }.to_string();
        assert!(msg.contains("3-7"), "{msg}");
    }
}
