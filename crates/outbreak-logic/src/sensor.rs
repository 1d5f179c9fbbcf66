//! Two-state alarm attached to every regular room.
//!
//! A sensor latches: it goes to [`SensorState::Alert`] whenever a zombie
//! enters its room and only returns to [`SensorState::Normal`] through an
//! explicit [`Sensor::reset`]. Clearing the zombies out of the room leaves
//! the alarm raised, so an alert means "breached since the last reset".

use serde::{Deserialize, Serialize};

/// Alarm state of a [`Sensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorState {
    #[default]
    Normal,
    Alert,
}

/// A logical room sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    label: String,
    state: SensorState,
}

impl Sensor {
    /// New sensor in the normal state.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: SensorState::Normal,
        }
    }

    /// Sensor labelled after its room, e.g. `P1H3` for floor 1 room 3.
    pub fn for_room(floor: usize, room: usize) -> Self {
        Self::new(format!("P{floor}H{room}"))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> SensorState {
        self.state
    }

    pub fn is_alert(&self) -> bool {
        self.state == SensorState::Alert
    }

    /// Raise the alarm.
    pub fn trigger(&mut self) {
        self.state = SensorState::Alert;
    }

    /// Return to normal. Returns `false` if the sensor was not in alert.
    pub fn reset(&mut self) -> bool {
        let was_alert = self.is_alert();
        self.state = SensorState::Normal;
        was_alert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_normal() {
        let sensor = Sensor::for_room(2, 4);
        assert_eq!(sensor.state(), SensorState::Normal);
        assert_eq!(sensor.label(), "P2H4");
    }

    #[test]
    fn trigger_latches_until_reset() {
        let mut sensor = Sensor::new("lobby");
        sensor.trigger();
        sensor.trigger();
        assert!(sensor.is_alert());
        assert!(sensor.reset());
        assert!(!sensor.is_alert());
        // Second reset has nothing to do
        assert!(!sensor.reset());
    }

    #[test]
    fn state_serializes_snake_case() {
        let json = serde_json::to_string(&SensorState::Alert).unwrap();
        assert_eq!(json, "\"alert\"");
    }
}
