//! Text rendering of a simulation snapshot.
//!
//! Each room is a four-character cell `[kzp]`:
//!
//! | Slot | Glyphs |
//! |------|--------|
//! | k | `#` staircase, `!` sensor alert, `o` sensor normal |
//! | z | `Z` zombies, `.` clear |
//! | p | `P` practicante, blank otherwise |
//!
//! Floors are printed top floor first.

use std::fmt::Write;

use outbreak_logic::{GameOverReason, RoomView, SimulationState};

pub const LEGEND: &str =
    "Legend: Z zombies  . clear  ! sensor alert  o sensor normal  # staircase  P practicante";

pub fn cell(room: &RoomView) -> String {
    let kind = match room.sensor_alert {
        None => '#',
        Some(true) => '!',
        Some(false) => 'o',
    };
    let zombies = if room.has_zombies { 'Z' } else { '.' };
    let npc = if room.has_practicante { 'P' } else { ' ' };
    format!("[{kind}{zombies}{npc}]")
}

pub fn game_over_message(reason: GameOverReason) -> &'static str {
    match reason {
        GameOverReason::AllInfested => "GAME OVER: every room is infested",
        GameOverReason::PracticanteCaptured => "GAME OVER: the practicante was caught",
    }
}

pub fn render_state(state: &SimulationState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Turn {} | {}/{} rooms infested | {} sensors in alert | zombie generation {}",
        state.turn,
        state.infested_rooms,
        state.total_rooms,
        state.alerted_sensors(),
        if state.zombie_generation_enabled {
            "on"
        } else {
            "off"
        }
    );
    if let Some(p) = state.practicante {
        let _ = writeln!(out, "Practicante in room {p}");
    }
    out.push('\n');

    let width = state.floors.to_string().len();
    for floor in state.building.iter().rev() {
        let index = floor.first().map_or(0, |r| r.floor);
        let _ = write!(out, "Floor {index:>width$}: ");
        let cells: Vec<String> = floor.iter().map(cell).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(LEGEND);
    out.push('\n');

    if let Some(reason) = state.game_over_reason {
        let _ = writeln!(out, "\n*** {} ***", game_over_message(reason));
    }
    out
}
