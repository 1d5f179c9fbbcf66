//! Interactive menu loop.
//!
//! Generic over the input and output streams so whole sessions can be
//! scripted in tests. End of input behaves like choosing "Exit".

use std::io::{BufRead, Write};

use anyhow::Result;
use outbreak_logic::{Location, Simulation};

use crate::render::{game_over_message, render_state};

const RULE: &str = "--------------------------------------------------------------------------------";

const MENU: &[(&str, &str)] = &[
    ("1", "Setup building"),
    ("2", "Show building state"),
    ("3", "Advance one turn"),
    ("4", "Advance several turns"),
    ("5", "Clean room"),
    ("6", "Reset sensor"),
    ("7", "Add random zombie"),
    ("8", "Add practicante"),
    ("9", "Toggle zombie generation"),
    ("10", "Use secret weapon"),
    ("11", "Reset simulation"),
    ("0", "Exit"),
];

pub struct App<I, O> {
    sim: Simulation,
    input: I,
    out: O,
}

/// Result of a menu action: keep looping or leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

impl<I: BufRead, O: Write> App<I, O> {
    pub fn new(sim: Simulation, input: I, out: O) -> Self {
        Self { sim, input, out }
    }

    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "ZOMBIE BUILDING SIMULATION")?;
        loop {
            self.print_menu()?;
            let Some(choice) = self.read_line()? else {
                break;
            };
            if self.dispatch(choice.trim())? == Flow::Exit {
                break;
            }
        }
        writeln!(self.out, "Goodbye.")?;
        self.out.flush()?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.out, "\nMAIN MENU\n{RULE}")?;
        for (key, label) in MENU {
            writeln!(self.out, "{key:>2}. {label}")?;
        }
        write!(self.out, "\nChoice: ")?;
        self.out.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, choice: &str) -> Result<Flow> {
        let flow = match choice {
            "1" => self.setup()?,
            "2" => self.show_state()?,
            "3" => self.advance(1)?,
            "4" => match self.prompt_number("Number of turns", 1)? {
                Some(n) => self.advance(n)?,
                None => Flow::Exit,
            },
            "5" => self.clean_room()?,
            "6" => self.reset_sensor()?,
            "7" => {
                match self.sim.add_random_zombie() {
                    Ok(result) => writeln!(self.out, "{}", result.message)?,
                    Err(e) => writeln!(self.out, "Error: {e}")?,
                }
                Flow::Continue
            }
            "8" => {
                match self.sim.add_practicante() {
                    Ok(result) => writeln!(self.out, "{}", result.message)?,
                    Err(e) => writeln!(self.out, "Error: {e}")?,
                }
                Flow::Continue
            }
            "9" => {
                let enabled = self.sim.toggle_zombie_generation();
                writeln!(
                    self.out,
                    "Zombie generation {}",
                    if enabled { "enabled" } else { "disabled" }
                )?;
                Flow::Continue
            }
            "10" => {
                match self.sim.use_secret_weapon() {
                    Ok(n) => writeln!(self.out, "Secret weapon cleared {n} rooms")?,
                    Err(e) => writeln!(self.out, "Error: {e}")?,
                }
                Flow::Continue
            }
            "11" => {
                self.sim.reset();
                writeln!(self.out, "Simulation reset")?;
                Flow::Continue
            }
            "0" => Flow::Exit,
            other => {
                writeln!(self.out, "Invalid choice '{other}'. Please try again.")?;
                Flow::Continue
            }
        };
        Ok(flow)
    }

    // ── Actions ─────────────────────────────────────────────────────────

    fn setup(&mut self) -> Result<Flow> {
        writeln!(self.out, "\nBUILDING SETUP\n{RULE}")?;
        let Some(floors) = self.prompt_number("Number of floors", 1)? else {
            return Ok(Flow::Exit);
        };
        let Some(rooms) = self.prompt_number("Rooms per floor", 1)? else {
            return Ok(Flow::Exit);
        };
        let Some(zombies) = self.prompt_number("Initial zombies", 0)? else {
            return Ok(Flow::Exit);
        };

        match self.sim.setup(floors, rooms) {
            Ok(summary) => {
                let placed = self.sim.add_initial_zombies(zombies)?;
                writeln!(
                    self.out,
                    "Building ready: {} floors, {} rooms ({} staircases), {} zombies placed",
                    summary.floors,
                    summary.total_rooms,
                    summary.staircases,
                    placed.len()
                )?;
            }
            Err(e) => writeln!(self.out, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn show_state(&mut self) -> Result<Flow> {
        match self.sim.get_state() {
            Ok(state) => write!(self.out, "\n{}", render_state(&state))?,
            Err(_) => writeln!(
                self.out,
                "No building configured yet. Use option 1 to set up a building."
            )?,
        }
        Ok(Flow::Continue)
    }

    fn advance(&mut self, turns: usize) -> Result<Flow> {
        for _ in 0..turns {
            let report = match self.sim.advance_turn() {
                Ok(report) => report,
                Err(e) => {
                    writeln!(self.out, "Error: {e}")?;
                    return Ok(Flow::Continue);
                }
            };
            writeln!(
                self.out,
                "Turn {}: {} moved, {} newly infested, {} infested in total{}",
                report.turn,
                report.vacated_rooms.len(),
                report.infested_rooms.len(),
                report.total_infested,
                match report.generated_at {
                    Some(at) => format!(", new zombie in {at}"),
                    None => String::new(),
                }
            )?;
            if let Some(step) = report.practicante.filter(|s| s.moved) {
                writeln!(self.out, "  practicante moved {} -> {}", step.from, step.to)?;
            }
            if let Some(reason) = report.game_over_reason {
                writeln!(self.out, "\n*** {} ***", game_over_message(reason))?;
                break;
            }
        }
        self.show_state()
    }

    fn clean_room(&mut self) -> Result<Flow> {
        let Some(location) = self.prompt_location("CLEAN ROOM")? else {
            return Ok(Flow::Exit);
        };
        match self.sim.clean_room(location.floor, location.room) {
            Ok(result) => writeln!(self.out, "{}", result.message)?,
            Err(e) => writeln!(self.out, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn reset_sensor(&mut self) -> Result<Flow> {
        let Some(location) = self.prompt_location("RESET SENSOR")? else {
            return Ok(Flow::Exit);
        };
        match self.sim.reset_sensor(location.floor, location.room) {
            Ok(result) => writeln!(self.out, "{}", result.message)?,
            Err(e) => writeln!(self.out, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    // ── Input ───────────────────────────────────────────────────────────

    /// One line without its terminator, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask until a whole number `>= min` is entered.
    fn prompt_number(&mut self, label: &str, min: usize) -> Result<Option<usize>> {
        loop {
            write!(self.out, "{label}: ")?;
            self.out.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match line.trim().parse::<usize>() {
                Ok(n) if n >= min => return Ok(Some(n)),
                _ => writeln!(self.out, "Please enter a whole number of at least {min}.")?,
            }
        }
    }

    fn prompt_location(&mut self, title: &str) -> Result<Option<Location>> {
        if self.sim.is_configured() {
            self.show_state()?;
        }
        writeln!(self.out, "\n{title}\n{RULE}")?;
        let Some(floor) = self.prompt_number("Floor", 0)? else {
            return Ok(None);
        };
        let Some(room) = self.prompt_number("Room", 0)? else {
            return Ok(None);
        };
        Ok(Some(Location::new(floor, room)))
    }
}
