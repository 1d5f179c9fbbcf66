//! Outbreak Headless Simulation Harness
//!
//! Drives the real engine over many seeded runs and checks the building,
//! spread, sensor and evasion properties. Runs entirely in-process: no
//! server, no terminal UI.
//!
//! Usage:
//!   cargo run -p outbreak-simtest
//!   cargo run -p outbreak-simtest -- --verbose

use outbreak_logic::practicante::assess;
use outbreak_logic::{
    Building, GameOverReason, Location, SimError, Simulation, SimulationConfig,
};
use rand::rngs::mock::StepRng;

/// Building shapes swept by the structural checks.
const SHAPES: &[(usize, usize)] = &[(1, 1), (1, 8), (2, 3), (3, 5), (5, 1), (10, 10), (25, 4)];

/// Seeds per dynamic check.
const SEEDS: u64 = 200;

/// Turns simulated per seed.
const TURNS: usize = 60;

/// Upper bound on turns before the termination check gives up.
const TERMINATION_CAP: usize = 10_000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Outbreak Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Building shape and adjacency
    results.extend(validate_building(verbose));

    // 2. Zombie spread
    results.extend(validate_spread(verbose));

    // 3. Termination
    results.extend(validate_termination(verbose));

    // 4. Practicante evasion
    results.extend(validate_evasion(verbose));

    // 5. Manual interventions
    results.extend(validate_interventions(verbose));

    // 6. Errors and snapshots
    results.extend(validate_api_surface(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn seeded_run(seed: u64, floors: usize, rooms: usize, zombies: usize) -> Simulation {
    let mut sim = Simulation::seeded(seed);
    let config = SimulationConfig {
        floors,
        rooms_per_floor: rooms,
        initial_zombies: zombies,
        zombie_generation: false,
        seed: Some(seed),
    };
    if let Err(e) = sim.apply_config(&config) {
        panic!("harness setup {floors}x{rooms} failed: {e}");
    }
    sim
}

// ── 1. Building ─────────────────────────────────────────────────────────

fn validate_building(verbose: bool) -> Vec<TestResult> {
    println!("--- Building ---");
    let mut results = Vec::new();

    let mut one_way = Vec::new();
    let mut bad_stairs = Vec::new();
    let mut bad_counts = Vec::new();
    let mut disconnected = Vec::new();

    for &(floors, rooms) in SHAPES {
        let b = match Building::new(floors, rooms) {
            Ok(b) => b,
            Err(e) => {
                bad_counts.push(format!("{floors}x{rooms}: {e}"));
                continue;
            }
        };
        if b.total_rooms() != floors * (rooms + 1) {
            bad_counts.push(format!("{floors}x{rooms}: {} rooms", b.total_rooms()));
        }

        for room in b.rooms() {
            for &n in room.adjacent() {
                if !b.room(n).is_adjacent_to(room.id()) {
                    one_way.push(format!("{} -> {}", room.location(), b.location_of(n)));
                }
            }
        }

        for floor in b.floors() {
            let sensorless: Vec<Location> = floor
                .rooms()
                .iter()
                .map(|&id| b.room(id))
                .filter(|r| r.sensor().is_none())
                .map(|r| r.location())
                .collect();
            if sensorless != vec![Location::new(floor.index(), 0)] {
                bad_stairs.push(format!("floor {}: {:?}", floor.index(), sensorless));
            }
            for &id in floor.rooms() {
                let room = b.room(id);
                let crosses = room
                    .adjacent()
                    .iter()
                    .any(|&n| b.location_of(n).floor != floor.index());
                if crosses && !room.is_staircase() {
                    bad_stairs.push(format!("{} links floors", room.location()));
                }
            }
        }

        if !b.is_connected() {
            disconnected.push(format!("{floors}x{rooms}"));
        }

        if verbose {
            println!("  {floors}x{rooms}: {} rooms", b.total_rooms());
        }
    }

    results.push(TestResult {
        name: "building_room_counts".into(),
        passed: bad_counts.is_empty(),
        detail: if bad_counts.is_empty() {
            format!("{} shapes built with floors x (rooms + 1) rooms", SHAPES.len())
        } else {
            bad_counts.join(", ")
        },
    });

    results.push(TestResult {
        name: "building_adjacency_symmetric".into(),
        passed: one_way.is_empty(),
        detail: if one_way.is_empty() {
            "every link is two-way".into()
        } else {
            format!("{} one-way links, first {}", one_way.len(), one_way[0])
        },
    });

    results.push(TestResult {
        name: "building_staircase_exclusive".into(),
        passed: bad_stairs.is_empty(),
        detail: if bad_stairs.is_empty() {
            "one sensorless staircase per floor, only staircases link floors".into()
        } else {
            bad_stairs.join("; ")
        },
    });

    results.push(TestResult {
        name: "building_connected".into(),
        passed: disconnected.is_empty(),
        detail: if disconnected.is_empty() {
            "every room reachable from every other".into()
        } else {
            format!("disconnected: {}", disconnected.join(", "))
        },
    });

    let zero = [Building::new(0, 3).is_err(), Building::new(3, 0).is_err()];
    results.push(TestResult {
        name: "building_rejects_zero_counts".into(),
        passed: zero.iter().all(|&e| e),
        detail: format!("0x3 rejected: {}, 3x0 rejected: {}", zero[0], zero[1]),
    });

    results
}

// ── 2. Spread ───────────────────────────────────────────────────────────

fn validate_spread(verbose: bool) -> Vec<TestResult> {
    println!("--- Spread ---");
    let mut results = Vec::new();

    let mut conservation = Vec::new();
    let mut snapshot = Vec::new();
    let mut sensors = Vec::new();
    let mut collisions = 0usize;
    let mut turns = 0usize;

    for seed in 0..SEEDS {
        let mut sim = seeded_run(seed, 4, 6, 1 + (seed as usize % 8));
        for _ in 0..TURNS {
            let Some(building) = sim.building() else {
                break;
            };
            let before: Vec<Location> = building
                .rooms()
                .iter()
                .filter(|r| r.has_zombies())
                .map(|r| r.location())
                .collect();
            let report = match sim.advance_turn() {
                Ok(r) => r,
                Err(e) => {
                    conservation.push(format!("seed {seed}: {e}"));
                    break;
                }
            };
            turns += 1;
            collisions += report.vacated_rooms.len() - report.infested_rooms.len();

            let expected = before.len() - report.vacated_rooms.len() + report.infested_rooms.len();
            if report.total_infested != expected {
                conservation.push(format!(
                    "seed {seed} turn {}: {} infested, expected {expected}",
                    report.turn, report.total_infested
                ));
            }

            if report.infested_rooms.iter().any(|l| before.contains(l))
                || report.vacated_rooms.iter().any(|l| !before.contains(l))
            {
                snapshot.push(format!("seed {seed} turn {}", report.turn));
            }

            if let Some(b) = sim.building() {
                for &loc in &report.infested_rooms {
                    if let Ok(room) = b.room_at(loc) {
                        if room.sensor().is_some() && !room.sensor_alert() {
                            sensors.push(format!("seed {seed}: {loc} entered silently"));
                        }
                    }
                }
            }
        }
    }

    if verbose {
        println!("  {turns} turns simulated, {collisions} destination collisions");
    }

    results.push(TestResult {
        name: "spread_conservation".into(),
        passed: conservation.is_empty(),
        detail: if conservation.is_empty() {
            format!("{turns} turns: infested = before - vacated + newly infested")
        } else {
            format!("{} violations, first: {}", conservation.len(), conservation[0])
        },
    });

    results.push(TestResult {
        name: "spread_uses_pre_turn_snapshot".into(),
        passed: snapshot.is_empty(),
        detail: if snapshot.is_empty() {
            "sources were infested and destinations clear before every turn".into()
        } else {
            format!("{} violations, first: {}", snapshot.len(), snapshot[0])
        },
    });

    results.push(TestResult {
        name: "spread_raises_sensors".into(),
        passed: sensors.is_empty(),
        detail: if sensors.is_empty() {
            "every entered regular room is in alert".into()
        } else {
            format!("{} violations, first: {}", sensors.len(), sensors[0])
        },
    });

    results
}

// ── 3. Termination ──────────────────────────────────────────────────────

fn validate_termination(verbose: bool) -> Vec<TestResult> {
    println!("--- Termination ---");
    let mut results = Vec::new();

    let mut slowest = 0usize;
    let mut stuck = Vec::new();
    for seed in 0..(SEEDS / 4) {
        let mut sim = seeded_run(seed, 2, 3, 1);
        sim.set_zombie_generation(true);
        let mut turns = 0;
        while !sim.is_game_over() && turns < TERMINATION_CAP {
            if sim.advance_turn().is_err() {
                break;
            }
            turns += 1;
        }
        if sim.game_over_reason() == Some(GameOverReason::AllInfested) {
            slowest = slowest.max(turns);
        } else {
            stuck.push(seed);
        }
    }
    if verbose {
        println!("  slowest run reached all_infested after {slowest} turns");
    }
    results.push(TestResult {
        name: "termination_all_infested".into(),
        passed: stuck.is_empty(),
        detail: if stuck.is_empty() {
            format!("every run ended all_infested (slowest {slowest} turns)")
        } else {
            format!("seeds not finished within {TERMINATION_CAP} turns: {stuck:?}")
        },
    });

    // Generation off: moves alone never grow the infestation
    let mut grew = Vec::new();
    for seed in 0..(SEEDS / 4) {
        let mut sim = seeded_run(seed, 3, 4, 3);
        let start = sim.building().map_or(0, |b| b.infested_count());
        for _ in 0..TURNS {
            match sim.advance_turn() {
                Ok(r) if r.total_infested > start => {
                    grew.push(seed);
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    }
    results.push(TestResult {
        name: "termination_moves_do_not_multiply".into(),
        passed: grew.is_empty(),
        detail: if grew.is_empty() {
            "without generation the infested count never exceeds its start".into()
        } else {
            format!("grew in seeds {grew:?}")
        },
    });

    results
}

// ── 4. Evasion ──────────────────────────────────────────────────────────

fn validate_evasion(verbose: bool) -> Vec<TestResult> {
    println!("--- Evasion ---");
    let mut results = Vec::new();

    let mut caught_after_safe = Vec::new();
    let mut on_staircase = Vec::new();
    let mut captures = 0usize;
    let mut safe_turns = 0usize;

    for seed in 0..SEEDS {
        let mut sim = seeded_run(seed, 3, 6, 4);
        match sim.add_practicante() {
            Ok(p) if p.added => {
                if p.location.is_some_and(|l| l.is_staircase()) {
                    on_staircase.push(seed);
                }
            }
            _ => continue,
        }

        for _ in 0..TURNS {
            if sim.is_game_over() {
                break;
            }
            let had_safe = match (sim.building(), sim.practicante()) {
                (Some(b), Some(p)) => b
                    .id_of(p.location())
                    .is_some_and(|id| !assess(b, id).safe.is_empty()),
                _ => false,
            };
            let Ok(report) = sim.advance_turn() else {
                break;
            };
            if report.captured {
                captures += 1;
            }
            if had_safe {
                safe_turns += 1;
                let landed = report.practicante.map(|s| s.to);
                if report.captured || landed.is_some_and(|l| report.infested_rooms.contains(&l)) {
                    caught_after_safe.push(format!("seed {seed} turn {}", report.turn));
                }
            }
        }
    }

    if verbose {
        println!("  {safe_turns} turns with a safe exit, {captures} captures overall");
    }

    results.push(TestResult {
        name: "evasion_safe_exit_survives".into(),
        passed: caught_after_safe.is_empty(),
        detail: if caught_after_safe.is_empty() {
            format!("{safe_turns} safe moves, none captured")
        } else {
            format!(
                "{} captures after a safe move, first {}",
                caught_after_safe.len(),
                caught_after_safe[0]
            )
        },
    });

    results.push(TestResult {
        name: "evasion_never_placed_on_staircase".into(),
        passed: on_staircase.is_empty(),
        detail: if on_staircase.is_empty() {
            "all placements in regular rooms".into()
        } else {
            format!("staircase placements in seeds {on_staircase:?}")
        },
    });

    results
}

// ── 5. Interventions ────────────────────────────────────────────────────

fn validate_interventions(_verbose: bool) -> Vec<TestResult> {
    println!("--- Interventions ---");
    let mut results = Vec::new();

    // Secret weapon with an always-succeeding source clears everything
    let mut sim = Simulation::with_rng(StepRng::new(0, 0));
    let cleared = sim.setup(2, 3).ok().and_then(|_| {
        for (f, r) in [(0, 1), (0, 3), (1, 1), (1, 2)] {
            sim.add_zombie_at(Location::new(f, r)).ok()?;
        }
        sim.use_secret_weapon().ok()
    });
    results.push(TestResult {
        name: "weapon_always_clear".into(),
        passed: cleared == Some(4),
        detail: format!("cleared {cleared:?} of 4"),
    });

    // Seeded: binomial count within bounds, sensors untouched
    let mut out_of_bounds = Vec::new();
    let mut total_cleared = 0usize;
    for seed in 0..SEEDS {
        let mut sim = seeded_run(seed, 2, 3, 4);
        let alerts_before = sim.get_state().map_or(0, |s| s.alerted_sensors());
        let Ok(n) = sim.use_secret_weapon() else {
            continue;
        };
        total_cleared += n;
        let state = sim.get_state();
        let ok = n <= 4
            && state
                .as_ref()
                .is_ok_and(|s| s.infested_rooms == 4 - n && s.alerted_sensors() == alerts_before);
        if !ok {
            out_of_bounds.push(seed);
        }
    }
    let mean = total_cleared as f64 / SEEDS as f64;
    results.push(TestResult {
        name: "weapon_binomial_bounds".into(),
        passed: out_of_bounds.is_empty() && (1.0..=3.0).contains(&mean),
        detail: format!("mean cleared {mean:.2} of 4, bad seeds {out_of_bounds:?}"),
    });

    // Clean keeps the sensor, reset clears it, staircases refuse
    let mut sim = seeded_run(1, 1, 3, 0);
    let steps = sim
        .add_zombie_at(Location::new(0, 2))
        .and_then(|_| sim.clean_room(0, 2))
        .and_then(|clean| {
            let alert = sim
                .building()
                .and_then(|b| b.room_at(Location::new(0, 2)).ok())
                .is_some_and(|r| r.sensor_alert());
            let reset = sim.reset_sensor(0, 2)?;
            let stairs = sim.reset_sensor(0, 0)?;
            Ok(clean.cleaned && alert && reset.reset && !stairs.reset)
        });
    results.push(TestResult {
        name: "clean_and_reset_sensor".into(),
        passed: steps == Ok(true),
        detail: format!("{steps:?}"),
    });

    results
}

// ── 6. API surface ──────────────────────────────────────────────────────

fn validate_api_surface(_verbose: bool) -> Vec<TestResult> {
    println!("--- API surface ---");
    let mut results = Vec::new();

    let mut sim = Simulation::seeded(0);
    let calls = [
        ("advance_turn", sim.advance_turn().err()),
        ("add_initial_zombies", sim.add_initial_zombies(1).err()),
        ("clean_room", sim.clean_room(0, 1).err()),
        ("reset_sensor", sim.reset_sensor(0, 1).err()),
        ("add_random_zombie", sim.add_random_zombie().err()),
        ("use_secret_weapon", sim.use_secret_weapon().err()),
        ("add_practicante", sim.add_practicante().err()),
        ("get_state", sim.get_state().err()),
    ];
    let wrong: Vec<&str> = calls
        .iter()
        .filter(|(_, e)| *e != Some(SimError::NotConfigured))
        .map(|(name, _)| *name)
        .collect();
    results.push(TestResult {
        name: "api_not_configured".into(),
        passed: wrong.is_empty(),
        detail: if wrong.is_empty() {
            format!("{} calls rejected before setup", calls.len())
        } else {
            format!("accepted before setup: {}", wrong.join(", "))
        },
    });

    let mut sim = seeded_run(3, 2, 3, 1);
    let json = sim
        .get_state()
        .ok()
        .and_then(|s| serde_json::to_value(&s).ok());
    let shape_ok = json.as_ref().is_some_and(|v| {
        ["turn", "floors", "rooms_per_floor", "total_rooms", "infested_rooms", "game_over"]
            .iter()
            .all(|k| v.get(k).is_some())
            && v["game_over_reason"].is_null()
            && v["building"].as_array().is_some_and(|f| f.len() == 2)
    });
    results.push(TestResult {
        name: "api_state_json_shape".into(),
        passed: shape_ok,
        detail: "state serializes with the documented fields".into(),
    });

    let second = sim.add_practicante().and_then(|_| sim.add_practicante());
    results.push(TestResult {
        name: "api_single_practicante".into(),
        passed: second == Err(SimError::AlreadyExists),
        detail: format!("second placement: {second:?}"),
    });

    results
}
