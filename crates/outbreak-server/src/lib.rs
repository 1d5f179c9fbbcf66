//! HTTP service for the outbreak simulation.
//!
//! One [`Simulation`] instance lives behind a single `tokio::sync::Mutex`;
//! every request that touches it holds the lock for the whole call, so turn
//! advances and manual interventions never interleave. The optional
//! [`AutoRunner`] takes the same lock on every tick.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`autorun`] | Background turn loop with oneshot cancellation |
//! | [`config`] | Command-line and environment settings |
//! | [`error`] | `ApiError` rejection and JSON error bodies |
//! | [`routes`] | warp filters for `/health` and `/api/simulation/*` |

use std::sync::Arc;

use outbreak_logic::Simulation;
use tokio::sync::Mutex;

pub mod autorun;
pub mod config;
pub mod error;
pub mod routes;

pub use autorun::AutoRunner;
pub use config::ServerArgs;
pub use routes::routes;

/// The simulation shared by all requests and the auto-run loop.
pub type SharedSimulation = Arc<Mutex<Simulation>>;

/// Everything a request handler needs.
#[derive(Clone)]
pub struct AppState {
    pub sim: SharedSimulation,
    pub autorun: Arc<Mutex<AutoRunner>>,
}

impl AppState {
    pub fn new(sim: Simulation, args: &ServerArgs) -> Self {
        let sim = Arc::new(Mutex::new(sim));
        let autorun = AutoRunner::new(sim.clone(), args.tick_interval());
        Self {
            sim,
            autorun: Arc::new(Mutex::new(autorun)),
        }
    }

    /// Build from parsed arguments, seeding the engine when asked to.
    pub fn from_args(args: &ServerArgs) -> Self {
        let sim = match args.seed {
            Some(seed) => Simulation::seeded(seed),
            None => Simulation::new(),
        };
        Self::new(sim, args)
    }

    /// Stop the auto-run loop if it is running.
    pub async fn shutdown(&self) {
        self.autorun.lock().await.stop().await;
    }
}
