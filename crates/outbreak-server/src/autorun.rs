//! Background loop that advances the shared simulation at a fixed cadence.
//!
//! At most one loop runs at a time. Each tick takes the simulation lock and
//! advances one turn, skipping ticks while no building exists or once the
//! game is over. Stopping goes through a oneshot channel and waits for the
//! task to finish, so no turn is applied after [`AutoRunner::stop`] returns.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::SharedSimulation;

struct RunHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

pub struct AutoRunner {
    sim: SharedSimulation,
    interval: Duration,
    running: Option<RunHandle>,
}

impl AutoRunner {
    pub fn new(sim: SharedSimulation, interval: Duration) -> Self {
        Self {
            sim,
            interval,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Spawn the loop. Returns `false` if it was already running.
    pub fn start(&mut self) -> bool {
        if self.running.is_some() {
            return false;
        }
        let (stop, stopped) = oneshot::channel();
        let task = tokio::spawn(run_loop(self.sim.clone(), self.interval, stopped));
        self.running = Some(RunHandle { stop, task });
        log::info!("auto-run started ({} ms per turn)", self.interval.as_millis());
        true
    }

    /// Signal the loop and wait for it to exit. Returns `false` if it was
    /// not running.
    pub async fn stop(&mut self) -> bool {
        let Some(handle) = self.running.take() else {
            return false;
        };
        // The loop may already be gone, in which case the receiver is closed.
        let _ = handle.stop.send(());
        if let Err(e) = handle.task.await {
            log::warn!("auto-run task ended abnormally: {e}");
        }
        log::info!("auto-run stopped");
        true
    }

    /// Bring the loop to the requested state and report the resulting one.
    pub async fn set_running(&mut self, run: bool) -> bool {
        if run {
            self.start();
        } else {
            self.stop().await;
        }
        self.is_running()
    }
}

async fn run_loop(sim: SharedSimulation, interval: Duration, mut stopped: oneshot::Receiver<()>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = &mut stopped => break,
            _ = ticker.tick() => {
                let mut sim = sim.lock().await;
                if !sim.is_configured() || sim.is_game_over() {
                    continue;
                }
                match sim.advance_turn() {
                    Ok(report) if report.game_over => {
                        log::info!("auto-run: game over on turn {}", report.turn);
                    }
                    Ok(report) => log::debug!("auto-run: turn {}", report.turn),
                    Err(e) => log::warn!("auto-run: {e}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outbreak_logic::Simulation;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn shared(configured: bool) -> SharedSimulation {
        let mut sim = Simulation::seeded(3);
        if configured {
            sim.setup(3, 4).unwrap();
            sim.add_initial_zombies(1).unwrap();
        }
        Arc::new(Mutex::new(sim))
    }

    #[tokio::test(start_paused = true)]
    async fn advances_while_running() {
        let sim = shared(true);
        let mut runner = AutoRunner::new(sim.clone(), Duration::from_millis(100));
        assert!(runner.start());
        assert!(!runner.start());

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(runner.stop().await);
        let turn = sim.lock().await.turn();
        assert!(turn >= 3, "turn {turn}");

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(sim.lock().await.turn(), turn);
        assert!(!runner.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn skips_unconfigured_simulation() {
        let sim = shared(false);
        let mut runner = AutoRunner::new(sim.clone(), Duration::from_millis(50));
        runner.start();
        tokio::time::sleep(Duration::from_millis(300)).await;
        runner.stop().await;
        assert_eq!(sim.lock().await.turn(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_advancing_after_game_over() {
        let sim = shared(false);
        {
            let mut s = sim.lock().await;
            s.setup(1, 1).unwrap();
            s.add_initial_zombies(2).unwrap();
        }
        let mut runner = AutoRunner::new(sim.clone(), Duration::from_millis(10));
        runner.start();
        tokio::time::sleep(Duration::from_millis(200)).await;
        runner.stop().await;
        // One turn to notice the full building, then nothing
        assert_eq!(sim.lock().await.turn(), 1);
    }

    #[tokio::test]
    async fn set_running_reports_state() {
        let mut runner = AutoRunner::new(shared(true), Duration::from_secs(1));
        assert!(runner.set_running(true).await);
        assert!(runner.set_running(true).await);
        assert!(!runner.set_running(false).await);
        assert!(!runner.stop().await);
    }
}
