use log::info;

use crate::simulation::StepResult;

/// Running totals across episodes of a run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub episodes: u32,
    pub steps: u32,
    pub total_reward: f64,
    pub vehicles_inserted: usize,
    pub arrivals_dropped: usize,
    pub vehicles_exited: usize,
}

impl RunStats {
    pub fn record_step(&mut self, step: &StepResult) {
        self.steps += 1;
        self.total_reward += f64::from(step.reward);
        self.vehicles_inserted += step.info.inserted;
        self.arrivals_dropped += step.info.dropped;
        self.vehicles_exited += step.info.exited;
    }

    pub fn finish_episode(&mut self) {
        self.episodes += 1;
    }

    /// Mean reward per episode
    pub fn mean_reward(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_reward / f64::from(self.episodes)
        }
    }

    pub fn log_summary(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Episodes run: {}", self.episodes);
        info!("Total steps: {}", self.steps);
        info!("Mean reward: {:.2}", self.mean_reward());
        info!("Vehicles inserted: {}", self.vehicles_inserted);
        info!("Arrivals dropped: {}", self.arrivals_dropped);
        info!("Vehicles exited: {}", self.vehicles_exited);
    }
}
