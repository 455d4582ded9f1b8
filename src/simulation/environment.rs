//! Control environment around the intersection simulator
//!
//! A policy picks how the cycle is split between the two axes; the
//! environment runs one full cycle and answers with queue lengths and the
//! negated waiting time of the interval.

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::arrivals::{ArrivalProcess, RandomArrivals};
use super::config::IntersectionConfig;
use super::error::{ConfigError, EnvError};
use super::signal::SignalController;
use super::simulator::{Insertion, TrafficSimulator, VehicleView};
use super::types::{Axis, Direction, VehicleClass};

/// Vehicles queued on each axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Observation {
    pub ns: usize,
    pub ew: usize,
}

impl Observation {
    pub fn as_array(&self) -> [usize; 2] {
        [self.ns, self.ew]
    }
}

/// Green time assigned to each axis for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreenSplit {
    pub ns: u32,
    pub ew: u32,
}

/// Auxiliary data returned alongside each step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    pub green: GreenSplit,
    pub elapsed: u32,
    pub waiting_time: u64,
    /// Waiting counters of all vehicles still queued, accumulated over the episode
    pub queued_waiting_time: u64,
    pub inserted: usize,
    pub dropped: usize,
    pub exited: usize,
    /// Vehicles per lane, indexed by direction then lane
    pub lane_counts: [Vec<usize>; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

/// Traffic signal control environment
pub struct TrafficSignalEnv {
    config: IntersectionConfig,
    simulator: TrafficSimulator,
    signals: SignalController,
    arrivals: Box<dyn ArrivalProcess>,
    rng: StdRng,
    state: Observation,
}

impl TrafficSignalEnv {
    /// Environment with uniform random arrivals at `config.arrival_rate`
    pub fn new(config: IntersectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let arrivals = RandomArrivals::uniform(config.arrival_rate, config.lanes)?;
        Self::with_arrivals(config, Box::new(arrivals))
    }

    pub fn with_arrivals(
        config: IntersectionConfig,
        arrivals: Box<dyn ArrivalProcess>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            simulator: TrafficSimulator::new(&config),
            signals: SignalController::new(config.cycle_length, config.yellow),
            config,
            arrivals,
            rng,
            state: Observation::default(),
        })
    }

    pub fn config(&self) -> &IntersectionConfig {
        &self.config
    }

    /// Number of valid actions
    pub fn action_count(&self) -> usize {
        self.config.action_count()
    }

    /// Map an action to its green split: NS gets `action + 1`, EW the rest
    pub fn green_split(&self, action: usize) -> Result<GreenSplit, EnvError> {
        let actions = self.action_count();
        if action >= actions {
            return Err(EnvError::InvalidAction { action, actions });
        }
        let ns = action as u32 + 1;
        Ok(GreenSplit {
            ns,
            ew: self.config.cycle_length - ns,
        })
    }

    /// Start a new episode with empty lanes; returns the zero observation
    pub fn reset(&mut self) -> Observation {
        self.simulator.reset();
        self.signals = SignalController::new(self.config.cycle_length, self.config.yellow);
        self.state = Observation::default();
        self.state
    }

    /// Reseed the RNG, then reset
    pub fn reset_with_seed(&mut self, seed: u64) -> Observation {
        self.rng = StdRng::seed_from_u64(seed);
        self.reset()
    }

    pub fn is_done(&self) -> bool {
        self.simulator.elapsed >= self.config.episode_length()
    }

    /// Run one decision interval with the green split chosen by `action`
    ///
    /// On error nothing about the episode changes.
    pub fn step(&mut self, action: usize) -> Result<StepResult, EnvError> {
        let green = self.green_split(action)?;
        if self.is_done() {
            return Err(EnvError::EpisodeFinished {
                elapsed: self.simulator.elapsed,
            });
        }

        let checkpoint = (
            self.simulator.clone(),
            self.signals.clone(),
            self.rng.clone(),
        );
        self.signals.assign_windows(green.ns, green.ew);

        let report = match self.simulator.advance_interval(
            green.ns,
            green.ew,
            &mut self.signals,
            self.arrivals.as_mut(),
            &mut self.rng,
        ) {
            Ok(report) => report,
            Err(err) => {
                (self.simulator, self.signals, self.rng) = checkpoint;
                return Err(err);
            }
        };

        self.state = self.observation();
        let reward = -(report.waiting_time as f32);
        let done = self.is_done();

        debug!(
            "t={} green NS={} EW={} obs=({}, {}) reward={:.1}",
            self.simulator.elapsed, green.ns, green.ew, self.state.ns, self.state.ew, reward
        );

        Ok(StepResult {
            observation: self.state,
            reward,
            terminated: done,
            truncated: done,
            info: StepInfo {
                green,
                elapsed: self.simulator.elapsed,
                waiting_time: report.waiting_time,
                queued_waiting_time: self.simulator.total_waiting_time(),
                inserted: report.inserted,
                dropped: report.dropped,
                exited: report.exited,
                lane_counts: self.simulator.lane_counts(),
            },
        })
    }

    /// Current vehicle count per axis
    pub fn observation(&self) -> Observation {
        Observation {
            ns: self.simulator.axis_count(Axis::NorthSouth),
            ew: self.simulator.axis_count(Axis::EastWest),
        }
    }

    /// Manually add a vehicle, outside the arrival process
    pub fn insert_vehicle(
        &mut self,
        direction: Direction,
        lane: usize,
        class: VehicleClass,
    ) -> Result<Insertion, EnvError> {
        self.simulator.insert_vehicle(direction, lane, class)
    }

    pub fn elapsed(&self) -> u32 {
        self.simulator.elapsed
    }

    pub fn signals(&self) -> &SignalController {
        &self.signals
    }

    pub fn simulator(&self) -> &TrafficSimulator {
        &self.simulator
    }

    pub fn vehicles(&self) -> impl Iterator<Item = VehicleView> + '_ {
        self.simulator.vehicles()
    }
}
