//! Static layout and timing of the intersection
//!
//! Everything here is fixed for the lifetime of an environment. `validate`
//! catches malformed tables up front so the simulator never has to.

use super::error::ConfigError;
use super::types::{Bounds, Direction, Position};

/// Length of one signal cycle, i.e. one decision interval
pub const DEFAULT_CYCLE_LENGTH: u32 = 30;

/// Maximum number of vehicles held by a single lane
pub const DEFAULT_MAX_VEHICLES_PER_LANE: usize = 40;

/// Lanes per approach
pub const DEFAULT_LANES: usize = 3;

/// Yellow clearance at the end of each axis window; off unless configured
pub const DEFAULT_YELLOW: u32 = 0;

/// Gap kept between queued vehicles when computing stop positions
pub const DEFAULT_STOPPING_GAP: f32 = 15.0;

/// Gap a vehicle needs to its predecessor before it may move
pub const DEFAULT_MOVING_GAP: f32 = 15.0;

/// Probability of an arrival per lane per time unit
pub const DEFAULT_ARRIVAL_RATE: f64 = 0.1;

/// Geometry of one approach
#[derive(Debug, Clone, PartialEq)]
pub struct Approach {
    /// Spawn coordinate of every lane, indexed by lane
    pub spawn: Vec<Position>,
    /// Front-edge coordinate past which a vehicle counts as crossed
    pub stop_line: f32,
    /// Front-edge coordinate where the lane leader halts on red
    pub default_stop: f32,
}

impl Approach {
    fn standard(direction: Direction) -> Self {
        let (spawn, stop_line, default_stop) = match direction {
            Direction::Right => ([(0.0, 348.0), (0.0, 370.0), (0.0, 398.0)], 590.0, 580.0),
            Direction::Down => ([(755.0, 0.0), (727.0, 0.0), (697.0, 0.0)], 330.0, 320.0),
            Direction::Left => (
                [(1400.0, 498.0), (1400.0, 466.0), (1400.0, 436.0)],
                800.0,
                810.0,
            ),
            Direction::Up => ([(602.0, 800.0), (627.0, 800.0), (657.0, 800.0)], 535.0, 545.0),
        };

        Self {
            spawn: spawn.iter().map(|&(x, y)| Position::new(x, y)).collect(),
            stop_line,
            default_stop,
        }
    }
}

/// Configuration of a four-approach signalised intersection
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionConfig {
    pub cycle_length: u32,
    /// Decision intervals per episode
    pub episode_cycles: u32,
    pub max_vehicles_per_lane: usize,
    pub lanes: usize,
    pub yellow: u32,
    pub stopping_gap: f32,
    pub moving_gap: f32,
    pub bounds: Bounds,
    /// Uniform arrival probability used by the default arrival process
    pub arrival_rate: f64,
    /// Seed for the environment RNG; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Indexed by `Direction::index`
    pub approaches: [Approach; 4],
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        Self {
            cycle_length: DEFAULT_CYCLE_LENGTH,
            episode_cycles: 1,
            max_vehicles_per_lane: DEFAULT_MAX_VEHICLES_PER_LANE,
            lanes: DEFAULT_LANES,
            yellow: DEFAULT_YELLOW,
            stopping_gap: DEFAULT_STOPPING_GAP,
            moving_gap: DEFAULT_MOVING_GAP,
            bounds: Bounds::default(),
            arrival_rate: DEFAULT_ARRIVAL_RATE,
            seed: None,
            approaches: Direction::ALL.map(Approach::standard),
        }
    }
}

impl IntersectionConfig {
    pub fn approach(&self, direction: Direction) -> &Approach {
        &self.approaches[direction.index()]
    }

    pub fn approach_mut(&mut self, direction: Direction) -> &mut Approach {
        &mut self.approaches[direction.index()]
    }

    /// Number of discrete actions: every NS green length from 1 to `cycle_length - 1`
    pub fn action_count(&self) -> usize {
        self.cycle_length.saturating_sub(1) as usize
    }

    /// Elapsed time at which an episode ends
    pub fn episode_length(&self) -> u32 {
        self.cycle_length.saturating_mul(self.episode_cycles)
    }

    /// Upper bound of either observation component
    pub fn observation_high(&self) -> usize {
        self.max_vehicles_per_lane * self.lanes * 2
    }

    /// Check every table and constant for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_length < 2 {
            return Err(ConfigError::CycleTooShort(self.cycle_length));
        }
        if self.episode_cycles == 0 {
            return Err(ConfigError::NoEpisodeCycles);
        }
        if self.cycle_length.checked_mul(self.episode_cycles).is_none() {
            return Err(ConfigError::EpisodeTooLong {
                cycle_length: self.cycle_length,
                episode_cycles: self.episode_cycles,
            });
        }
        if self.lanes == 0 {
            return Err(ConfigError::NoLanes);
        }
        if self.max_vehicles_per_lane == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.yellow >= self.cycle_length {
            return Err(ConfigError::YellowTooLong {
                yellow: self.yellow,
                cycle_length: self.cycle_length,
            });
        }
        for gap in [self.stopping_gap, self.moving_gap] {
            if !gap.is_finite() || gap < 0.0 {
                return Err(ConfigError::InvalidGap(gap));
            }
        }
        if !(0.0..=1.0).contains(&self.arrival_rate) {
            return Err(ConfigError::ArrivalRate(self.arrival_rate));
        }

        for direction in Direction::ALL {
            let approach = self.approach(direction);
            if approach.spawn.len() != self.lanes {
                return Err(ConfigError::SpawnTable {
                    direction,
                    expected: self.lanes,
                    found: approach.spawn.len(),
                });
            }
            let sign = direction.sign();
            if sign * approach.default_stop > sign * approach.stop_line {
                return Err(ConfigError::StopPastLine {
                    direction,
                    default_stop: approach.default_stop,
                    stop_line: approach.stop_line,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = IntersectionConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.action_count(), 29);
        assert_eq!(config.observation_high(), 240);
    }

    #[test]
    fn missing_spawn_point_is_rejected() {
        let mut config = IntersectionConfig::default();
        config.approach_mut(Direction::Up).spawn.pop();

        assert_eq!(
            config.validate(),
            Err(ConfigError::SpawnTable {
                direction: Direction::Up,
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn stop_downstream_of_line_is_rejected() {
        let mut config = IntersectionConfig::default();
        config.approach_mut(Direction::Left).default_stop = 790.0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::StopPastLine {
                direction: Direction::Left,
                ..
            })
        ));
    }

    #[test]
    fn episode_length_must_fit_the_clock() {
        let config = IntersectionConfig {
            episode_cycles: u32::MAX / 10,
            ..IntersectionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EpisodeTooLong {
                cycle_length: 30,
                episode_cycles: u32::MAX / 10,
            })
        );
        assert_eq!(config.episode_length(), u32::MAX);
    }

    #[test]
    fn yellow_must_fit_in_cycle() {
        let config = IntersectionConfig {
            yellow: 30,
            ..IntersectionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::YellowTooLong { .. })
        ));
    }
}
