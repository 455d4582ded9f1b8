//! Error types for the intersection simulation

use thiserror::Error;

use super::types::Direction;

/// Contract violations by the caller of a running environment
///
/// Any of these aborts the call before episode state is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    #[error("action {action} out of range (expected 0..{actions})")]
    InvalidAction { action: usize, actions: usize },
    #[error("lane {lane} does not exist on the {direction} approach ({lanes} lanes)")]
    UnknownLane {
        direction: Direction,
        lane: usize,
        lanes: usize,
    },
    #[error("episode already finished at t={elapsed}, call reset first")]
    EpisodeFinished { elapsed: u32 },
}

/// Malformed configuration, rejected before a simulation is built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("cycle length {0} is too short, need at least 2 units")]
    CycleTooShort(u32),
    #[error("episode must span at least one cycle")]
    NoEpisodeCycles,
    #[error("{episode_cycles} cycles of {cycle_length} units overflow the episode clock")]
    EpisodeTooLong {
        cycle_length: u32,
        episode_cycles: u32,
    },
    #[error("intersection needs at least one lane per approach")]
    NoLanes,
    #[error("max vehicles per lane must be positive")]
    ZeroCapacity,
    #[error("{direction} approach has {found} spawn points, expected {expected}")]
    SpawnTable {
        direction: Direction,
        expected: usize,
        found: usize,
    },
    #[error("{direction} default stop {default_stop} lies past the stop line {stop_line}")]
    StopPastLine {
        direction: Direction,
        default_stop: f32,
        stop_line: f32,
    },
    #[error("gap {0} must be finite and non-negative")]
    InvalidGap(f32),
    #[error("{direction} approach has {found} arrival rates, expected {expected}")]
    RateTable {
        direction: Direction,
        expected: usize,
        found: usize,
    },
    #[error("arrival rate {0} must be within [0, 1]")]
    ArrivalRate(f64),
    #[error("yellow time {yellow} must be shorter than the cycle ({cycle_length})")]
    YellowTooLong { yellow: u32, cycle_length: u32 },
}
