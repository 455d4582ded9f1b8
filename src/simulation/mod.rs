//! Four-approach signalised intersection simulation
//!
//! The traffic core (vehicles, lane queues, signal phases, the simulator)
//! plus a control environment that lets an external policy pick green splits.
//! Nothing here depends on a renderer.

mod arrivals;
mod config;
mod environment;
mod error;
mod lane;
mod signal;
mod simulator;
mod types;
mod vehicle;

pub use arrivals::{
    Arrival, ArrivalProcess, NoArrivals, RandomArrivals, ScheduledArrivals, ARRIVAL_CLASSES,
};
pub use config::{
    Approach, IntersectionConfig, DEFAULT_ARRIVAL_RATE, DEFAULT_CYCLE_LENGTH, DEFAULT_LANES,
    DEFAULT_MAX_VEHICLES_PER_LANE, DEFAULT_MOVING_GAP, DEFAULT_STOPPING_GAP, DEFAULT_YELLOW,
};
pub use environment::{GreenSplit, Observation, StepInfo, StepResult, TrafficSignalEnv};
pub use error::{ConfigError, EnvError};
pub use lane::{LaneQueue, LaneTick};
pub use signal::{LightState, SignalController, SignalGroup};
pub use simulator::{Insertion, IntervalReport, TrafficSimulator, VehicleView};
pub use types::{Axis, Bounds, Direction, Extent, Position, VehicleClass, VehicleId};
pub use vehicle::{MoveContext, Movement, Vehicle};
