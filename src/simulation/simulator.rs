//! Discrete-time traffic simulator
//!
//! Owns every lane queue for the duration of an episode and advances them in
//! whole time units, gated by the signal controller.

use log::{debug, warn};
use rand::rngs::StdRng;

use super::arrivals::{Arrival, ArrivalProcess};
use super::config::IntersectionConfig;
use super::error::EnvError;
use super::lane::{LaneQueue, LaneTick};
use super::signal::SignalController;
use super::types::{Axis, Direction, Position, VehicleClass, VehicleId};
use super::vehicle::{MoveContext, Vehicle};

/// Outcome of `insert_vehicle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted(VehicleId),
    /// The lane was at capacity; the vehicle was not added
    Dropped,
}

/// What a renderer may know about a vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleView {
    pub direction: Direction,
    pub lane: usize,
    pub class: VehicleClass,
    pub position: Position,
}

impl From<&Vehicle> for VehicleView {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            direction: vehicle.direction,
            lane: vehicle.lane,
            class: vehicle.class,
            position: vehicle.position(),
        }
    }
}

/// Totals for one simulated decision interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalReport {
    /// Waiting time accrued by all vehicles during the interval
    pub waiting_time: u64,
    pub inserted: usize,
    pub dropped: usize,
    pub exited: usize,
    pub movement: LaneTick,
}

/// The traffic micro-simulation of one intersection
#[derive(Debug, Clone)]
pub struct TrafficSimulator {
    config: IntersectionConfig,
    /// Indexed by `direction.index() * lanes + lane`
    lanes: Vec<LaneQueue>,
    next_id: usize,
    /// Simulated time units since the episode started
    pub elapsed: u32,
    /// Arrivals rejected because their lane was full
    pub dropped: usize,
    /// Vehicles that drove off the canvas, per direction
    pub exited: [usize; 4],
    arrival_buffer: Vec<Arrival>,
}

impl TrafficSimulator {
    /// Build an empty intersection; `config` must already be validated
    pub fn new(config: &IntersectionConfig) -> Self {
        let lanes = Direction::ALL
            .iter()
            .flat_map(|&direction| {
                config
                    .approach(direction)
                    .spawn
                    .iter()
                    .enumerate()
                    .map(move |(lane, &spawn)| {
                        LaneQueue::new(direction, lane, spawn, config.max_vehicles_per_lane)
                    })
            })
            .collect();

        Self {
            config: config.clone(),
            lanes,
            next_id: 0,
            elapsed: 0,
            dropped: 0,
            exited: [0; 4],
            arrival_buffer: Vec::new(),
        }
    }

    fn lane_index(&self, direction: Direction, lane: usize) -> Result<usize, EnvError> {
        if lane >= self.config.lanes {
            return Err(EnvError::UnknownLane {
                direction,
                lane,
                lanes: self.config.lanes,
            });
        }
        Ok(direction.index() * self.config.lanes + lane)
    }

    pub fn lane(&self, direction: Direction, lane: usize) -> Option<&LaneQueue> {
        let index = self.lane_index(direction, lane).ok()?;
        self.lanes.get(index)
    }

    fn lanes_of(&self, direction: Direction) -> &[LaneQueue] {
        let start = direction.index() * self.config.lanes;
        &self.lanes[start..start + self.config.lanes]
    }

    /// Add a vehicle at the tail of a lane, at that lane's spawn cursor
    ///
    /// A full lane drops the vehicle and bumps the `dropped` counter.
    pub fn insert_vehicle(
        &mut self,
        direction: Direction,
        lane: usize,
        class: VehicleClass,
    ) -> Result<Insertion, EnvError> {
        let index = self.lane_index(direction, lane)?;
        let id = VehicleId(self.next_id);
        let approach = self.config.approach(direction);

        match self.lanes[index].admit(id, class, approach, self.config.stopping_gap) {
            Some(vehicle) => {
                debug!(
                    "Inserted {} {:?} into {} lane {} (stop at {:.1})",
                    class.name(),
                    id,
                    direction,
                    lane,
                    vehicle.stop()
                );
                self.next_id += 1;
                Ok(Insertion::Inserted(id))
            }
            None => {
                self.dropped += 1;
                debug!(
                    "Dropped {} arrival, {} lane {} is full",
                    class.name(),
                    direction,
                    lane
                );
                Ok(Insertion::Dropped)
            }
        }
    }

    /// Move every vehicle of both directions of `axis` by one time unit
    pub fn tick_axis(&mut self, axis: Axis, signals: &SignalController) -> LaneTick {
        let signal_go = signals.allows(axis);
        let mut tick = LaneTick::default();

        for direction in axis.directions() {
            let ctx = MoveContext {
                stop_line: self.config.approach(direction).stop_line,
                signal_go,
                moving_gap: self.config.moving_gap,
            };
            let start = direction.index() * self.config.lanes;
            for lane in &mut self.lanes[start..start + self.config.lanes] {
                tick.merge(lane.advance(&ctx));
            }
        }

        tick
    }

    /// Remove vehicles that have left the canvas, returning how many did
    fn release_exited(&mut self) -> usize {
        let bounds = self.config.bounds;
        let mut released = 0;
        for lane in &mut self.lanes {
            let count = lane.release_exited(bounds.limit(lane.direction.axis()));
            self.exited[lane.direction.index()] += count;
            released += count;
        }
        released
    }

    fn admit_arrivals(
        &mut self,
        arrivals: &mut dyn ArrivalProcess,
        rng: &mut StdRng,
        report: &mut IntervalReport,
    ) -> Result<(), EnvError> {
        let mut buffer = std::mem::take(&mut self.arrival_buffer);
        buffer.clear();
        arrivals.arrivals(self.elapsed, rng, &mut buffer);

        let mut result = Ok(());
        for arrival in &buffer {
            match self.insert_vehicle(arrival.direction, arrival.lane, arrival.class) {
                Ok(Insertion::Inserted(_)) => report.inserted += 1,
                Ok(Insertion::Dropped) => report.dropped += 1,
                Err(err) => {
                    result = Err(err);
                    break;
                }
            }
        }

        self.arrival_buffer = buffer;
        result
    }

    /// Simulate one decision interval
    ///
    /// Runs `green_ns` units moving only NS vehicles, then `green_ew` units
    /// moving only EW vehicles. Each unit first admits arrivals, then moves
    /// the active axis, releases vehicles that left the canvas and advances
    /// the signals.
    pub fn advance_interval(
        &mut self,
        green_ns: u32,
        green_ew: u32,
        signals: &mut SignalController,
        arrivals: &mut dyn ArrivalProcess,
        rng: &mut StdRng,
    ) -> Result<IntervalReport, EnvError> {
        let mut report = IntervalReport::default();

        for (axis, units) in [(Axis::NorthSouth, green_ns), (Axis::EastWest, green_ew)] {
            for _ in 0..units {
                self.admit_arrivals(arrivals, rng, &mut report)?;
                let tick = self.tick_axis(axis, signals);
                report.waiting_time += tick.waited as u64;
                report.movement.merge(tick);
                report.exited += self.release_exited();
                signals.tick();
                self.elapsed += 1;
            }
        }

        if report.dropped > 0 {
            warn!(
                "{} arrivals dropped at capacity ({} per lane)",
                report.dropped, self.config.max_vehicles_per_lane
            );
        }

        Ok(report)
    }

    /// Vehicles currently on the approaches of `axis`
    pub fn axis_count(&self, axis: Axis) -> usize {
        axis.directions()
            .iter()
            .map(|&direction| self.direction_count(direction))
            .sum()
    }

    pub fn direction_count(&self, direction: Direction) -> usize {
        self.lanes_of(direction).iter().map(LaneQueue::len).sum()
    }

    /// Vehicle count of every lane, indexed by direction then lane
    pub fn lane_counts(&self) -> [Vec<usize>; 4] {
        Direction::ALL.map(|direction| {
            self.lanes_of(direction)
                .iter()
                .map(LaneQueue::len)
                .collect()
        })
    }

    /// Sum of the waiting counters of every vehicle still on the canvas
    pub fn total_waiting_time(&self) -> u64 {
        self.lanes.iter().map(LaneQueue::waiting_time).sum()
    }

    pub fn vehicle_count(&self) -> usize {
        self.lanes.iter().map(LaneQueue::len).sum()
    }

    /// Snapshot of every vehicle for a renderer
    pub fn vehicles(&self) -> impl Iterator<Item = VehicleView> + '_ {
        self.lanes
            .iter()
            .flat_map(|lane| lane.iter().map(VehicleView::from))
    }

    /// Clear all lanes and counters for a new episode
    pub fn reset(&mut self) {
        for lane in &mut self.lanes {
            lane.clear();
        }
        self.next_id = 0;
        self.elapsed = 0;
        self.dropped = 0;
        self.exited = [0; 4];
    }
}
