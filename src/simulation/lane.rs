//! Per-lane vehicle queue
//!
//! Vehicles are kept in arrival order, which is also spatial order: the
//! front of the queue is the vehicle furthest along. Nothing ever reorders
//! a lane, so there is no overtaking.

use std::collections::VecDeque;

use super::config::Approach;
use super::types::{Direction, Position, VehicleClass, VehicleId};
use super::vehicle::{MoveContext, Movement, Vehicle};

/// Tally of one lane tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaneTick {
    pub moved: usize,
    pub waited: usize,
    pub held: usize,
}

impl LaneTick {
    fn record(&mut self, movement: Movement) {
        match movement {
            Movement::Moved => self.moved += 1,
            Movement::Waited => self.waited += 1,
            Movement::Held => self.held += 1,
        }
    }

    pub fn merge(&mut self, other: LaneTick) {
        self.moved += other.moved;
        self.waited += other.waited;
        self.held += other.held;
    }
}

/// Ordered vehicles of one (direction, lane)
#[derive(Debug, Clone)]
pub struct LaneQueue {
    pub direction: Direction,
    pub lane: usize,
    vehicles: VecDeque<Vehicle>,
    spawn_origin: Position,
    /// Where the next vehicle is placed; walks backwards as vehicles arrive
    spawn_cursor: Position,
    capacity: usize,
}

impl LaneQueue {
    pub fn new(direction: Direction, lane: usize, spawn: Position, capacity: usize) -> Self {
        Self {
            direction,
            lane,
            vehicles: VecDeque::new(),
            spawn_origin: spawn,
            spawn_cursor: spawn,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.vehicles.len() >= self.capacity
    }

    /// Front to back
    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Vehicle> {
        self.vehicles.get(index)
    }

    /// Position the next arrival will be placed at
    pub fn spawn_cursor(&self) -> Position {
        self.spawn_cursor
    }

    /// Append a vehicle at the tail of the lane
    ///
    /// Returns `None` when the lane is at capacity; the arrival is dropped.
    pub fn admit(
        &mut self,
        id: VehicleId,
        class: VehicleClass,
        approach: &Approach,
        stopping_gap: f32,
    ) -> Option<&Vehicle> {
        if self.is_full() {
            return None;
        }

        let vehicle = Vehicle::spawn(
            id,
            self.direction,
            self.lane,
            class,
            self.spawn_cursor,
            self.vehicles.back(),
            approach.default_stop,
            stopping_gap,
        );

        let axis = self.direction.axis();
        self.spawn_cursor
            .shift(axis, -self.direction.sign() * (vehicle.length() + stopping_gap));

        self.vehicles.push_back(vehicle);
        self.vehicles.back()
    }

    /// Move every vehicle by one time unit, leader first
    ///
    /// Followers see their predecessor's position from this same unit.
    pub fn advance(&mut self, ctx: &MoveContext) -> LaneTick {
        let mut tick = LaneTick::default();
        let vehicles = self.vehicles.make_contiguous();

        for index in 0..vehicles.len() {
            let (ahead, rest) = vehicles.split_at_mut(index);
            let movement = rest[0].advance(ahead.last(), ctx);
            tick.record(movement);
        }

        tick
    }

    /// Drop leaders that have driven off the canvas, returning how many left
    pub fn release_exited(&mut self, limit: f32) -> usize {
        let mut released = 0;
        while self
            .vehicles
            .front()
            .is_some_and(|vehicle| vehicle.has_left(limit))
        {
            self.vehicles.pop_front();
            released += 1;
        }
        released
    }

    /// Sum of the waiting counters of vehicles still in the lane
    pub fn waiting_time(&self) -> u64 {
        self.vehicles
            .iter()
            .map(|vehicle| u64::from(vehicle.waiting_time()))
            .sum()
    }

    /// Empty the lane and rewind the spawn cursor
    pub fn clear(&mut self) {
        self.vehicles.clear();
        self.spawn_cursor = self.spawn_origin;
    }
}
