//! Vehicle movement logic for the intersection simulation
//!
//! Every direction is handled by the same code: positions are projected onto
//! the travel axis and multiplied by the direction sign, so "ahead of" always
//! means a larger projected value.

use super::types::{Direction, Position, VehicleClass, VehicleId};

/// What happened to a vehicle during one time unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Advanced by its class speed
    Moved,
    /// Held before the stop line; counts as waiting time
    Waited,
    /// Held by the vehicle ahead after crossing; not counted as waiting
    Held,
}

/// Per-lane inputs to a single movement decision
#[derive(Debug, Clone, Copy)]
pub struct MoveContext {
    /// Front-edge coordinate past which a vehicle has crossed
    pub stop_line: f32,
    /// The approach has green and no yellow is pending
    pub signal_go: bool,
    pub moving_gap: f32,
}

/// A vehicle approaching the intersection
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub direction: Direction,
    pub lane: usize,
    pub class: VehicleClass,
    position: Position,
    /// Front-edge coordinate where this vehicle halts while it may not cross
    stop: f32,
    crossed: bool,
    waiting_time: u32,
}

impl Vehicle {
    /// Create a vehicle at `position`, queued behind `predecessor` if there is one
    ///
    /// While the predecessor has not crossed, the stop position is the
    /// predecessor's stop pushed back by its length plus `stopping_gap`.
    /// Otherwise the vehicle stops at the approach's `default_stop`.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        id: VehicleId,
        direction: Direction,
        lane: usize,
        class: VehicleClass,
        position: Position,
        predecessor: Option<&Vehicle>,
        default_stop: f32,
        stopping_gap: f32,
    ) -> Self {
        let stop = match predecessor {
            Some(ahead) if !ahead.crossed => {
                ahead.stop - direction.sign() * (ahead.length() + stopping_gap)
            }
            _ => default_stop,
        };

        Self {
            id,
            direction,
            lane,
            class,
            position,
            stop,
            crossed: false,
            waiting_time: 0,
        }
    }

    /// Minimum corner of the vehicle's footprint
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn stop(&self) -> f32 {
        self.stop
    }

    pub fn crossed(&self) -> bool {
        self.crossed
    }

    /// Time units spent held before the stop line
    pub fn waiting_time(&self) -> u32 {
        self.waiting_time
    }

    pub fn speed(&self) -> f32 {
        self.class.speed()
    }

    pub fn length(&self) -> f32 {
        self.class.extent().length
    }

    /// Coordinate of the leading edge on the travel axis
    pub fn front(&self) -> f32 {
        let anchor = self.position.along(self.direction.axis());
        if self.direction.sign() > 0.0 {
            anchor + self.length()
        } else {
            anchor
        }
    }

    /// Coordinate of the trailing edge on the travel axis
    pub fn rear(&self) -> f32 {
        let anchor = self.position.along(self.direction.axis());
        if self.direction.sign() > 0.0 {
            anchor
        } else {
            anchor + self.length()
        }
    }

    /// Project a travel-axis coordinate so that larger is further along
    fn progress(&self, coordinate: f32) -> f32 {
        self.direction.sign() * coordinate
    }

    /// Whether the vehicle's rear edge has left a canvas of the given size
    pub fn has_left(&self, limit: f32) -> bool {
        if self.direction.sign() > 0.0 {
            self.rear() > limit
        } else {
            self.rear() < 0.0
        }
    }

    /// Advance by one time unit
    ///
    /// The vehicle moves when it (has not reached its stop, or has crossed,
    /// or has a clean green) and (leads its lane, or keeps the moving gap
    /// to its predecessor).
    pub fn advance(&mut self, predecessor: Option<&Vehicle>, ctx: &MoveContext) -> Movement {
        if !self.crossed && self.progress(self.front()) > self.progress(ctx.stop_line) {
            self.crossed = true;
        }

        let may_approach = self.progress(self.front()) <= self.progress(self.stop)
            || self.crossed
            || ctx.signal_go;

        let has_room = match predecessor {
            None => true,
            Some(ahead) => {
                self.progress(self.front()) < self.progress(ahead.rear()) - ctx.moving_gap
            }
        };

        if may_approach && has_room {
            let axis = self.direction.axis();
            self.position.shift(axis, self.direction.sign() * self.speed());
            Movement::Moved
        } else if self.crossed {
            Movement::Held
        } else {
            self.waiting_time += 1;
            Movement::Waited
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> MoveContext {
        MoveContext {
            stop_line: 330.0,
            signal_go: false,
            moving_gap: 15.0,
        }
    }

    fn car_at(y: f32, stop: f32) -> Vehicle {
        Vehicle::spawn(
            VehicleId(0),
            Direction::Down,
            0,
            VehicleClass::Car,
            Position::new(755.0, y),
            None,
            stop,
            15.0,
        )
    }

    #[test]
    fn crossed_flag_never_resets() {
        let mut vehicle = car_at(295.0, 320.0);
        // front edge at 335 is already past the stop line at 330
        assert_eq!(vehicle.advance(None, &red()), Movement::Moved);
        assert!(vehicle.crossed());

        vehicle.position.y = 0.0;
        vehicle.advance(None, &red());
        assert!(vehicle.crossed());
    }

    #[test]
    fn green_moves_the_vehicle_forward_only() {
        let go = MoveContext {
            signal_go: true,
            ..red()
        };
        let mut vehicle = car_at(200.0, 320.0);

        for _ in 0..80 {
            let before = vehicle.position();
            assert_eq!(vehicle.advance(None, &go), Movement::Moved);
            assert!(vehicle.position().y > before.y);
            assert_eq!(vehicle.position().x, before.x);
        }
        assert_eq!(vehicle.stop(), 320.0);
        assert!(vehicle.crossed());
    }

    #[test]
    fn waiting_only_accrues_before_crossing() {
        let mut leader = car_at(400.0, 320.0);
        leader.advance(None, &red());
        assert!(leader.crossed());

        // follower crossed too but is glued to the leader's rear
        let mut follower = car_at(leader.rear() - 40.0 - 10.0, 320.0);
        follower.crossed = true;
        assert_eq!(follower.advance(Some(&leader), &red()), Movement::Held);
        assert_eq!(follower.waiting_time(), 0);
    }
}
