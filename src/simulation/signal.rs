//! Signal phase controller
//!
//! Two signal groups, one per axis. Exactly one group is non-red at a time.
//! A group cycles red -> green -> yellow -> red; when the active group's
//! yellow runs out it turns red and the other group turns green.

use super::types::{Axis, Direction};

/// Light shown by a signal group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Red,
    Green,
    Yellow,
}

/// The signal heads of one axis, which always show the same light
#[derive(Debug, Clone)]
pub struct SignalGroup {
    pub axis: Axis,
    pub state: LightState,
    /// Green units in the current window
    pub green: u32,
    /// Yellow units in the current window
    pub yellow: u32,
    timer: u32,
}

impl SignalGroup {
    fn new(axis: Axis, green: u32, yellow: u32) -> Self {
        Self {
            axis,
            state: LightState::Red,
            green,
            yellow,
            timer: 0,
        }
    }

    /// Split an axis window of `window` units into green then yellow
    fn assign_window(&mut self, window: u32, yellow: u32) {
        self.yellow = yellow.min(window);
        self.green = window - self.yellow;
    }

    fn turn_green(&mut self) {
        self.timer = 0;
        self.state = if self.green == 0 && self.yellow > 0 {
            LightState::Yellow
        } else {
            LightState::Green
        };
    }

    fn turn_red(&mut self) {
        self.timer = 0;
        self.state = LightState::Red;
    }

    /// Advance one time unit; returns true once the group has cleared to red
    fn update(&mut self) -> bool {
        match self.state {
            LightState::Red => false,
            LightState::Green => {
                self.timer += 1;
                if self.timer >= self.green {
                    self.timer = 0;
                    if self.yellow == 0 {
                        self.turn_red();
                        return true;
                    }
                    self.state = LightState::Yellow;
                }
                false
            }
            LightState::Yellow => {
                self.timer += 1;
                if self.timer >= self.yellow {
                    self.turn_red();
                    return true;
                }
                false
            }
        }
    }

    /// Units left in the current light, zero while red
    pub fn remaining(&self) -> u32 {
        match self.state {
            LightState::Red => 0,
            LightState::Green => self.green.saturating_sub(self.timer),
            LightState::Yellow => self.yellow.saturating_sub(self.timer),
        }
    }
}

/// Holds which axis is green and drives both groups through their cycle
#[derive(Debug, Clone)]
pub struct SignalController {
    groups: [SignalGroup; 2],
    current_green: Axis,
    yellow: u32,
}

impl SignalController {
    /// Start with the NS axis green and the cycle split evenly
    pub fn new(cycle_length: u32, yellow: u32) -> Self {
        let half = cycle_length / 2;
        let mut controller = Self {
            groups: Axis::ALL.map(|axis| SignalGroup::new(axis, 0, 0)),
            current_green: Axis::NorthSouth,
            yellow,
        };
        controller.assign_windows(half, cycle_length - half);
        controller
    }

    /// Give each axis its window for the coming cycle and restart with NS green
    pub fn assign_windows(&mut self, green_ns: u32, green_ew: u32) {
        let yellow = self.yellow;
        self.groups[Axis::NorthSouth.index()].assign_window(green_ns, yellow);
        self.groups[Axis::EastWest.index()].assign_window(green_ew, yellow);
        self.restart(Axis::NorthSouth);
    }

    /// Make `axis` green from the start of its window, the other red
    pub fn restart(&mut self, axis: Axis) {
        self.current_green = axis;
        self.groups[axis.other().index()].turn_red();
        self.groups[axis.index()].turn_green();
    }

    /// Advance both groups by one time unit
    pub fn tick(&mut self) {
        let active = self.current_green;
        if self.groups[active.index()].update() {
            let next = active.other();
            self.current_green = next;
            self.groups[next.index()].turn_green();
        }
    }

    pub fn current_green(&self) -> Axis {
        self.current_green
    }

    /// The axis that turns green after the current one clears
    pub fn next_green(&self) -> Axis {
        self.current_green.other()
    }

    pub fn is_yellow(&self) -> bool {
        self.group(self.current_green).state == LightState::Yellow
    }

    /// Vehicles of `axis` may pass the stop line: green with no yellow pending
    pub fn allows(&self, axis: Axis) -> bool {
        self.group(axis).state == LightState::Green
    }

    pub fn group(&self, axis: Axis) -> &SignalGroup {
        &self.groups[axis.index()]
    }

    pub fn light(&self, direction: Direction) -> LightState {
        self.group(direction.axis()).state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_splits_green_then_yellow() {
        let mut signals = SignalController::new(30, 5);
        signals.assign_windows(12, 18);

        assert_eq!(signals.group(Axis::NorthSouth).green, 7);
        assert_eq!(signals.group(Axis::NorthSouth).yellow, 5);
        assert_eq!(signals.group(Axis::EastWest).green, 13);
    }

    #[test]
    fn short_window_is_all_yellow() {
        let mut signals = SignalController::new(30, 5);
        signals.assign_windows(2, 28);

        assert_eq!(signals.light(Direction::Down), LightState::Yellow);
        assert!(!signals.allows(Axis::NorthSouth));
        signals.tick();
        signals.tick();
        assert_eq!(signals.current_green(), Axis::EastWest);
        assert!(signals.allows(Axis::EastWest));
    }
}
