//! Core types for the intersection simulation
//!
//! Directions, axes, vehicle classes and the 2D canvas coordinates they move in.

use std::fmt;

/// A unique identifier for a vehicle within an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub usize);

/// The two perpendicular roads meeting at the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Served by the `down` and `up` approaches, travel along Y
    NorthSouth,
    /// Served by the `right` and `left` approaches, travel along X
    EastWest,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::NorthSouth, Axis::EastWest];

    pub fn index(self) -> usize {
        match self {
            Axis::NorthSouth => 0,
            Axis::EastWest => 1,
        }
    }

    /// The complementary axis, i.e. the one that turns green next
    pub fn other(self) -> Axis {
        match self {
            Axis::NorthSouth => Axis::EastWest,
            Axis::EastWest => Axis::NorthSouth,
        }
    }

    pub fn directions(self) -> [Direction; 2] {
        match self {
            Axis::NorthSouth => [Direction::Down, Direction::Up],
            Axis::EastWest => [Direction::Right, Direction::Left],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::NorthSouth => write!(f, "NS"),
            Axis::EastWest => write!(f, "EW"),
        }
    }
}

/// Approach direction, named after the way vehicles travel across the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Right | Direction::Left => Axis::EastWest,
            Direction::Down | Direction::Up => Axis::NorthSouth,
        }
    }

    /// +1.0 when travel increases the coordinate on the axis, -1.0 otherwise
    pub fn sign(self) -> f32 {
        match self {
            Direction::Right | Direction::Down => 1.0,
            Direction::Left | Direction::Up => -1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Up => "up",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Physical footprint of a vehicle class, independent of any sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Size along the direction of travel
    pub length: f32,
    /// Size across the direction of travel
    pub width: f32,
}

/// Class of vehicle; fixes its speed and extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleClass {
    Car,
    Bus,
    Truck,
    Bike,
}

impl VehicleClass {
    /// Distance covered in one simulated time unit
    pub fn speed(self) -> f32 {
        match self {
            VehicleClass::Car => 2.25,
            VehicleClass::Bus => 1.8,
            VehicleClass::Truck => 1.8,
            VehicleClass::Bike => 2.5,
        }
    }

    pub fn extent(self) -> Extent {
        match self {
            VehicleClass::Car => Extent {
                length: 40.0,
                width: 20.0,
            },
            VehicleClass::Bus => Extent {
                length: 64.0,
                width: 26.0,
            },
            VehicleClass::Truck => Extent {
                length: 60.0,
                width: 26.0,
            },
            VehicleClass::Bike => Extent {
                length: 24.0,
                width: 12.0,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VehicleClass::Car => "car",
            VehicleClass::Bus => "bus",
            VehicleClass::Truck => "truck",
            VehicleClass::Bike => "bike",
        }
    }
}

/// A point on the 2D intersection canvas
///
/// For a vehicle this is the corner with the smallest coordinates, the way a
/// sprite would be anchored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Coordinate along the travel axis
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::EastWest => self.x,
            Axis::NorthSouth => self.y,
        }
    }

    /// Move along the travel axis by `delta`
    pub fn shift(&mut self, axis: Axis, delta: f32) {
        match axis {
            Axis::EastWest => self.x += delta,
            Axis::NorthSouth => self.y += delta,
        }
    }
}

/// Size of the canvas vehicles drive across; leaving it ends the journey
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Upper limit of the coordinate on the given axis
    pub fn limit(&self, axis: Axis) -> f32 {
        match axis {
            Axis::EastWest => self.width,
            Axis::NorthSouth => self.height,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 800.0,
        }
    }
}
