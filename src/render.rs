//! Terminal rendering of the intersection
//!
//! Sits outside the simulation core: it only sees vehicle views and the
//! signal state.

use crate::simulation::{
    Axis, Direction, IntersectionConfig, LightState, SignalController, VehicleClass, VehicleView,
};

/// Canvas units per character column
const COLUMN_SCALE: f32 = 20.0;
/// Canvas units per character row
const ROW_SCALE: f32 = 40.0;

fn class_glyph(class: VehicleClass) -> char {
    match class {
        VehicleClass::Car => 'C',
        VehicleClass::Bus => 'B',
        VehicleClass::Truck => 'T',
        VehicleClass::Bike => 'K',
    }
}

fn light_glyph(light: LightState) -> &'static str {
    match light {
        LightState::Red => "RED",
        LightState::Green => "GREEN",
        LightState::Yellow => "YELLOW",
    }
}

/// Draw one frame of the intersection as text
pub fn draw_map(
    config: &IntersectionConfig,
    signals: &SignalController,
    vehicles: impl Iterator<Item = VehicleView>,
) -> String {
    let width = (config.bounds.width / COLUMN_SCALE).ceil() as usize;
    let height = (config.bounds.height / ROW_SCALE).ceil() as usize;
    let mut grid = vec![vec![' '; width]; height];

    let to_cell = |x: f32, y: f32| -> Option<(usize, usize)> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / COLUMN_SCALE) as usize;
        let row = (y / ROW_SCALE) as usize;
        (row < height && col < width).then_some((row, col))
    };

    // Lanes and stop lines
    for direction in Direction::ALL {
        let approach = config.approach(direction);
        for spawn in &approach.spawn {
            match direction.axis() {
                Axis::EastWest => {
                    if let Some((row, _)) = to_cell(0.0, spawn.y) {
                        for cell in grid[row].iter_mut().filter(|c| **c == ' ') {
                            *cell = '.';
                        }
                        if let Some((_, col)) = to_cell(approach.stop_line, spawn.y) {
                            grid[row][col] = '|';
                        }
                    }
                }
                Axis::NorthSouth => {
                    if let Some((_, col)) = to_cell(spawn.x, 0.0) {
                        for line in grid.iter_mut() {
                            if line[col] == ' ' || line[col] == '.' {
                                line[col] = ':';
                            }
                        }
                        if let Some((row, _)) = to_cell(spawn.x, approach.stop_line) {
                            grid[row][col] = '-';
                        }
                    }
                }
            }
        }
    }

    for vehicle in vehicles {
        let extent = vehicle.class.extent();
        let (along, across) = (extent.length / 2.0, extent.width / 2.0);
        let (cx, cy) = match vehicle.direction.axis() {
            Axis::EastWest => (vehicle.position.x + along, vehicle.position.y + across),
            Axis::NorthSouth => (vehicle.position.x + across, vehicle.position.y + along),
        };
        if let Some((row, col)) = to_cell(cx, cy) {
            grid[row][col] = class_glyph(vehicle.class);
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "NS: {} ({}) | EW: {} ({})\n",
        light_glyph(signals.group(Axis::NorthSouth).state),
        signals.group(Axis::NorthSouth).remaining(),
        light_glyph(signals.group(Axis::EastWest).state),
        signals.group(Axis::EastWest).remaining(),
    ));
    out.push_str("Legend: C=Car, B=Bus, T=Truck, K=Bike, |/-=Stop line\n");
    for row in &grid {
        let line: String = row.iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
