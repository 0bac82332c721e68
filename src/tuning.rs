//! Data-driven lane generation balance
//!
//! Everything the lane generator randomises is bounded here, so balance
//! changes never touch simulation code.

use serde::{Deserialize, Serialize};

/// Lane generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Fewest lanes per stage
    pub min_lanes: u32,
    /// Most lanes per stage
    pub max_lanes: u32,
    /// Fewest objects per lane
    pub min_objects: u32,
    /// Most objects per lane
    pub max_objects: u32,
    /// Lowest speed magnitude at stage 0 (pixels/tick)
    pub base_speed: f32,
    /// Random extra speed drawn from [0, speed_spread)
    pub speed_spread: f32,
    /// Linear speed increment per stage
    pub speed_per_stage: f32,
    /// Log width = log_min_width + [0, log_width_spread)
    pub log_min_width: f32,
    pub log_width_spread: f32,
    /// Vehicle width = car_min_width + [0, car_width_spread)
    pub car_min_width: f32,
    pub car_width_spread: f32,
    /// Number of vehicle colour variants
    pub car_variants: u8,
    /// Probability that a lane is water
    pub water_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            min_lanes: 3,
            max_lanes: 4,
            min_objects: 2,
            max_objects: 3,
            base_speed: 1.2,
            speed_spread: 1.5,
            speed_per_stage: 0.15,
            log_min_width: 80.0,
            log_width_spread: 40.0,
            car_min_width: 40.0,
            car_width_spread: 30.0,
            car_variants: 5,
            water_chance: 0.5,
        }
    }
}

impl Tuning {
    /// Speed magnitude range for a stage: [lo, hi)
    pub fn speed_range(&self, stage: u32) -> (f32, f32) {
        let lo = self.base_speed + self.speed_per_stage * stage as f32;
        (lo, lo + self.speed_spread)
    }
}
