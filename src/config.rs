// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

pub const COLUMN_DENSITY: f64 = 0.65;
/// Rows per second of a tier-1 column.
pub const BASE_SPEED: f64 = 8.0;
pub const TRAIL_LENGTH_MIN: u16 = 8;
pub const TRAIL_LENGTH_MAX: u16 = 25;
pub const MUTATION_PROBABILITY: f64 = 0.10;
pub const TARGET_FPS: u32 = 30;
pub const MIN_WIDTH: u16 = 20;
pub const MIN_HEIGHT: u16 = 10;
pub const MAX_TICK_DELTA: Duration = Duration::from_millis(500);

/// Tunables for the animation and the terminal session. There are no
/// command-line flags; the defaults are the program's behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct RainConfig {
    pub density: f64,
    pub base_speed: f64,
    pub trail_min: u16,
    pub trail_max: u16,
    pub mutation_probability: f64,
    pub target_fps: u32,
    pub min_width: u16,
    pub min_height: u16,
    pub max_tick_delta: Duration,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            density: COLUMN_DENSITY,
            base_speed: BASE_SPEED,
            trail_min: TRAIL_LENGTH_MIN,
            trail_max: TRAIL_LENGTH_MAX,
            mutation_probability: MUTATION_PROBABILITY,
            target_fps: TARGET_FPS,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            max_tick_delta: MAX_TICK_DELTA,
        }
    }
}

impl RainConfig {
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }

    /// Number of columns kept alive for a terminal `width` cells wide.
    pub fn target_columns(&self, width: u16) -> usize {
        ((width as f64 * self.density).round() as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_budget_is_one_thirtieth_of_a_second() {
        let budget = RainConfig::default().frame_budget();
        assert!((budget.as_secs_f64() - 1.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn target_columns_rounds_width_times_density() {
        let cfg = RainConfig::default();
        assert_eq!(cfg.target_columns(20), 13);
        assert_eq!(cfg.target_columns(80), 52);
        assert_eq!(cfg.target_columns(1), 1);
    }

    #[test]
    fn default_density_sits_in_the_occupancy_band() {
        let cfg = RainConfig::default();
        assert!((0.60..=0.70).contains(&cfg.density));
        assert!(cfg.trail_min <= cfg.trail_max);
    }
}
