//! Engine tuning knobs.

use serde::{Deserialize, Serialize};

/// Days in one in-game year.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Static engine parameters. Not part of the save: a loaded game always
/// runs with the config of the build that loaded it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed tick rate of the game loop.
    pub updates_per_second: u32,
    /// Game speed before pause/death/time-warp factors.
    pub base_game_speed: f64,
    /// Lifespan in days before Immortality effects.
    pub base_lifespan_days: f64,
    /// Age (in days) a fresh or reborn character starts at.
    pub starting_days: f64,
    /// Wall-clock interval between autosaves.
    pub autosave_interval_ms: u32,
    /// Frame deltas above this are clamped (backgrounded tab).
    pub max_frame_delta_ms: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            updates_per_second: 20,
            base_game_speed: 4.0,
            base_lifespan_days: DAYS_PER_YEAR * 70.0,
            starting_days: DAYS_PER_YEAR * 14.0,
            autosave_interval_ms: 3000,
            max_frame_delta_ms: 500.0,
        }
    }
}

impl EngineConfig {
    /// Milliseconds between two ticks.
    pub fn tick_interval_ms(&self) -> u32 {
        1000 / self.updates_per_second.max(1)
    }

    /// Number of ticks between autosaves.
    pub fn autosave_interval_ticks(&self) -> u64 {
        (self.autosave_interval_ms / self.tick_interval_ms().max(1)).max(1) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_runs_at_twenty_hertz() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.tick_interval_ms(), 50);
        assert_eq!(cfg.autosave_interval_ticks(), 60);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"base_game_speed": 8.0}"#).unwrap();
        assert_eq!(cfg.base_game_speed, 8.0);
        assert_eq!(cfg.updates_per_second, 20);
        assert_eq!(cfg.base_lifespan_days, 25550.0);
    }
}
