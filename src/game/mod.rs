//! Idle Knight: a character works jobs, trains skills and buys items
//! through a fixed-rate tick loop, with two tiers of rebirth.

pub mod actions;
pub mod config;
pub mod data;
pub mod entity;
pub mod error;
pub mod format;
pub mod logic;
pub mod multiplier;
pub mod rebirth;
pub mod requirement;
pub mod save;
pub mod simulator;
pub mod snapshot;
pub mod state;
pub mod view;

use tracing::info;

use crate::time::GameTime;

use actions::PlayerAction;
use config::EngineConfig;
use error::GameError;
use logic::TickOutcome;
use snapshot::CharacterSnapshot;
use state::GameState;
use view::GameView;

/// A running game: state, clock and autosave cadence.
pub struct IdleGame {
    pub state: GameState,
    clock: GameTime,
    ticks_since_save: u64,
}

impl IdleGame {
    pub fn new(config: EngineConfig) -> Result<Self, GameError> {
        Ok(Self::from_state(GameState::with_config(config)?))
    }

    pub fn from_state(state: GameState) -> Self {
        Self {
            clock: GameTime::from_config(&state.config),
            state,
            ticks_since_save: 0,
        }
    }

    /// Resume from save text if there is any usable, otherwise start fresh.
    pub fn load(json: Option<&str>, config: EngineConfig) -> Result<Self, GameError> {
        Ok(Self::from_state(save::load_or_fresh(json, config)?))
    }

    /// Run however many ticks the wall clock says are due.
    pub fn frame(&mut self, now_ms: f64) -> TickOutcome {
        let ticks = self.clock.update(now_ms);
        self.tick(ticks)
    }

    pub fn tick(&mut self, delta_ticks: u32) -> TickOutcome {
        self.ticks_since_save += delta_ticks as u64;
        logic::tick(&mut self.state, delta_ticks)
    }

    /// True once per autosave interval; the caller is expected to save.
    pub fn take_autosave(&mut self) -> bool {
        if self.ticks_since_save < self.state.config.autosave_interval_ticks() {
            return false;
        }
        self.ticks_since_save = 0;
        true
    }

    pub fn dispatch(&mut self, action: &PlayerAction) -> Result<(), GameError> {
        actions::apply(&mut self.state, action)
    }

    pub fn view(&self) -> GameView {
        GameView::from_state(&self.state)
    }

    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot::from_state(&self.state)
    }

    pub fn export_save(&self) -> Result<String, GameError> {
        save::to_json(&self.state)
    }

    /// Replace the game with an imported save. A bad save is an error and
    /// leaves the current game untouched.
    pub fn import_save(&mut self, json: &str) -> Result<(), GameError> {
        let state = save::from_json(json, self.state.config.clone())?;
        info!("save imported");
        self.replace(state);
        Ok(())
    }

    /// Throw everything away and start over.
    pub fn hard_reset(&mut self) -> Result<(), GameError> {
        let state = GameState::with_config(self.state.config.clone())?;
        info!("hard reset");
        self.replace(state);
        Ok(())
    }

    fn replace(&mut self, state: GameState) {
        self.state = state;
        self.clock.reset();
        self.ticks_since_save = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> IdleGame {
        IdleGame::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn frames_drive_ticks() {
        let mut g = game();
        g.frame(0.0);
        g.frame(100.0);
        assert!((g.state.coins - 2.0).abs() < 1e-9);
    }

    #[test]
    fn autosave_every_three_seconds() {
        let mut g = game();
        g.tick(59);
        assert!(!g.take_autosave());
        g.tick(1);
        assert!(g.take_autosave());
        assert!(!g.take_autosave());
    }

    #[test]
    fn dispatch_routes_to_handlers() {
        let mut g = game();
        g.dispatch(&PlayerAction::TogglePause).unwrap();
        assert!(g.state.paused);
        let chairman = PlayerAction::SetJob {
            name: "Chairman".to_string(),
        };
        assert!(g.dispatch(&chairman).is_err());
    }

    #[test]
    fn export_import_roundtrip() {
        let mut g = game();
        g.tick(200);
        let exported = g.export_save().unwrap();
        let coins = g.state.coins;

        let mut other = game();
        other.import_save(&exported).unwrap();
        assert!((other.state.coins - coins).abs() < 1e-6);
        assert!((other.state.days - g.state.days).abs() < 1e-6);
        assert_eq!(other.state.current_job().level, g.state.current_job().level);
    }

    #[test]
    fn bad_import_keeps_current_game() {
        let mut g = game();
        g.tick(20);
        let coins = g.state.coins;
        assert!(g.import_save("not a save").is_err());
        assert_eq!(g.state.coins, coins);
    }

    #[test]
    fn hard_reset_starts_over() {
        let mut g = game();
        g.tick(500);
        g.hard_reset().unwrap();
        assert_eq!(g.state.coins, 0.0);
        assert_eq!(g.state.days, 365.0 * 14.0);
        assert!(!g.take_autosave());
    }

    #[test]
    fn load_falls_back_to_fresh() {
        let g = IdleGame::load(Some("{}"), EngineConfig::default()).unwrap();
        assert_eq!(g.state.current_job().name, "Beggar");
        assert_eq!(g.snapshot().age, 14);
    }
}
