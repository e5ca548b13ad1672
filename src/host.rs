//! The running game of this thread, shared by the browser callbacks.

use std::cell::RefCell;

use crate::game::IdleGame;

thread_local! {
    static GAME: RefCell<Option<IdleGame>> = const { RefCell::new(None) };
}

pub fn is_running() -> bool {
    GAME.with(|cell| cell.borrow().is_some())
}

/// Install `game` unless one is already running. Returns whether it was
/// installed.
pub fn install(game: IdleGame) -> bool {
    GAME.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_some() {
            return false;
        }
        *slot = Some(game);
        true
    })
}

/// Run `f` on the running game; `None` before [`install`].
pub fn with_game<R>(f: impl FnOnce(&mut IdleGame) -> R) -> Option<R> {
    GAME.with(|cell| cell.borrow_mut().as_mut().map(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::EngineConfig;

    fn game() -> IdleGame {
        IdleGame::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn nothing_runs_before_install() {
        assert!(!is_running());
        assert_eq!(with_game(|g| g.state.coins), None);
    }

    #[test]
    fn second_install_keeps_the_first_game() {
        let mut first = game();
        first.state.coins = 42.0;
        assert!(install(first));
        assert!(is_running());

        assert!(!install(game()));
        assert_eq!(with_game(|g| g.state.coins), Some(42.0));
    }

    #[test]
    fn with_game_mutates_in_place() {
        assert!(install(game()));
        with_game(|g| g.tick(20));
        let days = with_game(|g| g.state.days).unwrap();
        assert!(days > 365.0 * 14.0);
    }
}
