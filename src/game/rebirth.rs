//! Two-tier prestige reset.
//!
//! Both tiers always succeed once triggered. Age guards live in
//! [`can_rebirth_one`] / [`can_rebirth_two`] and are checked by the caller.

use tracing::info;

use super::data::PERMANENT_UNLOCKS;
use super::state::GameState;

/// Age at which the first rebirth is offered.
pub const REBIRTH_ONE_AGE: u32 = 65;
/// Age at which the second rebirth is offered.
pub const REBIRTH_TWO_AGE: u32 = 200;

pub fn can_rebirth_one(state: &GameState) -> bool {
    state.age_years() >= REBIRTH_ONE_AGE
}

pub fn can_rebirth_two(state: &GameState) -> bool {
    state.age_years() >= REBIRTH_TWO_AGE
}

/// Soft prestige: bank every task's level into `max_level`, then reset.
pub fn rebirth_one(state: &mut GameState) {
    state.rebirth_one_count += 1;
    info!(
        count = state.rebirth_one_count,
        age = state.age_years(),
        "rebirth (amulet)"
    );
    reset(state);
}

/// Hard prestige: convert the run into evil, reset, and wipe banked levels.
/// Returns the evil gained.
pub fn rebirth_two(state: &mut GameState) -> f64 {
    state.rebirth_two_count += 1;
    let gain = state.evil_gain();
    state.evil += gain;
    info!(
        count = state.rebirth_two_count,
        gain,
        evil = state.evil,
        "rebirth (embrace evil)"
    );
    reset(state);
    for task in &mut state.tasks {
        task.max_level = 0;
    }
    gain
}

/// Shared reset: purse, age and selections back to bootstrap values, levels
/// banked into `max_level` then zeroed, every non-permanent unlock re-locked.
fn reset(state: &mut GameState) {
    state.coins = 0.0;
    state.days = state.config.starting_days;
    state.current_job = state.default_job();
    state.current_skill = state.default_skill();
    state.current_property = state.default_property();
    state.current_misc.clear();

    for task in &mut state.tasks {
        if task.level > task.max_level {
            task.max_level = task.level;
        }
        task.level = 0;
        task.xp = 0.0;
    }

    for (name, requirement) in state.requirements.iter_mut() {
        if requirement.completed && PERMANENT_UNLOCKS.contains(name) {
            continue;
        }
        requirement.completed = false;
    }
}
