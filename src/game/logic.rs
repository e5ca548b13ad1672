//! Tick engine: pure functions over [`GameState`].

use tracing::{debug, info};

use super::requirement::ConditionContext;
use super::state::GameState;

/// What happened during one or more ticks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickOutcome {
    pub job_levels: u32,
    pub skill_levels: u32,
    pub promoted_to: Option<&'static str>,
    pub learned: Option<&'static str>,
    pub bankrupt: bool,
    /// The character reached the end of their lifespan during this tick.
    pub died: bool,
    /// Requirements completed for the first time.
    pub unlocked: Vec<&'static str>,
}

impl TickOutcome {
    fn merge(&mut self, other: TickOutcome) {
        self.job_levels += other.job_levels;
        self.skill_levels += other.skill_levels;
        self.promoted_to = other.promoted_to.or(self.promoted_to);
        self.learned = other.learned.or(self.learned);
        self.bankrupt |= other.bankrupt;
        self.died |= other.died;
        self.unlocked.extend(other.unlocked);
    }
}

/// Advance the game by `delta_ticks` fixed-rate updates.
pub fn tick(state: &mut GameState, delta_ticks: u32) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    for _ in 0..delta_ticks {
        outcome.merge(update(state));
    }
    outcome
}

/// One update, in fixed order: days, auto-promote, auto-learn, current
/// job and skill, expenses, requirement refresh.
pub fn update(state: &mut GameState) -> TickOutcome {
    let died = increase_days(state);
    let promoted_to = auto_promote(state);
    let learned = auto_learn(state);
    let (job_levels, skill_levels) = do_current_task(state);
    let bankrupt = apply_expenses(state);
    let unlocked = refresh_requirements(state);
    TickOutcome {
        job_levels,
        skill_levels,
        promoted_to,
        learned,
        bankrupt,
        died,
        unlocked,
    }
}

/// Age the character. Returns true on the tick the lifespan is reached;
/// `days` never runs past the lifespan.
pub fn increase_days(state: &mut GameState) -> bool {
    let was_alive = state.is_alive();
    state.days += state.apply_speed(1.0);
    let lifespan = state.lifespan();
    if state.days > lifespan {
        state.days = lifespan;
    }
    let died = was_alive && !state.is_alive();
    if died {
        info!(
            age = state.age_years(),
            rebirths = state.rebirth_one_count + state.rebirth_two_count,
            "character died of old age"
        );
    }
    died
}

/// Move to the next job of the current job's category once it unlocks.
pub fn auto_promote(state: &mut GameState) -> Option<&'static str> {
    if !state.auto_promote {
        return None;
    }
    let current = state.current_job;
    let jobs = state.tasks_in(state.tasks[current].category);
    let position = jobs.iter().position(|&i| i == current)?;
    let next = *jobs.get(position + 1)?;
    let name = state.tasks[next].name;
    if !state.is_unlocked(name).unwrap_or(false) {
        return None;
    }
    state.current_job = next;
    info!(from = state.tasks[current].name, to = name, "promoted");
    Some(name)
}

/// Lowest-level unlocked, non-skipped skill; first in table order on ties.
/// Falls back to the default skill when nothing qualifies.
pub fn lowest_level_skill(state: &GameState) -> usize {
    state
        .tasks
        .iter()
        .enumerate()
        .filter(|(i, task)| {
            task.is_skill()
                && !state.skipped_skills.contains(i)
                && state.is_completed(task.name).unwrap_or(false)
        })
        .min_by_key(|(_, task)| task.level)
        .map_or(state.default_skill(), |(i, _)| i)
}

pub fn auto_learn(state: &mut GameState) -> Option<&'static str> {
    if !state.auto_learn {
        return None;
    }
    let target = lowest_level_skill(state);
    if target == state.current_skill {
        return None;
    }
    state.current_skill = target;
    let name = state.tasks[target].name;
    debug!(skill = name, "auto-learn switched skill");
    Some(name)
}

/// XP for the current job and skill, plus the job's income.
/// Returns the levels gained by each.
pub fn do_current_task(state: &mut GameState) -> (u32, u32) {
    let job = state.current_job;
    let job_levels = state.increase_task_xp(job);
    if job_levels > 0 {
        debug!(job = state.tasks[job].name, level = state.tasks[job].level, "job level up");
    }
    apply_income(state);

    let skill = state.current_skill;
    let skill_levels = state.increase_task_xp(skill);
    if skill_levels > 0 {
        debug!(skill = state.tasks[skill].name, level = state.tasks[skill].level, "skill level up");
    }
    (job_levels, skill_levels)
}

pub fn apply_income(state: &mut GameState) {
    state.coins += state.apply_speed(state.income());
}

/// Pay upkeep. Returns true when the character went bankrupt.
pub fn apply_expenses(state: &mut GameState) -> bool {
    state.coins -= state.apply_speed(state.expense());
    if state.coins < 0.0 {
        go_bankrupt(state);
        return true;
    }
    false
}

/// Zero the purse and fall back to free housing with no misc items.
pub fn go_bankrupt(state: &mut GameState) {
    info!(
        property = state.current_property().name,
        misc = state.current_misc.len(),
        "bankrupt: selling everything"
    );
    state.coins = 0.0;
    state.current_property = state.default_property();
    state.current_misc.clear();
}

/// Evaluate every requirement not yet completed. Returns the names that
/// completed on this pass.
pub fn refresh_requirements(state: &mut GameState) -> Vec<&'static str> {
    let ctx = ConditionContext {
        tasks: &state.tasks,
        coins: state.coins,
        days: state.days,
        evil: state.evil,
    };
    let mut unlocked = Vec::new();
    for (&name, requirement) in state.requirements.iter_mut() {
        if !requirement.completed && requirement.check(&ctx) {
            unlocked.push(name);
        }
    }
    unlocked
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_ticks_keep_invariants(
            ticks in 0u32..500,
            coins in 0.0f64..1e6,
            property in 0usize..8,
            auto in any::<bool>(),
        ) {
            let mut s = GameState::new().unwrap();
            s.coins = coins;
            s.current_property = property;
            s.auto_promote = auto;
            s.auto_learn = auto;
            tick(&mut s, ticks);
            prop_assert!(s.coins >= 0.0);
            prop_assert!(s.days <= s.lifespan());
            for task in &s.tasks {
                prop_assert!(task.xp < task.max_xp());
            }
        }
    }
}
