//! Serializable read model for the external renderer.
//!
//! Built from memoized requirement flags only, so taking a view never
//! mutates the game.

use std::collections::BTreeMap;

use serde::Serialize;

use super::entity::Task;
use super::format::{coin_parts, format_age, CoinPart};
use super::rebirth::{can_rebirth_one, can_rebirth_two};
use super::state::GameState;

#[derive(Clone, Debug, Serialize)]
pub struct TaskView {
    pub name: &'static str,
    pub category: &'static str,
    pub level: u32,
    pub max_level: u32,
    pub xp: f64,
    pub max_xp: f64,
    pub xp_left: f64,
    pub xp_gain: f64,
    /// Jobs only.
    pub income: Option<f64>,
    /// Skills only.
    pub effect: Option<String>,
    pub unlocked: bool,
    pub skipped: bool,
    pub missing: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ItemView {
    pub name: &'static str,
    pub category: &'static str,
    pub expense: f64,
    pub effect: String,
    pub active: bool,
    pub unlocked: bool,
    pub missing: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameView {
    pub coins: f64,
    pub coin_parts: Vec<CoinPart>,
    pub income: f64,
    pub expense: f64,
    pub age: String,
    pub lifespan_years: f64,
    pub alive: bool,
    pub paused: bool,
    pub time_warping_enabled: bool,
    pub game_speed: f64,
    pub happiness: f64,
    pub evil: f64,
    pub evil_gain: f64,
    pub rebirth_one_count: u32,
    pub rebirth_two_count: u32,
    pub can_rebirth_one: bool,
    pub can_rebirth_two: bool,
    pub current_job: &'static str,
    pub current_skill: &'static str,
    pub current_property: &'static str,
    pub current_misc: Vec<&'static str>,
    pub auto_promote: bool,
    pub auto_learn: bool,
    pub jobs: Vec<TaskView>,
    pub skills: Vec<TaskView>,
    pub items: Vec<ItemView>,
    /// Completion of every requirement, keyed by name (UI gates included).
    pub unlocked: BTreeMap<&'static str, bool>,
}

fn task_view(state: &GameState, id: usize, task: &Task) -> TaskView {
    let unlocked = state.is_completed(task.name).unwrap_or(false);
    TaskView {
        name: task.name,
        category: task.category.name(),
        level: task.level,
        max_level: task.max_level,
        xp: task.xp,
        max_xp: task.max_xp(),
        xp_left: task.xp_left(),
        xp_gain: state.task_xp_gain(id),
        income: task.is_job().then(|| state.job_income(id)),
        effect: task.effect_description(),
        unlocked,
        skipped: state.skipped_skills.contains(&id),
        missing: if unlocked {
            Vec::new()
        } else {
            state.missing_conditions(task.name).unwrap_or_default()
        },
    }
}

impl GameView {
    pub fn from_state(state: &GameState) -> Self {
        let (jobs, skills): (Vec<TaskView>, Vec<TaskView>) = state
            .tasks
            .iter()
            .enumerate()
            .map(|(id, task)| task_view(state, id, task))
            .partition(|view| view.income.is_some());

        let items = state
            .items
            .iter()
            .enumerate()
            .map(|(id, item)| {
                let unlocked = state.is_completed(item.name).unwrap_or(false);
                ItemView {
                    name: item.name,
                    category: item.category.name(),
                    expense: state.item_expense(id),
                    effect: item.effect_description(),
                    active: state.is_item_active(id),
                    unlocked,
                    missing: if unlocked {
                        Vec::new()
                    } else {
                        state.missing_conditions(item.name).unwrap_or_default()
                    },
                }
            })
            .collect();

        Self {
            coins: state.coins,
            coin_parts: coin_parts(state.coins),
            income: state.income(),
            expense: state.expense(),
            age: format_age(state.days),
            lifespan_years: state.lifespan_years(),
            alive: state.is_alive(),
            paused: state.paused,
            time_warping_enabled: state.time_warping_enabled,
            game_speed: state.game_speed(),
            happiness: state.happiness(),
            evil: state.evil,
            evil_gain: state.evil_gain(),
            rebirth_one_count: state.rebirth_one_count,
            rebirth_two_count: state.rebirth_two_count,
            can_rebirth_one: can_rebirth_one(state),
            can_rebirth_two: can_rebirth_two(state),
            current_job: state.current_job().name,
            current_skill: state.current_skill().name,
            current_property: state.current_property().name,
            current_misc: state.current_misc.iter().map(|&i| state.items[i].name).collect(),
            auto_promote: state.auto_promote,
            auto_learn: state.auto_learn,
            jobs,
            skills,
            items,
            unlocked: state
                .requirements
                .iter()
                .map(|(&name, r)| (name, r.completed))
                .collect(),
        }
    }
}
