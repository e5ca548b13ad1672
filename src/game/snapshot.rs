//! Read-only character snapshot for the narrative collaborator, and the two
//! reward mutators it is allowed to use.

use serde::Serialize;

use super::error::GameError;
use super::format::day_of_year;
use super::state::GameState;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CharacterSnapshot {
    pub age: u32,
    pub day: u32,
    pub job: String,
    pub job_level: u32,
    pub skill: String,
    /// Every skill with its current level, in table order.
    pub skill_levels: Vec<(String, u32)>,
    pub coins: f64,
    pub evil: f64,
    pub rebirth_one_count: u32,
    pub rebirth_two_count: u32,
    pub alive: bool,
}

impl CharacterSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let job = state.current_job();
        Self {
            age: state.age_years(),
            day: day_of_year(state.days),
            job: job.name.to_string(),
            job_level: job.level,
            skill: state.current_skill().name.to_string(),
            skill_levels: state
                .tasks
                .iter()
                .filter(|t| t.is_skill())
                .map(|t| (t.name.to_string(), t.level))
                .collect(),
            coins: state.coins.floor(),
            evil: state.evil.floor(),
            rebirth_one_count: state.rebirth_one_count,
            rebirth_two_count: state.rebirth_two_count,
            alive: state.is_alive(),
        }
    }

    /// Compact one-line encoding for prompts. Skills at level 0 are left out.
    pub fn encode(&self) -> String {
        let skills: Vec<String> = self
            .skill_levels
            .iter()
            .filter(|(_, level)| *level > 0)
            .map(|(name, level)| format!("{name} {level}"))
            .collect();
        format!(
            "age {} day {}; job {} lv {}; learning {}; skills [{}]; \
             coins {}; evil {}; rebirths {}/{}; {}",
            self.age,
            self.day,
            self.job,
            self.job_level,
            self.skill,
            skills.join(", "),
            self.coins,
            self.evil,
            self.rebirth_one_count,
            self.rebirth_two_count,
            if self.alive { "alive" } else { "dead" },
        )
    }
}

/// Reward XP to a task through its level-up path. Returns levels gained.
pub fn grant_task_xp(state: &mut GameState, task: &str, amount: f64) -> Result<u32, GameError> {
    Ok(state.task_mut(task)?.add_xp(amount))
}

/// Reward coins. Non-finite or non-positive amounts are ignored. Returns
/// the amount actually added.
pub fn grant_coins(state: &mut GameState, amount: f64) -> f64 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0.0;
    }
    state.coins += amount;
    amount
}
