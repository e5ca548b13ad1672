//! Unlock gates over task levels, coins, age and evil.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::data::{ConditionInfo, RequirementInfo};
use super::entity::Task;
use super::error::GameError;
use super::format::{days_to_years, format, format_coins};

/// Comparison source of a requirement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementKind {
    Task,
    Coin,
    Age,
    Evil,
}

/// One condition with its task reference already resolved to a registry index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Condition {
    TaskLevel { task: usize, level: u32 },
    Coins(f64),
    /// Age in whole years.
    Age(u32),
    Evil(f64),
}

impl Condition {
    pub fn kind(&self) -> RequirementKind {
        match self {
            Condition::TaskLevel { .. } => RequirementKind::Task,
            Condition::Coins(_) => RequirementKind::Coin,
            Condition::Age(_) => RequirementKind::Age,
            Condition::Evil(_) => RequirementKind::Evil,
        }
    }
}

/// The part of the game state conditions are evaluated against.
pub struct ConditionContext<'a> {
    pub tasks: &'a [Task],
    pub coins: f64,
    pub days: f64,
    pub evil: f64,
}

impl ConditionContext<'_> {
    pub fn is_met(&self, condition: &Condition) -> bool {
        match *condition {
            Condition::TaskLevel { task, level } => {
                self.tasks.get(task).is_some_and(|t| t.level >= level)
            }
            Condition::Coins(amount) => self.coins >= amount,
            Condition::Age(years) => days_to_years(self.days) >= years,
            Condition::Evil(amount) => self.evil >= amount,
        }
    }

    /// Human-readable progress towards an unmet condition.
    pub fn describe(&self, condition: &Condition) -> String {
        match *condition {
            Condition::TaskLevel { task, level } => match self.tasks.get(task) {
                Some(t) => format!("{} level {}/{}", t.name, t.level, level),
                None => format!("task #{} level {}", task, level),
            },
            Condition::Coins(amount) => format_coins(amount),
            Condition::Age(years) => format!("Age {}/{}", days_to_years(self.days), years),
            Condition::Evil(amount) => {
                format!("Evil {}/{}", format(self.evil.floor()), format(amount))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Requirement {
    pub kind: RequirementKind,
    pub conditions: Vec<Condition>,
    /// Once true, stays true until a rebirth sweeps non-permanent unlocks.
    pub completed: bool,
    /// Number of times the conditions were actually evaluated.
    pub evaluations: u64,
}

impl Requirement {
    /// Build from a table entry, resolving task names. An unknown task or
    /// mixed comparison sources fail construction.
    pub fn from_info(
        info: &RequirementInfo,
        task_index: &HashMap<&'static str, usize>,
    ) -> Result<Self, GameError> {
        let mut conditions = Vec::with_capacity(info.conditions.len());
        for condition in info.conditions {
            conditions.push(match *condition {
                ConditionInfo::TaskLevel(name, level) => {
                    let task = *task_index
                        .get(name)
                        .ok_or_else(|| GameError::UnknownTask(name.to_string()))?;
                    Condition::TaskLevel { task, level }
                }
                ConditionInfo::Coins(amount) => Condition::Coins(amount),
                ConditionInfo::Age(years) => Condition::Age(years),
                ConditionInfo::Evil(amount) => Condition::Evil(amount),
            });
        }

        let kind = conditions
            .first()
            .map(Condition::kind)
            .unwrap_or(RequirementKind::Task);
        if conditions.iter().any(|c| c.kind() != kind) {
            return Err(GameError::invalid(
                info.name,
                "requirement mixes comparison sources",
            ));
        }

        Ok(Self {
            kind,
            conditions,
            completed: false,
            evaluations: 0,
        })
    }

    /// Memoized check: after the first success the conditions are never
    /// evaluated again.
    pub fn check(&mut self, ctx: &ConditionContext<'_>) -> bool {
        if self.completed {
            return true;
        }
        self.evaluations += 1;
        if self.conditions.iter().all(|c| ctx.is_met(c)) {
            self.completed = true;
        }
        self.completed
    }

    /// Descriptions of the conditions not yet met. Empty once completed.
    pub fn missing(&self, ctx: &ConditionContext<'_>) -> Vec<String> {
        if self.completed {
            return Vec::new();
        }
        self.conditions
            .iter()
            .filter(|c| !ctx.is_met(c))
            .map(|c| ctx.describe(c))
            .collect()
    }
}
