//! Tasks (jobs and skills) and items, with their per-entity formulas.
//!
//! Formulas that only need the entity itself live here. Anything that reads
//! other entities (multiplier chains, presence-gated item effects) is
//! evaluated by [`GameState`](super::state::GameState).

use serde::Serialize;

use super::data::{ItemInfo, JobInfo, SkillInfo};
use super::error::GameError;
use super::format::log_base;
use super::multiplier::Multiplier;

/// Content categories. Every entity belongs to exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    CommonWork,
    Military,
    ArcaneAssociation,
    Fundamentals,
    Combat,
    Magic,
    DarkMagic,
    Properties,
    Misc,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::CommonWork => "Common work",
            Category::Military => "Military",
            Category::ArcaneAssociation => "The Arcane Association",
            Category::Fundamentals => "Fundamentals",
            Category::Combat => "Combat",
            Category::Magic => "Magic",
            Category::DarkMagic => "Dark magic",
            Category::Properties => "Properties",
            Category::Misc => "Misc",
        }
    }

    pub fn is_job(self) -> bool {
        matches!(
            self,
            Category::CommonWork | Category::Military | Category::ArcaneAssociation
        )
    }

    pub fn is_skill(self) -> bool {
        matches!(
            self,
            Category::Fundamentals | Category::Combat | Category::Magic | Category::DarkMagic
        )
    }
}

/// How a skill turns its level into an effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SkillFormula {
    /// `1 + effect_per_level × level`.
    Linear,
    /// `max(0.1, 1 − log_base(level + 1) / 10)`.
    Reduction { base: f64 },
    /// `1 + log_base(level + 1)`.
    Logarithmic { base: f64 },
}

impl SkillFormula {
    /// Formula for a skill, looked up by name.
    pub fn for_skill(name: &str) -> Self {
        match name {
            "Bargaining" | "Intimidation" => SkillFormula::Reduction { base: 7.0 },
            "Time warping" => SkillFormula::Logarithmic { base: 13.0 },
            "Immortality" => SkillFormula::Logarithmic { base: 33.0 },
            _ => SkillFormula::Linear,
        }
    }

    pub fn effect(self, per_level: f64, level: u32) -> f64 {
        let level = level as f64;
        match self {
            SkillFormula::Linear => 1.0 + per_level * level,
            SkillFormula::Reduction { base } => (1.0 - log_base(base, level + 1.0) / 10.0).max(0.1),
            SkillFormula::Logarithmic { base } => 1.0 + log_base(base, level + 1.0),
        }
    }
}

#[derive(Clone, Debug)]
pub enum TaskKind {
    Job {
        income: f64,
        income_multipliers: Vec<Multiplier>,
    },
    Skill {
        effect: f64,
        description: &'static str,
        formula: SkillFormula,
    },
}

/// A job or a skill: something that levels up while it is the current one.
#[derive(Clone, Debug)]
pub struct Task {
    pub name: &'static str,
    pub category: Category,
    pub kind: TaskKind,
    base_max_xp: f64,
    pub level: u32,
    /// Highest level reached before the last rebirth. Only synced on rebirth.
    pub max_level: u32,
    pub xp: f64,
    pub xp_multipliers: Vec<Multiplier>,
}

fn check_max_xp(name: &str, max_xp: f64) -> Result<(), GameError> {
    if name.is_empty() {
        return Err(GameError::invalid(name, "empty name"));
    }
    if !max_xp.is_finite() || max_xp < 1.0 {
        return Err(GameError::invalid(
            name,
            format!("max xp must be at least 1, got {}", max_xp),
        ));
    }
    Ok(())
}

impl Task {
    pub fn job(info: &JobInfo) -> Result<Self, GameError> {
        check_max_xp(info.name, info.max_xp)?;
        if !info.category.is_job() {
            return Err(GameError::invalid(info.name, "job in a non-job category"));
        }
        if !info.income.is_finite() || info.income < 0.0 {
            return Err(GameError::invalid(info.name, "income must be non-negative"));
        }
        Ok(Self {
            name: info.name,
            category: info.category,
            kind: TaskKind::Job {
                income: info.income,
                income_multipliers: Vec::new(),
            },
            base_max_xp: info.max_xp,
            level: 0,
            max_level: 0,
            xp: 0.0,
            xp_multipliers: Vec::new(),
        })
    }

    pub fn skill(info: &SkillInfo) -> Result<Self, GameError> {
        check_max_xp(info.name, info.max_xp)?;
        if !info.category.is_skill() {
            return Err(GameError::invalid(info.name, "skill in a non-skill category"));
        }
        if !info.effect.is_finite() {
            return Err(GameError::invalid(info.name, "effect must be finite"));
        }
        Ok(Self {
            name: info.name,
            category: info.category,
            kind: TaskKind::Skill {
                effect: info.effect,
                description: info.description,
                formula: SkillFormula::for_skill(info.name),
            },
            base_max_xp: info.max_xp,
            level: 0,
            max_level: 0,
            xp: 0.0,
            xp_multipliers: Vec::new(),
        })
    }

    pub fn is_job(&self) -> bool {
        matches!(self.kind, TaskKind::Job { .. })
    }

    pub fn is_skill(&self) -> bool {
        matches!(self.kind, TaskKind::Skill { .. })
    }

    /// XP needed to finish `level`.
    pub fn max_xp_at(&self, level: u32) -> f64 {
        let level = level as f64;
        (self.base_max_xp * (level + 1.0) * 1.01f64.powf(level)).round()
    }

    /// A level is reachable only while its xp bar is finite and non-empty.
    pub fn is_reachable_level(&self, level: u32) -> bool {
        let max_xp = self.max_xp_at(level);
        max_xp.is_finite() && max_xp >= 1.0
    }

    pub fn max_xp(&self) -> f64 {
        self.max_xp_at(self.level)
    }

    pub fn xp_left(&self) -> f64 {
        self.max_xp() - self.xp
    }

    /// Permanent bonus from levels banked by earlier rebirths.
    pub fn max_level_multiplier(&self) -> f64 {
        1.0 + self.max_level as f64 / 10.0
    }

    /// Per-job income bonus from the job's own level.
    pub fn level_multiplier(&self) -> f64 {
        1.0 + (self.level as f64 + 1.0).log10()
    }

    pub fn base_income(&self) -> Option<f64> {
        match self.kind {
            TaskKind::Job { income, .. } => Some(income),
            TaskKind::Skill { .. } => None,
        }
    }

    pub fn income_multipliers(&self) -> &[Multiplier] {
        match &self.kind {
            TaskKind::Job {
                income_multipliers, ..
            } => income_multipliers,
            TaskKind::Skill { .. } => &[],
        }
    }

    /// Skill effect at the current level; `None` for jobs.
    pub fn skill_effect(&self) -> Option<f64> {
        match self.kind {
            TaskKind::Skill {
                effect, formula, ..
            } => Some(formula.effect(effect, self.level)),
            TaskKind::Job { .. } => None,
        }
    }

    /// `"x1.25 Skill xp"`; `None` for jobs.
    pub fn effect_description(&self) -> Option<String> {
        match self.kind {
            TaskKind::Skill { description, .. } => {
                let effect = self.skill_effect().unwrap_or(1.0);
                Some(format!("x{:.2} {}", effect, description))
            }
            TaskKind::Job { .. } => None,
        }
    }

    /// Add already speed-scaled XP, consuming every completed level.
    /// Returns the number of levels gained.
    pub fn add_xp(&mut self, amount: f64) -> u32 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0;
        }
        self.xp += amount;
        let mut gained = 0;
        loop {
            let max_xp = self.max_xp();
            if !max_xp.is_finite() || max_xp < 1.0 || self.xp < max_xp {
                break;
            }
            let Some(next) = self.level.checked_add(1) else {
                break;
            };
            self.xp -= max_xp;
            self.level = next;
            gained += 1;
        }
        gained
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ItemKind {
    /// Housing. Exactly one is current.
    Property,
    /// Any number may be active at once.
    Misc,
}

#[derive(Clone, Debug)]
pub struct Item {
    pub name: &'static str,
    pub category: Category,
    pub kind: ItemKind,
    pub base_expense: f64,
    pub base_effect: f64,
    pub description: &'static str,
    pub expense_multipliers: Vec<Multiplier>,
}

impl Item {
    pub fn new(info: &ItemInfo) -> Result<Self, GameError> {
        let kind = match info.category {
            Category::Properties => ItemKind::Property,
            Category::Misc => ItemKind::Misc,
            _ => return Err(GameError::invalid(info.name, "item in a non-item category")),
        };
        if info.name.is_empty() {
            return Err(GameError::invalid(info.name, "empty name"));
        }
        if !info.expense.is_finite() || info.expense < 0.0 {
            return Err(GameError::invalid(info.name, "expense must be non-negative"));
        }
        if !info.effect.is_finite() || info.effect <= 0.0 {
            return Err(GameError::invalid(info.name, "effect must be positive"));
        }
        Ok(Self {
            name: info.name,
            category: info.category,
            kind,
            base_expense: info.expense,
            base_effect: info.effect,
            description: info.description,
            expense_multipliers: Vec::new(),
        })
    }

    /// Properties always read as happiness, whatever their table label says.
    pub fn effect_label(&self) -> &'static str {
        match self.kind {
            ItemKind::Property => "Happiness",
            ItemKind::Misc => self.description,
        }
    }

    pub fn effect_description(&self) -> String {
        format!("x{:.1} {}", self.base_effect, self.effect_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::data::{ITEMS, JOBS, SKILLS};

    fn skill_named(name: &str) -> Task {
        let info = SKILLS.iter().find(|s| s.name == name).unwrap();
        Task::skill(info).unwrap()
    }

    fn job_named(name: &str) -> Task {
        let info = JOBS.iter().find(|j| j.name == name).unwrap();
        Task::job(info).unwrap()
    }

    #[test]
    fn max_xp_formula() {
        let mut beggar = job_named("Beggar");
        assert_eq!(beggar.max_xp(), 50.0);
        beggar.level = 1;
        assert_eq!(beggar.max_xp(), 101.0);
        beggar.level = 10;
        // 50 × 11 × 1.01^10 = 607.5…
        assert_eq!(beggar.max_xp(), 608.0);
    }

    #[test]
    fn xp_left_counts_down() {
        let mut task = skill_named("Concentration");
        task.xp = 30.0;
        assert_eq!(task.xp_left(), 70.0);
    }

    #[test]
    fn add_xp_single_level() {
        let mut task = skill_named("Concentration");
        assert_eq!(task.add_xp(120.0), 1);
        assert_eq!(task.level, 1);
        assert!((task.xp - 20.0).abs() < 1e-9);
    }

    #[test]
    fn add_xp_consumes_several_levels() {
        let mut task = skill_named("Concentration");
        // 100 + 202 + 306 = 608, 50 left over
        assert_eq!(task.add_xp(658.0), 3);
        assert_eq!(task.level, 3);
        assert!((task.xp - 50.0).abs() < 1e-9);
        assert!(task.xp < task.max_xp());
    }

    #[test]
    fn add_xp_ignores_non_positive() {
        let mut task = skill_named("Concentration");
        assert_eq!(task.add_xp(0.0), 0);
        assert_eq!(task.add_xp(-5.0), 0);
        assert_eq!(task.add_xp(f64::NAN), 0);
        assert_eq!(task.xp, 0.0);
    }

    #[test]
    fn huge_levels_do_not_wrap_or_overflow() {
        let mut task = skill_named("Concentration");
        task.level = u32::MAX;
        assert!(!task.is_reachable_level(task.level));
        assert_eq!(task.add_xp(1e20), 0);
        assert_eq!(task.level, u32::MAX);

        // Above i32::MAX the exponent must not go negative.
        task.level = 2_147_483_648;
        assert_eq!(task.max_xp(), f64::INFINITY);
        assert_eq!(task.add_xp(1e20), 0);
    }

    #[test]
    fn reachable_levels_end_where_max_xp_overflows() {
        let task = skill_named("Concentration");
        assert!(task.is_reachable_level(0));
        assert!(task.is_reachable_level(50_000));
        assert!(!task.is_reachable_level(100_000));
    }

    #[test]
    fn max_level_multiplier() {
        let mut task = job_named("Farmer");
        assert_eq!(task.max_level_multiplier(), 1.0);
        task.max_level = 25;
        assert!((task.max_level_multiplier() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn job_level_multiplier() {
        let mut task = job_named("Farmer");
        assert_eq!(task.level_multiplier(), 1.0);
        task.level = 99;
        assert!((task.level_multiplier() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn linear_skill_effect() {
        let mut task = skill_named("Concentration");
        task.level = 50;
        assert!((task.skill_effect().unwrap() - 1.5).abs() < 1e-12);
        assert_eq!(task.effect_description().unwrap(), "x1.50 Skill xp");
    }

    #[test]
    fn time_warping_override() {
        let mut task = skill_named("Time warping");
        task.level = 168;
        assert!((task.skill_effect().unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn immortality_override() {
        let mut task = skill_named("Immortality");
        task.level = 32;
        assert!((task.skill_effect().unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn bargaining_override_has_floor() {
        let mut task = skill_named("Bargaining");
        assert!((task.skill_effect().unwrap() - 1.0).abs() < 1e-12);
        task.level = 48;
        // log7(49) = 2
        assert!((task.skill_effect().unwrap() - 0.8).abs() < 1e-9);
        task.level = u32::MAX / 2;
        assert_eq!(task.skill_effect().unwrap(), 0.1);
    }

    #[test]
    fn jobs_have_no_skill_effect() {
        let task = job_named("Knight");
        assert!(task.skill_effect().is_none());
        assert!(task.effect_description().is_none());
        assert_eq!(task.base_income(), Some(300.0));
    }

    #[test]
    fn rejects_invalid_max_xp() {
        let bad = JobInfo {
            name: "Ghost",
            category: Category::CommonWork,
            max_xp: 0.0,
            income: 1.0,
        };
        assert!(matches!(
            Task::job(&bad),
            Err(GameError::InvalidEntity { .. })
        ));
    }

    #[test]
    fn rejects_wrong_category() {
        let bad = SkillInfo {
            name: "Farming",
            category: Category::CommonWork,
            max_xp: 100.0,
            effect: 0.01,
            description: "Nothing",
        };
        assert!(Task::skill(&bad).is_err());
    }

    #[test]
    fn property_label_is_happiness() {
        let tent = Item::new(ITEMS.iter().find(|i| i.name == "Tent").unwrap()).unwrap();
        assert_eq!(tent.kind, ItemKind::Property);
        assert_eq!(tent.effect_description(), "x1.4 Happiness");
        let book = Item::new(ITEMS.iter().find(|i| i.name == "Book").unwrap()).unwrap();
        assert_eq!(book.effect_description(), "x1.5 Skill xp");
    }
}
