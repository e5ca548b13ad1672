//! Game state: entity registries, selections, currencies and the derived
//! values every other module reads.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::config::{EngineConfig, DAYS_PER_YEAR};
use super::data::{
    ItemInfo, JobInfo, RequirementInfo, SkillInfo, DEFAULT_PROPERTY, DEFAULT_SKILL,
    HAPPINESS_ITEM, HAPPINESS_SKILL, ITEMS, JOBS, REQUIREMENTS, SKILLS,
};
use super::entity::{Category, Item, ItemKind, Task};
use super::error::GameError;
use super::format::{apply_multipliers, days_to_years};
use super::multiplier::{wire_item, wire_task, Multiplier};
use super::requirement::{ConditionContext, Requirement};

/// Base XP every task earns per tick before multipliers.
pub const BASE_XP_GAIN: f64 = 10.0;

/// Skills read by name outside of multiplier chains.
const FORMULA_SKILLS: [&str; 6] = [
    "Immortality",
    "Super immortality",
    "Time warping",
    "Evil control",
    "Blood meditation",
    HAPPINESS_SKILL,
];

pub struct GameState {
    pub config: EngineConfig,

    pub tasks: Vec<Task>,
    task_index: HashMap<&'static str, usize>,
    pub items: Vec<Item>,
    item_index: HashMap<&'static str, usize>,
    pub requirements: BTreeMap<&'static str, Requirement>,

    pub coins: f64,
    pub days: f64,
    pub evil: f64,
    pub paused: bool,
    pub time_warping_enabled: bool,
    pub rebirth_one_count: u32,
    pub rebirth_two_count: u32,

    pub current_job: usize,
    pub current_skill: usize,
    pub current_property: usize,
    /// Active misc items, in activation order, without duplicates.
    pub current_misc: Vec<usize>,

    pub auto_promote: bool,
    pub auto_learn: bool,
    /// Skills auto-learn must not pick.
    pub skipped_skills: BTreeSet<usize>,

    default_job: usize,
    default_skill: usize,
    default_property: usize,
}

impl GameState {
    /// Fresh game from the built-in tables.
    pub fn new() -> Result<Self, GameError> {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, GameError> {
        Self::from_tables(config, &JOBS, &SKILLS, &ITEMS, &REQUIREMENTS)
    }

    /// Build and wire every entity, then check that every name the formulas,
    /// chains and requirements refer to exists.
    pub fn from_tables(
        config: EngineConfig,
        jobs: &[JobInfo],
        skills: &[SkillInfo],
        items: &[ItemInfo],
        requirements: &[RequirementInfo],
    ) -> Result<Self, GameError> {
        let mut tasks = Vec::with_capacity(jobs.len() + skills.len());
        for info in jobs {
            tasks.push(Task::job(info)?);
        }
        for info in skills {
            tasks.push(Task::skill(info)?);
        }
        let mut task_index = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter_mut().enumerate() {
            wire_task(task);
            if task_index.insert(task.name, i).is_some() {
                return Err(GameError::invalid(task.name, "duplicate task name"));
            }
        }

        let mut built_items = Vec::with_capacity(items.len());
        let mut item_index = HashMap::with_capacity(items.len());
        for (i, info) in items.iter().enumerate() {
            let mut item = Item::new(info)?;
            wire_item(&mut item);
            if task_index.contains_key(item.name) || item_index.insert(item.name, i).is_some() {
                return Err(GameError::invalid(item.name, "duplicate entity name"));
            }
            built_items.push(item);
        }

        let chains = tasks
            .iter()
            .flat_map(|t| t.xp_multipliers.iter().chain(t.income_multipliers()))
            .chain(built_items.iter().flat_map(|i| i.expense_multipliers.iter()));
        for multiplier in chains {
            match multiplier {
                Multiplier::SkillEffect(name) => {
                    let idx = *task_index
                        .get(name)
                        .ok_or_else(|| GameError::UnknownTask(name.to_string()))?;
                    if !tasks[idx].is_skill() {
                        return Err(GameError::WrongKind {
                            name: name.to_string(),
                            expected: "skill",
                        });
                    }
                }
                Multiplier::ItemEffect(name) => {
                    if !item_index.contains_key(name) {
                        return Err(GameError::UnknownItem(name.to_string()));
                    }
                }
                _ => {}
            }
        }
        for name in FORMULA_SKILLS {
            if !task_index.contains_key(name) {
                return Err(GameError::UnknownTask(name.to_string()));
            }
        }
        if !item_index.contains_key(HAPPINESS_ITEM) {
            return Err(GameError::UnknownItem(HAPPINESS_ITEM.to_string()));
        }

        let mut reqs = BTreeMap::new();
        for info in requirements {
            reqs.insert(info.name, Requirement::from_info(info, &task_index)?);
        }
        for name in task_index.keys().chain(item_index.keys()) {
            if !reqs.contains_key(name) {
                return Err(GameError::UnknownRequirement(name.to_string()));
            }
        }

        let default_job = tasks
            .iter()
            .position(|t| t.category == Category::CommonWork)
            .ok_or_else(|| GameError::UnknownTask("common work job".to_string()))?;
        let default_skill = *task_index
            .get(DEFAULT_SKILL)
            .ok_or_else(|| GameError::UnknownTask(DEFAULT_SKILL.to_string()))?;
        let default_property = *item_index
            .get(DEFAULT_PROPERTY)
            .ok_or_else(|| GameError::UnknownItem(DEFAULT_PROPERTY.to_string()))?;

        Ok(Self {
            days: config.starting_days,
            config,
            tasks,
            task_index,
            items: built_items,
            item_index,
            requirements: reqs,
            coins: 0.0,
            evil: 0.0,
            paused: false,
            time_warping_enabled: true,
            rebirth_one_count: 0,
            rebirth_two_count: 0,
            current_job: default_job,
            current_skill: default_skill,
            current_property: default_property,
            current_misc: Vec::new(),
            auto_promote: false,
            auto_learn: false,
            skipped_skills: BTreeSet::new(),
            default_job,
            default_skill,
            default_property,
        })
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn task_id(&self, name: &str) -> Result<usize, GameError> {
        self.task_index
            .get(name)
            .copied()
            .ok_or_else(|| GameError::UnknownTask(name.to_string()))
    }

    pub fn item_id(&self, name: &str) -> Result<usize, GameError> {
        self.item_index
            .get(name)
            .copied()
            .ok_or_else(|| GameError::UnknownItem(name.to_string()))
    }

    pub fn task(&self, name: &str) -> Result<&Task, GameError> {
        Ok(&self.tasks[self.task_id(name)?])
    }

    pub fn task_mut(&mut self, name: &str) -> Result<&mut Task, GameError> {
        let id = self.task_id(name)?;
        Ok(&mut self.tasks[id])
    }

    pub fn item(&self, name: &str) -> Result<&Item, GameError> {
        Ok(&self.items[self.item_id(name)?])
    }

    pub fn current_job(&self) -> &Task {
        &self.tasks[self.current_job]
    }

    pub fn current_skill(&self) -> &Task {
        &self.tasks[self.current_skill]
    }

    pub fn current_property(&self) -> &Item {
        &self.items[self.current_property]
    }

    pub fn default_job(&self) -> usize {
        self.default_job
    }

    pub fn default_skill(&self) -> usize {
        self.default_skill
    }

    pub fn default_property(&self) -> usize {
        self.default_property
    }

    /// Task indices of a category, in table order.
    pub fn tasks_in(&self, category: Category) -> Vec<usize> {
        (0..self.tasks.len())
            .filter(|&i| self.tasks[i].category == category)
            .collect()
    }

    // ── Effects ──────────────────────────────────────────────────────

    fn skill_effect_by_name(&self, name: &str) -> f64 {
        self.task_index
            .get(name)
            .and_then(|&i| self.tasks[i].skill_effect())
            .unwrap_or(1.0)
    }

    pub fn skill_effect(&self, name: &str) -> Result<f64, GameError> {
        let task = self.task(name)?;
        task.skill_effect().ok_or_else(|| GameError::WrongKind {
            name: name.to_string(),
            expected: "skill",
        })
    }

    pub fn is_item_active(&self, id: usize) -> bool {
        id == self.current_property || self.current_misc.contains(&id)
    }

    /// Base effect while the item is in use, neutral otherwise.
    pub fn item_effect_at(&self, id: usize) -> f64 {
        if self.is_item_active(id) {
            self.items[id].base_effect
        } else {
            1.0
        }
    }

    /// Presence-gated effect of a named item.
    pub fn item_effect(&self, name: &str) -> Result<f64, GameError> {
        Ok(self.item_effect_at(self.item_id(name)?))
    }

    pub fn happiness(&self) -> f64 {
        self.skill_effect_by_name(HAPPINESS_SKILL)
            * self.item_effect(HAPPINESS_ITEM).unwrap_or(1.0)
            * self.item_effect_at(self.current_property)
    }

    pub fn evil_gain(&self) -> f64 {
        self.skill_effect_by_name("Evil control") * self.skill_effect_by_name("Blood meditation")
    }

    // ── Multiplier chains ────────────────────────────────────────────

    pub fn multiplier_value(&self, owner: &Task, multiplier: Multiplier) -> f64 {
        match multiplier {
            Multiplier::MaxLevel => owner.max_level_multiplier(),
            Multiplier::JobLevel => owner.level_multiplier(),
            Multiplier::Happiness => self.happiness(),
            Multiplier::SkillEffect(name) => self.skill_effect_by_name(name),
            Multiplier::ItemEffect(name) => self.item_effect(name).unwrap_or(1.0),
            Multiplier::Evil => self.evil,
        }
    }

    /// XP per tick at normal speed.
    pub fn task_xp_gain(&self, id: usize) -> f64 {
        let task = &self.tasks[id];
        apply_multipliers(
            BASE_XP_GAIN,
            task.xp_multipliers
                .iter()
                .map(|&m| self.multiplier_value(task, m)),
        )
    }

    /// Income per tick at normal speed; zero for skills.
    pub fn job_income(&self, id: usize) -> f64 {
        let task = &self.tasks[id];
        match task.base_income() {
            Some(base) => apply_multipliers(
                base,
                task.income_multipliers()
                    .iter()
                    .map(|&m| self.multiplier_value(task, m)),
            ),
            None => 0.0,
        }
    }

    pub fn item_expense(&self, id: usize) -> f64 {
        let item = &self.items[id];
        let owner = &self.tasks[self.default_skill];
        apply_multipliers(
            item.base_expense,
            item.expense_multipliers
                .iter()
                .map(|&m| self.multiplier_value(owner, m)),
        )
    }

    pub fn income(&self) -> f64 {
        self.job_income(self.current_job)
    }

    /// Current property plus every active misc item.
    pub fn expense(&self) -> f64 {
        self.item_expense(self.current_property)
            + self
                .current_misc
                .iter()
                .map(|&i| self.item_expense(i))
                .sum::<f64>()
    }

    /// Gain one more XP into `id` at the current game speed. Returns levels gained.
    pub fn increase_task_xp(&mut self, id: usize) -> u32 {
        let gain = self.apply_speed(self.task_xp_gain(id));
        self.tasks[id].add_xp(gain)
    }

    // ── Time ─────────────────────────────────────────────────────────

    pub fn lifespan(&self) -> f64 {
        self.config.base_lifespan_days
            * self.skill_effect_by_name("Immortality")
            * self.skill_effect_by_name("Super immortality")
    }

    pub fn is_alive(&self) -> bool {
        self.days < self.lifespan()
    }

    pub fn age_years(&self) -> u32 {
        days_to_years(self.days)
    }

    pub fn lifespan_years(&self) -> f64 {
        (self.lifespan() / DAYS_PER_YEAR).floor()
    }

    /// Pause, death and a disabled warp each scale throughput independently.
    pub fn game_speed(&self) -> f64 {
        let running = if self.paused { 0.0 } else { 1.0 };
        let alive = if self.is_alive() { 1.0 } else { 0.0 };
        let warp = if self.time_warping_enabled {
            self.skill_effect_by_name("Time warping")
        } else {
            1.0
        };
        self.config.base_game_speed * running * alive * warp
    }

    /// Scale a per-second-at-base-speed value down to one tick.
    pub fn apply_speed(&self, value: f64) -> f64 {
        value * self.game_speed() / self.config.updates_per_second.max(1) as f64
    }

    // ── Requirements ─────────────────────────────────────────────────

    pub fn condition_context(&self) -> ConditionContext<'_> {
        ConditionContext {
            tasks: &self.tasks,
            coins: self.coins,
            days: self.days,
            evil: self.evil,
        }
    }

    /// Evaluate (and memoize) a requirement.
    pub fn is_unlocked(&mut self, name: &str) -> Result<bool, GameError> {
        let ctx = ConditionContext {
            tasks: &self.tasks,
            coins: self.coins,
            days: self.days,
            evil: self.evil,
        };
        let requirement = self
            .requirements
            .get_mut(name)
            .ok_or_else(|| GameError::UnknownRequirement(name.to_string()))?;
        Ok(requirement.check(&ctx))
    }

    /// Memoized flag only, without evaluating.
    pub fn is_completed(&self, name: &str) -> Result<bool, GameError> {
        self.requirements
            .get(name)
            .map(|r| r.completed)
            .ok_or_else(|| GameError::UnknownRequirement(name.to_string()))
    }

    pub fn missing_conditions(&self, name: &str) -> Result<Vec<String>, GameError> {
        let requirement = self
            .requirements
            .get(name)
            .ok_or_else(|| GameError::UnknownRequirement(name.to_string()))?;
        Ok(requirement.missing(&self.condition_context()))
    }

    pub fn is_misc(&self, id: usize) -> bool {
        self.items[id].kind == ItemKind::Misc
    }
}
