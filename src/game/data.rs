//! Static base data: every job, skill, item and unlock gate in the game.
//!
//! Table order matters: it is the display order, the order auto-promote walks
//! a job category in, and the tie-break order for auto-learn.

use super::entity::Category;

/// Static info about a job.
pub struct JobInfo {
    pub name: &'static str,
    pub category: Category,
    pub max_xp: f64,
    pub income: f64,
}

/// Static info about a skill. `effect` is the per-level bonus of the linear
/// formula; a few skills override it by name.
pub struct SkillInfo {
    pub name: &'static str,
    pub category: Category,
    pub max_xp: f64,
    pub effect: f64,
    pub description: &'static str,
}

/// Static info about a purchasable item.
pub struct ItemInfo {
    pub name: &'static str,
    pub category: Category,
    pub expense: f64,
    pub effect: f64,
    pub description: &'static str,
}

/// One gate condition, referenced by name.
#[derive(Clone, Copy, Debug)]
pub enum ConditionInfo {
    TaskLevel(&'static str, u32),
    Coins(f64),
    Age(u32),
    Evil(f64),
}

/// Static info about a requirement. All conditions of one requirement share
/// the comparison source.
pub struct RequirementInfo {
    pub name: &'static str,
    pub conditions: &'static [ConditionInfo],
}

const fn job(name: &'static str, category: Category, max_xp: f64, income: f64) -> JobInfo {
    JobInfo {
        name,
        category,
        max_xp,
        income,
    }
}

const fn skill(
    name: &'static str,
    category: Category,
    effect: f64,
    description: &'static str,
) -> SkillInfo {
    SkillInfo {
        name,
        category,
        max_xp: 100.0,
        effect,
        description,
    }
}

const fn item(
    name: &'static str,
    category: Category,
    expense: f64,
    effect: f64,
    description: &'static str,
) -> ItemInfo {
    ItemInfo {
        name,
        category,
        expense,
        effect,
        description,
    }
}

const fn req(name: &'static str, conditions: &'static [ConditionInfo]) -> RequirementInfo {
    RequirementInfo { name, conditions }
}

use Category::*;
use ConditionInfo::{Age, Coins, Evil, TaskLevel};

pub const JOBS: [JobInfo; 20] = [
    job("Beggar", CommonWork, 50.0, 5.0),
    job("Farmer", CommonWork, 100.0, 9.0),
    job("Fisherman", CommonWork, 200.0, 15.0),
    job("Miner", CommonWork, 400.0, 40.0),
    job("Blacksmith", CommonWork, 800.0, 80.0),
    job("Merchant", CommonWork, 1600.0, 150.0),
    job("Squire", Military, 100.0, 5.0),
    job("Footman", Military, 1000.0, 50.0),
    job("Veteran footman", Military, 10_000.0, 120.0),
    job("Knight", Military, 100_000.0, 300.0),
    job("Veteran knight", Military, 1_000_000.0, 1000.0),
    job("Elite knight", Military, 7_500_000.0, 3000.0),
    job("Holy knight", Military, 40_000_000.0, 15_000.0),
    job("Legendary knight", Military, 150_000_000.0, 50_000.0),
    job("Student", ArcaneAssociation, 100_000.0, 100.0),
    job("Apprentice mage", ArcaneAssociation, 1_000_000.0, 1000.0),
    job("Mage", ArcaneAssociation, 10_000_000.0, 7500.0),
    job("Wizard", ArcaneAssociation, 100_000_000.0, 50_000.0),
    job("Master wizard", ArcaneAssociation, 10_000_000_000.0, 250_000.0),
    job("Chairman", ArcaneAssociation, 1_000_000_000_000.0, 1_000_000.0),
];

pub const SKILLS: [SkillInfo; 17] = [
    skill("Concentration", Fundamentals, 0.01, "Skill xp"),
    skill("Productivity", Fundamentals, 0.01, "Job xp"),
    skill("Bargaining", Fundamentals, -0.01, "Expenses"),
    skill("Meditation", Fundamentals, 0.01, "Happiness"),
    skill("Strength", Combat, 0.01, "Military pay"),
    skill("Battle tactics", Combat, 0.01, "Military xp"),
    skill("Muscle memory", Combat, 0.01, "Strength xp"),
    skill("Mana control", Magic, 0.01, "T.A.A. xp"),
    skill("Immortality", Magic, 0.01, "Longer lifespan"),
    skill("Time warping", Magic, 0.01, "Gamespeed"),
    skill("Super immortality", Magic, 0.01, "Longer lifespan"),
    skill("Dark influence", DarkMagic, 0.01, "All xp"),
    skill("Evil control", DarkMagic, 0.01, "Evil gain"),
    skill("Intimidation", DarkMagic, -0.01, "Expenses"),
    skill("Demon training", DarkMagic, 0.01, "All xp"),
    skill("Blood meditation", DarkMagic, 0.01, "Evil gain"),
    skill("Demon's wealth", DarkMagic, 0.002, "Job pay"),
];

pub const ITEMS: [ItemInfo; 16] = [
    item("Homeless", Properties, 0.0, 1.0, "Happiness"),
    item("Tent", Properties, 15.0, 1.4, "Happiness"),
    item("Wooden hut", Properties, 100.0, 2.0, "Happiness"),
    item("Cottage", Properties, 750.0, 3.5, "Happiness"),
    item("House", Properties, 3000.0, 6.0, "Happiness"),
    item("Large house", Properties, 25_000.0, 12.0, "Happiness"),
    item("Small palace", Properties, 300_000.0, 25.0, "Happiness"),
    item("Grand palace", Properties, 5_000_000.0, 60.0, "Happiness"),
    item("Book", Misc, 10.0, 1.5, "Skill xp"),
    item("Dumbbells", Misc, 50.0, 1.5, "Strength xp"),
    item("Personal squire", Misc, 200.0, 2.0, "Job xp"),
    item("Steel longsword", Misc, 1000.0, 2.0, "Military xp"),
    item("Butler", Misc, 7500.0, 1.5, "Happiness"),
    item("Sapphire charm", Misc, 50_000.0, 3.0, "Magic xp"),
    item("Study desk", Misc, 1_000_000.0, 2.0, "Skill xp"),
    item("Library", Misc, 10_000_000.0, 1.5, "Skill xp"),
];

pub const REQUIREMENTS: [RequirementInfo; 64] = [
    // UI gates
    req(
        "The Arcane Association",
        &[TaskLevel("Concentration", 200), TaskLevel("Meditation", 200)],
    ),
    req("Dark magic", &[Evil(1.0)]),
    req("Shop", &[Coins(15.0 * 50.0)]),
    req("Rebirth tab", &[Age(25)]),
    req("Rebirth note 1", &[Age(45)]),
    req("Rebirth note 2", &[Age(65)]),
    req("Rebirth note 3", &[Age(200)]),
    req("Evil info", &[Evil(1.0)]),
    req("Time warping info", &[TaskLevel("Mage", 10)]),
    req("Automation", &[Age(20)]),
    req("Quick task display", &[Age(20)]),
    // Common work
    req("Beggar", &[]),
    req("Farmer", &[TaskLevel("Beggar", 10)]),
    req("Fisherman", &[TaskLevel("Farmer", 10)]),
    req("Miner", &[TaskLevel("Strength", 10), TaskLevel("Fisherman", 10)]),
    req("Blacksmith", &[TaskLevel("Strength", 30), TaskLevel("Miner", 10)]),
    req("Merchant", &[TaskLevel("Bargaining", 50), TaskLevel("Blacksmith", 10)]),
    // Military
    req("Squire", &[TaskLevel("Strength", 5)]),
    req("Footman", &[TaskLevel("Strength", 20), TaskLevel("Squire", 10)]),
    req(
        "Veteran footman",
        &[TaskLevel("Battle tactics", 40), TaskLevel("Footman", 10)],
    ),
    req("Knight", &[TaskLevel("Strength", 100), TaskLevel("Veteran footman", 10)]),
    req(
        "Veteran knight",
        &[TaskLevel("Battle tactics", 150), TaskLevel("Knight", 10)],
    ),
    req("Elite knight", &[TaskLevel("Strength", 300), TaskLevel("Veteran knight", 10)]),
    req("Holy knight", &[TaskLevel("Mana control", 500), TaskLevel("Elite knight", 10)]),
    req(
        "Legendary knight",
        &[
            TaskLevel("Mana control", 1000),
            TaskLevel("Battle tactics", 1000),
            TaskLevel("Holy knight", 10),
        ],
    ),
    // The Arcane Association
    req("Student", &[TaskLevel("Concentration", 200), TaskLevel("Meditation", 200)]),
    req("Apprentice mage", &[TaskLevel("Mana control", 400), TaskLevel("Student", 10)]),
    req("Mage", &[TaskLevel("Mana control", 700), TaskLevel("Apprentice mage", 10)]),
    req("Wizard", &[TaskLevel("Mana control", 1000), TaskLevel("Mage", 10)]),
    req("Master wizard", &[TaskLevel("Mana control", 1500), TaskLevel("Wizard", 10)]),
    req("Chairman", &[TaskLevel("Mana control", 2000), TaskLevel("Master wizard", 10)]),
    // Fundamentals
    req("Concentration", &[]),
    req("Productivity", &[TaskLevel("Concentration", 5)]),
    req("Bargaining", &[TaskLevel("Concentration", 20)]),
    req("Meditation", &[TaskLevel("Concentration", 30), TaskLevel("Productivity", 20)]),
    // Combat
    req("Strength", &[]),
    req("Battle tactics", &[TaskLevel("Concentration", 20)]),
    req("Muscle memory", &[TaskLevel("Concentration", 30), TaskLevel("Strength", 30)]),
    // Magic
    req(
        "Mana control",
        &[TaskLevel("Concentration", 200), TaskLevel("Meditation", 200)],
    ),
    req("Immortality", &[TaskLevel("Apprentice mage", 10)]),
    req("Time warping", &[TaskLevel("Mage", 10)]),
    req("Super immortality", &[TaskLevel("Chairman", 1000)]),
    // Dark magic
    req("Dark influence", &[Evil(1.0)]),
    req("Evil control", &[Evil(1.0)]),
    req("Intimidation", &[Evil(1.0)]),
    req("Demon training", &[Evil(25.0)]),
    req("Blood meditation", &[Evil(75.0)]),
    req("Demon's wealth", &[Evil(500.0)]),
    // Properties
    req("Homeless", &[Coins(0.0)]),
    req("Tent", &[Coins(0.0)]),
    req("Wooden hut", &[Coins(100.0 * 100.0)]),
    req("Cottage", &[Coins(750.0 * 100.0)]),
    req("House", &[Coins(3000.0 * 100.0)]),
    req("Large house", &[Coins(25_000.0 * 100.0)]),
    req("Small palace", &[Coins(300_000.0 * 100.0)]),
    req("Grand palace", &[Coins(5_000_000.0 * 100.0)]),
    // Misc
    req("Book", &[Coins(0.0)]),
    req("Dumbbells", &[Coins(50.0 * 100.0)]),
    req("Personal squire", &[Coins(200.0 * 100.0)]),
    req("Steel longsword", &[Coins(1000.0 * 100.0)]),
    req("Butler", &[Coins(7500.0 * 100.0)]),
    req("Sapphire charm", &[Coins(50_000.0 * 100.0)]),
    req("Study desk", &[Coins(1_000_000.0 * 100.0)]),
    req("Library", &[Coins(10_000_000.0 * 100.0)]),
];

/// Requirements that stay unlocked through a rebirth once reached.
pub const PERMANENT_UNLOCKS: [&str; 3] = ["Shop", "Automation", "Quick task display"];

/// Task names only ever written by the pre-1.0 save layout. A save carrying
/// any of them is discarded instead of migrated.
pub const DEPRECATED_TASK_NAMES: [&str; 4] =
    ["Beggar job", "Strength skill", "Magic eye", "Evil eye"];

/// Default selections, used at bootstrap, on rebirth and on bankruptcy.
pub const DEFAULT_SKILL: &str = "Concentration";
pub const DEFAULT_PROPERTY: &str = "Homeless";

/// Named entities the happiness formula reads.
pub const HAPPINESS_SKILL: &str = "Meditation";
pub const HAPPINESS_ITEM: &str = "Butler";
