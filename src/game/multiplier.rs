//! Multiplier descriptors and the wiring step that attaches them.
//!
//! A chain is a list of [`Multiplier`] values naming where each factor comes
//! from. Chains hold no references, so they survive (re)construction from
//! save data unchanged; [`GameState`](super::state::GameState) resolves them
//! against the live registries whenever a gain, income or expense is read.

use serde::Serialize;

use super::entity::{Category, Item, Task, TaskKind};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum Multiplier {
    /// The owning task's `max_level_multiplier`.
    MaxLevel,
    /// The owning job's `level_multiplier`.
    JobLevel,
    /// Meditation × Butler × current property.
    Happiness,
    /// Effect of the named skill.
    SkillEffect(&'static str),
    /// Presence-gated effect of the named item.
    ItemEffect(&'static str),
    /// Current evil amount, read at evaluation time.
    Evil,
}

/// Rebuild the xp (and, for jobs, income) chain of `task`. Calling it again
/// produces the same chains.
pub fn wire_task(task: &mut Task) {
    use Multiplier::*;

    let mut xp = vec![
        MaxLevel,
        Happiness,
        SkillEffect("Dark influence"),
        SkillEffect("Demon training"),
    ];
    let mut income = Vec::new();

    match task.kind {
        TaskKind::Job { .. } => {
            income.push(JobLevel);
            income.push(SkillEffect("Demon's wealth"));
            xp.push(SkillEffect("Productivity"));
            xp.push(ItemEffect("Personal squire"));
        }
        TaskKind::Skill { .. } => {
            xp.push(SkillEffect("Concentration"));
            xp.push(ItemEffect("Book"));
            xp.push(ItemEffect("Study desk"));
            xp.push(ItemEffect("Library"));
        }
    }

    if task.category == Category::Military {
        income.push(SkillEffect("Strength"));
        xp.push(SkillEffect("Battle tactics"));
        xp.push(ItemEffect("Steel longsword"));
    } else if task.name == "Strength" {
        xp.push(SkillEffect("Muscle memory"));
        xp.push(ItemEffect("Dumbbells"));
    } else if task.category == Category::Magic {
        xp.push(ItemEffect("Sapphire charm"));
    } else if task.category == Category::ArcaneAssociation {
        xp.push(SkillEffect("Mana control"));
    } else if task.category == Category::DarkMagic {
        xp.push(Evil);
    }

    task.xp_multipliers = xp;
    if let TaskKind::Job {
        income_multipliers, ..
    } = &mut task.kind
    {
        *income_multipliers = income;
    }
}

/// Expense-reducing skills apply to every item.
pub fn wire_item(item: &mut Item) {
    item.expense_multipliers = vec![
        Multiplier::SkillEffect("Bargaining"),
        Multiplier::SkillEffect("Intimidation"),
    ];
}
