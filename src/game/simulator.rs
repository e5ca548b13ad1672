//! Headless balance simulator.
//!
//! Plays a greedy policy: the best-paying of the most advanced unlocked
//! jobs, the most comfortable home the income can carry, misc items while
//! they stay affordable, automation once it unlocks, a rebirth on death.
//! Run the balance checks with:
//! `cargo test simulator -- --nocapture`

use tracing::{debug, info};

use super::actions::{self, PlayerAction};
use super::entity::ItemKind;
use super::logic;
use super::rebirth;
use super::state::GameState;

/// Ticks between two policy decisions.
const DECISION_INTERVAL: u64 = 20;
/// Share of income the policy is willing to spend on a home.
const PROPERTY_BUDGET: f64 = 0.4;
/// Share of income all upkeep together may use.
const TOTAL_BUDGET: f64 = 0.6;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationReport {
    pub ticks: u64,
    pub deaths: u32,
    pub bankruptcies: u32,
    pub rebirth_one_count: u32,
    pub rebirth_two_count: u32,
    pub job_levels: u64,
    pub skill_levels: u64,
    /// Best-paying job held at any point.
    pub best_job: &'static str,
    pub best_income: f64,
    pub final_age: u32,
    pub final_coins: f64,
    pub final_evil: f64,
}

/// Play `ticks` updates on `state`.
pub fn run(state: &mut GameState, ticks: u64) -> SimulationReport {
    let mut report = SimulationReport {
        best_job: state.current_job().name,
        ..SimulationReport::default()
    };

    for t in 0..ticks {
        if t % DECISION_INTERVAL == 0 {
            decide(state);
            let income = state.income();
            if income > report.best_income {
                report.best_income = income;
                report.best_job = state.current_job().name;
            }
        }
        let outcome = logic::update(state);
        report.job_levels += outcome.job_levels as u64;
        report.skill_levels += outcome.skill_levels as u64;
        report.deaths += outcome.died as u32;
        report.bankruptcies += outcome.bankrupt as u32;
    }

    report.ticks = ticks;
    report.rebirth_one_count = state.rebirth_one_count;
    report.rebirth_two_count = state.rebirth_two_count;
    report.final_age = state.age_years();
    report.final_coins = state.coins;
    report.final_evil = state.evil;
    info!(
        ticks,
        rebirths = report.rebirth_one_count,
        evil_rebirths = report.rebirth_two_count,
        best_job = report.best_job,
        "simulation finished"
    );
    report
}

fn decide(state: &mut GameState) {
    if !state.is_alive() {
        let action = if rebirth::can_rebirth_two(state) {
            PlayerAction::RebirthTwo
        } else {
            PlayerAction::RebirthOne
        };
        if let Err(e) = actions::apply(state, &action) {
            debug!(error = %e, "rebirth refused");
        }
        return;
    }

    if !state.auto_learn {
        let enable = [
            PlayerAction::SetAutoLearn { enabled: true },
            PlayerAction::SetAutoPromote { enabled: true },
        ];
        for action in &enable {
            if let Err(e) = actions::apply(state, action) {
                debug!(error = %e, "automation not available yet");
                break;
            }
        }
    }

    choose_job(state);
    choose_items(state);
}

/// The most advanced unlocked job of each category, then the best paid
/// among those.
fn choose_job(state: &mut GameState) {
    let mut frontier: Vec<usize> = Vec::new();
    for (i, task) in state.tasks.iter().enumerate() {
        if !task.is_job() || !state.is_completed(task.name).unwrap_or(false) {
            continue;
        }
        frontier.retain(|&j| state.tasks[j].category != task.category);
        frontier.push(i);
    }
    let best = frontier
        .into_iter()
        .max_by(|&a, &b| state.job_income(a).total_cmp(&state.job_income(b)));
    if let Some(id) = best {
        if id != state.current_job {
            let name = state.tasks[id].name;
            if let Err(e) = actions::set_job(state, name) {
                debug!(job = name, error = %e, "job change refused");
            }
        }
    }
}

fn choose_items(state: &mut GameState) {
    let income = state.income();

    let home = (0..state.items.len())
        .filter(|&i| {
            state.items[i].kind == ItemKind::Property
                && state.is_completed(state.items[i].name).unwrap_or(false)
                && state.item_expense(i) <= income * PROPERTY_BUDGET
        })
        .max_by(|&a, &b| state.item_expense(a).total_cmp(&state.item_expense(b)));
    if let Some(id) = home {
        let name = state.items[id].name;
        if let Err(e) = actions::set_property(state, name) {
            debug!(property = name, error = %e, "move refused");
        }
    }

    for id in 0..state.items.len() {
        if !state.is_misc(id) || state.is_item_active(id) {
            continue;
        }
        let name = state.items[id].name;
        let unlocked = state.is_completed(name).unwrap_or(false);
        if unlocked && state.expense() + state.item_expense(id) <= income * TOTAL_BUDGET {
            if let Err(e) = actions::toggle_misc(state, name) {
                debug!(item = name, error = %e, "purchase refused");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ticks in one natural lifetime (14 to 70) at base speed.
    const ONE_LIFETIME: u64 = (56 * 365 * 5) as u64;

    #[test]
    fn refused_choices_leave_a_young_character_alone() {
        let mut s = GameState::new().unwrap();
        logic::refresh_requirements(&mut s);
        decide(&mut s);
        assert!(!s.auto_learn);
        assert!(!s.auto_promote);
        assert_eq!(s.current_job().name, "Beggar");
        assert_eq!(s.current_property().name, "Homeless");
        assert!(s.current_misc.is_empty());
    }

    #[test]
    fn first_life_leaves_begging() {
        let mut s = GameState::new().unwrap();
        let report = run(&mut s, 20_000);
        println!("{report:#?}");
        assert_ne!(report.best_job, "Beggar");
        assert!(report.job_levels > 10);
        assert_eq!(report.deaths, 0);
    }

    #[test]
    fn death_leads_to_rebirth() {
        let mut s = GameState::new().unwrap();
        let report = run(&mut s, ONE_LIFETIME + 1_000);
        println!("{report:#?}");
        assert_eq!(report.deaths, 1);
        assert_eq!(report.rebirth_one_count, 1);
        assert!(s.is_alive());
        assert!(s.tasks.iter().any(|t| t.max_level > 0));
    }

    #[test]
    fn policy_never_goes_bankrupt_from_a_clean_start() {
        let mut s = GameState::new().unwrap();
        let report = run(&mut s, 30_000);
        assert_eq!(report.bankruptcies, 0);
        assert!(s.coins >= 0.0);
    }
}
