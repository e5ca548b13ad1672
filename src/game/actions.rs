//! Player actions and their handlers.
//!
//! Every mutation a player (or the narrative collaborator) may trigger goes
//! through [`apply`]. Handlers refuse locked or wrong-kind targets instead of
//! silently ignoring them.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::entity::ItemKind;
use super::error::GameError;
use super::rebirth;
use super::state::GameState;

/// Gate every automation toggle sits behind.
pub const AUTOMATION_GATE: &str = "Automation";
const REBIRTH_ONE_GATE: &str = "Rebirth note 2";
const REBIRTH_TWO_GATE: &str = "Rebirth note 3";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerAction {
    SetJob { name: String },
    SetSkill { name: String },
    SetProperty { name: String },
    ToggleMisc { name: String },
    SetPaused { paused: bool },
    TogglePause,
    SetTimeWarping { enabled: bool },
    SetAutoPromote { enabled: bool },
    SetAutoLearn { enabled: bool },
    ToggleSkillSkip { name: String },
    RebirthOne,
    RebirthTwo,
}

pub fn apply(state: &mut GameState, action: &PlayerAction) -> Result<(), GameError> {
    match action {
        PlayerAction::SetJob { name } => set_job(state, name),
        PlayerAction::SetSkill { name } => set_skill(state, name),
        PlayerAction::SetProperty { name } => set_property(state, name),
        PlayerAction::ToggleMisc { name } => toggle_misc(state, name).map(|_| ()),
        PlayerAction::SetPaused { paused } => {
            state.paused = *paused;
            Ok(())
        }
        PlayerAction::TogglePause => {
            state.paused = !state.paused;
            Ok(())
        }
        PlayerAction::SetTimeWarping { enabled } => {
            state.time_warping_enabled = *enabled;
            Ok(())
        }
        PlayerAction::SetAutoPromote { enabled } => {
            require_automation(state, *enabled)?;
            state.auto_promote = *enabled;
            Ok(())
        }
        PlayerAction::SetAutoLearn { enabled } => {
            require_automation(state, *enabled)?;
            state.auto_learn = *enabled;
            Ok(())
        }
        PlayerAction::ToggleSkillSkip { name } => toggle_skill_skip(state, name).map(|_| ()),
        PlayerAction::RebirthOne => {
            if !rebirth::can_rebirth_one(state) {
                return Err(GameError::Locked(REBIRTH_ONE_GATE.to_string()));
            }
            rebirth::rebirth_one(state);
            Ok(())
        }
        PlayerAction::RebirthTwo => {
            if !rebirth::can_rebirth_two(state) {
                return Err(GameError::Locked(REBIRTH_TWO_GATE.to_string()));
            }
            rebirth::rebirth_two(state);
            Ok(())
        }
    }
}

fn require_automation(state: &mut GameState, enabling: bool) -> Result<(), GameError> {
    if enabling && !state.is_unlocked(AUTOMATION_GATE)? {
        return Err(GameError::Locked(AUTOMATION_GATE.to_string()));
    }
    Ok(())
}

fn require_unlocked(state: &mut GameState, name: &str) -> Result<(), GameError> {
    if !state.is_unlocked(name)? {
        return Err(GameError::Locked(name.to_string()));
    }
    Ok(())
}

pub fn set_job(state: &mut GameState, name: &str) -> Result<(), GameError> {
    let id = state.task_id(name)?;
    if !state.tasks[id].is_job() {
        return Err(GameError::WrongKind {
            name: name.to_string(),
            expected: "job",
        });
    }
    require_unlocked(state, name)?;
    if state.current_job != id {
        info!(job = state.tasks[id].name, "job changed");
    }
    state.current_job = id;
    Ok(())
}

pub fn set_skill(state: &mut GameState, name: &str) -> Result<(), GameError> {
    let id = state.task_id(name)?;
    if !state.tasks[id].is_skill() {
        return Err(GameError::WrongKind {
            name: name.to_string(),
            expected: "skill",
        });
    }
    require_unlocked(state, name)?;
    state.current_skill = id;
    Ok(())
}

pub fn set_property(state: &mut GameState, name: &str) -> Result<(), GameError> {
    let id = state.item_id(name)?;
    if state.items[id].kind != ItemKind::Property {
        return Err(GameError::WrongKind {
            name: name.to_string(),
            expected: "property",
        });
    }
    require_unlocked(state, name)?;
    state.current_property = id;
    Ok(())
}

/// Activate or deactivate a misc item. Returns whether it is now active.
/// Deactivating never needs the item to be unlocked.
pub fn toggle_misc(state: &mut GameState, name: &str) -> Result<bool, GameError> {
    let id = state.item_id(name)?;
    if !state.is_misc(id) {
        return Err(GameError::WrongKind {
            name: name.to_string(),
            expected: "misc item",
        });
    }
    if let Some(pos) = state.current_misc.iter().position(|&i| i == id) {
        state.current_misc.remove(pos);
        return Ok(false);
    }
    require_unlocked(state, name)?;
    state.current_misc.push(id);
    Ok(true)
}

/// Exclude a skill from auto-learn, or include it again. Returns whether it
/// is now skipped.
pub fn toggle_skill_skip(state: &mut GameState, name: &str) -> Result<bool, GameError> {
    let id = state.task_id(name)?;
    if !state.tasks[id].is_skill() {
        return Err(GameError::WrongKind {
            name: name.to_string(),
            expected: "skill",
        });
    }
    if state.skipped_skills.remove(&id) {
        return Ok(false);
    }
    state.skipped_skills.insert(id);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::logic;

    fn state() -> GameState {
        let mut s = GameState::new().unwrap();
        logic::refresh_requirements(&mut s);
        s
    }

    fn act(s: &mut GameState, action: PlayerAction) -> Result<(), GameError> {
        apply(s, &action)
    }

    fn job(name: &str) -> PlayerAction {
        PlayerAction::SetJob { name: name.into() }
    }

    #[test]
    fn set_job_refuses_locked_job() {
        let mut s = state();
        let err = act(&mut s, job("Knight")).unwrap_err();
        assert!(matches!(err, GameError::Locked(name) if name == "Knight"));
        assert_eq!(s.current_job().name, "Beggar");
    }

    #[test]
    fn set_job_after_unlock() {
        let mut s = state();
        s.task_mut("Beggar").unwrap().level = 10;
        act(&mut s, job("Farmer")).unwrap();
        assert_eq!(s.current_job().name, "Farmer");
    }

    #[test]
    fn wrong_kind_targets_are_rejected() {
        let mut s = state();
        assert!(matches!(
            set_job(&mut s, "Concentration"),
            Err(GameError::WrongKind { expected: "job", .. })
        ));
        assert!(matches!(
            set_skill(&mut s, "Beggar"),
            Err(GameError::WrongKind { expected: "skill", .. })
        ));
        assert!(matches!(
            set_property(&mut s, "Book"),
            Err(GameError::WrongKind { .. })
        ));
        assert!(matches!(
            toggle_misc(&mut s, "Tent"),
            Err(GameError::WrongKind { .. })
        ));
        assert!(matches!(
            set_job(&mut s, "Jester"),
            Err(GameError::UnknownTask(_))
        ));
    }

    #[test]
    fn property_and_misc_selection() {
        let mut s = state();
        set_property(&mut s, "Tent").unwrap();
        assert_eq!(s.current_property().name, "Tent");
        assert!(matches!(
            set_property(&mut s, "Cottage"),
            Err(GameError::Locked(_))
        ));

        assert!(toggle_misc(&mut s, "Book").unwrap());
        assert_eq!(s.current_misc.len(), 1);
        assert!(!toggle_misc(&mut s, "Book").unwrap());
        assert!(s.current_misc.is_empty());
    }

    #[test]
    fn misc_can_be_dropped_after_relock() {
        let mut s = state();
        s.coins = 1e6;
        logic::refresh_requirements(&mut s);
        toggle_misc(&mut s, "Dumbbells").unwrap();
        s.requirements.get_mut("Dumbbells").unwrap().completed = false;
        s.coins = 0.0;
        assert!(!toggle_misc(&mut s, "Dumbbells").unwrap());
    }

    #[test]
    fn pause_actions() {
        let mut s = state();
        act(&mut s, PlayerAction::TogglePause).unwrap();
        assert!(s.paused);
        act(&mut s, PlayerAction::SetPaused { paused: false }).unwrap();
        assert!(!s.paused);
    }

    #[test]
    fn automation_needs_gate() {
        let mut s = state();
        assert!(matches!(
            act(&mut s, PlayerAction::SetAutoLearn { enabled: true }),
            Err(GameError::Locked(name)) if name == AUTOMATION_GATE
        ));
        // Turning it off is always allowed.
        act(&mut s, PlayerAction::SetAutoPromote { enabled: false }).unwrap();

        s.days = 365.0 * 20.0;
        act(&mut s, PlayerAction::SetAutoLearn { enabled: true }).unwrap();
        act(&mut s, PlayerAction::SetAutoPromote { enabled: true }).unwrap();
        assert!(s.auto_learn && s.auto_promote);
    }

    #[test]
    fn skill_skip_toggles() {
        let mut s = state();
        assert!(toggle_skill_skip(&mut s, "Strength").unwrap());
        assert!(!toggle_skill_skip(&mut s, "Strength").unwrap());
        assert!(s.skipped_skills.is_empty());
        assert!(toggle_skill_skip(&mut s, "Farmer").is_err());
    }

    #[test]
    fn rebirth_actions_are_age_gated() {
        let mut s = state();
        assert!(matches!(
            act(&mut s, PlayerAction::RebirthOne),
            Err(GameError::Locked(_))
        ));
        assert_eq!(s.rebirth_one_count, 0);

        s.days = 365.0 * 66.0;
        act(&mut s, PlayerAction::RebirthOne).unwrap();
        assert_eq!(s.rebirth_one_count, 1);
        assert_eq!(s.days, 365.0 * 14.0);

        assert!(act(&mut s, PlayerAction::RebirthTwo).is_err());
        s.days = 365.0 * 200.0;
        act(&mut s, PlayerAction::RebirthTwo).unwrap();
        assert_eq!(s.rebirth_two_count, 1);
        assert_eq!(s.evil, 1.0);
    }

    #[test]
    fn actions_parse_from_json() {
        let action: PlayerAction =
            serde_json::from_str(r#"{"type":"set_job","name":"Farmer"}"#).unwrap();
        assert_eq!(action, job("Farmer"));
        let action: PlayerAction = serde_json::from_str(r#"{"type":"rebirth_two"}"#).unwrap();
        assert_eq!(action, PlayerAction::RebirthTwo);
    }
}
