//! Idle Knight セーブ/ロード機能。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//!
//! `MIN_COMPATIBLE_VERSION` 以上のセーブデータは、不足フィールドを新規ゲームの
//! 値で補完して読み込む。タスク・アイテム・要件は名前で保存する。
//! 知らない名前は捨て、セーブに無いものは初期値のまま。
//! 旧形式（1.0 以前）のセーブはタスク名で判別し、移行せずに破棄する。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::config::EngineConfig;
use super::data::DEPRECATED_TASK_NAMES;
use super::entity::ItemKind;
use super::error::GameError;
use super::requirement::RequirementKind;
use super::state::GameState;

/// セーブデータのフォーマットバージョン。
/// フィールド追加時にインクリメントすること。
pub const SAVE_VERSION: u32 = 2;

/// 互換性を維持できる最小バージョン。
/// 破壊的変更を行った場合のみインクリメントする。
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// localStorage のキー。
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "idle_knight_save";

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct GameSave {
    coins: f64,
    days: f64,
    evil: f64,
    paused: bool,
    time_warping_enabled: bool,
    rebirth_one_count: u32,
    rebirth_two_count: u32,

    current_job: String,
    current_skill: String,
    current_property: String,
    current_misc: Vec<String>,

    // v2 で追加
    auto_promote: bool,
    auto_learn: bool,
    skipped_skills: Vec<String>,

    tasks: BTreeMap<String, TaskSave>,
    requirements: BTreeMap<String, RequirementSave>,
}

impl Default for GameSave {
    fn default() -> Self {
        Self {
            coins: 0.0,
            days: EngineConfig::default().starting_days,
            evil: 0.0,
            paused: false,
            time_warping_enabled: true,
            rebirth_one_count: 0,
            rebirth_two_count: 0,
            current_job: String::new(),
            current_skill: String::new(),
            current_property: String::new(),
            current_misc: Vec::new(),
            auto_promote: false,
            auto_learn: false,
            skipped_skills: Vec::new(),
            tasks: BTreeMap::new(),
            requirements: BTreeMap::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct TaskSave {
    level: u32,
    max_level: u32,
    xp: f64,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct RequirementSave {
    kind: Option<RequirementKind>,
    completed: bool,
}

fn extract_save(state: &GameState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            coins: sanitize(state.coins, 0.0),
            days: sanitize(state.days, state.config.starting_days),
            evil: sanitize(state.evil, 0.0),
            paused: state.paused,
            time_warping_enabled: state.time_warping_enabled,
            rebirth_one_count: state.rebirth_one_count,
            rebirth_two_count: state.rebirth_two_count,
            current_job: state.current_job().name.to_string(),
            current_skill: state.current_skill().name.to_string(),
            current_property: state.current_property().name.to_string(),
            current_misc: state
                .current_misc
                .iter()
                .map(|&i| state.items[i].name.to_string())
                .collect(),
            auto_promote: state.auto_promote,
            auto_learn: state.auto_learn,
            skipped_skills: state
                .skipped_skills
                .iter()
                .map(|&i| state.tasks[i].name.to_string())
                .collect(),
            tasks: state
                .tasks
                .iter()
                .map(|t| {
                    (
                        t.name.to_string(),
                        TaskSave {
                            level: t.level,
                            max_level: t.max_level,
                            xp: sanitize(t.xp, 0.0),
                        },
                    )
                })
                .collect(),
            requirements: state
                .requirements
                .iter()
                .map(|(name, r)| {
                    (
                        name.to_string(),
                        RequirementSave {
                            kind: Some(r.kind),
                            completed: r.completed,
                        },
                    )
                })
                .collect(),
        },
    }
}

/// 有限かつ非負ならそのまま、それ以外は `fallback`。
fn sanitize(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}

/// 新規状態の `state` に `save` を復元する。
/// xp バーが表せないレベルを含むセーブは全体を壊れたものとして扱う。
fn apply_save(state: &mut GameState, save: &GameSave) -> Result<(), GameError> {
    for (name, saved) in &save.tasks {
        let Ok(task) = state.task(name) else {
            continue;
        };
        for level in [saved.level, saved.max_level] {
            if !task.is_reachable_level(level) {
                return Err(GameError::invalid(name, format!("level {level} out of range")));
            }
        }
    }

    state.coins = sanitize(save.coins, 0.0);
    state.days = sanitize(save.days, state.config.starting_days);
    state.evil = sanitize(save.evil, 0.0);
    state.paused = save.paused;
    state.time_warping_enabled = save.time_warping_enabled;
    state.rebirth_one_count = save.rebirth_one_count;
    state.rebirth_two_count = save.rebirth_two_count;
    state.auto_promote = save.auto_promote;
    state.auto_learn = save.auto_learn;

    for (name, saved) in &save.tasks {
        let Ok(id) = state.task_id(name) else {
            continue;
        };
        let task = &mut state.tasks[id];
        task.level = saved.level;
        task.max_level = saved.max_level;
        task.xp = 0.0;
        // 旧バランスでの余剰 xp はレベルに変換する
        task.add_xp(sanitize(saved.xp, 0.0));
    }

    for (name, saved) in &save.requirements {
        let Some(requirement) = state.requirements.get_mut(name.as_str()) else {
            continue;
        };
        let same_kind = saved.kind.map_or(true, |k| k == requirement.kind);
        requirement.completed = same_kind && saved.completed;
    }

    if let Ok(id) = state.task_id(&save.current_job) {
        if state.tasks[id].is_job() {
            state.current_job = id;
        }
    }
    if let Ok(id) = state.task_id(&save.current_skill) {
        if state.tasks[id].is_skill() {
            state.current_skill = id;
        }
    }
    if let Ok(id) = state.item_id(&save.current_property) {
        if state.items[id].kind == ItemKind::Property {
            state.current_property = id;
        }
    }

    state.current_misc.clear();
    for name in &save.current_misc {
        if let Ok(id) = state.item_id(name) {
            if state.is_misc(id) && !state.current_misc.contains(&id) {
                state.current_misc.push(id);
            }
        }
    }

    state.skipped_skills.clear();
    for name in &save.skipped_skills {
        if let Ok(id) = state.task_id(name) {
            if state.tasks[id].is_skill() {
                state.skipped_skills.insert(id);
            }
        }
    }
    Ok(())
}

/// 状態に触れずにパースと検証だけを行う。
fn parse(json: &str) -> Result<SaveData, GameError> {
    let data: SaveData = serde_json::from_str(json)?;
    if data.version < MIN_COMPATIBLE_VERSION {
        return Err(GameError::IncompatibleSave {
            version: data.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }
    let game = &data.game;
    let deprecated = game
        .tasks
        .keys()
        .map(String::as_str)
        .chain([game.current_job.as_str(), game.current_skill.as_str()])
        .find(|name| DEPRECATED_TASK_NAMES.contains(name));
    if let Some(name) = deprecated {
        return Err(GameError::DeprecatedSave(name.to_string()));
    }
    Ok(data)
}

pub fn to_json(state: &GameState) -> Result<String, GameError> {
    Ok(serde_json::to_string(&extract_save(state))?)
}

/// 厳格なロード。セーブに問題があればエラーを返す。
pub fn from_json(json: &str, config: EngineConfig) -> Result<GameState, GameError> {
    let data = parse(json)?;
    let mut state = GameState::with_config(config)?;
    apply_save(&mut state, &data.game)?;
    Ok(state)
}

/// ロードできなければ新規ゲームで始める。
/// エラーになるのは基本データテーブルが壊れている場合のみ。
pub fn load_or_fresh(json: Option<&str>, config: EngineConfig) -> Result<GameState, GameError> {
    let Some(json) = json else {
        return GameState::with_config(config);
    };
    let mut state = GameState::with_config(config.clone())?;
    let restored = parse(json).and_then(|data| apply_save(&mut state, &data.game));
    match restored {
        Ok(()) => Ok(state),
        Err(e) => {
            warn!(error = %e, "discarding save, starting a new game");
            GameState::with_config(config)
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// localStorage にセーブする。失敗はコンソールに出力する。
#[cfg(target_arch = "wasm32")]
pub fn save_game(state: &GameState) {
    let json = match to_json(state) {
        Ok(j) => j,
        Err(e) => {
            web_sys::console::warn_1(&format!("Idle Knight: failed to serialize save: {e}").into());
            return;
        }
    };
    if let Some(storage) = get_storage() {
        if let Err(e) = storage.set_item(STORAGE_KEY, &json) {
            web_sys::console::warn_1(
                &format!("Idle Knight: failed to write localStorage: {e:?}").into(),
            );
        }
    }
}

/// localStorage からロードする。使えないセーブは削除して新規ゲームを始める。
#[cfg(target_arch = "wasm32")]
pub fn load_game(config: EngineConfig) -> Result<GameState, GameError> {
    let json = get_storage().and_then(|s| s.get_item(STORAGE_KEY).ok().flatten());
    let Some(json) = json else {
        return GameState::with_config(config);
    };
    match from_json(&json, config.clone()) {
        Ok(state) => Ok(state),
        Err(e) => {
            web_sys::console::warn_1(
                &format!("Idle Knight: discarding save data ({e}); starting a new game").into(),
            );
            delete_save();
            load_or_fresh(None, config)
        }
    }
}

/// セーブデータを削除する。
#[cfg(target_arch = "wasm32")]
pub fn delete_save() {
    if let Some(storage) = get_storage() {
        if let Err(e) = storage.remove_item(STORAGE_KEY) {
            web_sys::console::warn_1(&format!("Idle Knight: failed to delete save: {e:?}").into());
        }
    }
}
