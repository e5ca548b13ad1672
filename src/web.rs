//! Browser host: drives the running game from `setInterval` and exposes a
//! small JSON API to the page.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::game::actions::PlayerAction;
use crate::game::config::EngineConfig;
use crate::game::error::GameError;
use crate::game::{save, IdleGame};
use crate::host;

fn to_js(e: GameError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn with_game<R>(f: impl FnOnce(&mut IdleGame) -> Result<R, GameError>) -> Result<R, JsValue> {
    host::with_game(f)
        .ok_or_else(|| JsValue::from_str("Idle Knight: start() has not been called"))?
        .map_err(to_js)
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}

/// Load the saved game (or start a new one) and begin ticking. Calling it
/// again while a game is running does nothing.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if host::is_running() {
        return Ok(());
    }

    let config = EngineConfig::default();
    let interval = config.tick_interval_ms() as i32;
    let game = IdleGame::from_state(save::load_game(config).map_err(to_js)?);
    if !host::install(game) {
        return Ok(());
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let on_tick = Closure::<dyn FnMut()>::new(move || {
        host::with_game(|game| {
            game.frame(now_ms());
            if game.take_autosave() {
                save::save_game(&game.state);
            }
        });
    });
    window.set_interval_with_callback_and_timeout_and_arguments_0(
        on_tick.as_ref().unchecked_ref::<js_sys::Function>(),
        interval,
    )?;
    // The interval lives as long as the page.
    on_tick.forget();
    Ok(())
}

/// Everything the page needs to draw, as JSON.
#[wasm_bindgen]
pub fn view_json() -> Result<String, JsValue> {
    let view = with_game(|game| Ok(game.view()))?;
    serde_json::to_string(&view).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Apply a player action given as JSON, e.g. `{"type":"set_job","name":"Farmer"}`.
#[wasm_bindgen]
pub fn dispatch(action_json: &str) -> Result<(), JsValue> {
    let action: PlayerAction = serde_json::from_str(action_json)
        .map_err(|e| JsValue::from_str(&format!("bad action: {e}")))?;
    with_game(|game| game.dispatch(&action))
}

/// Encoded character snapshot for the narrative layer.
#[wasm_bindgen]
pub fn snapshot() -> Result<String, JsValue> {
    with_game(|game| Ok(game.snapshot().encode()))
}

#[wasm_bindgen]
pub fn export_save() -> Result<String, JsValue> {
    with_game(|game| game.export_save())
}

#[wasm_bindgen]
pub fn import_save(json: &str) -> Result<(), JsValue> {
    with_game(|game| {
        game.import_save(json)?;
        save::save_game(&game.state);
        Ok(())
    })
}

#[wasm_bindgen]
pub fn hard_reset() -> Result<(), JsValue> {
    with_game(|game| {
        save::delete_save();
        game.hard_reset()
    })
}
