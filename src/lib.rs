//! Idle Knight progression engine.
//!
//! `game` holds the simulation, `time` the fixed-timestep clock, `host` the
//! running game of the page, and `web` the browser callbacks that drive it.

pub mod game;
pub mod host;
pub mod time;

#[cfg(target_arch = "wasm32")]
pub mod web;
