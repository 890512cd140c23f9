//! Zoner Games in-browser WASM core.
//!
//! Drives the three zones of the hosting page — Reflex (NEON AIM), Mind
//! (COSMIC MEMORY), and Zen (FLOW GARDEN) — behind a shared game lifecycle
//! manager. Game logic lives in DOM-free modules ([`games`], [`manager`],
//! [`session`], [`surface`], [`config`]) testable under native `cargo test`;
//! the `dom` shell owns the canvas, the input listeners, and the single
//! requestAnimationFrame chain.
//!
//! The hosting page calls `start_game("reflex" | "mind" | "zen")` from its
//! zone buttons and `restart_game()` / `close_game()` from the end-of-game
//! menu. `configure(json)` retunes gameplay constants.

use wasm_bindgen::prelude::*;

pub mod config;
mod dom;
pub mod games;
pub mod manager;
pub mod session;
pub mod surface;

use session::GameKind;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Start the named zone. Wire names match the page's buttons: `"reflex"`,
/// `"mind"`, `"zen"`.
#[wasm_bindgen]
pub fn start_game(kind: &str) -> Result<(), JsValue> {
    let kind = GameKind::parse(kind)
        .ok_or_else(|| JsValue::from_str(&format!("unknown game kind: {}", kind)))?;
    dom::start(kind)
}

/// Restart whichever zone was last active. No-op before any game ran.
#[wasm_bindgen]
pub fn restart_game() -> Result<(), JsValue> {
    dom::restart()
}

/// Close the game overlay, cancelling any pending frame. Safe when idle.
#[wasm_bindgen]
pub fn close_game() -> Result<(), JsValue> {
    dom::close()
}

/// Apply a (possibly partial) JSON tuning override, e.g.
/// `{"aim":{"hit_tolerance":25.0}}`. Takes effect from the next start.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    dom::configure(json)
}
