//! Heart Hunt core crate.
//!
//! The playfield is buried under layers of hearts; clearing them (hover on
//! desktop, double tap on touch) eventually uncovers the dog hiding in one of
//! the corners. Game logic runs against the [`stage::Stage`] trait so it can be
//! exercised natively with [`stage::MemoryStage`]; [`dom`] binds it to a page.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod dom;
pub mod error;
pub mod game;
pub mod geometry;
pub mod heart;
pub mod reveal;
pub mod scheduler;
pub mod session;
pub mod stage;

pub use config::GameConfig;
pub use error::BootError;
pub use game::{FieldLayout, Game, Task, WinCause};
pub use heart::{Capabilities, HeartId, HeartState, InteractionStrategy};
pub use session::{GameSession, Phase};
pub use stage::{MemoryStage, Stage};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // Route `tracing` events to the browser console.
    #[cfg(all(feature = "tracing-wasm", target_arch = "wasm32"))]
    tracing_wasm::set_as_global_default();
}

fn report(result: Result<(), BootError>) -> Result<(), JsValue> {
    result.map_err(|err| {
        web_sys::console::error_1(&format!("heart hunt failed to start: {err}").into());
        JsValue::from(err)
    })
}

/// Boot with the default configuration. Calling it again resets the game.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    report(dom::boot(GameConfig::default()))
}

/// Boot with a JSON `GameConfig`; missing fields keep their defaults.
/// Must be the first boot on the page: once a game runs, later calls only
/// reset it and the config is ignored.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    report(GameConfig::from_json(json).and_then(dom::boot))
}

/// Same as pressing the reset control.
#[wasm_bindgen]
pub fn reset_game() {
    dom::with_game(|g| g.reset());
}
