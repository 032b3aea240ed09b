//! WebAssembly bindings for the switch panel Core
//!
//! The web shell serializes events and effect outputs with bincode, hands them
//! to these functions and executes whatever effects come back (HTTP requests,
//! delays and render requests).

use lazy_static::lazy_static;
use wasm_bindgen::prelude::wasm_bindgen;

use crux_core::{
    bridge::{Bridge, EffectId},
    Core,
};

use crate::App;

lazy_static! {
    static ref CORE: Bridge<App> = Bridge::new(Core::new());
}

/// Route `log` output to the browser console. Runs when the module is loaded.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };

    // A second initialization (e.g. module reloaded by the dev server) keeps
    // the first logger.
    let _ = console_log::init_with_level(level);
}

fn report(context: &str, result: Result<(), impl std::fmt::Display>) {
    if let Err(e) = result {
        log::error!("{context}: {e}");
    }
}

/// Process a serialized `Event`, returning the serialized effects it caused.
#[wasm_bindgen]
pub fn process_event(event_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    report(
        "failed to process event",
        CORE.update(event_bytes, &mut effects),
    );
    effects
}

/// Serialized `ViewModel` for the current state.
#[wasm_bindgen]
pub fn view() -> Vec<u8> {
    let mut view = Vec::new();
    report("failed to render view model", CORE.view(&mut view));
    view
}

/// Resolve the effect `id` with a serialized output (HTTP response, elapsed
/// delay), returning the serialized follow-up effects.
#[wasm_bindgen]
pub fn handle_response(id: u32, response_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    report(
        "failed to handle effect response",
        CORE.resolve(EffectId(id), response_bytes, &mut effects),
    );
    effects
}
