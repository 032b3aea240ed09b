use crux_core::{render::render, Command};

use crate::events::{Event, SwitchEvent};
use crate::http_json;
use crate::model::Model;
use crate::types::{toggle_endpoint, ToggleResponse};
use crate::Effect;

/// Handle switch events (toggle request and its response)
pub fn handle(event: SwitchEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        SwitchEvent::Toggle { name } => {
            let endpoint = toggle_endpoint(&name);
            http_json!(post, &endpoint, "Toggle switch", ToggleResponse, move |result| {
                Event::Switch(SwitchEvent::ToggleResponse { name, result })
            })
        }

        SwitchEvent::ToggleResponse { name, result } => match result {
            Ok(ToggleResponse { state }) => {
                if model.apply_switch_state(name, state) {
                    render()
                } else {
                    Command::done()
                }
            }
            // Fire-and-forget: a failed toggle is dropped without feedback and
            // does not count against the poll retry budget.
            Err(_) => Command::done(),
        },
    }
}
