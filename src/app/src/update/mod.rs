mod polling;
mod switch;

use crux_core::{render::render, Command};

use crate::events::{Event, PollingEvent};
use crate::model::Model;
use crate::types::PollingState;
use crate::Effect;

/// Route each event to the handler of its domain
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        // A repeated Initialize must not start a second poll loop
        Event::Initialize if model.polling != PollingState::Idle => render(),
        Event::Initialize => Command::all([
            render(),
            polling::handle(PollingEvent::Poll, model),
        ]),

        Event::Switch(switch_event) => switch::handle(switch_event, model),
        Event::Polling(polling_event) => polling::handle(polling_event, model),
    }
}
