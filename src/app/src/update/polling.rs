use crux_core::{render::render, Command};
use log::{debug, error};

use crate::events::{Event, PollingEvent};
use crate::http_json;
use crate::model::Model;
use crate::types::{PollingState, StatusResponse, POLL_INTERVAL_MS, STATUS_ENDPOINT};
use crate::{DelayCmd, Effect};

pub const GIVE_UP_MESSAGE: &str = "Unable to reach server. Giving up!";

/// Handle status polling events
pub fn handle(event: PollingEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        PollingEvent::Poll => handle_poll(model),
        PollingEvent::PollResponse(result) => handle_poll_response(result, model),
    }
}

/// Send one status request, unless polling stopped or a request is pending
fn handle_poll(model: &mut Model) -> Command<Effect, Event> {
    if model.polling.is_stopped() || model.poll_in_flight {
        return Command::done();
    }

    model.polling = PollingState::Polling;
    model.poll_in_flight = true;

    http_json!(get, STATUS_ENDPOINT, "Poll status", StatusResponse, |result| {
        Event::Polling(PollingEvent::PollResponse(result))
    })
}

/// Reflect the polled states, update the retry budget and schedule the next poll
fn handle_poll_response(
    result: Result<StatusResponse, String>,
    model: &mut Model,
) -> Command<Effect, Event> {
    model.poll_in_flight = false;

    match result {
        Ok(status) => {
            for (name, state) in status.switches {
                model.apply_switch_state(name, state);
            }
            model.retries.reset();
        }
        Err(e) => {
            model.retries.record_failure();
            debug!(
                "status poll failed ({} in a row): {e}",
                model.retries.count()
            );
        }
    }

    if model.retries.is_exhausted() {
        model.polling = PollingState::Stopped;
        error!("{GIVE_UP_MESSAGE}");
        return render();
    }

    Command::all([
        render(),
        DelayCmd::after(POLL_INTERVAL_MS)
            .build()
            .then_send(|_| Event::Polling(PollingEvent::Poll)),
    ])
}
