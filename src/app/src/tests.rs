use super::*;
use crux_core::{App as _, Command, Request};
use crux_http::{
    protocol::{HttpRequest, HttpResponse, HttpResult as HttpOutcome},
    HttpError,
};

fn http_request(cmd: &mut Command<Effect, Event>) -> Request<HttpRequest> {
    cmd.effects()
        .find_map(|effect| match effect {
            Effect::Http(request) => Some(request),
            _ => None,
        })
        .expect("expected an HTTP effect")
}

fn delay_request(cmd: &mut Command<Effect, Event>) -> Option<Request<DelayOperation>> {
    cmd.effects().find_map(|effect| match effect {
        Effect::Delay(request) => Some(request),
        _ => None,
    })
}

/// Resolve the pending HTTP effect of `cmd` and return the event it produced
fn respond(cmd: &mut Command<Effect, Event>, response: HttpResponse) -> Event {
    let mut request = http_request(cmd);
    request
        .resolve(HttpOutcome::Ok(response))
        .expect("failed to resolve HTTP request");
    cmd.events().next().expect("expected a response event")
}

/// Resolve the pending HTTP effect of `cmd` with a transport error
fn connection_lost(cmd: &mut Command<Effect, Event>) -> Event {
    let mut request = http_request(cmd);
    request
        .resolve(HttpOutcome::Err(HttpError::Io("connection refused".to_string())))
        .expect("failed to resolve HTTP request");
    cmd.events().next().expect("expected a response event")
}

fn unavailable() -> HttpResponse {
    HttpResponse::status(503).body("down").build()
}

/// Run one poll that fails and return the command the failure produced
fn failing_poll(model: &mut Model) -> Command<Effect, Event> {
    let mut cmd = App.update(Event::Polling(PollingEvent::Poll), model);
    let event = respond(&mut cmd, unavailable());
    App.update(event, model)
}

#[test]
fn test_initialize_starts_polling_status() {
    let mut model = Model::default();

    let mut cmd = App.update(Event::Initialize, &mut model);
    let request = http_request(&mut cmd);

    assert_eq!(request.operation.method, "GET");
    assert_eq!(request.operation.url, "https://relative/api/status");
    assert_eq!(model.polling, PollingState::Polling);
}

#[test]
fn test_repeated_initialize_keeps_single_poll_loop() {
    let mut model = Model::default();

    let mut cmd = App.update(Event::Initialize, &mut model);
    let event = respond(
        &mut cmd,
        HttpResponse::ok().body(r#"{"switches":{}}"#).build(),
    );
    let mut cmd = App.update(event, &mut model);
    let mut delay = delay_request(&mut cmd).expect("next poll not scheduled");

    let mut again = App.update(Event::Initialize, &mut model);
    assert!(again
        .effects()
        .all(|effect| matches!(effect, Effect::Render(_))));
    assert!(!model.poll_in_flight);

    delay
        .resolve(DelayOutput::Elapsed)
        .expect("failed to resolve delay");
    let event = cmd.events().next().expect("expected a poll event");
    let mut cmd = App.update(event, &mut model);
    assert_eq!(http_request(&mut cmd).operation.url, "https://relative/api/status");
}

#[test]
fn test_poll_success_reflects_states_and_reschedules() {
    let mut model = Model::default();
    model.apply_switch_state("fan", true);
    model.retries.record_failure();

    let mut cmd = App.update(Event::Initialize, &mut model);
    let event = respond(
        &mut cmd,
        HttpResponse::ok()
            .body(r#"{"switches":{"lamp":true,"fan":false}}"#)
            .build(),
    );
    let mut cmd = App.update(event, &mut model);

    let view = App.view(&model);
    let lamp = view.buttons.iter().find(|b| b.id == "lamp").unwrap();
    let fan = view.buttons.iter().find(|b| b.id == "fan").unwrap();
    assert!(lamp.classes.iter().any(|c| c == BUTTON_ON_CLASS));
    assert!(!fan.classes.iter().any(|c| c == BUTTON_ON_CLASS));
    assert_eq!(model.retries.count(), 0);

    let delay = delay_request(&mut cmd).expect("next poll not scheduled");
    assert_eq!(delay.operation, DelayOperation { millis: 1000 });
}

#[test]
fn test_elapsed_delay_triggers_next_poll() {
    let mut model = Model::default();

    let mut cmd = failing_poll(&mut model);
    let mut delay = delay_request(&mut cmd).expect("next poll not scheduled");
    delay
        .resolve(DelayOutput::Elapsed)
        .expect("failed to resolve delay");

    assert_eq!(
        cmd.events().next(),
        Some(Event::Polling(PollingEvent::Poll))
    );
}

#[test]
fn test_sixty_consecutive_failures_stop_polling() {
    let mut model = Model::default();

    for attempt in 1..MAX_RETRIES {
        let mut cmd = failing_poll(&mut model);
        assert_eq!(model.retries.count(), attempt);
        assert!(delay_request(&mut cmd).is_some());
    }

    let mut cmd = failing_poll(&mut model);
    assert_eq!(model.retries.count(), MAX_RETRIES);
    assert!(delay_request(&mut cmd).is_none());
    assert!(model.polling.is_stopped());

    let mut cmd = App.update(Event::Polling(PollingEvent::Poll), &mut model);
    assert!(cmd.effects().next().is_none());
    assert!(!App.view(&model).is_polling);
}

#[test]
fn test_success_after_fifty_nine_failures_resets_budget() {
    let mut model = Model::default();
    for _ in 0..MAX_RETRIES - 1 {
        let _ = failing_poll(&mut model);
    }

    let mut cmd = App.update(Event::Polling(PollingEvent::Poll), &mut model);
    let event = respond(
        &mut cmd,
        HttpResponse::ok().body(r#"{"switches":{}}"#).build(),
    );
    let mut cmd = App.update(event, &mut model);

    assert_eq!(model.retries.count(), 0);
    assert_eq!(model.polling, PollingState::Polling);
    assert!(delay_request(&mut cmd).is_some());
}

#[test]
fn test_undecodable_status_counts_as_failure() {
    let mut model = Model::default();

    let mut cmd = App.update(Event::Polling(PollingEvent::Poll), &mut model);
    let event = respond(&mut cmd, HttpResponse::ok().body("not json").build());
    let _ = App.update(event, &mut model);

    assert_eq!(model.retries.count(), 1);
}

#[test]
fn test_transport_error_counts_as_failure() {
    let mut model = Model::default();

    let mut cmd = App.update(Event::Polling(PollingEvent::Poll), &mut model);
    let event = connection_lost(&mut cmd);
    let mut cmd = App.update(event, &mut model);

    assert_eq!(model.retries.count(), 1);
    assert!(!model.poll_in_flight);
    assert!(delay_request(&mut cmd).is_some());
}

#[test]
fn test_unreachable_server_gives_up_without_scheduling() {
    let mut model = Model::default();
    for _ in 1..MAX_RETRIES {
        let mut cmd = App.update(Event::Polling(PollingEvent::Poll), &mut model);
        let event = connection_lost(&mut cmd);
        let _ = App.update(event, &mut model);
    }

    let mut cmd = App.update(Event::Polling(PollingEvent::Poll), &mut model);
    let event = connection_lost(&mut cmd);
    let mut last = App.update(event, &mut model);

    assert_eq!(model.polling, PollingState::Stopped);
    assert!(last
        .effects()
        .all(|effect| matches!(effect, Effect::Render(_))));
    assert!(!App.view(&model).is_polling);

    let mut cmd = App.update(Event::Initialize, &mut model);
    assert!(cmd.effects().all(|effect| matches!(effect, Effect::Render(_))));
    assert!(model.polling.is_stopped());
}

#[test]
fn test_toggle_posts_and_applies_returned_state() {
    let mut model = Model::default();

    let mut cmd = App.update(
        Event::Switch(SwitchEvent::Toggle {
            name: "lamp".to_string(),
        }),
        &mut model,
    );
    let request = http_request(&mut cmd);
    assert_eq!(request.operation.method, "POST");
    assert_eq!(request.operation.url, "https://relative/api/toggle_lamp");

    let mut cmd = App.update(
        Event::Switch(SwitchEvent::Toggle {
            name: "lamp".to_string(),
        }),
        &mut model,
    );
    let event = respond(&mut cmd, HttpResponse::ok().body(r#"{"state":true}"#).build());
    let _ = App.update(event, &mut model);

    let view = App.view(&model);
    assert_eq!(
        view.buttons,
        vec![SwitchButton {
            id: "lamp".to_string(),
            is_on: true,
            classes: vec![BUTTON_ON_CLASS.to_string()],
        }]
    );
}

#[test]
fn test_failed_toggle_is_dropped() {
    let mut model = Model::default();

    let mut cmd = App.update(
        Event::Switch(SwitchEvent::Toggle {
            name: "fan".to_string(),
        }),
        &mut model,
    );
    let event = respond(&mut cmd, unavailable());
    let _ = App.update(event, &mut model);

    assert!(model.switches.is_empty());
    assert_eq!(model.retries.count(), 0);
}
