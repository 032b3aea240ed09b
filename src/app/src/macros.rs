/// Macro for bodiless requests that expect a JSON response.
/// The decoded result is handed to `$to_event`, which builds the response event.
///
/// # Patterns
///
/// POST expecting JSON
/// ```ignore
/// http_json!(post, &toggle_endpoint(&name), "Toggle switch", ToggleResponse,
///     move |result| Event::Switch(SwitchEvent::ToggleResponse { name, result })
/// )
/// ```
///
/// GET expecting JSON
/// ```ignore
/// http_json!(get, STATUS_ENDPOINT, "Poll status", StatusResponse,
///     |result| Event::Polling(PollingEvent::PollResponse(result))
/// )
/// ```
#[macro_export]
macro_rules! http_json {
    (post, $endpoint:expr, $action:expr, $response_type:ty, $to_event:expr) => {{
        let to_event = $to_event;
        $crate::HttpCmd::post($crate::build_url($endpoint))
            .build()
            .then_send(move |result| {
                let event_result: Result<$response_type, String> =
                    $crate::process_json_response($action, result);
                to_event(event_result)
            })
    }};

    (get, $endpoint:expr, $action:expr, $response_type:ty, $to_event:expr) => {{
        let to_event = $to_event;
        $crate::HttpCmd::get($crate::build_url($endpoint))
            .build()
            .then_send(move |result| {
                let event_result: Result<$response_type, String> =
                    $crate::process_json_response($action, result);
                to_event(event_result)
            })
    }};
}
