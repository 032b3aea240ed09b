use actix_web::HttpResponse;
use anyhow::Result;
use log::error;
use serde::Serialize;
use switch_panel_core::{StatusResponse, ToggleResponse};

/// Trait for converting service results into HTTP responses
pub trait ServiceResultResponse {
    fn into_response(self) -> HttpResponse;
}

fn json_response(value: &impl Serialize, name: &str) -> HttpResponse {
    match serde_json::to_string(value) {
        Ok(json) => HttpResponse::Ok()
            .content_type("application/json")
            .body(json),
        Err(e) => {
            error!("failed to serialize {name}: {e:#}");
            HttpResponse::InternalServerError().body("failed to serialize response")
        }
    }
}

impl ServiceResultResponse for ToggleResponse {
    fn into_response(self) -> HttpResponse {
        json_response(&self, "ToggleResponse")
    }
}

impl ServiceResultResponse for StatusResponse {
    fn into_response(self) -> HttpResponse {
        json_response(&self, "StatusResponse")
    }
}

impl ServiceResultResponse for Vec<String> {
    fn into_response(self) -> HttpResponse {
        json_response(&self, "log lines")
    }
}

impl ServiceResultResponse for crate::api::DeviceInfo {
    fn into_response(self) -> HttpResponse {
        json_response(&self, "DeviceInfo")
    }
}

/// Turn a service result into a response: the data on success, the error
/// text with status 500 otherwise.
pub fn handle_service_result<T>(result: Result<T>, operation: &str) -> HttpResponse
where
    T: ServiceResultResponse,
{
    match result {
        Ok(data) => data.into_response(),
        Err(e) => {
            error!("{operation} failed: {e:#}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}
