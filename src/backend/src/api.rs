use crate::{
    board::SwitchBoard,
    controller::Controller,
    http_response::handle_service_result,
    logging::LogBuffer,
    switch::Switch,
};
use actix_files::Files;
use actix_web::{HttpResponse, Responder, web};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};
use switch_panel_core::{StatusResponse, ToggleResponse};

/// Response of `GET /api/info`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub version: String,
    pub temperature: f64,
}

pub struct Api<B> {
    pub controller: Arc<Controller<B>>,
    pub log_buffer: Arc<LogBuffer>,
}

impl<B> Clone for Api<B> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            log_buffer: Arc::clone(&self.log_buffer),
        }
    }
}

impl<B> Api<B>
where
    B: SwitchBoard + Send + Sync + 'static,
{
    pub fn new(controller: Arc<Controller<B>>, log_buffer: Arc<LogBuffer>) -> Self {
        Api {
            controller,
            log_buffer,
        }
    }

    /// Register the API routes
    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/api/toggle_{switch}", web::post().to(Self::toggle))
            .route("/api/status", web::get().to(Self::status))
            .route("/api/info", web::get().to(Self::info))
            .route("/api/logs", web::get().to(Self::logs))
            .route("/version", web::get().to(Self::version));
    }

    /// Web UI files, `index.html` answers `/`
    pub fn static_files(webapp_dir: &Path) -> Files {
        Files::new("/", webapp_dir).index_file("index.html")
    }

    pub async fn toggle(switch: web::Path<String>, api: web::Data<Self>) -> impl Responder {
        debug!("toggle() called: {switch}");

        let switch = match switch.parse::<Switch>() {
            Ok(switch) => switch,
            Err(e) => return HttpResponse::NotFound().body(e.to_string()),
        };

        handle_service_result(
            api.controller
                .toggle_switch(switch)
                .map(|state| ToggleResponse { state }),
            "toggle",
        )
    }

    pub async fn status(api: web::Data<Self>) -> impl Responder {
        debug!("status() called");

        handle_service_result(
            Ok(StatusResponse {
                switches: api.controller.states(),
            }),
            "status",
        )
    }

    pub async fn info(api: web::Data<Self>) -> impl Responder {
        debug!("info() called");

        handle_service_result(
            api.controller.temperature().map(|temperature| DeviceInfo {
                version: env!("CARGO_PKG_VERSION").to_string(),
                temperature,
            }),
            "info",
        )
    }

    pub async fn logs(api: web::Data<Self>) -> impl Responder {
        handle_service_result(Ok(api.log_buffer.lines()), "logs")
    }

    pub async fn version() -> impl Responder {
        HttpResponse::Ok().body(env!("CARGO_PKG_VERSION"))
    }
}
