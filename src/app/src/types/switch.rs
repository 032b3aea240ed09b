use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CSS class carried by a button whose switch is on
pub const BUTTON_ON_CLASS: &str = "button-on";

/// Response of `POST /api/toggle_<name>`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleResponse {
    pub state: bool,
}

/// Response of `GET /api/status`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub switches: BTreeMap<String, bool>,
}

/// Endpoint toggling the switch called `name`
pub fn toggle_endpoint(name: &str) -> String {
    format!("/api/toggle_{name}")
}

pub const STATUS_ENDPOINT: &str = "/api/status";
