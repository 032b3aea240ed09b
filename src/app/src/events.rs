use serde::{Deserialize, Serialize};

use crate::types::*;

/// Switch events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum SwitchEvent {
    Toggle {
        name: String,
    },
    #[serde(skip)]
    ToggleResponse {
        name: String,
        result: Result<ToggleResponse, String>,
    },
}

/// Status polling events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum PollingEvent {
    /// Fetch the switch states once. Also sent by the Core itself when the
    /// delay between two polls elapsed.
    Poll,
    #[serde(skip)]
    PollResponse(Result<StatusResponse, String>),
}

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    // Initialization, starts the status poll loop
    Initialize,

    // Domain events
    Switch(SwitchEvent),
    Polling(PollingEvent),
}
