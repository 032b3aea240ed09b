use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::*;

/// Application Model - the complete state
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Model {
    /// Last known state per switch name, as reported by the server
    pub switches: BTreeMap<String, bool>,

    // Status polling state
    pub polling: PollingState,
    pub retries: RetryCounter,
    pub poll_in_flight: bool,
}

/// One button of the switch panel
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SwitchButton {
    /// Element id, equal to the switch name
    pub id: String,
    pub is_on: bool,
    pub classes: Vec<String>,
}

/// What the Shell renders
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub buttons: Vec<SwitchButton>,
    pub is_polling: bool,
    pub retry_count: u32,
}

impl Model {
    /// Reflect a switch state into UI state.
    ///
    /// Idempotent; only the entry for `name` is touched. Returns whether
    /// anything changed.
    pub fn apply_switch_state(&mut self, name: impl Into<String>, state: bool) -> bool {
        self.switches.insert(name.into(), state) != Some(state)
    }

    pub fn is_switch_on(&self, name: &str) -> bool {
        self.switches.get(name).copied().unwrap_or(false)
    }

    pub fn view(&self) -> ViewModel {
        let buttons = self
            .switches
            .iter()
            .map(|(name, &is_on)| SwitchButton {
                id: name.clone(),
                is_on,
                classes: if is_on {
                    vec![BUTTON_ON_CLASS.to_string()]
                } else {
                    Vec::new()
                },
            })
            .collect();

        ViewModel {
            buttons,
            is_polling: matches!(self.polling, PollingState::Polling),
            retry_count: self.retries.count(),
        }
    }
}
