use crate::{automation::Automation, board::SwitchBoard, switch::Switch};
use anyhow::Result;
use log::{debug, error, info, warn};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::{
    sync::broadcast,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval},
};

/// Owns the switch states and drives the board
pub struct Controller<B> {
    board: B,
    states: Mutex<BTreeMap<Switch, bool>>,
}

/// Running automation task, see [`Controller::spawn_automation`]
pub struct AutomationHandle {
    stop_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl AutomationHandle {
    /// Stop the automation and wait until the task finished
    pub async fn stop(self) {
        // the task may already be gone, nothing to signal then
        let _ = self.stop_tx.send(());

        if let Err(e) = self.task.await {
            error!("automation task panicked: {e}");
        }
    }
}

impl<B> Controller<B>
where
    B: SwitchBoard,
{
    pub fn new(board: B) -> Self {
        Self {
            board,
            states: Mutex::new(Switch::ALL.into_iter().map(|s| (s, false)).collect()),
        }
    }

    fn lock_states(&self) -> MutexGuard<'_, BTreeMap<Switch, bool>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_locked(
        &self,
        states: &mut BTreeMap<Switch, bool>,
        switch: Switch,
        on: bool,
    ) -> Result<bool> {
        debug!("setting switch {switch} to {on}");
        let state = self.board.set(switch, on)?;
        states.insert(switch, state);
        Ok(state)
    }

    /// Switch `switch` on or off, returns the state read back from the board
    pub fn set_switch_state(&self, switch: Switch, on: bool) -> Result<bool> {
        let mut states = self.lock_states();
        self.set_locked(&mut states, switch, on)
    }

    pub fn is_switch_on(&self, switch: Switch) -> bool {
        self.lock_states().get(&switch).copied().unwrap_or(false)
    }

    /// Invert the state of `switch`, returns the new state
    pub fn toggle_switch(&self, switch: Switch) -> Result<bool> {
        debug!("toggling switch {switch}");
        let mut states = self.lock_states();
        let on = !states.get(&switch).copied().unwrap_or(false);
        self.set_locked(&mut states, switch, on)
    }

    pub fn snapshot(&self) -> BTreeMap<Switch, bool> {
        self.lock_states().clone()
    }

    /// Switch states keyed by switch name
    pub fn states(&self) -> BTreeMap<String, bool> {
        self.lock_states()
            .iter()
            .map(|(switch, on)| (switch.name().to_string(), *on))
            .collect()
    }

    pub fn temperature(&self) -> Result<f64> {
        self.board.temperature()
    }

    fn run_automation_tick(&self, automation: &mut Automation) {
        let temperature = match self.board.temperature() {
            Ok(t) => Some(t),
            Err(e) => {
                warn!("failed to read temperature: {e:#}");
                None
            }
        };

        for (switch, on) in automation.tick(Instant::now(), &self.snapshot(), temperature) {
            info!("automation: switching {switch} {}", if on { "on" } else { "off" });
            if let Err(e) = self.set_switch_state(switch, on) {
                error!("automation failed to set {switch}: {e:#}");
            }
        }
    }

    /// Switch everything off and release the board
    pub fn shutdown(&self) {
        let mut states = self.lock_states();
        for switch in Switch::ALL {
            if let Err(e) = self.set_locked(&mut states, switch, false) {
                error!("failed to switch off {switch}: {e:#}");
            }
        }
        self.board.release();
    }
}

impl<B> Controller<B>
where
    B: SwitchBoard + Send + Sync + 'static,
{
    /// Run `automation` once per [`Automation::TICK`] until stopped
    pub fn spawn_automation(self: &Arc<Self>, mut automation: Automation) -> AutomationHandle {
        let (stop_tx, mut stop_rx) = broadcast::channel(1);
        let controller = Arc::clone(self);

        let task = tokio::spawn(async move {
            let mut ticker = interval(Automation::TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = stop_rx.recv() => {
                        debug!("automation stopped");
                        break;
                    }
                    _ = ticker.tick() => controller.run_automation_tick(&mut automation),
                }
            }
        });

        AutomationHandle { stop_tx, task }
    }
}
