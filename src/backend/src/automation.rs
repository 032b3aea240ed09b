//! Automatic switching of lights and fan.
//!
//! Lights are switched off once they have been on longer than the switch
//! timeout. The fan is switched on when the CPU gets hot and off again once it
//! ran at least the switch timeout and the CPU cooled down.

use crate::{config::AutomationConfig, switch::Switch};
use std::collections::BTreeMap;
use tokio::time::{Duration, Instant};

#[derive(Debug)]
pub struct Automation {
    config: AutomationConfig,
    switched_on_at: BTreeMap<Switch, Instant>,
}

impl Automation {
    pub const TICK: Duration = Duration::from_secs(1);

    pub fn new(config: AutomationConfig) -> Self {
        Self {
            config,
            switched_on_at: BTreeMap::new(),
        }
    }

    /// Decide which switches to change.
    ///
    /// `temperature` is `None` when it could not be read; the fan is left
    /// alone then.
    pub fn tick(
        &mut self,
        now: Instant,
        states: &BTreeMap<Switch, bool>,
        temperature: Option<f64>,
    ) -> Vec<(Switch, bool)> {
        let mut changes = Vec::new();

        for switch in Switch::ALL {
            let is_on = states.get(&switch).copied().unwrap_or(false);

            if !is_on {
                self.switched_on_at.remove(&switch);

                if !switch.is_light()
                    && temperature.is_some_and(|t| t > self.config.fan_on_temperature)
                {
                    changes.push((switch, true));
                }
                continue;
            }

            let Some(since) = self.switched_on_at.get(&switch).copied() else {
                self.switched_on_at.insert(switch, now);
                continue;
            };

            if now.saturating_duration_since(since) <= self.config.switch_timeout {
                continue;
            }

            let cooled_down = switch.is_light()
                || temperature.is_some_and(|t| t < self.config.fan_off_temperature);

            if cooled_down {
                self.switched_on_at.remove(&switch);
                changes.push((switch, false));
            }
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(3);

    fn automation() -> Automation {
        Automation::new(AutomationConfig {
            switch_timeout: TIMEOUT,
            ..Default::default()
        })
    }

    fn states(on: &[Switch]) -> BTreeMap<Switch, bool> {
        Switch::ALL
            .into_iter()
            .map(|switch| (switch, on.contains(&switch)))
            .collect()
    }

    #[test]
    fn light_is_switched_off_after_timeout() {
        let mut automation = automation();
        let start = Instant::now();
        let on = states(&[Switch::Light]);

        assert!(automation.tick(start, &on, Some(45.0)).is_empty());
        assert!(automation.tick(start + TIMEOUT, &on, Some(45.0)).is_empty());
        assert_eq!(
            automation.tick(start + TIMEOUT + Duration::from_secs(1), &on, Some(45.0)),
            vec![(Switch::Light, false)]
        );
    }

    #[test]
    fn light_timer_restarts_after_manual_switch_off() {
        let mut automation = automation();
        let start = Instant::now();

        automation.tick(start, &states(&[Switch::IrLight]), None);
        automation.tick(start + Duration::from_secs(2), &states(&[]), None);

        let later = start + Duration::from_secs(4);
        assert!(automation.tick(later, &states(&[Switch::IrLight]), None).is_empty());
        assert!(
            automation
                .tick(later + Duration::from_secs(2), &states(&[Switch::IrLight]), None)
                .is_empty()
        );
    }

    #[test]
    fn hot_cpu_switches_fan_on() {
        let mut automation = automation();

        assert_eq!(
            automation.tick(Instant::now(), &states(&[]), Some(71.0)),
            vec![(Switch::Fan, true)]
        );
    }

    #[test]
    fn warm_cpu_leaves_fan_off() {
        let mut automation = automation();
        assert!(automation.tick(Instant::now(), &states(&[]), Some(68.0)).is_empty());
    }

    #[test]
    fn fan_keeps_running_while_cpu_is_warm() {
        let mut automation = automation();
        let start = Instant::now();
        let on = states(&[Switch::Fan]);

        automation.tick(start, &on, Some(72.0));
        let later = start + TIMEOUT + Duration::from_secs(1);

        assert!(automation.tick(later, &on, Some(67.0)).is_empty());
        assert_eq!(
            automation.tick(later, &on, Some(65.0)),
            vec![(Switch::Fan, false)]
        );
    }

    #[test]
    fn fan_is_left_alone_without_temperature() {
        let mut automation = automation();
        let start = Instant::now();
        let on = states(&[Switch::Fan]);

        automation.tick(start, &on, None);
        assert!(
            automation
                .tick(start + TIMEOUT * 2, &on, None)
                .is_empty()
        );
    }
}
