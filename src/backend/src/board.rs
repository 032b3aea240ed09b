//! Hardware access for the switches and the CPU temperature.

use crate::switch::Switch;
use anyhow::{Context, Result};
use log::debug;
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use std::{collections::BTreeMap, path::Path, sync::Mutex};

#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait SwitchBoard {
    /// Drive the output of `switch` and return the state read back from the board
    fn set(&self, switch: Switch, on: bool) -> Result<bool>;

    /// CPU temperature in degrees Celsius
    fn temperature(&self) -> Result<f64>;

    /// Release all outputs, called once on shutdown
    fn release(&self);
}

/// Parse the content of a Linux thermal zone file (millidegrees Celsius)
pub fn parse_thermal_zone(content: &str) -> Result<f64> {
    let millidegrees = content
        .trim()
        .parse::<i64>()
        .context("failed to parse thermal zone value")?;

    Ok(millidegrees as f64 / 1000.0)
}

pub fn read_thermal_zone(path: &Path) -> Result<f64> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read thermal zone {}", path.display()))?;
    parse_thermal_zone(&content)
}

/// Board used during development: outputs are only remembered.
#[derive(Debug, Default)]
pub struct SimulatedBoard {
    outputs: Mutex<BTreeMap<Switch, bool>>,
}

impl SimulatedBoard {
    pub const TEMPERATURE: f64 = 45.0;
}

impl SwitchBoard for SimulatedBoard {
    fn set(&self, switch: Switch, on: bool) -> Result<bool> {
        debug!("simulated board: {switch} -> {on}");
        let mut outputs = self
            .outputs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        outputs.insert(switch, on);
        Ok(on)
    }

    fn temperature(&self) -> Result<f64> {
        Ok(Self::TEMPERATURE)
    }

    fn release(&self) {
        debug!("simulated board: releasing outputs");
        self.outputs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}

#[cfg(feature = "gpio")]
pub use gpio::GpioBoard;

#[cfg(feature = "gpio")]
mod gpio {
    use super::*;
    use crate::config::BoardConfig;
    use log::info;
    use rppal::gpio::{Gpio, OutputPin};
    use std::path::PathBuf;

    /// Raspberry Pi board: one GPIO output per switch
    pub struct GpioBoard {
        pins: Mutex<BTreeMap<Switch, OutputPin>>,
        thermal_zone_path: PathBuf,
    }

    impl GpioBoard {
        pub fn new(config: &BoardConfig) -> Result<Self> {
            let gpio = Gpio::new().context("failed to open GPIO")?;
            let mut pins = BTreeMap::new();

            for (switch, pin) in [
                (Switch::Light, config.light_pin),
                (Switch::IrLight, config.ir_light_pin),
                (Switch::Fan, config.fan_pin),
            ] {
                let output = gpio
                    .get(pin)
                    .with_context(|| format!("failed to get GPIO pin {pin} for {switch}"))?
                    .into_output_low();
                pins.insert(switch, output);
            }

            Ok(Self {
                pins: Mutex::new(pins),
                thermal_zone_path: config.thermal_zone_path.clone(),
            })
        }
    }

    impl SwitchBoard for GpioBoard {
        fn set(&self, switch: Switch, on: bool) -> Result<bool> {
            let mut pins = self
                .pins
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let pin = pins
                .get_mut(&switch)
                .with_context(|| format!("failed to set {switch}: outputs released"))?;

            if on {
                pin.set_high();
            } else {
                pin.set_low();
            }

            Ok(pin.is_set_high())
        }

        fn temperature(&self) -> Result<f64> {
            read_thermal_zone(&self.thermal_zone_path)
        }

        fn release(&self) {
            info!("cleaning up GPIO");
            let mut pins = self
                .pins
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            for pin in pins.values_mut() {
                pin.set_low();
            }
            pins.clear();
        }
    }
}
