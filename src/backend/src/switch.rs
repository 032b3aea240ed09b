use anyhow::{Error, anyhow};
use std::{fmt, str::FromStr};

/// Outputs of the camera box
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Switch {
    Light,
    IrLight,
    Fan,
}

impl Switch {
    pub const ALL: [Switch; 3] = [Switch::Light, Switch::IrLight, Switch::Fan];

    /// Name used in API paths and status payloads
    pub const fn name(self) -> &'static str {
        match self {
            Switch::Light => "light",
            Switch::IrLight => "ir_light",
            Switch::Fan => "fan",
        }
    }

    /// Lights are switched off by the automation once their timeout expired
    pub const fn is_light(self) -> bool {
        matches!(self, Switch::Light | Switch::IrLight)
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Switch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Switch::ALL
            .into_iter()
            .find(|switch| switch.name() == s)
            .ok_or_else(|| anyhow!("unknown switch: {s}"))
    }
}
