use anyhow::{Context, Result};
use log::error;
use std::{env, path::PathBuf, str::FromStr, time::Duration};

/// Where the server runs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    /// Development machine, switches are simulated
    #[default]
    Dev,
    /// On the camera box, switches are GPIO outputs
    Prod,
}

impl Environment {
    /// Lights and fan stay on at least this long before the automation
    /// switches them off.
    pub fn default_switch_timeout(self) -> Duration {
        match self {
            Environment::Dev => Duration::from_secs(3),
            Environment::Prod => Duration::from_secs(60),
        }
    }
}

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: Environment,

    /// UI server configuration
    pub ui: UiConfig,

    /// Switch automation configuration
    pub automation: AutomationConfig,

    /// Board configuration, used in production only
    pub board: BoardConfig,
}

#[derive(Clone, Debug)]
pub struct UiConfig {
    pub bind_address: String,
    pub port: u16,
    pub webapp_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct AutomationConfig {
    pub switch_timeout: Duration,
    pub fan_on_temperature: f64,
    pub fan_off_temperature: f64,
}

#[derive(Clone, Debug)]
pub struct BoardConfig {
    pub light_pin: u8,
    pub ir_light_pin: u8,
    pub fan_pin: u8,
    pub thermal_zone_path: PathBuf,
}

impl AppConfig {
    /// Load the configuration from environment variables
    pub fn load() -> Result<Self> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load the configuration from any key/value source
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let environment = Self::environment(&lookup);

        Ok(Self {
            environment,
            ui: UiConfig::load(&lookup)?,
            automation: AutomationConfig::load(&lookup, environment)?,
            board: BoardConfig::load(&lookup)?,
        })
    }

    fn environment(lookup: &impl Fn(&str) -> Option<String>) -> Environment {
        match lookup("SWITCH_PANEL_ENV") {
            None => Environment::Dev,
            Some(value) => match value.to_lowercase().as_str() {
                "dev" => Environment::Dev,
                "prod" => Environment::Prod,
                _ => {
                    error!("unrecognized SWITCH_PANEL_ENV value {value:?}, using dev");
                    Environment::Dev
                }
            },
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .parse::<T>()
            .with_context(|| format!("failed to parse {key}: invalid format")),
        None => Ok(default),
    }
}

impl UiConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_address = lookup("UI_BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(lookup, "UI_PORT", 8080u16)?;
        let webapp_dir = lookup("WEBAPP_DIR")
            .unwrap_or_else(|| "webapp".to_string())
            .into();

        Ok(Self {
            bind_address,
            port,
            webapp_dir,
        })
    }
}

impl AutomationConfig {
    pub const FAN_ON_TEMPERATURE: f64 = 70.0;
    pub const FAN_OFF_TEMPERATURE: f64 = 66.0;

    fn load(lookup: &impl Fn(&str) -> Option<String>, environment: Environment) -> Result<Self> {
        let switch_timeout = match lookup("SWITCH_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.parse::<u64>()
                    .context("failed to parse SWITCH_TIMEOUT_SECS: invalid format")?,
            ),
            None => environment.default_switch_timeout(),
        };
        let fan_on_temperature = parse_or(lookup, "FAN_ON_TEMPERATURE", Self::FAN_ON_TEMPERATURE)?;
        let fan_off_temperature =
            parse_or(lookup, "FAN_OFF_TEMPERATURE", Self::FAN_OFF_TEMPERATURE)?;

        anyhow::ensure!(
            fan_off_temperature <= fan_on_temperature,
            "failed to validate fan temperatures: off ({fan_off_temperature}) is above on ({fan_on_temperature})"
        );

        Ok(Self {
            switch_timeout,
            fan_on_temperature,
            fan_off_temperature,
        })
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            switch_timeout: Environment::Dev.default_switch_timeout(),
            fan_on_temperature: Self::FAN_ON_TEMPERATURE,
            fan_off_temperature: Self::FAN_OFF_TEMPERATURE,
        }
    }
}

impl BoardConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            light_pin: parse_or(lookup, "GPIO_LIGHT_PIN", 4)?,
            ir_light_pin: parse_or(lookup, "GPIO_IR_LIGHT_PIN", 5)?,
            fan_pin: parse_or(lookup, "GPIO_FAN_PIN", 6)?,
            thermal_zone_path: lookup("THERMAL_ZONE_PATH")
                .unwrap_or_else(|| "/sys/class/thermal/thermal_zone0/temp".to_string())
                .into(),
        })
    }
}
