use config::{Config, ConfigError, Environment, File};
use infrastructure::MonitoringConfig;
use serde::Deserialize;

use crate::{
    adapter::pelican::Pelican,
    fdd::{CorrectionPolicy, Lookback, ScheduleCorrectionPolicy},
    thermostat::Preferences,
};

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub pelican: Pelican,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    pub thermostats: Vec<String>,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub detection: DetectionSettings,
    #[serde(default)]
    pub correction: CorrectionPolicy,
    #[serde(default)]
    pub schedule: ScheduleCorrectionPolicy,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionSettings {
    #[serde(default)]
    pub lookback: Lookback,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_poll_file")]
    pub poll_file: String,
    //history readings are archived when set
    pub history_file: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            poll_file: default_poll_file(),
            history_file: None,
        }
    }
}

fn default_poll_file() -> String {
    "pelican_poll_log.csv".to_owned()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_file = std::env::var("FDD_CONFIG").unwrap_or_else(|_| "config.toml".to_owned());

        let builder = Config::builder()
            .add_source(File::with_name(&config_file))
            .add_source(
                Environment::with_prefix("FDD")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("thermostats")
                    .try_parsing(true),
            );

        let s = builder.build()?;
        s.try_deserialize()
    }
}
