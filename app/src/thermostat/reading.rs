use std::{fmt::Display, str::FromStr};

use crate::core::{
    timeseries::{DataFrame, DataPoint},
    unit::DegreeFahrenheit,
};

pub type ThermostatHistory = DataFrame<Reading>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThermostatInfo {
    pub name: String,
    pub serial_no: Option<String>,
    pub group_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ThermostatSnapshot {
    pub info: ThermostatInfo,
    pub reading: Reading,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    pub system: Option<SystemMode>,
    pub temperature: Option<DegreeFahrenheit>,
    pub heat_setting: Option<DegreeFahrenheit>,
    pub cool_setting: Option<DegreeFahrenheit>,
    pub run_status: RunStatus,
    pub fan: Option<String>,
    pub status: Option<String>,
    pub humidity: Option<f64>,
    pub humidify_setting: Option<f64>,
    pub dehumidify_setting: Option<f64>,
    pub co2_setting: Option<f64>,
    pub outside_ventilation: Option<String>,
    pub limits: SetpointLimits,
}

//Not reported in history data, only for current readings
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SetpointLimits {
    pub min_heat: Option<DegreeFahrenheit>,
    pub max_heat: Option<DegreeFahrenheit>,
    pub min_cool: Option<DegreeFahrenheit>,
    pub max_cool: Option<DegreeFahrenheit>,
}

impl Reading {
    pub fn is_cooling(&self) -> bool {
        self.run_status.is_cooling()
    }

    pub fn is_heating(&self) -> bool {
        self.run_status.is_heating()
    }

    pub fn cool_value(&self) -> Option<f64> {
        self.cool_setting.map(f64::from)
    }

    pub fn heat_value(&self) -> Option<f64> {
        self.heat_setting.map(f64::from)
    }
}

impl DataPoint<Reading> {
    pub fn cool_value(&self) -> Option<f64> {
        self.value.cool_value()
    }

    pub fn heat_value(&self) -> Option<f64> {
        self.value.heat_value()
    }
}

//Missing, empty and non-numeric values are treated as absent
pub fn coerce_numeric(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

pub fn coerce_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RunStatus {
    #[default]
    Off,
    HeatStage1,
    HeatStage2,
    CoolStage1,
    CoolStage2,
    Other(String),
}

impl RunStatus {
    pub fn is_cooling(&self) -> bool {
        matches!(self, RunStatus::CoolStage1 | RunStatus::CoolStage2)
    }

    pub fn is_heating(&self) -> bool {
        matches!(self, RunStatus::HeatStage1 | RunStatus::HeatStage2)
    }
}

impl From<&str> for RunStatus {
    fn from(value: &str) -> Self {
        match value.trim() {
            "" | "Off" => RunStatus::Off,
            "Heat-Stage1" => RunStatus::HeatStage1,
            "Heat-Stage2" => RunStatus::HeatStage2,
            "Cool-Stage1" => RunStatus::CoolStage1,
            "Cool-Stage2" => RunStatus::CoolStage2,
            other => RunStatus::Other(other.to_owned()),
        }
    }
}

impl Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Off => write!(f, "Off"),
            RunStatus::HeatStage1 => write!(f, "Heat-Stage1"),
            RunStatus::HeatStage2 => write!(f, "Heat-Stage2"),
            RunStatus::CoolStage1 => write!(f, "Cool-Stage1"),
            RunStatus::CoolStage2 => write!(f, "Cool-Stage2"),
            RunStatus::Other(other) => write!(f, "{}", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemMode {
    Off,
    Auto,
    Heat,
    Cool,
    Other(String),
}

impl FromStr for SystemMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "Off" => SystemMode::Off,
            "Auto" => SystemMode::Auto,
            "Heat" => SystemMode::Heat,
            "Cool" => SystemMode::Cool,
            other => SystemMode::Other(other.to_owned()),
        })
    }
}

impl Display for SystemMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemMode::Off => write!(f, "Off"),
            SystemMode::Auto => write!(f, "Auto"),
            SystemMode::Heat => write!(f, "Heat"),
            SystemMode::Cool => write!(f, "Cool"),
            SystemMode::Other(other) => write!(f, "{}", other),
        }
    }
}
