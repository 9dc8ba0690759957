use serde::Deserialize;

use crate::{
    core::{
        time::{DailyTimeRange, Time},
        unit::DegreeFahrenheit,
    },
    t,
};

//Site preferences the observed settings are checked against. Thresholds in °F.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub occupied_start: Time,
    pub occupied_end: Time,
    pub occupied_cool: DegreeFahrenheit,
    pub occupied_heat: DegreeFahrenheit,
    pub unoccupied_cool: DegreeFahrenheit,
    pub unoccupied_heat: DegreeFahrenheit,
    pub deadband: DegreeFahrenheit,
    pub setpoint_deviation_threshold: f64,
    pub deadband_deviation_threshold: f64,
}

impl Preferences {
    pub fn occupied_hours(&self) -> DailyTimeRange {
        DailyTimeRange::new(self.occupied_start, self.occupied_end)
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            occupied_start: t!(6:00),
            occupied_end: t!(17:59),
            occupied_cool: DegreeFahrenheit(74.0),
            occupied_heat: DegreeFahrenheit(68.0),
            unoccupied_cool: DegreeFahrenheit(85.0),
            unoccupied_heat: DegreeFahrenheit(62.0),
            deadband: DegreeFahrenheit(6.0),
            setpoint_deviation_threshold: 0.5,
            deadband_deviation_threshold: 0.5,
        }
    }
}
