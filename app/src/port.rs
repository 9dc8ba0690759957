#![allow(async_fn_in_trait)]

use anyhow::Result;

use crate::core::{time::DateTimeRange, unit::DegreeFahrenheit};
use crate::thermostat::{ScheduleEntry, SystemMode, ThermostatHistory, ThermostatInfo, ThermostatSnapshot};

pub trait ThermostatDataAccess {
    async fn current_state(&self, thermostat: &str) -> Result<ThermostatSnapshot>;

    //None if the vendor has no history data for the thermostat in the range
    async fn history(&self, thermostat: &str, range: &DateTimeRange)
    -> Result<Option<(ThermostatInfo, ThermostatHistory)>>;
}

pub trait ThermostatControl {
    async fn set_cool_setpoint(&self, thermostat: &str, value: DegreeFahrenheit) -> Result<()>;

    async fn set_heat_setpoint(&self, thermostat: &str, value: DegreeFahrenheit) -> Result<()>;

    async fn set_system_mode(&self, thermostat: &str, mode: &SystemMode) -> Result<()>;

    async fn set_schedule(&self, thermostat: &str, entry: &ScheduleEntry) -> Result<()>;
}

pub trait OperatorPrompt {
    fn ask(&self, question: &str) -> Result<Confirmation>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    Unrecognized(String),
}

impl Confirmation {
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim() {
            "y" => Confirmation::Yes,
            "n" => Confirmation::No,
            other => Confirmation::Unrecognized(other.to_owned()),
        }
    }
}
