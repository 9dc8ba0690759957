use std::cell::RefCell;

use anyhow::Result;

use crate::core::{
    time::{DateTime, DateTimeRange},
    timeseries::{DataFrame, DataPoint},
    unit::DegreeFahrenheit,
};
use crate::port::{Confirmation, OperatorPrompt, ThermostatControl, ThermostatDataAccess};

use super::{
    Reading, RunStatus, ScheduleEntry, SystemMode, ThermostatHistory, ThermostatInfo, ThermostatSnapshot,
    reading::coerce_numeric,
};

pub fn now_at(local: &str) -> DateTime {
    DateTime::parse_flexible(local).unwrap()
}

//Readings of one or more days, timestamps given as local "HH:MM" on the current day
pub struct HistoryBuilder {
    day: String,
    data_points: Vec<DataPoint<Reading>>,
}

impl HistoryBuilder {
    pub fn new(day: &str) -> Self {
        Self {
            day: day.to_owned(),
            data_points: vec![],
        }
    }

    pub fn on(mut self, day: &str) -> Self {
        self.day = day.to_owned();
        self
    }

    pub fn cooling(self, time: &str, cool: f64, heat: f64) -> Self {
        self.reading(time, RunStatus::CoolStage1, cool, heat)
    }

    pub fn heating(self, time: &str, cool: f64, heat: f64) -> Self {
        self.reading(time, RunStatus::HeatStage1, cool, heat)
    }

    pub fn idle(self, time: &str, cool: f64, heat: f64) -> Self {
        self.reading(time, RunStatus::Off, cool, heat)
    }

    pub fn raw(mut self, time: &str, run_status: &str, cool: Option<&str>, heat: Option<&str>) -> Self {
        let reading = Reading {
            run_status: RunStatus::from(run_status),
            cool_setting: coerce_numeric(cool).map(DegreeFahrenheit),
            heat_setting: coerce_numeric(heat).map(DegreeFahrenheit),
            ..Default::default()
        };
        let at = self.at(time);
        self.data_points.push(DataPoint::new(reading, at));
        self
    }

    fn reading(mut self, time: &str, run_status: RunStatus, cool: f64, heat: f64) -> Self {
        let reading = Reading {
            system: Some(SystemMode::Auto),
            run_status,
            cool_setting: Some(DegreeFahrenheit(cool)),
            heat_setting: Some(DegreeFahrenheit(heat)),
            ..Default::default()
        };
        let at = self.at(time);
        self.data_points.push(DataPoint::new(reading, at));
        self
    }

    fn at(&self, time: &str) -> DateTime {
        now_at(&format!("{}T{}", self.day, time))
    }

    pub fn build(self) -> ThermostatHistory {
        DataFrame::new(self.data_points).unwrap()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceWrite {
    Cool(f64),
    Heat(f64),
    Mode(SystemMode),
    Schedule(ScheduleEntry),
}

#[derive(Default)]
pub struct RecordingThermostat {
    pub writes: RefCell<Vec<(String, DeviceWrite)>>,
    pub snapshot: Option<ThermostatSnapshot>,
    pub history: Option<ThermostatHistory>,
}

impl RecordingThermostat {
    pub fn with_history(history: ThermostatHistory) -> Self {
        Self {
            history: Some(history),
            ..Default::default()
        }
    }

    pub fn writes(&self) -> Vec<DeviceWrite> {
        self.writes.borrow().iter().map(|(_, w)| w.clone()).collect()
    }

    fn record(&self, thermostat: &str, write: DeviceWrite) {
        self.writes.borrow_mut().push((thermostat.to_owned(), write));
    }

    fn info(thermostat: &str) -> ThermostatInfo {
        ThermostatInfo {
            name: thermostat.to_owned(),
            serial_no: Some("SN-1".to_owned()),
            group_name: None,
        }
    }
}

impl ThermostatControl for RecordingThermostat {
    async fn set_cool_setpoint(&self, thermostat: &str, value: DegreeFahrenheit) -> Result<()> {
        self.record(thermostat, DeviceWrite::Cool(value.0));
        Ok(())
    }

    async fn set_heat_setpoint(&self, thermostat: &str, value: DegreeFahrenheit) -> Result<()> {
        self.record(thermostat, DeviceWrite::Heat(value.0));
        Ok(())
    }

    async fn set_system_mode(&self, thermostat: &str, mode: &SystemMode) -> Result<()> {
        self.record(thermostat, DeviceWrite::Mode(mode.clone()));
        Ok(())
    }

    async fn set_schedule(&self, thermostat: &str, entry: &ScheduleEntry) -> Result<()> {
        self.record(thermostat, DeviceWrite::Schedule(entry.clone()));
        Ok(())
    }
}

impl ThermostatDataAccess for RecordingThermostat {
    async fn current_state(&self, thermostat: &str) -> Result<ThermostatSnapshot> {
        Ok(self.snapshot.clone().unwrap_or_else(|| ThermostatSnapshot {
            info: Self::info(thermostat),
            reading: Reading {
                system: Some(SystemMode::Auto),
                temperature: Some(DegreeFahrenheit(72.5)),
                cool_setting: Some(DegreeFahrenheit(74.0)),
                heat_setting: Some(DegreeFahrenheit(68.0)),
                ..Default::default()
            },
        }))
    }

    async fn history(
        &self,
        thermostat: &str,
        _range: &DateTimeRange,
    ) -> Result<Option<(ThermostatInfo, ThermostatHistory)>> {
        Ok(self.history.clone().map(|history| (Self::info(thermostat), history)))
    }
}

//Answers questions in order, records what was asked
pub struct ScriptedPrompt {
    answers: RefCell<Vec<&'static str>>,
    pub questions: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[&'static str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().rev().copied().collect()),
            questions: RefCell::new(vec![]),
        }
    }

    pub fn silent() -> Self {
        Self::answering(&[])
    }

    pub fn asked(&self) -> usize {
        self.questions.borrow().len()
    }
}

impl OperatorPrompt for ScriptedPrompt {
    fn ask(&self, question: &str) -> Result<Confirmation> {
        self.questions.borrow_mut().push(question.to_owned());
        let answer = self
            .answers
            .borrow_mut()
            .pop()
            .ok_or_else(|| anyhow::anyhow!("Unexpected question: {}", question))?;
        Ok(Confirmation::from_answer(answer))
    }
}
