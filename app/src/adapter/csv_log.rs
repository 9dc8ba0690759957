use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    core::{time::DateTime, timeseries::DataPoint},
    thermostat::{Reading, ThermostatInfo, ThermostatSnapshot},
};

/// One line of the poll log. Column names are kept as found in the deployed files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Serial_Number")]
    pub serial_no: Option<String>,
    #[serde(rename = "Thermostat_Mode")]
    pub system: Option<String>,
    #[serde(rename = "Current_Temperatue")]
    pub temperature: Option<f64>,
    #[serde(rename = "Heating_Setpoint")]
    pub heat_setting: Option<f64>,
    #[serde(rename = "Cooling_Setpoint")]
    pub cool_setting: Option<f64>,
    #[serde(rename = "Fan_Mode")]
    pub fan: Option<String>,
    #[serde(rename = "Thermostat_Status")]
    pub status: Option<String>,
    #[serde(rename = "Current_Humidity")]
    pub humidity: Option<f64>,
    #[serde(rename = "Min_humidity")]
    pub humidify_setting: Option<f64>,
    #[serde(rename = "Max_Humidity")]
    pub dehumidify_setting: Option<f64>,
    #[serde(rename = "Demand_Ventilation")]
    pub co2_setting: Option<f64>,
    #[serde(rename = "Outside_Ventilation")]
    pub outside_ventilation: Option<String>,
    #[serde(rename = "Lowest_Allowable_Heating_SetPoint")]
    pub min_heat_setting: Option<f64>,
    #[serde(rename = "Highest_Allowable_Heating_SetPoint")]
    pub max_heat_setting: Option<f64>,
    #[serde(rename = "Lowest_Allowable_Cooling_SetPoint")]
    pub min_cool_setting: Option<f64>,
    #[serde(rename = "Highest_Allowable_Cooling_SetPoint")]
    pub max_cool_setting: Option<f64>,
}

impl PollRow {
    pub fn new(info: &ThermostatInfo, reading: &Reading, date: DateTime) -> Self {
        Self {
            date: date.to_log_string(),
            name: info.name.clone(),
            serial_no: info.serial_no.clone(),
            system: reading.system.as_ref().map(|s| s.to_string()),
            temperature: reading.temperature.map(f64::from),
            heat_setting: reading.heat_value(),
            cool_setting: reading.cool_value(),
            fan: reading.fan.clone(),
            status: reading.status.clone(),
            humidity: reading.humidity,
            humidify_setting: reading.humidify_setting,
            dehumidify_setting: reading.dehumidify_setting,
            co2_setting: reading.co2_setting,
            outside_ventilation: reading.outside_ventilation.clone(),
            min_heat_setting: reading.limits.min_heat.map(f64::from),
            max_heat_setting: reading.limits.max_heat.map(f64::from),
            min_cool_setting: reading.limits.min_cool.map(f64::from),
            max_cool_setting: reading.limits.max_cool.map(f64::from),
        }
    }

    pub fn polled(snapshot: &ThermostatSnapshot, now: DateTime) -> Self {
        Self::new(&snapshot.info, &snapshot.reading, now)
    }

    pub fn archived(info: &ThermostatInfo, dp: &DataPoint<Reading>) -> Self {
        Self::new(info, &dp.value, dp.timestamp)
    }
}

#[derive(Debug, Clone)]
pub struct PollLog {
    path: PathBuf,
}

impl PollLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, row: &PollRow) -> anyhow::Result<()> {
        self.append_all(std::slice::from_ref(row))
    }

    //header only goes into new or empty files
    pub fn append_all<'a>(&self, rows: impl IntoIterator<Item = &'a PollRow>) -> anyhow::Result<()> {
        let needs_header = std::fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Error opening poll log {}", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new().has_headers(needs_header).from_writer(file);

        for row in rows {
            writer
                .serialize(row)
                .with_context(|| format!("Error writing row to {}", self.path.display()))?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn read_all(&self) -> anyhow::Result<Vec<PollRow>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Error opening poll log {}", self.path.display()))?;

        reader
            .deserialize()
            .collect::<Result<Vec<PollRow>, _>>()
            .with_context(|| format!("Error reading poll log {}", self.path.display()))
    }

    /// Latest `Date` logged for the named thermostat, `None` if the file does not exist yet.
    pub fn last_date_of(&self, name: &str) -> anyhow::Result<Option<DateTime>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut last = None;
        for row in self.read_all()?.iter().filter(|row| row.name == name) {
            let date = DateTime::parse_flexible(&row.date)?;
            if last.is_none_or(|last| date > last) {
                last = Some(date);
            }
        }

        Ok(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::unit::DegreeFahrenheit,
        thermostat::{RunStatus, SetpointLimits, SystemMode},
    };

    fn snapshot() -> ThermostatSnapshot {
        ThermostatSnapshot {
            info: ThermostatInfo {
                name: "TstatnoHP".to_owned(),
                serial_no: Some("AB-1234".to_owned()),
                group_name: None,
            },
            reading: Reading {
                system: Some(SystemMode::Auto),
                temperature: Some(DegreeFahrenheit(72.5)),
                heat_setting: Some(DegreeFahrenheit(68.0)),
                cool_setting: Some(DegreeFahrenheit(74.0)),
                run_status: RunStatus::CoolStage1,
                fan: Some("Auto".to_owned()),
                status: Some("On".to_owned()),
                humidity: Some(45.0),
                limits: SetpointLimits {
                    min_heat: Some(DegreeFahrenheit(45.0)),
                    max_cool: Some(DegreeFahrenheit(92.0)),
                    ..Default::default()
                },
                ..Default::default()
            },
        }
    }

    #[test]
    fn header_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let log = PollLog::new(dir.path().join("poll.csv"));
        let now = DateTime::parse_flexible("2023-07-03 08:15:00").unwrap();

        log.append(&PollRow::polled(&snapshot(), now)).unwrap();
        log.append(&PollRow::polled(&snapshot(), now)).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Date,Name,Serial_Number,Thermostat_Mode,Current_Temperatue,Heating_Setpoint,Cooling_Setpoint,\
             Fan_Mode,Thermostat_Status,Current_Humidity,Min_humidity,Max_Humidity,Demand_Ventilation,\
             Outside_Ventilation,Lowest_Allowable_Heating_SetPoint,Highest_Allowable_Heating_SetPoint,\
             Lowest_Allowable_Cooling_SetPoint,Highest_Allowable_Cooling_SetPoint"
        );
        assert!(lines[1].starts_with("2023-07-03 08:15:00,TstatnoHP,AB-1234,Auto,72.5,68.0,74.0,Auto,On,45.0,,,"));
    }

    #[test]
    fn rows_are_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = PollLog::new(dir.path().join("poll.csv"));
        let now = DateTime::parse_flexible("2023-07-03 08:15:00").unwrap();
        let row = PollRow::polled(&snapshot(), now);

        log.append_all([&row, &row]).unwrap();

        let rows = log.read_all().unwrap();
        assert_eq!(rows, vec![row.clone(), row]);
        assert_eq!(rows[0].max_cool_setting, Some(92.0));
        assert_eq!(rows[0].co2_setting, None);
    }

    #[test]
    fn existing_empty_file_gets_header() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let log = PollLog::new(file.path());
        let now = DateTime::parse_flexible("2023-07-03 08:15:00").unwrap();

        log.append(&PollRow::polled(&snapshot(), now)).unwrap();

        assert!(std::fs::read_to_string(log.path()).unwrap().starts_with("Date,Name,"));
    }

    #[test]
    fn last_date_is_tracked_per_thermostat() {
        let dir = tempfile::tempdir().unwrap();
        let log = PollLog::new(dir.path().join("history.csv"));
        assert_eq!(log.last_date_of("TstatnoHP").unwrap(), None);

        let mut other = snapshot();
        other.info.name = "Other".to_owned();
        log.append_all([
            &PollRow::polled(&snapshot(), DateTime::parse_flexible("2023-07-03 08:15:00").unwrap()),
            &PollRow::polled(&other, DateTime::parse_flexible("2023-07-04 09:00:00").unwrap()),
            &PollRow::polled(&snapshot(), DateTime::parse_flexible("2023-07-03 10:45:00").unwrap()),
        ])
        .unwrap();

        assert_eq!(
            log.last_date_of("TstatnoHP").unwrap(),
            Some(DateTime::parse_flexible("2023-07-03 10:45:00").unwrap())
        );
        assert_eq!(log.last_date_of("Missing").unwrap(), None);
    }

    #[test]
    fn missing_file_cannot_be_read() {
        let dir = tempfile::tempdir().unwrap();

        assert!(PollLog::new(dir.path().join("missing.csv")).read_all().is_err());
    }
}
