use anyhow::Context;
use derive_more::derive::{Display, Error};
use serde::Deserialize;

use crate::{
    core::{
        time::DateTime,
        timeseries::{DataFrame, DataPoint},
        unit::DegreeFahrenheit,
    },
    thermostat::{
        Reading, RunStatus, SetpointLimits, ThermostatHistory, ThermostatInfo, ThermostatSnapshot,
        reading::{coerce_numeric, coerce_text},
    },
};

#[derive(Debug, Error, Display)]
pub enum PelicanApiError {
    #[display("Pelican API rejected the request: {message}")]
    Rejected { message: String },

    #[display("Pelican API response has no {object} element")]
    MissingObject { object: &'static str },
}

/// Root `<result>` element of every API response.
#[derive(Debug, Deserialize)]
struct ApiResult {
    success: Option<String>,
    message: Option<String>,
    #[serde(rename = "Thermostat", default)]
    thermostats: Vec<ThermostatElement>,
    #[serde(rename = "ThermostatHistory", default)]
    histories: Vec<HistoryElement>,
}

//Used for both the current state and single history entries. Everything is optional text,
//numbers are coerced later.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThermostatElement {
    name: Option<String>,
    serial_no: Option<String>,
    group_name: Option<String>,
    timestamp: Option<String>,
    system: Option<String>,
    temperature: Option<String>,
    heat_setting: Option<String>,
    cool_setting: Option<String>,
    fan: Option<String>,
    status: Option<String>,
    run_status: Option<String>,
    humidity: Option<String>,
    humidify_setting: Option<String>,
    dehumidify_setting: Option<String>,
    co2_setting: Option<String>,
    outside_ventilation: Option<String>,
    min_heat_setting: Option<String>,
    max_heat_setting: Option<String>,
    min_cool_setting: Option<String>,
    max_cool_setting: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryElement {
    name: Option<String>,
    serial_no: Option<String>,
    group_name: Option<String>,
    #[serde(rename = "History", default)]
    history: Vec<ThermostatElement>,
}

fn parse(xml: &str) -> anyhow::Result<ApiResult> {
    let result: ApiResult = quick_xml::de::from_str(xml).context("Error parsing Pelican API response")?;

    if result.success.as_deref().map(str::trim) == Some("0") {
        return Err(PelicanApiError::Rejected {
            message: result.message.unwrap_or_default(),
        }
        .into());
    }

    Ok(result)
}

fn missing_object(result: ApiResult, object: &'static str) -> anyhow::Error {
    match result.message {
        Some(message) => PelicanApiError::Rejected { message }.into(),
        None => PelicanApiError::MissingObject { object }.into(),
    }
}

pub fn parse_acknowledgement(xml: &str) -> anyhow::Result<Option<String>> {
    Ok(parse(xml)?.message)
}

pub fn parse_current_state(xml: &str, thermostat: &str) -> anyhow::Result<ThermostatSnapshot> {
    let mut result = parse(xml)?;

    if result.thermostats.is_empty() {
        return Err(missing_object(result, "Thermostat"));
    }

    let element = result.thermostats.swap_remove(0);
    let info = ThermostatInfo {
        name: coerce_text(element.name.as_deref()).unwrap_or_else(|| thermostat.to_owned()),
        serial_no: coerce_text(element.serial_no.as_deref()),
        group_name: coerce_text(element.group_name.as_deref()),
    };

    Ok(ThermostatSnapshot {
        info,
        reading: element.into_reading(),
    })
}

/// Returns `None` if the thermostat has no `History` data.
pub fn parse_history(xml: &str, thermostat: &str) -> anyhow::Result<Option<(ThermostatInfo, ThermostatHistory)>> {
    let result = parse(xml)?;

    if result.histories.is_empty() {
        return Err(missing_object(result, "ThermostatHistory"));
    }

    let element = pick_history(result.histories, thermostat);

    let info = ThermostatInfo {
        name: coerce_text(element.name.as_deref()).unwrap_or_else(|| thermostat.to_owned()),
        serial_no: coerce_text(element.serial_no.as_deref()),
        group_name: coerce_text(element.group_name.as_deref()),
    };

    let mut data_points = vec![];
    for entry in element.history {
        //empty <History/> elements show up every now and then
        let Some(raw_timestamp) = coerce_text(entry.timestamp.as_deref()) else {
            continue;
        };

        match DateTime::parse_flexible(&raw_timestamp) {
            Ok(timestamp) => data_points.push(DataPoint::new(entry.into_reading(), timestamp)),
            Err(e) => tracing::warn!(thermostat = %info.name, "Skipping history entry: {:?}", e),
        }
    }

    if data_points.is_empty() {
        tracing::warn!(thermostat = %info.name, "{} contains no History", info.name);
        return Ok(None);
    }

    Ok(Some((info, DataFrame::new(data_points)?)))
}

//expects a non-empty list
fn pick_history(mut histories: Vec<HistoryElement>, thermostat: &str) -> HistoryElement {
    let position = histories
        .iter()
        .position(|h| h.name.as_deref().map(str::trim) == Some(thermostat))
        .unwrap_or(0);

    histories.swap_remove(position)
}

impl ThermostatElement {
    fn into_reading(self) -> Reading {
        let fahrenheit = |raw: &Option<String>| coerce_numeric(raw.as_deref()).map(DegreeFahrenheit);

        Reading {
            system: coerce_text(self.system.as_deref()).map(|s| s.parse().unwrap_or_else(|e| match e {})),
            temperature: fahrenheit(&self.temperature),
            heat_setting: fahrenheit(&self.heat_setting),
            cool_setting: fahrenheit(&self.cool_setting),
            run_status: self.run_status.as_deref().map(RunStatus::from).unwrap_or_default(),
            fan: coerce_text(self.fan.as_deref()),
            status: coerce_text(self.status.as_deref()),
            humidity: coerce_numeric(self.humidity.as_deref()),
            humidify_setting: coerce_numeric(self.humidify_setting.as_deref()),
            dehumidify_setting: coerce_numeric(self.dehumidify_setting.as_deref()),
            co2_setting: coerce_numeric(self.co2_setting.as_deref()),
            outside_ventilation: coerce_text(self.outside_ventilation.as_deref()),
            limits: SetpointLimits {
                min_heat: fahrenheit(&self.min_heat_setting),
                max_heat: fahrenheit(&self.max_heat_setting),
                min_cool: fahrenheit(&self.min_cool_setting),
                max_cool: fahrenheit(&self.max_cool_setting),
            },
        }
    }
}
