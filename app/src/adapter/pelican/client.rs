use anyhow::Context;
use chrono::Weekday;
use reqwest_middleware::ClientWithMiddleware;

use crate::{
    core::{time::DateTimeRange, unit::DegreeFahrenheit},
    port::{ThermostatControl, ThermostatDataAccess},
    thermostat::{ScheduleEntry, SystemMode, ThermostatHistory, ThermostatInfo, ThermostatSnapshot, day_name},
};

use super::{
    request::{ApiRequest, ObjectType},
    response,
};

const CURRENT_ATTRIBUTES: &[&str] = &[
    "name",
    "serialNo",
    "groupName",
    "system",
    "temperature",
    "heatSetting",
    "coolSetting",
    "fan",
    "status",
    "runStatus",
    "humidity",
    "humidifySetting",
    "dehumidifySetting",
    "co2Setting",
    "outsideVentilation",
    "minHeatSetting",
    "maxHeatSetting",
    "minCoolSetting",
    "maxCoolSetting",
];

const HISTORY_ATTRIBUTES: &[&str] = &[
    "name",
    "serialNo",
    "groupName",
    "timestamp",
    "system",
    "temperature",
    "heatSetting",
    "coolSetting",
    "fan",
    "status",
    "runStatus",
    "humidity",
    "humidifySetting",
    "dehumidifySetting",
    "co2Setting",
    "outsideVentilation",
];

#[derive(Debug, Clone)]
pub struct PelicanClient {
    client: ClientWithMiddleware,
    endpoint: String,
    username: String,
    password: String,
}

impl PelicanClient {
    pub fn new(client: ClientWithMiddleware, endpoint: String, username: String, password: String) -> Self {
        Self {
            client,
            endpoint,
            username,
            password,
        }
    }

    async fn send(&self, request: &ApiRequest) -> anyhow::Result<String> {
        let mut query = vec![("username", self.username.clone()), ("password", self.password.clone())];
        query.extend(request.query_params());

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("Error sending {} request to Pelican API", request.object()))?
            .error_for_status()?;

        response.text().await.context("Error reading Pelican API response")
    }

    async fn write(&self, request: ApiRequest) -> anyhow::Result<()> {
        let xml = self.send(&request).await?;
        let message = response::parse_acknowledgement(&xml)?;

        tracing::debug!("Pelican API acknowledged: {}", message.unwrap_or_default());
        Ok(())
    }
}

impl PelicanClient {
    #[tracing::instrument(skip(self))]
    pub async fn get_current(&self, name: &str) -> anyhow::Result<ThermostatSnapshot> {
        let xml = self.send(&current_request(name)).await?;
        response::parse_current_state(&xml, name)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_history(
        &self,
        name: &str,
        range: &DateTimeRange,
    ) -> anyhow::Result<Option<(ThermostatInfo, ThermostatHistory)>> {
        let xml = self.send(&history_request(name, range)).await?;
        response::parse_history(&xml, name)
    }

    #[tracing::instrument(skip(self))]
    pub async fn set_cool_setpoint(&self, name: &str, value: DegreeFahrenheit) -> anyhow::Result<()> {
        self.write(setting_request(name, "coolSetting", value.to_api_value())).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn set_heat_setpoint(&self, name: &str, value: DegreeFahrenheit) -> anyhow::Result<()> {
        self.write(setting_request(name, "heatSetting", value.to_api_value())).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn set_system_mode(&self, name: &str, mode: &SystemMode) -> anyhow::Result<()> {
        self.write(setting_request(name, "system", mode)).await
    }

    #[tracing::instrument(skip(self), fields(entry = %entry))]
    pub async fn set_schedule(&self, name: &str, entry: &ScheduleEntry) -> anyhow::Result<()> {
        self.write(schedule_request(name, entry)).await
    }

    #[allow(unused)]
    #[tracing::instrument(skip(self))]
    pub async fn delete_schedule(&self, name: &str, day: Weekday, index: u8) -> anyhow::Result<()> {
        self.write(delete_schedule_request(name, day, index)).await
    }
}

fn current_request(name: &str) -> ApiRequest {
    ApiRequest::get(ObjectType::Thermostat)
        .select("name", name)
        .attributes(CURRENT_ATTRIBUTES)
}

fn history_request(name: &str, range: &DateTimeRange) -> ApiRequest {
    ApiRequest::get(ObjectType::ThermostatHistory)
        .select("name", name)
        .select("startDateTime", range.start().to_api_string())
        .select("endDateTime", range.end().to_api_string())
        .attributes(HISTORY_ATTRIBUTES)
}

fn setting_request(name: &str, key: &str, value: impl ToString) -> ApiRequest {
    ApiRequest::set(ObjectType::Thermostat)
        .select("name", name)
        .assign(key, value)
}

fn schedule_request(name: &str, entry: &ScheduleEntry) -> ApiRequest {
    ApiRequest::set(ObjectType::ThermostatSchedule)
        .select("name", name)
        .select("dayOfWeek", day_name(entry.day))
        .select("setTime", entry.set_time)
        .assign("startTime", entry.start_time.to_hh_mm())
        .assign("system", &entry.system)
        .assign("heatSetting", entry.heat_setting.to_api_value())
        .assign("coolSetting", entry.cool_setting.to_api_value())
        .assign("fan", entry.fan)
        .assign("keypad", entry.keypad)
        .assign("scheduleRepeat", entry.repeat)
}

fn delete_schedule_request(name: &str, day: Weekday, index: u8) -> ApiRequest {
    ApiRequest::set(ObjectType::ThermostatSchedule)
        .select("name", name)
        .select("dayOfWeek", day_name(day))
        .select("setTime", index)
        .flag("delete")
}

impl ThermostatDataAccess for PelicanClient {
    async fn current_state(&self, thermostat: &str) -> anyhow::Result<ThermostatSnapshot> {
        self.get_current(thermostat).await
    }

    async fn history(
        &self,
        thermostat: &str,
        range: &DateTimeRange,
    ) -> anyhow::Result<Option<(ThermostatInfo, ThermostatHistory)>> {
        self.get_history(thermostat, range).await
    }
}

impl ThermostatControl for PelicanClient {
    async fn set_cool_setpoint(&self, thermostat: &str, value: DegreeFahrenheit) -> anyhow::Result<()> {
        PelicanClient::set_cool_setpoint(self, thermostat, value).await
    }

    async fn set_heat_setpoint(&self, thermostat: &str, value: DegreeFahrenheit) -> anyhow::Result<()> {
        PelicanClient::set_heat_setpoint(self, thermostat, value).await
    }

    async fn set_system_mode(&self, thermostat: &str, mode: &SystemMode) -> anyhow::Result<()> {
        PelicanClient::set_system_mode(self, thermostat, mode).await
    }

    async fn set_schedule(&self, thermostat: &str, entry: &ScheduleEntry) -> anyhow::Result<()> {
        PelicanClient::set_schedule(self, thermostat, entry).await
    }
}
