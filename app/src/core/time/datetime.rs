use std::{fmt::Display, ops::Sub};

use anyhow::Context;
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use tokio::task_local;

use super::{Duration, Time};

task_local! {
    pub static FIXED_NOW: DateTime;
}

const NAIVE_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DateTime {
    delegate: chrono::DateTime<chrono::Local>,
}

impl DateTime {
    fn new<T: chrono::TimeZone>(delegate: chrono::DateTime<T>) -> Self {
        Self {
            delegate: delegate.with_timezone(&chrono::Local),
        }
    }

    pub fn now() -> Self {
        FIXED_NOW
            .try_with(|t| *t)
            .unwrap_or_else(|_| chrono::Local::now().into())
    }

    pub fn from_iso(iso8601: &str) -> anyhow::Result<Self> {
        Ok(chrono::DateTime::parse_from_rfc3339(iso8601)?.into())
    }

    //Vendor timestamps come with or without seconds and offset. Naive values are local time.
    pub fn parse_flexible(value: &str) -> anyhow::Result<Self> {
        let value = value.trim();

        if let Ok(dt) = Self::from_iso(value) {
            return Ok(dt);
        }

        let naive = NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .with_context(|| format!("Unsupported timestamp format: {}", value))?;

        Self::from_local(naive)
    }

    fn from_local(naive: NaiveDateTime) -> anyhow::Result<Self> {
        chrono::Local
            .from_local_datetime(&naive)
            .earliest()
            .map(Into::into)
            .with_context(|| format!("Local time {} does not exist", naive))
    }

    pub fn to_log_string(&self) -> String {
        self.delegate.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn to_api_string(&self) -> String {
        self.delegate.format("%Y-%m-%dT%H:%M").to_string()
    }

    pub fn time(&self) -> Time {
        Time::new(self.delegate.time())
    }

    pub fn date(&self) -> NaiveDate {
        self.delegate.date_naive()
    }

    pub fn weekday(&self) -> Weekday {
        self.delegate.weekday()
    }

    pub fn is_weekday(&self) -> bool {
        !matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

}

impl Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.delegate)
    }
}

impl Sub<Duration> for DateTime {
    type Output = DateTime;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self::new(self.delegate - rhs.delegate)
    }
}

impl<T: chrono::TimeZone> From<chrono::DateTime<T>> for DateTime {
    fn from(val: chrono::DateTime<T>) -> Self {
        DateTime::new(val)
    }
}
