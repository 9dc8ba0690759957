use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{NaiveDate, Weekday};
use serde::Deserialize;

use crate::{
    core::{
        time::{DateTime, Time},
        timeseries::DataPoint,
    },
    port::ThermostatControl,
    thermostat::{OnOff, Preferences, Reading, ScheduleEntry, ScheduleRepeat, SystemMode, ThermostatHistory},
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleCorrectionPolicy {
    pub enabled: bool,
    //how far observed transitions may drift from the preferred times
    pub tolerance_minutes: u32,
    //history fetched for learning, in days
    pub history_days: u32,
    pub days: Vec<Weekday>,
    pub force_auto_mode: bool,
    pub repeat: ScheduleRepeat,
}

impl Default for ScheduleCorrectionPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            tolerance_minutes: 30,
            history_days: 7,
            days: vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
            force_auto_mode: false,
            repeat: ScheduleRepeat::Weekly,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LearnedSchedule {
    pub days_considered: usize,
    pub observed_start: Option<Time>,
    pub observed_end: Option<Time>,
    pub start_deviates: bool,
    pub end_deviates: bool,
}

impl LearnedSchedule {
    pub fn flags(&self) -> (bool, bool) {
        (self.start_deviates, self.end_deviates)
    }
}

/// Infers when occupied periods begin and end on weekdays and compares that to the preferred
/// schedule.
///
/// A reading counts as occupied when its setpoints are closer to the occupied preferences than
/// to the unoccupied ones. Per day, the occupied period starts at the first occupied reading and
/// ends at the first unoccupied reading following the last occupied one. Start and end are
/// averaged over all days that had an occupied period.
///
/// Only days before the day of `now` are considered, the current day is not over yet.
pub fn learn_schedule(
    history: &ThermostatHistory,
    preferences: &Preferences,
    tolerance_minutes: u32,
    now: DateTime,
) -> LearnedSchedule {
    let today = now.date();
    let mut days: BTreeMap<NaiveDate, Vec<(Time, bool)>> = BTreeMap::new();

    for dp in history
        .iter()
        .filter(|dp| dp.timestamp.is_weekday() && dp.timestamp.date() < today)
    {
        if let Some(occupied) = is_occupied_setting(dp, preferences) {
            days.entry(dp.timestamp.date())
                .or_default()
                .push((dp.timestamp.time(), occupied));
        }
    }

    let transitions = days
        .values()
        .filter_map(|readings| occupied_period(readings))
        .collect::<Vec<_>>();

    if transitions.is_empty() {
        tracing::warn!("No occupied period found in history, schedule cannot be learned");
        return LearnedSchedule {
            days_considered: 0,
            observed_start: None,
            observed_end: None,
            start_deviates: false,
            end_deviates: false,
        };
    }

    let observed_start = average_time(transitions.iter().map(|(start, _)| *start));
    let observed_end = average_time(transitions.iter().map(|(_, end)| *end));

    LearnedSchedule {
        days_considered: transitions.len(),
        observed_start,
        observed_end,
        start_deviates: deviates(observed_start, preferences.occupied_start, tolerance_minutes),
        end_deviates: deviates(observed_end, preferences.occupied_end, tolerance_minutes),
    }
}

//None if the reading has no setpoint at all
fn is_occupied_setting(dp: &DataPoint<Reading>, preferences: &Preferences) -> Option<bool> {
    let distances = [
        dp.cool_value()
            .map(|cool| ((cool - preferences.occupied_cool.0).abs(), (cool - preferences.unoccupied_cool.0).abs())),
        dp.heat_value()
            .map(|heat| ((heat - preferences.occupied_heat.0).abs(), (heat - preferences.unoccupied_heat.0).abs())),
    ];

    let present = distances.iter().flatten().collect::<Vec<_>>();
    if present.is_empty() {
        return None;
    }

    let to_occupied: f64 = present.iter().map(|(occ, _)| occ).sum();
    let to_unoccupied: f64 = present.iter().map(|(_, unocc)| unocc).sum();

    Some(to_occupied < to_unoccupied)
}

fn occupied_period(readings: &[(Time, bool)]) -> Option<(Time, Time)> {
    let first = readings.iter().position(|(_, occupied)| *occupied)?;
    let last = readings.iter().rposition(|(_, occupied)| *occupied)?;

    let start = readings[first].0;
    let end = readings.get(last + 1).unwrap_or(&readings[last]).0;

    Some((start, end))
}

fn average_time(times: impl Iterator<Item = Time>) -> Option<Time> {
    let minutes = times.map(|t| t.minutes_of_day() as f64).collect::<Vec<_>>();
    if minutes.is_empty() {
        return None;
    }

    let average = (minutes.iter().sum::<f64>() / minutes.len() as f64).round() as u32;
    Time::from_minutes_of_day(average).ok()
}

fn deviates(observed: Option<Time>, preferred: Time, tolerance_minutes: u32) -> bool {
    observed.is_some_and(|observed| observed.minutes_of_day().abs_diff(preferred.minutes_of_day()) > tolerance_minutes)
}

/// Pushes weekly schedule entries for the flagged transitions. Returns the number of entries
/// written.
///
/// Slot 1 starts the occupied period with occupied setpoints, slot 2 starts the unoccupied period
/// at the preferred occupied end with unoccupied setpoints.
#[tracing::instrument(skip_all, fields(thermostat = thermostat))]
pub async fn correct_schedule(
    control: &impl ThermostatControl,
    thermostat: &str,
    learned: &LearnedSchedule,
    preferences: &Preferences,
    policy: &ScheduleCorrectionPolicy,
) -> Result<usize> {
    let (start_deviates, end_deviates) = learned.flags();

    if !start_deviates && !end_deviates {
        tracing::info!("Observed schedule matches the preferred one");
        return Ok(0);
    }

    if !policy.enabled {
        tracing::warn!("Schedule deviates from preference, but schedule correction is not enabled");
        return Ok(0);
    }

    if policy.force_auto_mode {
        tracing::info!("Switching thermostat to Auto mode to activate the schedule");
        control.set_system_mode(thermostat, &SystemMode::Auto).await?;
    }

    let mut entries = vec![];
    for day in policy.days.iter().copied() {
        if start_deviates {
            entries.push(ScheduleEntry {
                day,
                set_time: 1,
                start_time: preferences.occupied_start,
                system: SystemMode::Auto,
                heat_setting: preferences.occupied_heat,
                cool_setting: preferences.occupied_cool,
                fan: OnOff::Off,
                keypad: OnOff::Off,
                repeat: policy.repeat,
            });
        }

        if end_deviates {
            entries.push(ScheduleEntry {
                day,
                set_time: 2,
                start_time: preferences.occupied_end,
                system: SystemMode::Auto,
                heat_setting: preferences.unoccupied_heat,
                cool_setting: preferences.unoccupied_cool,
                fan: OnOff::Off,
                keypad: OnOff::Off,
                repeat: policy.repeat,
            });
        }
    }

    for entry in entries.iter() {
        control.set_schedule(thermostat, entry).await?;
        tracing::info!("Schedule entry set: {}", entry);
    }

    Ok(entries.len())
}
