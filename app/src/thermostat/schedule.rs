use std::fmt::Display;

use chrono::Weekday;
use serde::Deserialize;

use crate::core::{time::Time, unit::DegreeFahrenheit};

use super::SystemMode;

//One entry of a thermostat's weekly schedule. `set_time` is the 1-based slot index within the day.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub day: Weekday,
    pub set_time: u8,
    pub start_time: Time,
    pub system: SystemMode,
    pub heat_setting: DegreeFahrenheit,
    pub cool_setting: DegreeFahrenheit,
    pub fan: OnOff,
    pub keypad: OnOff,
    pub repeat: ScheduleRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnOff {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ScheduleRepeat {
    Daily,
    Weekday,
    #[default]
    Weekly,
}

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

impl Display for OnOff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnOff::On => write!(f, "On"),
            OnOff::Off => write!(f, "Off"),
        }
    }
}

impl Display for ScheduleRepeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleRepeat::Daily => write!(f, "Daily"),
            ScheduleRepeat::Weekday => write!(f, "Weekday"),
            ScheduleRepeat::Weekly => write!(f, "Weekly"),
        }
    }
}

impl Display for ScheduleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} #{} from {} [{}, heat {}, cool {}]",
            day_name(self.day),
            self.set_time,
            self.start_time.to_hh_mm(),
            self.system,
            self.heat_setting,
            self.cool_setting
        )
    }
}
