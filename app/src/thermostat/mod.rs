mod preferences;
pub(crate) mod reading;
mod schedule;

pub use preferences::Preferences;
pub use reading::{Reading, RunStatus, SetpointLimits, SystemMode, ThermostatHistory, ThermostatInfo, ThermostatSnapshot};
pub use schedule::{OnOff, ScheduleEntry, ScheduleRepeat, day_name};

#[cfg(test)]
pub mod fixture;
