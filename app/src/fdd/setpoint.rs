use derive_more::derive::Display;
use serde::Deserialize;

use crate::{
    core::{
        math::mean_of_present,
        time::{DateTime, DateTimeRange, Duration},
        timeseries::dataframe::between_time,
    },
    thermostat::{Preferences, ThermostatHistory},
};

//How much history the averages are computed over, counted back from now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookback {
    #[default]
    TwoDays,
    TwoHours,
}

impl Lookback {
    pub fn duration(&self) -> Duration {
        match self {
            Lookback::TwoDays => Duration::days(2),
            Lookback::TwoHours => Duration::hours(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SetpointFault {
    #[display("overcooling")]
    Overcooling,
    #[display("overheating")]
    Overheating,
    #[display("narrow deadband")]
    NarrowDeadband,
}

/// Result of checking the averaged setpoints of a thermostat against the site preferences.
///
/// Averages are `None` when the underlying selection holds no numeric value. A `None` average
/// never raises a fault.
#[derive(Debug, Clone, PartialEq)]
pub struct SetpointAssessment {
    pub occupied_samples: usize,
    pub cooling_samples: usize,
    pub heating_samples: usize,
    pub mean_cool_while_cooling: Option<f64>,
    pub mean_heat_while_heating: Option<f64>,
    pub mean_cool_occupied: Option<f64>,
    pub mean_heat_occupied: Option<f64>,
    pub faults: Vec<SetpointFault>,
}

pub fn assess(
    history: &ThermostatHistory,
    preferences: &Preferences,
    lookback: Lookback,
    now: DateTime,
) -> SetpointAssessment {
    let window = DateTimeRange::until(now, lookback.duration());
    let occupied = between_time(history.within(&window), &preferences.occupied_hours());

    let cooling = occupied.iter().filter(|dp| dp.value.is_cooling()).collect::<Vec<_>>();
    let heating = occupied.iter().filter(|dp| dp.value.is_heating()).collect::<Vec<_>>();

    let mean_cool_while_cooling = mean_of_present(cooling.iter().map(|dp| dp.cool_value()));
    let mean_heat_while_heating = mean_of_present(heating.iter().map(|dp| dp.heat_value()));
    let mean_cool_occupied = mean_of_present(occupied.iter().map(|dp| dp.cool_value()));
    let mean_heat_occupied = mean_of_present(occupied.iter().map(|dp| dp.heat_value()));

    let mut faults = vec![];

    let lowest_acceptable_cool = preferences.occupied_cool.0 - preferences.setpoint_deviation_threshold;
    if mean_cool_while_cooling.is_some_and(|mean| mean < lowest_acceptable_cool) {
        faults.push(SetpointFault::Overcooling);
    }

    let highest_acceptable_heat = preferences.occupied_heat.0 + preferences.setpoint_deviation_threshold;
    if mean_heat_while_heating.is_some_and(|mean| mean > highest_acceptable_heat) {
        faults.push(SetpointFault::Overheating);
    }

    if deadband(mean_cool_occupied, mean_heat_occupied)
        .is_some_and(|deadband| deadband < preferences.deadband_deviation_threshold)
    {
        faults.push(SetpointFault::NarrowDeadband);
    }

    SetpointAssessment {
        occupied_samples: occupied.len(),
        cooling_samples: cooling.len(),
        heating_samples: heating.len(),
        mean_cool_while_cooling,
        mean_heat_while_heating,
        mean_cool_occupied,
        mean_heat_occupied,
        faults,
    }
}

fn deadband(mean_cool: Option<f64>, mean_heat: Option<f64>) -> Option<f64> {
    Some(mean_cool? - mean_heat?)
}

impl SetpointAssessment {
    pub fn has(&self, fault: SetpointFault) -> bool {
        self.faults.contains(&fault)
    }

    pub fn is_healthy(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn occupied_deadband(&self) -> Option<f64> {
        deadband(self.mean_cool_occupied, self.mean_heat_occupied)
    }

    //Cooling setpoint below heating setpoint on average
    pub fn has_inverted_setpoints(&self) -> bool {
        self.occupied_deadband().is_some_and(|deadband| deadband < 0.0)
    }

    pub fn log_findings(&self, thermostat: &str, preferences: &Preferences) {
        tracing::info!(
            thermostat,
            occupied = self.occupied_samples,
            cooling = self.cooling_samples,
            heating = self.heating_samples,
            "Averaged setpoints: cooling {:?}, heating {:?}, occupied cool {:?}, occupied heat {:?}",
            self.mean_cool_while_cooling,
            self.mean_heat_while_heating,
            self.mean_cool_occupied,
            self.mean_heat_occupied
        );

        match self.mean_cool_while_cooling {
            None => tracing::warn!(thermostat, "No cooling operation in occupied hours, overcooling check skipped"),
            Some(_) if self.has(SetpointFault::Overcooling) => tracing::warn!(
                thermostat,
                "Overcooling fault: averaged cooling setpoint in occupied hours is lower than the preferred {}",
                preferences.occupied_cool
            ),
            Some(_) => tracing::info!(
                thermostat,
                "No overcooling fault: averaged cooling setpoint in occupied hours equals or is higher than preferred"
            ),
        }

        match self.mean_heat_while_heating {
            None => tracing::warn!(thermostat, "No heating operation in occupied hours, overheating check skipped"),
            Some(_) if self.has(SetpointFault::Overheating) => tracing::warn!(
                thermostat,
                "Overheating fault: averaged heating setpoint in occupied hours is higher than the preferred {}",
                preferences.occupied_heat
            ),
            Some(_) => tracing::info!(
                thermostat,
                "No overheating fault: averaged heating setpoint in occupied hours equals or is lower than preferred"
            ),
        }

        match self.occupied_deadband() {
            None => tracing::warn!(thermostat, "No setpoints in occupied hours, deadband check skipped"),
            Some(deadband) => {
                if self.has_inverted_setpoints() {
                    tracing::warn!(
                        thermostat,
                        "Cooling setpoint is lower than the heating setpoint ({:.2} °F), setpoints are set wrong",
                        deadband
                    );
                }

                if self.has(SetpointFault::NarrowDeadband) {
                    tracing::warn!(thermostat, "Narrow deadband fault: {:.2} °F in occupied hours", deadband);
                } else {
                    tracing::info!(thermostat, "No narrow deadband fault: {:.2} °F in occupied hours", deadband);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermostat::fixture::{HistoryBuilder, now_at};

    fn preferences() -> Preferences {
        Preferences::default()
    }

    #[test]
    fn constant_low_cooling_setpoint_is_overcooling() {
        let history = HistoryBuilder::new("2023-07-05")
            .cooling("09:00", 70.0, 68.0)
            .cooling("10:00", 70.0, 68.0)
            .cooling("11:00", 70.0, 68.0)
            .build();

        let result = assess(&history, &preferences(), Lookback::TwoDays, now_at("2023-07-05T12:00"));

        assert_eq!(result.mean_cool_while_cooling, Some(70.0));
        assert!(result.has(SetpointFault::Overcooling));
    }

    #[test]
    fn cooling_setpoint_at_threshold_is_no_fault() {
        let history = HistoryBuilder::new("2023-07-05")
            .cooling("09:00", 73.5, 68.0)
            .cooling("10:00", 73.5, 68.0)
            .build();

        let result = assess(&history, &preferences(), Lookback::TwoDays, now_at("2023-07-05T12:00"));

        assert_eq!(result.mean_cool_while_cooling, Some(73.5));
        assert!(!result.has(SetpointFault::Overcooling));
    }

    #[test]
    fn cooling_setpoint_above_preferred_is_no_fault() {
        let history = HistoryBuilder::new("2023-07-05").cooling("09:00", 76.0, 68.0).build();

        let result = assess(&history, &preferences(), Lookback::TwoDays, now_at("2023-07-05T12:00"));

        assert!(result.is_healthy());
    }

    #[test]
    fn only_cooling_rows_count_for_overcooling() {
        let history = HistoryBuilder::new("2023-07-05")
            .cooling("09:00", 74.0, 68.0)
            .idle("10:00", 60.0, 58.0)
            .heating("11:00", 60.0, 58.0)
            .build();

        let result = assess(&history, &preferences(), Lookback::TwoDays, now_at("2023-07-05T12:00"));

        assert_eq!(result.cooling_samples, 1);
        assert_eq!(result.heating_samples, 1);
        assert_eq!(result.occupied_samples, 3);
        assert!(!result.has(SetpointFault::Overcooling));
    }

    #[test]
    fn rows_outside_occupied_hours_are_ignored() {
        let history = HistoryBuilder::new("2023-07-05")
            .cooling("05:59", 60.0, 55.0)
            .cooling("18:00", 60.0, 55.0)
            .cooling("09:00", 75.0, 68.0)
            .build();

        let result = assess(&history, &preferences(), Lookback::TwoDays, now_at("2023-07-05T20:00"));

        assert_eq!(result.occupied_samples, 1);
        assert_eq!(result.mean_cool_while_cooling, Some(75.0));
        assert!(result.is_healthy());
    }

    #[test]
    fn rows_outside_lookback_are_ignored() {
        let history = HistoryBuilder::new("2023-07-05")
            .cooling("08:00", 60.0, 55.0)
            .cooling("11:00", 75.0, 68.0)
            .build();

        let result = assess(&history, &preferences(), Lookback::TwoHours, now_at("2023-07-05T12:00"));

        assert_eq!(result.cooling_samples, 1);
        assert!(result.is_healthy());
    }

    #[test]
    fn heating_setpoint_above_threshold_is_overheating() {
        let history = HistoryBuilder::new("2023-07-05")
            .heating("07:00", 80.0, 70.0)
            .heating("08:00", 80.0, 69.0)
            .build();

        let result = assess(&history, &preferences(), Lookback::TwoDays, now_at("2023-07-05T12:00"));

        assert_eq!(result.mean_heat_while_heating, Some(69.5));
        assert!(result.has(SetpointFault::Overheating));
    }

    #[test]
    fn heating_setpoint_at_threshold_is_no_fault() {
        let history = HistoryBuilder::new("2023-07-05").heating("07:00", 80.0, 68.5).build();

        let result = assess(&history, &preferences(), Lookback::TwoDays, now_at("2023-07-05T12:00"));

        assert!(!result.has(SetpointFault::Overheating));
    }

    #[test]
    fn missing_values_are_excluded_from_mean() {
        let history = HistoryBuilder::new("2023-07-05")
            .raw("09:00", "Cool-Stage1", Some("70"), Some("68"))
            .raw("10:00", "Cool-Stage1", Some(""), Some("68"))
            .raw("11:00", "Cool-Stage2", Some("n/a"), None)
            .raw("11:30", "Cool-Stage2", Some("72"), Some("68"))
            .build();

        let result = assess(&history, &preferences(), Lookback::TwoDays, now_at("2023-07-05T12:00"));

        assert_eq!(result.cooling_samples, 4);
        assert_eq!(result.mean_cool_while_cooling, Some(71.0));
        assert_eq!(result.mean_heat_occupied, Some(68.0));
    }

    #[test]
    fn empty_selection_never_flags() {
        let history = HistoryBuilder::new("2023-07-05").idle("09:00", 74.0, 68.0).build();

        let result = assess(&history, &preferences(), Lookback::TwoDays, now_at("2023-07-05T12:00"));

        assert_eq!(result.mean_cool_while_cooling, None);
        assert_eq!(result.mean_heat_while_heating, None);
        assert!(result.is_healthy());
    }

    #[test]
    fn deadband_below_threshold_is_narrow() {
        let history = HistoryBuilder::new("2023-07-05")
            .idle("09:00", 70.2, 70.0)
            .idle("10:00", 70.4, 70.0)
            .build();

        let result = assess(&history, &preferences(), Lookback::TwoDays, now_at("2023-07-05T12:00"));

        assert!(result.has(SetpointFault::NarrowDeadband));
        assert!(!result.has_inverted_setpoints());
    }

    #[test]
    fn deadband_at_threshold_is_no_fault() {
        let history = HistoryBuilder::new("2023-07-05").idle("09:00", 70.5, 70.0).build();

        let result = assess(&history, &preferences(), Lookback::TwoDays, now_at("2023-07-05T12:00"));

        assert_eq!(result.occupied_deadband(), Some(0.5));
        assert!(!result.has(SetpointFault::NarrowDeadband));
    }

    #[test]
    fn negative_deadband_is_narrow_and_inverted() {
        let history = HistoryBuilder::new("2023-07-05").idle("09:00", 68.0, 72.0).build();

        let result = assess(&history, &preferences(), Lookback::TwoDays, now_at("2023-07-05T12:00"));

        assert_eq!(result.occupied_deadband(), Some(-4.0));
        assert!(result.has(SetpointFault::NarrowDeadband));
        assert!(result.has_inverted_setpoints());
    }

    #[test]
    fn several_faults_in_one_run() {
        let history = HistoryBuilder::new("2023-07-05")
            .cooling("09:00", 69.0, 69.0)
            .heating("10:00", 69.0, 69.0)
            .build();

        let result = assess(&history, &preferences(), Lookback::TwoDays, now_at("2023-07-05T12:00"));

        assert_eq!(
            result.faults,
            vec![SetpointFault::Overcooling, SetpointFault::Overheating, SetpointFault::NarrowDeadband]
        );
    }
}
