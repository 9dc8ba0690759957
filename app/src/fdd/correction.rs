use anyhow::Result;
use serde::Deserialize;

use crate::{
    core::{time::Time, unit::DegreeFahrenheit},
    port::{Confirmation, OperatorPrompt, ThermostatControl},
    t,
    thermostat::Preferences,
};

use super::{SetpointAssessment, SetpointFault};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMode {
    //write as soon as the fault is detected
    Immediate,
    //write only when the run happens at one of the configured times
    Scheduled,
    //ask the operator first
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadbandStrategy {
    #[default]
    PreferredSetpoints,
    HeatPlusDeadband,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorrectionPolicy {
    pub enabled: bool,
    pub mode: CorrectionMode,
    pub scheduled_times: Vec<Time>,
    pub deadband_strategy: DeadbandStrategy,
}

impl Default for CorrectionPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: CorrectionMode::Interactive,
            scheduled_times: vec![t!(6:00), t!(8:00), t!(15:00)],
            deadband_strategy: DeadbandStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionOutcome {
    Applied(SetpointFault),
    Declined(SetpointFault),
    Unanswered(SetpointFault),
    NotScheduledNow(SetpointFault),
    Disabled(SetpointFault),
}

impl CorrectionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CorrectionOutcome::Applied(_))
    }
}

pub struct SetpointCorrector<'a, C, P> {
    control: &'a C,
    prompt: &'a P,
    policy: &'a CorrectionPolicy,
    preferences: &'a Preferences,
}

impl<'a, C: ThermostatControl, P: OperatorPrompt> SetpointCorrector<'a, C, P> {
    pub fn new(control: &'a C, prompt: &'a P, policy: &'a CorrectionPolicy, preferences: &'a Preferences) -> Self {
        Self {
            control,
            prompt,
            policy,
            preferences,
        }
    }

    /// Handles every fault of the assessment according to the correction policy.
    ///
    /// `now` is the wall-clock time of the run, only relevant in scheduled mode. Faults are
    /// handled in the order they were detected; a failing write aborts the remaining ones.
    #[tracing::instrument(skip_all, fields(thermostat = thermostat, mode = ?self.policy.mode))]
    pub async fn correct(
        &self,
        thermostat: &str,
        assessment: &SetpointAssessment,
        now: Time,
    ) -> Result<Vec<CorrectionOutcome>> {
        let mut outcomes = vec![];

        for fault in assessment.faults.iter().copied() {
            outcomes.push(self.handle(thermostat, fault, now).await?);
        }

        Ok(outcomes)
    }

    async fn handle(&self, thermostat: &str, fault: SetpointFault, now: Time) -> Result<CorrectionOutcome> {
        if !self.policy.enabled {
            tracing::warn!("Fault self correction is not enabled, {} is left as is. Please enable self correction", fault);
            return Ok(CorrectionOutcome::Disabled(fault));
        }

        tracing::info!("Correcting {} by overriding {}", fault, self.describe_correction(fault));

        match self.policy.mode {
            CorrectionMode::Immediate => {
                self.apply(thermostat, fault).await?;
                Ok(CorrectionOutcome::Applied(fault))
            }

            CorrectionMode::Scheduled => {
                if self.policy.scheduled_times.iter().any(|at| at.same_minute_as(&now)) {
                    tracing::info!("Scheduled correction time {} reached", now.to_hh_mm());
                    self.apply(thermostat, fault).await?;
                    Ok(CorrectionOutcome::Applied(fault))
                } else {
                    tracing::info!("{} is not a scheduled correction time, {} is left for later", now.to_hh_mm(), fault);
                    Ok(CorrectionOutcome::NotScheduledNow(fault))
                }
            }

            CorrectionMode::Interactive => match self.prompt.ask(&self.question(fault))? {
                Confirmation::Yes => {
                    self.apply(thermostat, fault).await?;
                    Ok(CorrectionOutcome::Applied(fault))
                }
                Confirmation::No => {
                    tracing::info!("No correction is taken, the {} fault may persist", fault);
                    Ok(CorrectionOutcome::Declined(fault))
                }
                Confirmation::Unrecognized(answer) => {
                    tracing::warn!("Answer '{}' is neither 'y' nor 'n', nothing is done about {}", answer, fault);
                    Ok(CorrectionOutcome::Unanswered(fault))
                }
            },
        }
    }

    async fn apply(&self, thermostat: &str, fault: SetpointFault) -> Result<()> {
        match fault {
            SetpointFault::Overcooling => {
                self.control
                    .set_cool_setpoint(thermostat, self.preferences.occupied_cool)
                    .await?
            }
            SetpointFault::Overheating => {
                self.control
                    .set_heat_setpoint(thermostat, self.preferences.occupied_heat)
                    .await?
            }
            SetpointFault::NarrowDeadband => {
                self.control
                    .set_heat_setpoint(thermostat, self.preferences.occupied_heat)
                    .await?;
                self.control
                    .set_cool_setpoint(thermostat, self.deadband_cool_setpoint())
                    .await?;
            }
        }

        tracing::info!("The {} fault is corrected", fault);
        Ok(())
    }

    fn deadband_cool_setpoint(&self) -> DegreeFahrenheit {
        match self.policy.deadband_strategy {
            DeadbandStrategy::PreferredSetpoints => self.preferences.occupied_cool,
            DeadbandStrategy::HeatPlusDeadband => self.preferences.occupied_heat + self.preferences.deadband,
        }
    }

    fn describe_correction(&self, fault: SetpointFault) -> String {
        match fault {
            SetpointFault::Overcooling => format!("the cooling setpoint with {}", self.preferences.occupied_cool),
            SetpointFault::Overheating => format!("the heating setpoint with {}", self.preferences.occupied_heat),
            SetpointFault::NarrowDeadband => format!(
                "heating and cooling setpoints with {} and {}",
                self.preferences.occupied_heat,
                self.deadband_cool_setpoint()
            ),
        }
    }

    fn question(&self, fault: SetpointFault) -> String {
        match fault {
            SetpointFault::Overcooling => format!(
                "Do you want to reset the cooling setpoint to the corrected value {}? (y/n) ",
                self.preferences.occupied_cool.to_api_value()
            ),
            SetpointFault::Overheating => format!(
                "Do you want to reset the heating setpoint to the corrected value {}? (y/n) ",
                self.preferences.occupied_heat.to_api_value()
            ),
            SetpointFault::NarrowDeadband => format!(
                "Do you want to reset heating and cooling setpoints to {} and {}? (y/n) ",
                self.preferences.occupied_heat.to_api_value(),
                self.deadband_cool_setpoint().to_api_value()
            ),
        }
    }
}
