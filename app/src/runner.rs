use anyhow::Context;

use crate::{
    adapter::csv_log::{PollLog, PollRow},
    core::time::{DateTime, DateTimeRange, Duration, Time},
    fdd::{
        CorrectionOutcome, CorrectionPolicy, LearnedSchedule, Lookback, ScheduleCorrectionPolicy, SetpointAssessment,
        SetpointCorrector, assess, correct_schedule, learn_schedule,
    },
    port::{OperatorPrompt, ThermostatControl, ThermostatDataAccess},
    settings::Settings,
    thermostat::{Preferences, ThermostatHistory, ThermostatInfo},
};

#[derive(Debug)]
pub enum ThermostatReport {
    NoHistory,
    Checked {
        assessment: SetpointAssessment,
        corrections: Vec<CorrectionOutcome>,
        schedule: LearnedSchedule,
        schedule_entries: usize,
    },
}

impl ThermostatReport {
    fn log_summary(&self, thermostat: &str) {
        match self {
            ThermostatReport::NoHistory => tracing::info!(thermostat, "Done, no history to check"),
            ThermostatReport::Checked {
                assessment,
                corrections,
                schedule,
                schedule_entries,
            } => tracing::info!(
                thermostat,
                faults = ?assessment.faults,
                corrected = corrections.iter().filter(|c| c.is_applied()).count(),
                schedule_days = schedule.days_considered,
                schedule_entries,
                "Done"
            ),
        }
    }
}

pub struct FddRunner<'a, A, P> {
    api: &'a A,
    prompt: &'a P,
    poll_log: PollLog,
    history_log: Option<PollLog>,
    preferences: Preferences,
    lookback: Lookback,
    correction: CorrectionPolicy,
    schedule: ScheduleCorrectionPolicy,
}

impl<'a, A, P> FddRunner<'a, A, P>
where
    A: ThermostatDataAccess + ThermostatControl,
    P: OperatorPrompt,
{
    pub fn new(api: &'a A, prompt: &'a P, settings: &Settings) -> Self {
        Self {
            api,
            prompt,
            poll_log: PollLog::new(&settings.log.poll_file),
            history_log: settings.log.history_file.as_ref().map(PollLog::new),
            preferences: settings.preferences.clone(),
            lookback: settings.detection.lookback,
            correction: settings.correction.clone(),
            schedule: settings.schedule.clone(),
        }
    }

    /// Processes all thermostats one after the other and returns the number of failed ones.
    pub async fn run_all(&self, thermostats: &[String]) -> usize {
        let mut failures = 0;

        for thermostat in thermostats {
            match self.process(thermostat).await {
                Ok(report) => report.log_summary(thermostat),
                Err(e) => {
                    tracing::error!(thermostat = %thermostat, "Error processing thermostat: {:?}", e);
                    failures += 1;
                }
            }
        }

        failures
    }

    #[tracing::instrument(skip(self))]
    pub async fn process(&self, thermostat: &str) -> anyhow::Result<ThermostatReport> {
        let now = DateTime::now();

        self.poll(thermostat, now).await?;

        let Some((info, history)) = self.history(thermostat, now).await? else {
            tracing::warn!("No history data available, fault detection skipped");
            return Ok(ThermostatReport::NoHistory);
        };

        if let Some(history_log) = &self.history_log {
            archive(history_log, &info, &history)?;
        }

        let assessment = assess(&history, &self.preferences, self.lookback, now);
        assessment.log_findings(thermostat, &self.preferences);

        let corrections = SetpointCorrector::new(self.api, self.prompt, &self.correction, &self.preferences)
            .correct(thermostat, &assessment, now.time())
            .await
            .context("Error correcting setpoints")?;

        if assessment.is_healthy() {
            tracing::info!("Setpoints match the preferences, nothing to correct");
        }

        let schedule = learn_schedule(&history, &self.preferences, self.schedule.tolerance_minutes, now);
        log_schedule(&schedule, &self.preferences);

        let schedule_entries = correct_schedule(self.api, thermostat, &schedule, &self.preferences, &self.schedule)
            .await
            .context("Error correcting schedule")?;

        Ok(ThermostatReport::Checked {
            assessment,
            corrections,
            schedule,
            schedule_entries,
        })
    }

    async fn poll(&self, thermostat: &str, now: DateTime) -> anyhow::Result<()> {
        let snapshot = self
            .api
            .current_state(thermostat)
            .await
            .context("Error polling current state")?;

        tracing::info!(
            "Polled {}: mode {:?}, temperature {:?}, heat {:?}, cool {:?}, running {}",
            snapshot.info.name,
            snapshot.reading.system,
            snapshot.reading.temperature,
            snapshot.reading.heat_setting,
            snapshot.reading.cool_setting,
            snapshot.reading.run_status
        );

        self.poll_log.append(&PollRow::polled(&snapshot, now))
    }

    //Covers the detection window as well as the days needed to learn the schedule
    async fn history(
        &self,
        thermostat: &str,
        now: DateTime,
    ) -> anyhow::Result<Option<(ThermostatInfo, ThermostatHistory)>> {
        let span = self
            .lookback
            .duration()
            .max(Duration::days(self.schedule.history_days as i64));
        let range = DateTimeRange::until(now, span);

        self.api
            .history(thermostat, &range)
            .await
            .with_context(|| format!("Error fetching history {}", range))
    }
}

//Fetched windows overlap between runs, only readings after the last archived one are appended
fn archive(log: &PollLog, info: &ThermostatInfo, history: &ThermostatHistory) -> anyhow::Result<()> {
    let last_archived = log.last_date_of(&info.name)?;

    let rows = history
        .iter()
        .filter(|dp| last_archived.is_none_or(|last| dp.timestamp > last))
        .map(|dp| PollRow::archived(info, dp))
        .collect::<Vec<_>>();

    if !rows.is_empty() {
        log.append_all(rows.iter())?;
    }

    tracing::debug!("Archived {} new history readings to {}", rows.len(), log.path().display());
    Ok(())
}

fn log_schedule(learned: &LearnedSchedule, preferences: &Preferences) {
    let describe = |time: Option<Time>| time.map(|t| t.to_hh_mm()).unwrap_or_else(|| "-".to_owned());

    if learned.start_deviates {
        tracing::warn!(
            "Occupied start {} deviates from the preferred {}",
            describe(learned.observed_start),
            preferences.occupied_start.to_hh_mm()
        );
    }

    if learned.end_deviates {
        tracing::warn!(
            "Occupied end {} deviates from the preferred {}",
            describe(learned.observed_end),
            preferences.occupied_end.to_hh_mm()
        );
    }

    tracing::info!(
        days = learned.days_considered,
        "Learned schedule: occupied {} - {}",
        describe(learned.observed_start),
        describe(learned.observed_end)
    );
}
