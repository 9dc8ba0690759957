use std::process::ExitCode;

use settings::Settings;

use crate::adapter::console::ConsolePrompt;
use crate::runner::FddRunner;

mod adapter;
mod core;
mod fdd;
pub mod port;
mod runner;
mod settings;
mod thermostat;

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> ExitCode {
    let settings = Settings::new().expect("Error reading configuration");

    settings.monitoring.init().expect("Error initializing monitoring");

    let pelican = settings.pelican.new_client().expect("Error initializing Pelican API client");
    let prompt = ConsolePrompt;

    tracing::info!(
        "Starting fault detection for {} thermostat(s) at {}",
        settings.thermostats.len(),
        settings.pelican.endpoint()
    );

    let runner = FddRunner::new(&pelican, &prompt, &settings);
    let failures = runner.run_all(&settings.thermostats).await;

    if failures > 0 {
        tracing::error!("Fault detection failed for {} thermostat(s)", failures);
        return ExitCode::FAILURE;
    }

    tracing::info!("Fault detection completed");
    ExitCode::SUCCESS
}
