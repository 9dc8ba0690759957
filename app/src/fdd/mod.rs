mod correction;
mod schedule;
mod setpoint;

pub use correction::{CorrectionOutcome, CorrectionPolicy, SetpointCorrector};
#[allow(unused_imports)]
pub use correction::{CorrectionMode, DeadbandStrategy};
pub use schedule::{LearnedSchedule, ScheduleCorrectionPolicy, correct_schedule, learn_schedule};
pub use setpoint::{Lookback, SetpointAssessment, SetpointFault, assess};
