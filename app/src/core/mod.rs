pub mod math;
pub mod time;
pub mod timeseries;
pub mod unit;
