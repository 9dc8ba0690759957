use std::fmt::Display;

use derive_more::derive::AsRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, AsRef, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DegreeFahrenheit(pub f64);

impl DegreeFahrenheit {
    //Value as the vendor API expects it: no unit, no trailing ".0"
    pub fn to_api_value(&self) -> String {
        format!("{}", self.0)
    }
}

impl From<&DegreeFahrenheit> for f64 {
    fn from(value: &DegreeFahrenheit) -> Self {
        value.0
    }
}

impl From<f64> for DegreeFahrenheit {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<DegreeFahrenheit> for f64 {
    fn from(value: DegreeFahrenheit) -> Self {
        value.0
    }
}

impl Display for DegreeFahrenheit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} °F", self.0)
    }
}

impl std::ops::Add for DegreeFahrenheit {
    type Output = DegreeFahrenheit;

    fn add(self, rhs: Self) -> Self::Output {
        DegreeFahrenheit(self.0 + rhs.0)
    }
}

impl std::ops::Sub for DegreeFahrenheit {
    type Output = DegreeFahrenheit;

    fn sub(self, rhs: Self) -> Self::Output {
        DegreeFahrenheit(self.0 - rhs.0)
    }
}
