use derive_more::Into;
use thiserror::Error;

#[derive(Debug, Default, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if value >= 1000 {
            return Err(RepsError::OutOfRange);
        }
        Ok(Self(value))
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RepsError {
    #[error("reps must be below 1000")]
    OutOfRange,
}

/// Load in kilograms with a resolution of 0.1 kg.
#[derive(Debug, Default, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !(0.0..1000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }
        if ((value * 10.0).round() - value * 10.0).abs() > 0.001 {
            return Err(WeightError::InvalidResolution);
        }
        Ok(Self(value))
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WeightError {
    #[error("weight must be at least 0 and below 1000 kg")]
    OutOfRange,
    #[error("weight must be a multiple of 0.1 kg")]
    InvalidResolution,
}

/// Reps in reserve, stored in tenths.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RIR(u8);

impl RIR {
    pub fn new(value: f32) -> Result<Self, RIRError> {
        if !(0.0..=10.0).contains(&value) {
            return Err(RIRError::OutOfRange);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let tenths = (value * 10.0).round() as u8;

        if tenths % 5 != 0 {
            return Err(RIRError::InvalidResolution);
        }
        Ok(Self(tenths))
    }
}

impl From<RIR> for f32 {
    fn from(value: RIR) -> Self {
        f32::from(value.0) / 10.0
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RIRError {
    #[error("RIR must be between 0 and 10")]
    OutOfRange,
    #[error("RIR must be a multiple of 0.5")]
    InvalidResolution,
}
