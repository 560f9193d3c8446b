use thiserror::Error;

/// Reasons a growth-rate estimate cannot be computed from a run.
#[derive(Debug, Error, PartialEq)]
pub enum EstimationError {
    #[error("no age has a defined division probability to average")]
    InsufficientData,
    #[error("population never grew between consecutive steps")]
    NoGrowthObserved,
}
