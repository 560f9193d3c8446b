pub mod config;
pub mod outcome;
pub mod sim_params;

// Re-export key types for easier use by dependent crates
pub use config::{SimulationConfig, TimingConfig, InitialConditions, DivisionConfig, StatisticsConfig, OutputConfig};
pub use outcome::SimulationOutcome;
pub use sim_params::DivisionParams;
