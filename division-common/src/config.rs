use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::sim_params::DivisionParams;
use std::path::Path;

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    /// Number of discrete time steps (T).
    #[serde(default = "default_total_steps")]
    pub total_steps: u32,
}

// Initial conditions for each cohort, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InitialConditions {
    #[serde(default = "default_num_cells_initial")]
    pub num_cells_initial: u32,
    /// Seed for the per-run RNGs. When absent the RNGs are seeded from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

// Parameters for division-time draws, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DivisionConfig {
    #[serde(default = "default_uncorrelated_min")]
    pub uncorrelated_min: i32,
    #[serde(default = "default_uncorrelated_max")]
    pub uncorrelated_max: i32,
    /// Half-width of the range around the parent's division time.
    #[serde(default = "default_correlated_spread")]
    pub correlated_spread: i32,
    /// Parent division time assumed for the first correlated generation.
    #[serde(default = "default_parent_division_time")]
    pub default_parent_division_time: i32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StatisticsConfig {
    /// Size of the per-age accumulator buffers.
    #[serde(default = "default_max_age_slots")]
    pub max_age_slots: usize,
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_plot_filename")]
    pub plot_filename: String,
    #[serde(default = "default_plot_width")]
    pub plot_width: u32,
    #[serde(default = "default_plot_height")]
    pub plot_height: u32,
    /// Print the per-step `Time t: Population: n` status line.
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SimulationConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub initial_conditions: InitialConditions,
    #[serde(default)]
    pub division: DivisionConfig,
    #[serde(default)]
    pub statistics: StatisticsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            total_steps: default_total_steps(),
        }
    }
}

impl Default for InitialConditions {
    fn default() -> Self {
        InitialConditions {
            num_cells_initial: default_num_cells_initial(),
            seed: None,
        }
    }
}

impl Default for DivisionConfig {
    fn default() -> Self {
        DivisionConfig {
            uncorrelated_min: default_uncorrelated_min(),
            uncorrelated_max: default_uncorrelated_max(),
            correlated_spread: default_correlated_spread(),
            default_parent_division_time: default_parent_division_time(),
        }
    }
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        StatisticsConfig {
            max_age_slots: default_max_age_slots(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            plot_filename: default_plot_filename(),
            plot_width: default_plot_width(),
            plot_height: default_plot_height(),
            show_progress: default_show_progress(),
        }
    }
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config = Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))?;

        Ok(config)
    }

    /// Loads the configuration if the file exists, otherwise returns the built-in defaults.
    /// The flag reports whether the file was found.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        if path.as_ref().exists() {
            Ok((Self::load(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_conditions.num_cells_initial == 0 {
            anyhow::bail!("num_cells_initial must be greater than 0.");
        }
        if self.timing.total_steps == 0 {
            anyhow::bail!("total_steps must be greater than 0.");
        }
        if self.division.uncorrelated_min > self.division.uncorrelated_max {
            anyhow::bail!(
                "uncorrelated_min ({}) must not exceed uncorrelated_max ({}).",
                self.division.uncorrelated_min,
                self.division.uncorrelated_max
            );
        }
        if self.division.correlated_spread < 0 {
            anyhow::bail!("correlated_spread must not be negative.");
        }
        // A cell observed at step t is at most t steps old.
        if self.statistics.max_age_slots <= self.timing.total_steps as usize {
            anyhow::bail!(
                "max_age_slots ({}) must exceed total_steps ({}).",
                self.statistics.max_age_slots,
                self.timing.total_steps
            );
        }
        if self.output.plot_width == 0 || self.output.plot_height == 0 {
            anyhow::bail!("plot dimensions must be positive.");
        }
        Ok(())
    }

    /// Converts the configuration into the division parameters used at runtime.
    pub fn get_division_params(&self) -> DivisionParams {
        DivisionParams {
            uncorrelated_min: self.division.uncorrelated_min,
            uncorrelated_max: self.division.uncorrelated_max,
            correlated_spread: self.division.correlated_spread,
            default_parent_division_time: self.division.default_parent_division_time,
        }
    }
}

fn default_total_steps() -> u32 {
    36
}

fn default_num_cells_initial() -> u32 {
    5
}

fn default_uncorrelated_min() -> i32 {
    2
}

fn default_uncorrelated_max() -> i32 {
    8
}

fn default_correlated_spread() -> i32 {
    3
}

fn default_parent_division_time() -> i32 {
    5
}

fn default_max_age_slots() -> usize {
    100
}

fn default_plot_filename() -> String {
    "cell_divisions.png".to_string()
}

fn default_plot_width() -> u32 {
    1024
}

fn default_plot_height() -> u32 {
    768
}

fn default_show_progress() -> bool {
    true
}
