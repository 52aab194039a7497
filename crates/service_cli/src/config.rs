//! Scenario configuration
//!
//! A scenario is a TOML file holding the transport network and the asset
//! universe the commands report on. When no file is given and `optim.toml`
//! is absent from the working directory, the built-in waste-disposal and
//! four-asset scenario is used.

use optim_core::math::DenseMatrix;
use optim_models::frontier::{Asset, AssetUniverse};
use optim_models::transport::{ArcPolicy, TransportConfig, TransshipmentNetwork};
use optim_models::ModelError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::{CliError, Result};

/// Scenario file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "optim.toml";

/// Environment variable overriding the scenario log level.
pub const LOG_LEVEL_ENV: &str = "OPTIM_LOG_LEVEL";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}

/// Log levels accepted in the scenario file and `OPTIM_LOG_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> std::result::Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// Whole scenario: logging plus one transport and one frontier problem.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Transport network
    pub transport: TransportScenario,
    /// Asset universe and sweep range
    pub frontier: FrontierScenario,
    /// File the scenario was read from; `None` for the built-in scenario
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            transport: TransportScenario::builtin(),
            frontier: FrontierScenario::builtin(),
            source: None,
        }
    }
}

impl ScenarioConfig {
    /// Parse a scenario from TOML text.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, ConfigError> {
        let config: ScenarioConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a scenario from a TOML file
    pub fn from_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        let mut config = Self::from_toml_str(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply environment overrides.
    pub fn apply_env(&mut self) -> std::result::Result<(), ConfigError> {
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        Ok(())
    }

    /// Shape checks that do not need a solve.
    ///
    /// Numeric validity (costs, covariance) is left to the models, which
    /// report it as ill-conditioned input.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let t = &self.transport;
        if t.plants.len() != t.supply.len() {
            return Err(ConfigError::InvalidScenario(format!(
                "{} plant names for {} supplies",
                t.plants.len(),
                t.supply.len()
            )));
        }
        if t.sites.len() != t.capacity.len() {
            return Err(ConfigError::InvalidScenario(format!(
                "{} site names for {} capacities",
                t.sites.len(),
                t.capacity.len()
            )));
        }
        let f = &self.frontier;
        if f.expected_returns.is_empty() {
            return Err(ConfigError::InvalidScenario(
                "frontier.expected_returns is empty".to_string(),
            ));
        }
        if !f.assets.is_empty() && f.assets.len() != f.expected_returns.len() {
            return Err(ConfigError::InvalidScenario(format!(
                "{} asset names for {} expected returns",
                f.assets.len(),
                f.expected_returns.len()
            )));
        }
        if f.points == 0 {
            return Err(ConfigError::InvalidScenario(
                "frontier.points must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load the scenario for this run.
///
/// Priority (highest to lowest):
/// 1. `path`, which must exist
/// 2. `optim.toml` in the working directory
/// 3. The built-in scenario
///
/// `OPTIM_LOG_LEVEL` overrides the log level of whichever was chosen.
pub fn load_scenario(path: Option<&Path>) -> Result<ScenarioConfig> {
    let mut config = match path {
        Some(path) if !path.exists() => {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        Some(path) => ScenarioConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            ScenarioConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => ScenarioConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}

fn matrix(rows: &[Vec<f64>]) -> std::result::Result<DenseMatrix<f64>, ModelError> {
    DenseMatrix::from_rows(rows.to_vec()).map_err(ModelError::from)
}

/// Transport network section.
///
/// Cost tables use `inf` for arcs that cannot be used. Omitted relay
/// tables leave every arc of that kind disallowed and omitted dummy costs
/// are zero. A scenario without a `[transport]` section uses [`Self::builtin`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransportScenario {
    /// Plant names
    #[serde(default)]
    pub plants: Vec<String>,
    /// Disposal site names
    #[serde(default)]
    pub sites: Vec<String>,
    /// Waste produced per plant
    #[serde(default)]
    pub supply: Vec<f64>,
    /// Capacity per site
    #[serde(default)]
    pub capacity: Vec<f64>,
    /// Plant → site costs
    #[serde(default)]
    pub direct_costs: Vec<Vec<f64>>,
    /// Plant → plant costs
    pub plant_costs: Option<Vec<Vec<f64>>>,
    /// Site → site costs
    pub site_costs: Option<Vec<Vec<f64>>>,
    /// Dummy → site costs
    pub dummy_costs: Option<Vec<f64>>,
    /// Price disallowed arcs at this cost instead of excluding them
    pub sentinel_cost: Option<f64>,
}

impl TransportScenario {
    /// Plant → site cost table.
    pub fn direct_cost_matrix(&self) -> std::result::Result<DenseMatrix<f64>, ModelError> {
        matrix(&self.direct_costs)
    }

    /// Full transshipment network.
    pub fn network(&self) -> std::result::Result<TransshipmentNetwork, ModelError> {
        let mut network = TransshipmentNetwork::new(
            self.plants.clone(),
            self.sites.clone(),
            self.supply.clone(),
            self.capacity.clone(),
        )
        .with_direct_costs(self.direct_cost_matrix()?);
        if let Some(costs) = &self.plant_costs {
            network = network.with_plant_costs(matrix(costs)?);
        }
        if let Some(costs) = &self.site_costs {
            network = network.with_site_costs(matrix(costs)?);
        }
        if let Some(costs) = &self.dummy_costs {
            network = network.with_dummy_costs(costs.clone());
        }
        Ok(network)
    }

    /// Solver configuration implied by `sentinel_cost`.
    pub fn solver_config(&self) -> TransportConfig {
        let policy = match self.sentinel_cost {
            Some(cost) => ArcPolicy::Sentinel(cost),
            None => ArcPolicy::Exclude,
        };
        TransportConfig::new().with_arc_policy(policy)
    }
}

impl TransportScenario {
    /// Built-in six-plant, three-site waste-disposal network.
    pub fn builtin() -> Self {
        const INF: f64 = f64::INFINITY;
        Self {
            plants: (1..=6).map(|i| format!("Plant {}", i)).collect(),
            sites: ["Site A", "Site B", "Site C"].map(String::from).to_vec(),
            supply: vec![45.0, 26.0, 42.0, 53.0, 29.0, 38.0],
            capacity: vec![65.0, 80.0, 105.0],
            direct_costs: vec![
                vec![13.0, 16.0, 18.0],
                vec![11.0, 13.0, 16.0],
                vec![19.0, 14.0, 13.0],
                vec![8.0, 19.0, 13.0],
                vec![18.0, 13.0, 20.0],
                vec![15.0, 16.0, 13.0],
            ],
            plant_costs: Some(vec![
                vec![0.0, 3.0, INF, 5.0, INF, 4.0],
                vec![3.0, 0.0, 2.0, INF, 4.0, INF],
                vec![INF, 2.0, 0.0, INF, INF, 6.0],
                vec![5.0, INF, INF, 0.0, 3.0, INF],
                vec![INF, 4.0, INF, 3.0, 0.0, 2.0],
                vec![4.0, INF, 6.0, INF, 2.0, 0.0],
            ]),
            site_costs: Some(vec![
                vec![0.0, 4.0, 7.0],
                vec![4.0, 0.0, 3.0],
                vec![7.0, 3.0, 0.0],
            ]),
            dummy_costs: Some(vec![0.0; 3]),
            sentinel_cost: None,
        }
    }
}

/// Frontier section; [`Self::builtin`] when the file has none.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FrontierScenario {
    /// Asset names; generated when empty
    #[serde(default)]
    pub assets: Vec<String>,
    /// Expected return per asset
    #[serde(default)]
    pub expected_returns: Vec<f64>,
    /// Covariance of returns
    #[serde(default)]
    pub covariance: Vec<Vec<f64>>,
    /// Lowest target (defaults to the smallest expected return)
    pub low: Option<f64>,
    /// Highest target (defaults to the largest expected return)
    pub high: Option<f64>,
    /// Number of evenly spaced targets
    #[serde(default = "default_points")]
    pub points: usize,
}

fn default_points() -> usize {
    15
}

impl FrontierScenario {
    /// Validated asset universe.
    pub fn universe(&self) -> std::result::Result<AssetUniverse, ModelError> {
        let covariance = matrix(&self.covariance)?;
        if self.assets.is_empty() {
            return AssetUniverse::from_returns(self.expected_returns.clone(), covariance);
        }
        if self.assets.len() != self.expected_returns.len() {
            return Err(ModelError::ill_conditioned(format!(
                "{} asset names for {} expected returns",
                self.assets.len(),
                self.expected_returns.len()
            )));
        }
        let assets = self
            .assets
            .iter()
            .zip(&self.expected_returns)
            .map(|(name, &r)| Asset::new(name.clone(), r))
            .collect();
        AssetUniverse::new(assets, covariance)
    }
}

impl FrontierScenario {
    /// Built-in four-asset universe.
    pub fn builtin() -> Self {
        Self {
            assets: ["Bonds", "Credit", "Equity", "Cash Plus"]
                .map(String::from)
                .to_vec(),
            expected_returns: vec![0.08, 0.12, 0.15, 0.06],
            covariance: vec![
                vec![0.040, 0.006, 0.010, 0.002],
                vec![0.006, 0.090, 0.018, 0.004],
                vec![0.010, 0.018, 0.160, 0.003],
                vec![0.002, 0.004, 0.003, 0.020],
            ],
            low: None,
            high: None,
            points: default_points(),
        }
    }
}
