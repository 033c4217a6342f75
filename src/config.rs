//! Configuration system for the simulation.
//!
//! Supports YAML configuration files with sensible defaults.

use crate::genetics::MutationConfig;
use crate::journal::JournalLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub organisms: OrganismConfig,
    #[serde(default)]
    pub mortality: MortalityConfig,
    #[serde(default)]
    pub reproduction: ReproductionConfig,
    #[serde(default)]
    pub conflict: ConflictConfig,
    #[serde(default)]
    pub evolution: EvolutionConfig,
    #[serde(default)]
    pub groups: GroupConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// World/environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of organisms at start
    pub initial_population: usize,
    /// Population the pool is sized for; also sets the vicinity search budget
    pub max_population_to_support: usize,
    /// Resource pool level at start
    pub initial_resource_level: f64,
    /// Resource pool ceiling
    pub max_resource_level: f64,
    /// Time units per period
    pub time_increment: u64,
    /// Mean replenishment per period
    pub replenishment_mean: f64,
    /// Replenishment floor per period
    pub replenishment_minimum: f64,
    /// Period of the long seasonal wave
    pub long_cycle_period: f64,
    /// Period of the short seasonal wave
    pub short_cycle_period: f64,
    /// Symmetric luck applied to foraging yields (0.5 = ±50%)
    pub luck_variation: f64,
}

/// Organism configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganismConfig {
    /// Resources consumed per period
    pub consumption_per_period: f64,
    /// Personal storage capacity
    pub storage_capacity: f64,
    /// Storage level at birth, before any parental transfer
    pub initial_storage_level: f64,
    /// Hard age ceiling (before jitter)
    pub max_age: u64,
    /// Random jitter applied around `max_age`
    pub age_jitter: u64,
    /// Minimum age for migration
    pub maturity_start_migration: u64,
    /// Minimum age for stealing
    pub maturity_start_stealing: u64,
    /// Shortage threshold in periods of consumption
    pub safety_period_count: f64,
}

/// Per-period termination probabilities, in percent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MortalityConfig {
    pub accident_percentage: f64,
    /// Multiplied by the number of shortages experienced so far
    pub shortage_migration_percentage: f64,
    pub voluntary_migration_percentage: f64,
}

/// Asexual reproduction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReproductionConfig {
    /// First fertile age
    pub maturity_start: u64,
    /// Last fertile age
    pub maturity_finish: u64,
    /// Lower the birth rate when resources are scarce
    pub self_adjusting_libido: bool,
    /// Slope of the scarcity modifier
    pub resource_dependency_coef: f64,
}

/// Theft configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictConfig {
    /// Success percentage between equally powerful thief and victim
    pub base_stealing_modifier: f64,
}

/// Evolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Probability of a mutation event per gene per birth
    pub mutation_probability: f64,
    /// Probability that a mutation event is drastic
    pub drastic_mutation_probability: f64,
    /// Founder probabilities for Worker, Survivor, Thief (Fungal takes the rest)
    pub economy_weights: [f64; 3],
    /// Founder probabilities for NonMilitant, Passive, Proactive (Offender takes the rest)
    pub military_weights: [f64; 3],
    /// Founder libido value (0-10)
    pub default_libido: i32,
}

/// Group configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Throttle recruitment as groups approach their population limit
    pub population_limits_enabled: bool,
    /// Limit for groups whose economy score is below 2.5
    pub worker_population_limit: usize,
    /// Limit for thief-leaning groups
    pub thief_population_limit: usize,
    /// Let grouped organisms search for recruits too
    pub members_recruit: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Periods between summary lines
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Which life events organisms keep in their journal
    pub journal_level: JournalLevel,
}

impl Default for WorldConfig {
    fn default() -> Self {
        let max_population_to_support = 1000;
        Self {
            initial_population: 1000,
            max_population_to_support,
            initial_resource_level: max_population_to_support as f64 * 80.0,
            max_resource_level: f64::MAX,
            time_increment: 1,
            replenishment_mean: 1000.0,
            replenishment_minimum: 100.0,
            long_cycle_period: 36.0,
            short_cycle_period: 13.0,
            luck_variation: 0.5,
        }
    }
}

impl Default for OrganismConfig {
    fn default() -> Self {
        Self {
            consumption_per_period: 1.0,
            storage_capacity: 5.0,
            initial_storage_level: 1.0,
            max_age: 80,
            age_jitter: 10,
            maturity_start_migration: 12,
            maturity_start_stealing: 10,
            safety_period_count: 4.0,
        }
    }
}

impl Default for MortalityConfig {
    fn default() -> Self {
        Self {
            accident_percentage: 0.02,
            shortage_migration_percentage: 10.0,
            voluntary_migration_percentage: 0.1,
        }
    }
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            maturity_start: 15,
            maturity_finish: 65,
            self_adjusting_libido: true,
            resource_dependency_coef: 0.7,
        }
    }
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            base_stealing_modifier: 30.0,
        }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_probability: 0.1,
            drastic_mutation_probability: 0.1,
            economy_weights: [0.3, 0.3, 0.3],
            military_weights: [0.3, 0.3, 0.3],
            default_libido: 5,
        }
    }
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            population_limits_enabled: true,
            worker_population_limit: 500,
            thief_population_limit: 10,
            members_recruit: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 10,
            log_level: "info".to_string(),
            journal_level: JournalLevel::Important,
        }
    }
}

impl WorldConfig {
    /// Random draws per vicinity search
    pub fn search_draws(&self) -> usize {
        (self.max_population_to_support / 10).max(1)
    }
}

impl EvolutionConfig {
    pub fn mutation_config(&self) -> MutationConfig {
        MutationConfig {
            mutation_probability: self.mutation_probability,
            drastic_probability: self.drastic_mutation_probability,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.world.initial_population == 0 {
            return invalid("initial_population must be > 0");
        }
        if self.world.max_population_to_support == 0 {
            return invalid("max_population_to_support must be > 0");
        }
        if self.world.time_increment == 0 {
            return invalid("time_increment must be > 0");
        }
        if !(self.world.max_resource_level >= 0.0) {
            return invalid("max_resource_level must be >= 0");
        }
        if !(self.world.initial_resource_level >= 0.0) {
            return invalid("initial_resource_level must be >= 0");
        }
        if self.world.long_cycle_period <= 0.0 || self.world.short_cycle_period <= 0.0 {
            return invalid("replenishment cycle periods must be > 0");
        }
        if self.world.replenishment_mean < 0.0 || self.world.replenishment_minimum < 0.0 {
            return invalid("replenishment amounts must be >= 0");
        }
        if !(0.0..=1.0).contains(&self.world.luck_variation) {
            return invalid("luck_variation must be between 0 and 1");
        }
        if self.organisms.consumption_per_period <= 0.0 {
            return invalid("consumption_per_period must be > 0");
        }
        if self.organisms.storage_capacity < 0.0 || self.organisms.initial_storage_level < 0.0 {
            return invalid("storage values must be >= 0");
        }
        if self.reproduction.maturity_start > self.reproduction.maturity_finish {
            return invalid("maturity_start cannot exceed maturity_finish");
        }
        let probabilities = [
            self.evolution.mutation_probability,
            self.evolution.drastic_mutation_probability,
        ];
        if probabilities.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return invalid("mutation probabilities must be between 0 and 1");
        }
        for weights in [&self.evolution.economy_weights, &self.evolution.military_weights] {
            if weights.iter().any(|w| *w < 0.0) || weights.iter().sum::<f64>() > 1.0 + 1e-9 {
                return invalid("founder weights must be >= 0 and sum to at most 1");
            }
        }
        if !(0..=10).contains(&self.evolution.default_libido) {
            return invalid("default_libido must be between 0 and 10");
        }
        if self.groups.worker_population_limit == 0 || self.groups.thief_population_limit == 0 {
            return invalid("group population limits must be > 0");
        }
        if self.logging.stats_interval == 0 {
            return invalid("stats_interval must be > 0");
        }
        Ok(())
    }
}

/// Errors that can occur while loading or saving configuration and stats
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Yaml(e) => write!(f, "YAML error: {}", e),
            Self::Json(e) => write!(f, "JSON error: {}", e),
            Self::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.search_draws(), 100);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.world.initial_population, loaded.world.initial_population);
        assert_eq!(config.world.max_resource_level, loaded.world.max_resource_level);
        assert_eq!(config.logging.journal_level, loaded.logging.journal_level);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "world:\n  initial_population: 12\norganisms:\n  storage_capacity: 10.0\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.world.initial_population, 12);
        assert_eq!(config.world.max_population_to_support, 1000);
        assert_eq!(config.organisms.storage_capacity, 10.0);
        assert_eq!(config.organisms.consumption_per_period, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let mut config = Config::default();
        config.reproduction.maturity_start = 70;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.evolution.economy_weights = [0.5, 0.5, 0.5];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.world.initial_population = 0;
        assert!(config.validate().is_err());
    }
}
