//! # EVONOMICS
//!
//! Discrete-time, agent-based evolutionary simulator of resource economies.
//!
//! ## Features
//!
//! - **Genetic**: every organism carries mutating cooperation, economy,
//!   military and libido genes
//! - **Social**: cooperative organisms form groups that share one pool
//! - **Violent**: thieves rob and sometimes kill their victims
//! - **Configurable**: YAML configuration files
//! - **Reproducible**: Seeded random number generation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use evonomics::{World, Config};
//!
//! // Create world with default config
//! let config = Config::default();
//! let mut world = World::new(config);
//!
//! // Run simulation
//! world.run(1000);
//!
//! // Check results
//! println!("Population: {}", world.population());
//! println!("Resources: {:.0}", world.resource_level());
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use evonomics::Config;
//!
//! let mut config = Config::default();
//! config.world.initial_population = 200;
//! config.evolution.mutation_probability = 0.05;
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Ensembles
//!
//! ```rust,no_run
//! use evonomics::{Config, ensemble::run_ensemble};
//!
//! let results = run_ensemble(&Config::default(), &[1, 2, 3, 4], 500);
//! for run in &results {
//!     println!("{}", run.summary());
//! }
//! ```

pub mod analysis;
pub mod behavior;
pub mod config;
pub mod conflict;
pub mod economy;
pub mod ensemble;
pub mod genetics;
pub mod group;
pub mod journal;
pub mod matching;
pub mod organism;
pub mod stats;
pub mod world;

// Re-export main types
pub use config::{Config, ConfigError};
pub use group::{Group, GroupId};
pub use organism::{Organism, OrganismId, TerminationReason};
pub use stats::{GroupStat, OrganismStat, WorldStat};
pub use world::World;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark
pub fn benchmark(periods: u64, population: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.world.initial_population = population;
    config.world.max_population_to_support = population.max(1);
    config.world.initial_resource_level = population as f64 * 80.0;

    let mut world = World::new(config);

    let start = Instant::now();
    world.run(periods);
    let elapsed = start.elapsed();

    BenchmarkResult {
        periods,
        initial_population: population,
        final_population: world.population(),
        elapsed_secs: elapsed.as_secs_f64(),
        periods_per_second: periods as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        groups_formed: world.groups.len(),
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub periods: u64,
    pub initial_population: usize,
    pub final_population: usize,
    pub elapsed_secs: f64,
    pub periods_per_second: f64,
    pub groups_formed: usize,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Periods: {}", self.periods)?;
        writeln!(f, "Population: {} -> {}", self.initial_population, self.final_population)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} periods/s", self.periods_per_second)?;
        writeln!(f, "Groups formed: {}", self.groups_formed)?;
        Ok(())
    }
}
