//! Independent runs across seeds.
//!
//! Each world is still advanced single-threaded; only whole runs are spread
//! over the rayon pool.

use crate::config::Config;
use crate::world::World;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome of one run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    /// Periods actually run; fewer than requested on extinction
    pub periods_run: u64,
    pub final_population: usize,
    pub final_resource_level: f64,
    pub total_born: usize,
    pub total_died: usize,
    pub groups_formed: usize,
}

impl RunSummary {
    /// Format as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "Seed:{:20} | Periods:{:6} | Pop:{:5} | Born:{:6} | Died:{:6} | Groups:{:5} | Pool:{:.0}",
            self.seed,
            self.periods_run,
            self.final_population,
            self.total_born,
            self.total_died,
            self.groups_formed,
            self.final_resource_level
        )
    }
}

/// Run one world to completion or extinction
pub fn run_single(config: Config, seed: u64, periods: u64) -> RunSummary {
    let mut world = World::new_with_seed(config, seed);
    let mut periods_run = 0;

    while periods_run < periods && !world.is_extinct() {
        world.advance_one_period();
        periods_run += 1;
    }

    RunSummary {
        seed,
        periods_run,
        final_population: world.population(),
        final_resource_level: world.resource_level(),
        total_born: world.period_stats.iter().map(|s| s.born).sum(),
        total_died: world.period_stats.iter().map(|s| s.died).sum(),
        groups_formed: world.groups.len(),
    }
}

/// Run one world per seed in parallel. Results keep the order of `seeds`.
pub fn run_ensemble(config: &Config, seeds: &[u64], periods: u64) -> Vec<RunSummary> {
    seeds
        .par_iter()
        .map(|&seed| {
            let summary = run_single(config.clone(), seed, periods);
            log::debug!("{}", summary.summary());
            summary
        })
        .collect()
}
