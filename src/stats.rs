//! Statistics snapshots for the simulation.
//!
//! The world records one [`WorldStat`] per period, every organism records one
//! [`OrganismStat`] per period it lives, and every non-empty group records a
//! [`GroupStat`] when groups take their turn. These are plain records meant
//! to be read (and serialized) by whatever reports on or stores a run.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World-level snapshot for one period
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldStat {
    /// Time index the period ran at
    pub time: u64,
    /// Live organisms when the period began
    pub start_population: usize,
    /// Pool level when the period began
    pub start_resource_level: f64,
    /// Live organisms at period end, after the dead were purged and
    /// newborns admitted
    pub population: usize,
    /// Organisms living in a group
    pub grouped_population: usize,
    /// Groups with at least one member
    pub group_count: usize,
    /// Pool level after settlement
    pub resource_level: f64,
    /// Newborns admitted this period
    pub born: usize,
    /// Organisms purged this period
    pub died: usize,
    /// Mean libido gene value of the living
    pub mean_libido: f64,
    /// Seasonal replenishment before the minimum floor
    pub calculated_replenishment: f64,
    /// Amount actually added to the pool
    pub actual_replenishment: f64,
    /// Sum of organism consumption this period
    pub consumption: f64,
    /// Sum of foraging draws against the pool this period
    pub cultivation: f64,
}

impl WorldStat {
    /// Format as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "T:{:6} | Pop:{:5} | Grp:{:4} ({:5}) | Born:{:4} | Died:{:4} | Pool:{:.0} | Cult:{:.0} | Repl:{:.0} | Lib:{:.2}",
            self.time,
            self.population,
            self.group_count,
            self.grouped_population,
            self.born,
            self.died,
            self.resource_level,
            self.cultivation,
            self.actual_replenishment,
            self.mean_libido,
        )
    }
}

/// Organism-level snapshot for one period
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganismStat {
    pub time: u64,
    /// Personal storage when the period began
    pub start_level: f64,
    /// Personal storage when the period ended
    pub end_level: f64,
    /// Amount consumed from personal storage and group
    pub consumption: f64,
    /// Amount drawn from the world pool by foraging
    pub cultivation: f64,
    /// Amount taken from victims
    pub food_stolen: f64,
    /// Amount taken by thieves from this organism
    pub food_lost: f64,
    /// Surplus routed into the group pool
    pub food_to_group: f64,
    /// Consumption covered by the group pool
    pub food_from_group: f64,
}

impl OrganismStat {
    pub fn begin(time: u64, start_level: f64) -> Self {
        Self {
            time,
            start_level,
            ..Default::default()
        }
    }
}

/// Group-level snapshot for one period
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStat {
    pub time: u64,
    pub population: usize,
    pub storage_level: f64,
    pub storage_capacity: f64,
    pub economy_score: f64,
    pub military_score: f64,
}

/// Historical statistics tracker
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// Recorded world snapshots
    pub snapshots: Vec<WorldStat>,
    /// Recording interval in periods
    pub interval: u64,
}

impl StatsHistory {
    /// Create new history with recording interval
    pub fn new(interval: u64) -> Self {
        Self {
            snapshots: Vec::new(),
            interval: interval.max(1),
        }
    }

    /// Record a snapshot
    pub fn record(&mut self, stat: WorldStat) {
        self.snapshots.push(stat);
    }

    pub fn population_series(&self) -> Vec<(u64, usize)> {
        self.snapshots.iter().map(|s| (s.time, s.population)).collect()
    }

    pub fn resource_series(&self) -> Vec<(u64, f64)> {
        self.snapshots.iter().map(|s| (s.time, s.resource_level)).collect()
    }

    pub fn group_series(&self) -> Vec<(u64, usize)> {
        self.snapshots.iter().map(|s| (s.time, s.group_count)).collect()
    }

    pub fn total_born(&self) -> usize {
        self.snapshots.iter().map(|s| s.born).sum()
    }

    pub fn total_died(&self) -> usize {
        self.snapshots.iter().map(|s| s.died).sum()
    }

    /// Save history as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load history from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
