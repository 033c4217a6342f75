//! World simulation engine - per-period orchestration loop.
//!
//! One period runs strictly in this order: groups take their turn, every
//! organism lives in roster order, the dead are purged, newborns are
//! admitted, then the resource pool is settled and replenished.

use crate::config::Config;
use crate::economy::ResourcePool;
use crate::genetics::Genome;
use crate::group::{Group, GroupId};
use crate::organism::{Organism, OrganismId, TerminationReason};
use crate::stats::{StatsHistory, WorldStat};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// The simulation world
pub struct World {
    // Population
    pub organisms: Vec<Organism>,
    pub groups: Vec<Group>,
    pub dead: Vec<Organism>,
    pub(crate) newborns: Vec<Organism>,

    // Environment
    pub(crate) pool: ResourcePool,

    // State
    pub time: u64,

    // Configuration
    pub config: Config,

    // Statistics
    pub period_stats: Vec<WorldStat>,
    pub stats_history: StatsHistory,
    pub(crate) period_consumption: f64,
    born_last_period: usize,
    died_last_period: usize,

    // ID generation
    next_organism_id: u64,

    // Random number generator (seeded for reproducibility)
    pub(crate) rng: ChaCha8Rng,
    seed: u64,
}

impl World {
    /// Create a new world with the given configuration
    pub fn new(config: Config) -> Self {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Create a new world with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, seed: u64) -> Self {
        let mut world = Self {
            organisms: Vec::with_capacity(config.world.initial_population),
            groups: Vec::new(),
            dead: Vec::new(),
            newborns: Vec::new(),
            pool: ResourcePool::from_config(&config.world),
            time: 0,
            stats_history: StatsHistory::new(config.logging.stats_interval),
            config,
            period_stats: Vec::new(),
            period_consumption: 0.0,
            born_last_period: 0,
            died_last_period: 0,
            next_organism_id: 1,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        };
        world.populate();
        world
    }

    /// Start over from time zero with the same seed, reproducing the run
    pub fn reset(&mut self) {
        self.organisms.clear();
        self.groups.clear();
        self.dead.clear();
        self.newborns.clear();
        self.pool = ResourcePool::from_config(&self.config.world);
        self.time = 0;
        self.period_stats.clear();
        self.stats_history = StatsHistory::new(self.config.logging.stats_interval);
        self.period_consumption = 0.0;
        self.born_last_period = 0;
        self.died_last_period = 0;
        self.next_organism_id = 1;
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.populate();
    }

    /// Fill the roster with randomly assembled founders
    fn populate(&mut self) {
        for _ in 0..self.config.world.initial_population {
            let genome = Genome::founder(&mut self.rng, &self.config.evolution);
            self.spawn(genome);
        }
        log::debug!("Populated world with {} organisms", self.organisms.len());
    }

    /// Add a founder with the given genome to the live roster
    pub fn spawn(&mut self, genome: Genome) -> OrganismId {
        let id = self.next_id();
        let organism = Organism::new(
            id,
            self.time,
            genome,
            &self.config.organisms,
            self.config.logging.journal_level,
        );
        self.organisms.push(organism);
        id
    }

    pub(crate) fn next_id(&mut self) -> OrganismId {
        let id = OrganismId(self.next_organism_id);
        self.next_organism_id += 1;
        id
    }

    /// Run one full period
    pub fn advance_one_period(&mut self) {
        let now = self.time;
        let start_population = self.organisms.len();
        let start_resource_level = self.pool.level();
        self.period_consumption = 0.0;

        for organism in &mut self.organisms {
            organism.begin_period(now);
        }

        // Phase 1: Groups
        for group in &mut self.groups {
            group.live(now);
        }

        // Phase 2: Organisms, in roster order. Newborns are staged so the
        // roster does not grow while it is walked.
        for index in 0..self.organisms.len() {
            self.live_organism(index);
        }
        for organism in &mut self.organisms {
            organism.record_period();
        }

        // Phase 3: Purge the dead
        let (alive, dead): (Vec<Organism>, Vec<Organism>) =
            std::mem::take(&mut self.organisms).into_iter().partition(|o| o.is_alive());
        self.organisms = alive;
        self.died_last_period = dead.len();
        self.dead.extend(dead);

        // Phase 4: Admit newborns
        self.born_last_period = self.newborns.len();
        self.organisms.append(&mut self.newborns);

        // Phase 5: Settle the pool
        let settlement = self.pool.settle(now, &self.config.world);

        // Phase 6: Statistics
        let stat = WorldStat {
            time: now,
            start_population,
            start_resource_level,
            population: self.organisms.len(),
            grouped_population: self.organisms.iter().filter(|o| o.in_group()).count(),
            group_count: self.groups.iter().filter(|g| !g.is_empty()).count(),
            resource_level: settlement.level,
            born: self.born_last_period,
            died: self.died_last_period,
            mean_libido: self.mean_libido(),
            calculated_replenishment: settlement.calculated_replenishment,
            actual_replenishment: settlement.actual_replenishment,
            consumption: self.period_consumption,
            cultivation: settlement.cultivation,
        };
        if stat.born > 0 || stat.died > 0 {
            log::debug!("T:{} born {} died {} population {}", now, stat.born, stat.died, stat.population);
        }
        log::trace!("{}", stat.summary());
        if now % self.stats_history.interval == 0 {
            self.stats_history.record(stat.clone());
        }
        self.period_stats.push(stat);

        self.time += self.config.world.time_increment;
    }

    /// Resources a foraging organism draws from the pool this period
    pub fn period_resource_request(&mut self, request: f64) -> f64 {
        let population = self.organisms.len();
        self.pool
            .forage(&mut self.rng, population, request, self.config.world.luck_variation)
    }

    /// Terminate the organism at `index` and evict it from its group.
    /// An organism that already terminated keeps its first reason.
    pub fn terminate_organism(&mut self, index: usize, reason: TerminationReason) {
        let now = self.time;
        let organism = &mut self.organisms[index];
        organism.terminate(reason, now);
        if let Some(group_id) = organism.group.take() {
            if let Some(group) = self.groups.get_mut(group_id.0 as usize) {
                group.remove(organism.id);
            }
        }
        log::trace!("T:{} {} terminated: {}", now, organism.id, reason);
    }

    /// Organism at `index` together with its group, for pool transfers
    pub(crate) fn organism_and_group(&mut self, index: usize) -> (&mut Organism, Option<&mut Group>) {
        let organism = &mut self.organisms[index];
        let group = match organism.group {
            Some(id) => self.groups.get_mut(id.0 as usize),
            None => None,
        };
        (organism, group)
    }

    /// Available resources of the organism at `index`
    pub fn available_resources(&self, index: usize) -> f64 {
        let organism = &self.organisms[index];
        organism.available_resources(self.group_of(organism))
    }

    pub fn group_of(&self, organism: &Organism) -> Option<&Group> {
        organism.group.and_then(|id| self.group(id))
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0 as usize)
    }

    /// Find a live organism by id
    pub fn find_organism(&self, id: OrganismId) -> Option<&Organism> {
        // Roster stays sorted by id: founders first, newborns appended in order
        self.organisms
            .binary_search_by_key(&id, |o| o.id)
            .ok()
            .map(|index| &self.organisms[index])
    }

    /// Find a dead organism by id
    pub fn find_dead(&self, id: OrganismId) -> Option<&Organism> {
        self.dead.iter().find(|o| o.id == id)
    }

    /// Run simulation for specified number of periods
    pub fn run(&mut self, periods: u64) {
        for _ in 0..periods {
            self.advance_one_period();
        }
    }

    /// Run simulation with callback for progress updates
    pub fn run_with_callback<F>(&mut self, periods: u64, mut callback: F)
    where
        F: FnMut(&World, u64),
    {
        for i in 0..periods {
            self.advance_one_period();
            callback(self, i);
        }
    }

    /// Current time index
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Get current population count
    pub fn population(&self) -> usize {
        self.organisms.len()
    }

    /// Check if population is extinct
    pub fn is_extinct(&self) -> bool {
        self.organisms.is_empty()
    }

    pub fn resource_level(&self) -> f64 {
        self.pool.level()
    }

    pub fn max_resource_level(&self) -> f64 {
        self.pool.ceiling()
    }

    pub fn born_last_period(&self) -> usize {
        self.born_last_period
    }

    pub fn died_last_period(&self) -> usize {
        self.died_last_period
    }

    /// Groups with at least one member
    pub fn live_group_count(&self) -> usize {
        self.groups.iter().filter(|g| !g.is_empty()).count()
    }

    /// Mean libido gene value of the live roster
    pub fn mean_libido(&self) -> f64 {
        if self.organisms.is_empty() {
            return 0.0;
        }
        let total: i32 = self.organisms.iter().map(|o| o.genome.libido()).sum();
        total as f64 / self.organisms.len() as f64
    }

    /// Get seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
