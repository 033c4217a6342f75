//! Organism structure and resource accounting.
//!
//! An organism only ever touches its own fields and, when grouped, the pool
//! of the group it belongs to. Everything that needs the rest of the
//! population (matching, theft, foraging) lives on the world.

use crate::config::{MortalityConfig, OrganismConfig, ReproductionConfig};
use crate::genetics::{CooperationGene, EconomyGene, Genome, MilitaryGene, MutationConfig};
use crate::group::{Group, GroupId};
use crate::journal::{Journal, JournalLevel, LifeEvent, LogEntry};
use crate::stats::OrganismStat;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique organism identifier, scoped to one world
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrganismId(pub u64);

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cause of termination
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TerminationReason {
    Age,
    Accident,
    MigrationShortage,
    MigrationVoluntary,
    Starvation,
    Killed,
}

impl TerminationReason {
    pub const ALL: [TerminationReason; 6] = [
        TerminationReason::Age,
        TerminationReason::Accident,
        TerminationReason::MigrationShortage,
        TerminationReason::MigrationVoluntary,
        TerminationReason::Starvation,
        TerminationReason::Killed,
    ];
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminationReason::Age => "Age",
            TerminationReason::Accident => "Accident",
            TerminationReason::MigrationShortage => "Migration (shortage)",
            TerminationReason::MigrationVoluntary => "Migration (voluntary)",
            TerminationReason::Starvation => "Starvation",
            TerminationReason::Killed => "Killed",
        };
        f.write_str(name)
    }
}

/// What happened when an organism ate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Consumption {
    /// Total eaten this period
    pub consumed: f64,
    /// Part of `consumed` that came from the group pool
    pub from_group: f64,
    /// The organism starved to death
    pub starved: bool,
}

/// An organism in the simulation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Organism {
    // Identity
    pub id: OrganismId,
    pub parent_id: Option<OrganismId>,
    pub birth_time: u64,

    // Death record
    pub death_time: Option<u64>,
    pub final_age: Option<u64>,
    pub termination: Option<TerminationReason>,

    // Resources
    pub storage_level: f64,
    pub storage_capacity: f64,
    pub consumption_per_period: f64,
    pub starvation: f64,
    pub shortages_experienced: u32,

    pub military_power: f64,

    /// Group this organism belongs to, if any
    pub group: Option<GroupId>,

    pub genome: Genome,

    // Records
    pub period_stats: Vec<OrganismStat>,
    pub current_stat: OrganismStat,
    pub journal: Journal,
}

impl Organism {
    /// Create a member of the initial population
    pub fn new(
        id: OrganismId,
        birth_time: u64,
        genome: Genome,
        config: &OrganismConfig,
        journal_level: JournalLevel,
    ) -> Self {
        let mut organism = Self {
            id,
            parent_id: None,
            birth_time,
            death_time: None,
            final_age: None,
            termination: None,
            storage_level: config.initial_storage_level,
            storage_capacity: config.storage_capacity,
            consumption_per_period: config.consumption_per_period,
            starvation: 0.0,
            shortages_experienced: 0,
            military_power: 0.0,
            group: None,
            genome,
            period_stats: Vec::new(),
            current_stat: OrganismStat::begin(birth_time, config.initial_storage_level),
            journal: Journal::new(journal_level),
        };
        organism.note(birth_time, LifeEvent::Born, None);
        organism
    }

    /// Age at time `now`
    #[inline]
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.birth_time)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.termination.is_none()
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.termination.is_some()
    }

    #[inline]
    pub fn in_group(&self) -> bool {
        self.group.is_some()
    }

    pub fn cooperation(&self) -> Option<CooperationGene> {
        self.genome.cooperation()
    }

    pub fn is_cooperative(&self) -> bool {
        self.cooperation() == Some(CooperationGene::Cooperative)
    }

    pub fn economy(&self) -> Option<EconomyGene> {
        self.genome.economy()
    }

    pub fn military(&self) -> Option<MilitaryGene> {
        self.genome.military()
    }

    /// Highest personal storage level: capacity plus one period's consumption
    #[inline]
    pub fn storage_ceiling(&self) -> f64 {
        self.storage_capacity + self.consumption_per_period
    }

    /// Holds at least one period's consumption in personal storage
    #[inline]
    pub fn has_reserve(&self) -> bool {
        self.storage_level >= self.consumption_per_period
    }

    /// Group share when grouped, else personal storage
    pub fn available_resources(&self, group: Option<&Group>) -> f64 {
        match (self.group, group) {
            (Some(_), Some(group)) => group.resource_share(),
            _ => self.storage_level,
        }
    }

    /// Most this organism can take in from the world this period
    pub fn request_ceiling(&self, group: Option<&Group>) -> f64 {
        let personal = (self.storage_capacity - self.storage_level).max(0.0);
        let shared = match (self.group, group) {
            (Some(_), Some(group)) => group.available_capacity(),
            _ => 0.0,
        };
        personal + shared + self.consumption_per_period
    }

    /// Personal storage is filled first, up to its ceiling; the surplus goes
    /// to the group pool if grouped. Returns the amount routed to the group.
    pub fn increase_resources(&mut self, amount: f64, group: Option<&mut Group>) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let room = (self.storage_ceiling() - self.storage_level).max(0.0);
        let personal = amount.min(room);
        self.storage_level = (self.storage_level + personal).min(self.storage_ceiling());

        let surplus = amount - personal;
        match group {
            Some(group) if self.group.is_some() && surplus > 0.0 => {
                let given = group.increase_resources(surplus);
                if given > 0.0 {
                    self.current_stat.food_to_group += given;
                    self.note(self.current_stat.time, LifeEvent::GaveResources, Some(given));
                }
                given
            }
            _ => 0.0,
        }
    }

    /// Remove up to `amount` from personal storage. Returns what was removed.
    pub fn decrease_storage_level(&mut self, amount: f64) -> f64 {
        let removed = amount.clamp(0.0, self.storage_level);
        self.storage_level -= removed;
        removed
    }

    /// Eat one period's worth, personal storage first and the group pool
    /// (up to this organism's share) second. A shortfall adds to starvation;
    /// once starvation exceeds one period's consumption the organism dies.
    pub fn consume(&mut self, now: u64, group: Option<&mut Group>) -> Consumption {
        let need = self.consumption_per_period;
        let personal = self.decrease_storage_level(need);

        let from_group = match group {
            Some(group) if self.group.is_some() && personal < need => {
                let share = group.resource_share();
                group.decrease_resources((need - personal).min(share))
            }
            _ => 0.0,
        };

        let consumed = personal + from_group;
        self.current_stat.consumption = consumed;
        self.current_stat.food_from_group += from_group;
        if from_group > 0.0 {
            self.note(now, LifeEvent::ReceivedResources, Some(from_group));
        }
        self.note(now, LifeEvent::Consumed, Some(consumed));

        let mut starved = false;
        if consumed < need {
            self.starvation += need - consumed;
            if self.starvation > need {
                self.terminate(TerminationReason::Starvation, now);
                starved = true;
            }
        } else {
            self.starvation = 0.0;
        }

        Consumption {
            consumed,
            from_group,
            starved,
        }
    }

    /// Decide whether this organism dies or leaves this period.
    ///
    /// Causes are tried in order and the first one that fires wins. A
    /// resource shortage is counted whenever it is observed, even if the
    /// organism stays.
    pub fn check_termination<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        now: u64,
        available: f64,
        config: &OrganismConfig,
        mortality: &MortalityConfig,
    ) -> Option<TerminationReason> {
        let age = self.age(now);

        // Lifespan varies by -jitter..jitter-1 around max_age
        let jitter = config.age_jitter;
        let draw = if jitter == 0 { 0 } else { rng.gen_range(0..2 * jitter) };
        if age + jitter > config.max_age + draw {
            return Some(TerminationReason::Age);
        }

        if 100.0 * rng.gen::<f64>() < mortality.accident_percentage {
            return Some(TerminationReason::Accident);
        }

        let migration_age = age >= config.maturity_start_migration;
        if available < config.safety_period_count * self.consumption_per_period {
            self.shortages_experienced += 1;
            let chance = mortality.shortage_migration_percentage * self.shortages_experienced as f64;
            if migration_age && 100.0 * rng.gen::<f64>() < chance {
                return Some(TerminationReason::MigrationShortage);
            }
        }

        if migration_age && 100.0 * rng.gen::<f64>() < mortality.voluntary_migration_percentage {
            return Some(TerminationReason::MigrationVoluntary);
        }

        None
    }

    /// Per-period birth probability in `[0, 1]`
    pub fn procreation_probability(
        &self,
        now: u64,
        available: f64,
        config: &ReproductionConfig,
    ) -> f64 {
        let age = self.age(now);
        if age < config.maturity_start || age > config.maturity_finish {
            return 0.0;
        }

        let rate = self.genome.libido() as f64 / 100.0;
        let modifier = if config.self_adjusting_libido {
            let deficit = self.storage_capacity / 2.0 - available;
            (1.0 - deficit * config.resource_dependency_coef).clamp(0.0, 1.0)
        } else {
            1.0
        };
        (rate * modifier).clamp(0.0, 1.0)
    }

    pub fn wants_to_procreate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: u64,
        available: f64,
        config: &ReproductionConfig,
    ) -> bool {
        let probability = self.procreation_probability(now, available, config);
        probability > 0.0 && rng.gen::<f64>() < probability
    }

    /// Asexual birth: the child gets a mutated copy of every gene and half
    /// of the parent's current storage on top of the initial level. The
    /// child carries the parent's group id; the caller adds it to the roster.
    pub fn give_birth<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        child_id: OrganismId,
        now: u64,
        mutation: &MutationConfig,
        config: &OrganismConfig,
    ) -> Organism {
        let transferred = self.storage_level / 2.0;
        self.storage_level -= transferred;

        let genome = self.genome.inherit(rng, mutation);
        let mut child = Organism::new(child_id, now, genome, config, self.journal.level());
        child.parent_id = Some(self.id);
        child.group = self.group;
        child.storage_level = config.initial_storage_level + transferred;
        child.current_stat = OrganismStat::begin(now, child.storage_level);

        self.note(now, LifeEvent::GaveBirth, Some(transferred));
        child
    }

    /// Gain military power for this period, if the posture trains at this age.
    /// Returns the power gained.
    pub fn train(&mut self, now: u64) -> f64 {
        let Some(profile) = self.military().map(|m| m.profile()) else {
            return 0.0;
        };
        match profile.training_min_age {
            Some(min_age) if self.age(now) >= min_age => {
                self.military_power += profile.training_increment;
                self.note(now, LifeEvent::Trained, Some(self.military_power));
                profile.training_increment
            }
            _ => 0.0,
        }
    }

    /// Mark as terminated. The caller is responsible for leaving the group.
    pub fn terminate(&mut self, reason: TerminationReason, now: u64) {
        if self.is_terminated() {
            return;
        }
        self.termination = Some(reason);
        self.death_time = Some(now);
        self.final_age = Some(self.age(now));
        self.note(now, LifeEvent::Terminated(reason), None);
    }

    /// Start this period's stat record
    pub fn begin_period(&mut self, now: u64) {
        self.current_stat = OrganismStat::begin(now, self.storage_level);
    }

    /// Close and keep this period's stat record
    pub fn record_period(&mut self) {
        self.current_stat.end_level = self.storage_level;
        self.period_stats.push(self.current_stat.clone());
    }

    /// Append to the journal, subject to its level
    pub fn note(&mut self, time: u64, event: LifeEvent, quantity: Option<f64>) {
        if !self.journal.accepts(&event) {
            return;
        }
        self.journal.push(LogEntry {
            time,
            event,
            quantity,
            storage: self.storage_level,
            starvation: self.starvation,
            shortages: self.shortages_experienced,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::group::GroupMember;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn worker(config: &Config) -> Organism {
        let genome = Genome::with_traits(
            CooperationGene::Cooperative,
            EconomyGene::Worker,
            MilitaryGene::NonMilitant,
            5,
        );
        Organism::new(OrganismId(1), 0, genome, &config.organisms, JournalLevel::All)
    }

    #[test]
    fn test_organism_creation() {
        let config = Config::default();
        let org = worker(&config);

        assert!(org.is_alive());
        assert!(!org.in_group());
        assert_eq!(org.storage_level, config.organisms.initial_storage_level);
        assert_eq!(org.age(25), 25);
        assert_eq!(org.journal.entries()[0].event, LifeEvent::Born);
    }

    #[test]
    fn test_storage_never_exceeds_ceiling() {
        let config = Config::default();
        let mut org = worker(&config);

        for amount in [0.5, 3.0, 10.0, 100.0] {
            let to_group = org.increase_resources(amount, None);
            assert_eq!(to_group, 0.0);
            assert!(org.storage_level <= org.storage_capacity + org.consumption_per_period);
        }
        assert_eq!(org.storage_level, org.storage_ceiling());
    }

    #[test]
    fn test_surplus_goes_to_group() {
        let config = Config::default();
        let mut org = worker(&config);
        let mut other = worker(&config);
        other.id = OrganismId(2);

        let mut group = Group::found(
            GroupId(0),
            0,
            GroupMember::of(&org),
            org.storage_level,
            GroupMember::of(&other),
            other.storage_level,
        );
        org.group = Some(GroupId(0));
        let level_before = group.storage_level();

        // Room for 5 personally (ceiling 6, level 1), 3 left over
        let to_group = org.increase_resources(8.0, Some(&mut group));
        assert_eq!(org.storage_level, 6.0);
        assert_eq!(to_group, 3.0);
        assert_eq!(group.storage_level(), (level_before + 3.0).min(group.storage_capacity()));
        assert_eq!(org.journal.last().map(|e| e.event), Some(LifeEvent::GaveResources));
    }

    #[test]
    fn test_starvation_terminates_after_threshold() {
        let config = Config::default();
        let mut org = worker(&config);
        org.storage_level = 0.0;

        let first = org.consume(1, None);
        assert_eq!(first.consumed, 0.0);
        assert!(!first.starved);
        assert!(org.is_alive());

        let second = org.consume(2, None);
        assert!(second.starved);
        assert_eq!(org.termination, Some(TerminationReason::Starvation));
        assert_eq!(org.death_time, Some(2));
    }

    #[test]
    fn test_full_meal_resets_starvation() {
        let config = Config::default();
        let mut org = worker(&config);
        org.storage_level = 0.5;

        org.consume(1, None);
        assert_eq!(org.starvation, 0.5);

        org.storage_level = 2.0;
        let meal = org.consume(2, None);
        assert_eq!(meal.consumed, 1.0);
        assert_eq!(org.starvation, 0.0);
        assert_eq!(org.storage_level, 1.0);
    }

    #[test]
    fn test_age_termination() {
        let config = Config::default();
        let mut org = worker(&config);
        // StepRng(0, 0): every integer draw is the low end, every float 0.0
        let mut rng = StepRng::new(0, 0);

        // age 71 + 10 > 80 + 0 with zero jitter draw
        let reason = org.check_termination(&mut rng, 71, 10.0, &config.organisms, &config.mortality);
        assert_eq!(reason, Some(TerminationReason::Age));
    }

    #[test]
    fn test_lifespan_jitter_upper_bound() {
        let config = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut mortality = config.mortality.clone();
        mortality.accident_percentage = 0.0;
        mortality.voluntary_migration_percentage = 0.0;

        // 90 + 10 > 80 + 19, the largest draw
        for _ in 0..2000 {
            let mut org = worker(&config);
            let reason = org.check_termination(&mut rng, 90, 10.0, &config.organisms, &mortality);
            assert_eq!(reason, Some(TerminationReason::Age));
        }

        // 89 survives the largest draw, so some organisms live on
        let survivors = (0..2000)
            .filter(|_| {
                let mut org = worker(&config);
                org.check_termination(&mut rng, 89, 10.0, &config.organisms, &mortality)
                    .is_none()
            })
            .count();
        assert!(survivors > 0);
        assert!(survivors < 500);
    }

    #[test]
    fn test_zero_jitter_uses_exact_max_age() {
        let mut config = Config::default();
        config.organisms.age_jitter = 0;
        let mut mortality = config.mortality.clone();
        mortality.accident_percentage = 0.0;
        mortality.voluntary_migration_percentage = 0.0;
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let mut org = worker(&config);
        assert_eq!(org.check_termination(&mut rng, 80, 10.0, &config.organisms, &mortality), None);
        assert_eq!(
            org.check_termination(&mut rng, 81, 10.0, &config.organisms, &mortality),
            Some(TerminationReason::Age)
        );
    }

    #[test]
    fn test_full_group_gets_no_gift() {
        let config = Config::default();
        let mut org = worker(&config);
        let mut other = worker(&config);
        other.id = OrganismId(2);

        let mut group = Group::found(
            GroupId(0),
            0,
            GroupMember::of(&org),
            org.storage_level,
            GroupMember::of(&other),
            other.storage_level,
        );
        org.group = Some(GroupId(0));
        group.increase_resources(group.storage_capacity());
        let entries_before = org.journal.len();

        let to_group = org.increase_resources(20.0, Some(&mut group));
        assert_eq!(to_group, 0.0);
        assert_eq!(org.current_stat.food_to_group, 0.0);
        assert_eq!(org.journal.len(), entries_before);
        assert_eq!(org.journal.count(|e| *e == LifeEvent::GaveResources), 0);
    }

    #[test]
    fn test_shortage_counted_when_observed() {
        let config = Config::default();
        let mut org = worker(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut mortality = config.mortality.clone();
        mortality.accident_percentage = 0.0;
        mortality.shortage_migration_percentage = 0.0;
        mortality.voluntary_migration_percentage = 0.0;

        for t in 1..=3 {
            let reason = org.check_termination(&mut rng, t, 0.5, &config.organisms, &mortality);
            assert_eq!(reason, None);
        }
        assert_eq!(org.shortages_experienced, 3);

        org.check_termination(&mut rng, 4, 10.0, &config.organisms, &mortality);
        assert_eq!(org.shortages_experienced, 3);
    }

    #[test]
    fn test_procreation_window_and_modifier() {
        let config = Config::default();
        let org = worker(&config);
        let repro = &config.reproduction;

        assert_eq!(org.procreation_probability(10, 5.0, repro), 0.0);
        assert_eq!(org.procreation_probability(70, 5.0, repro), 0.0);
        // Well resourced: full libido rate
        assert!((org.procreation_probability(20, 5.0, repro) - 0.05).abs() < 1e-12);
        // Scarce: 1 - (2.5 - 1.0) * 0.7 = -0.05 -> 0
        assert_eq!(org.procreation_probability(20, 1.0, repro), 0.0);
        // Slightly scarce: 1 - (2.5 - 2.0) * 0.7 = 0.65
        assert!((org.procreation_probability(20, 2.0, repro) - 0.05 * 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_birth_halves_storage() {
        let config = Config::default();
        let mut parent = worker(&config);
        parent.storage_level = 4.0;
        parent.group = Some(GroupId(7));
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let child = parent.give_birth(
            &mut rng,
            OrganismId(9),
            20,
            &config.evolution.mutation_config(),
            &config.organisms,
        );

        assert_eq!(parent.storage_level, 2.0);
        assert_eq!(child.storage_level, config.organisms.initial_storage_level + 2.0);
        assert_eq!(child.parent_id, Some(OrganismId(1)));
        assert_eq!(child.group, Some(GroupId(7)));
        assert_eq!(child.birth_time, 20);
        assert_eq!(child.genome.len(), parent.genome.len());
    }

    #[test]
    fn test_training_by_posture() {
        let config = Config::default();
        let mut org = worker(&config);
        assert_eq!(org.train(30), 0.0);

        org.genome = Genome::with_traits(
            CooperationGene::Solo,
            EconomyGene::Thief,
            MilitaryGene::Passive,
            5,
        );
        assert_eq!(org.train(10), 0.0);
        assert_eq!(org.train(15), 1.0);
        assert_eq!(org.military_power, 1.0);
    }

    #[test]
    fn test_terminate_is_absorbing() {
        let config = Config::default();
        let mut org = worker(&config);
        org.terminate(TerminationReason::Accident, 5);
        org.terminate(TerminationReason::Killed, 6);

        assert_eq!(org.termination, Some(TerminationReason::Accident));
        assert_eq!(org.final_age, Some(5));
    }
}
