//! Groups: a shared resource pool plus a membership roster.
//!
//! Members are referenced by id. Each roster entry carries the member's gene
//! values and capacity so that scores and departure accounting never need to
//! look back into the world's organism list.

use crate::config::GroupConfig;
use crate::genetics::{EconomyGene, MilitaryGene};
use crate::organism::{Organism, OrganismId};
use crate::stats::GroupStat;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a group in the world's group roster
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

/// Roster entry for one member
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: OrganismId,
    pub economy: i32,
    pub military: i32,
    pub storage_capacity: f64,
}

impl GroupMember {
    pub fn of(organism: &Organism) -> Self {
        Self {
            id: organism.id,
            economy: organism.genome.economy().map(|e| e.value()).unwrap_or(0),
            military: organism.genome.military().map(|m| m.value()).unwrap_or(0),
            storage_capacity: organism.storage_capacity,
        }
    }
}

/// Economy score at and above which a group counts as thief-leaning
const THIEF_LEANING_SCORE: f64 = 2.5;

/// A voluntary collective sharing one resource pool
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub formed_time: u64,
    members: Vec<GroupMember>,
    departed: Vec<OrganismId>,
    storage_level: f64,
    storage_capacity: f64,
    economy_score: f64,
    military_score: f64,
    pub period_stats: Vec<GroupStat>,
}

impl Group {
    /// Form a group from a matched pair
    pub fn found(
        id: GroupId,
        now: u64,
        first: GroupMember,
        first_storage: f64,
        second: GroupMember,
        second_storage: f64,
    ) -> Self {
        let mut group = Self {
            id,
            formed_time: now,
            members: Vec::new(),
            departed: Vec::new(),
            storage_level: 0.0,
            storage_capacity: 0.0,
            economy_score: 0.0,
            military_score: 0.0,
            period_stats: Vec::new(),
        };
        group.add(first, first_storage);
        group.add(second, second_storage);
        group
    }

    /// Unconditionally add a member. Its capacity is added to the pool's
    /// capacity and its current storage level to the pool's level.
    /// Returns false if it was already a member.
    pub fn add(&mut self, member: GroupMember, storage_level: f64) -> bool {
        if self.contains(member.id) {
            return false;
        }
        self.storage_capacity += member.storage_capacity;
        self.storage_level = (self.storage_level + storage_level.max(0.0)).min(self.storage_capacity);
        self.members.push(member);
        self.rescore();
        true
    }

    /// Add a recruit, subject to the population limiter
    pub fn try_join<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        member: GroupMember,
        storage_level: f64,
        config: &GroupConfig,
    ) -> bool {
        if config.population_limits_enabled {
            let probability = self.join_probability(config);
            if probability <= 0.0 || rng.gen::<f64>() > probability {
                return false;
            }
        }
        self.add(member, storage_level)
    }

    /// Remove a member. Its capacity is released and the level re-clamped;
    /// the id is kept on the departed roster.
    pub fn remove(&mut self, id: OrganismId) -> Option<GroupMember> {
        let index = self.members.iter().position(|m| m.id == id)?;
        let member = self.members.remove(index);
        self.departed.push(id);

        self.storage_capacity = (self.storage_capacity - member.storage_capacity).max(0.0);
        self.storage_level = self.storage_level.min(self.storage_capacity);
        self.rescore();
        Some(member)
    }

    /// Add to the pool, clamped to capacity. Returns the amount accepted.
    pub fn increase_resources(&mut self, amount: f64) -> f64 {
        let before = self.storage_level;
        self.storage_level = (self.storage_level + amount.max(0.0)).min(self.storage_capacity);
        self.storage_level - before
    }

    /// Take from the pool, never below zero. Returns the amount taken.
    pub fn decrease_resources(&mut self, amount: f64) -> f64 {
        let taken = amount.clamp(0.0, self.storage_level);
        self.storage_level -= taken;
        taken
    }

    /// Group bookkeeping at the start of a period
    pub fn live(&mut self, now: u64) {
        if self.is_empty() {
            return;
        }
        self.period_stats.push(GroupStat {
            time: now,
            population: self.population(),
            storage_level: self.storage_level,
            storage_capacity: self.storage_capacity,
            economy_score: self.economy_score,
            military_score: self.military_score,
        });
    }

    fn rescore(&mut self) {
        if self.members.is_empty() {
            self.economy_score = 0.0;
            self.military_score = 0.0;
            return;
        }
        let n = self.members.len() as f64;
        self.economy_score = self.members.iter().map(|m| m.economy as f64).sum::<f64>() / n;
        self.military_score = self.members.iter().map(|m| m.military as f64).sum::<f64>() / n;
    }

    #[inline]
    pub fn population(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: OrganismId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    pub fn departed(&self) -> &[OrganismId] {
        &self.departed
    }

    #[inline]
    pub fn storage_level(&self) -> f64 {
        self.storage_level
    }

    #[inline]
    pub fn storage_capacity(&self) -> f64 {
        self.storage_capacity
    }

    /// Per-member share of the pool, zero when empty
    pub fn resource_share(&self) -> f64 {
        if self.members.is_empty() {
            0.0
        } else {
            self.storage_level / self.members.len() as f64
        }
    }

    pub fn available_capacity(&self) -> f64 {
        (self.storage_capacity - self.storage_level).max(0.0)
    }

    pub fn economy_score(&self) -> f64 {
        self.economy_score
    }

    pub fn military_score(&self) -> f64 {
        self.military_score
    }

    /// Economy posture of the majority, by rounded mean
    pub fn economy_posture(&self) -> Option<EconomyGene> {
        EconomyGene::from_value(self.economy_score.round() as i32)
    }

    /// Military posture of the majority, by rounded mean
    pub fn military_posture(&self) -> Option<MilitaryGene> {
        MilitaryGene::from_value(self.military_score.round() as i32)
    }

    pub fn population_limit(&self, config: &GroupConfig) -> usize {
        if self.economy_score < THIEF_LEANING_SCORE {
            config.worker_population_limit
        } else {
            config.thief_population_limit
        }
    }

    /// Recruit acceptance rate: 1 up to 80% of the limit, 0.5 at the limit,
    /// 0 from 120%, linear in between.
    pub fn join_probability(&self, config: &GroupConfig) -> f64 {
        let limit = self.population_limit(config).max(1) as f64;
        let ratio = self.population() as f64 / limit;
        ((1.2 - ratio) * 2.5).clamp(0.0, 1.0)
    }
}
