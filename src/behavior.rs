//! Per-period organism behavior.
//!
//! Each live organism runs through termination check, group joining,
//! resource acquisition, consumption, reproduction and training, in that
//! order. Later steps read state the earlier ones changed.

use crate::conflict::decides_to_steal;
use crate::genetics::traits::FULL_STEAL_PERCENTAGE;
use crate::genetics::{EconomyGene, MilitaryGene};
use crate::group::{Group, GroupId, GroupMember};
use crate::journal::LifeEvent;
use crate::organism::TerminationReason;
use crate::world::World;

impl World {
    /// One period of life for the organism at roster `index`
    pub fn live_organism(&mut self, index: usize) {
        let now = self.time;
        if self.organisms[index].is_terminated() {
            return;
        }

        // 1. Termination
        let available = self.available_resources(index);
        let reason = self.organisms[index].check_termination(
            &mut self.rng,
            now,
            available,
            &self.config.organisms,
            &self.config.mortality,
        );
        if let Some(reason) = reason {
            self.terminate_organism(index, reason);
            return;
        }

        // 2. Groups
        self.join_group(index);

        // 3. Resources
        self.obtain_resources(index);

        // 4. Consumption
        let meal = {
            let (organism, group) = self.organism_and_group(index);
            organism.consume(now, group)
        };
        self.period_consumption += meal.consumed;
        if meal.starved {
            log::trace!("T:{} {} starved", now, self.organisms[index].id);
            self.terminate_organism(index, TerminationReason::Starvation);
            return;
        }

        // 5. Reproduction
        self.procreate(index);

        // 6. Training
        self.organisms[index].train(now);
    }

    /// Cooperative organisms look for a partner and form or join a group
    fn join_group(&mut self, index: usize) {
        let organism = &self.organisms[index];
        if !organism.is_cooperative() {
            return;
        }
        if organism.in_group() && !self.config.groups.members_recruit {
            return;
        }

        let Some(found) = self.search_for_similar_individual(index) else {
            return;
        };

        match (self.organisms[index].group, self.organisms[found].group) {
            (None, None) => {
                self.form_group(index, found);
            }
            (None, Some(group_id)) => {
                if self.recruit(group_id, index) {
                    self.organisms[index].note(self.time, LifeEvent::JoinedGroup, None);
                }
            }
            (Some(group_id), None) => {
                if self.recruit(group_id, found) {
                    self.organisms[found].note(self.time, LifeEvent::RecruitedIntoGroup, None);
                }
            }
            // Excluded by the matcher
            (Some(_), Some(_)) => {}
        }
    }

    /// Found a new group from two ungrouped organisms
    pub fn form_group(&mut self, first: usize, second: usize) -> GroupId {
        let now = self.time;
        let id = GroupId(self.groups.len() as u32);
        let group = {
            let a = &self.organisms[first];
            let b = &self.organisms[second];
            Group::found(
                id,
                now,
                GroupMember::of(a),
                a.storage_level,
                GroupMember::of(b),
                b.storage_level,
            )
        };
        self.groups.push(group);

        for index in [first, second] {
            let organism = &mut self.organisms[index];
            organism.group = Some(id);
            organism.note(now, LifeEvent::FormedGroup, None);
        }
        log::debug!(
            "T:{} {} formed by {} and {}",
            now,
            id,
            self.organisms[first].id,
            self.organisms[second].id
        );
        id
    }

    /// Add the organism at `index` to a group through the size limiter
    fn recruit(&mut self, group_id: GroupId, index: usize) -> bool {
        let Some(group) = self.groups.get_mut(group_id.0 as usize) else {
            return false;
        };
        let organism = &mut self.organisms[index];
        let joined = group.try_join(
            &mut self.rng,
            GroupMember::of(organism),
            organism.storage_level,
            &self.config.groups,
        );
        if joined {
            organism.group = Some(group_id);
        }
        joined
    }

    /// Dispatch on the economy gene
    fn obtain_resources(&mut self, index: usize) {
        let organism = &self.organisms[index];
        let Some(economy) = organism.economy() else {
            return;
        };
        let military = organism.military().unwrap_or(MilitaryGene::NonMilitant);
        let profile = military.profile();

        match economy {
            EconomyGene::Worker => {
                self.seek_food(index);
            }
            EconomyGene::Survivor => {
                self.seek_food(index);
                let organism = &self.organisms[index];
                if !organism.has_reserve() && organism.starvation > 0.0 {
                    self.steal(
                        index,
                        profile.survivor_steal_percentage,
                        0.0,
                        LifeEvent::StoleAfterForaging,
                    );
                }
            }
            EconomyGene::Thief => {
                let stolen = self.steal(
                    index,
                    FULL_STEAL_PERCENTAGE,
                    profile.kill_percentage,
                    LifeEvent::StoleBeforeForaging,
                );
                let organism = &self.organisms[index];
                if stolen > 0.0 && (organism.has_reserve() || organism.starvation == 0.0) {
                    return;
                }
                self.seek_food(index);
            }
            EconomyGene::Fungal => {
                if organism.in_group() || organism.has_reserve() {
                    return;
                }
                if !military.is_militant() {
                    self.seek_food(index);
                    return;
                }
                self.steal(index, FULL_STEAL_PERCENTAGE, 0.0, LifeEvent::StoleBeforeForaging);
                if !self.organisms[index].has_reserve() {
                    self.seek_food(index);
                }
            }
        }
    }

    /// Forage from the world pool. Returns the amount found.
    pub fn seek_food(&mut self, index: usize) -> f64 {
        let now = self.time;
        let request = {
            let organism = &self.organisms[index];
            organism.request_ceiling(self.group_of(organism))
        };
        let found = self.period_resource_request(request);

        let (organism, group) = self.organism_and_group(index);
        organism.increase_resources(found, group);
        organism.current_stat.cultivation += found;
        organism.note(now, LifeEvent::Foraged, Some(found));
        found
    }

    /// Maybe attempt a theft. Returns the amount stolen.
    fn steal(
        &mut self,
        index: usize,
        attempt_percentage: f64,
        kill_percentage: f64,
        event: LifeEvent,
    ) -> f64 {
        let now = self.time;
        if !decides_to_steal(&mut self.rng, attempt_percentage) {
            return 0.0;
        }
        let Some(theft) = self.attempt_theft(index, kill_percentage) else {
            return 0.0;
        };
        if theft.amount <= 0.0 {
            return 0.0;
        }

        let (organism, group) = self.organism_and_group(index);
        organism.increase_resources(theft.amount, group);
        organism.current_stat.food_stolen += theft.amount;
        organism.note(now, event, Some(theft.amount));
        theft.amount
    }

    /// Asexual reproduction; the child is staged until the period ends
    fn procreate(&mut self, index: usize) {
        let now = self.time;
        let available = self.available_resources(index);
        let wants = self.organisms[index].wants_to_procreate(
            &mut self.rng,
            now,
            available,
            &self.config.reproduction,
        );
        if !wants {
            return;
        }

        let child_id = self.next_id();
        let mutation = self.config.evolution.mutation_config();
        let child = self.organisms[index].give_birth(
            &mut self.rng,
            child_id,
            now,
            &mutation,
            &self.config.organisms,
        );

        if let Some(group) = child.group.and_then(|id| self.groups.get_mut(id.0 as usize)) {
            group.add(GroupMember::of(&child), child.storage_level);
        }
        log::trace!("T:{} {} born to {}", now, child.id, self.organisms[index].id);
        self.newborns.push(child);
    }
}
