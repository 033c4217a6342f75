//! Theft and violence.
//!
//! Percentages are on a 0-100 scale throughout.

use crate::journal::LifeEvent;
use crate::matching::vicinity_search;
use crate::organism::TerminationReason;
use crate::world::World;
use rand::Rng;

/// Outcome of one steal roll against a chosen victim
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StealRoll {
    Miss,
    /// Half of the victim's storage is taken
    Rob,
    /// All of the victim's storage is taken and the victim dies
    Kill,
}

/// A completed theft
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theft {
    /// Roster index of the victim
    pub victim: usize,
    pub amount: f64,
    pub killed: bool,
}

/// Chance of robbing without killing
pub fn steal_success_percentage(thief_power: f64, victim_power: f64, base_modifier: f64) -> f64 {
    (thief_power - victim_power + base_modifier).max(0.0)
}

/// Roll once: under the success percentage robs, under success plus
/// `kill_percentage` kills, anything else misses.
pub fn roll_steal<R: Rng + ?Sized>(
    rng: &mut R,
    thief_power: f64,
    victim_power: f64,
    base_modifier: f64,
    kill_percentage: f64,
) -> StealRoll {
    let success = steal_success_percentage(thief_power, victim_power, base_modifier);
    let roll = 100.0 * rng.gen::<f64>();
    if roll < success {
        StealRoll::Rob
    } else if roll < success + kill_percentage {
        StealRoll::Kill
    } else {
        StealRoll::Miss
    }
}

/// Whether a theft is attempted at all
pub fn decides_to_steal<R: Rng + ?Sized>(rng: &mut R, attempt_percentage: f64) -> bool {
    attempt_percentage > 0.0 && 100.0 * rng.gen::<f64>() < attempt_percentage
}

impl World {
    /// Search the vicinity for a victim and rob (or kill) the first one the
    /// roll succeeds against. Immature thieves always fail without searching.
    pub fn attempt_theft(&mut self, thief: usize, kill_percentage: f64) -> Option<Theft> {
        let now = self.time;
        let organisms = &self.organisms;
        let thief_org = &organisms[thief];
        if thief_org.age(now) < self.config.organisms.maturity_start_stealing {
            return None;
        }

        let thief_power = thief_org.military_power;
        let base_modifier = self.config.conflict.base_stealing_modifier;
        let mut outcome = StealRoll::Miss;

        let victim = vicinity_search(
            &mut self.rng,
            organisms.len(),
            thief,
            self.config.world.search_draws(),
            |rng, index| {
                let victim = &organisms[index];
                if !victim.is_alive() {
                    return false;
                }
                outcome = roll_steal(rng, thief_power, victim.military_power, base_modifier, kill_percentage);
                outcome != StealRoll::Miss
            },
        )?;

        let killed = outcome == StealRoll::Kill;
        let amount = {
            let victim_org = &mut self.organisms[victim];
            let wanted = if killed {
                victim_org.storage_level
            } else {
                victim_org.storage_level / 2.0
            };
            let taken = victim_org.decrease_storage_level(wanted);
            victim_org.current_stat.food_lost += taken;
            victim_org.note(now, LifeEvent::LostStorage, Some(taken));
            taken
        };

        if killed {
            log::debug!(
                "T:{} {} killed {} taking {:.2}",
                now,
                self.organisms[thief].id,
                self.organisms[victim].id,
                amount
            );
            self.terminate_organism(victim, TerminationReason::Killed);
        } else {
            log::trace!(
                "T:{} {} robbed {} of {:.2}",
                now,
                self.organisms[thief].id,
                self.organisms[victim].id,
                amount
            );
        }

        Some(Theft {
            victim,
            amount,
            killed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::genetics::{CooperationGene, EconomyGene, Genome, MilitaryGene};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Thief at index 0, two grouped workers at 1 and 2, old enough to steal
    fn theft_world(base_modifier: f64) -> World {
        let mut config = Config::default();
        config.world.initial_population = 0;
        config.world.max_population_to_support = 10;
        config.conflict.base_stealing_modifier = base_modifier;
        let mut world = World::new_with_seed(config, 13);

        world.spawn(Genome::with_traits(
            CooperationGene::Solo,
            EconomyGene::Thief,
            MilitaryGene::Offender,
            0,
        ));
        let worker = Genome::with_traits(
            CooperationGene::Cooperative,
            EconomyGene::Worker,
            MilitaryGene::NonMilitant,
            0,
        );
        world.spawn(worker.clone());
        world.spawn(worker);
        world.form_group(1, 2);

        world.time = 20;
        world.organisms[1].storage_level = 3.0;
        world.organisms[2].storage_level = 3.0;
        world
    }

    #[test]
    fn test_lethal_theft_takes_everything() {
        // No rob window: every successful roll kills
        let mut world = theft_world(0.0);
        let group_id = world.organisms[1].group.unwrap();

        let theft = world.attempt_theft(0, 100.0).unwrap();
        assert!(theft.killed);
        assert!(theft.victim == 1 || theft.victim == 2);
        assert_eq!(theft.amount, 3.0);

        let victim = &world.organisms[theft.victim];
        assert_eq!(victim.termination, Some(TerminationReason::Killed));
        assert_eq!(victim.death_time, Some(20));
        assert_eq!(victim.storage_level, 0.0);
        assert!(victim.group.is_none());
        assert_eq!(victim.current_stat.food_lost, 3.0);

        let group = world.group(group_id).unwrap();
        assert_eq!(group.population(), 1);
        assert!(!group.contains(victim.id));
        assert_eq!(group.departed(), &[victim.id]);
    }

    #[test]
    fn test_robbery_takes_half_and_spares_victim() {
        // Rob window covers every roll
        let mut world = theft_world(100.0);

        let theft = world.attempt_theft(0, 0.0).unwrap();
        assert!(!theft.killed);
        assert_eq!(theft.amount, 1.5);

        let victim = &world.organisms[theft.victim];
        assert!(victim.is_alive());
        assert_eq!(victim.storage_level, 1.5);
        assert!(victim.group.is_some());
    }

    #[test]
    fn test_dead_victim_is_never_chosen() {
        let mut world = theft_world(100.0);
        world.terminate_organism(1, TerminationReason::Accident);
        world.terminate_organism(2, TerminationReason::Accident);

        for _ in 0..50 {
            assert!(world.attempt_theft(0, 100.0).is_none());
        }
    }

    #[test]
    fn test_success_percentage_floor() {
        assert_eq!(steal_success_percentage(0.0, 0.0, 30.0), 30.0);
        assert_eq!(steal_success_percentage(10.0, 2.5, 30.0), 37.5);
        assert_eq!(steal_success_percentage(0.0, 100.0, 30.0), 0.0);
    }

    #[test]
    fn test_roll_windows() {
        // A 0.0 draw lands in the rob window whenever it is open
        let mut rng = StepRng::new(0, 0);
        assert_eq!(roll_steal(&mut rng, 0.0, 0.0, 30.0, 0.0), StealRoll::Rob);
        // No rob window, kill window open
        assert_eq!(roll_steal(&mut rng, 0.0, 50.0, 30.0, 0.02), StealRoll::Kill);
        // Neither
        assert_eq!(roll_steal(&mut rng, 0.0, 50.0, 30.0, 0.0), StealRoll::Miss);
    }

    #[test]
    fn test_equal_power_rob_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(30);
        let trials = 50_000;
        let mut robbed = 0;
        let mut killed = 0;
        for _ in 0..trials {
            match roll_steal(&mut rng, 0.0, 0.0, 30.0, 0.02) {
                StealRoll::Rob => robbed += 1,
                StealRoll::Kill => killed += 1,
                StealRoll::Miss => {}
            }
        }
        let rate = robbed as f64 / trials as f64;
        assert!((rate - 0.30).abs() < 0.01, "rob rate {}", rate);
        assert!(killed < 50);
    }

    #[test]
    fn test_decides_to_steal() {
        let mut rng = StepRng::new(0, 0);
        assert!(!decides_to_steal(&mut rng, 0.0));
        assert!(decides_to_steal(&mut rng, 10.0));
        assert!(decides_to_steal(&mut rng, 100.0));
    }
}
