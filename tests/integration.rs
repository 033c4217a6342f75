//! Integration tests for EVONOMICS

use evonomics::genetics::{CooperationGene, EconomyGene, Genome, MilitaryGene};
use evonomics::journal::JournalLevel;
use evonomics::stats::StatsHistory;
use evonomics::{Config, Organism, OrganismId, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn small_config(population: usize) -> Config {
    let mut config = Config::default();
    config.world.initial_population = population;
    config.world.max_population_to_support = population.max(1);
    config.world.initial_resource_level = population as f64 * 80.0;
    config.world.replenishment_mean = population as f64;
    config.world.replenishment_minimum = population as f64 / 10.0;
    config
}

/// No random deaths, an empty roster and a generous pool
fn scenario_config() -> Config {
    let mut config = Config::default();
    config.world.initial_population = 0;
    config.world.max_population_to_support = 10;
    config.world.initial_resource_level = 1000.0;
    config.organisms.storage_capacity = 10.0;
    config.mortality.accident_percentage = 0.0;
    config.mortality.shortage_migration_percentage = 0.0;
    config.mortality.voluntary_migration_percentage = 0.0;
    config
}

fn cooperative_worker() -> Genome {
    Genome::with_traits(
        CooperationGene::Cooperative,
        EconomyGene::Worker,
        MilitaryGene::NonMilitant,
        0,
    )
}

#[test]
fn test_full_simulation_cycle() {
    let mut world = World::new_with_seed(small_config(50), 12345);

    world.run(200);

    assert_eq!(world.period_stats.len(), 200);
    for organism in &world.organisms {
        assert!(organism.is_alive());
        assert!(organism.storage_level >= 0.0);
        assert!(organism.storage_level <= organism.storage_ceiling() + 1e-9);
    }
    for organism in &world.dead {
        assert!(organism.termination.is_some());
        assert!(world.find_organism(organism.id).is_none());
    }
}

#[test]
fn test_reproducibility() {
    let config = small_config(60);

    let mut world1 = World::new_with_seed(config.clone(), 99999);
    let mut world2 = World::new_with_seed(config, 99999);

    world1.run(150);
    world2.run(150);

    assert_eq!(world1.period_stats, world2.period_stats);
    assert_eq!(world1.population(), world2.population());
    assert_eq!(world1.groups.len(), world2.groups.len());
    assert_eq!(world1.resource_level(), world2.resource_level());
}

#[test]
fn test_different_seeds_diverge() {
    let config = small_config(60);

    let mut world1 = World::new_with_seed(config.clone(), 1);
    let mut world2 = World::new_with_seed(config, 2);

    world1.run(50);
    world2.run(50);

    assert_ne!(world1.period_stats, world2.period_stats);
}

#[test]
fn test_pool_stays_bounded() {
    let mut config = small_config(40);
    config.world.initial_resource_level = 400.0;
    config.world.max_resource_level = 500.0;
    config.world.replenishment_mean = 200.0;

    let mut world = World::new_with_seed(config, 7);
    world.run_with_callback(200, |w, _| {
        let level = w.resource_level();
        assert!(level >= 0.0, "pool below zero: {}", level);
        assert!(level <= 500.0, "pool above ceiling: {}", level);
    });
}

#[test]
fn test_two_cooperative_workers() {
    let mut world = World::new_with_seed(scenario_config(), 21);
    world.spawn(cooperative_worker());
    world.spawn(cooperative_worker());

    world.advance_one_period();

    assert_eq!(world.population(), 2);
    assert_eq!(world.groups.len(), 1);
    assert_eq!(world.groups[0].population(), 2);

    let stat = &world.period_stats[0];
    assert_eq!(stat.consumption, 2.0);
    assert_eq!(stat.grouped_population, 2);
    for organism in &world.organisms {
        let period = &organism.period_stats[0];
        assert_eq!(period.consumption, 1.0);
        assert_eq!(period.food_stolen, 0.0);
        assert_eq!(period.food_lost, 0.0);
    }

    // Pool after settlement: start - cultivation + replenishment
    let expected = 1000.0 - stat.cultivation + stat.actual_replenishment;
    assert!((world.resource_level() - expected).abs() < 1e-9);
}

#[test]
fn test_theft_success_rate() {
    let mut world = World::new_with_seed(scenario_config(), 3);
    let thief = Genome::with_traits(
        CooperationGene::Solo,
        EconomyGene::Thief,
        MilitaryGene::NonMilitant,
        0,
    );
    let victim = Genome::with_traits(
        CooperationGene::Solo,
        EconomyGene::Worker,
        MilitaryGene::NonMilitant,
        0,
    );
    world.spawn(thief);
    world.spawn(victim);

    // Old enough to steal
    world.time = 20;

    let trials = 5000;
    let mut successes = 0;
    for _ in 0..trials {
        world.organisms[1].storage_level = 4.0;
        if let Some(theft) = world.attempt_theft(0, 0.0) {
            assert_eq!(theft.victim, 1);
            assert!(!theft.killed);
            assert!((theft.amount - 2.0).abs() < 1e-12);
            successes += 1;
        }
    }

    // Equal power, base modifier 30
    let rate = successes as f64 / trials as f64;
    assert!((0.27..=0.33).contains(&rate), "theft rate {}", rate);
    assert!(world.organisms[1].is_alive());
}

#[test]
fn test_group_formation_reproducible() {
    let build = || {
        let mut world = World::new_with_seed(scenario_config(), 77);
        for _ in 0..10 {
            world.spawn(cooperative_worker());
        }
        world.advance_one_period();
        world
    };

    let first = build();
    let second = build();

    assert!(!first.groups.is_empty());
    assert_eq!(first.groups.len(), second.groups.len());
    for (a, b) in first.groups.iter().zip(second.groups.iter()) {
        assert_eq!(a.members(), b.members());
        assert_eq!(a.formed_time, 0);
        assert!(a.population() >= 2);
    }
}

#[test]
fn test_group_membership_consistent() {
    let mut config = small_config(80);
    config.groups.members_recruit = true;

    let mut world = World::new_with_seed(config, 4242);
    for _ in 0..100 {
        world.advance_one_period();

        for organism in &world.organisms {
            if let Some(group_id) = organism.group {
                let group = world.group(group_id).expect("group exists");
                assert!(group.contains(organism.id));
            }
        }
        for group in &world.groups {
            assert!(group.storage_level() >= 0.0);
            assert!(group.storage_level() <= group.storage_capacity() + 1e-9);
            for member in group.members() {
                let organism = world.find_organism(member.id).expect("member is alive");
                assert_eq!(organism.group, Some(group.id));
            }
        }
        for organism in &world.dead {
            assert!(organism.group.is_none());
        }
    }
}

#[test]
fn test_period_totals_match_organism_stats() {
    let mut world = World::new_with_seed(small_config(50), 31);
    world.run(30);

    for stat in &world.period_stats {
        let per_organism = world
            .organisms
            .iter()
            .chain(world.dead.iter())
            .flat_map(|o| o.period_stats.iter())
            .filter(|s| s.time == stat.time);

        let (cultivation, consumption) = per_organism
            .fold((0.0, 0.0), |(c, e), s| (c + s.cultivation, e + s.consumption));

        assert!((cultivation - stat.cultivation).abs() < 1e-6, "t={}", stat.time);
        assert!((consumption - stat.consumption).abs() < 1e-6, "t={}", stat.time);
    }
}

#[test]
fn test_reproduction_halves_storage() {
    let config = Config::default();
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let mut parent = Organism::new(
        OrganismId(1),
        0,
        cooperative_worker(),
        &config.organisms,
        JournalLevel::All,
    );
    parent.storage_level = 4.0;

    let child = parent.give_birth(
        &mut rng,
        OrganismId(2),
        20,
        &config.evolution.mutation_config(),
        &config.organisms,
    );

    assert_eq!(parent.storage_level, 2.0);
    assert_eq!(child.storage_level, config.organisms.initial_storage_level + 2.0);
    assert_eq!(child.parent_id, Some(OrganismId(1)));
    assert_eq!(child.birth_time, 20);
    assert_eq!(child.genome.len(), parent.genome.len());
}

#[test]
fn test_stats_export_round_trip() {
    let mut world = World::new_with_seed(small_config(30), 555);
    world.run(40);

    let path = std::env::temp_dir().join("evonomics_test_stats_history.json");
    world.stats_history.save(&path).expect("Failed to save stats");

    let loaded = StatsHistory::load(&path).expect("Failed to load stats");
    assert_eq!(loaded.interval, world.stats_history.interval);
    assert_eq!(loaded.snapshots.len(), 4);
    for (a, b) in loaded.snapshots.iter().zip(world.stats_history.snapshots.iter()) {
        assert_eq!(a.time, b.time);
        assert_eq!(a.population, b.population);
        assert_eq!(a.born, b.born);
        assert_eq!(a.died, b.died);
        assert!((a.resource_level - b.resource_level).abs() <= 1e-9 * b.resource_level.max(1.0));
    }

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_config_file_round_trip() {
    let mut config = Config::default();
    config.world.initial_population = 123;
    config.groups.members_recruit = true;

    let path = std::env::temp_dir().join("evonomics_test_config.yaml");
    config.save(&path).expect("Failed to save config");

    let loaded = Config::from_file(&path).expect("Failed to load config");
    assert_eq!(loaded.world.initial_population, 123);
    assert!(loaded.groups.members_recruit);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_reset_replays_run() {
    let mut world = World::new_with_seed(small_config(40), 2024);
    world.run(60);
    let first = world.period_stats.clone();

    world.reset();
    world.run(60);

    assert_eq!(world.period_stats, first);
}
