//! Population analysis: how organisms died and what the living carry.

use crate::genetics::{CooperationGene, EconomyGene, MilitaryGene};
use crate::organism::{Organism, TerminationReason};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of the dead roster
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeathCensus {
    pub total_deaths: usize,
    pub by_reason: BTreeMap<TerminationReason, usize>,
    pub mean_final_age: f64,
    pub max_final_age: u64,
}

impl DeathCensus {
    pub fn from_dead(dead: &[Organism]) -> Self {
        let mut census = Self::default();
        let mut age_sum = 0u64;

        for organism in dead {
            let Some(reason) = organism.termination else {
                continue;
            };
            census.total_deaths += 1;
            *census.by_reason.entry(reason).or_insert(0) += 1;

            let age = organism.final_age.unwrap_or(0);
            age_sum += age;
            census.max_final_age = census.max_final_age.max(age);
        }

        if census.total_deaths > 0 {
            census.mean_final_age = age_sum as f64 / census.total_deaths as f64;
        }
        census
    }

    pub fn count(&self, reason: TerminationReason) -> usize {
        self.by_reason.get(&reason).copied().unwrap_or(0)
    }

    /// Format as a one-line summary
    pub fn summary(&self) -> String {
        let reasons: Vec<String> = TerminationReason::ALL
            .iter()
            .map(|r| format!("{}: {}", r, self.count(*r)))
            .collect();
        format!(
            "Deaths: {} ({}), Mean age: {:.1}, Max: {}",
            self.total_deaths,
            reasons.join(", "),
            self.mean_final_age,
            self.max_final_age
        )
    }
}

/// Trait distribution of the living
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenePoolCensus {
    pub population: usize,
    pub cooperative: usize,
    pub solo: usize,
    /// Counts per economy variant: Worker, Survivor, Thief, Fungal
    pub economy: [usize; 4],
    /// Counts per military variant: NonMilitant, Passive, Proactive, Offender
    pub military: [usize; 4],
    pub mean_libido: f64,
    pub mean_military_power: f64,
}

impl GenePoolCensus {
    pub fn from_living(organisms: &[Organism]) -> Self {
        let mut census = Self::default();
        let mut libido_sum = 0.0;
        let mut power_sum = 0.0;

        for organism in organisms.iter().filter(|o| o.is_alive()) {
            census.population += 1;
            match organism.cooperation() {
                Some(CooperationGene::Cooperative) => census.cooperative += 1,
                Some(CooperationGene::Solo) => census.solo += 1,
                None => {}
            }
            if let Some(economy) = organism.economy() {
                census.economy[(economy.value() - 1) as usize] += 1;
            }
            if let Some(military) = organism.military() {
                census.military[(military.value() - 1) as usize] += 1;
            }
            libido_sum += organism.genome.libido() as f64;
            power_sum += organism.military_power;
        }

        if census.population > 0 {
            census.mean_libido = libido_sum / census.population as f64;
            census.mean_military_power = power_sum / census.population as f64;
        }
        census
    }

    pub fn economy_count(&self, economy: EconomyGene) -> usize {
        self.economy[(economy.value() - 1) as usize]
    }

    pub fn military_count(&self, military: MilitaryGene) -> usize {
        self.military[(military.value() - 1) as usize]
    }

    /// Format as a one-line summary
    pub fn summary(&self) -> String {
        let economy: Vec<String> = EconomyGene::ALL
            .iter()
            .map(|e| format!("{}: {}", e, self.economy_count(*e)))
            .collect();
        let military: Vec<String> = MilitaryGene::ALL
            .iter()
            .map(|m| format!("{}: {}", m, self.military_count(*m)))
            .collect();
        format!(
            "Pop: {} | Coop: {} Solo: {} | {} | {} | Libido: {:.2} | Power: {:.1}",
            self.population,
            self.cooperative,
            self.solo,
            economy.join(" "),
            military.join(" "),
            self.mean_libido,
            self.mean_military_power
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::genetics::Genome;
    use crate::journal::JournalLevel;
    use crate::organism::OrganismId;

    fn organism(id: u64, economy: EconomyGene, military: MilitaryGene) -> Organism {
        let config = Config::default();
        let genome = Genome::with_traits(CooperationGene::Cooperative, economy, military, 4);
        Organism::new(OrganismId(id), 0, genome, &config.organisms, JournalLevel::Off)
    }

    #[test]
    fn test_death_census() {
        let mut dead = vec![
            organism(1, EconomyGene::Worker, MilitaryGene::NonMilitant),
            organism(2, EconomyGene::Thief, MilitaryGene::Offender),
            organism(3, EconomyGene::Worker, MilitaryGene::Passive),
        ];
        dead[0].terminate(TerminationReason::Age, 80);
        dead[1].terminate(TerminationReason::Killed, 20);
        dead[2].terminate(TerminationReason::Age, 86);

        let census = DeathCensus::from_dead(&dead);
        assert_eq!(census.total_deaths, 3);
        assert_eq!(census.count(TerminationReason::Age), 2);
        assert_eq!(census.count(TerminationReason::Killed), 1);
        assert_eq!(census.count(TerminationReason::Starvation), 0);
        assert_eq!(census.max_final_age, 86);
        assert!((census.mean_final_age - 62.0).abs() < 1e-9);
        assert!(census.summary().contains("Killed: 1"));
    }

    #[test]
    fn test_gene_pool_census() {
        let mut living = vec![
            organism(1, EconomyGene::Worker, MilitaryGene::NonMilitant),
            organism(2, EconomyGene::Worker, MilitaryGene::Offender),
            organism(3, EconomyGene::Fungal, MilitaryGene::Offender),
        ];
        living[1].military_power = 3.0;

        let census = GenePoolCensus::from_living(&living);
        assert_eq!(census.population, 3);
        assert_eq!(census.cooperative, 3);
        assert_eq!(census.economy_count(EconomyGene::Worker), 2);
        assert_eq!(census.economy_count(EconomyGene::Fungal), 1);
        assert_eq!(census.military_count(MilitaryGene::Offender), 2);
        assert_eq!(census.mean_libido, 4.0);
        assert_eq!(census.mean_military_power, 1.0);
    }

    #[test]
    fn test_empty_census() {
        let census = GenePoolCensus::from_living(&[]);
        assert_eq!(census.population, 0);
        assert_eq!(census.mean_libido, 0.0);
        assert_eq!(DeathCensus::from_dead(&[]).total_deaths, 0);
    }
}
