//! Genome assembly for founders and newborns.

use super::gene::{Gene, MutationConfig};
use super::traits::{CooperationGene, EconomyGene, GeneKind, MilitaryGene};
use crate::config::EvolutionConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Libido range; the rate is value / 100
pub const LIBIDO_MIN: i32 = 0;
pub const LIBIDO_MAX: i32 = 10;

/// Ordered gene list, at most one gene per category
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    genes: Vec<Gene>,
}

impl Genome {
    /// Empty genome
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a genome from explicit trait values (no randomness)
    pub fn with_traits(
        cooperation: CooperationGene,
        economy: EconomyGene,
        military: MilitaryGene,
        libido: i32,
    ) -> Self {
        let mut genome = Self::new();
        genome.insert(cooperation_gene(cooperation.value()));
        genome.insert(libido_gene(libido));
        genome.insert(economy_gene(economy.value()));
        genome.insert(military_gene(military.value()));
        genome
    }

    /// Random genome for a member of the initial population
    pub fn founder<R: Rng + ?Sized>(rng: &mut R, config: &EvolutionConfig) -> Self {
        let cooperation = rng.gen_range(CooperationGene::MIN..=CooperationGene::MAX);
        let economy = draw_category(rng, &config.economy_weights, &EconomyGene::ALL);
        let military = draw_category(rng, &config.military_weights, &MilitaryGene::ALL);

        let mut genome = Self::new();
        genome.insert(cooperation_gene(cooperation));
        genome.insert(libido_gene(config.default_libido));
        genome.insert(economy_gene(economy.value()));
        genome.insert(military_gene(military.value()));
        genome
    }

    /// Child genome: each parent gene copied, then mutated independently
    pub fn inherit<R: Rng + ?Sized>(&self, rng: &mut R, config: &MutationConfig) -> Self {
        let genes = self
            .genes
            .iter()
            .map(|parent_gene| {
                let mut gene = parent_gene.create_copy();
                gene.mutate(rng, config);
                gene
            })
            .collect();
        Self { genes }
    }

    /// Add a gene, replacing any gene in the same slot. User-defined genes
    /// are slotted by label, every other category holds a single gene.
    pub fn insert(&mut self, gene: Gene) {
        match self.genes.iter_mut().find(|g| same_slot(g, &gene)) {
            Some(existing) => *existing = gene,
            None => self.genes.push(gene),
        }
    }

    /// User-defined gene by label
    pub fn user_defined(&self, label: &str) -> Option<&Gene> {
        self.genes
            .iter()
            .find(|g| g.kind() == GeneKind::UserDefined && g.label.as_deref() == Some(label))
    }

    pub fn get(&self, kind: GeneKind) -> Option<&Gene> {
        self.genes.iter().find(|g| g.kind() == kind)
    }

    pub fn get_mut(&mut self, kind: GeneKind) -> Option<&mut Gene> {
        self.genes.iter_mut().find(|g| g.kind() == kind)
    }

    /// Current value of a category, 0 when absent
    pub fn value(&self, kind: GeneKind) -> i32 {
        self.get(kind).map(|g| g.value()).unwrap_or(0)
    }

    pub fn cooperation(&self) -> Option<CooperationGene> {
        CooperationGene::from_value(self.value(GeneKind::Cooperation))
    }

    pub fn economy(&self) -> Option<EconomyGene> {
        EconomyGene::from_value(self.value(GeneKind::Economy))
    }

    pub fn military(&self) -> Option<MilitaryGene> {
        MilitaryGene::from_value(self.value(GeneKind::Military))
    }

    pub fn libido(&self) -> i32 {
        self.value(GeneKind::Libido)
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

fn same_slot(a: &Gene, b: &Gene) -> bool {
    a.kind() == b.kind() && (a.kind() != GeneKind::UserDefined || a.label == b.label)
}

fn cooperation_gene(value: i32) -> Gene {
    Gene::new(
        GeneKind::Cooperation,
        CooperationGene::MIN,
        CooperationGene::MAX,
        value,
    )
}

fn economy_gene(value: i32) -> Gene {
    Gene::new(GeneKind::Economy, EconomyGene::MIN, EconomyGene::MAX, value)
}

fn military_gene(value: i32) -> Gene {
    Gene::new(GeneKind::Military, MilitaryGene::MIN, MilitaryGene::MAX, value)
}

fn libido_gene(value: i32) -> Gene {
    Gene::new(GeneKind::Libido, LIBIDO_MIN, LIBIDO_MAX, value)
}

/// Categorical draw: explicit weights for the first three variants,
/// the last variant takes whatever probability mass remains.
fn draw_category<R: Rng + ?Sized, T: Copy>(rng: &mut R, weights: &[f64; 3], variants: &[T; 4]) -> T {
    let roll = rng.gen::<f64>();
    let mut cumulative = 0.0;
    for (weight, &variant) in weights.iter().zip(variants.iter()) {
        cumulative += weight;
        if roll < cumulative {
            return variant;
        }
    }
    variants[3]
}
