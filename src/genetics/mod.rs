//! Genetics module - genes, trait categories and genome assembly.

pub mod gene;
pub mod genome;
pub mod traits;

pub use gene::{Gene, MutationConfig};
pub use genome::Genome;
pub use traits::{CooperationGene, EconomyGene, GeneKind, MilitaryGene, PostureProfile};
