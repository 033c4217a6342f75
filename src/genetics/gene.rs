//! A single bounded, mutable trait.

use super::traits::GeneKind;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for gene mutation
#[derive(Clone, Debug)]
pub struct MutationConfig {
    /// Probability that a mutation event fires at all
    pub mutation_probability: f64,
    /// Given a mutation, probability that it jumps anywhere in range
    pub drastic_probability: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            mutation_probability: 0.1,
            drastic_probability: 0.1,
        }
    }
}

/// Integer trait clamped to `[minimum, maximum]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    kind: GeneKind,
    minimum: i32,
    maximum: i32,
    value: i32,
    last_value: i32,
    description: String,
    /// Name for `GeneKind::UserDefined` genes
    pub label: Option<String>,
    /// Set to false to hold the trait constant across the population
    pub can_mutate: bool,
    /// A dormant gene keeps its value but is not expressed
    pub is_dormant: bool,
}

impl Gene {
    /// Create a gene; `value` is clamped into range.
    pub fn new(kind: GeneKind, minimum: i32, maximum: i32, value: i32) -> Self {
        let (minimum, maximum) = if minimum <= maximum {
            (minimum, maximum)
        } else {
            (maximum, minimum)
        };
        let value = value.clamp(minimum, maximum);

        Self {
            kind,
            minimum,
            maximum,
            value,
            last_value: value,
            description: kind.describe(value),
            label: None,
            can_mutate: true,
            is_dormant: false,
        }
    }

    /// Create a user-defined gene with its own label
    pub fn user_defined(label: &str, minimum: i32, maximum: i32, value: i32) -> Self {
        let mut gene = Self::new(GeneKind::UserDefined, minimum, maximum, value);
        gene.label = Some(label.to_string());
        gene
    }

    #[inline]
    pub fn kind(&self) -> GeneKind {
        self.kind
    }

    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }

    #[inline]
    pub fn last_value(&self) -> i32 {
        self.last_value
    }

    #[inline]
    pub fn minimum(&self) -> i32 {
        self.minimum
    }

    #[inline]
    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.is_dormant
    }

    /// Assign a value, clamped into range. The prior value is kept.
    pub fn set_value(&mut self, value: i32) -> i32 {
        self.last_value = self.value;
        self.value = value.clamp(self.minimum, self.maximum);
        self.description = self.kind.describe(self.value);
        self.value
    }

    pub fn increment(&mut self, delta: i32) -> i32 {
        self.set_value(self.value.saturating_add(delta))
    }

    pub fn decrement(&mut self, delta: i32) -> i32 {
        self.set_value(self.value.saturating_sub(delta))
    }

    /// Possibly mutate: either a ±1 nudge or, rarely, a jump anywhere in range.
    /// Returns true if a mutation event fired.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &MutationConfig) -> bool {
        if !self.can_mutate {
            return false;
        }
        if rng.gen::<f64>() >= config.mutation_probability {
            return false;
        }

        if rng.gen::<f64>() < config.drastic_probability {
            let value = rng.gen_range(self.minimum..=self.maximum);
            self.set_value(value);
        } else {
            let delta = if rng.gen::<f64>() < 0.5 { -1 } else { 1 };
            self.increment(delta);
        }
        true
    }

    /// Independent copy for inheritance: current value fills both slots.
    pub fn create_copy(&self) -> Gene {
        Gene {
            kind: self.kind,
            minimum: self.minimum,
            maximum: self.maximum,
            value: self.value,
            last_value: self.value,
            description: self.description.clone(),
            label: self.label.clone(),
            can_mutate: self.can_mutate,
            is_dormant: self.is_dormant,
        }
    }
}
