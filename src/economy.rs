//! World resource pool: foraging draws and end-of-period settlement.
//!
//! Foraging does not touch the level directly. Draws accumulate as
//! cultivation and are netted against the pool once per period, so the
//! order organisms act in does not decide who finds food first.

use crate::config::WorldConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Seasonal factor in `[0, 2]`: two sine waves of different periods, shifted up
pub fn seasonal_factor(time: u64, long_period: f64, short_period: f64) -> f64 {
    let t = time as f64;
    let long = (2.0 * PI * t / long_period).sin();
    let short = (2.0 * PI * t / short_period).sin();
    (long + short + 2.0) / 2.0
}

/// Replenishment before the minimum floor
pub fn calculated_replenishment(time: u64, config: &WorldConfig) -> f64 {
    seasonal_factor(time, config.long_cycle_period, config.short_cycle_period) * config.replenishment_mean
}

/// Replenishment for one period, floored at the configured minimum
pub fn replenishment(time: u64, config: &WorldConfig) -> f64 {
    calculated_replenishment(time, config).max(config.replenishment_minimum)
}

/// Outcome of one settlement
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Settlement {
    pub cultivation: f64,
    pub calculated_replenishment: f64,
    /// Replenishment that fit under the ceiling
    pub actual_replenishment: f64,
    pub level: f64,
}

/// The global resource pool
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourcePool {
    level: f64,
    ceiling: f64,
    cultivation: f64,
}

impl ResourcePool {
    pub fn new(level: f64, ceiling: f64) -> Self {
        let ceiling = ceiling.max(0.0);
        Self {
            level: level.clamp(0.0, ceiling),
            ceiling,
            cultivation: 0.0,
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.initial_resource_level, config.max_resource_level)
    }

    #[inline]
    pub fn level(&self) -> f64 {
        self.level
    }

    #[inline]
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Drawn so far this period
    #[inline]
    pub fn cultivation(&self) -> f64 {
        self.cultivation
    }

    /// What is left after this period's draws
    pub fn remaining(&self) -> f64 {
        (self.level - self.cultivation).max(0.0)
    }

    /// Resolve one foraging attempt.
    ///
    /// The forager gets the smaller of its per-capita share and `request`,
    /// scaled by a symmetric luck factor, then clamped to `request` and to
    /// what remains of the pool. The yield is added to cultivation.
    pub fn forage<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        population: usize,
        request: f64,
        luck_variation: f64,
    ) -> f64 {
        if population == 0 || request <= 0.0 {
            return 0.0;
        }
        let share = self.level / population as f64;
        let base = share.min(request);
        let luck = 1.0 + luck_variation * (2.0 * rng.gen::<f64>() - 1.0);

        let found = (base * luck).clamp(0.0, request).min(self.remaining());
        self.cultivation += found;
        found
    }

    /// Net cultivation against the pool, reset it, then replenish
    pub fn settle(&mut self, time: u64, config: &WorldConfig) -> Settlement {
        let cultivation = self.cultivation;
        self.level = (self.level - cultivation).max(0.0);
        self.cultivation = 0.0;

        let calculated = calculated_replenishment(time, config);
        let amount = calculated.max(config.replenishment_minimum);
        let before = self.level;
        self.level = (self.level + amount).min(self.ceiling);

        Settlement {
            cultivation,
            calculated_replenishment: calculated,
            actual_replenishment: self.level - before,
            level: self.level,
        }
    }
}
