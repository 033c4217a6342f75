//! Gene categories and the postures they encode.
//!
//! Economy and military values are stored on genes as plain integers so they can
//! mutate by ±1, but behavior always goes through the tagged variants here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category tag carried by every gene
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GeneKind {
    /// Caller-defined trait, described by the gene's own label
    UserDefined,
    Cooperation,
    Economy,
    Military,
    Libido,
}

impl GeneKind {
    /// Human-readable description of a value of this kind
    pub fn describe(&self, value: i32) -> String {
        match self {
            GeneKind::Cooperation => CooperationGene::from_value(value)
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            GeneKind::Economy => EconomyGene::from_value(value)
                .map(|e| e.name().to_string())
                .unwrap_or_default(),
            GeneKind::Military => MilitaryGene::from_value(value)
                .map(|m| m.name().to_string())
                .unwrap_or_default(),
            GeneKind::Libido => value.to_string(),
            GeneKind::UserDefined => String::new(),
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            GeneKind::UserDefined => "UserDefined",
            GeneKind::Cooperation => "Cooperation",
            GeneKind::Economy => "Economy",
            GeneKind::Military => "Military",
            GeneKind::Libido => "Libido",
        }
    }
}

/// Whether an organism seeks company
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CooperationGene {
    /// Works alone, never forms or joins a group
    Solo = 1,
    /// Forms or joins groups and shares their pool
    Cooperative = 2,
}

impl CooperationGene {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 2;

    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(CooperationGene::Solo),
            2 => Some(CooperationGene::Cooperative),
            _ => None,
        }
    }

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn name(&self) -> &'static str {
        match self {
            CooperationGene::Solo => "Solo",
            CooperationGene::Cooperative => "Cooperative",
        }
    }
}

/// How an organism obtains resources
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EconomyGene {
    /// Forages only, never steals
    Worker = 1,
    /// Forages first, steals when starving
    Survivor = 2,
    /// Steals first, forages when the theft yields nothing
    Thief = 3,
    /// Free-rider: idles when resourced or grouped
    Fungal = 4,
}

impl EconomyGene {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 4;
    pub const ALL: [EconomyGene; 4] = [
        EconomyGene::Worker,
        EconomyGene::Survivor,
        EconomyGene::Thief,
        EconomyGene::Fungal,
    ];

    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(EconomyGene::Worker),
            2 => Some(EconomyGene::Survivor),
            3 => Some(EconomyGene::Thief),
            4 => Some(EconomyGene::Fungal),
            _ => None,
        }
    }

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn name(&self) -> &'static str {
        match self {
            EconomyGene::Worker => "Worker",
            EconomyGene::Survivor => "Survivor",
            EconomyGene::Thief => "Thief",
            EconomyGene::Fungal => "Fungal",
        }
    }
}

/// Defensive/offensive posture
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MilitaryGene {
    NonMilitant = 1,
    Passive = 2,
    Proactive = 3,
    Offender = 4,
}

/// Behavior parameters attached to a military posture.
///
/// Percentages are on a 0-100 scale, matching the stealing rolls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostureProfile {
    /// Chance that a starving survivor attempts a theft at all
    pub survivor_steal_percentage: f64,
    /// Extra kill window added on top of the theft success window
    pub kill_percentage: f64,
    /// Power gained per period of training
    pub training_increment: f64,
    /// Age from which training counts; `None` never trains
    pub training_min_age: Option<u64>,
}

const NON_MILITANT_PROFILE: PostureProfile = PostureProfile {
    survivor_steal_percentage: 0.0,
    kill_percentage: 0.0,
    training_increment: 0.0,
    training_min_age: None,
};

const PASSIVE_PROFILE: PostureProfile = PostureProfile {
    survivor_steal_percentage: 10.0,
    kill_percentage: 0.001,
    training_increment: 1.0,
    training_min_age: Some(15),
};

const PROACTIVE_PROFILE: PostureProfile = PostureProfile {
    survivor_steal_percentage: 50.0,
    kill_percentage: 0.005,
    training_increment: 1.2,
    training_min_age: Some(10),
};

const OFFENDER_PROFILE: PostureProfile = PostureProfile {
    survivor_steal_percentage: 90.0,
    kill_percentage: 0.02,
    training_increment: 1.4,
    training_min_age: Some(5),
};

/// Attempt percentage for thieves and militant free-riders
pub const FULL_STEAL_PERCENTAGE: f64 = 100.0;

impl MilitaryGene {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 4;
    pub const ALL: [MilitaryGene; 4] = [
        MilitaryGene::NonMilitant,
        MilitaryGene::Passive,
        MilitaryGene::Proactive,
        MilitaryGene::Offender,
    ];

    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(MilitaryGene::NonMilitant),
            2 => Some(MilitaryGene::Passive),
            3 => Some(MilitaryGene::Proactive),
            4 => Some(MilitaryGene::Offender),
            _ => None,
        }
    }

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn name(&self) -> &'static str {
        match self {
            MilitaryGene::NonMilitant => "NonMilitant",
            MilitaryGene::Passive => "Passive",
            MilitaryGene::Proactive => "Proactive",
            MilitaryGene::Offender => "Offender",
        }
    }

    /// Static behavior table for this posture
    pub fn profile(&self) -> &'static PostureProfile {
        match self {
            MilitaryGene::NonMilitant => &NON_MILITANT_PROFILE,
            MilitaryGene::Passive => &PASSIVE_PROFILE,
            MilitaryGene::Proactive => &PROACTIVE_PROFILE,
            MilitaryGene::Offender => &OFFENDER_PROFILE,
        }
    }

    pub fn is_militant(&self) -> bool {
        *self != MilitaryGene::NonMilitant
    }
}

impl fmt::Display for EconomyGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for MilitaryGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
