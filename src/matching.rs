//! Group-compatibility matching and the bounded vicinity search.
//!
//! There is no geography: an organism's "vicinity" is a fixed number of
//! random draws from the live roster. The same search finds theft victims.

use crate::genetics::{EconomyGene, MilitaryGene};
use crate::group::Group;
use crate::organism::Organism;
use crate::world::World;
use rand::Rng;

/// Economy acceptance (0-100) of the row posture towards the column posture.
/// Order: Worker, Survivor, Thief, Fungal.
pub const ECONOMY_AFFINITY: [[f64; 4]; 4] = [
    [100.0, 20.0, 0.0, 5.0],
    [20.0, 100.0, 0.0, 5.0],
    [0.0, 0.0, 100.0, 20.0],
    [100.0, 100.0, 100.0, 100.0],
];

/// Military acceptance (0-100) of the row posture towards the column posture.
/// Order: NonMilitant, Passive, Proactive, Offender.
pub const MILITARY_AFFINITY: [[f64; 4]; 4] = [
    [100.0, 50.0, 5.0, 0.0],
    [90.0, 100.0, 10.0, 0.0],
    [70.0, 80.0, 100.0, 10.0],
    [0.0, 0.0, 20.0, 100.0],
];

pub fn economy_affinity(own: EconomyGene, other: EconomyGene) -> f64 {
    ECONOMY_AFFINITY[(own.value() - 1) as usize][(other.value() - 1) as usize]
}

pub fn military_affinity(own: MilitaryGene, other: MilitaryGene) -> f64 {
    MILITARY_AFFINITY[(own.value() - 1) as usize][(other.value() - 1) as usize]
}

/// What the matcher needs to know about one side of an encounter
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Party {
    pub cooperative: bool,
    pub grouped: bool,
    /// The group's posture when grouped, else the organism's own
    pub economy: Option<EconomyGene>,
    pub military: Option<MilitaryGene>,
}

impl Party {
    pub fn of(organism: &Organism, groups: &[Group]) -> Self {
        let group = organism.group.and_then(|id| groups.get(id.0 as usize));
        let (economy, military) = match group {
            Some(group) => (group.economy_posture(), group.military_posture()),
            None => (organism.economy(), organism.military()),
        };
        Self {
            cooperative: organism.is_cooperative(),
            grouped: organism.in_group(),
            economy,
            military,
        }
    }

    /// Economy and military acceptance of `other`, each 0-100
    fn scores(&self, other: &Party) -> (f64, f64) {
        let economy = match (self.economy, other.economy) {
            (Some(a), Some(b)) => economy_affinity(a, b),
            _ => 0.0,
        };
        let military = match (self.military, other.military) {
            (Some(a), Some(b)) => military_affinity(a, b),
            _ => 0.0,
        };
        (economy, military)
    }
}

/// Symmetric compatibility predicate.
///
/// Both sides must score the other non-zero on both dimensions, then each
/// accepts independently with probability `(economy + military) / 200`.
pub fn are_matched<R: Rng + ?Sized>(rng: &mut R, seeker: &Party, candidate: &Party) -> bool {
    if !candidate.cooperative {
        return false;
    }
    if seeker.grouped && candidate.grouped {
        return false;
    }

    let (seeker_economy, seeker_military) = seeker.scores(candidate);
    let (candidate_economy, candidate_military) = candidate.scores(seeker);
    if [seeker_economy, seeker_military, candidate_economy, candidate_military].contains(&0.0) {
        return false;
    }

    let seeker_acceptance = (seeker_economy + seeker_military) / 200.0;
    let candidate_acceptance = (candidate_economy + candidate_military) / 200.0;

    let seeker_accepts = rng.gen::<f64>() < seeker_acceptance;
    let candidate_accepts = rng.gen::<f64>() < candidate_acceptance;
    seeker_accepts && candidate_accepts
}

/// Up to `draws` uniform picks of a roster index other than `seeker`.
/// Returns the first index `accept` agrees to.
pub fn vicinity_search<R, F>(
    rng: &mut R,
    population: usize,
    seeker: usize,
    draws: usize,
    mut accept: F,
) -> Option<usize>
where
    R: Rng + ?Sized,
    F: FnMut(&mut R, usize) -> bool,
{
    if population < 2 {
        return None;
    }
    for _ in 0..draws {
        // Draw from everyone but the seeker
        let mut index = rng.gen_range(0..population - 1);
        if index >= seeker {
            index += 1;
        }
        if accept(rng, index) {
            return Some(index);
        }
    }
    None
}

impl World {
    /// Look for a live, compatible partner for the organism at `seeker`
    pub fn search_for_similar_individual(&mut self, seeker: usize) -> Option<usize> {
        let organisms = &self.organisms;
        let seeker_party = Party::of(&organisms[seeker], &self.groups);
        let groups = &self.groups;

        vicinity_search(
            &mut self.rng,
            organisms.len(),
            seeker,
            self.config.world.search_draws(),
            |rng, index| {
                let candidate = &organisms[index];
                candidate.is_alive() && are_matched(rng, &seeker_party, &Party::of(candidate, groups))
            },
        )
    }
}
