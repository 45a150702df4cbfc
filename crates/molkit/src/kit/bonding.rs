//! Finding where a dropped molecule could attach.

use glam::Vec2;

use crate::api::types::{AtomId, MoleculeId};
use crate::core::direction::Direction;
use crate::kit::Kit;
use crate::model::atom::AtomParticle;
use crate::model::structure::MoleculeStructure;

/// A possible bond: `b` (in the moving molecule) would attach to `a`'s `direction` site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondingOption {
    pub a: AtomId,
    pub direction: Direction,
    pub b: AtomId,
    /// Where `b` has to sit for the bond.
    pub ideal_location: Vec2,
}

impl BondingOption {
    pub fn new(a: &AtomParticle, direction: Direction, b: &AtomParticle) -> Self {
        Self {
            a: a.id,
            direction,
            b: b.id,
            ideal_location: a.position + direction.vector() * (a.radius() + b.radius()),
        }
    }

    /// How far `b` is from its ideal location right now.
    pub fn distance_from(&self, b: &AtomParticle) -> f32 {
        b.position.distance(self.ideal_location)
    }
}

impl Kit {
    /// Every admissible way for `molecule` to attach to another live molecule.
    pub fn bonding_options(&self, molecule: MoleculeId) -> Vec<BondingOption> {
        let Some(ours) = self.molecule(molecule) else {
            return Vec::new();
        };
        let mut options = Vec::new();
        for our_ref in ours.atoms() {
            let our_atom = &self.atoms[our_ref.id.0 as usize];
            let our_open = self.lewis.open_directions(our_ref.id);
            for other in self.molecules.iter().filter(|m| m.id() != molecule) {
                for other_ref in other.atoms() {
                    if self.is_contained_in_bucket(other_ref.id) || !self.can_bond(our_ref.id, other_ref.id) {
                        continue;
                    }
                    let other_atom = &self.atoms[other_ref.id.0 as usize];
                    for other_direction in self.lewis.open_directions(other_ref.id) {
                        let direction = other_direction.opposite();
                        if !our_open.contains(&direction) {
                            continue;
                        }
                        if !self.lewis.will_allow_bond(our_ref.id, direction, other_ref.id) {
                            continue;
                        }
                        options.push(BondingOption::new(other_atom, other_direction, our_atom));
                    }
                }
            }
        }
        options
    }

    /// The option whose ideal location is closest to its moving atom, with that distance.
    /// Ties keep the first option found.
    pub fn best_bonding_option(&self, molecule: MoleculeId) -> Option<(BondingOption, f32)> {
        self.bonding_options(molecule)
            .into_iter()
            .map(|option| {
                let distance = option.distance_from(&self.atoms[option.b.0 as usize]);
                (option, distance)
            })
            .fold(None, |best: Option<(BondingOption, f32)>, (option, distance)| match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((option, distance)),
            })
    }

    /// Whether `a` and `b` sit in different live molecules that would still form an
    /// allowed structure once joined.
    pub fn can_bond(&self, a: AtomId, b: AtomId) -> bool {
        let (Some(ma), Some(mb)) = (self.molecule_of(a), self.molecule_of(b)) else {
            return false;
        };
        if ma.id() == mb.id() {
            return false;
        }
        let (Some(ia), Some(ib)) = (Self::index_in(ma, a), Self::index_in(mb, b)) else {
            return false;
        };
        match MoleculeStructure::merge(ma, mb, ia, ib, 1, MoleculeId(0)) {
            Ok(combined) => combined.is_allowed_structure(),
            Err(_) => false,
        }
    }
}
