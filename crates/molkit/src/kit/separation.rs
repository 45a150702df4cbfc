//! Pushing molecule destinations apart so they do not overlap on screen.

use glam::Vec2;

use crate::core::bounds::Bounds;
use crate::kit::{Kit, Molecule};
use crate::model::atom::AtomParticle;

/// Union of the atoms' circles around their destinations.
pub fn destination_bounds(molecule: &Molecule, atoms: &[AtomParticle]) -> Bounds {
    molecule.atoms().iter().fold(Bounds::NOTHING, |bounds, atom_ref| {
        let atom = &atoms[atom_ref.id.0 as usize];
        bounds.union(&Bounds::around(atom.destination, atom.radius()))
    })
}

/// Move every atom's destination by `delta`.
pub fn shift_destination(molecule: &Molecule, atoms: &mut [AtomParticle], delta: Vec2) {
    for atom_ref in molecule.atoms() {
        atoms[atom_ref.id.0 as usize].destination += delta;
    }
}

/// Share of a push that goes to the second molecule of a pair.
pub fn push_ratio(weight_a: f32, weight_b: f32, power: f32) -> f32 {
    let a = weight_a.powf(power);
    let b = weight_b.powf(power);
    if a + b > 0.0 {
        a / (a + b)
    } else {
        0.5
    }
}

impl Kit {
    fn padded_destination_bounds(&self, index: usize) -> Bounds {
        destination_bounds(&self.molecules[index], &self.atoms).padded(self.config.inter_molecule_padding)
    }

    /// Nudge destinations until no two padded molecules overlap and all stay inside the
    /// play area, or the round limit is hit. Returns the number of rounds used.
    pub fn separate_molecule_destinations(&mut self) -> u32 {
        let play = self.layout.available_play_area_bounds;
        let push_amount = self.config.push_amount;
        let push_power = self.config.push_power;
        let count = self.molecules.len();

        let mut rounds = 0;
        let mut found_overlap = true;
        while found_overlap && rounds < self.config.max_separation_iterations {
            rounds += 1;
            found_overlap = false;
            for i in 0..count {
                let mut a_bounds = self.clamp_into(i, play);

                for k in 0..count {
                    if self.molecules[i].id() >= self.molecules[k].id() {
                        continue;
                    }
                    let b_bounds = self.padded_destination_bounds(k);
                    if !a_bounds.intersects(&b_bounds) {
                        continue;
                    }
                    found_overlap = true;

                    let a_center = a_bounds.center() + Vec2::new(self.rng.jitter(), self.rng.jitter());
                    let b_center = b_bounds.center() + Vec2::new(self.rng.jitter(), self.rng.jitter());
                    let delta = (b_center - a_center).normalize_or_zero() * push_amount;

                    let ratio = push_ratio(
                        self.molecules[i].approximate_molecular_weight(),
                        self.molecules[k].approximate_molecular_weight(),
                        push_power,
                    );
                    shift_destination(&self.molecules[k], &mut self.atoms, delta * ratio);
                    shift_destination(&self.molecules[i], &mut self.atoms, -delta * (1.0 - ratio));

                    a_bounds = self.padded_destination_bounds(i);
                }
            }
        }
        if found_overlap {
            log::debug!("separation stopped after {} rounds with overlap left", rounds);
        }
        rounds
    }

    /// Shift molecule `index` back inside `play`, one edge at a time. Returns its new padded bounds.
    fn clamp_into(&mut self, index: usize, play: Bounds) -> Bounds {
        let mut bounds = self.padded_destination_bounds(index);
        let corrections: [fn(&Bounds, &Bounds) -> Vec2; 4] = [
            |b: &Bounds, p: &Bounds| Vec2::new((p.min.x - b.min.x).max(0.0), 0.0),
            |b: &Bounds, p: &Bounds| Vec2::new((p.max.x - b.max.x).min(0.0), 0.0),
            |b: &Bounds, p: &Bounds| Vec2::new(0.0, (p.min.y - b.min.y).max(0.0)),
            |b: &Bounds, p: &Bounds| Vec2::new(0.0, (p.max.y - b.max.y).min(0.0)),
        ];
        for correction in corrections {
            let shift = correction(&bounds, &play);
            if shift != Vec2::ZERO {
                shift_destination(&self.molecules[index], &mut self.atoms, shift);
                bounds = self.padded_destination_bounds(index);
            }
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::KitConfig;
    use crate::api::types::AtomId;
    use crate::core::element::Element;
    use crate::kit::layout::LayoutBounds;

    #[test]
    fn crowded_play_area_stops_at_round_limit() {
        let layout = LayoutBounds::new(
            Bounds::from_rect(0.0, 0.0, 300.0, 200.0),
            Bounds::from_rect(0.0, 200.0, 300.0, 300.0),
        );
        let config = KitConfig {
            max_separation_iterations: 7,
            bond_distance_threshold: 0.0,
            ..KitConfig::default()
        };
        let mut kit = Kit::new(layout, &[(Element::OXYGEN, 3)], config);
        for atom in 0..3 {
            let delta = Vec2::new(150.0, 350.0) - kit.atoms()[atom as usize].position;
            kit.atom_dragged(AtomId(atom), delta).unwrap();
            kit.atom_dropped(AtomId(atom)).unwrap();
        }
        assert_eq!(kit.molecules().len(), 3);
        assert_eq!(kit.separate_molecule_destinations(), 7);
    }

    #[test]
    fn heavier_side_gets_smaller_share() {
        // ratio is the share applied to B; A moves by 1 - ratio
        let ratio = push_ratio(200.0, 2.0, 1.0);
        assert!(ratio > 0.95);
        assert!((1.0 - ratio) < ratio);
        assert_eq!(push_ratio(3.0, 3.0, 1.0), 0.5);
        assert_eq!(push_ratio(0.0, 0.0, 1.0), 0.5);
    }

    #[test]
    fn power_flattens_ratio() {
        let linear = push_ratio(16.0, 1.0, 1.0);
        let rooted = push_ratio(16.0, 1.0, 0.5);
        assert!(rooted < linear);
        assert!((rooted - 0.8).abs() < 1e-6);
    }
}
