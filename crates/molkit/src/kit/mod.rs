//! A kit: supply buckets of atoms, the molecules built from them in the play area, and
//! the bonding rules that join and split those molecules.
//!
//! Every public handler leaves the partition invariant intact: the atoms of the live
//! molecules are exactly the atoms in play, and no atom belongs to two molecules.
//! Molecule added/removed notifications raised while a handler runs are queued and
//! delivered once, in order, when the handler returns.

pub mod bucket;
pub mod layout;
pub mod separation;
mod bonding;

pub use bonding::BondingOption;

use std::collections::HashMap;

use glam::Vec2;
use log::{debug, info, warn};

use crate::api::config::{KitConfig, KitSetup};
use crate::api::types::{AtomId, CollectionBoxId, MoleculeId};
use crate::collection::collection_box::CollectionBox;
use crate::core::direction::Direction;
use crate::core::element::Element;
use crate::core::rng::Rng;
use crate::error::{ConfigError, KitError};
use crate::model::atom::{AtomLocation, AtomParticle};
use crate::model::lewis::LewisDotModel;
use crate::model::structure::{MoleculeIdAllocator, MoleculeStructure, StructureAtom};
use crate::observe::{Emitter, Property};

use bucket::Bucket;
use layout::LayoutBounds;

/// A kit atom as seen from a molecule structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomRef {
    pub id: AtomId,
    pub element: Element,
}

impl StructureAtom for AtomRef {
    fn element(&self) -> Element {
        self.element
    }
}

/// A live molecule in a kit's play area.
pub type Molecule = MoleculeStructure<AtomRef>;

#[derive(Debug)]
enum MoleculeNotice {
    Added(Molecule),
    Removed(Molecule),
}

#[derive(Debug)]
pub struct Kit {
    config: KitConfig,
    layout: LayoutBounds,
    buckets: Vec<Bucket>,
    /// Every atom of the kit, indexed by `AtomId`.
    atoms: Vec<AtomParticle>,
    molecules: Vec<Molecule>,
    lewis: LewisDotModel,
    removed_molecules: HashMap<MoleculeId, CollectionBoxId>,
    ids: MoleculeIdAllocator,
    rng: Rng,
    pending: Vec<MoleculeNotice>,

    pub visible: Property<bool>,
    /// Set once any molecule has been collected; the view shows "reset kit" from then on.
    pub has_molecules_in_boxes: Property<bool>,
    pub molecule_added: Emitter<Molecule>,
    pub molecule_removed: Emitter<Molecule>,
}

impl Kit {
    /// Build a kit with one bucket per `(element, quantity)` entry. Atom ids are handed out
    /// bucket by bucket, starting at 0.
    pub fn new(layout: LayoutBounds, supply: &[(Element, usize)], config: KitConfig) -> Self {
        let mut atoms = Vec::new();
        let mut buckets = Vec::with_capacity(supply.len());
        for &(element, quantity) in supply {
            let mut bucket = Bucket::new(element, quantity);
            for _ in 0..quantity {
                let mut atom = AtomParticle::new(AtomId(atoms.len() as u32), element);
                bucket.add_particle_first_open(&mut atom, false);
                atoms.push(atom);
            }
            buckets.push(bucket);
        }

        let mut kit = Self {
            layout,
            buckets,
            atoms,
            molecules: Vec::new(),
            lewis: LewisDotModel::new(config.overlap_tolerance),
            removed_molecules: HashMap::new(),
            ids: MoleculeIdAllocator::new(),
            rng: Rng::new(config.seed),
            pending: Vec::new(),
            visible: Property::new(false),
            has_molecules_in_boxes: Property::new(false),
            molecule_added: Emitter::new(),
            molecule_removed: Emitter::new(),
            config,
        };
        kit.rebuild_lewis();
        kit.layout_buckets();
        kit
    }

    pub fn from_setup(setup: &KitSetup) -> Result<Self, ConfigError> {
        let supply = setup
            .buckets
            .iter()
            .map(|b| {
                Element::by_symbol(&b.symbol)
                    .map(|element| (element, b.quantity as usize))
                    .ok_or_else(|| ConfigError::UnknownElement(b.symbol.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(LayoutBounds::from_setup(setup), &supply, setup.config.clone()))
    }

    // -- Accessors --

    pub fn config(&self) -> &KitConfig {
        &self.config
    }

    pub fn layout(&self) -> &LayoutBounds {
        &self.layout
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn atoms(&self) -> &[AtomParticle] {
        &self.atoms
    }

    pub fn atom(&self, id: AtomId) -> Option<&AtomParticle> {
        self.atoms.get(id.0 as usize)
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn molecule(&self, id: MoleculeId) -> Option<&Molecule> {
        self.molecules.iter().find(|m| m.id() == id)
    }

    /// The live molecule containing `atom`.
    pub fn molecule_of(&self, atom: AtomId) -> Option<&Molecule> {
        self.molecule_index_of(atom).map(|index| &self.molecules[index])
    }

    pub fn lewis(&self) -> &LewisDotModel {
        &self.lewis
    }

    /// Collected molecules and the box each went into.
    pub fn removed_molecules(&self) -> &HashMap<MoleculeId, CollectionBoxId> {
        &self.removed_molecules
    }

    pub fn is_atom_in_play(&self, atom: AtomId) -> bool {
        self.molecule_index_of(atom).is_some()
    }

    pub fn is_contained_in_bucket(&self, atom: AtomId) -> bool {
        self.buckets.iter().any(|b| b.contains_particle(atom))
    }

    pub fn bucket_for_element(&self, element: Element) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.element() == element)
    }

    pub fn bond_direction(&self, a: AtomId, b: AtomId) -> Option<Direction> {
        self.lewis.bond_direction(a, b)
    }

    pub fn has_atoms_outside_of_buckets(&self) -> bool {
        !self.molecules.is_empty() || self.has_molecules_in_boxes.value()
    }

    pub fn show(&mut self) {
        self.visible.set(true);
    }

    pub fn hide(&mut self) {
        self.visible.set(false);
    }

    // -- Handlers --

    /// Move `atom` by `delta`; atoms in play drag their whole molecule along. Grabbing an
    /// atom that sits in a bucket takes it out of the bucket.
    pub fn atom_dragged(&mut self, atom: AtomId, delta: Vec2) -> Result<(), KitError> {
        let index = self.atom_index(atom)?;
        match self.atoms[index].location {
            AtomLocation::Bucket => {
                self.take_from_buckets(atom);
                self.atoms[index].location = AtomLocation::Held;
                self.atoms[index].translate_position_and_destination(delta);
            }
            AtomLocation::Held => self.atoms[index].translate_position_and_destination(delta),
            AtomLocation::Play => {
                for member in self.molecule_members(atom) {
                    self.atoms[member.0 as usize].translate_position_and_destination(delta);
                }
            }
            AtomLocation::Collected => warn!("ignoring drag of collected {}", atom),
        }
        Ok(())
    }

    /// Drop `atom` where it is. Inside the kit area it goes back to a bucket (with its whole
    /// molecule if it is in play); anywhere else it joins play and tries to bond. The
    /// remaining molecules are separated either way.
    pub fn atom_dropped(&mut self, atom: AtomId) -> Result<(), KitError> {
        let result = self.handle_drop(atom);
        self.flush_notifications();
        result
    }

    fn handle_drop(&mut self, atom: AtomId) -> Result<(), KitError> {
        let index = self.atom_index(atom)?;
        let particle = &self.atoms[index];
        if particle.location == AtomLocation::Collected {
            warn!("ignoring drop of collected {}", atom);
            return Ok(());
        }
        let was_in_play = particle.location == AtomLocation::Play;
        let dropped_in_kit_area = self.layout.available_kit_bounds.contains_point(particle.position);

        if dropped_in_kit_area {
            if was_in_play {
                let molecule = self.molecule_id_of(atom)?;
                self.recycle_molecule(molecule)?;
            } else {
                self.recycle_atom(atom, true);
            }
        } else if was_in_play {
            let molecule = self.molecule_id_of(atom)?;
            self.try_bond_molecule(molecule)?;
        } else {
            self.add_atom_to_play(atom)?;
        }
        self.separate_molecule_destinations();
        Ok(())
    }

    /// Bond `molecule` to the closest admissible site of another molecule, if one is within
    /// the bonding distance. Returns whether a bond was made.
    pub fn attempt_to_bond_molecule(&mut self, molecule: MoleculeId) -> Result<bool, KitError> {
        let result = self.try_bond_molecule(molecule);
        self.flush_notifications();
        result
    }

    fn try_bond_molecule(&mut self, molecule: MoleculeId) -> Result<bool, KitError> {
        if self.molecule(molecule).is_none() {
            return Err(KitError::UnknownMolecule(molecule));
        }
        let Some((option, distance)) = self.best_bonding_option(molecule) else {
            return Ok(false);
        };
        if distance > self.config.bond_distance_threshold {
            debug!("closest bonding site for {} is {:.1} away, not bonding", molecule, distance);
            return Ok(false);
        }

        let delta = option.ideal_location - self.atoms[option.b.0 as usize].position;
        let moving = self.molecule_members(option.b);
        if !self.bond_atoms(option.a, option.direction, option.b)? {
            return Ok(false);
        }
        for member in moving {
            let atom = &mut self.atoms[member.0 as usize];
            atom.destination = atom.position + delta;
        }
        Ok(true)
    }

    /// Bond `a`'s `direction` site to `b`, merging their molecules.
    ///
    /// Errors if both atoms are already in the same molecule or the Lewis-dot model refuses
    /// the sites. A merged structure that fails validation is logged and dropped: the kit is
    /// left untouched and `Ok(false)` comes back.
    pub fn bond(&mut self, a: AtomId, direction: Direction, b: AtomId) -> Result<bool, KitError> {
        let result = self.bond_atoms(a, direction, b);
        self.flush_notifications();
        result
    }

    fn bond_atoms(&mut self, a: AtomId, direction: Direction, b: AtomId) -> Result<bool, KitError> {
        let index_a = self.molecule_index_of(a).ok_or(KitError::AtomNotInPlay(a))?;
        let index_b = self.molecule_index_of(b).ok_or(KitError::AtomNotInPlay(b))?;
        if index_a == index_b {
            return Err(KitError::CycleDetected {
                a,
                b,
                molecule: self.molecules[index_a].id(),
            });
        }
        if !self.lewis.will_allow_bond(a, direction, b) {
            return Err(KitError::BondNotAllowed { a, b });
        }

        let id = self.ids.next_id();
        let mol_a = &self.molecules[index_a];
        let mol_b = &self.molecules[index_b];
        let atom_a = Self::index_in(mol_a, a).ok_or(KitError::AtomNotInPlay(a))?;
        let atom_b = Self::index_in(mol_b, b).ok_or(KitError::AtomNotInPlay(b))?;
        let merged = MoleculeStructure::merge(mol_a, mol_b, atom_a, atom_b, 1, id)?;

        if !merged.is_valid() {
            warn!("invalid molecule! bonding {} ({}) {} {} ({})", a, mol_a.atoms()[atom_a].element, direction, b, mol_b.atoms()[atom_b].element);
            warn!("A:\n{}", mol_a.debug_dump());
            warn!("B:\n{}", mol_b.debug_dump());
            warn!("combined:\n{}", merged.debug_dump());
            warn!("allowed structure: {}", merged.is_allowed_structure());
            return Ok(false);
        }

        let (id_a, id_b) = (mol_a.id(), mol_b.id());
        self.lewis.bond(a, direction, b)?;
        self.remove_molecule(id_a);
        self.remove_molecule(id_b);

        debug!("created structure: {}", merged.to_serial2());
        if merged.atom_count() > 2 && merged.hydrogen_pairs().next().is_some() {
            warn!("hydrogen bonded to another hydrogen in {}, which is not diatomic hydrogen", merged.id());
        }
        self.add_molecule(merged);
        Ok(true)
    }

    /// Split the molecule holding `a` and `b` at their bond, then push the halves apart.
    pub fn break_bond(&mut self, a: AtomId, b: AtomId) -> Result<(), KitError> {
        let result = self.break_bond_between(a, b);
        self.flush_notifications();
        result
    }

    fn break_bond_between(&mut self, a: AtomId, b: AtomId) -> Result<(), KitError> {
        let index = self.molecule_index_of(a).ok_or(KitError::AtomNotInPlay(a))?;
        let molecule = &self.molecules[index];
        let (Some(atom_a), Some(atom_b)) = (Self::index_in(molecule, a), Self::index_in(molecule, b)) else {
            return Err(KitError::NotBonded(a, b));
        };
        let bond_index = molecule.bond_between(atom_a, atom_b).ok_or(KitError::NotBonded(a, b))?;
        let left_id = self.ids.next_id();
        let right_id = self.ids.next_id();
        let molecule = &self.molecules[index];
        let (left, right) = molecule.split(bond_index, left_id, right_id)?;
        let old_id = molecule.id();

        self.lewis.break_bond(a, b)?;
        self.remove_molecule(old_id);
        self.add_molecule(left);
        self.add_molecule(right);
        self.separate_molecule_destinations();
        Ok(())
    }

    /// Break every bond of `molecule`, leaving each of its atoms as its own molecule in play.
    pub fn break_molecule(&mut self, molecule: MoleculeId) -> Result<(), KitError> {
        let index = self.molecule_position(molecule)?;
        let old = self.remove_molecule_at(index);
        for atom_ref in old.atoms() {
            self.lewis.break_bonds_of_atom(atom_ref.id);
            let id = self.ids.next_id();
            self.add_molecule(Molecule::single(id, *atom_ref));
        }
        self.separate_molecule_destinations();
        self.flush_notifications();
        Ok(())
    }

    /// Send every atom of `molecule` back to its bucket.
    pub fn recycle_molecule_into_buckets(&mut self, molecule: MoleculeId) -> Result<(), KitError> {
        let result = self.recycle_molecule(molecule);
        self.flush_notifications();
        result
    }

    fn recycle_molecule(&mut self, molecule: MoleculeId) -> Result<(), KitError> {
        let index = self.molecule_position(molecule)?;
        let members: Vec<AtomId> = self.molecules[index].atoms().iter().map(|r| r.id).collect();
        for atom in members {
            self.recycle_atom(atom, true);
        }
        self.remove_molecule_at(index);
        Ok(())
    }

    /// Unbond `atom` and put it in the nearest free slot of a bucket for its element.
    fn recycle_atom(&mut self, atom: AtomId, animate: bool) {
        self.lewis.break_bonds_of_atom(atom);
        self.take_from_buckets(atom);
        let particle = &mut self.atoms[atom.0 as usize];
        let element = particle.element;
        for bucket in self.buckets.iter_mut().filter(|b| b.element() == element) {
            if bucket.add_particle_nearest_open(particle, animate) {
                return;
            }
        }
        warn!("no free bucket slot for {} ({})", atom, element);
        particle.location = AtomLocation::Held;
    }

    fn add_atom_to_play(&mut self, atom: AtomId) -> Result<bool, KitError> {
        self.take_from_buckets(atom);
        let particle = &mut self.atoms[atom.0 as usize];
        particle.location = AtomLocation::Play;
        let atom_ref = AtomRef {
            id: atom,
            element: particle.element,
        };
        let id = self.ids.next_id();
        self.add_molecule(Molecule::single(id, atom_ref));
        self.try_bond_molecule(id)
    }

    /// Move a finished molecule into `collection_box`. Its atoms stay owned by the kit but
    /// are hidden and out of play until the kit is reset.
    pub fn molecule_put_in_collection_box(
        &mut self,
        molecule: MoleculeId,
        collection_box: &mut CollectionBox,
    ) -> Result<(), KitError> {
        let index = self.molecule_position(molecule)?;
        info!("You have collected: {}", collection_box.molecule_type().common_name());
        let removed = self.remove_molecule_at(index);
        for atom_ref in removed.atoms() {
            let atom = &mut self.atoms[atom_ref.id.0 as usize];
            atom.location = AtomLocation::Collected;
            atom.visible = false;
        }
        self.removed_molecules.insert(removed.id(), collection_box.id());
        collection_box.add_molecule(removed);
        self.flush_notifications();
        self.has_molecules_in_boxes.set(true);
        Ok(())
    }

    /// Put every atom back into a bucket, including collected ones, and start over with no
    /// molecules and a fresh Lewis-dot model. Collection boxes keep what they hold.
    pub fn reset_kit(&mut self) {
        while let Some(last) = self.molecules.len().checked_sub(1) {
            self.remove_molecule_at(last);
        }

        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
        for atom in self.atoms.iter_mut() {
            atom.reset();
            let element = atom.element;
            let placed = self
                .buckets
                .iter_mut()
                .filter(|b| b.element() == element)
                .any(|b| b.add_particle_first_open(atom, false));
            if !placed {
                warn!("no bucket room for {} during reset", atom.id);
            }
        }

        self.removed_molecules.clear();
        self.rebuild_lewis();
        info!("kit reset: {} atoms back in {} buckets", self.atoms.len(), self.buckets.len());
        self.flush_notifications();
        self.has_molecules_in_boxes.reset();
    }

    /// Advance every atom toward its destination. Returns true while anything is still moving.
    pub fn step(&mut self, dt: f32) -> bool {
        let speed = self.config.atom_speed;
        let mut moving = false;
        for atom in self.atoms.iter_mut() {
            moving |= atom.step_toward_destination(dt, speed);
        }
        moving
    }

    /// Line the buckets up left to right, centred in the kit area. Their atoms move with them.
    pub fn layout_buckets(&mut self) {
        let kit_bounds = self.layout.available_kit_bounds;
        let kit_y = kit_bounds.center().y - 20.0;
        let padding = self.config.bucket_padding;

        let used_width: f32 = self.buckets.iter().map(Bucket::width).sum::<f32>()
            + padding * self.buckets.len().saturating_sub(1) as f32;

        let mut x = kit_bounds.center().x - used_width / 2.0;
        for bucket in self.buckets.iter_mut() {
            let width = bucket.width();
            bucket.set_position(Vec2::new(x + width / 2.0, kit_y), &mut self.atoms);
            x += width + padding;
        }
    }

    /// Check the kit's structural invariants: every molecule is connected, atoms in play
    /// belong to exactly one molecule, bucket atoms sit in a bucket, and Lewis-dot sites
    /// mirror each other.
    pub fn check_invariants(&self) -> Result<(), KitError> {
        let violation = |message: String| Err(KitError::InvariantViolated(message));
        let mut owners = vec![0usize; self.atoms.len()];
        for molecule in &self.molecules {
            if !molecule.is_connected() {
                return violation(format!("{} is not connected", molecule.id()));
            }
            for atom_ref in molecule.atoms() {
                let Some(atom) = self.atoms.get(atom_ref.id.0 as usize) else {
                    return violation(format!("{} holds unknown {}", molecule.id(), atom_ref.id));
                };
                if atom.location != AtomLocation::Play {
                    return violation(format!("{} is in {} but not in play", atom.id, molecule.id()));
                }
                owners[atom_ref.id.0 as usize] += 1;
            }
        }
        for (atom, owner_count) in self.atoms.iter().zip(&owners) {
            match atom.location {
                AtomLocation::Play if *owner_count != 1 => {
                    return violation(format!("{} is in play but in {} molecules", atom.id, owner_count));
                }
                AtomLocation::Bucket if !self.is_contained_in_bucket(atom.id) => {
                    return violation(format!("{} is marked as in a bucket but no bucket holds it", atom.id));
                }
                _ => {}
            }
        }
        if !self.lewis.is_consistent() {
            return violation("Lewis-dot sites are not mirrored".to_string());
        }
        Ok(())
    }

    // -- Internals --

    fn atom_index(&self, atom: AtomId) -> Result<usize, KitError> {
        let index = atom.0 as usize;
        if index < self.atoms.len() {
            Ok(index)
        } else {
            Err(KitError::UnknownAtom(atom))
        }
    }

    fn molecule_index_of(&self, atom: AtomId) -> Option<usize> {
        self.molecules
            .iter()
            .position(|m| m.atoms().iter().any(|r| r.id == atom))
    }

    fn molecule_id_of(&self, atom: AtomId) -> Result<MoleculeId, KitError> {
        self.molecule_of(atom).map(|m| m.id()).ok_or(KitError::AtomNotInPlay(atom))
    }

    fn molecule_position(&self, molecule: MoleculeId) -> Result<usize, KitError> {
        self.molecules
            .iter()
            .position(|m| m.id() == molecule)
            .ok_or(KitError::UnknownMolecule(molecule))
    }

    /// Index of `atom` inside `molecule`.
    fn index_in(molecule: &Molecule, atom: AtomId) -> Option<usize> {
        molecule.atoms().iter().position(|r| r.id == atom)
    }

    /// Atoms sharing a molecule with `atom`, itself included. Just `atom` when not in play.
    fn molecule_members(&self, atom: AtomId) -> Vec<AtomId> {
        match self.molecule_of(atom) {
            Some(molecule) => molecule.atoms().iter().map(|r| r.id).collect(),
            None => vec![atom],
        }
    }

    fn take_from_buckets(&mut self, atom: AtomId) {
        for bucket in self.buckets.iter_mut() {
            bucket.remove_particle(atom);
        }
    }

    fn rebuild_lewis(&mut self) {
        self.lewis = LewisDotModel::new(self.config.overlap_tolerance);
        for atom in &self.atoms {
            self.lewis.add_atom(atom.id, atom.element);
        }
    }

    fn add_molecule(&mut self, molecule: Molecule) {
        self.pending.push(MoleculeNotice::Added(molecule.clone()));
        self.molecules.push(molecule);
    }

    fn remove_molecule(&mut self, id: MoleculeId) -> Option<Molecule> {
        let index = self.molecules.iter().position(|m| m.id() == id)?;
        Some(self.remove_molecule_at(index))
    }

    fn remove_molecule_at(&mut self, index: usize) -> Molecule {
        let molecule = self.molecules.remove(index);
        self.pending.push(MoleculeNotice::Removed(molecule.clone()));
        molecule
    }

    fn flush_notifications(&mut self) {
        for notice in std::mem::take(&mut self.pending) {
            match notice {
                MoleculeNotice::Added(molecule) => self.molecule_added.emit(&molecule),
                MoleculeNotice::Removed(molecule) => self.molecule_removed.emit(&molecule),
            }
        }
    }
}
