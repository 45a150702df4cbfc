use crate::api::types::{CollectionBoxId, MoleculeId};
use crate::kit::Molecule;
use crate::model::complete::CompleteMolecule;
use crate::observe::Property;

/// Holds up to `capacity` molecules of one catalog type.
#[derive(Debug)]
pub struct CollectionBox {
    id: CollectionBoxId,
    molecule_type: CompleteMolecule,
    capacity: usize,
    molecules: Vec<Molecule>,
    /// Number of molecules currently in the box.
    pub quantity: Property<usize>,
}

impl CollectionBox {
    pub fn new(id: CollectionBoxId, molecule_type: CompleteMolecule, capacity: usize) -> Self {
        Self {
            id,
            molecule_type,
            capacity,
            molecules: Vec::new(),
            quantity: Property::new(0),
        }
    }

    pub fn id(&self) -> CollectionBoxId {
        self.id
    }

    pub fn molecule_type(&self) -> &CompleteMolecule {
        &self.molecule_type
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn is_full(&self) -> bool {
        self.molecules.len() >= self.capacity
    }

    /// Room left and the molecule matches this box's type.
    pub fn will_allow_molecule_drop(&self, molecule: &Molecule) -> bool {
        !self.is_full() && molecule.is_equivalent(&self.molecule_type.structure)
    }

    pub fn add_molecule(&mut self, molecule: Molecule) {
        self.molecules.push(molecule);
        self.quantity.set(self.molecules.len());
    }

    pub fn remove_molecule(&mut self, id: MoleculeId) -> Option<Molecule> {
        let index = self.molecules.iter().position(|m| m.id() == id)?;
        let molecule = self.molecules.remove(index);
        self.quantity.set(self.molecules.len());
        Some(molecule)
    }

    pub fn reset(&mut self) {
        self.molecules.clear();
        self.quantity.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::AtomId;
    use crate::core::element::Element;
    use crate::kit::AtomRef;
    use crate::model::structure::MoleculeStructure;

    fn h2_type() -> CompleteMolecule {
        CompleteMolecule::from_serial2(MoleculeId(900), "molecular hydrogen|H2|783|2d|2|1|H 2.5 0|0|H 3.5 0|1|0-1").unwrap()
    }

    fn live_h2(id: u32, first: u32) -> Molecule {
        let mut m = MoleculeStructure::new(MoleculeId(id));
        m.add_atom(AtomRef { id: AtomId(first), element: Element::HYDROGEN });
        m.add_atom(AtomRef { id: AtomId(first + 1), element: Element::HYDROGEN });
        m.add_bond(0, 1, 1).unwrap();
        m
    }

    #[test]
    fn accepts_matching_molecules_until_full() {
        let mut collection_box = CollectionBox::new(CollectionBoxId(0), h2_type(), 1);
        let h2 = live_h2(1, 0);
        assert!(collection_box.will_allow_molecule_drop(&h2));
        collection_box.add_molecule(h2);
        assert!(collection_box.is_full());
        assert_eq!(collection_box.quantity.value(), 1);
        assert!(!collection_box.will_allow_molecule_drop(&live_h2(2, 2)));
    }

    #[test]
    fn rejects_other_molecules() {
        let collection_box = CollectionBox::new(CollectionBoxId(0), h2_type(), 3);
        let lone = MoleculeStructure::single(MoleculeId(4), AtomRef { id: AtomId(0), element: Element::HYDROGEN });
        assert!(!collection_box.will_allow_molecule_drop(&lone));
    }

    #[test]
    fn remove_and_reset_update_quantity() {
        let mut collection_box = CollectionBox::new(CollectionBoxId(0), h2_type(), 3);
        collection_box.add_molecule(live_h2(1, 0));
        collection_box.add_molecule(live_h2(2, 2));
        assert!(collection_box.remove_molecule(MoleculeId(1)).is_some());
        assert_eq!(collection_box.quantity.value(), 1);
        collection_box.reset();
        assert_eq!(collection_box.quantity.value(), 0);
        assert!(collection_box.molecules().is_empty());
    }
}
