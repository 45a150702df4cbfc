use log::info;

use crate::api::types::{CollectionBoxId, MoleculeId};
use crate::collection::collection_box::CollectionBox;
use crate::error::KitError;
use crate::kit::Kit;
use crate::observe::Property;

/// Kits the user flips between, plus the collection boxes they fill.
#[derive(Debug, Default)]
pub struct KitCollection {
    kits: Vec<Kit>,
    boxes: Vec<CollectionBox>,
    /// Index of the kit on screen.
    pub current_kit: Property<usize>,
    pub all_collection_boxes_filled: Property<bool>,
}

impl KitCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a kit. The first one becomes current and visible.
    pub fn add_kit(&mut self, mut kit: Kit) -> usize {
        if self.kits.is_empty() {
            kit.show();
        } else {
            kit.hide();
        }
        self.kits.push(kit);
        self.kits.len() - 1
    }

    pub fn add_collection_box(&mut self, collection_box: CollectionBox) {
        self.boxes.push(collection_box);
        self.update_all_filled();
    }

    pub fn kits(&self) -> &[Kit] {
        &self.kits
    }

    pub fn kit_mut(&mut self, index: usize) -> Option<&mut Kit> {
        self.kits.get_mut(index)
    }

    pub fn current(&self) -> Option<&Kit> {
        self.kits.get(self.current_kit.value())
    }

    pub fn current_mut(&mut self) -> Option<&mut Kit> {
        let index = self.current_kit.value();
        self.kits.get_mut(index)
    }

    pub fn boxes(&self) -> &[CollectionBox] {
        &self.boxes
    }

    pub fn collection_box(&self, id: CollectionBoxId) -> Option<&CollectionBox> {
        self.boxes.iter().find(|b| b.id() == id)
    }

    pub fn has_previous_kit(&self) -> bool {
        self.current_kit.value() > 0
    }

    pub fn has_next_kit(&self) -> bool {
        self.current_kit.value() + 1 < self.kits.len()
    }

    /// Make kit `index` the visible one. Returns false if there is no such kit.
    pub fn switch_to_kit(&mut self, index: usize) -> bool {
        if index >= self.kits.len() {
            return false;
        }
        let old = self.current_kit.value();
        if let Some(kit) = self.kits.get_mut(old) {
            kit.hide();
        }
        self.kits[index].show();
        self.current_kit.set(index);
        true
    }

    pub fn go_to_next_kit(&mut self) -> bool {
        self.has_next_kit() && self.switch_to_kit(self.current_kit.value() + 1)
    }

    pub fn go_to_previous_kit(&mut self) -> bool {
        self.has_previous_kit() && self.switch_to_kit(self.current_kit.value() - 1)
    }

    /// Move `molecule` from kit `kit_index` into box `box_id` if the box accepts it.
    /// Returns whether the molecule was collected.
    pub fn drop_molecule_on_box(
        &mut self,
        kit_index: usize,
        molecule: MoleculeId,
        box_id: CollectionBoxId,
    ) -> Result<bool, KitError> {
        let kit = self.kits.get_mut(kit_index).ok_or(KitError::UnknownKit(kit_index))?;
        let collection_box = self
            .boxes
            .iter_mut()
            .find(|b| b.id() == box_id)
            .ok_or(KitError::UnknownCollectionBox(box_id))?;
        let live = kit.molecule(molecule).ok_or(KitError::UnknownMolecule(molecule))?;
        if !collection_box.will_allow_molecule_drop(live) {
            return Ok(false);
        }
        kit.molecule_put_in_collection_box(molecule, collection_box)?;
        self.update_all_filled();
        Ok(true)
    }

    /// The first box that would take `molecule` from kit `kit_index`.
    pub fn box_accepting(&self, kit_index: usize, molecule: MoleculeId) -> Option<CollectionBoxId> {
        let live = self.kits.get(kit_index)?.molecule(molecule)?;
        self.boxes
            .iter()
            .find(|b| b.will_allow_molecule_drop(live))
            .map(CollectionBox::id)
    }

    fn update_all_filled(&mut self) {
        let filled = !self.boxes.is_empty() && self.boxes.iter().all(CollectionBox::is_full);
        if filled && !self.all_collection_boxes_filled.value() {
            info!("all {} collection boxes filled", self.boxes.len());
        }
        self.all_collection_boxes_filled.set(filled);
    }

    /// Empty every box, reset every kit and go back to the first kit.
    pub fn reset_all(&mut self) {
        for kit in self.kits.iter_mut() {
            kit.reset_kit();
        }
        for collection_box in self.boxes.iter_mut() {
            collection_box.reset();
        }
        if !self.kits.is_empty() {
            self.switch_to_kit(0);
        }
        self.update_all_filled();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::KitConfig;
    use crate::api::types::AtomId;
    use crate::core::bounds::Bounds;
    use crate::core::element::Element;
    use crate::kit::layout::LayoutBounds;
    use crate::model::complete::CompleteMolecule;
    use glam::Vec2;

    fn layout() -> LayoutBounds {
        LayoutBounds::new(
            Bounds::from_rect(0.0, 0.0, 1000.0, 200.0),
            Bounds::from_rect(0.0, 200.0, 1000.0, 800.0),
        )
    }

    fn hydrogen_kit() -> Kit {
        Kit::new(layout(), &[(Element::HYDROGEN, 2)], KitConfig::default())
    }

    fn h2_box(id: u32) -> CollectionBox {
        let h2 = CompleteMolecule::from_serial2(MoleculeId(900), "molecular hydrogen|H2|783|2d|2|1|H 2.5 0|0|H 3.5 0|1|0-1").unwrap();
        CollectionBox::new(CollectionBoxId(id), h2, 1)
    }

    fn place(kit: &mut Kit, atom: u32, point: Vec2) {
        let delta = point - kit.atoms()[atom as usize].position;
        kit.atom_dragged(AtomId(atom), delta).unwrap();
        kit.atom_dropped(AtomId(atom)).unwrap();
    }

    #[test]
    fn switching_kits_moves_visibility() {
        let mut collection = KitCollection::new();
        collection.add_kit(hydrogen_kit());
        collection.add_kit(hydrogen_kit());
        assert!(collection.kits()[0].visible.value());
        assert!(!collection.kits()[1].visible.value());
        assert!(!collection.has_previous_kit());

        assert!(collection.go_to_next_kit());
        assert!(!collection.go_to_next_kit());
        assert_eq!(collection.current_kit.value(), 1);
        assert!(!collection.kits()[0].visible.value());
        assert!(collection.kits()[1].visible.value());
    }

    #[test]
    fn filling_every_box_sets_flag_and_reset_clears_it() {
        let mut collection = KitCollection::new();
        collection.add_kit(hydrogen_kit());
        collection.add_collection_box(h2_box(0));
        assert!(!collection.all_collection_boxes_filled.value());

        let kit = collection.current_mut().unwrap();
        place(kit, 0, Vec2::new(300.0, 500.0));
        place(kit, 1, Vec2::new(370.0, 500.0));
        let h2 = kit.molecules()[0].id();

        assert_eq!(collection.box_accepting(0, h2), Some(CollectionBoxId(0)));
        assert!(collection.drop_molecule_on_box(0, h2, CollectionBoxId(0)).unwrap());
        assert!(collection.all_collection_boxes_filled.value());
        assert!(collection.current().unwrap().molecules().is_empty());

        collection.reset_all();
        assert!(!collection.all_collection_boxes_filled.value());
        assert_eq!(collection.boxes()[0].quantity.value(), 0);
        collection.current().unwrap().check_invariants().unwrap();
    }

    #[test]
    fn wrong_molecule_is_refused() {
        let mut collection = KitCollection::new();
        collection.add_kit(hydrogen_kit());
        collection.add_collection_box(h2_box(0));
        let kit = collection.current_mut().unwrap();
        place(kit, 0, Vec2::new(300.0, 500.0));
        let lone = kit.molecules()[0].id();
        assert!(!collection.drop_molecule_on_box(0, lone, CollectionBoxId(0)).unwrap());
        assert_eq!(
            collection.drop_molecule_on_box(0, lone, CollectionBoxId(5)),
            Err(KitError::UnknownCollectionBox(CollectionBoxId(5)))
        );
    }

    #[test]
    fn missing_kit_index_is_reported_as_such() {
        let mut collection = KitCollection::new();
        collection.add_kit(hydrogen_kit());
        collection.add_collection_box(h2_box(0));
        assert_eq!(
            collection.drop_molecule_on_box(3, MoleculeId(1), CollectionBoxId(0)),
            Err(KitError::UnknownKit(3))
        );
        assert_eq!(collection.boxes()[0].quantity.value(), 0);
    }
}
