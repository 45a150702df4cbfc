//! Supply buckets: a grid of slots for atoms of one element.

use glam::Vec2;

use crate::api::types::AtomId;
use crate::core::bounds::Bounds;
use crate::core::element::Element;
use crate::model::atom::{AtomLocation, AtomParticle};

/// Most atoms side by side in one row of a bucket.
const MAX_COLUMNS: usize = 6;
/// Space between the outer slots and the bucket's edge.
const EDGE_MARGIN: f32 = 20.0;

#[derive(Debug, Clone)]
pub struct Bucket {
    element: Element,
    /// Centre of the bucket's bottom edge.
    position: Vec2,
    slots: Vec<Option<AtomId>>,
    columns: usize,
}

impl Bucket {
    pub fn new(element: Element, capacity: usize) -> Self {
        Self {
            element,
            position: Vec2::ZERO,
            slots: vec![None; capacity],
            columns: capacity.clamp(1, MAX_COLUMNS),
        }
    }

    pub fn element(&self) -> Element {
        self.element
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn width(&self) -> f32 {
        self.columns as f32 * self.element.radius() * 2.0 + EDGE_MARGIN * 2.0
    }

    pub fn bounds(&self) -> Bounds {
        let rows = self.slots.len().div_ceil(self.columns).max(1);
        let height = rows as f32 * self.element.radius() * 2.0 + EDGE_MARGIN;
        Bounds::from_rect(self.position.x - self.width() / 2.0, self.position.y, self.width(), height)
    }

    /// Atoms currently sitting in the bucket.
    pub fn atoms(&self) -> impl Iterator<Item = AtomId> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.atoms().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn contains_particle(&self, atom: AtomId) -> bool {
        self.slots.contains(&Some(atom))
    }

    fn slot_position(&self, index: usize) -> Vec2 {
        let radius = self.element.radius();
        let row = index / self.columns;
        let column = index % self.columns;
        let left = self.position.x - self.width() / 2.0 + EDGE_MARGIN;
        Vec2::new(
            left + radius + column as f32 * radius * 2.0,
            self.position.y + radius + row as f32 * radius * 2.0,
        )
    }

    fn place(&mut self, index: usize, atom: &mut AtomParticle, animate: bool) {
        self.slots[index] = Some(atom.id);
        let target = self.slot_position(index);
        if animate {
            atom.destination = target;
        } else {
            atom.set_position_and_destination(target);
        }
        atom.location = AtomLocation::Bucket;
    }

    /// Put `atom` in the lowest-numbered free slot. Returns false if the bucket is full.
    pub fn add_particle_first_open(&mut self, atom: &mut AtomParticle, animate: bool) -> bool {
        match self.slots.iter().position(Option::is_none) {
            Some(index) => {
                self.place(index, atom, animate);
                true
            }
            None => false,
        }
    }

    /// Put `atom` in the free slot closest to where it is now. Returns false if the bucket is full.
    pub fn add_particle_nearest_open(&mut self, atom: &mut AtomParticle, animate: bool) -> bool {
        let nearest = (0..self.slots.len())
            .filter(|&i| self.slots[i].is_none())
            .min_by(|&a, &b| {
                let da = self.slot_position(a).distance_squared(atom.position);
                let db = self.slot_position(b).distance_squared(atom.position);
                da.total_cmp(&db)
            });
        match nearest {
            Some(index) => {
                self.place(index, atom, animate);
                true
            }
            None => false,
        }
    }

    pub fn remove_particle(&mut self, atom: AtomId) -> bool {
        match self.slots.iter().position(|slot| *slot == Some(atom)) {
            Some(index) => {
                self.slots[index] = None;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Move the bucket; atoms in it jump to their new slots.
    pub fn set_position(&mut self, position: Vec2, atoms: &mut [AtomParticle]) {
        self.position = position;
        for index in 0..self.slots.len() {
            if let Some(id) = self.slots[index] {
                let target = self.slot_position(index);
                if let Some(atom) = atoms.get_mut(id.0 as usize) {
                    atom.set_position_and_destination(target);
                }
            }
        }
    }
}
