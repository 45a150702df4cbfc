//! Lewis-dot connectivity: four bonding sites per atom.
//!
//! Each atom tracks which of its N/E/S/W sites hold a bond and to whom. Joining two
//! molecules is only allowed if, laid out on an integer lattice through those sites,
//! no two atoms would end up on the same lattice point (hydrogens may be tolerated,
//! see [`OverlapTolerance`]).

use std::collections::HashMap;

use glam::IVec2;

use crate::api::config::OverlapTolerance;
use crate::api::types::AtomId;
use crate::core::direction::Direction;
use crate::core::element::Element;
use crate::error::LewisError;

/// What occupies one bonding site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Open,
    Bonded(AtomId),
}

#[derive(Debug, Clone)]
struct LewisDotAtom {
    element: Element,
    slots: [Slot; 4],
}

impl LewisDotAtom {
    fn new(element: Element) -> Self {
        Self {
            element,
            slots: [Slot::Open; 4],
        }
    }

    fn bonded(&self) -> impl Iterator<Item = (Direction, AtomId)> + '_ {
        Direction::ALL.into_iter().filter_map(move |dir| match self.slots[dir.index()] {
            Slot::Bonded(other) => Some((dir, other)),
            Slot::Open => None,
        })
    }
}

/// Per-atom bonding-site records for every atom a kit knows about.
#[derive(Debug, Clone, Default)]
pub struct LewisDotModel {
    atoms: HashMap<AtomId, LewisDotAtom>,
    tolerance: OverlapTolerance,
}

impl LewisDotModel {
    pub fn new(tolerance: OverlapTolerance) -> Self {
        Self {
            atoms: HashMap::new(),
            tolerance,
        }
    }

    /// Register an atom with all four sites open.
    pub fn add_atom(&mut self, atom: AtomId, element: Element) {
        self.atoms.insert(atom, LewisDotAtom::new(element));
    }

    /// Forget an atom, clearing any bonds that point at it.
    pub fn remove_atom(&mut self, atom: AtomId) {
        self.break_bonds_of_atom(atom);
        self.atoms.remove(&atom);
    }

    pub fn contains(&self, atom: AtomId) -> bool {
        self.atoms.contains_key(&atom)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn clear(&mut self) {
        self.atoms.clear();
    }

    fn get(&self, atom: AtomId) -> Result<&LewisDotAtom, LewisError> {
        self.atoms.get(&atom).ok_or(LewisError::UnknownAtom(atom))
    }

    pub fn slot(&self, atom: AtomId, direction: Direction) -> Option<Slot> {
        self.atoms.get(&atom).map(|a| a.slots[direction.index()])
    }

    /// Sites with no bond. Unknown atoms have none.
    pub fn open_directions(&self, atom: AtomId) -> Vec<Direction> {
        match self.atoms.get(&atom) {
            Some(a) => Direction::ALL
                .into_iter()
                .filter(|dir| a.slots[dir.index()] == Slot::Open)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn is_open(&self, atom: AtomId, direction: Direction) -> bool {
        self.slot(atom, direction) == Some(Slot::Open)
    }

    /// Whether `a` may bond to `b` through `a`'s `direction` site (and `b`'s opposite one).
    pub fn will_allow_bond(&self, a: AtomId, direction: Direction, b: AtomId) -> bool {
        if a == b || !self.is_open(a, direction) || !self.is_open(b, direction.opposite()) {
            return false;
        }

        let mut lattice: HashMap<IVec2, AtomId> = HashMap::new();
        self.map_molecule(a, IVec2::ZERO, &mut lattice);

        let mut placed: HashMap<IVec2, AtomId> = HashMap::new();
        self.map_molecule(b, direction.lattice_step(), &mut placed);

        placed.iter().all(|(point, atom)| match lattice.get(point) {
            None => true,
            Some(existing) => self.overlap_permitted(*existing, *atom),
        })
    }

    fn overlap_permitted(&self, a: AtomId, b: AtomId) -> bool {
        match (self.atoms.get(&a), self.atoms.get(&b)) {
            (Some(x), Some(y)) => self.tolerance.permits(x.element.is_hydrogen(), y.element.is_hydrogen()),
            _ => false,
        }
    }

    /// Lay out `start`'s whole molecule on the lattice with `start` at `origin`.
    /// When two atoms land on the same point the first one placed stays.
    fn map_molecule(&self, start: AtomId, origin: IVec2, lattice: &mut HashMap<IVec2, AtomId>) {
        let mut visited = vec![start];
        let mut stack = vec![(start, origin)];
        lattice.entry(origin).or_insert(start);
        while let Some((atom, point)) = stack.pop() {
            let Some(record) = self.atoms.get(&atom) else {
                continue;
            };
            for (dir, other) in record.bonded() {
                if visited.contains(&other) {
                    continue;
                }
                visited.push(other);
                let next = point + dir.lattice_step();
                lattice.entry(next).or_insert(other);
                stack.push((other, next));
            }
        }
    }

    /// Connect `a`'s `direction` site to `b`'s opposite site.
    pub fn bond(&mut self, a: AtomId, direction: Direction, b: AtomId) -> Result<(), LewisError> {
        for (atom, dir) in [(a, direction), (b, direction.opposite())] {
            if self.get(atom)?.slots[dir.index()] != Slot::Open {
                return Err(LewisError::SlotOccupied { atom, direction: dir.name() });
            }
        }
        if let Some(record) = self.atoms.get_mut(&a) {
            record.slots[direction.index()] = Slot::Bonded(b);
        }
        if let Some(record) = self.atoms.get_mut(&b) {
            record.slots[direction.opposite().index()] = Slot::Bonded(a);
        }
        Ok(())
    }

    /// Clear the pair of sites joining `a` and `b`.
    pub fn break_bond(&mut self, a: AtomId, b: AtomId) -> Result<(), LewisError> {
        let direction = self.bond_direction(a, b).ok_or(LewisError::NotBonded(a, b))?;
        self.get(b)?;
        if let Some(record) = self.atoms.get_mut(&a) {
            record.slots[direction.index()] = Slot::Open;
        }
        if let Some(record) = self.atoms.get_mut(&b) {
            record.slots[direction.opposite().index()] = Slot::Open;
        }
        Ok(())
    }

    /// Clear every site of `atom` and the matching sites on its partners.
    pub fn break_bonds_of_atom(&mut self, atom: AtomId) {
        let partners: Vec<(Direction, AtomId)> = match self.atoms.get(&atom) {
            Some(record) => record.bonded().collect(),
            None => return,
        };
        for (dir, other) in partners {
            if let Some(record) = self.atoms.get_mut(&other) {
                record.slots[dir.opposite().index()] = Slot::Open;
            }
        }
        if let Some(record) = self.atoms.get_mut(&atom) {
            record.slots = [Slot::Open; 4];
        }
    }

    /// The site of `a` that holds the bond to `b`.
    pub fn bond_direction(&self, a: AtomId, b: AtomId) -> Option<Direction> {
        let record = self.atoms.get(&a)?;
        Direction::ALL
            .into_iter()
            .find(|dir| record.slots[dir.index()] == Slot::Bonded(b))
    }

    /// Every bonded site mirrors one on its partner.
    pub fn is_consistent(&self) -> bool {
        self.atoms.iter().all(|(id, record)| {
            record.bonded().all(|(dir, other)| {
                self.atoms
                    .get(&other)
                    .map(|o| o.slots[dir.opposite().index()] == Slot::Bonded(*id))
                    .unwrap_or(false)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(elements: &[Element]) -> LewisDotModel {
        let mut m = LewisDotModel::new(OverlapTolerance::BothHydrogen);
        for (i, e) in elements.iter().enumerate() {
            m.add_atom(AtomId(i as u32), *e);
        }
        m
    }

    #[test]
    fn new_atom_has_all_directions_open() {
        let m = model(&[Element::CARBON]);
        assert_eq!(m.open_directions(AtomId(0)), Direction::ALL.to_vec());
        assert!(m.open_directions(AtomId(9)).is_empty());
    }

    #[test]
    fn bond_occupies_opposite_sites() {
        let mut m = model(&[Element::OXYGEN, Element::HYDROGEN]);
        m.bond(AtomId(0), Direction::East, AtomId(1)).unwrap();
        assert_eq!(m.slot(AtomId(0), Direction::East), Some(Slot::Bonded(AtomId(1))));
        assert_eq!(m.slot(AtomId(1), Direction::West), Some(Slot::Bonded(AtomId(0))));
        assert_eq!(m.bond_direction(AtomId(0), AtomId(1)), Some(Direction::East));
        assert_eq!(m.bond_direction(AtomId(1), AtomId(0)), Some(Direction::West));
        assert!(m.is_consistent());
    }

    #[test]
    fn occupied_site_refuses_bond() {
        let mut m = model(&[Element::OXYGEN, Element::HYDROGEN, Element::HYDROGEN]);
        m.bond(AtomId(0), Direction::East, AtomId(1)).unwrap();
        assert!(!m.will_allow_bond(AtomId(0), Direction::East, AtomId(2)));
        let err = m.bond(AtomId(0), Direction::East, AtomId(2)).unwrap_err();
        assert_eq!(err, LewisError::SlotOccupied { atom: AtomId(0), direction: "east" });
    }

    #[test]
    fn break_bond_reopens_sites() {
        let mut m = model(&[Element::OXYGEN, Element::HYDROGEN]);
        m.bond(AtomId(0), Direction::North, AtomId(1)).unwrap();
        m.break_bond(AtomId(1), AtomId(0)).unwrap();
        assert!(m.is_open(AtomId(0), Direction::North));
        assert!(m.is_open(AtomId(1), Direction::South));
        assert_eq!(m.break_bond(AtomId(0), AtomId(1)), Err(LewisError::NotBonded(AtomId(0), AtomId(1))));
    }

    #[test]
    fn break_bonds_of_atom_clears_partners() {
        let mut m = model(&[Element::CARBON, Element::HYDROGEN, Element::HYDROGEN]);
        m.bond(AtomId(0), Direction::North, AtomId(1)).unwrap();
        m.bond(AtomId(0), Direction::South, AtomId(2)).unwrap();
        m.break_bonds_of_atom(AtomId(0));
        assert_eq!(m.open_directions(AtomId(0)).len(), 4);
        assert_eq!(m.open_directions(AtomId(1)).len(), 4);
        assert_eq!(m.open_directions(AtomId(2)).len(), 4);
        assert!(m.is_consistent());
    }

    #[test]
    fn straight_partners_fit_on_the_lattice() {
        // C0-C1 along east, C2-C3 along east
        let mut m = model(&[Element::CARBON, Element::CARBON, Element::CARBON, Element::CARBON]);
        m.bond(AtomId(0), Direction::East, AtomId(1)).unwrap();
        m.bond(AtomId(2), Direction::East, AtomId(3)).unwrap();
        assert!(m.will_allow_bond(AtomId(0), Direction::North, AtomId(2)));
        assert!(m.will_allow_bond(AtomId(1), Direction::North, AtomId(3)));
        assert!(m.will_allow_bond(AtomId(1), Direction::East, AtomId(2)));
        // C1's west site already holds C0
        assert!(!m.will_allow_bond(AtomId(1), Direction::West, AtomId(2)));
    }

    #[test]
    fn bent_partner_clashes_unless_hydrogen() {
        // A: C0 -east- X1. B: C2 -east- C3 -south- X4.
        // Joining C2 north of C0 places X4 on X1's lattice point.
        let mut heavy = model(&[Element::CARBON, Element::CARBON, Element::CARBON, Element::CARBON, Element::CARBON]);
        heavy.bond(AtomId(0), Direction::East, AtomId(1)).unwrap();
        heavy.bond(AtomId(2), Direction::East, AtomId(3)).unwrap();
        heavy.bond(AtomId(3), Direction::South, AtomId(4)).unwrap();
        assert!(!heavy.will_allow_bond(AtomId(0), Direction::North, AtomId(2)));

        let mut light = model(&[Element::CARBON, Element::HYDROGEN, Element::CARBON, Element::CARBON, Element::HYDROGEN]);
        light.bond(AtomId(0), Direction::East, AtomId(1)).unwrap();
        light.bond(AtomId(2), Direction::East, AtomId(3)).unwrap();
        light.bond(AtomId(3), Direction::South, AtomId(4)).unwrap();
        assert!(light.will_allow_bond(AtomId(0), Direction::North, AtomId(2)));
    }

    #[test]
    fn tolerance_never_blocks_hydrogen_overlap() {
        let mut m = LewisDotModel::new(OverlapTolerance::Never);
        for (i, e) in [Element::CARBON, Element::HYDROGEN, Element::CARBON, Element::CARBON, Element::HYDROGEN]
            .iter()
            .enumerate()
        {
            m.add_atom(AtomId(i as u32), *e);
        }
        m.bond(AtomId(0), Direction::East, AtomId(1)).unwrap();
        m.bond(AtomId(2), Direction::East, AtomId(3)).unwrap();
        m.bond(AtomId(3), Direction::South, AtomId(4)).unwrap();
        assert!(!m.will_allow_bond(AtomId(0), Direction::North, AtomId(2)));
    }

    #[test]
    fn remove_atom_unlinks_partner() {
        let mut m = model(&[Element::OXYGEN, Element::HYDROGEN]);
        m.bond(AtomId(0), Direction::West, AtomId(1)).unwrap();
        m.remove_atom(AtomId(1));
        assert!(!m.contains(AtomId(1)));
        assert!(m.is_open(AtomId(0), Direction::West));
        assert_eq!(m.len(), 1);
    }
}
