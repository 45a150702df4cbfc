//! Molecule structures: one connected component of atoms and bonds.
//!
//! A structure never changes shape in place once it is live in a kit. Bonding two
//! structures builds a merged one, breaking a bond builds two new ones.

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

use crate::api::types::MoleculeId;
use crate::core::element::Element;
use crate::error::StructureError;

/// Anything that can sit in a structure. Only the element matters to chemistry rules.
pub trait StructureAtom: Clone {
    fn element(&self) -> Element;
}

/// A bare element is the simplest atom, used for structures with no coordinates or identity.
impl StructureAtom for Element {
    fn element(&self) -> Element {
        *self
    }
}

/// A bond between the atoms at indices `a` and `b` of the owning structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
    /// 1 = single, 2 = double, ...
    pub order: u8,
}

impl Bond {
    pub fn new(a: usize, b: usize, order: u8) -> Self {
        Self { a, b, order }
    }

    /// Check if this bond connects the given atoms (order-independent).
    pub fn connects(&self, a: usize, b: usize) -> bool {
        (self.a == a && self.b == b) || (self.a == b && self.b == a)
    }

    pub fn contains(&self, i: usize) -> bool {
        self.a == i || self.b == i
    }

    /// The endpoint opposite `i`, if `i` is an endpoint.
    pub fn other(&self, i: usize) -> Option<usize> {
        if self.a == i {
            Some(self.b)
        } else if self.b == i {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Hands out molecule ids in increasing order. Each kit owns one.
#[derive(Debug, Clone)]
pub struct MoleculeIdAllocator {
    next: u32,
}

impl MoleculeIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Generate the next unique molecule ID.
    pub fn next_id(&mut self) -> MoleculeId {
        let id = MoleculeId(self.next);
        self.next += 1;
        id
    }
}

impl Default for MoleculeIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// A set of atoms and the bonds between them.
#[derive(Debug, Clone)]
pub struct MoleculeStructure<A> {
    id: MoleculeId,
    atoms: Vec<A>,
    bonds: Vec<Bond>,
}

impl<A: StructureAtom> MoleculeStructure<A> {
    /// An empty structure. Used when building one atom by atom (e.g. while parsing).
    pub fn new(id: MoleculeId) -> Self {
        Self {
            id,
            atoms: Vec::new(),
            bonds: Vec::new(),
        }
    }

    pub fn with_capacity(id: MoleculeId, atom_count: usize, bond_count: usize) -> Self {
        Self {
            id,
            atoms: Vec::with_capacity(atom_count),
            bonds: Vec::with_capacity(bond_count),
        }
    }

    /// A structure holding one unbonded atom.
    pub fn single(id: MoleculeId, atom: A) -> Self {
        Self {
            id,
            atoms: vec![atom],
            bonds: Vec::new(),
        }
    }

    pub fn id(&self) -> MoleculeId {
        self.id
    }

    pub fn atoms(&self) -> &[A] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Append an atom, returning its index.
    pub fn add_atom(&mut self, atom: A) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    /// Append a bond between two existing atoms, returning its index.
    pub fn add_bond(&mut self, a: usize, b: usize, order: u8) -> Result<usize, StructureError> {
        let len = self.atoms.len();
        for index in [a, b] {
            if index >= len {
                return Err(StructureError::AtomIndexOutOfRange { index, len });
            }
        }
        self.bonds.push(Bond::new(a, b, order));
        Ok(self.bonds.len() - 1)
    }

    /// Indices of atoms bonded to atom `i`.
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.bonds.iter().filter_map(move |bond| bond.other(i))
    }

    /// Number of bonds touching atom `i`.
    pub fn degree(&self, i: usize) -> usize {
        self.bonds.iter().filter(|bond| bond.contains(i)).count()
    }

    /// Index of the bond between atoms `a` and `b`.
    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.bonds.iter().position(|bond| bond.connects(a, b))
    }

    /// Combine two structures with a new bond between `atom_a` (in `a`) and `atom_b` (in `b`).
    /// The result lists `a`'s atoms first, then `b`'s.
    pub fn merge(
        a: &Self,
        b: &Self,
        atom_a: usize,
        atom_b: usize,
        order: u8,
        id: MoleculeId,
    ) -> Result<Self, StructureError> {
        if a.id == b.id {
            return Err(StructureError::SelfMerge(a.id));
        }
        if atom_a >= a.atoms.len() {
            return Err(StructureError::AtomIndexOutOfRange { index: atom_a, len: a.atoms.len() });
        }
        if atom_b >= b.atoms.len() {
            return Err(StructureError::AtomIndexOutOfRange { index: atom_b, len: b.atoms.len() });
        }

        let offset = a.atoms.len();
        let mut merged = Self::with_capacity(id, offset + b.atoms.len(), a.bonds.len() + b.bonds.len() + 1);
        merged.atoms.extend(a.atoms.iter().cloned());
        merged.atoms.extend(b.atoms.iter().cloned());
        merged.bonds.extend(a.bonds.iter().copied());
        merged.bonds.extend(
            b.bonds
                .iter()
                .map(|bond| Bond::new(bond.a + offset, bond.b + offset, bond.order)),
        );
        merged.bonds.push(Bond::new(atom_a, atom_b + offset, order));
        Ok(merged)
    }

    /// Remove bond `bond_index` and return the two components it held together.
    /// `left` is the side of the bond's `a` endpoint.
    pub fn split(
        &self,
        bond_index: usize,
        left_id: MoleculeId,
        right_id: MoleculeId,
    ) -> Result<(Self, Self), StructureError> {
        let removed = *self.bonds.get(bond_index).ok_or(StructureError::BondNotFound {
            molecule: self.id,
            index: bond_index,
        })?;

        let left_side = self.reachable_without(removed.a, bond_index);
        if left_side[removed.b] {
            return Err(StructureError::NotABridge { molecule: self.id, index: bond_index });
        }
        let right_side = self.reachable_without(removed.b, bond_index);
        let covered = left_side.iter().zip(&right_side).filter(|(l, r)| **l || **r).count();
        if covered != self.atoms.len() {
            return Err(StructureError::Disconnected(self.id));
        }

        Ok((
            self.extract(&left_side, bond_index, left_id),
            self.extract(&right_side, bond_index, right_id),
        ))
    }

    /// Flags for every atom reachable from `start` without crossing `skipped_bond`.
    fn reachable_without(&self, start: usize, skipped_bond: usize) -> Vec<bool> {
        let mut seen = vec![false; self.atoms.len()];
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        while let Some(current) = queue.pop_front() {
            for (index, bond) in self.bonds.iter().enumerate() {
                if index == skipped_bond {
                    continue;
                }
                if let Some(next) = bond.other(current) {
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        seen
    }

    /// Copy the flagged atoms (and bonds among them, except `skipped_bond`) into a new structure.
    fn extract(&self, keep: &[bool], skipped_bond: usize, id: MoleculeId) -> Self {
        let mut remap = vec![usize::MAX; self.atoms.len()];
        let mut result = Self::new(id);
        for (old, atom) in self.atoms.iter().enumerate() {
            if keep[old] {
                remap[old] = result.atoms.len();
                result.atoms.push(atom.clone());
            }
        }
        for (index, bond) in self.bonds.iter().enumerate() {
            if index != skipped_bond && keep[bond.a] && keep[bond.b] {
                result.bonds.push(Bond::new(remap[bond.a], remap[bond.b], bond.order));
            }
        }
        result
    }

    /// Atom indices in breadth-first order from atom 0, followed by anything unreachable.
    fn traversal_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.atoms.len());
        let mut seen = vec![false; self.atoms.len()];
        for root in 0..self.atoms.len() {
            if seen[root] {
                continue;
            }
            seen[root] = true;
            let mut queue = VecDeque::from([root]);
            while let Some(current) = queue.pop_front() {
                order.push(current);
                for next in self.neighbors(current) {
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        order
    }

    pub fn is_connected(&self) -> bool {
        if self.atoms.is_empty() {
            return false;
        }
        let mut seen = vec![false; self.atoms.len()];
        let mut queue = VecDeque::from([0]);
        seen[0] = true;
        let mut count = 1;
        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if !seen[next] {
                    seen[next] = true;
                    count += 1;
                    queue.push_back(next);
                }
            }
        }
        count == self.atoms.len()
    }

    /// Structural sanity: bonds reference distinct existing atoms, no duplicate bonds,
    /// no atom over its element's bond limit, one connected component.
    pub fn is_valid(&self) -> bool {
        let len = self.atoms.len();
        for (index, bond) in self.bonds.iter().enumerate() {
            if bond.a >= len || bond.b >= len || bond.a == bond.b {
                return false;
            }
            if self.bonds[..index].iter().any(|earlier| earlier.connects(bond.a, bond.b)) {
                return false;
            }
        }
        let over_limit = self
            .atoms
            .iter()
            .enumerate()
            .any(|(i, atom)| self.degree(i) > atom.element().max_bonds() as usize);
        !over_limit && self.is_connected()
    }

    /// Valid, and free of homonuclear bonds between terminal-only elements outside
    /// their own diatomic (H-H is only allowed as H2, Cl-Cl only as Cl2, ...).
    pub fn is_allowed_structure(&self) -> bool {
        if !self.is_valid() {
            return false;
        }
        !self.bonds.iter().any(|bond| {
            let ea = self.atoms[bond.a].element();
            let eb = self.atoms[bond.b].element();
            ea == eb && ea.max_bonds() == 1 && self.atoms.len() != 2
        })
    }

    /// Bonds joining two hydrogens. Only expected in H2.
    pub fn hydrogen_pairs(&self) -> impl Iterator<Item = &Bond> + '_ {
        self.bonds.iter().filter(move |bond| {
            self.atoms[bond.a].element().is_hydrogen() && self.atoms[bond.b].element().is_hydrogen()
        })
    }

    /// Count of atoms per element.
    pub fn element_counts(&self) -> HashMap<Element, usize> {
        let mut counts = HashMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.element()).or_insert(0) += 1;
        }
        counts
    }

    /// Molecular formula. Carbon compounds use Hill order (C, H, then alphabetical);
    /// everything else lists elements by increasing electronegativity (NH3 is "H3N").
    pub fn formula(&self) -> String {
        let mut counts: Vec<(Element, usize)> = self.element_counts().into_iter().collect();
        let has_carbon = counts.iter().any(|(e, _)| *e == Element::CARBON);
        counts.sort_by(|(a, _), (b, _)| {
            if has_carbon {
                hill_rank(*a).cmp(&hill_rank(*b)).then_with(|| a.symbol().cmp(b.symbol()))
            } else {
                a.electronegativity()
                    .partial_cmp(&b.electronegativity())
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.symbol().cmp(b.symbol()))
            }
        });

        let mut formula = String::new();
        for (element, count) in counts {
            formula.push_str(element.symbol());
            if count > 1 {
                formula.push_str(&count.to_string());
            }
        }
        formula
    }

    /// Sum of the atomic masses.
    pub fn approximate_molecular_weight(&self) -> f32 {
        self.atoms.iter().map(|atom| atom.element().atomic_mass()).sum()
    }

    /// Same elements wired the same way. Bond orders are ignored, since kit bonds are all single.
    pub fn is_equivalent<B: StructureAtom>(&self, other: &MoleculeStructure<B>) -> bool {
        if self.atoms.len() != other.atoms.len() || self.bonds.len() != other.bonds.len() {
            return false;
        }
        if self.element_counts() != other.element_counts() {
            return false;
        }
        if self.atoms.is_empty() {
            return true;
        }
        let order = self.traversal_order();
        let mut mapping = vec![usize::MAX; self.atoms.len()];
        let mut used = vec![false; other.atoms.len()];
        self.match_atoms(0, &order, other, &mut mapping, &mut used)
    }

    fn match_atoms<B: StructureAtom>(
        &self,
        depth: usize,
        order: &[usize],
        other: &MoleculeStructure<B>,
        mapping: &mut [usize],
        used: &mut [bool],
    ) -> bool {
        let Some(&i) = order.get(depth) else {
            return true;
        };
        let element = self.atoms[i].element();
        let degree = self.degree(i);

        for j in 0..other.atoms.len() {
            if used[j] || other.atoms[j].element() != element || other.degree(j) != degree {
                continue;
            }
            // every already placed neighbor must land on a neighbor of the candidate
            let consistent = self
                .neighbors(i)
                .filter(|&k| mapping[k] != usize::MAX)
                .all(|k| other.bond_between(mapping[k], j).is_some());
            if !consistent {
                continue;
            }

            mapping[i] = j;
            used[j] = true;
            if self.match_atoms(depth + 1, order, other, mapping, used) {
                return true;
            }
            mapping[i] = usize::MAX;
            used[j] = false;
        }
        false
    }

    /// Multi-line description used in diagnostics.
    pub fn debug_dump(&self) -> String {
        let mut dump = format!("{} ({} atoms, {} bonds)\n", self.id, self.atoms.len(), self.bonds.len());
        for (i, atom) in self.atoms.iter().enumerate() {
            dump.push_str(&format!("  atom {}: {} (bonds: {})\n", i, atom.element(), self.degree(i)));
        }
        for bond in &self.bonds {
            dump.push_str(&format!("  bond {}-{} order {}\n", bond.a, bond.b, bond.order));
        }
        dump
    }
}

fn hill_rank(element: Element) -> u8 {
    if element == Element::CARBON {
        0
    } else if element == Element::HYDROGEN {
        1
    } else {
        2
    }
}
