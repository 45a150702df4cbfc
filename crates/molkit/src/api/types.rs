use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Stable identifier of an atom owned by a kit. Doubles as the index into the kit's atom arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub u32);

/// Identifier of a molecule structure. Handed out in increasing order by a kit's allocator,
/// so comparing two ids tells which structure was created first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoleculeId(pub u32);

/// Identifier of a collection box within a kit collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionBoxId(pub u32);

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "atom#{}", self.0)
    }
}

impl fmt::Display for MoleculeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "molecule#{}", self.0)
    }
}

/// A kit event communicated from Rust to the view layer as a flat float buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct KitEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl KitEvent {
    pub const FLOATS: usize = 4;

    /// A molecule entered the live set. `a` = molecule id, `b` = atom count.
    pub const MOLECULE_ADDED: f32 = 1.0;
    /// A molecule left the live set. `a` = molecule id, `b` = atom count.
    pub const MOLECULE_REMOVED: f32 = 2.0;

    pub fn new(kind: f32, a: f32, b: f32) -> Self {
        Self { kind, a, b, c: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn molecule_ids_order_by_creation() {
        assert!(MoleculeId(3) < MoleculeId(7));
    }

    #[test]
    fn event_is_four_floats() {
        assert_eq!(std::mem::size_of::<KitEvent>(), KitEvent::FLOATS * 4);
        let e = KitEvent::new(KitEvent::MOLECULE_ADDED, 5.0, 2.0);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&e));
        assert_eq!(floats, &[1.0, 5.0, 2.0, 0.0]);
    }
}
