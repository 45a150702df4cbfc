use glam::Vec2;

use crate::api::types::{AtomId, MoleculeId};
use crate::error::KitError;
use crate::kit::Kit;

/// User actions the kit understands, already mapped to atom ids by the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KitInput {
    /// An atom was dragged by (dx, dy) play-area units.
    Drag { atom: AtomId, dx: f32, dy: f32 },
    /// An atom was let go where it is.
    Drop { atom: AtomId },
    /// The scissors were used on the bond between two atoms.
    BreakBond { a: AtomId, b: AtomId },
    /// Every bond of a molecule should be cut.
    BreakMolecule { molecule: MoleculeId },
    /// The "reset kit" button was pressed.
    Reset,
}

impl KitInput {
    /// Run this action against `kit`.
    pub fn apply(self, kit: &mut Kit) -> Result<(), KitError> {
        match self {
            Self::Drag { atom, dx, dy } => kit.atom_dragged(atom, Vec2::new(dx, dy)),
            Self::Drop { atom } => kit.atom_dropped(atom),
            Self::BreakBond { a, b } => kit.break_bond(a, b),
            Self::BreakMolecule { molecule } => kit.break_molecule(molecule),
            Self::Reset => {
                kit.reset_kit();
                Ok(())
            }
        }
    }
}

/// Actions collected between frames.
/// The view pushes actions; the runner drains and applies them once per tick.
pub struct InputQueue {
    events: Vec<KitInput>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: KitInput) {
        self.events.push(event);
    }

    /// Take every pending action, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<KitInput> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KitInput> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
