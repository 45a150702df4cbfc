use bytemuck::{Pod, Zeroable};

use crate::kit::Kit;
use crate::model::atom::{AtomLocation, AtomParticle};

/// Per-atom draw data handed to the view as a flat float buffer.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct AtomInstance {
    /// X position in play-area units.
    pub x: f32,
    /// Y position in play-area units.
    pub y: f32,
    /// Drawn radius (covalent radius of the element).
    pub radius: f32,
    /// Atomic number, used by the view to pick colour and label.
    pub atomic_number: f32,
    /// Opacity (0.0 = hidden, 1.0 = opaque).
    pub alpha: f32,
    pub atom_id: f32,
    /// Id of the live molecule holding the atom, or -1.
    pub molecule_id: f32,
    /// 0 = bucket, 1 = held, 2 = play, 3 = collected.
    pub location: f32,
}

impl AtomInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_particle(atom: &AtomParticle, molecule_id: Option<u32>) -> Self {
        Self {
            x: atom.position.x,
            y: atom.position.y,
            radius: atom.radius(),
            atomic_number: atom.element.atomic_number() as f32,
            alpha: if atom.visible { 1.0 } else { 0.0 },
            atom_id: atom.id.0 as f32,
            molecule_id: molecule_id.map_or(-1.0, |id| id as f32),
            location: match atom.location {
                AtomLocation::Bucket => 0.0,
                AtomLocation::Held => 1.0,
                AtomLocation::Play => 2.0,
                AtomLocation::Collected => 3.0,
            },
        }
    }
}

/// Draw data for every visible atom of a kit, rebuilt each frame.
pub struct AtomBuffer {
    pub instances: Vec<AtomInstance>,
}

impl AtomBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(64),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Replace the contents with the kit's visible atoms, in atom id order.
    pub fn fill(&mut self, kit: &Kit) {
        self.clear();
        if !kit.visible.value() {
            return;
        }
        for atom in kit.atoms().iter().filter(|a| a.visible) {
            let molecule = kit.molecule_of(atom.id).map(|m| m.id().0);
            self.instances.push(AtomInstance::from_particle(atom, molecule));
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for reads from linear memory.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for AtomBuffer {
    fn default() -> Self {
        Self::new()
    }
}
