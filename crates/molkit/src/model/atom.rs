use glam::Vec2;

use crate::api::types::AtomId;
use crate::core::element::Element;

/// Where an atom currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomLocation {
    /// Sitting in its element's supply bucket.
    Bucket,
    /// Picked up out of a bucket and not yet dropped.
    Held,
    /// Part of a live molecule structure in the play area.
    Play,
    /// Inside a collection box; hidden and no longer interactive.
    Collected,
}

/// An atom owned by a kit.
#[derive(Debug, Clone)]
pub struct AtomParticle {
    pub id: AtomId,
    pub element: Element,
    /// Where the atom is drawn now.
    pub position: Vec2,
    /// Where the atom is gliding to.
    pub destination: Vec2,
    pub location: AtomLocation,
    pub visible: bool,
}

impl AtomParticle {
    /// Create a new atom in a bucket at the origin.
    pub fn new(id: AtomId, element: Element) -> Self {
        Self {
            id,
            element,
            position: Vec2::ZERO,
            destination: Vec2::ZERO,
            location: AtomLocation::Bucket,
            visible: true,
        }
    }

    // -- Builder pattern --

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self.destination = position;
        self
    }

    pub fn radius(&self) -> f32 {
        self.element.radius()
    }

    pub fn symbol(&self) -> &'static str {
        self.element.symbol()
    }

    /// Move both the drawn position and the destination, keeping any motion in flight.
    pub fn translate_position_and_destination(&mut self, delta: Vec2) {
        self.position += delta;
        self.destination += delta;
    }

    /// Jump to `position` and stop moving.
    pub fn set_position_and_destination(&mut self, position: Vec2) {
        self.position = position;
        self.destination = position;
    }

    /// Advance toward the destination at `speed` units per second.
    /// Returns true while still moving.
    pub fn step_toward_destination(&mut self, dt: f32, speed: f32) -> bool {
        let to_go = self.destination - self.position;
        let distance = to_go.length();
        let travel = speed * dt;
        if distance <= travel || distance == 0.0 {
            self.position = self.destination;
            false
        } else {
            self.position += to_go * (travel / distance);
            true
        }
    }

    /// Restore the visible, interactive state. Placement is left to the bucket.
    pub fn reset(&mut self) {
        self.visible = true;
        self.destination = self.position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_moves_both_points() {
        let mut atom = AtomParticle::new(AtomId(0), Element::OXYGEN).with_position(Vec2::new(1.0, 1.0));
        atom.destination = Vec2::new(5.0, 1.0);
        atom.translate_position_and_destination(Vec2::new(0.0, 2.0));
        assert_eq!(atom.position, Vec2::new(1.0, 3.0));
        assert_eq!(atom.destination, Vec2::new(5.0, 3.0));
    }

    #[test]
    fn step_arrives_without_overshoot() {
        let mut atom = AtomParticle::new(AtomId(0), Element::HYDROGEN);
        atom.destination = Vec2::new(100.0, 0.0);
        assert!(atom.step_toward_destination(0.05, 1000.0));
        assert_eq!(atom.position, Vec2::new(50.0, 0.0));
        assert!(!atom.step_toward_destination(0.1, 1000.0));
        assert_eq!(atom.position, atom.destination);
    }

    #[test]
    fn radius_comes_from_element() {
        let atom = AtomParticle::new(AtomId(3), Element::CARBON);
        assert_eq!(atom.radius(), 76.0);
        assert_eq!(atom.symbol(), "C");
    }
}
