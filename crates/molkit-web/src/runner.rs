use std::cell::RefCell;
use std::rc::Rc;

use molkit::{AtomBuffer, ConfigError, InputQueue, Kit, KitEvent, KitInput, KitSetup, Molecule};

/// Drives one kit for the browser: queues view actions, applies them each tick,
/// glides atoms and packs draw data and events into flat buffers.
///
/// wasm-bindgen cannot export this struct's borrows directly, so `lib.rs` keeps one
/// in a `thread_local!` and exposes free functions.
pub struct KitRunner {
    kit: Kit,
    input: InputQueue,
    atoms: AtomBuffer,
    /// Filled by the kit's molecule subscriptions while a tick runs.
    pending_events: Rc<RefCell<Vec<KitEvent>>>,
    /// Events of the last tick, readable from linear memory.
    events: Vec<KitEvent>,
}

impl KitRunner {
    pub fn new(mut kit: Kit) -> Self {
        let pending_events = Rc::new(RefCell::new(Vec::new()));

        let sink = pending_events.clone();
        kit.molecule_added.subscribe(move |m: &Molecule| {
            sink.borrow_mut()
                .push(KitEvent::new(KitEvent::MOLECULE_ADDED, m.id().0 as f32, m.atom_count() as f32));
        });
        let sink = pending_events.clone();
        kit.molecule_removed.subscribe(move |m: &Molecule| {
            sink.borrow_mut()
                .push(KitEvent::new(KitEvent::MOLECULE_REMOVED, m.id().0 as f32, m.atom_count() as f32));
        });
        kit.show();

        let mut atoms = AtomBuffer::new();
        atoms.fill(&kit);
        Self {
            kit,
            input: InputQueue::new(),
            atoms,
            pending_events,
            events: Vec::with_capacity(32),
        }
    }

    pub fn from_setup_json(json: &str) -> Result<Self, ConfigError> {
        let setup = KitSetup::from_json(json)?;
        Ok(Self::new(Kit::from_setup(&setup)?))
    }

    pub fn kit(&self) -> &Kit {
        &self.kit
    }

    pub fn push_input(&mut self, event: KitInput) {
        self.input.push(event);
    }

    /// Apply queued actions, advance atom motion by `dt` seconds and rebuild the buffers.
    pub fn tick(&mut self, dt: f32) {
        for event in self.input.drain() {
            if let Err(e) = event.apply(&mut self.kit) {
                log::warn!("{:?} failed: {}", event, e);
            }
        }
        self.kit.step(dt);
        self.atoms.fill(&self.kit);

        self.events.clear();
        self.events.append(&mut *self.pending_events.borrow_mut());
    }

    pub fn events(&self) -> &[KitEvent] {
        &self.events
    }

    // ---- Pointer accessors for linear-memory reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.atoms.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.atoms.instance_count()
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn events_len(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn molecule_count(&self) -> u32 {
        self.kit.molecules().len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use molkit::AtomId;

    const SETUP: &str = r#"{
        "kit_bounds": [0, 0, 1000, 200],
        "play_area_bounds": [0, 200, 1000, 800],
        "buckets": [{ "symbol": "H", "quantity": 2 }]
    }"#;

    fn drag_to(runner: &mut KitRunner, atom: u32, x: f32, y: f32) {
        let position = runner.kit().atoms()[atom as usize].position;
        runner.push_input(KitInput::Drag { atom: AtomId(atom), dx: x - position.x, dy: y - position.y });
        runner.push_input(KitInput::Drop { atom: AtomId(atom) });
    }

    #[test]
    fn tick_applies_input_and_reports_events() {
        let mut runner = KitRunner::from_setup_json(SETUP).unwrap();
        assert_eq!(runner.instance_count(), 2);

        drag_to(&mut runner, 0, 300.0, 500.0);
        runner.tick(0.016);
        assert_eq!(runner.molecule_count(), 1);
        assert_eq!(runner.events().len(), 1);
        assert_eq!(runner.events()[0].kind, KitEvent::MOLECULE_ADDED);

        drag_to(&mut runner, 1, 372.0, 500.0);
        runner.tick(0.016);
        assert_eq!(runner.molecule_count(), 1);
        let kinds: Vec<f32> = runner.events().iter().map(|e| e.kind).collect();
        // single H1 added, then both singles removed and H2 added
        assert_eq!(
            kinds,
            vec![
                KitEvent::MOLECULE_ADDED,
                KitEvent::MOLECULE_REMOVED,
                KitEvent::MOLECULE_REMOVED,
                KitEvent::MOLECULE_ADDED,
            ]
        );
        assert_eq!(runner.events().last().map(|e| e.b), Some(2.0));

        runner.tick(0.016);
        assert_eq!(runner.events_len(), 0);
    }

    #[test]
    fn bad_setup_is_an_error() {
        assert!(KitRunner::from_setup_json("{}").is_err());
        assert!(KitRunner::from_setup_json(
            r#"{ "kit_bounds": [0,0,1,1], "play_area_bounds": [0,1,1,1], "buckets": [{ "symbol": "Xx", "quantity": 1 }] }"#
        )
        .is_err());
    }
}
