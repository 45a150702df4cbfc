pub mod runner;

pub use runner::KitRunner;

use std::cell::RefCell;

use molkit::{AtomId, KitInput, MoleculeId};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<KitRunner>> = const { RefCell::new(None) };
}

/// Run `f` on the runner, or return `default` if `kit_init` has not succeeded yet.
fn with_runner<R>(default: R, f: impl FnOnce(&mut KitRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("kit not initialized, call kit_init() first");
            default
        }
    })
}

/// Build the kit from a JSON `KitSetup`. Returns false (and logs to the console) on bad input.
#[wasm_bindgen]
pub fn kit_init(setup_json: &str) -> bool {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    match KitRunner::from_setup_json(setup_json) {
        Ok(runner) => {
            log::info!("molkit: initialized with {} atoms", runner.kit().atoms().len());
            RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
            true
        }
        Err(e) => {
            web_sys::console::error_1(&format!("molkit: bad kit setup: {}", e).into());
            false
        }
    }
}

#[wasm_bindgen]
pub fn kit_tick(dt: f32) {
    with_runner((), |r| r.tick(dt));
}

#[wasm_bindgen]
pub fn kit_atom_dragged(atom: u32, dx: f32, dy: f32) {
    with_runner((), |r| r.push_input(KitInput::Drag { atom: AtomId(atom), dx, dy }));
}

#[wasm_bindgen]
pub fn kit_atom_dropped(atom: u32) {
    with_runner((), |r| r.push_input(KitInput::Drop { atom: AtomId(atom) }));
}

#[wasm_bindgen]
pub fn kit_break_bond(a: u32, b: u32) {
    with_runner((), |r| r.push_input(KitInput::BreakBond { a: AtomId(a), b: AtomId(b) }));
}

#[wasm_bindgen]
pub fn kit_break_molecule(molecule: u32) {
    with_runner((), |r| r.push_input(KitInput::BreakMolecule { molecule: MoleculeId(molecule) }));
}

#[wasm_bindgen]
pub fn kit_reset() {
    with_runner((), |r| r.push_input(KitInput::Reset));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_atom_instances_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.instances_ptr())
}

#[wasm_bindgen]
pub fn get_atom_instance_count() -> u32 {
    with_runner(0, |r| r.instance_count())
}

#[wasm_bindgen]
pub fn get_kit_events_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.events_ptr())
}

#[wasm_bindgen]
pub fn get_kit_events_len() -> u32 {
    with_runner(0, |r| r.events_len())
}

#[wasm_bindgen]
pub fn get_molecule_count() -> u32 {
    with_runner(0, |r| r.molecule_count())
}
