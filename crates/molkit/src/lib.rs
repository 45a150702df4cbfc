pub mod api;
pub mod core;
pub mod model;
pub mod kit;
pub mod collection;
pub mod render;
pub mod input;
pub mod observe;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::types::{AtomId, MoleculeId, CollectionBoxId, KitEvent};
pub use api::config::{KitConfig, KitSetup, BucketSetup, OverlapTolerance};
pub use core::element::Element;
pub use core::direction::Direction;
pub use core::bounds::Bounds;
pub use core::rng::Rng;
pub use model::atom::{AtomParticle, AtomLocation};
pub use model::structure::{Bond, MoleculeStructure, MoleculeIdAllocator, StructureAtom};
pub use model::lewis::LewisDotModel;
pub use model::complete::{AtomPrecision, CatalogAtom, CompleteMolecule};
pub use model::catalog::MoleculeCatalog;
pub use kit::{Kit, AtomRef, Molecule, BondingOption};
pub use kit::bucket::Bucket;
pub use kit::layout::LayoutBounds;
pub use collection::collection_box::CollectionBox;
pub use collection::kit_collection::KitCollection;
pub use collection::collection_list::CollectionList;
pub use render::instance::{AtomInstance, AtomBuffer};
pub use input::queue::{KitInput, InputQueue};
pub use observe::{Emitter, ListenerId, Property};
pub use error::{KitError, LewisError, StructureError, SerialError, ConfigError};
