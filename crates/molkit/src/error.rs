//! Error types for the engine. Rejected-but-expected outcomes (no bonding candidate in
//! range, a merged structure that fails validation) are not errors; they come back as
//! `Ok(false)` from the kit.

use thiserror::Error;

use crate::api::types::{AtomId, CollectionBoxId, MoleculeId};

#[derive(Debug, Error, PartialEq)]
pub enum StructureError {
    #[error("cannot merge {0} with itself")]
    SelfMerge(MoleculeId),

    #[error("atom index {index} is out of range for a structure of {len} atoms")]
    AtomIndexOutOfRange { index: usize, len: usize },

    #[error("bond {index} does not exist in {molecule}")]
    BondNotFound { molecule: MoleculeId, index: usize },

    #[error("removing bond {index} does not disconnect {molecule}")]
    NotABridge { molecule: MoleculeId, index: usize },

    #[error("{0} is not a single connected component")]
    Disconnected(MoleculeId),
}

#[derive(Debug, Error, PartialEq)]
pub enum LewisError {
    #[error("{0} is not registered in the Lewis-dot model")]
    UnknownAtom(AtomId),

    #[error("bonding site {direction} of {atom} is not open")]
    SlotOccupied { atom: AtomId, direction: &'static str },

    #[error("{0} and {1} are not bonded")]
    NotBonded(AtomId, AtomId),
}

#[derive(Debug, Error, PartialEq)]
pub enum KitError {
    #[error("{0} does not belong to this kit")]
    UnknownAtom(AtomId),

    #[error("{0} is not in play")]
    AtomNotInPlay(AtomId),

    #[error("{0} is not a live molecule of this kit")]
    UnknownMolecule(MoleculeId),

    #[error("loop or other invalid structure detected: {a} and {b} are already in {molecule}")]
    CycleDetected { a: AtomId, b: AtomId, molecule: MoleculeId },

    #[error("the Lewis-dot model does not allow bonding {a} to {b}")]
    BondNotAllowed { a: AtomId, b: AtomId },

    #[error("{0} and {1} are not bonded")]
    NotBonded(AtomId, AtomId),

    #[error("no collection box {0:?} in this collection")]
    UnknownCollectionBox(CollectionBoxId),

    #[error("no kit {0} in this collection")]
    UnknownKit(usize),

    #[error("kit invariant violated: {0}")]
    InvariantViolated(String),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Lewis(#[from] LewisError),
}

#[derive(Debug, Error, PartialEq)]
pub enum SerialError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unknown element symbol: {0:?}")]
    UnknownElement(String),

    #[error("unknown precision tag: {0:?}")]
    UnknownPrecision(String),

    #[error("bond target {target} out of range (only {available} atoms read)")]
    BondTargetOutOfRange { target: usize, available: usize },

    #[error("header declares {expected} {what} but {found} were read")]
    CountMismatch { what: &'static str, expected: usize, found: usize },

    #[error("{0} unexpected trailing field(s)")]
    TrailingFields(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid kit configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown element symbol in bucket setup: {0:?}")]
    UnknownElement(String),
}
