use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which atom pairs may share a Lewis-dot lattice site when two molecules are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapTolerance {
    /// Only two hydrogens may sit on the same site.
    #[default]
    BothHydrogen,
    /// Overlap is tolerated as soon as one of the two atoms is hydrogen.
    AnyHydrogen,
    /// No overlap at all.
    Never,
}

impl OverlapTolerance {
    pub fn permits(self, a_is_hydrogen: bool, b_is_hydrogen: bool) -> bool {
        match self {
            Self::BothHydrogen => a_is_hydrogen && b_is_hydrogen,
            Self::AnyHydrogen => a_is_hydrogen || b_is_hydrogen,
            Self::Never => false,
        }
    }
}

/// Tunables for a kit. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitConfig {
    /// Maximum distance between a dropped atom and its ideal bonding location (default: 200).
    pub bond_distance_threshold: f32,
    /// Horizontal gap between neighbouring buckets (default: 50).
    pub bucket_padding: f32,
    /// Padding added around molecule destination bounds during separation (default: 150).
    pub inter_molecule_padding: f32,
    /// Cap on separation rounds per call (default: 500).
    pub max_separation_iterations: u32,
    /// How far two overlapping molecules are pushed apart per round (default: 10).
    pub push_amount: f32,
    /// Exponent applied to molecular weights when splitting a push (default: 1).
    pub push_power: f32,
    /// Speed at which atoms glide toward their destination, in units per second (default: 1200).
    pub atom_speed: f32,
    /// Lattice overlap rule used by the Lewis-dot model.
    pub overlap_tolerance: OverlapTolerance,
    /// Seed for the separation jitter.
    pub seed: u64,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            bond_distance_threshold: 200.0,
            bucket_padding: 50.0,
            inter_molecule_padding: 150.0,
            max_separation_iterations: 500,
            push_amount: 10.0,
            push_power: 1.0,
            atom_speed: 1200.0,
            overlap_tolerance: OverlapTolerance::default(),
            seed: 42,
        }
    }
}

impl KitConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One bucket in a kit setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSetup {
    /// Element symbol, e.g. "H".
    pub symbol: String,
    /// Number of atoms the bucket starts with.
    pub quantity: u32,
}

/// Everything needed to build a kit from the outside: layout rectangles, buckets and tunables.
/// Rectangles are `[x, y, width, height]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitSetup {
    pub kit_bounds: [f32; 4],
    pub play_area_bounds: [f32; 4],
    pub buckets: Vec<BucketSetup>,
    #[serde(default)]
    pub config: KitConfig,
}

impl KitSetup {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
