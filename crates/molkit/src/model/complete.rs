//! Named reference molecules with per-atom coordinates, and their text formats.

use std::fmt;

use crate::api::types::MoleculeId;
use crate::core::element::Element;
use crate::error::SerialError;
use crate::model::serial::{next_field, parse_number};
use crate::model::structure::{MoleculeStructure, StructureAtom};

/// Coordinates known for a catalog atom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AtomPrecision {
    TwoD { x: f32, y: f32 },
    ThreeD { x: f32, y: f32, z: f32 },
    Full { x2: f32, y2: f32, x3: f32, y3: f32, z3: f32 },
}

impl AtomPrecision {
    pub fn has_plane_2d(&self) -> bool {
        matches!(self, Self::TwoD { .. } | Self::Full { .. })
    }

    pub fn has_space_3d(&self) -> bool {
        matches!(self, Self::ThreeD { .. } | Self::Full { .. })
    }

    /// 2D coordinates, or the origin if unknown.
    pub fn plane(&self) -> (f32, f32) {
        match *self {
            Self::TwoD { x, y } => (x, y),
            Self::Full { x2, y2, .. } => (x2, y2),
            Self::ThreeD { .. } => (0.0, 0.0),
        }
    }

    /// 3D coordinates; a 2D-only atom sits on the z = 0 plane.
    pub fn space(&self) -> (f32, f32, f32) {
        match *self {
            Self::ThreeD { x, y, z } => (x, y, z),
            Self::Full { x3, y3, z3, .. } => (x3, y3, z3),
            Self::TwoD { x, y } => (x, y, 0.0),
        }
    }

    fn to_full(self) -> Self {
        let (x2, y2) = self.plane();
        let (x3, y3, z3) = self.space();
        Self::Full { x2, y2, x3, y3, z3 }
    }
}

/// An element plus whatever coordinates came with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogAtom {
    pub element: Element,
    pub precision: AtomPrecision,
}

impl StructureAtom for CatalogAtom {
    fn element(&self) -> Element {
        self.element
    }
}

impl fmt::Display for CatalogAtom {
    /// `SYM x y`, `SYM x y z` or `SYM x2 y2 x3 y3 z3`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element.symbol())?;
        match self.precision {
            AtomPrecision::TwoD { x, y } => write!(f, " {} {}", x, y),
            AtomPrecision::ThreeD { x, y, z } => write!(f, " {} {} {}", x, y, z),
            AtomPrecision::Full { x2, y2, x3, y3, z3 } => write!(f, " {} {} {} {} {}", x2, y2, x3, y3, z3),
        }
    }
}

/// Which coordinates every atom of a serialized molecule carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrecisionTag {
    TwoD,
    ThreeD,
    Full,
}

impl PrecisionTag {
    fn parse(tag: &str) -> Result<Self, SerialError> {
        match tag {
            "2d" => Ok(Self::TwoD),
            "3d" => Ok(Self::ThreeD),
            "full" => Ok(Self::Full),
            other => Err(SerialError::UnknownPrecision(other.to_string())),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::TwoD => "2d",
            Self::ThreeD => "3d",
            Self::Full => "full",
        }
    }

    fn coordinate_count(self) -> usize {
        match self {
            Self::TwoD => 2,
            Self::ThreeD => 3,
            Self::Full => 5,
        }
    }

    fn parse_atom(self, field: &str) -> Result<CatalogAtom, SerialError> {
        let mut parts = field.split(' ').filter(|p| !p.is_empty());
        let symbol = parts.next().ok_or(SerialError::MissingField("atom symbol"))?;
        let element = element_for(symbol)?;
        let coords = parts
            .map(|p| parse_number::<f32>(p, "atom coordinate"))
            .collect::<Result<Vec<f32>, _>>()?;
        if coords.len() != self.coordinate_count() {
            return Err(SerialError::CountMismatch {
                what: "atom coordinates",
                expected: self.coordinate_count(),
                found: coords.len(),
            });
        }
        let precision = match self {
            Self::TwoD => AtomPrecision::TwoD { x: coords[0], y: coords[1] },
            Self::ThreeD => AtomPrecision::ThreeD { x: coords[0], y: coords[1], z: coords[2] },
            Self::Full => AtomPrecision::Full {
                x2: coords[0],
                y2: coords[1],
                x3: coords[2],
                y3: coords[3],
                z3: coords[4],
            },
        };
        Ok(CatalogAtom { element, precision })
    }
}

fn element_for(symbol: &str) -> Result<Element, SerialError> {
    Element::by_symbol(symbol).ok_or_else(|| SerialError::UnknownElement(symbol.to_string()))
}

/// A molecule from the reference catalog: a name and formula as published, an optional
/// PubChem compound id, and its structure.
#[derive(Debug, Clone)]
pub struct CompleteMolecule {
    raw_name: String,
    pub formula: String,
    pub cid: Option<u64>,
    pub structure: MoleculeStructure<CatalogAtom>,
}

impl CompleteMolecule {
    pub fn new(
        name: impl Into<String>,
        formula: impl Into<String>,
        cid: Option<u64>,
        structure: MoleculeStructure<CatalogAtom>,
    ) -> Self {
        Self {
            raw_name: name.into(),
            formula: formula.into(),
            cid,
            structure,
        }
    }

    /// Name as stored in the catalog.
    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    /// Display name: a leading "molecular " is dropped and each word is capitalized.
    pub fn common_name(&self) -> String {
        let name = self.raw_name.strip_prefix("molecular ").unwrap_or(&self.raw_name);
        capitalize_words(name)
    }

    /// Lookup key for a localized name (first space becomes `_`).
    pub fn string_key(&self) -> String {
        format!("molecule.{}", self.raw_name.replacen(' ', "_", 1))
    }

    /// The localized name from `lookup` if it has one, otherwise [`Self::common_name`].
    pub fn display_name(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        let key = self.string_key();
        match lookup(&key) {
            Some(name) if name != key => name,
            _ => self.common_name(),
        }
    }

    fn precision_tag(&self) -> PrecisionTag {
        let atoms = self.structure.atoms();
        let all_2d_only = atoms.iter().all(|a| matches!(a.precision, AtomPrecision::TwoD { .. }));
        let all_3d_only = atoms.iter().all(|a| matches!(a.precision, AtomPrecision::ThreeD { .. }));
        if all_2d_only && !atoms.is_empty() {
            PrecisionTag::TwoD
        } else if all_3d_only && !atoms.is_empty() {
            PrecisionTag::ThreeD
        } else {
            PrecisionTag::Full
        }
    }

    pub fn has_plane_2d(&self) -> bool {
        self.precision_tag() != PrecisionTag::ThreeD
    }

    pub fn has_space_3d(&self) -> bool {
        self.precision_tag() != PrecisionTag::TwoD
    }

    /// `name|formula|cid|tag|<structure>`. Mixed precision is written as `full`.
    pub fn to_serial2(&self) -> String {
        let tag = self.precision_tag();
        let cid = self.cid.map(|c| c.to_string()).unwrap_or_default();
        let structure = self.structure.to_serial2_with(|atom| match tag {
            PrecisionTag::Full => CatalogAtom {
                element: atom.element,
                precision: atom.precision.to_full(),
            }
            .to_string(),
            _ => atom.to_string(),
        });
        format!("{}|{}|{}|{}|{}", self.raw_name, self.formula, cid, tag.as_str(), structure)
    }

    pub fn from_serial2(id: MoleculeId, line: &str) -> Result<Self, SerialError> {
        let mut tokens = line.trim_end().split('|');
        let name = next_field(&mut tokens, "name")?;
        let formula = next_field(&mut tokens, "formula")?;
        let cid = parse_cid(next_field(&mut tokens, "cid")?)?;
        let tag = PrecisionTag::parse(next_field(&mut tokens, "precision")?)?;

        let structure = MoleculeStructure::read_serial2(id, &mut tokens, |field| tag.parse_atom(field))?;
        let trailing = tokens.count();
        if trailing > 0 {
            return Err(SerialError::TrailingFields(trailing));
        }
        Ok(Self::new(name, formula, cid, structure))
    }

    /// Older flat layout: `name|formula|atoms|bonds|` six fields per atom, three per bond
    /// (1-based indices), then the cid.
    pub fn from_legacy_string(id: MoleculeId, line: &str) -> Result<Self, SerialError> {
        let mut tokens = line.trim_end().split('|');
        let name = next_field(&mut tokens, "name")?;
        let formula = next_field(&mut tokens, "formula")?;
        let atom_count: usize = parse_number(next_field(&mut tokens, "atom count")?, "atom count")?;
        let bond_count: usize = parse_number(next_field(&mut tokens, "bond count")?, "bond count")?;

        let mut structure = MoleculeStructure::new(id);
        for _ in 0..atom_count {
            let element = element_for(next_field(&mut tokens, "atom symbol")?)?;
            let mut coord = |name: &'static str| -> Result<f32, SerialError> { parse_number(next_field(&mut tokens, name)?, name) };
            let precision = AtomPrecision::Full {
                x2: coord("x2d")?,
                y2: coord("y2d")?,
                x3: coord("x3d")?,
                y3: coord("y3d")?,
                z3: coord("z3d")?,
            };
            structure.add_atom(CatalogAtom { element, precision });
        }
        for _ in 0..bond_count {
            let a: usize = parse_number(next_field(&mut tokens, "bond atom")?, "bond atom")?;
            let b: usize = parse_number(next_field(&mut tokens, "bond atom")?, "bond atom")?;
            let order: u8 = parse_number(next_field(&mut tokens, "bond order")?, "bond order")?;
            for target in [a, b] {
                if target == 0 || target > atom_count {
                    return Err(SerialError::BondTargetOutOfRange { target, available: atom_count });
                }
            }
            structure
                .add_bond(a - 1, b - 1, order)
                .map_err(|_| SerialError::BondTargetOutOfRange { target: a.max(b), available: atom_count })?;
        }
        let cid = parse_cid(next_field(&mut tokens, "cid")?)?;
        let trailing = tokens.count();
        if trailing > 0 {
            return Err(SerialError::TrailingFields(trailing));
        }
        Ok(Self::new(name, formula, cid, structure))
    }
}

fn parse_cid(field: &str) -> Result<Option<u64>, SerialError> {
    if field.is_empty() {
        Ok(None)
    } else {
        parse_number(field, "cid").map(Some)
    }
}

fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;
    for c in text.chars() {
        if c.is_whitespace() {
            last_was_space = true;
            out.push(c);
        } else {
            if last_was_space && c.is_ascii_lowercase() {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
            last_was_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER_2D: &str = "water|H2O|962|2d|3|2|O 2.5369 -0.155|0|H 3.0739 0.155|1|0-1|H 2 0.155|1|0-1";

    #[test]
    fn parse_water_2d() {
        let water = CompleteMolecule::from_serial2(MoleculeId(1), WATER_2D).unwrap();
        assert_eq!(water.common_name(), "Water");
        assert_eq!(water.formula, "H2O");
        assert_eq!(water.cid, Some(962));
        assert_eq!(water.structure.atom_count(), 3);
        assert!(water.has_plane_2d());
        assert!(!water.has_space_3d());
        assert_eq!(
            water.structure.atoms()[0].precision,
            AtomPrecision::TwoD { x: 2.5369, y: -0.155 }
        );
    }

    #[test]
    fn serial2_round_trips_exactly() {
        let water = CompleteMolecule::from_serial2(MoleculeId(1), WATER_2D).unwrap();
        assert_eq!(water.to_serial2(), WATER_2D);

        let full = "hydrogen fluoride|FH|16211014|full|2|1|F 2 0 0.4579 0 0|0|H 3 0 -0.4579 0 0|1|0-1";
        let hf = CompleteMolecule::from_serial2(MoleculeId(2), full).unwrap();
        assert!(hf.has_plane_2d() && hf.has_space_3d());
        assert_eq!(hf.to_serial2(), full);
    }

    #[test]
    fn mixed_precision_is_written_full() {
        let mut structure = MoleculeStructure::new(MoleculeId(1));
        structure.add_atom(CatalogAtom {
            element: Element::HYDROGEN,
            precision: AtomPrecision::TwoD { x: 1.0, y: 2.0 },
        });
        structure.add_atom(CatalogAtom {
            element: Element::HYDROGEN,
            precision: AtomPrecision::ThreeD { x: 3.0, y: 4.0, z: 5.0 },
        });
        structure.add_bond(0, 1, 1).unwrap();
        let h2 = CompleteMolecule::new("molecular hydrogen", "H2", None, structure);
        assert_eq!(h2.to_serial2(), "molecular hydrogen|H2||full|2|1|H 1 2 1 2 0|0|H 0 0 3 4 5|1|0-1");
        assert_eq!(h2.common_name(), "Hydrogen");
    }

    #[test]
    fn legacy_string_parses_as_full() {
        let line = "water|H2O|3|2|O|2.5369|-0.155|0|0.4|0|H|3.0739|0.155|0.8|-0.2|0|H|2|0.155|-0.8|-0.2|0|1|2|1|1|3|1|962";
        let water = CompleteMolecule::from_legacy_string(MoleculeId(1), line).unwrap();
        assert_eq!(water.cid, Some(962));
        assert_eq!(water.structure.bond_count(), 2);
        assert!(water.structure.atoms().iter().all(|a| a.precision.has_plane_2d() && a.precision.has_space_3d()));
        assert_eq!(water.structure.degree(0), 2);
        assert_eq!(water.structure.formula(), "H2O");
    }

    #[test]
    fn legacy_bond_index_is_one_based() {
        let line = "hydrogen|H2|2|1|H|0|0|0|0|0|H|1|0|1|0|0|0|2|1|783";
        let err = CompleteMolecule::from_legacy_string(MoleculeId(1), line).unwrap_err();
        assert_eq!(err, SerialError::BondTargetOutOfRange { target: 0, available: 2 });
    }

    #[test]
    fn bad_header_fields() {
        assert_eq!(
            CompleteMolecule::from_serial2(MoleculeId(1), "x|H|1|4d|1|0|H 0 0|0").unwrap_err(),
            SerialError::UnknownPrecision("4d".to_string())
        );
        assert_eq!(
            CompleteMolecule::from_serial2(MoleculeId(1), "x|Xx|1|2d|1|0|Xx 0 0|0").unwrap_err(),
            SerialError::UnknownElement("Xx".to_string())
        );
        assert!(matches!(
            CompleteMolecule::from_serial2(MoleculeId(1), "x|H|1|3d|1|0|H 0 0|0").unwrap_err(),
            SerialError::CountMismatch { expected: 3, found: 2, .. }
        ));
    }

    #[test]
    fn oversized_atom_count_is_an_error() {
        assert_eq!(
            CompleteMolecule::from_serial2(MoleculeId(1), "x|H|1|2d|1000000000000000000|0|H 0 0|0").unwrap_err(),
            SerialError::MissingField("atom")
        );
        assert_eq!(
            CompleteMolecule::from_legacy_string(MoleculeId(1), "x|H|1000000000000000000|0|H|0|0|0|0|0").unwrap_err(),
            SerialError::MissingField("atom symbol")
        );
    }

    #[test]
    fn names_and_keys() {
        let m = CompleteMolecule::new("carbon dioxide", "CO2", Some(280), MoleculeStructure::new(MoleculeId(1)));
        assert_eq!(m.common_name(), "Carbon Dioxide");
        assert_eq!(m.string_key(), "molecule.carbon_dioxide");
        assert_eq!(m.display_name(|_| None), "Carbon Dioxide");
        assert_eq!(m.display_name(|_| Some("Kohlendioxid".to_string())), "Kohlendioxid");
        assert_eq!(m.display_name(|k| Some(k.to_string())), "Carbon Dioxide");
    }
}
