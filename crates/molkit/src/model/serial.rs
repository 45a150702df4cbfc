//! Compact pipe-delimited structure encoding.
//!
//! ```text
//! atomCount|bondCount|atom_0|k_0|bond...|atom_1|k_1|bond...
//! ```
//!
//! Each atom is followed by the number of bonds it has to atoms listed before it,
//! then one `targetIndex-order` field per such bond. The atom field itself is left to
//! the caller, so catalog molecules can carry coordinates and live structures just
//! their element symbol.

use std::str::FromStr;

use crate::api::types::MoleculeId;
use crate::error::SerialError;
use crate::model::structure::{MoleculeStructure, StructureAtom};

/// Pull the next `|` field or report which one was missing.
pub(crate) fn next_field<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    name: &'static str,
) -> Result<&'a str, SerialError> {
    tokens.next().ok_or(SerialError::MissingField(name))
}

/// Parse a numeric field, keeping the offending text in the error.
pub(crate) fn parse_number<T: FromStr>(value: &str, field: &'static str) -> Result<T, SerialError> {
    value.trim().parse().map_err(|_| SerialError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

impl<A: StructureAtom> MoleculeStructure<A> {
    /// Serialize with a custom atom field writer. The writer must not emit `|`.
    pub fn to_serial2_with(&self, mut write_atom: impl FnMut(&A) -> String) -> String {
        let mut fields = vec![self.atom_count().to_string(), self.bond_count().to_string()];
        for (i, atom) in self.atoms().iter().enumerate() {
            let earlier: Vec<(usize, u8)> = self
                .bonds()
                .iter()
                .filter_map(|bond| {
                    let other = bond.other(i)?;
                    (other < i).then_some((other, bond.order))
                })
                .collect();
            fields.push(write_atom(atom));
            fields.push(earlier.len().to_string());
            for (target, order) in earlier {
                fields.push(format!("{}-{}", target, order));
            }
        }
        fields.join("|")
    }

    /// Serialize with element symbols as atom fields.
    pub fn to_serial2(&self) -> String {
        self.to_serial2_with(|atom| atom.element().symbol().to_string())
    }

    /// Parse a structure written by `to_serial2_with`.
    pub fn from_serial2_with(
        id: MoleculeId,
        line: &str,
        parse_atom: impl FnMut(&str) -> Result<A, SerialError>,
    ) -> Result<Self, SerialError> {
        let mut tokens = line.split('|');
        let structure = Self::read_serial2(id, &mut tokens, parse_atom)?;
        let trailing = tokens.count();
        if trailing > 0 {
            return Err(SerialError::TrailingFields(trailing));
        }
        Ok(structure)
    }

    /// Read one structure off a token stream, leaving anything after it untouched.
    pub(crate) fn read_serial2<'a>(
        id: MoleculeId,
        tokens: &mut impl Iterator<Item = &'a str>,
        mut parse_atom: impl FnMut(&str) -> Result<A, SerialError>,
    ) -> Result<Self, SerialError> {
        let atom_count: usize = parse_number(next_field(tokens, "atom count")?, "atom count")?;
        let bond_count: usize = parse_number(next_field(tokens, "bond count")?, "bond count")?;
        let mut structure = Self::new(id);

        for i in 0..atom_count {
            let atom = parse_atom(next_field(tokens, "atom")?)?;
            structure.add_atom(atom);

            let connected: usize = parse_number(next_field(tokens, "atom bond count")?, "atom bond count")?;
            for _ in 0..connected {
                let field = next_field(tokens, "bond")?;
                let (target, order) = field.split_once('-').ok_or_else(|| SerialError::InvalidNumber {
                    field: "bond",
                    value: field.to_string(),
                })?;
                let target: usize = parse_number(target, "bond target")?;
                let order: u8 = parse_number(order, "bond order")?;
                if target >= i {
                    return Err(SerialError::BondTargetOutOfRange { target, available: i });
                }
                structure
                    .add_bond(i, target, order)
                    .map_err(|_| SerialError::BondTargetOutOfRange { target, available: i })?;
            }
        }

        if structure.bond_count() != bond_count {
            return Err(SerialError::CountMismatch {
                what: "bonds",
                expected: bond_count,
                found: structure.bond_count(),
            });
        }
        Ok(structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::element::Element;
    use crate::model::structure::tests::build;

    fn parse_symbol(field: &str) -> Result<Element, SerialError> {
        Element::by_symbol(field).ok_or_else(|| SerialError::UnknownElement(field.to_string()))
    }

    #[test]
    fn water_serial_form() {
        let water = build(1, &[Element::OXYGEN, Element::HYDROGEN, Element::HYDROGEN], &[(0, 1), (0, 2)]);
        assert_eq!(water.to_serial2(), "3|2|O|0|H|1|0-1|H|1|0-1");
    }

    #[test]
    fn parse_back_symbols() {
        let line = "3|2|O|0|H|1|0-1|H|1|0-1";
        let parsed = MoleculeStructure::from_serial2_with(MoleculeId(4), line, parse_symbol).unwrap();
        assert_eq!(parsed.id(), MoleculeId(4));
        assert_eq!(parsed.atom_count(), 3);
        assert_eq!(parsed.to_serial2(), line);
    }

    #[test]
    fn bond_order_survives() {
        let line = "3|2|O|0|C|1|0-2|O|1|1-2";
        let co2 = MoleculeStructure::from_serial2_with(MoleculeId(1), line, parse_symbol).unwrap();
        assert!(co2.bonds().iter().all(|b| b.order == 2));
        assert_eq!(co2.to_serial2(), line);
    }

    #[test]
    fn forward_bond_target_is_rejected() {
        let err = MoleculeStructure::from_serial2_with(MoleculeId(1), "2|1|H|1|1-1|H|0", parse_symbol).unwrap_err();
        assert_eq!(err, SerialError::BondTargetOutOfRange { target: 1, available: 0 });
    }

    #[test]
    fn bond_count_mismatch_is_rejected() {
        let err = MoleculeStructure::from_serial2_with(MoleculeId(1), "2|2|H|0|H|1|0-1", parse_symbol).unwrap_err();
        assert!(matches!(err, SerialError::CountMismatch { expected: 2, found: 1, .. }));
    }

    #[test]
    fn truncated_and_trailing_input() {
        assert_eq!(
            MoleculeStructure::from_serial2_with(MoleculeId(1), "2|1|H|0", parse_symbol).unwrap_err(),
            SerialError::MissingField("atom")
        );
        assert_eq!(
            MoleculeStructure::from_serial2_with(MoleculeId(1), "1|0|H|0|extra", parse_symbol).unwrap_err(),
            SerialError::TrailingFields(1)
        );
    }

    #[test]
    fn oversized_header_counts_are_errors() {
        let err = MoleculeStructure::from_serial2_with(MoleculeId(1), "1000000000000000000|0|H|0", parse_symbol)
            .unwrap_err();
        assert_eq!(err, SerialError::MissingField("atom"));
        let err = MoleculeStructure::from_serial2_with(MoleculeId(1), "1|1000000000000000000|H|0", parse_symbol)
            .unwrap_err();
        assert!(matches!(err, SerialError::CountMismatch { what: "bonds", found: 0, .. }));
    }
}
