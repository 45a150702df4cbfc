use crate::error::SerialError;
use crate::model::complete::CompleteMolecule;
use crate::model::structure::{MoleculeIdAllocator, MoleculeStructure, StructureAtom};

/// Reference molecules, loaded one `to_serial2` line per entry.
#[derive(Debug, Clone, Default)]
pub struct MoleculeCatalog {
    molecules: Vec<CompleteMolecule>,
    ids: MoleculeIdAllocator,
}

impl MoleculeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole catalog file. Blank lines and lines starting with `#` are skipped.
    /// The error carries the 1-based line number.
    pub fn parse(text: &str) -> Result<Self, (usize, SerialError)> {
        let mut catalog = Self::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            catalog.add_serial2(line).map_err(|err| (index + 1, err))?;
        }
        Ok(catalog)
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self, SerialError> {
        let mut catalog = Self::new();
        for line in lines {
            catalog.add_serial2(line)?;
        }
        Ok(catalog)
    }

    pub fn add_serial2(&mut self, line: &str) -> Result<&CompleteMolecule, SerialError> {
        let molecule = CompleteMolecule::from_serial2(self.ids.next_id(), line)?;
        Ok(self.push(molecule))
    }

    pub fn add_legacy(&mut self, line: &str) -> Result<&CompleteMolecule, SerialError> {
        let molecule = CompleteMolecule::from_legacy_string(self.ids.next_id(), line)?;
        Ok(self.push(molecule))
    }

    fn push(&mut self, molecule: CompleteMolecule) -> &CompleteMolecule {
        log::debug!("catalog: loaded {} ({})", molecule.common_name(), molecule.formula);
        self.molecules.push(molecule);
        &self.molecules[self.molecules.len() - 1]
    }

    /// The catalog entry with the same atoms and connectivity as `structure`.
    pub fn find_matching<A: StructureAtom>(&self, structure: &MoleculeStructure<A>) -> Option<&CompleteMolecule> {
        self.molecules.iter().find(|m| structure.is_equivalent(&m.structure))
    }

    /// Entries with this formula, in catalog order.
    pub fn with_formula<'a>(&'a self, formula: &'a str) -> impl Iterator<Item = &'a CompleteMolecule> + 'a {
        self.molecules.iter().filter(move |m| m.formula == formula)
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompleteMolecule> {
        self.molecules.iter()
    }

    /// One `to_serial2` line per entry.
    pub fn to_text(&self) -> String {
        self.molecules
            .iter()
            .map(|m| m.to_serial2())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::element::Element;
    use crate::model::structure::tests::build;

    const CATALOG: &str = "\
# small reference set
water|H2O|962|2d|3|2|O 2.5369 -0.155|0|H 3.0739 0.155|1|0-1|H 2 0.155|1|0-1
molecular hydrogen|H2|783|2d|2|1|H 2.5 0|0|H 3.5 0|1|0-1

ammonia|H3N|222|2d|4|3|N 2.5 0.2|0|H 2 -0.1|1|0-1|H 3 -0.1|1|0-1|H 2.5 0.8|1|0-1
";

    #[test]
    fn parse_skips_comments_and_blanks() {
        let catalog = MoleculeCatalog::parse(CATALOG).unwrap();
        assert_eq!(catalog.len(), 3);
        let names: Vec<String> = catalog.iter().map(|m| m.common_name()).collect();
        assert_eq!(names, ["Water", "Hydrogen", "Ammonia"]);
    }

    #[test]
    fn parse_reports_line_number() {
        let (line, err) = MoleculeCatalog::parse("water|H2O|962|2d|1|0|H 0 0|0\nbad|X|1|2d|1|0|Q 0 0|0").unwrap_err();
        assert_eq!(line, 2);
        assert_eq!(err, SerialError::UnknownElement("Q".to_string()));
    }

    #[test]
    fn finds_equivalent_structure_regardless_of_atom_order() {
        let catalog = MoleculeCatalog::parse(CATALOG).unwrap();
        let live = build(40, &[Element::HYDROGEN, Element::OXYGEN, Element::HYDROGEN], &[(1, 0), (2, 1)]);
        assert_eq!(catalog.find_matching(&live).map(|m| m.formula.as_str()), Some("H2O"));

        let nh2 = build(41, &[Element::NITROGEN, Element::HYDROGEN, Element::HYDROGEN], &[(0, 1), (0, 2)]);
        assert!(catalog.find_matching(&nh2).is_none());
    }

    #[test]
    fn text_round_trip() {
        let catalog = MoleculeCatalog::parse(CATALOG).unwrap();
        let again = MoleculeCatalog::parse(&catalog.to_text()).unwrap();
        assert_eq!(again.to_text(), catalog.to_text());
        assert_eq!(again.with_formula("H2").count(), 1);
    }
}
