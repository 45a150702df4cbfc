use molkit::*;

fn atom(element: Element, precision: AtomPrecision) -> CatalogAtom {
    CatalogAtom { element, precision }
}

#[test]
fn merge_then_split_restores_both_sides() {
    let mut ids = MoleculeIdAllocator::new();
    let mut left = MoleculeStructure::new(ids.next_id());
    left.add_atom(Element::OXYGEN);
    left.add_atom(Element::HYDROGEN);
    left.add_bond(0, 1, 1).unwrap();
    let right = MoleculeStructure::single(ids.next_id(), Element::HYDROGEN);

    let merged = MoleculeStructure::merge(&left, &right, 0, 0, 1, ids.next_id()).unwrap();
    assert_eq!(merged.atom_count(), 3);
    assert_eq!(merged.formula(), "H2O");
    assert!(merged.is_connected());

    let bridge = merged.bond_between(0, 2).unwrap();
    let (a, b) = merged.split(bridge, ids.next_id(), ids.next_id()).unwrap();
    assert!(a.is_equivalent(&left));
    assert!(b.is_equivalent(&right));
    assert!(a.is_connected() && b.is_connected());
}

#[test]
fn mixed_precision_writes_full_and_reads_back() {
    let mut structure = MoleculeStructure::new(MoleculeId(1));
    structure.add_atom(atom(Element::HYDROGEN, AtomPrecision::TwoD { x: 1.5, y: 2.0 }));
    structure.add_atom(atom(Element::FLUORINE, AtomPrecision::ThreeD { x: 0.5, y: -1.0, z: 3.25 }));
    structure.add_bond(0, 1, 1).unwrap();
    let molecule = CompleteMolecule::new("hydrogen fluoride", "HF", Some(16211014), structure);

    let line = molecule.to_serial2();
    assert!(line.starts_with("hydrogen fluoride|HF|16211014|full|2|1|"));

    let back = CompleteMolecule::from_serial2(MoleculeId(2), &line).unwrap();
    assert!(back.has_plane_2d());
    assert!(back.has_space_3d());
    assert_eq!(back.structure.atoms()[0].precision.plane(), (1.5, 2.0));
    assert_eq!(back.structure.atoms()[0].precision.space(), (1.5, 2.0, 0.0));
    assert_eq!(back.structure.atoms()[1].precision.space(), (0.5, -1.0, 3.25));
    assert!(back.structure.is_equivalent(&molecule.structure));
    assert_eq!(back.to_serial2(), line);
}

#[test]
fn catalog_identifies_a_built_molecule() {
    let catalog = MoleculeCatalog::parse(
        "# test catalog\n\
         water|H2O|962|2d|3|2|O 2.5369 -0.155|0|H 3.0739 0.155|1|0-1|H 2 0.155|1|0-1\n\
         molecular hydrogen|H2|783|2d|2|1|H 2.5 0|0|H 3.5 0|1|0-1\n",
    )
    .unwrap();
    assert_eq!(catalog.len(), 2);

    let mut built = MoleculeStructure::new(MoleculeId(50));
    built.add_atom(Element::HYDROGEN);
    built.add_atom(Element::OXYGEN);
    built.add_atom(Element::HYDROGEN);
    built.add_bond(1, 0, 1).unwrap();
    built.add_bond(2, 1, 1).unwrap();

    let found = catalog.find_matching(&built).unwrap();
    assert_eq!(found.common_name(), "Water");
    assert_eq!(found.cid, Some(962));
}
