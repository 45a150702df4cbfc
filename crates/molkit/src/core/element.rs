//! Chemical elements available to the kit.
//!
//! Covalent radii from Cordero et al. (2008) "Covalent radii revisited"
//! Dalton Trans., 2008, 2832-2838. DOI: 10.1039/b801115j
//! Electronegativities are Pauling values.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Static per-element data.
#[derive(Debug)]
pub struct ElementData {
    pub atomic_number: u8,
    pub symbol: &'static str,
    pub name: &'static str,
    /// Standard atomic weight in daltons.
    pub atomic_mass: f32,
    /// Single-bond covalent radius in picometres. Play-area units are picometres too.
    pub covalent_radius_pm: u16,
    /// Pauling electronegativity.
    pub electronegativity: f32,
    /// Period in the periodic table.
    pub period: u8,
    /// Electrons in the outermost shell.
    pub valence_electrons: u8,
}

/// Immutable reference to an element. Compared and hashed by atomic number.
#[derive(Clone, Copy)]
pub struct Element(&'static ElementData);

impl Element {
    pub const HYDROGEN: Element = Element(&ElementData {
        atomic_number: 1, symbol: "H", name: "hydrogen",
        atomic_mass: 1.008, covalent_radius_pm: 31, electronegativity: 2.20,
        period: 1, valence_electrons: 1,
    });
    pub const BORON: Element = Element(&ElementData {
        atomic_number: 5, symbol: "B", name: "boron",
        atomic_mass: 10.81, covalent_radius_pm: 84, electronegativity: 2.04,
        period: 2, valence_electrons: 3,
    });
    pub const CARBON: Element = Element(&ElementData {
        atomic_number: 6, symbol: "C", name: "carbon",
        atomic_mass: 12.011, covalent_radius_pm: 76, electronegativity: 2.55,
        period: 2, valence_electrons: 4,
    });
    pub const NITROGEN: Element = Element(&ElementData {
        atomic_number: 7, symbol: "N", name: "nitrogen",
        atomic_mass: 14.007, covalent_radius_pm: 71, electronegativity: 3.04,
        period: 2, valence_electrons: 5,
    });
    pub const OXYGEN: Element = Element(&ElementData {
        atomic_number: 8, symbol: "O", name: "oxygen",
        atomic_mass: 15.999, covalent_radius_pm: 66, electronegativity: 3.44,
        period: 2, valence_electrons: 6,
    });
    pub const FLUORINE: Element = Element(&ElementData {
        atomic_number: 9, symbol: "F", name: "fluorine",
        atomic_mass: 18.998, covalent_radius_pm: 57, electronegativity: 3.98,
        period: 2, valence_electrons: 7,
    });
    pub const SILICON: Element = Element(&ElementData {
        atomic_number: 14, symbol: "Si", name: "silicon",
        atomic_mass: 28.085, covalent_radius_pm: 111, electronegativity: 1.90,
        period: 3, valence_electrons: 4,
    });
    pub const PHOSPHORUS: Element = Element(&ElementData {
        atomic_number: 15, symbol: "P", name: "phosphorus",
        atomic_mass: 30.974, covalent_radius_pm: 107, electronegativity: 2.19,
        period: 3, valence_electrons: 5,
    });
    pub const SULFUR: Element = Element(&ElementData {
        atomic_number: 16, symbol: "S", name: "sulfur",
        atomic_mass: 32.06, covalent_radius_pm: 105, electronegativity: 2.58,
        period: 3, valence_electrons: 6,
    });
    pub const CHLORINE: Element = Element(&ElementData {
        atomic_number: 17, symbol: "Cl", name: "chlorine",
        atomic_mass: 35.45, covalent_radius_pm: 102, electronegativity: 3.16,
        period: 3, valence_electrons: 7,
    });
    pub const BROMINE: Element = Element(&ElementData {
        atomic_number: 35, symbol: "Br", name: "bromine",
        atomic_mass: 79.904, covalent_radius_pm: 120, electronegativity: 2.96,
        period: 4, valence_electrons: 7,
    });
    pub const IODINE: Element = Element(&ElementData {
        atomic_number: 53, symbol: "I", name: "iodine",
        atomic_mass: 126.904, covalent_radius_pm: 139, electronegativity: 2.66,
        period: 5, valence_electrons: 7,
    });

    /// Every element the kit knows about, by atomic number.
    pub const ALL: [Element; 12] = [
        Self::HYDROGEN, Self::BORON, Self::CARBON, Self::NITROGEN, Self::OXYGEN, Self::FLUORINE,
        Self::SILICON, Self::PHOSPHORUS, Self::SULFUR, Self::CHLORINE, Self::BROMINE, Self::IODINE,
    ];

    /// Look up an element by its symbol (case-sensitive, e.g. "Cl").
    pub fn by_symbol(symbol: &str) -> Option<Element> {
        Self::ALL.iter().copied().find(|e| e.symbol() == symbol)
    }

    pub fn data(&self) -> &'static ElementData {
        self.0
    }

    pub fn symbol(&self) -> &'static str {
        self.0.symbol
    }

    pub fn name(&self) -> &'static str {
        self.0.name
    }

    pub fn atomic_number(&self) -> u8 {
        self.0.atomic_number
    }

    pub fn atomic_mass(&self) -> f32 {
        self.0.atomic_mass
    }

    pub fn electronegativity(&self) -> f32 {
        self.0.electronegativity
    }

    /// Display radius in play-area units.
    pub fn radius(&self) -> f32 {
        self.0.covalent_radius_pm as f32
    }

    /// Maximum number of bonds this element may form.
    pub fn max_bonds(&self) -> u8 {
        max_bonds(self.0.period, self.0.valence_electrons)
    }

    pub fn is_hydrogen(&self) -> bool {
        self.0.atomic_number == 1
    }
}

/// Maximum bonds from the simplified octet rule: capacity is 2 in period 1 and 8 after it.
/// Elements with fewer than four valence electrons bond once per electron.
/// Capped at 4, the number of Lewis-dot sites.
pub fn max_bonds(period: u8, valence: u8) -> u8 {
    let capacity: u8 = if period == 1 { 2 } else { 8 };
    let bonds = if valence < 4 && period > 1 {
        valence
    } else {
        capacity.saturating_sub(valence.min(capacity))
    };
    bonds.min(4)
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.0.atomic_number == other.0.atomic_number
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.atomic_number.hash(state);
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element({})", self.0.symbol)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.symbol)
    }
}
