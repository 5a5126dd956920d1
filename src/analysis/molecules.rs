// Released under MIT License.

//! Detection of chemically relevant molecular groups (water, ammonium,
//! methylammonium) from raw atomic coordinates via distance-threshold
//! bonding rules.

use std::fmt::{self, Display};

use serde::Serialize;

use crate::errors::GeometryError;
use crate::structure::{AtomicSystem, SimCell};

use super::geometry::distance_matrix;

/// Kind of a recognized molecular group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoleculeKind {
    Water,
    Ammonium,
    Methylammonium,
}

impl Display for MoleculeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoleculeKind::Water => write!(f, "H2O"),
            MoleculeKind::Ammonium => write!(f, "NH4"),
            MoleculeKind::Methylammonium => write!(f, "CH3NH3"),
        }
    }
}

/// A recognized molecular group: an ordered tuple of atom indices into the
/// `AtomicSystem` the group was detected in.
///
/// Group cardinality is fixed per kind and never partial; atom indices within
/// a group are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MoleculeGroup {
    /// Water as `[H, O, H]`.
    Water { hydrogens: [usize; 2], oxygen: usize },
    /// Ammonium as `[N, H, H, H, H]`.
    Ammonium {
        nitrogen: usize,
        hydrogens: [usize; 4],
    },
    /// Methylammonium as `[N, H, H, H, C, H, H, H]`.
    Methylammonium {
        nitrogen: usize,
        amine_hydrogens: [usize; 3],
        carbon: usize,
        methyl_hydrogens: [usize; 3],
    },
}

impl MoleculeGroup {
    /// Kind of the group.
    pub fn kind(&self) -> MoleculeKind {
        match self {
            MoleculeGroup::Water { .. } => MoleculeKind::Water,
            MoleculeGroup::Ammonium { .. } => MoleculeKind::Ammonium,
            MoleculeGroup::Methylammonium { .. } => MoleculeKind::Methylammonium,
        }
    }

    /// Index of the central atom of the group (O for water, N otherwise).
    pub fn central_atom(&self) -> usize {
        match self {
            MoleculeGroup::Water { oxygen, .. } => *oxygen,
            MoleculeGroup::Ammonium { nitrogen, .. } => *nitrogen,
            MoleculeGroup::Methylammonium { nitrogen, .. } => *nitrogen,
        }
    }

    /// Indices of the dissociable hydrogens of the group: both hydrogens for
    /// water, all four for ammonium, and only the amine hydrogens for
    /// methylammonium (the methyl hydrogens do not take part in proton
    /// transfer).
    pub fn dissociable_hydrogens(&self) -> &[usize] {
        match self {
            MoleculeGroup::Water { hydrogens, .. } => hydrogens,
            MoleculeGroup::Ammonium { hydrogens, .. } => hydrogens,
            MoleculeGroup::Methylammonium {
                amine_hydrogens, ..
            } => amine_hydrogens,
        }
    }

    /// All atom indices of the group in canonical tuple order.
    pub fn atom_indices(&self) -> Vec<usize> {
        match self {
            MoleculeGroup::Water { hydrogens, oxygen } => {
                vec![hydrogens[0], *oxygen, hydrogens[1]]
            }
            MoleculeGroup::Ammonium {
                nitrogen,
                hydrogens,
            } => {
                let mut indices = vec![*nitrogen];
                indices.extend_from_slice(hydrogens);
                indices
            }
            MoleculeGroup::Methylammonium {
                nitrogen,
                amine_hydrogens,
                carbon,
                methyl_hydrogens,
            } => {
                let mut indices = vec![*nitrogen];
                indices.extend_from_slice(amine_hydrogens);
                indices.push(*carbon);
                indices.extend_from_slice(methyl_hydrogens);
                indices
            }
        }
    }
}

impl Display for MoleculeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indices = self
            .atom_indices()
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} [{}]", self.kind(), indices)
    }
}

/// Indices of `partners` lying strictly below `threshold` from the atom with
/// index `center`, in partner enumeration order.
fn bonded_partners(
    system: &AtomicSystem,
    center: usize,
    partners: &[usize],
    threshold: f64,
    cell: Option<&SimCell>,
) -> Result<Vec<usize>, GeometryError> {
    let center_position = [*system
        .position(center)
        .unwrap_or_else(|e| panic!("FATAL SGROWTH ERROR | molecules::bonded_partners | Central atom index invalid: {}. {}", e, crate::PANIC_MESSAGE))];
    let partner_positions = partners
        .iter()
        .map(|&i| {
            *system.position(i).unwrap_or_else(|e| panic!("FATAL SGROWTH ERROR | molecules::bonded_partners | Partner atom index invalid: {}. {}", e, crate::PANIC_MESSAGE))
        })
        .collect::<Vec<_>>();

    let distances = distance_matrix(&center_position, &partner_positions, cell)?;

    Ok(distances[0]
        .iter()
        .enumerate()
        .filter(|(_, &distance)| distance < threshold)
        .map(|(i, _)| partners[i])
        .collect())
}

/// Detect all water molecules in the system: oxygens with exactly two
/// hydrogens strictly closer than `threshold`.
///
/// Oxygens with any other number of close hydrogens (transient or dissociated
/// states) are silently skipped. Output order follows the oxygen enumeration
/// order in the system.
pub fn detect_water(
    system: &AtomicSystem,
    threshold: f64,
    cell: Option<&SimCell>,
) -> Result<Vec<MoleculeGroup>, GeometryError> {
    let oxygens = system.indices_of("O");
    let hydrogens = system.indices_of("H");
    if oxygens.is_empty() || hydrogens.is_empty() {
        return Ok(Vec::new());
    }

    let mut molecules = Vec::new();
    for &oxygen in &oxygens {
        let close = bonded_partners(system, oxygen, &hydrogens, threshold, cell)?;
        if let [h1, h2] = close[..] {
            molecules.push(MoleculeGroup::Water {
                hydrogens: [h1, h2],
                oxygen,
            });
        }
    }

    Ok(molecules)
}

/// Detect all ammonium cations in the system: nitrogens with exactly four
/// hydrogens strictly closer than `threshold`.
pub fn detect_ammonium(
    system: &AtomicSystem,
    threshold: f64,
    cell: Option<&SimCell>,
) -> Result<Vec<MoleculeGroup>, GeometryError> {
    let nitrogens = system.indices_of("N");
    let hydrogens = system.indices_of("H");
    if nitrogens.is_empty() || hydrogens.is_empty() {
        return Ok(Vec::new());
    }

    let mut molecules = Vec::new();
    for &nitrogen in &nitrogens {
        let close = bonded_partners(system, nitrogen, &hydrogens, threshold, cell)?;
        if let [h1, h2, h3, h4] = close[..] {
            molecules.push(MoleculeGroup::Ammonium {
                nitrogen,
                hydrogens: [h1, h2, h3, h4],
            });
        }
    }

    Ok(molecules)
}

/// Detect all methylammonium cations in the system: nitrogens with exactly
/// three hydrogens strictly closer than `h_threshold`, bonded to exactly one
/// carbon strictly closer than `c_threshold`, which itself carries exactly
/// three hydrogens strictly closer than `h_threshold`.
pub fn detect_methylammonium(
    system: &AtomicSystem,
    h_threshold: f64,
    c_threshold: f64,
    cell: Option<&SimCell>,
) -> Result<Vec<MoleculeGroup>, GeometryError> {
    let nitrogens = system.indices_of("N");
    let hydrogens = system.indices_of("H");
    let carbons = system.indices_of("C");
    if nitrogens.is_empty() || hydrogens.is_empty() || carbons.is_empty() {
        return Ok(Vec::new());
    }

    let mut molecules = Vec::new();
    for &nitrogen in &nitrogens {
        let amine = bonded_partners(system, nitrogen, &hydrogens, h_threshold, cell)?;
        let [h1, h2, h3] = amine[..] else {
            continue;
        };

        let bonded_carbons = bonded_partners(system, nitrogen, &carbons, c_threshold, cell)?;
        let [carbon] = bonded_carbons[..] else {
            continue;
        };

        let methyl = bonded_partners(system, carbon, &hydrogens, h_threshold, cell)?;
        let [h4, h5, h6] = methyl[..] else {
            continue;
        };

        molecules.push(MoleculeGroup::Methylammonium {
            nitrogen,
            amine_hydrogens: [h1, h2, h3],
            carbon,
            methyl_hydrogens: [h4, h5, h6],
        });
    }

    Ok(molecules)
}
