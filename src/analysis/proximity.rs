// Released under MIT License.

//! Classification of detected molecular groups by their proximity to the
//! electrode surface and by cation hydration-shell membership.

use std::fmt::{self, Display};

use getset::{CopyGetters, Getters};
use serde::Serialize;

use crate::errors::GeometryError;
use crate::structure::{AtomicSystem, SimCell};

use super::geometry::{distance_matrix, nearest_entry, nearest_index};
use super::molecules::MoleculeGroup;

/// Round a distance for reporting. All user-facing distances carry three
/// decimal places.
#[inline]
fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// The cation population of a system: either a set of monoatomic cations
/// (e.g. Na+) or a set of detected molecular cations (NH4+, CH3NH3+).
#[derive(Debug, Clone)]
pub enum CationPopulation {
    /// Atom indices of monoatomic cations.
    Atomic(Vec<usize>),
    /// Detected molecular cation groups.
    Molecular(Vec<MoleculeGroup>),
}

impl CationPopulation {
    /// Atom indices of the cation centers (the cation atom itself, or the
    /// nitrogen of a molecular cation).
    pub fn centers(&self) -> Vec<usize> {
        match self {
            CationPopulation::Atomic(indices) => indices.clone(),
            CationPopulation::Molecular(groups) => {
                groups.iter().map(|group| group.central_atom()).collect()
            }
        }
    }

    /// Is the population empty?
    pub fn is_empty(&self) -> bool {
        match self {
            CationPopulation::Atomic(indices) => indices.is_empty(),
            CationPopulation::Molecular(groups) => groups.is_empty(),
        }
    }
}

/// A molecular group found within the surface threshold of the electrode,
/// with its nearest contact.
#[derive(Debug, Clone, Getters, CopyGetters, Serialize)]
pub struct SurfaceContact {
    /// The classified group.
    #[getset(get = "pub")]
    group: MoleculeGroup,
    /// Index of the dissociable hydrogen closest to the surface.
    #[getset(get_copy = "pub")]
    closest_hydrogen: usize,
    /// Index of the surface atom closest to that hydrogen.
    #[getset(get_copy = "pub")]
    closest_surface_atom: usize,
    /// The hydrogen-surface distance (3 decimal places).
    #[getset(get_copy = "pub")]
    distance: f64,
}

impl Display for SurfaceContact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\tH: {}\tsurface: {}\tdist: {:.3}",
            self.group, self.closest_hydrogen, self.closest_surface_atom, self.distance
        )
    }
}

/// A water molecule classified by its membership in the hydration shell of
/// a cation.
#[derive(Debug, Clone, Getters, CopyGetters, Serialize)]
pub struct ShellMembership {
    /// The classified water molecule.
    #[getset(get = "pub")]
    water: MoleculeGroup,
    /// Distance from the water oxygen to the nearest cation center
    /// (3 decimal places).
    #[getset(get_copy = "pub")]
    cation_distance: f64,
    /// Does the water belong to the hydration shell?
    #[getset(get_copy = "pub")]
    in_shell: bool,
}

impl Display for ShellMembership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\tO-cation dist: {:.3}\t{}",
            self.water,
            self.cation_distance,
            if self.in_shell {
                "in hydration shell"
            } else {
                "not in hydration shell"
            }
        )
    }
}

/// Nearest contact between a reference oxygen and the cation population.
#[derive(Debug, Clone, Getters, CopyGetters, Serialize)]
pub struct CationContact {
    /// Distance from the oxygen to the nearest cation center (3 decimal places).
    #[getset(get_copy = "pub")]
    center_distance: f64,
    /// Globally closest dissociable cation hydrogen to the oxygen.
    /// `None` for monoatomic cations.
    #[getset(get_copy = "pub")]
    closest_hydrogen: Option<usize>,
    /// Distance from the oxygen to that hydrogen (3 decimal places).
    #[getset(get_copy = "pub")]
    hydrogen_distance: Option<f64>,
    /// Bond label "O-H" of the closest contact, e.g. "12-47".
    #[getset(get = "pub")]
    bond_label: Option<String>,
}

/// Find all groups whose dissociable hydrogens come strictly closer than
/// `threshold` to any atom of the `surface_species`.
///
/// Results are sorted ascending by the contact distance; ties keep the
/// original group enumeration order. This ordering ranks the groups by how
/// relevant they are as reaction candidates and is part of the contract.
pub fn surface_contacts(
    groups: &[MoleculeGroup],
    system: &AtomicSystem,
    surface_species: &str,
    threshold: f64,
    cell: Option<&SimCell>,
) -> Result<Vec<SurfaceContact>, GeometryError> {
    let surface_indices = system.indices_of(surface_species);
    let surface_positions = positions(system, &surface_indices);

    let mut contacts = Vec::new();
    for group in groups {
        let mobile = group.dissociable_hydrogens();
        let mobile_positions = positions(system, mobile);

        let distances = distance_matrix(&mobile_positions, &surface_positions, cell)?;
        let Some((h, s, distance)) = nearest_entry(&distances) else {
            continue;
        };

        if distance < threshold {
            contacts.push(SurfaceContact {
                group: group.clone(),
                closest_hydrogen: mobile[h],
                closest_surface_atom: surface_indices[s],
                distance: round3(distance),
            });
        }
    }

    contacts.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    Ok(contacts)
}

/// Split water molecules by hydration-shell membership: a water belongs to
/// the shell when its oxygen lies strictly closer than `threshold` to any
/// cation center.
///
/// Returns `(in_shell, out_of_shell)`, each sorted ascending by the
/// oxygen-cation distance with ties in enumeration order.
pub fn split_by_hydration_shell(
    waters: &[MoleculeGroup],
    system: &AtomicSystem,
    cations: &CationPopulation,
    threshold: f64,
    cell: Option<&SimCell>,
) -> Result<(Vec<ShellMembership>, Vec<ShellMembership>), GeometryError> {
    let centers = cations.centers();
    let center_positions = positions(system, &centers);

    let mut in_shell = Vec::new();
    let mut out_of_shell = Vec::new();

    for water in waters {
        let oxygen_position = positions(system, &[water.central_atom()]);
        let distances = distance_matrix(&oxygen_position, &center_positions, cell)?;
        let (_, distance) = nearest_index(&distances[0]).unwrap_or_else(|| {
            panic!(
                "FATAL SGROWTH ERROR | proximity::split_by_hydration_shell | No nearest cation found. {}",
                crate::PANIC_MESSAGE
            )
        });

        let membership = ShellMembership {
            water: water.clone(),
            cation_distance: round3(distance),
            in_shell: distance < threshold,
        };

        if membership.in_shell {
            in_shell.push(membership);
        } else {
            out_of_shell.push(membership);
        }
    }

    in_shell.sort_by(|a, b| a.cation_distance.total_cmp(&b.cation_distance));
    out_of_shell.sort_by(|a, b| a.cation_distance.total_cmp(&b.cation_distance));

    Ok((in_shell, out_of_shell))
}

/// Find the nearest contact between the given oxygen atom and the cation
/// population: the closest cation center and, for molecular cations, the
/// globally closest dissociable cation hydrogen with its "O-H" bond label.
pub fn closest_cation_contact(
    oxygen: usize,
    system: &AtomicSystem,
    cations: &CationPopulation,
    cell: Option<&SimCell>,
) -> Result<CationContact, GeometryError> {
    let oxygen_position = positions(system, &[oxygen]);

    let centers = cations.centers();
    let center_positions = positions(system, &centers);
    let center_distances = distance_matrix(&oxygen_position, &center_positions, cell)?;
    let (_, center_distance) = nearest_index(&center_distances[0]).unwrap_or_else(|| {
        panic!(
            "FATAL SGROWTH ERROR | proximity::closest_cation_contact | No nearest cation found. {}",
            crate::PANIC_MESSAGE
        )
    });

    let hydrogens = match cations {
        CationPopulation::Atomic(_) => Vec::new(),
        CationPopulation::Molecular(groups) => groups
            .iter()
            .flat_map(|group| group.dissociable_hydrogens().iter().copied())
            .collect(),
    };

    if hydrogens.is_empty() {
        return Ok(CationContact {
            center_distance: round3(center_distance),
            closest_hydrogen: None,
            hydrogen_distance: None,
            bond_label: None,
        });
    }

    let hydrogen_positions = positions(system, &hydrogens);
    let hydrogen_distances = distance_matrix(&oxygen_position, &hydrogen_positions, cell)?;
    let (h, hydrogen_distance) = nearest_index(&hydrogen_distances[0]).unwrap_or_else(|| {
        panic!(
            "FATAL SGROWTH ERROR | proximity::closest_cation_contact | No nearest hydrogen found. {}",
            crate::PANIC_MESSAGE
        )
    });

    Ok(CationContact {
        center_distance: round3(center_distance),
        closest_hydrogen: Some(hydrogens[h]),
        hydrogen_distance: Some(round3(hydrogen_distance)),
        bond_label: Some(format!("{}-{}", oxygen, hydrogens[h])),
    })
}

/// Positions of the atoms with the given indices. Indices are taken from
/// detected groups and are valid by construction.
fn positions(system: &AtomicSystem, indices: &[usize]) -> Vec<nalgebra::Vector3<f64>> {
    system.positions_of(indices).unwrap_or_else(|e| {
        panic!(
            "FATAL SGROWTH ERROR | proximity::positions | Invalid atom index: {}. {}",
            e,
            crate::PANIC_MESSAGE
        )
    })
}
