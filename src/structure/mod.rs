// Released under MIT License.

//! Contains the representation of an atomic structure snapshot and the
//! POSCAR/CONTCAR reader producing it.

use std::path::{Path, PathBuf};

use getset::{CopyGetters, Getters};
use nalgebra::{Matrix3, Vector3};

use crate::errors::{ProfileError, StructureError};
use crate::profile::segments::resolve_segments;

mod poscar;

/// One atom of an atomic structure: chemical species and Cartesian position in A.
#[derive(Debug, Clone, Getters)]
pub struct Atom {
    /// Chemical species label, e.g. "Au", "O", "H".
    #[getset(get = "pub")]
    species: String,
    /// Cartesian position of the atom.
    #[getset(get = "pub")]
    position: Vector3<f64>,
}

impl Atom {
    /// Create a new atom.
    pub fn new(species: &str, position: Vector3<f64>) -> Self {
        Self {
            species: species.to_owned(),
            position,
        }
    }
}

/// Orthorhombic simulation cell. Only the diagonal box lengths are stored;
/// construction from a general lattice fails unless the off-diagonal elements
/// vanish.
#[derive(Debug, Clone, Copy, CopyGetters)]
pub struct SimCell {
    /// Box lengths along x, y, z in A.
    #[getset(get_copy = "pub")]
    lengths: Vector3<f64>,
}

impl SimCell {
    /// Relative tolerance for treating a lattice off-diagonal element as zero.
    const ORTHO_TOL: f64 = 1e-6;

    /// Create a cell directly from the three box lengths.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            lengths: Vector3::new(x, y, z),
        }
    }

    /// Create a cell from a general lattice matrix (rows are lattice vectors).
    /// Returns `None` if the lattice is not orthorhombic.
    pub fn from_lattice(lattice: &Matrix3<f64>) -> Option<Self> {
        let scale = lattice.norm();
        for i in 0..3 {
            for j in 0..3 {
                if i != j && lattice[(i, j)].abs() > Self::ORTHO_TOL * scale {
                    return None;
                }
            }
        }

        Some(Self::new(lattice[(0, 0)], lattice[(1, 1)], lattice[(2, 2)]))
    }
}

/// An ordered snapshot of atoms read from a POSCAR/CONTCAR file, with the
/// lattice it was defined in.
#[derive(Debug, Clone, Getters)]
pub struct AtomicSystem {
    /// Comment line of the structure file.
    #[getset(get = "pub")]
    comment: String,
    /// Lattice matrix (rows are lattice vectors) in A.
    #[getset(get = "pub")]
    lattice: Matrix3<f64>,
    /// Atoms in file order.
    #[getset(get = "pub")]
    atoms: Vec<Atom>,
    /// Path the system was read from. Used in error messages.
    #[getset(get = "pub")]
    source: PathBuf,
}

impl AtomicSystem {
    /// Read an atomic system from a VASP 5 POSCAR/CONTCAR file.
    pub fn from_poscar(path: impl AsRef<Path>) -> Result<Self, StructureError> {
        poscar::read_poscar(path.as_ref())
    }

    /// Create a system directly from a lattice and a list of atoms.
    pub fn new(lattice: Matrix3<f64>, atoms: Vec<Atom>) -> Self {
        Self {
            comment: String::new(),
            lattice,
            atoms,
            source: PathBuf::new(),
        }
    }

    /// Number of atoms in the system.
    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Indices of all atoms of the given species, in file order.
    pub fn indices_of(&self, species: &str) -> Vec<usize> {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| atom.species() == species)
            .map(|(i, _)| i)
            .collect()
    }

    /// Position of the atom with the given index.
    pub fn position(&self, index: usize) -> Result<&Vector3<f64>, StructureError> {
        self.atoms
            .get(index)
            .map(Atom::position)
            .ok_or(StructureError::InvalidAtomIndex {
                index,
                n_atoms: self.atoms.len(),
            })
    }

    /// Positions of the atoms with the given indices, in the given order.
    pub fn positions_of(&self, indices: &[usize]) -> Result<Vec<Vector3<f64>>, StructureError> {
        indices
            .iter()
            .map(|&i| self.position(i).cloned())
            .collect()
    }

    /// Get the orthorhombic simulation cell of the system.
    /// Fails if the lattice is not orthorhombic.
    pub fn cell(&self) -> Result<SimCell, StructureError> {
        SimCell::from_lattice(&self.lattice)
            .ok_or_else(|| StructureError::NotOrthorhombicCell(self.source.clone()))
    }
}

/// Get the path of the structure file describing the initial state of a
/// simulation: `RUN1/POSCAR` when restart segments exist, the base-level
/// `POSCAR` otherwise.
pub fn initial_structure(dir: &Path) -> Result<PathBuf, ProfileError> {
    let segments = resolve_segments(dir)?;

    match segments.first() {
        Some(first) => Ok(first.path().join("POSCAR")),
        None => Ok(dir.join("POSCAR")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simcell_from_orthorhombic_lattice() {
        let lattice = Matrix3::new(10.0, 0.0, 0.0, 0.0, 12.0, 0.0, 0.0, 0.0, 30.0);
        let cell = SimCell::from_lattice(&lattice).unwrap();
        assert_eq!(cell.lengths(), Vector3::new(10.0, 12.0, 30.0));
    }

    #[test]
    fn test_simcell_from_triclinic_lattice() {
        let lattice = Matrix3::new(10.0, 0.0, 0.0, 5.0, 12.0, 0.0, 0.0, 0.0, 30.0);
        assert!(SimCell::from_lattice(&lattice).is_none());
    }

    #[test]
    fn test_indices_of() {
        let system = AtomicSystem {
            comment: String::new(),
            lattice: Matrix3::identity(),
            atoms: vec![
                Atom::new("Au", Vector3::new(0.0, 0.0, 0.0)),
                Atom::new("O", Vector3::new(1.0, 0.0, 0.0)),
                Atom::new("Au", Vector3::new(2.0, 0.0, 0.0)),
            ],
            source: PathBuf::new(),
        };

        assert_eq!(system.indices_of("Au"), vec![0, 2]);
        assert_eq!(system.indices_of("O"), vec![1]);
        assert!(system.indices_of("N").is_empty());
    }

    #[test]
    fn test_initial_structure() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            initial_structure(dir.path()).unwrap(),
            dir.path().join("POSCAR")
        );

        // once restart segments exist, the first segment holds the initial state
        std::fs::create_dir(dir.path().join("RUN2")).unwrap();
        std::fs::create_dir(dir.path().join("RUN1")).unwrap();
        assert_eq!(
            initial_structure(dir.path()).unwrap(),
            dir.path().join("RUN1").join("POSCAR")
        );
    }

    #[test]
    fn test_position_out_of_range() {
        let system = AtomicSystem {
            comment: String::new(),
            lattice: Matrix3::identity(),
            atoms: vec![Atom::new("Au", Vector3::new(0.0, 0.0, 0.0))],
            source: PathBuf::new(),
        };

        match system.position(3) {
            Err(StructureError::InvalidAtomIndex { index: 3, n_atoms: 1 }) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
