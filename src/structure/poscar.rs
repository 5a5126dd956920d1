// Released under MIT License.

//! Reader for VASP 5 POSCAR/CONTCAR structure files.

use std::fs::read_to_string;
use std::path::Path;

use nalgebra::{Matrix3, Vector3};

use crate::errors::StructureError;

use super::{Atom, AtomicSystem};

fn parse_error(path: &Path, line: usize, reason: impl Into<String>) -> StructureError {
    StructureError::CouldNotParse {
        path: path.to_owned(),
        line,
        reason: reason.into(),
    }
}

fn parse_f64(token: &str, path: &Path, line: usize) -> Result<f64, StructureError> {
    token
        .parse::<f64>()
        .map_err(|_| parse_error(path, line, format!("invalid number '{}'", token)))
}

/// Parse a line of three floating-point numbers.
fn parse_vector(line: &str, path: &Path, line_no: usize) -> Result<Vector3<f64>, StructureError> {
    let fields = line.split_whitespace().collect::<Vec<_>>();
    if fields.len() < 3 {
        return Err(parse_error(path, line_no, "expected three numbers"));
    }

    Ok(Vector3::new(
        parse_f64(fields[0], path, line_no)?,
        parse_f64(fields[1], path, line_no)?,
        parse_f64(fields[2], path, line_no)?,
    ))
}

pub(super) fn read_poscar(path: &Path) -> Result<AtomicSystem, StructureError> {
    let content =
        read_to_string(path).map_err(|_| StructureError::FileNotFound(path.to_owned()))?;
    let mut lines = content.lines().enumerate();

    let mut next_line = |expected: &str| {
        lines
            .next()
            .ok_or_else(|| parse_error(path, 0, format!("unexpected end of file ({})", expected)))
    };

    let (_, comment) = next_line("comment line")?;
    let (n, scale_line) = next_line("scaling factor")?;
    let scale = parse_f64(scale_line.split_whitespace().next().unwrap_or(""), path, n + 1)?;
    if scale <= 0.0 {
        // a negative scaling factor means a target cell volume in VASP;
        // this reader does not support it
        return Err(parse_error(
            path,
            n + 1,
            "non-positive scaling factor is not supported",
        ));
    }

    let mut lattice = Matrix3::zeros();
    for row in 0..3 {
        let (n, line) = next_line("lattice vector")?;
        let vector = parse_vector(line, path, n + 1)? * scale;
        lattice.set_row(row, &vector.transpose());
    }

    let (n, species_line) = next_line("species names")?;
    let species = species_line.split_whitespace().collect::<Vec<_>>();
    if species.is_empty() || species[0].parse::<usize>().is_ok() {
        // VASP 4 files carry no species-names line
        return Err(parse_error(
            path,
            n + 1,
            "expected species names (VASP 5 format required)",
        ));
    }

    let (n, counts_line) = next_line("species counts")?;
    let counts = counts_line
        .split_whitespace()
        .map(|token| {
            token
                .parse::<usize>()
                .map_err(|_| parse_error(path, n + 1, format!("invalid species count '{}'", token)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if counts.len() != species.len() {
        return Err(parse_error(
            path,
            n + 1,
            format!(
                "got {} species names but {} species counts",
                species.len(),
                counts.len()
            ),
        ));
    }

    let (n, mut mode_line) = next_line("coordinate mode")?;
    let mut mode_line_no = n + 1;
    if mode_line.trim_start().starts_with(['s', 'S']) {
        // skip the optional `Selective dynamics` line
        let (n, line) = next_line("coordinate mode")?;
        mode_line = line;
        mode_line_no = n + 1;
    }

    let direct = match mode_line.trim_start().chars().next() {
        Some('d') | Some('D') => true,
        // VASP also accepts `k` for Cartesian coordinates
        Some('c') | Some('C') | Some('k') | Some('K') => false,
        _ => {
            return Err(parse_error(
                path,
                mode_line_no,
                format!("invalid coordinate mode '{}'", mode_line.trim()),
            ))
        }
    };

    let mut atoms = Vec::with_capacity(counts.iter().sum());
    for (name, &count) in species.iter().zip(counts.iter()) {
        for _ in 0..count {
            let (n, line) = next_line("atom coordinates")?;
            let raw = parse_vector(line, path, n + 1)?;

            let position = if direct {
                lattice.transpose() * raw
            } else {
                raw * scale
            };

            atoms.push(Atom::new(name, position));
        }
    }

    Ok(AtomicSystem {
        comment: comment.trim().to_owned(),
        lattice,
        atoms,
        source: path.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    const POSCAR_DIRECT: &str = "\
water on gold
1.0
  10.0  0.0  0.0
   0.0 10.0  0.0
   0.0  0.0 20.0
  Au  O  H
   2  1  2
Direct
  0.0  0.0  0.0
  0.5  0.5  0.1
  0.5  0.5  0.5
  0.53  0.5  0.5
  0.47  0.5  0.5
";

    const POSCAR_CARTESIAN: &str = "\
slab
2.0
  5.0  0.0  0.0
  0.0  5.0  0.0
  0.0  0.0 10.0
  Au
  1
Selective dynamics
Cartesian
  1.0  1.0  1.0  T T T
";

    fn write_poscar(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_direct() {
        let file = write_poscar(POSCAR_DIRECT);
        let system = AtomicSystem::from_poscar(file.path()).unwrap();

        assert_eq!(system.comment(), "water on gold");
        assert_eq!(system.n_atoms(), 5);
        assert_eq!(system.indices_of("Au"), vec![0, 1]);
        assert_eq!(system.indices_of("O"), vec![2]);
        assert_eq!(system.indices_of("H"), vec![3, 4]);

        let oxygen = system.position(2).unwrap();
        assert_relative_eq!(oxygen.x, 5.0);
        assert_relative_eq!(oxygen.y, 5.0);
        assert_relative_eq!(oxygen.z, 10.0);

        let cell = system.cell().unwrap();
        assert_relative_eq!(cell.lengths().z, 20.0);
    }

    #[test]
    fn test_read_cartesian_with_selective_dynamics() {
        let file = write_poscar(POSCAR_CARTESIAN);
        let system = AtomicSystem::from_poscar(file.path()).unwrap();

        assert_eq!(system.n_atoms(), 1);
        // Cartesian positions are multiplied by the scaling factor
        let gold = system.position(0).unwrap();
        assert_relative_eq!(gold.x, 2.0);
        assert_relative_eq!(gold.z, 2.0);

        // and so are the lattice vectors
        let cell = system.cell().unwrap();
        assert_relative_eq!(cell.lengths().x, 10.0);
        assert_relative_eq!(cell.lengths().z, 20.0);
    }

    #[test]
    fn test_missing_file() {
        match AtomicSystem::from_poscar("nonexistent/POSCAR") {
            Err(StructureError::FileNotFound(_)) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_vasp4_format_rejected() {
        let content = "\
comment
1.0
  10.0  0.0  0.0
   0.0 10.0  0.0
   0.0  0.0 10.0
   2  1
Direct
  0.0  0.0  0.0
";
        let file = write_poscar(content);
        match AtomicSystem::from_poscar(file.path()) {
            Err(StructureError::CouldNotParse { line: 6, .. }) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_truncated_file() {
        let content = "comment\n1.0\n  10.0 0.0 0.0\n";
        let file = write_poscar(content);
        assert!(AtomicSystem::from_poscar(file.path()).is_err());
    }
}
